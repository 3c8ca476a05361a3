//! CLI command handlers
//!
//! This module contains all CLI-related functionality including:
//! - Argument parsing structures
//! - Command dispatch
//! - Report rendering

pub mod args;
pub mod display;
pub mod router;

pub use args::{Cli, Commands, ConfigCommands, ExitArgs};
pub use display::ReportDisplay;
pub use router::execute_command;

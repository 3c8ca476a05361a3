//! # kaishaku
//!
//! Safe git experimentation through named, resumable detached-HEAD sessions.
//!
//! ## Usage
//!
//! ```bash
//! kaishaku open exp1 [<ref>]
//! kaishaku exit [--force|--keep|--save|--no-save]
//! ```
//!
//! ## Modules
//!
//! - `app` - Process setup: configuration, logging, context wiring, fatal errors
//! - `cli` - Argument parsing, dispatch and report rendering
//! - `config` - Tool settings stored in the repository's git config
//! - `error` - Unified error type and error codes
//! - `git` - Git error type and output parsing helpers
//! - `interaction` - Confirmation prompts
//! - `session` - Session model, registry and lifecycle state machine
//! - `storage` - On-disk session records and the active-session pointer
//! - `subprocess` - Process execution and the git command gateway
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod interaction;
pub mod session;
pub mod storage;
pub mod subprocess;

pub use error::{ErrorCode, KaishakuError, Result};

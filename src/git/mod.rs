//! Git gateway support types
//!
//! The gateway itself lives in [`crate::subprocess::git`]; this module holds
//! its error type and the pure output parsers it relies on.

pub mod error;
pub mod parsers;

pub use error::GitError;
pub use parsers::{first_line, non_empty_lines};

/// Prefix under which kaishaku keeps its settings in git's local config
pub const CONFIG_NAMESPACE: &str = "kaishaku";

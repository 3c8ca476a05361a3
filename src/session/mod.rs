//! Session model and lifecycle
//!
//! A session is a named, resumable piece of speculative work on a detached
//! snapshot of the repository. Its state is a handful of record files managed
//! by [`crate::storage`], and every transition goes through
//! [`SessionLifecycle`].

pub mod lifecycle;
pub mod outcome;
pub mod record;
pub mod registry;


pub use lifecycle::{ExitMode, ExitPlan, SessionLifecycle, DISCARD_PROMPT};
pub use outcome::{
    AbortOutcome, ActiveSessionReport, BranchOffOutcome, ChangeDisposition, ExitOutcome,
    OpenOutcome, PurgeOutcome, RecoverOutcome, RenameOutcome, ResumeOutcome, SaveBackOutcome,
    StatusReport,
};
pub use record::{
    format_timestamp, HeadRef, Session, SessionEntry, SessionHealth, SessionRecords,
    HEAD_SENTINEL,
};
pub use registry::{ActiveStatus, SessionEntries, SessionListing, SessionRegistry, SessionSummary};

use crate::error::{ErrorCode, KaishakuError, Result};

/// Check that a session name is usable as a single directory name
pub fn validate_session_name(name: &str) -> Result<()> {
    let problem = if name.is_empty() {
        Some("must not be empty")
    } else if name.starts_with('.') {
        Some("must not start with '.'")
    } else if name.contains(['/', '\\']) {
        Some("must not contain path separators")
    } else if name.chars().any(char::is_control) {
        Some("must not contain control characters")
    } else {
        None
    };

    match problem {
        Some(reason) => Err(KaishakuError::usage_with_code(
            ErrorCode::USAGE_INVALID_SESSION_NAME,
            format!("Invalid session name '{name}': {reason}"),
        )),
        None => Ok(()),
    }
}

/// Reject branch names git would read as an option or split on whitespace
///
/// Everything else is left for git to judge.
pub fn validate_branch_name(name: &str) -> Result<()> {
    let problem = if name.is_empty() {
        Some("must not be empty")
    } else if name.starts_with('-') {
        Some("must not start with '-'")
    } else if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        Some("must not contain whitespace")
    } else if name == HEAD_SENTINEL {
        Some("is reserved")
    } else {
        None
    };

    match problem {
        Some(reason) => Err(KaishakuError::usage_with_code(
            ErrorCode::USAGE_INVALID_BRANCH_NAME,
            format!("Invalid branch name '{name}': {reason}"),
        )),
        None => Ok(()),
    }
}

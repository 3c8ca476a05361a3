//! Results of lifecycle operations
//!
//! Operations never print. They return one of these values and the CLI
//! decides how to render it.

use serde::Serialize;

use super::record::{HeadRef, SessionHealth};
use crate::config::ToolConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOutcome {
    pub name: String,
    pub original_ref: String,
    pub commit: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeOutcome {
    pub name: String,
    pub head_ref: HeadRef,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchOffOutcome {
    pub name: String,
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveBackOutcome {
    pub name: String,
    pub branch: String,
    pub original_ref: String,
    pub warnings: Vec<String>,
}

/// What happened to uncommitted changes on exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDisposition {
    /// Nothing to do and nothing was asked for
    Clean,
    /// Keep or save was requested but the tree was clean
    NothingToKeep,
    Saved,
    Stashed,
    /// Stashing failed and the exit went ahead anyway
    StashFailed,
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The user declined to discard changes; nothing was touched
    Aborted,
    Exited {
        name: String,
        original_ref: String,
        changes: ChangeDisposition,
        warnings: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbortOutcome {
    pub name: String,
    /// Branch checked out because the session was active
    pub returned_to: Option<String>,
    /// False when only a dangling active pointer was cleared
    pub removed: bool,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverOutcome {
    pub name: String,
    /// Original branch recreated at the current commit
    pub recreated_branch: Option<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub old: String,
    pub new: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// No session store exists yet
    NothingToPurge,
    Removed(String),
    Swept {
        removed: usize,
        skipped_active: Option<String>,
        warnings: Vec<String>,
    },
}

/// The active session as shown by `status`
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSessionReport {
    pub name: String,
    pub health: SessionHealth,
    pub original_ref: Option<String>,
    pub head_ref: Option<String>,
    pub last_modified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `git log --oneline -1`, when it could be read
    pub current_head: Option<String>,
    /// `git status --short` lines
    pub changes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub active: Option<ActiveSessionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dangling_active: Option<String>,
    pub config: ToolConfig,
}

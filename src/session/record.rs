use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::storage::{RecordField, RecordStore};

/// Head record value meaning the work has been promoted to a real branch
pub const HEAD_SENTINEL: &str = "HEAD";

/// Where a session's work lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadRef {
    /// A detached commit
    Commit(String),
    /// The session was branched off or saved back
    Promoted,
}

impl HeadRef {
    pub fn parse(raw: &str) -> Self {
        if raw == HEAD_SENTINEL {
            HeadRef::Promoted
        } else {
            HeadRef::Commit(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HeadRef::Commit(commit) => commit,
            HeadRef::Promoted => HEAD_SENTINEL,
        }
    }
}

impl fmt::Display for HeadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the two required records are present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionHealth {
    WellFormed,
    MissingOriginalRef,
    MissingHeadRef,
    MissingBoth,
}

impl SessionHealth {
    pub fn assess(has_original_ref: bool, has_head_ref: bool) -> Self {
        match (has_original_ref, has_head_ref) {
            (true, true) => SessionHealth::WellFormed,
            (false, true) => SessionHealth::MissingOriginalRef,
            (true, false) => SessionHealth::MissingHeadRef,
            (false, false) => SessionHealth::MissingBoth,
        }
    }

    pub fn is_well_formed(self) -> bool {
        self == SessionHealth::WellFormed
    }

    pub fn describe(self) -> &'static str {
        match self {
            SessionHealth::WellFormed => "well-formed",
            SessionHealth::MissingOriginalRef => "missing original branch record",
            SessionHealth::MissingHeadRef => "missing head record",
            SessionHealth::MissingBoth => "missing original branch and head records",
        }
    }
}

/// Raw record values of one session, any of which may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionRecords {
    pub original_ref: Option<String>,
    pub head_ref: Option<String>,
    pub timestamp: Option<String>,
    pub description: Option<String>,
}

impl SessionRecords {
    pub async fn load(store: &RecordStore, name: &str) -> Result<Self> {
        Ok(Self {
            original_ref: store.get(name, RecordField::OriginalRef).await?,
            head_ref: store.get(name, RecordField::HeadRef).await?,
            timestamp: store.get(name, RecordField::Timestamp).await?,
            description: store.get(name, RecordField::Description).await?,
        })
    }

    pub fn health(&self) -> SessionHealth {
        SessionHealth::assess(self.original_ref.is_some(), self.head_ref.is_some())
    }

    pub fn last_modified(&self) -> Option<i64> {
        self.timestamp.as_deref().and_then(|raw| raw.trim().parse().ok())
    }
}

/// A session directory as found on disk
#[derive(Debug, Clone, Serialize)]
pub struct SessionEntry {
    pub name: String,
    pub records: SessionRecords,
    pub health: SessionHealth,
}

impl SessionEntry {
    pub fn new(name: impl Into<String>, records: SessionRecords) -> Self {
        let health = records.health();
        Self {
            name: name.into(),
            records,
            health,
        }
    }

    /// Typed view of the session; `None` unless well-formed
    pub fn session(&self) -> Option<Session> {
        let original_ref = self.records.original_ref.clone()?;
        let head_ref = self.records.head_ref.as_deref().map(HeadRef::parse)?;
        Some(Session {
            name: self.name.clone(),
            original_ref,
            head_ref,
            last_modified: self.records.last_modified(),
            description: self.records.description.clone(),
        })
    }
}

/// A well-formed session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub original_ref: String,
    pub head_ref: HeadRef,
    pub last_modified: Option<i64>,
    pub description: Option<String>,
}

/// Render a stored timestamp in local time
///
/// Missing records read as `unknown`, unparseable ones as `invalid`.
pub fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "unknown".to_string();
    };
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|utc| {
            utc.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "invalid".to_string())
}

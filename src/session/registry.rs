use serde::Serialize;
use std::sync::Arc;

use super::record::{format_timestamp, SessionEntry, SessionRecords};
use crate::error::Result;
use crate::storage::{ActivePointer, RecordStore};
use crate::subprocess::GitRunner;

/// Read-only view over every stored session
pub struct SessionRegistry {
    store: RecordStore,
    active: ActivePointer,
    git: Arc<dyn GitRunner>,
}

/// Cursor over session directories that loads each entry on demand
pub struct SessionEntries<'a> {
    store: &'a RecordStore,
    names: std::vec::IntoIter<String>,
}

impl SessionEntries<'_> {
    /// Load the next session, or `None` when every directory has been seen
    pub async fn next_entry(&mut self) -> Result<Option<SessionEntry>> {
        let Some(name) = self.names.next() else {
            return Ok(None);
        };
        let records = SessionRecords::load(self.store, &name).await?;
        Ok(Some(SessionEntry::new(name, records)))
    }
}

/// What the active pointer currently refers to
#[derive(Debug, Clone)]
pub enum ActiveStatus {
    /// No pointer
    Inactive,
    /// The pointer names an existing session directory, healthy or not
    Active(SessionEntry),
    /// The pointer names a session whose directory is gone
    Dangling(String),
}

/// One well-formed session as shown by `list`
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub name: String,
    pub active: bool,
    pub last_modified: String,
    pub timestamp: Option<i64>,
    pub original_ref: String,
    pub original_ref_exists: bool,
    pub head_ref: String,
    pub head_ref_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Everything `list` reports
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionListing {
    pub sessions: Vec<SessionSummary>,
    /// Session directories skipped because required records are missing
    pub corrupted: Vec<String>,
    pub active: Option<String>,
    /// Active pointer naming a session that no longer exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dangling_active: Option<String>,
}

impl SessionListing {
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionRegistry {
    pub fn new(store: RecordStore, active: ActivePointer, git: Arc<dyn GitRunner>) -> Self {
        Self { store, active, git }
    }

    /// Entry for one session, or `None` if its directory is absent
    pub async fn inspect(&self, name: &str) -> Result<Option<SessionEntry>> {
        if !self.store.session_exists(name).await? {
            return Ok(None);
        }
        let records = SessionRecords::load(&self.store, name).await?;
        Ok(Some(SessionEntry::new(name, records)))
    }

    pub async fn entries(&self) -> Result<SessionEntries<'_>> {
        let names = self.store.session_names().await?;
        Ok(SessionEntries {
            store: &self.store,
            names: names.into_iter(),
        })
    }

    pub async fn active_status(&self) -> Result<ActiveStatus> {
        let Some(name) = self.active.get().await? else {
            return Ok(ActiveStatus::Inactive);
        };
        match self.inspect(&name).await? {
            Some(entry) => Ok(ActiveStatus::Active(entry)),
            None => Ok(ActiveStatus::Dangling(name)),
        }
    }

    /// Summaries of every well-formed session with ref existence checks
    pub async fn summaries(&self) -> Result<SessionListing> {
        let mut listing = SessionListing::default();

        match self.active_status().await? {
            ActiveStatus::Inactive => {}
            ActiveStatus::Active(entry) => listing.active = Some(entry.name),
            ActiveStatus::Dangling(name) => {
                tracing::warn!("Active session '{}' has no session directory", name);
                listing.dangling_active = Some(name);
            }
        }

        let mut entries = self.entries().await?;
        while let Some(entry) = entries.next_entry().await? {
            let Some(session) = entry.session() else {
                tracing::warn!(
                    "Session '{}' is corrupted: {}",
                    entry.name,
                    entry.health.describe()
                );
                listing.corrupted.push(entry.name);
                continue;
            };

            let original_ref_exists = self.git.ref_exists(&session.original_ref).await;
            let head_ref_exists = self.git.ref_exists(session.head_ref.as_str()).await;

            listing.sessions.push(SessionSummary {
                active: listing.active.as_deref() == Some(session.name.as_str()),
                last_modified: format_timestamp(entry.records.timestamp.as_deref()),
                timestamp: session.last_modified,
                original_ref: session.original_ref,
                original_ref_exists,
                head_ref: session.head_ref.to_string(),
                head_ref_exists,
                description: session.description,
                name: session.name,
            });
        }

        Ok(listing)
    }
}

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{is_directory, path_exists, read_first_line, remove_file_if_present, write_line};
use crate::error::{ErrorCode, KaishakuError, Result};

/// Longest record path the store will touch, in bytes
pub const MAX_PATH_LENGTH: usize = 1024;

/// One single-line record kept per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    /// Branch the session was opened from
    OriginalRef,
    /// Commit id the session works on, or the branch sentinel
    HeadRef,
    /// Unix seconds of the last modification
    Timestamp,
    /// Optional free text
    Description,
}

impl RecordField {
    pub const ALL: [RecordField; 4] = [
        RecordField::OriginalRef,
        RecordField::HeadRef,
        RecordField::Timestamp,
        RecordField::Description,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            RecordField::OriginalRef => "session",
            RecordField::HeadRef => "head",
            RecordField::Timestamp => "time",
            RecordField::Description => "desc",
        }
    }
}

/// Per-session record files under the store root
#[derive(Debug, Clone)]
pub struct RecordStore {
    root: PathBuf,
}

impl RecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether any session has ever been stored
    pub async fn root_exists(&self) -> bool {
        is_directory(&self.root).await
    }

    fn checked(path: PathBuf) -> Result<PathBuf> {
        if path.as_os_str().len() > MAX_PATH_LENGTH {
            return Err(KaishakuError::config_with_code(
                ErrorCode::CONFIG_PATH_TOO_LONG,
                format!(
                    "Path exceeds {MAX_PATH_LENGTH} bytes: {}",
                    path.display()
                ),
            ));
        }
        Ok(path)
    }

    pub fn session_dir(&self, session: &str) -> Result<PathBuf> {
        Self::checked(self.root.join(session))
    }

    pub fn record_path(&self, session: &str, field: RecordField) -> Result<PathBuf> {
        Self::checked(self.root.join(session).join(field.file_name()))
    }

    pub async fn put(&self, session: &str, field: RecordField, value: &str) -> Result<()> {
        let path = self.record_path(session, field)?;
        write_line(&path, value).await
    }

    pub async fn get(&self, session: &str, field: RecordField) -> Result<Option<String>> {
        let path = self.record_path(session, field)?;
        read_first_line(&path).await
    }

    /// Remove one record; a missing record is not an error
    pub async fn delete(&self, session: &str, field: RecordField) -> Result<()> {
        let path = self.record_path(session, field)?;
        remove_file_if_present(&path).await
    }

    pub async fn exists(&self, path: &Path) -> bool {
        path_exists(path).await
    }

    pub async fn session_exists(&self, session: &str) -> Result<bool> {
        let dir = self.session_dir(session)?;
        Ok(is_directory(&dir).await)
    }

    pub async fn create_session_dir(&self, session: &str) -> Result<()> {
        let dir = self.session_dir(session)?;
        tokio::fs::create_dir_all(&dir).await.map_err(|err| {
            KaishakuError::io(
                ErrorCode::STORAGE_WRITE_FAILED,
                &dir,
                "Failed to create session directory",
                err,
            )
        })
    }

    /// Store the current time as the session's last modification
    pub async fn touch(&self, session: &str) -> Result<i64> {
        let now = chrono::Utc::now().timestamp();
        self.put(session, RecordField::Timestamp, &now.to_string())
            .await?;
        Ok(now)
    }

    /// Delete all four records and then the session directory
    ///
    /// Unknown files left in the directory make the final removal fail.
    pub async fn remove_session(&self, session: &str) -> Result<()> {
        for field in RecordField::ALL {
            self.delete(session, field).await?;
        }

        let dir = self.session_dir(session)?;
        match tokio::fs::remove_dir(&dir).await {
            Ok(()) => {
                tracing::debug!("Removed session directory {}", dir.display());
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(KaishakuError::io(
                ErrorCode::STORAGE_REMOVE_FAILED,
                &dir,
                "Failed to remove session directory",
                err,
            )),
        }
    }

    /// Move a session directory to a new name in one filesystem rename
    pub async fn rename_session(&self, old: &str, new: &str) -> Result<()> {
        let from = self.session_dir(old)?;
        let to = self.session_dir(new)?;
        tokio::fs::rename(&from, &to).await.map_err(|err| {
            KaishakuError::io(
                ErrorCode::STORAGE_RENAME_FAILED,
                &from,
                format!("Failed to rename session to '{new}'"),
                err,
            )
        })
    }

    /// Names of all session directories, sorted
    ///
    /// Dotfiles (including the active pointer) and plain files are skipped.
    /// A missing store root yields no names.
    pub async fn session_names(&self) -> Result<Vec<String>> {
        let mut reader = match tokio::fs::read_dir(&self.root).await {
            Ok(reader) => reader,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(KaishakuError::io(
                    ErrorCode::STORAGE_READ_FAILED,
                    &self.root,
                    "Failed to list sessions",
                    err,
                ))
            }
        };

        let mut names = Vec::new();
        loop {
            let entry = reader.next_entry().await.map_err(|err| {
                KaishakuError::io(
                    ErrorCode::STORAGE_READ_FAILED,
                    &self.root,
                    "Failed to list sessions",
                    err,
                )
            })?;
            let Some(entry) = entry else { break };

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!("Skipping non UTF-8 entry {:?}", entry.path());
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if is_directory(&entry.path()).await {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}

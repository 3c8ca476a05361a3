//! On-disk ledger for kaishaku sessions
//!
//! Everything lives under `<git-dir>/kaishaku/`: one directory per session
//! holding single-line record files, plus the `.active` pointer file at the
//! root. Records are plain text so they can be inspected and repaired by hand.

pub mod active;
pub mod records;

pub use active::ActivePointer;
pub use records::{RecordField, RecordStore, MAX_PATH_LENGTH};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{ErrorCode, KaishakuError, Result};

/// Name of the store directory inside the git directory
pub const STORE_DIR_NAME: &str = "kaishaku";

/// Locate the store root for a repository
///
/// `git_dir` is whatever `git rev-parse --git-dir` printed, which may be
/// relative to the working directory.
pub fn store_root(working_dir: &Path, git_dir: &str) -> PathBuf {
    working_dir.join(git_dir).join(STORE_DIR_NAME)
}

/// Read the first line of a single-line record file
///
/// A missing file and an empty first line both read as `None`.
pub(crate) async fn read_first_line(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => {
            let line = content.lines().next().unwrap_or("").trim_end_matches('\r');
            if line.is_empty() {
                Ok(None)
            } else {
                Ok(Some(line.to_string()))
            }
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(KaishakuError::io(
            ErrorCode::STORAGE_READ_FAILED,
            path,
            "Failed to read record",
            err,
        )),
    }
}

/// Write `value` followed by a newline, replacing any previous content
pub(crate) async fn write_line(path: &Path, value: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|err| {
            KaishakuError::io(
                ErrorCode::STORAGE_WRITE_FAILED,
                parent,
                "Failed to create directory",
                err,
            )
        })?;
    }

    tracing::debug!("Writing record {}", path.display());
    tokio::fs::write(path, format!("{value}\n"))
        .await
        .map_err(|err| {
            KaishakuError::io(
                ErrorCode::STORAGE_WRITE_FAILED,
                path,
                "Failed to write record",
                err,
            )
        })
}

/// Remove a file, treating an already missing file as success
pub(crate) async fn remove_file_if_present(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(KaishakuError::io(
            ErrorCode::STORAGE_REMOVE_FAILED,
            path,
            "Failed to remove record",
            err,
        )),
    }
}

/// Check whether a path exists at all
pub async fn path_exists(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok()
}

/// Check whether a path exists and is a directory
pub async fn is_directory(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

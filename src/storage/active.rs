use std::path::{Path, PathBuf};

use super::{read_first_line, remove_file_if_present, write_line};
use crate::error::Result;

/// File holding the active session name, relative to the store root
pub const ACTIVE_FILE: &str = ".active";

/// Names at most one session as active
///
/// This is a weak reference: the named session may have been removed or
/// damaged behind our back, and readers are expected to check.
#[derive(Debug, Clone)]
pub struct ActivePointer {
    path: PathBuf,
}

impl ActivePointer {
    pub fn new(root: &Path) -> Self {
        Self {
            path: root.join(ACTIVE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self) -> Result<Option<String>> {
        read_first_line(&self.path).await
    }

    pub async fn set(&self, name: &str) -> Result<()> {
        tracing::debug!("Setting active session to '{}'", name);
        write_line(&self.path, name).await
    }

    pub async fn clear(&self) -> Result<()> {
        tracing::debug!("Clearing active session");
        remove_file_if_present(&self.path).await
    }

    /// Put the pointer back to a previously observed value
    pub async fn restore(&self, previous: Option<&str>) -> Result<()> {
        match previous {
            Some(name) => self.set(name).await,
            None => self.clear().await,
        }
    }

    pub async fn is_active(&self, name: &str) -> Result<bool> {
        Ok(self.get().await?.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_set_get_clear() {
        let dir = TempDir::new().unwrap();
        let pointer = ActivePointer::new(&dir.path().join("kaishaku"));

        assert_eq!(pointer.get().await.unwrap(), None);

        pointer.set("exp1").await.unwrap();
        assert_eq!(pointer.get().await.unwrap(), Some("exp1".to_string()));
        assert!(pointer.is_active("exp1").await.unwrap());
        assert!(!pointer.is_active("exp2").await.unwrap());

        pointer.set("exp2").await.unwrap();
        assert_eq!(pointer.get().await.unwrap(), Some("exp2".to_string()));

        pointer.clear().await.unwrap();
        pointer.clear().await.unwrap();
        assert_eq!(pointer.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_restore_previous_value() {
        let dir = TempDir::new().unwrap();
        let pointer = ActivePointer::new(dir.path());

        pointer.set("new").await.unwrap();
        pointer.restore(Some("old")).await.unwrap();
        assert_eq!(pointer.get().await.unwrap(), Some("old".to_string()));

        pointer.restore(None).await.unwrap();
        assert!(!pointer.path().exists());
    }
}

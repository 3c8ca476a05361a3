use std::sync::Arc;

use super::{format_value, parse_stored_value, ConfigKey, ToolConfig};
use crate::error::{ErrorCode, KaishakuError, Result};
use crate::subprocess::GitRunner;

/// Reads and writes [`ToolConfig`] through `git config`
pub struct ConfigStore {
    git: Arc<dyn GitRunner>,
}

impl ConfigStore {
    pub fn new(git: Arc<dyn GitRunner>) -> Self {
        Self { git }
    }

    /// Load all settings, writing defaults back for unset keys
    ///
    /// Writing defaults is best effort. A value that cannot be read or parsed
    /// falls back to the default with a warning.
    pub async fn load(&self) -> ToolConfig {
        let mut config = ToolConfig::default();

        for key in ConfigKey::ALL {
            let git_key = key.git_key();
            match self.git.config_get(&git_key).await {
                Ok(Some(raw)) => match parse_stored_value(&raw) {
                    Some(value) => config.set(key, value),
                    None => {
                        tracing::warn!(
                            "Ignoring unparseable value '{}' for {}, using default",
                            raw,
                            git_key
                        );
                    }
                },
                Ok(None) => {
                    let default = format_value(key.default_value());
                    if let Err(err) = self.git.config_set(&git_key, default).await {
                        tracing::debug!("Could not persist default for {}: {}", git_key, err);
                    }
                }
                Err(err) => {
                    tracing::warn!("Could not read {}: {}, using default", git_key, err);
                }
            }
        }

        tracing::debug!("Loaded configuration: {:?}", config);
        config
    }

    /// Persist one setting immediately
    pub async fn set(&self, key: ConfigKey, value: bool) -> Result<()> {
        let git_key = key.git_key();
        self.git
            .config_set(&git_key, format_value(value))
            .await
            .map_err(|err| {
                KaishakuError::from(err)
                    .with_context(format!("Failed to save configuration key '{key}'"))
                    .with_code(ErrorCode::CONFIG_GENERIC)
            })
    }
}

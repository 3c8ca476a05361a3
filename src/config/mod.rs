//! Tool settings kept in the repository's local git config
//!
//! Three switches live under the `kaishaku.` prefix. They are loaded once per
//! invocation into a [`ToolConfig`] value that is handed to the lifecycle.

pub mod store;

pub use store::ConfigStore;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{ErrorCode, KaishakuError};
use crate::git::CONFIG_NAMESPACE;

/// Settings that shape how sessions are exited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolConfig {
    /// Ask before discarding uncommitted changes on exit
    pub confirm_exit: bool,
    /// Stash uncommitted changes on exit instead of discarding them
    pub auto_stash: bool,
    /// Commit uncommitted changes on exit
    pub auto_save: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            confirm_exit: true,
            auto_stash: false,
            auto_save: false,
        }
    }
}

impl ToolConfig {
    pub fn get(&self, key: ConfigKey) -> bool {
        match key {
            ConfigKey::ConfirmExit => self.confirm_exit,
            ConfigKey::AutoStash => self.auto_stash,
            ConfigKey::AutoSave => self.auto_save,
        }
    }

    pub fn set(&mut self, key: ConfigKey, value: bool) {
        match key {
            ConfigKey::ConfirmExit => self.confirm_exit = value,
            ConfigKey::AutoStash => self.auto_stash = value,
            ConfigKey::AutoSave => self.auto_save = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ConfirmExit,
    AutoStash,
    AutoSave,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 3] = [
        ConfigKey::ConfirmExit,
        ConfigKey::AutoStash,
        ConfigKey::AutoSave,
    ];

    /// Key as typed on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::ConfirmExit => "confirm.exit",
            ConfigKey::AutoStash => "auto.stash",
            ConfigKey::AutoSave => "auto.save",
        }
    }

    /// Fully qualified git config key
    pub fn git_key(self) -> String {
        format!("{CONFIG_NAMESPACE}.{}", self.as_str())
    }

    pub fn default_value(self) -> bool {
        ToolConfig::default().get(self)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = KaishakuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| {
                KaishakuError::usage_with_code(
                    ErrorCode::USAGE_UNKNOWN_CONFIG_KEY,
                    format!(
                        "Unknown config key '{s}'. Valid keys: confirm.exit, auto.stash, auto.save"
                    ),
                )
            })
    }
}

/// Parse a value given on the command line
pub fn parse_cli_value(value: &str) -> Result<bool, KaishakuError> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(KaishakuError::usage_with_code(
            ErrorCode::USAGE_INVALID_CONFIG_VALUE,
            format!("Invalid value '{other}'. Use 0, 1, true or false"),
        )),
    }
}

/// Parse a value read back from git config
///
/// Integers count as set when non-zero; `true`/`false` spelled in any case
/// are accepted too. Anything else is unparseable.
pub fn parse_stored_value(value: &str) -> Option<bool> {
    let trimmed = value.trim();
    if let Ok(number) = trimmed.parse::<i64>() {
        return Some(number != 0);
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// How a stored boolean is written to git config
pub fn format_value(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

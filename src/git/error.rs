//! Git operation error types

use crate::error::{ErrorCode, KaishakuError};
use crate::subprocess::ProcessError;
use thiserror::Error;

/// Failure reported by the git gateway
///
/// The gateway does not interpret why git failed; callers only learn which
/// command was run and how it exited.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Command failed with status {exit_code}: {command}")]
    Failed { command: String, exit_code: i32 },

    #[error("Failed to execute command: {command}")]
    Spawn {
        command: String,
        #[source]
        source: ProcessError,
    },
}

impl GitError {
    /// The command line that failed
    pub fn command(&self) -> &str {
        match self {
            GitError::Failed { command, .. } | GitError::Spawn { command, .. } => command,
        }
    }

    /// Exit status of the failed command, if it ran at all
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            GitError::Failed { exit_code, .. } => Some(*exit_code),
            GitError::Spawn { .. } => None,
        }
    }

    /// Check whether git ran and exited with the given status
    pub fn exited_with(&self, code: i32) -> bool {
        self.exit_code() == Some(code)
    }
}

/// Convert GitError to KaishakuError
impl From<GitError> for KaishakuError {
    fn from(err: GitError) -> Self {
        let code = match &err {
            GitError::Failed { .. } => ErrorCode::EXEC_COMMAND_FAILED,
            GitError::Spawn { .. } => ErrorCode::EXEC_SPAWN_FAILED,
        };

        KaishakuError::ExternalTool {
            code,
            message: err.to_string(),
            command: err.command().to_string(),
            exit_code: err.exit_code(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_message_names_command_and_status() {
        let err = GitError::Failed {
            command: "git checkout main".to_string(),
            exit_code: 1,
        };
        assert_eq!(
            err.to_string(),
            "Command failed with status 1: git checkout main"
        );
        assert!(err.exited_with(1));
    }

    #[test]
    fn test_conversion_to_external_tool_error() {
        let err: KaishakuError = GitError::Failed {
            command: "git merge tmp".to_string(),
            exit_code: 1,
        }
        .into();

        match err {
            KaishakuError::ExternalTool {
                code,
                command,
                exit_code,
                ..
            } => {
                assert_eq!(code, ErrorCode::EXEC_COMMAND_FAILED);
                assert_eq!(command, "git merge tmp");
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("Expected ExternalTool error, got {other:?}"),
        }
    }

    #[test]
    fn test_spawn_error_has_no_exit_code() {
        let err = GitError::Spawn {
            command: "git status".to_string(),
            source: ProcessError::CommandNotFound("git".to_string()),
        };
        assert_eq!(err.exit_code(), None);
        assert_eq!(err.command(), "git status");
    }
}

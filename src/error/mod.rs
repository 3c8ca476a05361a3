use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// The unified error type for kaishaku
///
/// Low-level components (record store, git gateway) produce these values but
/// never print or exit; the lifecycle operations decide what is fatal and the
/// binary maps every error that reaches it to exit status 1.
#[derive(Error, Debug)]
pub enum KaishakuError {
    #[error("[E{code:04}] Usage error: {message}")]
    Usage { code: u16, message: String },

    #[error("[E{code:04}] {message}")]
    State {
        code: u16,
        message: String,
        session: Option<String>,
    },

    #[error("[E{code:04}] Session '{session}' is corrupted: {message}")]
    Corruption {
        code: u16,
        message: String,
        session: String,
    },

    #[error("[E{code:04}] {message}")]
    ExternalTool {
        code: u16,
        message: String,
        command: String,
        exit_code: Option<i32>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Storage error at {}: {message}", path.display())]
    Io {
        code: u16,
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[E{code:04}] Configuration error: {message}")]
    Config { code: u16, message: String },
}

impl KaishakuError {
    /// Create a usage error with default code
    pub fn usage(message: impl Into<String>) -> Self {
        Self::usage_with_code(ErrorCode::USAGE_GENERIC, message)
    }

    /// Create a usage error with specific code
    pub fn usage_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Usage {
            code,
            message: message.into(),
        }
    }

    /// Create a state error with specific code and session name
    pub fn state_with_code(code: u16, message: impl Into<String>, session: Option<&str>) -> Self {
        Self::State {
            code,
            message: message.into(),
            session: session.map(str::to_string),
        }
    }

    pub fn no_active_session() -> Self {
        Self::state_with_code(
            ErrorCode::STATE_NO_ACTIVE_SESSION,
            "No active kaishaku session.",
            None,
        )
    }

    pub fn no_sessions() -> Self {
        Self::state_with_code(
            ErrorCode::STATE_NO_SESSIONS,
            "No kaishaku sessions exist.",
            None,
        )
    }

    pub fn session_not_found(name: &str) -> Self {
        Self::state_with_code(
            ErrorCode::STATE_SESSION_NOT_FOUND,
            format!("Session '{name}' not found."),
            Some(name),
        )
    }

    pub fn session_exists(name: &str) -> Self {
        Self::state_with_code(
            ErrorCode::STATE_SESSION_EXISTS,
            format!("Session '{name}' already exists."),
            Some(name),
        )
    }

    pub fn session_active(name: &str, message: impl Into<String>) -> Self {
        Self::state_with_code(ErrorCode::STATE_SESSION_ACTIVE, message, Some(name))
    }

    /// Create a corruption error for a session
    pub fn corruption(code: u16, session: &str, message: impl Into<String>) -> Self {
        Self::Corruption {
            code,
            message: message.into(),
            session: session.to_string(),
        }
    }

    /// Create a storage error for a failed filesystem operation
    pub fn io(
        code: u16,
        path: impl AsRef<Path>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            code,
            message: message.into(),
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
        }
    }

    /// Prefix the error message with additional context
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Usage { message, .. }
            | Self::State { message, .. }
            | Self::Corruption { message, .. }
            | Self::ExternalTool { message, .. }
            | Self::Io { message, .. }
            | Self::Config { message, .. } => {
                *message = format!("{context}: {message}");
            }
        }
        self
    }

    /// Replace the error code, keeping everything else
    pub fn with_code(mut self, new_code: u16) -> Self {
        match &mut self {
            Self::Usage { code, .. }
            | Self::State { code, .. }
            | Self::Corruption { code, .. }
            | Self::ExternalTool { code, .. }
            | Self::Io { code, .. }
            | Self::Config { code, .. } => *code = new_code,
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Usage { code, .. }
            | Self::State { code, .. }
            | Self::Corruption { code, .. }
            | Self::ExternalTool { code, .. }
            | Self::Io { code, .. }
            | Self::Config { code, .. } => *code,
        }
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        1
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Usage { message, .. } => format!("Error: {message}"),
            Self::State { message, .. } => format!("Error: {message}"),
            Self::Corruption {
                code,
                message,
                session,
            } if matches!(
                *code,
                ErrorCode::CORRUPTION_UNRECOVERABLE | ErrorCode::CORRUPTION_DANGLING_ACTIVE
            ) =>
            {
                format!(
                    "Error: Session '{session}' is corrupted: {message}\n\
                     Use 'kaishaku abort {session}' to discard it."
                )
            }
            Self::Corruption {
                message, session, ..
            } => format!(
                "Error: Session '{session}' is corrupted: {message}\n\
                 Use 'kaishaku recover {session}' to repair it or 'kaishaku abort {session}' to discard it."
            ),
            Self::ExternalTool { message, .. } => format!("Error: {message}"),
            Self::Io { message, path, .. } => {
                format!("Error: {message} ({})", path.display())
            }
            Self::Config { message, .. } => format!("Error: {message}"),
        }
    }

    /// Get a developer-friendly error message with full chain
    pub fn developer_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(&format!("\n  caused by: {cause}"));
            source = cause.source();
        }
        message
    }
}

/// Type alias for Results using KaishakuError
pub type Result<T> = std::result::Result<T, KaishakuError>;

/// Error code registry for kaishaku
///
/// Error codes are organized by category:
/// - 1000-1999: Usage errors
/// - 2000-2999: Session state errors
/// - 3000-3999: Session corruption errors
/// - 4000-4999: External tool (git) errors
/// - 5000-5999: Record storage errors
/// - 6000-6999: Configuration errors
#[allow(dead_code)]
pub struct ErrorCode;

impl ErrorCode {
    // Usage errors (1000-1999)
    pub const USAGE_GENERIC: u16 = 1000;
    pub const USAGE_INVALID_SESSION_NAME: u16 = 1001;
    pub const USAGE_UNKNOWN_CONFIG_KEY: u16 = 1002;
    pub const USAGE_INVALID_CONFIG_VALUE: u16 = 1003;
    pub const USAGE_INVALID_BRANCH_NAME: u16 = 1004;

    // Session state errors (2000-2999)
    pub const STATE_GENERIC: u16 = 2000;
    pub const STATE_NO_ACTIVE_SESSION: u16 = 2001;
    pub const STATE_SESSION_NOT_FOUND: u16 = 2002;
    pub const STATE_SESSION_EXISTS: u16 = 2003;
    pub const STATE_SESSION_ACTIVE: u16 = 2004;
    pub const STATE_NO_SESSIONS: u16 = 2005;
    pub const STATE_DETACHED_HEAD: u16 = 2006;
    pub const STATE_BRANCH_EXISTS: u16 = 2007;
    pub const STATE_REF_MISSING: u16 = 2008;

    // Session corruption errors (3000-3999)
    pub const CORRUPTION_GENERIC: u16 = 3000;
    pub const CORRUPTION_MISSING_ORIGINAL_REF: u16 = 3001;
    pub const CORRUPTION_MISSING_HEAD_REF: u16 = 3002;
    pub const CORRUPTION_MISSING_RECORDS: u16 = 3003;
    pub const CORRUPTION_DANGLING_ACTIVE: u16 = 3004;
    pub const CORRUPTION_UNRECOVERABLE: u16 = 3005;

    // External tool errors (4000-4999)
    pub const EXEC_GENERIC: u16 = 4000;
    pub const EXEC_COMMAND_FAILED: u16 = 4001;
    pub const EXEC_SPAWN_FAILED: u16 = 4002;
    pub const EXEC_MERGE_FAILED: u16 = 4003;

    // Record storage errors (5000-5999)
    pub const STORAGE_GENERIC: u16 = 5000;
    pub const STORAGE_READ_FAILED: u16 = 5001;
    pub const STORAGE_WRITE_FAILED: u16 = 5002;
    pub const STORAGE_REMOVE_FAILED: u16 = 5003;
    pub const STORAGE_RENAME_FAILED: u16 = 5004;
    pub const STORAGE_NOT_A_DIRECTORY: u16 = 5005;
    pub const STORAGE_PROMPT_FAILED: u16 = 5006;

    // Configuration errors (6000-6999)
    pub const CONFIG_GENERIC: u16 = 6000;
    pub const CONFIG_PATH_TOO_LONG: u16 = 6001;
    pub const CONFIG_NOT_A_REPOSITORY: u16 = 6002;
}

/// Get a human-readable description of an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        // Usage errors
        1000 => "Invalid command usage",
        1001 => "Invalid session name",
        1002 => "Unknown configuration key",
        1003 => "Invalid configuration value",
        1004 => "Invalid branch name",

        // Session state errors
        2000 => "Generic session state error",
        2001 => "No active session",
        2002 => "Session not found",
        2003 => "Session already exists",
        2004 => "Session is active",
        2005 => "No sessions exist",
        2006 => "HEAD is detached",
        2007 => "Branch already exists",
        2008 => "Referenced branch or commit no longer exists",

        // Session corruption errors
        3000 => "Session is corrupted",
        3001 => "Session is missing its original branch record",
        3002 => "Session is missing its HEAD record",
        3003 => "Session is missing required records",
        3004 => "Active session pointer names a missing session",
        3005 => "Session is too damaged to recover",

        // External tool errors
        4000 => "Generic git error",
        4001 => "Git command failed",
        4002 => "Failed to spawn git",
        4003 => "Git merge failed",

        // Record storage errors
        5000 => "Generic storage error",
        5001 => "Failed to read session record",
        5002 => "Failed to write session record",
        5003 => "Failed to remove session record",
        5004 => "Failed to rename session",
        5005 => "Session store path is not a directory",
        5006 => "Failed to read confirmation input",

        // Configuration errors
        6000 => "Generic configuration error",
        6001 => "Session store path is too long",
        6002 => "Not inside a git repository",

        _ => "Unknown error code",
    }
}

//! Application module
//!
//! Process-level setup shared by every command:
//! - Configuration handling
//! - Logging setup
//! - Wiring the session context
//! - Fatal error reporting

pub mod config;
pub mod error_handling;
pub mod logging;
pub mod runtime;

pub use config::AppConfig;
pub use error_handling::handle_fatal_error;
pub use logging::init_logging;
pub use runtime::{initialize_app, SessionContext};

//! Error handling utilities
//!
//! Every error that reaches the binary ends the process with a message on
//! stderr and a non-zero status.

use tracing::error;

use crate::error::{describe_error_code, KaishakuError};

/// Render a fatal error and pick the exit status
///
/// `KaishakuError` values show their user message, a usage hint for usage
/// errors, and the error code plus full cause chain in verbose mode.
/// Anything else falls back to its display form.
pub fn render_fatal_error(error: &anyhow::Error, verbose: u8) -> (String, i32) {
    if let Some(err) = error.downcast_ref::<KaishakuError>() {
        let mut message = err.user_message();
        if err.is_usage() {
            message.push_str("\nRun 'kaishaku --help' for usage.");
        }
        if verbose >= 1 {
            message.push_str(&format!(
                "\n\nError code E{:04}: {}",
                err.code(),
                describe_error_code(err.code())
            ));
            message.push_str("\n\nContext Chain:\n");
            message.push_str(&err.developer_message());
        }
        return (message, err.exit_code());
    }

    let mut message = format!("Error: {error}");
    if verbose >= 1 {
        message.push_str("\n\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            message.push_str(&format!("\n  {i}: {cause}"));
        }
    }
    (message, 1)
}

/// Handle fatal errors and exit with appropriate status code
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    let (message, exit_code) = render_fatal_error(&error, verbose);
    eprintln!("{message}");

    std::process::exit(exit_code)
}

//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes. Rate limiting gets its own exit code so
//! wrapper scripts can back off and re-run instead of treating it as a
//! hard failure.

use skybrief::error::BriefError;
use std::fmt;
use std::process;

/// Exit code for upstream rate limiting.
const EXIT_RATE_LIMITED: i32 = 2;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Bad command-line input (credentials, coordinates, codes)
    Usage(String),
    /// Error from the briefing pipeline
    Brief(BriefError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Brief(BriefError::RateLimited) => {
                eprintln!();
                eprintln!("The advisory API rejected requests with HTTP 429.");
                eprintln!("Wait a little and re-run; no partial briefing was produced.");
                process::exit(EXIT_RATE_LIMITED)
            }
            _ => process::exit(1),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Brief(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Brief(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BriefError> for CliError {
    fn from(err: BriefError) -> Self {
        CliError::Brief(err)
    }
}

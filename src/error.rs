//! Error types for the p4clean CLI.
//!
//! Uses thiserror for derive macros. Only run-level failures live here;
//! per-file deletion failures are collected as messages and never abort a run.

use crate::exit_codes;
use thiserror::Error;

/// Run-level error for p4clean.
#[derive(Error, Debug)]
pub enum P4CleanError {
    /// Perforce cannot be used here: `p4` missing, server unreachable,
    /// client unknown, or the target is not mapped into the client.
    #[error("Perforce is unavailable: {0}")]
    Unavailable(String),

    /// The user asked for something that cannot be done.
    #[error("{0}")]
    UserError(String),

    /// Local filesystem failure while preparing the run.
    #[error("I/O error: {0}")]
    Io(String),
}

impl P4CleanError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// An unavailable workspace is reported but is not a failure from the
    /// shell's point of view: nothing was deleted and nothing broke.
    pub fn exit_code(&self) -> i32 {
        match self {
            P4CleanError::Unavailable(_) => exit_codes::SUCCESS,
            P4CleanError::UserError(_) => exit_codes::USER_ERROR,
            P4CleanError::Io(_) => exit_codes::IO_FAILURE,
        }
    }
}

/// Result type alias for p4clean operations.
pub type Result<T> = std::result::Result<T, P4CleanError>;

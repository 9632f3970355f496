//! Exit code constants for the p4clean CLI.
//!
//! - 0: Success (including "no workspace here", which is a no-op)
//! - 1: User error (bad target path, invalid exclusion pattern)
//! - 2: Local I/O failure outside the per-item deletion loop

/// Successful execution, or a run skipped because no workspace was found.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or an unusable target directory.
pub const USER_ERROR: i32 = 1;

/// I/O failure while preparing the run (e.g. the target cannot be read).
pub const IO_FAILURE: i32 = 2;

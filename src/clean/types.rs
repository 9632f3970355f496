//! Data types for a clean run.

use crate::paths::CaseSensitivity;
use std::path::PathBuf;

/// Options fixed for the duration of one run.
#[derive(Debug, Clone, Copy)]
pub struct CleanOptions {
    /// Report only; never touch the filesystem.
    pub dry_run: bool,
    /// How local and tracked paths are compared.
    pub case: CaseSensitivity,
}

/// Result of one deletion pass (files or folders).
#[derive(Debug, Default)]
pub struct CleanupOutcome {
    /// Paths deleted, or that would be deleted under dry run.
    pub removed: Vec<PathBuf>,
    /// One message per item that could not be deleted, with the cause.
    pub errors: Vec<String>,
}

impl CleanupOutcome {
    pub fn count(&self) -> usize {
        self.removed.len()
    }
}

/// Everything a run did, for the final summary.
#[derive(Debug, Default)]
pub struct CleanSummary {
    pub files: CleanupOutcome,
    pub folders: CleanupOutcome,
    pub dry_run: bool,
}

impl CleanSummary {
    pub fn failure_count(&self) -> usize {
        self.files.errors.len() + self.folders.errors.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &String> {
        self.files.errors.iter().chain(self.folders.errors.iter())
    }
}

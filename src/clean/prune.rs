//! Removing empty directories, deepest first.

use super::types::CleanupOutcome;
use crate::exclude::ExclusionMatcher;
use crate::report::Reporter;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What happened to a directory the pruner tried to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveDirStatus {
    Removed,
    /// Something appeared in it after it was seen empty.
    NotEmpty,
}

/// Removes empty directories below a root in one post-order pass.
pub struct Pruner<'a> {
    exclude: &'a ExclusionMatcher,
    dry_run: bool,
    /// Paths to treat as already deleted; lets a dry run see the directories
    /// a real run would leave empty.
    gone: HashSet<PathBuf>,
}

impl<'a> Pruner<'a> {
    pub fn new(exclude: &'a ExclusionMatcher, dry_run: bool) -> Self {
        Self {
            exclude,
            dry_run,
            gone: HashSet::new(),
        }
    }

    /// Treat `paths` as already removed when judging emptiness.
    pub fn assume_gone<I: IntoIterator<Item = PathBuf>>(mut self, paths: I) -> Self {
        self.gone.extend(paths);
        self
    }

    /// Remove every empty, non-excluded directory strictly below `root`.
    ///
    /// Children are visited before their parent, so a parent emptied by the
    /// removal of its last child is removed in the same pass. `root` itself is
    /// never removed.
    pub fn prune(&mut self, root: &Path, reporter: &mut Reporter) -> CleanupOutcome {
        let mut outcome = CleanupOutcome::default();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .min_depth(1)
            .contents_first(true);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            if self.exclude.is_excluded_path(path) {
                log::debug!("excluded folder: {}", path.display());
                continue;
            }

            match self.is_empty(path) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    log::warn!("cannot list {}: {}", path.display(), e);
                    continue;
                }
            }

            self.remove(path, &mut outcome, reporter);
        }

        outcome
    }

    fn is_empty(&self, dir: &Path) -> io::Result<bool> {
        for entry in fs::read_dir(dir)? {
            if !self.gone.contains(&entry?.path()) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn remove(&mut self, path: &Path, outcome: &mut CleanupOutcome, reporter: &mut Reporter) {
        if self.dry_run {
            reporter.item(&format!("Would delete folder: '{}'", path.display()));
            self.gone.insert(path.to_path_buf());
            outcome.removed.push(path.to_path_buf());
            return;
        }

        match remove_empty_dir(path) {
            Ok(RemoveDirStatus::Removed) => {
                reporter.item(&format!("Deleted folder: '{}'", path.display()));
                outcome.removed.push(path.to_path_buf());
            }
            Ok(RemoveDirStatus::NotEmpty) => {
                log::debug!("folder no longer empty, skipped: {}", path.display());
            }
            Err(e) => outcome
                .errors
                .push(format!("Cannot delete folder '{}': {}", path.display(), e)),
        }
    }
}

/// Remove a directory expected to be empty.
///
/// A directory that turns out not to be empty is left alone and reported as
/// `NotEmpty` rather than as an error.
pub fn remove_empty_dir(path: &Path) -> io::Result<RemoveDirStatus> {
    match fs::remove_dir(path) {
        Ok(()) => Ok(RemoveDirStatus::Removed),
        Err(e) if e.kind() == io::ErrorKind::DirectoryNotEmpty => Ok(RemoveDirStatus::NotEmpty),
        Err(e) => Err(e),
    }
}

//! Untracked file resolution: local files minus tracked files.

use crate::paths::{CaseSensitivity, PathKey};
use crate::walk::{LocalFile, LocalFileSet};
use std::collections::HashSet;
use std::path::PathBuf;

/// Absolute paths the server knows for this workspace: synced files plus
/// files opened for add.
#[derive(Debug, Clone, Default)]
pub struct TrackedFileSet {
    paths: Vec<PathBuf>,
}

impl TrackedFileSet {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }

    fn keys(&self, case: CaseSensitivity) -> HashSet<PathKey> {
        self.paths.iter().map(|p| PathKey::new(p, case)).collect()
    }
}

impl FromIterator<PathBuf> for TrackedFileSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

/// Local files that are not tracked, compared under `case`.
///
/// Both sides are keyed with `PathKey`, so separators, dot segments and (when
/// insensitive) letter case do not cause spurious differences. The result
/// keeps each file's on-disk path and kind. Order is unspecified.
pub fn resolve(local: &LocalFileSet, tracked: &TrackedFileSet, case: CaseSensitivity) -> Vec<LocalFile> {
    let tracked = tracked.keys(case);
    let mut seen = HashSet::new();

    local
        .iter()
        .filter(|file| {
            let key = PathKey::new(&file.path, case);
            !tracked.contains(&key) && seen.insert(key)
        })
        .cloned()
        .collect()
}

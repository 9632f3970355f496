//! Local file enumeration.
//!
//! Symlinks are reported as entries of their own and are never followed:
//! a link to a directory does not pull the target tree into the listing,
//! and a link to a tracked file is still listed under its own path.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a walked entry is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    RegularFile,
    Symlink,
}

/// A file found under the target directory, with its on-disk casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalFile {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Every regular file and symlink under `root`.
pub type LocalFileSet = Vec<LocalFile>;

/// Recursively list regular files and symlinks below `root`.
///
/// Unreadable directories are logged and skipped; the rest of the tree is
/// still listed.
pub fn walk(root: &Path) -> LocalFileSet {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            files.push(LocalFile::new(entry.into_path(), EntryKind::Symlink));
        } else if file_type.is_file() {
            files.push(LocalFile::new(entry.into_path(), EntryKind::RegularFile));
        }
    }

    log::debug!("walked {} local files under {}", files.len(), root.display());
    files
}

//! Deleting untracked files.

use super::types::CleanupOutcome;
use crate::exclude::ExclusionMatcher;
use crate::report::Reporter;
use crate::walk::{EntryKind, LocalFile};
use std::fs;
use std::io;
use std::path::Path;

/// Delete every file in `files` that `exclude` does not match.
///
/// On Windows a failed removal of a regular file is retried once after
/// clearing its read-only flag. Files that still cannot be removed are recorded in `errors`; the batch always
/// runs to the end. Symlinks are removed as links and their targets are
/// never touched.
pub fn delete_files(
    files: &[LocalFile],
    exclude: &ExclusionMatcher,
    dry_run: bool,
    reporter: &mut Reporter,
) -> CleanupOutcome {
    let mut outcome = CleanupOutcome::default();

    for file in files {
        if exclude.is_excluded_path(&file.path) {
            log::debug!("excluded: {}", file.path.display());
            continue;
        }

        if dry_run {
            reporter.item(&format!("Would delete file: '{}'", file.path.display()));
            outcome.removed.push(file.path.clone());
            continue;
        }

        // The read-only flag only blocks deletion on Windows.
        match remove_with_retry(file, cfg!(windows), remove_entry) {
            Ok(()) => {
                reporter.item(&format!("Deleted file: '{}'", file.path.display()));
                outcome.removed.push(file.path.clone());
            }
            Err(e) => outcome
                .errors
                .push(format!("Cannot delete file '{}': {}", file.path.display(), e)),
        }
    }

    outcome
}

/// Remove `file`, retrying once after clearing the read-only flag when
/// `writable_retry` is set.
///
/// The retry only applies to regular files. When clearing the flag fails the
/// original error is returned.
fn remove_with_retry<F>(file: &LocalFile, writable_retry: bool, mut remove: F) -> io::Result<()>
where
    F: FnMut(&LocalFile) -> io::Result<()>,
{
    let first = match remove(file) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    if !writable_retry || file.kind != EntryKind::RegularFile {
        return Err(first);
    }

    log::debug!(
        "first delete of {} failed ({}); retrying writable",
        file.path.display(),
        first
    );
    if make_writable(&file.path).is_err() {
        return Err(first);
    }
    remove(file)
}

fn remove_entry(file: &LocalFile) -> io::Result<()> {
    match file.kind {
        EntryKind::RegularFile => fs::remove_file(&file.path),
        EntryKind::Symlink => remove_symlink(&file.path),
    }
}

/// Remove a link without following it.
///
/// On Windows a link to a directory is itself a directory entry and has to
/// go through `remove_dir`, which also does not follow it.
fn remove_symlink(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if cfg!(windows) => fs::remove_dir(path).map_err(|_| e),
        Err(e) => Err(e),
    }
}

fn make_writable(path: &Path) -> io::Result<()> {
    let mut perms = fs::symlink_metadata(path)?.permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    fs::set_permissions(path, perms)
}

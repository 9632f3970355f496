//! The p4clean run.
//!
//! Restores a directory inside a Perforce client to what the server knows:
//! - Files neither synced nor opened for add are deleted
//! - Folders that end up empty (or already were) are removed, deepest first
//!
//! # Safety
//!
//! - Nothing is deleted unless the server answered both tracked-file queries
//! - The target directory itself is never removed
//! - Exclusion globs protect matching files and folders, and the `.p4clean`
//!   file is always protected
//! - `--dry-run` reports the same counts without touching anything

mod delete;
mod display;
mod prune;
mod types;

#[cfg(test)]
mod tests;

use crate::cli::Cli;
use crate::config;
use crate::error::{P4CleanError, Result};
use crate::exclude::ExclusionMatcher;
use crate::paths::CaseSensitivity;
use crate::perforce::{P4Runner, P4TrackedFileLister, TrackedFileLister, Workspace};
use crate::report::Reporter;
use crate::resolve::resolve;
use crate::walk::walk;
use std::path::{Path, PathBuf};

use delete::delete_files;
use display::print_summary;
use prune::Pruner;
use types::{CleanOptions, CleanSummary};

/// Execute `p4clean` for the parsed command line.
///
/// Establishes the workspace, builds the exclusion matcher from `--exclude`
/// and the nearest `.p4clean`, cleans the target tree and prints the summary.
pub fn cmd_clean(cli: &Cli, runner: &dyn P4Runner, reporter: &mut Reporter) -> Result<()> {
    let case = CaseSensitivity::platform();
    let target = resolve_target(cli.path.as_deref())?;

    let workspace = Workspace::establish(runner, &target, case)?;

    let discovery = config::discover(&target, &workspace.root, case);
    if let (Some(path), Some(err)) = (&discovery.path, &discovery.error) {
        reporter.warn(&format!("{} ({})", err, path.display()));
    }

    // CLI globs first, then the config file's; the matcher treats them as a union.
    let mut patterns = cli.exclude_patterns();
    patterns.extend(discovery.exclude);
    let exclude = ExclusionMatcher::with_config_file(patterns, case)?;

    let lister = P4TrackedFileLister::new(runner, &workspace);
    let options = CleanOptions {
        dry_run: cli.dry_run,
        case,
    };
    let summary = clean_tree(&target, &lister, &exclude, options, reporter)?;

    print_summary(&summary, reporter);
    Ok(())
}

/// Delete untracked files under `root`, then prune empty folders.
///
/// The tracked listing is fetched before anything is touched; if it fails the
/// tree is left exactly as it was.
pub fn clean_tree(
    root: &Path,
    lister: &dyn TrackedFileLister,
    exclude: &ExclusionMatcher,
    options: CleanOptions,
    reporter: &mut Reporter,
) -> Result<CleanSummary> {
    let tracked = lister.list_tracked(root)?;
    if tracked.is_empty() {
        log::debug!("server tracks no files under {}", root.display());
    }
    let local = walk(root);
    let untracked = resolve(&local, &tracked, options.case);
    log::debug!(
        "{} local files, {} tracked, {} untracked",
        local.len(),
        tracked.len(),
        untracked.len()
    );

    let files = delete_files(&untracked, exclude, options.dry_run, reporter);

    let mut pruner = Pruner::new(exclude, options.dry_run);
    if options.dry_run {
        pruner = pruner.assume_gone(files.removed.iter().cloned());
    }
    let folders = pruner.prune(root, reporter);

    Ok(CleanSummary {
        files,
        folders,
        dry_run: options.dry_run,
    })
}

/// The directory to clean: `path` if given, else the current directory.
fn resolve_target(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().map_err(|e| {
            P4CleanError::Io(format!("failed to get current working directory: {}", e))
        })?,
    };

    if !path.is_dir() {
        return Err(P4CleanError::UserError(format!(
            "'{}' is not a directory",
            path.display()
        )));
    }

    dunce::canonicalize(&path)
        .map_err(|e| P4CleanError::Io(format!("failed to resolve '{}': {}", path.display(), e)))
}

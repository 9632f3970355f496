//! End-to-end tests for a clean run.

use super::types::{CleanOptions, CleanSummary};
use super::{clean_tree, cmd_clean, resolve_target};
use crate::cli::Cli;
use crate::error::{P4CleanError, Result};
use crate::exclude::ExclusionMatcher;
use crate::paths::CaseSensitivity;
use crate::perforce::TrackedFileLister;
use crate::report::{Reporter, Verbosity};
use crate::resolve::TrackedFileSet;
use crate::test_support::{DirGuard, FakeP4, SharedBuffer, write_file};
use clap::Parser;
use serial_test::serial;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CASE: CaseSensitivity = CaseSensitivity::Sensitive;

/// Lister returning a fixed set of paths.
struct StaticLister(Vec<PathBuf>);

impl TrackedFileLister for StaticLister {
    fn list_tracked(&self, _root: &Path) -> Result<TrackedFileSet> {
        Ok(self.0.iter().cloned().collect())
    }
}

struct UnavailableLister;

impl TrackedFileLister for UnavailableLister {
    fn list_tracked(&self, _root: &Path) -> Result<TrackedFileSet> {
        Err(P4CleanError::Unavailable("Connect to server failed".to_string()))
    }
}

fn quiet() -> Reporter {
    Reporter::with_writers(Verbosity::Quiet, Box::new(io::sink()), Box::new(io::sink()))
}

fn run(root: &Path, tracked: Vec<PathBuf>, patterns: &[&str], dry_run: bool) -> CleanSummary {
    let patterns = patterns.iter().map(|p| p.to_string()).collect();
    let exclude = ExclusionMatcher::with_config_file(patterns, CASE).unwrap();
    let options = CleanOptions { dry_run, case: CASE };
    clean_tree(root, &StaticLister(tracked), &exclude, options, &mut quiet()).unwrap()
}

fn canonical_temp() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();
    (temp, root)
}

#[test]
fn test_full_run_deletes_untracked_and_prunes() {
    let (_temp, root) = canonical_temp();
    write_file(&root, "folderA/temp.txt");
    fs::create_dir_all(root.join("folderB")).unwrap();
    fs::create_dir_all(root.join("folderC/folderCC")).unwrap();

    let summary = run(&root, Vec::new(), &[], false);

    assert_eq!(summary.files.count(), 1);
    assert_eq!(summary.folders.count(), 4);
    assert_eq!(summary.failure_count(), 0);
    assert!(!root.join("folderA").exists());
    assert!(!root.join("folderB").exists());
    assert!(!root.join("folderC").exists());
    assert!(root.exists());
}

#[test]
fn test_tracked_files_survive() {
    let (_temp, root) = canonical_temp();
    let kept = write_file(&root, "src/main.c");
    let added = write_file(&root, "src/new.c");
    let junk = write_file(&root, "src/main.o");

    let summary = run(&root, vec![kept.clone(), added.clone()], &[], false);

    assert_eq!(summary.files.count(), 1);
    assert!(kept.exists());
    assert!(added.exists());
    assert!(!junk.exists());
    assert_eq!(summary.folders.count(), 0);
}

#[test]
fn test_exclusions_protect_files_and_their_folders() {
    let (_temp, root) = canonical_temp();
    let log = write_file(&root, "logs/run.log");
    let tmp = write_file(&root, "tmp/scratch.txt");

    let summary = run(&root, Vec::new(), &["*.log"], false);

    assert!(log.exists());
    assert!(!tmp.exists());
    assert!(!root.join("tmp").exists());
    assert_eq!(summary.files.count(), 1);
    assert_eq!(summary.folders.count(), 1);
}

#[test]
fn test_config_file_is_never_deleted() {
    let (_temp, root) = canonical_temp();
    let config = root.join(".p4clean");
    fs::write(&config, "[p4clean]\nexclude = *.keep\n").unwrap();
    let nested = write_file(&root, "sub/.p4clean");

    let summary = run(&root, Vec::new(), &[], false);

    assert!(config.exists());
    assert!(nested.exists());
    assert_eq!(summary.files.count(), 0);
}

#[test]
fn test_dry_run_changes_nothing_but_reports_everything() {
    let (_temp, root) = canonical_temp();
    let file = write_file(&root, "folderA/temp.txt");
    fs::create_dir_all(root.join("folderC/folderCC")).unwrap();

    let summary = run(&root, Vec::new(), &[], true);

    assert!(summary.dry_run);
    assert_eq!(summary.files.count(), 1);
    assert_eq!(summary.folders.count(), 3);
    assert!(file.exists());
    assert!(root.join("folderC/folderCC").exists());
}

#[test]
fn test_unavailable_listing_deletes_nothing() {
    let (_temp, root) = canonical_temp();
    let file = write_file(&root, "untracked.txt");
    fs::create_dir_all(root.join("empty")).unwrap();
    let exclude = ExclusionMatcher::with_config_file(Vec::new(), CASE).unwrap();
    let options = CleanOptions {
        dry_run: false,
        case: CASE,
    };

    let err = clean_tree(&root, &UnavailableLister, &exclude, options, &mut quiet()).unwrap_err();

    assert!(matches!(err, P4CleanError::Unavailable(_)));
    assert!(file.exists());
    assert!(root.join("empty").exists());
}

#[test]
fn test_case_variant_of_tracked_file() {
    let (_temp, root) = canonical_temp();
    let lower = write_file(&root, "test.log");
    let upper = root.join("TEST.log");
    // On a case-insensitive filesystem this is the same file as `lower`.
    let distinct = fs::write(&upper, "x").is_ok() && fs::read_dir(&root).unwrap().count() == 2;

    let summary = run(&root, vec![lower.clone()], &[], false);

    assert!(lower.exists());
    if distinct {
        assert_eq!(summary.files.count(), 1);
        assert!(!upper.exists());
    } else {
        assert_eq!(summary.files.count(), 0);
    }
}

#[cfg(unix)]
#[test]
fn test_symlink_to_tracked_file_is_removed_alone() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, root) = canonical_temp();
    let target = write_file(&root, "target.txt");
    fs::set_permissions(&target, fs::Permissions::from_mode(0o444)).unwrap();
    fs::create_dir(root.join("folder")).unwrap();
    let link = root.join("folder/link.txt");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let summary = run(&root, vec![target.clone()], &[], false);

    assert_eq!(summary.files.count(), 1);
    assert!(fs::symlink_metadata(&link).is_err());
    assert!(target.exists());
    assert_eq!(
        fs::metadata(&target).unwrap().permissions().mode() & 0o777,
        0o444
    );
}

fn info_for(root: &Path) -> String {
    format!(
        "Client name: dev\nClient root: {}\nServer version: P4D/LINUX26X86_64/2016.1/1 (2016/01/01)\n",
        root.display()
    )
}

#[test]
fn test_cmd_clean_with_p4_and_config_file() {
    let (_temp, root) = canonical_temp();
    let tracked = write_file(&root, "src/tracked.c");
    let added = write_file(&root, "src/added.c");
    let cli_excluded = write_file(&root, "src/editor.swp");
    let config_excluded = write_file(&root, "bin/tool.exe");
    let junk = write_file(&root, "src/junk.o");
    fs::write(root.join(".p4clean"), "[p4clean]\nexclude = *.exe\n").unwrap();

    let p4 = FakeP4::new()
        .respond("info", &info_for(&root))
        .respond("where", "")
        .respond(
            "fstat -Rh",
            &format!("... clientFile {}\n", tracked.display()),
        )
        .respond(
            "fstat -Ro",
            &format!("... clientFile {}\n", added.display()),
        );

    let target = root.to_string_lossy().into_owned();
    let cli = Cli::try_parse_from(["p4clean", "--exclude", "*.swp", target.as_str()]).unwrap();
    let out = SharedBuffer::default();
    let mut reporter = Reporter::with_writers(
        Verbosity::Normal,
        Box::new(out.clone()),
        Box::new(io::sink()),
    );

    cmd_clean(&cli, &p4, &mut reporter).unwrap();

    assert!(tracked.exists());
    assert!(added.exists());
    assert!(cli_excluded.exists());
    assert!(config_excluded.exists());
    assert!(!junk.exists());
    assert!(root.join(".p4clean").exists());

    let text = out.contents();
    assert!(text.contains("1 untracked files deleted."));
    assert!(text.contains("0 empty folders deleted."));
}

#[test]
fn test_cmd_clean_warns_on_broken_config() {
    let (_temp, root) = canonical_temp();
    let junk = write_file(&root, "junk.o");
    fs::write(root.join(".p4clean"), "[wrong]\nexclude = *.o\n").unwrap();

    let p4 = FakeP4::new()
        .respond("info", &info_for(&root))
        .respond("where", "")
        .respond("fstat", "");

    let target = root.to_string_lossy().into_owned();
    let cli = Cli::try_parse_from(["p4clean", target.as_str()]).unwrap();
    let err_out = SharedBuffer::default();
    let mut reporter =
        Reporter::with_writers(Verbosity::Quiet, Box::new(io::sink()), Box::new(err_out.clone()));

    cmd_clean(&cli, &p4, &mut reporter).unwrap();

    assert!(!junk.exists());
    assert!(err_out.contents().contains("no section named \"p4clean\""));
}

#[test]
fn test_cmd_clean_warns_on_invalid_config_glob_and_continues() {
    let (_temp, root) = canonical_temp();
    let junk = write_file(&root, "junk.o");
    let kept = write_file(&root, "keep.swp");
    fs::write(root.join(".p4clean"), "[p4clean]\nexclude = [z-a]*\n").unwrap();

    let p4 = FakeP4::new()
        .respond("info", &info_for(&root))
        .respond("where", "")
        .respond("fstat", "");

    let target = root.to_string_lossy().into_owned();
    let cli = Cli::try_parse_from(["p4clean", "-e", "*.swp", target.as_str()]).unwrap();
    let err_out = SharedBuffer::default();
    let mut reporter =
        Reporter::with_writers(Verbosity::Quiet, Box::new(io::sink()), Box::new(err_out.clone()));

    cmd_clean(&cli, &p4, &mut reporter).unwrap();

    assert!(!junk.exists());
    assert!(kept.exists());
    assert!(root.join(".p4clean").exists());
    let warning = err_out.contents();
    assert!(warning.contains("Warning:"));
    assert!(warning.contains("[z-a]*"));
}

#[test]
fn test_cmd_clean_rejects_invalid_cli_glob() {
    let (_temp, root) = canonical_temp();
    let file = write_file(&root, "untracked.txt");

    let p4 = FakeP4::new()
        .respond("info", &info_for(&root))
        .respond("where", "")
        .respond("fstat", "");

    let target = root.to_string_lossy().into_owned();
    let cli = Cli::try_parse_from(["p4clean", "-e", "[z-a]*", target.as_str()]).unwrap();

    let err = cmd_clean(&cli, &p4, &mut quiet()).unwrap_err();

    assert!(matches!(err, P4CleanError::UserError(_)));
    assert!(file.exists());
}

#[test]
fn test_cmd_clean_unavailable_server_touches_nothing() {
    let (_temp, root) = canonical_temp();
    let file = write_file(&root, "untracked.txt");

    let target = root.to_string_lossy().into_owned();
    let cli = Cli::try_parse_from(["p4clean", target.as_str()]).unwrap();

    let err = cmd_clean(&cli, &FakeP4::new(), &mut quiet()).unwrap_err();

    assert!(matches!(err, P4CleanError::Unavailable(_)));
    assert_eq!(err.exit_code(), crate::exit_codes::SUCCESS);
    assert!(file.exists());
}

#[test]
fn test_resolve_target_rejects_missing_directory() {
    let (_temp, root) = canonical_temp();
    let err = resolve_target(Some(&root.join("nope"))).unwrap_err();
    assert!(matches!(err, P4CleanError::UserError(_)));
}

#[test]
#[serial]
fn test_resolve_target_defaults_to_current_directory() {
    let (_temp, root) = canonical_temp();
    let _guard = DirGuard::new(&root);

    assert_eq!(resolve_target(None).unwrap(), root);
}

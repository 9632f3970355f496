//! CLI argument parsing for p4clean.
//!
//! Uses clap derive macros for declarative argument definitions.
//! The actual run lives in the `clean` module.

use crate::report::Verbosity;
use clap::Parser;
use std::path::PathBuf;

/// Delete local files that the Perforce server does not track, then remove
/// the folders left empty.
///
/// Files synced at the current revision and files opened for add are kept.
/// Exclusion globs come from `--exclude` and from the nearest `.p4clean`
/// file between the target directory and the client root.
#[derive(Parser, Debug)]
#[command(name = "p4clean")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to clean (defaults to the current directory).
    pub path: Option<PathBuf>,

    /// Semicolon separated exclusion globs (e.g. "*.txt;*/.vs*").
    #[arg(short, long, value_name = "GLOBS")]
    pub exclude: Option<String>,

    /// Report what would be deleted without touching the filesystem.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Only print the summary and failures.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print diagnostic logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Output verbosity selected by `--quiet` / `--verbose`.
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// The `--exclude` value split into individual globs.
    pub fn exclude_patterns(&self) -> Vec<String> {
        self.exclude
            .as_deref()
            .map(split_pattern_list)
            .unwrap_or_default()
    }
}

/// Split a semicolon separated glob list, dropping blank entries.
///
/// A blank glob would compile to a pattern matching every path, so it is
/// never passed through.
pub fn split_pattern_list(list: &str) -> Vec<String> {
    list.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

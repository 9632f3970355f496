//! Console reporting for a p4clean run.
//!
//! A `Reporter` is built once in `main` from the CLI flags and handed to the
//! components that print. Diagnostics go through `log`; this is only for the
//! lines a user is meant to read.

use std::io::{self, Write};

/// How much per-item output to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Summary and failures only.
    Quiet,
    /// One line per deleted item, plus the summary.
    Normal,
    /// Normal output; diagnostic logging is raised separately.
    Verbose,
}

/// Writes user-facing output, gated by verbosity.
pub struct Reporter {
    verbosity: Verbosity,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl Reporter {
    /// Reporter writing to stdout and stderr.
    pub fn stdio(verbosity: Verbosity) -> Self {
        Self::with_writers(verbosity, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Reporter writing to arbitrary sinks.
    pub fn with_writers(verbosity: Verbosity, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            verbosity,
            out,
            err,
        }
    }

    /// Per-item line, suppressed under `--quiet`.
    pub fn item(&mut self, line: &str) {
        if self.verbosity >= Verbosity::Normal {
            let _ = writeln!(self.out, "{}", line);
        }
    }

    /// Always printed.
    pub fn line(&mut self, line: &str) {
        let _ = writeln!(self.out, "{}", line);
    }

    /// Non-fatal problem; always printed to the error stream.
    pub fn warn(&mut self, line: &str) {
        let _ = writeln!(self.err, "Warning: {}", line);
    }
}

//! Perforce command runner for p4clean.
//!
//! All `p4` invocations go through a `P4Runner`, so the rest of the crate
//! never spawns processes itself and tests can substitute canned output.
//! Any failed invocation is reported as `Unavailable`: there is no partial
//! or degraded mode.

mod lister;
pub mod parser;
mod workspace;

pub use lister::{P4TrackedFileLister, ServerTier, TrackedFileLister};
pub use workspace::Workspace;

use crate::error::{P4CleanError, Result};
use std::path::Path;
use std::process::{Command, Output};

/// Captured output of a successful `p4` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct P4Output {
    pub stdout: String,
    pub stderr: String,
}

impl P4Output {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Something that can run `p4` subcommands.
pub trait P4Runner {
    /// Run `p4 <args>` with `cwd` as the working directory.
    ///
    /// Returns `Unavailable` when the process cannot be started or exits
    /// with a failure status.
    fn run(&self, cwd: &Path, args: &[&str]) -> Result<P4Output>;
}

/// Runs the `p4` executable found on `PATH`.
#[derive(Debug, Clone)]
pub struct SystemP4 {
    program: String,
}

impl Default for SystemP4 {
    fn default() -> Self {
        Self {
            program: "p4".to_string(),
        }
    }
}

impl P4Runner for SystemP4 {
    fn run(&self, cwd: &Path, args: &[&str]) -> Result<P4Output> {
        log::debug!("running {} {} in {}", self.program, args.join(" "), cwd.display());

        // p4 prefers $PWD over the process working directory when resolving
        // relative paths and P4CONFIG, so keep them in agreement.
        let output = Command::new(&self.program)
            .current_dir(cwd)
            .env("PWD", cwd)
            .args(args)
            .output()
            .map_err(|e| {
                P4CleanError::Unavailable(format!(
                    "failed to execute {} {}: {} (is the Perforce client installed?)",
                    self.program,
                    args.first().unwrap_or(&""),
                    e
                ))
            })?;

        let p4_output = P4Output::from_output(&output);

        if output.status.success() || parser::is_empty_result(&p4_output) {
            Ok(p4_output)
        } else {
            let message = if p4_output.stderr.trim().is_empty() {
                p4_output.stdout.trim()
            } else {
                p4_output.stderr.trim()
            };
            Err(P4CleanError::Unavailable(format!(
                "p4 {} failed (exit code {}): {}",
                args.first().unwrap_or(&""),
                output.status.code().unwrap_or(-1),
                message
            )))
        }
    }
}

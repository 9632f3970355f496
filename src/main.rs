//! p4clean: restore a Perforce client directory to what the server tracks.
//!
//! This is the main entry point for the `p4clean` CLI. It parses arguments,
//! sets up logging and console output, runs the clean, and maps errors to
//! exit codes.

mod clean;
mod cli;
pub mod config;
pub mod error;
pub mod exclude;
pub mod exit_codes;
pub mod paths;
pub mod perforce;
pub mod report;
pub mod resolve;
pub mod walk;

#[cfg(test)]
mod test_support;

use cli::Cli;
use error::P4CleanError;
use perforce::SystemP4;
use report::{Reporter, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbosity());

    let mut reporter = Reporter::stdio(cli.verbosity());

    match clean::cmd_clean(&cli, &SystemP4::default(), &mut reporter) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            match &err {
                // Not a failure: there is simply nothing we may touch here.
                P4CleanError::Unavailable(_) => eprintln!("{}", err),
                _ => eprintln!("Error: {}", err),
            }
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

/// Diagnostics default to warnings only; `--verbose` raises them to debug.
/// `RUST_LOG` overrides both.
fn init_logging(verbosity: Verbosity) {
    let default_filter = match verbosity {
        Verbosity::Verbose => "debug",
        Verbosity::Normal | Verbosity::Quiet => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

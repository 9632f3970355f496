//! Establishing the Perforce client workspace for a target directory.

use super::P4Runner;
use super::lister::ServerTier;
use super::parser::parse_info;
use crate::error::{P4CleanError, Result};
use crate::paths::{CaseSensitivity, is_within};
use std::path::{Path, PathBuf};

/// The client workspace a run operates in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Canonical client root; nothing above it is searched or touched.
    pub root: PathBuf,
    /// Client root exactly as `p4 info` printed it.
    pub reported_root: PathBuf,
    /// Query strategy chosen from the server version.
    pub tier: ServerTier,
}

impl Workspace {
    /// Probe the server once and resolve the workspace containing `target`.
    ///
    /// Fails with `Unavailable` when p4 cannot be run, the client is unknown,
    /// `target` is outside the client root, or p4 does not map `target`.
    pub fn establish(runner: &dyn P4Runner, target: &Path, case: CaseSensitivity) -> Result<Self> {
        let info = parse_info(&runner.run(target, &["info"])?.stdout);

        if info.client_unknown {
            return Err(P4CleanError::Unavailable(
                "client unknown; set P4CLIENT or run from inside a client workspace".to_string(),
            ));
        }
        let reported_root = info.client_root.map(PathBuf::from).ok_or_else(|| {
            P4CleanError::Unavailable("p4 info did not report a client root".to_string())
        })?;
        let root = dunce::canonicalize(&reported_root).unwrap_or_else(|_| reported_root.clone());

        if !is_within(target, &root, case) {
            return Err(P4CleanError::Unavailable(format!(
                "'{}' is not inside the client root '{}'",
                target.display(),
                root.display()
            )));
        }

        // Fails when the directory is outside the client view.
        runner.run(target, &["where"])?;

        let tier = ServerTier::from_server_year(info.server_year);
        log::debug!(
            "workspace root {} (server year {:?}, {:?} queries)",
            root.display(),
            info.server_year,
            tier
        );

        Ok(Self {
            root,
            reported_root,
            tier,
        })
    }

    /// Map a path under the reported client root onto the canonical root.
    ///
    /// p4 prints paths under the root as configured in the client spec,
    /// which may go through a symlink the local walk has already resolved.
    pub fn rebase(&self, path: &Path) -> PathBuf {
        if self.root == self.reported_root {
            return path.to_path_buf();
        }
        match path.strip_prefix(&self.reported_root) {
            Ok(rest) => self.root.join(rest),
            Err(_) => path.to_path_buf(),
        }
    }
}

//! Tracked-file listing strategies, one per server capability tier.

use super::parser::{parse_fstat_client_files, parse_have};
use super::{P4Runner, Workspace};
use crate::error::Result;
use crate::resolve::TrackedFileSet;
use std::path::Path;

/// First server release year whose `fstat` supports the `-Rh` filter we rely on.
pub const STRUCTURED_MIN_YEAR: u32 = 2012;

/// Which queries a server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerTier {
    /// `fstat -Rh` lists synced files directly.
    Structured,
    /// Older or unidentified servers: synced files come from `have`.
    Legacy,
}

impl ServerTier {
    pub fn from_server_year(year: Option<u32>) -> Self {
        match year {
            Some(year) if year >= STRUCTURED_MIN_YEAR => ServerTier::Structured,
            _ => ServerTier::Legacy,
        }
    }
}

/// Source of the server's known files under a directory.
pub trait TrackedFileLister {
    /// Files synced at the current revision plus files opened for add,
    /// below `root`. Any failure is `Unavailable`.
    fn list_tracked(&self, root: &Path) -> Result<TrackedFileSet>;
}

/// Lists tracked files by running p4 queries suited to the workspace's tier.
pub struct P4TrackedFileLister<'a> {
    runner: &'a dyn P4Runner,
    workspace: &'a Workspace,
}

impl<'a> P4TrackedFileLister<'a> {
    pub fn new(runner: &'a dyn P4Runner, workspace: &'a Workspace) -> Self {
        Self { runner, workspace }
    }
}

impl TrackedFileLister for P4TrackedFileLister<'_> {
    fn list_tracked(&self, root: &Path) -> Result<TrackedFileSet> {
        let spec = root.join("...");
        let spec = spec.to_string_lossy();

        let synced = match self.workspace.tier {
            ServerTier::Structured => {
                let out = self
                    .runner
                    .run(root, &["fstat", "-Rh", "-T", "clientFile", &spec])?;
                parse_fstat_client_files(&out.stdout)
            }
            ServerTier::Legacy => {
                let out = self.runner.run(root, &["have", &spec])?;
                parse_have(&out.stdout)
            }
        };

        // Files opened for add are not synced yet but must survive.
        let opened = self
            .runner
            .run(root, &["fstat", "-Ro", "-T", "clientFile", &spec])?;
        let opened = parse_fstat_client_files(&opened.stdout);

        log::debug!(
            "server reports {} synced and {} opened files under {}",
            synced.len(),
            opened.len(),
            root.display()
        );

        Ok(synced
            .into_iter()
            .chain(opened)
            .map(|path| self.workspace.rebase(&path))
            .collect())
    }
}

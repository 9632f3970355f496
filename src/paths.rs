//! Path normalization for set membership.
//!
//! Local walk results and server-reported paths are compared through
//! `PathKey`, which is built the same way for both sides: lexically
//! normalized, one separator style, and case-folded when the platform's
//! filesystem ignores case.

use std::path::{Component, Path, PathBuf};

/// Whether path comparison distinguishes letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    /// Case rule of the default filesystem on this platform.
    pub fn platform() -> Self {
        if cfg!(any(windows, target_os = "macos")) {
            CaseSensitivity::Insensitive
        } else {
            CaseSensitivity::Sensitive
        }
    }
}

/// Comparison key for a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey(String);

impl PathKey {
    pub fn new(path: &Path, case: CaseSensitivity) -> Self {
        let text = flatten(&lexical_normalize(path));
        match case {
            CaseSensitivity::Sensitive => PathKey(text),
            CaseSensitivity::Insensitive => PathKey(text.to_lowercase()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                if at_root && path.is_absolute() {
                    continue;
                }
                if at_root || out.ends_with("..") {
                    out.push("..");
                } else {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Render a path as a single string with `/` separators.
///
/// Backslash is only a separator on Windows; elsewhere it is a legal
/// filename character and is left alone.
pub fn flatten(path: &Path) -> String {
    let text = path.to_string_lossy();
    let text = if cfg!(windows) {
        text.replace('\\', "/")
    } else {
        text.into_owned()
    };
    if text.len() > 1 && text.ends_with('/') {
        text.trim_end_matches('/').to_string()
    } else {
        text
    }
}

/// True when `path` is `dir` or lies underneath it.
pub fn is_within(path: &Path, dir: &Path, case: CaseSensitivity) -> bool {
    let path = PathKey::new(path, case);
    let dir = PathKey::new(dir, case);
    let (path, dir) = (path.as_str(), dir.as_str());
    if path == dir {
        return true;
    }
    let prefix = if dir.ends_with('/') {
        dir.to_string()
    } else {
        format!("{}/", dir)
    };
    path.starts_with(&prefix)
}

//! Locating and loading the `.p4clean` file.

use super::model::{CleanConfig, ConfigError};
use crate::exclude::CONFIG_FILENAME;
use crate::paths::{CaseSensitivity, PathKey};
use std::path::{Path, PathBuf};

/// Outcome of looking for and reading a `.p4clean` file.
#[derive(Debug, Default)]
pub struct ConfigDiscovery {
    /// The file that was found, if any.
    pub path: Option<PathBuf>,
    /// Globs it contributed (empty when missing or broken).
    pub exclude: Vec<String>,
    /// Why a found file contributed nothing.
    pub error: Option<ConfigError>,
}

impl CleanConfig {
    /// Load settings from a `.p4clean` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&content)
    }
}

/// Find the nearest `.p4clean`, searching from `start` up to `boundary`.
///
/// Both paths are canonicalized first. The search checks `start`, then each
/// parent, and stops after checking the directory equal to `boundary` or the
/// filesystem root, whichever comes first.
pub fn find_config_file(start: &Path, boundary: &Path, case: CaseSensitivity) -> Option<PathBuf> {
    let start = dunce::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
    let boundary = dunce::canonicalize(boundary).unwrap_or_else(|_| boundary.to_path_buf());
    let boundary_key = PathKey::new(&boundary, case);

    for dir in start.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            log::debug!("using config file {}", candidate.display());
            return Some(candidate);
        }
        if PathKey::new(dir, case) == boundary_key {
            break;
        }
    }

    None
}

/// Find and read the `.p4clean` that applies to `start`.
///
/// Never fails: a missing file is an empty contribution, and a broken file is
/// an empty contribution with `error` set.
pub fn discover(start: &Path, boundary: &Path, case: CaseSensitivity) -> ConfigDiscovery {
    let Some(path) = find_config_file(start, boundary, case) else {
        return ConfigDiscovery::default();
    };

    match CleanConfig::load(&path) {
        Ok(config) => ConfigDiscovery {
            path: Some(path),
            exclude: config.exclude,
            error: None,
        },
        Err(e) => ConfigDiscovery {
            path: Some(path),
            exclude: Vec::new(),
            error: Some(e),
        },
    }
}

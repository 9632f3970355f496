//! Exclusion globs compiled into a single path predicate.
//!
//! Globs follow shell semantics over the whole path string: `*` and `?` also
//! match `/`. Each glob is translated by globset, the translations are joined
//! into one alternation, and a path is excluded when some prefix of it
//! matches. A glob naming a directory therefore covers everything under it.

use crate::error::{P4CleanError, Result};
use crate::paths::{CaseSensitivity, flatten};
use globset::GlobBuilder;
use regex::bytes::{Regex, RegexBuilder};
use std::path::Path;

/// Name of the per-tree exclusion file.
pub const CONFIG_FILENAME: &str = ".p4clean";

/// Regex that can never match any input.
const EMPTY_LANGUAGE: &str = "$.";

/// Compiled exclusion predicate.
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    regex: Regex,
}

impl ExclusionMatcher {
    /// Compile `patterns` (in order) into one predicate.
    ///
    /// An empty list yields a matcher that excludes nothing.
    pub fn compile(patterns: &[String], case: CaseSensitivity) -> Result<Self> {
        let source = if patterns.is_empty() {
            EMPTY_LANGUAGE.to_string()
        } else {
            let fragments = patterns
                .iter()
                .map(|p| {
                    glob_fragment(p, case).map_err(|e| {
                        P4CleanError::UserError(format!(
                            "invalid exclusion pattern '{}': {}",
                            p, e
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            fragments
                .iter()
                .map(|f| format!("(?:{})", f))
                .collect::<Vec<_>>()
                .join("|")
        };

        let regex = RegexBuilder::new(&source)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| {
                P4CleanError::UserError(format!(
                    "invalid exclusion pattern list {:?}: {}",
                    patterns, e
                ))
            })?;

        log::debug!("exclusion regex: {}", source);
        Ok(Self { regex })
    }

    /// A matcher built from user globs plus the implicit config-file glob.
    pub fn with_config_file(patterns: Vec<String>, case: CaseSensitivity) -> Result<Self> {
        let mut all = patterns;
        all.push(format!("*/{}", CONFIG_FILENAME));
        Self::compile(&all, case)
    }

    /// Whether the flattened path string is excluded.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.regex.is_match(path.as_bytes())
    }

    /// Whether `path` is excluded, using `/` as the separator on every platform.
    pub fn is_excluded_path(&self, path: &Path) -> bool {
        self.is_excluded(&flatten(path))
    }
}

/// Check that `pattern` is a glob this matcher accepts.
pub fn validate_glob(pattern: &str) -> std::result::Result<(), globset::Error> {
    glob_fragment(pattern, CaseSensitivity::Sensitive).map(|_| ())
}

/// Regex for one glob, anchored at the start only.
///
/// globset anchors both ends; the trailing `$` is dropped.
fn glob_fragment(
    pattern: &str,
    case: CaseSensitivity,
) -> std::result::Result<String, globset::Error> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(false)
        .case_insensitive(case == CaseSensitivity::Insensitive)
        .build()?;
    let regex = glob.regex();
    Ok(regex.strip_suffix('$').unwrap_or(regex).to_string())
}

//! INI document model and the p4clean settings read from it.

use super::{EXCLUDE_KEY, LEGACY_EXCLUDE_KEY, SECTION_NAME};
use crate::cli::split_pattern_list;
use crate::exclude::validate_glob;
use std::collections::BTreeMap;
use thiserror::Error;

/// Why a `.p4clean` file contributed no globs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("invalid p4clean config file: no section named \"{0}\" found")]
    MissingSection(String),

    #[error("invalid p4clean config file: no option named \"{0}\" found")]
    MissingKey(String),

    #[error("invalid p4clean config file: bad exclusion pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Parsed INI file: sections of lowercase keys to raw values.
///
/// Lines that are neither a section header, a `key = value` / `key: value`
/// pair, a comment, nor a continuation are skipped and their line numbers
/// kept in `invalid_lines`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IniDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
    pub invalid_lines: Vec<usize>,
}

impl IniDocument {
    pub fn parse(text: &str) -> Self {
        let mut doc = IniDocument::default();
        let mut section: Option<String> = None;
        let mut last_key: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                last_key = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            // Indented line: continuation of the previous value.
            if raw.starts_with([' ', '\t']) {
                if let (Some(name), Some(key)) = (&section, &last_key) {
                    if let Some(value) = doc
                        .sections
                        .get_mut(name)
                        .and_then(|entries| entries.get_mut(key))
                    {
                        value.push('\n');
                        value.push_str(trimmed);
                        continue;
                    }
                }
            }

            if let Some(name) = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                let name = name.trim().to_string();
                doc.sections.entry(name.clone()).or_default();
                section = Some(name);
                last_key = None;
                continue;
            }

            let split = trimmed.find(['=', ':']);
            match (split, &section) {
                (Some(pos), Some(name)) if pos > 0 => {
                    let key = trimmed[..pos].trim().to_lowercase();
                    let value = trimmed[pos + 1..].trim().to_string();
                    doc.sections
                        .entry(name.clone())
                        .or_default()
                        .insert(key.clone(), value);
                    last_key = Some(key);
                }
                _ => {
                    doc.invalid_lines.push(line_no);
                    last_key = None;
                }
            }
        }

        doc
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Value of `key` (case-insensitive) in `section` (case-sensitive).
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(&key.to_lowercase()))
            .map(String::as_str)
    }
}

/// Settings read from a `.p4clean` file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanConfig {
    /// Exclusion globs, in file order, blanks removed.
    pub exclude: Vec<String>,
}

impl CleanConfig {
    /// Read the exclusion globs out of INI text.
    pub fn from_ini(text: &str) -> Result<Self, ConfigError> {
        let doc = IniDocument::parse(text);
        if !doc.invalid_lines.is_empty() {
            log::warn!(
                "ignoring unparseable lines in config file: {:?}",
                doc.invalid_lines
            );
        }

        if !doc.has_section(SECTION_NAME) {
            return Err(ConfigError::MissingSection(SECTION_NAME.to_string()));
        }

        let value = match doc.get(SECTION_NAME, EXCLUDE_KEY) {
            Some(value) => value,
            None => match doc.get(SECTION_NAME, LEGACY_EXCLUDE_KEY) {
                Some(value) => {
                    log::warn!(
                        "config key \"{}\" is deprecated; use \"{}\"",
                        LEGACY_EXCLUDE_KEY,
                        EXCLUDE_KEY
                    );
                    value
                }
                None => return Err(ConfigError::MissingKey(EXCLUDE_KEY.to_string())),
            },
        };

        // Continuation lines are joined with newlines; treat them as separators too.
        let exclude: Vec<String> = value.lines().flat_map(split_pattern_list).collect();

        for pattern in &exclude {
            validate_glob(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(Self { exclude })
    }
}

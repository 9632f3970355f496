//! Exclusion configuration for p4clean.
//!
//! A `.p4clean` file is an INI-style file with a single recognized section
//! and key:
//!
//! ```text
//! [p4clean]
//! exclude = *.sln;*/.vs;*/build/*
//! ```
//!
//! The nearest such file between the target directory and the client root
//! contributes its globs. A missing file contributes nothing; a broken one
//! contributes nothing and produces a warning.

mod model;
mod operations;


pub use model::{CleanConfig, ConfigError, IniDocument};
pub use operations::{ConfigDiscovery, discover, find_config_file};

/// Section holding p4clean settings.
pub const SECTION_NAME: &str = "p4clean";

/// Key holding the semicolon separated exclusion globs.
pub const EXCLUDE_KEY: &str = "exclude";

/// Older spelling of `EXCLUDE_KEY`, still read when the canonical key is absent.
pub const LEGACY_EXCLUDE_KEY: &str = "exclusion";

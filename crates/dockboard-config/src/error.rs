//! Error types for configuration loading
//!
//! - [`ConfigError`]: reading and parsing a raw document
//! - [`MigrationError`]: fatal failures of the upgrade chain

use std::path::PathBuf;

/// Errors while reading or decoding a configuration document
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    InvalidToml(#[from] toml::de::Error),

    /// Top level of the document is not a key/value mapping
    #[error("configuration must be a mapping, found {found}")]
    NotAMapping { found: &'static str },

    /// Canonical document could not be decoded into typed form
    #[error("cannot decode canonical document: {0}")]
    Decode(String),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Fatal migration failures; the load must abort before validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// Declared version has no registered upgrade step
    #[error("unknown configuration version: {0}")]
    UnknownSchemaVersion(String),

    /// A legacy block lacks one of its mandatory keys
    #[error("key {key:?} must have {missing:?} parameter")]
    MissingRequiredKey {
        key: &'static str,
        missing: &'static str,
    },
}

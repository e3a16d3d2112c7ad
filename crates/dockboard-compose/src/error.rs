//! Error types for compose manifest access

use std::path::PathBuf;

/// Errors from reading or querying compose manifests
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// No service matches the requested name
    #[error("service not found: {0}")]
    ServiceNotFound(String),

    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Syntax error in a manifest
    #[error("invalid compose file {path}: {source}")]
    InvalidYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Manifest set has no usable content
    #[error("compose data is empty, load at least one manifest with services")]
    Empty,

    /// Service has no build section to resolve
    #[error("service {0} is built from an image, it has no build path")]
    NoBuildPath(String),

    /// Path references an environment variable that is not set
    #[error("can't find value for {variable} in {path}")]
    UnresolvedVariable { variable: String, path: String },
}

impl ComposeError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

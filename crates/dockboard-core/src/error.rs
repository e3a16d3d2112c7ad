//! Error types for the configuration pipeline
//!
//! Failures fall into four groups the caller treats differently:
//! - fatal document errors (parse, migration)
//! - aggregated validation issues
//! - environment problems (terminal too small)
//! - collaborator errors (compose manifests)

use dockboard_compose::ComposeError;
use dockboard_config::{ConfigError, MigrationError, ValidationReport};
use dockboard_layout::LayoutError;

/// Main pipeline error type
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Document could not be read or decoded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Upgrade chain aborted
    #[error("migration failed: {0}")]
    Migration(#[from] MigrationError),

    /// One or more validation rules failed
    #[error("invalid configuration:\n{0}")]
    Invalid(ValidationReport),

    /// Terminal cannot fit a generated layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Compose manifests could not be read or queried
    #[error("compose error: {0}")]
    Compose(#[from] ComposeError),
}

impl PipelineError {
    /// Check if the configuration document itself is at fault
    #[inline]
    #[must_use]
    pub fn is_document_defect(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Migration(_) | Self::Invalid(_))
    }

    /// Check if the failure comes from the runtime environment
    #[inline]
    #[must_use]
    pub fn is_environment(&self) -> bool {
        matches!(self, Self::Layout(_))
    }

    /// Validation messages, if this is a validation failure
    #[must_use]
    pub fn validation_messages(&self) -> Vec<String> {
        match self {
            Self::Invalid(report) => report.messages(),
            _ => Vec::new(),
        }
    }
}

impl From<ValidationReport> for PipelineError {
    fn from(report: ValidationReport) -> Self {
        Self::Invalid(report)
    }
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

//! Configuration load pipeline
//!
//! One synchronous pass per configuration load:
//!
//! ```text
//! RawDocument → migrate → validate → ConfigDocument ─┬─ boxes declared ──▶ done
//!                                                    └─ no boxes → plan ──▶ done
//! ```
//!
//! The manual compose override is fixed when the pipeline is built and is
//! applied at every migration step and at validation time.

use std::path::{Path, PathBuf};

use dockboard_compose::{normalize, resolve_path, ComposeAccessor, ComposeDocument, ComposeError};
use dockboard_config::{migrate, ConfigDocument, RawDocument, Validator};
use dockboard_layout::{BoxLayoutPlanner, TerminalProbe};
use tracing::{error, info};

use crate::error::{PipelineError, PipelineResult};

/// A fully prepared dashboard configuration
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Canonical, validated configuration with boxes populated
    pub config: ConfigDocument,
    /// Merged compose manifests the boxes were planned from
    pub compose: ComposeDocument,
}

/// Migrate → validate → plan
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    manual_compose_paths: Vec<PathBuf>,
    planner: BoxLayoutPlanner,
}

impl Pipeline {
    /// Create pipeline; a non-empty list overrides every declared compose path
    #[inline]
    #[must_use]
    pub fn new(manual_compose_paths: impl Into<Vec<PathBuf>>) -> Self {
        Self {
            manual_compose_paths: manual_compose_paths.into(),
            planner: BoxLayoutPlanner::default(),
        }
    }

    /// With a custom layout planner
    #[inline]
    #[must_use]
    pub fn with_planner(mut self, planner: BoxLayoutPlanner) -> Self {
        self.planner = planner;
        self
    }

    /// Manual compose override
    #[inline]
    #[must_use]
    pub fn manual_compose_paths(&self) -> &[PathBuf] {
        &self.manual_compose_paths
    }

    /// Migrate and validate a raw document, then decode it
    ///
    /// Every validation issue is logged before the load is refused.
    ///
    /// # Errors
    /// - [`PipelineError::Migration`] when the upgrade chain aborts
    /// - [`PipelineError::Invalid`] with every rule violation
    pub fn prepare(&self, raw: &RawDocument) -> PipelineResult<ConfigDocument> {
        let canonical = migrate(raw, &self.manual_compose_paths)?;

        let report = Validator::new()
            .with_manual_compose_paths(self.manual_compose_paths.clone())
            .validate(&canonical);
        if !report.is_valid() {
            for issue in report.issues() {
                error!("{issue}");
            }
            return Err(PipelineError::Invalid(report));
        }

        Ok(ConfigDocument::from_raw(&canonical)?)
    }

    /// Populate boxes from the compose services when the author declared none
    ///
    /// Ignored services are left out of generated boxes.
    ///
    /// # Errors
    /// Returns [`PipelineError::Layout`] when the terminal is too small
    pub fn finish(
        &self,
        mut config: ConfigDocument,
        compose: &dyn ComposeAccessor,
        terminal: &dyn TerminalProbe,
    ) -> PipelineResult<ConfigDocument> {
        if !config.boxes.is_empty() {
            return Ok(config);
        }

        let services: Vec<String> = compose
            .services()
            .into_iter()
            .filter(|s| !config.is_ignored(s))
            .collect();
        config.boxes = self.planner.plan(services, terminal.size())?;
        info!(boxes = config.boxes.len(), "generated default box layout");
        Ok(config)
    }

    /// Run the whole pipeline for a configuration file
    ///
    /// Variables in compose paths are expanded and relative paths are
    /// resolved against the configuration's directory.
    ///
    /// # Errors
    /// Any [`PipelineError`]; compose manifests must declare services
    pub fn load(&self, path: &Path, terminal: &dyn TerminalProbe) -> PipelineResult<LoadedConfig> {
        info!(path = %path.display(), "loading configuration");
        let raw = RawDocument::load(path)?;
        let mut config = self.prepare(&raw)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.compose_files = config
            .compose_files
            .iter()
            .map(|p| {
                let resolved = resolve_path(&p.to_string_lossy(), base)?;
                Ok::<_, ComposeError>(if resolved.is_relative() {
                    normalize(&base.join(resolved))
                } else {
                    resolved
                })
            })
            .collect::<Result<_, _>>()?;

        let compose = ComposeDocument::load_all(&config.compose_files)?;
        compose.ensure_valid()?;

        let config = self.finish(config, &compose, terminal)?;
        Ok(LoadedConfig { config, compose })
    }
}

//! Dockboard core
//!
//! Turns a dashboard configuration file of any supported schema version into
//! a canonical, validated document with a box layout ready to render.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dockboard_core::prelude::*;
//!
//! let pipeline = Pipeline::new(Vec::new());
//! let loaded = pipeline.load(Path::new("dockboard.yml"), &CrosstermTerminal)?;
//! for (id, spec) in &loaded.config.boxes {
//!     println!("{id}: {:?}", spec.includes);
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod logging;
pub mod pipeline;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{LoadedConfig, Pipeline};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used types across the dockboard crates
pub mod prelude {
    pub use crate::error::{PipelineError, PipelineResult};
    pub use crate::pipeline::{LoadedConfig, Pipeline};
    pub use dockboard_compose::{ComposeAccessor, ComposeDocument};
    pub use dockboard_config::{
        BoxSpec, ConfigDocument, RawDocument, SchemaVersion, ValidationReport, Validator,
    };
    pub use dockboard_layout::{
        BoxLayoutPlanner, CrosstermTerminal, FixedTerminal, TerminalProbe, TerminalSize,
    };
}

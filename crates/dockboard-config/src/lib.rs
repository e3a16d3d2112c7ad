//! Dockboard configuration
//!
//! Loads a dashboard configuration written against any registered schema
//! version and turns it into the canonical, validated form.
//!
//! # Pipeline
//!
//! ```text
//! RawDocument(vN) → migrate → RawDocument(v2) → Validator → ConfigDocument
//! ```
//!
//! - [`RawDocument`]: untyped, order-preserving document as authored
//! - [`migrate`]: pure upgrade chain driven by [`UPGRADE_STEPS`]
//! - [`Validator`]: collects every rule violation into a [`ValidationReport`]
//! - [`ConfigDocument`]: typed canonical configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use dockboard_config::{migrate, validate, ConfigDocument, RawDocument};
//!
//! let raw = RawDocument::from_yaml(text)?;
//! let canonical = migrate(&raw, &[])?;
//! let report = validate(&canonical);
//! if report.is_valid() {
//!     let config = ConfigDocument::from_raw(&canonical)?;
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod document;
pub mod error;
pub mod literal;
pub mod migration;
pub mod raw;
pub mod validation;

pub use document::{BoxSpec, ConfigDocument, PingWatcher, Watchers};
pub use error::{ConfigError, MigrationError};
pub use literal::{BoxColor, BoxSize, InvalidLiteral, Layout, Literal, PortDetail, PortView};
pub use migration::{migrate, UpgradeStep, UPGRADE_STEPS};
pub use raw::{RawDocument, SchemaVersion};
pub use validation::{validate, ValidationIssue, ValidationReport, Validator};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

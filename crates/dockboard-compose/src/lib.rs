//! Dockboard compose access
//!
//! Read-only view over one or more docker-compose manifests: service names,
//! per-service keys and resolved build contexts.
//!
//! - [`ComposeAccessor`]: the contract the dashboard core consumes
//! - [`ComposeDocument`]: manifests loaded from disk and merged in order
//! - [`resolve_path`]: environment expansion and relative path resolution

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod document;
pub mod error;
pub mod path;

pub use document::{ComposeAccessor, ComposeDocument};
pub use error::ComposeError;
pub use path::{normalize, resolve_path, resolve_path_with};

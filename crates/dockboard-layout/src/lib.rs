//! Dockboard layout
//!
//! Generates the default display boxes when a configuration declares none.
//!
//! - [`BoxLayoutPlanner`]: terminal-height aware partitioning
//! - [`TerminalProbe`]: point-in-time terminal size source

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod planner;
pub mod terminal;

pub use planner::{plan, BoxLayoutPlanner, LayoutError, RESERVED_LINES};
pub use terminal::{CrosstermTerminal, FixedTerminal, TerminalProbe, TerminalSize};

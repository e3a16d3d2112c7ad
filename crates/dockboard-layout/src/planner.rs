//! Default box layout
//!
//! When the author declares no boxes, services are split into boxes that fit
//! the terminal height. Names are sorted first so the layout is deterministic,
//! then boxes are filled greedily; only the last box may be under-full.
//!
//! ```text
//! capacity  = lines - RESERVED_LINES
//! box_count = ceil(services / capacity)
//! ```

use std::collections::BTreeSet;

use dockboard_config::{BoxSize, BoxSpec, PortView};
use indexmap::IndexMap;
use tracing::debug;

use crate::terminal::TerminalSize;

/// Terminal lines taken by dashboard chrome
pub const RESERVED_LINES: u16 = 10;

/// Display name given to every generated box
pub const GENERATED_BOX_NAME: &str = "Docker Services";

/// Up to this many boxes, ports get their own column
pub const COLUMN_VIEW_MAX_BOXES: usize = 4;

/// Up to this many boxes, the revision column is shown
pub const REVISION_MAX_BOXES: usize = 2;

/// Layout planning failures caused by the environment, not the document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Not a single service row fits on screen
    #[error("terminal has {lines} lines, more than {reserved} are needed to show services")]
    TerminalTooSmall { lines: u16, reserved: u16 },
}

/// Partitions services into generated boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxLayoutPlanner {
    reserved_lines: u16,
}

impl Default for BoxLayoutPlanner {
    fn default() -> Self {
        Self {
            reserved_lines: RESERVED_LINES,
        }
    }
}

impl BoxLayoutPlanner {
    /// Create planner with the default chrome reservation
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the number of lines reserved for chrome
    #[inline]
    #[must_use]
    pub fn with_reserved_lines(mut self, lines: u16) -> Self {
        self.reserved_lines = lines;
        self
    }

    /// Services that fit in one box
    ///
    /// # Errors
    /// Returns [`LayoutError::TerminalTooSmall`] when no row is left
    pub fn capacity(&self, size: TerminalSize) -> Result<usize, LayoutError> {
        match size.lines.checked_sub(self.reserved_lines) {
            Some(capacity) if capacity > 0 => Ok(usize::from(capacity)),
            _ => Err(LayoutError::TerminalTooSmall {
                lines: size.lines,
                reserved: self.reserved_lines,
            }),
        }
    }

    /// Generate boxes `box_0 … box_{n-1}` covering every service once
    ///
    /// `box_0` is marked as the main box. Duplicate names collapse.
    ///
    /// # Errors
    /// Returns [`LayoutError::TerminalTooSmall`] when no row is left
    pub fn plan<I, S>(&self, services: I, size: TerminalSize) -> Result<IndexMap<String, BoxSpec>, LayoutError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let capacity = self.capacity(size)?;
        let services: Vec<String> = services
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let box_count = services.len().div_ceil(capacity);
        let port_view = if box_count <= COLUMN_VIEW_MAX_BOXES {
            PortView::Column
        } else {
            PortView::Name
        };
        let show_revision = box_count <= REVISION_MAX_BOXES;

        debug!(
            services = services.len(),
            capacity,
            box_count,
            terminal = %size,
            "planning default box layout"
        );

        let boxes = services
            .chunks(capacity)
            .enumerate()
            .map(|(index, chunk)| {
                let spec = BoxSpec {
                    name: Some(GENERATED_BOX_NAME.to_string()),
                    main: index == 0,
                    size: Some(BoxSize::Small),
                    port_view: Some(port_view),
                    includes: chunk.to_vec(),
                    show_revision,
                    ..BoxSpec::default()
                };
                (format!("box_{index}"), spec)
            })
            .collect();

        Ok(boxes)
    }
}

/// Plan with the default planner
///
/// # Errors
/// Returns [`LayoutError::TerminalTooSmall`] when no row is left
pub fn plan<I, S>(services: I, columns: u16, lines: u16) -> Result<IndexMap<String, BoxSpec>, LayoutError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    BoxLayoutPlanner::new().plan(services, TerminalSize::new(columns, lines))
}

//! Terminal size probing
//!
//! The planner reads the size once; a resize after planning is not observed.

use std::fmt::{self, Display, Formatter};

/// Size used when neither the terminal nor the environment report one
pub const FALLBACK_SIZE: TerminalSize = TerminalSize {
    columns: 80,
    lines: 24,
};

/// Dimensions of the controlling terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalSize {
    pub columns: u16,
    pub lines: u16,
}

impl TerminalSize {
    /// Create a size
    #[inline]
    #[must_use]
    pub const fn new(columns: u16, lines: u16) -> Self {
        Self { columns, lines }
    }
}

impl Display for TerminalSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.lines)
    }
}

/// Source of the current terminal size
pub trait TerminalProbe {
    /// Point-in-time read of the terminal size
    fn size(&self) -> TerminalSize;
}

/// Reads the real terminal through crossterm
///
/// Falls back to the `COLUMNS`/`LINES` environment variables, then to
/// [`FALLBACK_SIZE`], when stdout is not a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermTerminal;

impl TerminalProbe for CrosstermTerminal {
    fn size(&self) -> TerminalSize {
        match crossterm::terminal::size() {
            Ok((columns, lines)) if columns > 0 && lines > 0 => TerminalSize::new(columns, lines),
            Ok(_) => size_from_env(),
            Err(e) => {
                tracing::debug!("could not read terminal size: {}", e);
                size_from_env()
            }
        }
    }
}

fn size_from_env() -> TerminalSize {
    let read = |name: &str| {
        std::env::var(name)
            .ok()
            .and_then(|v| v.trim().parse::<u16>().ok())
            .filter(|v| *v > 0)
    };
    TerminalSize::new(
        read("COLUMNS").unwrap_or(FALLBACK_SIZE.columns),
        read("LINES").unwrap_or(FALLBACK_SIZE.lines),
    )
}

/// Always reports the same size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTerminal(pub TerminalSize);

impl FixedTerminal {
    /// Create a fixed-size probe
    #[inline]
    #[must_use]
    pub const fn new(columns: u16, lines: u16) -> Self {
        Self(TerminalSize::new(columns, lines))
    }
}

impl TerminalProbe for FixedTerminal {
    fn size(&self) -> TerminalSize {
        self.0
    }
}

//! Console styling for user-facing messages.
//!
//! Colors are applied only when stdout is a terminal and `NO_COLOR` is unset.
//! Code that writes into an arbitrary `Write` takes a [`Palette`] so tests can
//! run with [`Palette::plain`].

use std::io::IsTerminal;

use crossterm::style::Stylize;

/// Decides whether message fragments are wrapped in ANSI color codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// A palette that never emits escape codes.
    #[must_use]
    pub const fn plain() -> Self {
        Self { enabled: false }
    }

    /// Detects color support for stdout.
    #[must_use]
    pub fn detect() -> Self {
        if std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal() {
            return Self::plain();
        }
        Self { enabled: true }
    }

    #[must_use]
    pub fn success(self, text: &str) -> String {
        if self.enabled {
            text.green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    #[must_use]
    pub fn info(self, text: &str) -> String {
        if self.enabled {
            text.blue().to_string()
        } else {
            text.to_string()
        }
    }

    #[must_use]
    pub fn warning(self, text: &str) -> String {
        if self.enabled {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    #[must_use]
    pub fn error(self, text: &str) -> String {
        if self.enabled {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Styles a shell command the user is expected to type.
    #[must_use]
    pub fn command(self, text: &str) -> String {
        if self.enabled {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }
}

//! Terminal capability detection and colouring for human-readable output

use std::fmt::Display;

use owo_colors::{OwoColorize, colors::css};

/// Check if terminal is narrow (< 60 columns)
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < 60)
}

/// Applies `style` only when stdout accepts ANSI colours.
fn paint<T: Display>(value: &T, style: impl FnOnce(&T) -> String) -> String {
    if supports_color::on(supports_color::Stream::Stdout).is_some() {
        style(value)
    } else {
        value.to_string()
    }
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Covered (green)
    fn success(&self) -> String;
    /// Uncovered (amber)
    fn warning(&self) -> String;
    /// Secondary text
    fn dim(&self) -> String;
}

impl<T: Display> Colorize for T {
    fn success(&self) -> String {
        paint(self, |value| value.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        paint(self, |value| value.fg::<css::Orange>().to_string())
    }

    fn dim(&self) -> String {
        paint(self, |value| value.dimmed().to_string())
    }
}

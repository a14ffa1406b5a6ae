//! ANSI color codes for table dumps and execution traces.
//!
//! - Blue: type names
//! - Green: numeric values (sizes, offsets, parameter values)
//! - Dim: flag annotations
//! - Reset: return to default

/// ANSI color palette.
///
/// Only standard 16-color codes, so output reads the same on light and dark
/// terminals.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    pub blue: &'static str,
    pub green: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    /// Escape codes enabled.
    pub const ON: Self = Self {
        blue: "\x1b[34m",
        green: "\x1b[32m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    /// Plain text.
    pub const OFF: Self = Self {
        blue: "",
        green: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.blue.is_empty()
    }

    /// Wrap a type name.
    pub fn name(&self, text: &str) -> String {
        format!("{}{}{}", self.blue, text, self.reset)
    }

    /// Wrap a numeric value.
    pub fn value(&self, value: impl std::fmt::Display) -> String {
        format!("{}{}{}", self.green, value, self.reset)
    }

    /// Wrap a flag annotation.
    pub fn note(&self, text: &str) -> String {
        format!("{}{}{}", self.dim, text, self.reset)
    }
}

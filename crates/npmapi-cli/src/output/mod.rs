//! Terminal output formatting and utilities.
//!
//! Results go to stdout so they can be piped; status lines go to stderr.

pub mod colors;
pub mod errors;

use npmapi_core::error::{NpmError, NpmResult};
use serde::Serialize;
use std::io::{self, BufWriter, Write};

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            colors: colors::ColorSupport::detect(),
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        eprintln!("{}", self.colors.dim(message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", self.colors.green("✓"), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.colors.yellow("⚠"), message);
    }

    /// Print a step message with emoji
    pub fn step(&self, emoji: &str, message: &str) {
        eprintln!("{} {}", emoji, message);
    }

    /// Print a value as pretty JSON on stdout
    pub fn json<T: Serialize>(&self, value: &T) -> NpmResult<()> {
        let rendered = serde_json::to_string_pretty(value)
            .map_err(|e| NpmError::decode(format!("Failed to render output: {}", e), e))?;
        self.lines(std::iter::once(rendered))
    }

    /// Print one line per item on stdout
    pub fn lines<I, S>(&self, items: I) -> NpmResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        for item in items {
            writeln!(writer, "{}", item.as_ref()).map_err(|e| NpmError::io("Failed to write output".to_string(), e))?;
        }
        writer
            .flush()
            .map_err(|e| NpmError::io("Failed to write output".to_string(), e))
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}

//! Output formatting for CLI commands.
//!
//! Every renderer writes into a generic `W: Write`, so commands print to a
//! locked stdout or to a file and tests render into a `Vec<u8>`.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, symbols)
//! - [`report`]: Wave execution report, cycle listing and narrative analysis
//! - [`tree`]: Dependency tree rendering with ASCII/Unicode connectors
//! - [`diagram`]: Mermaid and Graphviz DOT diagrams
//! - [`table`]: Markdown dependency table
//! - [`json`]: JSON documents for programmatic output

pub mod color;
pub mod diagram;
pub mod json;
pub mod report;
pub mod table;
pub mod tree;

use crate::loader::LoadWarning;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 80;

/// Configuration for output formatting.
///
/// This struct holds settings that control how output is formatted,
/// including terminal width limits, ASCII fallback mode, and color output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only symbols instead of Unicode and emoji.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `WAVEPLAN_MAX_WIDTH`: Maximum content width (default: 80)
    /// - `WAVEPLAN_ASCII`: Set to "1" or "true" for ASCII-only symbols (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `WAVEPLAN_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        let max_width = match env::var("WAVEPLAN_MAX_WIDTH") {
            Ok(s) if !s.is_empty() => match s.parse() {
                Ok(width) if width > 0 => width,
                _ => {
                    tracing::warn!(
                        env_var = "WAVEPLAN_MAX_WIDTH",
                        value = %s,
                        default = DEFAULT_MAX_CONTENT_WIDTH,
                        "Invalid value, using default"
                    );
                    DEFAULT_MAX_CONTENT_WIDTH
                }
            },
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match env::var("WAVEPLAN_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "WAVEPLAN_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // NO_COLOR (https://no-color.org/) wins over WAVEPLAN_COLOR
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("WAVEPLAN_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Plain variant of this config for output written to files.
    #[must_use]
    pub fn plain(&self) -> Self {
        Self {
            use_colors: false,
            ..self.clone()
        }
    }

    /// Width available for wrapped text: the terminal width capped by
    /// `max_width`.
    pub fn content_width(&self) -> usize {
        get_terminal_width().min(self.max_width).max(20)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Terminal Width Detection
// ============================================================================

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| usize::from(w.0))
        .unwrap_or(usize::from(DEFAULT_TERMINAL_WIDTH))
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value)
}

/// Write a value as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    let output = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(w, "{output}")
}

/// Write load warnings, one per line.
pub fn write_warnings<W: Write>(
    w: &mut W,
    warnings: &[LoadWarning],
    config: &OutputConfig,
) -> io::Result<()> {
    for warning in warnings {
        writeln!(
            w,
            "{} {}",
            color::warning("warning:", config),
            warning.description()
        )?;
    }
    Ok(())
}

/// Print load warnings to stderr.
pub fn print_warnings(warnings: &[LoadWarning], config: &OutputConfig) -> io::Result<()> {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    write_warnings(&mut handle, warnings, config)
}

/// Truncate `text` to `max` characters, marking the cut with `...`.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut short: String = text.chars().take(max).collect();
        short.push_str("...");
        short
    } else {
        text.to_string()
    }
}

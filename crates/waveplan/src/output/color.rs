//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success:        green  (no cycles, all-parallel advice)
//!   - Warning:        yellow (load warnings, stalled waves, advice tips)
//!   - Error:          red    (cycles, cycle members)
//!   - Info/Reference: cyan   (plan ids, tree roots)
//!   - Muted:          dimmed (connectors, durations)
//!   - Emphasis:       bold   (section headers)

use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Apply dimmed style to text.
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Colorize a plan id: cyan, or red when it takes part in a cycle.
pub(crate) fn colorize_id(id: &str, in_cycle: bool, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    if in_cycle {
        id.red().bold().to_string()
    } else {
        id.cyan().to_string()
    }
}

/// Symbols used by the text reports, with ASCII fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Symbols {
    pub bullet: &'static str,
    pub arrow: &'static str,
    pub wave: &'static str,
    pub plans: &'static str,
    pub alert: &'static str,
    pub cycle: &'static str,
    pub clock: &'static str,
    pub chart: &'static str,
    pub tip: &'static str,
    pub check: &'static str,
    pub wave_end: &'static str,
}

impl Symbols {
    const UNICODE: Self = Self {
        bullet: "•",
        arrow: "→",
        wave: "🌊 ",
        plans: "📋 ",
        alert: "⚠️  ",
        cycle: "🔁",
        clock: "⏱️  ",
        chart: "📊 ",
        tip: "💡 ",
        check: "✅ ",
        wave_end: "└─",
    };

    const ASCII: Self = Self {
        bullet: "*",
        arrow: "->",
        wave: "",
        plans: "",
        alert: "!! ",
        cycle: "[cycle]",
        clock: "",
        chart: "",
        tip: "",
        check: "",
        wave_end: "`-",
    };

    /// Symbols for the given configuration.
    pub fn for_config(config: &OutputConfig) -> Self {
        if config.use_ascii {
            Self::ASCII
        } else {
            Self::UNICODE
        }
    }
}

//! CLI value enums and domain type conversions.

use clap::ValueEnum;

use crate::domain::WaveOrder;

/// Ordering of plans inside a wave
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    /// By phase, then sequence number (1-2 before 1-10)
    Numeric,
    /// By canonical id text (1-10 before 1-2)
    Lexical,
}

impl std::fmt::Display for OrderArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&WaveOrder::from(*self), f)
    }
}

impl From<OrderArg> for WaveOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Numeric => WaveOrder::Numeric,
            OrderArg::Lexical => WaveOrder::Lexical,
        }
    }
}

/// Visualisation format for the `graph` command
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Indented dependency tree
    #[default]
    Ascii,
    /// Mermaid flowchart
    Mermaid,
    /// Graphviz DOT
    Dot,
    /// Markdown table
    Table,
}

impl std::fmt::Display for FormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ascii => write!(f, "ascii"),
            Self::Mermaid => write!(f, "mermaid"),
            Self::Dot => write!(f, "dot"),
            Self::Table => write!(f, "table"),
        }
    }
}

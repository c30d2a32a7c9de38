//! Argument structs for each command.

use std::path::PathBuf;

use clap::Args;

use super::types::{FormatArg, OrderArg};
use super::validators::{validate_minutes, validate_phase};

/// Arguments for the waves command
#[derive(Args, Debug, Clone)]
pub struct WavesArgs {
    /// Phase number
    #[arg(value_parser = validate_phase)]
    pub phase: u32,

    /// Ordering of plans inside a wave (overrides the config file)
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Minutes of work assumed per task (overrides the config file)
    #[arg(short, long, value_parser = validate_minutes)]
    pub minutes_per_task: Option<u32>,
}

/// Arguments for the cycles command
#[derive(Args, Debug, Clone)]
pub struct CyclesArgs {
    /// Phase number
    #[arg(value_parser = validate_phase)]
    pub phase: u32,
}

/// Arguments for the graph command
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Phase number
    #[arg(value_parser = validate_phase)]
    pub phase: u32,

    /// Visualisation format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Ascii)]
    pub format: FormatArg,

    /// Write the rendering to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the analyze command
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Phase number
    #[arg(value_parser = validate_phase)]
    pub phase: u32,

    /// Ordering of plans inside a wave (overrides the config file)
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

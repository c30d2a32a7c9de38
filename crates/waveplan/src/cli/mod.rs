//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for waveplan using clap's
//! derive API. Each command has its own argument struct with validation and
//! helpful error messages.
//!
//! # Commands
//!
//! - `waves`: Wave execution report with duration estimates
//! - `cycles`: List circular dependencies
//! - `graph`: Visualise the dependency graph (tree, Mermaid, DOT, table)
//! - `analyze`: Narrative analysis (critical path, bottlenecks)
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--dir`: Project directory holding `.planning/` (default: search upwards
//!   from the current directory)
//!
//! # Example
//!
//! ```bash
//! waveplan waves 1
//! waveplan waves 2 --order lexical --minutes-per-task 15
//! waveplan graph 1 --format mermaid --output deps.md
//! waveplan --json cycles 3
//! ```

mod args;
mod execute;
mod types;
mod validators;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use args::{AnalyzeArgs, CyclesArgs, GraphArgs, WavesArgs};
pub use execute::Outcome;
pub use types::{FormatArg, OrderArg};
pub use validators::{validate_minutes, validate_phase};

/// Waveplan - dependency analysis for GSD plans
///
/// Reads the `{phase}-{plan}-PLAN.*` documents of a phase from `.planning/`,
/// detects circular dependencies and groups plans into waves that can run
/// in parallel.
#[derive(Parser, Debug)]
#[command(name = "waveplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Project directory containing `.planning/`
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the wave execution plan for a phase
    ///
    /// Groups plans into waves whose members can run in parallel, estimates
    /// durations and summarises how much of the phase parallelises.
    Waves(WavesArgs),

    /// List circular dependencies in a phase
    ///
    /// Exits with status 1 when any cycle is found.
    Cycles(CyclesArgs),

    /// Visualise the dependency graph of a phase
    ///
    /// Renders an indented tree, a Mermaid flowchart, a Graphviz DOT graph
    /// or a markdown table.
    Graph(GraphArgs),

    /// Analyse a phase
    ///
    /// Reports the critical path, bottleneck plans, dangling dependencies
    /// and cycles.
    Analyze(AnalyzeArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<Outcome> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let app = match &self.dir {
            Some(dir) => App::open(dir).await?,
            None => App::from_directory(&std::env::current_dir()?).await?,
        };

        match &self.command {
            Commands::Waves(args) => execute::execute_waves(&app, args, output_mode).await,
            Commands::Cycles(args) => execute::execute_cycles(&app, args, output_mode).await,
            Commands::Graph(args) => execute::execute_graph(&app, args, output_mode).await,
            Commands::Analyze(args) => execute::execute_analyze(&app, args, output_mode).await,
        }
    }
}

//! Waveplan CLI binary.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use waveplan::cli::Cli;
use waveplan::output::{OutputConfig, color};

/// Exit status for fatal errors (missing planning directory, I/O, config).
const EXIT_FATAL: u8 = 2;

/// Main entry point for the waveplan CLI.
///
/// Uses tokio's current_thread runtime: the work is a handful of sequential
/// file reads followed by synchronous analysis.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Can be controlled via RUST_LOG environment variable
    // Example: RUST_LOG=waveplan=debug,waveplan_doc=debug waveplan waves 1
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("waveplan=info,waveplan_doc=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting waveplan CLI");

    let cli = Cli::parse_args();
    match cli.execute().await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Waveplan CLI completed");
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            let config = OutputConfig::from_env();
            eprintln!("{} {e:#}", color::error("Error:", &config));
            ExitCode::from(EXIT_FATAL)
        }
    }
}

//! Error types for waveplan operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for waveplan operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The planning directory (or the project containing it) does not exist.
    #[error("Planning directory not found: {}", path.display())]
    NotFound {
        /// The path that was looked for.
        path: PathBuf,
    },

    /// No `.planning` directory was found walking up from the start directory.
    #[error("Not a planning project (no .planning directory above {})", path.display())]
    NotInitialized {
        /// The directory the search started from.
        path: PathBuf,
    },

    /// Plan document error.
    #[error("Plan document error: {0}")]
    Document(#[from] waveplan_doc::Error),
}

/// A specialized Result type for waveplan operations.
pub type Result<T> = std::result::Result<T, Error>;

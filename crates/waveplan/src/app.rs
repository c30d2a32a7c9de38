//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that locates the planning directory,
//! loads configuration and gives commands access to the plan documents.
//!
//! # Example
//!
//! ```no_run
//! use waveplan::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     let loaded = app.load_phase(1).await?;
//!     println!("{} plans", loaded.graph.len());
//!     Ok(())
//! }
//! ```

use crate::config::{CONFIG_FILE_NAME, PLANNING_DIR_NAME, WaveConfig};
use crate::error::{Error, Result};
use crate::loader::{DirectorySource, LoadedPhase, load_phase};
use std::path::{Path, PathBuf};

/// Maximum directory depth to traverse when searching for the planning directory
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Find the nearest ancestor of `start_dir` (itself included) holding a
/// `.planning` directory.
pub fn find_project_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(PLANNING_DIR_NAME).is_dir() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}

/// Application context for CLI operations.
#[derive(Debug)]
pub struct App {
    /// Plan documents of the project
    source: DirectorySource,

    /// Settings from `waveplan.yaml` (or defaults)
    config: WaveConfig,
}

impl App {
    /// Create an App by searching upwards from `working_dir` for a
    /// `.planning/` directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No `.planning` directory is found in the directory tree
    /// - Configuration cannot be loaded
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root = find_project_root(working_dir).ok_or_else(|| Error::NotInitialized {
            path: working_dir.to_path_buf(),
        })?;
        Self::open(&root).await
    }

    /// Create an App for the project at exactly `project_dir`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if `project_dir/.planning` does not exist,
    /// or a configuration error.
    pub async fn open(project_dir: &Path) -> Result<Self> {
        let planning_dir = project_dir.join(PLANNING_DIR_NAME);
        let source = DirectorySource::open(&planning_dir).await?;
        let config = WaveConfig::load(&planning_dir.join(CONFIG_FILE_NAME)).await?;

        tracing::debug!(dir = %planning_dir.display(), ?config, "Opened planning directory");

        Ok(Self { source, config })
    }

    /// Load the plans of `phase`.
    pub async fn load_phase(&self, phase: u32) -> Result<LoadedPhase> {
        load_phase(&self.source, phase).await
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    /// Get the path to the planning directory.
    pub fn planning_dir(&self) -> &Path {
        self.source.root()
    }
}

//! Configuration for waveplan.
//!
//! Settings are read from an optional `waveplan.yaml` inside the planning
//! directory. Every key is optional; a missing file means defaults.
//!
//! ```yaml
//! minutes-per-task: 15
//! wave-order: lexical
//! bottleneck-limit: 3
//! ```

use crate::analysis::{AnalysisOptions, DEFAULT_BOTTLENECK_LIMIT};
use crate::domain::{DEFAULT_MINUTES_PER_TASK, WaveOrder};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Name of the planning directory
pub const PLANNING_DIR_NAME: &str = ".planning";

/// Name of the configuration file inside the planning directory
pub const CONFIG_FILE_NAME: &str = "waveplan.yaml";

/// Analysis settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct WaveConfig {
    /// Minutes of work assumed per task
    pub minutes_per_task: u32,

    /// Ordering of plans inside a wave
    pub wave_order: WaveOrder,

    /// Number of bottlenecks listed in reports
    pub bottleneck_limit: usize,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            minutes_per_task: DEFAULT_MINUTES_PER_TASK,
            wave_order: WaveOrder::default(),
            bottleneck_limit: DEFAULT_BOTTLENECK_LIMIT,
        }
    }
}

impl WaveConfig {
    /// Load configuration from a file, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file is not valid YAML, has unknown
    /// keys or holds out-of-range values.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        Self::parse(&content)
    }

    /// Parse configuration from YAML text.
    ///
    /// An empty document yields the defaults.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.minutes_per_task == 0 {
            return Err(Error::Config(
                "minutes-per-task must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Analysis options described by this configuration.
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            order: self.wave_order,
            minutes_per_task: self.minutes_per_task,
            bottleneck_limit: self.bottleneck_limit,
        }
    }
}

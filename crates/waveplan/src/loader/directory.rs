//! Plan documents stored in a directory.

use super::PlanSource;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use waveplan_doc::PlanFileName;

/// Reads plan documents from a planning directory.
///
/// Only regular files directly inside the directory are considered;
/// subdirectories are not searched.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Open a planning directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `root` does not exist or is not a
    /// directory.
    pub async fn open(root: &Path) -> Result<Self> {
        match tokio::fs::metadata(root).await {
            Ok(meta) if meta.is_dir() => Ok(Self {
                root: root.to_path_buf(),
            }),
            Ok(_) => Err(Error::NotFound {
                path: root.to_path_buf(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::NotFound {
                path: root.to_path_buf(),
            }),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// The planning directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl PlanSource for DirectorySource {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    async fn list_documents(&self) -> Result<Vec<PlanFileName>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().and_then(PlanFileName::parse) else {
                continue;
            };

            // Follow symlinks; skip directories that happen to match the pattern.
            match tokio::fs::metadata(entry.path()).await {
                Ok(meta) if meta.is_file() => files.push(name),
                Ok(_) => tracing::debug!(file = %name, "Skipping non-file plan entry"),
                Err(e) => {
                    // Listed now but unreadable later; let read_document report it.
                    tracing::debug!(file = %name, error = %e, "Could not stat plan entry");
                    files.push(name);
                }
            }
        }

        Ok(files)
    }

    async fn read_document(&self, file: &PlanFileName) -> Result<String> {
        let path = self.root.join(file.as_str());
        let content = tokio::fs::read_to_string(&path).await?;
        Ok(content)
    }
}

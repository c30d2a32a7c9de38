//! In-memory plan source for tests.

use super::PlanSource;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use waveplan_doc::PlanFileName;

/// Plan documents held in memory.
///
/// File names that are not plan document names are accepted but never
/// listed, mirroring a directory holding unrelated files.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    documents: BTreeMap<String, Option<String>>,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document.
    #[must_use]
    pub fn with_document(mut self, file_name: impl Into<String>, content: impl Into<String>) -> Self {
        self.documents.insert(file_name.into(), Some(content.into()));
        self
    }

    /// Add a document that is listed but fails to read.
    #[must_use]
    pub fn with_unreadable(mut self, file_name: impl Into<String>) -> Self {
        self.documents.insert(file_name.into(), None);
        self
    }
}

#[async_trait]
impl PlanSource for InMemorySource {
    fn location(&self) -> String {
        "<memory>".to_string()
    }

    async fn list_documents(&self) -> Result<Vec<PlanFileName>> {
        Ok(self
            .documents
            .keys()
            .filter_map(|name| PlanFileName::parse(name))
            .collect())
    }

    async fn read_document(&self, file: &PlanFileName) -> Result<String> {
        let name = file.as_str();
        match self.documents.get(name) {
            Some(Some(content)) => Ok(content.clone()),
            Some(None) => Err(Error::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{name}: permission denied"),
            ))),
            None => Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{name}: no such document"),
            ))),
        }
    }
}

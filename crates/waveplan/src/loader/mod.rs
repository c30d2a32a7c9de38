//! Plan repository loading.
//!
//! The loader reads every plan document of one phase through a
//! [`PlanSource`] and turns them into a [`DependencyGraph`]. Loading is
//! resilient: anything wrong with an individual document is reported as a
//! [`LoadWarning`] and the rest of the phase is still loaded.
//!
//! # Sources
//!
//! - [`DirectorySource`]: plan documents in a `.planning` directory
//! - `InMemorySource`: documents held in memory, available in tests and with
//!   the `test-util` feature
//!
//! # Example
//!
//! ```no_run
//! use waveplan::loader::{DirectorySource, load_phase};
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let source = DirectorySource::open(Path::new(".planning")).await?;
//!     let loaded = load_phase(&source, 1).await?;
//!
//!     for warning in &loaded.warnings {
//!         eprintln!("warning: {}", warning.description());
//!     }
//!     println!("{} plans loaded", loaded.graph.len());
//!     Ok(())
//! }
//! ```

mod directory;
#[cfg(any(test, feature = "test-util"))]
mod in_memory;

pub use directory::DirectorySource;
#[cfg(any(test, feature = "test-util"))]
pub use in_memory::InMemorySource;

use crate::domain::{PlanId, PlanNode};
use crate::error::Result;
use crate::graph::DependencyGraph;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use waveplan_doc::{PlanDocument, PlanFileName, Warning};

/// Read access to a collection of plan documents.
///
/// Implementations must be `Send + Sync` so a source can be shared across
/// async tasks.
#[async_trait]
pub trait PlanSource: Send + Sync {
    /// Human-readable location of the documents (used in messages).
    fn location(&self) -> String;

    /// List every plan document, across all phases.
    ///
    /// Entries whose name is not a plan document file name are not returned.
    async fn list_documents(&self) -> Result<Vec<PlanFileName>>;

    /// Read the body of one plan document.
    async fn read_document(&self, file: &PlanFileName) -> Result<String>;
}

/// Non-fatal problems found while loading a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A document parsed with a warning; the document was still loaded.
    Document {
        /// The document file name
        file: String,
        /// The parse warning
        warning: Warning,
    },

    /// A listed document could not be read; it was skipped.
    UnreadableDocument {
        /// The document file name
        file: String,
        /// The read error
        error: String,
    },

    /// Two documents map to the same plan id; the later one was skipped.
    DuplicatePlan {
        /// The skipped document
        file: String,
        /// The shared plan id
        id: PlanId,
        /// The document that was kept
        kept: String,
    },
}

impl LoadWarning {
    /// Returns a human-readable description of the warning.
    pub fn description(&self) -> String {
        match self {
            Self::Document { file, warning } => format!("{file}: {}", warning.description()),
            Self::UnreadableDocument { file, error } => {
                format!("{file}: could not be read, skipped ({error})")
            }
            Self::DuplicatePlan { file, id, kept } => {
                format!("{file}: plan {id} is already defined by {kept}, skipped")
            }
        }
    }

    /// Returns a static string identifying the warning kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Document { warning, .. } => warning.kind(),
            Self::UnreadableDocument { .. } => "unreadable_document",
            Self::DuplicatePlan { .. } => "duplicate_plan",
        }
    }

    /// The document the warning is about.
    pub fn file(&self) -> &str {
        match self {
            Self::Document { file, .. }
            | Self::UnreadableDocument { file, .. }
            | Self::DuplicatePlan { file, .. } => file,
        }
    }
}

impl Serialize for LoadWarning {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("LoadWarning", 3)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("file", self.file())?;
        state.serialize_field("message", &self.description())?;
        state.end()
    }
}

/// The plans of one phase together with the warnings raised loading them.
#[derive(Debug, Clone)]
pub struct LoadedPhase {
    /// Phase number
    pub phase: u32,
    /// Dependency graph of the loaded plans
    pub graph: DependencyGraph,
    /// Non-fatal problems, in document order
    pub warnings: Vec<LoadWarning>,
}

impl LoadedPhase {
    /// Whether the phase has no plan documents (the "no plans" outcome).
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}

/// Load every plan document of `phase`.
///
/// Documents are read one at a time in file-name order. The plan id always
/// comes from the file name; dependency references without a phase belong to
/// `phase`. A phase without documents yields an empty graph, not an error.
///
/// # Errors
///
/// Only listing the source can fail. Problems with individual documents are
/// returned as warnings.
pub async fn load_phase(source: &dyn PlanSource, phase: u32) -> Result<LoadedPhase> {
    let mut files: Vec<PlanFileName> = source
        .list_documents()
        .await?
        .into_iter()
        .filter(|file| file.is_in_phase(phase))
        .collect();
    files.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    let mut graph = DependencyGraph::new();
    let mut warnings = Vec::new();
    let mut owners: BTreeMap<PlanId, String> = BTreeMap::new();

    for file in files {
        let file_name = file.as_str().to_string();

        if let Some(kept) = owners.get(&file.id) {
            tracing::debug!(file = %file_name, id = %file.id, kept = %kept, "Duplicate plan id, skipping");
            warnings.push(LoadWarning::DuplicatePlan {
                file: file_name,
                id: file.id,
                kept: kept.clone(),
            });
            continue;
        }

        let content = match source.read_document(&file).await {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(file = %file_name, error = %e, "Skipping unreadable plan document");
                warnings.push(LoadWarning::UnreadableDocument {
                    file: file_name,
                    error: e.to_string(),
                });
                continue;
            }
        };

        let (node, doc_warnings) = plan_node(&file, &content);
        for warning in doc_warnings {
            tracing::debug!(file = %file_name, kind = warning.kind(), "{}", warning.description());
            warnings.push(LoadWarning::Document {
                file: file_name.clone(),
                warning,
            });
        }

        tracing::debug!(
            id = %node.id,
            tasks = node.task_count,
            dependencies = node.dependencies.len(),
            "Loaded plan"
        );
        owners.insert(file.id, file_name);
        graph.insert(node);
    }

    tracing::debug!(
        phase,
        plans = graph.len(),
        warnings = warnings.len(),
        location = %source.location(),
        "Loaded phase"
    );

    Ok(LoadedPhase {
        phase,
        graph,
        warnings,
    })
}

/// Build the graph node for one document.
fn plan_node(file: &PlanFileName, content: &str) -> (PlanNode, Vec<Warning>) {
    let (doc, mut warnings) = PlanDocument::parse(content);
    warnings.extend(doc.check_identity(file.id));

    let node = PlanNode::new(file.id, doc.name_or_default(), doc.task_count)
        .depends_on(doc.dependencies(file.id.phase()))
        .with_file(file.as_str());

    (node, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn id(sequence: u32) -> PlanId {
        PlanId::new(1, sequence)
    }

    fn plan_doc(phase: u32, plan: u32, name: &str, tasks: usize, deps: &str) -> String {
        let mut body = format!(
            "<plan phase=\"{phase}\" plan=\"{plan}\">\n<overview><phase_name>{name}</phase_name></overview>\n<dependencies>{deps}</dependencies>\n<tasks>\n"
        );
        for n in 0..tasks {
            body.push_str(&format!("<task type=\"auto\">Task {n}</task>\n"));
        }
        body.push_str("</tasks>\n</plan>\n");
        body
    }

    #[fixture]
    fn chain_source() -> InMemorySource {
        InMemorySource::new()
            .with_document("1-1-PLAN.md", plan_doc(1, 1, "Schema", 2, "None"))
            .with_document("1-2-PLAN.md", plan_doc(1, 2, "API", 3, "<complete>Plan 1</complete>"))
            .with_document(
                "1-3-PLAN.md",
                plan_doc(1, 3, "UI", 1, "<complete>Plan 1</complete><complete>Plan 2</complete>"),
            )
            .with_document("2-1-PLAN.md", plan_doc(2, 1, "Next", 1, "Phase 1 Plan 3"))
            .with_document("notes.md", "not a plan")
    }

    #[rstest]
    #[tokio::test]
    async fn test_load_phase_builds_graph(chain_source: InMemorySource) {
        let loaded = load_phase(&chain_source, 1).await.unwrap();

        assert_eq!(loaded.phase, 1);
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.graph.len(), 3);

        let api = loaded.graph.plan(&id(2)).unwrap();
        assert_eq!(api.name, "API");
        assert_eq!(api.task_count, 3);
        assert_eq!(api.file, "1-2-PLAN.md");
        assert_eq!(loaded.graph.forward(&id(3)), vec![id(1), id(2)]);
        assert_eq!(loaded.graph.reverse(&id(1)), vec![id(2), id(3)]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_cross_phase_reference(chain_source: InMemorySource) {
        let loaded = load_phase(&chain_source, 2).await.unwrap();

        assert_eq!(loaded.graph.len(), 1);
        assert_eq!(loaded.graph.forward(&PlanId::new(2, 1)), vec![id(3)]);
        assert_eq!(loaded.graph.dangling().len(), 1);
    }

    #[tokio::test]
    async fn test_phase_without_documents_is_empty() {
        let source = InMemorySource::new().with_document("2-1-PLAN.md", plan_doc(2, 1, "X", 1, ""));

        let loaded = load_phase(&source, 1).await.unwrap();
        assert!(loaded.is_empty());
        assert!(loaded.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_document_is_skipped() {
        let source = InMemorySource::new()
            .with_document("1-1-PLAN.md", plan_doc(1, 1, "A", 1, ""))
            .with_unreadable("1-2-PLAN.md");

        let loaded = load_phase(&source, 1).await.unwrap();
        assert_eq!(loaded.graph.len(), 1);
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].kind(), "unreadable_document");
        assert_eq!(loaded.warnings[0].file(), "1-2-PLAN.md");
    }

    #[tokio::test]
    async fn test_malformed_reference_is_dropped_with_warning() {
        let source = InMemorySource::new()
            .with_document("1-1-PLAN.md", plan_doc(1, 1, "A", 1, ""))
            .with_document(
                "1-2-PLAN.md",
                plan_doc(1, 2, "B", 1, "<complete>Plan one</complete><complete>Plan 1</complete>"),
            );

        let loaded = load_phase(&source, 1).await.unwrap();
        assert_eq!(loaded.graph.forward(&id(2)), vec![id(1)]);
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].kind(), "malformed_reference");
    }

    #[tokio::test]
    async fn test_file_name_wins_over_declared_identity() {
        let source =
            InMemorySource::new().with_document("1-4-PLAN.md", plan_doc(1, 7, "Mislabelled", 1, ""));

        let loaded = load_phase(&source, 1).await.unwrap();
        assert!(loaded.graph.contains(&id(4)));
        assert!(!loaded.graph.contains(&id(7)));
        assert_eq!(loaded.warnings[0].kind(), "metadata_mismatch");
    }

    #[tokio::test]
    async fn test_duplicate_plan_id_keeps_first_file() {
        let source = InMemorySource::new()
            .with_document("1-1-PLAN.xml", plan_doc(1, 1, "Second", 1, ""))
            .with_document("1-1-PLAN.md", plan_doc(1, 1, "First", 1, ""));

        let loaded = load_phase(&source, 1).await.unwrap();
        assert_eq!(loaded.graph.len(), 1);
        assert_eq!(loaded.graph.plan(&id(1)).unwrap().name, "First");
        assert_eq!(
            loaded.warnings,
            vec![LoadWarning::DuplicatePlan {
                file: "1-1-PLAN.xml".to_string(),
                id: id(1),
                kept: "1-1-PLAN.md".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_padded_and_plain_spellings_of_one_id() {
        let source = InMemorySource::new()
            .with_document("1-1-PLAN.md", plan_doc(1, 1, "Plain", 1, ""))
            .with_document("1-01-PLAN.md", plan_doc(1, 1, "Padded", 1, ""));

        let loaded = load_phase(&source, 1).await.unwrap();
        let plan = loaded.graph.plan(&id(1)).unwrap();
        assert_eq!(plan.name, "Padded");
        assert_eq!(plan.file, "1-01-PLAN.md");
        assert_eq!(
            loaded.warnings,
            vec![LoadWarning::DuplicatePlan {
                file: "1-1-PLAN.md".to_string(),
                id: id(1),
                kept: "1-01-PLAN.md".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_document_without_name_or_tasks() {
        let source = InMemorySource::new().with_document("1-1-PLAN.md", "<plan phase=\"1\">\n</plan>");

        let loaded = load_phase(&source, 1).await.unwrap();
        let plan = loaded.graph.plan(&id(1)).unwrap();
        assert_eq!(plan.name, "Unknown");
        assert!(plan.is_incomplete());
    }

    #[test]
    fn test_warning_serializes_kind_and_message() {
        let warning = LoadWarning::UnreadableDocument {
            file: "1-1-PLAN.md".to_string(),
            error: "permission denied".to_string(),
        };

        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "unreadable_document");
        assert_eq!(json["file"], "1-1-PLAN.md");
        assert!(json["message"].as_str().unwrap().contains("permission denied"));
    }
}

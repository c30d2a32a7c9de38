//! Domain types for plan dependency analysis.
//!
//! This module contains the core domain types shared by the loader, the
//! graph algorithms and the output layer.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

pub use waveplan_doc::PlanId;

/// Minutes of work assumed per task when estimating plan durations.
pub const DEFAULT_MINUTES_PER_TASK: u32 = 10;

/// One plan document of the loaded phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanNode {
    /// Identifier taken from the document's file name
    pub id: PlanId,

    /// Human-readable name (placeholder when the document has none)
    pub name: String,

    /// File name of the plan document
    pub file: String,

    /// Number of task markers in the document
    pub task_count: usize,

    /// Plans that must complete before this one may start
    pub dependencies: BTreeSet<PlanId>,
}

impl PlanNode {
    /// Create a plan node without dependencies.
    pub fn new(id: PlanId, name: impl Into<String>, task_count: usize) -> Self {
        Self {
            id,
            name: name.into(),
            file: format!("{}-{}-PLAN.md", id.phase(), id.sequence()),
            task_count,
            dependencies: BTreeSet::new(),
        }
    }

    /// Builder-style helper adding dependencies.
    #[must_use]
    pub fn depends_on(mut self, deps: impl IntoIterator<Item = PlanId>) -> Self {
        self.dependencies.extend(deps);
        self
    }

    /// Builder-style helper setting the document file name.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// A plan with no tasks is valid but flagged as incomplete.
    pub fn is_incomplete(&self) -> bool {
        self.task_count == 0
    }
}

/// Ordering of plans inside a wave and in every listing.
///
/// `Numeric` compares `(phase, sequence)` so `1-2` precedes `1-10`.
/// `Lexical` compares the canonical strings so `1-10` precedes `1-2`,
/// matching a plain `sort` of the file names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveOrder {
    /// Numeric by phase, then sequence
    #[default]
    Numeric,

    /// String order of the `phase-sequence` form
    Lexical,
}

impl WaveOrder {
    /// Compare two plan ids under this order.
    pub fn compare(self, a: &PlanId, b: &PlanId) -> Ordering {
        match self {
            Self::Numeric => a.cmp(b),
            Self::Lexical => a.lexical_cmp(b),
        }
    }

    /// Sort plan ids in place under this order.
    pub fn sort(self, ids: &mut [PlanId]) {
        match self {
            Self::Numeric => ids.sort(),
            Self::Lexical => ids.sort_by(PlanId::lexical_cmp),
        }
    }
}

impl fmt::Display for WaveOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Lexical => write!(f, "lexical"),
        }
    }
}

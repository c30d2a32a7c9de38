//! JSON documents for programmatic output.
//!
//! Each command has one document type. All of them carry the phase and the
//! load warnings so scripts see the same information as the text output.

use serde::Serialize;

use crate::analysis::{Analysis, Schedule, Strategy};
use crate::domain::PlanId;
use crate::graph::{Cycle, DependencyGraph};
use crate::loader::LoadWarning;

/// One plan with both edge directions.
#[derive(Debug, Serialize)]
pub struct PlanJson<'a> {
    /// Plan id
    pub id: PlanId,
    /// Plan name
    pub name: &'a str,
    /// Document file name
    pub file: &'a str,
    /// Number of tasks
    pub task_count: usize,
    /// Plans this one depends on
    pub dependencies: Vec<PlanId>,
    /// Plans depending on this one
    pub dependents: Vec<PlanId>,
    /// Whether the plan takes part in a cycle
    pub in_cycle: bool,
}

/// One dependency edge.
#[derive(Debug, Serialize)]
pub struct EdgeJson {
    /// The dependent plan
    pub from: PlanId,
    /// The plan it depends on
    pub to: PlanId,
    /// Whether `to` is outside the loaded phase
    pub dangling: bool,
}

fn plans<'a>(graph: &'a DependencyGraph, analysis: &Analysis) -> Vec<PlanJson<'a>> {
    graph
        .ids(analysis.wave_order)
        .into_iter()
        .filter_map(|id| graph.plan(&id))
        .map(|plan| PlanJson {
            id: plan.id,
            name: &plan.name,
            file: &plan.file,
            task_count: plan.task_count,
            dependencies: graph.forward(&plan.id),
            dependents: graph.reverse(&plan.id),
            in_cycle: analysis.in_cycle(&plan.id),
        })
        .collect()
}

/// `waveplan waves --json`
#[derive(Debug, Serialize)]
pub struct WavesJson<'a> {
    /// Phase number
    pub phase: u32,
    /// Loaded plans
    pub plans: Vec<PlanJson<'a>>,
    /// Detected cycles
    pub cycles: &'a [Cycle],
    /// Estimated schedule
    pub schedule: &'a Schedule,
    /// Parallelism statistics
    pub strategy: &'a Strategy,
    /// Load warnings
    pub warnings: &'a [LoadWarning],
}

impl<'a> WavesJson<'a> {
    /// Build the document.
    pub fn new(graph: &'a DependencyGraph, analysis: &'a Analysis, warnings: &'a [LoadWarning]) -> Self {
        Self {
            phase: analysis.phase,
            plans: plans(graph, analysis),
            cycles: &analysis.cycles,
            schedule: &analysis.schedule,
            strategy: &analysis.strategy,
            warnings,
        }
    }
}

/// `waveplan cycles --json`
#[derive(Debug, Serialize)]
pub struct CyclesJson<'a> {
    /// Phase number
    pub phase: u32,
    /// Detected cycles
    pub cycles: &'a [Cycle],
    /// Plans in the stalled wave, if any
    pub blocked: Vec<PlanId>,
    /// Load warnings
    pub warnings: &'a [LoadWarning],
}

impl<'a> CyclesJson<'a> {
    /// Build the document.
    pub fn new(analysis: &'a Analysis, warnings: &'a [LoadWarning]) -> Self {
        let blocked = analysis
            .waves
            .iter()
            .find(|wave| wave.stalled)
            .map(|wave| wave.plans.clone())
            .unwrap_or_default();

        Self {
            phase: analysis.phase,
            cycles: &analysis.cycles,
            blocked,
            warnings,
        }
    }
}

/// `waveplan graph --json`
#[derive(Debug, Serialize)]
pub struct GraphJson<'a> {
    /// Phase number
    pub phase: u32,
    /// Loaded plans
    pub plans: Vec<PlanJson<'a>>,
    /// Every dependency edge
    pub edges: Vec<EdgeJson>,
    /// Detected cycles
    pub cycles: &'a [Cycle],
    /// Load warnings
    pub warnings: &'a [LoadWarning],
}

impl<'a> GraphJson<'a> {
    /// Build the document.
    pub fn new(graph: &'a DependencyGraph, analysis: &'a Analysis, warnings: &'a [LoadWarning]) -> Self {
        let edges = graph
            .edges()
            .into_iter()
            .map(|(from, to)| EdgeJson {
                from,
                to,
                dangling: !graph.contains(&to),
            })
            .collect();

        Self {
            phase: analysis.phase,
            plans: plans(graph, analysis),
            edges,
            cycles: &analysis.cycles,
            warnings,
        }
    }
}

/// `waveplan analyze --json`
#[derive(Debug, Serialize)]
pub struct AnalysisJson<'a> {
    /// The full analysis
    #[serde(flatten)]
    pub analysis: &'a Analysis,
    /// Load warnings
    pub warnings: &'a [LoadWarning],
}

/// Document for a phase without plan documents.
#[derive(Debug, Serialize)]
pub struct NoPlansJson<'a> {
    /// Phase number
    pub phase: u32,
    /// Always `"no_plans"`
    pub status: &'static str,
    /// File-name pattern that was searched for
    pub pattern: String,
    /// Load warnings
    pub warnings: &'a [LoadWarning],
}

impl<'a> NoPlansJson<'a> {
    /// Build the document.
    pub fn new(phase: u32, warnings: &'a [LoadWarning]) -> Self {
        Self {
            phase,
            status: "no_plans",
            pattern: format!("{phase}-*-PLAN.*"),
            warnings,
        }
    }
}

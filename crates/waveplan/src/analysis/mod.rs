//! Whole-phase analysis.
//!
//! [`Analysis::run`] runs every graph algorithm once over a loaded phase and
//! collects the results the reports and the JSON output are built from.

pub mod estimate;
pub mod strategy;

use crate::domain::{DEFAULT_MINUTES_PER_TASK, PlanId, WaveOrder};
use crate::graph::{
    Bottleneck, CriticalPath, Cycle, DanglingDependency, DependencyGraph, Wave, calculate_waves,
    critical_path, detect_cycles,
};
use serde::Serialize;
use std::collections::HashSet;

pub use estimate::{DurationEstimator, PlanEstimate, Schedule, WaveEstimate};
pub use strategy::{Advice, Strategy};

/// Number of bottlenecks listed by default.
pub const DEFAULT_BOTTLENECK_LIMIT: usize = 5;

/// Tunables of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Ordering inside waves and listings
    pub order: WaveOrder,
    /// Minutes assumed per task
    pub minutes_per_task: u32,
    /// Maximum number of bottlenecks reported
    pub bottleneck_limit: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            order: WaveOrder::default(),
            minutes_per_task: DEFAULT_MINUTES_PER_TASK,
            bottleneck_limit: DEFAULT_BOTTLENECK_LIMIT,
        }
    }
}

/// Plan counts of a phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Loaded plans
    pub total: usize,
    /// Plans declaring no dependency
    pub independent: usize,
    /// Plans declaring at least one dependency
    pub with_dependencies: usize,
    /// Plans without any task
    pub incomplete: Vec<PlanId>,
    /// Dependencies on plans that were not loaded
    pub dangling: Vec<DanglingDependency>,
}

impl Summary {
    fn of(graph: &DependencyGraph, order: WaveOrder) -> Self {
        let total = graph.len();
        let independent = graph.roots(order).len();

        let mut incomplete: Vec<PlanId> = graph
            .plans()
            .filter(|plan| plan.is_incomplete())
            .map(|plan| plan.id)
            .collect();
        order.sort(&mut incomplete);

        Self {
            total,
            independent,
            with_dependencies: total - independent,
            incomplete,
            dangling: graph.dangling(),
        }
    }
}

/// Everything computed for one phase.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Phase number
    pub phase: u32,
    /// Ordering used for waves and listings
    pub wave_order: WaveOrder,
    /// Plan counts
    pub summary: Summary,
    /// Detected cycles, in discovery order
    pub cycles: Vec<Cycle>,
    /// Waves before estimation
    #[serde(skip)]
    pub waves: Vec<Wave>,
    /// Estimated wave schedule
    pub schedule: Schedule,
    /// Depth statistics
    pub critical_path: CriticalPath,
    /// Plans with dependents, most depended-on first
    pub bottlenecks: Vec<Bottleneck>,
    /// Parallelism statistics
    pub strategy: Strategy,
}

impl Analysis {
    /// Analyse the loaded plans of `phase`.
    pub fn run(phase: u32, graph: &DependencyGraph, options: AnalysisOptions) -> Self {
        let cycles = detect_cycles(graph);
        let waves = calculate_waves(graph, options.order);

        let cycle_members: HashSet<PlanId> = cycles.iter().flatten().copied().collect();
        let schedule =
            DurationEstimator::new(options.minutes_per_task).schedule(graph, &waves, &cycle_members);

        let bottlenecks: Vec<Bottleneck> = graph
            .bottlenecks(options.order)
            .into_iter()
            .filter(|b| b.dependents > 0)
            .take(options.bottleneck_limit)
            .collect();

        let strategy = Strategy::from_waves(&waves, graph.len());

        tracing::debug!(
            phase,
            plans = graph.len(),
            waves = waves.len(),
            cycles = cycles.len(),
            "Analysed phase"
        );

        Self {
            phase,
            wave_order: options.order,
            summary: Summary::of(graph, options.order),
            cycles,
            waves,
            schedule,
            critical_path: critical_path(graph, options.order),
            bottlenecks,
            strategy,
        }
    }

    /// Whether any circular dependency was found.
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Whether `id` is part of any detected cycle.
    pub fn in_cycle(&self, id: &PlanId) -> bool {
        self.cycles.iter().any(|cycle| cycle.contains(id))
    }
}

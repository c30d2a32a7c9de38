//! Duration estimates for plans, waves and whole schedules.

use crate::domain::{DEFAULT_MINUTES_PER_TASK, PlanId, PlanNode};
use crate::graph::{DependencyGraph, Wave};
use serde::Serialize;
use std::collections::HashSet;

/// Converts task counts into minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationEstimator {
    minutes_per_task: u32,
}

impl Default for DurationEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_MINUTES_PER_TASK)
    }
}

impl DurationEstimator {
    /// Create an estimator assuming `minutes_per_task` for every task.
    pub const fn new(minutes_per_task: u32) -> Self {
        Self { minutes_per_task }
    }

    /// Minutes assumed per task.
    pub const fn minutes_per_task(&self) -> u32 {
        self.minutes_per_task
    }

    /// Estimated minutes for one plan.
    pub fn plan_minutes(&self, plan: &PlanNode) -> u64 {
        u64::try_from(plan.task_count)
            .unwrap_or(u64::MAX)
            .saturating_mul(u64::from(self.minutes_per_task))
    }

    /// Estimate every wave of a schedule.
    ///
    /// A wave lasts as long as its longest plan; the schedule lasts the sum
    /// of its waves. `cycle_members` flags plans that take part in a cycle.
    pub fn schedule(
        &self,
        graph: &DependencyGraph,
        waves: &[Wave],
        cycle_members: &HashSet<PlanId>,
    ) -> Schedule {
        let waves: Vec<WaveEstimate> = waves
            .iter()
            .map(|wave| {
                let plans: Vec<PlanEstimate> = wave
                    .plans
                    .iter()
                    .map(|id| {
                        let (task_count, minutes) = graph
                            .plan(id)
                            .map_or((0, 0), |plan| (plan.task_count, self.plan_minutes(plan)));
                        PlanEstimate {
                            id: *id,
                            task_count,
                            minutes,
                            in_cycle: cycle_members.contains(id),
                        }
                    })
                    .collect();
                let minutes = plans.iter().map(|p| p.minutes).max().unwrap_or(0);
                WaveEstimate {
                    number: wave.number,
                    stalled: wave.stalled,
                    plans,
                    minutes,
                }
            })
            .collect();

        let total_minutes = waves
            .iter()
            .fold(0u64, |total, wave| total.saturating_add(wave.minutes));

        Schedule {
            minutes_per_task: self.minutes_per_task,
            waves,
            total_minutes,
        }
    }
}

/// Estimate for one plan inside a wave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEstimate {
    /// The plan
    pub id: PlanId,
    /// Number of tasks
    pub task_count: usize,
    /// Estimated minutes
    pub minutes: u64,
    /// Whether the plan takes part in a dependency cycle
    pub in_cycle: bool,
}

/// Estimate for one wave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaveEstimate {
    /// 1-based wave number
    pub number: usize,
    /// Whether the wave holds plans blocked by a cycle
    pub stalled: bool,
    /// Member plans in wave order
    pub plans: Vec<PlanEstimate>,
    /// Duration of the longest member
    pub minutes: u64,
}

/// Estimated wave schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    /// Minutes assumed per task
    pub minutes_per_task: u32,
    /// Waves in execution order
    pub waves: Vec<WaveEstimate>,
    /// Sum of wave durations
    pub total_minutes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WaveOrder;
    use crate::graph::calculate_waves;

    fn id(sequence: u32) -> PlanId {
        PlanId::new(1, sequence)
    }

    #[test]
    fn test_plan_minutes_scale_with_tasks() {
        let estimator = DurationEstimator::default();
        assert_eq!(estimator.minutes_per_task(), 10);
        assert_eq!(estimator.plan_minutes(&PlanNode::new(id(1), "A", 3)), 30);
        assert_eq!(estimator.plan_minutes(&PlanNode::new(id(2), "B", 0)), 0);
        assert_eq!(
            DurationEstimator::new(15).plan_minutes(&PlanNode::new(id(1), "A", 2)),
            30
        );
    }

    #[test]
    fn test_wave_takes_longest_member_and_total_sums_waves() {
        let graph = DependencyGraph::from_plans([
            PlanNode::new(id(1), "A", 2),
            PlanNode::new(id(2), "B", 1).depends_on([id(1)]),
            PlanNode::new(id(3), "C", 4).depends_on([id(1)]),
        ]);
        let waves = calculate_waves(&graph, WaveOrder::Numeric);

        let schedule = DurationEstimator::default().schedule(&graph, &waves, &HashSet::new());
        assert_eq!(schedule.waves.len(), 2);
        assert_eq!(schedule.waves[0].minutes, 20);
        assert_eq!(schedule.waves[1].minutes, 40);
        assert_eq!(schedule.total_minutes, 60);
        assert_eq!(schedule.waves[1].plans[0].minutes, 10);
    }

    #[test]
    fn test_cycle_members_are_flagged() {
        let graph = DependencyGraph::from_plans([
            PlanNode::new(id(1), "A", 1).depends_on([id(2)]),
            PlanNode::new(id(2), "B", 1).depends_on([id(1)]),
        ]);
        let waves = calculate_waves(&graph, WaveOrder::Numeric);
        let members = HashSet::from([id(1), id(2)]);

        let schedule = DurationEstimator::default().schedule(&graph, &waves, &members);
        assert!(schedule.waves[0].stalled);
        assert!(schedule.waves[0].plans.iter().all(|p| p.in_cycle));
    }
}

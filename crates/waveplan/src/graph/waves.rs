//! Wave scheduling.

use super::DependencyGraph;
use crate::domain::{PlanId, WaveOrder};
use serde::Serialize;
use std::collections::BTreeMap;

/// A batch of plans that may run concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wave {
    /// 1-based position in the schedule
    pub number: usize,

    /// Members, sorted under the configured wave order
    pub plans: Vec<PlanId>,

    /// Set on the final batch holding plans blocked by a cycle
    pub stalled: bool,
}

impl Wave {
    /// Number of plans in the wave.
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Whether the wave has no plans.
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Whether the wave runs more than one plan at once.
    pub fn is_parallel(&self) -> bool {
        self.plans.len() > 1
    }
}

/// Compute the wave execution schedule.
///
/// Batched Kahn's algorithm: the in-degree of a plan is the number of its
/// dependencies that are loaded plans (a self-dependency counts). Every plan
/// with in-degree zero forms the next wave; its dependents are then
/// decremented. Dangling dependencies never block a plan.
///
/// When plans remain but none is ready, they are all emitted as one final
/// wave marked `stalled`, so the schedule always terminates and always
/// partitions the loaded plans.
pub fn calculate_waves(graph: &DependencyGraph, order: WaveOrder) -> Vec<Wave> {
    let mut in_degree: BTreeMap<PlanId, usize> = graph
        .ids(WaveOrder::Numeric)
        .into_iter()
        .map(|id| (id, graph.loaded_dependencies(&id).len()))
        .collect();

    let mut waves = Vec::new();

    while !in_degree.is_empty() {
        let mut ready: Vec<PlanId> = in_degree
            .iter()
            .filter(|&(_, degree)| *degree == 0)
            .map(|(id, _)| *id)
            .collect();

        if ready.is_empty() {
            let mut remaining: Vec<PlanId> = in_degree.keys().copied().collect();
            order.sort(&mut remaining);
            tracing::debug!(
                count = remaining.len(),
                "No plan is ready; emitting stalled wave"
            );
            waves.push(Wave {
                number: waves.len() + 1,
                plans: remaining,
                stalled: true,
            });
            break;
        }

        order.sort(&mut ready);
        for id in &ready {
            in_degree.remove(id);
            for dependent in graph.reverse(id) {
                if let Some(degree) = in_degree.get_mut(&dependent) {
                    *degree = degree.saturating_sub(1);
                }
            }
        }

        waves.push(Wave {
            number: waves.len() + 1,
            plans: ready,
            stalled: false,
        });
    }

    waves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlanNode;
    use rstest::rstest;

    fn id(sequence: u32) -> PlanId {
        PlanId::new(1, sequence)
    }

    fn plan(sequence: u32, deps: &[u32]) -> PlanNode {
        PlanNode::new(id(sequence), format!("Plan {sequence}"), 1)
            .depends_on(deps.iter().map(|d| id(*d)))
    }

    fn members(waves: &[Wave]) -> Vec<Vec<PlanId>> {
        waves.iter().map(|w| w.plans.clone()).collect()
    }

    #[test]
    fn test_empty_graph_has_no_waves() {
        assert!(calculate_waves(&DependencyGraph::new(), WaveOrder::Numeric).is_empty());
    }

    #[test]
    fn test_linear_chain() {
        let graph = DependencyGraph::from_plans([plan(1, &[]), plan(2, &[1]), plan(3, &[1, 2])]);

        let waves = calculate_waves(&graph, WaveOrder::Numeric);
        assert_eq!(members(&waves), vec![vec![id(1)], vec![id(2)], vec![id(3)]]);
        assert!(waves.iter().all(|w| !w.stalled));
        assert_eq!(
            waves.iter().map(|w| w.number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_diamond() {
        let graph = DependencyGraph::from_plans([
            plan(1, &[]),
            plan(2, &[1]),
            plan(3, &[1]),
            plan(4, &[2, 3]),
        ]);

        let waves = calculate_waves(&graph, WaveOrder::Numeric);
        assert_eq!(
            members(&waves),
            vec![vec![id(1)], vec![id(2), id(3)], vec![id(4)]]
        );
        assert!(waves[1].is_parallel());
    }

    #[test]
    fn test_triangle_cycle_is_single_stalled_wave() {
        let graph = DependencyGraph::from_plans([plan(1, &[3]), plan(2, &[1]), plan(3, &[2])]);

        let waves = calculate_waves(&graph, WaveOrder::Numeric);
        assert_eq!(waves.len(), 1);
        assert!(waves[0].stalled);
        assert_eq!(waves[0].plans, vec![id(1), id(2), id(3)]);
    }

    #[test]
    fn test_independent_plan_scheduled_before_cycle_stalls() {
        let graph = DependencyGraph::from_plans([
            plan(1, &[]),
            plan(2, &[3]),
            plan(3, &[2]),
            plan(4, &[1]),
        ]);

        let waves = calculate_waves(&graph, WaveOrder::Numeric);
        assert_eq!(
            members(&waves),
            vec![vec![id(1)], vec![id(4)], vec![id(2), id(3)]]
        );
        assert!(!waves[0].stalled);
        assert!(waves[2].stalled);
    }

    #[test]
    fn test_self_dependency_never_ready() {
        let graph = DependencyGraph::from_plans([plan(1, &[1]), plan(2, &[])]);

        let waves = calculate_waves(&graph, WaveOrder::Numeric);
        assert_eq!(members(&waves), vec![vec![id(2)], vec![id(1)]]);
        assert!(waves[1].stalled);
    }

    #[test]
    fn test_dangling_dependency_does_not_block() {
        let graph = DependencyGraph::from_plans([
            plan(1, &[]).depends_on([PlanId::new(0, 3)]),
            plan(2, &[1]).depends_on([id(99)]),
        ]);

        let waves = calculate_waves(&graph, WaveOrder::Numeric);
        assert_eq!(members(&waves), vec![vec![id(1)], vec![id(2)]]);
    }

    #[rstest]
    #[case::numeric(WaveOrder::Numeric, vec![id(1), id(2), id(10)])]
    #[case::lexical(WaveOrder::Lexical, vec![id(1), id(10), id(2)])]
    fn test_tie_break_within_wave(#[case] order: WaveOrder, #[case] expected: Vec<PlanId>) {
        let graph = DependencyGraph::from_plans([plan(10, &[]), plan(2, &[]), plan(1, &[])]);

        let waves = calculate_waves(&graph, order);
        assert_eq!(waves.len(), 1);
        assert_eq!(waves[0].plans, expected);
    }

    #[test]
    fn test_schedule_is_deterministic() {
        let build = || {
            DependencyGraph::from_plans([
                plan(5, &[1]),
                plan(3, &[1]),
                plan(1, &[]),
                plan(4, &[3, 5]),
            ])
        };

        let first = calculate_waves(&build(), WaveOrder::Numeric);
        let second = calculate_waves(&build(), WaveOrder::Numeric);
        assert_eq!(first, second);
    }
}

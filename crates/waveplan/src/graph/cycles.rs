//! Circular dependency detection.

use super::DependencyGraph;
use crate::domain::{PlanId, WaveOrder};
use std::collections::{HashMap, HashSet};

/// A closed loop of dependencies: `[n1, n2, ..., nk, n1]`.
///
/// Each consecutive pair is a dependent -> dependency edge. A plan that
/// depends on itself yields `[n, n]`.
pub type Cycle = Vec<PlanId>;

/// One level of the explicit DFS stack.
struct Frame {
    node: PlanId,
    neighbours: Vec<PlanId>,
    cursor: usize,
}

/// Find circular dependencies among the loaded plans.
///
/// Depth-first search is started from every unvisited plan in numeric order
/// and follows dependencies in numeric order, keeping the current path. Each
/// edge back onto the path records the slice of the path from that plan's
/// position to the current plan, closed by repeating the plan. The search
/// keeps going after the first hit, so every cycle met in this traversal
/// order is returned. Edges to plans outside the loaded set are not followed.
///
/// The traversal keeps its own stack, so very long dependency chains cannot
/// exhaust the call stack.
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let mut cycles = Vec::new();
    let mut visited: HashSet<PlanId> = HashSet::new();

    for start in graph.ids(WaveOrder::Numeric) {
        if !visited.insert(start) {
            continue;
        }

        let mut path: Vec<PlanId> = vec![start];
        let mut on_path: HashMap<PlanId, usize> = HashMap::from([(start, 0)]);
        let mut stack = vec![Frame {
            node: start,
            neighbours: graph.loaded_dependencies(&start),
            cursor: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(&next) = frame.neighbours.get(frame.cursor) else {
                let node = frame.node;
                stack.pop();
                path.pop();
                on_path.remove(&node);
                continue;
            };
            frame.cursor += 1;

            if let Some(&position) = on_path.get(&next) {
                let mut cycle = path[position..].to_vec();
                cycle.push(next);
                tracing::debug!(cycle = ?cycle, "Found dependency cycle");
                cycles.push(cycle);
            } else if visited.insert(next) {
                on_path.insert(next, path.len());
                path.push(next);
                stack.push(Frame {
                    node: next,
                    neighbours: graph.loaded_dependencies(&next),
                    cursor: 0,
                });
            }
        }
    }

    cycles
}

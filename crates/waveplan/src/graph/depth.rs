//! Dependency depth and critical path.
//!
//! The depth of a plan is 1 when it depends on nothing, otherwise one more
//! than its deepest dependency. A dangling dependency counts as a depth-1
//! leaf. Depth is undefined (`None`) for every plan that can reach a cycle.

use super::DependencyGraph;
use crate::domain::{PlanId, WaveOrder};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Longest dependency chains of a phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CriticalPath {
    /// Greatest defined depth (0 when no plan has one)
    pub max_depth: usize,

    /// Plans whose depth equals `max_depth`
    pub deepest: Vec<PlanId>,

    /// Plans whose depth is undefined because they reach a cycle
    pub undefined: Vec<PlanId>,
}

struct Frame {
    node: PlanId,
    dependencies: Vec<PlanId>,
    cursor: usize,
    deepest: usize,
    undefined: bool,
}

impl Frame {
    fn new(graph: &DependencyGraph, node: PlanId) -> Self {
        Self {
            node,
            dependencies: graph.forward(&node),
            cursor: 0,
            deepest: 0,
            undefined: false,
        }
    }

    fn absorb(&mut self, depth: Option<usize>) {
        match depth {
            Some(depth) => self.deepest = self.deepest.max(depth),
            None => self.undefined = true,
        }
    }

    fn depth(&self) -> Option<usize> {
        (!self.undefined).then_some(self.deepest + 1)
    }
}

/// Compute the depth of every loaded plan.
///
/// Post-order traversal with an explicit stack and memoization, so each plan
/// is resolved once and long chains never grow the call stack.
pub fn dependency_depths(graph: &DependencyGraph) -> BTreeMap<PlanId, Option<usize>> {
    let mut depths: BTreeMap<PlanId, Option<usize>> = BTreeMap::new();
    let mut on_path: HashSet<PlanId> = HashSet::new();

    for start in graph.ids(WaveOrder::Numeric) {
        if depths.contains_key(&start) {
            continue;
        }

        on_path.insert(start);
        let mut stack = vec![Frame::new(graph, start)];

        while let Some(frame) = stack.last_mut() {
            if let Some(&dep) = frame.dependencies.get(frame.cursor) {
                frame.cursor += 1;

                if !graph.contains(&dep) {
                    frame.absorb(Some(1));
                } else if on_path.contains(&dep) {
                    frame.absorb(None);
                } else if let Some(&known) = depths.get(&dep) {
                    frame.absorb(known);
                } else {
                    on_path.insert(dep);
                    stack.push(Frame::new(graph, dep));
                }
                continue;
            }

            let node = frame.node;
            let depth = frame.depth();
            stack.pop();
            on_path.remove(&node);
            depths.insert(node, depth);

            if let Some(parent) = stack.last_mut() {
                parent.absorb(depth);
            }
        }
    }

    depths
}

/// Summarise the depths into the critical path.
///
/// Plan lists are sorted under `order`.
pub fn critical_path(graph: &DependencyGraph, order: WaveOrder) -> CriticalPath {
    let depths = dependency_depths(graph);

    let max_depth = depths.values().flatten().copied().max().unwrap_or(0);

    let mut deepest: Vec<PlanId> = depths
        .iter()
        .filter(|&(_, depth)| max_depth > 0 && *depth == Some(max_depth))
        .map(|(id, _)| *id)
        .collect();
    order.sort(&mut deepest);

    let mut undefined: Vec<PlanId> = depths
        .iter()
        .filter(|&(_, depth)| depth.is_none())
        .map(|(id, _)| *id)
        .collect();
    order.sort(&mut undefined);

    CriticalPath {
        max_depth,
        deepest,
        undefined,
    }
}

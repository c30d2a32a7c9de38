//! Plan dependency graph using petgraph.
//!
//! # Edge Direction Convention
//!
//! Edges point from **dependent -> dependency**: if plan `1-2` depends on
//! plan `1-1`, the graph holds the edge `1-2 -> 1-1`.
//!
//! - `forward(id)` follows outgoing edges (what `id` depends on)
//! - `reverse(id)` follows incoming edges (what depends on `id`)
//!
//! Both views come from the same edge store, so `reverse(B)` contains `A`
//! exactly when `forward(A)` contains `B`.
//!
//! # Dangling Dependencies
//!
//! A dependency may name a plan that was not loaded, typically one from an
//! earlier phase. The edge is still recorded and the target gets a graph node,
//! but the target is not a *loaded* plan: it never blocks scheduling and is
//! not traversed by cycle detection.
//!
//! # Algorithms
//!
//! | Operation | Module | Algorithm |
//! |-----------|--------|-----------|
//! | Cycle detection | [`cycles`] | Explicit-stack DFS with path tracking |
//! | Wave scheduling | [`waves`] | Kahn's algorithm, batched |
//! | Dependency depth | [`depth`] | Explicit-stack post-order, memoized |

pub mod cycles;
pub mod depth;
pub mod waves;

use crate::domain::{PlanId, PlanNode, WaveOrder};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub use cycles::{Cycle, detect_cycles};
pub use depth::{CriticalPath, critical_path, dependency_depths};
pub use waves::{Wave, calculate_waves};

/// A dependency on a plan that is not part of the loaded node set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DanglingDependency {
    /// The loaded plan declaring the dependency
    pub plan: PlanId,
    /// The referenced plan that was not loaded
    pub missing: PlanId,
}

/// A plan ranked by how many other plans directly depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bottleneck {
    /// The plan
    pub id: PlanId,
    /// Number of loaded plans that list it as a dependency
    pub dependents: usize,
}

/// Dependency graph of the plans of one phase.
///
/// Every instance owns freshly allocated containers; nothing is shared
/// between graphs.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Loaded plans indexed by id
    plans: BTreeMap<PlanId, PlanNode>,

    /// Edge store. Nodes are loaded plans plus dangling dependency targets.
    graph: DiGraph<PlanId, ()>,

    /// Mapping from PlanId to graph NodeIndex
    node_map: HashMap<PlanId, NodeIndex>,
}

impl DependencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from plan nodes.
    ///
    /// When two nodes share an id the first one wins.
    pub fn from_plans(plans: impl IntoIterator<Item = PlanNode>) -> Self {
        let mut graph = Self::new();
        for plan in plans {
            graph.insert(plan);
        }
        graph
    }

    /// Add a plan and its dependency edges.
    ///
    /// Returns `false` (and leaves the graph untouched) if a plan with the
    /// same id is already loaded.
    pub fn insert(&mut self, plan: PlanNode) -> bool {
        if self.plans.contains_key(&plan.id) {
            return false;
        }

        let source = self.ensure_node(plan.id);
        for dep in &plan.dependencies {
            let target = self.ensure_node(*dep);
            self.graph.update_edge(source, target, ());
        }

        self.plans.insert(plan.id, plan);
        true
    }

    fn ensure_node(&mut self, id: PlanId) -> NodeIndex {
        *self
            .node_map
            .entry(id)
            .or_insert_with(|| self.graph.add_node(id))
    }

    /// Number of loaded plans.
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Whether no plan was loaded.
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Whether `id` is a loaded plan (dangling targets are not).
    pub fn contains(&self, id: &PlanId) -> bool {
        self.plans.contains_key(id)
    }

    /// Look up a loaded plan.
    pub fn plan(&self, id: &PlanId) -> Option<&PlanNode> {
        self.plans.get(id)
    }

    /// All loaded plans in numeric id order.
    pub fn plans(&self) -> impl Iterator<Item = &PlanNode> {
        self.plans.values()
    }

    /// Ids of all loaded plans, sorted under `order`.
    pub fn ids(&self, order: WaveOrder) -> Vec<PlanId> {
        let mut ids: Vec<PlanId> = self.plans.keys().copied().collect();
        order.sort(&mut ids);
        ids
    }

    fn neighbours(&self, id: &PlanId, direction: Direction) -> Vec<PlanId> {
        let Some(&node) = self.node_map.get(id) else {
            return Vec::new();
        };

        let mut ids: Vec<PlanId> = self
            .graph
            .neighbors_directed(node, direction)
            .map(|n| self.graph[n])
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Plans `id` depends on, including dangling ones, in numeric order.
    pub fn forward(&self, id: &PlanId) -> Vec<PlanId> {
        self.neighbours(id, Direction::Outgoing)
    }

    /// Plans that depend on `id`, in numeric order.
    pub fn reverse(&self, id: &PlanId) -> Vec<PlanId> {
        self.neighbours(id, Direction::Incoming)
    }

    /// Dependencies of `id` that are loaded plans.
    pub fn loaded_dependencies(&self, id: &PlanId) -> Vec<PlanId> {
        self.forward(id)
            .into_iter()
            .filter(|dep| self.contains(dep))
            .collect()
    }

    /// All `(dependent, dependency)` edges in numeric order.
    pub fn edges(&self) -> Vec<(PlanId, PlanId)> {
        let mut edges: Vec<(PlanId, PlanId)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(source, target)| (self.graph[source], self.graph[target]))
            .collect();
        edges.sort();
        edges
    }

    /// Edges whose target is not a loaded plan.
    pub fn dangling(&self) -> Vec<DanglingDependency> {
        self.edges()
            .into_iter()
            .filter(|(_, dep)| !self.contains(dep))
            .map(|(plan, missing)| DanglingDependency { plan, missing })
            .collect()
    }

    /// Loaded plans that declare no dependencies at all.
    pub fn roots(&self, order: WaveOrder) -> Vec<PlanId> {
        self.ids(order)
            .into_iter()
            .filter(|id| self.forward(id).is_empty())
            .collect()
    }

    /// Loaded plans ranked by number of direct dependents, most first.
    ///
    /// Ties keep `order`.
    pub fn bottlenecks(&self, order: WaveOrder) -> Vec<Bottleneck> {
        let mut ranked: Vec<Bottleneck> = self
            .ids(order)
            .into_iter()
            .map(|id| Bottleneck {
                id,
                dependents: self.reverse(&id).len(),
            })
            .collect();
        // Stable sort keeps the id order within equal counts.
        ranked.sort_by(|a, b| b.dependents.cmp(&a.dependents));
        ranked
    }
}

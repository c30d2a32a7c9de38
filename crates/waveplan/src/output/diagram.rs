//! Mermaid and Graphviz DOT renderings of the dependency graph.
//!
//! Edges are drawn from a dependency to its dependent, so diagrams read in
//! execution order. Plans taking part in a cycle are highlighted and
//! dependencies outside the loaded phase are drawn dashed.

use std::collections::BTreeSet;
use std::io::{self, Write};

use super::truncate;
use crate::analysis::Analysis;
use crate::domain::PlanId;
use crate::graph::DependencyGraph;

const MERMAID_NAME_WIDTH: usize = 20;
const DOT_NAME_WIDTH: usize = 25;

/// Cycle members without the closing repetition, in numeric order.
fn cycle_nodes(analysis: &Analysis) -> BTreeSet<PlanId> {
    analysis
        .cycles
        .iter()
        .flat_map(|cycle| cycle.iter().take(cycle.len().saturating_sub(1)))
        .copied()
        .collect()
}

fn external_nodes(graph: &DependencyGraph) -> BTreeSet<PlanId> {
    graph.dangling().into_iter().map(|d| d.missing).collect()
}

fn mermaid_id(id: &PlanId) -> String {
    format!("P{}_{}", id.phase(), id.sequence())
}

/// Write a Mermaid flowchart wrapped in a markdown code fence.
pub fn write_mermaid<W: Write>(
    w: &mut W,
    graph: &DependencyGraph,
    analysis: &Analysis,
) -> io::Result<()> {
    writeln!(w, "```mermaid")?;
    writeln!(w, "flowchart TD")?;

    for plan in graph.plans() {
        let safe_name: String = truncate(&plan.name, MERMAID_NAME_WIDTH)
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
            .collect();
        writeln!(
            w,
            "    {}[\"{}<br/>{}\"]",
            mermaid_id(&plan.id),
            plan.id,
            safe_name.trim()
        )?;
    }
    for external in external_nodes(graph) {
        writeln!(
            w,
            "    {}([\"{}<br/>not loaded\"])",
            mermaid_id(&external),
            external
        )?;
    }

    writeln!(w)?;
    for (dependent, dependency) in graph.edges() {
        let arrow = if graph.contains(&dependency) { "-->" } else { "-.->" };
        writeln!(
            w,
            "    {} {arrow} {}",
            mermaid_id(&dependency),
            mermaid_id(&dependent)
        )?;
    }

    let highlighted = cycle_nodes(analysis);
    if !highlighted.is_empty() {
        writeln!(w)?;
        writeln!(w, "    %% Cycles detected")?;
        for node in &highlighted {
            writeln!(
                w,
                "    style {} fill:#f9f,stroke:#333,stroke-width:2px",
                mermaid_id(node)
            )?;
        }
    }

    writeln!(w, "```")
}

fn dot_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Write a Graphviz DOT digraph.
pub fn write_dot<W: Write>(
    w: &mut W,
    graph: &DependencyGraph,
    analysis: &Analysis,
) -> io::Result<()> {
    writeln!(w, "digraph PlanDependencies {{")?;
    writeln!(w, "    rankdir=TB;")?;
    writeln!(w, "    node [shape=box, style=rounded];")?;
    writeln!(w)?;

    for plan in graph.plans() {
        writeln!(
            w,
            "    \"{}\" [label=\"{}\\n{}\"];",
            plan.id,
            plan.id,
            dot_escape(&truncate(&plan.name, DOT_NAME_WIDTH))
        )?;
    }
    for external in external_nodes(graph) {
        writeln!(
            w,
            "    \"{external}\" [label=\"{external}\\nnot loaded\", style=dashed];"
        )?;
    }

    writeln!(w)?;
    for (dependent, dependency) in graph.edges() {
        let style = if graph.contains(&dependency) {
            ""
        } else {
            " [style=dashed]"
        };
        writeln!(w, "    \"{dependency}\" -> \"{dependent}\"{style};")?;
    }

    let highlighted = cycle_nodes(analysis);
    if !highlighted.is_empty() {
        writeln!(w)?;
        writeln!(w, "    // Cycles")?;
        for node in &highlighted {
            writeln!(w, "    \"{node}\" [style=filled, fillcolor=\"#ffcccc\"];")?;
        }
    }

    writeln!(w, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisOptions;
    use crate::domain::PlanNode;

    fn id(sequence: u32) -> PlanId {
        PlanId::new(1, sequence)
    }

    fn graph() -> DependencyGraph {
        DependencyGraph::from_plans([
            PlanNode::new(id(1), "Database \"core\" schema!", 1).depends_on([PlanId::new(0, 4)]),
            PlanNode::new(id(2), "API", 1).depends_on([id(1), id(3)]),
            PlanNode::new(id(3), "UI", 1).depends_on([id(2)]),
        ])
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>, &DependencyGraph, &Analysis) -> io::Result<()>,
    {
        let graph = graph();
        let analysis = Analysis::run(1, &graph, AnalysisOptions::default());
        let mut buf = Vec::new();
        f(&mut buf, &graph, &analysis).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_mermaid() {
        let text = render(|w, g, a| write_mermaid(w, g, a));

        assert!(text.starts_with("```mermaid\nflowchart TD\n"));
        assert!(text.ends_with("```\n"));
        assert!(text.contains("    P1_1[\"1-1<br/>Database core sche\"]"));
        assert!(text.contains("    P0_4([\"0-4<br/>not loaded\"])"));
        assert!(text.contains("    P1_1 --> P1_2"));
        assert!(text.contains("    P0_4 -.-> P1_1"));
        assert!(text.contains("    %% Cycles detected"));
        assert!(text.contains("    style P1_2 fill:#f9f"));
        assert!(text.contains("    style P1_3 fill:#f9f"));
        assert!(!text.contains("style P1_1 "));
    }

    #[test]
    fn test_dot() {
        let text = render(|w, g, a| write_dot(w, g, a));

        assert!(text.starts_with("digraph PlanDependencies {\n"));
        assert!(text.ends_with("}\n"));
        assert!(text.contains("    \"1-1\" [label=\"1-1\\nDatabase \\\"core\\\" schema!\"];"));
        assert!(text.contains("    \"1-3\" -> \"1-2\";"));
        assert!(text.contains("    \"0-4\" -> \"1-1\" [style=dashed];"));
        assert!(text.contains("    \"1-2\" [style=filled, fillcolor=\"#ffcccc\"];"));
    }

    #[test]
    fn test_acyclic_graph_has_no_highlight() {
        let graph = DependencyGraph::from_plans([
            PlanNode::new(id(1), "A", 1),
            PlanNode::new(id(2), "B", 1).depends_on([id(1)]),
        ]);
        let analysis = Analysis::run(1, &graph, AnalysisOptions::default());

        let mut buf = Vec::new();
        write_dot(&mut buf, &graph, &analysis).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains("// Cycles"));
    }
}

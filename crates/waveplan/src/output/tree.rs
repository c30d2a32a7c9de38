//! Dependency tree rendering for `waveplan graph --format ascii`.
//!
//! The tree starts at plans without loaded dependencies and descends through
//! their dependents:
//!
//! ```text
//! 1-1: Schema
//! ├── 1-2: API
//! │   └── 1-4: Release
//! └── 1-3: UI
//!     └── 1-4: Release [...]
//! ```
//!
//! A plan already expanded elsewhere is shown once more with `[...]`; an
//! edge back onto the current branch is shown with `[CIRCULAR]`.

use std::collections::HashSet;
use std::io::{self, Write};

use super::color::{Symbols, bold, colorize_id, dimmed, warning};
use super::{OutputConfig, truncate};
use crate::analysis::Analysis;
use crate::domain::PlanId;
use crate::graph::DependencyGraph;

const NAME_WIDTH: usize = 30;

struct Item {
    id: PlanId,
    depth: usize,
    prefix: String,
    connector: &'static str,
    last: bool,
}

fn loaded_dependents(graph: &DependencyGraph, analysis: &Analysis, id: &PlanId) -> Vec<PlanId> {
    let mut dependents: Vec<PlanId> = graph
        .reverse(id)
        .into_iter()
        .filter(|dependent| graph.contains(dependent))
        .collect();
    analysis.wave_order.sort(&mut dependents);
    dependents
}

fn label(graph: &DependencyGraph, analysis: &Analysis, id: &PlanId, config: &OutputConfig) -> String {
    let name = graph.plan(id).map_or("", |plan| plan.name.as_str());
    format!(
        "{}: {}",
        colorize_id(&id.to_string(), analysis.in_cycle(id), config),
        truncate(name, NAME_WIDTH)
    )
}

/// Write the dependency tree.
pub fn write_dependency_tree<W: Write>(
    w: &mut W,
    graph: &DependencyGraph,
    analysis: &Analysis,
    config: &OutputConfig,
) -> io::Result<()> {
    let symbols = Symbols::for_config(config);
    let (branch, corner, pipe, space) = if config.use_ascii {
        ("|-- ", "`-- ", "|   ", "    ")
    } else {
        ("├── ", "└── ", "│   ", "    ")
    };

    writeln!(w, "{}", bold("Plan Dependency Tree", config))?;
    writeln!(w, "{}", "=".repeat(60.min(config.content_width())))?;
    writeln!(w)?;

    let ids = graph.ids(analysis.wave_order);
    let roots: Vec<PlanId> = ids
        .iter()
        .copied()
        .filter(|id| graph.loaded_dependencies(id).is_empty())
        .collect();

    if roots.is_empty() {
        writeln!(w, "No root plans found (all plans have dependencies)")?;
        if !graph.is_empty() {
            writeln!(w, "{}", warning("Possible circular dependencies!", config))?;
        }
        return Ok(());
    }

    let (connected, disconnected): (Vec<PlanId>, Vec<PlanId>) = roots
        .into_iter()
        .partition(|root| !loaded_dependents(graph, analysis, root).is_empty());

    let mut expanded: HashSet<PlanId> = HashSet::new();
    let mut path: Vec<PlanId> = Vec::new();

    for root in connected {
        let mut stack = vec![Item {
            id: root,
            depth: 0,
            prefix: String::new(),
            connector: "",
            last: true,
        }];

        while let Some(item) = stack.pop() {
            path.truncate(item.depth);
            let lead = format!("{}{}", item.prefix, dimmed(item.connector, config));
            let dependents = loaded_dependents(graph, analysis, &item.id);

            if path.contains(&item.id) {
                writeln!(
                    w,
                    "{lead}{} {}",
                    colorize_id(&item.id.to_string(), true, config),
                    warning("[CIRCULAR]", config)
                )?;
                continue;
            }
            if expanded.contains(&item.id) && !dependents.is_empty() {
                writeln!(
                    w,
                    "{lead}{} {}",
                    label(graph, analysis, &item.id, config),
                    dimmed("[...]", config)
                )?;
                continue;
            }

            writeln!(w, "{lead}{}", label(graph, analysis, &item.id, config))?;
            expanded.insert(item.id);
            path.push(item.id);

            let child_prefix = if item.depth == 0 {
                String::new()
            } else {
                let segment = if item.last { space } else { pipe };
                format!("{}{}", item.prefix, dimmed(segment, config))
            };
            let count = dependents.len();
            for (i, dependent) in dependents.into_iter().enumerate().rev() {
                let last = i + 1 == count;
                stack.push(Item {
                    id: dependent,
                    depth: item.depth + 1,
                    prefix: child_prefix.clone(),
                    connector: if last { corner } else { branch },
                    last,
                });
            }
        }
        path.clear();
    }

    if !disconnected.is_empty() {
        writeln!(w)?;
        writeln!(w, "Disconnected Plans (no dependencies, not depended on):")?;
        for id in &disconnected {
            writeln!(w, "  {} {}", symbols.bullet, label(graph, analysis, id, config))?;
        }
    }

    let unreachable: Vec<PlanId> = ids
        .into_iter()
        .filter(|id| !expanded.contains(id) && !disconnected.contains(id))
        .collect();
    if !unreachable.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{}",
            warning("Unreachable Plans (blocked by circular dependencies):", config)
        )?;
        for id in &unreachable {
            writeln!(w, "  {} {}", symbols.bullet, label(graph, analysis, id, config))?;
        }
    }

    Ok(())
}

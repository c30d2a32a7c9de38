//! Markdown table of plans with their dependencies and dependents.

use std::io::{self, Write};

use super::truncate;
use crate::domain::{PlanId, WaveOrder};
use crate::graph::DependencyGraph;

const NAME_WIDTH: usize = 30;

fn cell(mut ids: Vec<PlanId>, order: WaveOrder) -> String {
    order.sort(&mut ids);
    if ids.is_empty() {
        return "None".to_string();
    }
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Write the dependency table, one row per loaded plan.
pub fn write_table<W: Write>(w: &mut W, graph: &DependencyGraph, order: WaveOrder) -> io::Result<()> {
    writeln!(w, "| Plan | Name | Tasks | Dependencies | Dependents |")?;
    writeln!(w, "|------|------|-------|--------------|------------|")?;

    for id in graph.ids(order) {
        let Some(plan) = graph.plan(&id) else {
            continue;
        };
        let name = truncate(&plan.name, NAME_WIDTH).replace('|', "\\|");
        writeln!(
            w,
            "| {id} | {name} | {} | {} | {} |",
            plan.task_count,
            cell(graph.forward(&id), order),
            cell(graph.reverse(&id), order)
        )?;
    }
    Ok(())
}

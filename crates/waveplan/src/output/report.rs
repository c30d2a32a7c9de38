//! Text reports: wave schedule, cycle listing and narrative analysis.

use std::io::{self, Write};

use super::OutputConfig;
use super::color::{Symbols, bold, colorize_id, dimmed, error, success, warning};
use crate::analysis::{Advice, Analysis, WaveEstimate};
use crate::domain::PlanId;
use crate::graph::{Cycle, DependencyGraph};

const RULE_WIDTH: usize = 60;
const SECTION_RULE_WIDTH: usize = 40;

fn join_ids(ids: &[PlanId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn format_cycle(cycle: &Cycle, symbols: &Symbols) -> String {
    cycle
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(&format!(" {} ", symbols.arrow))
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

/// Write the "no plans" outcome.
pub fn write_no_plans<W: Write>(w: &mut W, phase: u32, config: &OutputConfig) -> io::Result<()> {
    writeln!(
        w,
        "{}",
        warning(&format!("No plans found for phase {phase}"), config)
    )?;
    writeln!(w, "   Looking for: {phase}-*-PLAN.*")
}

// ============================================================================
// Wave Report
// ============================================================================

/// Write the wave execution report.
pub fn write_wave_report<W: Write>(
    w: &mut W,
    graph: &DependencyGraph,
    analysis: &Analysis,
    config: &OutputConfig,
) -> io::Result<()> {
    let symbols = Symbols::for_config(config);
    let width = config.content_width();
    let rule = "=".repeat(RULE_WIDTH.min(width));
    let section_rule = dimmed(&"-".repeat(SECTION_RULE_WIDTH.min(width)), config);

    writeln!(w)?;
    writeln!(w, "{rule}")?;
    writeln!(
        w,
        "{}",
        bold(
            &format!("{}WAVE EXECUTION PLAN - Phase {}", symbols.wave, analysis.phase),
            config
        )
    )?;
    writeln!(w, "{rule}")?;
    writeln!(w)?;

    // Plans
    writeln!(
        w,
        "{}",
        bold(
            &format!("{}PLANS ({} total)", symbols.plans, analysis.summary.total),
            config
        )
    )?;
    writeln!(w, "{section_rule}")?;
    for id in graph.ids(analysis.wave_order) {
        let Some(plan) = graph.plan(&id) else {
            continue;
        };
        let mut deps: Vec<PlanId> = plan.dependencies.iter().copied().collect();
        analysis.wave_order.sort(&mut deps);
        let deps_str = if deps.is_empty() {
            String::new()
        } else {
            let listed: Vec<String> = deps
                .iter()
                .map(|dep| {
                    if graph.contains(dep) {
                        dep.to_string()
                    } else {
                        format!("{dep} [not loaded]")
                    }
                })
                .collect();
            format!(" (depends on: {})", listed.join(", "))
        };
        let incomplete = if plan.is_incomplete() {
            format!(" {}", warning("(incomplete)", config))
        } else {
            String::new()
        };
        writeln!(
            w,
            "  {} {}: {} {}{}{}",
            symbols.bullet,
            colorize_id(&id.to_string(), analysis.in_cycle(&id), config),
            plan.task_count,
            plural(plan.task_count, "task", "tasks"),
            deps_str,
            incomplete
        )?;
    }
    writeln!(w)?;

    // Cycles
    if analysis.has_cycles() {
        writeln!(
            w,
            "{}",
            error(
                &format!("{}CIRCULAR DEPENDENCIES DETECTED!", symbols.alert),
                config
            )
        )?;
        for cycle in &analysis.cycles {
            writeln!(w, "   {}", format_cycle(cycle, &symbols))?;
        }
        writeln!(w)?;
    }

    // Waves
    let schedule = &analysis.schedule;
    writeln!(
        w,
        "{}",
        bold(
            &format!("{}EXECUTION WAVES ({} total)", symbols.wave, schedule.waves.len()),
            config
        )
    )?;
    writeln!(w, "{section_rule}")?;
    for wave in &schedule.waves {
        write_wave(w, wave, &symbols, config)?;
    }
    writeln!(w)?;
    writeln!(
        w,
        "  {}Total estimated time: ~{} minutes",
        symbols.clock, schedule.total_minutes
    )?;
    writeln!(w)?;

    // Strategy
    let strategy = &analysis.strategy;
    writeln!(
        w,
        "{}",
        bold(&format!("{}EXECUTION STRATEGY", symbols.chart), config)
    )?;
    writeln!(w, "{section_rule}")?;
    writeln!(
        w,
        "  {} Parallelizable plans: {}",
        symbols.bullet, strategy.parallelizable
    )?;
    writeln!(w, "  {} Waves: {}", symbols.bullet, strategy.waves)?;
    writeln!(
        w,
        "  {} Sequential waves: {}",
        symbols.bullet, strategy.sequential_waves
    )?;
    writeln!(
        w,
        "  {} Parallelization efficiency: {}%",
        symbols.bullet, strategy.efficiency_percent
    )?;

    match strategy.advice {
        Some(Advice::AllSequential) => {
            writeln!(w)?;
            let lead = format!("  {}Tip: ", symbols.tip);
            let options = textwrap::Options::new(width)
                .initial_indent(&lead)
                .subsequent_indent("     ");
            for line in textwrap::wrap(Advice::AllSequential.message(), options) {
                writeln!(w, "{}", warning(&line, config))?;
            }
        }
        Some(Advice::AllParallel) => {
            writeln!(w)?;
            writeln!(
                w,
                "  {}",
                success(
                    &format!("{}{}", symbols.check, Advice::AllParallel.message()),
                    config
                )
            )?;
        }
        None => {}
    }

    writeln!(w)?;
    writeln!(w, "{rule}")?;
    Ok(())
}

fn write_wave<W: Write>(
    w: &mut W,
    wave: &WaveEstimate,
    symbols: &Symbols,
    config: &OutputConfig,
) -> io::Result<()> {
    let kind = if wave.stalled {
        warning("(blocked by cycle)", config)
    } else if wave.plans.len() > 1 {
        "(parallel)".to_string()
    } else {
        "(sequential)".to_string()
    };

    writeln!(w)?;
    writeln!(w, "  WAVE {} {}:", wave.number, kind)?;
    for plan in &wave.plans {
        let marker = if plan.in_cycle {
            format!(" {}", error(symbols.cycle, config))
        } else {
            String::new()
        };
        writeln!(
            w,
            "    {} {}: {} {}, ~{} min{}",
            symbols.bullet,
            colorize_id(&plan.id.to_string(), plan.in_cycle, config),
            plan.task_count,
            plural(plan.task_count, "task", "tasks"),
            plan.minutes,
            marker
        )?;
    }
    writeln!(
        w,
        "    {}",
        dimmed(
            &format!("{} Wave duration: ~{} min", symbols.wave_end, wave.minutes),
            config
        )
    )
}

// ============================================================================
// Cycle Listing
// ============================================================================

/// Write the detected cycles and the plans they block.
pub fn write_cycles<W: Write>(
    w: &mut W,
    analysis: &Analysis,
    config: &OutputConfig,
) -> io::Result<()> {
    let symbols = Symbols::for_config(config);

    if !analysis.has_cycles() {
        return writeln!(
            w,
            "{}",
            success(
                &format!(
                    "{}No circular dependencies in phase {}",
                    symbols.check, analysis.phase
                ),
                config
            )
        );
    }

    let count = analysis.cycles.len();
    writeln!(
        w,
        "{}",
        error(
            &format!(
                "{}Found {count} circular {} in phase {}:",
                symbols.alert,
                plural(count, "dependency", "dependencies"),
                analysis.phase
            ),
            config
        )
    )?;
    for (i, cycle) in analysis.cycles.iter().enumerate() {
        writeln!(w, "  {}. {}", i + 1, format_cycle(cycle, &symbols))?;
    }

    if let Some(stalled) = analysis.waves.iter().find(|wave| wave.stalled) {
        writeln!(w)?;
        writeln!(w, "Blocked plans: {}", join_ids(&stalled.plans))?;
    }
    Ok(())
}

// ============================================================================
// Narrative Analysis
// ============================================================================

/// Write the dependency analysis as a markdown document.
pub fn write_analysis<W: Write>(
    w: &mut W,
    graph: &DependencyGraph,
    analysis: &Analysis,
    config: &OutputConfig,
) -> io::Result<()> {
    let symbols = Symbols::for_config(config);
    let summary = &analysis.summary;

    writeln!(w, "# Dependency Analysis: Phase {}", analysis.phase)?;
    writeln!(w)?;
    writeln!(w, "**Total Plans**: {}", summary.total)?;
    writeln!(
        w,
        "**Independent**: {} (can start immediately)",
        summary.independent
    )?;
    writeln!(w, "**Has Dependencies**: {}", summary.with_dependencies)?;
    if !summary.incomplete.is_empty() {
        writeln!(
            w,
            "**Incomplete (no tasks)**: {}",
            join_ids(&summary.incomplete)
        )?;
    }
    if !summary.dangling.is_empty() {
        let listed: Vec<String> = summary
            .dangling
            .iter()
            .map(|d| format!("{} {} {}", d.plan, symbols.arrow, d.missing))
            .collect();
        writeln!(w, "**Dependencies Outside Phase**: {}", listed.join(", "))?;
    }
    writeln!(w)?;

    // Critical path
    let path = &analysis.critical_path;
    writeln!(w, "## Critical Path Analysis")?;
    writeln!(w)?;
    writeln!(
        w,
        "**Maximum Dependency Depth**: {} {}",
        path.max_depth,
        plural(path.max_depth, "level", "levels")
    )?;
    writeln!(w, "**Deepest Plans**: {}", join_ids(&path.deepest))?;
    if !path.undefined.is_empty() {
        writeln!(
            w,
            "**Undefined Depth (reach a cycle)**: {}",
            join_ids(&path.undefined)
        )?;
    }
    writeln!(
        w,
        "**Estimated Duration**: ~{} minutes over {} {}",
        analysis.schedule.total_minutes,
        analysis.strategy.waves,
        plural(analysis.strategy.waves, "wave", "waves")
    )?;
    writeln!(w)?;

    // Bottlenecks
    writeln!(w, "## Bottleneck Plans")?;
    writeln!(w)?;
    if analysis.bottlenecks.is_empty() {
        writeln!(w, "No bottlenecks - plans are independent!")?;
    } else {
        let intro = "Plans that many others depend on (finish these first!):";
        for line in textwrap::wrap(intro, config.content_width()) {
            writeln!(w, "{line}")?;
        }
        writeln!(w)?;
        for bottleneck in &analysis.bottlenecks {
            let name = graph
                .plan(&bottleneck.id)
                .map_or(waveplan_doc::UNKNOWN_PLAN_NAME, |plan| plan.name.as_str());
            writeln!(
                w,
                "- **{}** ({}): {} {} on this",
                bottleneck.id,
                name,
                bottleneck.dependents,
                plural(bottleneck.dependents, "plan depends", "plans depend")
            )?;
        }
    }
    writeln!(w)?;

    // Cycles
    if analysis.has_cycles() {
        writeln!(w, "## {}Circular Dependencies Detected", symbols.alert)?;
        writeln!(w)?;
        for (i, cycle) in analysis.cycles.iter().enumerate() {
            writeln!(w, "{}. {}", i + 1, format_cycle(cycle, &symbols))?;
        }
        writeln!(w)?;
    }

    Ok(())
}

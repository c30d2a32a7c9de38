//! Command execution logic.
//!
//! Every command loads one phase, runs the analysis and renders the result.
//! Renderers write into a buffer so the same bytes can go to stdout or to a
//! file given with `--output`.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::args::{AnalyzeArgs, CyclesArgs, GraphArgs, WavesArgs};
use super::types::FormatArg;
use crate::analysis::{Analysis, AnalysisOptions};
use crate::app::App;
use crate::loader::LoadedPhase;
use crate::output::json::{AnalysisJson, CyclesJson, GraphJson, NoPlansJson, WavesJson};
use crate::output::{self, OutputConfig, OutputMode, color};

/// How a command finished, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Analysis completed without circular dependencies
    Clean,
    /// The phase has no plan documents
    NoPlans,
    /// Circular dependencies were detected
    CyclesFound,
}

impl Outcome {
    /// Process exit status for this outcome.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Clean | Self::NoPlans => 0,
            Self::CyclesFound => 1,
        }
    }

    fn of(analysis: &Analysis) -> Self {
        if analysis.has_cycles() {
            Self::CyclesFound
        } else {
            Self::Clean
        }
    }
}

/// A loaded, non-empty phase and its analysis.
struct Analyzed {
    phase: LoadedPhase,
    analysis: Analysis,
}

/// Load `phase`, surface its warnings and analyse it.
///
/// Returns `None` after reporting the NoPlans outcome.
async fn load_and_analyze(
    app: &App,
    phase: u32,
    options: AnalysisOptions,
    output_mode: OutputMode,
    config: &OutputConfig,
) -> Result<Option<Analyzed>> {
    let loaded = app.load_phase(phase).await?;

    if output_mode == OutputMode::Text {
        output::print_warnings(&loaded.warnings, config)?;
    }

    if loaded.is_empty() {
        tracing::info!(phase, dir = %app.planning_dir().display(), "No plans found");
        match output_mode {
            OutputMode::Json => output::print_json(&NoPlansJson::new(phase, &loaded.warnings))?,
            OutputMode::Text => {
                let mut stdout = io::stdout().lock();
                output::report::write_no_plans(&mut stdout, phase, config)?;
            }
        }
        return Ok(None);
    }

    let analysis = Analysis::run(phase, &loaded.graph, options);
    tracing::debug!(
        phase,
        plans = loaded.graph.len(),
        cycles = analysis.cycles.len(),
        waves = analysis.waves.len(),
        "Analysed phase"
    );

    Ok(Some(Analyzed {
        phase: loaded,
        analysis,
    }))
}

/// Send rendered bytes to stdout, or to `path` when given.
async fn emit(
    rendered: Vec<u8>,
    path: Option<&Path>,
    output_mode: OutputMode,
    config: &OutputConfig,
) -> Result<()> {
    match path {
        Some(path) => {
            tokio::fs::write(path, &rendered)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::debug!(path = %path.display(), bytes = rendered.len(), "Wrote output file");

            match output_mode {
                OutputMode::Json => output::print_json(&serde_json::json!({
                    "output": path.display().to_string(),
                }))?,
                OutputMode::Text => println!(
                    "{}",
                    color::success(&format!("Output saved to: {}", path.display()), config)
                ),
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&rendered)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Renderings written to a file never carry color codes.
fn render_config(config: &OutputConfig, path: Option<&Path>) -> OutputConfig {
    if path.is_some() {
        config.plain()
    } else {
        config.clone()
    }
}

/// Execute the waves command
pub async fn execute_waves(app: &App, args: &WavesArgs, output_mode: OutputMode) -> Result<Outcome> {
    let config = OutputConfig::from_env();

    let mut options = app.config().analysis_options();
    if let Some(order) = args.order {
        options.order = order.into();
    }
    if let Some(minutes) = args.minutes_per_task {
        options.minutes_per_task = minutes;
    }

    let Some(Analyzed { phase, analysis }) =
        load_and_analyze(app, args.phase, options, output_mode, &config).await?
    else {
        return Ok(Outcome::NoPlans);
    };

    match output_mode {
        OutputMode::Json => {
            output::print_json(&WavesJson::new(&phase.graph, &analysis, &phase.warnings))?;
        }
        OutputMode::Text => {
            let mut buf = Vec::new();
            output::report::write_wave_report(&mut buf, &phase.graph, &analysis, &config)?;
            emit(buf, None, output_mode, &config).await?;
        }
    }

    Ok(Outcome::of(&analysis))
}

/// Execute the cycles command
pub async fn execute_cycles(
    app: &App,
    args: &CyclesArgs,
    output_mode: OutputMode,
) -> Result<Outcome> {
    let config = OutputConfig::from_env();
    let options = app.config().analysis_options();

    let Some(Analyzed { phase, analysis }) =
        load_and_analyze(app, args.phase, options, output_mode, &config).await?
    else {
        return Ok(Outcome::NoPlans);
    };

    match output_mode {
        OutputMode::Json => output::print_json(&CyclesJson::new(&analysis, &phase.warnings))?,
        OutputMode::Text => {
            let mut buf = Vec::new();
            output::report::write_cycles(&mut buf, &analysis, &config)?;
            emit(buf, None, output_mode, &config).await?;
        }
    }

    Ok(Outcome::of(&analysis))
}

/// Execute the graph command
pub async fn execute_graph(app: &App, args: &GraphArgs, output_mode: OutputMode) -> Result<Outcome> {
    let config = OutputConfig::from_env();
    let options = app.config().analysis_options();

    let Some(Analyzed { phase, analysis }) =
        load_and_analyze(app, args.phase, options, output_mode, &config).await?
    else {
        return Ok(Outcome::NoPlans);
    };

    let path = args.output.as_deref();
    let render = render_config(&config, path);
    let graph = &phase.graph;

    let mut buf = Vec::new();
    match output_mode {
        OutputMode::Json => {
            output::write_json(&mut buf, &GraphJson::new(graph, &analysis, &phase.warnings))?;
        }
        OutputMode::Text => match args.format {
            FormatArg::Ascii => {
                output::tree::write_dependency_tree(&mut buf, graph, &analysis, &render)?;
            }
            FormatArg::Mermaid => output::diagram::write_mermaid(&mut buf, graph, &analysis)?,
            FormatArg::Dot => output::diagram::write_dot(&mut buf, graph, &analysis)?,
            FormatArg::Table => output::table::write_table(&mut buf, graph, analysis.wave_order)?,
        },
    }
    emit(buf, path, output_mode, &config).await?;

    Ok(Outcome::of(&analysis))
}

/// Execute the analyze command
pub async fn execute_analyze(
    app: &App,
    args: &AnalyzeArgs,
    output_mode: OutputMode,
) -> Result<Outcome> {
    let config = OutputConfig::from_env();

    let mut options = app.config().analysis_options();
    if let Some(order) = args.order {
        options.order = order.into();
    }

    let Some(Analyzed { phase, analysis }) =
        load_and_analyze(app, args.phase, options, output_mode, &config).await?
    else {
        return Ok(Outcome::NoPlans);
    };

    let path = args.output.as_deref();
    let render = render_config(&config, path);

    let mut buf = Vec::new();
    match output_mode {
        OutputMode::Json => output::write_json(
            &mut buf,
            &AnalysisJson {
                analysis: &analysis,
                warnings: &phase.warnings,
            },
        )?,
        OutputMode::Text => {
            output::report::write_analysis(&mut buf, &phase.graph, &analysis, &render)?;
        }
    }
    emit(buf, path, output_mode, &config).await?;

    Ok(Outcome::of(&analysis))
}

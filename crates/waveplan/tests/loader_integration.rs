//! Integration tests for loading a phase from a planning directory and
//! analysing it through the library API.

use rstest::rstest;
use tempfile::TempDir;

use waveplan::analysis::{Analysis, AnalysisOptions};
use waveplan::app::App;
use waveplan::domain::PlanId;
use waveplan::error::Error;
use waveplan::graph::calculate_waves;
use waveplan::loader::{DirectorySource, LoadWarning, load_phase};

mod common;
use common::Project;

fn id(phase: u32, sequence: u32) -> PlanId {
    PlanId::new(phase, sequence)
}

fn wave_ids(analysis: &Analysis) -> Vec<Vec<PlanId>> {
    analysis.waves.iter().map(|w| w.plans.clone()).collect()
}

#[tokio::test]
async fn test_round_trip_three_plans() {
    let project = Project::new()
        .plan(1, 1, "Schema", 1, &[])
        .plan(1, 2, "API", 1, &["Plan 1"])
        .plan(1, 3, "UI", 1, &["Plan 1", "Plan 2"]);

    let source = DirectorySource::open(&project.planning_dir()).await.unwrap();
    let loaded = load_phase(&source, 1).await.unwrap();

    assert!(loaded.warnings.is_empty());
    let analysis = Analysis::run(1, &loaded.graph, AnalysisOptions::default());
    assert!(analysis.cycles.is_empty());
    assert_eq!(
        wave_ids(&analysis),
        vec![vec![id(1, 1)], vec![id(1, 2)], vec![id(1, 3)]]
    );
}

#[tokio::test]
async fn test_only_requested_phase_is_loaded() {
    let project = Project::new()
        .plan(1, 1, "Phase one", 1, &[])
        .plan(2, 1, "Phase two", 1, &["Phase 1 Plan 1"])
        .plan(2, 2, "Phase two again", 1, &["Plan 1"])
        .file("ROADMAP.md", "# Roadmap")
        .file("2-1-SUMMARY.md", "done");

    let source = DirectorySource::open(&project.planning_dir()).await.unwrap();
    let loaded = load_phase(&source, 2).await.unwrap();

    assert_eq!(loaded.graph.ids(Default::default()), vec![id(2, 1), id(2, 2)]);
    assert_eq!(loaded.graph.forward(&id(2, 1)), vec![id(1, 1)]);
    assert_eq!(loaded.graph.forward(&id(2, 2)), vec![id(2, 1)]);

    // The cross-phase dependency is dangling and never blocks
    let waves = calculate_waves(&loaded.graph, Default::default());
    assert_eq!(waves[0].plans, vec![id(2, 1)]);
    assert_eq!(loaded.graph.dangling().len(), 1);
}

#[tokio::test]
async fn test_empty_phase_is_no_plans() {
    let project = Project::new();

    let source = DirectorySource::open(&project.planning_dir()).await.unwrap();
    let loaded = load_phase(&source, 1).await.unwrap();

    assert!(loaded.is_empty());
    let analysis = Analysis::run(1, &loaded.graph, AnalysisOptions::default());
    assert!(analysis.cycles.is_empty());
    assert!(analysis.waves.is_empty());
}

#[tokio::test]
async fn test_missing_directory_is_not_found() {
    let temp = TempDir::new().unwrap();
    let result = DirectorySource::open(&temp.path().join(".planning")).await;

    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn test_duplicate_ids_keep_first_file() {
    let project = Project::new()
        .file("1-1-PLAN.md", "<phase_name>Markdown</phase_name>")
        .file("1-1-PLAN.xml", "<phase_name>Xml</phase_name>");

    let source = DirectorySource::open(&project.planning_dir()).await.unwrap();
    let loaded = load_phase(&source, 1).await.unwrap();

    assert_eq!(loaded.graph.len(), 1);
    assert_eq!(loaded.graph.plan(&id(1, 1)).unwrap().name, "Markdown");
    assert!(matches!(
        &loaded.warnings[..],
        [LoadWarning::DuplicatePlan { file, kept, .. }] if file == "1-1-PLAN.xml" && kept == "1-1-PLAN.md"
    ));
}

#[rstest]
#[case::malformed("<dependencies>Plan two</dependencies>", "malformed_reference")]
#[case::mismatch("<plan phase=\"3\" plan=\"1\">", "metadata_mismatch")]
#[tokio::test]
async fn test_document_warnings_are_collected(#[case] content: &str, #[case] kind: &str) {
    let project = Project::new().file("1-1-PLAN.md", content);

    let source = DirectorySource::open(&project.planning_dir()).await.unwrap();
    let loaded = load_phase(&source, 1).await.unwrap();

    assert_eq!(loaded.graph.len(), 1);
    assert_eq!(loaded.warnings.len(), 1);
    assert_eq!(loaded.warnings[0].file(), "1-1-PLAN.md");
    assert_eq!(loaded.warnings[0].kind(), kind);
}

#[tokio::test]
async fn test_app_applies_config() {
    let project = Project::new()
        .plan(1, 2, "Two", 2, &[])
        .plan(1, 10, "Ten", 1, &[])
        .file("waveplan.yaml", "wave-order: lexical\nminutes-per-task: 7\n");

    let app = App::open(project.path()).await.unwrap();
    let loaded = app.load_phase(1).await.unwrap();
    let analysis = Analysis::run(1, &loaded.graph, app.config().analysis_options());

    assert_eq!(wave_ids(&analysis), vec![vec![id(1, 10), id(1, 2)]]);
    assert_eq!(analysis.schedule.total_minutes, 14);
}

#[tokio::test]
async fn test_app_rejects_unknown_config_keys() {
    let project = Project::new().file("waveplan.yaml", "minutes_per_tasks: 3\n");

    let result = App::open(project.path()).await;
    assert!(matches!(result, Err(Error::Config(_))));
}

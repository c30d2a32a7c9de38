//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Render a plan document body.
///
/// `deps` are written as `<complete>` references inside `<dependencies>`,
/// exactly as given (`"Plan 1"`, `"Phase 0 Plan 2"`, ...).
pub fn plan_document(phase: u32, plan: u32, name: &str, tasks: usize, deps: &[&str]) -> String {
    let mut doc = format!("<plan phase=\"{phase}\" plan=\"{plan}\">\n");
    doc.push_str(&format!("  <overview>\n    <phase_name>{name}</phase_name>\n  </overview>\n"));
    doc.push_str("  <dependencies>\n");
    for dep in deps {
        doc.push_str(&format!("    <complete>{dep}</complete>\n"));
    }
    doc.push_str("  </dependencies>\n  <tasks>\n");
    for i in 1..=tasks {
        doc.push_str(&format!(
            "    <task type=\"auto\" priority=\"1\"><name>Task {i}</name></task>\n"
        ));
    }
    doc.push_str("  </tasks>\n</plan>\n");
    doc
}

/// A temporary project with a `.planning/` directory.
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// Create a project with an empty planning directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(dir.path().join(".planning")).expect("Failed to create .planning");
        Self { dir }
    }

    /// Add `{phase}-{plan}-PLAN.md`.
    pub fn plan(self, phase: u32, plan: u32, name: &str, tasks: usize, deps: &[&str]) -> Self {
        let file = format!("{phase}-{plan}-PLAN.md");
        self.file(&file, &plan_document(phase, plan, name, tasks, deps))
    }

    /// Add an arbitrary file to the planning directory.
    pub fn file(self, name: &str, content: &str) -> Self {
        fs::write(self.planning_dir().join(name), content).expect("Failed to write plan file");
        self
    }

    /// The project root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The `.planning/` directory.
    pub fn planning_dir(&self) -> PathBuf {
        self.dir.path().join(".planning")
    }

    /// Run the binary with the project root as working directory.
    pub fn run(&self, args: &[&str]) -> Output {
        run_waveplan_in_dir(self.path(), args)
    }
}

/// Run the waveplan binary in `dir` with stable, uncolored output.
pub fn run_waveplan_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_waveplan"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env("WAVEPLAN_ASCII", "1")
        .env_remove("WAVEPLAN_COLOR")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute waveplan binary")
}

/// Stdout of a finished run as text.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished run as text.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

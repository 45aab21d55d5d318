//! Common test utilities for tm integration tests.
//!
//! Provides `TestEnv`, a throwaway project directory with helpers to lay out
//! a task manager root, plans and tasks the way the scaffolding tool does.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment rooted in its own temporary project directory.
///
/// The `tm()` method returns a `Command` that runs in the project directory
/// with `TM_DIR` and `TM_DEBUG` cleared, so the caller's shell cannot leak in.
pub struct TestEnv {
    pub project_dir: TempDir,
}

impl TestEnv {
    /// Create a new, empty project directory.
    pub fn new() -> Self {
        Self {
            project_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a project directory with a valid task manager root.
    pub fn init() -> Self {
        let env = Self::new();
        env.write_marker(r#"{"version": "1.0.0", "timestamp": "2025-01-01T00:00:00Z"}"#);
        env
    }

    /// Get a Command for the tm binary running in the project directory.
    pub fn tm(&self) -> Command {
        self.tm_in(self.path())
    }

    /// Get a Command for the tm binary running in `dir`.
    pub fn tm_in(&self, dir: &Path) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tm"));
        cmd.current_dir(dir);
        cmd.env_remove("TM_DIR");
        cmd.env_remove("TM_DEBUG");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Get the path to the project directory.
    pub fn path(&self) -> &Path {
        self.project_dir.path()
    }

    /// Get the path to the task manager root.
    pub fn root(&self) -> PathBuf {
        self.path().join(".ai/task-manager")
    }

    /// Write the root marker file with the given contents.
    pub fn write_marker(&self, contents: &str) {
        fs::create_dir_all(self.root()).unwrap();
        fs::write(self.root().join(".init-metadata.json"), contents).unwrap();
    }

    /// Create a plan in the container layout and return its document path.
    ///
    /// `area` is `plans` or `archive`; `dir_id` is the ID as written in the
    /// directory and file names.
    pub fn add_plan(&self, area: &str, dir_id: &str, slug: &str, header_id: &str) -> PathBuf {
        let container = self.root().join(area).join(format!("{}--{}", dir_id, slug));
        fs::create_dir_all(&container).unwrap();
        let document = container.join(format!("plan-{}--{}.md", dir_id, slug));
        fs::write(&document, plan_text(header_id, slug)).unwrap();
        document
    }

    /// Create a plan in the legacy flat layout and return its document path.
    pub fn add_legacy_plan(&self, area: &str, dir_id: &str, slug: &str, header_id: &str) -> PathBuf {
        let dir = self.root().join(area);
        fs::create_dir_all(&dir).unwrap();
        let document = dir.join(format!("plan-{}--{}.md", dir_id, slug));
        fs::write(&document, plan_text(header_id, slug)).unwrap();
        document
    }

    /// Create a task inside a plan container and return its document path.
    pub fn add_task(&self, plan_document: &Path, file_id: &str, slug: &str) -> PathBuf {
        let tasks = plan_document.parent().unwrap().join("tasks");
        fs::create_dir_all(&tasks).unwrap();
        let document = tasks.join(format!("{}--{}.md", file_id, slug));
        fs::write(
            &document,
            format!(
                "---\nid: {}\ngroup: \"{}\"\ndependencies: []\nstatus: \"pending\"\n---\n# {}\n",
                file_id, slug, slug
            ),
        )
        .unwrap();
        document
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn plan_text(header_id: &str, slug: &str) -> String {
    format!(
        "---\nid: {}\nsummary: \"{}\"\ncreated: 2025-01-01\n---\n# Plan: {}\n\n## Overview\n\nWork.\n",
        header_id, slug, slug
    )
}

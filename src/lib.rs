//! Taskmeta - the metadata engine behind the AI task manager.
//!
//! This library locates a project's task-manager root, parses the frontmatter
//! header of plan and task documents, resolves plans by ID or path, allocates
//! new IDs and rewrites single header fields in place. The `tm` binary exposes
//! these operations as one-shot commands.

pub mod cli;
pub mod commands;
pub mod config;
pub mod header;
pub mod models;
pub mod storage;

use std::path::PathBuf;


/// Library-level error type for taskmeta operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No task manager root found from {} (looked for .ai/task-manager/.init-metadata.json)", .start.display())]
    RootNotFound { start: PathBuf },

    #[error("Plan ID {id} not found — Available plans: {}", format_available(.available))]
    PlanNotFound { id: u64, available: Vec<u64> },

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("No frontmatter found in {}", .0.display())]
    NoFrontmatter(PathBuf),

    #[error("{field} must be {expected}, got \"{got}\"")]
    InvalidValue {
        field: &'static str,
        expected: String,
        got: String,
    },

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Destination already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn format_available(ids: &[u64]) -> String {
    if ids.is_empty() {
        return "none".to_string();
    }
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for taskmeta operations.
pub type Result<T> = std::result::Result<T, Error>;

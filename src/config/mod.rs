//! Configuration for the task-manager metadata engine.
//!
//! ## Root marker - `.init-metadata.json`
//!
//! Located at `<project>/.ai/task-manager/.init-metadata.json` and written by
//! the scaffolding step. Contains:
//! - `version` - Required, non-empty version string
//! - `timestamp` - Optional ISO 8601 timestamp of initialization
//!
//! A directory whose marker is missing, unparsable or lacks a `version` is not
//! a valid root.
//!
//! ## Environment
//!
//! - `TM_DIR` - Start directory for root discovery (same as `-C/--dir`)
//! - `TM_DEBUG` - Truthy value enables step-by-step trace output on stderr

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Directory, relative to a project, that holds the task-manager root.
pub const ROOT_DIR: &str = ".ai/task-manager";

/// Marker file name directly under the root.
pub const MARKER_FILE: &str = ".init-metadata.json";

/// Environment variable overriding the start directory.
pub const DIR_ENV: &str = "TM_DIR";

/// Environment variable enabling debug traces.
pub const DEBUG_ENV: &str = "TM_DEBUG";

/// Contents of the root marker file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootMetadata {
    /// Version of the scaffolding that created this root
    pub version: String,

    /// When the root was initialized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl RootMetadata {
    /// Load the marker from a root directory.
    ///
    /// Fails when the file is missing or is not a JSON object with a string
    /// `version`. An empty version parses but is rejected by [`Self::is_valid`].
    pub fn load(root: &Path) -> Result<Self> {
        let contents = fs::read_to_string(root.join(MARKER_FILE))?;
        let meta: RootMetadata = serde_json::from_str(&contents)?;
        Ok(meta)
    }

    /// Whether this marker identifies a usable root.
    pub fn is_valid(&self) -> bool {
        !self.version.trim().is_empty()
    }
}

/// Whether the debug toggle is set in the environment.
pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

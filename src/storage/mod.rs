//! Filesystem-backed record storage for the task manager.
//!
//! A project keeps its records under a root directory:
//!
//! ```text
//! <project>/.ai/task-manager/
//!   .init-metadata.json          root marker ({"version": ...})
//!   plans/
//!     01--auth/plan-01--auth.md  container layout
//!     01--auth/tasks/01--schema.md
//!     plan-02--legacy.md         legacy flat layout
//!   archive/
//!     03--done/plan-03--done.md
//! ```
//!
//! Nothing is cached: every call re-reads the tree.
//!
//! - [`find_root`] discovers the nearest valid root above a directory
//! - [`scanner`] enumerates plan and task records in both layouts
//! - [`resolver`] looks up one plan by ID or path
//! - [`allocator`] computes the next free ID
//! - [`archive`] moves a finished plan into the archive

pub mod allocator;
pub mod archive;
pub mod consistency;
pub mod resolver;
pub mod scanner;

pub use allocator::{next_id, next_plan_id, next_task_id};
pub use archive::archive_plan;
pub use consistency::IdSources;
pub use resolver::{ResolvedPlan, find_plan, plan_ids, require_plan, resolve_plan, resolve_plan_path};
pub use scanner::list_records;

use crate::config::{MARKER_FILE, ROOT_DIR, RootMetadata};
use crate::models::RecordKind;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Whether `root` holds a readable marker with a non-empty version.
///
/// Unreadable or malformed markers count as "not a root".
pub fn is_valid_root(root: &Path) -> bool {
    match RootMetadata::load(root) {
        Ok(meta) if meta.is_valid() => true,
        Ok(_) => {
            tracing::debug!(root = %root.display(), "marker has an empty version");
            false
        }
        Err(e) => {
            if root.join(MARKER_FILE).exists() {
                tracing::debug!(root = %root.display(), error = %e, "marker is unusable");
            }
            false
        }
    }
}

/// Find the task-manager root for `start`.
///
/// `start` may be a directory or a document path. A document inside the
/// conventional layout resolves directly to its root. Otherwise each ancestor
/// is checked for `.ai/task-manager` with a valid marker, nearest first.
pub fn find_root(start: &Path) -> Option<PathBuf> {
    let start = absolutize(start);

    if let Some(root) = root_from_document_path(&start) {
        tracing::debug!(root = %root.display(), "root found from document path");
        return Some(root);
    }

    let first = if start.is_file() {
        start.parent().unwrap_or(start.as_path())
    } else {
        start.as_path()
    };

    for dir in first.ancestors() {
        let candidate = dir.join(ROOT_DIR);
        tracing::debug!(candidate = %candidate.display(), "checking for root");
        if is_valid_root(&candidate) {
            tracing::debug!(root = %candidate.display(), "root found");
            return Some(candidate);
        }
    }

    tracing::debug!(start = %start.display(), "no root found");
    None
}

/// Derive the root lexically from a path shaped like
/// `<root>/<area>/[<id>--<name>/[tasks/]]<document>.md`.
///
/// Only the marker's existence is checked on disk.
fn root_from_document_path(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    if !name.ends_with(".md") {
        return None;
    }

    let kind = [RecordKind::Plan, RecordKind::Task]
        .into_iter()
        .find(|kind| scanner::document_id(*kind, name).is_some())?;

    let mut dir = path.parent()?;
    if kind == RecordKind::Task {
        if scanner::container_id(dir_name(dir)?).is_some() {
            dir = dir.parent()?;
        }
        if dir_name(dir)? != "tasks" {
            return None;
        }
        dir = dir.parent()?;
    }

    if scanner::container_id(dir_name(dir)?).is_some() {
        dir = dir.parent()?;
    }

    let area = dir_name(dir)?;
    let is_area = RecordKind::Plan.areas().iter().any(|(_, name)| *name == area);
    if !is_area {
        return None;
    }

    let root = dir.parent()?;
    root.join(MARKER_FILE).is_file().then(|| root.to_path_buf())
}

fn dir_name(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()
}

/// Make `path` absolute against the current directory and resolve `.` and
/// `..` parts, so the ancestor walk only visits real parents.
///
/// Existing paths are canonicalized; others are normalized lexically.
fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    if !joined.components().any(|c| c == Component::ParentDir) {
        return joined
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
    }
    fs::canonicalize(&joined).unwrap_or_else(|_| normalize(&joined))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

//! Moving finished plans into the archive area.
//!
//! The move is a single `rename` of the container directory (or the legacy
//! file), so the plan is either fully in `plans/` or fully in `archive/`.

use super::scanner::list_records;
use crate::models::{Area, RecordDescriptor, RecordKind};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Archive an active plan and return its new document path.
pub fn archive_plan(root: &Path, plan: &RecordDescriptor) -> Result<PathBuf> {
    if plan.area == Area::Archived {
        return Err(Error::InvalidInput(format!(
            "Plan {} is already archived",
            plan.id
        )));
    }

    let archived = list_records(root, RecordKind::Plan)
        .into_iter()
        .any(|record| record.area == Area::Archived && record.id == plan.id);
    if archived {
        return Err(Error::InvalidInput(format!(
            "Plan ID {} already exists in the archive",
            plan.id
        )));
    }

    let source = plan.container.as_deref().unwrap_or(&plan.document);
    let name = source
        .file_name()
        .ok_or_else(|| Error::InvalidInput(format!("invalid plan path: {}", source.display())))?;
    let archive_dir = root.join("archive");
    let destination = archive_dir.join(name);
    if destination.exists() {
        return Err(Error::AlreadyExists(destination));
    }

    fs::create_dir_all(&archive_dir)?;
    fs::rename(source, &destination)?;
    tracing::debug!(from = %source.display(), to = %destination.display(), "plan archived");

    let document = match &plan.container {
        Some(_) => destination.join(plan.document.file_name().unwrap_or_default()),
        None => destination,
    };
    Ok(document)
}

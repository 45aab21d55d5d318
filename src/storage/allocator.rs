//! Next-ID allocation for plans and tasks.
//!
//! The next ID is one more than the highest ID found in any area and layout.
//! Gaps and duplicates are normal. Two concurrent callers may be handed the
//! same ID; creating the record on disk is what claims it.

use super::scanner::list_records;
use crate::models::{RecordDescriptor, RecordKind};
use std::path::Path;

/// Next free ID for `kind` under `scope`, starting at 1.
pub fn next_id(scope: &Path, kind: RecordKind) -> u64 {
    let next = list_records(scope, kind)
        .iter()
        .map(|record| record.id)
        .max()
        .map_or(1, |max| max.saturating_add(1));
    tracing::debug!(scope = %scope.display(), %kind, next, "allocated ID");
    next
}

/// Next free plan ID across the active and archived areas of `root`.
pub fn next_plan_id(root: &Path) -> u64 {
    next_id(root, RecordKind::Plan)
}

/// Next free task ID within one plan.
///
/// A legacy flat plan has no container and therefore no tasks yet.
pub fn next_task_id(plan: &RecordDescriptor) -> u64 {
    match &plan.container {
        Some(container) => next_id(container, RecordKind::Task),
        None => 1,
    }
}

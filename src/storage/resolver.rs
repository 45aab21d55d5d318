//! Plan lookup by numeric ID or by document path.
//!
//! IDs are compared numerically, so `2`, `02` and `002` all match a
//! container named `02--name`. When the same ID exists in both areas the
//! active plan is returned.

use super::scanner::{self, list_records, read_id_sources};
use super::find_root;
use crate::models::{Area, PlanRef, RecordDescriptor, RecordKind};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Header field a plan document must carry to be resolved by path.
pub const REQUIRED_FIELD: &str = "created";

/// A plan together with the root it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlan {
    pub root: PathBuf,
    pub record: RecordDescriptor,
}

/// Resolve a plan reference, discovering the root from `start`.
///
/// Returns `None` when no root is found or no plan matches.
pub fn resolve_plan(plan: &PlanRef, start: &Path) -> Option<ResolvedPlan> {
    match plan {
        PlanRef::Path(path) => {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                start.join(path)
            };
            resolve_plan_path(&path)
        }
        PlanRef::Id(id) => {
            let root = find_root(start)?;
            let record = find_plan(&root, *id)?;
            Some(ResolvedPlan { root, record })
        }
    }
}

/// Resolve a plan from its document path.
///
/// The document must exist, have a header with a `created` field, yield an
/// ID from its header, file name or container, and sit below a valid root.
pub fn resolve_plan_path(path: &Path) -> Option<ResolvedPlan> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "plan document does not exist");
        return None;
    }

    let container = path
        .parent()
        .filter(|dir| {
            dir.file_name()
                .and_then(|name| name.to_str())
                .and_then(scanner::container_id)
                .is_some()
        })
        .map(Path::to_path_buf);

    let (sources, document) = read_id_sources(RecordKind::Plan, path, container.as_deref())?;
    if !document.has_header || document.get(REQUIRED_FIELD).is_none() {
        tracing::debug!(path = %path.display(), "plan document lacks a header with `{}`", REQUIRED_FIELD);
        return None;
    }
    sources.report(path);
    let id = sources.resolved()?;

    let root = find_root(path)?;
    let area = area_of(&root, path);
    tracing::debug!(id, %area, root = %root.display(), "resolved plan from path");

    Some(ResolvedPlan {
        root,
        record: RecordDescriptor {
            id,
            kind: RecordKind::Plan,
            area,
            document: path.to_path_buf(),
            container,
        },
    })
}

/// Find a plan by ID under `root`, preferring the active area.
pub fn find_plan(root: &Path, id: u64) -> Option<RecordDescriptor> {
    let mut matches: Vec<RecordDescriptor> = list_records(root, RecordKind::Plan)
        .into_iter()
        .filter(|record| record.id == id)
        .collect();

    if matches.len() > 1 {
        tracing::warn!(id, count = matches.len(), "plan ID is not unique; preferring the active plan");
    }
    matches.sort_by_key(|record| record.area);
    let found = matches.into_iter().next();
    tracing::debug!(id, found = found.is_some(), "plan lookup");
    found
}

/// All plan IDs under `root`, sorted and deduplicated.
pub fn plan_ids(root: &Path) -> Vec<u64> {
    let mut ids: Vec<u64> = list_records(root, RecordKind::Plan)
        .into_iter()
        .map(|record| record.id)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Resolve a plan or explain why it could not be found.
pub fn require_plan(plan: &PlanRef, start: &Path) -> Result<ResolvedPlan> {
    if let Some(resolved) = resolve_plan(plan, start) {
        return Ok(resolved);
    }

    match plan {
        PlanRef::Path(path) => {
            if start.join(path).is_file() {
                Err(Error::InvalidInput(format!(
                    "{} is not a valid plan document",
                    path.display()
                )))
            } else {
                Err(Error::FileNotFound(path.clone()))
            }
        }
        PlanRef::Id(id) => {
            let root = find_root(start).ok_or_else(|| Error::RootNotFound {
                start: start.to_path_buf(),
            })?;
            Err(Error::PlanNotFound {
                id: *id,
                available: plan_ids(&root),
            })
        }
    }
}

/// Area a document lives in, judged by the first directory below the root.
fn area_of(root: &Path, document: &Path) -> Area {
    let first = document
        .strip_prefix(root)
        .ok()
        .and_then(|rel| rel.components().next())
        .and_then(|c| c.as_os_str().to_str().map(str::to_string));

    RecordKind::Plan
        .areas()
        .iter()
        .find(|(_, name)| first.as_deref() == Some(*name))
        .map_or(Area::Active, |(area, _)| *area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;
    use std::fs;

    #[test]
    fn test_resolve_by_id_any_padding() {
        let env = TestEnv::init();
        env.add_plan("plans", "02", "test-plan", Some("2"));

        for requested in ["2", "02", "002"] {
            let plan_ref: PlanRef = requested.parse().unwrap();
            let resolved = resolve_plan(&plan_ref, env.path()).unwrap();
            assert_eq!(resolved.record.id, 2);
            assert!(resolved.record.container.as_ref().unwrap().ends_with("02--test-plan"));
            assert_eq!(resolved.root, env.root());
        }
    }

    #[test]
    fn test_resolve_padded_directory_widths() {
        for dir_id in ["7", "07", "007"] {
            let env = TestEnv::init();
            env.add_plan("plans", dir_id, "padded", None);
            for requested in ["7", "07", "007", "0007"] {
                let plan_ref: PlanRef = requested.parse().unwrap();
                let resolved = resolve_plan(&plan_ref, env.path()).unwrap();
                assert_eq!(resolved.record.id, 7, "dir {} requested {}", dir_id, requested);
            }
        }
    }

    #[test]
    fn test_resolve_archived_plan() {
        let env = TestEnv::init();
        env.add_plan("archive", "20", "shipped", Some("20"));
        let resolved = resolve_plan(&PlanRef::Id(20), env.path()).unwrap();
        assert_eq!(resolved.record.area, Area::Archived);
    }

    #[test]
    fn test_active_wins_over_archived() {
        let env = TestEnv::init();
        env.add_plan("archive", "04", "old", Some("4"));
        env.add_plan("plans", "04", "new", Some("4"));
        let record = find_plan(&env.root(), 4).unwrap();
        assert_eq!(record.area, Area::Active);
        assert!(record.document.ends_with("plan-04--new.md"));
    }

    #[test]
    fn test_resolve_missing_id_returns_none() {
        let env = TestEnv::init();
        env.add_plan("plans", "01", "one", Some("1"));
        assert!(resolve_plan(&PlanRef::Id(99), env.path()).is_none());
    }

    #[test]
    fn test_resolve_without_root_returns_none() {
        let env = TestEnv::new();
        assert!(resolve_plan(&PlanRef::Id(1), env.path()).is_none());
    }

    #[test]
    fn test_resolve_by_path() {
        let env = TestEnv::init();
        let doc = env.add_plan("plans", "03", "by-path", Some("3"));
        let resolved = resolve_plan(&PlanRef::Path(doc.clone()), Path::new("/")).unwrap();
        assert_eq!(resolved.record.id, 3);
        assert_eq!(resolved.record.area, Area::Active);
        assert_eq!(resolved.record.document, doc);
        assert_eq!(resolved.root, env.root());
    }

    #[test]
    fn test_resolve_relative_path_against_start() {
        let env = TestEnv::init();
        env.add_plan("plans", "03", "rel", Some("3"));
        let plan_ref = PlanRef::Path(PathBuf::from(".ai/task-manager/plans/03--rel/plan-03--rel.md"));
        let resolved = resolve_plan(&plan_ref, env.path()).unwrap();
        assert_eq!(resolved.record.id, 3);
    }

    #[test]
    fn test_resolve_legacy_archived_path() {
        let env = TestEnv::init();
        let doc = env.add_legacy_plan("archive", "06", "flat", None);
        let resolved = resolve_plan_path(&doc).unwrap();
        assert_eq!(resolved.record.id, 6);
        assert_eq!(resolved.record.area, Area::Archived);
        assert!(resolved.record.container.is_none());
    }

    #[test]
    fn test_resolve_path_requires_created_field() {
        let env = TestEnv::init();
        let doc = env.add_plan("plans", "03", "no-created", Some("3"));
        fs::write(&doc, "---\nid: 3\n---\nbody").unwrap();
        assert!(resolve_plan_path(&doc).is_none());

        fs::write(&doc, "no header at all").unwrap();
        assert!(resolve_plan_path(&doc).is_none());
    }

    #[test]
    fn test_require_plan_lists_available() {
        let env = TestEnv::init();
        env.add_plan("plans", "01", "one", Some("1"));
        env.add_plan("plans", "03", "three", Some("3"));
        env.add_plan("archive", "20", "done", Some("20"));

        let err = require_plan(&PlanRef::Id(99), env.path()).unwrap_err();
        match err {
            Error::PlanNotFound { id, available } => {
                assert_eq!(id, 99);
                assert_eq!(available, vec![1, 3, 20]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_require_plan_without_root() {
        let env = TestEnv::new();
        let err = require_plan(&PlanRef::Id(1), env.path()).unwrap_err();
        assert!(matches!(err, Error::RootNotFound { .. }));
    }

    #[test]
    fn test_require_plan_missing_path() {
        let env = TestEnv::init();
        let err = require_plan(&PlanRef::Path(env.path().join("nope.md")), env.path()).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}

//! Command implementations for the `tm` CLI.
//!
//! Each command takes the start directory explicitly and returns a result
//! type implementing [`Output`]; `main` decides how to print it.
//! - `next_plan_id` / `next_task_id` - ID allocation
//! - `blueprint` - plan file, directory, task count and blueprint presence
//! - `set_approval` / `set_status` - single-field header mutation
//! - `list_plans`, `show_header`, `archive` - inspection and housekeeping

use crate::header::{FieldChange, parse_header, set_field};
use crate::models::{MutableField, PlanRef, RecordDescriptor, RecordKind};
use crate::storage::{self, find_root};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Heading that marks a plan whose execution blueprint has been written.
pub const BLUEPRINT_HEADING: &str = "## Execution Blueprint";

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for plain-text output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

fn find_root_or_err(start: &Path) -> Result<PathBuf> {
    find_root(start).ok_or_else(|| Error::RootNotFound {
        start: start.to_path_buf(),
    })
}

fn resolve_path(start: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        start.join(path)
    }
}

// === ID allocation ===

/// A freshly allocated ID.
#[derive(Debug, Serialize)]
pub struct NextId {
    pub kind: RecordKind,
    pub id: u64,
}

impl Output for NextId {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.id.to_string()
    }
}

/// Next plan ID for the root above `start`.
pub fn next_plan_id(start: &Path) -> Result<NextId> {
    let root = find_root_or_err(start)?;
    Ok(NextId {
        kind: RecordKind::Plan,
        id: storage::next_plan_id(&root),
    })
}

/// Next task ID within the given plan.
pub fn next_task_id(start: &Path, plan: &PlanRef) -> Result<NextId> {
    let resolved = storage::require_plan(plan, start)?;
    Ok(NextId {
        kind: RecordKind::Task,
        id: storage::next_task_id(&resolved.record),
    })
}

// === Blueprint ===

/// Fields of a plan reported by [`blueprint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BlueprintField {
    #[value(name = "planFile")]
    PlanFile,
    #[value(name = "planDir")]
    PlanDir,
    #[value(name = "taskCount")]
    TaskCount,
    #[value(name = "blueprintExists")]
    BlueprintExists,
}

impl BlueprintField {
    fn name(self) -> &'static str {
        match self {
            BlueprintField::PlanFile => "planFile",
            BlueprintField::PlanDir => "planDir",
            BlueprintField::TaskCount => "taskCount",
            BlueprintField::BlueprintExists => "blueprintExists",
        }
    }
}

/// Summary of a plan's files and progress.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    pub plan_file: PathBuf,
    pub plan_dir: PathBuf,
    pub task_count: usize,
    pub blueprint_exists: bool,
}

impl Blueprint {
    /// Select a single field.
    pub fn field(&self, field: BlueprintField) -> BlueprintValue {
        let value = match field {
            BlueprintField::PlanFile => self.plan_file.display().to_string().into(),
            BlueprintField::PlanDir => self.plan_dir.display().to_string().into(),
            BlueprintField::TaskCount => self.task_count.into(),
            BlueprintField::BlueprintExists => self.blueprint_exists.into(),
        };
        BlueprintValue { field, value }
    }
}

impl Output for Blueprint {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// One field of a [`Blueprint`].
#[derive(Debug, Clone)]
pub struct BlueprintValue {
    pub field: BlueprintField,
    pub value: serde_json::Value,
}

impl Output for BlueprintValue {
    fn to_json(&self) -> String {
        let mut map = serde_json::Map::new();
        map.insert(self.field.name().to_string(), self.value.clone());
        serde_json::Value::Object(map).to_string()
    }

    fn to_human(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Describe a plan for the blueprint workflow.
pub fn blueprint(start: &Path, plan: &PlanRef) -> Result<Blueprint> {
    let resolved = storage::require_plan(plan, start)?;
    let record = &resolved.record;

    let task_count = match &record.container {
        Some(container) => storage::list_records(container, RecordKind::Task).len(),
        None => 0,
    };

    let text = fs::read_to_string(&record.document)?;
    let blueprint_exists = parse_header(&text)
        .body
        .lines()
        .any(|line| line.trim_start().starts_with(BLUEPRINT_HEADING));

    Ok(Blueprint {
        plan_file: record.document.clone(),
        plan_dir: record.directory().to_path_buf(),
        task_count,
        blueprint_exists,
    })
}

// === Header mutation ===

/// Outcome of a header field update.
#[derive(Debug, Serialize)]
pub struct FieldSet {
    pub path: PathBuf,
    pub key: &'static str,
    pub value: &'static str,
    pub change: FieldChange,
}

impl Output for FieldSet {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match self.change {
            FieldChange::Unchanged => format!(
                "{} already set to {} in {}",
                self.key,
                self.value,
                self.path.display()
            ),
            _ => format!("Set {} to {} in {}", self.key, self.value, self.path.display()),
        }
    }
}

fn set_header_field(start: &Path, field: MutableField, path: &Path, value: &str) -> Result<FieldSet> {
    let value = field.canonical(value)?;
    let path = resolve_path(start, path);
    let change = set_field(&path, field, value)?;
    Ok(FieldSet {
        path,
        key: field.key(),
        value,
        change,
    })
}

/// Set a plan's `approval_method` to `auto` or `manual`.
pub fn set_approval(start: &Path, path: &Path, value: &str) -> Result<FieldSet> {
    set_header_field(start, MutableField::ApprovalMethod, path, value)
}

/// Set a task's `status`.
pub fn set_status(start: &Path, path: &Path, value: &str) -> Result<FieldSet> {
    set_header_field(start, MutableField::Status, path, value)
}

// === Inspection ===

/// All plans under a root.
#[derive(Debug, Serialize)]
pub struct PlanList {
    pub root: PathBuf,
    pub plans: Vec<RecordDescriptor>,
}

impl Output for PlanList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.plans.is_empty() {
            return format!("No plans in {}", self.root.display());
        }
        self.plans
            .iter()
            .map(|plan| format!("{:>4}  {:<8}  {}", plan.id, plan.area, plan.document.display()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// List every plan in the active and archived areas.
pub fn list_plans(start: &Path) -> Result<PlanList> {
    let root = find_root_or_err(start)?;
    let plans = storage::list_records(&root, RecordKind::Plan);
    Ok(PlanList { root, plans })
}

/// Parsed header of one document.
#[derive(Debug, Serialize)]
pub struct HeaderView {
    pub path: PathBuf,
    pub fields: BTreeMap<String, String>,
}

impl Output for HeaderView {
    fn to_json(&self) -> String {
        json(&self.fields)
    }

    fn to_human(&self) -> String {
        serde_json::to_string_pretty(&self.fields).unwrap_or_else(|_| self.to_json())
    }
}

/// One header field value.
#[derive(Debug, Serialize)]
pub struct HeaderValue {
    pub key: String,
    pub value: String,
}

impl Output for HeaderValue {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.value.clone()
    }
}

/// Parse the header of any document.
pub fn show_header(start: &Path, path: &Path) -> Result<HeaderView> {
    let path = resolve_path(start, path);
    if !path.is_file() {
        return Err(Error::FileNotFound(path));
    }
    let bytes = fs::read(&path)?;
    let fields = parse_header(&String::from_utf8_lossy(&bytes)).fields;
    Ok(HeaderView { path, fields })
}

/// Read one header field of a document.
pub fn header_field(start: &Path, path: &Path, key: &str) -> Result<HeaderValue> {
    let view = show_header(start, path)?;
    let value = view
        .fields
        .get(key)
        .cloned()
        .ok_or_else(|| Error::FieldNotFound(key.to_string()))?;
    Ok(HeaderValue {
        key: key.to_string(),
        value,
    })
}

// === Archive ===

/// A plan moved into the archive.
#[derive(Debug, Serialize)]
pub struct Archived {
    pub id: u64,
    pub from: PathBuf,
    pub to: PathBuf,
}

impl Output for Archived {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Archived plan {} to {}", self.id, self.to.display())
    }
}

/// Move an active plan into the archive area.
pub fn archive(start: &Path, plan: &PlanRef) -> Result<Archived> {
    let resolved = storage::require_plan(plan, start)?;
    let to = storage::archive_plan(&resolved.root, &resolved.record)?;
    Ok(Archived {
        id: resolved.record.id,
        from: resolved.record.document,
        to,
    })
}

//! Data models for plan and task records.
//!
//! This module defines the core data structures:
//! - `RecordKind` - Plan or task, with the layout conventions of each
//! - `Area` - Active or archived storage
//! - `RecordDescriptor` - A resolved record on disk
//! - `PlanRef` - A plan given by numeric ID or by document path
//! - `MutableField` - Header fields the engine may rewrite, with their accepted values

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The two kinds of records managed under a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Plan,
    Task,
}

impl RecordKind {
    /// Storage areas scanned for this kind, relative to its scope directory.
    ///
    /// Plans are scoped to the root; tasks are scoped to one plan container.
    pub fn areas(self) -> &'static [(Area, &'static str)] {
        match self {
            RecordKind::Plan => &[(Area::Active, "plans"), (Area::Archived, "archive")],
            RecordKind::Task => &[(Area::Active, "tasks")],
        }
    }

    /// Prefix of the document file name (`plan-01--name.md` vs `01--name.md`).
    pub fn file_prefix(self) -> &'static str {
        match self {
            RecordKind::Plan => "plan-",
            RecordKind::Task => "",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Plan => write!(f, "plan"),
            RecordKind::Task => write!(f, "task"),
        }
    }
}

/// Where a record is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Active,
    Archived,
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Area::Active => f.pad("active"),
            Area::Archived => f.pad("archived"),
        }
    }
}

/// A record found on disk. Recomputed on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDescriptor {
    /// Numeric identifier, after header/filename/directory precedence
    pub id: u64,

    /// Plan or task
    pub kind: RecordKind,

    /// Active or archived storage
    pub area: Area,

    /// Path to the document
    pub document: PathBuf,

    /// Container directory (`<id>--<name>/`); `None` for the legacy flat layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<PathBuf>,
}

impl RecordDescriptor {
    /// Directory holding the record: the container, or the document's parent
    /// for legacy flat records.
    pub fn directory(&self) -> &Path {
        match &self.container {
            Some(dir) => dir,
            None => self.document.parent().unwrap_or(Path::new("")),
        }
    }
}

/// Parse an identifier numerically, so `2`, `02` and `002` are equal.
///
/// Surrounding whitespace and matching quotes are ignored. Returns `None` for
/// anything that is not a plain non-negative integer, including `null`.
pub fn parse_identifier(raw: &str) -> Option<u64> {
    let trimmed = crate::header::strip_quotes(raw.trim()).trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// A plan reference from the command line: a numeric ID or a document path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanRef {
    Id(u64),
    Path(PathBuf),
}

impl FromStr for PlanRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput(
                "plan reference must be an ID or a path".to_string(),
            ));
        }
        match parse_identifier(trimmed) {
            Some(id) => Ok(PlanRef::Id(id)),
            None => Ok(PlanRef::Path(PathBuf::from(trimmed))),
        }
    }
}

impl fmt::Display for PlanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanRef::Id(id) => write!(f, "{}", id),
            PlanRef::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// How a plan's work is approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalMethod {
    Auto,
    Manual,
}

impl ApprovalMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalMethod::Auto => "auto",
            ApprovalMethod::Manual => "manual",
        }
    }
}

impl FromStr for ApprovalMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(ApprovalMethod::Auto),
            "manual" => Ok(ApprovalMethod::Manual),
            _ => Err(MutableField::ApprovalMethod.invalid(s)),
        }
    }
}

/// Task progress as recorded in a task header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    NeedsClarification,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::NeedsClarification => "needs-clarification",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "needs-clarification" => Ok(TaskStatus::NeedsClarification),
            _ => Err(MutableField::Status.invalid(s)),
        }
    }
}

/// Header fields the engine is allowed to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutableField {
    ApprovalMethod,
    Status,
}

impl MutableField {
    /// Header key written to the document.
    pub fn key(self) -> &'static str {
        match self {
            MutableField::ApprovalMethod => "approval_method",
            MutableField::Status => "status",
        }
    }

    /// Accepted tokens, in canonical form.
    pub fn accepted(self) -> &'static [&'static str] {
        match self {
            MutableField::ApprovalMethod => &["auto", "manual"],
            MutableField::Status => &["pending", "in-progress", "completed", "needs-clarification"],
        }
    }

    /// Validate a requested value and return its token. Only the exact
    /// accepted tokens pass; case and spelling variants are rejected.
    pub fn canonical(self, value: &str) -> Result<&'static str> {
        match self {
            MutableField::ApprovalMethod => value.parse::<ApprovalMethod>().map(ApprovalMethod::as_str),
            MutableField::Status => value.parse::<TaskStatus>().map(TaskStatus::as_str),
        }
    }

    fn invalid(self, got: &str) -> Error {
        let quoted: Vec<String> = self.accepted().iter().map(|v| format!("\"{}\"", v)).collect();
        let expected = match quoted.split_last() {
            Some((last, [])) => last.clone(),
            Some((last, [only])) => format!("{} or {}", only, last),
            Some((last, rest)) => format!("one of {}, or {}", rest.join(", "), last),
            None => String::new(),
        };
        Error::InvalidValue {
            field: self.key(),
            expected,
            got: got.to_string(),
        }
    }
}

//! Record enumeration across active and archived areas.
//!
//! Both on-disk layouts are recognized:
//! - container: `<area>/<id>--<name>/<prefix><id>--<name>.md`
//! - legacy flat: `<area>/<prefix><id>--<name>.md`
//!
//! Unreadable directories and corrupted documents are skipped; they never
//! abort the scan of their siblings.

use super::consistency::IdSources;
use crate::header::parse_header;
use crate::models::{Area, RecordDescriptor, RecordKind};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn container_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)--.+$").expect("valid container regex"))
}

fn document_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)--.+\.md$").expect("valid document regex"))
}

fn captured_id(re: &Regex, name: &str) -> Option<u64> {
    re.captures(name)?.get(1)?.as_str().parse().ok()
}

/// ID embedded in a container directory name (`02--name` -> 2).
pub fn container_id(name: &str) -> Option<u64> {
    captured_id(container_regex(), name)
}

/// ID embedded in a document file name for the given kind.
pub fn document_id(kind: RecordKind, name: &str) -> Option<u64> {
    let numbered = name.strip_prefix(kind.file_prefix())?;
    captured_id(document_regex(), numbered)
}

/// List every record of `kind` under `scope`.
///
/// `scope` is the root for plans and a plan container for tasks. Results are
/// sorted by ID, then area, then path.
pub fn list_records(scope: &Path, kind: RecordKind) -> Vec<RecordDescriptor> {
    let mut records = Vec::new();
    for (area, dir_name) in kind.areas() {
        scan_area(&scope.join(dir_name), kind, *area, &mut records);
    }
    records.sort_by(|a, b| {
        (a.id, a.area, &a.document).cmp(&(b.id, b.area, &b.document))
    });
    records
}

fn scan_area(dir: &Path, kind: RecordKind, area: Area, out: &mut Vec<RecordDescriptor>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "skipping area");
            return;
        }
    };
    tracing::debug!(dir = %dir.display(), %kind, %area, "scanning area");

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if container_id(&name).is_none() {
                continue;
            }
            match find_container_document(&path, kind) {
                Some(document) => {
                    if let Some(record) = describe(kind, area, document, Some(path)) {
                        out.push(record);
                    }
                }
                None => {
                    tracing::debug!(dir = %path.display(), "container has no {} document", kind)
                }
            }
        } else if document_id(kind, &name).is_some() {
            if let Some(record) = describe(kind, area, path, None) {
                out.push(record);
            }
        }
    }
}

/// The document inside a container; the first by name when several match.
fn find_container_document(container: &Path, kind: RecordKind) -> Option<PathBuf> {
    let entries = fs::read_dir(container).ok()?;
    let mut documents: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter(|entry| document_id(kind, &entry.file_name().to_string_lossy()).is_some())
        .map(|entry| entry.path())
        .collect();
    documents.sort();
    documents.into_iter().next()
}

/// Whether raw document bytes are unusable as text.
pub(crate) fn is_corrupt(bytes: &[u8]) -> bool {
    bytes.contains(&0) || std::str::from_utf8(bytes).is_err()
}

/// Collect the ID sources of one document. `None` when it cannot be read or
/// is corrupted.
pub(crate) fn read_id_sources(
    kind: RecordKind,
    document: &Path,
    container: Option<&Path>,
) -> Option<(IdSources, crate::header::Document)> {
    let bytes = match fs::read(document) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(document = %document.display(), error = %e, "skipping unreadable document");
            return None;
        }
    };
    if is_corrupt(&bytes) {
        tracing::warn!(document = %document.display(), "skipping corrupted document");
        return None;
    }
    let text = String::from_utf8_lossy(&bytes);
    let parsed = parse_header(&text);

    let sources = IdSources {
        directory: container
            .and_then(|dir| dir.file_name())
            .and_then(|name| container_id(&name.to_string_lossy())),
        filename: document
            .file_name()
            .and_then(|name| document_id(kind, &name.to_string_lossy())),
        header: parsed.id(),
    };
    tracing::debug!(
        document = %document.display(),
        directory = ?sources.directory,
        filename = ?sources.filename,
        header = ?sources.header,
        "extracted IDs"
    );
    Some((sources, parsed))
}

fn describe(
    kind: RecordKind,
    area: Area,
    document: PathBuf,
    container: Option<PathBuf>,
) -> Option<RecordDescriptor> {
    let (sources, _) = read_id_sources(kind, &document, container.as_deref())?;
    sources.report(&document);

    let Some(id) = sources.resolved() else {
        tracing::debug!(document = %document.display(), "no ID in any source");
        return None;
    };

    Some(RecordDescriptor {
        id,
        kind,
        area,
        document,
        container,
    })
}

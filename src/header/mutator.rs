//! In-place rewriting of a single header field.
//!
//! Only the targeted line changes. Comments, ordering, other fields, the body
//! and the line-ending style are preserved byte for byte. A missing field is
//! appended just before the closing delimiter.
//!
//! The targeted line is the last one carrying the key, the same occurrence
//! [`parse_header`](super::parse_header) reports. Its value is everything
//! after the colon, as the parser reads it, so trailing text such as
//! `# note` on that line is replaced together with the value.

use super::{locate, split_field, split_lines};
use crate::models::MutableField;
use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// What a mutation did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldChange {
    /// An existing line got a new value
    Updated,
    /// A new line was appended to the header
    Inserted,
    /// The field already had the requested value
    Unchanged,
}

/// Set `field` to `value` in the document at `path`.
///
/// The value is validated before the file is touched. The new content is
/// written to a temporary file next to the document and renamed over it.
pub fn set_field(path: &Path, field: MutableField, value: &str) -> Result<FieldChange> {
    let value = field.canonical(value)?;

    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path)?;
    let (updated, change) = set_field_in(&text, field.key(), value)
        .ok_or_else(|| Error::NoFrontmatter(path.to_path_buf()))?;

    if change == FieldChange::Unchanged {
        tracing::debug!(path = %path.display(), key = field.key(), "field already set");
        return Ok(change);
    }

    write_atomic(path, &updated)?;
    tracing::debug!(path = %path.display(), key = field.key(), value, ?change, "header updated");
    Ok(change)
}

/// Rewrite `key` in the header of `text`.
///
/// Returns `None` when the text has no complete header block.
pub fn set_field_in(text: &str, key: &str, value: &str) -> Option<(String, FieldChange)> {
    let mut lines: Vec<String> = split_lines(text).into_iter().map(str::to_string).collect();
    let span = {
        let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
        locate(&borrowed)?
    };

    let existing = (span.start + 1..span.end)
        .rev()
        .find(|&i| split_field(&lines[i]).is_some_and(|(k, _)| k == key));

    let change = match existing {
        Some(i) => {
            let replaced = replace_value(&lines[i], value);
            if replaced == lines[i] {
                FieldChange::Unchanged
            } else {
                lines[i] = replaced;
                FieldChange::Updated
            }
        }
        None => {
            let eol = if lines[span.start].ends_with("\r\n") { "\r\n" } else { "\n" };
            lines.insert(span.end, format!("{}: {}{}", key, value, eol));
            FieldChange::Inserted
        }
    };

    Some((lines.concat(), change))
}

/// Swap the value of a `key: value` line, keeping indentation, spacing,
/// quote style and terminator.
fn replace_value(line: &str, value: &str) -> String {
    let (content, eol) = match line.strip_suffix("\r\n") {
        Some(content) => (content, "\r\n"),
        None => match line.strip_suffix('\n') {
            Some(content) => (content, "\n"),
            None => (line, ""),
        },
    };

    let Some(colon) = content.find(':') else {
        return line.to_string();
    };
    let (prefix, rest) = content.split_at(colon + 1);
    let leading = &rest[..rest.len() - rest.trim_start().len()];
    let spacing = if leading.is_empty() { " " } else { leading };
    let old = rest.trim();

    let quote = old
        .chars()
        .next()
        .filter(|&q| (q == '"' || q == '\'') && old.len() >= 2 && old.ends_with(q));
    let rendered = match quote {
        Some(q) => format!("{q}{value}{q}"),
        None => value.to_string(),
    };

    format!("{}{}{}{}", prefix, spacing, rendered, eol)
}

/// Replace `path` with `contents` in one rename, keeping its permissions.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let permissions = fs::metadata(path)?.permissions();

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

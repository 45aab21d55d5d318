//! Frontmatter header parsing for plan and task documents.
//!
//! A document may start with a header block delimited by `---` lines:
//!
//! ```text
//! ---
//! id: 3
//! summary: "Add login flow"
//! # comments are ignored
//! created: 2025-01-01
//! ---
//! # Body
//! ```
//!
//! Parsing is line-oriented and never fails. The rules are:
//! - The header starts at the first `---` line and ends at the next one
//! - Blank lines, lines starting with `#` and lines without `:` are skipped
//! - The key is the text before the first `:`, the value is the rest, both trimmed
//! - A value wrapped in matching single or double quotes is unquoted
//!
//! Without a complete header the fields are empty and the body is the whole text.

pub mod mutator;

pub use mutator::{FieldChange, set_field, set_field_in};

use crate::models::parse_identifier;
use std::collections::BTreeMap;

/// Line that opens and closes a header block.
pub const DELIMITER: &str = "---";

/// Leading character of a comment line inside a header.
pub const COMMENT_MARKER: char = '#';

/// A parsed document: header fields plus the untouched body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Header fields, unquoted. Later duplicates overwrite earlier ones.
    pub fields: BTreeMap<String, String>,
    /// Everything after the closing delimiter line, byte for byte
    pub body: String,
    /// Whether a complete header block was found
    pub has_header: bool,
}

impl Document {
    /// Get a field value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The numeric `id` field, if present and numeric.
    pub fn id(&self) -> Option<u64> {
        self.get("id").and_then(parse_identifier)
    }
}

/// Line indices of the opening and closing delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HeaderSpan {
    pub start: usize,
    pub end: usize,
}

/// Split text into lines that keep their terminators, so joining them
/// reproduces the input exactly.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Find the header block among `lines`.
pub(crate) fn locate(lines: &[&str]) -> Option<HeaderSpan> {
    let start = lines.iter().position(|line| is_delimiter(line))?;
    let end = lines[start + 1..]
        .iter()
        .position(|line| is_delimiter(line))
        .map(|offset| start + 1 + offset)?;
    Some(HeaderSpan { start, end })
}

fn is_delimiter(line: &str) -> bool {
    line.trim() == DELIMITER
}

/// Split one header line into key and raw value.
///
/// Returns `None` for blank lines, comments and lines without a colon.
pub(crate) fn split_field(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
        return None;
    }
    let (key, value) = trimmed.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Remove one pair of matching surrounding quotes.
pub fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' || first == b'\'') && first == last {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parse the header of a document.
pub fn parse_header(text: &str) -> Document {
    let lines = split_lines(text);
    let Some(span) = locate(&lines) else {
        return Document {
            fields: BTreeMap::new(),
            body: text.to_string(),
            has_header: false,
        };
    };

    let fields = lines[span.start + 1..span.end]
        .iter()
        .filter_map(|line| split_field(line))
        .map(|(key, value)| (key.to_string(), strip_quotes(value).to_string()))
        .collect();

    Document {
        fields,
        body: lines[span.end + 1..].concat(),
        has_header: true,
    }
}

/// Read the numeric `id` field of a document.
///
/// Returns `None` when the field is absent, `null` or not an integer.
pub fn extract_id(text: &str) -> Option<u64> {
    parse_header(text).id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_header() {
        let doc = parse_header("---\nid: 3\nsummary: Add login\n---\n# Title\nBody\n");
        assert!(doc.has_header);
        assert_eq!(doc.get("id"), Some("3"));
        assert_eq!(doc.get("summary"), Some("Add login"));
        assert_eq!(doc.body, "# Title\nBody\n");
    }

    #[test]
    fn test_parse_without_header_returns_full_body() {
        let text = "# Just a title\n\nNo header here.\n";
        let doc = parse_header(text);
        assert!(!doc.has_header);
        assert!(doc.fields.is_empty());
        assert_eq!(doc.body, text);
    }

    #[test]
    fn test_parse_unterminated_header_returns_full_body() {
        let text = "---\nid: 1\nsummary: never closed\n";
        let doc = parse_header(text);
        assert!(!doc.has_header);
        assert!(doc.fields.is_empty());
        assert_eq!(doc.body, text);
    }

    #[test]
    fn test_parse_skips_comments_blank_and_colonless_lines() {
        let doc = parse_header("---\n# id: 9\n\nnot a field\n  id: 4  \n---\n");
        assert_eq!(doc.fields.len(), 1);
        assert_eq!(doc.get("id"), Some("4"));
    }

    #[test]
    fn test_parse_quote_styles() {
        let doc = parse_header("---\na: \"double\"\nb: 'single'\nc: \"mismatched'\nd: \"\"\ne: \"unterminated\n---\n");
        assert_eq!(doc.get("a"), Some("double"));
        assert_eq!(doc.get("b"), Some("single"));
        assert_eq!(doc.get("c"), Some("\"mismatched'"));
        assert_eq!(doc.get("d"), Some(""));
        assert_eq!(doc.get("e"), Some("\"unterminated"));
    }

    #[test]
    fn test_parse_value_keeps_later_colons() {
        let doc = parse_header("---\ncreated: 2025-01-01T10:00:00Z\n---\n");
        assert_eq!(doc.get("created"), Some("2025-01-01T10:00:00Z"));
    }

    #[test]
    fn test_parse_missing_value() {
        let doc = parse_header("---\nid:\nstatus:   \n---\n");
        assert_eq!(doc.get("id"), Some(""));
        assert_eq!(doc.id(), None);
        assert_eq!(doc.get("status"), Some(""));
    }

    #[test]
    fn test_parse_crlf_header_and_body() {
        let doc = parse_header("---\r\nid: 5\r\n---\r\nBody\r\n");
        assert_eq!(doc.get("id"), Some("5"));
        assert_eq!(doc.body, "Body\r\n");
    }

    #[test]
    fn test_parse_delimiter_with_whitespace() {
        let doc = parse_header("---  \nid: 2\n  ---\nrest");
        assert_eq!(doc.id(), Some(2));
        assert_eq!(doc.body, "rest");
    }

    #[test]
    fn test_parse_survives_garbage() {
        let garbage = String::from_utf8_lossy(&[0xff, 0x00, 0x3a, 0xfe, b'\n', b'-', b'-', b'-']).to_string();
        let doc = parse_header(&garbage);
        assert!(doc.fields.is_empty());
        assert_eq!(doc.body, garbage);
    }

    #[test]
    fn test_extract_id_variants() {
        assert_eq!(extract_id("---\nid: 7\n---\n"), Some(7));
        assert_eq!(extract_id("---\nid: \"007\"\n---\n"), Some(7));
        assert_eq!(extract_id("---\nid: '12'\n---\n"), Some(12));
        assert_eq!(extract_id("---\nid: null\n---\n"), None);
        assert_eq!(extract_id("---\nid: abc\n---\n"), None);
        assert_eq!(extract_id("---\nsummary: x\n---\n"), None);
        assert_eq!(extract_id("no header"), None);
    }

    #[test]
    fn test_strip_quotes_single_char() {
        assert_eq!(strip_quotes("\""), "\"");
        assert_eq!(strip_quotes("x"), "x");
    }
}

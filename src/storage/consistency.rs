//! Consistency checks between the three places a record ID can come from.
//!
//! A record's ID may appear in its container directory name, its file name
//! and its header `id` field. They should agree; when they do not, a warning
//! is emitted and the header wins, then the file name, then the directory.

use std::path::Path;

/// The ID found in each source for one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdSources {
    pub directory: Option<u64>,
    pub filename: Option<u64>,
    pub header: Option<u64>,
}

impl IdSources {
    /// The effective ID: header, else file name, else directory.
    pub fn resolved(&self) -> Option<u64> {
        self.header.or(self.filename).or(self.directory)
    }

    /// Pairs of sources that both have an ID and disagree.
    pub fn mismatches(&self) -> Vec<(&'static str, u64, &'static str, u64)> {
        let named = [
            ("directory", self.directory),
            ("filename", self.filename),
            ("header", self.header),
        ];
        let mut out = Vec::new();
        for (i, (left_name, left)) in named.iter().enumerate() {
            for (right_name, right) in &named[i + 1..] {
                if let (Some(l), Some(r)) = (left, right) {
                    if l != r {
                        out.push((*left_name, *l, *right_name, *r));
                    }
                }
            }
        }
        out
    }

    /// Emit a warning for each disagreement. Never fails.
    pub fn report(&self, document: &Path) -> bool {
        let mismatches = self.mismatches();
        for (left_name, left, right_name, right) in &mismatches {
            tracing::warn!(
                document = %document.display(),
                "ID mismatch: {} says {}, {} says {}; using {}",
                left_name,
                left,
                right_name,
                right,
                self.resolved().map_or_else(|| "none".to_string(), |id| id.to_string()),
            );
        }
        !mismatches.is_empty()
    }
}

//! Common types used across the search module

use serde::{Deserialize, Serialize};

/// One page of a paged search: where it starts and how many rows it may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWindow {
    /// Zero-based offset of the first row requested.
    pub start: usize,
    /// Maximum number of rows the page may hold. At least 1.
    pub max: usize,
}

impl SearchWindow {
    #[must_use]
    pub fn new(start: usize, max: usize) -> Self {
        SearchWindow {
            start,
            max: max.max(1),
        }
    }
}

impl Default for SearchWindow {
    fn default() -> Self {
        SearchWindow { start: 0, max: 50 }
    }
}

/// A matching issue as returned by the index reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueDocument {
    /// Issue key, e.g. `CORE-42`.
    pub key: String,
    /// Stored one-line summary, when the index carries one.
    pub summary: Option<String>,
    /// Relevance score from the index; 0.0 for sorted or streamed reads.
    pub score: f32,
}

impl IssueDocument {
    pub fn new(key: impl Into<String>) -> Self {
        IssueDocument {
            key: key.into(),
            summary: None,
            score: 0.0,
        }
    }
}

/// Search results container
///
/// `hits` is capped at the requested window while `total` always reflects the
/// full matching-set size, so callers can render page controls without a
/// second query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub hits: Vec<IssueDocument>,
    pub total: u64,
    pub start: usize,
}

impl SearchResults {
    /// An empty page at `start`, used for absent queries.
    #[must_use]
    pub fn empty(start: usize) -> Self {
        SearchResults {
            hits: Vec::new(),
            total: 0,
            start,
        }
    }

    /// Check if more results exist beyond this page
    #[must_use]
    pub fn has_more(&self) -> bool {
        ((self.start + self.hits.len()) as u64) < self.total
    }

    /// Get the next page offset
    #[must_use]
    pub fn next_start(&self) -> Option<usize> {
        if self.has_more() {
            Some(self.start + self.hits.len())
        } else {
            None
        }
    }
}

/// A caller-level sort directive: a query-language field name plus direction.
///
/// One caller field may fan out into several physical index fields; the
/// resolver decides, per principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: String,
    pub descending: bool,
}

impl SortOrder {
    pub fn ascending(field: impl Into<String>) -> Self {
        SortOrder {
            field: field.into(),
            descending: false,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        SortOrder {
            field: field.into(),
            descending: true,
        }
    }
}

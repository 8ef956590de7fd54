//! Error types for search execution
//!
//! Any failure surfaced by the underlying index is wrapped into a single
//! domain error carrying the original cause. Errors are propagated, never
//! retried here; retry policy belongs to the caller.

use thiserror::Error;

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Error types for search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query translator rejected the clause tree (unknown function name,
    /// malformed structure, unresolvable field).
    #[error("Failed to translate query: {0}")]
    Translation(String),

    /// The security filter for a principal could not be constructed.
    #[error("Failed to build security filter: {0}")]
    SecurityFilter(String),

    /// Search execution against the index failed.
    #[error("Search execution failed: {0}")]
    Execution(String),

    /// A streaming consumer refused a document.
    #[error("Result consumer failed: {0}")]
    Consumer(String),

    /// IO error from the underlying index
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tantivy error wrapper
    #[error("Index error: {0}")]
    Index(#[from] tantivy::TantivyError),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl SearchError {
    /// True when the error originated below the provider, in index I/O.
    #[must_use]
    pub fn is_index_failure(&self) -> bool {
        matches!(
            self,
            SearchError::Io(_) | SearchError::Index(_) | SearchError::Execution(_)
        )
    }
}

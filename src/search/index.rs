//! Index-reader abstraction
//!
//! The provider never talks to a concrete index directly. It lowers clause
//! trees into [`IndexQuery`] values and hands them to an [`IndexReader`],
//! which supports the three read shapes the engine needs: bounded paged
//! search with an exact total, unbounded streaming, and count-only.
//!
//! The reader is assumed to be an effectively-immutable snapshot shared
//! read-only across concurrent calls; nothing here mutates the index.

use serde::{Deserialize, Serialize};

use super::errors::SearchResult;
use super::types::{IssueDocument, SearchWindow};

/// Index-native boolean query tree.
///
/// Mirrors the `(occur, subquery)` pairs an inverted index executes natively,
/// so a security filter can be combined with a translated query by wrapping
/// both in one [`IndexQuery::Bool`] node rather than post-filtering
/// materialized rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndexQuery {
    /// Exact term match on one field.
    Term { field: String, value: String },
    /// Half-open or closed numeric range on a fast field.
    Range {
        field: String,
        min: Option<i64>,
        max: Option<i64>,
    },
    /// Matches every document. The identity filter for trusted callers.
    All,
    /// Matches nothing. What an anonymous principal with no visible projects
    /// gets as a security filter.
    Nothing,
    Bool {
        must: Vec<IndexQuery>,
        should: Vec<IndexQuery>,
        must_not: Vec<IndexQuery>,
    },
}

impl IndexQuery {
    /// Conjunction of all parts, in argument order.
    #[must_use]
    pub fn all_of(parts: Vec<IndexQuery>) -> IndexQuery {
        IndexQuery::Bool {
            must: parts,
            should: Vec::new(),
            must_not: Vec::new(),
        }
    }

    /// Disjunction of all parts.
    #[must_use]
    pub fn any_of(parts: Vec<IndexQuery>) -> IndexQuery {
        IndexQuery::Bool {
            must: Vec::new(),
            should: parts,
            must_not: Vec::new(),
        }
    }

    /// Negation of `part`.
    #[must_use]
    pub fn none_of(part: IndexQuery) -> IndexQuery {
        IndexQuery::Bool {
            must: Vec::new(),
            should: Vec::new(),
            must_not: vec![part],
        }
    }
}

/// One physical sort field the index understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSortField {
    pub field: String,
    pub descending: bool,
}

/// A capped page of hits plus the exact total match count.
#[derive(Debug, Clone)]
pub struct PagedHits {
    pub docs: Vec<IssueDocument>,
    pub total: u64,
}

/// Read-only access to one consistent index snapshot.
///
/// Implementations must report `total` from the index's own match-count
/// metadata so overflow pages stay exact, and must not re-scan to count.
pub trait IndexReader: Send + Sync {
    /// Bounded search returning at most `window.max` documents starting at
    /// `window.start`. An empty `sorts` slice means relevance order.
    fn search_paged(
        &self,
        query: &IndexQuery,
        window: SearchWindow,
        sorts: &[IndexSortField],
    ) -> SearchResult<PagedHits>;

    /// Unbounded search invoking `on_match` once per matching document, in
    /// index order. Returns the total number of matches streamed.
    fn search_streaming(
        &self,
        query: &IndexQuery,
        on_match: &mut dyn FnMut(IssueDocument) -> SearchResult<()>,
    ) -> SearchResult<u64>;

    /// Count-only search; no document materialization.
    fn count(&self, query: &IndexQuery) -> SearchResult<u64>;
}

/// Streaming sink receiving every match plus a final total.
///
/// Calls happen synchronously on the searching thread; a consumer that needs
/// concurrency can forward into a channel itself.
pub trait MatchConsumer {
    /// One matching document. Returning an error aborts the stream.
    fn accept(&mut self, doc: IssueDocument) -> SearchResult<()>;

    /// Called exactly once after the last match with the total match count.
    fn finish(&mut self, _total: u64) {}
}

/// A consumer that buffers every hit in memory.
#[derive(Debug, Default)]
pub struct CollectingConsumer {
    pub docs: Vec<IssueDocument>,
    pub total: u64,
}

impl CollectingConsumer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchConsumer for CollectingConsumer {
    fn accept(&mut self, doc: IssueDocument) -> SearchResult<()> {
        self.docs.push(doc);
        Ok(())
    }

    fn finish(&mut self, total: u64) {
        self.total = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_helpers_build_expected_shapes() {
        let term = IndexQuery::Term {
            field: "status".into(),
            value: "open".into(),
        };
        assert_eq!(
            IndexQuery::all_of(vec![term.clone()]),
            IndexQuery::Bool {
                must: vec![term.clone()],
                should: vec![],
                must_not: vec![],
            }
        );
        assert_eq!(
            IndexQuery::none_of(term.clone()),
            IndexQuery::Bool {
                must: vec![],
                should: vec![],
                must_not: vec![term],
            }
        );
    }

    #[test]
    fn collecting_consumer_buffers_hits_and_total() {
        let mut consumer = CollectingConsumer::new();
        consumer.accept(IssueDocument::new("CORE-1")).unwrap();
        consumer.accept(IssueDocument::new("CORE-2")).unwrap();
        consumer.finish(2);
        assert_eq!(consumer.docs.len(), 2);
        assert_eq!(consumer.total, 2);
    }
}

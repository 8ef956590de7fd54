//! Search execution against an inverted issue index
//!
//! This module turns validated clause trees into index queries and runs them
//! with security scoping, pagination, sorting and exact overflow totals. The
//! index itself is behind the [`IndexReader`] trait; a tantivy-backed reader
//! lives in [`tantivy_index`].

pub mod context;
pub mod errors;
pub mod index;
pub mod provider;
pub mod tantivy_index;
pub mod types;

pub use context::{
    Principal, QueryTranslator, ResolvedSortFields, SecurityFilterFactory, SortFieldResolver,
};
pub use errors::{SearchError, SearchResult};
pub use index::{CollectingConsumer, IndexQuery, IndexReader, IndexSortField, MatchConsumer, PagedHits};
pub use provider::SearchProvider;
pub use tantivy_index::{IssueSchema, TantivyIndexReader};
pub use types::{IssueDocument, SearchResults, SearchWindow, SortOrder};

//! Structured query core for issue tracking
//!
//! Two halves make up this crate. The [`query`] module is the boolean clause
//! algebra: an immutable AST of typed comparisons combined with AND/OR/NOT,
//! a normalizer that rewrites trees into negation normal form, and
//! equivalence comparators that ignore AND/OR child ordering. The [`search`]
//! module is the execution engine: it lowers a clause tree into an
//! index-native query, ANDs in the acting principal's security filter, and
//! runs paged, streaming, sorted and count-only searches against a pluggable
//! index reader (a tantivy-backed one is included).

pub mod query;
pub mod search;

pub use query::{Clause, Operand, Operator, SingleValue, TerminalClause, clauses_equivalent, normalize};
pub use search::{
    CollectingConsumer, IndexQuery, IndexReader, IndexSortField, IssueDocument, IssueSchema,
    MatchConsumer, PagedHits, Principal, QueryTranslator, ResolvedSortFields, SearchError,
    SearchProvider, SearchResult, SearchResults, SearchWindow, SecurityFilterFactory,
    SortFieldResolver, SortOrder, TantivyIndexReader,
};

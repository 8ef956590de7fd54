//! Tantivy-backed index reader
//!
//! Lowers the index-native [`IndexQuery`] tree onto tantivy queries and
//! executes them with the `TopDocs`/`Count` collectors. The reader holds a
//! point-in-time searcher snapshot per call; it never writes to the index.

use std::ops::Bound;

use tantivy::collector::{Count, TopDocs};
use tantivy::query::{AllQuery, BooleanQuery, EmptyQuery, Occur, Query, RangeQuery, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, Value, FAST, INDEXED, STORED, STRING, TEXT,
};
use tantivy::{DocAddress, Index, Order, TantivyDocument, Term};

use super::errors::{SearchError, SearchResult};
use super::index::{IndexQuery, IndexReader, IndexSortField, PagedHits};
use super::types::{IssueDocument, SearchWindow};

/// Issue index schema with named field handles.
#[derive(Debug, Clone)]
pub struct IssueSchema {
    pub schema: Schema,
    pub key: Field,
    pub project: Field,
    pub status: Field,
    pub assignee: Field,
    pub summary: Field,
    pub level: Field,
    pub updated: Field,
}

impl IssueSchema {
    /// Build the issue schema. Exact-match fields use raw terms; `summary`
    /// is tokenized; `level` and `updated` are fast fields so they can back
    /// range queries and index-level sorting.
    #[must_use]
    pub fn new() -> Self {
        let mut builder = Schema::builder();
        let key = builder.add_text_field("key", STRING | STORED);
        let project = builder.add_text_field("project", STRING);
        let status = builder.add_text_field("status", STRING);
        let assignee = builder.add_text_field("assignee", STRING);
        let summary = builder.add_text_field("summary", TEXT | STORED);
        let level = builder.add_i64_field("level", INDEXED | FAST);
        let updated = builder.add_i64_field("updated", INDEXED | FAST);
        let schema = builder.build();
        IssueSchema {
            schema,
            key,
            project,
            status,
            assignee,
            summary,
            level,
            updated,
        }
    }

    /// Sortable fast fields, by name.
    fn is_fast_field(&self, name: &str) -> bool {
        matches!(name, "level" | "updated")
    }
}

impl Default for IssueSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// [`IndexReader`] over a tantivy index of issues.
///
/// Index-level sorting uses the primary resolved sort field when it names a
/// fast field; remaining fan-out keys are a contract for readers that can
/// honor them natively.
pub struct TantivyIndexReader {
    reader: tantivy::IndexReader,
    schema: IssueSchema,
}

impl TantivyIndexReader {
    pub fn open(index: &Index, schema: IssueSchema) -> SearchResult<Self> {
        let reader = index.reader()?;
        Ok(TantivyIndexReader { reader, schema })
    }

    /// Refresh the snapshot after an external commit.
    pub fn reload(&self) -> SearchResult<()> {
        self.reader.reload()?;
        Ok(())
    }

    #[must_use]
    pub fn schema(&self) -> &IssueSchema {
        &self.schema
    }

    fn lower(&self, query: &IndexQuery) -> SearchResult<Box<dyn Query>> {
        match query {
            IndexQuery::Term { field, value } => {
                let field = self.schema.schema.get_field(field)?;
                Ok(Box::new(TermQuery::new(
                    Term::from_field_text(field, value),
                    IndexRecordOption::Basic,
                )))
            }
            IndexQuery::Range { field, min, max } => {
                let field = self.schema.schema.get_field(field)?;
                let lower = match min {
                    Some(v) => Bound::Included(Term::from_field_i64(field, *v)),
                    None => Bound::Unbounded,
                };
                let upper = match max {
                    Some(v) => Bound::Included(Term::from_field_i64(field, *v)),
                    None => Bound::Unbounded,
                };
                Ok(Box::new(RangeQuery::new(lower, upper)))
            }
            IndexQuery::All => Ok(Box::new(AllQuery)),
            IndexQuery::Nothing => Ok(Box::new(EmptyQuery)),
            IndexQuery::Bool {
                must,
                should,
                must_not,
            } => {
                let mut subqueries: Vec<(Occur, Box<dyn Query>)> = Vec::new();
                for part in must {
                    subqueries.push((Occur::Must, self.lower(part)?));
                }
                for part in should {
                    subqueries.push((Occur::Should, self.lower(part)?));
                }
                for part in must_not {
                    subqueries.push((Occur::MustNot, self.lower(part)?));
                }
                // A purely negative boolean matches nothing on its own; give
                // it a positive base to subtract from.
                if must.is_empty() && should.is_empty() && !must_not.is_empty() {
                    subqueries.push((Occur::Must, Box::new(AllQuery)));
                }
                Ok(Box::new(BooleanQuery::new(subqueries)))
            }
        }
    }

    fn to_document(
        &self,
        searcher: &tantivy::Searcher,
        address: DocAddress,
        score: f32,
    ) -> SearchResult<IssueDocument> {
        let doc: TantivyDocument = searcher.doc(address)?;
        let key = doc
            .get_first(self.schema.key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let summary = doc
            .get_first(self.schema.summary)
            .and_then(|v| v.as_str())
            .map(std::string::ToString::to_string);
        Ok(IssueDocument {
            key,
            summary,
            score,
        })
    }
}

impl IndexReader for TantivyIndexReader {
    fn search_paged(
        &self,
        query: &IndexQuery,
        window: SearchWindow,
        sorts: &[IndexSortField],
    ) -> SearchResult<PagedHits> {
        let searcher = self.reader.searcher();
        let lowered = self.lower(query)?;

        let total = searcher
            .search(&*lowered, &Count)
            .map_err(|e| SearchError::Execution(format!("Failed to count matches: {e}")))?
            as u64;

        let primary_sort = sorts
            .iter()
            .find(|s| self.schema.is_fast_field(&s.field));

        let addresses: Vec<(DocAddress, f32)> = match primary_sort {
            Some(sort) => {
                let order = if sort.descending {
                    Order::Desc
                } else {
                    Order::Asc
                };
                let collector = TopDocs::with_limit(window.max)
                    .and_offset(window.start)
                    .order_by_fast_field::<i64>(&sort.field, order);
                searcher
                    .search(&*lowered, &collector)
                    .map_err(|e| {
                        SearchError::Execution(format!("Sorted search failed: {e}"))
                    })?
                    .into_iter()
                    .map(|(_value, address)| (address, 0.0))
                    .collect()
            }
            None => {
                let collector = TopDocs::with_limit(window.max).and_offset(window.start);
                searcher
                    .search(&*lowered, &collector)
                    .map_err(|e| {
                        SearchError::Execution(format!("Paged search failed: {e}"))
                    })?
                    .into_iter()
                    .map(|(score, address)| (address, score))
                    .collect()
            }
        };

        let mut docs = Vec::with_capacity(addresses.len());
        for (address, score) in addresses {
            docs.push(self.to_document(&searcher, address, score)?);
        }

        Ok(PagedHits { docs, total })
    }

    fn search_streaming(
        &self,
        query: &IndexQuery,
        on_match: &mut dyn FnMut(IssueDocument) -> SearchResult<()>,
    ) -> SearchResult<u64> {
        let searcher = self.reader.searcher();
        let lowered = self.lower(query)?;

        let total = searcher
            .search(&*lowered, &Count)
            .map_err(|e| SearchError::Execution(format!("Failed to count matches: {e}")))?;
        if total == 0 {
            return Ok(0);
        }

        let top_docs = searcher
            .search(&*lowered, &TopDocs::with_limit(total))
            .map_err(|e| SearchError::Execution(format!("Streaming search failed: {e}")))?;
        for (score, address) in top_docs {
            on_match(self.to_document(&searcher, address, score)?)?;
        }
        Ok(total as u64)
    }

    fn count(&self, query: &IndexQuery) -> SearchResult<u64> {
        let searcher = self.reader.searcher();
        let lowered = self.lower(query)?;
        let count = searcher
            .search(&*lowered, &Count)
            .map_err(|e| SearchError::Execution(format!("Count search failed: {e}")))?;
        Ok(count as u64)
    }
}

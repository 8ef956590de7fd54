//! Shared fixtures: a recording in-memory index reader and simple
//! collaborator implementations for driving the search provider.

// Each test binary uses its own subset of these fixtures.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use issueql::search::PagedHits;
use issueql::{
    Clause, IndexQuery, IndexReader, IndexSortField, IssueDocument, Operand, Operator, Principal,
    QueryTranslator, SearchError, SearchResult, SearchWindow, SecurityFilterFactory, SingleValue,
    SortFieldResolver,
};

/// Install a subscriber so failing tests show the provider's debug spans.
/// Safe to call from every test; only the first call wins.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One observed call into the fake reader.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Paged {
        query: IndexQuery,
        window: SearchWindow,
        sorts: Vec<IndexSortField>,
    },
    Streaming {
        query: IndexQuery,
    },
    Count {
        query: IndexQuery,
    },
}

/// In-memory reader that treats every configured document as a match and
/// records each call for shape assertions.
#[derive(Clone, Default)]
pub struct RecordingReader {
    docs: Vec<IssueDocument>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingReader {
    pub fn with_docs(docs: Vec<IssueDocument>) -> Self {
        RecordingReader {
            docs,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle onto the call log, alive after the reader moves into a
    /// provider.
    pub fn call_log(&self) -> Arc<Mutex<Vec<RecordedCall>>> {
        Arc::clone(&self.calls)
    }
}

impl IndexReader for RecordingReader {
    fn search_paged(
        &self,
        query: &IndexQuery,
        window: SearchWindow,
        sorts: &[IndexSortField],
    ) -> SearchResult<PagedHits> {
        self.calls.lock().unwrap().push(RecordedCall::Paged {
            query: query.clone(),
            window,
            sorts: sorts.to_vec(),
        });
        let docs = self
            .docs
            .iter()
            .skip(window.start)
            .take(window.max)
            .cloned()
            .collect();
        Ok(PagedHits {
            docs,
            total: self.docs.len() as u64,
        })
    }

    fn search_streaming(
        &self,
        query: &IndexQuery,
        on_match: &mut dyn FnMut(IssueDocument) -> SearchResult<()>,
    ) -> SearchResult<u64> {
        self.calls.lock().unwrap().push(RecordedCall::Streaming {
            query: query.clone(),
        });
        for doc in &self.docs {
            on_match(doc.clone())?;
        }
        Ok(self.docs.len() as u64)
    }

    fn count(&self, query: &IndexQuery) -> SearchResult<u64> {
        self.calls.lock().unwrap().push(RecordedCall::Count {
            query: query.clone(),
        });
        Ok(self.docs.len() as u64)
    }
}

/// Reader whose every operation fails with an index I/O error.
pub struct FailingReader;

impl IndexReader for FailingReader {
    fn search_paged(
        &self,
        _query: &IndexQuery,
        _window: SearchWindow,
        _sorts: &[IndexSortField],
    ) -> SearchResult<PagedHits> {
        Err(SearchError::Execution("segment read failed".into()))
    }

    fn search_streaming(
        &self,
        _query: &IndexQuery,
        _on_match: &mut dyn FnMut(IssueDocument) -> SearchResult<()>,
    ) -> SearchResult<u64> {
        Err(SearchError::Execution("segment read failed".into()))
    }

    fn count(&self, _query: &IndexQuery) -> SearchResult<u64> {
        Err(SearchError::Execution("segment read failed".into()))
    }
}

/// Minimal clause lowering: equality terms, IN lists, boolean structure.
pub struct TermTranslator;

impl QueryTranslator for TermTranslator {
    fn translate(&self, clause: &Clause, principal: &Principal) -> SearchResult<IndexQuery> {
        match clause {
            Clause::Terminal(t) => match (&t.operator, &t.operand) {
                (Operator::Equals, Operand::Single(SingleValue::Text(value))) => {
                    Ok(IndexQuery::Term {
                        field: t.field.clone(),
                        value: value.clone(),
                    })
                }
                (Operator::Equals, Operand::Single(SingleValue::Number(n))) => {
                    Ok(IndexQuery::Range {
                        field: t.field.clone(),
                        min: Some(*n),
                        max: Some(*n),
                    })
                }
                (Operator::In, Operand::Multi(items)) => {
                    let mut terms = Vec::with_capacity(items.len());
                    for item in items {
                        let Operand::Single(SingleValue::Text(value)) = item else {
                            return Err(SearchError::Translation(
                                "IN lists of non-text values are not supported".into(),
                            ));
                        };
                        terms.push(IndexQuery::Term {
                            field: t.field.clone(),
                            value: value.clone(),
                        });
                    }
                    Ok(IndexQuery::any_of(terms))
                }
                (op, operand) => Err(SearchError::Translation(format!(
                    "unsupported comparison: {} {op} {operand:?}",
                    t.field
                ))),
            },
            Clause::And(children) => {
                let parts = children
                    .iter()
                    .map(|c| self.translate(c, principal))
                    .collect::<SearchResult<Vec<_>>>()?;
                Ok(IndexQuery::all_of(parts))
            }
            Clause::Or(children) => {
                let parts = children
                    .iter()
                    .map(|c| self.translate(c, principal))
                    .collect::<SearchResult<Vec<_>>>()?;
                Ok(IndexQuery::any_of(parts))
            }
            Clause::Not(child) => Ok(IndexQuery::none_of(self.translate(child, principal)?)),
        }
    }
}

/// Security filter that lets every principal see everything.
pub struct PermissiveFilter;

impl SecurityFilterFactory for PermissiveFilter {
    fn filter_for(&self, _principal: &Principal) -> SearchResult<IndexQuery> {
        Ok(IndexQuery::All)
    }
}

/// Security filter scoping each named principal to one project; anonymous
/// principals see nothing.
pub struct ProjectFilter {
    pub grants: HashMap<String, String>,
}

impl SecurityFilterFactory for ProjectFilter {
    fn filter_for(&self, principal: &Principal) -> SearchResult<IndexQuery> {
        let Some(key) = principal.key() else {
            return Ok(IndexQuery::Nothing);
        };
        match self.grants.get(key) {
            Some(project) => Ok(IndexQuery::Term {
                field: "project".into(),
                value: project.clone(),
            }),
            None => Ok(IndexQuery::Nothing),
        }
    }
}

/// Static field-name table with an invocation counter for cache tests.
#[derive(Default)]
pub struct StaticSortResolver {
    table: HashMap<String, Vec<IndexSortField>>,
    lookups: Arc<Mutex<usize>>,
}

impl StaticSortResolver {
    pub fn with_mapping(field: &str, resolved: Vec<IndexSortField>) -> Self {
        let mut table = HashMap::new();
        table.insert(field.to_string(), resolved);
        StaticSortResolver {
            table,
            lookups: Arc::new(Mutex::new(0)),
        }
    }

    pub fn lookup_counter(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.lookups)
    }
}

impl SortFieldResolver for StaticSortResolver {
    fn resolve(&self, field: &str, _principal: &Principal) -> issueql::ResolvedSortFields {
        *self.lookups.lock().unwrap() += 1;
        self.table
            .get(field)
            .map(|fields| fields.iter().cloned().collect())
            .unwrap_or_default()
    }
}

pub fn sort_field(field: &str, descending: bool) -> IndexSortField {
    IndexSortField {
        field: field.to_string(),
        descending,
    }
}

pub fn issue(key: &str) -> IssueDocument {
    IssueDocument::new(key)
}

pub fn status_is(value: &str) -> Clause {
    Clause::terminal("status", Operator::Equals, Operand::text(value))
}

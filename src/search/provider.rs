//! Search execution provider
//!
//! Turns a validated clause tree into an index-native query, ANDs it with the
//! principal's security filter, executes against the index reader, and shapes
//! the results. Security scoping always happens inside the index query, never
//! as a post-filter over materialized rows, so page boundaries and totals
//! stay exact.
//!
//! All operations are synchronous and may block on index I/O for the duration
//! of the call. The provider owns no background threads and no mutable state
//! beyond a concurrent sort-resolution cache.

use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;

use crate::query::Clause;

use super::context::{Principal, QueryTranslator, ResolvedSortFields, SecurityFilterFactory, SortFieldResolver};
use super::errors::SearchResult;
use super::index::{IndexQuery, IndexReader, IndexSortField, MatchConsumer};
use super::types::{SearchResults, SearchWindow, SortOrder};

/// Executes structured queries against an index on behalf of a principal.
///
/// Cheap to share behind an `Arc`; concurrent calls only read the underlying
/// index snapshot and the lock-free sort cache.
pub struct SearchProvider<R: IndexReader> {
    reader: R,
    translator: Arc<dyn QueryTranslator>,
    security: Arc<dyn SecurityFilterFactory>,
    sort_resolver: Arc<dyn SortFieldResolver>,
    sort_cache: DashMap<(String, String), ResolvedSortFields>,
}

impl<R: IndexReader> SearchProvider<R> {
    pub fn new(
        reader: R,
        translator: Arc<dyn QueryTranslator>,
        security: Arc<dyn SecurityFilterFactory>,
        sort_resolver: Arc<dyn SortFieldResolver>,
    ) -> Self {
        SearchProvider {
            reader,
            translator,
            security,
            sort_resolver,
            sort_cache: DashMap::new(),
        }
    }

    /// Paged search as `principal`.
    ///
    /// The returned page holds at most `window.max` rows starting at
    /// `window.start`; `total` is the exact size of the full matching set,
    /// taken from the index's match-count metadata even when the page
    /// overflows. An absent query matches nothing and never touches the
    /// index.
    pub fn search(
        &self,
        query: Option<&Clause>,
        principal: &Principal,
        window: SearchWindow,
    ) -> SearchResult<SearchResults> {
        let Some(clause) = query else {
            return Ok(SearchResults::empty(window.start));
        };
        let filter = self.security.filter_for(principal)?;
        self.execute_paged(clause, principal, window, Some(filter))
    }

    /// Paged search with the security filter omitted or replaced.
    ///
    /// For trusted internal callers only; never reachable from the query
    /// language surface.
    pub fn search_overriding_security(
        &self,
        query: Option<&Clause>,
        principal: &Principal,
        window: SearchWindow,
        override_filter: Option<IndexQuery>,
    ) -> SearchResult<SearchResults> {
        let Some(clause) = query else {
            return Ok(SearchResults::empty(window.start));
        };
        self.execute_paged(clause, principal, window, override_filter)
    }

    /// Streams every matching document into `consumer`, with no page
    /// truncation, then reports the total.
    pub fn search_streaming(
        &self,
        query: Option<&Clause>,
        principal: &Principal,
        consumer: &mut dyn MatchConsumer,
    ) -> SearchResult<()> {
        let Some(clause) = query else {
            consumer.finish(0);
            return Ok(());
        };
        let filter = self.security.filter_for(principal)?;
        self.execute_streaming(clause, principal, consumer, vec![filter])
    }

    /// Streaming search with `extra_filter` ANDed in alongside the security
    /// filter, for callers that must narrow beyond normal scoping.
    pub fn search_streaming_with_filter(
        &self,
        query: Option<&Clause>,
        principal: &Principal,
        consumer: &mut dyn MatchConsumer,
        extra_filter: IndexQuery,
    ) -> SearchResult<()> {
        let Some(clause) = query else {
            consumer.finish(0);
            return Ok(());
        };
        let security = self.security.filter_for(principal)?;
        self.execute_streaming(clause, principal, consumer, vec![extra_filter, security])
    }

    /// Streaming search with no security filter applied.
    pub fn search_streaming_overriding_security(
        &self,
        query: Option<&Clause>,
        principal: &Principal,
        consumer: &mut dyn MatchConsumer,
    ) -> SearchResult<()> {
        let Some(clause) = query else {
            consumer.finish(0);
            return Ok(());
        };
        self.execute_streaming(clause, principal, consumer, Vec::new())
    }

    /// Sorted paged search reporting through `consumer`.
    ///
    /// Each caller-level sort key resolves to zero or more physical sort
    /// fields; unresolvable keys are skipped and a fully unresolvable list
    /// falls back to relevance order. The consumer receives the page rows in
    /// sorted order and then the exact total.
    pub fn search_and_sort(
        &self,
        query: Option<&Clause>,
        principal: &Principal,
        sorts: &[SortOrder],
        consumer: &mut dyn MatchConsumer,
        window: SearchWindow,
    ) -> SearchResult<()> {
        let Some(clause) = query else {
            consumer.finish(0);
            return Ok(());
        };
        let filter = self.security.filter_for(principal)?;
        self.execute_sorted(clause, principal, sorts, consumer, window, Some(filter))
    }

    /// Sorted paged search with the security filter omitted or replaced.
    pub fn search_and_sort_overriding_security(
        &self,
        query: Option<&Clause>,
        principal: &Principal,
        sorts: &[SortOrder],
        consumer: &mut dyn MatchConsumer,
        window: SearchWindow,
        override_filter: Option<IndexQuery>,
    ) -> SearchResult<()> {
        let Some(clause) = query else {
            consumer.finish(0);
            return Ok(());
        };
        self.execute_sorted(clause, principal, sorts, consumer, window, override_filter)
    }

    /// Count-only search; no documents are materialized.
    pub fn search_count(&self, query: Option<&Clause>, principal: &Principal) -> SearchResult<u64> {
        let Some(clause) = query else {
            return Ok(0);
        };
        let filter = self.security.filter_for(principal)?;
        self.execute_count(clause, principal, Some(filter))
    }

    /// Count-only search with the security filter omitted or replaced.
    pub fn search_count_overriding_security(
        &self,
        query: Option<&Clause>,
        principal: &Principal,
        override_filter: Option<IndexQuery>,
    ) -> SearchResult<u64> {
        let Some(clause) = query else {
            return Ok(0);
        };
        self.execute_count(clause, principal, override_filter)
    }

    /// Drop every cached sort-field resolution. Called by the owner when the
    /// index schema or field configuration changes.
    pub fn clear_sort_cache(&self) {
        self.sort_cache.clear();
    }

    fn execute_paged(
        &self,
        clause: &Clause,
        principal: &Principal,
        window: SearchWindow,
        filter: Option<IndexQuery>,
    ) -> SearchResult<SearchResults> {
        let start = Instant::now();
        let combined = self.combined_query(clause, principal, filter.into_iter().collect())?;
        let page = self.reader.search_paged(&combined, window, &[])?;

        tracing::debug!(
            start = window.start,
            max = window.max,
            hits = page.docs.len(),
            total = page.total,
            duration_ms = start.elapsed().as_millis(),
            "Paged search completed"
        );

        Ok(SearchResults {
            hits: page.docs,
            total: page.total,
            start: window.start,
        })
    }

    fn execute_streaming(
        &self,
        clause: &Clause,
        principal: &Principal,
        consumer: &mut dyn MatchConsumer,
        filters: Vec<IndexQuery>,
    ) -> SearchResult<()> {
        let start = Instant::now();
        let combined = self.combined_query(clause, principal, filters)?;
        let total = self
            .reader
            .search_streaming(&combined, &mut |doc| consumer.accept(doc))?;
        consumer.finish(total);

        tracing::debug!(
            total = total,
            duration_ms = start.elapsed().as_millis(),
            "Streaming search completed"
        );
        Ok(())
    }

    fn execute_sorted(
        &self,
        clause: &Clause,
        principal: &Principal,
        sorts: &[SortOrder],
        consumer: &mut dyn MatchConsumer,
        window: SearchWindow,
        filter: Option<IndexQuery>,
    ) -> SearchResult<()> {
        let start = Instant::now();
        let sort_fields = self.resolve_sort_fields(sorts, principal);
        let combined = self.combined_query(clause, principal, filter.into_iter().collect())?;
        let page = self.reader.search_paged(&combined, window, &sort_fields)?;

        tracing::debug!(
            sort_fields = sort_fields.len(),
            hits = page.docs.len(),
            total = page.total,
            duration_ms = start.elapsed().as_millis(),
            "Sorted search completed"
        );

        for doc in page.docs {
            consumer.accept(doc)?;
        }
        consumer.finish(page.total);
        Ok(())
    }

    fn execute_count(
        &self,
        clause: &Clause,
        principal: &Principal,
        filter: Option<IndexQuery>,
    ) -> SearchResult<u64> {
        let combined = self.combined_query(clause, principal, filter.into_iter().collect())?;
        let count = self.reader.count(&combined)?;
        tracing::debug!(count = count, "Count-only search completed");
        Ok(count)
    }

    /// Lower the clause tree and AND it with the given filters.
    ///
    /// Filters come first, then the translated query, so the index can prune
    /// on the cheap access-control terms early. `All` filters are dropped;
    /// a single remaining part is passed through without a wrapping node.
    fn combined_query(
        &self,
        clause: &Clause,
        principal: &Principal,
        filters: Vec<IndexQuery>,
    ) -> SearchResult<IndexQuery> {
        let translated = self.translator.translate(clause, principal)?;
        let mut parts: Vec<IndexQuery> = filters
            .into_iter()
            .filter(|f| !matches!(f, IndexQuery::All))
            .collect();
        parts.push(translated);

        if parts.len() == 1 {
            Ok(parts.pop().unwrap_or(IndexQuery::Nothing))
        } else {
            Ok(IndexQuery::all_of(parts))
        }
    }

    /// Resolve caller sort keys to physical sort fields through the cache.
    ///
    /// A descending caller key flips the direction of every field it fans
    /// out to.
    fn resolve_sort_fields(&self, sorts: &[SortOrder], principal: &Principal) -> Vec<IndexSortField> {
        let mut fields = Vec::new();
        for sort in sorts {
            let cache_key = (sort.field.clone(), principal.cache_key().to_string());
            let resolved = match self.sort_cache.get(&cache_key) {
                Some(hit) => hit.clone(),
                None => {
                    let fresh = self.sort_resolver.resolve(&sort.field, principal);
                    self.sort_cache.insert(cache_key, fresh.clone());
                    fresh
                }
            };
            if resolved.is_empty() {
                tracing::debug!(field = %sort.field, "Sort field not resolvable in this context, skipping");
                continue;
            }
            for mut field in resolved {
                if sort.descending {
                    field.descending = !field.descending;
                }
                fields.push(field);
            }
        }
        fields
    }
}

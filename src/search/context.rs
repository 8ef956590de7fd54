//! Collaborator seams: principal identity, clause translation, security
//! filtering and sort-field resolution
//!
//! These traits are implemented outside this crate (field configuration,
//! permission schemes and custom-field resolution live elsewhere); the
//! provider only depends on their contracts.

use smallvec::SmallVec;

use crate::query::Clause;

use super::errors::SearchResult;
use super::index::{IndexQuery, IndexSortField};

/// The identity a search runs as. One canonical type; anonymous access is an
/// absent key, not a separate call shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    key: Option<String>,
}

impl Principal {
    pub fn named(key: impl Into<String>) -> Self {
        Principal {
            key: Some(key.into()),
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Principal { key: None }
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.key.is_none()
    }

    /// Stable cache-key form; anonymous principals share one slot.
    #[must_use]
    pub(crate) fn cache_key(&self) -> &str {
        self.key.as_deref().unwrap_or("")
    }
}

/// Lowers a clause tree into the index-native query representation.
///
/// Must be deterministic for identical inputs. Receives trees that are
/// usually negation-free (see [`crate::query::normalize`]) but is free to
/// handle `Not` itself. A malformed tree (empty `And`/`Or`, unknown function
/// name) surfaces here as a translation error.
pub trait QueryTranslator: Send + Sync {
    fn translate(&self, clause: &Clause, principal: &Principal) -> SearchResult<IndexQuery>;
}

/// Produces the access-control predicate ANDed with every query run on
/// behalf of a principal.
pub trait SecurityFilterFactory: Send + Sync {
    fn filter_for(&self, principal: &Principal) -> SearchResult<IndexQuery>;
}

/// Resolved physical sort fields for one caller-level sort key. Fan-out past
/// two fields is rare, so the vector stays inline.
pub type ResolvedSortFields = SmallVec<[IndexSortField; 2]>;

/// Maps a query-language field name to zero or more physical sort fields.
///
/// Resolution is principal-scoped because sortability of some fields depends
/// on what the principal may see. An empty result means "not sortable in
/// this context" and the caller skips the key.
pub trait SortFieldResolver: Send + Sync {
    fn resolve(&self, field: &str, principal: &Principal) -> ResolvedSortFields;
}

//! Category filter and free-text search.

use crate::index::types::{Classified, Directory, Entry, SEARCH_FIELD_DELIMITER};
use gatebook_types::{CanonicalRecord, CategoryFilter};
use memchr::memmem::Finder;

/// Builds the lowercased search haystack of a record.
///
/// Fields: address, raw address, community, neighborhood, city, apartment
/// name, business name, gate/alternate/locker codes and notes. Empty fields
/// are skipped so neighboring values sit one delimiter apart.
pub(crate) fn build_haystack(record: &CanonicalRecord) -> String {
    let fields = [
        &record.address,
        &record.address_raw,
        &record.community,
        &record.neighborhood,
        &record.city,
        &record.apartment_name,
        &record.business_name,
        &record.gate_code,
        &record.alternate_code,
        &record.locker_code,
        &record.notes,
    ];

    let mut hay = String::with_capacity(fields.iter().map(|f| f.len() + 1).sum());
    for field in fields.iter().filter(|f| !f.is_empty()) {
        if !hay.is_empty() {
            hay.push(SEARCH_FIELD_DELIMITER);
        }
        hay.push_str(&field.to_lowercase());
    }
    hay
}

/// Case-insensitive substring matcher for one query.
///
/// An empty or whitespace-only query matches everything.
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    finder: Option<Finder<'static>>,
}

impl QueryMatcher {
    /// Prepares a matcher for `query`.
    pub fn new(query: &str) -> Self {
        let needle = query.trim().to_lowercase();
        let finder = (!needle.is_empty()).then(|| Finder::new(needle.as_bytes()).into_owned());
        Self { finder }
    }

    /// Returns `true` if the query is empty.
    #[inline]
    pub fn is_match_all(&self) -> bool {
        self.finder.is_none()
    }

    /// Returns `true` if a lowercased haystack contains the query.
    #[inline]
    pub fn matches(&self, haystack: &str) -> bool {
        match &self.finder {
            None => true,
            Some(finder) => finder.find(haystack.as_bytes()).is_some(),
        }
    }
}

impl Directory {
    fn matching_entries<'a>(
        &'a self,
        filter: CategoryFilter,
        query: &str,
    ) -> impl Iterator<Item = &'a Entry> + 'a {
        let matcher = QueryMatcher::new(query);
        self.entries
            .iter()
            .filter(move |e| filter.matches(e.category) && matcher.matches(&e.haystack))
    }

    /// Records passing `filter` and `query`, in load order.
    ///
    /// Never mutates the directory; the result borrows from it.
    pub fn filter(&self, filter: CategoryFilter, query: &str) -> Vec<Classified<'_>> {
        self.matching_entries(filter, query)
            .map(|e| (&e.record, e.category))
            .collect()
    }

    /// Number of records passing `filter` and `query`.
    pub fn count_matching(&self, filter: CategoryFilter, query: &str) -> usize {
        self.matching_entries(filter, query).count()
    }
}

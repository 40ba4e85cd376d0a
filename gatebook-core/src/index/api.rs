//! Public API for adding and retrieving records.

use crate::analyzer::record::normalize_entries;
use crate::index::filter::build_haystack;
use crate::index::types::{Classified, Directory, Entry};
use gatebook_types::{CanonicalRecord, Category, DirectoryConfig};
use serde_json::Value;

impl Directory {
    /// Classifies and adds a canonical record, returning its category.
    pub fn add(&mut self, record: CanonicalRecord) -> Category {
        let category = self.classifier.classify(&record);
        let haystack = build_haystack(&record);
        self.entries.push(Entry {
            record,
            category,
            haystack,
        });
        category
    }

    /// Adds several canonical records.
    pub fn extend<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = CanonicalRecord>,
    {
        let records = records.into_iter();
        self.entries.reserve(records.size_hint().0);
        for record in records {
            self.add(record);
        }
    }

    /// Normalizes and adds raw source entries (flat or nested).
    ///
    /// Returns the number of entries that were skipped as unreadable.
    pub fn add_entries(&mut self, entries: &[Value]) -> usize {
        let batch = normalize_entries(entries);
        self.extend(batch.records);
        self.skipped_entries += batch.skipped;
        tracing::debug!(
            records = self.entries.len(),
            skipped = batch.skipped,
            "directory loaded"
        );
        batch.skipped
    }

    /// Builds a directory from canonical records.
    pub fn from_records<I>(records: I, config: DirectoryConfig) -> Self
    where
        I: IntoIterator<Item = CanonicalRecord>,
    {
        let mut directory = Self::with_config(config);
        directory.extend(records);
        directory
    }

    /// Builds a directory from raw source entries.
    pub fn from_entries(entries: &[Value], config: DirectoryConfig) -> Self {
        let mut directory = Self::with_config(config);
        directory.add_entries(entries);
        directory
    }

    /// Retrieves a record and its category by load position.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Classified<'_>> {
        self.entries.get(index).map(|e| (&e.record, e.category))
    }
}

//! Directory types.

use crate::analyzer::Classifier;
use gatebook_types::{CanonicalRecord, Category, DirectoryConfig};

/// Separator between fields in a search haystack. A query may span
/// neighboring fields, e.g. "st oak" finds "12 Elm St" in "Oak Park".
pub const SEARCH_FIELD_DELIMITER: char = ' ';

/// A record paired with its category, as handed to the grouper.
pub type Classified<'a> = (&'a CanonicalRecord, Category);

#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub record: CanonicalRecord,
    pub category: Category,
    /// Lowercased searchable fields joined by `SEARCH_FIELD_DELIMITER`.
    pub haystack: String,
}

/// Classified, searchable record set.
///
/// Built once per load of the data source. Every view is derived from it
/// without mutation, so recomputing on each keystroke is safe.
#[derive(Debug, Clone)]
pub struct Directory {
    pub(crate) entries: Vec<Entry>,
    pub(crate) config: DirectoryConfig,
    pub(crate) classifier: Classifier,
    /// Source entries that could not be read during loading.
    pub(crate) skipped_entries: usize,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory {
    /// Creates an empty directory with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DirectoryConfig::default())
    }

    /// Creates an empty directory with a custom configuration.
    pub fn with_config(config: DirectoryConfig) -> Self {
        Self {
            entries: Vec::new(),
            config,
            classifier: Classifier::default(),
            skipped_entries: 0,
        }
    }

    /// Replaces the classifier. Records already added keep their category.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// The empty state shown when the data source is unavailable.
    pub fn empty(config: DirectoryConfig) -> Self {
        Self::with_config(config)
    }

    /// Returns the number of records.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the directory holds no records.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Removes all records, keeping configuration and classifier.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.skipped_entries = 0;
    }

    /// Iterates over every record with its category, in load order.
    pub fn records(&self) -> impl Iterator<Item = Classified<'_>> + '_ {
        self.entries.iter().map(|e| (&e.record, e.category))
    }
}

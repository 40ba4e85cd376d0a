//! Group-key derivation and aggregation.

use core::cmp::Reverse;

use crate::analyzer::normalizer::TextNormalizer;
use crate::index::types::Classified;
use gatebook_types::{CanonicalRecord, Category, DirectoryConfig, FallbackLabels, Group, GroupSort};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Display label a record is grouped under.
///
/// | Category | Primary | Fallback |
/// |---|---|---|
/// | apartments | apartment name | community, else the apartments label |
/// | businesses | business name | community, else the businesses label |
/// | residential | neighborhood | community, else the other label |
pub fn group_label<'a>(
    record: &'a CanonicalRecord,
    category: Category,
    labels: &'a FallbackLabels,
) -> &'a str {
    let primary = match category {
        Category::Apartments => &record.apartment_name,
        Category::Businesses => &record.business_name,
        Category::Residential => &record.neighborhood,
    };
    [primary.as_str(), record.community.as_str()]
        .into_iter()
        .find(|label| !label.is_empty())
        .unwrap_or_else(|| labels.for_category(category))
}

struct Bucket<'a> {
    name: &'a str,
    items: Vec<&'a CanonicalRecord>,
}

/// Distinct non-empty values, compared by folded key, first casing kept.
#[derive(Default)]
struct DistinctValues<'a> {
    values: SmallVec<[(&'a str, String); 2]>,
}

impl<'a> DistinctValues<'a> {
    fn insert(&mut self, value: &'a str, normalizer: &TextNormalizer) {
        if value.is_empty() {
            return;
        }
        let key = normalizer.normalize(value);
        if !self.values.iter().any(|(_, k)| *k == key) {
            self.values.push((value, key));
        }
    }

    fn single(&self) -> Option<(&'a str, &str)> {
        match self.values.as_slice() {
            [(value, key)] => Some((*value, key.as_str())),
            _ => None,
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}

/// Aggregates classified records into sorted groups.
#[derive(Debug, Clone, Copy)]
pub struct Grouper<'c> {
    config: &'c DirectoryConfig,
    normalizer: TextNormalizer,
}

impl<'c> Grouper<'c> {
    /// Creates a grouper for `config`.
    pub fn new(config: &'c DirectoryConfig) -> Self {
        Self {
            config,
            normalizer: TextNormalizer::new(),
        }
    }

    /// Folded deduplication key for a display label.
    #[inline]
    pub fn key_of(&self, label: &str) -> String {
        self.normalizer.normalize(label)
    }

    /// Groups `items`, which must already be filtered to the active scope.
    ///
    /// Every input record lands in exactly one group. Group display names are
    /// the first-seen label for each folded key.
    pub fn group<'a>(&self, items: &[Classified<'a>]) -> Vec<Group<'a>>
    where
        'c: 'a,
    {
        let labels = &self.config.fallback_labels;
        let mut slots: FxHashMap<String, usize> = FxHashMap::default();
        let mut buckets: Vec<Bucket<'a>> = Vec::new();
        let mut key_buf = String::new();

        for &(record, category) in items {
            let label = group_label(record, category, labels);
            self.normalizer.normalize_into(label, &mut key_buf);
            let slot = match slots.get(key_buf.as_str()) {
                Some(&slot) => slot,
                None => {
                    slots.insert(key_buf.clone(), buckets.len());
                    buckets.push(Bucket {
                        name: label,
                        items: Vec::new(),
                    });
                    buckets.len() - 1
                }
            };
            buckets[slot].items.push(record);
        }

        let mut groups: Vec<Group<'a>> = buckets
            .into_iter()
            .map(|mut bucket| {
                sort_items(&mut bucket.items, &self.normalizer);
                Group {
                    name: bucket.name.to_owned(),
                    meta: self.meta_for(bucket.name, &bucket.items),
                    items: bucket.items,
                    expanded: false,
                }
            })
            .collect();

        self.sort_groups(&mut groups);
        tracing::debug!(records = items.len(), groups = groups.len(), "grouped records");
        groups
    }

    /// Best-effort city/neighborhood summary for a group.
    ///
    /// One city is shown as-is; more than one collapses to the configured
    /// "multiple cities" label. A single neighborhood that differs from the
    /// group name is appended.
    pub fn meta_for(&self, name: &str, items: &[&CanonicalRecord]) -> String {
        let mut cities = DistinctValues::default();
        let mut neighborhoods = DistinctValues::default();
        for record in items {
            cities.insert(&record.city, &self.normalizer);
            neighborhoods.insert(&record.neighborhood, &self.normalizer);
        }

        let mut parts: SmallVec<[&str; 2]> = SmallVec::new();
        match cities.single() {
            Some((city, _)) => parts.push(city),
            None if cities.len() > 1 => parts.push(&self.config.multiple_cities_label),
            None => {}
        }
        if let Some((neighborhood, key)) = neighborhoods.single() {
            if key != self.key_of(name) {
                parts.push(neighborhood);
            }
        }
        parts.join(self.config.meta_separator.as_str())
    }

    /// Orders groups by the configured policy. Names compare
    /// case-insensitively with an exact tiebreak.
    fn sort_groups(&self, groups: &mut [Group<'_>]) {
        let by_count = self.config.group_sort == GroupSort::CountDescThenName;
        groups.sort_by_cached_key(|group| {
            let count = if by_count { group.len() } else { 0 };
            (Reverse(count), group.name.to_lowercase(), group.name.clone())
        });
    }
}

/// Sorts records by display address (raw address when the address is empty),
/// case-insensitively, then exactly, then by raw address. Stable.
fn sort_items(items: &mut [&CanonicalRecord], normalizer: &TextNormalizer) {
    items.sort_by_cached_key(|record| {
        let address = record.display_address();
        (
            normalizer.normalize(address),
            address.to_owned(),
            record.address_raw.clone(),
        )
    });
}

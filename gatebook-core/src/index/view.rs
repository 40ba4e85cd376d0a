//! Presenter-facing view state and derived views.
//!
//! The presenter owns a [`ViewState`] and replaces it on every interaction.
//! [`Directory::view`] turns a state into a [`DirectoryView`] without touching
//! the directory, so a superseded view can simply be dropped.

use std::collections::BTreeSet;

use crate::index::grouper::{group_label, Grouper};
use crate::index::types::{Classified, Directory};
use gatebook_types::{CategoryFilter, Group};
use rustc_hash::FxHashSet;
use serde::Serialize;
use url::form_urlencoded;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Current filter, query and set of open groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    filter: CategoryFilter,
    query: String,
    expanded: BTreeSet<String>,
}

impl ViewState {
    /// State with `filter`, an empty query and nothing expanded.
    pub fn new(filter: CategoryFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Active category filter.
    #[inline]
    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    /// Current free-text query, untrimmed.
    #[inline]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Names of expanded groups.
    #[inline]
    pub fn expanded(&self) -> &BTreeSet<String> {
        &self.expanded
    }

    /// Returns `true` if the group named `name` is open.
    #[inline]
    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }

    /// Switches category. Expansion is reset.
    #[must_use]
    pub fn with_filter(&self, filter: CategoryFilter) -> Self {
        Self {
            filter,
            query: self.query.clone(),
            expanded: BTreeSet::new(),
        }
    }

    /// Replaces the query. Long enough queries open the first groups they
    /// hit; shorter ones close everything.
    #[must_use]
    pub fn with_query(&self, directory: &Directory, query: &str) -> Self {
        Self {
            filter: self.filter,
            query: query.to_owned(),
            expanded: directory
                .top_groups_for_query(self.filter, query)
                .into_iter()
                .collect(),
        }
    }

    /// Opens a closed group or closes an open one.
    #[must_use]
    pub fn toggle_group(&self, name: &str) -> Self {
        let mut expanded = self.expanded.clone();
        if !expanded.remove(name) {
            expanded.insert(name.to_owned());
        }
        Self {
            filter: self.filter,
            query: self.query.clone(),
            expanded,
        }
    }

    /// Opens every group in `names`.
    #[must_use]
    pub fn expand_all<'n, I>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = &'n str>,
    {
        let mut expanded = self.expanded.clone();
        expanded.extend(names.into_iter().map(str::to_owned));
        Self {
            filter: self.filter,
            query: self.query.clone(),
            expanded,
        }
    }
}

/// Groups and counts derived from a directory for one view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryView<'a> {
    /// Filter the view was computed for.
    #[serde(skip)]
    pub filter: CategoryFilter,
    /// Sorted groups.
    pub groups: Vec<Group<'a>>,
    /// Number of records across all groups.
    pub total_records: usize,
    /// Number of groups.
    pub total_groups: usize,
    /// One-line summary, e.g. `"Residential: 2 addresses in 2 groups"`.
    pub summary: String,
}

impl DirectoryView<'_> {
    /// Returns `true` if nothing matched.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Looks up a group by display name.
    pub fn group(&self, name: &str) -> Option<&Group<'_>> {
        self.groups.iter().find(|g| g.name == name)
    }
}

/// Summary line shown above the groups.
pub fn summary_line(filter: CategoryFilter, total_records: usize, total_groups: usize) -> String {
    format!(
        "{}: {} addresses in {} groups",
        filter.label(),
        total_records,
        total_groups
    )
}

/// Google Maps search link for an address.
///
/// ```
/// use gatebook_core::index::maps_link;
///
/// assert_eq!(
///     maps_link("12 Elm St"),
///     "https://www.google.com/maps/search/?api=1&query=12+Elm+St"
/// );
/// ```
pub fn maps_link(address: &str) -> String {
    let mut link = String::with_capacity(MAPS_SEARCH_URL.len() + address.len() * 3);
    link.push_str(MAPS_SEARCH_URL);
    link.extend(form_urlencoded::byte_serialize(address.as_bytes()));
    link
}

impl Directory {
    /// Groups already-filtered records with this directory's configuration.
    pub fn group<'a>(&'a self, items: &[Classified<'a>]) -> Vec<Group<'a>> {
        Grouper::new(&self.config).group(items)
    }

    /// Names of the first groups a query hits, in record order.
    ///
    /// Empty unless the trimmed query has at least
    /// `auto_expand_min_query_len` characters. At most `auto_expand_limit`
    /// names are returned.
    pub fn top_groups_for_query(&self, filter: CategoryFilter, query: &str) -> Vec<String> {
        let limit = self.config.auto_expand_limit;
        if limit == 0 || query.trim().chars().count() < self.config.auto_expand_min_query_len {
            return Vec::new();
        }

        let grouper = Grouper::new(&self.config);
        let labels = &self.config.fallback_labels;
        let mut seen = FxHashSet::default();
        let mut names = Vec::with_capacity(limit);
        for (record, category) in self.filter(filter, query) {
            let label = group_label(record, category, labels);
            if seen.insert(grouper.key_of(label)) {
                names.push(label.to_owned());
                if names.len() >= limit {
                    break;
                }
            }
        }
        names
    }

    /// Derives the full view for `state`.
    pub fn view(&self, state: &ViewState) -> DirectoryView<'_> {
        let matched = self.filter(state.filter(), state.query());
        let mut groups = self.group(&matched);
        for group in &mut groups {
            group.expanded = state.is_expanded(&group.name);
        }

        let total_records = matched.len();
        let total_groups = groups.len();
        DirectoryView {
            filter: state.filter(),
            groups,
            total_records,
            total_groups,
            summary: summary_line(state.filter(), total_records, total_groups),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatebook_types::{CanonicalRecord, Category, DirectoryConfig};

    fn community(address: &str, community: &str) -> CanonicalRecord {
        CanonicalRecord {
            address: address.into(),
            community: community.into(),
            ..Default::default()
        }
    }

    fn many_communities(n: usize) -> Directory {
        Directory::from_records(
            (0..n).map(|i| community(&format!("{i} Elm St"), &format!("Community {i:02}"))),
            DirectoryConfig::default(),
        )
    }

    #[test]
    fn short_query_expands_nothing() {
        let dir = many_communities(3);
        assert!(dir.top_groups_for_query(CategoryFilter::All, "E").is_empty());
        assert!(dir.top_groups_for_query(CategoryFilter::All, "  e  ").is_empty());
        assert!(dir.top_groups_for_query(CategoryFilter::All, "").is_empty());
    }

    #[test]
    fn query_expands_first_groups_in_record_order() {
        let dir = many_communities(10);
        let names = dir.top_groups_for_query(CategoryFilter::All, "elm");
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "Community 00");
        assert_eq!(names[5], "Community 05");
    }

    #[test]
    fn expansion_deduplicates_groups() {
        let dir = Directory::from_records(
            [
                community("1 Elm St", "Oak Park"),
                community("2 Elm St", "OAK PARK"),
                community("3 Elm St", "Pine Hills"),
            ],
            DirectoryConfig::default(),
        );
        assert_eq!(
            dir.top_groups_for_query(CategoryFilter::All, "elm"),
            ["Oak Park", "Pine Hills"]
        );
    }

    #[test]
    fn expansion_respects_config() {
        let config = DirectoryConfig {
            auto_expand_limit: 2,
            auto_expand_min_query_len: 4,
            ..DirectoryConfig::default()
        };
        let dir = Directory::from_records(
            (0..5).map(|i| community(&format!("{i} Elm St"), &format!("C{i}"))),
            config,
        );
        assert!(dir.top_groups_for_query(CategoryFilter::All, "elm").is_empty());
        assert_eq!(dir.top_groups_for_query(CategoryFilter::All, "elm st").len(), 2);
    }

    #[test]
    fn with_query_sets_and_clears_expansion() {
        let dir = many_communities(3);
        let state = ViewState::new(CategoryFilter::All).with_query(&dir, "elm");
        assert_eq!(state.expanded().len(), 3);
        assert!(state.is_expanded("Community 01"));

        let state = state.with_query(&dir, "e");
        assert!(state.expanded().is_empty());
        assert_eq!(state.query(), "e");
    }

    #[test]
    fn with_filter_resets_expansion_keeps_query() {
        let dir = many_communities(3);
        let state = ViewState::new(CategoryFilter::All)
            .with_query(&dir, "elm")
            .with_filter(Category::Businesses.into());
        assert!(state.expanded().is_empty());
        assert_eq!(state.query(), "elm");
        assert_eq!(state.filter(), CategoryFilter::Only(Category::Businesses));
    }

    #[test]
    fn toggle_group_flips() {
        let state = ViewState::default().toggle_group("Oak Park");
        assert!(state.is_expanded("Oak Park"));
        let state = state.toggle_group("Oak Park");
        assert!(!state.is_expanded("Oak Park"));
    }

    #[test]
    fn view_marks_expanded_groups_and_counts() {
        let dir = Directory::from_records(
            [
                community("1 Elm St", "Oak Park"),
                community("2 Elm St", "Oak Park"),
                community("3 Pine St", "Pine Hills"),
            ],
            DirectoryConfig::default(),
        );
        let state = ViewState::new(Category::Residential.into()).toggle_group("Pine Hills");
        let view = dir.view(&state);

        assert_eq!(view.total_records, 3);
        assert_eq!(view.total_groups, 2);
        assert_eq!(view.summary, "Residential: 3 addresses in 2 groups");
        assert_eq!(view.groups[0].name, "Oak Park");
        assert!(!view.groups[0].expanded);
        assert!(view.group("Pine Hills").unwrap().expanded);
    }

    #[test]
    fn empty_directory_view() {
        let dir = Directory::empty(DirectoryConfig::default());
        let view = dir.view(&ViewState::default());
        assert!(view.is_empty());
        assert_eq!(view.summary, "All: 0 addresses in 0 groups");
    }

    #[test]
    fn view_serializes_without_filter() {
        let dir = many_communities(1);
        let view = dir.view(&ViewState::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["total_records"], 1);
        assert_eq!(json["groups"][0]["name"], "Community 00");
        assert_eq!(json["groups"][0]["items"][0]["address"], "0 Elm St");
        assert!(json.get("filter").is_none());
    }

    #[test]
    fn maps_link_encodes_address() {
        assert_eq!(
            maps_link("12 Elm St #4, Tucson"),
            "https://www.google.com/maps/search/?api=1&query=12+Elm+St+%234%2C+Tucson"
        );
    }
}

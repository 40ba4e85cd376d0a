//! Core types and configuration for the Gatebook directory pipeline.
//!
//! This crate holds the types shared between the pipeline and its
//! presenters. Keeping them separate gives:
//!
//! - **Cross-crate compatibility**: the core and any front end share one model
//! - **Clean boundaries**: no presenter ever depends on pipeline internals
//! - **Serializable views**: every produced type can be emitted as JSON

#![warn(missing_docs)]

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the three mutually exclusive classifications of an address record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Apartment complexes and unit addresses.
    Apartments,
    /// Businesses and commercial addresses.
    Businesses,
    /// Everything else; the default classification.
    Residential,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [
        Category::Apartments,
        Category::Businesses,
        Category::Residential,
    ];

    /// Plural lowercase identifier, as used by filters.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Apartments => "apartments",
            Category::Businesses => "businesses",
            Category::Residential => "residential",
        }
    }

    /// Singular value stored in `CanonicalRecord::explicit_type`.
    #[inline]
    pub const fn explicit_type(self) -> &'static str {
        match self {
            Category::Apartments => "apartment",
            Category::Businesses => "business",
            Category::Residential => "residential",
        }
    }

    /// Capitalized label for summaries.
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            Category::Apartments => "Apartments",
            Category::Businesses => "Businesses",
            Category::Residential => "Residential",
        }
    }

    /// Parses a source-provided type value, singular or plural, ignoring case.
    ///
    /// Returns `None` for anything unrecognized, including the empty string.
    pub fn from_explicit_type(value: &str) -> Option<Self> {
        let value = value.trim();
        Category::ALL.into_iter().find(|category| {
            value.eq_ignore_ascii_case(category.explicit_type())
                || value.eq_ignore_ascii_case(category.as_str())
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_explicit_type(s).ok_or_else(|| DirectoryError::InvalidFilter(s.to_owned()))
    }
}

/// Active category selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Pass every record.
    #[default]
    All,
    /// Pass only records of one category.
    Only(Category),
}

impl CategoryFilter {
    /// Returns `true` if a record of `category` passes this filter.
    #[inline]
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => only == category,
        }
    }

    /// Capitalized label for summaries ("All", "Residential", ...).
    pub const fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.label(),
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<Category>().map(CategoryFilter::Only)
    }
}

/// Normalized, trimmed, null-free address entry.
///
/// Every field is a trimmed string; fields absent from the source are empty.
/// Records are built once per load and only handed out by shared reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CanonicalRecord {
    /// Display address.
    pub address: String,
    /// Fallback display address as it appeared in the source.
    pub address_raw: String,
    /// Community, complex or business label.
    pub community: String,
    /// Neighborhood label.
    pub neighborhood: String,
    /// City name.
    pub city: String,
    /// Apartment complex name.
    pub apartment_name: String,
    /// Business name.
    pub business_name: String,
    /// Primary gate code.
    pub gate_code: String,
    /// Alternate gate code.
    pub alternate_code: String,
    /// Package locker code.
    pub locker_code: String,
    /// `"apartment"`, `"business"`, `"residential"` or empty.
    pub explicit_type: String,
    /// Free-form delivery notes.
    pub notes: String,
}

impl CanonicalRecord {
    /// Address used for display and sorting: `address`, else `address_raw`.
    #[inline]
    pub fn display_address(&self) -> &str {
        if self.address.is_empty() {
            &self.address_raw
        } else {
            &self.address
        }
    }
}

/// A named bucket of records sharing a derived key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group<'a> {
    /// Display name; the first-seen label for the group key.
    pub name: String,
    /// City/neighborhood summary, empty when absent or inconsistent.
    pub meta: String,
    /// Member records, sorted by address.
    pub items: Vec<&'a CanonicalRecord>,
    /// Whether the presenter should show this group open. Set by the view layer.
    pub expanded: bool,
}

impl Group<'_> {
    /// Number of records in the group.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the group has no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Ordering applied to groups in a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSort {
    /// Largest groups first, ties broken by name.
    #[default]
    CountDescThenName,
    /// Alphabetical by name.
    Name,
}

impl FromStr for GroupSort {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" | "count_desc_then_name" | "size" => Ok(GroupSort::CountDescThenName),
            "name" | "alpha" | "alphabetical" => Ok(GroupSort::Name),
            other => Err(DirectoryError::Configuration(format!(
                "unknown group sort policy '{other}'"
            ))),
        }
    }
}

/// Placeholder group names used when a record has no usable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackLabels {
    /// Apartments without a complex or community name.
    pub apartments: String,
    /// Businesses without a business or community name.
    pub businesses: String,
    /// Residential records without a neighborhood or community.
    pub other: String,
}

impl Default for FallbackLabels {
    fn default() -> Self {
        Self {
            apartments: "Apartments".to_owned(),
            businesses: "Businesses".to_owned(),
            other: "Other".to_owned(),
        }
    }
}

impl FallbackLabels {
    /// Fallback label for a category.
    #[inline]
    pub fn for_category(&self, category: Category) -> &str {
        match category {
            Category::Apartments => &self.apartments,
            Category::Businesses => &self.businesses,
            Category::Residential => &self.other,
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Ordering of groups in a view.
    /// Default: count descending, then name.
    pub group_sort: GroupSort,
    /// Maximum number of groups auto-expanded for a search.
    /// Default: 6
    pub auto_expand_limit: usize,
    /// Minimum trimmed query length (in characters) that triggers auto-expansion.
    /// Default: 2
    pub auto_expand_min_query_len: usize,
    /// Placeholder group names.
    pub fallback_labels: FallbackLabels,
    /// Meta text shown when a group spans more than one city.
    pub multiple_cities_label: String,
    /// Separator between meta parts.
    pub meta_separator: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            group_sort: GroupSort::CountDescThenName,
            auto_expand_limit: 6,
            auto_expand_min_query_len: 2,
            fallback_labels: FallbackLabels::default(),
            multiple_cities_label: "Multiple cities".to_owned(),
            meta_separator: " • ".to_owned(),
        }
    }
}

impl DirectoryConfig {
    /// Configuration that lists groups alphabetically.
    pub fn alphabetical() -> Self {
        Self {
            group_sort: GroupSort::Name,
            ..Self::default()
        }
    }

    /// Parses a JSON configuration document. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns `DirectoryError::Configuration` if the document is not valid.
    pub fn from_json_str(json: &str) -> Result<Self, DirectoryError> {
        serde_json::from_str(json).map_err(|e| DirectoryError::Configuration(e.to_string()))
    }
}

/// Errors surfaced by the directory pipeline.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The data source could not be read or did not contain records.
    #[error("data unavailable: {reason}")]
    DataUnavailable {
        /// Why the source was rejected.
        reason: String,
    },
    /// A category filter string was not recognized.
    #[error("unknown category filter '{0}' (expected all, apartments, businesses or residential)")]
    InvalidFilter(String),
    /// Configuration could not be parsed or contained an invalid value.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl DirectoryError {
    /// Builds a `DataUnavailable` error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        DirectoryError::DataUnavailable {
            reason: reason.into(),
        }
    }

    /// Returns `true` for the "data unavailable" condition.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, DirectoryError::DataUnavailable { .. })
    }
}

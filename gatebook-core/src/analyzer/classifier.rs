//! Rule-based record classification.
//!
//! A [`Classifier`] evaluates an ordered list of named rules against a record
//! and returns the category of the first rule that fires. Records no rule
//! claims are [`Category::Residential`].
//!
//! The standard rules, in priority order:
//!
//! | Rule | Fires when | Category |
//! |---|---|---|
//! | `explicit-type` | the source named a recognized type | that type |
//! | `community-apartment` | the community label mentions "apartment" | apartments |
//! | `address-unit` | the address has an ` apt `, ` apartment` or ` unit ` marker | apartments |
//! | `business-name` | a business name is present | businesses |
//! | `community-business` | the community label has a business word | businesses |
//! | `apartment-name` | a complex name is present | apartments |

use gatebook_types::{CanonicalRecord, Category};

use crate::analyzer::tokenizer::Tokenizer;

/// Name reported by [`Classifier::classify_traced`] when no rule fires.
pub const DEFAULT_RULE: &str = "default";

/// Matched with their surrounding spaces, so a marker at either end of the
/// address does not count.
const ADDRESS_UNIT_MARKERS: &[&str] = &[" apt ", " apartment", " unit "];

/// Organization suffixes and commercial nouns, matched as whole words.
const BUSINESS_WORDS: &[&str] = &[
    "llc",
    "inc",
    "corp",
    "corporation",
    "co",
    "company",
    "ltd",
    "plumbing",
    "supply",
    "market",
    "store",
    "shop",
    "center",
    "plaza",
];

/// Lowercased views of a record shared by all rules.
#[derive(Debug)]
pub struct RecordFeatures<'a> {
    /// The record under classification.
    pub record: &'a CanonicalRecord,
    /// Lowercased community label.
    pub community: String,
    /// Lowercased display address.
    pub address: String,
}

impl<'a> RecordFeatures<'a> {
    /// Derives the lowercased views of `record`.
    pub fn new(record: &'a CanonicalRecord) -> Self {
        Self {
            record,
            community: record.community.to_lowercase(),
            address: record.display_address().to_lowercase(),
        }
    }
}

/// A named, pure mapping from record features to an optional category.
#[derive(Clone, Copy)]
pub struct ClassificationRule {
    /// Stable rule name, reported by tracing and `classify_traced`.
    pub name: &'static str,
    /// Returns `Some` when the rule claims the record.
    pub apply: fn(&RecordFeatures<'_>) -> Option<Category>,
}

impl core::fmt::Debug for ClassificationRule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClassificationRule")
            .field("name", &self.name)
            .finish()
    }
}

fn explicit_type(features: &RecordFeatures<'_>) -> Option<Category> {
    Category::from_explicit_type(&features.record.explicit_type)
}

fn community_apartment(features: &RecordFeatures<'_>) -> Option<Category> {
    features
        .community
        .contains("apartment")
        .then_some(Category::Apartments)
}

fn address_unit(features: &RecordFeatures<'_>) -> Option<Category> {
    ADDRESS_UNIT_MARKERS
        .iter()
        .any(|marker| features.address.contains(marker))
        .then_some(Category::Apartments)
}

fn business_name(features: &RecordFeatures<'_>) -> Option<Category> {
    (!features.record.business_name.is_empty()).then_some(Category::Businesses)
}

fn community_business(features: &RecordFeatures<'_>) -> Option<Category> {
    Tokenizer::new()
        .contains_any(&features.community, BUSINESS_WORDS)
        .then_some(Category::Businesses)
}

fn apartment_name(features: &RecordFeatures<'_>) -> Option<Category> {
    (!features.record.apartment_name.is_empty()).then_some(Category::Apartments)
}

/// Standard rules in priority order.
pub const STANDARD_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "explicit-type",
        apply: explicit_type,
    },
    ClassificationRule {
        name: "community-apartment",
        apply: community_apartment,
    },
    ClassificationRule {
        name: "address-unit",
        apply: address_unit,
    },
    ClassificationRule {
        name: "business-name",
        apply: business_name,
    },
    ClassificationRule {
        name: "community-business",
        apply: community_business,
    },
    ClassificationRule {
        name: "apartment-name",
        apply: apartment_name,
    },
];

/// Evaluates classification rules in order.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_rules(STANDARD_RULES.to_vec())
    }
}

impl Classifier {
    /// Creates a classifier with a custom rule list.
    pub fn with_rules(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Classifies a record. Total and deterministic.
    #[inline]
    pub fn classify(&self, record: &CanonicalRecord) -> Category {
        self.classify_traced(record).0
    }

    /// Classifies a record and reports which rule decided.
    pub fn classify_traced(&self, record: &CanonicalRecord) -> (Category, &'static str) {
        let features = RecordFeatures::new(record);
        for rule in &self.rules {
            if let Some(category) = (rule.apply)(&features) {
                tracing::trace!(rule = rule.name, %category, "record classified");
                return (category, rule.name);
            }
        }
        (Category::Residential, DEFAULT_RULE)
    }
}

/// Classifies a record with the standard rules.
pub fn classify(record: &CanonicalRecord) -> Category {
    let features = RecordFeatures::new(record);
    STANDARD_RULES
        .iter()
        .find_map(|rule| (rule.apply)(&features))
        .unwrap_or(Category::Residential)
}

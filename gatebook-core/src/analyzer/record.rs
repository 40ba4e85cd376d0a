//! Raw source entries to canonical records.
//!
//! Two source shapes are accepted and may be mixed in one document:
//!
//! - **Flat**: each entry is an address object carrying its own community.
//! - **Nested**: each entry is a community object with a label and an array
//!   of address objects under `addresses`, `entries` or `items`.
//!
//! Nested children inherit the parent's community, neighborhood, city and
//! type when they do not set their own.

use gatebook_types::{CanonicalRecord, Category};
use serde_json::{Map, Value};

use crate::analyzer::normalizer::{normalize_code, normalize_label, scalar_to_string};

/// A source-defined entry: a JSON object with arbitrary field presence.
pub type RawRecord = Map<String, Value>;

const ADDRESS: &[&str] = &["address", "street"];
const ADDRESS_RAW: &[&str] = &["address_raw", "addressRaw", "raw_address", "rawAddress"];
const COMMUNITY: &[&str] = &["community", "hoa"];
const PARENT_LABEL: &[&str] = &["community", "name", "hoa"];
const NEIGHBORHOOD: &[&str] = &["neighborhood", "neighbourhood"];
const CITY: &[&str] = &["city"];
const APARTMENT_NAME: &[&str] = &["apartment_name", "apartmentName", "apartment", "complex"];
const BUSINESS_NAME: &[&str] = &["business_name", "businessName", "business"];
const GATE_CODE: &[&str] = &["gate_code", "gateCode", "gate", "code"];
const ALTERNATE_CODE: &[&str] = &["alternate_code", "alternateCode", "alt_code", "altCode"];
const LOCKER_CODE: &[&str] = &["locker_code", "lockerCode", "locker"];
const EXPLICIT_TYPE: &[&str] = &["type", "explicit_type", "explicitType", "category"];
const NOTES: &[&str] = &["notes", "note", "tip"];
const CHILDREN: &[&str] = &["addresses", "entries", "items"];

/// Fields a nested community passes down to its addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentContext {
    /// Community label.
    pub community: String,
    /// Neighborhood label.
    pub neighborhood: String,
    /// City name.
    pub city: String,
    /// Canonical explicit type.
    pub explicit_type: String,
}

impl ParentContext {
    /// Extracts the inheritable fields of a community object.
    pub fn from_raw(raw: &RawRecord) -> Self {
        Self {
            community: normalize_label(&first_of(raw, PARENT_LABEL)),
            neighborhood: normalize_label(&first_of(raw, NEIGHBORHOOD)),
            city: first_of(raw, CITY),
            explicit_type: canonical_type(&first_of(raw, EXPLICIT_TYPE)),
        }
    }
}

/// Result of normalizing a list of source entries.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Canonical records in source order.
    pub records: Vec<CanonicalRecord>,
    /// Entries that were not objects and could not be read.
    pub skipped: usize,
}

/// Returns the first non-empty value among `keys`, coerced and trimmed.
fn first_of(raw: &RawRecord, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| scalar_to_string(raw.get(*key)))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// Maps a type value to `"apartment"`, `"business"`, `"residential"` or `""`.
pub fn canonical_type(value: &str) -> String {
    match Category::from_explicit_type(value) {
        Some(category) => category.explicit_type().to_owned(),
        None => {
            if !value.is_empty() {
                tracing::debug!(value, "ignoring unrecognized explicit type");
            }
            String::new()
        }
    }
}

#[inline]
fn or_inherit(own: String, inherited: &str) -> String {
    if own.is_empty() {
        inherited.to_owned()
    } else {
        own
    }
}

/// Normalizes one flat address object.
pub fn normalize_record(raw: &RawRecord) -> CanonicalRecord {
    normalize_with_parent(raw, None)
}

/// Normalizes one address object, filling gaps from its parent community.
pub fn normalize_with_parent(raw: &RawRecord, parent: Option<&ParentContext>) -> CanonicalRecord {
    let mut record = CanonicalRecord {
        address: first_of(raw, ADDRESS),
        address_raw: first_of(raw, ADDRESS_RAW),
        community: normalize_label(&first_of(raw, COMMUNITY)),
        neighborhood: normalize_label(&first_of(raw, NEIGHBORHOOD)),
        city: first_of(raw, CITY),
        apartment_name: normalize_label(&first_of(raw, APARTMENT_NAME)),
        business_name: normalize_label(&first_of(raw, BUSINESS_NAME)),
        gate_code: normalize_code(&first_of(raw, GATE_CODE)),
        alternate_code: normalize_code(&first_of(raw, ALTERNATE_CODE)),
        locker_code: normalize_code(&first_of(raw, LOCKER_CODE)),
        explicit_type: canonical_type(&first_of(raw, EXPLICIT_TYPE)),
        notes: first_of(raw, NOTES),
    };

    if let Some(parent) = parent {
        record.community = or_inherit(record.community, &parent.community);
        record.neighborhood = or_inherit(record.neighborhood, &parent.neighborhood);
        record.city = or_inherit(record.city, &parent.city);
        record.explicit_type = or_inherit(record.explicit_type, &parent.explicit_type);
    }

    record
}

/// Returns the child array of a nested community entry, if it has one.
fn children_of(raw: &RawRecord) -> Option<&Vec<Value>> {
    CHILDREN.iter().find_map(|key| raw.get(*key)?.as_array())
}

/// Normalizes a list of flat and/or nested source entries.
///
/// Entries that are not JSON objects are skipped and counted; they never
/// abort the batch.
pub fn normalize_entries(entries: &[Value]) -> NormalizedBatch {
    let mut batch = NormalizedBatch {
        records: Vec::with_capacity(entries.len()),
        skipped: 0,
    };

    for (index, entry) in entries.iter().enumerate() {
        let Some(raw) = entry.as_object() else {
            tracing::warn!(index, "skipping source entry that is not an object");
            batch.skipped += 1;
            continue;
        };

        match children_of(raw) {
            Some(children) => {
                let parent = ParentContext::from_raw(raw);
                for child in children {
                    match child.as_object() {
                        Some(child) => batch
                            .records
                            .push(normalize_with_parent(child, Some(&parent))),
                        None => {
                            tracing::warn!(
                                index,
                                community = %parent.community,
                                "skipping nested address that is not an object"
                            );
                            batch.skipped += 1;
                        }
                    }
                }
            }
            None => batch.records.push(normalize_record(raw)),
        }
    }

    tracing::debug!(
        records = batch.records.len(),
        skipped = batch.skipped,
        "normalized source entries"
    );
    batch
}

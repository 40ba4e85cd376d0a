use std::collections::HashSet;

use gatebook_core::analyzer::normalizer::{normalize_code, normalize_label};
use gatebook_core::analyzer::{classify, normalize_record, RawRecord};
use gatebook_core::source::{parse_entries, rows_to_entries};
use gatebook_core::{Directory, ViewState};
use gatebook_types::{CanonicalRecord, Category, CategoryFilter, DirectoryConfig, GroupSort};
use proptest::prelude::*;
use serde_json::{json, Value};

const SAMPLE: &str = r##"
[
  { "community": "Oak Park (85750)", "neighborhood": "Foothills", "city": "Tucson",
    "type": "residential", "addresses": [
      { "address": "12 Elm St", "gate_code": "# 4521" },
      { "address": "14 Elm St", "neighborhood": "", "gate_code": 4522 }
  ] },
  { "community": "Cactus Apartments", "city": "Tucson", "addresses": [
      { "address": "5 Saguaro Way Apt 2", "gate_code": "#0912", "locker_code": "# 77" },
      { "address": "5 Saguaro Way Apt 1" }
  ] },
  { "address": "1 Main St", "business": "Joe's Plumbing LLC", "city": "Oro Valley",
    "tip": "Use side door" },
  { "address": "9 Mesa Dr", "community": "Desert Supply Co", "city": "Tucson" },
  { "address": "77 Ridge Rd", "community": "North - Ridge", "city": "Marana" },
  { "address": "" },
  "garbage"
]
"##;

fn sample() -> Directory {
    let entries = parse_entries(SAMPLE).expect("sample parses");
    Directory::from_entries(&entries, DirectoryConfig::default())
}

fn addresses(view: &gatebook_core::DirectoryView<'_>) -> Vec<String> {
    view.groups
        .iter()
        .flat_map(|g| g.items.iter().map(|r| r.display_address().to_owned()))
        .collect()
}

#[test]
fn sample_loads_and_classifies() {
    let dir = sample();
    let stats = dir.stats();
    assert_eq!(stats.num_records, 8);
    assert_eq!(stats.skipped_entries, 1);
    assert_eq!(stats.count(Category::Apartments), 2);
    assert_eq!(stats.count(Category::Businesses), 2);
    assert_eq!(stats.count(Category::Residential), 4);
}

#[test]
fn nested_children_inherit_neighborhood_unless_blank() {
    // An explicitly blank neighborhood still inherits from the parent.
    let dir = sample();
    let view = dir.view(&ViewState::new(Category::Residential.into()));
    let foothills = view.group("Foothills").expect("Foothills group");
    assert_eq!(foothills.len(), 2);
    assert_eq!(foothills.meta, "Tucson");
}

#[test]
fn residential_view_splits_by_neighborhood() {
    let entries = vec![
        json!({ "community": "Oak Park", "address": "12 Elm St", "city": "Tucson",
                "type": "residential", "neighborhood": "Foothills" }),
        json!({ "community": "Oak Park", "address": "14 Elm St", "city": "Tucson",
                "type": "residential", "neighborhood": "" }),
    ];
    let dir = Directory::from_entries(&entries, DirectoryConfig::default());
    let view = dir.view(&ViewState::new(Category::Residential.into()));

    assert_eq!(view.total_groups, 2);
    assert_eq!(view.total_records, 2);
    let names: Vec<_> = view.groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["Foothills", "Oak Park"]);
    assert_eq!(view.groups[0].items[0].address, "12 Elm St");
    assert_eq!(view.groups[1].items[0].address, "14 Elm St");
}

#[test]
fn business_search_scenario() {
    let dir = sample();
    let businesses = ViewState::new(Category::Businesses.into());

    let hit = dir.view(&businesses.with_query(&dir, "plumbing"));
    assert_eq!(addresses(&hit), ["1 Main St"]);

    let miss = dir.view(&businesses.with_query(&dir, "bakery"));
    assert!(miss.is_empty());
    assert_eq!(miss.summary, "Businesses: 0 addresses in 0 groups");
}

#[test]
fn all_with_empty_query_preserves_count() {
    let dir = sample();
    let view = dir.view(&ViewState::new(CategoryFilter::All));
    assert_eq!(view.total_records, dir.len());
    assert_eq!(addresses(&view).len(), dir.len());
}

#[test]
fn grouping_is_a_partition() {
    let dir = sample();
    for filter in [
        CategoryFilter::All,
        Category::Apartments.into(),
        Category::Businesses.into(),
        Category::Residential.into(),
    ] {
        let matched = dir.filter(filter, "");
        let groups = dir.group(&matched);

        let grouped: Vec<*const CanonicalRecord> = groups
            .iter()
            .flat_map(|g| g.items.iter().map(|r| *r as *const CanonicalRecord))
            .collect();
        let unique: HashSet<_> = grouped.iter().copied().collect();
        let expected: HashSet<_> = matched
            .iter()
            .map(|(r, _)| *r as *const CanonicalRecord)
            .collect();

        assert_eq!(grouped.len(), matched.len(), "{filter}");
        assert_eq!(unique, expected, "{filter}");
    }
}

#[test]
fn regrouping_is_stable() {
    let dir = sample();
    let state = ViewState::new(CategoryFilter::All).with_query(&dir, "st");
    assert_eq!(dir.view(&state), dir.view(&state));
}

#[test]
fn labels_and_codes_are_cleaned() {
    let dir = sample();
    let view = dir.view(&ViewState::new(CategoryFilter::All));
    assert!(view.group("North — Ridge").is_some());

    let apartments = view.group("Cactus Apartments").expect("apartments group");
    assert_eq!(apartments.items[0].address, "5 Saguaro Way Apt 1");
    assert_eq!(apartments.items[1].gate_code, "0912");
    assert_eq!(apartments.items[1].locker_code, "77");

    let oak: Vec<_> = dir
        .records()
        .filter(|(r, _)| r.community == "Oak Park")
        .map(|(r, _)| r.gate_code.as_str())
        .collect();
    assert_eq!(oak, ["4521", "4522"]);
}

#[test]
fn empty_record_lands_in_fallback_group() {
    let dir = sample();
    let view = dir.view(&ViewState::new(Category::Residential.into()));
    let other = view.group("Other").expect("fallback group");
    assert_eq!(other.len(), 1);
    assert_eq!(other.items[0].display_address(), "");
}

#[test]
fn alphabetical_policy() {
    let entries = parse_entries(SAMPLE).unwrap();
    let dir = Directory::from_entries(&entries, DirectoryConfig::alphabetical());
    let view = dir.view(&ViewState::new(CategoryFilter::All));
    let names: Vec<_> = view.groups.iter().map(|g| g.name.to_lowercase()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(dir.config().group_sort, GroupSort::Name);
}

#[test]
fn search_auto_expands_first_groups() {
    let dir = sample();
    let state = ViewState::new(CategoryFilter::All).with_query(&dir, "tucson");
    let view = dir.view(&state);
    assert!(view.groups.iter().all(|g| g.expanded));
    assert_eq!(state.expanded().len(), view.total_groups);
}

#[test]
fn csv_rows_flow_through_pipeline() {
    let headers = ["address", "community", "gate_code", "type"];
    let rows = [
        ["12 Elm St", "Oak Park", "#1", ""],
        ["5 Saguaro Way", "Cactus Flats", "#2", "apartments"],
    ];
    let entries = rows_to_entries(&headers, rows);
    let dir = Directory::from_entries(&entries, DirectoryConfig::default());
    let view = dir.view(&ViewState::new(Category::Apartments.into()));
    assert_eq!(addresses(&view), ["5 Saguaro Way"]);
    assert_eq!(view.groups[0].items[0].gate_code, "2");
}

#[test]
fn unavailable_source_yields_empty_state() {
    let err = parse_entries("{\"oops\": true}").unwrap_err();
    assert!(err.is_data_unavailable());
    let dir = Directory::empty(DirectoryConfig::default());
    let view = dir.view(&ViewState::default());
    assert_eq!(view.total_records, 0);
    assert_eq!(view.total_groups, 0);
}

#[test]
fn documented_examples() {
    assert_eq!(normalize_label("Foothills (85750)"), "Foothills");
    assert_eq!(normalize_code("# 4521"), "4521");

    let business = CanonicalRecord {
        explicit_type: "business".into(),
        business_name: String::new(),
        ..Default::default()
    };
    assert_eq!(classify(&business), Category::Businesses);

    let complex = CanonicalRecord {
        community: "Cactus Apartments".into(),
        ..Default::default()
    };
    assert_eq!(classify(&complex), Category::Apartments);
}

fn field_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[ #a-zA-Z0-9()\\-]{0,24}".prop_map(Value::from),
        Just(json!(["nested"])),
    ]
}

fn raw_record() -> impl Strategy<Value = RawRecord> {
    let keys = prop::sample::select(vec![
        "address",
        "address_raw",
        "community",
        "neighborhood",
        "city",
        "apartment_name",
        "business",
        "gate_code",
        "code",
        "alt_code",
        "locker_code",
        "type",
        "notes",
    ]);
    prop::collection::vec((keys, field_value()), 0..10).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect::<RawRecord>()
    })
}

fn all_fields(record: &CanonicalRecord) -> [&str; 12] {
    [
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
        &record.explicit_type,
        &record.notes,
    ]
}

proptest! {
    #[test]
    fn normalized_fields_are_trimmed(raw in raw_record()) {
        let record = normalize_record(&raw);
        for field in all_fields(&record) {
            prop_assert_eq!(field, field.trim());
        }
        prop_assert!(matches!(
            record.explicit_type.as_str(),
            "" | "apartment" | "business" | "residential"
        ));
    }

    #[test]
    fn classification_is_deterministic(raw in raw_record()) {
        let record = normalize_record(&raw);
        prop_assert_eq!(classify(&record), classify(&record));
    }

    #[test]
    fn grouping_partitions_filtered_records(
        raws in prop::collection::vec(raw_record(), 0..30),
        sort_by_name in any::<bool>(),
    ) {
        let config = if sort_by_name { DirectoryConfig::alphabetical() } else { DirectoryConfig::default() };
        let dir = Directory::from_records(raws.iter().map(normalize_record), config);
        let matched = dir.filter(CategoryFilter::All, "");
        let groups = dir.group(&matched);

        let total: usize = groups.iter().map(|g| g.len()).sum();
        prop_assert_eq!(total, dir.len());
        prop_assert!(groups.iter().all(|g| !g.is_empty() && !g.name.is_empty()));
        prop_assert_eq!(dir.group(&matched), groups);
    }
}

//! Schema Invariant Tests
//!
//! - Validation is deterministic and never fails, it answers
//! - All required keys must be present and non-null
//! - Canonical order tolerates gaps, never inversions
//! - Each version is tested independently for compatibility
//! - A newer version adding a required key excludes documents lacking it

use maml::schema::{
    check_order, is_iso8601, is_valid, valid_for, Compatibility, CompatibilityResolver, FieldKey, FieldKeySpec,
    KeyDefault, KeySpec, MetaKey, Presence, SchemaRegistry, SchemaVersion, Validator,
};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn minimal() -> Value {
    json!({
        "table": "T",
        "version": "beta",
        "date": "2025-09-11",
        "author": "A",
        "fields": [{"name": "x", "data_type": "float"}]
    })
}

const FIELD_KEYS: [FieldKeySpec; 2] = [
    FieldKeySpec::new(FieldKey::Name, Presence::Required, KeyDefault::None),
    FieldKeySpec::new(FieldKey::DataType, Presence::Required, KeyDefault::None),
];

const OLD_KEYS: [KeySpec; 6] = [
    KeySpec::required(MetaKey::Table, KeyDefault::None),
    KeySpec::required(MetaKey::Version, KeyDefault::None),
    KeySpec::required(MetaKey::Date, KeyDefault::None),
    KeySpec::required(MetaKey::Author, KeyDefault::None),
    KeySpec::recommended(MetaKey::License),
    KeySpec::required(MetaKey::Fields, KeyDefault::None),
];

/// Same keys, but `license` is now required.
const NEW_KEYS: [KeySpec; 6] = [
    KeySpec::required(MetaKey::Table, KeyDefault::None),
    KeySpec::required(MetaKey::Version, KeyDefault::None),
    KeySpec::required(MetaKey::Date, KeyDefault::None),
    KeySpec::required(MetaKey::Author, KeyDefault::None),
    KeySpec::required(MetaKey::License, KeyDefault::None),
    KeySpec::required(MetaKey::Fields, KeyDefault::None),
];

static STRICTER_VERSIONS: [SchemaVersion; 2] = [
    SchemaVersion {
        id: "v1.0",
        number: 1.0,
        document_keys: &OLD_KEYS,
        field_keys: &FIELD_KEYS,
    },
    SchemaVersion {
        id: "v1.2",
        number: 1.2,
        document_keys: &NEW_KEYS,
        field_keys: &FIELD_KEYS,
    },
];

static STRICTER: SchemaRegistry = SchemaRegistry::new(&STRICTER_VERSIONS);

// =============================================================================
// Validation Determinism Tests
// =============================================================================

/// Same tree answers the same way every time.
#[test]
fn test_validation_is_deterministic() {
    let doc = minimal();
    for _ in 0..100 {
        assert!(is_valid(&doc, "v1.0"));
        assert!(is_valid(&doc, "v1.1"));
    }
}

/// Unknown versions and non-mapping trees are answered, not raised.
#[test]
fn test_predicates_never_fail() {
    assert!(!is_valid(&minimal(), "v9.9"));
    assert!(!check_order(&minimal(), "v9.9"));
    assert!(!is_valid(&json!([1, 2, 3]), "v1.0"));
    assert!(!is_valid(&Value::Null, "v1.1"));
}

// =============================================================================
// Required Key Tests
// =============================================================================

/// Removing any required key invalidates the document.
#[test]
fn test_each_required_key_is_required() {
    for key in ["table", "version", "date", "author", "fields"] {
        let mut doc = minimal();
        doc.as_object_mut().unwrap().remove(key);
        assert!(!is_valid(&doc, "v1.0"), "missing {} should be invalid", key);
        assert!(!is_valid(&doc, "v1.1"), "missing {} should be invalid", key);
    }
}

/// A null required key is the same as a missing one.
#[test]
fn test_null_required_key_is_invalid() {
    let mut doc = minimal();
    doc["author"] = Value::Null;
    assert!(!is_valid(&doc, "v1.0"));
}

/// Each field entry needs a name and a data type.
#[test]
fn test_field_required_keys() {
    let mut doc = minimal();
    doc["fields"] = json!([{"name": "x"}]);
    assert!(!is_valid(&doc, "v1.0"));

    doc["fields"] = json!([{"data_type": "int"}]);
    assert!(!is_valid(&doc, "v1.0"));

    doc["fields"] = json!([]);
    assert!(!is_valid(&doc, "v1.0"));
}

/// Optional and recommended keys never affect validity.
#[test]
fn test_optional_keys_do_not_matter() {
    let mut doc = minimal();
    doc["license"] = json!("MIT");
    doc["keywords"] = json!(["a"]);
    assert!(is_valid(&doc, "v1.0"));
}

// =============================================================================
// Date Tests
// =============================================================================

#[test]
fn test_iso8601_dates() {
    assert!(is_iso8601("2025-01-01"));
    assert!(is_iso8601("2024-02-29"));
    assert!(is_iso8601("2025-01-01T12:30:00"));
    assert!(is_iso8601("2025-01-01T12:30:00Z"));

    for bad in [
        "2025-13-01",
        "2025/01/01",
        "",
        "01-01-2025",
        "2025-00-10",
        "2025-01-32",
        "not-a-date",
        "2023-02-29",
        "2025-06-30T23:59:60",
    ] {
        assert!(!is_iso8601(bad), "{} should be rejected", bad);
    }
}

/// A malformed date invalidates the document in every version.
#[test]
fn test_bad_date_invalidates_document() {
    let mut doc = minimal();
    doc["date"] = json!("11/09/2025");
    assert!(!is_valid(&doc, "v1.0"));
    assert!(!is_valid(&doc, "v1.1"));
    assert!(valid_for(&doc).is_none());
}

// =============================================================================
// Canonical Order Tests
// =============================================================================

/// Gaps are fine; only relative order of present keys matters.
#[test]
fn test_order_with_gaps() {
    let doc = json!({"table": "T", "author": "A", "fields": []});
    assert!(check_order(&doc, "v1.0"));
}

/// Swapping any two present keys breaks the order.
#[test]
fn test_order_inversions() {
    let canonical = ["table", "version", "date", "author", "fields"];
    for i in 0..canonical.len() {
        for j in (i + 1)..canonical.len() {
            let mut keys = canonical;
            keys.swap(i, j);
            let mut doc = serde_json::Map::new();
            for key in keys {
                doc.insert(key.to_string(), minimal()[key].clone());
            }
            assert!(!check_order(&Value::Object(doc), "v1.0"), "swap {} <-> {}", keys[i], keys[j]);
        }
    }
}

/// Field keys are order-checked too.
#[test]
fn test_field_order() {
    let mut doc = minimal();
    doc["fields"] = json!([{"data_type": "float", "name": "x"}]);
    assert!(is_valid(&doc, "v1.0"));
    assert!(!check_order(&doc, "v1.0"));
}

/// Keys the version does not know are skipped by the order check.
#[test]
fn test_order_ignores_unknown_keys() {
    let doc = json!({"table": "T", "keyarray": ["a"], "version": "1"});
    assert!(check_order(&doc, "v1.0"));
}

// =============================================================================
// Registry Tests
// =============================================================================

#[test]
fn test_registry_listing() {
    let registry = SchemaRegistry::standard();
    assert_eq!(registry.all_versions_ordered(), vec!["v1.0", "v1.1"]);
    assert_eq!(
        registry.required_keys("v1.1").unwrap(),
        vec!["table", "version", "date", "author", "fields"]
    );
    assert_eq!(registry.recommended_keys("v1.0").unwrap(), vec!["dataset", "license"]);
    assert_eq!(
        registry.field_key_order("v1.0").unwrap(),
        vec!["name", "unit", "description", "ucd", "data_type"]
    );
    assert_eq!(registry.resolve("v2").unwrap_err().code(), "MAML_UNKNOWN_VERSION");
}

/// Later versions keep every earlier required key, in order.
#[test]
fn test_registries_are_monotonic() {
    assert!(SchemaRegistry::standard().verify_monotonic().is_ok());
    assert!(STRICTER.verify_monotonic().is_ok());
}

// =============================================================================
// Compatibility Tests
// =============================================================================

/// A minimal document satisfies the full chain.
#[test]
fn test_full_chain() {
    assert_eq!(valid_for(&minimal()), Compatibility::Versions(vec!["v1.0", "v1.1"]));
}

/// Nothing satisfied is the `none` sentinel, not an empty list.
#[test]
fn test_none_sentinel() {
    let result = valid_for(&json!({"table": "T"}));
    assert!(result.is_none());
    assert_eq!(result.to_string(), "none");
}

/// A newer version with an added required key excludes documents lacking it.
#[test]
fn test_monotonic_exclusion() {
    let resolver = CompatibilityResolver::new(&STRICTER);
    assert_eq!(resolver.valid_for(&minimal()), Compatibility::Versions(vec!["v1.0"]));

    let mut licensed = minimal();
    licensed["license"] = json!("MIT");
    assert_eq!(resolver.valid_for(&licensed), Compatibility::Versions(vec!["v1.0", "v1.2"]));
}

/// The resolver agrees with the validator, version by version.
#[test]
fn test_resolver_matches_validator() {
    let validator = Validator::new(&STRICTER);
    let resolver = CompatibilityResolver::new(&STRICTER);
    let mut licensed = minimal();
    licensed["license"] = json!("MIT");

    for doc in [minimal(), licensed, json!({})] {
        let result = resolver.valid_for(&doc);
        for version in STRICTER.all_versions_ordered() {
            assert_eq!(result.contains(version), validator.is_valid(&doc, version));
        }
    }
}

//! Document tree validation against one schema version
//!
//! Validation semantics:
//! - Every required document key is present and non-null
//! - `fields` is a non-empty list of mappings
//! - Every field holds every required field key, non-null
//! - `date` is an ISO 8601 calendar date or date-time
//!
//! Predicates here never fail: malformed input is simply invalid.
//! Value shapes beyond presence are checked when a document is bound.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;
use serde_json::{Map, Value};

use super::errors::ValidationDetails;
use super::registry::SchemaRegistry;
use super::types::{MetaKey, Presence, SchemaVersion};

/// Validator bound to a schema registry.
///
/// Stateless apart from the registry borrow; the same tree always gives the
/// same answer.
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validator over the published versions.
    pub fn standard() -> Validator<'static> {
        Validator::new(SchemaRegistry::standard())
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Returns true iff `tree` satisfies `version_id`.
    ///
    /// Unknown versions are never satisfied.
    pub fn is_valid(&self, tree: &Value, version_id: &str) -> bool {
        match self.registry.resolve(version_id) {
            Ok(version) => first_violation(tree, version).is_none(),
            Err(_) => false,
        }
    }

    /// Returns true iff the keys present in `tree` follow canonical order,
    /// including inside each field entry.
    pub fn check_order(&self, tree: &Value, version_id: &str) -> bool {
        let Ok(version) = self.registry.resolve(version_id) else {
            return false;
        };
        let Some(doc) = tree.as_object() else {
            return false;
        };

        if !keys_in_order(doc, |key| version.document_position(key)) {
            return false;
        }

        match doc.get(MetaKey::Fields.name()).and_then(Value::as_array) {
            Some(fields) => fields
                .iter()
                .filter_map(Value::as_object)
                .all(|field| keys_in_order(field, |key| version.field_position(key))),
            None => true,
        }
    }
}

/// Finds the first rule `tree` breaks for `version`.
pub fn first_violation(tree: &Value, version: &SchemaVersion) -> Option<ValidationDetails> {
    let Some(doc) = tree.as_object() else {
        return Some(ValidationDetails::type_mismatch("$root", "mapping", json_type_name(tree)));
    };

    for spec in version.document_keys_with(Presence::Required) {
        let key = spec.key.name();
        match doc.get(key) {
            None => return Some(ValidationDetails::missing_key(key)),
            Some(Value::Null) => return Some(ValidationDetails::null_value(key)),
            Some(_) => {}
        }
    }

    if version.has_key(MetaKey::Fields) {
        if let Some(details) = fields_violation(doc, version) {
            return Some(details);
        }
    }

    if version.has_key(MetaKey::Date) {
        if let Some(date) = doc.get(MetaKey::Date.name()).filter(|value| !value.is_null()) {
            match date.as_str() {
                Some(text) if is_iso8601(text) => {}
                Some(text) => {
                    return Some(ValidationDetails::new("date", "ISO 8601 date", format!("'{}'", text)))
                }
                None => {
                    return Some(ValidationDetails::type_mismatch("date", "ISO 8601 date", json_type_name(date)))
                }
            }
        }
    }

    None
}

fn fields_violation(doc: &Map<String, Value>, version: &SchemaVersion) -> Option<ValidationDetails> {
    let key = MetaKey::Fields.name();
    let fields = match doc.get(key) {
        Some(Value::Array(fields)) => fields,
        Some(Value::Null) | None => return None,
        Some(other) => return Some(ValidationDetails::type_mismatch(key, "list of fields", json_type_name(other))),
    };

    if fields.is_empty() {
        return Some(ValidationDetails::new(key, "at least one field", "empty list"));
    }

    for (i, field) in fields.iter().enumerate() {
        let path = format!("{}[{}]", key, i);
        let Some(field) = field.as_object() else {
            return Some(ValidationDetails::type_mismatch(path, "mapping", json_type_name(field)));
        };
        for spec in version.field_keys_with(Presence::Required) {
            let field_key = spec.key.name();
            match field.get(field_key) {
                None => return Some(ValidationDetails::missing_key(make_path(&path, field_key))),
                Some(Value::Null) => return Some(ValidationDetails::null_value(make_path(&path, field_key))),
                Some(_) => {}
            }
        }
    }

    None
}

fn keys_in_order<F>(map: &Map<String, Value>, position: F) -> bool
where
    F: Fn(&str) -> Option<usize>,
{
    let mut last: Option<usize> = None;
    for key in map.keys() {
        let Some(pos) = position(key) else {
            continue;
        };
        if let Some(prev) = last {
            if pos <= prev {
                return false;
            }
        }
        last = Some(pos);
    }
    true
}

/// Date-time layouts accepted after the `YYYY-MM-DD` prefix, separator
/// normalized to `T`.
const NAIVE_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
const OFFSET_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%:z", "%Y-%m-%dT%H:%M%:z"];

fn date_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d{1,9})?)?(?:Z|[+-]\d{2}:\d{2})?)?$")
            .unwrap_or_else(|e| panic!("date pattern must compile: {}", e))
    })
}

/// Returns true iff `s` is an ISO 8601 calendar date or date-time.
pub fn is_iso8601(s: &str) -> bool {
    if !date_shape().is_match(s) {
        return false;
    }
    if s.len() == 10 {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok();
    }

    let mut normalized = s.replacen(' ', "T", 1);
    if normalized.ends_with('Z') {
        normalized.pop();
        normalized.push_str("+00:00");
    }

    let parsed = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
        .or_else(|| {
            OFFSET_DATETIME_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(&normalized, format).ok())
                .map(|stamp| stamp.naive_utc())
        });

    // chrono reads second 60 as a leap second; ISO timestamps stop at 59
    matches!(parsed, Some(stamp) if stamp.nanosecond() < 1_000_000_000)
}

/// Returns true iff `tree` satisfies `version_id` in the published registry.
pub fn is_valid(tree: &Value, version_id: &str) -> bool {
    Validator::standard().is_valid(tree, version_id)
}

/// Canonical-order check against the published registry.
pub fn check_order(tree: &Value, version_id: &str) -> bool {
    Validator::standard().check_order(tree, version_id)
}

/// Returns the type name used in validation messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// Creates a key path from prefix and key name.
pub(crate) fn make_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

//! Shape coercion for document tree values
//!
//! Trees come from a generic deserializer, so a value may not have the
//! shape its key calls for. These helpers convert or report an
//! `InvalidValue` naming the key path.

use serde_json::{Map, Value};

use crate::schema::{json_type_name, MamlError, MamlResult, ValidationDetails, ValueKind};

/// Text form of a scalar. Numbers and booleans become their text.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn text(value: &Value, path: &str) -> MamlResult<String> {
    as_text(value).ok_or_else(|| mismatch(path, ValueKind::Text, value))
}

/// A string or number, kept as given.
pub(crate) fn scalar(value: &Value, path: &str) -> MamlResult<Value> {
    match value {
        Value::String(_) | Value::Number(_) => Ok(value.clone()),
        other => Err(mismatch(path, ValueKind::Scalar, other)),
    }
}

pub(crate) fn text_list(value: &Value, path: &str) -> MamlResult<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| mismatch(path, ValueKind::TextList, value))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| text(item, &format!("{}[{}]", path, i)))
        .collect()
}

pub(crate) fn mapping(value: &Value, path: &str) -> MamlResult<Map<String, Value>> {
    value
        .as_object()
        .cloned()
        .ok_or_else(|| mismatch(path, ValueKind::Mapping, value))
}

/// Looks up `key`, treating `null` as absent.
pub(crate) fn present<'v>(map: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
    map.get(key).filter(|value| !value.is_null())
}

fn mismatch(path: &str, kind: ValueKind, actual: &Value) -> MamlError {
    MamlError::InvalidValue(ValidationDetails::type_mismatch(path, kind.type_name(), json_type_name(actual)))
}

/// Emits a text list as a tree value.
pub(crate) fn list_value(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

//! Incremental document builder
//!
//! `MamlBuilder` accumulates values into a draft tree bound to one schema
//! version, then hands the draft to `MamlDocument::bind_schema`. In defaults
//! mode required keys are seeded with `__REQUIRED__: ...` placeholders; the
//! draft can be inspected and written out, but it cannot be built until each
//! placeholder is replaced.

use serde_json::{Map, Number, Value};

use super::document::{find_placeholder, MamlDocument};
use super::tabular::TabularSource;
use crate::context::Context;
use crate::schema::{
    first_violation, FieldKey, KeyDefault, MamlResult, MetaKey, SchemaRegistry, SchemaVersion,
};

/// Draft document bound to one schema version.
#[derive(Debug, Clone)]
pub struct MamlBuilder {
    schema: &'static SchemaVersion,
    draft: Map<String, Value>,
}

impl MamlBuilder {
    /// Empty draft for a version of the standard registry.
    pub fn new(version_id: &str) -> MamlResult<Self> {
        Self::new_in(SchemaRegistry::standard(), version_id)
    }

    pub fn new_in(registry: &'static SchemaRegistry, version_id: &str) -> MamlResult<Self> {
        let schema = registry.resolve(version_id)?;
        Ok(Self {
            schema,
            draft: Map::new(),
        })
    }

    /// Draft pre-seeded with the version's defaults.
    pub fn with_defaults(version_id: &str) -> MamlResult<Self> {
        let mut builder = Self::new(version_id)?;
        builder.seed_defaults();
        Ok(builder)
    }

    /// Seeds every key that has a default and is not already set.
    pub fn seed_defaults(&mut self) -> &mut Self {
        for spec in self.schema.document_keys {
            let key = spec.key.name();
            if self.draft.contains_key(key) {
                continue;
            }
            let seeded = if spec.key == MetaKey::Fields {
                Some(Value::Array(vec![Value::Object(placeholder_field(self.schema))]))
            } else {
                default_value(spec.default, self.schema)
            };
            if let Some(value) = seeded {
                self.draft.insert(key.to_string(), value);
            }
        }
        self
    }

    /// Sets `key`, replacing whatever was there.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.draft.insert(key.to_string(), value.into());
        self
    }

    /// Appends `value` to the list at `key`.
    ///
    /// An absent or `null` key becomes a one-element list; a scalar already
    /// there becomes the first element of a two-element list.
    pub fn add(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match self.draft.get_mut(key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) if !existing.is_null() => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            _ => {
                self.draft.insert(key.to_string(), Value::Array(vec![value]));
            }
        }
        self
    }

    /// Replaces `fields` with one entry per column of `table`.
    ///
    /// An empty table removes `fields` from the draft.
    pub fn fields_from_table(&mut self, table: &dyn TabularSource) -> &mut Self {
        let columns = table.columns();
        let key = MetaKey::Fields.name();
        if columns.is_empty() {
            self.draft.remove(key);
            return self;
        }

        let fields = columns
            .into_iter()
            .map(|column| {
                let mut field = Map::new();
                field.insert(FieldKey::Name.name().to_string(), Value::String(column.label));
                field.insert(FieldKey::DataType.name().to_string(), Value::String(column.element_type));
                Value::Object(field)
            })
            .collect();
        self.draft.insert(key.to_string(), Value::Array(fields));
        self
    }

    /// Every key the bound version recognizes, in canonical order.
    pub fn possible_metadata(&self) -> Vec<&'static str> {
        self.schema.document_keys.iter().map(|spec| spec.key.name()).collect()
    }

    pub fn schema(&self) -> &'static SchemaVersion {
        self.schema
    }

    pub fn draft(&self) -> &Map<String, Value> {
        &self.draft
    }

    /// Draft as a document tree, keys in the order they were first set.
    pub fn draft_tree(&self) -> Value {
        Value::Object(self.draft.clone())
    }

    /// True when `build` would pass schema validation and no placeholder
    /// remains.
    pub fn is_ready(&self) -> bool {
        let tree = self.draft_tree();
        first_violation(&tree, self.schema).is_none()
            && self
                .draft
                .iter()
                .all(|(key, value)| find_placeholder(value, key).is_none())
    }

    /// Validates the draft and binds it.
    pub fn build(self, ctx: &Context<'_>) -> MamlResult<MamlDocument> {
        MamlDocument::bind_schema(&Value::Object(self.draft), self.schema, ctx)
    }
}

fn default_value(default: KeyDefault, schema: &SchemaVersion) -> Option<Value> {
    match default {
        KeyDefault::None => None,
        KeyDefault::Placeholder(text) => Some(Value::String(KeyDefault::placeholder_text(text))),
        KeyDefault::Today => Some(Value::String(chrono::Local::now().format("%Y-%m-%d").to_string())),
        KeyDefault::Null => Some(Value::Null),
        KeyDefault::SchemaNumber => Number::from_f64(schema.number).map(Value::Number),
    }
}

fn placeholder_field(schema: &SchemaVersion) -> Map<String, Value> {
    let mut field = Map::new();
    for spec in schema.field_keys {
        if let Some(value) = default_value(spec.default, schema) {
            field.insert(spec.key.name().to_string(), value);
        }
    }
    field
}

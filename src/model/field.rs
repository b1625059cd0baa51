//! Field descriptors
//!
//! A `Field` describes one column: name, data type and the optional unit,
//! description and UCD. A field holding a UCD has had that UCD accepted by
//! the vocabulary; there is no way to build one otherwise.

use serde_json::{Map, Value};

use super::values::{present, text};
use crate::context::Context;
use crate::observability::Advisory;
use crate::schema::{FieldKey, MamlError, MamlResult, Presence, SchemaVersion};
use crate::vocabulary::TagVocabulary;

/// One column descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    data_type: String,
    unit: Option<String>,
    description: Option<String>,
    ucd: Option<String>,
}

impl Field {
    /// Creates a field with no unit, description or UCD.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            unit: None,
            description: None,
            ucd: None,
        }
    }

    /// Builds a field in one go; fails if `ucd` is given and not recognized.
    pub fn construct(
        name: impl Into<String>,
        data_type: impl Into<String>,
        unit: Option<&str>,
        description: Option<&str>,
        ucd: Option<&str>,
        vocabulary: &dyn TagVocabulary,
    ) -> MamlResult<Self> {
        let mut field = Self::new(name, data_type);
        field.unit = unit.map(str::to_string);
        field.description = description.map(str::to_string);
        match ucd {
            Some(ucd) => field.with_ucd(ucd, vocabulary),
            None => Ok(field),
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches a UCD after checking it against `vocabulary`.
    pub fn with_ucd(mut self, ucd: impl Into<String>, vocabulary: &dyn TagVocabulary) -> MamlResult<Self> {
        let ucd = ucd.into();
        if !vocabulary.is_recognized_tag(&ucd) {
            return Err(MamlError::invalid_tag(ucd));
        }
        self.ucd = Some(ucd);
        Ok(self)
    }

    /// Builds a field from a partial mapping.
    ///
    /// `name` and `data_type` are required. Every field key the version
    /// marks recommended is reported as an advisory when absent; `null`
    /// counts as absent. Keys the field does not know are ignored.
    pub fn from_mapping(map: &Map<String, Value>, version: &SchemaVersion, ctx: &Context<'_>) -> MamlResult<Self> {
        let name = match present(map, FieldKey::Name.name()) {
            Some(value) => text(value, FieldKey::Name.name())?,
            None => return Err(MamlError::missing_key(FieldKey::Name.name(), "field")),
        };
        let data_type = match present(map, FieldKey::DataType.name()) {
            Some(value) => text(value, FieldKey::DataType.name())?,
            None => return Err(MamlError::missing_key(FieldKey::DataType.name(), format!("field '{}'", name))),
        };

        let mut field = Self::new(name, data_type);
        field.unit = optional_text(map, FieldKey::Unit)?;
        field.description = optional_text(map, FieldKey::Description)?;
        if let Some(ucd) = optional_text(map, FieldKey::Ucd)? {
            field = field.with_ucd(ucd, ctx.vocabulary())?;
        }

        for spec in version.field_keys_with(Presence::Recommended) {
            if field.get(spec.key).is_none() {
                ctx.diagnostics().report(&Advisory::FieldKeyMissing {
                    field: field.name.clone(),
                    key: spec.key.name().to_string(),
                });
            }
        }

        Ok(field)
    }

    /// Emits the field in the version's canonical field-key order.
    ///
    /// With `include_unset`, absent keys are written as `null`.
    pub fn to_mapping(&self, version: &SchemaVersion, include_unset: bool) -> Map<String, Value> {
        let mut map = Map::new();
        for spec in version.field_keys {
            match self.get(spec.key) {
                Some(value) => {
                    map.insert(spec.key.name().to_string(), Value::String(value.to_string()));
                }
                None if include_unset => {
                    map.insert(spec.key.name().to_string(), Value::Null);
                }
                None => {}
            }
        }
        map
    }

    /// Value of one field key.
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        match key {
            FieldKey::Name => Some(&self.name),
            FieldKey::DataType => Some(&self.data_type),
            FieldKey::Unit => self.unit.as_deref(),
            FieldKey::Description => self.description.as_deref(),
            FieldKey::Ucd => self.ucd.as_deref(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn ucd(&self) -> Option<&str> {
        self.ucd.as_deref()
    }
}

fn optional_text(map: &Map<String, Value>, key: FieldKey) -> MamlResult<Option<String>> {
    present(map, key.name()).map(|value| text(value, key.name())).transpose()
}

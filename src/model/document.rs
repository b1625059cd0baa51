//! The bound MAML document
//!
//! A `MamlDocument` only exists in a valid state: every required key of its
//! schema version is set, `date` is ISO 8601 and every field passed its own
//! checks. Binding is all-or-nothing.

use std::fmt::Display;

use serde_json::{Map, Value};

use super::field::Field;
use super::values::{list_value, mapping, present, scalar, text, text_list};
use crate::context::Context;
use crate::observability::Advisory;
use crate::render::{DisplayFormatter, TextFormatter};
use crate::schema::{
    first_violation, is_iso8601, json_type_name, make_path, CompatibilityResolver, MamlError, MamlResult, MetaKey,
    Presence, SchemaVersion, ValidationDetails, PLACEHOLDER_PREFIX,
};

/// A validated MAML document bound to one schema version.
#[derive(Debug, Clone, PartialEq)]
pub struct MamlDocument {
    schema: &'static SchemaVersion,
    table: String,
    version: Value,
    date: String,
    author: String,
    survey: Option<String>,
    dataset: Option<String>,
    license: Option<String>,
    coauthors: Option<Vec<String>>,
    depends: Option<Vec<String>>,
    comments: Option<Vec<String>>,
    keywords: Option<Vec<String>>,
    keyarray: Option<Vec<String>>,
    extra: Option<Map<String, Value>>,
    maml_version: Option<Value>,
    fields: Vec<Field>,
}

/// Values collected while binding, before required ones are known present.
#[derive(Default)]
struct Slots {
    table: Option<String>,
    version: Option<Value>,
    date: Option<String>,
    author: Option<String>,
    survey: Option<String>,
    dataset: Option<String>,
    license: Option<String>,
    coauthors: Option<Vec<String>>,
    depends: Option<Vec<String>>,
    comments: Option<Vec<String>>,
    keywords: Option<Vec<String>>,
    keyarray: Option<Vec<String>>,
    extra: Option<Map<String, Value>>,
    maml_version: Option<Value>,
}

impl Slots {
    fn assign(&mut self, key: MetaKey, value: &Value) -> MamlResult<()> {
        let path = key.name();
        match key {
            MetaKey::Table => self.table = Some(text(value, path)?),
            MetaKey::Version => self.version = Some(scalar(value, path)?),
            MetaKey::Date => self.date = Some(text(value, path)?),
            MetaKey::Author => self.author = Some(text(value, path)?),
            MetaKey::Survey => self.survey = Some(text(value, path)?),
            MetaKey::Dataset => self.dataset = Some(text(value, path)?),
            MetaKey::License => self.license = Some(text(value, path)?),
            MetaKey::Coauthors => self.coauthors = Some(text_list(value, path)?),
            MetaKey::Depends => self.depends = Some(text_list(value, path)?),
            MetaKey::Comments => self.comments = Some(text_list(value, path)?),
            MetaKey::Keywords => self.keywords = Some(text_list(value, path)?),
            MetaKey::Keyarray => self.keyarray = Some(text_list(value, path)?),
            MetaKey::Extra => self.extra = Some(mapping(value, path)?),
            MetaKey::MamlVersion => self.maml_version = Some(scalar(value, path)?),
            MetaKey::Fields => {}
        }
        Ok(())
    }
}

impl MamlDocument {
    /// Validates `tree` against `version_id` and binds it.
    ///
    /// # Errors
    ///
    /// - `UnknownVersion` if the registry does not know `version_id`
    /// - `InvalidDocument` if the tree is not valid for the version, a field
    ///   fails its own checks, a value has the wrong shape, or a builder
    ///   placeholder is still in place
    pub fn bind(tree: &Value, version_id: &str, ctx: &Context<'_>) -> MamlResult<Self> {
        let schema = ctx.registry().resolve(version_id)?;
        Self::bind_schema(tree, schema, ctx)
    }

    /// Binds to the newest version the tree satisfies.
    pub fn bind_latest(tree: &Value, ctx: &Context<'_>) -> MamlResult<Self> {
        let registry = ctx.registry();
        if let Some(version_id) = CompatibilityResolver::new(registry).valid_for(tree).latest() {
            return Self::bind(tree, version_id, ctx);
        }

        let latest = registry
            .latest()
            .ok_or_else(|| MamlError::unknown_version("(empty registry)"))?;
        let details = first_violation(tree, latest)
            .unwrap_or_else(|| ValidationDetails::new("$root", "a valid document", "no version matched"));
        Err(MamlError::invalid_document(latest.id, details))
    }

    /// Binds to an already resolved schema version.
    pub fn bind_schema(tree: &Value, schema: &'static SchemaVersion, ctx: &Context<'_>) -> MamlResult<Self> {
        if let Some(details) = first_violation(tree, schema) {
            return Err(MamlError::invalid_document(schema.id, details));
        }
        let Some(doc) = tree.as_object() else {
            let details = ValidationDetails::type_mismatch("$root", "mapping", json_type_name(tree));
            return Err(MamlError::invalid_document(schema.id, details));
        };

        for key in doc.keys() {
            if schema.document_key(key).is_none() {
                ctx.diagnostics().report(&Advisory::UnrecognizedKey {
                    version: schema.id.to_string(),
                    key: key.clone(),
                });
            }
        }

        let mut slots = Slots::default();
        let mut fields = Vec::new();

        for spec in schema.document_keys {
            let key = spec.key.name();
            let Some(value) = present(doc, key) else {
                if spec.presence == Presence::Recommended {
                    ctx.diagnostics().report(&Advisory::RecommendedKeyMissing {
                        version: schema.id.to_string(),
                        key: key.to_string(),
                    });
                }
                continue;
            };

            if let Some(details) = find_placeholder(value, key) {
                return Err(MamlError::invalid_document(schema.id, details));
            }

            if spec.key == MetaKey::Fields {
                fields = bind_fields(value, schema, ctx)?;
            } else {
                slots
                    .assign(spec.key, value)
                    .map_err(|e| MamlError::invalid_document_caused_by(schema.id, key, e))?;
            }
        }

        Ok(Self {
            schema,
            table: require(slots.table, schema, MetaKey::Table)?,
            version: require(slots.version, schema, MetaKey::Version)?,
            date: require(slots.date, schema, MetaKey::Date)?,
            author: require(slots.author, schema, MetaKey::Author)?,
            survey: slots.survey,
            dataset: slots.dataset,
            license: slots.license,
            coauthors: slots.coauthors,
            depends: slots.depends,
            comments: slots.comments,
            keywords: slots.keywords,
            keyarray: slots.keyarray,
            extra: slots.extra,
            maml_version: slots.maml_version,
            fields,
        })
    }

    /// Emits the document in canonical key order.
    ///
    /// With `include_unset`, keys the version knows but the document does
    /// not set are written as `null`; otherwise they are omitted.
    pub fn to_document_tree(&self, include_unset: bool) -> Value {
        let mut tree = Map::new();
        for spec in self.schema.document_keys {
            let key = spec.key.name().to_string();
            if spec.key == MetaKey::Fields {
                let fields = self
                    .fields
                    .iter()
                    .map(|field| Value::Object(field.to_mapping(self.schema, include_unset)))
                    .collect();
                tree.insert(key, Value::Array(fields));
                continue;
            }
            match self.value_of(spec.key) {
                Some(value) => {
                    tree.insert(key, value);
                }
                None if include_unset => {
                    tree.insert(key, Value::Null);
                }
                None => {}
            }
        }
        Value::Object(tree)
    }

    /// Tree value of one metadata key, `None` when unset.
    ///
    /// `fields` is not a metadata value; use `to_document_tree`.
    pub fn value_of(&self, key: MetaKey) -> Option<Value> {
        let text = |value: &Option<String>| value.clone().map(Value::String);
        let list = |value: &Option<Vec<String>>| value.as_deref().map(list_value);
        match key {
            MetaKey::Table => Some(Value::String(self.table.clone())),
            MetaKey::Version => Some(self.version.clone()),
            MetaKey::Date => Some(Value::String(self.date.clone())),
            MetaKey::Author => Some(Value::String(self.author.clone())),
            MetaKey::Survey => text(&self.survey),
            MetaKey::Dataset => text(&self.dataset),
            MetaKey::License => text(&self.license),
            MetaKey::Coauthors => list(&self.coauthors),
            MetaKey::Depends => list(&self.depends),
            MetaKey::Comments => list(&self.comments),
            MetaKey::Keywords => list(&self.keywords),
            MetaKey::Keyarray => list(&self.keyarray),
            MetaKey::Extra => self.extra.clone().map(Value::Object),
            MetaKey::MamlVersion => self.maml_version.clone(),
            MetaKey::Fields => None,
        }
    }

    /// Human-readable summary using the built-in formatter.
    pub fn to_display_text(&self) -> String {
        self.to_display_text_with(&TextFormatter)
    }

    pub fn to_display_text_with(&self, formatter: &dyn DisplayFormatter) -> String {
        formatter.render(self)
    }

    /// Appends an already validated field.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Builds a field from a mapping and appends it. On failure the field
    /// list is left as it was.
    pub fn add_field_from_mapping(&mut self, map: &Map<String, Value>, ctx: &Context<'_>) -> MamlResult<()> {
        let field = Field::from_mapping(map, self.schema, ctx)?;
        self.fields.push(field);
        Ok(())
    }

    /// Replaces the date. The new value must be ISO 8601.
    pub fn set_date(&mut self, date: &str) -> MamlResult<()> {
        if !is_iso8601(date) {
            return Err(MamlError::InvalidDate {
                value: date.to_string(),
            });
        }
        self.date = date.to_string();
        Ok(())
    }

    /// Appends the text form of `comment` to `comments`.
    pub fn add_comment(&mut self, comment: impl Display) -> MamlResult<()> {
        if !self.schema.has_key(MetaKey::Comments) {
            return Err(MamlError::InvalidValue(ValidationDetails::new(
                MetaKey::Comments.name(),
                format!("a key of MAML {}", self.schema.id),
                "unsupported key",
            )));
        }
        self.comments.get_or_insert_with(Vec::new).push(comment.to_string());
        Ok(())
    }

    /// Identifier of the bound schema version
    pub fn schema_version(&self) -> &'static str {
        self.schema.id
    }

    pub fn schema(&self) -> &'static SchemaVersion {
        self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// The dataset's own version (string or number, as written)
    pub fn version(&self) -> &Value {
        &self.version
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn survey(&self) -> Option<&str> {
        self.survey.as_deref()
    }

    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    pub fn coauthors(&self) -> Option<&[String]> {
        self.coauthors.as_deref()
    }

    pub fn depends(&self) -> Option<&[String]> {
        self.depends.as_deref()
    }

    pub fn comments(&self) -> Option<&[String]> {
        self.comments.as_deref()
    }

    pub fn keywords(&self) -> Option<&[String]> {
        self.keywords.as_deref()
    }

    pub fn keyarray(&self) -> Option<&[String]> {
        self.keyarray.as_deref()
    }

    pub fn extra(&self) -> Option<&Map<String, Value>> {
        self.extra.as_ref()
    }

    pub fn maml_version(&self) -> Option<&Value> {
        self.maml_version.as_ref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

fn require<T>(slot: Option<T>, schema: &SchemaVersion, key: MetaKey) -> MamlResult<T> {
    slot.ok_or_else(|| MamlError::invalid_document(schema.id, ValidationDetails::missing_key(key.name())))
}

fn bind_fields(value: &Value, schema: &SchemaVersion, ctx: &Context<'_>) -> MamlResult<Vec<Field>> {
    let key = MetaKey::Fields.name();
    let Some(entries) = value.as_array() else {
        let details = ValidationDetails::type_mismatch(key, "list of fields", json_type_name(value));
        return Err(MamlError::invalid_document(schema.id, details));
    };

    let mut fields = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let path = format!("{}[{}]", key, i);
        let Some(map) = entry.as_object() else {
            let details = ValidationDetails::type_mismatch(path, "mapping", json_type_name(entry));
            return Err(MamlError::invalid_document(schema.id, details));
        };

        for field_key in map.keys() {
            if schema.field_key(field_key).is_none() {
                ctx.diagnostics().report(&Advisory::UnrecognizedKey {
                    version: schema.id.to_string(),
                    key: make_path(&path, field_key),
                });
            }
        }

        let field = Field::from_mapping(map, schema, ctx)
            .map_err(|e| MamlError::invalid_document_caused_by(schema.id, &path, e))?;
        fields.push(field);
    }
    Ok(fields)
}

/// Finds a builder placeholder left anywhere inside `value`.
pub(crate) fn find_placeholder(value: &Value, path: &str) -> Option<ValidationDetails> {
    match value {
        Value::String(s) if s.starts_with(PLACEHOLDER_PREFIX) => Some(ValidationDetails::placeholder(path, s)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| find_placeholder(item, &format!("{}[{}]", path, i))),
        Value::Object(map) => map
            .iter()
            .find_map(|(key, item)| find_placeholder(item, &make_path(path, key))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::MemoryDiagnostics;
    use serde_json::json;

    fn full_v11() -> Value {
        json!({
            "survey": "GAMA",
            "dataset": "DR4",
            "table": "StellarMasses",
            "version": "1.2.0",
            "date": "2025-06-30",
            "author": "A. Author <a@example.org>",
            "coauthors": ["B. Author", "C. Author"],
            "depends": ["gkvInputCat"],
            "comments": ["Masses from SED fitting"],
            "license": "CC-BY-4.0",
            "keywords": ["mass", "SED"],
            "keyarray": ["galaxies", "stellar", "mass"],
            "extra": {"pipeline": "ProSpect"},
            "MAML_version": 1.1,
            "fields": [
                {"name": "uberID", "unit": "", "description": "Unique ID", "ucd": "meta.id;meta.main", "data_type": "int64"},
                {"name": "mstar", "unit": "dex(Msun)", "description": "Stellar mass", "ucd": "phys.mass", "data_type": "float64"}
            ]
        })
    }

    fn minimal() -> Value {
        json!({
            "table": "T",
            "version": "beta",
            "date": "2025-09-11",
            "author": "A",
            "fields": [{"name": "x", "data_type": "float"}]
        })
    }

    #[test]
    fn test_bind_full_document() {
        let diagnostics = MemoryDiagnostics::new();
        let ctx = Context::new(&diagnostics);
        let doc = MamlDocument::bind(&full_v11(), "v1.1", &ctx).unwrap();

        assert_eq!(doc.schema_version(), "v1.1");
        assert_eq!(doc.table(), "StellarMasses");
        assert_eq!(doc.keyarray().unwrap().len(), 3);
        assert_eq!(doc.fields().len(), 2);
        assert_eq!(doc.fields()[0].ucd(), Some("meta.id;meta.main"));
        assert_eq!(doc.maml_version(), Some(&json!(1.1)));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_bind_unknown_version() {
        let diagnostics = MemoryDiagnostics::new();
        let err = MamlDocument::bind(&minimal(), "v1p1", &Context::new(&diagnostics)).unwrap_err();
        assert_eq!(err.code(), "MAML_UNKNOWN_VERSION");
    }

    #[test]
    fn test_bind_invalid_document() {
        let diagnostics = MemoryDiagnostics::new();
        let mut tree = minimal();
        tree["date"] = json!("2025-13-01");
        let err = MamlDocument::bind(&tree, "v1.0", &Context::new(&diagnostics)).unwrap_err();
        assert_eq!(err.code(), "MAML_INVALID_DOCUMENT");
        assert_eq!(err.details().unwrap().key, "date");
    }

    #[test]
    fn test_bind_wraps_field_errors() {
        let diagnostics = MemoryDiagnostics::new();
        let mut tree = minimal();
        tree["fields"] = json!([{"name": "x", "data_type": "float", "ucd": "not.valid"}]);
        let err = MamlDocument::bind(&tree, "v1.0", &Context::new(&diagnostics)).unwrap_err();
        assert_eq!(err.code(), "MAML_INVALID_DOCUMENT");
        assert_eq!(err.cause().unwrap().code(), "MAML_INVALID_TAG");
        assert_eq!(err.details().unwrap().key, "fields[0]");
    }

    #[test]
    fn test_bind_rejects_wrong_shapes() {
        let diagnostics = MemoryDiagnostics::new();
        let mut tree = minimal();
        tree["coauthors"] = json!("just one");
        let err = MamlDocument::bind(&tree, "v1.0", &Context::new(&diagnostics)).unwrap_err();
        assert_eq!(err.code(), "MAML_INVALID_DOCUMENT");
        assert_eq!(err.cause().unwrap().code(), "MAML_INVALID_VALUE");
    }

    #[test]
    fn test_bind_rejects_placeholders() {
        let diagnostics = MemoryDiagnostics::new();
        let mut tree = minimal();
        tree["author"] = json!("__REQUIRED__: Main Author");
        let err = MamlDocument::bind(&tree, "v1.0", &Context::new(&diagnostics)).unwrap_err();
        assert!(err.details().unwrap().actual.contains("placeholder"));

        let mut tree = minimal();
        tree["fields"] = json!([{"name": "__REQUIRED__: field name", "data_type": "int"}]);
        let err = MamlDocument::bind(&tree, "v1.0", &Context::new(&diagnostics)).unwrap_err();
        assert_eq!(err.details().unwrap().key, "fields[0].name");
    }

    #[test]
    fn test_recommended_and_unrecognized_advisories() {
        let diagnostics = MemoryDiagnostics::new();
        let mut tree = minimal();
        tree["keyarray"] = json!(["a", "b", "c"]);
        MamlDocument::bind(&tree, "v1.0", &Context::new(&diagnostics)).unwrap();

        let advisories = diagnostics.advisories();
        assert!(advisories.contains(&Advisory::UnrecognizedKey {
            version: "v1.0".into(),
            key: "keyarray".into()
        }));
        assert!(advisories.contains(&Advisory::RecommendedKeyMissing {
            version: "v1.0".into(),
            key: "dataset".into()
        }));
        assert!(advisories.contains(&Advisory::RecommendedKeyMissing {
            version: "v1.0".into(),
            key: "license".into()
        }));
    }

    #[test]
    fn test_version_specific_keys_not_carried() {
        let diagnostics = MemoryDiagnostics::new();
        let doc = MamlDocument::bind(&full_v11(), "v1.0", &Context::new(&diagnostics)).unwrap();
        assert!(doc.keyarray().is_none());
        assert!(doc.extra().is_none());
        let tree = doc.to_document_tree(true);
        assert!(tree.get("keyarray").is_none());
    }

    #[test]
    fn test_to_document_tree_canonical_order() {
        let diagnostics = MemoryDiagnostics::new();
        let mut tree = minimal();
        // scrambled input order
        let scrambled = json!({
            "fields": tree["fields"].take(),
            "author": "A",
            "version": "beta",
            "table": "T",
            "date": "2025-09-11"
        });
        let doc = MamlDocument::bind(&scrambled, "v1.0", &Context::new(&diagnostics)).unwrap();
        let out = doc.to_document_tree(false);
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["table", "version", "date", "author", "fields"]);
        assert!(crate::schema::check_order(&out, "v1.0"));
    }

    #[test]
    fn test_to_document_tree_include_unset() {
        let diagnostics = MemoryDiagnostics::new();
        let doc = MamlDocument::bind(&minimal(), "v1.1", &Context::new(&diagnostics)).unwrap();
        let out = doc.to_document_tree(true);
        let map = out.as_object().unwrap();
        assert_eq!(map.len(), 15);
        assert_eq!(map["survey"], Value::Null);
        assert_eq!(map["fields"][0]["ucd"], Value::Null);
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let diagnostics = MemoryDiagnostics::new();
        let ctx = Context::new(&diagnostics);
        for include_unset in [true, false] {
            let doc = MamlDocument::bind(&full_v11(), "v1.1", &ctx).unwrap();
            let again = MamlDocument::bind(&doc.to_document_tree(include_unset), "v1.1", &ctx).unwrap();
            assert_eq!(doc, again);
        }
    }

    #[test]
    fn test_bind_latest_picks_newest() {
        let diagnostics = MemoryDiagnostics::new();
        let ctx = Context::new(&diagnostics);
        let doc = MamlDocument::bind_latest(&minimal(), &ctx).unwrap();
        assert_eq!(doc.schema_version(), "v1.1");

        let err = MamlDocument::bind_latest(&json!({"table": "T"}), &ctx).unwrap_err();
        assert_eq!(err.code(), "MAML_INVALID_DOCUMENT");
    }

    #[test]
    fn test_add_field() {
        let diagnostics = MemoryDiagnostics::new();
        let ctx = Context::new(&diagnostics);
        let mut doc = MamlDocument::bind(&minimal(), "v1.0", &ctx).unwrap();

        doc.add_field(Field::new("y", "int"));
        assert_eq!(doc.fields().len(), 2);

        let bad = json!({"name": "z", "data_type": "int", "ucd": "not.valid"});
        let err = doc.add_field_from_mapping(bad.as_object().unwrap(), &ctx).unwrap_err();
        assert_eq!(err.code(), "MAML_INVALID_TAG");
        assert_eq!(doc.fields().len(), 2);

        let good = json!({"name": "z", "data_type": "int", "ucd": "pos.eq.ra"});
        doc.add_field_from_mapping(good.as_object().unwrap(), &ctx).unwrap();
        assert_eq!(doc.fields()[2].name(), "z");
    }

    #[test]
    fn test_set_date() {
        let diagnostics = MemoryDiagnostics::new();
        let mut doc = MamlDocument::bind(&minimal(), "v1.0", &Context::new(&diagnostics)).unwrap();
        doc.set_date("2026-01-02").unwrap();
        assert_eq!(doc.date(), "2026-01-02");

        let err = doc.set_date("02/01/2026").unwrap_err();
        assert_eq!(err.code(), "MAML_INVALID_DATE");
        assert_eq!(doc.date(), "2026-01-02");
    }

    #[test]
    fn test_add_comment_coerces_to_text() {
        let diagnostics = MemoryDiagnostics::new();
        let mut doc = MamlDocument::bind(&minimal(), "v1.0", &Context::new(&diagnostics)).unwrap();
        doc.add_comment("first").unwrap();
        doc.add_comment(42).unwrap();
        doc.add_comment(1.5).unwrap();
        assert_eq!(doc.comments().unwrap(), &["first", "42", "1.5"]);
    }
}

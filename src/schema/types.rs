//! Schema table types
//!
//! A schema version is pure data: an ordered list of document keys and an
//! ordered list of field keys, each tagged with its presence class and the
//! default the builder may seed it with. Order in the list is the canonical
//! serialization order.

use std::fmt;

/// Placeholder prefix for builder-seeded values that still need a real one.
pub const PLACEHOLDER_PREFIX: &str = "__REQUIRED__";

/// How strongly a schema version asks for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    /// Must be present and non-null
    Required,
    /// Absence is reported as an advisory
    Recommended,
    /// Absence is silent
    Optional,
}

impl Presence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Required => "required",
            Presence::Recommended => "recommended",
            Presence::Optional => "optional",
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the builder seeds a key with in defaults mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDefault {
    /// Left unset
    None,
    /// A `__REQUIRED__: ...` sentinel string
    Placeholder(&'static str),
    /// Today's date, `YYYY-MM-DD`
    Today,
    /// Present but null
    Null,
    /// The schema version number (`1.0`, `1.1`)
    SchemaNumber,
}

impl KeyDefault {
    /// Renders a placeholder sentinel.
    pub fn placeholder_text(text: &str) -> String {
        format!("{}: {}", PLACEHOLDER_PREFIX, text)
    }
}

/// Shape a document value must have once bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A string; numbers and booleans are taken as their text
    Text,
    /// A string or a number, kept as given
    Scalar,
    /// An ISO 8601 date string
    Date,
    /// A sequence of text values
    TextList,
    /// A free-form mapping
    Mapping,
    /// The field descriptor list
    Fields,
}

impl ValueKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Scalar => "string or number",
            ValueKind::Date => "ISO 8601 date",
            ValueKind::TextList => "list of text",
            ValueKind::Mapping => "mapping",
            ValueKind::Fields => "list of fields",
        }
    }
}

/// Every top-level key any MAML version knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaKey {
    Survey,
    Dataset,
    Table,
    Version,
    Date,
    Author,
    Coauthors,
    Depends,
    Comments,
    License,
    Keywords,
    Keyarray,
    Extra,
    MamlVersion,
    Fields,
}

impl MetaKey {
    /// Returns the key as written in documents
    pub fn name(&self) -> &'static str {
        match self {
            MetaKey::Survey => "survey",
            MetaKey::Dataset => "dataset",
            MetaKey::Table => "table",
            MetaKey::Version => "version",
            MetaKey::Date => "date",
            MetaKey::Author => "author",
            MetaKey::Coauthors => "coauthors",
            MetaKey::Depends => "depends",
            MetaKey::Comments => "comments",
            MetaKey::License => "license",
            MetaKey::Keywords => "keywords",
            MetaKey::Keyarray => "keyarray",
            MetaKey::Extra => "extra",
            MetaKey::MamlVersion => "MAML_version",
            MetaKey::Fields => "fields",
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            MetaKey::Survey
            | MetaKey::Dataset
            | MetaKey::Table
            | MetaKey::Author
            | MetaKey::License => ValueKind::Text,
            MetaKey::Version | MetaKey::MamlVersion => ValueKind::Scalar,
            MetaKey::Date => ValueKind::Date,
            MetaKey::Coauthors
            | MetaKey::Depends
            | MetaKey::Comments
            | MetaKey::Keywords
            | MetaKey::Keyarray => ValueKind::TextList,
            MetaKey::Extra => ValueKind::Mapping,
            MetaKey::Fields => ValueKind::Fields,
        }
    }
}

impl fmt::Display for MetaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Keys of one field descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Name,
    Unit,
    Description,
    Ucd,
    DataType,
}

impl FieldKey {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKey::Name => "name",
            FieldKey::Unit => "unit",
            FieldKey::Description => "description",
            FieldKey::Ucd => "ucd",
            FieldKey::DataType => "data_type",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One document key slot in a schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpec {
    pub key: MetaKey,
    pub presence: Presence,
    pub default: KeyDefault,
}

impl KeySpec {
    pub const fn required(key: MetaKey, default: KeyDefault) -> Self {
        Self {
            key,
            presence: Presence::Required,
            default,
        }
    }

    pub const fn recommended(key: MetaKey) -> Self {
        Self {
            key,
            presence: Presence::Recommended,
            default: KeyDefault::None,
        }
    }

    pub const fn optional(key: MetaKey, default: KeyDefault) -> Self {
        Self {
            key,
            presence: Presence::Optional,
            default,
        }
    }
}

/// One field key slot in a schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKeySpec {
    pub key: FieldKey,
    pub presence: Presence,
    pub default: KeyDefault,
}

impl FieldKeySpec {
    pub const fn new(key: FieldKey, presence: Presence, default: KeyDefault) -> Self {
        Self { key, presence, default }
    }
}

/// A single schema revision.
#[derive(Debug, PartialEq)]
pub struct SchemaVersion {
    /// Identifier, e.g. "v1.0"
    pub id: &'static str,
    /// Numeric form written to `MAML_version`
    pub number: f64,
    /// Document keys in canonical order
    pub document_keys: &'static [KeySpec],
    /// Field keys in canonical order
    pub field_keys: &'static [FieldKeySpec],
}

impl SchemaVersion {
    /// Looks up a document key by its written name.
    pub fn document_key(&self, name: &str) -> Option<&KeySpec> {
        self.document_keys.iter().find(|spec| spec.key.name() == name)
    }

    /// Looks up a field key by its written name.
    pub fn field_key(&self, name: &str) -> Option<&FieldKeySpec> {
        self.field_keys.iter().find(|spec| spec.key.name() == name)
    }

    pub fn has_key(&self, key: MetaKey) -> bool {
        self.document_keys.iter().any(|spec| spec.key == key)
    }

    /// Canonical position of a document key
    pub fn document_position(&self, name: &str) -> Option<usize> {
        self.document_keys.iter().position(|spec| spec.key.name() == name)
    }

    /// Canonical position of a field key
    pub fn field_position(&self, name: &str) -> Option<usize> {
        self.field_keys.iter().position(|spec| spec.key.name() == name)
    }

    pub fn document_keys_with(&self, presence: Presence) -> impl Iterator<Item = &KeySpec> + '_ {
        self.document_keys.iter().filter(move |spec| spec.presence == presence)
    }

    pub fn field_keys_with(&self, presence: Presence) -> impl Iterator<Item = &FieldKeySpec> + '_ {
        self.field_keys.iter().filter(move |spec| spec.presence == presence)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

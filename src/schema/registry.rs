//! Schema registry
//!
//! The registry is a static, ordered table of schema versions. Position in
//! the table is the version history: earlier entries are older. Adding a
//! version is a data change here, never a change to the validator.

use std::cmp::Ordering;

use super::errors::{MamlError, MamlResult};
use super::types::{FieldKey, FieldKeySpec, KeyDefault, KeySpec, MetaKey, Presence, SchemaVersion};

const FIELD_KEYS: [FieldKeySpec; 5] = [
    FieldKeySpec::new(FieldKey::Name, Presence::Required, KeyDefault::Placeholder("field name")),
    FieldKeySpec::new(FieldKey::Unit, Presence::Recommended, KeyDefault::None),
    FieldKeySpec::new(FieldKey::Description, Presence::Recommended, KeyDefault::None),
    FieldKeySpec::new(FieldKey::Ucd, Presence::Optional, KeyDefault::None),
    FieldKeySpec::new(FieldKey::DataType, Presence::Required, KeyDefault::Placeholder("data_type")),
];

const V1_0_KEYS: [KeySpec; 13] = [
    KeySpec::optional(MetaKey::Survey, KeyDefault::None),
    KeySpec::recommended(MetaKey::Dataset),
    KeySpec::required(MetaKey::Table, KeyDefault::Placeholder("Table Name")),
    KeySpec::required(MetaKey::Version, KeyDefault::Placeholder("0.1.0")),
    KeySpec::required(MetaKey::Date, KeyDefault::Today),
    KeySpec::required(MetaKey::Author, KeyDefault::Placeholder("Main Author")),
    KeySpec::optional(MetaKey::Coauthors, KeyDefault::None),
    KeySpec::optional(MetaKey::Depends, KeyDefault::None),
    KeySpec::optional(MetaKey::Comments, KeyDefault::None),
    KeySpec::recommended(MetaKey::License),
    KeySpec::optional(MetaKey::Keywords, KeyDefault::None),
    KeySpec::optional(MetaKey::MamlVersion, KeyDefault::SchemaNumber),
    KeySpec::required(MetaKey::Fields, KeyDefault::None),
];

const V1_1_KEYS: [KeySpec; 15] = [
    KeySpec::optional(MetaKey::Survey, KeyDefault::None),
    KeySpec::recommended(MetaKey::Dataset),
    KeySpec::required(MetaKey::Table, KeyDefault::Placeholder("Table Name")),
    KeySpec::required(MetaKey::Version, KeyDefault::Placeholder("0.1.0")),
    KeySpec::required(MetaKey::Date, KeyDefault::Today),
    KeySpec::required(MetaKey::Author, KeyDefault::Placeholder("Main Author")),
    KeySpec::optional(MetaKey::Coauthors, KeyDefault::None),
    KeySpec::optional(MetaKey::Depends, KeyDefault::None),
    KeySpec::optional(MetaKey::Comments, KeyDefault::None),
    KeySpec::recommended(MetaKey::License),
    KeySpec::optional(MetaKey::Keywords, KeyDefault::None),
    KeySpec::optional(MetaKey::Keyarray, KeyDefault::Null),
    KeySpec::optional(MetaKey::Extra, KeyDefault::None),
    KeySpec::optional(MetaKey::MamlVersion, KeyDefault::SchemaNumber),
    KeySpec::required(MetaKey::Fields, KeyDefault::None),
];

static STANDARD_VERSIONS: [SchemaVersion; 2] = [
    SchemaVersion {
        id: "v1.0",
        number: 1.0,
        document_keys: &V1_0_KEYS,
        field_keys: &FIELD_KEYS,
    },
    SchemaVersion {
        id: "v1.1",
        number: 1.1,
        document_keys: &V1_1_KEYS,
        field_keys: &FIELD_KEYS,
    },
];

static STANDARD: SchemaRegistry = SchemaRegistry::new(&STANDARD_VERSIONS);

/// Ordered, read-only table of schema versions.
#[derive(Debug)]
pub struct SchemaRegistry {
    versions: &'static [SchemaVersion],
}

impl SchemaRegistry {
    /// Creates a registry over `versions`, oldest first.
    pub const fn new(versions: &'static [SchemaVersion]) -> Self {
        Self { versions }
    }

    /// The registry of published MAML versions.
    pub fn standard() -> &'static SchemaRegistry {
        &STANDARD
    }

    /// Resolves a version identifier.
    pub fn resolve(&self, version_id: &str) -> MamlResult<&'static SchemaVersion> {
        self.versions
            .iter()
            .find(|version| version.id == version_id)
            .ok_or_else(|| MamlError::unknown_version(version_id))
    }

    /// Checks whether a version identifier is known.
    pub fn contains(&self, version_id: &str) -> bool {
        self.resolve(version_id).is_ok()
    }

    /// All versions, oldest first.
    pub fn versions(&self) -> impl Iterator<Item = &'static SchemaVersion> {
        self.versions.iter()
    }

    pub fn all_versions_ordered(&self) -> Vec<&'static str> {
        self.versions.iter().map(|version| version.id).collect()
    }

    /// Returns the newest version.
    pub fn latest(&self) -> Option<&'static SchemaVersion> {
        self.versions.last()
    }

    /// Orders two version identifiers by history. `None` if either is unknown.
    pub fn compare(&self, a: &str, b: &str) -> Option<Ordering> {
        let pos_a = self.position(a)?;
        let pos_b = self.position(b)?;
        Some(pos_a.cmp(&pos_b))
    }

    fn position(&self, version_id: &str) -> Option<usize> {
        self.versions.iter().position(|version| version.id == version_id)
    }

    pub fn required_keys(&self, version_id: &str) -> MamlResult<Vec<&'static str>> {
        self.keys_with(version_id, Presence::Required)
    }

    pub fn recommended_keys(&self, version_id: &str) -> MamlResult<Vec<&'static str>> {
        self.keys_with(version_id, Presence::Recommended)
    }

    pub fn optional_keys(&self, version_id: &str) -> MamlResult<Vec<&'static str>> {
        self.keys_with(version_id, Presence::Optional)
    }

    /// Document keys in canonical order.
    pub fn document_key_order(&self, version_id: &str) -> MamlResult<Vec<&'static str>> {
        let version = self.resolve(version_id)?;
        Ok(version.document_keys.iter().map(|spec| spec.key.name()).collect())
    }

    /// Field keys in canonical order.
    pub fn field_key_order(&self, version_id: &str) -> MamlResult<Vec<&'static str>> {
        let version = self.resolve(version_id)?;
        Ok(version.field_keys.iter().map(|spec| spec.key.name()).collect())
    }

    fn keys_with(&self, version_id: &str, presence: Presence) -> MamlResult<Vec<&'static str>> {
        let version = self.resolve(version_id)?;
        Ok(version
            .document_keys_with(presence)
            .map(|spec| spec.key.name())
            .collect())
    }

    /// Checks that no version drops or reorders a key required by an
    /// earlier one.
    ///
    /// Returns the offending `(older, newer)` pair on failure.
    pub fn verify_monotonic(&self) -> Result<(), (&'static str, &'static str)> {
        for (index, older) in self.versions.iter().enumerate() {
            let required: Vec<MetaKey> = older
                .document_keys_with(Presence::Required)
                .map(|spec| spec.key)
                .collect();

            for newer in &self.versions[index + 1..] {
                if !is_ordered_subsequence(&required, newer.document_keys) {
                    return Err((older.id, newer.id));
                }
                let still_required = required.iter().all(|key| {
                    newer
                        .document_keys
                        .iter()
                        .any(|spec| spec.key == *key && spec.presence == Presence::Required)
                });
                if !still_required {
                    return Err((older.id, newer.id));
                }
            }
        }
        Ok(())
    }
}

fn is_ordered_subsequence(keys: &[MetaKey], specs: &[KeySpec]) -> bool {
    let mut remaining = specs.iter();
    keys.iter()
        .all(|key| remaining.any(|spec| spec.key == *key))
}

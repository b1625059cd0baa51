//! Compatibility resolution
//!
//! Every registry version is tested on its own, oldest to newest. Forward
//! compatibility falls out of the registry's monotonic required keys; it is
//! never assumed, so a newer version that adds a required key excludes a
//! document lacking it even when an older version accepted it.

use std::fmt;

use serde_json::Value;

use super::registry::SchemaRegistry;
use super::validator::Validator;

/// Outcome of a compatibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    /// Versions the document satisfies, oldest first. Never empty.
    Versions(Vec<&'static str>),
    /// Every version was checked and none accepted the document.
    None,
}

impl Compatibility {
    pub fn is_none(&self) -> bool {
        matches!(self, Compatibility::None)
    }

    /// Satisfied versions, oldest first (empty for `None`).
    pub fn versions(&self) -> &[&'static str] {
        match self {
            Compatibility::Versions(versions) => versions,
            Compatibility::None => &[],
        }
    }

    pub fn contains(&self, version_id: &str) -> bool {
        self.versions().contains(&version_id)
    }

    pub fn oldest(&self) -> Option<&'static str> {
        self.versions().first().copied()
    }

    pub fn latest(&self) -> Option<&'static str> {
        self.versions().last().copied()
    }
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compatibility::Versions(versions) => write!(f, "{}", versions.join(", ")),
            Compatibility::None => write!(f, "none"),
        }
    }
}

/// Resolves which registry versions a document tree satisfies.
pub struct CompatibilityResolver<'a> {
    validator: Validator<'a>,
}

impl<'a> CompatibilityResolver<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            validator: Validator::new(registry),
        }
    }

    pub fn valid_for(&self, tree: &Value) -> Compatibility {
        let versions: Vec<&'static str> = self
            .validator
            .registry()
            .versions()
            .filter(|version| self.validator.is_valid(tree, version.id))
            .map(|version| version.id)
            .collect();

        if versions.is_empty() {
            Compatibility::None
        } else {
            Compatibility::Versions(versions)
        }
    }
}

/// Compatibility against the published registry.
pub fn valid_for(tree: &Value) -> Compatibility {
    CompatibilityResolver::new(SchemaRegistry::standard()).valid_for(tree)
}

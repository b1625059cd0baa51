//! Advisory conditions
//!
//! Non-fatal findings reported while reading or binding a document. They
//! never change control flow.

use std::fmt;

use super::logger::Severity;

/// A non-fatal condition worth telling the caller about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// A recommended document key is absent
    RecommendedKeyMissing { version: String, key: String },
    /// A recommended field key is absent from a field entry
    FieldKeyMissing { field: String, key: String },
    /// The document holds a key its schema version does not know; it is dropped
    UnrecognizedKey { version: String, key: String },
    /// The file is YAML-named rather than `.maml`
    YamlExtension { path: String },
    /// The file extension is not recognized at all
    UnknownExtension { path: String },
}

impl Advisory {
    /// Returns the event name used in logs.
    pub fn event(&self) -> &'static str {
        match self {
            Advisory::RecommendedKeyMissing { .. } => "MAML_RECOMMENDED_KEY_MISSING",
            Advisory::FieldKeyMissing { .. } => "MAML_FIELD_KEY_MISSING",
            Advisory::UnrecognizedKey { .. } => "MAML_UNRECOGNIZED_KEY",
            Advisory::YamlExtension { .. } => "MAML_YAML_EXTENSION",
            Advisory::UnknownExtension { .. } => "MAML_UNKNOWN_EXTENSION",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Warn
    }

    /// Structured fields for the log line.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            Advisory::RecommendedKeyMissing { version, key } | Advisory::UnrecognizedKey { version, key } => {
                vec![("key", key.as_str()), ("version", version.as_str())]
            }
            Advisory::FieldKeyMissing { field, key } => vec![("field", field.as_str()), ("key", key.as_str())],
            Advisory::YamlExtension { path } | Advisory::UnknownExtension { path } => vec![("path", path.as_str())],
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::RecommendedKeyMissing { version, key } => {
                write!(f, "recommended key '{}' not found ({})", key, version)
            }
            Advisory::FieldKeyMissing { field, key } => write!(f, "no {} found for field '{}'", key, field),
            Advisory::UnrecognizedKey { version, key } => write!(f, "key '{}' is not part of MAML {}", key, version),
            Advisory::YamlExtension { path } => write!(f, "{} was read but is a .yml, not a .maml", path),
            Advisory::UnknownExtension { path } => write!(f, "{} does not have a .maml extension", path),
        }
    }
}

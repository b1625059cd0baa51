//! Error types for the MAML engine
//!
//! Error codes:
//! - MAML_INVALID_TAG
//! - MAML_MISSING_REQUIRED_KEY
//! - MAML_INVALID_DOCUMENT
//! - MAML_UNKNOWN_VERSION
//! - MAML_INVALID_VALUE
//! - MAML_INVALID_DATE
//! - MAML_UNSUPPORTED_EXTENSION
//! - MAML_IO
//! - MAML_PARSE
//! - MAML_CONFIG
//!
//! Validation predicates never produce these; only construction, binding
//! and file operations do.

use std::fmt;
use std::io;

use thiserror::Error;

/// Describes the first rule a document tree breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Key path (e.g. "fields[2].data_type")
    pub key: String,
    /// Expected shape or condition
    pub expected: String,
    /// What was found instead
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(key: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::new(key, "key to be present", "missing")
    }

    pub fn null_value(key: impl Into<String>) -> Self {
        Self::new(key, "non-null value", "null")
    }

    pub fn type_mismatch(key: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(key, expected, actual)
    }

    pub fn placeholder(key: impl Into<String>, value: &str) -> Self {
        Self::new(key, "a real value", format!("placeholder '{}'", value))
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key '{}': expected {}, got {}", self.key, self.expected, self.actual)
    }
}

/// Errors raised while constructing, binding or persisting MAML documents.
#[derive(Debug, Error)]
pub enum MamlError {
    #[error("'{tag}' is not a recognized UCD")]
    InvalidTag { tag: String },

    #[error("required key '{key}' missing from {context}")]
    MissingRequiredKey { key: String, context: String },

    #[error("document is not valid MAML {version}: {details}")]
    InvalidDocument {
        version: String,
        details: ValidationDetails,
        #[source]
        cause: Option<Box<MamlError>>,
    },

    #[error("unknown MAML schema version '{version}'")]
    UnknownVersion { version: String },

    #[error("invalid value: {0}")]
    InvalidValue(ValidationDetails),

    #[error("'{value}' is not an ISO 8601 date")]
    InvalidDate { value: String },

    #[error("refusing to write '{path}': extension must be .maml")]
    UnsupportedExtension { path: String },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("could not parse '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl MamlError {
    /// Returns the stable error code string.
    pub fn code(&self) -> &'static str {
        match self {
            MamlError::InvalidTag { .. } => "MAML_INVALID_TAG",
            MamlError::MissingRequiredKey { .. } => "MAML_MISSING_REQUIRED_KEY",
            MamlError::InvalidDocument { .. } => "MAML_INVALID_DOCUMENT",
            MamlError::UnknownVersion { .. } => "MAML_UNKNOWN_VERSION",
            MamlError::InvalidValue(_) => "MAML_INVALID_VALUE",
            MamlError::InvalidDate { .. } => "MAML_INVALID_DATE",
            MamlError::UnsupportedExtension { .. } => "MAML_UNSUPPORTED_EXTENSION",
            MamlError::Io { .. } => "MAML_IO",
            MamlError::Parse { .. } => "MAML_PARSE",
            MamlError::Config(_) => "MAML_CONFIG",
        }
    }

    pub fn invalid_tag(tag: impl Into<String>) -> Self {
        MamlError::InvalidTag { tag: tag.into() }
    }

    pub fn missing_key(key: impl Into<String>, context: impl Into<String>) -> Self {
        MamlError::MissingRequiredKey {
            key: key.into(),
            context: context.into(),
        }
    }

    pub fn unknown_version(version: impl Into<String>) -> Self {
        MamlError::UnknownVersion {
            version: version.into(),
        }
    }

    /// Schema-level failure with no underlying error.
    pub fn invalid_document(version: impl Into<String>, details: ValidationDetails) -> Self {
        MamlError::InvalidDocument {
            version: version.into(),
            details,
            cause: None,
        }
    }

    /// Wraps a field or value failure raised while binding.
    pub fn invalid_document_caused_by(version: impl Into<String>, key: impl Into<String>, cause: MamlError) -> Self {
        let details = ValidationDetails::new(key, "a valid entry", cause.to_string());
        MamlError::InvalidDocument {
            version: version.into(),
            details,
            cause: Some(Box::new(cause)),
        }
    }

    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        MamlError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns validation details when the error carries them.
    pub fn details(&self) -> Option<&ValidationDetails> {
        match self {
            MamlError::InvalidDocument { details, .. } => Some(details),
            MamlError::InvalidValue(details) => Some(details),
            _ => None,
        }
    }

    /// Returns the wrapped cause of an `InvalidDocument`.
    pub fn cause(&self) -> Option<&MamlError> {
        match self {
            MamlError::InvalidDocument { cause, .. } => cause.as_deref(),
            _ => None,
        }
    }
}

/// Result type for MAML operations
pub type MamlResult<T> = Result<T, MamlError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_codes() {
        assert_eq!(MamlError::invalid_tag("x").code(), "MAML_INVALID_TAG");
        assert_eq!(MamlError::missing_key("name", "field").code(), "MAML_MISSING_REQUIRED_KEY");
        assert_eq!(MamlError::unknown_version("v9").code(), "MAML_UNKNOWN_VERSION");
        assert_eq!(
            MamlError::invalid_document("v1.0", ValidationDetails::missing_key("table")).code(),
            "MAML_INVALID_DOCUMENT"
        );
    }

    #[test]
    fn test_validation_details_display() {
        let details = ValidationDetails::type_mismatch("coauthors", "list of text", "mapping");
        let display = format!("{}", details);
        assert!(display.contains("coauthors"));
        assert!(display.contains("list of text"));
        assert!(display.contains("mapping"));
    }

    #[test]
    fn test_invalid_document_keeps_cause() {
        let err = MamlError::invalid_document_caused_by("v1.1", "fields[0]", MamlError::invalid_tag("not.valid"));
        assert_eq!(err.details().unwrap().key, "fields[0]");
        assert_eq!(err.cause().unwrap().code(), "MAML_INVALID_TAG");
        assert!(err.source().is_some());
        assert!(err.to_string().contains("v1.1"));
    }

    #[test]
    fn test_plain_invalid_document_has_no_cause() {
        let err = MamlError::invalid_document("v1.0", ValidationDetails::null_value("author"));
        assert!(err.cause().is_none());
        assert!(err.to_string().contains("author"));
    }
}

//! Schema subsystem for MAML documents
//!
//! A schema version is an ordered table of document keys and field keys,
//! each classified as required, recommended or optional.
//!
//! # Design Principles
//!
//! - One data-driven registry, one validator
//! - Predicates never fail, they answer
//! - Versions are tested independently for compatibility
//! - Canonical key order is part of the schema

mod compat;
mod errors;
mod registry;
mod types;
mod validator;

pub use compat::{valid_for, Compatibility, CompatibilityResolver};
pub use errors::{MamlError, MamlResult, ValidationDetails};
pub use registry::SchemaRegistry;
pub use types::{
    FieldKey, FieldKeySpec, KeyDefault, KeySpec, MetaKey, Presence, SchemaVersion, ValueKind, PLACEHOLDER_PREFIX,
};
pub use validator::{check_order, first_violation, is_iso8601, is_valid, json_type_name, Validator};

pub(crate) use validator::make_path;

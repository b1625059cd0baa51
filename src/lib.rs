//! maml - versioned schema engine for MAML metadata documents
//!
//! A MAML document describes one table of a dataset: who made it, when,
//! under which license, and one descriptor per column. Each schema version
//! fixes which keys are required, recommended or optional and the order
//! they are written in.
//!
//! - `schema`: registry, validator and compatibility resolution
//! - `model`: bound documents, fields and the builder
//! - `file_io`: YAML files on disk

pub mod cli;
pub mod config;
pub mod context;
pub mod file_io;
pub mod model;
pub mod observability;
pub mod render;
pub mod schema;
pub mod vocabulary;

pub use context::Context;
pub use model::{Field, MamlBuilder, MamlDocument};
pub use schema::{check_order, is_iso8601, is_valid, valid_for, Compatibility, MamlError, MamlResult};

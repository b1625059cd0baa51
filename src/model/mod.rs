//! Document model
//!
//! Typed, validated MAML documents and the pieces they are built from:
//! field descriptors, the incremental builder and tabular sources for
//! deriving fields.

mod builder;
mod document;
mod field;
mod tabular;
mod values;

pub use builder::MamlBuilder;
pub use document::MamlDocument;
pub use field::Field;
pub use tabular::{dtype, Column, RecordSample, TabularSource};

//! Reading and writing MAML files
//!
//! Files are YAML. The tree is held as a `serde_json::Value` with insertion
//! order preserved, so a document written in canonical order reads back in
//! canonical order. Handles are scoped to each call and closed on every
//! return path.

mod extension;

pub use extension::{check_readable, check_writable, FileKind, MAML_EXTENSION};

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use crate::context::Context;
use crate::model::MamlDocument;
use crate::observability::Diagnostics;
use crate::schema::{MamlError, MamlResult};

/// Reads a file into a document tree.
pub fn read_tree(path: &Path, diagnostics: &dyn Diagnostics) -> MamlResult<Value> {
    check_readable(path, diagnostics);

    let display = path.display().to_string();
    let file = File::open(path).map_err(|e| MamlError::io(&display, e))?;
    serde_yaml::from_reader(BufReader::new(file)).map_err(|e| MamlError::Parse {
        path: display,
        message: e.to_string(),
    })
}

/// Reads and binds a document at `version_id`.
pub fn read_document(path: &Path, version_id: &str, ctx: &Context<'_>) -> MamlResult<MamlDocument> {
    let tree = read_tree(path, ctx.diagnostics())?;
    MamlDocument::bind(&tree, version_id, ctx)
}

/// Reads a document and binds it to the newest version it satisfies.
pub fn read_document_latest(path: &Path, ctx: &Context<'_>) -> MamlResult<MamlDocument> {
    let tree = read_tree(path, ctx.diagnostics())?;
    MamlDocument::bind_latest(&tree, ctx)
}

/// Writes a tree as YAML. Only `.maml` paths are accepted.
pub fn write_tree(path: &Path, tree: &Value) -> MamlResult<()> {
    check_writable(path)?;

    let display = path.display().to_string();
    let file = File::create(path).map_err(|e| MamlError::io(&display, e))?;
    let mut writer = BufWriter::new(file);
    serde_yaml::to_writer(&mut writer, tree).map_err(|e| MamlError::Parse {
        path: display.clone(),
        message: e.to_string(),
    })?;
    writer.flush().map_err(|e| MamlError::io(&display, e))
}

/// Writes a bound document in canonical order.
pub fn write_document(path: &Path, document: &MamlDocument, include_unset: bool) -> MamlResult<()> {
    write_tree(path, &document.to_document_tree(include_unset))
}

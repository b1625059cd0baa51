//! File extension convention
//!
//! `.maml` is the primary extension. `.yml` and `.yaml` are read with an
//! advisory. Anything else is read with a stronger advisory and never
//! written.

use std::path::Path;

use crate::observability::{Advisory, Diagnostics};
use crate::schema::{MamlError, MamlResult};

pub const MAML_EXTENSION: &str = "maml";

/// What a path's extension says about its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Maml,
    Yaml,
    Other,
}

impl FileKind {
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(MAML_EXTENSION) => FileKind::Maml,
            Some("yml") | Some("yaml") => FileKind::Yaml,
            _ => FileKind::Other,
        }
    }

    /// Advisory to report before reading, if any.
    pub fn read_advisory(&self, path: &Path) -> Option<Advisory> {
        let path = path.display().to_string();
        match self {
            FileKind::Maml => None,
            FileKind::Yaml => Some(Advisory::YamlExtension { path }),
            FileKind::Other => Some(Advisory::UnknownExtension { path }),
        }
    }
}

/// Classifies `path` for reading, reporting any advisory.
pub fn check_readable(path: &Path, diagnostics: &dyn Diagnostics) -> FileKind {
    let kind = FileKind::of(path);
    if let Some(advisory) = kind.read_advisory(path) {
        diagnostics.report(&advisory);
    }
    kind
}

/// Refuses to write anything but `.maml`.
pub fn check_writable(path: &Path) -> MamlResult<()> {
    match FileKind::of(path) {
        FileKind::Maml => Ok(()),
        _ => Err(MamlError::UnsupportedExtension {
            path: path.display().to_string(),
        }),
    }
}

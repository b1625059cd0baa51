//! Collaborators threaded through constructing calls
//!
//! Binding a document needs a schema registry, a UCD vocabulary and a place
//! to send advisories. `Context` carries the three together.

use crate::observability::{Diagnostics, LogDiagnostics, Severity};
use crate::schema::SchemaRegistry;
use crate::vocabulary::{TagVocabulary, Ucd1Plus};

static UCD1_PLUS: Ucd1Plus = Ucd1Plus;
static STDERR_LOG: LogDiagnostics = LogDiagnostics::new(Severity::Warn);

/// Registry, vocabulary and diagnostics for one unit of work.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    registry: &'static SchemaRegistry,
    vocabulary: &'a dyn TagVocabulary,
    diagnostics: &'a dyn Diagnostics,
}

impl Context<'static> {
    /// Published registry, built-in UCD1+ vocabulary, warnings to stderr.
    pub fn standard() -> Self {
        Context {
            registry: SchemaRegistry::standard(),
            vocabulary: &UCD1_PLUS,
            diagnostics: &STDERR_LOG,
        }
    }
}

impl<'a> Context<'a> {
    /// Standard registry and vocabulary, advisories to `diagnostics`.
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        Context {
            registry: SchemaRegistry::standard(),
            vocabulary: &UCD1_PLUS,
            diagnostics,
        }
    }

    pub fn with_vocabulary(self, vocabulary: &'a dyn TagVocabulary) -> Self {
        Context { vocabulary, ..self }
    }

    pub fn with_registry(self, registry: &'static SchemaRegistry) -> Self {
        Context { registry, ..self }
    }

    pub fn with_diagnostics(self, diagnostics: &'a dyn Diagnostics) -> Self {
        Context { diagnostics, ..self }
    }

    pub fn registry(&self) -> &'static SchemaRegistry {
        self.registry
    }

    pub fn vocabulary(&self) -> &'a dyn TagVocabulary {
        self.vocabulary
    }

    pub fn diagnostics(&self) -> &'a dyn Diagnostics {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::{Advisory, MemoryDiagnostics};

    #[test]
    fn test_advisories_reach_the_given_sink() {
        let diagnostics = MemoryDiagnostics::new();
        let ctx = Context::new(&diagnostics);
        ctx.diagnostics().report(&Advisory::YamlExtension { path: "a.yml".into() });
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_vocabulary_override() {
        let diagnostics = MemoryDiagnostics::new();
        let nothing = |_: &str| false;
        let ctx = Context::new(&diagnostics).with_vocabulary(&nothing);
        assert!(!ctx.vocabulary().is_recognized_tag("pos.eq.ra"));
        assert!(Context::standard().vocabulary().is_recognized_tag("pos.eq.ra"));
    }
}

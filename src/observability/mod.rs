//! Observability for the MAML engine
//!
//! Advisory conditions (missing recommended keys, odd file extensions) are
//! reported through a `Diagnostics` value passed into each call, so two
//! documents processed side by side never mix their findings.
//!
//! # Usage
//!
//! ```ignore
//! use maml::observability::{Diagnostics, MemoryDiagnostics};
//!
//! let diagnostics = MemoryDiagnostics::new();
//! // ... bind a document with a context using `&diagnostics` ...
//! for advisory in diagnostics.advisories() {
//!     println!("{}", advisory);
//! }
//! ```

mod advisory;
mod logger;

pub use advisory::Advisory;
pub use logger::{Logger, Severity};

use std::sync::Mutex;

/// Sink for advisory conditions.
pub trait Diagnostics {
    /// Report one advisory. Must not fail or panic.
    fn report(&self, advisory: &Advisory);
}

/// Writes advisories as JSON log lines to stderr.
#[derive(Debug, Clone, Copy)]
pub struct LogDiagnostics {
    min_severity: Severity,
}

impl LogDiagnostics {
    pub const fn new(min_severity: Severity) -> Self {
        Self { min_severity }
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }
}

impl Default for LogDiagnostics {
    fn default() -> Self {
        Self::new(Severity::Warn)
    }
}

impl Diagnostics for LogDiagnostics {
    fn report(&self, advisory: &Advisory) {
        if advisory.severity() < self.min_severity {
            return;
        }
        Logger::log(advisory.severity(), advisory.event(), &advisory.fields());
    }
}

/// Collects advisories in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    advisories: Mutex<Vec<Advisory>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All advisories reported so far, in order.
    pub fn advisories(&self) -> Vec<Advisory> {
        self.lock().clone()
    }

    /// Event names reported so far, in order.
    pub fn events(&self) -> Vec<&'static str> {
        self.lock().iter().map(Advisory::event).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Advisory>> {
        // a poisoned list is still a list of advisories
        self.advisories.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn report(&self, advisory: &Advisory) {
        self.lock().push(advisory.clone());
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn report(&self, _advisory: &Advisory) {}
}

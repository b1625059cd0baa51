//! Tool configuration
//!
//! A small JSON file; every key is optional.
//!
//! ```json
//! { "default_schema": "v1.1", "include_unset": false, "log_level": "WARN" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::schema::{MamlError, MamlResult, SchemaRegistry};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MamlConfig {
    /// Schema version used when a command does not name one
    #[serde(default = "default_schema")]
    pub default_schema: String,

    /// Write unset keys as `null` when emitting documents
    #[serde(default)]
    pub include_unset: bool,

    /// Minimum severity of advisories logged to stderr
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema() -> String {
    "v1.1".to_string()
}
fn default_log_level() -> String {
    "WARN".to_string()
}

impl Default for MamlConfig {
    fn default() -> Self {
        Self {
            default_schema: default_schema(),
            include_unset: false,
            log_level: default_log_level(),
        }
    }
}

impl MamlConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> MamlResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| MamlError::Config(format!("Failed to read config '{}': {}", path.display(), e)))?;

        let config: MamlConfig = serde_json::from_str(&content)
            .map_err(|e| MamlError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Checks the schema resolves and the level parses.
    pub fn validate(&self) -> MamlResult<()> {
        if !SchemaRegistry::standard().contains(&self.default_schema) {
            return Err(MamlError::Config(format!(
                "Invalid default_schema: '{}'. Known versions: {}",
                self.default_schema,
                SchemaRegistry::standard().all_versions_ordered().join(", ")
            )));
        }

        self.severity()?;

        Ok(())
    }

    pub fn severity(&self) -> MamlResult<Severity> {
        self.log_level
            .parse()
            .map_err(|_| MamlError::Config(format!("Invalid log_level: '{}'", self.log_level)))
    }
}

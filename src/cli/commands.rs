//! CLI command implementations
//!
//! Each command returns the `data` payload of its response; `run` wraps it
//! in the JSON envelope. Advisories are logged to stderr at the configured
//! level.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::config::MamlConfig;
use crate::context::Context;
use crate::file_io::{read_document, read_document_latest, read_tree, write_document, write_tree};
use crate::model::{MamlBuilder, RecordSample};
use crate::observability::LogDiagnostics;
use crate::schema::{first_violation, valid_for, Compatibility, SchemaRegistry, Validator};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Settings shared by every command of one invocation.
pub struct Session {
    config: MamlConfig,
    diagnostics: LogDiagnostics,
}

impl Session {
    pub fn new(config: MamlConfig) -> CliResult<Self> {
        let diagnostics = LogDiagnostics::new(config.severity()?);
        Ok(Self { config, diagnostics })
    }

    /// Loads the configuration file when one is given.
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        let config = match config_path {
            Some(path) => MamlConfig::load(path)?,
            None => MamlConfig::default(),
        };
        Self::new(config)
    }

    pub fn config(&self) -> &MamlConfig {
        &self.config
    }

    fn context(&self) -> Context<'_> {
        Context::new(&self.diagnostics)
    }

    fn schema<'a>(&'a self, requested: &'a Option<String>) -> &'a str {
        requested.as_deref().unwrap_or(&self.config.default_schema)
    }
}

/// Parse arguments, run the command, write the response.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let result = Session::load(cli.config.as_deref()).and_then(|session| run_command(&session, cli.command));

    match result {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(session: &Session, cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Validate { file, schema } => validate(session, &file, session.schema(&schema)),
        Command::Versions { file } => versions(session, &file),
        Command::Show { file, schema } => show(session, &file, schema.as_deref()),
        Command::New {
            out,
            schema,
            defaults,
            records,
        } => new_draft(&out, session.schema(&schema), defaults, records.as_deref()),
        Command::Keys { schema } => keys(session.schema(&schema)),
        Command::Normalize { file, out, schema } => normalize(session, &file, &out, session.schema(&schema)),
    }
}

/// Checks a file against one version without binding it.
pub fn validate(session: &Session, file: &Path, version_id: &str) -> CliResult<Value> {
    let version = SchemaRegistry::standard().resolve(version_id)?;
    let tree = read_tree(file, &session.diagnostics)?;

    let validator = Validator::standard();
    let violation = first_violation(&tree, version).map(|details| {
        json!({
            "key": details.key,
            "expected": details.expected,
            "actual": details.actual
        })
    });

    Ok(json!({
        "file": file.display().to_string(),
        "schema": version.id,
        "valid": validator.is_valid(&tree, version.id),
        "order_ok": validator.check_order(&tree, version.id),
        "violation": violation
    }))
}

/// Every version the file satisfies, or `"none"`.
pub fn versions(session: &Session, file: &Path) -> CliResult<Value> {
    let tree = read_tree(file, &session.diagnostics)?;
    let versions = match valid_for(&tree) {
        Compatibility::Versions(ids) => json!(ids),
        Compatibility::None => json!(Compatibility::None.to_string()),
    };
    Ok(json!({
        "file": file.display().to_string(),
        "versions": versions
    }))
}

/// Binds the file and renders its summary.
pub fn show(session: &Session, file: &Path, version_id: Option<&str>) -> CliResult<Value> {
    let ctx = session.context();
    let document = match version_id {
        Some(version_id) => read_document(file, version_id, &ctx)?,
        None => read_document_latest(file, &ctx)?,
    };
    Ok(json!({
        "schema": document.schema_version(),
        "text": document.to_display_text()
    }))
}

/// Writes a draft, placeholders and all.
pub fn new_draft(out: &Path, version_id: &str, defaults: bool, records: Option<&Path>) -> CliResult<Value> {
    let mut builder = if defaults {
        MamlBuilder::with_defaults(version_id)?
    } else {
        MamlBuilder::new(version_id)?
    };

    if let Some(records) = records {
        let content = fs::read_to_string(records)
            .map_err(|e| CliError::io_error(format!("Failed to read '{}': {}", records.display(), e)))?;
        let value: Value = serde_json::from_str(&content)?;
        let sample = RecordSample::from_value(&value)
            .ok_or_else(|| CliError::invalid_input("records must be a JSON array of objects"))?;
        builder.fields_from_table(&sample);
    }

    write_tree(out, &builder.draft_tree())?;

    Ok(json!({
        "path": out.display().to_string(),
        "schema": builder.schema().id,
        "ready": builder.is_ready()
    }))
}

/// Keys a version recognizes, in canonical order.
pub fn keys(version_id: &str) -> CliResult<Value> {
    let builder = MamlBuilder::new(version_id)?;
    let registry = SchemaRegistry::standard();
    let types: serde_json::Map<String, Value> = builder
        .schema()
        .document_keys
        .iter()
        .map(|spec| (spec.key.name().to_string(), json!(spec.key.kind().type_name())))
        .collect();
    Ok(json!({
        "schema": version_id,
        "keys": builder.possible_metadata(),
        "types": types,
        "required": registry.required_keys(version_id)?,
        "recommended": registry.recommended_keys(version_id)?,
        "fields": registry.field_key_order(version_id)?
    }))
}

/// Binds a file and rewrites it in canonical order.
pub fn normalize(session: &Session, file: &Path, out: &Path, version_id: &str) -> CliResult<Value> {
    let document = read_document(file, version_id, &session.context())?;
    write_document(out, &document, session.config.include_unset)?;
    Ok(json!({
        "path": out.display().to_string(),
        "schema": document.schema_version(),
        "fields": document.fields().len()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOC: &str = "\
author: A
table: T
version: beta
date: 2025-09-11
fields:
  - data_type: float
    name: x
";

    fn session() -> Session {
        Session::new(MamlConfig::default()).unwrap()
    }

    fn write_doc(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("t.maml");
        fs::write(&path, DOC).unwrap();
        path
    }

    #[test]
    fn test_validate_reports_order() {
        let dir = TempDir::new().unwrap();
        let data = validate(&session(), &write_doc(&dir), "v1.0").unwrap();
        assert_eq!(data["valid"], true);
        assert_eq!(data["order_ok"], false);
        assert_eq!(data["violation"], Value::Null);
    }

    #[test]
    fn test_validate_unknown_schema() {
        let dir = TempDir::new().unwrap();
        let err = validate(&session(), &write_doc(&dir), "v3").unwrap_err();
        assert_eq!(err.code_str(), "MAML_UNKNOWN_VERSION");
    }

    #[test]
    fn test_versions() {
        let dir = TempDir::new().unwrap();
        let data = versions(&session(), &write_doc(&dir)).unwrap();
        assert_eq!(data["versions"], json!(["v1.0", "v1.1"]));

        let path = dir.path().join("empty.maml");
        fs::write(&path, "table: T\n").unwrap();
        assert_eq!(versions(&session(), &path).unwrap()["versions"], "none");
    }

    #[test]
    fn test_normalize_then_validate() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.maml");
        let data = normalize(&session(), &write_doc(&dir), &out, "v1.1").unwrap();
        assert_eq!(data["fields"], 1);
        let data = validate(&session(), &out, "v1.1").unwrap();
        assert_eq!(data["order_ok"], true);
    }

    #[test]
    fn test_new_draft_with_records() {
        let dir = TempDir::new().unwrap();
        let records = dir.path().join("records.json");
        fs::write(&records, r#"[{"ra": 1.5, "id": 3}]"#).unwrap();
        let out = dir.path().join("draft.maml");

        let data = new_draft(&out, "v1.1", true, Some(&records)).unwrap();
        assert_eq!(data["ready"], false);
        let tree = read_tree(&out, &crate::observability::NullDiagnostics).unwrap();
        assert_eq!(tree["fields"][1]["data_type"], "int64");
        assert_eq!(tree["table"], "__REQUIRED__: Table Name");
    }

    #[test]
    fn test_keys() {
        let data = keys("v1.0").unwrap();
        assert_eq!(data["keys"].as_array().unwrap().len(), 13);
        assert_eq!(data["required"], json!(["table", "version", "date", "author", "fields"]));
        assert_eq!(data["types"]["coauthors"], "list of text");
        assert_eq!(data["types"]["date"], "ISO 8601 date");
    }

    #[test]
    fn test_show() {
        let dir = TempDir::new().unwrap();
        let data = show(&session(), &write_doc(&dir), None).unwrap();
        assert_eq!(data["schema"], "v1.1");
        assert!(data["text"].as_str().unwrap().contains("Fields (1):"));
    }
}

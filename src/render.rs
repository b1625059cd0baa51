//! Human-readable document summaries

use std::fmt::Write;

use serde_json::Value;

use crate::model::{Field, MamlDocument};
use crate::schema::FieldKey;

/// Renders a bound document as text. Output must depend only on the
/// document's data.
pub trait DisplayFormatter {
    fn render(&self, document: &MamlDocument) -> String;
}

/// Plain-text summary: title, version line, authors, optional metadata,
/// then one aligned row per field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

const FIELD_COLUMNS: [FieldKey; 5] = [
    FieldKey::Name,
    FieldKey::DataType,
    FieldKey::Unit,
    FieldKey::Ucd,
    FieldKey::Description,
];

impl DisplayFormatter for TextFormatter {
    fn render(&self, document: &MamlDocument) -> String {
        let mut out = String::new();

        let title = match (document.survey(), document.dataset()) {
            (Some(survey), Some(dataset)) => format!("{} ({} / {})", document.table(), survey, dataset),
            (Some(context), None) | (None, Some(context)) => format!("{} ({})", document.table(), context),
            (None, None) => document.table().to_string(),
        };
        let _ = writeln!(out, "{}", title);
        let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
        let _ = writeln!(
            out,
            "Version {} ({}), MAML {}",
            scalar_text(document.version()),
            document.date(),
            document.schema_version()
        );

        let _ = writeln!(out, "Author: {}", document.author());
        if let Some(coauthors) = document.coauthors().filter(|list| !list.is_empty()) {
            let _ = writeln!(out, "Coauthors: {}", coauthors.join(", "));
        }

        if let Some(license) = document.license() {
            let _ = writeln!(out, "License: {}", license);
        }
        write_list(&mut out, "Depends", document.depends());
        write_list(&mut out, "Keywords", document.keywords());
        write_list(&mut out, "Keyarray", document.keyarray());
        if let Some(comments) = document.comments().filter(|list| !list.is_empty()) {
            let _ = writeln!(out, "Comments:");
            for comment in comments {
                let _ = writeln!(out, "  - {}", comment);
            }
        }
        if let Some(extra) = document.extra().filter(|map| !map.is_empty()) {
            let _ = writeln!(out, "Extra:");
            for (key, value) in extra {
                let _ = writeln!(out, "  {}: {}", key, scalar_text(value));
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Fields ({}):", document.fields().len());
        write_field_table(&mut out, document.fields());
        out
    }
}

fn write_list(out: &mut String, label: &str, items: Option<&[String]>) {
    if let Some(items) = items.filter(|list| !list.is_empty()) {
        let _ = writeln!(out, "{}: {}", label, items.join(", "));
    }
}

fn write_field_table(out: &mut String, fields: &[Field]) {
    let cell = |field: &Field, key: FieldKey| field.get(key).unwrap_or("-").to_string();

    let mut widths: Vec<usize> = FIELD_COLUMNS.iter().map(|key| key.name().len()).collect();
    for field in fields {
        for (width, key) in widths.iter_mut().zip(FIELD_COLUMNS) {
            *width = (*width).max(cell(field, key).chars().count());
        }
    }

    let header: Vec<String> = FIELD_COLUMNS.iter().map(|key| key.name().to_string()).collect();
    write_row(out, &header, &widths);
    for field in fields {
        let row: Vec<String> = FIELD_COLUMNS.iter().map(|key| cell(field, *key)).collect();
        write_row(out, &row, &widths);
    }
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "  {}", line.trim_end());
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

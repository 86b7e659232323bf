//! Strict-mode validation: detect unknown keys in schema files.
//!
//! Each table-valued field (object-valued in JSON) is deserialized into
//! [`FieldRule`] through `serde_ignored`, which reports every key the rule
//! doesn't consume. Unknown keys are reported with the schema path and a
//! best-effort line number.

use std::path::Path;

use serde::Deserializer;

use crate::error::EnvfigError;
use crate::schema::FieldRule;

/// Validate that no field table in a parsed TOML schema carries keys unknown
/// to [`FieldRule`].
///
/// Tables that fail to deserialize at all are left for the caller to report.
pub fn validate_unknown_keys(
    table: &toml::Table,
    content: &str,
    path: &Path,
) -> Result<(), EnvfigError> {
    let mut unknown_keys: Vec<String> = Vec::new();

    for (field, value) in table {
        if value.is_table() {
            collect_ignored(field, value.clone(), &mut unknown_keys);
        }
    }

    report(unknown_keys, path, |key| find_key_line(content, key))
}

/// Validate that no rule object in a parsed JSON schema carries keys unknown
/// to [`FieldRule`].
pub fn validate_unknown_json_keys(
    map: &serde_json::Map<String, serde_json::Value>,
    content: &str,
    path: &Path,
) -> Result<(), EnvfigError> {
    let mut unknown_keys: Vec<String> = Vec::new();

    for (field, value) in map {
        if value.is_object() {
            collect_ignored(field, value.clone(), &mut unknown_keys);
        }
    }

    report(unknown_keys, path, |key| find_json_key_line(content, key))
}

fn collect_ignored<'de, D: Deserializer<'de>>(
    field: &str,
    value: D,
    unknown_keys: &mut Vec<String>,
) {
    let _rule: Result<FieldRule, _> = serde_ignored::deserialize(value, |ignored| {
        unknown_keys.push(format!("{field}.{ignored}"));
    });
}

fn report(
    unknown_keys: Vec<String>,
    path: &Path,
    line_of: impl Fn(&str) -> usize,
) -> Result<(), EnvfigError> {
    if unknown_keys.is_empty() {
        return Ok(());
    }

    let errors: Vec<EnvfigError> = unknown_keys
        .into_iter()
        .map(|key| {
            let line = line_of(&key);
            EnvfigError::UnknownSchemaKey {
                key,
                path: path.to_path_buf(),
                line,
            }
        })
        .collect();

    Err(EnvfigError::UnknownSchemaKeys(errors))
}

/// Find the 1-indexed line of `"leaf"` in JSON content, searching from the
/// line that names `"FIELD"`. Returns 0 if either cannot be located.
fn find_json_key_line(content: &str, dotted_key: &str) -> usize {
    let Some((field, leaf)) = dotted_key.split_once('.') else {
        return 0;
    };
    let field = format!("\"{field}\"");
    let leaf = format!("\"{leaf}\"");

    let mut lines = content.lines().enumerate();
    let Some((start, first)) = lines.by_ref().find(|(_, line)| line.contains(&field)) else {
        return 0;
    };
    let rest = first.split_once(&field).map_or("", |(_, rest)| rest);
    if rest.contains(&leaf) {
        return start + 1;
    }
    lines
        .find(|(_, line)| line.contains(&leaf))
        .map_or(0, |(i, _)| i + 1)
}

/// Find the 1-indexed line number for a `FIELD.key` path in TOML content.
///
/// Tracks the current `[section]` header and only matches the leaf key inside
/// the field's section. For inline tables (`FIELD = { ... }`) the field's own
/// line is returned. Returns 0 if the key cannot be located.
fn find_key_line(content: &str, dotted_key: &str) -> usize {
    let Some((field, leaf)) = dotted_key.split_once('.') else {
        return 0;
    };

    let mut current_section = String::new();

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with('[') && !trimmed.starts_with("[[") {
            current_section = trimmed
                .trim_start_matches('[')
                .trim_end_matches(']')
                .trim()
                .trim_matches('"')
                .to_string();
            continue;
        }

        let (section_key, inline) = if current_section == field {
            (leaf, false)
        } else if current_section.is_empty() {
            (field, true)
        } else {
            continue;
        };

        if let Some(after_key) = trimmed.strip_prefix(section_key)
            && let Some(rest) = after_key.trim_start().strip_prefix('=')
        {
            if !inline {
                return i + 1;
            }
            let rest = rest.trim_start();
            if rest.starts_with('{') && rest.contains(leaf) {
                return i + 1;
            }
        }
    }
    0
}

//! Field-level type specifications.
//!
//! A [`Schema`] maps env keys to a [`FieldSpec`], which is either a bare type
//! id (`"int"`, `"int|boolean"`) or a full [`FieldRule`] carrying a default,
//! an enumeration and bounds. An empty schema turns validation off: every
//! key in the file is passed through as a raw string.
//!
//! Schemas can be built in code or loaded from TOML or JSON:
//!
//! ```toml
//! PORT = "int"
//! TAGS = "array"
//!
//! [LOG_LEVEL]
//! type = "string"
//! oneOf = ["debug", "info", "warn"]
//! default = "info"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EnvfigError;
use crate::validate;

/// The type specification for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    /// Bare type id. Invalid values are dropped from the result.
    Type(String),
    /// Full record. Invalid values fall back to `default` (or `null`).
    Rule(FieldRule),
}

impl FieldSpec {
    pub fn type_id(&self) -> &str {
        match self {
            FieldSpec::Type(t) => t,
            FieldSpec::Rule(rule) => &rule.type_id,
        }
    }
}

impl From<&str> for FieldSpec {
    fn from(type_id: &str) -> Self {
        FieldSpec::Type(type_id.to_string())
    }
}

impl From<String> for FieldSpec {
    fn from(type_id: String) -> Self {
        FieldSpec::Type(type_id)
    }
}

impl From<FieldRule> for FieldSpec {
    fn from(rule: FieldRule) -> Self {
        FieldSpec::Rule(rule)
    }
}

/// A full field specification.
///
/// `min`/`max` only apply when `type` is exactly `"int"` (numeric bound) or
/// `"string"` (length bound).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, alias = "one_of", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl FieldRule {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            default: None,
            one_of: None,
            min: None,
            max: None,
        }
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn one_of<V: Into<Value>>(mut self, options: impl IntoIterator<Item = V>) -> Self {
        self.one_of = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field with a bare type id.
    pub fn field(mut self, name: &str, type_id: &str) -> Self {
        self.insert(name, type_id);
        self
    }

    /// Add a field with a full rule.
    pub fn rule(mut self, name: &str, rule: FieldRule) -> Self {
        self.insert(name, rule);
        self
    }

    pub fn insert(&mut self, name: &str, spec: impl Into<FieldSpec>) {
        self.fields.insert(name.to_string(), spec.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a TOML schema document.
    ///
    /// With `strict`, keys inside field tables that are not part of
    /// [`FieldRule`] (typos like `mni`) are reported with their line number.
    pub fn from_toml_str(content: &str, path: &Path, strict: bool) -> Result<Self, EnvfigError> {
        let table: toml::Table = toml::from_str(content).map_err(|e| EnvfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        if strict {
            validate::validate_unknown_keys(&table, content, path)?;
        }

        let mut schema = Schema::new();
        for (name, value) in table {
            let spec = match value {
                toml::Value::String(type_id) => FieldSpec::Type(type_id),
                toml::Value::Table(_) => {
                    let rule: FieldRule =
                        value.try_into().map_err(|e: toml::de::Error| {
                            EnvfigError::InvalidSchema {
                                field: name.clone(),
                                reason: e.message().to_string(),
                            }
                        })?;
                    FieldSpec::Rule(rule)
                }
                other => return Err(not_a_spec(name, other.type_str())),
            };
            schema.fields.insert(name, spec);
        }
        Ok(schema)
    }

    /// Parse a JSON schema document: an object whose members are type names
    /// or rule objects.
    ///
    /// `strict` rejects unknown keys in rule objects, as for TOML.
    pub fn from_json_str(content: &str, path: &Path, strict: bool) -> Result<Self, EnvfigError> {
        let map: serde_json::Map<String, Value> =
            serde_json::from_str(content).map_err(|e| EnvfigError::JsonError {
                path: path.to_path_buf(),
                source: e,
            })?;

        if strict {
            validate::validate_unknown_json_keys(&map, content, path)?;
        }

        let mut schema = Schema::new();
        for (name, value) in map {
            let spec = match value {
                Value::String(type_id) => FieldSpec::Type(type_id),
                Value::Object(_) => {
                    let rule: FieldRule = serde_json::from_value(value).map_err(|e| {
                        EnvfigError::InvalidSchema {
                            field: name.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                    FieldSpec::Rule(rule)
                }
                Value::Null => return Err(not_a_spec(name, "null")),
                Value::Bool(_) => return Err(not_a_spec(name, "boolean")),
                Value::Number(_) => return Err(not_a_spec(name, "number")),
                Value::Array(_) => return Err(not_a_spec(name, "array")),
            };
            schema.fields.insert(name, spec);
        }
        Ok(schema)
    }

    /// Load a schema file, picking the format from the extension
    /// (`.json` is JSON, anything else is TOML).
    pub fn load(path: &Path, strict: bool) -> Result<Self, EnvfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| EnvfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content, path, strict)
        } else {
            Self::from_toml_str(&content, path, strict)
        }
    }
}

fn not_a_spec(field: String, found: &str) -> EnvfigError {
    EnvfigError::InvalidSchema {
        field,
        reason: format!("expected a type name or a table, found {found}"),
    }
}

impl<K: Into<String>, V: Into<FieldSpec>> FromIterator<(K, V)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

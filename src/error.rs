use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which side of a `min`/`max` pair was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Min,
    Max,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Min => write!(f, "minimum"),
            Limit::Max => write!(f, "maximum"),
        }
    }
}

/// What a bound was compared against: the number itself (`int`) or the
/// string length (`string`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Value,
    Length,
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Value => write!(f, "value"),
            Measure::Length => write!(f, "length"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EnvfigError {
    #[error("Env file not found: {path}")]
    MissingFile { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No reader found for type '{type_id}' (field '{key}')")]
    UnknownReader { key: String, type_id: String },

    #[error("Value '{value}' for '{key}' is not among the allowed options: {options}")]
    OneOfViolation {
        key: String,
        value: String,
        options: String,
    },

    #[error("Invalid {measure} for '{key}': {value} violates the {limit} of {bound}")]
    BoundViolation {
        key: String,
        value: String,
        bound: f64,
        limit: Limit,
        measure: Measure,
    },

    #[error("Populate is disabled; enable it with .populate(true) on the builder")]
    PopulateDisabled,

    #[error("Unknown key '{key}' in schema {path} (line {line})")]
    UnknownSchemaKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in schema file")]
    UnknownSchemaKeys(Vec<EnvfigError>),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    JsonError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid schema entry for '{field}': {reason}")]
    InvalidSchema { field: String, reason: String },

    #[error("Settings error: {0}")]
    SettingsError(#[from] confique::Error),

    #[error("Failed to deserialize parsed values: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("Could not determine the env file location (no home or config directory)")]
    NoFileLocation,
}

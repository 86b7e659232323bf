//! Parser settings as a confique config struct.
//!
//! [`Settings`] covers everything about a parser that can be written down:
//! the env file, the schema file, the array delimiter, and whether populate
//! is allowed. Custom readers are code and are registered on the builder.
//!
//! Settings layer like any confique config: `ENVFIG_*` environment variables
//! over an optional TOML settings file over compiled defaults.

use std::path::{Path, PathBuf};

use confique::Config;

use crate::error::EnvfigError;

#[derive(Config, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Allow copying parsed values into the process environment.
    #[config(default = true, env = "ENVFIG_POPULATE")]
    pub populate: bool,

    /// Delimiter used to split `array` values.
    #[config(default = ", ", env = "ENVFIG_DELIMITER")]
    pub delimiter: String,

    /// Path of the env file. Defaults to `.env` in the working directory.
    #[config(env = "ENVFIG_FILE")]
    pub file: Option<PathBuf>,

    /// Path of a schema file (`.toml` or `.json`). Without one, every key is
    /// kept as a raw string.
    #[config(env = "ENVFIG_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Reject unknown keys in schema file field rules.
    #[config(default = true, env = "ENVFIG_STRICT")]
    pub strict: bool,
}

/// Load settings from `ENVFIG_*` environment variables, then `path` if given.
///
/// Environment variables take precedence over the file. A settings file that
/// does not exist is skipped.
pub fn load(path: Option<&Path>) -> Result<Settings, EnvfigError> {
    let mut builder = Settings::builder().env();
    if let Some(path) = path {
        builder = builder.file(path);
    }
    builder.load().map_err(EnvfigError::from)
}

/// Load settings from a TOML file only, ignoring the environment.
pub fn from_file(path: &Path) -> Result<Settings, EnvfigError> {
    Settings::builder()
        .file(path)
        .load()
        .map_err(EnvfigError::from)
}

/// A commented TOML template listing every setting and its default.
pub fn template() -> String {
    confique::toml::template::<Settings>(confique::toml::FormatOptions::default())
}

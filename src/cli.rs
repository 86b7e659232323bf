//! Clap adapter for envfig.
//!
//! Compiled only with the `clap` Cargo feature (on by default). [`EnvArgs`]
//! is a clap derive struct to flatten into an app's own parser; it gives the
//! app `--env-file`, `--env-schema`, `--env-delimiter` and `--no-populate`
//! flags. [`EnvArgs::apply`] forwards whatever the user passed onto an
//! [`EnvfigBuilder`]; flags left out keep the builder's value.

use std::path::PathBuf;

use clap::Args;

use crate::builder::EnvfigBuilder;

/// Clap-derived flags controlling env file parsing.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     env: EnvArgs,
/// }
///
/// let cli = Cli::parse();
/// let parsed = cli.env.apply(Envfig::builder()).load()?;
/// ```
#[derive(Debug, Clone, Default, Args)]
pub struct EnvArgs {
    /// Read this env file instead of `.env` in the working directory.
    #[arg(long = "env-file", value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Validate and type values with this schema file (TOML or JSON).
    #[arg(long = "env-schema", value_name = "PATH")]
    pub env_schema: Option<PathBuf>,

    /// Delimiter for `array` values.
    #[arg(long = "env-delimiter", value_name = "DELIM")]
    pub env_delimiter: Option<String>,

    /// Parse without copying values into the process environment.
    #[arg(long = "no-populate")]
    pub no_populate: bool,
}

impl EnvArgs {
    /// Forward the parsed flags onto `builder`.
    pub fn apply(self, mut builder: EnvfigBuilder) -> EnvfigBuilder {
        if let Some(path) = self.env_file {
            builder = builder.file(path);
        }
        if let Some(path) = self.env_schema {
            builder = builder.schema_file(path);
        }
        if let Some(delimiter) = self.env_delimiter {
            builder = builder.delimiter(&delimiter);
        }
        if self.no_populate {
            builder = builder.populate(false);
        }
        builder
    }
}

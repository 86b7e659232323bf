//! Schema-driven `.env` parsing. Describe the keys you expect, point at a
//! file, and get typed values back.
//!
//! ```no_run
//! use envfig::{Envfig, FieldRule, Schema};
//!
//! let schema = Schema::new()
//!     .field("HOST", "string")
//!     .field("DEBUG", "boolean")
//!     .rule("PORT", FieldRule::new("int").min(1.0).max(65535.0).default_value(8080));
//!
//! let parsed = Envfig::builder().schema(schema).load()?;
//! let port = parsed.get_i64("PORT");
//! # Ok::<(), envfig::EnvfigError>(())
//! ```
//!
//! That call reads `.env` from the working directory, validates and converts
//! each listed key, drops keys the schema doesn't mention, and copies the
//! result into the process environment without overwriting anything that is
//! already set.
//!
//! # Type readers
//!
//! Every type id in a schema names a [`TypeReader`]: a small object that
//! answers "is this raw string a member of my type?" and "what is its typed
//! value?". Built-ins:
//!
//! | Id | Accepts | Value |
//! |----|---------|-------|
//! | `string` | anything | the raw string |
//! | `int` | whole numbers | integer |
//! | `number` | finite numbers | integer or float |
//! | `boolean` | `true/false`, `1/0`, `yes/no`, `on/off` | bool |
//! | `array` | anything | list of strings, split on the delimiter |
//! | `json` | JSON documents | the parsed document |
//! | `email` | `local@domain.tld` | the raw string |
//! | `url` | absolute URLs (feature `url`) | the raw string |
//!
//! Custom readers are registered on the builder with
//! [`reader()`](EnvfigBuilder::reader) and are first-class: they can replace
//! a built-in by reusing its id, and they can appear in unions.
//!
//! ## Unions
//!
//! A type id like `"int|boolean"` is a union. Members are tried left to
//! right and the first one that accepts the value parses it, so
//! `"int|boolean"` turns `1` into the number 1 while `"boolean|int"` turns
//! it into `true`. The union reader is built on first use and cached in the
//! [`ReaderRegistry`] under the exact expression string.
//!
//! ## Arrays
//!
//! `array` splits on the builder's [`delimiter()`](EnvfigBuilder::delimiter)
//! (`", "` by default). Elements stay strings; there is no `array<int>`.
//!
//! # Schemas
//!
//! A [`Schema`] maps keys to either a bare type id or a [`FieldRule`]:
//!
//! - **Bare type id**: values that don't validate are dropped from the
//!   result.
//! - **Rule**: values that don't validate become the rule's `default`, or
//!   `null` without one. Valid values are then checked against `oneOf` and
//!   `min`/`max`.
//!
//! `oneOf` compares the raw text. `min`/`max` apply to rules typed exactly
//! `int` (the number) or `string` (the length), and are measured on the raw
//! text rather than on what the reader produced.
//!
//! With no schema at all, every key is kept as a raw string.
//!
//! Schemas can be built in code or loaded from TOML or JSON with
//! [`schema_file()`](EnvfigBuilder::schema_file). Schema files are strict by
//! default: a typo like `mni = 1` inside a field table (or `"mni": 1` in a
//! JSON rule object) fails with the file path and line number. Turn that off with
//! [`.strict(false)`](EnvfigBuilder::strict).
//!
//! # File format
//!
//! Lines look like `KEY=value`. Keys are word characters, dots and hyphens.
//! A value starting with `#` comments out the line. Double-quoted values
//! expand `\n` to a newline; single-quoted values are taken literally;
//! unquoted values are trimmed. Anything else is ignored.
//!
//! # Populate
//!
//! [`EnvParser::populate`] copies parsed values into an [`Environment`],
//! skipping keys that are already set, and reports which keys it wrote. Use
//! [`ProcessEnv`] for the real environment or a `HashMap` in tests. A parser
//! built with `.populate(false)` refuses with
//! [`EnvfigError::PopulateDisabled`].
//!
//! # Errors
//!
//! Every fallible operation returns [`EnvfigError`]. A missing env file, a
//! type id with no reader, a `oneOf` miss and a bound violation are all
//! fatal: the parse returns the error and no partial result.
//!
//! # Settings and CLI
//!
//! Parser options can also come from a [`Settings`] struct loaded from
//! `ENVFIG_*` variables and a TOML file (see [`settings`]). With the `clap`
//! feature (on by default), [`EnvArgs`] adds `--env-file`, `--env-schema`,
//! `--env-delimiter` and `--no-populate` to an app's own parser.

pub mod error;
pub mod settings;
pub mod types;

mod array;
mod builder;
#[cfg(feature = "clap")]
mod cli;
mod env;
mod file;
mod line;
mod parsed;
mod reader;
mod registry;
mod resolve;
mod schema;
mod union;
mod validate;

#[cfg(test)]
mod fixtures;

pub use array::{ArrayTypeReader, DEFAULT_DELIMITER};
pub use builder::{EnvParser, Envfig, EnvfigBuilder};
#[cfg(feature = "clap")]
pub use cli::EnvArgs;
pub use env::{Environment, PopulateReport, ProcessEnv};
pub use error::EnvfigError;
pub use line::{parse_line, parse_lines};
pub use parsed::Parsed;
#[cfg(feature = "url")]
pub use reader::UrlReader;
pub use reader::{
    BooleanReader, EmailReader, IntReader, JsonReader, NumberReader, StringReader, TypeReader,
};
pub use registry::ReaderRegistry;
pub use schema::{FieldRule, FieldSpec, Schema};
pub use settings::Settings;
pub use types::EnvFile;
pub use union::UnionTypeReader;

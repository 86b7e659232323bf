use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::array::DEFAULT_DELIMITER;
use crate::env::{self, Environment, PopulateReport, ProcessEnv};
use crate::error::EnvfigError;
use crate::file;
use crate::line;
use crate::parsed::Parsed;
use crate::reader::TypeReader;
use crate::registry::ReaderRegistry;
use crate::resolve;
use crate::schema::Schema;
use crate::settings::Settings;
use crate::types::{DEFAULT_FILE_NAME, EnvFile};

/// Entry point for building an env parser.
pub struct Envfig;

impl Envfig {
    pub fn builder() -> EnvfigBuilder {
        EnvfigBuilder::new()
    }
}

/// Builder for an [`EnvParser`].
///
/// Defaults: `.env` in the working directory, no schema, `", "` as the array
/// delimiter, populate allowed, strict schema files.
pub struct EnvfigBuilder {
    location: EnvFile,
    file_name: Option<String>,
    delimiter: String,
    populate: bool,
    schema: Option<Schema>,
    schema_path: Option<PathBuf>,
    strict: bool,
    readers: Vec<Arc<dyn TypeReader>>,
}

impl EnvfigBuilder {
    fn new() -> Self {
        Self {
            location: EnvFile::default(),
            file_name: None,
            delimiter: DEFAULT_DELIMITER.to_string(),
            populate: true,
            schema: None,
            schema_path: None,
            strict: true,
            readers: Vec::new(),
        }
    }

    /// Read this exact file.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = EnvFile::Path(path.into());
        self
    }

    /// Set where to look for the env file (default: [`EnvFile::Cwd`]).
    pub fn location(mut self, location: EnvFile) -> Self {
        self.location = location;
        self
    }

    /// Override the file name used by directory locations (default: `.env`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Set the delimiter the `array` reader splits on (default: `", "`).
    pub fn delimiter(mut self, delimiter: &str) -> Self {
        self.delimiter = delimiter.to_string();
        self
    }

    /// Allow or forbid [`EnvParser::populate`] (default: allowed).
    pub fn populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }

    /// Use `schema` to validate and type values. Replaces any schema file.
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self.schema_path = None;
        self
    }

    /// Load the schema from a TOML or JSON file at build time.
    pub fn schema_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_path = Some(path.into());
        self.schema = None;
        self
    }

    /// Enable or disable strict schema files (default: `true`).
    /// In strict mode, unknown keys in schema file rules are errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Register a custom reader. Registered after the built-ins, so a
    /// custom reader with a built-in id replaces it.
    pub fn reader<R: TypeReader + 'static>(mut self, reader: R) -> Self {
        self.readers.push(Arc::new(reader));
        self
    }

    /// Register several custom readers, in order.
    pub fn readers(mut self, readers: impl IntoIterator<Item = Box<dyn TypeReader>>) -> Self {
        self.readers.extend(readers.into_iter().map(Arc::from));
        self
    }

    /// Apply loaded [`Settings`]. `file` and `schema` only replace the
    /// builder's values when they are set.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.populate = settings.populate;
        self.delimiter = settings.delimiter;
        self.strict = settings.strict;
        if let Some(path) = settings.file {
            self.location = EnvFile::Path(path);
        }
        if let Some(path) = settings.schema {
            self = self.schema_file(path);
        }
        self
    }

    fn effective_file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME)
    }

    fn effective_schema(&self) -> Result<Schema, EnvfigError> {
        if let Some(path) = &self.schema_path {
            return Schema::load(path, self.strict);
        }
        Ok(self.schema.clone().unwrap_or_default())
    }

    /// Build the parser: resolve the file path, load the schema, and fill the
    /// reader registry (array reader, built-ins, then custom readers).
    pub fn build(self) -> Result<EnvParser, EnvfigError> {
        let path = file::resolve_env_file(&self.location, self.effective_file_name())
            .ok_or(EnvfigError::NoFileLocation)?;
        let schema = self.effective_schema()?;

        let registry = ReaderRegistry::with_builtins(&self.delimiter);
        for reader in self.readers {
            registry.register_arc(reader);
        }

        debug!(
            path = %path.display(),
            fields = schema.len(),
            readers = registry.len(),
            "built env parser"
        );

        Ok(EnvParser {
            path,
            schema,
            registry,
            delimiter: self.delimiter,
            populate: self.populate,
        })
    }

    /// Build, parse the env file, and populate the process environment when
    /// populate is enabled. Existing variables are never overwritten.
    pub fn load(self) -> Result<Parsed, EnvfigError> {
        let parser = self.build()?;
        let parsed = parser.parse()?;
        if parser.populate_enabled() {
            parser.populate(&parsed, &mut ProcessEnv)?;
        }
        Ok(parsed)
    }
}

/// A configured parser. Holds the reader registry for its whole lifetime;
/// each parse call is otherwise independent.
#[derive(Debug)]
pub struct EnvParser {
    path: PathBuf,
    schema: Schema,
    registry: ReaderRegistry,
    delimiter: String,
    populate: bool,
}

impl EnvParser {
    /// Read and parse the env file.
    pub fn parse(&self) -> Result<Parsed, EnvfigError> {
        let content = file::read_env_file(&self.path)?;
        self.parse_str(&content)
    }

    /// Parse env file text that has already been loaded.
    pub fn parse_str(&self, content: &str) -> Result<Parsed, EnvfigError> {
        resolve::resolve(line::parse_lines(content), &self.schema, &self.registry)
    }

    /// Copy `parsed` into `env`, skipping keys `env` already has.
    ///
    /// Fails with [`EnvfigError::PopulateDisabled`] and writes nothing when
    /// the parser was built with `.populate(false)`.
    pub fn populate(
        &self,
        parsed: &Parsed,
        env: &mut impl Environment,
    ) -> Result<PopulateReport, EnvfigError> {
        if !self.populate {
            return Err(EnvfigError::PopulateDisabled);
        }
        Ok(env::populate_env(parsed, env, &self.delimiter))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn registry(&self) -> &ReaderRegistry {
        &self.registry
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn populate_enabled(&self) -> bool {
        self.populate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{Always, PortReader, SAMPLE_ENV, SAMPLE_SCHEMA};
    use crate::schema::FieldRule;
    use serde_json::json;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn write_env(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(".env");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults() {
        let builder = Envfig::builder();
        assert_eq!(builder.location, EnvFile::Cwd);
        assert_eq!(builder.effective_file_name(), ".env");
        assert_eq!(builder.delimiter, ", ");
        assert!(builder.populate);
        assert!(builder.strict);
    }

    #[test]
    fn default_path_is_cwd_dotenv() {
        let parser = Envfig::builder().build().unwrap();
        assert_eq!(parser.path(), std::env::current_dir().unwrap().join(".env"));
    }

    #[test]
    fn file_name_override() {
        let dir = TempDir::new().unwrap();
        let parser = Envfig::builder()
            .location(EnvFile::Path(dir.path().join("custom.env")))
            .build()
            .unwrap();
        assert_eq!(parser.path(), dir.path().join("custom.env"));

        let builder = Envfig::builder().file_name(".env.local");
        assert_eq!(builder.effective_file_name(), ".env.local");
    }

    #[test]
    fn parse_without_schema_keeps_strings() {
        let dir = TempDir::new().unwrap();
        let path = write_env(&dir, "A=1\nB=\"two words\"\n");
        let parsed = Envfig::builder().file(path).build().unwrap().parse().unwrap();
        assert_eq!(parsed.get("A"), Some(&json!("1")));
        assert_eq!(parsed.get_str("B"), Some("two words"));
    }

    #[test]
    fn missing_file_errors_before_parsing() {
        let dir = TempDir::new().unwrap();
        let parser = Envfig::builder()
            .file(dir.path().join(".env"))
            .build()
            .unwrap();
        assert!(matches!(parser.parse(), Err(EnvfigError::MissingFile { .. })));
    }

    #[test]
    fn schema_omits_unlisted_keys() {
        let parser = Envfig::builder()
            .schema(Schema::new().field("A", "int"))
            .build()
            .unwrap();
        let parsed = parser.parse_str("A=1\nB=2\n").unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("A"), Some(&json!(1)));
    }

    #[test]
    fn bound_violation_returns_no_result() {
        let parser = Envfig::builder()
            .schema(Schema::new().rule("A", FieldRule::new("int").min(5.0)))
            .build()
            .unwrap();
        let err = parser.parse_str("A=3").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('5'));
    }

    #[test]
    fn default_fallback() {
        let parser = Envfig::builder()
            .schema(Schema::new().rule("A", FieldRule::new("int").default_value(0)))
            .build()
            .unwrap();
        let parsed = parser.parse_str("A=notanumber").unwrap();
        assert_eq!(parsed.get("A"), Some(&json!(0)));
    }

    #[test]
    fn quoting_semantics() {
        let parser = Envfig::builder().build().unwrap();
        let parsed = parser.parse_str("D=\"a\\nb\"\nS='a\\nb'\n").unwrap();
        assert_eq!(parsed.get_str("D"), Some("a\nb"));
        assert_eq!(parsed.get_str("S"), Some("a\\nb"));
    }

    #[test]
    fn custom_delimiter_reaches_array_reader() {
        let parser = Envfig::builder()
            .delimiter(";")
            .schema(Schema::new().field("L", "array"))
            .build()
            .unwrap();
        let parsed = parser.parse_str("L=a;b;c").unwrap();
        assert_eq!(parsed.get("L"), Some(&json!(["a", "b", "c"])));
    }

    #[test]
    fn custom_reader_registered() {
        let parser = Envfig::builder()
            .reader(PortReader)
            .schema(Schema::new().field("PORT", "port").field("BAD", "port"))
            .build()
            .unwrap();
        let parsed = parser.parse_str("PORT=443\nBAD=0\n").unwrap();
        assert_eq!(parsed.get_i64("PORT"), Some(443));
        assert!(!parsed.contains_key("BAD"));
    }

    #[test]
    fn boxed_readers_registered_in_order() {
        let parser = Envfig::builder()
            .readers(vec![
                Box::new(PortReader) as Box<dyn TypeReader>,
                Box::new(Always("port")),
            ])
            .schema(Schema::new().field("PORT", "port"))
            .build()
            .unwrap();
        let parsed = parser.parse_str("PORT=443").unwrap();
        assert_eq!(parsed.get_str("PORT"), Some("always"));
    }

    #[test]
    fn custom_reader_overrides_builtin() {
        let parser = Envfig::builder()
            .reader(Always("int"))
            .schema(Schema::new().field("A", "int"))
            .build()
            .unwrap();
        assert_eq!(parser.parse_str("A=1").unwrap().get_str("A"), Some("always"));
    }

    #[test]
    fn union_readers_shared_across_parses() {
        let parser = Envfig::builder()
            .schema(Schema::new().field("A", "int|boolean"))
            .build()
            .unwrap();
        parser.parse_str("A=1").unwrap();
        let first = parser.registry().resolve("int|boolean").unwrap();
        parser.parse_str("A=yes").unwrap();
        let second = parser.registry().resolve("int|boolean").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn populate_never_overwrites() {
        let parser = Envfig::builder().build().unwrap();
        let parsed = parser.parse_str("X=new\nY=v\n").unwrap();

        let mut env: HashMap<String, String> = HashMap::new();
        env.insert("X".into(), "old".into());
        let report = parser.populate(&parsed, &mut env).unwrap();

        assert_eq!(env["X"], "old");
        assert_eq!(env["Y"], "v");
        assert_eq!(report.written, vec!["Y"]);
        assert_eq!(report.skipped, vec!["X"]);
    }

    #[test]
    fn populate_disabled_writes_nothing() {
        let parser = Envfig::builder().populate(false).build().unwrap();
        let parsed = parser.parse_str("A=1").unwrap();
        let mut env: HashMap<String, String> = HashMap::new();
        let err = parser.populate(&parsed, &mut env).unwrap_err();
        assert!(matches!(err, EnvfigError::PopulateDisabled));
        assert!(env.is_empty());
    }

    #[test]
    fn schema_file_loaded_at_build() {
        let dir = TempDir::new().unwrap();
        let schema_path = dir.path().join("schema.toml");
        fs::write(&schema_path, SAMPLE_SCHEMA).unwrap();
        let env_path = write_env(&dir, SAMPLE_ENV);

        let parsed = Envfig::builder()
            .file(env_path)
            .schema_file(&schema_path)
            .reader(PortReader)
            .build()
            .unwrap()
            .parse()
            .unwrap();

        assert_eq!(parsed.get_str("HOST"), Some("0.0.0.0"));
        assert_eq!(parsed.get_i64("PORT"), Some(8080));
        assert_eq!(parsed.get_bool("DEBUG"), Some(true));
        assert_eq!(parsed.get("TAGS"), Some(&json!(["web", "api", "internal"])));
        assert_eq!(parsed.get_str("GREETING"), Some("hello\nworld"));
        assert_eq!(parsed.get_str("RAW"), Some("hello\\nworld"));
        assert_eq!(parsed.get_str("LOG_LEVEL"), Some("info"));
        assert!(!parsed.contains_key("DISABLED"));
        assert!(!parsed.contains_key("UNUSED"));
        assert!(!parsed.contains_key("WORKERS"));
    }

    #[test]
    fn schema_file_unknown_reader_fails_at_parse() {
        let dir = TempDir::new().unwrap();
        let schema_path = dir.path().join("schema.toml");
        fs::write(&schema_path, SAMPLE_SCHEMA).unwrap();

        // No PortReader registered.
        let parser = Envfig::builder().schema_file(&schema_path).build().unwrap();
        let err = parser.parse_str(SAMPLE_ENV).unwrap_err();
        assert!(matches!(err, EnvfigError::UnknownReader { .. }));
    }

    #[test]
    fn strict_schema_file_rejects_typo() {
        let dir = TempDir::new().unwrap();
        let schema_path = dir.path().join("schema.toml");
        fs::write(&schema_path, "[A]\ntype = \"int\"\nmni = 1\n").unwrap();

        let result = Envfig::builder().schema_file(&schema_path).build();
        assert!(matches!(result, Err(EnvfigError::UnknownSchemaKeys(_))));

        let lenient = Envfig::builder()
            .schema_file(&schema_path)
            .strict(false)
            .build();
        assert!(lenient.is_ok());
    }

    #[test]
    fn settings_applied() {
        let dir = TempDir::new().unwrap();
        let schema_path = dir.path().join("schema.json");
        fs::write(&schema_path, r#"{"L": "array"}"#).unwrap();
        let env_path = write_env(&dir, "L=a|b\n");

        let settings = Settings {
            populate: false,
            delimiter: "|".into(),
            file: Some(env_path.clone()),
            schema: Some(schema_path),
            strict: true,
        };
        let parser = Envfig::builder().settings(settings).build().unwrap();
        assert_eq!(parser.path(), env_path);
        assert!(!parser.populate_enabled());
        assert_eq!(parser.parse().unwrap().get("L"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn schema_replaces_schema_file() {
        let builder = Envfig::builder()
            .schema_file("/nonexistent/schema.toml")
            .schema(Schema::new().field("A", "int"));
        assert!(builder.build().is_ok());
    }

    #[test]
    fn load_populates_process_env() {
        let dir = TempDir::new().unwrap();
        let key = "ENVFIG_TEST_LOAD_POPULATES";
        let path = write_env(&dir, &format!("{key}=from-file\n"));

        let parsed = Envfig::builder().file(path).load().unwrap();
        assert_eq!(parsed.get_str(key), Some("from-file"));
        assert_eq!(std::env::var(key).unwrap(), "from-file");
        // SAFETY: the key is unique to this test.
        unsafe { std::env::remove_var(key) };
    }

    #[test]
    fn load_without_populate_leaves_env_alone() {
        let dir = TempDir::new().unwrap();
        let key = "ENVFIG_TEST_LOAD_NO_POPULATE";
        let path = write_env(&dir, &format!("{key}=from-file\n"));

        let parsed = Envfig::builder().file(path).populate(false).load().unwrap();
        assert_eq!(parsed.get_str(key), Some("from-file"));
        assert!(std::env::var(key).is_err());
    }
}

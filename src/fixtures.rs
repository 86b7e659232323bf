#[cfg(test)]
pub mod test {
    use serde_json::Value;

    use crate::reader::TypeReader;
    use crate::registry::ReaderRegistry;

    /// Accepts every value and parses it to the string `"always"`.
    pub struct Always(pub &'static str);

    impl TypeReader for Always {
        fn id(&self) -> &str {
            self.0
        }

        fn validate(&self, _raw: &str, _: &ReaderRegistry) -> bool {
            true
        }

        fn parse(&self, _raw: &str, _: &ReaderRegistry) -> Value {
            Value::String("always".into())
        }
    }

    /// Rejects every value.
    pub struct Never(pub &'static str);

    impl TypeReader for Never {
        fn id(&self) -> &str {
            self.0
        }

        fn validate(&self, _raw: &str, _: &ReaderRegistry) -> bool {
            false
        }

        fn parse(&self, raw: &str, _: &ReaderRegistry) -> Value {
            Value::String(raw.to_string())
        }
    }

    /// `port`: 1..=65535.
    pub struct PortReader;

    impl TypeReader for PortReader {
        fn id(&self) -> &str {
            "port"
        }

        fn validate(&self, raw: &str, _: &ReaderRegistry) -> bool {
            raw.parse::<u16>().is_ok_and(|p| p != 0)
        }

        fn parse(&self, raw: &str, _: &ReaderRegistry) -> Value {
            raw.parse::<u16>().map(Value::from).unwrap_or(Value::Null)
        }
    }

    pub fn pairs(input: &[(&str, &str)]) -> Vec<(String, String)> {
        input
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub const SAMPLE_ENV: &str = r#"# service settings
HOST=0.0.0.0
PORT=8080
DEBUG=yes
TAGS=web, api, internal
GREETING="hello\nworld"
RAW='hello\nworld'
LOG_LEVEL=info
DISABLED=#off
UNUSED=ignored
"#;

    pub const SAMPLE_SCHEMA: &str = r#"
HOST = "string"
PORT = "port"
DEBUG = "boolean"
TAGS = "array"
GREETING = "string"
RAW = "string"

[LOG_LEVEL]
type = "string"
oneOf = ["debug", "info", "warn", "error"]
default = "info"

[WORKERS]
type = "int"
min = 1
max = 64
default = 4
"#;
}

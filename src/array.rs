use serde_json::Value;

use crate::reader::TypeReader;
use crate::registry::ReaderRegistry;

/// Delimiter used by the `array` reader unless the parser is told otherwise.
pub const DEFAULT_DELIMITER: &str = ", ";

/// `array`: splits the raw value on a delimiter into a list of strings.
///
/// Elements are not coerced any further. `"1, 2, 3"` becomes
/// `["1", "2", "3"]`, never `[1, 2, 3]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayTypeReader {
    delimiter: String,
}

impl ArrayTypeReader {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Split `raw` into its elements.
    ///
    /// An empty delimiter splits into individual characters.
    pub fn split<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        if self.delimiter.is_empty() {
            return raw
                .char_indices()
                .map(|(i, c)| &raw[i..i + c.len_utf8()])
                .collect();
        }
        raw.split(self.delimiter.as_str()).collect()
    }
}

impl Default for ArrayTypeReader {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl TypeReader for ArrayTypeReader {
    fn id(&self) -> &str {
        "array"
    }

    fn validate(&self, _raw: &str, _: &ReaderRegistry) -> bool {
        true
    }

    fn parse(&self, raw: &str, _: &ReaderRegistry) -> Value {
        Value::Array(
            self.split(raw)
                .into_iter()
                .map(|s| Value::String(s.to_string()))
                .collect(),
        )
    }
}

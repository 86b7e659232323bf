//! The [`TypeReader`] capability and the built-in primitive readers.
//!
//! A reader owns one type id (`"int"`, `"boolean"`, ...) and knows two things
//! about raw env values: whether a value belongs to its type, and how to turn
//! it into a typed [`Value`]. Readers live in a
//! [`ReaderRegistry`](crate::ReaderRegistry) for the lifetime of the parser.
//!
//! Both methods receive the registry so that composite readers (see
//! [`UnionTypeReader`](crate::UnionTypeReader)) can look up their members at
//! call time. Leaf readers ignore it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

use crate::registry::ReaderRegistry;

/// A pluggable validator and coercer for one type id.
///
/// `parse` is only called after `validate` returned `true` for the same raw
/// value. Implementations may assume that and fall back to a string value
/// otherwise.
///
/// ```
/// use envfig::{ReaderRegistry, TypeReader};
/// use serde_json::Value;
///
/// struct Port;
///
/// impl TypeReader for Port {
///     fn id(&self) -> &str {
///         "port"
///     }
///
///     fn validate(&self, raw: &str, _: &ReaderRegistry) -> bool {
///         raw.parse::<u16>().is_ok_and(|p| p != 0)
///     }
///
///     fn parse(&self, raw: &str, _: &ReaderRegistry) -> Value {
///         raw.parse::<u16>().map(Value::from).unwrap_or(Value::Null)
///     }
/// }
/// ```
pub trait TypeReader: Send + Sync {
    /// The type id this reader is registered under.
    fn id(&self) -> &str;

    /// Whether `raw` is a member of this type.
    fn validate(&self, raw: &str, registry: &ReaderRegistry) -> bool;

    /// Convert `raw` into a typed value.
    fn parse(&self, raw: &str, registry: &ReaderRegistry) -> Value;
}

/// All built-in primitive readers, in registration order.
///
/// `array` is not included: it carries the parser's delimiter and is
/// registered separately, before these.
pub fn builtin_readers() -> Vec<Box<dyn TypeReader>> {
    #[cfg_attr(not(feature = "url"), allow(unused_mut))]
    let mut readers: Vec<Box<dyn TypeReader>> = vec![
        Box::new(StringReader),
        Box::new(IntReader),
        Box::new(NumberReader),
        Box::new(BooleanReader),
        Box::new(JsonReader),
        Box::new(EmailReader),
    ];
    #[cfg(feature = "url")]
    readers.push(Box::new(UrlReader));
    readers
}

/// `string`: accepts everything, returns the raw text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringReader;

impl TypeReader for StringReader {
    fn id(&self) -> &str {
        "string"
    }

    fn validate(&self, _raw: &str, _: &ReaderRegistry) -> bool {
        true
    }

    fn parse(&self, raw: &str, _: &ReaderRegistry) -> Value {
        Value::String(raw.to_string())
    }
}

/// `int`: whole numbers that fit an `i64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntReader;

impl TypeReader for IntReader {
    fn id(&self) -> &str {
        "int"
    }

    fn validate(&self, raw: &str, _: &ReaderRegistry) -> bool {
        raw.trim().parse::<i64>().is_ok()
    }

    fn parse(&self, raw: &str, _: &ReaderRegistry) -> Value {
        match raw.trim().parse::<i64>() {
            Ok(i) => Value::from(i),
            Err(_) => Value::String(raw.to_string()),
        }
    }
}

/// `number`: any finite number. Integral text stays an integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberReader;

impl TypeReader for NumberReader {
    fn id(&self) -> &str {
        "number"
    }

    fn validate(&self, raw: &str, _: &ReaderRegistry) -> bool {
        parse_finite(raw).is_some()
    }

    fn parse(&self, raw: &str, _: &ReaderRegistry) -> Value {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::from(i);
        }
        parse_finite(trimmed)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.to_string()))
    }
}

/// Parse `raw` as an `f64`, rejecting `NaN` and the infinities.
pub(crate) fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

const TRUE_TOKENS: &[&str] = &["true", "1", "yes", "on"];
const FALSE_TOKENS: &[&str] = &["false", "0", "no", "off"];

/// `boolean`: `true/false`, `1/0`, `yes/no`, `on/off`, case-insensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanReader;

impl BooleanReader {
    fn token(raw: &str) -> Option<bool> {
        let raw = raw.trim();
        if TRUE_TOKENS.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
            Some(true)
        } else if FALSE_TOKENS.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
            Some(false)
        } else {
            None
        }
    }
}

impl TypeReader for BooleanReader {
    fn id(&self) -> &str {
        "boolean"
    }

    fn validate(&self, raw: &str, _: &ReaderRegistry) -> bool {
        Self::token(raw).is_some()
    }

    fn parse(&self, raw: &str, _: &ReaderRegistry) -> Value {
        Self::token(raw).map(Value::Bool).unwrap_or(Value::Null)
    }
}

/// `json`: any JSON document, parsed as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReader;

impl TypeReader for JsonReader {
    fn id(&self) -> &str {
        "json"
    }

    fn validate(&self, raw: &str, _: &ReaderRegistry) -> bool {
        serde_json::from_str::<Value>(raw).is_ok()
    }

    fn parse(&self, raw: &str, _: &ReaderRegistry) -> Value {
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    }
}

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// `email`: a shape check (`local@domain.tld`), not RFC 5322.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailReader;

impl TypeReader for EmailReader {
    fn id(&self) -> &str {
        "email"
    }

    fn validate(&self, raw: &str, _: &ReaderRegistry) -> bool {
        EMAIL.is_match(raw)
    }

    fn parse(&self, raw: &str, _: &ReaderRegistry) -> Value {
        Value::String(raw.to_string())
    }
}

/// `url`: absolute URLs accepted by the `url` crate. The value stays a string.
#[cfg(feature = "url")]
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlReader;

#[cfg(feature = "url")]
impl TypeReader for UrlReader {
    fn id(&self) -> &str {
        "url"
    }

    fn validate(&self, raw: &str, _: &ReaderRegistry) -> bool {
        url::Url::parse(raw).is_ok()
    }

    fn parse(&self, raw: &str, _: &ReaderRegistry) -> Value {
        Value::String(raw.to_string())
    }
}

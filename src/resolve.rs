//! Schema evaluation: turn raw `(key, value)` pairs into a typed [`Parsed`].
//!
//! Operates on pre-split pairs with no I/O, so the whole pipeline is testable
//! with synthetic input. Per pair:
//!
//! 1. No schema: keep the raw string.
//! 2. Key not in the schema: drop it.
//! 3. Resolve the field's reader. A missing reader is fatal.
//! 4. Validate. Bare type ids drop invalid values; full rules store
//!    `default` (or `null`) instead and move on.
//! 5. `oneOf`: the raw value must be an allowed option. Fatal otherwise.
//! 6. `min`/`max` for `int`: compared against the raw text read as a number.
//! 7. `min`/`max` for `string`: compared against the raw text's length.
//! 8. Store the parsed value.
//!
//! Bounds are measured on the raw text, not on the reader's output, and only
//! when the rule's type is exactly `int` or `string`. A rule typed
//! `int|string` or `number` carries its bounds unchecked. String length is
//! counted in Unicode scalar values, so a character outside the Basic
//! Multilingual Plane counts as one.

use serde_json::Value;
use tracing::debug;

use crate::error::{EnvfigError, Limit, Measure};
use crate::parsed::Parsed;
use crate::reader::{TypeReader, parse_finite};
use crate::registry::ReaderRegistry;
use crate::schema::{FieldRule, FieldSpec, Schema};

/// Evaluate `pairs` against `schema`. Later pairs overwrite earlier ones with
/// the same key. The first fatal error discards everything.
pub fn resolve(
    pairs: impl IntoIterator<Item = (String, String)>,
    schema: &Schema,
    registry: &ReaderRegistry,
) -> Result<Parsed, EnvfigError> {
    let mut parsed = Parsed::new();

    for (key, raw) in pairs {
        if schema.is_empty() {
            parsed.insert(key, Value::String(raw));
            continue;
        }

        let Some(spec) = schema.get(&key) else {
            debug!(key = %key, "not in schema, skipping");
            continue;
        };

        let type_id = spec.type_id();
        let reader = registry
            .resolve(type_id)
            .ok_or_else(|| EnvfigError::UnknownReader {
                key: key.clone(),
                type_id: type_id.to_string(),
            })?;

        if !reader.validate(&raw, registry) {
            match spec {
                FieldSpec::Type(_) => {
                    debug!(key = %key, type_id, "invalid value, skipping");
                }
                FieldSpec::Rule(rule) => {
                    debug!(key = %key, type_id, "invalid value, using default");
                    parsed.insert(key, rule.default.clone().unwrap_or(Value::Null));
                }
            }
            continue;
        }

        if let FieldSpec::Rule(rule) = spec {
            check_one_of(&key, &raw, rule, reader.as_ref(), registry)?;
            check_bounds(&key, &raw, rule, reader.as_ref(), registry)?;
        }

        let value = reader.parse(&raw, registry);
        parsed.insert(key, value);
    }

    Ok(parsed)
}

/// The raw value must equal one of the options. String options are matched
/// against the raw text; other options (numbers, booleans) against the
/// parsed value.
fn check_one_of(
    key: &str,
    raw: &str,
    rule: &FieldRule,
    reader: &dyn TypeReader,
    registry: &ReaderRegistry,
) -> Result<(), EnvfigError> {
    let Some(options) = &rule.one_of else {
        return Ok(());
    };

    let mut parsed: Option<Value> = None;
    let allowed = options.iter().any(|option| match option {
        Value::String(s) => s == raw,
        other => other == &*parsed.get_or_insert_with(|| reader.parse(raw, registry)),
    });

    if allowed {
        return Ok(());
    }

    let listed: Vec<String> = options
        .iter()
        .map(|o| match o {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    Err(EnvfigError::OneOfViolation {
        key: key.to_string(),
        value: raw.to_string(),
        options: listed.join(", "),
    })
}

fn check_bounds(
    key: &str,
    raw: &str,
    rule: &FieldRule,
    reader: &dyn TypeReader,
    registry: &ReaderRegistry,
) -> Result<(), EnvfigError> {
    if rule.min.is_none() && rule.max.is_none() {
        return Ok(());
    }

    let (measure, amount) = match rule.type_id.as_str() {
        "int" => (Measure::Value, parse_finite(raw).unwrap_or(f64::NAN)),
        "string" => (Measure::Length, raw.chars().count() as f64),
        _ => return Ok(()),
    };

    let violated = [(Limit::Min, rule.min), (Limit::Max, rule.max)]
        .into_iter()
        .find_map(|(limit, bound)| {
            let bound = bound?;
            let out = match limit {
                Limit::Min => amount < bound,
                Limit::Max => amount > bound,
            };
            out.then_some((limit, bound))
        });

    let Some((limit, bound)) = violated else {
        return Ok(());
    };

    let value = match reader.parse(raw, registry) {
        Value::String(s) => s,
        other => other.to_string(),
    };
    Err(EnvfigError::BoundViolation {
        key: key.to_string(),
        value,
        bound,
        limit,
        measure,
    })
}

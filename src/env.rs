//! Copy parsed values into an environment without overwriting.
//!
//! The target is any [`Environment`]: [`ProcessEnv`] for the real process
//! environment, or a plain map so tests never touch process state.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

use serde_json::Value;
use tracing::debug;

use crate::parsed::Parsed;

/// A mutable set of environment variables.
pub trait Environment {
    fn contains(&self, key: &str) -> bool;
    fn set(&mut self, key: &str, value: String);
}

/// The current process's environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn contains(&self, key: &str) -> bool {
        std::env::var_os(key).is_some()
    }

    fn set(&mut self, key: &str, value: String) {
        // SAFETY: populate is documented as a startup-time operation; callers
        // must not read or write the environment from other threads meanwhile.
        unsafe { std::env::set_var(key, value) };
    }
}

impl<S: BuildHasher> Environment for HashMap<String, String, S> {
    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }
}

impl Environment for BTreeMap<String, String> {
    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }
}

/// Which keys a populate call wrote and which it left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateReport {
    /// Keys that were absent and have been set.
    pub written: Vec<String>,
    /// Keys already present in the environment, or whose value was `null`.
    pub skipped: Vec<String>,
}

impl fmt::Display for PopulateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Populated {} variable(s), skipped {}",
            self.written.len(),
            self.skipped.len()
        )
    }
}

/// Write every entry of `parsed` whose key is not yet in `env`.
///
/// `delimiter` joins array values back into a single string.
pub fn populate_env(parsed: &Parsed, env: &mut impl Environment, delimiter: &str) -> PopulateReport {
    let mut report = PopulateReport::default();

    for (key, value) in parsed.iter() {
        if env.contains(key) {
            debug!(key, "already set, not overwriting");
            report.skipped.push(key.to_string());
            continue;
        }
        let Some(rendered) = render_value(value, delimiter) else {
            debug!(key, "null value, not populating");
            report.skipped.push(key.to_string());
            continue;
        };
        env.set(key, rendered);
        report.written.push(key.to_string());
    }

    debug!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "populated environment"
    );
    report
}

/// Render a parsed value as an env var string. `null` has no rendering.
pub fn render_value(value: &Value, delimiter: &str) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            Some(parts.join(delimiter))
        }
        other => Some(other.to_string()),
    }
}

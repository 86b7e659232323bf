use serde_json::Value;
use tracing::trace;

use crate::reader::TypeReader;
use crate::registry::ReaderRegistry;

/// Separator between members of a union type expression.
pub const UNION_SEPARATOR: char = '|';

/// A reader for type expressions like `"int|boolean"`.
///
/// Members are tried left to right; the first one that validates the raw
/// value wins, both for validation and for parsing. Member ids are resolved
/// against the registry on every call rather than at construction, so a union
/// may name readers registered after it was first used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionTypeReader {
    id: String,
    members: Vec<String>,
}

impl UnionTypeReader {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let members = id
            .split(UNION_SEPARATOR)
            .map(|m| m.trim().to_string())
            .collect();
        Self { id, members }
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// First member that resolves and validates `raw`.
    fn matching_member(
        &self,
        raw: &str,
        registry: &ReaderRegistry,
    ) -> Option<std::sync::Arc<dyn TypeReader>> {
        self.members.iter().find_map(|member| {
            let Some(reader) = registry.resolve(member) else {
                trace!(union = %self.id, member = %member, "union member has no reader");
                return None;
            };
            reader.validate(raw, registry).then_some(reader)
        })
    }
}

impl TypeReader for UnionTypeReader {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self, raw: &str, registry: &ReaderRegistry) -> bool {
        self.matching_member(raw, registry).is_some()
    }

    fn parse(&self, raw: &str, registry: &ReaderRegistry) -> Value {
        match self.matching_member(raw, registry) {
            Some(reader) => reader.parse(raw, registry),
            None => Value::String(raw.to_string()),
        }
    }
}

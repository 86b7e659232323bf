//! Type id → reader lookup with memoized union construction.
//!
//! The registry is the only piece of state that outlives a parse call. Plain
//! ids map to whatever was registered last under that id. Ids containing `|`
//! are union expressions: the first lookup builds a
//! [`UnionTypeReader`](crate::UnionTypeReader) and stores it under the exact
//! expression string, and later lookups of the same string return that same
//! instance.
//!
//! The map is a `DashMap`, so memoized inserts are insert-if-absent under a
//! shard lock and the registry can be shared across threads without two
//! callers building divergent union readers for one expression.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::array::ArrayTypeReader;
use crate::reader::{self, TypeReader};
use crate::union::{UNION_SEPARATOR, UnionTypeReader};

#[derive(Default)]
pub struct ReaderRegistry {
    readers: DashMap<String, Arc<dyn TypeReader>>,
}

impl ReaderRegistry {
    /// An empty registry. Most callers want [`with_builtins`](Self::with_builtins).
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the `array` reader (with `delimiter`) followed by
    /// every built-in primitive reader.
    pub fn with_builtins(delimiter: &str) -> Self {
        let registry = Self::new();
        registry.register(ArrayTypeReader::new(delimiter));
        for r in reader::builtin_readers() {
            registry.register_boxed(r);
        }
        registry
    }

    /// Add or replace the reader for `reader.id()`.
    pub fn register<R: TypeReader + 'static>(&self, reader: R) {
        self.register_arc(Arc::new(reader));
    }

    pub fn register_boxed(&self, reader: Box<dyn TypeReader>) {
        self.register_arc(Arc::from(reader));
    }

    pub fn register_arc(&self, reader: Arc<dyn TypeReader>) {
        let id = reader.id().to_string();
        if self.readers.insert(id.clone(), reader).is_some() {
            debug!(id = %id, "replaced registered reader");
        }
    }

    /// Look up the reader for a type id.
    ///
    /// - Empty id: `None`.
    /// - Plain id: the registered reader, if any.
    /// - Union expression: the cached union reader, built and cached on first use.
    pub fn resolve(&self, id: &str) -> Option<Arc<dyn TypeReader>> {
        if id.is_empty() {
            return None;
        }
        if !id.contains(UNION_SEPARATOR) {
            return self.readers.get(id).map(|r| Arc::clone(r.value()));
        }
        let entry = self.readers.entry(id.to_string()).or_insert_with(|| {
            debug!(id = %id, "memoizing union reader");
            Arc::new(UnionTypeReader::new(id))
        });
        Some(Arc::clone(entry.value()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.readers.contains_key(id)
    }

    /// Registered ids, sorted. Includes memoized union expressions.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.readers.iter().map(|r| r.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }
}

impl std::fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

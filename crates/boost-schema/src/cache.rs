//! # Compiled-Schema Cache
//!
//! Memoizes [`CompiledSchema`]s by content identity: the SHA-256 digest of
//! the schema's JSON text. Two entities sharing an identical schema share a
//! compiled validator, and an edited schema file is recompiled on next use
//! because its digest changes.
//!
//! Entries are never mutated after insertion. Readers take a shared lock
//! and clone an `Arc`; a miss compiles outside the lock and inserts under a
//! short write lock. Two threads racing on the same miss both compile; the
//! first insert wins and the second result is dropped.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::compiler::CompiledSchema;
use crate::error::SchemaError;

/// Thread-safe, read-mostly cache of compiled schemas.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: RwLock<HashMap<String, Arc<CompiledSchema>>>,
}

impl SchemaCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the compiled form of `schema`, compiling it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaCompile`] if the schema does not compile.
    /// Failures are not cached.
    pub fn get_or_compile(&self, schema: &Value) -> Result<Arc<CompiledSchema>, SchemaError> {
        let key = content_digest(schema);

        if let Some(hit) = self.entries.read().get(&key) {
            tracing::debug!(digest = %key, "compiled schema cache hit");
            return Ok(Arc::clone(hit));
        }

        tracing::debug!(digest = %key, "compiled schema cache miss");
        let compiled = Arc::new(CompiledSchema::compile(schema)?);

        let mut guard = self.entries.write();
        let entry = guard.entry(key).or_insert(compiled);
        Ok(Arc::clone(entry))
    }

    /// Number of distinct compiled schemas held.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing has been compiled yet.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Lowercase hex SHA-256 of the schema's JSON text.
///
/// `serde_json::Map` keeps keys sorted unless `preserve_order` is enabled,
/// so equal documents serialize identically.
fn content_digest(schema: &Value) -> String {
    let digest = Sha256::digest(schema.to_string().as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn same_schema_compiles_once() {
        let cache = SchemaCache::new();
        let schema = json!({ "type": "object", "required": ["id"] });

        let a = cache.get_or_compile(&schema).unwrap();
        let b = cache.get_or_compile(&schema.clone()).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_schemas_get_separate_entries() {
        let cache = SchemaCache::new();
        cache.get_or_compile(&json!({ "required": ["a"] })).unwrap();
        cache.get_or_compile(&json!({ "required": ["b"] })).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn compile_failures_are_not_cached() {
        let cache = SchemaCache::new();
        assert!(cache.get_or_compile(&json!({ "type": 12 })).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn shared_across_threads() {
        let cache = Arc::new(SchemaCache::new());
        let schema = json!({ "type": "object" });

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let schema = schema.clone();
                std::thread::spawn(move || cache.get_or_compile(&schema).is_ok())
            })
            .collect();

        for h in handles {
            assert!(h.join().unwrap());
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn digest_is_hex_sha256() {
        let d = content_digest(&json!({}));
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

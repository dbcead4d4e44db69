//! # Schema Stores
//!
//! The lookup seam between the engine and wherever schemas live. A store is
//! keyed by entity name (`TraceableUnit`, `SupplyBaseReport`, ...) and hands
//! back plain JSON; compilation and caching are the caller's concern.
//!
//! ## Filesystem layout
//!
//! [`FsSchemaStore`] reads the BOOST schema tree, one directory per entity
//! named in snake_case:
//!
//! ```text
//! <root>/traceable_unit/validation_schema.json
//! <root>/traceable_unit/traceable_unit_dictionary.md
//! <root>/traceable_unit/traceable_unit_example.json
//! ```
//!
//! `validation_schema.json` may wrap the JSON Schema in a top-level
//! `"schema"` key next to business `"rules"`. [`SchemaStore::load_schema`]
//! returns the inner schema and [`SchemaStore::load_rules`] the rules.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::dictionary::{parse_dictionary_markdown, EntityDictionary};
use crate::error::SchemaError;

/// Entity-keyed access to schemas, dictionaries, and examples.
pub trait SchemaStore: Send + Sync {
    /// Load the JSON Schema for an entity.
    fn load_schema(&self, entity: &str) -> Result<Value, SchemaError>;

    /// Load the business rules stored next to the schema. `None` when the
    /// schema document has no rules, or only an empty rules value.
    fn load_rules(&self, entity: &str) -> Result<Option<Value>, SchemaError>;

    /// Load and parse the field dictionary for an entity.
    fn load_dictionary(&self, entity: &str) -> Result<EntityDictionary, SchemaError>;

    /// Load the example record for an entity. An entity without an example
    /// yields an empty object.
    fn load_example(&self, entity: &str) -> Result<Value, SchemaError>;
}

/// Convert a PascalCase entity name to its snake_case directory name.
///
/// Every uppercase letter after the first character starts a new
/// underscore-separated segment: `TraceableUnit` → `traceable_unit`.
pub fn entity_dir_name(entity: &str) -> String {
    let mut out = String::with_capacity(entity.len() + 4);
    for (i, c) in entity.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Filesystem-backed store over the BOOST schema tree.
#[derive(Debug, Clone)]
pub struct FsSchemaStore {
    root: PathBuf,
}

impl FsSchemaStore {
    /// Create a store rooted at `root`. The directory is not checked until
    /// the first lookup.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The schema tree root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entity_dir(&self, entity: &str) -> (PathBuf, String) {
        let dir = entity_dir_name(entity);
        (self.root.join(&dir), dir)
    }

    /// The whole `validation_schema.json` document, wrapper included.
    fn load_document(&self, entity: &str) -> Result<Value, SchemaError> {
        let (dir, _) = self.entity_dir(entity);
        let path = dir.join("validation_schema.json");

        if !path.is_file() {
            return Err(SchemaError::SchemaNotFound {
                entity: entity.to_string(),
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|e| SchemaError::SchemaLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let document: Value =
            serde_json::from_str(&content).map_err(|e| SchemaError::SchemaLoad {
                path: path.display().to_string(),
                reason: format!("invalid JSON: {e}"),
            })?;

        tracing::debug!(entity, path = %path.display(), "loaded entity schema");
        Ok(document)
    }
}

impl SchemaStore for FsSchemaStore {
    fn load_schema(&self, entity: &str) -> Result<Value, SchemaError> {
        self.load_document(entity).map(|document| split_document(document).0)
    }

    fn load_rules(&self, entity: &str) -> Result<Option<Value>, SchemaError> {
        self.load_document(entity).map(|document| split_document(document).1)
    }

    fn load_dictionary(&self, entity: &str) -> Result<EntityDictionary, SchemaError> {
        let (dir, name) = self.entity_dir(entity);
        let path = dir.join(format!("{name}_dictionary.md"));

        if !path.is_file() {
            return Err(SchemaError::DictionaryNotFound {
                entity: entity.to_string(),
                path: path.display().to_string(),
            });
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| SchemaError::DictionaryLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(parse_dictionary_markdown(&content))
    }

    fn load_example(&self, entity: &str) -> Result<Value, SchemaError> {
        let (dir, name) = self.entity_dir(entity);
        let path = dir.join(format!("{name}_example.json"));

        if !path.is_file() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| SchemaError::DocumentLoad {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        })
    }
}

/// Split a `{"schema": ..., "rules": ...}` document into schema and rules.
/// A document without the wrapper is a bare schema with no rules.
fn split_document(document: Value) -> (Value, Option<Value>) {
    match document {
        Value::Object(mut map) if map.contains_key("schema") => {
            let rules = map.remove("rules").filter(has_rules);
            (map.remove("schema").unwrap_or(Value::Null), rules)
        }
        other => (other, None),
    }
}

/// Null, `false`, and empty strings, arrays, or objects carry no rules.
fn has_rules(rules: &Value) -> bool {
    match rules {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// In-memory store, keyed by entity name.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchemaStore {
    schemas: HashMap<String, Value>,
    rules: HashMap<String, Value>,
    dictionaries: HashMap<String, EntityDictionary>,
    examples: HashMap<String, Value>,
}

impl InMemorySchemaStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema for an entity. A `{"schema", "rules"}` wrapper is
    /// split the same way the filesystem store splits it.
    pub fn with_schema(mut self, entity: impl Into<String>, schema: Value) -> Self {
        let entity = entity.into();
        let (schema, rules) = split_document(schema);
        match rules {
            Some(rules) => self.rules.insert(entity.clone(), rules),
            None => self.rules.remove(&entity),
        };
        self.schemas.insert(entity, schema);
        self
    }

    /// Register a dictionary for an entity.
    pub fn with_dictionary(mut self, entity: impl Into<String>, dictionary: EntityDictionary) -> Self {
        self.dictionaries.insert(entity.into(), dictionary);
        self
    }

    /// Register an example record for an entity.
    pub fn with_example(mut self, entity: impl Into<String>, example: Value) -> Self {
        self.examples.insert(entity.into(), example);
        self
    }
}

impl SchemaStore for InMemorySchemaStore {
    fn load_schema(&self, entity: &str) -> Result<Value, SchemaError> {
        self.schemas
            .get(entity)
            .cloned()
            .ok_or_else(|| SchemaError::SchemaNotFound {
                entity: entity.to_string(),
                path: "<memory>".to_string(),
            })
    }

    fn load_rules(&self, entity: &str) -> Result<Option<Value>, SchemaError> {
        self.load_schema(entity)?;
        Ok(self.rules.get(entity).cloned())
    }

    fn load_dictionary(&self, entity: &str) -> Result<EntityDictionary, SchemaError> {
        self.dictionaries
            .get(entity)
            .cloned()
            .ok_or_else(|| SchemaError::DictionaryNotFound {
                entity: entity.to_string(),
                path: "<memory>".to_string(),
            })
    }

    fn load_example(&self, entity: &str) -> Result<Value, SchemaError> {
        Ok(self
            .examples
            .get(entity)
            .cloned()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new())))
    }
}

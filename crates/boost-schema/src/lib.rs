//! # boost-schema — Schema Compilation & Entity Stores
//!
//! Everything the validation engine needs from the outside world, behind
//! small typed seams:
//!
//! ## Compilation (`compiler`)
//!
//! [`CompiledSchema`] wraps a `jsonschema` validator together with the
//! schema document it was built from. Running it yields [`RawViolation`]s:
//! keyword, instance path, schema path, raw message, and a keyword detail
//! resolved from the schema (allowed values, limits, patterns).
//!
//! ## Caching (`cache`)
//!
//! [`SchemaCache`] memoizes compiled schemas by the SHA-256 digest of their
//! JSON text. Entries are immutable `Arc`s, so the cache is safe to share
//! between threads validating different records.
//!
//! ## Stores (`store`, `dictionary`)
//!
//! [`SchemaStore`] is the lookup seam keyed by entity name. [`FsSchemaStore`]
//! reads the BOOST schema tree (`traceable_unit/validation_schema.json`,
//! `traceable_unit/traceable_unit_dictionary.md`, ...), and
//! [`InMemorySchemaStore`] serves tests and embedding callers.
//!
//! ## Crate Policy
//!
//! - No dependency on the engine crate; this is the leaf of the DAG.
//! - No `.unwrap()` outside tests.

pub mod cache;
pub mod compiler;
pub mod dictionary;
pub mod error;
pub mod store;

pub use cache::SchemaCache;
pub use compiler::{CompiledSchema, RawViolation, ViolationDetail};
pub use dictionary::{parse_dictionary_markdown, DictionaryField, EntityDictionary};
pub use error::SchemaError;
pub use store::{entity_dir_name, FsSchemaStore, InMemorySchemaStore, SchemaStore};

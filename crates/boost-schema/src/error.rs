//! # Error Types
//!
//! Failures while locating, reading, or compiling an entity's schema or
//! dictionary. The engine never surfaces these to its callers directly;
//! they are folded into an `other`-kind validation error at the
//! orchestrator boundary.

use thiserror::Error;

/// Errors returned by schema stores and the schema compiler.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// No schema exists for the requested entity.
    #[error("schema not found for entity '{entity}': {path}")]
    SchemaNotFound {
        /// Entity name as requested (e.g. `TraceableUnit`).
        entity: String,
        /// Location that was searched.
        path: String,
    },

    /// The schema file exists but could not be read or parsed.
    #[error("failed to load schema {path}: {reason}")]
    SchemaLoad {
        /// Path or identifier of the schema.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// The schema could not be compiled into a validator.
    #[error("failed to compile schema: {reason}")]
    SchemaCompile {
        /// Reason reported by the compiler.
        reason: String,
    },

    /// No dictionary exists for the requested entity.
    #[error("dictionary not found for entity '{entity}': {path}")]
    DictionaryNotFound {
        /// Entity name as requested.
        entity: String,
        /// Location that was searched.
        path: String,
    },

    /// The dictionary file exists but could not be read.
    #[error("failed to load dictionary {path}: {reason}")]
    DictionaryLoad {
        /// Path of the dictionary file.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// An example or other auxiliary document could not be read or parsed.
    #[error("failed to load document {path}: {reason}")]
    DocumentLoad {
        /// Path of the document.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// I/O error during store access.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

//! # boost-validate — Record Validation & Field Report Engine
//!
//! Validates BOOST records against their entity schemas and turns the
//! outcome into a ranked, human-navigable field report.
//!
//! ## Pipeline
//!
//! ```text
//! record + schema ─► CompiledSchema ─► RawViolation[] ─► classify ─┬─► ValidationResult
//! record + rules ─► required_value_errors ─────────────────────────┘
//! record ─► FieldAnalyzer (ImportanceRanker, ValueFormatter) ─► FieldDescriptor[]
//! ValidationResult + FieldDescriptor[] ─► correlate ─► FieldReport
//! ```
//!
//! [`ValidationEngine`] composes the stages behind two operations,
//! [`ValidationEngine::validate`] and [`ValidationEngine::analyze`], plus
//! [`ValidationEngine::report`] which runs both against a schema store.
//!
//! ## Contract
//!
//! - `validate` always returns a [`ValidationResult`]. A missing or broken
//!   schema becomes a single `other`-kind error, never a panic or `Err`.
//! - `ValidationResult::errors_by_kind` partitions `errors` exactly, with a
//!   bucket for every [`ErrorKind`].
//! - Field order is `(importance desc, display name asc, path asc)` and does
//!   not depend on record key order.
//! - Every rendered value is bounded by [`EngineConfig::max_display_len`].

pub mod analyze;
pub mod classify;
pub mod config;
pub mod correlate;
pub mod engine;
pub mod error;
pub mod field;
pub mod format;
pub mod importance;
pub mod rules;

pub use analyze::FieldAnalyzer;
pub use classify::classify;
pub use config::EngineConfig;
pub use correlate::{correlate, extract_field_from_message, Correlation};
pub use engine::{EntityReport, ValidationEngine};
pub use error::{ErrorKind, ValidationError, ValidationResult};
pub use field::{FieldDescriptor, FieldReport, InferredType};
pub use format::{FormatTables, ValueFormatter};
pub use importance::ImportanceRanker;
pub use rules::required_value_errors;

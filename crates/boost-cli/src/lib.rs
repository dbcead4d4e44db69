//! # boost-cli — Command-Line Interface for BOOST Record Validation
//!
//! Provides the `boost` binary.
//!
//! ## Subcommands
//!
//! - `boost validate <ENTITY> [RECORD]`: schema compliance and classified
//!   errors.
//! - `boost report <ENTITY> [RECORD]`: the importance-ranked field table
//!   with errors attached to the fields they concern.
//!
//! ```bash
//! boost validate TraceableUnit pile.json
//! boost report TraceableUnit --example --json
//! boost --schema-root ./schema validate Organization org.yaml
//! ```
//!
//! ## Exit Codes
//!
//! `0` valid, `1` invalid, `2` operational error (unreadable record,
//! unsupported file type).

pub mod input;
pub mod report;
pub mod validate;

use std::path::Path;

use boost_schema::FsSchemaStore;
use boost_validate::{EngineConfig, ValidationEngine};

/// The record satisfied its schema.
pub const EXIT_VALID: u8 = 0;

/// The record violated its schema.
pub const EXIT_INVALID: u8 = 1;

/// The command could not run.
pub const EXIT_ERROR: u8 = 2;

/// Build an engine over the schema tree at `schema_root`, with bounds taken
/// from the environment.
pub fn engine(schema_root: &Path) -> ValidationEngine<FsSchemaStore> {
    tracing::debug!(schema_root = %schema_root.display(), "opening schema store");
    ValidationEngine::with_config(FsSchemaStore::new(schema_root), EngineConfig::from_env())
}

/// Exit code for a validation outcome.
pub fn exit_code(valid: bool) -> u8 {
    if valid {
        EXIT_VALID
    } else {
        EXIT_INVALID
    }
}

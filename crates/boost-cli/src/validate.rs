//! # Validate Subcommand
//!
//! Checks one record against its entity schema and prints the classified
//! errors.

use std::path::Path;

use anyhow::{Context, Result};
use boost_validate::ValidationResult;
use clap::Args;

use crate::input::{load_input, RecordArgs};

/// Arguments for `boost validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub record: RecordArgs,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 valid, 1 invalid.
pub fn run_validate(args: &ValidateArgs, schema_root: &Path) -> Result<u8> {
    let (code, output) = validate_output(args, schema_root)?;
    println!("{output}");
    Ok(code)
}

/// Run validation and render its output without printing.
pub fn validate_output(args: &ValidateArgs, schema_root: &Path) -> Result<(u8, String)> {
    let engine = crate::engine(schema_root);
    let record = load_input(&args.record, engine.store())?;
    let result = engine.validate(&args.record.entity, &record);

    tracing::info!(
        entity = %args.record.entity,
        valid = result.is_valid(),
        errors = result.errors().len(),
        "validated record"
    );

    let output = if args.record.json {
        serde_json::to_string_pretty(&result).context("failed to serialize validation result")?
    } else {
        render_result(&args.record.entity, &result)
    };
    Ok((crate::exit_code(result.is_valid()), output))
}

/// `TraceableUnit: INVALID (2 errors)` followed by one line per error.
pub fn render_result(entity: &str, result: &ValidationResult) -> String {
    let mut lines = vec![status_line(entity, result)];
    lines.extend(result.errors().iter().map(|e| format!("  {e}")));
    lines.join("\n")
}

pub(crate) fn status_line(entity: &str, result: &ValidationResult) -> String {
    match result.errors().len() {
        0 => format!("{entity}: VALID"),
        1 => format!("{entity}: INVALID (1 error)"),
        n => format!("{entity}: INVALID ({n} errors)"),
    }
}

//! # Report Subcommand
//!
//! Prints the field table for one record: every field in importance order
//! with its type, rendered value, markers and the errors attached to it,
//! then the required fields the record lacks and the errors no field
//! claimed.

use std::path::Path;

use anyhow::{Context, Result};
use boost_validate::{EntityReport, FieldDescriptor};
use clap::Args;

use crate::input::{load_input, RecordArgs};
use crate::validate::status_line;

/// Arguments for `boost report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub record: RecordArgs,

    /// Show only fields that carry errors.
    #[arg(long)]
    pub errors_only: bool,
}

/// Execute the report subcommand.
///
/// Returns exit code: 0 valid, 1 invalid.
pub fn run_report(args: &ReportArgs, schema_root: &Path) -> Result<u8> {
    let (code, output) = report_output(args, schema_root)?;
    println!("{output}");
    Ok(code)
}

/// Build the report and render it without printing.
pub fn report_output(args: &ReportArgs, schema_root: &Path) -> Result<(u8, String)> {
    let engine = crate::engine(schema_root);
    let record = load_input(&args.record, engine.store())?;
    let report = engine.report(&args.record.entity, &record);

    let output = if args.record.json {
        serde_json::to_string_pretty(&report).context("failed to serialize field report")?
    } else {
        render_report(&report, args.errors_only)
    };
    Ok((crate::exit_code(report.result.is_valid()), output))
}

/// Text rendering of an [`EntityReport`].
pub fn render_report(report: &EntityReport, errors_only: bool) -> String {
    let fields = &report.report;
    let name_width = fields
        .fields
        .iter()
        .map(|f| f.display_name.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(5, 40);

    let mut lines = vec![status_line(&report.entity, &report.result), String::new()];
    lines.push(format!(
        "{:>3}  {:<name_width$}  {:<10}  {:<2}  VALUE",
        "IMP", "FIELD", "TYPE", ""
    ));

    for field in fields
        .fields
        .iter()
        .filter(|f| !errors_only || f.has_errors())
    {
        lines.push(field_line(field, name_width));
        lines.extend(
            field
                .attached_errors
                .iter()
                .map(|e| format!("{:>5}{:<name_width$}  ! {e}", "", "")),
        );
    }

    if !fields.missing_required.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Missing required: {}",
            fields.missing_required.join(", ")
        ));
    }
    if !fields.unmatched_errors.is_empty() {
        lines.push(String::new());
        lines.push("Unmatched errors:".to_string());
        lines.extend(fields.unmatched_errors.iter().map(|e| format!("  {e}")));
    }
    if !fields.structural_errors.is_empty() {
        lines.push(String::new());
        lines.push("Structural problems:".to_string());
        lines.extend(fields.structural_errors.iter().map(|e| format!("  {e}")));
    }

    lines.join("\n")
}

/// `*` marks a required field, `!` a field with errors.
fn field_line(field: &FieldDescriptor, name_width: usize) -> String {
    let mut markers = String::new();
    if field.required {
        markers.push('*');
    }
    if field.has_errors() {
        markers.push('!');
    }
    format!(
        "{:>3}  {:<name_width$}  {:<10}  {:<2}  {}",
        field.importance,
        truncate_name(&field.display_name, name_width),
        field.inferred_type.to_string(),
        markers,
        field.display_value
    )
}

fn truncate_name(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let kept: String = name.chars().take(width.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

//! # boost CLI entry point
//!
//! Parses command-line arguments, installs logging and dispatches to the
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use boost_cli::input::resolve_schema_root;
use boost_cli::report::{run_report, ReportArgs};
use boost_cli::validate::{run_validate, ValidateArgs};
use boost_cli::EXIT_ERROR;

/// BOOST record validation.
///
/// Validates BOOST records against their entity schemas and prints
/// importance-ranked field reports with errors attached to the fields they
/// concern.
#[derive(Parser, Debug)]
#[command(name = "boost", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Root of the schema tree. Defaults to $BOOST_SCHEMA_ROOT, then
    /// /app/schema, then ../schema.
    #[arg(long, global = true)]
    schema_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a record against its entity schema.
    Validate(ValidateArgs),

    /// Print the field report for a record.
    Report(ReportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let schema_root = resolve_schema_root(cli.schema_root.as_deref());
    tracing::debug!(schema_root = %schema_root.display(), "resolved schema root");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &schema_root),
        Commands::Report(args) => run_report(&args, &schema_root),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

//! # Record Input & Schema Root Resolution
//!
//! Records are read from `.json`, `.yaml` or `.yml` files, or taken from
//! the entity's example in the schema tree. Parse failures are reported
//! here, before the engine sees anything.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use boost_schema::SchemaStore;
use clap::Args;
use serde_json::Value;

/// Environment variable naming the schema tree root.
pub const SCHEMA_ROOT_ENV: &str = "BOOST_SCHEMA_ROOT";

/// Schema tree location inside the service container.
pub const CONTAINER_SCHEMA_ROOT: &str = "/app/schema";

/// Schema tree location relative to a source checkout.
pub const CHECKOUT_SCHEMA_ROOT: &str = "../schema";

/// Arguments shared by the record-consuming subcommands.
#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// Entity name, e.g. `TraceableUnit`.
    #[arg(value_name = "ENTITY")]
    pub entity: String,

    /// Record file (.json, .yaml or .yml).
    #[arg(value_name = "RECORD", conflicts_with = "example")]
    pub record: Option<PathBuf>,

    /// Use the entity's example record from the schema tree.
    #[arg(long)]
    pub example: bool,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Pick the schema tree root: the explicit flag, then `BOOST_SCHEMA_ROOT`,
/// then `/app/schema` if it exists, then `../schema`.
pub fn resolve_schema_root(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Some(path) = std::env::var_os(SCHEMA_ROOT_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(path);
    }
    let container = Path::new(CONTAINER_SCHEMA_ROOT);
    if container.is_dir() {
        return container.to_path_buf();
    }
    PathBuf::from(CHECKOUT_SCHEMA_ROOT)
}

/// Load the record named by `args`.
pub fn load_input(args: &RecordArgs, store: &impl SchemaStore) -> Result<Value> {
    match (&args.record, args.example) {
        (Some(path), _) => load_record(path),
        (None, true) => store
            .load_example(&args.entity)
            .with_context(|| format!("failed to load example record for {}", args.entity)),
        (None, false) => bail!("no record given: pass a RECORD file or --example"),
    }
}

/// Parse a record file, choosing the format by extension.
pub fn load_record(path: &Path) -> Result<Value> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read record {}", path.display()))?;

    let record: Value = match ext.as_str() {
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON record {}", path.display()))?,
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML record {}", path.display()))?,
        other => bail!(
            "unsupported record format '{other}' for {}: expected .json, .yaml or .yml",
            path.display()
        ),
    };

    tracing::debug!(path = %path.display(), "loaded record");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boost_schema::InMemorySchemaStore;
    use serde_json::json;

    fn args(record: Option<PathBuf>, example: bool) -> RecordArgs {
        RecordArgs {
            entity: "TraceableUnit".to_string(),
            record,
            example,
            json: false,
        }
    }

    #[test]
    fn loads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("pile.json");
        std::fs::write(&json_path, r#"{"@type": "TraceableUnit", "volume": 3}"#).unwrap();
        let yaml_path = dir.path().join("pile.yml");
        std::fs::write(&yaml_path, "\"@type\": TraceableUnit\nvolume: 3\n").unwrap();

        let from_json = load_record(&json_path).unwrap();
        let from_yaml = load_record(&yaml_path).unwrap();
        assert_eq!(from_json, json!({"@type": "TraceableUnit", "volume": 3}));
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn rejects_unknown_extension_and_bad_content() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("pile.txt");
        std::fs::write(&txt, "{}").unwrap();
        let err = load_record(&txt).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported record format"));

        let broken = dir.path().join("pile.json");
        std::fs::write(&broken, "{not json").unwrap();
        let err = load_record(&broken).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse JSON record"));

        let missing = dir.path().join("absent.json");
        assert!(load_record(&missing).is_err());
    }

    #[test]
    fn example_and_missing_input() {
        let store = InMemorySchemaStore::new().with_example("TraceableUnit", json!({"id": "TRU-1"}));
        let record = load_input(&args(None, true), &store).unwrap();
        assert_eq!(record, json!({"id": "TRU-1"}));

        assert!(load_input(&args(None, false), &store).is_err());
    }

    #[test]
    fn explicit_schema_root_wins() {
        let root = resolve_schema_root(Some(Path::new("/srv/boost/schema")));
        assert_eq!(root, PathBuf::from("/srv/boost/schema"));
    }
}

//! # Validation Engine
//!
//! Composes the schema store, the compiled-schema cache, classification,
//! analysis and correlation behind three operations:
//!
//! - [`ValidationEngine::validate`]: schema compliance only.
//! - [`ValidationEngine::analyze`]: field report for a record and an
//!   existing result.
//! - [`ValidationEngine::report`]: both, with the schema's required list and
//!   the entity dictionary loaded from the store.
//!
//! When the schema document carries business `rules`, required fields that
//! are present but `null` or empty are reported as `other` errors after the
//! schema's own violations.
//!
//! Schema and dictionary failures never escape as `Err`. A schema that
//! cannot be loaded or compiled becomes a single `other` error in the
//! result; a missing dictionary only drops the annotations it would add.

use std::sync::Arc;

use boost_schema::{CompiledSchema, EntityDictionary, SchemaCache, SchemaError, SchemaStore};
use serde::Serialize;
use serde_json::Value;

use crate::analyze::{Analysis, FieldAnalyzer};
use crate::classify::classify;
use crate::config::EngineConfig;
use crate::correlate::{correlate, Correlation};
use crate::error::{ValidationError, ValidationResult};
use crate::field::{FieldDescriptor, FieldReport};
use crate::format::FormatTables;
use crate::importance::ImportanceRanker;
use crate::rules::required_value_errors;

/// Validation result and field report for one record of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityReport {
    pub entity: String,
    pub result: ValidationResult,
    pub report: FieldReport,
}

/// Record validation and reporting over a [`SchemaStore`].
///
/// `Send + Sync` whenever the store is; share one engine across threads.
#[derive(Debug)]
pub struct ValidationEngine<S> {
    store: S,
    cache: SchemaCache,
    ranker: ImportanceRanker,
    tables: FormatTables,
    config: EngineConfig,
}

impl<S: SchemaStore> ValidationEngine<S> {
    /// Engine with default bounds.
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            cache: SchemaCache::new(),
            ranker: ImportanceRanker::new(),
            tables: FormatTables::default(),
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of compiled schemas currently cached.
    pub fn cached_schemas(&self) -> usize {
        self.cache.len()
    }

    /// Validate `record` against the schema of `entity`.
    ///
    /// Always returns a result. Tool failures (schema missing, unreadable
    /// or not compilable) are reported as one `other` error at `root`.
    pub fn validate(&self, entity: &str, record: &Value) -> ValidationResult {
        let compiled = self.compiled_schema(entity);
        self.run(entity, record, &compiled)
    }

    /// Build the field report for `record`.
    ///
    /// `required` is the schema's top-level required list and `dictionary`
    /// the entity dictionary; either may be absent, which only removes the
    /// annotations they supply.
    pub fn analyze(
        &self,
        record: &Value,
        result: &ValidationResult,
        required: Option<&[String]>,
        dictionary: Option<&EntityDictionary>,
    ) -> FieldReport {
        let analyzer = FieldAnalyzer::new(&self.ranker, &self.tables, self.config);
        let Analysis {
            mut fields,
            structural_errors,
        } = analyzer.analyze(record);

        annotate(&mut fields, required, dictionary);
        let missing_required = missing_required(record, required, dictionary);
        let Correlation { fields, unmatched } = correlate(result.errors(), fields);

        FieldReport {
            fields,
            missing_required,
            unmatched_errors: unmatched,
            structural_errors,
        }
    }

    /// Validate and analyze `record` as an instance of `entity`.
    pub fn report(&self, entity: &str, record: &Value) -> EntityReport {
        let compiled = self.compiled_schema(entity);
        let result = self.run(entity, record, &compiled);
        let required = compiled.as_ref().ok().map(|c| c.required_fields());

        let dictionary = match self.store.load_dictionary(entity) {
            Ok(dictionary) => Some(dictionary),
            Err(e) => {
                tracing::warn!(entity, error = %e, "dictionary unavailable; reporting without it");
                None
            }
        };

        let report = self.analyze(record, &result, required.as_deref(), dictionary.as_ref());
        tracing::info!(
            entity,
            valid = result.is_valid(),
            errors = result.errors().len(),
            fields = report.len(),
            "record report built"
        );

        EntityReport {
            entity: entity.to_string(),
            result,
            report,
        }
    }

    fn compiled_schema(&self, entity: &str) -> Result<Arc<CompiledSchema>, SchemaError> {
        let schema = self.store.load_schema(entity)?;
        self.cache.get_or_compile(&schema)
    }

    fn run(
        &self,
        entity: &str,
        record: &Value,
        compiled: &Result<Arc<CompiledSchema>, SchemaError>,
    ) -> ValidationResult {
        match compiled {
            Ok(schema) => {
                let violations = schema.validate(record);
                tracing::debug!(entity, violations = violations.len(), "schema validation complete");
                let mut errors = classify(violations);
                errors.extend(self.business_rule_errors(entity, record, schema));
                ValidationResult::from_errors(errors)
            }
            Err(e) => {
                tracing::warn!(entity, error = %e, "schema unavailable; reporting as validation error");
                ValidationResult::tool_failure(format!(
                    "Schema for entity '{entity}' is unavailable: {e}"
                ))
            }
        }
    }

    fn business_rule_errors(
        &self,
        entity: &str,
        record: &Value,
        schema: &CompiledSchema,
    ) -> Vec<ValidationError> {
        match self.store.load_rules(entity) {
            Ok(Some(_)) => {
                let errors = required_value_errors(record, &schema.required_fields());
                tracing::debug!(entity, findings = errors.len(), "business rules checked");
                errors
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(entity, error = %e, "business rules unavailable; skipping");
                Vec::new()
            }
        }
    }
}

/// Mark required top-level fields and attach dictionary descriptions.
fn annotate(
    fields: &mut [FieldDescriptor],
    required: Option<&[String]>,
    dictionary: Option<&EntityDictionary>,
) {
    for field in fields.iter_mut().filter(|f| !f.is_nested()) {
        let in_schema = required.is_some_and(|r| r.iter().any(|name| *name == field.name));
        let in_dictionary = dictionary.is_some_and(|d| d.is_required(&field.name));
        field.required = in_schema || in_dictionary;
        field.description = dictionary
            .and_then(|d| d.field(&field.name))
            .map(|f| f.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);
    }
}

/// Required top-level names absent from the record: schema order first,
/// then dictionary-only names in name order.
fn missing_required(
    record: &Value,
    required: Option<&[String]>,
    dictionary: Option<&EntityDictionary>,
) -> Vec<String> {
    let present = |name: &str| record.as_object().is_some_and(|m| m.contains_key(name));

    let mut missing: Vec<String> = Vec::new();
    let schema_names = required.unwrap_or_default().iter().map(String::as_str);
    let dictionary_names = dictionary
        .map(EntityDictionary::required_fields)
        .unwrap_or_default();

    for name in schema_names.chain(dictionary_names) {
        if !present(name) && !missing.iter().any(|m| m == name) {
            missing.push(name.to_string());
        }
    }
    missing
}

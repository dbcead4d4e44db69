//! # Schema Compilation
//!
//! Compiles a JSON Schema document into an executable validator and turns
//! each violation it reports into a [`RawViolation`].
//!
//! A raw violation is deliberately close to what the validator knows and
//! nothing more: the keyword that failed (the last segment of the schema
//! path), where it failed in the instance and in the schema, the validator's
//! own message, and one keyword detail. Classification into the stable error
//! taxonomy happens downstream in the engine.
//!
//! Format assertions (`"format": "date-time"`, `"email"`, ...) are enabled;
//! draft 2019-09 and later treat `format` as an annotation unless asked.

use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// Extra information about a violation, resolved at compile-run time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum ViolationDetail {
    /// A `required` violation: the property that is absent.
    MissingProperty(String),
    /// An `additionalProperties` violation: every unexpected key at that location.
    UnexpectedProperties(Vec<String>),
    /// The schema value of the failing keyword, e.g. the enum list for
    /// `enum`, the bound for `maxLength`, the type name(s) for `type`.
    KeywordValue(Value),
    /// Nothing could be resolved (e.g. the keyword sits behind a `$ref`).
    None,
}

/// A single schema violation before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawViolation {
    /// The failing schema keyword (`required`, `type`, `enum`, ...).
    pub keyword: String,
    /// JSON Pointer to the violating location in the record (`""` for the root).
    pub instance_path: String,
    /// JSON Pointer to the failing keyword in the schema.
    pub schema_path: String,
    /// The validator's own description of the violation.
    pub message: String,
    /// The record value at `instance_path`, when it exists.
    pub instance: Option<Value>,
    /// Keyword-specific detail.
    pub detail: ViolationDetail,
}

impl RawViolation {
    /// Build a violation with no instance value and no detail.
    pub fn new(
        keyword: impl Into<String>,
        instance_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            instance_path: instance_path.into(),
            schema_path: String::new(),
            message: message.into(),
            instance: None,
            detail: ViolationDetail::None,
        }
    }

    /// Attach a keyword detail.
    pub fn with_detail(mut self, detail: ViolationDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Attach the offending instance value.
    pub fn with_instance(mut self, instance: Value) -> Self {
        self.instance = Some(instance);
        self
    }
}

/// A schema compiled into an executable validator.
///
/// Holds the source document alongside the validator so that keyword
/// details can be resolved from the schema path of each violation.
pub struct CompiledSchema {
    schema: Value,
    validator: Validator,
}

impl std::fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("title", &self.schema.get("title"))
            .field("required", &self.required_fields())
            .finish()
    }
}

impl CompiledSchema {
    /// Compile a schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaCompile`] if the document is not a valid
    /// JSON Schema.
    pub fn compile(schema: &Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(schema)
            .map_err(|e| SchemaError::SchemaCompile {
                reason: e.to_string(),
            })?;

        Ok(Self {
            schema: schema.clone(),
            validator,
        })
    }

    /// The schema document this validator was compiled from.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Top-level `required` property names, in schema order.
    pub fn required_fields(&self) -> Vec<String> {
        self.schema
            .get("required")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns true if the record satisfies every constraint.
    pub fn is_valid(&self, record: &Value) -> bool {
        self.validator.is_valid(record)
    }

    /// Run the validator and collect every violation.
    pub fn validate(&self, record: &Value) -> Vec<RawViolation> {
        self.validator
            .iter_errors(record)
            .map(|err| {
                let instance_path = err.instance_path.to_string();
                let schema_path = err.schema_path.to_string();
                let detail = match &err.kind {
                    ValidationErrorKind::Required { property } => {
                        ViolationDetail::MissingProperty(match property {
                            Value::String(name) => name.clone(),
                            other => other.to_string(),
                        })
                    }
                    ValidationErrorKind::AdditionalProperties { unexpected } => {
                        ViolationDetail::UnexpectedProperties(unexpected.clone())
                    }
                    // A closed object with no declared properties fails as a
                    // false schema at the owner, without naming the keys.
                    _ if keyword_of(&schema_path) == "additionalProperties" => self
                        .undeclared_keys(&schema_path, record.pointer(&instance_path))
                        .map(ViolationDetail::UnexpectedProperties)
                        .unwrap_or_else(|| self.keyword_value(&schema_path)),
                    _ => self.keyword_value(&schema_path),
                };

                RawViolation {
                    keyword: keyword_of(&schema_path).to_string(),
                    instance: record.pointer(&instance_path).cloned(),
                    message: err.to_string(),
                    instance_path,
                    schema_path,
                    detail,
                }
            })
            .collect()
    }

    fn keyword_value(&self, schema_path: &str) -> ViolationDetail {
        self.schema
            .pointer(schema_path)
            .cloned()
            .map(ViolationDetail::KeywordValue)
            .unwrap_or(ViolationDetail::None)
    }

    /// Keys of `instance` matched by neither `properties` nor
    /// `patternProperties` of the subschema owning `schema_path`.
    ///
    /// `None` when the instance is not an object or no key is undeclared.
    fn undeclared_keys(&self, schema_path: &str, instance: Option<&Value>) -> Option<Vec<String>> {
        let object = instance?.as_object()?;
        let owner = schema_path
            .strip_suffix("/additionalProperties")
            .and_then(|parent| self.schema.pointer(parent));

        let declared = owner
            .and_then(|o| o.get("properties"))
            .and_then(Value::as_object);
        let patterns: Vec<Regex> = owner
            .and_then(|o| o.get("patternProperties"))
            .and_then(Value::as_object)
            .map(|p| p.keys().filter_map(|k| Regex::new(k).ok()).collect())
            .unwrap_or_default();

        let names: Vec<String> = object
            .keys()
            .filter(|key| !declared.is_some_and(|d| d.contains_key(key.as_str())))
            .filter(|key| !patterns.iter().any(|re| re.is_match(key.as_str())))
            .cloned()
            .collect();
        (!names.is_empty()).then_some(names)
    }
}

/// The keyword a schema path points at: its last segment.
fn keyword_of(schema_path: &str) -> &str {
    schema_path.rsplit('/').next().unwrap_or_default()
}

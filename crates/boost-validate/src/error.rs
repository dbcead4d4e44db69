//! # Validation Error Taxonomy
//!
//! Every schema violation lands in exactly one of eight [`ErrorKind`]s.
//! The set is closed: adding a kind forces every `match` in the engine and
//! in consumers to handle it.
//!
//! A [`ValidationResult`] is built only through [`ValidationResult::from_errors`],
//! which derives `valid` and the per-kind buckets from the error list so the
//! three can never disagree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::correlate::extract_field_from_message;

/// Field path used for errors that concern the record as a whole.
pub const ROOT_PATH: &str = "root";

/// Classification of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// A required property is absent.
    Required,
    /// A value has the wrong JSON type.
    Type,
    /// A value is not one of the allowed values.
    Enum,
    /// A string does not match its pattern.
    Pattern,
    /// A string is not a valid instance of its format.
    Format,
    /// A length or numeric bound is violated.
    Constraint,
    /// The record carries properties the schema does not declare.
    AdditionalProperty,
    /// Anything else, including tool and structural failures.
    Other,
}

impl ErrorKind {
    /// All kinds in canonical order.
    pub fn all() -> &'static [ErrorKind] {
        &[
            Self::Required,
            Self::Type,
            Self::Enum,
            Self::Pattern,
            Self::Format,
            Self::Constraint,
            Self::AdditionalProperty,
            Self::Other,
        ]
    }

    /// Map a JSON Schema keyword to its kind.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "required" => Self::Required,
            "additionalProperties" => Self::AdditionalProperty,
            "type" => Self::Type,
            "enum" => Self::Enum,
            "pattern" => Self::Pattern,
            "format" => Self::Format,
            "minLength" | "maxLength" | "minimum" | "maximum" => Self::Constraint,
            _ => Self::Other,
        }
    }

    /// The serialized identifier of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Type => "type",
            Self::Enum => "enum",
            Self::Pattern => "pattern",
            Self::Format => "format",
            Self::Constraint => "constraint",
            Self::AdditionalProperty => "additionalProperty",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Classification.
    pub kind: ErrorKind,
    /// Dot-joined path of the offending field, or `root`.
    pub field_path: String,
    /// Human-readable message.
    pub message: String,
    /// Expected type or format name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// The offending value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<Value>,
    /// Allowed values, for `enum`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,
    /// Required pattern, for `pattern`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// The bound keyword (`minLength`, `maximum`, ...), for `constraint`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    /// The bound's value, for `constraint`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Value>,
}

impl ValidationError {
    /// Create an error with no detail fields.
    pub fn new(kind: ErrorKind, field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field_path: field_path.into(),
            message: message.into(),
            expected: None,
            actual_value: None,
            allowed_values: None,
            pattern: None,
            constraint: None,
            limit: None,
        }
    }

    /// Create an `other`-kind error.
    pub fn other(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Other, field_path, message)
    }

    /// Wrap a legacy string-only error message.
    ///
    /// The field path is recovered from the message text when one of the
    /// known phrasings matches, otherwise it is `root`.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let field_path =
            extract_field_from_message(&message).unwrap_or_else(|| ROOT_PATH.to_string());
        Self::other(field_path, message)
    }

    /// Returns true if this error is not tied to a specific field.
    pub fn is_root(&self) -> bool {
        self.field_path.is_empty() || self.field_path == ROOT_PATH
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Outcome of validating one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<ValidationError>,
    errors_by_kind: BTreeMap<ErrorKind, Vec<ValidationError>>,
}

impl ValidationResult {
    /// Build a result from classified errors.
    ///
    /// `valid` is true exactly when `errors` is empty; every kind gets a
    /// bucket, and each error is placed in the bucket of its kind.
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        let mut errors_by_kind: BTreeMap<ErrorKind, Vec<ValidationError>> = ErrorKind::all()
            .iter()
            .map(|kind| (*kind, Vec::new()))
            .collect();

        for error in &errors {
            errors_by_kind
                .entry(error.kind)
                .or_default()
                .push(error.clone());
        }

        Self {
            valid: errors.is_empty(),
            errors,
            errors_by_kind,
        }
    }

    /// A result with no errors.
    pub fn success() -> Self {
        Self::from_errors(Vec::new())
    }

    /// A result carrying a single `other` error at the root, used when the
    /// validation tooling itself failed.
    pub fn tool_failure(message: impl Into<String>) -> Self {
        Self::from_errors(vec![ValidationError::other(ROOT_PATH, message)])
    }

    /// Whether the record satisfied every constraint.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// All errors, in classification order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Errors grouped by kind. Every kind is present.
    pub fn errors_by_kind(&self) -> &BTreeMap<ErrorKind, Vec<ValidationError>> {
        &self.errors_by_kind
    }

    /// Errors of one kind.
    pub fn errors_of(&self, kind: ErrorKind) -> &[ValidationError] {
        self.errors_by_kind
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

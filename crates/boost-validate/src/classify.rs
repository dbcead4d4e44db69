//! # Error Classification
//!
//! Maps raw schema violations onto the [`ErrorKind`] taxonomy with stable,
//! readable messages.
//!
//! ## Field paths
//!
//! The violation's instance pointer loses its leading `/` and the remaining
//! separators become `.`: `/owner/name` → `owner.name`, `""` → `root`.
//! `required` and `additionalProperties` are reported against the object
//! that owns the property, so their paths are qualified with the property
//! name instead: a missing `id` at the root is `id`, a missing `name`
//! under `owner` is `owner.name`.
//!
//! ## Consolidation
//!
//! All `additionalProperties` violations of one run collapse into a single
//! error listing every offending name. It takes the position of the first
//! such violation, so error order stays stable.

use boost_schema::{RawViolation, ViolationDetail};
use serde_json::Value;

use crate::correlate::extract_field_from_message;
use crate::error::{ErrorKind, ValidationError, ROOT_PATH};
use crate::field::join_path;

/// Classify raw violations. Never drops a violation; the output has one
/// error per input except that additional-property violations merge.
pub fn classify(violations: Vec<RawViolation>) -> Vec<ValidationError> {
    let mut errors = Vec::with_capacity(violations.len());
    let mut unexpected: Vec<String> = Vec::new();
    let mut consolidated_at: Option<usize> = None;

    for violation in violations {
        let kind = ErrorKind::from_keyword(&violation.keyword);

        if kind == ErrorKind::AdditionalProperty {
            let owner = field_path(&violation.instance_path);
            match violation.detail {
                ViolationDetail::UnexpectedProperties(names) if !names.is_empty() => {
                    for name in names {
                        let qualified = qualify(&owner, &name);
                        if !unexpected.contains(&qualified) {
                            unexpected.push(qualified);
                        }
                    }
                }
                _ => {
                    if !unexpected.contains(&owner) {
                        unexpected.push(owner);
                    }
                }
            }
            consolidated_at.get_or_insert(errors.len());
            continue;
        }

        errors.push(classify_one(kind, violation));
    }

    if let Some(at) = consolidated_at {
        errors.insert(at, consolidate(unexpected));
    }

    errors
}

/// Dot-joined field path for a JSON Pointer.
pub fn field_path(instance_path: &str) -> String {
    let stripped = instance_path.strip_prefix('/').unwrap_or(instance_path);
    if stripped.is_empty() {
        return ROOT_PATH.to_string();
    }
    stripped
        .split('/')
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .fold(None, |path: Option<String>, key| {
            Some(join_path(path.as_deref(), &key))
        })
        .unwrap_or_else(|| ROOT_PATH.to_string())
}

fn qualify(owner: &str, name: &str) -> String {
    let parent = (owner != ROOT_PATH).then_some(owner);
    join_path(parent, name)
}

fn consolidate(names: Vec<String>) -> ValidationError {
    let noun = if names.len() == 1 { "field" } else { "fields" };
    let listed = names.join(", ");
    let message = format!(
        "Found {} unexpected {noun} not allowed by the schema: {listed}",
        names.len()
    );
    ValidationError::new(ErrorKind::AdditionalProperty, listed, message)
}

fn classify_one(kind: ErrorKind, violation: RawViolation) -> ValidationError {
    let path = field_path(&violation.instance_path);
    let keyword_value = match &violation.detail {
        ViolationDetail::KeywordValue(v) => Some(v),
        _ => None,
    };

    let mut error = match kind {
        ErrorKind::Required => {
            let name = match &violation.detail {
                ViolationDetail::MissingProperty(name) => name.clone(),
                _ => extract_field_from_message(&violation.message)
                    .unwrap_or_else(|| "unknown".to_string()),
            };
            let message = if path == ROOT_PATH {
                format!("Missing required field: '{name}'")
            } else {
                format!("Missing required field: '{name}' in '{path}'")
            };
            return ValidationError::new(kind, qualify(&path, &name), message);
        }
        ErrorKind::Type => match keyword_value {
            Some(expected) => {
                let expected = type_names(expected);
                let mut e = ValidationError::new(
                    kind,
                    &path,
                    format!("Field '{path}': expected type {expected}"),
                );
                e.expected = Some(expected);
                e
            }
            None => fallback(kind, &path, &violation.message),
        },
        ErrorKind::Enum => match keyword_value.and_then(Value::as_array) {
            Some(allowed) => {
                let mut e = ValidationError::new(
                    kind,
                    &path,
                    format!("Field '{path}': value must be one of: {}", value_list(allowed)),
                );
                e.allowed_values = Some(allowed.clone());
                e
            }
            None => fallback(kind, &path, &violation.message),
        },
        ErrorKind::Pattern => match keyword_value.and_then(Value::as_str) {
            Some(pattern) => {
                let mut e = ValidationError::new(
                    kind,
                    &path,
                    format!("Field '{path}': value does not match required pattern '{pattern}'"),
                );
                e.pattern = Some(pattern.to_string());
                e
            }
            None => fallback(kind, &path, &violation.message),
        },
        ErrorKind::Format => match keyword_value.and_then(Value::as_str) {
            Some(format) => {
                let mut e = ValidationError::new(
                    kind,
                    &path,
                    format!("Field '{path}': must be a valid {format}"),
                );
                e.expected = Some(format.to_string());
                e
            }
            None => fallback(kind, &path, &violation.message),
        },
        ErrorKind::Constraint => match keyword_value {
            Some(limit) => {
                let bound = match violation.keyword.as_str() {
                    "minLength" => format!("must be at least {limit} characters long"),
                    "maxLength" => format!("must be at most {limit} characters long"),
                    "minimum" => format!("must be greater than or equal to {limit}"),
                    _ => format!("must be less than or equal to {limit}"),
                };
                let mut e = ValidationError::new(kind, &path, format!("Field '{path}': {bound}"));
                e.constraint = Some(violation.keyword.clone());
                e.limit = Some(limit.clone());
                e
            }
            None => fallback(kind, &path, &violation.message),
        },
        ErrorKind::AdditionalProperty | ErrorKind::Other => {
            ValidationError::new(ErrorKind::Other, &path, violation.message.clone())
        }
    };

    error.actual_value = violation.instance;
    error
}

/// Message for a classified violation whose keyword value is unavailable.
fn fallback(kind: ErrorKind, path: &str, raw: &str) -> ValidationError {
    ValidationError::new(kind, path, format!("Field '{path}': {raw}"))
}

/// `"string"` → `string`; `["string", "null"]` → `string or null`.
fn type_names(expected: &Value) -> String {
    match expected {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(" or "),
        other => other.to_string(),
    }
}

fn value_list(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn required(owner: &str, name: &str) -> RawViolation {
        RawViolation::new("required", owner, format!("\"{name}\" is a required property"))
            .with_detail(ViolationDetail::MissingProperty(name.to_string()))
    }

    fn extra(owner: &str, names: &[&str]) -> RawViolation {
        RawViolation::new("additionalProperties", owner, "Additional properties are not allowed")
            .with_detail(ViolationDetail::UnexpectedProperties(
                names.iter().map(|n| n.to_string()).collect(),
            ))
    }

    #[test]
    fn field_path_derivation() {
        assert_eq!(field_path(""), "root");
        assert_eq!(field_path("/"), "root");
        assert_eq!(field_path("/a"), "a");
        assert_eq!(field_path("/a/b/0"), "a.b.0");
        assert_eq!(field_path("/links/a~1b~0c"), "links.a/b~c");
        assert_eq!(field_path("/a.b/c"), r"a\.b.c");
    }

    #[test]
    fn dotted_names_are_escaped_when_qualified() {
        let errors = classify(vec![required("/meta", "x.y"), extra("", &["a.b"])]);
        assert_eq!(errors[0].field_path, r"meta.x\.y");
        assert_eq!(errors[1].field_path, r"a\.b");
    }

    #[test]
    fn required_at_root() {
        let errors = classify(vec![required("", "harvesterId")]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Required);
        assert_eq!(errors[0].field_path, "harvesterId");
        assert_eq!(errors[0].message, "Missing required field: 'harvesterId'");
    }

    #[test]
    fn required_nested_is_qualified() {
        let errors = classify(vec![required("/operator", "name")]);
        assert_eq!(errors[0].field_path, "operator.name");
        assert_eq!(errors[0].message, "Missing required field: 'name' in 'operator'");
    }

    #[test]
    fn type_lists_alternatives() {
        let v = RawViolation::new("type", "/totalVolumeM3", "\"x\" is not of type \"number\"")
            .with_detail(ViolationDetail::KeywordValue(json!(["number", "null"])))
            .with_instance(json!("x"));
        let errors = classify(vec![v]);
        assert_eq!(errors[0].kind, ErrorKind::Type);
        assert_eq!(
            errors[0].message,
            "Field 'totalVolumeM3': expected type number or null"
        );
        assert_eq!(errors[0].expected.as_deref(), Some("number or null"));
        assert_eq!(errors[0].actual_value, Some(json!("x")));
    }

    #[test]
    fn enum_lists_allowed_values() {
        let v = RawViolation::new("enum", "/unitType", "not one of")
            .with_detail(ViolationDetail::KeywordValue(json!(["pile", "individual_log"])));
        let errors = classify(vec![v]);
        assert_eq!(
            errors[0].message,
            "Field 'unitType': value must be one of: pile, individual_log"
        );
        assert_eq!(
            errors[0].allowed_values,
            Some(vec![json!("pile"), json!("individual_log")])
        );
    }

    #[test]
    fn pattern_and_format() {
        let errors = classify(vec![
            RawViolation::new("pattern", "/traceableUnitId", "no match")
                .with_detail(ViolationDetail::KeywordValue(json!("^TRU-"))),
            RawViolation::new("format", "/createdTimestamp", "bad date")
                .with_detail(ViolationDetail::KeywordValue(json!("date-time"))),
        ]);
        assert_eq!(
            errors[0].message,
            "Field 'traceableUnitId': value does not match required pattern '^TRU-'"
        );
        assert_eq!(errors[0].pattern.as_deref(), Some("^TRU-"));
        assert_eq!(
            errors[1].message,
            "Field 'createdTimestamp': must be a valid date-time"
        );
    }

    #[test]
    fn constraints_carry_limit() {
        let errors = classify(vec![
            RawViolation::new("minLength", "/name", "too short")
                .with_detail(ViolationDetail::KeywordValue(json!(3))),
            RawViolation::new("maximum", "/identificationConfidence", "too big")
                .with_detail(ViolationDetail::KeywordValue(json!(1))),
        ]);
        assert!(errors.iter().all(|e| e.kind == ErrorKind::Constraint));
        assert_eq!(errors[0].message, "Field 'name': must be at least 3 characters long");
        assert_eq!(errors[0].constraint.as_deref(), Some("minLength"));
        assert_eq!(errors[0].limit, Some(json!(3)));
        assert_eq!(
            errors[1].message,
            "Field 'identificationConfidence': must be less than or equal to 1"
        );
    }

    #[test]
    fn unknown_keyword_keeps_raw_message() {
        let errors = classify(vec![RawViolation::new(
            "minItems",
            "/processHistory",
            "[] has less than 1 item",
        )]);
        assert_eq!(errors[0].kind, ErrorKind::Other);
        assert_eq!(errors[0].field_path, "processHistory");
        assert_eq!(errors[0].message, "[] has less than 1 item");
    }

    #[test]
    fn missing_keyword_value_falls_back_to_raw_message() {
        let errors = classify(vec![RawViolation::new("type", "/a", "1 is not of type \"string\"")]);
        assert_eq!(errors[0].kind, ErrorKind::Type);
        assert_eq!(errors[0].message, "Field 'a': 1 is not of type \"string\"");
    }

    #[test]
    fn additional_properties_consolidate_into_one_error() {
        let errors = classify(vec![
            required("", "id"),
            extra("", &["colour", "weight"]),
            extra("/operator", &["nickname"]),
            RawViolation::new("type", "/a", "bad")
                .with_detail(ViolationDetail::KeywordValue(json!("string"))),
        ]);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].kind, ErrorKind::Required);
        assert_eq!(errors[1].kind, ErrorKind::AdditionalProperty);
        assert_eq!(errors[1].field_path, "colour, weight, operator.nickname");
        assert_eq!(
            errors[1].message,
            "Found 3 unexpected fields not allowed by the schema: colour, weight, operator.nickname"
        );
        assert_eq!(errors[2].kind, ErrorKind::Type);
    }

    #[test]
    fn single_unexpected_field_message() {
        let errors = classify(vec![extra("", &["extra"])]);
        assert_eq!(
            errors[0].message,
            "Found 1 unexpected field not allowed by the schema: extra"
        );
    }
}

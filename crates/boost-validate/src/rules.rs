//! # Business Rules
//!
//! Checks that run only for entities whose schema document carries `rules`.
//!
//! Every schema-required field that is present must hold a value: `null`
//! and `""` are reported as `Required field '<name>' is missing or empty`.
//! Absent fields are left to the schema's own `required` check.

use serde_json::Value;

use crate::error::ValidationError;
use crate::field::join_path;

/// Required top-level fields present in `record` with a blank value, in
/// `required` order.
pub fn required_value_errors(record: &Value, required: &[String]) -> Vec<ValidationError> {
    let Some(map) = record.as_object() else {
        return Vec::new();
    };

    required
        .iter()
        .filter(|name| map.get(name.as_str()).is_some_and(is_blank))
        .map(|name| {
            let mut error = ValidationError::from_message(format!(
                "Required field '{name}' is missing or empty"
            ));
            error.field_path = join_path(None, name);
            error
        })
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

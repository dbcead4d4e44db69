//! # Field Descriptors & Reports
//!
//! A [`FieldDescriptor`] is one row of the field table: a key of the record
//! (at any object depth), its value rendered for display, its inferred type,
//! its importance, and the errors that concern it. A [`FieldReport`] is the
//! ordered table plus the findings that do not belong to any single row.
//!
//! Descriptors are created with an empty error list and receive their
//! errors exactly once, during correlation.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::ValidationError;

/// ISO-8601 date-time prefix: `YYYY-MM-DDTHH:MM:SS`.
static ISO_DATETIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("static regex"));

/// Uppercase-prefixed identifier such as `TRU-PILE-001` or `HARV-7`.
static ID_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9]*-[A-Za-z0-9-]+$").expect("static regex"));

/// Separator between humanized path segments in display names.
pub const DISPLAY_SEPARATOR: &str = " › ";

/// Separator between keys in a field path.
pub const PATH_SEPARATOR: char = '.';

const PATH_ESCAPE: char = '\\';

pub(crate) fn is_iso_datetime(s: &str) -> bool {
    ISO_DATETIME.is_match(s)
}

pub(crate) fn is_id_token(s: &str) -> bool {
    ID_TOKEN.is_match(s)
}

/// Shape of a field's value, with two string refinements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InferredType {
    /// JSON `null`.
    Null,
    /// An array, with its length.
    Array(usize),
    /// A nested object.
    Object,
    /// A string starting with an ISO-8601 date-time.
    DateTime,
    /// A string shaped like an uppercase-prefixed identifier.
    Id,
    /// Any other string.
    String,
    /// A number.
    Number,
    /// A boolean.
    Boolean,
}

impl InferredType {
    /// Infer the type of a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Array(items) => Self::Array(items.len()),
            Value::Object(_) => Self::Object,
            Value::String(s) if is_iso_datetime(s) => Self::DateTime,
            Value::String(s) if is_id_token(s) => Self::Id,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
        }
    }
}

impl std::fmt::Display for InferredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Array(len) => write!(f, "array[{len}]"),
            Self::Object => f.write_str("object"),
            Self::DateTime => f.write_str("datetime"),
            Self::Id => f.write_str("id"),
            Self::String => f.write_str("string"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
        }
    }
}

impl Serialize for InferredType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the field report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// The key itself.
    pub name: String,
    /// Dot-joined keys from the record root; unique within one report.
    pub path: String,
    /// Humanized path for display.
    pub display_name: String,
    /// The value as found in the record.
    pub raw_value: Value,
    /// Shape of the value.
    pub inferred_type: InferredType,
    /// Bounded, human-readable rendering of the value.
    pub display_value: String,
    /// Presentation priority, 1 (lowest) to 10.
    pub importance: u8,
    /// Whether the schema or dictionary marks this field as required.
    pub required: bool,
    /// Dictionary description, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Errors correlated to this field.
    pub attached_errors: Vec<ValidationError>,
}

impl FieldDescriptor {
    /// Number of keys in the path.
    pub fn depth(&self) -> usize {
        path_segments(&self.path).len()
    }

    /// Returns true if the field sits inside a nested object.
    pub fn is_nested(&self) -> bool {
        parent_path(&self.path).is_some()
    }

    /// Returns true if any error was correlated to this field.
    pub fn has_errors(&self) -> bool {
        !self.attached_errors.is_empty()
    }

    pub(crate) fn with_errors(mut self, errors: Vec<ValidationError>) -> Self {
        self.attached_errors = errors;
        self
    }
}

/// The ranked, formatted, error-annotated view of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    /// Descriptors in report order.
    pub fields: Vec<FieldDescriptor>,
    /// Required top-level keys that the record does not contain.
    pub missing_required: Vec<String>,
    /// Validation errors that concern no field present in the record.
    pub unmatched_errors: Vec<ValidationError>,
    /// Problems found while walking the record (e.g. excessive nesting).
    pub structural_errors: Vec<ValidationError>,
}

impl FieldReport {
    /// Look up a descriptor by path.
    pub fn field(&self, path: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.path == path)
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the report has no descriptors.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Descriptors carrying at least one error.
    pub fn fields_with_errors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.has_errors())
    }
}

/// Report order: importance descending, then display name, then path.
pub fn report_order(a: &FieldDescriptor, b: &FieldDescriptor) -> Ordering {
    b.importance
        .cmp(&a.importance)
        .then_with(|| a.display_name.cmp(&b.display_name))
        .then_with(|| a.path.cmp(&b.path))
}

/// Sort descriptors into report order. Stable and total.
pub fn sort_fields(fields: &mut [FieldDescriptor]) {
    fields.sort_by(report_order);
}

/// Append `key` to a field path.
///
/// Keys are joined with `.`; a `.` or `\` inside a key is escaped with `\`,
/// so `{"a.b": 1}` and `{"a": {"b": 1}}` get distinct paths (`a\.b` and
/// `a.b`).
pub fn join_path(parent: Option<&str>, key: &str) -> String {
    let key = escape_key(key);
    match parent {
        Some(parent) => format!("{parent}{PATH_SEPARATOR}{key}"),
        None => key,
    }
}

fn escape_key(key: &str) -> String {
    if !key.contains(|c| c == PATH_SEPARATOR || c == PATH_ESCAPE) {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() + 2);
    for c in key.chars() {
        if c == PATH_SEPARATOR || c == PATH_ESCAPE {
            out.push(PATH_ESCAPE);
        }
        out.push(c);
    }
    out
}

/// The unescaped keys of a field path.
pub fn path_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        match c {
            PATH_ESCAPE => current.extend(chars.next()),
            PATH_SEPARATOR => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

/// The path of the enclosing object, or `None` for a top-level field.
pub fn parent_path(path: &str) -> Option<&str> {
    let mut escaped = false;
    let mut last = None;
    for (at, c) in path.char_indices() {
        match c {
            _ if escaped => escaped = false,
            PATH_ESCAPE => escaped = true,
            PATH_SEPARATOR => last = Some(at),
            _ => {}
        }
    }
    last.map(|at| &path[..at])
}

/// Humanize a field path: each key humanized, joined by ` › `.
pub fn display_name(path: &str) -> String {
    path_segments(path)
        .iter()
        .map(|key| humanize_key(key))
        .collect::<Vec<_>>()
        .join(DISPLAY_SEPARATOR)
}

/// `traceableUnitId` → `Traceable Unit Id`, `harvest_date` → `Harvest Date`.
///
/// JSON-LD keys (`@id`, `@type`) are kept verbatim.
pub fn humanize_key(key: &str) -> String {
    if key.is_empty() || key.starts_with('@') {
        return key.to_string();
    }

    let chars: Vec<char> = key.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | ' ') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        let boundary = c.is_uppercase()
            && i > 0
            && (chars[i - 1].is_lowercase()
                || chars[i - 1].is_ascii_digit()
                || (chars[i - 1].is_uppercase()
                    && chars.get(i + 1).is_some_and(|n| n.is_lowercase())));
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(path: &str, importance: u8) -> FieldDescriptor {
        FieldDescriptor {
            name: path.rsplit('.').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            display_name: display_name(path),
            raw_value: Value::Null,
            inferred_type: InferredType::Null,
            display_value: "null".to_string(),
            importance,
            required: false,
            description: None,
            attached_errors: Vec::new(),
        }
    }

    #[test]
    fn inferred_types() {
        assert_eq!(InferredType::of(&json!(null)), InferredType::Null);
        assert_eq!(InferredType::of(&json!([1, 2, 3])), InferredType::Array(3));
        assert_eq!(InferredType::of(&json!({})), InferredType::Object);
        assert_eq!(
            InferredType::of(&json!("2024-03-01T08:00:00Z")),
            InferredType::DateTime
        );
        assert_eq!(InferredType::of(&json!("TRU-PILE-001")), InferredType::Id);
        assert_eq!(InferredType::of(&json!("pile")), InferredType::String);
        assert_eq!(InferredType::of(&json!("2024-03-01")), InferredType::String);
        assert_eq!(InferredType::of(&json!(1.5)), InferredType::Number);
        assert_eq!(InferredType::of(&json!(true)), InferredType::Boolean);
    }

    #[test]
    fn inferred_type_display_and_serialize() {
        assert_eq!(InferredType::Array(4).to_string(), "array[4]");
        assert_eq!(
            serde_json::to_value(InferredType::DateTime).unwrap(),
            json!("datetime")
        );
    }

    #[test]
    fn humanize() {
        assert_eq!(humanize_key("traceableUnitId"), "Traceable Unit Id");
        assert_eq!(humanize_key("totalVolumeM3"), "Total Volume M3");
        assert_eq!(humanize_key("harvest_date"), "Harvest Date");
        assert_eq!(humanize_key("co2Emissions"), "Co2 Emissions");
        assert_eq!(humanize_key("GHGIntensity"), "GHG Intensity");
        assert_eq!(humanize_key("@id"), "@id");
        assert_eq!(
            display_name("operator.contactName"),
            "Operator › Contact Name"
        );
    }

    #[test]
    fn dotted_keys_get_distinct_paths() {
        let nested = join_path(Some("a"), "b");
        let dotted = join_path(None, "a.b");
        assert_eq!(nested, "a.b");
        assert_eq!(dotted, r"a\.b");
        assert_ne!(nested, dotted);

        assert_eq!(path_segments(&dotted), vec!["a.b"]);
        assert_eq!(parent_path(&dotted), None);
        assert_eq!(parent_path(&nested), Some("a"));

        let outer = join_path(None, r"odd\key");
        let deep = join_path(Some(outer.as_str()), "x.y");
        assert_eq!(path_segments(&deep), vec![r"odd\key", "x.y"]);
        assert_eq!(parent_path(&deep), Some(r"odd\\key"));
        assert_eq!(display_name(&dotted), "A.b");
    }

    #[test]
    fn report_order_is_importance_then_name() {
        let mut fields = vec![
            descriptor("description", 3),
            descriptor("zone", 8),
            descriptor("@id", 10),
            descriptor("alpha", 8),
        ];
        sort_fields(&mut fields);
        let paths: Vec<_> = fields.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["@id", "alpha", "zone", "description"]);
    }

    #[test]
    fn path_breaks_display_name_ties() {
        let mut fields = vec![descriptor("unit_type", 5), descriptor("unitType", 5)];
        sort_fields(&mut fields);
        assert_eq!(fields[0].display_name, fields[1].display_name);
        assert_eq!(fields[0].path, "unitType");
        assert_eq!(fields[1].path, "unit_type");
    }

    #[test]
    fn descriptor_helpers() {
        let d = descriptor("operator.contact.name", 2);
        assert_eq!(d.depth(), 3);
        assert!(d.is_nested());
        assert!(!d.has_errors());
    }
}

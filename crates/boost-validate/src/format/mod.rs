//! # Value Formatting
//!
//! Renders any JSON value as a short, human-readable string for the field
//! table. Rendering is total: every value produces text, nothing panics,
//! and the result never exceeds [`EngineConfig::max_display_len`]
//! characters.
//!
//! Scalars render natively. Strings are refined by field name: temporal
//! fields with an ISO date-time become `Mar 1, 2024, 08:00`, identifier
//! fields holding an uppercase-token id get an icon, and everything else is
//! truncated and quoted. Arrays and objects route by field name to the
//! specialized renderers in [`arrays`] and [`objects`], then fall back to
//! generic previews.

mod arrays;
mod objects;
mod tables;

pub use tables::{ArrayRenderer, FormatTables, ObjectComposer, DEFAULT_ICON};

use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::field::{is_id_token, is_iso_datetime};

/// Ellipsis appended to truncated text.
pub const ELLIPSIS: &str = "...";

const DATETIME_DISPLAY: &str = "%b %-d, %Y, %H:%M";
const DATE_DISPLAY: &str = "%b %-d, %Y";

/// Strings inside compact object previews are cut shorter than top-level
/// strings so the preview fits the display bound.
const COMPACT_STRING_LEN: usize = 20;

/// Renders values for display.
#[derive(Debug, Clone, Copy)]
pub struct ValueFormatter<'a> {
    tables: &'a FormatTables,
    config: EngineConfig,
}

impl<'a> ValueFormatter<'a> {
    pub fn new(tables: &'a FormatTables, config: EngineConfig) -> Self {
        Self { tables, config }
    }

    /// Render `value`, found under `field_name`, for display.
    pub fn format(&self, value: &Value, field_name: &str) -> String {
        let rendered = match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => self.string(s, field_name),
            Value::Array(items) => self.array(items, field_name),
            Value::Object(map) => self.object(map, field_name),
        };
        truncate(&rendered, self.config.max_display_len)
    }

    fn string(&self, s: &str, field_name: &str) -> String {
        if is_temporal_name(field_name) && is_iso_datetime(s) {
            return format_datetime(s).unwrap_or_else(|| s.to_string());
        }
        if is_identifier_name(field_name) && is_id_token(s) {
            return format!("{} {s}", self.tables.icon_for(field_name));
        }
        format!("\"{}\"", truncate(s, self.config.max_string_len))
    }

    fn array(&self, items: &[Value], field_name: &str) -> String {
        if items.is_empty() {
            return "[]".to_string();
        }
        if let Some(renderer) = self.tables.array_renderer(field_name) {
            return match renderer {
                ArrayRenderer::Documents => arrays::documents(items),
                ArrayRenderer::ProcessHistory => arrays::process_history(items),
                ArrayRenderer::Identifiers => arrays::identifiers(items),
                ArrayRenderer::SummaryItems => arrays::summary_items(items),
            };
        }
        if items.iter().all(Value::is_object) {
            return arrays::objects(items, self.tables.display_keys());
        }
        arrays::primitives(items)
    }

    fn object(&self, map: &Map<String, Value>, field_name: &str) -> String {
        if map.is_empty() {
            return "{}".to_string();
        }
        let composed = self
            .tables
            .object_composer(field_name)
            .and_then(|composer| match composer {
                ObjectComposer::Metrics => objects::metrics(map, self.tables),
                ObjectComposer::Emissions => objects::emissions(map),
                ObjectComposer::Arrangement => objects::arrangement(map, self.tables),
                ObjectComposer::CalculationParameters => objects::calculation_parameters(map),
            });
        composed.unwrap_or_else(|| objects::generic(map))
    }
}

fn is_temporal_name(field_name: &str) -> bool {
    let lower = field_name.to_ascii_lowercase();
    lower.contains("timestamp") || lower.contains("date")
}

fn is_identifier_name(field_name: &str) -> bool {
    field_name == "id"
        || field_name.ends_with("Id")
        || field_name.ends_with("ID")
        || field_name.to_ascii_lowercase().contains("identifier")
}

/// Cut `s` to at most `max` characters, ending in `...` when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(&ELLIPSIS[..max.min(ELLIPSIS.len())]);
    out
}

/// `2024-01-15T10:30:00Z` → `Jan 15, 2024, 10:30`, in the offset given.
/// Values without an offset are taken as written.
pub(crate) fn format_datetime(s: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.format(DATETIME_DISPLAY).to_string());
    }
    let head = s.get(..19)?;
    NaiveDateTime::parse_from_str(head, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.format(DATETIME_DISPLAY).to_string())
}

/// `2024-01-15...` → `Jan 15, 2024`.
pub(crate) fn format_date(s: &str) -> Option<String> {
    let head = s.get(..10)?;
    chrono::NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .ok()
        .map(|d| d.format(DATE_DISPLAY).to_string())
}

/// Unquoted short text for a value nested inside a preview.
pub(crate) fn scalar_text(value: &Value, max: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => truncate(s, max),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(_) => format!("{{{ELLIPSIS}}}"),
    }
}

/// Compact number text: at most two decimals, trailing zeros dropped.
pub(crate) fn number_text(n: f64) -> String {
    let fixed = format!("{n:.2}");
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Fractions in `[-1, 1]` are scaled to percent; larger values are taken as
/// already being percentages.
pub(crate) fn percent_text(n: f64) -> String {
    let pct = if n.abs() <= 1.0 { n * 100.0 } else { n };
    format!("{pct:.0}%")
}

//! Array previews.

use serde_json::Value;

use super::{percent_text, scalar_text, truncate};
use crate::field::is_id_token;

/// Items shown before a `+N more` suffix.
const PREVIEW_ITEMS: usize = 2;

/// Primitive arrays up to this length are listed in full.
const INLINE_PRIMITIVES: usize = 3;

const MAX_PROCESS_STEPS: usize = 5;

const ITEM_TEXT_LEN: usize = 24;
const DOC_NAME_LEN: usize = 20;

/// `[a, b, c]`, or `a, ... +N more` past three items.
pub(super) fn primitives(items: &[Value]) -> String {
    let Some(first) = items.first() else {
        return "[]".to_string();
    };
    if items.len() > INLINE_PRIMITIVES {
        return format!(
            "{}, ... +{} more",
            scalar_text(first, ITEM_TEXT_LEN),
            items.len() - 1
        );
    }
    let listed: Vec<String> = items
        .iter()
        .map(|v| scalar_text(v, ITEM_TEXT_LEN))
        .collect();
    format!("[{}]", listed.join(", "))
}

/// Each object represented by its first populated display key.
pub(super) fn objects(items: &[Value], display_keys: &[&str]) -> String {
    let shown: Vec<String> = items
        .iter()
        .take(PREVIEW_ITEMS)
        .map(|item| representative(item, display_keys))
        .collect();
    let joined = shown.join(", ");
    if items.len() > PREVIEW_ITEMS {
        format!("{joined}, ... +{} more", items.len() - PREVIEW_ITEMS)
    } else {
        format!("[{joined}]")
    }
}

fn representative(item: &Value, display_keys: &[&str]) -> String {
    let Value::Object(map) = item else {
        return scalar_text(item, ITEM_TEXT_LEN);
    };
    display_keys
        .iter()
        .find_map(|key| map.get(*key).filter(|v| !v.is_null()))
        .map(|v| scalar_text(v, ITEM_TEXT_LEN))
        .unwrap_or_else(|| match map.len() {
            0 => "{}".to_string(),
            1 => "{1 field}".to_string(),
            n => format!("{{{n} fields}}"),
        })
}

/// `harvest-permit.pdf, survey.pdf +3 more`
pub(super) fn documents(items: &[Value]) -> String {
    let names: Vec<String> = items
        .iter()
        .take(PREVIEW_ITEMS)
        .map(document_name)
        .collect();
    with_more(names, items.len(), ", ")
}

fn document_name(item: &Value) -> String {
    let raw = match item {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => first_str(
            map,
            &["documentName", "name", "title", "fileName", "url", "@id", "id"],
        ),
        _ => None,
    };
    match raw {
        Some(s) => shorten_document(s),
        None => scalar_text(item, DOC_NAME_LEN),
    }
}

/// Last path segment, without query string.
fn shorten_document(s: &str) -> String {
    let without_query = s.split(['?', '#']).next().unwrap_or(s);
    let trimmed = without_query.trim_end_matches('/');
    let base = trimmed.rsplit('/').next().unwrap_or(trimmed);
    truncate(if base.is_empty() { s } else { base }, DOC_NAME_LEN)
}

/// `Harvest → Debarking → Chipping`
pub(super) fn process_history(items: &[Value]) -> String {
    let mut steps: Vec<String> = items
        .iter()
        .take(MAX_PROCESS_STEPS)
        .map(step_keyword)
        .collect();
    if items.len() > MAX_PROCESS_STEPS {
        steps.push(format!("+{} more", items.len() - MAX_PROCESS_STEPS));
    }
    steps.join(" → ")
}

/// `PROC-HARVEST-001` → `Harvest`; `primary_sawing` → `Primary sawing`.
fn step_keyword(item: &Value) -> String {
    let raw = match item {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => first_str(
            map,
            &["processType", "step", "action", "name", "type", "@id", "id"],
        ),
        _ => None,
    };
    let Some(raw) = raw else {
        return "Step".to_string();
    };
    let raw = raw.rsplit('/').next().unwrap_or(raw);

    if is_id_token(raw) {
        let tokens: Vec<&str> = raw
            .split('-')
            .filter(|t| !t.is_empty() && !t.chars().all(|c| c.is_ascii_digit()))
            .collect();
        let keyword = match tokens.as_slice() {
            [_prefix, keyword, ..] => keyword,
            [only] => only,
            [] => &raw,
        };
        return capitalize(&keyword.to_lowercase());
    }
    truncate(&capitalize(&raw.replace(['_', '-'], " ")), ITEM_TEXT_LEN)
}

/// `FSC: FSC-C123456 (95%); RFID: 04A2 +1 more`
pub(super) fn identifiers(items: &[Value]) -> String {
    let entries: Vec<String> = items
        .iter()
        .take(PREVIEW_ITEMS)
        .map(identifier_entry)
        .collect();
    with_more(entries, items.len(), "; ")
}

fn identifier_entry(item: &Value) -> String {
    let Value::Object(map) = item else {
        return scalar_text(item, ITEM_TEXT_LEN);
    };
    let kind = first_str(map, &["identifierType", "type", "scheme"]);
    let value = ["identifierValue", "value", "id"]
        .iter()
        .find_map(|k| map.get(*k))
        .map(|v| scalar_text(v, ITEM_TEXT_LEN));
    let confidence = ["confidence", "confidenceLevel", "identificationConfidence"]
        .iter()
        .find_map(|k| map.get(*k).and_then(Value::as_f64));

    let mut entry = match (kind, value) {
        (Some(kind), Some(value)) => format!("{kind}: {value}"),
        (None, Some(value)) => value,
        (Some(kind), None) => kind.to_string(),
        (None, None) => return scalar_text(item, ITEM_TEXT_LEN),
    };
    if let Some(c) = confidence {
        entry.push_str(&format!(" ({})", percent_text(c)));
    }
    entry
}

/// `Pine (percentage: 60, volumeM3: 12.5); Spruce (percentage: 40)`
pub(super) fn summary_items(items: &[Value]) -> String {
    let entries: Vec<String> = items
        .iter()
        .take(PREVIEW_ITEMS)
        .map(summary_entry)
        .collect();
    with_more(entries, items.len(), "; ")
}

fn summary_entry(item: &Value) -> String {
    let Value::Object(map) = item else {
        return scalar_text(item, ITEM_TEXT_LEN);
    };
    let label = [
        "name",
        "species",
        "speciesName",
        "category",
        "type",
        "label",
        "@type",
    ]
    .iter()
    .find_map(|k| map.get(*k).and_then(Value::as_str).map(|s| (*k, s)));

    let metrics: Vec<String> = map
        .iter()
        .filter(|(k, v)| v.is_number() && label.map_or(true, |(lk, _)| lk != k.as_str()))
        .take(2)
        .map(|(k, v)| format!("{k}: {v}"))
        .collect();

    match (label, metrics.is_empty()) {
        (Some((_, label)), true) => truncate(label, ITEM_TEXT_LEN),
        (Some((_, label)), false) => {
            format!("{} ({})", truncate(label, ITEM_TEXT_LEN), metrics.join(", "))
        }
        (None, false) => metrics.join(", "),
        (None, true) => scalar_text(item, ITEM_TEXT_LEN),
    }
}

fn first_str<'v>(map: &'v serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'v str> {
    keys.iter()
        .find_map(|k| map.get(*k).and_then(Value::as_str))
}

fn with_more(shown: Vec<String>, total: usize, separator: &str) -> String {
    let hidden = total.saturating_sub(shown.len());
    let joined = shown.join(separator);
    if hidden > 0 {
        format!("{joined} +{hidden} more")
    } else {
        joined
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

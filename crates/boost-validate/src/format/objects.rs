//! Object summaries.
//!
//! Composers return `None` when the object has none of the keys they know,
//! and the caller falls back to [`generic`].

use serde_json::{Map, Value};

use super::{format_date, number_text, percent_text, scalar_text, truncate, FormatTables};

const SEGMENT_SEPARATOR: &str = " | ";
const COMPACT_STRING_LEN: usize = super::COMPACT_STRING_LEN;
const GENERIC_INLINE_KEYS: usize = 3;
const PARAMETER_PREVIEW: usize = 3;
const PARAMETER_VALUE_LEN: usize = 15;

/// Compact JSON for small objects, key preview for larger ones.
pub(super) fn generic(map: &Map<String, Value>) -> String {
    if map.is_empty() {
        return "{}".to_string();
    }
    if map.len() <= GENERIC_INLINE_KEYS {
        let compact: Map<String, Value> = map
            .iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => Value::String(truncate(s, COMPACT_STRING_LEN)),
                    other => other.clone(),
                };
                (k.clone(), v)
            })
            .collect();
        return Value::Object(compact).to_string();
    }
    let shown: Vec<&str> = map.keys().take(2).map(String::as_str).collect();
    format!("{{{}, +{} more}}", shown.join(", "), map.len() - shown.len())
}

/// `Decay: 4% | Efficiency: 85% | Scenario: Baseline`
pub(super) fn metrics(map: &Map<String, Value>, tables: &FormatTables) -> Option<String> {
    let mut segments = Vec::new();
    if let Some(n) = first_number(map, &["decayRate", "decayRatePercent", "annualDecayRate", "decay"]) {
        segments.push(format!("Decay: {}", percent_text(n)));
    }
    if let Some(n) = first_number(
        map,
        &["efficiency", "conversionEfficiency", "efficiencyPercent", "processingEfficiency"],
    ) {
        segments.push(format!("Efficiency: {}", percent_text(n)));
    }
    if let Some(s) = first_str(map, &["scenario", "scenarioType", "scenarioName"]) {
        segments.push(format!("Scenario: {}", tables.scenario_label(s)));
    }
    joined(segments)
}

/// `Emissions: 12.4 kg CO2e | Soil C: -0.3 | Intensity: 0.02`
pub(super) fn emissions(map: &Map<String, Value>) -> Option<String> {
    let mut segments = Vec::new();
    if let Some(n) = first_number(
        map,
        &["totalEmissions", "emissions", "co2Emissions", "ghgEmissions", "co2e"],
    ) {
        let unit = first_str(map, &["unit", "emissionsUnit"]).unwrap_or("kg CO2e");
        segments.push(format!("Emissions: {} {unit}", number_text(n)));
    }
    if let Some(n) = first_number(
        map,
        &["soilCarbonChange", "soilCarbon", "soilOrganicCarbon", "soilCarbonStock"],
    ) {
        segments.push(format!("Soil C: {}", number_text(n)));
    }
    if let Some(n) = first_number(map, &["carbonIntensity", "emissionsIntensity"]) {
        segments.push(format!("Intensity: {}", number_text(n)));
    }
    joined(segments)
}

/// `Long-term contract | Condition: FSC only | Contact: J. Doe | Since: Jan 1, 2023`
pub(super) fn arrangement(map: &Map<String, Value>, tables: &FormatTables) -> Option<String> {
    let mut segments = Vec::new();
    if let Some(s) = first_str(map, &["arrangementType", "type"]) {
        segments.push(tables.arrangement_label(s));
    }
    if let Some(s) = first_str(map, &["condition", "conditions", "terms"]) {
        segments.push(format!("Condition: {}", truncate(s, COMPACT_STRING_LEN)));
    }
    let contact = ["contact", "contactName", "contactPerson"]
        .iter()
        .find_map(|k| map.get(*k))
        .and_then(|v| match v {
            Value::String(s) => Some(s.as_str()),
            Value::Object(inner) => first_str(inner, &["name", "fullName", "email"]),
            _ => None,
        });
    if let Some(s) = contact {
        segments.push(format!("Contact: {}", truncate(s, COMPACT_STRING_LEN)));
    }
    if let Some(s) = first_str(map, &["startDate", "effectiveDate", "signedDate", "date"]) {
        segments.push(format!(
            "Since: {}",
            format_date(s).unwrap_or_else(|| s.to_string())
        ));
    }
    joined(segments)
}

/// `methodology=IPCC Tier 1, version=2.1, +4 more`
pub(super) fn calculation_parameters(map: &Map<String, Value>) -> Option<String> {
    const LEADING: &[&str] = &["methodology", "method", "version", "model"];

    let leading = LEADING
        .iter()
        .filter_map(|k| map.get_key_value(*k));
    let rest = map
        .iter()
        .filter(|(k, _)| !LEADING.contains(&k.as_str()));

    let shown: Vec<String> = leading
        .chain(rest)
        .take(PARAMETER_PREVIEW)
        .map(|(k, v)| format!("{k}={}", scalar_text(v, PARAMETER_VALUE_LEN)))
        .collect();
    if shown.is_empty() {
        return None;
    }
    let hidden = map.len() - shown.len();
    let mut out = shown.join(", ");
    if hidden > 0 {
        out.push_str(&format!(", +{hidden} more"));
    }
    Some(out)
}

fn first_number(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| map.get(*k).and_then(Value::as_f64))
}

fn first_str<'v>(map: &'v Map<String, Value>, keys: &[&str]) -> Option<&'v str> {
    keys.iter().find_map(|k| map.get(*k).and_then(Value::as_str))
}

fn joined(segments: Vec<String>) -> Option<String> {
    if segments.is_empty() {
        None
    } else {
        Some(segments.join(SEGMENT_SEPARATOR))
    }
}

//! # Entity Dictionary
//!
//! Each BOOST entity ships a markdown dictionary documenting its fields. The
//! report uses it for two things only: marking fields as required and
//! attaching a description. The layout parsed here:
//!
//! ```text
//! ### Overview
//! Free text, possibly across several lines.
//!
//! ### Fields
//! <table class="data">
//!   <tr>
//!     <th>Field</th> ...
//!   </tr>
//!   <tr>
//!     <td>`traceableUnitId`</td>
//!     <td>string</td>
//!     <td>Yes</td>
//!     <td>Unique identifier</td>
//!     <td>TRU-001</td>
//!   </tr>
//! </table>
//! ```
//!
//! Rows need at least four cells (name, type, required, description); the
//! fifth is optional examples. Cells whose content starts with markup are
//! not captured, matching how the dictionaries render nested HTML.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TD_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"<td>([^<]+)").expect("static regex"));

/// One documented field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryField {
    /// Declared type as written in the dictionary (`string`, `array`, ...).
    #[serde(rename = "type")]
    pub field_type: String,
    /// Whether the dictionary marks the field as required.
    pub required: bool,
    /// Human-readable description.
    pub description: String,
    /// Example values, if a fifth column was present.
    pub examples: String,
}

/// Parsed dictionary for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDictionary {
    /// Text of the `### Overview` section, whitespace-joined.
    pub overview: String,
    /// Fields keyed by name.
    pub fields: BTreeMap<String, DictionaryField>,
}

impl EntityDictionary {
    /// Look up a documented field.
    pub fn field(&self, name: &str) -> Option<&DictionaryField> {
        self.fields.get(name)
    }

    /// Returns true if the dictionary marks `name` as required.
    pub fn is_required(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|f| f.required)
    }

    /// Names of all fields marked required, sorted.
    pub fn required_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, f)| f.required)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Parse dictionary markdown into an [`EntityDictionary`].
///
/// Never fails: unrecognized content is skipped.
pub fn parse_dictionary_markdown(content: &str) -> EntityDictionary {
    let lines: Vec<&str> = content.lines().collect();

    let mut overview = String::new();
    let mut in_overview = false;
    let mut in_table = false;
    let mut fields = BTreeMap::new();

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if trimmed == "### Overview" {
            in_overview = true;
            continue;
        } else if line.starts_with("###") && in_overview {
            in_overview = false;
        } else if in_overview && !trimmed.is_empty() {
            overview.push_str(trimmed);
            overview.push(' ');
        }

        if line.contains("<table class=\"data\">") {
            in_table = true;
            continue;
        } else if line.contains("</table>") {
            in_table = false;
            continue;
        }

        if in_table && trimmed.starts_with("<tr>") {
            let cells = row_cells(&lines[i + 1..]);
            if let [name, field_type, required, description, rest @ ..] = cells.as_slice() {
                fields.insert(
                    name.clone(),
                    DictionaryField {
                        field_type: field_type.clone(),
                        required: matches!(
                            required.to_lowercase().as_str(),
                            "yes" | "required" | "true"
                        ),
                        description: description.clone(),
                        examples: rest.first().cloned().unwrap_or_default(),
                    },
                );
            }
        }
    }

    EntityDictionary {
        overview: overview.trim().to_string(),
        fields,
    }
}

/// Collect `<td>` cell texts from the lines following a `<tr>` up to `</tr>`.
fn row_cells(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .take_while(|l| !l.trim().starts_with("</tr>"))
        .filter(|l| l.trim().starts_with("<td>"))
        .filter_map(|l| TD_CELL.captures(l))
        .map(|caps| caps[1].trim().replace('`', ""))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"## TraceableUnit

### Overview
The TraceableUnit is the central entity
for tracking biomass.

### Fields
<table class="data">
  <tr>
    <th>Field</th>
    <th>Type</th>
    <th>Required</th>
    <th>Description</th>
    <th>Examples</th>
  </tr>
  <tr>
    <td>`traceableUnitId`</td>
    <td>string</td>
    <td>Yes</td>
    <td>Unique identifier for the unit</td>
    <td>TRU-001</td>
  </tr>
  <tr>
    <td>`totalVolumeM3`</td>
    <td>number</td>
    <td>No</td>
    <td>Volume in cubic metres</td>
  </tr>
  <tr>
    <td>`broken`</td>
    <td>string</td>
  </tr>
</table>
"#;

    #[test]
    fn parses_overview_across_lines() {
        let dict = parse_dictionary_markdown(SAMPLE);
        assert_eq!(
            dict.overview,
            "The TraceableUnit is the central entity for tracking biomass."
        );
    }

    #[test]
    fn parses_field_rows() {
        let dict = parse_dictionary_markdown(SAMPLE);
        assert_eq!(dict.fields.len(), 2);

        let id = dict.field("traceableUnitId").unwrap();
        assert_eq!(id.field_type, "string");
        assert!(id.required);
        assert_eq!(id.description, "Unique identifier for the unit");
        assert_eq!(id.examples, "TRU-001");

        let vol = dict.field("totalVolumeM3").unwrap();
        assert!(!vol.required);
        assert_eq!(vol.examples, "");
    }

    #[test]
    fn short_rows_are_skipped() {
        let dict = parse_dictionary_markdown(SAMPLE);
        assert!(dict.field("broken").is_none());
    }

    #[test]
    fn required_accepts_synonyms() {
        let md = "<table class=\"data\">\n<tr>\n<td>a</td>\n<td>string</td>\n<td>REQUIRED</td>\n<td>x</td>\n</tr>\n<tr>\n<td>b</td>\n<td>string</td>\n<td>true</td>\n<td>y</td>\n</tr>\n</table>";
        let dict = parse_dictionary_markdown(md);
        assert_eq!(dict.required_fields(), vec!["a", "b"]);
    }

    #[test]
    fn empty_input_yields_empty_dictionary() {
        assert_eq!(parse_dictionary_markdown(""), EntityDictionary::default());
    }
}

//! # Importance Ranking
//!
//! Scores a field name from 1 to 10 so the report can lead with what a
//! reviewer looks at first: identity, then business identifiers, then
//! quantities, location, time and provenance, with free-form annotations
//! last.
//!
//! Lookup order: the exact-name table, then name heuristics, then a flat
//! score for nested fields, then the default.

use std::collections::HashMap;

/// Score for a nested field with no exact or heuristic match.
pub const NESTED_IMPORTANCE: u8 = 2;

/// Score for a top-level field with no exact or heuristic match.
pub const DEFAULT_IMPORTANCE: u8 = 3;

/// Exact-name scores for BOOST record fields.
const CRITICAL_FIELDS: &[(&str, u8)] = &[
    // Identity and type discriminators.
    ("@id", 10),
    ("@type", 10),
    ("id", 10),
    ("traceableUnitId", 10),
    // Primary business identifiers.
    ("uniqueIdentifier", 9),
    ("unitType", 9),
    ("organizationId", 9),
    ("harvesterId", 9),
    ("operatorId", 9),
    // Core quantities and classification.
    ("name", 8),
    ("status", 8),
    ("totalVolumeM3", 8),
    ("materialTypeId", 8),
    ("speciesComposition", 8),
    // Location.
    ("currentGeographicDataId", 7),
    ("harvestGeographicDataId", 7),
    ("geographicDataId", 7),
    // Time.
    ("createdTimestamp", 6),
    ("lastUpdated", 6),
    ("harvestDate", 6),
    // Quality and provenance.
    ("qualityGrade", 5),
    ("identificationMethodId", 5),
    ("identificationConfidence", 5),
    ("processHistory", 5),
    // Supporting detail.
    ("@context", 4),
    ("uniqueIdentifiers", 4),
    ("isMultiSpecies", 4),
    ("supportingDocuments", 4),
    // Free-form annotations.
    ("notes", 2),
    ("comments", 2),
    ("metadata", 2),
];

/// Field-name importance scorer.
#[derive(Debug, Clone)]
pub struct ImportanceRanker {
    exact: HashMap<&'static str, u8>,
}

impl Default for ImportanceRanker {
    fn default() -> Self {
        Self::with_table(CRITICAL_FIELDS)
    }
}

impl ImportanceRanker {
    /// Ranker over the built-in BOOST table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranker over a caller-supplied exact-name table. Scores are clamped
    /// to 1..=10.
    pub fn with_table(table: &[(&'static str, u8)]) -> Self {
        Self {
            exact: table
                .iter()
                .map(|(name, score)| (*name, (*score).clamp(1, 10)))
                .collect(),
        }
    }

    /// Score a field. `nested` is true when the field has a parent path.
    pub fn importance(&self, field_name: &str, nested: bool) -> u8 {
        if let Some(score) = self.exact.get(field_name) {
            return *score;
        }
        if let Some(score) = heuristic(field_name) {
            return score;
        }
        if nested {
            NESTED_IMPORTANCE
        } else {
            DEFAULT_IMPORTANCE
        }
    }
}

fn heuristic(name: &str) -> Option<u8> {
    let lower = name.to_ascii_lowercase();
    if name.ends_with("Id") || name.ends_with("ID") {
        Some(8)
    } else if name.ends_with("Timestamp")
        || name.ends_with("Date")
        || lower == "timestamp"
        || lower == "date"
    {
        Some(6)
    } else if has_word(name, "geographic") || has_word(name, "location") {
        Some(7)
    } else if has_word(name, "certificate") || has_word(name, "certification") {
        Some(5)
    } else if has_word(name, "error") || has_word(name, "issue") {
        Some(9)
    } else {
        None
    }
}

/// True if `word` (lowercase) starts a word of `name`: at the very start,
/// capitalized inside a camelCase name, or after `_` or `-`.
fn has_word(name: &str, word: &str) -> bool {
    name.to_ascii_lowercase()
        .match_indices(word)
        .any(|(at, _)| {
            at == 0
                || name[at..].starts_with(char::is_uppercase)
                || name[..at].ends_with(|c| c == '_' || c == '-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_table_wins() {
        let r = ImportanceRanker::new();
        assert_eq!(r.importance("@id", false), 10);
        assert_eq!(r.importance("@type", true), 10);
        assert_eq!(r.importance("harvesterId", false), 9);
        assert_eq!(r.importance("notes", false), 2);
    }

    #[test]
    fn heuristics() {
        let r = ImportanceRanker::new();
        assert_eq!(r.importance("supplierId", false), 8);
        assert_eq!(r.importance("deliveryDate", false), 6);
        assert_eq!(r.importance("measuredTimestamp", true), 6);
        assert_eq!(r.importance("storageLocation", false), 7);
        assert_eq!(r.importance("certificationBody", false), 5);
        assert_eq!(r.importance("validationIssues", false), 9);
        // First heuristic wins.
        assert_eq!(r.importance("errorId", false), 8);
    }

    #[test]
    fn word_heuristics_need_a_word_start() {
        let r = ImportanceRanker::new();
        assert_eq!(r.importance("allocationMethod", false), DEFAULT_IMPORTANCE);
        assert_eq!(r.importance("tissueType", false), DEFAULT_IMPORTANCE);
        assert_eq!(r.importance("terrorLevel", false), DEFAULT_IMPORTANCE);
        assert_eq!(r.importance("locationName", false), 7);
        assert_eq!(r.importance("GeographicArea", false), 7);
        assert_eq!(r.importance("storage_location", false), 7);
        assert_eq!(r.importance("openIssues", false), 9);
        assert_eq!(r.importance("qualityErrors", false), 9);
    }

    #[test]
    fn suffix_heuristics_are_case_sensitive() {
        let r = ImportanceRanker::new();
        // "paid" ends in "id" but is not an identifier.
        assert_eq!(r.importance("paid", false), DEFAULT_IMPORTANCE);
        assert_eq!(r.importance("update", false), DEFAULT_IMPORTANCE);
    }

    #[test]
    fn nested_and_default() {
        let r = ImportanceRanker::new();
        assert_eq!(r.importance("description", false), DEFAULT_IMPORTANCE);
        assert_eq!(r.importance("description", true), NESTED_IMPORTANCE);
    }

    #[test]
    fn custom_table_is_clamped() {
        let r = ImportanceRanker::with_table(&[("priority", 42), ("noise", 0)]);
        assert_eq!(r.importance("priority", false), 10);
        assert_eq!(r.importance("noise", false), 1);
    }
}

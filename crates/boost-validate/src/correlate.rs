//! # Error Correlation
//!
//! Attaches classified errors to the field descriptors they concern.
//!
//! An error is keyed by its `fieldPath`. Consolidated additional-property
//! errors carry a comma-joined list of names and are keyed under each name.
//! Root-level errors, and errors wrapped from legacy string messages, are
//! keyed by whatever field name the message text mentions.
//!
//! A key with no descriptor of its own falls back to its nearest ancestor
//! that has one, so a violation at `processHistory.2` lands on
//! `processHistory`. Errors that match nothing are returned separately.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ErrorKind, ValidationError};
use crate::field::{parent_path, FieldDescriptor};

/// Message phrasings that name a field, tried in order.
static FIELD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bfield\s+'([^']+)'",
        r"(?i)\bproperty\s+'([^']+)'",
        r"'([^']+)'\s+is\s+(?:missing|a required property)",
        r"\$\.([A-Za-z0-9_@-]+(?:\.[A-Za-z0-9_@-]+)*)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

/// Descriptors with their errors attached, plus the errors nothing claimed.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlation {
    pub fields: Vec<FieldDescriptor>,
    pub unmatched: Vec<ValidationError>,
}

/// Recover a field name from a free-text error message.
pub fn extract_field_from_message(message: &str) -> Option<String> {
    FIELD_PATTERNS
        .iter()
        .find_map(|re| re.captures(message).map(|c| c[1].to_string()))
}

/// Attach each error to every descriptor it concerns.
///
/// Descriptor order is preserved. Within a descriptor, errors keep their
/// order in `errors`.
pub fn correlate(errors: &[ValidationError], fields: Vec<FieldDescriptor>) -> Correlation {
    let known: HashSet<&str> = fields.iter().map(|f| f.path.as_str()).collect();
    let mut by_path: HashMap<String, Vec<ValidationError>> = HashMap::new();
    let mut unmatched = Vec::new();

    for error in errors {
        let mut targets: Vec<&str> = correlation_keys(error)
            .iter()
            .filter_map(|key| resolve(key, &known))
            .collect();
        targets.sort_unstable();
        targets.dedup();

        if targets.is_empty() {
            unmatched.push(error.clone());
            continue;
        }
        for target in targets {
            by_path
                .entry(target.to_string())
                .or_default()
                .push(error.clone());
        }
    }

    tracing::debug!(
        errors = errors.len(),
        unmatched = unmatched.len(),
        "correlated validation errors to fields"
    );

    let fields = fields
        .into_iter()
        .map(|field| {
            let attached = by_path.remove(&field.path).unwrap_or_default();
            field.with_errors(attached)
        })
        .collect();

    Correlation { fields, unmatched }
}

fn correlation_keys(error: &ValidationError) -> Vec<String> {
    if error.kind == ErrorKind::AdditionalProperty {
        return error
            .field_path
            .split(", ")
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
    }
    if error.is_root() {
        return extract_field_from_message(&error.message)
            .into_iter()
            .collect();
    }
    vec![error.field_path.clone()]
}

/// The key itself if a descriptor exists for it, else its nearest ancestor.
fn resolve<'a>(key: &str, known: &HashSet<&'a str>) -> Option<&'a str> {
    let mut candidate = key;
    loop {
        if let Some(found) = known.get(candidate) {
            return Some(*found);
        }
        candidate = parent_path(candidate)?;
    }
}

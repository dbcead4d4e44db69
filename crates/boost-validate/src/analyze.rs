//! # Field Analysis
//!
//! Walks a record depth-first and produces one [`FieldDescriptor`] per key,
//! at every object depth. Arrays are leaves: their contents are summarized
//! by the formatter, not walked.
//!
//! Descent stops at [`EngineConfig::max_depth`]. The object that would
//! exceed it still gets its own descriptor, and the truncation is reported
//! as an `other` error at that object's path.

use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::error::{ValidationError, ROOT_PATH};
use crate::field::{display_name, join_path, sort_fields, FieldDescriptor, InferredType};
use crate::format::{FormatTables, ValueFormatter};
use crate::importance::ImportanceRanker;

/// Descriptors in report order, plus problems found during the walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    pub fields: Vec<FieldDescriptor>,
    pub structural_errors: Vec<ValidationError>,
}

/// Record walker. Cheap to build; borrows the shared tables.
#[derive(Debug, Clone, Copy)]
pub struct FieldAnalyzer<'a> {
    ranker: &'a ImportanceRanker,
    formatter: ValueFormatter<'a>,
    max_depth: usize,
}

impl<'a> FieldAnalyzer<'a> {
    pub fn new(ranker: &'a ImportanceRanker, tables: &'a FormatTables, config: EngineConfig) -> Self {
        Self {
            ranker,
            formatter: ValueFormatter::new(tables, config),
            max_depth: config.max_depth,
        }
    }

    /// Describe every field of `record`, sorted into report order.
    ///
    /// A record whose root is not an object has no fields; that is reported
    /// as a single structural error.
    pub fn analyze(&self, record: &Value) -> Analysis {
        let mut analysis = Analysis::default();
        match record {
            Value::Object(map) => self.walk(map, None, 1, &mut analysis),
            other => analysis.structural_errors.push(ValidationError::other(
                ROOT_PATH,
                format!(
                    "Record root must be an object, found {}",
                    InferredType::of(other)
                ),
            )),
        }
        sort_fields(&mut analysis.fields);
        analysis
    }

    fn walk(&self, map: &Map<String, Value>, parent: Option<&str>, depth: usize, analysis: &mut Analysis) {
        for (key, value) in map {
            let path = join_path(parent, key);

            if let Value::Object(children) = value {
                if !children.is_empty() {
                    if depth >= self.max_depth {
                        tracing::warn!(path = %path, max_depth = self.max_depth, "record nesting exceeds depth limit");
                        analysis.structural_errors.push(ValidationError::other(
                            path.clone(),
                            format!(
                                "Field '{path}': nesting exceeds the maximum depth of {}; nested fields were not analyzed",
                                self.max_depth
                            ),
                        ));
                    } else {
                        self.walk(children, Some(&path), depth + 1, analysis);
                    }
                }
            }

            analysis
                .fields
                .push(self.describe(key, path, value, parent.is_some()));
        }
    }

    fn describe(&self, key: &str, path: String, value: &Value, nested: bool) -> FieldDescriptor {
        FieldDescriptor {
            name: key.to_string(),
            display_name: display_name(&path),
            path,
            raw_value: value.clone(),
            inferred_type: InferredType::of(value),
            display_value: self.formatter.format(value, key),
            importance: self.ranker.importance(key, nested),
            required: false,
            description: None,
            attached_errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analyze_with(record: Value, config: EngineConfig) -> Analysis {
        let ranker = ImportanceRanker::new();
        let tables = FormatTables::default();
        FieldAnalyzer::new(&ranker, &tables, config).analyze(&record)
    }

    fn analyze(record: Value) -> Analysis {
        analyze_with(record, EngineConfig::default())
    }

    #[test]
    fn walks_nested_objects() {
        let a = analyze(json!({
            "@id": "TRU-1",
            "operator": {"name": "Acme", "contact": {"email": "ops@acme.test"}},
            "tags": [{"name": "not walked"}]
        }));
        let mut paths: Vec<_> = a.fields.iter().map(|f| f.path.as_str()).collect();
        paths.sort_unstable();
        assert_eq!(
            paths,
            vec![
                "@id",
                "operator",
                "operator.contact",
                "operator.contact.email",
                "operator.name",
                "tags"
            ]
        );
        assert!(a.structural_errors.is_empty());

        let email = a.fields.iter().find(|f| f.path == "operator.contact.email").unwrap();
        assert_eq!(email.display_name, "Operator › Contact › Email");
        assert_eq!(email.importance, 2);
        assert_eq!(email.display_value, "\"ops@acme.test\"");
    }

    #[test]
    fn id_outranks_description() {
        let a = analyze(json!({"description": "A pile", "@id": "TRU-1"}));
        assert_eq!(a.fields[0].path, "@id");
        assert_eq!(a.fields[1].path, "description");
    }

    #[test]
    fn depth_guard_stops_descent() {
        let config = EngineConfig {
            max_depth: 2,
            ..EngineConfig::default()
        };
        let a = analyze_with(json!({"a": {"b": {"c": {"d": 1}}}}), config);

        let mut paths: Vec<_> = a.fields.iter().map(|f| f.path.as_str()).collect();
        paths.sort_unstable();
        assert_eq!(paths, vec!["a", "a.b"]);
        assert_eq!(a.structural_errors.len(), 1);
        assert_eq!(a.structural_errors[0].field_path, "a.b");
        assert_eq!(a.structural_errors[0].kind, crate::ErrorKind::Other);
    }

    #[test]
    fn dotted_key_and_nested_key_stay_distinct() {
        let a = analyze(json!({"a.b": 1, "a": {"b": 2}}));
        let mut paths: Vec<_> = a.fields.iter().map(|f| f.path.as_str()).collect();
        paths.sort_unstable();
        assert_eq!(paths, vec!["a", "a.b", r"a\.b"]);

        let dotted = a.fields.iter().find(|f| f.path == r"a\.b").unwrap();
        assert_eq!(dotted.name, "a.b");
        assert!(!dotted.is_nested());
        assert_eq!(dotted.raw_value, json!(1));
    }

    #[test]
    fn non_object_root() {
        let a = analyze(json!([1, 2]));
        assert!(a.fields.is_empty());
        assert_eq!(a.structural_errors.len(), 1);
        assert!(a.structural_errors[0].is_root());
        assert!(a.structural_errors[0].message.contains("array[2]"));
    }

    #[test]
    fn empty_record() {
        let a = analyze(json!({}));
        assert!(a.fields.is_empty());
        assert!(a.structural_errors.is_empty());
    }
}

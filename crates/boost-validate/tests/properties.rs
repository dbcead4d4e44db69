//! Property tests for the engine's structural guarantees.

use std::collections::BTreeSet;

use boost_schema::InMemorySchemaStore;
use boost_validate::field::report_order;
use boost_validate::{
    EngineConfig, ErrorKind, FormatTables, ValidationEngine, ValidationError, ValidationResult,
    ValueFormatter,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn kind_strategy() -> impl Strategy<Value = ErrorKind> {
    prop::sample::select(ErrorKind::all().to_vec())
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 _-]{0,120}".prop_map(Value::String),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z@_.]{1,12}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn record_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-zA-Z@_.]{1,16}", value_strategy(), 0..12)
        .prop_map(|m| m.into_iter().collect())
}

fn closed_engine() -> ValidationEngine<InMemorySchemaStore> {
    let store = InMemorySchemaStore::new()
        .with_schema(
            "Closed",
            json!({
                "type": "object",
                "additionalProperties": false,
                "properties": {"id": {"type": "string"}}
            }),
        )
        .with_schema(
            "Sealed",
            json!({"type": "object", "additionalProperties": false}),
        )
        .with_schema(
            "SealedMetadata",
            json!({
                "type": "object",
                "properties": {
                    "metadata": {"type": "object", "additionalProperties": false}
                }
            }),
        );
    ValidationEngine::new(store)
}

proptest! {
    #[test]
    fn errors_by_kind_partitions_errors(kinds in prop::collection::vec(kind_strategy(), 0..40)) {
        let errors: Vec<ValidationError> = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| ValidationError::new(*kind, format!("f{i}"), format!("error {i}")))
            .collect();
        let result = ValidationResult::from_errors(errors.clone());

        prop_assert_eq!(result.is_valid(), errors.is_empty());
        prop_assert_eq!(result.errors_by_kind().len(), ErrorKind::all().len());

        let bucketed: usize = result.errors_by_kind().values().map(Vec::len).sum();
        prop_assert_eq!(bucketed, errors.len());
        for (kind, bucket) in result.errors_by_kind() {
            prop_assert!(bucket.iter().all(|e| e.kind == *kind));
        }
    }

    #[test]
    fn analyze_is_deterministic_and_ordered(record in record_strategy()) {
        let engine = closed_engine();
        let forward = Value::Object(record.clone());
        let reversed = Value::Object(
            record.iter().rev().map(|(k, v)| (k.clone(), v.clone())).collect(),
        );
        let result = ValidationResult::success();

        let a = engine.analyze(&forward, &result, None, None);
        let b = engine.analyze(&forward, &result, None, None);
        let c = engine.analyze(&reversed, &result, None, None);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, &c);

        for pair in a.fields.windows(2) {
            prop_assert_ne!(report_order(&pair[0], &pair[1]), std::cmp::Ordering::Greater);
        }
        let paths: BTreeSet<_> = a.fields.iter().map(|f| f.path.as_str()).collect();
        prop_assert_eq!(paths.len(), a.fields.len());
    }

    #[test]
    fn unexpected_keys_yield_one_error(names in prop::collection::btree_set("x[a-z]{1,10}", 1..8)) {
        let engine = closed_engine();
        let record = Value::Object(
            names.iter().map(|n| (n.clone(), json!(1))).collect(),
        );
        let result = engine.validate("Closed", &record);
        let extra = result.errors_of(ErrorKind::AdditionalProperty);

        prop_assert_eq!(extra.len(), 1);
        let listed: BTreeSet<&str> = extra[0].field_path.split(", ").collect();
        let expected: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn unexpected_keys_on_sealed_objects_yield_one_error(
        names in prop::collection::btree_set("x[a-z]{1,10}", 1..8),
    ) {
        let engine = closed_engine();
        let expected: BTreeSet<&str> = names.iter().map(String::as_str).collect();

        let record = Value::Object(names.iter().map(|n| (n.clone(), json!(1))).collect());
        let result = engine.validate("Sealed", &record);
        let extra = result.errors_of(ErrorKind::AdditionalProperty);
        prop_assert_eq!(extra.len(), 1);
        let listed: BTreeSet<&str> = extra[0].field_path.split(", ").collect();
        prop_assert_eq!(&listed, &expected);
        let expected_prefix = format!("Found {} unexpected", names.len());
        prop_assert!(extra[0].message.starts_with(&expected_prefix));

        let analysis = engine.analyze(&record, &result, None, None);
        prop_assert!(analysis.unmatched_errors.is_empty());
        prop_assert!(analysis.fields.iter().all(|f| f.attached_errors.len() == 1));

        let metadata: Map<String, Value> = names.iter().map(|n| (n.clone(), json!(1))).collect();
        let nested = json!({ "metadata": metadata });
        let result = engine.validate("SealedMetadata", &nested);
        let extra = result.errors_of(ErrorKind::AdditionalProperty);
        prop_assert_eq!(extra.len(), 1);
        let listed: BTreeSet<String> = extra[0].field_path.split(", ").map(str::to_string).collect();
        let qualified: BTreeSet<String> = names.iter().map(|n| format!("metadata.{n}")).collect();
        prop_assert_eq!(listed, qualified);
    }

    #[test]
    fn rendering_is_bounded(value in value_strategy(), field in "[a-zA-Z]{1,20}", max in 3usize..120) {
        let tables = FormatTables::default();
        let config = EngineConfig { max_display_len: max, ..EngineConfig::default() };
        let out = ValueFormatter::new(&tables, config).format(&value, &field);
        prop_assert!(out.chars().count() <= max, "{} > {}", out.chars().count(), max);
    }
}

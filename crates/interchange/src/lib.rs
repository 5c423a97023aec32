//! molt-interchange: JSON interchange encoding for molt values and
//! migrations.
//!
//! Values, expressions, and actions encode as `kind`-tagged JSON records; a
//! migration encodes as a flat, order-preserving array of action records,
//! optionally wrapped in a versioned [`MigrationDocument`] envelope. Every
//! variant round-trips losslessly.

pub mod deserialize;
pub mod serialize;
pub mod types;

pub use deserialize::{
    action_from_json, expr_from_json, migration_from_document, migration_from_json,
    path_from_json, value_from_json, InterchangeError,
};
pub use serialize::{
    action_to_json, expr_to_json, migration_to_document, migration_to_json, path_to_json,
    value_to_json,
};
pub use types::{MigrationDocument, FORMAT_VERSION};

// ──────────────────────────────────────────────
// Round-trip tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod round_trip_tests {
    use super::*;
    use molt_core::{Action, Migration, Path, Value, ValueExpr};

    fn sample_value() -> Value {
        Value::record([
            ("name", Value::text("John")),
            ("age", Value::present(Value::int(30))),
            ("balance", Value::decimal("10.50".parse().unwrap())),
            ("ratio", Value::float(0.5)),
            ("active", Value::bool(true)),
            ("nothing", Value::unit()),
            ("nickname", Value::absent()),
            ("status", Value::variant("Active", Value::int(2020))),
            ("tags", Value::sequence([Value::text("a"), Value::text("b")])),
            (
                "extras",
                Value::map([
                    (Value::text("k1"), Value::int(1)),
                    (Value::int(2), Value::text("non-primitive keys allowed")),
                ]),
            ),
        ])
    }

    #[test]
    fn value_round_trips_every_variant() {
        let v = sample_value();
        let encoded = value_to_json(&v);
        let decoded = value_from_json(&encoded).unwrap();
        assert_eq!(decoded, v);
    }

    #[test]
    fn record_field_order_survives_encoding() {
        let v = Value::record([
            ("z", Value::int(1)),
            ("a", Value::int(2)),
            ("m", Value::int(3)),
        ]);
        let decoded = value_from_json(&value_to_json(&v)).unwrap();
        let names: Vec<&str> = decoded
            .as_record()
            .unwrap()
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn expr_round_trips() {
        for expr in [
            ValueExpr::literal(Value::int(30)),
            ValueExpr::natural_default("Text"),
        ] {
            let decoded = expr_from_json(&expr_to_json(&expr)).unwrap();
            assert_eq!(decoded, expr);
        }
    }

    fn sample_migration() -> Migration {
        Migration::new(vec![
            Action::add_field(Path::of(["age"]), ValueExpr::literal(Value::int(30))),
            Action::drop_field_restoring(
                Path::of(["legacy"]),
                ValueExpr::natural_default("Text"),
            ),
            Action::rename_field(Path::root(), "name", "full_name"),
            Action::transform_value(Path::of(["n"]), ValueExpr::literal(Value::int(0))),
            Action::mandate(Path::of(["age"]), ValueExpr::literal(Value::int(0))),
            Action::optionalize(Path::of(["age"])),
            Action::change_type(Path::of(["n"]), ValueExpr::literal(Value::text(""))),
            Action::join(
                Path::of(["full"]),
                vec![Path::of(["first"]), Path::of(["last"])],
                ValueExpr::natural_default("Text"),
            ),
            Action::split(
                Path::of(["full"]),
                vec![Path::of(["first"]), Path::of(["last"])],
                ValueExpr::literal(Value::text("x")),
            ),
            Action::rename_case(Path::of(["status"]), "Active", "Enabled"),
            Action::transform_case(
                Path::of(["status"]),
                "Enabled",
                vec![Action::rename_field(Path::root(), "since", "year")],
            ),
            Action::transform_elements(Path::of(["tags"]), ValueExpr::literal(Value::int(0))),
            Action::transform_keys(Path::of(["extras"]), ValueExpr::literal(Value::text("k"))),
            Action::transform_values(Path::of(["extras"]), ValueExpr::literal(Value::int(0))),
        ])
    }

    #[test]
    fn migration_round_trips_every_action_variant() {
        let m = sample_migration();
        let encoded = migration_to_json(&m);
        let decoded = migration_from_json(&encoded).unwrap();
        assert_eq!(decoded, m);
    }

    #[test]
    fn migration_encodes_as_flat_ordered_array() {
        let m = sample_migration();
        let encoded = migration_to_json(&m);
        let records = encoded.as_array().unwrap();
        assert_eq!(records.len(), m.actions().len());
        let kinds: Vec<&str> = records
            .iter()
            .map(|r| r.get("kind").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(kinds[0], "add_field");
        assert_eq!(kinds[kinds.len() - 1], "transform_values");
    }

    #[test]
    fn document_envelope_round_trips_through_serde() {
        let m = sample_migration();
        let doc = migration_to_document("user_v1_to_v2", &m);
        assert_eq!(doc.format, FORMAT_VERSION);

        let text = serde_json::to_string(&doc).unwrap();
        let parsed: MigrationDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, doc);

        let decoded = migration_from_document(&parsed).unwrap();
        assert_eq!(decoded, m);
    }

    #[test]
    fn unknown_action_kind_is_an_error_not_a_skip() {
        let encoded = serde_json::json!([
            { "kind": "add_field", "path": ["a"], "default": { "kind": "literal", "value": { "kind": "int_value", "value": 1 } } },
            { "kind": "frobnicate", "path": ["b"] },
        ]);
        match migration_from_json(&encoded).unwrap_err() {
            InterchangeError::UnknownKind { kind } => assert_eq!(kind, "frobnicate"),
            other => panic!("expected UnknownKind, got: {}", other),
        }
    }

    #[test]
    fn missing_field_names_the_kind_and_field() {
        let encoded = serde_json::json!({ "kind": "rename_field", "path": [] });
        match action_from_json(&encoded).unwrap_err() {
            InterchangeError::MissingField { kind, field } => {
                assert_eq!(kind, "rename_field");
                assert_eq!(field, "from");
            }
            other => panic!("expected MissingField, got: {}", other),
        }
    }

    #[test]
    fn decoded_migration_still_applies() {
        let m = Migration::new(vec![Action::add_field(
            Path::of(["age"]),
            ValueExpr::literal(Value::int(30)),
        )]);
        let decoded = migration_from_json(&migration_to_json(&m)).unwrap();
        let v = Value::record([("name", Value::text("John"))]);
        assert_eq!(
            decoded.apply(&v).unwrap(),
            Value::record([("name", Value::text("John")), ("age", Value::int(30))])
        );
    }

    #[test]
    fn reversed_migration_round_trips_too() {
        let m = sample_migration();
        let rev = m.reverse();
        let decoded = migration_from_json(&migration_to_json(&rev)).unwrap();
        assert_eq!(decoded, rev);
    }
}

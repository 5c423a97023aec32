//! Encoding of values, expressions, actions, and migrations as `kind`-tagged
//! JSON records.
//!
//! The encoding is one chosen deployment format, not a normative wire
//! protocol: the required property is that every variant round-trips
//! losslessly and a migration serializes to a flat, order-preserving array.
//! Record fields and map entries are encoded as arrays of pairs, never JSON
//! objects, so field order survives the trip. Decimals are encoded as
//! strings to avoid binary floating point.

use molt_core::{Action, Migration, Path, PathStep, Primitive, Value, ValueExpr};

use crate::types::{MigrationDocument, FORMAT_VERSION};

/// Encode a value tree.
pub fn value_to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Primitive(p) => match p {
            Primitive::Unit => serde_json::json!({ "kind": "unit_value" }),
            Primitive::Bool(b) => serde_json::json!({ "kind": "bool_value", "value": b }),
            Primitive::Int(i) => serde_json::json!({ "kind": "int_value", "value": i }),
            Primitive::Float(x) => serde_json::json!({ "kind": "float_value", "value": x }),
            Primitive::Decimal(d) => {
                serde_json::json!({ "kind": "decimal_value", "value": d.to_string() })
            }
            Primitive::Text(s) => serde_json::json!({ "kind": "text_value", "value": s }),
        },
        Value::Record(fields) => {
            let encoded: Vec<serde_json::Value> = fields
                .iter()
                .map(|(name, value)| {
                    serde_json::json!({ "name": name, "value": value_to_json(value) })
                })
                .collect();
            serde_json::json!({ "kind": "record_value", "fields": encoded })
        }
        Value::Variant { case, payload } => serde_json::json!({
            "kind": "variant_value",
            "case": case,
            "payload": value_to_json(payload),
        }),
        Value::Sequence(elements) => {
            let encoded: Vec<serde_json::Value> = elements.iter().map(value_to_json).collect();
            serde_json::json!({ "kind": "sequence_value", "elements": encoded })
        }
        Value::Map(entries) => {
            let encoded: Vec<serde_json::Value> = entries
                .iter()
                .map(|(k, v)| {
                    serde_json::json!({ "key": value_to_json(k), "value": value_to_json(v) })
                })
                .collect();
            serde_json::json!({ "kind": "map_value", "entries": encoded })
        }
        Value::Optional(Some(inner)) => serde_json::json!({
            "kind": "optional_value",
            "present": true,
            "value": value_to_json(inner),
        }),
        Value::Optional(None) => serde_json::json!({
            "kind": "optional_value",
            "present": false,
        }),
    }
}

/// Encode a path as a flat array of field names.
pub fn path_to_json(p: &Path) -> serde_json::Value {
    let steps: Vec<serde_json::Value> = p
        .steps()
        .iter()
        .map(|step| match step {
            PathStep::Field(name) => serde_json::json!(name),
        })
        .collect();
    serde_json::Value::Array(steps)
}

/// Encode a value expression.
pub fn expr_to_json(e: &ValueExpr) -> serde_json::Value {
    match e {
        ValueExpr::Literal(value) => serde_json::json!({
            "kind": "literal",
            "value": value_to_json(value),
        }),
        ValueExpr::NaturalDefault { hint } => serde_json::json!({
            "kind": "natural_default",
            "hint": hint,
        }),
    }
}

/// Encode one action as a `kind`-tagged record.
pub fn action_to_json(a: &Action) -> serde_json::Value {
    match a {
        Action::AddField { path, default } => serde_json::json!({
            "kind": "add_field",
            "path": path_to_json(path),
            "default": expr_to_json(default),
        }),
        Action::DropField { path, restored } => serde_json::json!({
            "kind": "drop_field",
            "path": path_to_json(path),
            "restored": expr_to_json(restored),
        }),
        Action::RenameField { path, from, to } => serde_json::json!({
            "kind": "rename_field",
            "path": path_to_json(path),
            "from": from,
            "to": to,
        }),
        Action::TransformValue { path, expr } => serde_json::json!({
            "kind": "transform_value",
            "path": path_to_json(path),
            "expr": expr_to_json(expr),
        }),
        Action::Mandate { path, default } => serde_json::json!({
            "kind": "mandate",
            "path": path_to_json(path),
            "default": expr_to_json(default),
        }),
        Action::Optionalize { path } => serde_json::json!({
            "kind": "optionalize",
            "path": path_to_json(path),
        }),
        Action::ChangeType { path, expr } => serde_json::json!({
            "kind": "change_type",
            "path": path_to_json(path),
            "expr": expr_to_json(expr),
        }),
        Action::Join {
            path,
            sources,
            combiner,
        } => serde_json::json!({
            "kind": "join",
            "path": path_to_json(path),
            "sources": sources.iter().map(path_to_json).collect::<Vec<_>>(),
            "combiner": expr_to_json(combiner),
        }),
        Action::Split {
            path,
            targets,
            splitter,
        } => serde_json::json!({
            "kind": "split",
            "path": path_to_json(path),
            "targets": targets.iter().map(path_to_json).collect::<Vec<_>>(),
            "splitter": expr_to_json(splitter),
        }),
        Action::RenameCase { path, from, to } => serde_json::json!({
            "kind": "rename_case",
            "path": path_to_json(path),
            "from": from,
            "to": to,
        }),
        Action::TransformCase {
            path,
            case,
            actions,
        } => serde_json::json!({
            "kind": "transform_case",
            "path": path_to_json(path),
            "case": case,
            "actions": actions.iter().map(action_to_json).collect::<Vec<_>>(),
        }),
        Action::TransformElements { path, expr } => serde_json::json!({
            "kind": "transform_elements",
            "path": path_to_json(path),
            "expr": expr_to_json(expr),
        }),
        Action::TransformKeys { path, expr } => serde_json::json!({
            "kind": "transform_keys",
            "path": path_to_json(path),
            "expr": expr_to_json(expr),
        }),
        Action::TransformValues { path, expr } => serde_json::json!({
            "kind": "transform_values",
            "path": path_to_json(path),
            "expr": expr_to_json(expr),
        }),
    }
}

/// Encode a migration as a flat, order-preserving array of tagged records.
pub fn migration_to_json(m: &Migration) -> serde_json::Value {
    let actions: Vec<serde_json::Value> = m.actions().iter().map(action_to_json).collect();
    serde_json::Value::Array(actions)
}

/// Wrap a migration in a versioned document envelope.
pub fn migration_to_document(id: impl Into<String>, m: &Migration) -> MigrationDocument {
    MigrationDocument {
        id: id.into(),
        format: FORMAT_VERSION.to_string(),
        actions: m.actions().iter().map(action_to_json).collect(),
    }
}

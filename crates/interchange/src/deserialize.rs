//! Decoding of `kind`-tagged JSON records back into values, expressions,
//! actions, and migrations.
//!
//! Unlike formats that skip unknown record kinds for forward compatibility,
//! an unknown action kind here is an error: dropping an action from an
//! ordered migration silently changes its meaning.

use molt_core::{Action, Migration, Path, Value, ValueExpr};

use crate::types::MigrationDocument;

/// Errors during interchange JSON decoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterchangeError {
    /// A record is missing a required field.
    #[error("{kind} missing required field '{field}'")]
    MissingField { kind: String, field: String },

    /// A record's `kind` tag is not recognized.
    #[error("unknown kind '{kind}'")]
    UnknownKind { kind: String },

    /// A record has the right kind but malformed contents.
    #[error("malformed {kind}: {message}")]
    Malformed { kind: String, message: String },
}

// ── Helpers ─────────────────────────────────────────────────────────

fn kind_of(obj: &serde_json::Value) -> Result<&str, InterchangeError> {
    obj.get("kind")
        .and_then(|k| k.as_str())
        .ok_or_else(|| InterchangeError::MissingField {
            kind: "record".to_string(),
            field: "kind".to_string(),
        })
}

fn required<'a>(
    obj: &'a serde_json::Value,
    kind: &str,
    field: &str,
) -> Result<&'a serde_json::Value, InterchangeError> {
    obj.get(field).ok_or_else(|| InterchangeError::MissingField {
        kind: kind.to_string(),
        field: field.to_string(),
    })
}

fn required_str(
    obj: &serde_json::Value,
    kind: &str,
    field: &str,
) -> Result<String, InterchangeError> {
    required(obj, kind, field)?
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| InterchangeError::Malformed {
            kind: kind.to_string(),
            message: format!("'{}' must be a string", field),
        })
}

fn required_array<'a>(
    obj: &'a serde_json::Value,
    kind: &str,
    field: &str,
) -> Result<&'a Vec<serde_json::Value>, InterchangeError> {
    required(obj, kind, field)?
        .as_array()
        .ok_or_else(|| InterchangeError::Malformed {
            kind: kind.to_string(),
            message: format!("'{}' must be an array", field),
        })
}

// ── Values ──────────────────────────────────────────────────────────

/// Decode a value tree.
pub fn value_from_json(obj: &serde_json::Value) -> Result<Value, InterchangeError> {
    let kind = kind_of(obj)?;
    match kind {
        "unit_value" => Ok(Value::unit()),
        "bool_value" => {
            let b = required(obj, kind, "value")?.as_bool().ok_or_else(|| {
                InterchangeError::Malformed {
                    kind: kind.to_string(),
                    message: "'value' must be a boolean".to_string(),
                }
            })?;
            Ok(Value::bool(b))
        }
        "int_value" => {
            let i = required(obj, kind, "value")?.as_i64().ok_or_else(|| {
                InterchangeError::Malformed {
                    kind: kind.to_string(),
                    message: "'value' must be an integer".to_string(),
                }
            })?;
            Ok(Value::int(i))
        }
        "float_value" => {
            let x = required(obj, kind, "value")?.as_f64().ok_or_else(|| {
                InterchangeError::Malformed {
                    kind: kind.to_string(),
                    message: "'value' must be a number".to_string(),
                }
            })?;
            Ok(Value::float(x))
        }
        "decimal_value" => {
            let s = required_str(obj, kind, "value")?;
            let d = s
                .parse::<rust_decimal::Decimal>()
                .map_err(|e| InterchangeError::Malformed {
                    kind: kind.to_string(),
                    message: format!("invalid decimal: {}", e),
                })?;
            Ok(Value::decimal(d))
        }
        "text_value" => Ok(Value::text(required_str(obj, kind, "value")?)),
        "record_value" => {
            let mut fields = Vec::new();
            for entry in required_array(obj, kind, "fields")? {
                let name = required_str(entry, kind, "name")?;
                let value = value_from_json(required(entry, kind, "value")?)?;
                fields.push((name, value));
            }
            Ok(Value::Record(fields))
        }
        "variant_value" => {
            let case = required_str(obj, kind, "case")?;
            let payload = value_from_json(required(obj, kind, "payload")?)?;
            Ok(Value::variant(case, payload))
        }
        "sequence_value" => {
            let elements: Result<Vec<Value>, _> = required_array(obj, kind, "elements")?
                .iter()
                .map(value_from_json)
                .collect();
            Ok(Value::Sequence(elements?))
        }
        "map_value" => {
            let mut entries = Vec::new();
            for entry in required_array(obj, kind, "entries")? {
                let key = value_from_json(required(entry, kind, "key")?)?;
                let value = value_from_json(required(entry, kind, "value")?)?;
                entries.push((key, value));
            }
            Ok(Value::Map(entries))
        }
        "optional_value" => {
            let present = required(obj, kind, "present")?.as_bool().ok_or_else(|| {
                InterchangeError::Malformed {
                    kind: kind.to_string(),
                    message: "'present' must be a boolean".to_string(),
                }
            })?;
            if present {
                Ok(Value::present(value_from_json(required(obj, kind, "value")?)?))
            } else {
                Ok(Value::absent())
            }
        }
        other => Err(InterchangeError::UnknownKind {
            kind: other.to_string(),
        }),
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Decode a path from a flat array of field names.
pub fn path_from_json(obj: &serde_json::Value) -> Result<Path, InterchangeError> {
    let steps = obj.as_array().ok_or_else(|| InterchangeError::Malformed {
        kind: "path".to_string(),
        message: "path must be an array of field names".to_string(),
    })?;
    let mut names = Vec::with_capacity(steps.len());
    for step in steps {
        let name = step.as_str().ok_or_else(|| InterchangeError::Malformed {
            kind: "path".to_string(),
            message: "path steps must be strings".to_string(),
        })?;
        names.push(name);
    }
    Ok(Path::of(names))
}

// ── Expressions ─────────────────────────────────────────────────────

/// Decode a value expression.
pub fn expr_from_json(obj: &serde_json::Value) -> Result<ValueExpr, InterchangeError> {
    let kind = kind_of(obj)?;
    match kind {
        "literal" => Ok(ValueExpr::Literal(value_from_json(required(
            obj, kind, "value",
        )?)?)),
        "natural_default" => Ok(ValueExpr::NaturalDefault {
            hint: required_str(obj, kind, "hint")?,
        }),
        other => Err(InterchangeError::UnknownKind {
            kind: other.to_string(),
        }),
    }
}

// ── Actions ─────────────────────────────────────────────────────────

fn paths_from_json(
    obj: &serde_json::Value,
    kind: &str,
    field: &str,
) -> Result<Vec<Path>, InterchangeError> {
    required_array(obj, kind, field)?
        .iter()
        .map(path_from_json)
        .collect()
}

/// Decode one action record.
pub fn action_from_json(obj: &serde_json::Value) -> Result<Action, InterchangeError> {
    let kind = kind_of(obj)?;
    let path = path_from_json(required(obj, kind, "path")?)?;
    match kind {
        "add_field" => Ok(Action::AddField {
            path,
            default: expr_from_json(required(obj, kind, "default")?)?,
        }),
        "drop_field" => Ok(Action::DropField {
            path,
            restored: expr_from_json(required(obj, kind, "restored")?)?,
        }),
        "rename_field" => Ok(Action::RenameField {
            path,
            from: required_str(obj, kind, "from")?,
            to: required_str(obj, kind, "to")?,
        }),
        "transform_value" => Ok(Action::TransformValue {
            path,
            expr: expr_from_json(required(obj, kind, "expr")?)?,
        }),
        "mandate" => Ok(Action::Mandate {
            path,
            default: expr_from_json(required(obj, kind, "default")?)?,
        }),
        "optionalize" => Ok(Action::Optionalize { path }),
        "change_type" => Ok(Action::ChangeType {
            path,
            expr: expr_from_json(required(obj, kind, "expr")?)?,
        }),
        "join" => Ok(Action::Join {
            path,
            sources: paths_from_json(obj, kind, "sources")?,
            combiner: expr_from_json(required(obj, kind, "combiner")?)?,
        }),
        "split" => Ok(Action::Split {
            path,
            targets: paths_from_json(obj, kind, "targets")?,
            splitter: expr_from_json(required(obj, kind, "splitter")?)?,
        }),
        "rename_case" => Ok(Action::RenameCase {
            path,
            from: required_str(obj, kind, "from")?,
            to: required_str(obj, kind, "to")?,
        }),
        "transform_case" => {
            let actions: Result<Vec<Action>, _> = required_array(obj, kind, "actions")?
                .iter()
                .map(action_from_json)
                .collect();
            Ok(Action::TransformCase {
                path,
                case: required_str(obj, kind, "case")?,
                actions: actions?,
            })
        }
        "transform_elements" => Ok(Action::TransformElements {
            path,
            expr: expr_from_json(required(obj, kind, "expr")?)?,
        }),
        "transform_keys" => Ok(Action::TransformKeys {
            path,
            expr: expr_from_json(required(obj, kind, "expr")?)?,
        }),
        "transform_values" => Ok(Action::TransformValues {
            path,
            expr: expr_from_json(required(obj, kind, "expr")?)?,
        }),
        other => Err(InterchangeError::UnknownKind {
            kind: other.to_string(),
        }),
    }
}

// ── Migrations ──────────────────────────────────────────────────────

/// Decode a migration from a flat array of tagged action records.
pub fn migration_from_json(obj: &serde_json::Value) -> Result<Migration, InterchangeError> {
    let records = obj.as_array().ok_or_else(|| InterchangeError::Malformed {
        kind: "migration".to_string(),
        message: "migration must be an array of actions".to_string(),
    })?;
    let actions: Result<Vec<Action>, _> = records.iter().map(action_from_json).collect();
    Ok(Migration::new(actions?))
}

/// Decode a migration from its document envelope.
pub fn migration_from_document(doc: &MigrationDocument) -> Result<Migration, InterchangeError> {
    let actions: Result<Vec<Action>, _> = doc.actions.iter().map(action_from_json).collect();
    Ok(Migration::new(actions?))
}

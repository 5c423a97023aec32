//! Migration application, composition, and reversal.
//!
//! A [`Migration`] is an ordered list of actions, applied left to right with
//! a short-circuiting fold: the first failing action aborts the whole call
//! and no later action runs. Later actions may depend on the field set
//! produced by earlier ones, so the list is never reordered or parallelized.
//!
//! Every edit rebuilds only the spine of the tree along the action's path;
//! untouched subtrees are shared with the input. The engine keeps no state
//! between calls -- `apply` is a pure function of (migration, input).

use crate::action::Action;
use crate::error::MigrationError;
use crate::expr::{DefaultProvider, NoDefaults, ValueExpr};
use crate::path::{Path, PathStep};
use crate::value::{field_position, Value};

// ──────────────────────────────────────────────
// Migration
// ──────────────────────────────────────────────

/// An ordered, possibly empty list of edit actions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Migration {
    actions: Vec<Action>,
}

impl Migration {
    /// The empty migration. `apply(identity(), v) == Ok(v)` for every value.
    pub fn identity() -> Migration {
        Migration {
            actions: Vec::new(),
        }
    }

    pub fn new(actions: Vec<Action>) -> Migration {
        Migration { actions }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn is_identity(&self) -> bool {
        self.actions.is_empty()
    }

    /// Sequential composition: this migration's actions followed by
    /// `other`'s. Plain list concatenation -- adjacent actions are never
    /// merged or canceled, which keeps composition associative.
    pub fn compose(mut self, other: Migration) -> Migration {
        self.actions.extend(other.actions);
        self
    }

    /// Alias of [`compose`](Self::compose) for fluent chaining.
    pub fn then(self, other: Migration) -> Migration {
        self.compose(other)
    }

    /// Structural reversal: reverse the action order, then reverse each
    /// action. Reversing twice reproduces the original list exactly.
    /// This does not promise a semantic round trip -- lossy actions reverse
    /// to themselves.
    pub fn reverse(&self) -> Migration {
        Migration {
            actions: self.actions.iter().rev().map(Action::reverse).collect(),
        }
    }

    /// Applies the action list to `value` with no natural-default provider:
    /// any `NaturalDefault` expression fails.
    pub fn apply(&self, value: &Value) -> Result<Value, MigrationError> {
        self.apply_with_defaults(value, &NoDefaults)
    }

    /// Applies the action list to `value`, resolving natural defaults
    /// through `defaults`. The fold's accumulator has exactly two states,
    /// `Ok(value)` and `Err(error)`, with `Err` absorbing.
    pub fn apply_with_defaults(
        &self,
        value: &Value,
        defaults: &dyn DefaultProvider,
    ) -> Result<Value, MigrationError> {
        let mut current = value.clone();
        for action in &self.actions {
            current = run_action(action, &current, defaults)?;
        }
        Ok(current)
    }
}

impl From<Vec<Action>> for Migration {
    fn from(actions: Vec<Action>) -> Migration {
        Migration { actions }
    }
}

// ──────────────────────────────────────────────
// Path resolution
// ──────────────────────────────────────────────

fn type_mismatch(path: Path, expected: &'static str, actual: &Value) -> MigrationError {
    MigrationError::TypeMismatch {
        path,
        expected,
        actual: actual.type_name(),
    }
}

/// Read-only walk to the value addressed by `path`. Field steps descend
/// through records only.
fn resolve<'a>(value: &'a Value, path: &Path) -> Result<&'a Value, MigrationError> {
    let mut current = value;
    for (i, step) in path.steps().iter().enumerate() {
        let PathStep::Field(name) = step;
        match current {
            Value::Record(fields) => match fields.iter().find(|(n, _)| n == name) {
                Some((_, v)) => current = v,
                None => {
                    return Err(MigrationError::PathNotFound {
                        path: path.truncated(i + 1),
                    })
                }
            },
            other => return Err(type_mismatch(path.truncated(i), "Record", other)),
        }
    }
    Ok(current)
}

/// Navigates the first `upto` steps of `path`, applies `f` to the value
/// found there, and rebuilds the record spine above it. Only the nodes on
/// the path are copied; siblings are shared with the input.
fn rebuild_at(
    value: &Value,
    path: &Path,
    upto: usize,
    f: &mut dyn FnMut(&Value) -> Result<Value, MigrationError>,
) -> Result<Value, MigrationError> {
    rebuild_from(value, path, 0, upto, f)
}

fn rebuild_from(
    value: &Value,
    path: &Path,
    idx: usize,
    upto: usize,
    f: &mut dyn FnMut(&Value) -> Result<Value, MigrationError>,
) -> Result<Value, MigrationError> {
    if idx >= upto {
        return f(value);
    }
    let PathStep::Field(name) = &path.steps()[idx];
    match value {
        Value::Record(fields) => match field_position(fields, name) {
            Some(i) => {
                let rebuilt = rebuild_from(&fields[i].1, path, idx + 1, upto, f)?;
                let mut out = fields.clone();
                out[i].1 = rebuilt;
                Ok(Value::Record(out))
            }
            None => Err(MigrationError::PathNotFound {
                path: path.truncated(idx + 1),
            }),
        },
        other => Err(type_mismatch(path.truncated(idx), "Record", other)),
    }
}

/// Navigates to the record containing the final field of `path` and applies
/// `f` to its field list.
fn edit_parent_fields(
    value: &Value,
    path: &Path,
    f: &mut dyn FnMut(&[(String, Value)]) -> Result<Vec<(String, Value)>, MigrationError>,
) -> Result<Value, MigrationError> {
    let parent_len = path.len().saturating_sub(1);
    rebuild_at(value, path, parent_len, &mut |v| match v {
        Value::Record(fields) => Ok(Value::Record(f(fields)?)),
        other => Err(type_mismatch(path.truncated(parent_len), "Record", other)),
    })
}

/// The final field name of a single-field action's path.
fn require_last_field(path: &Path) -> Result<&str, MigrationError> {
    path.last_field_name()
        .ok_or_else(|| MigrationError::InvalidOperation {
            path: path.clone(),
            reason: "path must end in a field name".to_string(),
        })
}

/// Collect-all pass for fan-out actions: every element is visited, every
/// failure is kept in element order, and any failure at all aggregates into
/// `MultipleErrors`. This must never short-circuit at the first element.
fn map_all<'a>(
    items: impl Iterator<Item = &'a Value>,
    mut f: impl FnMut(&Value) -> Result<Value, MigrationError>,
) -> Result<Vec<Value>, MigrationError> {
    let mut out = Vec::new();
    let mut errors = Vec::new();
    for item in items {
        match f(item) {
            Ok(v) => out.push(v),
            Err(e) => errors.push(e),
        }
    }
    if errors.is_empty() {
        Ok(out)
    } else {
        Err(MigrationError::MultipleErrors(errors))
    }
}

// ──────────────────────────────────────────────
// Action application
// ──────────────────────────────────────────────

fn run_action(
    action: &Action,
    root: &Value,
    defaults: &dyn DefaultProvider,
) -> Result<Value, MigrationError> {
    match action {
        Action::AddField { path, default } => {
            let field = require_last_field(path)?;
            edit_parent_fields(root, path, &mut |fields| {
                if field_position(fields, field).is_some() {
                    return Err(MigrationError::InvalidOperation {
                        path: path.clone(),
                        reason: format!("field '{}' already exists", field),
                    });
                }
                let produced = default.produce(root, path, defaults)?;
                let mut out = fields.to_vec();
                out.push((field.to_string(), produced));
                Ok(out)
            })
        }

        // `restored` only matters to the reverse add.
        Action::DropField { path, restored: _ } => {
            let field = require_last_field(path)?;
            edit_parent_fields(root, path, &mut |fields| match field_position(fields, field) {
                Some(i) => {
                    let mut out = fields.to_vec();
                    out.remove(i);
                    Ok(out)
                }
                None => Err(MigrationError::PathNotFound { path: path.clone() }),
            })
        }

        Action::RenameField { path, from, to } => {
            rebuild_at(root, path, path.len(), &mut |v| match v {
                Value::Record(fields) => {
                    let from_idx = field_position(fields, from).ok_or_else(|| {
                        MigrationError::PathNotFound {
                            path: path.clone().field(from.as_str()),
                        }
                    })?;
                    if field_position(fields, to).is_some() {
                        return Err(MigrationError::InvalidOperation {
                            path: path.clone().field(to.as_str()),
                            reason: format!("field '{}' already exists", to),
                        });
                    }
                    let mut out = fields.clone();
                    out[from_idx].0 = to.clone();
                    Ok(Value::Record(out))
                }
                other => Err(type_mismatch(path.clone(), "Record", other)),
            })
        }

        Action::TransformValue { path, expr } | Action::ChangeType { path, expr } => {
            let field = require_last_field(path)?;
            edit_parent_fields(root, path, &mut |fields| {
                let i = field_position(fields, field)
                    .ok_or_else(|| MigrationError::PathNotFound { path: path.clone() })?;
                let mut out = fields.to_vec();
                out[i].1 = expr.map_over(&out[i].1, root, path, defaults)?;
                Ok(out)
            })
        }

        Action::Mandate { path, default } => {
            let field = require_last_field(path)?;
            edit_parent_fields(root, path, &mut |fields| {
                let i = field_position(fields, field)
                    .ok_or_else(|| MigrationError::PathNotFound { path: path.clone() })?;
                let mut out = fields.to_vec();
                out[i].1 = match &out[i].1 {
                    Value::Optional(Some(inner)) => (**inner).clone(),
                    // Absent and no producible default: the field is now
                    // mandatory and has no value at all.
                    Value::Optional(None) => default
                        .produce(root, path, defaults)
                        .map_err(|_| MigrationError::MandatoryFieldMissing { path: path.clone() })?,
                    other => return Err(type_mismatch(path.clone(), "Optional", other)),
                };
                Ok(out)
            })
        }

        Action::Optionalize { path } => {
            let field = require_last_field(path)?;
            edit_parent_fields(root, path, &mut |fields| {
                let i = field_position(fields, field)
                    .ok_or_else(|| MigrationError::PathNotFound { path: path.clone() })?;
                let mut out = fields.to_vec();
                out[i].1 = Value::present(out[i].1.clone());
                Ok(out)
            })
        }

        Action::Join {
            path,
            sources,
            combiner,
        } => run_join(root, path, sources, combiner, defaults),

        Action::Split {
            path,
            targets,
            splitter,
        } => run_split(root, path, targets, splitter, defaults),

        Action::RenameCase { path, from, to } => {
            rebuild_at(root, path, path.len(), &mut |v| match v {
                Value::Variant { case, payload } => {
                    if case == from {
                        Ok(Value::Variant {
                            case: to.clone(),
                            payload: payload.clone(),
                        })
                    } else {
                        Ok(v.clone())
                    }
                }
                other => Err(type_mismatch(path.clone(), "Variant", other)),
            })
        }

        Action::TransformCase {
            path,
            case,
            actions,
        } => {
            rebuild_at(root, path, path.len(), &mut |v| match v {
                Value::Variant {
                    case: active,
                    payload,
                } => {
                    if active == case {
                        // Drill into the payload: the nested list runs as a
                        // migration of its own, with the payload as root.
                        let nested = Migration::new(actions.clone());
                        let migrated = nested.apply_with_defaults(payload, defaults)?;
                        Ok(Value::Variant {
                            case: active.clone(),
                            payload: Box::new(migrated),
                        })
                    } else {
                        Ok(v.clone())
                    }
                }
                other => Err(type_mismatch(path.clone(), "Variant", other)),
            })
        }

        Action::TransformElements { path, expr } => {
            rebuild_at(root, path, path.len(), &mut |v| match v {
                Value::Sequence(elements) => {
                    let mapped = map_all(elements.iter(), |e| {
                        expr.map_over(e, root, path, defaults)
                    })?;
                    Ok(Value::Sequence(mapped))
                }
                other => Err(type_mismatch(path.clone(), "Sequence", other)),
            })
        }

        Action::TransformKeys { path, expr } => {
            rebuild_at(root, path, path.len(), &mut |v| match v {
                Value::Map(entries) => {
                    let keys = map_all(entries.iter().map(|(k, _)| k), |k| {
                        expr.map_over(k, root, path, defaults)
                    })?;
                    let out = keys
                        .into_iter()
                        .zip(entries.iter().map(|(_, v)| v.clone()))
                        .collect();
                    Ok(Value::Map(out))
                }
                other => Err(type_mismatch(path.clone(), "Map", other)),
            })
        }

        Action::TransformValues { path, expr } => {
            rebuild_at(root, path, path.len(), &mut |v| match v {
                Value::Map(entries) => {
                    let values = map_all(entries.iter().map(|(_, v)| v), |v| {
                        expr.map_over(v, root, path, defaults)
                    })?;
                    let out = entries
                        .iter()
                        .map(|(k, _)| k.clone())
                        .zip(values)
                        .collect();
                    Ok(Value::Map(out))
                }
                other => Err(type_mismatch(path.clone(), "Map", other)),
            })
        }
    }
}

/// Join: collect every source value first (the combiner sees the
/// pre-removal state), evaluate the combiner over the ordered collection,
/// then remove the sources and insert the combined field.
fn run_join(
    root: &Value,
    path: &Path,
    sources: &[Path],
    combiner: &ValueExpr,
    defaults: &dyn DefaultProvider,
) -> Result<Value, MigrationError> {
    let field = require_last_field(path)?;

    let mut collected = Vec::with_capacity(sources.len());
    for source in sources {
        require_last_field(source)?;
        collected.push(resolve(root, source)?.clone());
    }

    let combined = combiner.map_over(&Value::Sequence(collected), root, path, defaults)?;

    let mut current = root.clone();
    for source in sources {
        let source_field = source.last_field_name().unwrap_or_default().to_string();
        current = edit_parent_fields(&current, source, &mut |fields| {
            match field_position(fields, &source_field) {
                Some(i) => {
                    let mut out = fields.to_vec();
                    out.remove(i);
                    Ok(out)
                }
                None => Err(MigrationError::PathNotFound {
                    path: source.clone(),
                }),
            }
        })?;
    }

    edit_parent_fields(&current, path, &mut |fields| {
        if field_position(fields, field).is_some() {
            return Err(MigrationError::InvalidOperation {
                path: path.clone(),
                reason: format!("field '{}' already exists", field),
            });
        }
        let mut out = fields.to_vec();
        out.push((field.to_string(), combined.clone()));
        Ok(out)
    })
}

/// Split: evaluate the splitter against the source value once per target
/// path, remove the source, insert the targets in order.
fn run_split(
    root: &Value,
    path: &Path,
    targets: &[Path],
    splitter: &ValueExpr,
    defaults: &dyn DefaultProvider,
) -> Result<Value, MigrationError> {
    let source_field = require_last_field(path)?;
    let source_value = resolve(root, path)?.clone();

    let mut current = edit_parent_fields(root, path, &mut |fields| {
        match field_position(fields, source_field) {
            Some(i) => {
                let mut out = fields.to_vec();
                out.remove(i);
                Ok(out)
            }
            None => Err(MigrationError::PathNotFound { path: path.clone() }),
        }
    })?;

    for target in targets {
        let target_field = require_last_field(target)?;
        let produced = splitter.map_over(&source_value, root, target, defaults)?;
        current = edit_parent_fields(&current, target, &mut |fields| {
            if field_position(fields, target_field).is_some() {
                return Err(MigrationError::InvalidOperation {
                    path: target.clone(),
                    reason: format!("field '{}' already exists", target_field),
                });
            }
            let mut out = fields.to_vec();
            out.push((target_field.to_string(), produced.clone()));
            Ok(out)
        })?;
    }

    Ok(current)
}

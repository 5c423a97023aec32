//! The edit-action catalogue.
//!
//! Each action is immutable data carrying the path it operates on plus any
//! secondary inputs, and knows its own structural reverse. Reversal is
//! syntactic, not semantic: `a.reverse().reverse() == a` always holds, but
//! applying an action and then its reverse is not guaranteed to restore the
//! input for lossy or data-narrowing actions.
//!
//! Application semantics live in [`crate::engine`]; this module only defines
//! the data and the reversal table.

use crate::expr::ValueExpr;
use crate::path::Path;

/// One declarative edit step.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Insert a new field at the end of a record's field list, produced from
    /// the default expression. The path's final step names the field.
    AddField { path: Path, default: ValueExpr },
    /// Remove a field. `restored` is the expression a reverse-add would use
    /// to recreate the field; it plays no part in forward application.
    DropField { path: Path, restored: ValueExpr },
    /// Rename field `from` to `to` in the record at `path`, preserving its
    /// position in the field list.
    RenameField { path: Path, from: String, to: String },
    /// Replace a field's value with the expression mapped over it.
    TransformValue { path: Path, expr: ValueExpr },
    /// Unwrap an Optional field: `Present(v)` becomes `v`, `Absent` is
    /// replaced by the produced default.
    Mandate { path: Path, default: ValueExpr },
    /// Wrap a field's value as `Optional::Present`.
    Optionalize { path: Path },
    /// Replace a field's value with the expression mapped over it. Kept
    /// distinct from `TransformValue` so migration histories record intent:
    /// a retype rather than an in-type rewrite.
    ChangeType { path: Path, expr: ValueExpr },
    /// Collect the source fields, evaluate the combiner over the ordered
    /// sequence of their values, remove the sources, and insert the result
    /// under the path's field name.
    Join {
        path: Path,
        sources: Vec<Path>,
        combiner: ValueExpr,
    },
    /// Evaluate the splitter against the source field's value once per
    /// target path, remove the source, and insert the targets in order.
    Split {
        path: Path,
        targets: Vec<Path>,
        splitter: ValueExpr,
    },
    /// Rename the active case of the variant at `path` if it equals `from`;
    /// other cases pass through unchanged.
    RenameCase { path: Path, from: String, to: String },
    /// Run a nested action list against the payload of the variant at
    /// `path` when its active case matches; other cases pass through.
    TransformCase {
        path: Path,
        case: String,
        actions: Vec<Action>,
    },
    /// Map the expression over every element of the sequence at `path`,
    /// collecting all per-element failures.
    TransformElements { path: Path, expr: ValueExpr },
    /// Map the expression over every key of the map at `path`, values
    /// unchanged.
    TransformKeys { path: Path, expr: ValueExpr },
    /// Map the expression over every value of the map at `path`, keys
    /// unchanged.
    TransformValues { path: Path, expr: ValueExpr },
}

impl Action {
    // ── Constructors ────────────────────────────────────────────────

    pub fn add_field(path: Path, default: ValueExpr) -> Action {
        Action::AddField { path, default }
    }

    /// Drop a field whose old value the caller does not track: the reverse
    /// add falls back to the natural default keyed by the field name.
    pub fn drop_field(path: Path) -> Action {
        let hint = path.last_field_name().unwrap_or_default().to_string();
        Action::DropField {
            path,
            restored: ValueExpr::NaturalDefault { hint },
        }
    }

    /// Drop a field, recording the expression a reverse-add should use.
    pub fn drop_field_restoring(path: Path, restored: ValueExpr) -> Action {
        Action::DropField { path, restored }
    }

    pub fn rename_field(path: Path, from: impl Into<String>, to: impl Into<String>) -> Action {
        Action::RenameField {
            path,
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn transform_value(path: Path, expr: ValueExpr) -> Action {
        Action::TransformValue { path, expr }
    }

    pub fn mandate(path: Path, default: ValueExpr) -> Action {
        Action::Mandate { path, default }
    }

    pub fn optionalize(path: Path) -> Action {
        Action::Optionalize { path }
    }

    pub fn change_type(path: Path, expr: ValueExpr) -> Action {
        Action::ChangeType { path, expr }
    }

    pub fn join(path: Path, sources: Vec<Path>, combiner: ValueExpr) -> Action {
        Action::Join {
            path,
            sources,
            combiner,
        }
    }

    pub fn split(path: Path, targets: Vec<Path>, splitter: ValueExpr) -> Action {
        Action::Split {
            path,
            targets,
            splitter,
        }
    }

    pub fn rename_case(path: Path, from: impl Into<String>, to: impl Into<String>) -> Action {
        Action::RenameCase {
            path,
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn transform_case(path: Path, case: impl Into<String>, actions: Vec<Action>) -> Action {
        Action::TransformCase {
            path,
            case: case.into(),
            actions,
        }
    }

    pub fn transform_elements(path: Path, expr: ValueExpr) -> Action {
        Action::TransformElements { path, expr }
    }

    pub fn transform_keys(path: Path, expr: ValueExpr) -> Action {
        Action::TransformKeys { path, expr }
    }

    pub fn transform_values(path: Path, expr: ValueExpr) -> Action {
        Action::TransformValues { path, expr }
    }

    // ── Structural reversal ─────────────────────────────────────────

    /// The structural reverse of this action.
    ///
    /// Paired actions swap roles: add/drop exchange the default and the
    /// value-for-reverse, renames swap `from`/`to`, join/split swap source
    /// and target paths, and a case transform reverses its nested list.
    /// Actions with no generic inverse -- value transforms, retypes,
    /// optionality changes, collection maps -- are their own reverse, so
    /// reversing twice always reproduces the original action.
    pub fn reverse(&self) -> Action {
        match self {
            Action::AddField { path, default } => Action::DropField {
                path: path.clone(),
                restored: default.clone(),
            },
            Action::DropField { path, restored } => Action::AddField {
                path: path.clone(),
                default: restored.clone(),
            },
            Action::RenameField { path, from, to } => Action::RenameField {
                path: path.clone(),
                from: to.clone(),
                to: from.clone(),
            },
            Action::Join {
                path,
                sources,
                combiner,
            } => Action::Split {
                path: path.clone(),
                targets: sources.clone(),
                splitter: combiner.clone(),
            },
            Action::Split {
                path,
                targets,
                splitter,
            } => Action::Join {
                path: path.clone(),
                sources: targets.clone(),
                combiner: splitter.clone(),
            },
            Action::RenameCase { path, from, to } => Action::RenameCase {
                path: path.clone(),
                from: to.clone(),
                to: from.clone(),
            },
            Action::TransformCase {
                path,
                case,
                actions,
            } => Action::TransformCase {
                path: path.clone(),
                case: case.clone(),
                actions: actions.iter().rev().map(Action::reverse).collect(),
            },
            // Self-inverse: no structural counterpart can recover what the
            // forward application discarded.
            Action::TransformValue { .. }
            | Action::Mandate { .. }
            | Action::Optionalize { .. }
            | Action::ChangeType { .. }
            | Action::TransformElements { .. }
            | Action::TransformKeys { .. }
            | Action::TransformValues { .. } => self.clone(),
        }
    }

    /// The path this action resolves first.
    pub fn path(&self) -> &Path {
        match self {
            Action::AddField { path, .. }
            | Action::DropField { path, .. }
            | Action::RenameField { path, .. }
            | Action::TransformValue { path, .. }
            | Action::Mandate { path, .. }
            | Action::Optionalize { path }
            | Action::ChangeType { path, .. }
            | Action::Join { path, .. }
            | Action::Split { path, .. }
            | Action::RenameCase { path, .. }
            | Action::TransformCase { path, .. }
            | Action::TransformElements { path, .. }
            | Action::TransformKeys { path, .. }
            | Action::TransformValues { path, .. } => path,
        }
    }
}

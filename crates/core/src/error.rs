//! Migration failure taxonomy.
//!
//! Every non-aggregate error carries the [`Path`] at which it was detected.
//! `MultipleErrors` is the sole aggregation case, produced only by the
//! collection fan-out actions, which collect all per-element failures in
//! element order instead of stopping at the first one.

use std::fmt;

use crate::path::Path;

/// An error produced while applying a migration to a value.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationError {
    /// The path does not resolve to an existing location.
    PathNotFound { path: Path },
    /// The value at the path has the wrong shape for the action.
    TypeMismatch {
        path: Path,
        expected: &'static str,
        actual: &'static str,
    },
    /// A value expression failed to evaluate.
    TransformationFailed { path: Path, reason: String },
    /// A field made mandatory has no value and no resolvable default.
    MandatoryFieldMissing { path: Path },
    /// The action itself is malformed for this use, e.g. its path does not
    /// end in a field name where one is required.
    InvalidOperation { path: Path, reason: String },
    /// Independent failures from a fan-out action, in element order.
    MultipleErrors(Vec<MigrationError>),
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationError::PathNotFound { path } => {
                write!(f, "path not found: '{}'", path)
            }
            MigrationError::TypeMismatch {
                path,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "type mismatch at '{}': expected {}, got {}",
                    path, expected, actual
                )
            }
            MigrationError::TransformationFailed { path, reason } => {
                write!(f, "transformation failed at '{}': {}", path, reason)
            }
            MigrationError::MandatoryFieldMissing { path } => {
                write!(f, "mandatory field missing at '{}'", path)
            }
            MigrationError::InvalidOperation { path, reason } => {
                write!(f, "invalid operation at '{}': {}", path, reason)
            }
            MigrationError::MultipleErrors(errors) => {
                write!(f, "{} errors:", errors.len())?;
                for e in errors {
                    write!(f, " [{}]", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for MigrationError {}

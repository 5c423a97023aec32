//! Typed façade over the engine.
//!
//! The engine only ever sees generic value trees. The façade is the
//! composition root that converts a native value into a tree through a codec
//! collaborator, runs the migration, and converts the result back into the
//! target native type, mapping codec failures into the engine's error model.
//! Codecs are supplied by the surrounding system; this module owns only the
//! trait boundary.

use std::fmt;

use crate::engine::Migration;
use crate::error::MigrationError;
use crate::expr::{DefaultProvider, NoDefaults};
use crate::path::Path;
use crate::value::Value;

/// Failure reported by a codec while decoding a migrated tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    pub message: String,
}

impl CodecError {
    pub fn new(message: impl Into<String>) -> CodecError {
        CodecError {
            message: message.into(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CodecError {}

/// Encodes a native value as a generic tree. Encoding is total: a native
/// value always has a tree representation.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Decodes a generic tree back into a native value.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, CodecError>;
}

// The identity codec: a tree is its own representation. Lets callers mix
// typed and untyped endpoints.
impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Value, CodecError> {
        Ok(value.clone())
    }
}

/// Encodes `input`, applies `migration`, and decodes the result.
///
/// A decode failure surfaces as `TransformationFailed` at the root path --
/// the migrated tree as a whole did not match the target shape.
pub fn migrate<A, B>(migration: &Migration, input: &A) -> Result<B, MigrationError>
where
    A: ToValue,
    B: FromValue,
{
    migrate_with_defaults(migration, input, &NoDefaults)
}

/// Same as [`migrate`], resolving natural defaults through `defaults`.
pub fn migrate_with_defaults<A, B>(
    migration: &Migration,
    input: &A,
    defaults: &dyn DefaultProvider,
) -> Result<B, MigrationError>
where
    A: ToValue,
    B: FromValue,
{
    let tree = input.to_value();
    let migrated = migration.apply_with_defaults(&tree, defaults)?;
    B::from_value(&migrated).map_err(|e| MigrationError::TransformationFailed {
        path: Path::root(),
        reason: format!("decoding migrated value failed: {}", e),
    })
}

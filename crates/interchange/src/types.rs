//! Typed envelope for serialized migrations.

use serde::{Deserialize, Serialize};

/// Interchange format version written into every document.
pub const FORMAT_VERSION: &str = "1.0";

/// A serialized migration: an identifier, the format version, and the flat,
/// order-preserving list of `kind`-tagged action records. Actions are kept
/// as raw JSON here -- the typed decoding lives in
/// [`crate::deserialize::migration_from_document`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MigrationDocument {
    /// Caller-chosen identifier, e.g. "user_v1_to_v2".
    pub id: String,
    /// Interchange format version (e.g. "1.0").
    pub format: String,
    /// The ordered action list as tagged JSON records.
    pub actions: Vec<serde_json::Value>,
}

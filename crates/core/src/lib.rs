//! molt-core: schema-evolution migration engine.
//!
//! Evolves values conforming to one structural shape into values conforming
//! to another by applying a declarative, serializable list of edit actions
//! to a generic tagged value tree. The action list is plain data -- it can
//! be stored, inspected, concatenated, and structurally reversed -- never
//! executable code.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root:
//!
//! - [`Value`] / [`Primitive`] -- the generic value tree
//! - [`Path`] -- navigation into a tree
//! - [`ValueExpr`] / [`DefaultProvider`] -- the two-variant expression algebra
//! - [`Action`] -- the edit-action catalogue
//! - [`Migration`] -- the ordered action list; `apply`, `compose`, `reverse`
//! - [`MigrationError`] -- the failure taxonomy
//! - [`migrate()`] -- the typed façade over codec collaborators

pub mod action;
pub mod engine;
pub mod error;
pub mod expr;
pub mod facade;
pub mod path;
pub mod value;

// ── Convenience re-exports ───────────────────────────────────────────

pub use action::Action;
pub use engine::Migration;
pub use error::MigrationError;
pub use expr::{DefaultProvider, NoDefaults, ValueExpr};
pub use facade::{migrate, migrate_with_defaults, CodecError, FromValue, ToValue};
pub use path::{Path, PathStep};
pub use value::{Primitive, Value};

// ──────────────────────────────────────────────
// Integration tests
// ──────────────────────────────────────────────

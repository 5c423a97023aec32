//! The value-expression algebra.
//!
//! An expression is data, never a host-language closure -- migrations must
//! stay serializable and inspectable. The algebra is deliberately closed at
//! two variants: a literal replacement value, or a deferral to the receiving
//! location's natural default. Natural defaults are resolved through an
//! injected [`DefaultProvider`] keyed by a type-descriptor hint; the engine
//! itself knows nothing about native types.

use crate::error::MigrationError;
use crate::path::Path;
use crate::value::Value;

/// A declarative recipe for producing or replacing a value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    /// A precomputed value substituted as-is, ignoring context.
    Literal(Value),
    /// Defer to the receiving location's default-value rule. The hint names
    /// the statically known target type and keys the provider lookup.
    NaturalDefault { hint: String },
}

/// Resolves natural defaults for type-descriptor hints.
///
/// Implemented by the codec collaborator that knows the target schema; the
/// engine only carries the lookup boundary.
pub trait DefaultProvider {
    fn default_for(&self, hint: &str) -> Option<Value>;
}

/// The provider that resolves nothing. Used by [`Migration::apply`] when no
/// provider is injected: every `NaturalDefault` fails.
///
/// [`Migration::apply`]: crate::engine::Migration::apply
pub struct NoDefaults;

impl DefaultProvider for NoDefaults {
    fn default_for(&self, _hint: &str) -> Option<Value> {
        None
    }
}

impl ValueExpr {
    pub fn literal(value: Value) -> ValueExpr {
        ValueExpr::Literal(value)
    }

    pub fn natural_default(hint: impl Into<String>) -> ValueExpr {
        ValueExpr::NaturalDefault { hint: hint.into() }
    }

    /// Evaluates this expression as a producer -- no prior value exists at
    /// the receiving location.
    pub fn produce(
        &self,
        _context: &Value,
        at: &Path,
        defaults: &dyn DefaultProvider,
    ) -> Result<Value, MigrationError> {
        match self {
            ValueExpr::Literal(value) => Ok(value.clone()),
            ValueExpr::NaturalDefault { hint } => {
                defaults
                    .default_for(hint)
                    .ok_or_else(|| MigrationError::TransformationFailed {
                        path: at.clone(),
                        reason: format!("no natural default for type '{}'", hint),
                    })
            }
        }
    }

    /// Evaluates this expression as a map over an existing value. Both
    /// variants reduce to the same cases as [`produce`](Self::produce):
    /// a literal ignores the current value, a natural default replaces it.
    pub fn map_over(
        &self,
        _current: &Value,
        context: &Value,
        at: &Path,
        defaults: &dyn DefaultProvider,
    ) -> Result<Value, MigrationError> {
        self.produce(context, at, defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct IntDefaults;

    impl DefaultProvider for IntDefaults {
        fn default_for(&self, hint: &str) -> Option<Value> {
            (hint == "Int").then(|| Value::int(0))
        }
    }

    #[test]
    fn literal_ignores_context() {
        let expr = ValueExpr::literal(Value::int(30));
        let ctx = Value::record([("name", Value::text("John"))]);
        let out = expr.produce(&ctx, &Path::root(), &NoDefaults).unwrap();
        assert_eq!(out, Value::int(30));

        let mapped = expr
            .map_over(&Value::text("old"), &ctx, &Path::root(), &NoDefaults)
            .unwrap();
        assert_eq!(mapped, Value::int(30));
    }

    #[test]
    fn natural_default_resolves_through_provider() {
        let expr = ValueExpr::natural_default("Int");
        let out = expr
            .produce(&Value::unit(), &Path::of(["age"]), &IntDefaults)
            .unwrap();
        assert_eq!(out, Value::int(0));
    }

    #[test]
    fn unresolvable_default_fails_with_hint_in_message() {
        let expr = ValueExpr::natural_default("Widget");
        let err = expr
            .produce(&Value::unit(), &Path::of(["w"]), &IntDefaults)
            .unwrap_err();
        match err {
            MigrationError::TransformationFailed { path, reason } => {
                assert_eq!(path, Path::of(["w"]));
                assert!(reason.contains("Widget"));
            }
            other => panic!("expected TransformationFailed, got: {}", other),
        }
    }
}

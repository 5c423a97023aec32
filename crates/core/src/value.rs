//! The generic value tree that all migration actions read and write.
//!
//! A [`Value`] is an immutable, finite, acyclic tree. Actions never mutate a
//! Value in place -- every edit builds a new tree, sharing the untouched
//! subtrees with the input. Construction is unconstrained: no normalization
//! pass runs, and all structural checks happen lazily at the point an action
//! inspects a Value.

use rust_decimal::Decimal;

// ──────────────────────────────────────────────
// Scalars
// ──────────────────────────────────────────────

/// Leaf scalar held by [`Value::Primitive`].
///
/// Exact decimals use `rust_decimal::Decimal`; `Float` exists for data whose
/// source representation is genuinely binary floating point.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
}

impl Primitive {
    /// Returns a human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Primitive::Unit => "Unit",
            Primitive::Bool(_) => "Bool",
            Primitive::Int(_) => "Int",
            Primitive::Float(_) => "Float",
            Primitive::Decimal(_) => "Decimal",
            Primitive::Text(_) => "Text",
        }
    }
}

// ──────────────────────────────────────────────
// The value tree
// ──────────────────────────────────────────────

/// A self-describing data instance.
///
/// Record fields are an ordered list of `(name, value)` pairs -- names are
/// unique within a record and insertion order is preserved across
/// non-reordering edits, which is why this is a `Vec` and not a map.
/// Map entries are an ordered pair list as well; keys need not be primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Record(Vec<(String, Value)>),
    Variant { case: String, payload: Box<Value> },
    Sequence(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Optional(Option<Box<Value>>),
    Primitive(Primitive),
}

impl Value {
    /// Returns a human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Record(_) => "Record",
            Value::Variant { .. } => "Variant",
            Value::Sequence(_) => "Sequence",
            Value::Map(_) => "Map",
            Value::Optional(_) => "Optional",
            Value::Primitive(p) => p.type_name(),
        }
    }

    // ── Constructors ────────────────────────────────────────────────

    pub fn record<I, S>(fields: I) -> Value
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Value::Record(fields.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }

    pub fn variant(case: impl Into<String>, payload: Value) -> Value {
        Value::Variant {
            case: case.into(),
            payload: Box::new(payload),
        }
    }

    pub fn sequence<I: IntoIterator<Item = Value>>(elements: I) -> Value {
        Value::Sequence(elements.into_iter().collect())
    }

    pub fn map<I: IntoIterator<Item = (Value, Value)>>(entries: I) -> Value {
        Value::Map(entries.into_iter().collect())
    }

    pub fn present(value: Value) -> Value {
        Value::Optional(Some(Box::new(value)))
    }

    pub fn absent() -> Value {
        Value::Optional(None)
    }

    pub fn unit() -> Value {
        Value::Primitive(Primitive::Unit)
    }

    pub fn bool(b: bool) -> Value {
        Value::Primitive(Primitive::Bool(b))
    }

    pub fn int(i: i64) -> Value {
        Value::Primitive(Primitive::Int(i))
    }

    pub fn float(f: f64) -> Value {
        Value::Primitive(Primitive::Float(f))
    }

    pub fn decimal(d: Decimal) -> Value {
        Value::Primitive(Primitive::Decimal(d))
    }

    pub fn text(s: impl Into<String>) -> Value {
        Value::Primitive(Primitive::Text(s.into()))
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// The field list if this is a Record.
    pub fn as_record(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// The `(case, payload)` pair if this is a Variant.
    pub fn as_variant(&self) -> Option<(&str, &Value)> {
        match self {
            Value::Variant { case, payload } => Some((case.as_str(), payload)),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a record field by name. `None` if this is not a Record or
    /// the field is missing.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.as_record()
            .and_then(|fields| fields.iter().find(|(n, _)| n == name))
            .map(|(_, v)| v)
    }
}

/// Position of `name` in an ordered field list.
pub(crate) fn field_position(fields: &[(String, Value)], name: &str) -> Option<usize> {
    fields.iter().position(|(n, _)| n == name)
}

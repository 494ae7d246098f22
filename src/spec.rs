//! Raw declarations and the spec compiler.
//!
//! A [`Spec`] is a raw *shape*: the compiler alone decides which kind of
//! constraint it denotes (single, OR-set, element-wise container, positional
//! or repeating tuple). Malformed shapes are representable on purpose so the
//! compiler can reject them at decoration time.
pub mod bounds;
pub mod compile;
pub mod types;

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::error::{Error, Result};
use crate::value::{TypeTag, Value};

pub use bounds::BoundsFamily;
pub use compile::{compile, Family};
pub use types::TypeFamily;

/// Textual skip marker in the JSON declaration format.
pub const SKIP_MARKER: &str = "...";

#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Skip,
    Type(TypeTag),
    Value(Value),
    Tuple(Vec<Spec>),
    List(Vec<Spec>),
    Set(Vec<Spec>),
    Map(Vec<(Spec, Spec)>),
}

impl Spec {
    pub fn ty(tag: TypeTag) -> Self {
        Self::Type(tag)
    }

    /// OR-set of types.
    pub fn types(tags: impl IntoIterator<Item = TypeTag>) -> Self {
        Self::Tuple(tags.into_iter().map(Self::Type).collect())
    }

    /// `(lo, hi)` pair; pass [`Spec::Skip`] for an open side.
    pub fn bounds(lo: impl Into<Spec>, hi: impl Into<Spec>) -> Self {
        Self::Tuple(vec![lo.into(), hi.into()])
    }

    pub fn list(element: impl Into<Spec>) -> Self {
        Self::List(vec![element.into()])
    }

    pub fn set(element: impl Into<Spec>) -> Self {
        Self::Set(vec![element.into()])
    }

    pub fn map(key: impl Into<Spec>, value: impl Into<Spec>) -> Self {
        Self::Map(vec![(key.into(), value.into())])
    }

    pub fn tuple(slots: impl IntoIterator<Item = Spec>) -> Self {
        Self::Tuple(slots.into_iter().collect())
    }

    /// Tuple of any length, every element matching `element`.
    pub fn repeat(element: impl Into<Spec>) -> Self {
        Self::Tuple(vec![element.into(), Self::Skip])
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }

    /// A single concrete constraint (a type or a bound).
    pub fn is_concrete(&self) -> bool {
        matches!(self, Self::Type(_) | Self::Value(_))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Tuple(_) | Self::List(_) | Self::Set(_) | Self::Map(_))
    }
}

impl From<TypeTag> for Spec {
    fn from(tag: TypeTag) -> Self {
        Self::Type(tag)
    }
}

impl From<Value> for Spec {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<i64> for Spec {
    fn from(i: i64) -> Self {
        Self::Value(Value::Int(i))
    }
}

impl From<i32> for Spec {
    fn from(i: i32) -> Self {
        Self::Value(Value::from(i))
    }
}

impl From<f64> for Spec {
    fn from(f: f64) -> Self {
        Self::Value(Value::float(f))
    }
}

impl From<&str> for Spec {
    fn from(s: &str) -> Self {
        Self::Value(Value::str(s))
    }
}

fn write_all(f: &mut fmt::Formatter<'_>, items: &[Spec]) -> fmt::Result {
    for (i, s) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{s}")?;
    }
    Ok(())
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => f.write_str("..."),
            Self::Type(t) => write!(f, "{t}"),
            Self::Value(v) => write!(f, "{v}"),
            Self::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0]),
            Self::Tuple(items) => {
                f.write_str("(")?;
                write_all(f, items)?;
                f.write_str(")")
            }
            Self::List(items) => {
                f.write_str("[")?;
                write_all(f, items)?;
                f.write_str("]")
            }
            Self::Set(items) => {
                f.write_str("{")?;
                write_all(f, items)?;
                f.write_str("}")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// JSON DECLARATION FORMAT
// ————————————————————————————————————————————————————————————————————————————

impl Spec {
    /// Parse the JSON declaration DSL. Plain scalars are read through
    /// [`Family::literal`], so `"int"` is a type for the type family and a
    /// string bound for the bounds family.
    pub fn from_json<F: Family>(json: &Json) -> Result<Self> {
        match json {
            Json::String(s) if s == SKIP_MARKER => Ok(Self::Skip),
            Json::Array(items) => Ok(Self::Tuple(parse_all::<F>(items)?)),
            Json::Object(map) => {
                let mut entries = map.iter();
                let (Some((key, body)), None) = (entries.next(), entries.next()) else {
                    return Err(Error::Decode(format!(
                        "spec objects take exactly one of `list`, `set`, `map`, `value`, `type`; got {json}"
                    )));
                };
                match key.as_str() {
                    "list" => Ok(Self::List(vec![Self::from_json::<F>(body)?])),
                    "set" => Ok(Self::Set(vec![Self::from_json::<F>(body)?])),
                    "map" => match body.as_array().map(Vec::as_slice) {
                        Some([k, v]) => Ok(Self::map(Self::from_json::<F>(k)?, Self::from_json::<F>(v)?)),
                        _ => Err(Error::Decode(format!("`map` expects a [key, value] pair, got {body}"))),
                    },
                    "value" => Ok(Self::Value(Value::from_json(body)?)),
                    "type" => body
                        .as_str()
                        .map(|name| Self::Type(TypeTag::parse(name)))
                        .ok_or_else(|| Error::Decode(format!("`type` expects a type name, got {body}"))),
                    other => Err(Error::Decode(format!("unknown spec key `{other}`"))),
                }
            }
            scalar => Ok(F::literal(Value::from_json(scalar)?)),
        }
    }
}

fn parse_all<F: Family>(items: &[Json]) -> Result<Vec<Spec>> {
    items.iter().map(Spec::from_json::<F>).collect()
}

// ————————————————————————————————————————————————————————————————————————————
// TABLES
// ————————————————————————————————————————————————————————————————————————————

/// Where a spec was declared. Used only in compile-time diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecId {
    Position(usize),
    Name(String),
}

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(i) => write!(f, "positional spec #{i}"),
            Self::Name(name) => write!(f, "`{name}`"),
        }
    }
}

/// The two parallel declarations supplied at decoration time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecTable {
    pub positional: Vec<Spec>,
    pub named: IndexMap<String, Spec>,
}

impl SpecTable {
    pub fn new(positional: impl IntoIterator<Item = Spec>) -> Self {
        Self { positional: positional.into_iter().collect(), named: IndexMap::new() }
    }

    pub fn named(mut self, name: impl Into<String>, spec: impl Into<Spec>) -> Self {
        self.named.insert(name.into(), spec.into());
        self
    }
}

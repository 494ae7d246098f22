//! Dynamic value model the checkers operate on.
//!
//! Mirrors what a decorated callable actually receives: scalars, the four
//! container families (list, tuple, set, map), plain objects carrying
//! attributes, and types themselves (a type can be an argument, and checkers
//! keep the types they admit as metadata).
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use ordered_float::OrderedFloat;
use serde_json::Value as Json;

use crate::error::{Error, Result};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(BTreeSet<Value>),
    Map(BTreeMap<Value, Value>),
    Object(Object),
    Type(TypeTag),
}

/// A user-defined instance: class identity plus attribute table.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Object {
    pub class: String,
    pub bases: Vec<String>,
    pub attrs: BTreeMap<String, Value>,
    pub callable: bool,
}

/// Runtime type a value can be an instance of.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    Any,
    None,
    Bool,
    Int,
    Float,
    Number,
    Str,
    Bytes,
    List,
    Tuple,
    Set,
    Map,
    Type,
    Callable,
    Iterable,
    Class(String),
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE TAGS
// ————————————————————————————————————————————————————————————————————————————

impl TypeTag {
    /// Resolve a host type name. Unknown names denote user classes.
    pub fn parse(name: &str) -> Self {
        match name {
            "object" | "any" | "Any" => Self::Any,
            "None" | "NoneType" | "none" => Self::None,
            "bool" => Self::Bool,
            "int" => Self::Int,
            "float" => Self::Float,
            "number" | "Number" => Self::Number,
            "str" => Self::Str,
            "bytes" => Self::Bytes,
            "list" => Self::List,
            "tuple" => Self::Tuple,
            "set" | "frozenset" => Self::Set,
            "dict" | "map" | "Mapping" => Self::Map,
            "type" => Self::Type,
            "callable" | "Callable" => Self::Callable,
            "iterable" | "Iterable" => Self::Iterable,
            other => Self::Class(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Any => "object",
            Self::None => "NoneType",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Number => "Number",
            Self::Str => "str",
            Self::Bytes => "bytes",
            Self::List => "list",
            Self::Tuple => "tuple",
            Self::Set => "set",
            Self::Map => "dict",
            Self::Type => "type",
            Self::Callable => "Callable",
            Self::Iterable => "Iterable",
            Self::Class(name) => name,
        }
    }

    /// Instance test with host subtyping (`bool` is an `int`, every number is a `Number`).
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::None, Value::None) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::Int, Value::Int(_) | Value::Bool(_)) => true,
            (Self::Float, Value::Float(_)) => true,
            (Self::Number, Value::Bool(_) | Value::Int(_) | Value::Float(_)) => true,
            (Self::Str, Value::Str(_)) => true,
            (Self::Bytes, Value::Bytes(_)) => true,
            (Self::List, Value::List(_)) => true,
            (Self::Tuple, Value::Tuple(_)) => true,
            (Self::Set, Value::Set(_)) => true,
            (Self::Map, Value::Map(_)) => true,
            (Self::Type, Value::Type(_)) => true,
            (Self::Callable, v) => v.is_callable(),
            (Self::Iterable, v) => v.len().is_some(),
            (Self::Class(name), Value::Object(obj)) => {
                &obj.class == name || obj.bases.iter().any(|b| b == name)
            }
            _ => false,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// VALUES
// ————————————————————————————————————————————————————————————————————————————

impl Value {
    pub fn str(s: impl Into<String>) -> Self { Self::Str(s.into()) }
    pub fn float(f: f64) -> Self { Self::Float(OrderedFloat(f)) }
    pub fn list(xs: impl IntoIterator<Item = Value>) -> Self { Self::List(xs.into_iter().collect()) }
    pub fn tuple(xs: impl IntoIterator<Item = Value>) -> Self { Self::Tuple(xs.into_iter().collect()) }
    /// Numerically equal members collapse onto the first one: `{1, 1.0, True}`
    /// holds a single `1`.
    pub fn set(xs: impl IntoIterator<Item = Value>) -> Self {
        let mut out = BTreeSet::new();
        for x in xs {
            if numeric_twin(out.iter(), &x).is_none() {
                out.insert(x);
            }
        }
        Self::Set(out)
    }

    /// Numerically equal keys collapse onto the first key; the last value wins.
    pub fn map(kvs: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mut out = BTreeMap::new();
        for (k, v) in kvs {
            let key = numeric_twin(out.keys(), &k).cloned().unwrap_or(k);
            out.insert(key, v);
        }
        Self::Map(out)
    }

    /// Host-style type name, used in diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            Self::None => "NoneType".into(),
            Self::Bool(_) => "bool".into(),
            Self::Int(_) => "int".into(),
            Self::Float(_) => "float".into(),
            Self::Str(_) => "str".into(),
            Self::Bytes(_) => "bytes".into(),
            Self::List(_) => "list".into(),
            Self::Tuple(_) => "tuple".into(),
            Self::Set(_) => "set".into(),
            Self::Map(_) => "dict".into(),
            Self::Object(obj) => obj.class.clone(),
            Self::Type(_) => "type".into(),
        }
    }

    /// Number of items for sized values; `None` for everything else.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Str(s) => Some(s.chars().count()),
            Self::Bytes(b) => Some(b.len()),
            Self::List(xs) | Self::Tuple(xs) => Some(xs.len()),
            Self::Set(xs) => Some(xs.len()),
            Self::Map(m) => Some(m.len()),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        match self {
            Self::Type(_) => true,
            Self::Object(obj) => obj.callable,
            _ => false,
        }
    }

    /// Elements as iteration yields them: characters of a string, integers of
    /// bytes, keys of a map.
    pub fn elements(&self) -> Option<Vec<Cow<'_, Value>>> {
        match self {
            Self::Str(s) => Some(s.chars().map(|c| Cow::Owned(Self::Str(c.to_string()))).collect()),
            Self::Bytes(b) => Some(b.iter().map(|x| Cow::Owned(Self::Int(i64::from(*x)))).collect()),
            Self::List(xs) | Self::Tuple(xs) => Some(xs.iter().map(Cow::Borrowed).collect()),
            Self::Set(xs) => Some(xs.iter().map(Cow::Borrowed).collect()),
            Self::Map(m) => Some(m.keys().map(Cow::Borrowed).collect()),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Object(obj) => obj.attrs.get(name),
            _ => None,
        }
    }

    /// Host ordering. Numbers compare across `bool`/`int`/`float`; strings,
    /// bytes and tuples compare within their own kind. Anything else is
    /// incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a.compare(b);
        }
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => Some(a.cmp(b)),
            (Self::Bytes(a), Self::Bytes(b)) => Some(a.cmp(b)),
            (Self::Tuple(a), Self::Tuple(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        ord => return Some(ord),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }

    /// Whether an ordering between the two kinds exists at all.
    pub fn comparable(&self, other: &Value) -> bool {
        if self.as_number().is_some() && other.as_number().is_some() {
            return true;
        }
        matches!(
            (self, other),
            (Self::Str(_), Self::Str(_)) | (Self::Bytes(_), Self::Bytes(_)) | (Self::Tuple(_), Self::Tuple(_))
        )
    }

    /// Host equality: `1 == 1.0 == True`.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.compare(b) == Some(Ordering::Equal),
            _ => self == other,
        }
    }

    fn as_number(&self) -> Option<Number> {
        match self {
            Self::Bool(b) => Some(Number::Int(i64::from(*b))),
            Self::Int(i) => Some(Number::Int(*i)),
            Self::Float(f) => Some(Number::Float(f.0)),
            _ => None,
        }
    }

    /// Diagnostic rendering, cut to `width` characters.
    pub fn render(&self, width: usize) -> String {
        let full = self.to_string();
        if full.chars().count() <= width {
            return full;
        }
        let mut cut: String = full.chars().take(width).collect();
        cut.push_str("...");
        cut
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self { Self::Int(i) }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self { Self::Int(i64::from(i)) }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self { Self::float(f) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Self::Str(s.to_string()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Self::Str(s) }
}

impl From<TypeTag> for Value {
    fn from(t: TypeTag) -> Self { Self::Type(t) }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self { Self::Object(o) }
}

// ---- repr ----

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, x) in items.enumerate() {
        if i > 0 { f.write_str(", ")?; }
        write!(f, "{x}")?;
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{:?}", x.0),
            Self::Str(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            Self::Bytes(b) => write!(f, "b'{}'", String::from_utf8_lossy(b)),
            Self::List(xs) => write_seq(f, "[", "]", xs.iter()),
            Self::Tuple(xs) if xs.len() == 1 => write!(f, "({},)", xs[0]),
            Self::Tuple(xs) => write_seq(f, "(", ")", xs.iter()),
            Self::Set(xs) if xs.is_empty() => f.write_str("set()"),
            Self::Set(xs) => write_seq(f, "{", "}", xs.iter()),
            Self::Map(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Self::Object(obj) => write!(f, "<{} object>", obj.class),
            Self::Type(t) => write!(f, "<class '{t}'>"),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// JSON
// ————————————————————————————————————————————————————————————————————————————

impl Value {
    /// Decode a JSON document. Arrays become lists and objects become maps;
    /// single-key objects tagged `$tuple`, `$set`, `$type`, `$bytes` or
    /// `$object` select the other value kinds.
    pub fn from_json(json: &Json) -> Result<Self> {
        match json {
            Json::Null => Ok(Self::None),
            Json::Bool(b) => Ok(Self::Bool(*b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::float(f))
                } else {
                    Err(Error::Decode(format!("unrepresentable number {n}")))
                }
            }
            Json::String(s) => Ok(Self::Str(s.clone())),
            Json::Array(xs) => Ok(Self::List(decode_all(xs)?)),
            Json::Object(map) => {
                if map.len() == 1 {
                    if let Some((tag, body)) = map.iter().next() {
                        if tag.starts_with('$') {
                            return decode_tagged(tag, body);
                        }
                    }
                }
                let mut out = BTreeMap::new();
                for (k, v) in map {
                    out.insert(Self::Str(k.clone()), Self::from_json(v)?);
                }
                Ok(Self::Map(out))
            }
        }
    }
}

fn decode_all(xs: &[Json]) -> Result<Vec<Value>> {
    xs.iter().map(Value::from_json).collect()
}

fn decode_array<'a>(tag: &str, body: &'a Json) -> Result<&'a Vec<Json>> {
    body.as_array()
        .ok_or_else(|| Error::Decode(format!("`{tag}` expects an array, got {body}")))
}

fn decode_tagged(tag: &str, body: &Json) -> Result<Value> {
    match tag {
        "$tuple" => Ok(Value::Tuple(decode_all(decode_array(tag, body)?)?)),
        "$set" => Ok(Value::set(decode_all(decode_array(tag, body)?)?)),
        "$type" => body
            .as_str()
            .map(|name| Value::Type(TypeTag::parse(name)))
            .ok_or_else(|| Error::Decode(format!("`$type` expects a type name, got {body}"))),
        "$bytes" => body
            .as_str()
            .map(|s| Value::Bytes(s.as_bytes().to_vec()))
            .ok_or_else(|| Error::Decode(format!("`$bytes` expects a string, got {body}"))),
        "$object" => {
            let class = body
                .get("class")
                .and_then(Json::as_str)
                .ok_or_else(|| Error::Decode("`$object` needs a `class` name".into()))?
                .to_string();
            let bases = match body.get("bases") {
                Some(bs) => decode_array("bases", bs)?
                    .iter()
                    .map(|b| b.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| Error::Decode("`bases` must hold class names".into()))?,
                None => Vec::new(),
            };
            let mut attrs = BTreeMap::new();
            if let Some(Json::Object(m)) = body.get("attrs") {
                for (k, v) in m {
                    attrs.insert(k.clone(), Value::from_json(v)?);
                }
            }
            let callable = body.get("callable").and_then(Json::as_bool).unwrap_or(false);
            Ok(Value::Object(Object { class, bases, attrs, callable }))
        }
        other => Err(Error::Decode(format!("unknown value tag `{other}`"))),
    }
}

/// Exact numeric view of `bool`/`int`/`float`.
#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(&b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(&b),
            (Self::Int(a), Self::Float(b)) => int_vs_float(a, b),
            (Self::Float(a), Self::Int(b)) => int_vs_float(b, a).map(Ordering::reverse),
        }
    }
}

/// `i` against `f` without rounding `i` through `f64`.
fn int_vs_float(i: i64, f: f64) -> Option<Ordering> {
    // 2^63, the first float past i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return None;
    }
    if f >= LIMIT {
        return Some(Ordering::Less);
    }
    if f < -LIMIT {
        return Some(Ordering::Greater);
    }
    let whole = f.trunc();
    // in range, so the cast is exact
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(f - whole)),
        ord => Some(ord),
    }
}

fn numeric_twin<'a>(mut seen: impl Iterator<Item = &'a Value>, x: &Value) -> Option<&'a Value> {
    x.as_number()?;
    seen.find(|y| y.loose_eq(x))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bool_is_an_int_but_not_a_float() {
        assert!(TypeTag::Int.admits(&Value::Bool(true)));
        assert!(!TypeTag::Float.admits(&Value::Bool(true)));
        assert!(TypeTag::Number.admits(&Value::float(1.5)));
    }

    #[test]
    fn classes_match_on_bases() {
        let obj = Value::Object(Object {
            class: "Dog".into(),
            bases: vec!["Animal".into()],
            ..Object::default()
        });
        assert!(TypeTag::parse("Animal").admits(&obj));
        assert!(TypeTag::parse("Dog").admits(&obj));
        assert!(!TypeTag::parse("Cat").admits(&obj));
    }

    #[test]
    fn numbers_compare_across_kinds() {
        assert_eq!(Value::Int(2).compare(&Value::float(2.5)), Some(Ordering::Less));
        assert_eq!(Value::Bool(true).compare(&Value::Int(1)), Some(Ordering::Equal));
        assert_eq!(Value::Int(1).compare(&Value::str("a")), None);
        assert!(Value::Int(1).loose_eq(&Value::float(1.0)));
    }

    #[test]
    fn repr_follows_host_conventions() {
        assert_eq!(Value::tuple([Value::Int(1)]).to_string(), "(1,)");
        assert_eq!(Value::set([]).to_string(), "set()");
        assert_eq!(Value::list([Value::str("a"), Value::None]).to_string(), "['a', None]");
        assert_eq!(Value::Type(TypeTag::Int).to_string(), "<class 'int'>");
        assert_eq!(Value::str("abcdefgh").render(4), "'abc...");
    }

    #[test]
    fn json_tags_select_value_kinds() {
        let v = Value::from_json(&json!({"$tuple": [1, 2.5, "x"]})).unwrap();
        assert_eq!(v, Value::tuple([Value::Int(1), Value::float(2.5), Value::str("x")]));

        let v = Value::from_json(&json!({"$set": [3, 1, 3]})).unwrap();
        assert_eq!(v.len(), Some(2));

        let v = Value::from_json(&json!({"$object": {"class": "Point", "attrs": {"x": 1}}})).unwrap();
        assert_eq!(v.attr("x"), Some(&Value::Int(1)));

        let v = Value::from_json(&json!({"a": [1]})).unwrap();
        assert!(matches!(v, Value::Map(_)));

        assert!(Value::from_json(&json!({"$nope": 1})).is_err());
    }

    #[test]
    fn mixed_numbers_compare_exactly() {
        let edge = 1_i64 << 53;
        assert_eq!(Value::Int(edge + 1).compare(&Value::Int(edge)), Some(Ordering::Greater));
        assert!(!Value::Int(edge + 1).loose_eq(&Value::Int(edge)));
        assert_eq!(Value::Int(edge + 1).compare(&Value::float(edge as f64)), Some(Ordering::Greater));
        assert_eq!(Value::float(2.5).compare(&Value::Int(2)), Some(Ordering::Greater));
        assert_eq!(Value::Int(-2).compare(&Value::float(-2.5)), Some(Ordering::Greater));
        assert_eq!(Value::Int(i64::MAX).compare(&Value::float(9.3e18)), Some(Ordering::Less));
        assert_eq!(Value::Int(i64::MIN).compare(&Value::float(f64::NEG_INFINITY)), Some(Ordering::Greater));
        assert_eq!(Value::Int(0).compare(&Value::float(f64::NAN)), None);
        assert!(Value::Bool(true).loose_eq(&Value::float(1.0)));
    }

    #[test]
    fn numerically_equal_keys_collapse() {
        let s = Value::set([Value::Int(1), Value::float(1.0), Value::Bool(true), Value::Int(2)]);
        assert_eq!(s, Value::Set([Value::Int(1), Value::Int(2)].into_iter().collect()));

        let m = Value::map([(Value::Int(1), Value::str("a")), (Value::float(1.0), Value::str("b"))]);
        assert_eq!(m, Value::Map([(Value::Int(1), Value::str("b"))].into_iter().collect()));

        let v = Value::from_json(&json!({"$set": [1, 1.0, true]})).unwrap();
        assert_eq!(v.len(), Some(1));
    }
}

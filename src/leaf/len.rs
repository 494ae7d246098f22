use std::fmt;

use crate::checker::{Checker, Label, Leaf};
use crate::error::CheckError;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LenSpec {
    Exact(usize),
    /// Inclusive; `None` leaves that side open.
    Range(Option<usize>, Option<usize>),
}

impl LenSpec {
    pub fn admits(&self, len: usize) -> bool {
        match *self {
            Self::Exact(n) => len == n,
            Self::Range(lo, hi) => lo.is_none_or(|lo| len >= lo) && hi.is_none_or(|hi| len <= hi),
        }
    }
}

impl fmt::Display for LenSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Range(lo, hi) => {
                let lo = lo.map_or("0".to_string(), |n| n.to_string());
                let hi = hi.map_or("inf".to_string(), |n| n.to_string());
                write!(f, "in [{lo}, {hi}]")
            }
        }
    }
}

fn unsized_error(value: &Value, label: Label<'_>) -> CheckError {
    CheckError::NotIterable(format!(
        "Length of {label} cannot be determined for type {}!",
        value.type_name()
    ))
}

pub struct JustLen(pub LenSpec);

impl Leaf for JustLen {
    fn label(&self) -> String {
        format!("JustLen({})", self.0)
    }

    fn check(&self, value: &Value, label: Label<'_>) -> Result<(), CheckError> {
        let len = value.len().ok_or_else(|| unsized_error(value, label))?;
        if self.0.admits(len) {
            return Ok(());
        }
        Err(CheckError::WrongLength(format!(
            "Length of {label} must be {}, not {len}!",
            self.0
        )))
    }

    fn members(&self) -> Vec<(String, Value)> {
        let length = match self.0 {
            LenSpec::Exact(n) => Value::Int(n as i64),
            LenSpec::Range(lo, hi) => Value::tuple([
                lo.map_or(Value::None, |n| Value::Int(n as i64)),
                hi.map_or(Value::None, |n| Value::Int(n as i64)),
            ]),
        };
        vec![("length".into(), length)]
    }
}

pub struct NonEmpty;

impl Leaf for NonEmpty {
    fn label(&self) -> String {
        "NonEmpty".into()
    }

    fn check(&self, value: &Value, label: Label<'_>) -> Result<(), CheckError> {
        match value.len() {
            None => Err(unsized_error(value, label)),
            Some(0) => Err(CheckError::EmptyValue(format!("{label} must not be empty!"))),
            Some(_) => Ok(()),
        }
    }
}

pub struct Iterable;

impl Leaf for Iterable {
    fn label(&self) -> String {
        "Iterable".into()
    }

    fn check(&self, value: &Value, label: Label<'_>) -> Result<(), CheckError> {
        if value.elements().is_some() {
            return Ok(());
        }
        Err(CheckError::NotIterable(format!(
            "{label} of type {} is not iterable!",
            value.type_name()
        )))
    }
}

pub(crate) fn bare_non_empty() -> Checker {
    Checker::leaf(NonEmpty)
}

pub(crate) fn bare_iterable() -> Checker {
    Checker::leaf(Iterable)
}

pub fn just_len(spec: LenSpec) -> Checker {
    super::family::family(Checker::leaf(JustLen(spec)))
}

pub fn non_empty() -> Checker {
    super::family::family(bare_non_empty())
}

pub fn iterable() -> Checker {
    super::family::family(bare_iterable())
}

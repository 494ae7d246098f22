use std::cmp::Ordering;

use crate::checker::{Checker, Label, Leaf};
use crate::error::{CheckError, SpecError};
use crate::value::Value;

/// Closed interval `[lo, hi]`; a missing side is unbounded.
pub struct Within {
    lo: Option<Value>,
    hi: Option<Value>,
}

impl Within {
    /// Rejects bounds of incomparable kinds and inverted intervals.
    pub fn new(lo: Option<Value>, hi: Option<Value>) -> Result<Self, String> {
        if let (Some(l), Some(h)) = (&lo, &hi) {
            if !l.comparable(h) {
                return Err(format!(
                    "bounds {l} and {h} have incomparable types {} and {}",
                    l.type_name(),
                    h.type_name()
                ));
            }
            if l.compare(h) == Some(Ordering::Greater) {
                return Err(format!("lower bound {l} exceeds upper bound {h}"));
            }
        }
        for b in lo.iter().chain(hi.iter()) {
            if !b.comparable(b) {
                return Err(format!("bound {b} of type {} is not orderable", b.type_name()));
            }
        }
        Ok(Self { lo, hi })
    }

    fn interval(&self) -> String {
        let lo = self.lo.as_ref().map_or("-inf".to_string(), Value::to_string);
        let hi = self.hi.as_ref().map_or("inf".to_string(), Value::to_string);
        format!("[{lo}, {hi}]")
    }

    fn bound_types(&self) -> String {
        let names: Vec<String> = self.lo.iter().chain(self.hi.iter()).map(Value::type_name).collect();
        names.join(" and ")
    }
}

impl Leaf for Within {
    fn label(&self) -> String {
        format!("Within{}", self.interval())
    }

    fn check(&self, value: &Value, label: Label<'_>) -> Result<(), CheckError> {
        let bounds = self.lo.iter().chain(self.hi.iter());
        for b in bounds {
            if !value.comparable(b) {
                return Err(CheckError::WrongType(format!(
                    "Type of {label} must be comparable with {}, not {}!",
                    self.bound_types(),
                    value.type_name()
                )));
            }
        }
        // NaN compares as None and lands out of bounds
        let above_lo = self.lo.as_ref().is_none_or(|lo| {
            matches!(value.compare(lo), Some(Ordering::Greater | Ordering::Equal))
        });
        let below_hi = self.hi.as_ref().is_none_or(|hi| {
            matches!(value.compare(hi), Some(Ordering::Less | Ordering::Equal))
        });
        if above_lo && below_hi {
            return Ok(());
        }
        Err(CheckError::OutOfBounds(format!(
            "Value of {label} must lie in {}, not {value}!",
            self.interval()
        )))
    }

    fn members(&self) -> Vec<(String, Value)> {
        let lo = self.lo.clone().unwrap_or(Value::None);
        let hi = self.hi.clone().unwrap_or(Value::None);
        vec![("bounds".into(), Value::tuple([lo, hi]))]
    }
}

pub(crate) fn interval(lo: Option<Value>, hi: Option<Value>) -> Result<Checker, String> {
    Within::new(lo, hi).map(|w| super::family::family(Checker::leaf(w)))
}

pub fn within(lo: Option<Value>, hi: Option<Value>) -> Result<Checker, SpecError> {
    interval(lo, hi).map_err(|reason| SpecError::Invalid {
        family: "bounds",
        ident: "within".into(),
        reason,
    })
}

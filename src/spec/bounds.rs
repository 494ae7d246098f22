use crate::checker::Checker;
use crate::leaf::bounds::interval;
use crate::value::Value;

use super::compile::Family;
use super::Spec;

/// Interval constraints. A flat pair of bounds is always `(lo, hi)`, with a
/// skip marker for an open side; bounds never form OR-sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsFamily;

fn bound(spec: &Spec) -> Option<Value> {
    match spec {
        Spec::Value(v) => Some(v.clone()),
        _ => None,
    }
}

impl Family for BoundsFamily {
    const NAME: &'static str = "bounds";

    fn literal(value: Value) -> Spec {
        Spec::Value(value)
    }

    fn tuple_leaf(items: &[Spec]) -> Option<Result<Checker, String>> {
        let [lo, hi] = items else {
            return None;
        };
        let is_bound = |s: &Spec| matches!(s, Spec::Value(_) | Spec::Skip);
        if !(is_bound(lo) && is_bound(hi)) || (lo.is_skip() && hi.is_skip()) {
            return None;
        }
        Some(interval(bound(lo), bound(hi)))
    }

    fn single(spec: &Spec) -> Result<Checker, String> {
        match spec {
            Spec::Type(t) => Err(format!("type {t} cannot bound an interval")),
            other => Err(format!("bare bound {other}; expected a (lo, hi) pair")),
        }
    }

    fn any_of(items: &[Spec]) -> Result<Checker, String> {
        Err(format!(
            "{} is not a (lo, hi) pair; bounds do not form alternatives",
            Spec::Tuple(items.to_vec())
        ))
    }
}

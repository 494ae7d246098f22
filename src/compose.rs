//! Composition engine.
//!
//! `outer.o(&inner)` builds one checker that runs `inner`, then `outer`, with
//! the same name and options. Because checkers never alter the value,
//! `outer(inner(v)) == v` whenever both pass, so composition is associative
//! and the identity checker is neutral on either side.
//!
//! Member propagation always follows the inner (right-hand) operand:
//! - plain members are copied verbatim;
//! - chainable members are forwarded lazily: `composite.member("M")` runs the
//!   whole composite and then `M`, and exposes `M`'s own chainable members in
//!   turn, so fluent chains of any length keep composing.
use std::sync::Arc;

use crate::checker::{CheckFn, CheckOptions, Checker, Member};
use crate::error::{CompositionError, Side};
use crate::value::Value;

impl Checker {
    /// Compose with `inner`: `inner` runs first, then `self`.
    pub fn o(&self, inner: &Checker) -> Checker {
        compose(self, inner)
    }
}

pub fn compose(outer: &Checker, inner: &Checker) -> Checker {
    if inner.is_identity() {
        return outer.clone();
    }
    if outer.is_identity() {
        return inner.clone();
    }
    let label = format!("{} >> {}", inner.label(), outer.label());
    sequence(label, inner, outer, inner)
}

/// `head` then `member`, exposing `member`'s members. Backs chainable member
/// lookups on composites.
pub(crate) fn chain_member(head: &Checker, member: &Checker) -> Checker {
    if member.is_identity() {
        return head.clone();
    }
    if head.is_identity() {
        return member.clone();
    }
    let label = format!("{}.{}", head.label(), member.label());
    sequence(label, head, member, member)
}

/// Compose two looked-up members, rejecting plain data on either side.
pub fn try_compose(outer: (&str, &Member), inner: (&str, &Member)) -> Result<Checker, CompositionError> {
    let outer = as_checker(Side::Outer, outer)?;
    let inner = as_checker(Side::Inner, inner)?;
    Ok(compose(outer, inner))
}

fn as_checker<'a>(side: Side, (name, member): (&str, &'a Member)) -> Result<&'a Checker, CompositionError> {
    match member {
        Member::Chain(checker) => Ok(checker),
        Member::Plain(_) => Err(CompositionError::NotAChecker { side, name: name.to_string() }),
    }
}

fn sequence(label: String, first: &Checker, then: &Checker, source: &Checker) -> Checker {
    let (a, b) = match (first.run_fn(), then.run_fn()) {
        (Some(a), Some(b)) => (a, b),
        // identity operands are short-circuited by the callers
        (Some(only), None) | (None, Some(only)) => {
            return Checker::composed(label, only, source.plain_members().clone(), source.clone());
        }
        (None, None) => return Checker::identity(),
    };
    let run: Arc<CheckFn> = Arc::new(move |value: &Value, name: Option<&str>, opts: &CheckOptions| {
        a(value, name, opts)?;
        b(value, name, opts)
    });
    Checker::composed(label, run, source.plain_members().clone(), source.clone())
}

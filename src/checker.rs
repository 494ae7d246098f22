//! The checker contract.
//!
//! A [`Checker`] is a pure function `(value, name?, options) -> value | error`
//! plus two explicitly registered member tables:
//! - plain members: metadata (`types`, `bounds`, ...) passed through verbatim
//!   when checkers are composed;
//! - chainable members: further checkers reachable by name, re-composed behind
//!   any composite that exposes them (see [`crate::compose`]).
//!
//! Checkers are immutable and cheap to clone; they hold no per-call state and
//! may be shared across threads.
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::DEFAULT_LABEL_WIDTH;
use crate::error::{CheckError, CompositionError, Side};
use crate::value::Value;

pub type CheckFn = dyn Fn(&Value, Option<&str>, &CheckOptions) -> Result<(), CheckError> + Send + Sync;

// ————————————————————————————————————————————————————————————————————————————
// OPTIONS + LABELS
// ————————————————————————————————————————————————————————————————————————————

/// Options threaded unchanged through every link of a composed checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    pub label_width: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self { label_width: DEFAULT_LABEL_WIDTH }
    }
}

impl CheckOptions {
    pub fn label<'a>(&self, value: &'a Value, name: Option<&'a str>) -> Label<'a> {
        Label { value, name, width: self.label_width }
    }
}

/// Diagnostic label of a checked value: the supplied name, or a rendering of
/// the value itself. Rendered only when a message is actually built.
#[derive(Debug, Clone, Copy)]
pub struct Label<'a> {
    value: &'a Value,
    name: Option<&'a str>,
    width: usize,
}

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => f.write_str(name),
            None => f.write_str(&self.value.render(self.width)),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LEAF CONTRACT
// ————————————————————————————————————————————————————————————————————————————

/// A checker with no internal sub-checks.
pub trait Leaf: Send + Sync + 'static {
    /// Display name of the checker, e.g. `Just(int)`.
    fn label(&self) -> String;

    /// Succeed or fail; never modify the value.
    fn check(&self, value: &Value, label: Label<'_>) -> Result<(), CheckError>;

    /// Plain metadata exposed as members.
    fn members(&self) -> Vec<(String, Value)> {
        Vec::new()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CHECKER
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone)]
pub struct Checker {
    node: Arc<Node>,
}

#[derive(Clone)]
struct Node {
    label: String,
    /// `None` is the identity checker.
    run: Option<Arc<CheckFn>>,
    plain: IndexMap<String, Value>,
    chains: IndexMap<String, Checker>,
    /// Chainable members of this checker are re-composed behind `self` on demand.
    forwarded: Option<Checker>,
}

/// A member looked up by name.
#[derive(Clone, Debug)]
pub enum Member {
    Plain(Value),
    Chain(Checker),
}

impl Checker {
    pub fn new<F>(label: impl Into<String>, run: F) -> Self
    where
        F: Fn(&Value, Option<&str>, &CheckOptions) -> Result<(), CheckError> + Send + Sync + 'static,
    {
        Self::from_parts(label.into(), Some(Arc::new(run)))
    }

    /// Returns its input unchanged and never fails.
    pub fn identity() -> Self {
        Self::from_parts("Identity".into(), None)
    }

    pub fn leaf<L: Leaf>(leaf: L) -> Self {
        let label = leaf.label();
        let members = leaf.members();
        let mut checker = Self::new(label, move |value, name, opts| {
            leaf.check(value, opts.label(value, name))
        });
        for (name, value) in members {
            checker = checker.with_plain(name, value);
        }
        checker
    }

    fn from_parts(label: String, run: Option<Arc<CheckFn>>) -> Self {
        Self {
            node: Arc::new(Node {
                label,
                run,
                plain: IndexMap::new(),
                chains: IndexMap::new(),
                forwarded: None,
            }),
        }
    }

    pub(crate) fn composed(
        label: String,
        run: Arc<CheckFn>,
        plain: IndexMap<String, Value>,
        forwarded: Checker,
    ) -> Self {
        Self {
            node: Arc::new(Node {
                label,
                run: Some(run),
                plain,
                chains: IndexMap::new(),
                forwarded: Some(forwarded),
            }),
        }
    }

    // ---- registration ----

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.node).label = label.into();
        self
    }

    pub fn with_plain(mut self, name: impl Into<String>, value: Value) -> Self {
        Arc::make_mut(&mut self.node).plain.insert(name.into(), value);
        self
    }

    pub fn with_chain(mut self, name: impl Into<String>, checker: Checker) -> Self {
        Arc::make_mut(&mut self.node).chains.insert(name.into(), checker);
        self
    }

    // ---- invocation ----

    /// Check `value` with default options. Returns the very same reference.
    pub fn check<'a>(&self, value: &'a Value, name: Option<&str>) -> Result<&'a Value, CheckError> {
        self.check_with(value, name, &CheckOptions::default())
    }

    pub fn check_with<'a>(
        &self,
        value: &'a Value,
        name: Option<&str>,
        opts: &CheckOptions,
    ) -> Result<&'a Value, CheckError> {
        self.run(value, name, opts)?;
        Ok(value)
    }

    pub(crate) fn run(&self, value: &Value, name: Option<&str>, opts: &CheckOptions) -> Result<(), CheckError> {
        match &self.node.run {
            Some(run) => run(value, name, opts),
            None => Ok(()),
        }
    }

    pub(crate) fn run_fn(&self) -> Option<Arc<CheckFn>> {
        self.node.run.clone()
    }

    // ---- introspection ----

    pub fn label(&self) -> &str {
        &self.node.label
    }

    pub fn is_identity(&self) -> bool {
        self.node.run.is_none()
    }

    pub fn plain_members(&self) -> &IndexMap<String, Value> {
        &self.node.plain
    }

    /// Names of every chainable member, registered or forwarded.
    pub fn chain_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.node.chains.keys().cloned().collect();
        if let Some(source) = &self.node.forwarded {
            for name in source.chain_names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn member(&self, name: &str) -> Option<Member> {
        if let Some(value) = self.node.plain.get(name) {
            return Some(Member::Plain(value.clone()));
        }
        if let Some(checker) = self.node.chains.get(name) {
            return Some(Member::Chain(checker.clone()));
        }
        let source = self.node.forwarded.as_ref()?;
        match source.member(name)? {
            Member::Chain(next) => Some(Member::Chain(crate::compose::chain_member(self, &next))),
            // plain members were copied at composition time
            Member::Plain(value) => Some(Member::Plain(value)),
        }
    }

    /// Resolve a chainable member; dotted paths walk nested members
    /// (`"List.NonEmpty"`).
    pub fn chain(&self, path: &str) -> Result<Checker, CompositionError> {
        let mut current = self.clone();
        for name in path.split('.') {
            current = match current.member(name) {
                Some(Member::Chain(next)) => next,
                Some(Member::Plain(_)) => {
                    return Err(CompositionError::NotAChecker {
                        side: Side::Inner,
                        name: name.to_string(),
                    });
                }
                None => {
                    return Err(CompositionError::NoSuchMember {
                        checker: current.label().to_string(),
                        name: name.to_string(),
                    });
                }
            };
        }
        Ok(current)
    }
}

impl fmt::Debug for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checker")
            .field("label", &self.node.label)
            .field("plain", &self.node.plain.keys().collect::<Vec<_>>())
            .field("chains", &self.chain_names())
            .finish()
    }
}

impl fmt::Display for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.node.label)
    }
}

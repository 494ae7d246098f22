//! Argument binder: merges a [`SpecTable`] into one name-keyed table of
//! compiled checkers once, then enforces it on every call.
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as Json;
use tracing::{debug, trace, warn};

use crate::checker::{CheckOptions, Checker};
use crate::config::Settings;
use crate::error::{ArgumentCheckFailed, Result, SpecError};
use crate::signature::{CallableKind, Signature};
use crate::spec::{compile, Family, Spec, SpecId, SpecTable};
use crate::value::Value;

// ————————————————————————————————————————————————————————————————————————————
// ACTUAL ARGUMENTS
// ————————————————————————————————————————————————————————————————————————————

/// One call's actual arguments. A method receives its receiver as
/// `positional[0]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub positional: Vec<Value>,
    pub keyword: IndexMap<String, Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CallDoc {
    #[serde(default)]
    args: Vec<Json>,
    #[serde(default)]
    kwargs: IndexMap<String, Json>,
}

impl Args {
    pub fn new(positional: impl IntoIterator<Item = Value>) -> Self {
        Self { positional: positional.into_iter().collect(), keyword: IndexMap::new() }
    }

    pub fn with_kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn kwarg(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    /// Decode a call document `{"args": [...], "kwargs": {...}}`.
    pub fn from_json(json: &Json) -> Result<Self> {
        let doc: CallDoc = crate::path_de::from_value_with_path(json)?;
        let positional = doc.args.iter().map(Value::from_json).collect::<Result<Vec<_>>>()?;
        let mut keyword = IndexMap::new();
        for (name, value) in &doc.kwargs {
            keyword.insert(name.clone(), Value::from_json(value)?);
        }
        Ok(Self { positional, keyword })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// BINDER
// ————————————————————————————————————————————————————————————————————————————

/// CompiledCheckerTable plus what the binder needs to rebuild the
/// name→value mapping of a call.
#[derive(Debug, Clone)]
pub struct ArgumentBinder {
    kind: CallableKind,
    callable: String,
    module: String,
    positional_names: Vec<String>,
    declared_names: Vec<String>,
    receiver_offset: usize,
    var_args: Option<String>,
    var_kwargs: Option<String>,
    checkers: IndexMap<String, Checker>,
    opts: CheckOptions,
    log_failures: bool,
}

impl ArgumentBinder {
    pub fn new<F: Family>(table: &SpecTable, signature: &Signature, settings: &Settings) -> std::result::Result<Self, SpecError> {
        let receiver_offset = signature.receiver_offset(settings);
        let positional_names: Vec<String> = signature.positional_names().into_iter().map(str::to_string).collect();

        // keyword specs first; a positional spec only fills a name they left open
        let mut merged: IndexMap<&str, (SpecId, &Spec)> = table
            .named
            .iter()
            .map(|(name, spec)| (name.as_str(), (SpecId::Name(name.clone()), spec)))
            .collect();
        // positional specs follow declaration order, keyword-only parameters included
        let declared = signature.declared_names().into_iter().skip(receiver_offset);
        for ((i, spec), name) in table.positional.iter().enumerate().zip(declared) {
            merged.entry(name).or_insert((SpecId::Position(i), spec));
        }

        let mut checkers = IndexMap::with_capacity(merged.len());
        for (name, (id, spec)) in merged {
            checkers.insert(name.to_string(), compile::<F>(spec, &id)?);
        }
        debug!(
            callable = %signature.name,
            module = %signature.module,
            family = F::NAME,
            checkers = checkers.len(),
            "compiled argument checkers"
        );

        Ok(Self {
            kind: signature.kind(settings),
            callable: signature.name.clone(),
            module: signature.module.clone(),
            positional_names,
            declared_names: signature.declared_names().into_iter().map(str::to_string).collect(),
            receiver_offset,
            var_args: signature.var_args_name().map(str::to_string),
            var_kwargs: signature.var_kwargs_name().map(str::to_string),
            checkers,
            opts: settings.check_options(),
            log_failures: settings.log_failures,
        })
    }

    pub fn kind(&self) -> CallableKind {
        self.kind
    }

    pub fn callable(&self) -> &str {
        &self.callable
    }

    /// The CompiledCheckerTable, in merge order.
    pub fn checkers(&self) -> &IndexMap<String, Checker> {
        &self.checkers
    }

    /// Rebuild the name→value mapping of one call: keyword arguments first,
    /// then positionals past the receiver that land on a declared name.
    /// Surplus positionals / keywords appear (as a tuple / map) only when a
    /// checker is registered under the variadic parameter's name.
    pub fn call_arguments<'a>(&'a self, args: &'a Args) -> IndexMap<&'a str, Cow<'a, Value>> {
        let mut out: IndexMap<&'a str, Cow<'a, Value>> =
            args.keyword.iter().map(|(k, v)| (k.as_str(), Cow::Borrowed(v))).collect();

        let named = self.positional_names.len();
        let bindable = named.saturating_sub(self.receiver_offset);
        for (i, value) in args.positional.iter().enumerate().skip(self.receiver_offset).take(bindable) {
            let name = self.positional_names[i].as_str();
            out.entry(name).or_insert(Cow::Borrowed(value));
        }

        if let Some(name) = self.var_args.as_deref().filter(|n| self.checkers.contains_key(*n)) {
            let surplus = args.positional.iter().skip(named.max(self.receiver_offset)).cloned();
            out.entry(name).or_insert(Cow::Owned(Value::tuple(surplus)));
        }
        if let Some(name) = self.var_kwargs.as_deref().filter(|n| self.checkers.contains_key(*n)) {
            let surplus: BTreeMap<Value, Value> = args
                .keyword
                .iter()
                .filter(|(k, _)| !self.declared_names.iter().any(|d| d == *k))
                .map(|(k, v)| (Value::str(k.as_str()), v.clone()))
                .collect();
            out.entry(name).or_insert(Cow::Owned(Value::Map(surplus)));
        }
        out
    }

    /// Run every applicable checker; the first failure aborts.
    pub fn enforce(&self, args: &Args) -> std::result::Result<(), ArgumentCheckFailed> {
        for (name, value) in self.call_arguments(args) {
            let Some(checker) = self.checkers.get(name) else {
                continue;
            };
            trace!(callable = %self.callable, argument = name, checker = %checker, "checking argument");
            if let Err(cause) = checker.run(&value, Some(name), &self.opts) {
                if self.log_failures {
                    warn!(
                        callable = %self.callable,
                        module = %self.module,
                        argument = name,
                        kind = %cause.kind(),
                        "{cause}"
                    );
                }
                return Err(ArgumentCheckFailed {
                    kind: self.kind,
                    callable: self.callable.clone(),
                    module: self.module.clone(),
                    argument: name.to_string(),
                    cause,
                });
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CHECKED CALLABLE
// ————————————————————————————————————————————————————————————————————————————

/// A callable behind one or more independent binder layers.
pub struct Checked<C> {
    signature: Signature,
    layers: Vec<ArgumentBinder>,
    callable: C,
}

impl<C> fmt::Debug for Checked<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checked")
            .field("callable", &self.signature.name)
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl<C> Checked<C> {
    pub(crate) fn new(signature: Signature, binder: ArgumentBinder, callable: C) -> Self {
        Self { signature, layers: vec![binder], callable }
    }

    /// Wrap with another layer, which runs before the existing ones.
    pub(crate) fn push_outer(mut self, binder: ArgumentBinder) -> Self {
        self.layers.insert(0, binder);
        self
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Binder layers, outermost first.
    pub fn layers(&self) -> &[ArgumentBinder] {
        &self.layers
    }

    /// Validate `args` against every layer without calling through.
    pub fn validate(&self, args: &Args) -> std::result::Result<(), ArgumentCheckFailed> {
        self.layers.iter().try_for_each(|layer| layer.enforce(args))
    }

    /// Validate, then call the wrapped callable with the original arguments.
    pub fn call<R>(&self, args: Args) -> std::result::Result<R, ArgumentCheckFailed>
    where
        C: Fn(Args) -> R,
    {
        self.validate(&args)?;
        Ok((self.callable)(args))
    }
}

//! Static description of a callable's parameters.
//!
//! Rust has no runtime reflection over closures, so the parameter list the
//! binder needs is declared explicitly through a small builder.
use std::fmt;

use serde::Deserialize;

use crate::config::Settings;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    Function,
    Method,
}

impl fmt::Display for CallableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function => f.write_str("function"),
            Self::Method => f.write_str("method"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Positional-or-keyword.
    Positional,
    KeywordOnly,
    /// Catch-all positional (`*args`).
    VarArgs,
    /// Catch-all keyword (`**kwargs`).
    VarKwargs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub name: String,
    pub module: String,
    pub params: Vec<Param>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), module: "__main__".into(), params: Vec::new() }
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    fn push(mut self, name: impl Into<String>, kind: ParamKind, default: Option<Value>) -> Self {
        self.params.push(Param { name: name.into(), kind, default });
        self
    }

    pub fn param(self, name: impl Into<String>) -> Self {
        self.push(name, ParamKind::Positional, None)
    }

    pub fn param_default(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.push(name, ParamKind::Positional, Some(default.into()))
    }

    pub fn keyword_only(self, name: impl Into<String>) -> Self {
        self.push(name, ParamKind::KeywordOnly, None)
    }

    pub fn var_args(self, name: impl Into<String>) -> Self {
        self.push(name, ParamKind::VarArgs, None)
    }

    pub fn var_kwargs(self, name: impl Into<String>) -> Self {
        self.push(name, ParamKind::VarKwargs, None)
    }

    /// Declared parameter names in order, variadics excluded.
    pub fn declared_names(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|p| matches!(p.kind, ParamKind::Positional | ParamKind::KeywordOnly))
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Names that can be bound from a position, receiver included.
    pub fn positional_names(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|p| p.kind == ParamKind::Positional)
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn var_args_name(&self) -> Option<&str> {
        self.find(ParamKind::VarArgs)
    }

    pub fn var_kwargs_name(&self) -> Option<&str> {
        self.find(ParamKind::VarKwargs)
    }

    fn find(&self, kind: ParamKind) -> Option<&str> {
        self.params.iter().find(|p| p.kind == kind).map(|p| p.name.as_str())
    }

    pub fn kind(&self, settings: &Settings) -> CallableKind {
        match self.declared_names().first() {
            Some(first) if settings.is_receiver(first) => CallableKind::Method,
            _ => CallableKind::Function,
        }
    }

    /// Positions taken by the receiver (0 or 1).
    pub fn receiver_offset(&self, settings: &Settings) -> usize {
        match self.kind(settings) {
            CallableKind::Method => 1,
            CallableKind::Function => 0,
        }
    }
}

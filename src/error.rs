//! Failure taxonomy.
//!
//! Three families that callers must be able to tell apart:
//! - [`CheckError`]: a value failed validation (call time).
//! - [`SpecError`]: a declaration is malformed (decoration time, never deferred).
//! - [`CompositionError`]: a checker is miswired.
//!
//! [`ArgumentCheckFailed`] is what callers of a decorated callable see; it
//! wraps the originating [`CheckError`] as its source.
use std::fmt;

use thiserror::Error;

use crate::signature::CallableKind;

// ————————————————————————————————————————————————————————————————————————————
// VALIDATION FAILURES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("{0}")]
    WrongType(String),
    #[error("{0}")]
    OutOfBounds(String),
    #[error("{0}")]
    WrongLength(String),
    #[error("{0}")]
    MissingAttribute(String),
    #[error("{0}")]
    NotIterable(String),
    #[error("{0}")]
    EmptyValue(String),
    #[error("{0}")]
    NotCallable(String),
    #[error("{0}")]
    InvalidIdentifier(String),
    #[error("{0}")]
    ItemNotFound(String),
}

/// Payload-free mirror of [`CheckError`] for programmatic inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckErrorKind {
    WrongType,
    OutOfBounds,
    WrongLength,
    MissingAttribute,
    NotIterable,
    EmptyValue,
    NotCallable,
    InvalidIdentifier,
    ItemNotFound,
}

impl CheckError {
    pub fn kind(&self) -> CheckErrorKind {
        match self {
            Self::WrongType(_) => CheckErrorKind::WrongType,
            Self::OutOfBounds(_) => CheckErrorKind::OutOfBounds,
            Self::WrongLength(_) => CheckErrorKind::WrongLength,
            Self::MissingAttribute(_) => CheckErrorKind::MissingAttribute,
            Self::NotIterable(_) => CheckErrorKind::NotIterable,
            Self::EmptyValue(_) => CheckErrorKind::EmptyValue,
            Self::NotCallable(_) => CheckErrorKind::NotCallable,
            Self::InvalidIdentifier(_) => CheckErrorKind::InvalidIdentifier,
            Self::ItemNotFound(_) => CheckErrorKind::ItemNotFound,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::WrongType(m)
            | Self::OutOfBounds(m)
            | Self::WrongLength(m)
            | Self::MissingAttribute(m)
            | Self::NotIterable(m)
            | Self::EmptyValue(m)
            | Self::NotCallable(m)
            | Self::InvalidIdentifier(m)
            | Self::ItemNotFound(m) => m,
        }
    }
}

impl CheckErrorKind {
    pub const ALL: [CheckErrorKind; 9] = [
        Self::WrongType,
        Self::OutOfBounds,
        Self::WrongLength,
        Self::MissingAttribute,
        Self::NotIterable,
        Self::EmptyValue,
        Self::NotCallable,
        Self::InvalidIdentifier,
        Self::ItemNotFound,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::WrongType => "WrongType",
            Self::OutOfBounds => "OutOfBounds",
            Self::WrongLength => "WrongLength",
            Self::MissingAttribute => "MissingAttribute",
            Self::NotIterable => "NotIterable",
            Self::EmptyValue => "EmptyValue",
            Self::NotCallable => "NotCallable",
            Self::InvalidIdentifier => "InvalidIdentifier",
            Self::ItemNotFound => "ItemNotFound",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for CheckErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DECLARATION + WIRING FAILURES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("invalid {family} spec for {ident}: {reason}")]
    Invalid {
        family: &'static str,
        ident: String,
        reason: String,
    },
}

/// Which operand of a composition was at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Outer,
    Inner,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outer => f.write_str("outer"),
            Self::Inner => f.write_str("inner"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("{side} operand `{name}` is not a valid checker")]
    NotAChecker { side: Side, name: String },
    #[error("checker `{checker}` has no member `{name}`")]
    NoSuchMember { checker: String, name: String },
}

// ————————————————————————————————————————————————————————————————————————————
// DECORATION-LEVEL FAILURE
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} `{callable}` defined in module `{module}`: argument `{argument}` failed validation: {cause}")]
pub struct ArgumentCheckFailed {
    pub kind: CallableKind,
    pub callable: String,
    pub module: String,
    pub argument: String,
    #[source]
    pub cause: CheckError,
}

// ————————————————————————————————————————————————————————————————————————————
// CRATE ERROR
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error(transparent)]
    Check(#[from] CheckError),
    #[error(transparent)]
    Composition(#[from] CompositionError),
    #[error(transparent)]
    Argument(#[from] ArgumentCheckFailed),
    #[error("invalid document: {0}")]
    Decode(String),
    #[error("failed to parse json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Declarative runtime argument validation.
//!
//! Declarations ([`Spec`]s) are compiled once into [`Checker`]s; a binder
//! then enforces them against every call of a wrapped callable.
//!
//! - [`value`]: the dynamic values being validated
//! - [`checker`], [`compose`]: the checker contract and composition
//! - [`leaf`]: the leaf checker catalogue
//! - [`spec`]: declarations and the spec compiler
//! - [`binder`], [`decorate`]: argument binding and the decoration surface
pub mod binder;
pub mod checker;
pub mod compose;
pub mod config;
pub mod decl;
pub mod decorate;
pub mod error;
pub mod leaf;
pub mod path_de;
pub mod signature;
pub mod spec;
pub mod value;

pub use binder::{ArgumentBinder, Args, Checked};
pub use checker::{CheckOptions, Checker, Leaf, Member};
pub use config::Settings;
pub use decorate::{Bounded, Decorator, Typed};
pub use error::{ArgumentCheckFailed, CheckError, CheckErrorKind, CompositionError, Error, Result, SpecError};
pub use signature::{CallableKind, Signature};
pub use spec::{Spec, SpecId, SpecTable};
pub use value::{TypeTag, Value};

pub mod prelude {
    pub use crate::binder::{Args, Checked};
    pub use crate::checker::Checker;
    pub use crate::config::Settings;
    pub use crate::decorate::{Bounded, Typed};
    pub use crate::error::{ArgumentCheckFailed, CheckErrorKind};
    pub use crate::leaf::{
        contains, has_attrs, identifier, iterable, just, just_call, just_len, non_empty, one_of, within, LenSpec,
    };
    pub use crate::signature::Signature;
    pub use crate::spec::Spec;
    pub use crate::value::{TypeTag, Value};
}

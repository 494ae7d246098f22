//! Decoration surface: `Typed` and `Bounded`.
//!
//! ```
//! use argcheck::prelude::*;
//!
//! let add = Typed::new([Spec::types([TypeTag::Int, TypeTag::Float])])
//!     .named("z", TypeTag::Int)
//!     .wrap(Signature::new("add").param("x").param("y").param_default("z", 3), |args: Args| {
//!         args.positional.len()
//!     })
//!     .unwrap();
//! assert!(add.call(Args::new([Value::float(1.0), Value::Int(2)])).is_ok());
//! assert!(add.call(Args::new([Value::float(1.0)]).with_kwarg("z", "a")).is_err());
//! ```
use std::marker::PhantomData;

use crate::binder::{ArgumentBinder, Checked};
use crate::config::Settings;
use crate::error::SpecError;
use crate::signature::Signature;
use crate::spec::{BoundsFamily, Family, Spec, SpecTable, TypeFamily};

/// Holds a declaration until it is applied to a callable. Both families
/// share this type and the binder; only `F` differs.
#[derive(Debug, Clone)]
pub struct Decorator<F: Family> {
    table: SpecTable,
    settings: Settings,
    family: PhantomData<fn() -> F>,
}

pub type Typed = Decorator<TypeFamily>;
pub type Bounded = Decorator<BoundsFamily>;

impl<F: Family> Decorator<F> {
    pub fn new(positional: impl IntoIterator<Item = Spec>) -> Self {
        Self::from_table(SpecTable::new(positional))
    }

    pub fn from_table(table: SpecTable) -> Self {
        Self { table, settings: Settings::default(), family: PhantomData }
    }

    pub fn named(mut self, name: impl Into<String>, spec: impl Into<Spec>) -> Self {
        self.table = self.table.named(name, spec);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn table(&self) -> &SpecTable {
        &self.table
    }

    /// Merge and compile against `signature`. Fails on any malformed spec.
    pub fn binder(&self, signature: &Signature) -> Result<ArgumentBinder, SpecError> {
        ArgumentBinder::new::<F>(&self.table, signature, &self.settings)
    }

    pub fn wrap<C>(&self, signature: Signature, callable: C) -> Result<Checked<C>, SpecError> {
        let binder = self.binder(&signature)?;
        Ok(Checked::new(signature, binder, callable))
    }

    /// Decorate an already checked callable. The new layer runs first and
    /// is merged independently of the existing ones.
    pub fn stack<C>(&self, checked: Checked<C>) -> Result<Checked<C>, SpecError> {
        let binder = self.binder(checked.signature())?;
        Ok(checked.push_outer(binder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Args;
    use crate::error::CheckErrorKind;
    use crate::value::{TypeTag, Value};

    fn sig() -> Signature {
        Signature::new("f").param("x").param("y")
    }

    #[test]
    fn invalid_specs_fail_at_decoration() {
        let err = Typed::new([Spec::List(vec![])]).wrap(sig(), |_: Args| ()).unwrap_err();
        assert!(err.to_string().contains("positional spec #0"), "{err}");
    }

    #[test]
    fn stacked_layers_are_independent() {
        // inner layer types x by position, outer layer types y by name only
        let inner = Typed::new([Spec::ty(TypeTag::Int)]).wrap(sig(), |_: Args| "called").unwrap();
        let both = Bounded::new([]).named("y", Spec::bounds(0, 9)).stack(inner).unwrap();
        assert_eq!(both.layers().len(), 2);

        assert_eq!(both.call(Args::new([Value::Int(1), Value::Int(5)])), Ok("called"));
        let err = both.call(Args::new([Value::Int(1), Value::Int(50)])).unwrap_err();
        assert_eq!((err.argument.as_str(), err.cause.kind()), ("y", CheckErrorKind::OutOfBounds));
        let err = both.call(Args::new([Value::str("1"), Value::Int(5)])).unwrap_err();
        assert_eq!((err.argument.as_str(), err.cause.kind()), ("x", CheckErrorKind::WrongType));
    }

    #[test]
    fn callable_is_not_invoked_on_failure() {
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let f = Typed::new([Spec::ty(TypeTag::Int)])
            .wrap(sig(), |_: Args| calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst))
            .unwrap();
        assert!(f.call(Args::new([Value::None])).is_err());
        assert!(f.call(Args::new([Value::Int(1)])).is_ok());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn settings_reach_the_binder() {
        let settings = Settings { label_width: 3, receiver_names: vec!["me".into()], log_failures: false };
        let f = Typed::new([Spec::ty(TypeTag::Int)])
            .with_settings(settings)
            .wrap(Signature::new("m").param("me").param("n"), |_: Args| ())
            .unwrap();
        let err = f.call(Args::new([Value::None, Value::str("n")])).unwrap_err();
        assert_eq!(err.argument, "n");
        assert_eq!(err.to_string().split(": ").next(), Some("method `m` defined in module `__main__`"));
    }
}

//! Shape dispatch. First matching shape wins:
//!
//! 1. skip marker: identity
//! 2. tuple: family leaf (bounds pairs), then repeating (one skip), positional
//!    (every entry a collection) or OR-set (every entry concrete)
//! 3. one-member list / set, one-entry map: element-wise container
//! 4. bare constraint: family leaf
//!
//! Anything else is `SpecError::Invalid`, raised here and never deferred.
use crate::checker::Checker;
use crate::error::SpecError;
use crate::leaf::each::{list_of, map_of, set_of, slots, tuple_of};
use crate::leaf::types::bare_just;
use crate::value::{TypeTag, Value};

use super::{Spec, SpecId};

/// The seam between the two constraint families. Both share the dispatch
/// below and differ only in how concrete constraints become leaves.
pub trait Family: Send + Sync + 'static {
    const NAME: &'static str;

    /// Read a JSON scalar of the declaration format.
    fn literal(value: Value) -> Spec;

    /// Claim a whole tuple as one leaf before generic dispatch.
    fn tuple_leaf(_items: &[Spec]) -> Option<Result<Checker, String>> {
        None
    }

    /// A bare concrete constraint.
    fn single(spec: &Spec) -> Result<Checker, String>;

    /// A flat tuple of concrete constraints.
    fn any_of(items: &[Spec]) -> Result<Checker, String>;
}

/// Compile one spec. `id` only feeds the error text; the returned checker
/// holds no reference to it.
pub fn compile<F: Family>(spec: &Spec, id: &SpecId) -> Result<Checker, SpecError> {
    compile_shape::<F>(spec).map_err(|reason| SpecError::Invalid {
        family: F::NAME,
        ident: id.to_string(),
        reason,
    })
}

fn compile_shape<F: Family>(spec: &Spec) -> Result<Checker, String> {
    match spec {
        Spec::Skip => Ok(Checker::identity()),
        Spec::Tuple(items) => compile_tuple::<F>(items),
        Spec::List(items) => match items.as_slice() {
            [element] => Ok(list_of(&compile_shape::<F>(element)?)),
            _ => Err(format!("list spec {spec} must have exactly one member")),
        },
        Spec::Set(items) => match items.as_slice() {
            [element] => Ok(set_of(&compile_shape::<F>(element)?)),
            _ => Err(format!("set spec {spec} must have exactly one member")),
        },
        Spec::Map(entries) => match entries.as_slice() {
            [(key, value)] => Ok(map_of(&compile_shape::<F>(key)?, &compile_shape::<F>(value)?)),
            _ => Err(format!("map spec {spec} must have exactly one entry")),
        },
        Spec::Type(_) | Spec::Value(_) => F::single(spec),
    }
}

fn compile_tuple<F: Family>(items: &[Spec]) -> Result<Checker, String> {
    if let Some(leaf) = F::tuple_leaf(items) {
        return leaf;
    }
    if items.is_empty() {
        return Err("empty tuple spec constrains nothing".into());
    }

    let skips = items.iter().filter(|s| s.is_skip()).count();
    if skips > 1 {
        return Err(format!("tuple spec {} has {skips} skip markers; at most one is allowed", Spec::Tuple(items.to_vec())));
    }
    if skips == 1 {
        let rest: Vec<Spec> = items.iter().filter(|s| !s.is_skip()).cloned().collect();
        let element = match rest.as_slice() {
            [] => return Ok(bare_just(TypeTag::Tuple)),
            [one] if one.is_collection() => compile_shape::<F>(one)?,
            many if many.iter().all(Spec::is_concrete) => compile_tuple::<F>(many)?,
            _ => {
                return Err(format!(
                    "repeating tuple spec {} mixes entry kinds",
                    Spec::Tuple(items.to_vec())
                ));
            }
        };
        return Ok(tuple_of(&element));
    }

    if items.iter().all(Spec::is_collection) {
        let compiled = items.iter().map(compile_shape::<F>).collect::<Result<Vec<_>, _>>()?;
        return Ok(slots(compiled));
    }
    if items.iter().all(Spec::is_concrete) {
        return F::any_of(items);
    }
    Err(format!(
        "tuple spec {} mixes concrete constraints and nested collections",
        Spec::Tuple(items.to_vec())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckErrorKind;
    use crate::spec::{BoundsFamily, TypeFamily};

    fn typed(spec: Spec) -> Checker {
        compile::<TypeFamily>(&spec, &SpecId::Name("x".into())).unwrap()
    }

    fn typed_err(spec: Spec) -> SpecError {
        compile::<TypeFamily>(&spec, &SpecId::Name("x".into())).unwrap_err()
    }

    #[test]
    fn skip_is_identity() {
        assert!(typed(Spec::Skip).is_identity());
    }

    #[test]
    fn flat_type_tuple_is_an_or_set() {
        let c = typed(Spec::types([TypeTag::Int, TypeTag::Float]));
        assert!(c.check(&Value::float(1.0), None).is_ok());
        assert!(c.check(&Value::Int(1), None).is_ok());
        let err = c.check(&Value::str("a"), Some("x")).unwrap_err();
        assert_eq!(err.message(), "Type of x must be one of int, float, not str!");
    }

    #[test]
    fn tuple_of_tuples_is_positional() {
        let c = typed(Spec::tuple([Spec::types([TypeTag::Int]), Spec::types([TypeTag::Str, TypeTag::None])]));
        assert!(c.check(&Value::tuple([Value::Int(1), Value::None]), None).is_ok());
        let err = c.check(&Value::tuple([Value::Int(1)]), Some("t")).unwrap_err();
        assert_eq!(err.kind(), CheckErrorKind::WrongLength);
        let err = c.check(&Value::tuple([Value::str("a"), Value::str("b")]), Some("t")).unwrap_err();
        assert_eq!(err.message(), "Type of t[0] must be int, not str!");
    }

    #[test]
    fn slots_may_repeat_internally() {
        let c = typed(Spec::tuple([Spec::types([TypeTag::Int]), Spec::repeat(TypeTag::Str)]));
        let ok = Value::tuple([Value::Int(1), Value::tuple([Value::str("a"), Value::str("b")])]);
        assert!(c.check(&ok, None).is_ok());
        let bad = Value::tuple([Value::Int(1), Value::tuple([Value::str("a"), Value::Int(2)])]);
        let err = c.check(&bad, Some("t")).unwrap_err();
        assert_eq!(err.message(), "Type of t[1][1] must be str, not int!");
    }

    #[test]
    fn repeating_tuple_reports_index() {
        let c = typed(Spec::repeat(TypeTag::Int));
        assert!(c.check(&Value::tuple([]), None).is_ok());
        let err = c.check(&Value::tuple([Value::Int(1), Value::Int(2), Value::str("3")]), Some("t")).unwrap_err();
        assert_eq!(err.message(), "Type of t[2] must be int, not str!");
        assert!(c.check(&Value::list([Value::Int(1)]), None).is_err());

        let either = typed(Spec::tuple([Spec::Type(TypeTag::Int), Spec::Type(TypeTag::Float), Spec::Skip]));
        assert!(either.check(&Value::tuple([Value::Int(1), Value::float(2.0)]), None).is_ok());
    }

    #[test]
    fn elementwise_containers() {
        let c = typed(Spec::list(TypeTag::Int));
        let err = c.check(&Value::list([Value::Int(1), Value::str("a")]), Some("xs")).unwrap_err();
        assert_eq!(err.message(), "Type of xs[1] must be int, not str!");

        let c = typed(Spec::set(Spec::types([TypeTag::Int, TypeTag::Str])));
        assert!(c.check(&Value::set([Value::Int(1), Value::str("a")]), None).is_ok());

        let c = typed(Spec::map(Spec::Skip, TypeTag::Int));
        assert!(c.check(&Value::map([(Value::None, Value::Int(1))]), None).is_ok());
        assert!(c.check(&Value::map([(Value::None, Value::None)]), None).is_err());
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        let err = typed_err(Spec::List(vec![Spec::Type(TypeTag::Int), Spec::Type(TypeTag::Str)]));
        assert!(err.to_string().contains("exactly one member"), "{err}");
        assert!(err.to_string().starts_with("invalid type spec for `x`"), "{err}");

        typed_err(Spec::Map(vec![]));
        typed_err(Spec::Tuple(vec![]));
        typed_err(Spec::tuple([Spec::Skip, Spec::Type(TypeTag::Int), Spec::Skip]));
        typed_err(Spec::tuple([Spec::Type(TypeTag::Int), Spec::list(TypeTag::Int)]));
        typed_err(Spec::tuple([Spec::list(TypeTag::Int), Spec::list(TypeTag::Int), Spec::Skip]));
        typed_err(Spec::Value(Value::Int(3)));
    }

    #[test]
    fn bounds_pairs_are_intervals_not_sets() {
        let id = SpecId::Position(0);
        let c = compile::<BoundsFamily>(&Spec::bounds(1, 3), &id).unwrap();
        assert!(c.check(&Value::Int(2), None).is_ok());
        assert_eq!(c.check(&Value::Int(4), None).unwrap_err().kind(), CheckErrorKind::OutOfBounds);

        let open = compile::<BoundsFamily>(&Spec::bounds(1, Spec::Skip), &id).unwrap();
        assert!(open.check(&Value::Int(1_000), None).is_ok());

        let many = compile::<BoundsFamily>(&Spec::repeat(Spec::bounds(0, 9)), &id).unwrap();
        let err = many.check(&Value::tuple([Value::Int(1), Value::Int(10)]), Some("t")).unwrap_err();
        assert_eq!(err.message(), "Value of t[1] must lie in [0, 9], not 10!");

        let err = compile::<BoundsFamily>(&Spec::Value(Value::Int(1)), &id).unwrap_err();
        assert!(err.to_string().starts_with("invalid bounds spec for positional spec #0"), "{err}");
        assert!(compile::<BoundsFamily>(&Spec::tuple([Spec::from(1), Spec::from(2), Spec::from(3)]), &id).is_err());
        assert!(compile::<BoundsFamily>(&Spec::bounds(3, 1), &id).is_err());
    }

    #[test]
    fn compiled_checkers_do_not_retain_the_identifier() {
        let a = compile::<TypeFamily>(&Spec::ty(TypeTag::Int), &SpecId::Name("a".into())).unwrap();
        let err = a.check(&Value::None, Some("b")).unwrap_err();
        assert_eq!(err.message(), "Type of b must be int, not NoneType!");
    }
}

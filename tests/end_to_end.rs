use argcheck::prelude::*;
use argcheck::{ArgumentBinder, SpecTable};
use argcheck::spec::TypeFamily;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn int(args: &Args, i: usize, name: &str, default: i64) -> i64 {
    let v = args.arg(i).or_else(|| args.kwarg(name));
    match v {
        Some(Value::Int(i)) => *i,
        Some(Value::Float(f)) => f.0 as i64,
        _ => default,
    }
}

// f(x, y=6, *args, **kwargs) -> x + y + sum(args) + sum(kwargs)
fn interval_f() -> Checked<impl Fn(Args) -> i64> {
    let sig = Signature::new("f").module("demo").param("x").param_default("y", 6).var_args("args").var_kwargs("kwargs");
    Bounded::new([Spec::bounds(1, 3), Spec::bounds(4, 6)])
        .wrap(sig, |args: Args| {
            let rest: i64 = args.positional.iter().skip(2).map(|v| if let Value::Int(i) = v { *i } else { 0 }).sum();
            let kw: i64 = args.keyword.values().map(|v| if let Value::Int(i) = v { *i } else { 0 }).sum();
            int(&args, 0, "x", 0) + int(&args, 1, "y", 6) + rest + kw
        })
        .unwrap()
}

#[test]
fn interval_scenario() {
    let f = interval_f();
    let args = Args::new([1, 5, 3, 4].map(Value::Int)).with_kwarg("z", 2);
    assert_eq!(f.call(args), Ok(15));

    let err = f.call(Args::new([Value::str("foo"), Value::Int(5)])).unwrap_err();
    assert_eq!(err.argument, "x");
    assert_eq!(err.cause.kind(), CheckErrorKind::WrongType);
    assert_eq!(err.cause.message(), "Type of x must be comparable with int and int, not str!");

    let err = f.call(Args::new([Value::Int(5), Value::str("foo")])).unwrap_err();
    assert_eq!((err.argument.as_str(), err.cause.kind()), ("x", CheckErrorKind::OutOfBounds));

    let err = f.call(Args::new([Value::Int(2), Value::str("foo")])).unwrap_err();
    assert_eq!((err.argument.as_str(), err.cause.kind()), ("y", CheckErrorKind::WrongType));

    let err = f.call(Args::new([Value::Int(2), Value::Int(7)])).unwrap_err();
    assert_eq!(err.argument, "y");
    assert_eq!(err.cause.message(), "Value of y must lie in [4, 6], not 7!");
    assert!(err.to_string().starts_with("function `f` defined in module `demo`"));
}

#[test]
fn typed_scenario() {
    let sig = Signature::new("f").param("x").param("y").param_default("z", 3);
    let f = Typed::new([Spec::types([TypeTag::Int, TypeTag::Float])])
        .named("z", TypeTag::Int)
        .wrap(sig, |args: Args| int(&args, 0, "x", 0) + int(&args, 1, "y", 0) + int(&args, 2, "z", 3))
        .unwrap();

    assert_eq!(f.call(Args::new([Value::float(1.0), Value::Int(2)])), Ok(6));

    let err = f.call(Args::new([Value::float(1.0), Value::Int(2)]).with_kwarg("z", "a")).unwrap_err();
    assert_eq!(err.argument, "z");
    assert_eq!(err.cause.kind(), CheckErrorKind::WrongType);
    let source = std::error::Error::source(&err).map(ToString::to_string);
    assert_eq!(source.as_deref(), Some("Type of z must be int, not str!"));
}

#[test]
fn fluent_chains_from_the_catalogue() {
    let names = just([TypeTag::Str]).chain("List.NonEmpty").unwrap();
    assert!(names.check(&Value::list([Value::str("a")]), Some("names")).is_ok());
    let err = names.check(&Value::list([]), Some("names")).unwrap_err();
    assert_eq!(err.message(), "names must not be empty!");

    let small = within(Some(Value::Int(0)), Some(Value::Int(10))).unwrap();
    let small_ints = small.o(&just([TypeTag::Int])).chain("Tuple").unwrap();
    let err = small_ints.check(&Value::tuple([Value::Int(1)]), Some("t")).unwrap_err();
    // the composite runs on the tuple itself first
    assert_eq!(err.kind(), CheckErrorKind::WrongType);
}

// ---- properties ---------------------------------------------------------- //

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::None),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<f64>().prop_map(Value::float),
        "[a-z]{0,6}".prop_map(Value::str),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::vec(inner, 0..4).prop_map(Value::Tuple),
        ]
    })
}

fn arb_type() -> impl Strategy<Value = TypeTag> {
    prop_oneof![
        Just(TypeTag::Int),
        Just(TypeTag::Float),
        Just(TypeTag::Str),
        Just(TypeTag::None),
        Just(TypeTag::List),
        Just(TypeTag::Tuple),
    ]
}

proptest! {
    #[test]
    fn prop_skip_accepts_anything(before in arb_type(), value in arb_value()) {
        let sig = Signature::new("f").param("a").param("b");
        let f = Typed::new([Spec::ty(before), Spec::Skip]).wrap(sig, |_: Args| ()).unwrap();
        // `b` sits behind a skip marker and may hold anything; only `a` is checked
        let outcome = f.call(Args::new([Value::Int(0), value.clone()]));
        if let Err(err) = outcome {
            prop_assert_eq!(err.argument, "a");
        }
        let f = Typed::new([Spec::tuple([Spec::Skip])]).wrap(Signature::new("g").param("t"), |_: Args| ()).unwrap();
        prop_assert!(f.call(Args::new([Value::tuple([value])])).is_ok());
    }

    #[test]
    fn prop_keyword_specs_win(positional in arb_type(), keyword in arb_type(), value in arb_value()) {
        let sig = Signature::new("f").param("x").param("y");
        let both = ArgumentBinder::new::<TypeFamily>(
            &SpecTable::new([Spec::Skip, Spec::ty(positional)]).named("y", keyword.clone()),
            &sig,
            &Settings::default(),
        ).unwrap();
        let alone = ArgumentBinder::new::<TypeFamily>(
            &SpecTable::default().named("y", keyword),
            &sig,
            &Settings::default(),
        ).unwrap();
        prop_assert_eq!(both.checkers()["y"].label(), alone.checkers()["y"].label());
        let a = both.checkers()["y"].check(&value, Some("y")).map(|_| ()).map_err(|e| e.to_string());
        let b = alone.checkers()["y"].check(&value, Some("y")).map(|_| ()).map_err(|e| e.to_string());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_variadics_are_never_checked(rest in prop::collection::vec(arb_value(), 0..6), extra in arb_value()) {
        let sig = Signature::new("f").param("x").var_args("rest").var_kwargs("kw");
        let f = Typed::new([Spec::ty(TypeTag::Int)]).wrap(sig, |_: Args| ()).unwrap();
        let mut positional = vec![Value::Int(1)];
        positional.extend(rest);
        prop_assert!(f.call(Args::new(positional).with_kwarg("whatever", extra)).is_ok());
    }

    #[test]
    fn prop_list_spec_reports_first_bad_index(items in prop::collection::vec(prop_oneof![
        any::<i64>().prop_map(Value::Int),
        "[a-z]{1,3}".prop_map(Value::str),
    ], 0..8)) {
        let f = Typed::new([Spec::list(TypeTag::Int)]).wrap(Signature::new("f").param("xs"), |_: Args| ()).unwrap();
        let outcome = f.call(Args::new([Value::List(items.clone())]));
        match items.iter().position(|v| !matches!(v, Value::Int(_))) {
            None => prop_assert!(outcome.is_ok()),
            Some(i) => {
                let err = outcome.unwrap_err();
                prop_assert_eq!(err.cause.kind(), CheckErrorKind::WrongType);
                let expected = format!("xs[{}]", i);
                prop_assert!(err.cause.message().contains(&expected));
            }
        }
    }

    #[test]
    fn prop_fixed_tuple_length(len in 0usize..6) {
        let spec = Spec::tuple([Spec::types([TypeTag::Int]), Spec::types([TypeTag::Int]), Spec::types([TypeTag::Int])]);
        let f = Typed::new([spec]).wrap(Signature::new("f").param("t"), |_: Args| ()).unwrap();
        let outcome = f.call(Args::new([Value::tuple((0..len as i64).map(Value::Int))]));
        if len == 3 {
            prop_assert!(outcome.is_ok());
        } else {
            prop_assert_eq!(outcome.unwrap_err().cause.kind(), CheckErrorKind::WrongLength);
        }
    }
}

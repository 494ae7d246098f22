//! Family registry: equips a base leaf with its chainable variants.
//!
//! Runs once per constructed leaf. Every variant is an ordinary composite,
//! and every container variant carries its own `NonEmpty`.
use crate::checker::Checker;

use super::each::{all, list_of, map_of, set_of, tuple_of};
use super::len::bare_non_empty;

pub const VARIANTS: [&str; 6] = ["NonEmpty", "All", "List", "Tuple", "Set", "Map"];

pub fn family(base: Checker) -> Checker {
    let non_empty = bare_non_empty();
    let containers = [
        ("All", all(&base)),
        ("List", list_of(&base)),
        ("Tuple", tuple_of(&base)),
        ("Set", set_of(&base)),
        ("Map", map_of(&Checker::identity(), &base)),
    ];
    let mut equipped = base.clone().with_chain("NonEmpty", non_empty.o(&base));
    for (name, variant) in containers {
        let chained = non_empty.o(&variant);
        let variant = variant.with_chain("NonEmpty", chained);
        equipped = equipped.with_chain(name, variant);
    }
    equipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckErrorKind;
    use crate::leaf::{just, within};
    use crate::value::{TypeTag, Value};

    #[test]
    fn every_variant_is_registered() {
        let c = just([TypeTag::Int]);
        assert_eq!(c.chain_names(), VARIANTS.to_vec());
        for name in &VARIANTS[1..] {
            assert!(c.chain(&format!("{name}.NonEmpty")).is_ok(), "{name}");
        }
    }

    #[test]
    fn list_non_empty_runs_list_check_first() {
        let c = just([TypeTag::Int]).chain("List.NonEmpty").unwrap();
        assert!(c.check(&Value::list([Value::Int(1)]), None).is_ok());
        let err = c.check(&Value::list([]), Some("xs")).unwrap_err();
        assert_eq!(err.kind(), CheckErrorKind::EmptyValue);
        let err = c.check(&Value::list([Value::str("a")]), Some("xs")).unwrap_err();
        assert_eq!(err.kind(), CheckErrorKind::WrongType);
    }

    #[test]
    fn base_non_empty_runs_after_the_base() {
        let c = just([TypeTag::Str]).chain("NonEmpty").unwrap();
        assert_eq!(c.check(&Value::Int(1), None).unwrap_err().kind(), CheckErrorKind::WrongType);
        assert_eq!(c.check(&Value::str(""), None).unwrap_err().kind(), CheckErrorKind::EmptyValue);
    }

    #[test]
    fn map_variant_checks_values() {
        let c = within(Some(Value::Int(0)), Some(Value::Int(9))).unwrap().chain("Map").unwrap();
        let ok = Value::map([(Value::str("a"), Value::Int(3))]);
        assert!(c.check(&ok, None).is_ok());
        let bad = Value::map([(Value::str("a"), Value::Int(30))]);
        let err = c.check(&bad, Some("m")).unwrap_err();
        assert_eq!(err.message(), "Value of m['a'] must lie in [0, 9], not 30!");
    }

    #[test]
    fn variants_survive_composition() {
        let non_neg = within(Some(Value::Int(0)), None).unwrap();
        let c = non_neg.o(&just([TypeTag::Int]));
        let list = c.chain("List").unwrap();
        // the composite runs first, so a list is rejected before its elements are seen
        assert_eq!(
            list.check(&Value::list([Value::Int(1)]), Some("x")).unwrap_err().kind(),
            CheckErrorKind::WrongType
        );
    }
}

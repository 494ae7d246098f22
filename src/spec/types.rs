use crate::checker::Checker;
use crate::leaf::just;
use crate::value::{TypeTag, Value};

use super::compile::Family;
use super::Spec;

/// Type constraints: bare types, and flat tuples as OR-sets of types.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeFamily;

fn as_type(spec: &Spec) -> Result<TypeTag, String> {
    match spec {
        Spec::Type(tag) | Spec::Value(Value::Type(tag)) => Ok(tag.clone()),
        other => Err(format!("{other} is not a type")),
    }
}

impl Family for TypeFamily {
    const NAME: &'static str = "type";

    fn literal(value: Value) -> Spec {
        match value {
            Value::Str(name) => Spec::Type(TypeTag::parse(&name)),
            Value::None => Spec::Type(TypeTag::None),
            Value::Type(tag) => Spec::Type(tag),
            other => Spec::Value(other),
        }
    }

    fn single(spec: &Spec) -> Result<Checker, String> {
        Ok(just([as_type(spec)?]))
    }

    fn any_of(items: &[Spec]) -> Result<Checker, String> {
        let tags = items.iter().map(as_type).collect::<Result<Vec<_>, _>>()?;
        Ok(just(tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_name_types() {
        assert_eq!(TypeFamily::literal(Value::str("int")), Spec::Type(TypeTag::Int));
        assert_eq!(TypeFamily::literal(Value::str("Dog")), Spec::Type(TypeTag::Class("Dog".into())));
        assert_eq!(TypeFamily::literal(Value::None), Spec::Type(TypeTag::None));
        assert_eq!(TypeFamily::literal(Value::Int(1)), Spec::Value(Value::Int(1)));
    }

    #[test]
    fn type_values_count_as_types() {
        let c = TypeFamily::single(&Spec::Value(Value::Type(TypeTag::Str))).unwrap();
        assert!(c.check(&Value::str("s"), None).is_ok());
        assert!(TypeFamily::any_of(&[Spec::Type(TypeTag::Int), Spec::Value(Value::Int(1))]).is_err());
    }
}

use crate::checker::{Checker, Label, Leaf};
use crate::error::CheckError;
use crate::value::{TypeTag, Value};

/// Instance of at least one of the listed types.
pub struct Just {
    types: Vec<TypeTag>,
}

impl Just {
    fn expected(&self) -> String {
        match self.types.as_slice() {
            [one] => one.to_string(),
            many => {
                let names: Vec<&str> = many.iter().map(TypeTag::name).collect();
                format!("one of {}", names.join(", "))
            }
        }
    }
}

impl Leaf for Just {
    fn label(&self) -> String {
        let names: Vec<&str> = self.types.iter().map(TypeTag::name).collect();
        format!("Just({})", names.join(" | "))
    }

    fn check(&self, value: &Value, label: Label<'_>) -> Result<(), CheckError> {
        if self.types.iter().any(|t| t.admits(value)) {
            return Ok(());
        }
        Err(CheckError::WrongType(format!(
            "Type of {label} must be {}, not {}!",
            self.expected(),
            value.type_name()
        )))
    }

    fn members(&self) -> Vec<(String, Value)> {
        let types = self.types.iter().cloned().map(Value::Type).collect();
        vec![("types".into(), Value::Tuple(types))]
    }
}

pub(crate) fn bare_just(tag: TypeTag) -> Checker {
    Checker::leaf(Just { types: vec![tag] })
}

pub fn just(types: impl IntoIterator<Item = TypeTag>) -> Checker {
    let types = types.into_iter().collect();
    super::family::family(Checker::leaf(Just { types }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_label_and_expectation() {
        let c = just([TypeTag::Int, TypeTag::Float]);
        assert!(c.check(&Value::Int(1), Some("x")).is_ok());
        assert!(c.check(&Value::float(1.0), Some("x")).is_ok());
        let err = c.check(&Value::str("a"), Some("x")).unwrap_err();
        assert_eq!(err.message(), "Type of x must be one of int, float, not str!");

        let err = just([TypeTag::Str]).check(&Value::Int(3), None).unwrap_err();
        assert_eq!(err.message(), "Type of 3 must be str, not int!");
    }

    #[test]
    fn admitted_types_are_plain_metadata() {
        let c = just([TypeTag::Int]);
        assert_eq!(
            c.plain_members().get("types"),
            Some(&Value::tuple([Value::Type(TypeTag::Int)]))
        );
        assert_eq!(c.label(), "Just(int)");
    }
}

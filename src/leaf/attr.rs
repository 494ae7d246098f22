use crate::checker::{Checker, Label, Leaf};
use crate::error::CheckError;
use crate::value::Value;

/// Object carries every listed attribute.
pub struct HasAttrs {
    names: Vec<String>,
}

impl Leaf for HasAttrs {
    fn label(&self) -> String {
        format!("HasAttrs({})", self.names.join(", "))
    }

    fn check(&self, value: &Value, label: Label<'_>) -> Result<(), CheckError> {
        match self.names.iter().find(|name| value.attr(name).is_none()) {
            None => Ok(()),
            Some(missing) => Err(CheckError::MissingAttribute(format!(
                "{label} must have attribute '{missing}'!"
            ))),
        }
    }

    fn members(&self) -> Vec<(String, Value)> {
        let names = self.names.iter().map(|n| Value::str(n.as_str())).collect();
        vec![("attrs".into(), Value::Tuple(names))]
    }
}

pub struct JustCall;

impl Leaf for JustCall {
    fn label(&self) -> String {
        "JustCall".into()
    }

    fn check(&self, value: &Value, label: Label<'_>) -> Result<(), CheckError> {
        if value.is_callable() {
            return Ok(());
        }
        Err(CheckError::NotCallable(format!(
            "{label} of type {} must be callable!",
            value.type_name()
        )))
    }
}

pub fn has_attrs<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Checker {
    let names = names.into_iter().map(Into::into).collect();
    super::family::family(Checker::leaf(HasAttrs { names }))
}

pub fn just_call() -> Checker {
    super::family::family(Checker::leaf(JustCall))
}

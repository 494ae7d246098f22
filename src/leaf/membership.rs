use once_cell::sync::Lazy;
use regex::Regex;

use crate::checker::{Checker, Label, Leaf};
use crate::error::CheckError;
use crate::value::Value;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}\p{Nl}_][\p{L}\p{Nl}\p{Mn}\p{Mc}\p{Nd}\p{Pc}]*$").expect("identifier regex")
});

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// String usable as a host identifier (and not a reserved word).
pub struct Identifier;

impl Leaf for Identifier {
    fn label(&self) -> String {
        "Identifier".into()
    }

    fn check(&self, value: &Value, label: Label<'_>) -> Result<(), CheckError> {
        let Value::Str(s) = value else {
            return Err(CheckError::WrongType(format!(
                "Type of {label} must be str, not {}!",
                value.type_name()
            )));
        };
        if !IDENTIFIER.is_match(s) {
            return Err(CheckError::InvalidIdentifier(format!(
                "{label} must be a valid identifier, not '{s}'!"
            )));
        }
        if KEYWORDS.contains(&s.as_str()) {
            return Err(CheckError::InvalidIdentifier(format!(
                "{label} must not be the reserved word '{s}'!"
            )));
        }
        Ok(())
    }
}

/// Container holds every listed item (substring test for strings).
pub struct Contains {
    items: Vec<Value>,
}

impl Leaf for Contains {
    fn label(&self) -> String {
        format!("Contains{}", Value::Tuple(self.items.clone()))
    }

    fn check(&self, value: &Value, label: Label<'_>) -> Result<(), CheckError> {
        let elements = value.elements().ok_or_else(|| {
            CheckError::NotIterable(format!("{label} of type {} is not iterable!", value.type_name()))
        })?;
        for item in &self.items {
            let found = match (value, item) {
                (Value::Str(hay), Value::Str(needle)) => hay.contains(needle.as_str()),
                _ => elements.iter().any(|el| el.loose_eq(item)),
            };
            if !found {
                return Err(CheckError::ItemNotFound(format!("Could not find {item} in {label}!")));
            }
        }
        Ok(())
    }

    fn members(&self) -> Vec<(String, Value)> {
        vec![("items".into(), Value::Tuple(self.items.clone()))]
    }
}

/// Value equals one of an enumerated set of options.
pub struct OneOf {
    options: Vec<Value>,
}

impl Leaf for OneOf {
    fn label(&self) -> String {
        format!("OneOf{}", Value::Tuple(self.options.clone()))
    }

    fn check(&self, value: &Value, label: Label<'_>) -> Result<(), CheckError> {
        if self.options.iter().any(|o| o.loose_eq(value)) {
            return Ok(());
        }
        Err(CheckError::ItemNotFound(format!(
            "Value of {label} must be one of {}, not {value}!",
            Value::Tuple(self.options.clone())
        )))
    }

    fn members(&self) -> Vec<(String, Value)> {
        vec![("options".into(), Value::Tuple(self.options.clone()))]
    }
}

pub fn identifier() -> Checker {
    super::family::family(Checker::leaf(Identifier))
}

pub fn contains(items: impl IntoIterator<Item = Value>) -> Checker {
    let items = items.into_iter().collect();
    super::family::family(Checker::leaf(Contains { items }))
}

pub fn one_of(options: impl IntoIterator<Item = Value>) -> Checker {
    let options = options.into_iter().collect();
    super::family::family(Checker::leaf(OneOf { options }))
}

//! Element-wise wrappers: run one checker over the items of a container.
//!
//! Ordered containers report the offending index (`x[2]`); sets and map keys
//! have no stable position and are reported as `an element of x` /
//! `a key of x`.
use crate::checker::Checker;
use crate::error::CheckError;
use crate::value::{TypeTag, Value};

use super::len::bare_iterable;
use super::types::bare_just;

fn each(element: &Checker) -> Checker {
    if element.is_identity() {
        return Checker::identity();
    }
    let element = element.clone();
    Checker::new(format!("Each({element})"), move |value, name, opts| {
        let parent = opts.label(value, name);
        let items = value.elements().ok_or_else(|| {
            CheckError::NotIterable(format!("{parent} of type {} is not iterable!", value.type_name()))
        })?;
        let parent = parent.to_string();
        for (i, item) in items.iter().enumerate() {
            let label = match value {
                Value::Set(_) => format!("an element of {parent}"),
                Value::Map(_) => format!("a key of {parent}"),
                _ => format!("{parent}[{i}]"),
            };
            element.run(item, Some(&label), opts)?;
        }
        Ok(())
    })
}

/// Any iterable whose every element passes `element`.
pub fn all(element: &Checker) -> Checker {
    each(element).o(&bare_iterable()).with_label(format!("All({element})"))
}

pub fn list_of(element: &Checker) -> Checker {
    each(element).o(&bare_just(TypeTag::List)).with_label(format!("[{element}]"))
}

/// Tuple of any length, every element passing `element`.
pub fn tuple_of(element: &Checker) -> Checker {
    each(element).o(&bare_just(TypeTag::Tuple)).with_label(format!("({element}, ...)"))
}

pub fn set_of(element: &Checker) -> Checker {
    each(element).o(&bare_just(TypeTag::Set)).with_label(format!("{{{element}}}"))
}

/// Mapping whose keys pass `key` and whose values pass `value`.
pub fn map_of(key: &Checker, value: &Checker) -> Checker {
    let kind = bare_just(TypeTag::Map);
    let label = format!("{{{key}: {value}}}");
    if key.is_identity() && value.is_identity() {
        return kind.with_label(label);
    }
    let (key, val) = (key.clone(), value.clone());
    let entries = Checker::new("Entries", move |value, name, opts| {
        let Value::Map(map) = value else {
            return Ok(());
        };
        let parent = opts.label(value, name).to_string();
        for (k, v) in map {
            key.run(k, Some(&format!("a key of {parent}")), opts)?;
            val.run(v, Some(&format!("{parent}[{k}]")), opts)?;
        }
        Ok(())
    });
    entries.o(&kind).with_label(label)
}

/// Tuple of exactly `slots.len()` items, item `i` passing `slots[i]`.
pub fn slots(slots: Vec<Checker>) -> Checker {
    let names: Vec<&str> = slots.iter().map(Checker::label).collect();
    let label = match names.as_slice() {
        [one] => format!("({one},)"),
        many => format!("({})", many.join(", ")),
    };
    let n = slots.len();
    let check = Checker::new("Slots", move |value, name, opts| {
        let Value::Tuple(items) = value else {
            return Ok(());
        };
        if items.len() != n {
            return Err(CheckError::WrongLength(format!(
                "Length of {} must be {n}, not {}!",
                opts.label(value, name),
                items.len()
            )));
        }
        let parent = opts.label(value, name).to_string();
        for (i, (slot, item)) in slots.iter().zip(items).enumerate() {
            slot.run(item, Some(&format!("{parent}[{i}]")), opts)?;
        }
        Ok(())
    });
    check.o(&bare_just(TypeTag::Tuple)).with_label(label)
}

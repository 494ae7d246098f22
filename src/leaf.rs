//! Leaf checker catalogue.
//!
//! Every public constructor returns a base leaf equipped by [`family::family`]
//! with its chainable variants (`NonEmpty`, `All`, `List`, `Tuple`, `Set`,
//! `Map`). The `bare_*` forms are the unequipped leaves the variants themselves
//! are built from.
pub mod attr;
pub mod bounds;
pub mod each;
pub mod family;
pub mod len;
pub mod membership;
pub mod types;

pub use attr::{has_attrs, just_call};
pub use bounds::within;
pub use len::{iterable, just_len, non_empty, LenSpec};
pub use membership::{contains, identifier, one_of};
pub use types::just;

//! Operand values for terminal clauses
//!
//! An operand is the right-hand side of a terminal comparison: a single
//! literal, an unordered list of operands, or a named function call whose
//! arguments are resolved later by the query translator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single literal value. The kind is part of the identity: the string
/// `"11"` and the number `11` are distinct operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SingleValue {
    Text(String),
    Number(i64),
}

impl fmt::Display for SingleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SingleValue::Text(s) => write!(f, "\"{s}\""),
            SingleValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// The right-hand value of a terminal clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    /// One literal value.
    Single(SingleValue),
    /// A list of operands. Ordering carries no meaning, but duplicates do:
    /// the list is a multiset, not a set.
    Multi(Vec<Operand>),
    /// A named function with an ordered argument list, resolved at
    /// translation time (e.g. `membersOf("developers")`).
    Function { name: String, args: Vec<String> },
}

impl Operand {
    pub fn text(value: impl Into<String>) -> Operand {
        Operand::Single(SingleValue::Text(value.into()))
    }

    pub fn number(value: i64) -> Operand {
        Operand::Single(SingleValue::Number(value))
    }

    pub fn function(name: impl Into<String>, args: Vec<String>) -> Operand {
        Operand::Function {
            name: name.into(),
            args,
        }
    }

    /// Value-level equivalence.
    ///
    /// Single values match on kind and literal. Multi values match when a
    /// perfect one-to-one pairing exists between the two lists, so three
    /// occurrences of a value must be met by exactly three occurrences on the
    /// other side. Functions match on name and argument list in order.
    /// Operands of different variants are never equivalent.
    #[must_use]
    pub fn is_equivalent_to(&self, other: &Operand) -> bool {
        match (self, other) {
            (Operand::Single(a), Operand::Single(b)) => a == b,
            (Operand::Multi(a), Operand::Multi(b)) => multiset_equivalent(a, b),
            (
                Operand::Function { name: a_name, args: a_args },
                Operand::Function { name: b_name, args: b_args },
            ) => a_name == b_name && a_args == b_args,
            _ => false,
        }
    }
}

/// Bijective matching between two operand lists.
///
/// Each element of `a` claims exactly one not-yet-claimed equivalent element
/// of `b`. Pairwise and quadratic, but operand lists are small and this is
/// the only shape that keeps duplicate counts significant.
fn multiset_equivalent(a: &[Operand], b: &[Operand]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut claimed = vec![false; b.len()];
    for needle in a {
        let matched = b.iter().enumerate().find(|(i, candidate)| {
            !claimed[*i] && needle.is_equivalent_to(candidate)
        });
        match matched {
            Some((i, _)) => claimed[i] = true,
            None => return false,
        }
    }
    true
}

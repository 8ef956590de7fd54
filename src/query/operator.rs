//! Comparison operators for terminal clauses

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator used by a terminal clause.
///
/// Every operator has exactly one complement, used when a negation is pushed
/// down onto a terminal (e.g. `NOT (a = b)` becomes `a != b`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Equals,
    NotEquals,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
    Like,
    NotLike,
    Is,
    IsNot,
    In,
    NotIn,
}

impl Operator {
    /// The operator that denotes the negation of this one.
    ///
    /// Complement is its own inverse: `op.complement().complement() == op`.
    #[must_use]
    pub fn complement(self) -> Operator {
        match self {
            Operator::Equals => Operator::NotEquals,
            Operator::NotEquals => Operator::Equals,
            Operator::LessThan => Operator::GreaterThanEquals,
            Operator::GreaterThanEquals => Operator::LessThan,
            Operator::GreaterThan => Operator::LessThanEquals,
            Operator::LessThanEquals => Operator::GreaterThan,
            Operator::Like => Operator::NotLike,
            Operator::NotLike => Operator::Like,
            Operator::Is => Operator::IsNot,
            Operator::IsNot => Operator::Is,
            Operator::In => Operator::NotIn,
            Operator::NotIn => Operator::In,
        }
    }

    /// All operators, in declaration order. Handy for exhaustive tests.
    pub const ALL: [Operator; 12] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::LessThan,
        Operator::LessThanEquals,
        Operator::GreaterThan,
        Operator::GreaterThanEquals,
        Operator::Like,
        Operator::NotLike,
        Operator::Is,
        Operator::IsNot,
        Operator::In,
        Operator::NotIn,
    ];
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::LessThan => "<",
            Operator::LessThanEquals => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanEquals => ">=",
            Operator::Like => "~",
            Operator::NotLike => "!~",
            Operator::Is => "is",
            Operator::IsNot => "is not",
            Operator::In => "in",
            Operator::NotIn => "not in",
        };
        f.write_str(symbol)
    }
}

//! Boolean clause algebra for the structured query language
//!
//! The parser (out of scope here) produces an immutable [`Clause`] tree.
//! This module owns everything that operates on that tree without touching an
//! index: the operand/operator model, negation normalization, and the
//! equivalence comparators.

mod clause;
mod equivalence;
mod normalize;
mod operand;
mod operator;

pub use clause::{Clause, TerminalClause};
pub use equivalence::clauses_equivalent;
pub use normalize::normalize;
pub use operand::{Operand, SingleValue};
pub use operator::Operator;

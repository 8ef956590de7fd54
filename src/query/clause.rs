//! Boolean clause tree
//!
//! A query arrives from the parser as an immutable tree of clauses: terminal
//! comparisons combined with AND, OR and NOT. The tree carries no execution
//! state; the normalizer, comparators and search provider all consume it
//! read-only.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::operand::Operand;
use super::operator::Operator;

/// A leaf predicate comparing one field to one operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalClause {
    pub field: String,
    pub operator: Operator,
    pub operand: Operand,
}

impl TerminalClause {
    pub fn new(field: impl Into<String>, operator: Operator, operand: Operand) -> Self {
        TerminalClause {
            field: field.into(),
            operator,
            operand,
        }
    }
}

/// A node in the boolean query tree.
///
/// Child order under `And`/`Or` is preserved structurally but carries no
/// semantic weight; equivalence checking treats the child lists as unordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clause {
    Terminal(TerminalClause),
    And(Vec<Clause>),
    Or(Vec<Clause>),
    Not(Box<Clause>),
}

impl Clause {
    pub fn terminal(field: impl Into<String>, operator: Operator, operand: Operand) -> Clause {
        Clause::Terminal(TerminalClause::new(field, operator, operand))
    }

    pub fn and(children: Vec<Clause>) -> Clause {
        Clause::And(children)
    }

    pub fn or(children: Vec<Clause>) -> Clause {
        Clause::Or(children)
    }

    pub fn not(child: Clause) -> Clause {
        Clause::Not(Box::new(child))
    }

    /// True when no `Not` node appears anywhere in the tree.
    #[must_use]
    pub fn is_negation_free(&self) -> bool {
        match self {
            Clause::Terminal(_) => true,
            Clause::And(children) | Clause::Or(children) => {
                children.iter().all(Clause::is_negation_free)
            }
            Clause::Not(_) => false,
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Terminal(t) => write!(f, "{} {} {:?}", t.field, t.operator, t.operand),
            Clause::And(children) => write_joined(f, children, " AND "),
            Clause::Or(children) => write_joined(f, children, " OR "),
            Clause::Not(child) => write!(f, "NOT ({child})"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Clause], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_free_detection() {
        let leaf = Clause::terminal("status", Operator::Equals, Operand::text("open"));
        assert!(leaf.is_negation_free());
        assert!(Clause::and(vec![leaf.clone(), leaf.clone()]).is_negation_free());
        assert!(!Clause::not(leaf.clone()).is_negation_free());
        assert!(!Clause::or(vec![leaf.clone(), Clause::not(leaf)]).is_negation_free());
    }
}

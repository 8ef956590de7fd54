//! Negation normal form
//!
//! Rewrites a clause tree into an equivalent tree with no `Not` nodes, so the
//! query translator only ever sees positive structure. Negation is pushed
//! down with De Morgan's law and absorbed at the leaves by operator
//! complementation.

use super::clause::Clause;

/// Rewrite `clause` into an equivalent tree containing no `Not` nodes.
///
/// Total over well-formed trees; child order of untouched `And`/`Or` nodes is
/// preserved.
#[must_use]
pub fn normalize(clause: Clause) -> Clause {
    match clause {
        Clause::Terminal(t) => Clause::Terminal(t),
        Clause::And(children) => Clause::And(children.into_iter().map(normalize).collect()),
        Clause::Or(children) => Clause::Or(children.into_iter().map(normalize).collect()),
        Clause::Not(child) => negate(*child),
    }
}

/// Normalize the logical negation of `clause`.
fn negate(clause: Clause) -> Clause {
    match clause {
        Clause::Terminal(mut t) => {
            t.operator = t.operator.complement();
            Clause::Terminal(t)
        }
        // Double negation cancels; recursing through `normalize` handles any
        // nesting depth.
        Clause::Not(inner) => normalize(*inner),
        Clause::And(children) => Clause::Or(children.into_iter().map(negate).collect()),
        Clause::Or(children) => Clause::And(children.into_iter().map(negate).collect()),
    }
}

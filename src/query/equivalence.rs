//! Structural equivalence between clause trees
//!
//! Decides whether two clause trees denote the same predicate, independent of
//! the order in which AND/OR children were written. Used by upstream callers
//! to detect identical saved searches; never consulted on the execution path.
//!
//! The relation is reflexive and symmetric. It is deliberately stricter than
//! full logical equivalence: `a AND a` is not equivalent to `a`, and no
//! distribution or absorption laws are applied.

use super::clause::Clause;

/// True when `a` and `b` denote the same predicate.
///
/// Terminals compare field, operator and operand; `Not` nodes compare their
/// children; `And`/`Or` nodes require a bijection between the two child lists
/// under which every pair is equivalent. Clauses of different kinds are never
/// equivalent.
#[must_use]
pub fn clauses_equivalent(a: &Clause, b: &Clause) -> bool {
    match (a, b) {
        (Clause::Terminal(x), Clause::Terminal(y)) => {
            x.field == y.field
                && x.operator == y.operator
                && x.operand.is_equivalent_to(&y.operand)
        }
        (Clause::Not(x), Clause::Not(y)) => clauses_equivalent(x, y),
        (Clause::And(xs), Clause::And(ys)) | (Clause::Or(xs), Clause::Or(ys)) => {
            children_match(xs, ys)
        }
        _ => false,
    }
}

/// Order-independent bijective matching over child lists.
///
/// Each child of `a` claims one not-yet-claimed equivalent child of `b`,
/// tracked in a bitset so the inputs stay untouched. Matching must recurse
/// through `clauses_equivalent`; comparing hashes or structural identity
/// would miss reordered subtrees.
fn children_match(a: &[Clause], b: &[Clause]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut claimed = vec![false; b.len()];
    for child in a {
        let found = b.iter().enumerate().find(|(i, candidate)| {
            !claimed[*i] && clauses_equivalent(child, candidate)
        });
        match found {
            Some((i, _)) => claimed[i] = true,
            None => return false,
        }
    }
    true
}

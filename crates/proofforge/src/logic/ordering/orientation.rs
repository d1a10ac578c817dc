//! Equality orientation on clause entry
//!
//! Puts the larger side of every equality literal first, so that an
//! oriented equation always reads `lhs = rhs` with `lhs ≻ rhs`.

use super::{Ordering, TermOrdering};
use crate::logic::clause::Clause;

/// Orient all equality literals in a clause; returns the number of swaps
pub fn orient_equalities(clause: &mut Clause, ordering: &dyn TermOrdering) -> usize {
    let mut swapped = 0;
    for literal in clause.literals.iter_mut().filter(|l| l.is_equality()) {
        if ordering.compare(&literal.args[0], &literal.args[1]) == Ordering::Less {
            literal.args.swap(0, 1);
            swapped += 1;
        }
    }
    swapped
}

//! Redundancy side conditions shared by forward and backward demodulation.
//!
//! Rewriting `s` to `r` with equation `l = r` (where `s = lσ`) inside a
//! clause `C` replaces `C` by `C[rσ]`. This is only a simplification if `C`
//! becomes redundant. The one case where that can fail is when `s` is a
//! whole side of a positive equality literal `s = t` of `C`: then `t` must
//! be greater than `rσ`.

use crate::config::RedundancyCheck;
use crate::logic::{Literal, Ordering, ScopedSubstitution, Term, TermOrdering};

#[derive(Debug, Clone, Copy)]
pub struct DemodulationHelper {
    check: RedundancyCheck,
}

impl DemodulationHelper {
    pub fn new(check: RedundancyCheck) -> Self {
        DemodulationHelper { check }
    }

    pub fn encompassing(&self) -> bool {
        self.check == RedundancyCheck::Encompass
    }

    /// Whether rewriting `term` inside `literal` needs a redundancy check at all
    pub fn check_needed(&self, literal: &Literal, term: &Term) -> bool {
        self.check != RedundancyCheck::Off
            && literal.is_positive_equality()
            && (literal.args[0] == *term || literal.args[1] == *term)
    }

    /// Encompassing demodulation may rewrite the smaller side of an
    /// oriented equality literal without any check
    pub fn rewrites_smaller_side(&self, literal: &Literal, term: &Term, ordering: &dyn TermOrdering) -> bool {
        if !self.encompassing() {
            return false;
        }
        let order = ordering.equality_argument_order(literal);
        (literal.args[0] == *term && order == Ordering::Less)
            || (literal.args[1] == *term && order == Ordering::Greater)
    }

    /// `term` is a side of the positive equality `literal`; `rewritten` is
    /// the instantiated right-hand side replacing it. `lhs_scope` is the
    /// bank holding the variables of the equation's left-hand side.
    pub fn is_premise_redundant(
        &self,
        literal: &Literal,
        term: &Term,
        rewritten: &Term,
        subst: Option<&ScopedSubstitution>,
        lhs_scope: u8,
        ordering: &dyn TermOrdering,
    ) -> bool {
        let side = if literal.args[0] == *term { 1 } else { 0 };
        let other = &literal.args[side];
        if ordering.compare(rewritten, other) == Ordering::Less {
            return true;
        }
        // A strict instance of the left-hand side encompasses the premise
        self.encompassing() && subst.map_or(false, |s| !s.is_renaming_on(lhs_scope))
    }
}

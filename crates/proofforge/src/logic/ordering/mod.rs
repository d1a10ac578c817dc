//! Simplification orderings on terms and literals

pub mod kbo;
pub mod orientation;


pub use kbo::{KBOConfig, Ordering, KBO};
pub use orientation::orient_equalities;

use crate::logic::literal::Literal;
use crate::logic::term::Term;

/// A simplification ordering, total on ground terms
pub trait TermOrdering {
    fn compare(&self, s: &Term, t: &Term) -> Ordering;

    fn compare_literals(&self, l1: &Literal, l2: &Literal) -> Ordering;

    fn is_greater(&self, s: &Term, t: &Term) -> bool {
        self.compare(s, t) == Ordering::Greater
    }

    /// Order of the two sides of an equality literal
    fn equality_argument_order(&self, lit: &Literal) -> Ordering {
        debug_assert!(lit.is_equality());
        self.compare(&lit.args[0], &lit.args[1])
    }
}

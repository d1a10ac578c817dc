//! Literal selection
//!
//! - [`LiteralSelector`] policies: [`SelectAll`], [`SpassSelector`] and
//!   [`BestLiteralSelector`]
//! - [`comparators`]: the primitive literal comparators and the
//!   combinators used to stack them

pub mod comparators;
pub mod literal;

pub use comparators::{
    ColoredFirst, Comparison, Composite, DefaultComparator, Inverse, LeastDistinctVariables,
    LeastTopLevelVariables, LeastVariables, LexComparator, LiteralComparator, MaximalSize, Negative,
    NegativeEquality, NoPositiveEquality, NormalizedLinearComparatorByWeight,
};
pub use literal::{
    maximal_literals, selector_for, BestLiteralSelector, LiteralSelector, SelectAll, SpassMode,
    SpassSelector,
};

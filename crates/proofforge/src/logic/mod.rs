//! First-order logic representation and manipulation
//!
//! Terms, literals, clauses, the symbol interner (which doubles as the
//! sort signature), term orderings, and scoped substitutions.

pub mod clause;
pub mod interner;
pub mod literal;
pub mod ordering;
pub mod term;
pub mod unification;

pub use clause::{Clause, ClauseDisplay, ClauseKey, Inference, InferenceRule};
pub use interner::{ConstantId, FunctionId, FunctionType, Interner, PredicateId, VariableId};
pub use literal::{Color, Literal, LiteralDisplay, PredicateSymbol};
pub use ordering::{orient_equalities, KBOConfig, Ordering, TermOrdering, KBO};
pub use term::{Constant, FunctionSymbol, NonVariableSubterms, Term, TermDisplay, Variable};
pub use unification::{Renaming, ScopedSubstitution, ScopedVar, VarRenaming, QUERY, RESULT};

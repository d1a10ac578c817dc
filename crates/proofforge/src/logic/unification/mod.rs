//! Unification, matching, and substitution over scoped variables

pub mod renaming;
pub mod scoped;


pub use renaming::Renaming;
pub use scoped::{ScopedSubstitution, ScopedVar, VarRenaming, QUERY, RESULT};

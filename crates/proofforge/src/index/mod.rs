//! Term and literal indexing for saturation-based theorem proving.
//!
//! - `IndexingStructure`: the retrieval contract shared by every term index
//!   (unifications, generalizations, instances, variants)
//! - `DiscriminationTree`: the generic realization over flattened terms
//! - `TypeSubstitutionTree`: entries retrieved by the sort of their term
//! - `LiteralIndex`, `DemodulationLhsIndex`, `DemodulationSubtermIndex`:
//!   clause-level indexes kept in sync with the Active container
//! - `IndexManager`: reference-counted ownership of the clause-level indexes
//!
//! Retrieval is two-staged. The trie walk filters candidates structurally;
//! the returned iterator runs the full unification or matching check lazily,
//! one candidate per `next()`. Iterators borrow the index, so it cannot be
//! modified while a query is still being consumed.

pub mod disc_tree;
pub mod discrimination_tree;
pub mod literal_index;
pub mod manager;
pub mod term_index;
pub mod type_substitution_tree;


use crate::logic::{Literal, ScopedSubstitution, Term, QUERY, RESULT};
use std::fmt;

pub use discrimination_tree::DiscriminationTree;
pub use literal_index::LiteralIndex;
pub use manager::{ClauseIndex, IndexKind, IndexManager};
pub use term_index::{DemodulationLhsIndex, DemodulationSubtermIndex, GeneratingLiteralIndex};
pub use type_substitution_tree::TypeSubstitutionTree;

/// Payload stored next to each indexed term
pub trait LeafData: Clone + PartialEq + fmt::Debug {}

impl<T: Clone + PartialEq + fmt::Debug> LeafData for T {}

/// A term occurrence inside an active clause
#[derive(Debug, Clone, PartialEq)]
pub struct TermLeafData {
    pub term: Term,
    pub literal: Literal,
    pub clause: usize,
}

/// A literal of an active clause, with its position in the clause
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralLeafData {
    pub literal: Literal,
    pub index: usize,
    pub clause: usize,
}

/// One retrieved entry. Query variables live in bank `QUERY`, variables of
/// the stored term in bank `RESULT`.
#[derive(Debug)]
pub struct QueryResult<'a, D> {
    pub term: &'a Term,
    pub data: &'a D,
    pub substitution: Option<ScopedSubstitution>,
    /// Only the sorts were unified (see `TypeSubstitutionTree`)
    pub is_type_sub: bool,
}

pub type QueryIter<'a, D> = Box<dyn Iterator<Item = QueryResult<'a, D>> + 'a>;

/// Retrieval contract of a term index
pub trait IndexingStructure<D: LeafData> {
    fn insert(&mut self, term: Term, data: D);

    /// Removing a pair that was never inserted is a logic error and panics.
    fn remove(&mut self, term: &Term, data: &D);

    /// Stored terms unifiable with `query`
    fn get_unifications<'a>(&'a self, query: &Term, retrieve_substitutions: bool) -> QueryIter<'a, D>;

    /// Stored terms of which `query` is an instance
    fn get_generalizations<'a>(&'a self, query: &Term, retrieve_substitutions: bool) -> QueryIter<'a, D>;

    /// Stored terms that are instances of `query`
    fn get_instances<'a>(&'a self, query: &Term, retrieve_substitutions: bool) -> QueryIter<'a, D>;

    /// Stored terms equal to `query` up to variable renaming
    fn get_variants<'a>(&'a self, query: &Term, retrieve_substitutions: bool) -> QueryIter<'a, D>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalMode {
    Unifications,
    Generalizations,
    Instances,
    Variants,
}

impl RetrievalMode {
    /// Full check of one candidate; the substitution relates `query` (bank
    /// `QUERY`) to `stored` (bank `RESULT`).
    pub fn check(self, query: &Term, stored: &Term) -> Option<ScopedSubstitution> {
        let mut subst = ScopedSubstitution::new();
        let ok = match self {
            RetrievalMode::Unifications => subst.unify(query, QUERY, stored, RESULT),
            RetrievalMode::Generalizations => subst.match_terms(stored, RESULT, query, QUERY),
            RetrievalMode::Instances => subst.match_terms(query, QUERY, stored, RESULT),
            RetrievalMode::Variants => {
                subst.match_terms(stored, RESULT, query, QUERY) && subst.is_renaming_on(RESULT)
            }
        };
        ok.then_some(subst)
    }
}

/// Candidate entry of a term index
#[derive(Debug, Clone)]
pub struct Entry<D> {
    pub term: Term,
    pub data: D,
}

/// Lazily checks structurally filtered candidates
pub(crate) struct Candidates<'a, D> {
    candidates: std::vec::IntoIter<&'a Entry<D>>,
    query: Term,
    mode: RetrievalMode,
    retrieve_substitutions: bool,
}

impl<'a, D> Candidates<'a, D> {
    pub(crate) fn new(
        candidates: Vec<&'a Entry<D>>,
        query: &Term,
        mode: RetrievalMode,
        retrieve_substitutions: bool,
    ) -> Self {
        Candidates {
            candidates: candidates.into_iter(),
            query: query.clone(),
            mode,
            retrieve_substitutions,
        }
    }
}

impl<'a, D> Iterator for Candidates<'a, D> {
    type Item = QueryResult<'a, D>;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.candidates.by_ref() {
            if let Some(subst) = self.mode.check(&self.query, &entry.term) {
                return Some(QueryResult {
                    term: &entry.term,
                    data: &entry.data,
                    substitution: self.retrieve_substitutions.then_some(subst),
                    is_type_sub: false,
                });
            }
        }
        None
    }
}

//! Index of terms keyed by their sort.
//!
//! Each entry is stored under its sort, normalized together with the term
//! by one shared variable renaming, so entries whose (term, sort) pairs
//! are variants share a key. Retrieval unifies sorts first; when either
//! the query or the stored term is a variable the terms themselves are
//! unified as well, otherwise the hit is flagged `is_type_sub` and only
//! carries the sort unifier.

use super::{
    DiscriminationTree, IndexingStructure, LeafData, QueryIter, QueryResult, RetrievalMode,
};
use crate::logic::{Renaming, Term};

#[derive(Debug, Clone, PartialEq)]
pub struct TypedEntry<D> {
    /// The term as inserted
    pub term: Term,
    pub data: D,
}

#[derive(Debug)]
pub struct TypeSubstitutionTree<D> {
    sorts: DiscriminationTree<TypedEntry<D>>,
}

impl<D> Default for TypeSubstitutionTree<D> {
    fn default() -> Self {
        TypeSubstitutionTree {
            sorts: DiscriminationTree::default(),
        }
    }
}

impl<D: LeafData> TypeSubstitutionTree<D> {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(sort: &Term, term: &Term) -> Term {
        let mut renaming = Renaming::new();
        renaming.normalize(term);
        renaming.normalize(sort)
    }

    pub fn insert(&mut self, sort: &Term, term: Term, data: D) {
        let key = Self::key(sort, &term);
        self.sorts.insert(key, TypedEntry { term, data });
    }

    pub fn remove(&mut self, sort: &Term, term: &Term, data: &D) {
        let key = Self::key(sort, term);
        self.sorts.remove(
            &key,
            &TypedEntry {
                term: term.clone(),
                data: data.clone(),
            },
        );
    }

    /// Entries whose sort unifies with `sort` and that are compatible with `term`
    pub fn get_unifications<'a>(
        &'a self,
        sort: &Term,
        term: &Term,
        retrieve_substitutions: bool,
    ) -> QueryIter<'a, D> {
        let query = term.clone();
        Box::new(
            self.sorts
                .get_unifications(sort, true)
                .filter_map(move |hit| {
                    let entry = hit.data;
                    let (substitution, is_type_sub) =
                        if !query.is_variable() && !entry.term.is_variable() {
                            (hit.substitution, true)
                        } else {
                            (RetrievalMode::Unifications.check(&query, &entry.term), false)
                        };
                    let substitution = substitution?;
                    Some(QueryResult {
                        term: &entry.term,
                        data: &entry.data,
                        substitution: retrieve_substitutions.then_some(substitution),
                        is_type_sub,
                    })
                }),
        )
    }

    /// Entries whose normalized sort key is a variant of the query's
    pub fn get_variants<'a>(&'a self, sort: &Term, term: &Term) -> QueryIter<'a, D> {
        let key = Self::key(sort, term);
        Box::new(self.sorts.get_variants(&key, false).map(|hit| QueryResult {
            term: &hit.data.term,
            data: &hit.data.data,
            substitution: None,
            is_type_sub: false,
        }))
    }

    pub fn len(&self) -> usize {
        self.sorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorts.is_empty()
    }
}

//! Clause-level indexes used by the simplifying and generating engines

use super::{
    DiscriminationTree, IndexingStructure, LiteralIndex, LiteralLeafData, QueryIter, TermLeafData,
    TypeSubstitutionTree,
};
use crate::config::Demodulation;
use crate::logic::{Clause, Interner, Literal, NonVariableSubterms, Ordering, Term, TermOrdering};
use std::collections::HashSet;
use std::sync::Arc;

/// Left-hand sides of active unit positive equations.
///
/// Oriented equations contribute their greater side. Unoriented ones
/// contribute both sides, but only in `Demodulation::All` mode. A variable
/// side is indexed by the sort of the equation, since any subterm of that
/// sort is an instance of it.
pub struct DemodulationLhsIndex {
    mode: Demodulation,
    ordering: Arc<dyn TermOrdering>,
    interner: Arc<Interner>,
    tree: DiscriminationTree<TermLeafData>,
    variables: TypeSubstitutionTree<TermLeafData>,
}

impl DemodulationLhsIndex {
    pub fn new(mode: Demodulation, ordering: Arc<dyn TermOrdering>, interner: Arc<Interner>) -> Self {
        DemodulationLhsIndex {
            mode,
            ordering,
            interner,
            tree: DiscriminationTree::new(),
            variables: TypeSubstitutionTree::new(),
        }
    }

    /// Argument positions of `literal` that may be rewritten from
    pub fn lhs_positions(&self, literal: &Literal) -> Vec<usize> {
        match self.ordering.equality_argument_order(literal) {
            Ordering::Greater => vec![0],
            Ordering::Less => vec![1],
            Ordering::Equal => vec![],
            Ordering::Incomparable => match self.mode {
                Demodulation::All => vec![0, 1],
                _ => vec![],
            },
        }
    }

    pub fn handle(&mut self, clause: &Clause, adding: bool) {
        if self.mode == Demodulation::Off || !clause.is_unit() {
            return;
        }
        let literal = &clause.literals[0];
        if !literal.is_positive_equality() {
            return;
        }
        for side in self.lhs_positions(literal) {
            let lhs = literal.args[side].clone();
            let data = TermLeafData {
                term: lhs.clone(),
                literal: literal.clone(),
                clause: clause.number(),
            };
            if lhs.is_variable() {
                let sort = literal.equality_sort(&self.interner);
                if adding {
                    self.variables.insert(&sort, lhs, data);
                } else {
                    self.variables.remove(&sort, &lhs, &data);
                }
            } else if adding {
                self.tree.insert(lhs, data);
            } else {
                self.tree.remove(&lhs, &data);
            }
        }
    }

    /// Stored left-hand sides that `query` (of sort `sort`) is an instance of.
    /// Variable left-hand sides only pass the sort filter; their sort still
    /// has to be matched by the caller.
    pub fn get_generalizations<'a>(
        &'a self,
        query: &Term,
        sort: &Term,
        retrieve_substitutions: bool,
    ) -> QueryIter<'a, TermLeafData> {
        Box::new(
            self.tree
                .get_generalizations(query, retrieve_substitutions)
                .chain(
                    self.variables
                        .get_unifications(sort, query, retrieve_substitutions)
                        // A sort-only hit does not make `query` an instance
                        .filter(|hit| !hit.is_type_sub),
                ),
        )
    }

    pub fn len(&self) -> usize {
        self.tree.len() + self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Non-variable subterms of active clauses, for backward demodulation.
/// Each distinct subterm of a clause is stored once, tagged with the first
/// literal it occurs in.
pub struct DemodulationSubtermIndex {
    interner: Arc<Interner>,
    tree: DiscriminationTree<TermLeafData>,
}

impl DemodulationSubtermIndex {
    pub fn new(interner: Arc<Interner>) -> Self {
        DemodulationSubtermIndex {
            interner,
            tree: DiscriminationTree::new(),
        }
    }

    pub fn handle(&mut self, clause: &Clause, adding: bool) {
        let mut seen = HashSet::new();
        for literal in clause.literals.iter().filter(|l| !l.is_answer()) {
            for (subterm, _) in NonVariableSubterms::new(&literal.args, &self.interner) {
                if !seen.insert(subterm.clone()) {
                    continue;
                }
                let data = TermLeafData {
                    term: subterm.clone(),
                    literal: literal.clone(),
                    clause: clause.number(),
                };
                if adding {
                    self.tree.insert(subterm.clone(), data);
                } else {
                    self.tree.remove(subterm, &data);
                }
            }
        }
    }

    /// Stored subterms that are instances of `query`
    pub fn get_instances<'a>(&'a self, query: &Term, retrieve_substitutions: bool) -> QueryIter<'a, TermLeafData> {
        self.tree.get_instances(query, retrieve_substitutions)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

/// Selected literals of active clauses, for resolution
#[derive(Debug, Default)]
pub struct GeneratingLiteralIndex {
    literals: LiteralIndex,
}

impl GeneratingLiteralIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, clause: &Clause, adding: bool) {
        for (i, literal) in clause.selected_literals().iter().enumerate() {
            self.literals.handle(literal, i, clause.number(), adding);
        }
    }

    pub fn get_unifications<'a>(
        &'a self,
        literal: &Literal,
        complementary: bool,
        retrieve_substitutions: bool,
    ) -> QueryIter<'a, LiteralLeafData> {
        self.literals.get_unifications(literal, complementary, retrieve_substitutions)
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

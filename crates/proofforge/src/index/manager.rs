//! Reference-counted ownership of the clause-level indexes.
//!
//! Engines `request` the indexes they query when attached and `release`
//! them when detached. An index is built on its first request (filled from
//! the clauses already active) and dropped with its last release.

use super::{DemodulationLhsIndex, DemodulationSubtermIndex, GeneratingLiteralIndex};
use crate::config::Demodulation;
use crate::logic::{Clause, Interner, TermOrdering};
use indexmap::IndexMap;
use log::trace;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexKind {
    DemodulationLhs,
    DemodulationSubterms,
    GeneratingLiterals,
}

/// An index kept in sync with the Active container
pub trait ClauseIndex: Any {
    fn kind(&self) -> IndexKind;

    fn handle(&mut self, clause: &Clause, adding: bool);

    fn as_any(&self) -> &dyn Any;
}

impl ClauseIndex for DemodulationLhsIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::DemodulationLhs
    }

    fn handle(&mut self, clause: &Clause, adding: bool) {
        DemodulationLhsIndex::handle(self, clause, adding)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ClauseIndex for DemodulationSubtermIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::DemodulationSubterms
    }

    fn handle(&mut self, clause: &Clause, adding: bool) {
        DemodulationSubtermIndex::handle(self, clause, adding)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ClauseIndex for GeneratingLiteralIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::GeneratingLiterals
    }

    fn handle(&mut self, clause: &Clause, adding: bool) {
        GeneratingLiteralIndex::handle(self, clause, adding)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Managed {
    refs: usize,
    index: Box<dyn ClauseIndex>,
}

pub struct IndexManager {
    indexes: BTreeMap<IndexKind, Managed>,
    /// Clauses currently in Active, in activation order
    active: IndexMap<usize, Arc<Clause>>,
    ordering: Arc<dyn TermOrdering>,
    interner: Arc<Interner>,
    lhs_mode: Demodulation,
}

impl IndexManager {
    /// `lhs_mode` decides which equations the left-hand-side index admits
    pub fn new(ordering: Arc<dyn TermOrdering>, interner: Arc<Interner>, lhs_mode: Demodulation) -> Self {
        IndexManager {
            indexes: BTreeMap::new(),
            active: IndexMap::new(),
            ordering,
            interner,
            lhs_mode,
        }
    }

    fn create(&self, kind: IndexKind) -> Box<dyn ClauseIndex> {
        match kind {
            IndexKind::DemodulationLhs => Box::new(DemodulationLhsIndex::new(
                self.lhs_mode,
                Arc::clone(&self.ordering),
                Arc::clone(&self.interner),
            )),
            IndexKind::DemodulationSubterms => {
                Box::new(DemodulationSubtermIndex::new(Arc::clone(&self.interner)))
            }
            IndexKind::GeneratingLiterals => Box::new(GeneratingLiteralIndex::new()),
        }
    }

    pub fn request(&mut self, kind: IndexKind) {
        if let Some(managed) = self.indexes.get_mut(&kind) {
            managed.refs += 1;
            return;
        }
        let mut index = self.create(kind);
        for clause in self.active.values() {
            index.handle(clause, true);
        }
        trace!("created {:?} index over {} active clauses", kind, self.active.len());
        self.indexes.insert(kind, Managed { refs: 1, index });
    }

    /// Releasing an index that was never requested is a logic error.
    pub fn release(&mut self, kind: IndexKind) {
        let managed = match self.indexes.get_mut(&kind) {
            Some(managed) => managed,
            None => panic!("releasing {:?} index that was never requested", kind),
        };
        managed.refs -= 1;
        if managed.refs == 0 {
            self.indexes.remove(&kind);
            trace!("dropped {:?} index", kind);
        }
    }

    pub fn is_live(&self, kind: IndexKind) -> bool {
        self.indexes.contains_key(&kind)
    }

    pub fn ref_count(&self, kind: IndexKind) -> usize {
        self.indexes.get(&kind).map_or(0, |m| m.refs)
    }

    fn get<T: ClauseIndex>(&self, kind: IndexKind) -> Option<&T> {
        self.indexes
            .get(&kind)
            .and_then(|m| m.index.as_any().downcast_ref::<T>())
    }

    pub fn demodulation_lhs(&self) -> Option<&DemodulationLhsIndex> {
        self.get(IndexKind::DemodulationLhs)
    }

    pub fn demodulation_subterms(&self) -> Option<&DemodulationSubtermIndex> {
        self.get(IndexKind::DemodulationSubterms)
    }

    pub fn generating_literals(&self) -> Option<&GeneratingLiteralIndex> {
        self.get(IndexKind::GeneratingLiterals)
    }

    /// Add a clause entering Active to every live index
    pub fn on_activate(&mut self, clause: Arc<Clause>) {
        let id = clause.number();
        for managed in self.indexes.values_mut() {
            managed.index.handle(&clause, true);
        }
        let previous = self.active.insert(id, clause);
        assert!(previous.is_none(), "clause {} activated twice", id);
    }

    /// Remove a clause leaving Active from every live index
    pub fn on_remove(&mut self, id: usize) {
        let clause = match self.active.shift_remove(&id) {
            Some(clause) => clause,
            None => panic!("removing clause {} which is not active", id),
        };
        for managed in self.indexes.values_mut() {
            managed.index.handle(&clause, false);
        }
    }

    pub fn is_active(&self, id: usize) -> bool {
        self.active.contains_key(&id)
    }

    /// Active clauses in activation order
    pub fn active_clauses(&self) -> impl Iterator<Item = &Arc<Clause>> {
        self.active.values()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }
}

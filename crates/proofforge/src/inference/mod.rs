//! Inference engines plugged into the saturation loop
//!
//! Four kinds of engine, distinguished by when the loop calls them:
//! - [`ImmediateSimplifier`]: every clause popped from Unprocessed
//! - [`ForwardSimplifier`]: the clause picked from Passive, against Active
//! - [`BackwardSimplifier`]: Active clauses, against a clause being activated
//! - [`GeneratingEngine`]: the activated clause against Active
//!
//! Engines that query an index request it from the [`IndexManager`] in
//! `attach` and release it in `detach`. Engines only read the indexes; the
//! loop applies every container mutation after `perform` has returned.

pub mod backward_demodulation;
pub mod demodulation_helper;
pub mod equality_factoring;
pub mod equality_resolution;
pub mod factoring;
pub mod forward_demodulation;
pub mod immediate;
pub mod resolution;
pub mod subsumption;
pub mod superposition;

#[cfg(test)]
pub(crate) mod test_support;

pub use backward_demodulation::BackwardDemodulation;
pub use demodulation_helper::DemodulationHelper;
pub use equality_factoring::EqualityFactoring;
pub use equality_resolution::EqualityResolution;
pub use factoring::Factoring;
pub use forward_demodulation::ForwardDemodulation;
pub use immediate::{DuplicateClauseDeletion, DuplicateLiteralRemoval, TautologyDeletion};
pub use resolution::Resolution;
pub use subsumption::{BackwardSubsumption, ForwardSubsumption};
pub use superposition::Superposition;

use crate::index::IndexManager;
use crate::logic::{Clause, Interner, TermOrdering};
use std::sync::Arc;

/// Read-only view of the prover state handed to engines
pub struct EngineContext<'a> {
    pub indexes: &'a IndexManager,
    pub ordering: &'a dyn TermOrdering,
    pub interner: &'a Interner,
    /// The clause arena, indexed by clause id
    pub clauses: &'a [Arc<Clause>],
}

impl<'a> EngineContext<'a> {
    pub fn clause(&self, id: usize) -> &'a Clause {
        &self.clauses[id]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImmediateOutcome {
    Keep,
    Delete,
    Replace(Clause),
}

/// Cheap local simplification, no index access
pub trait ImmediateSimplifier {
    fn name(&self) -> &str;

    fn simplify(&mut self, clause: &Clause) -> ImmediateOutcome;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForwardOutcome {
    Unchanged,
    /// The clause is redundant given the listed premises
    Deleted { premises: Vec<usize> },
    /// The clause is replaced; the replacement records its own premises
    Replaced(Clause),
}

pub trait ForwardSimplifier {
    fn name(&self) -> &str;

    fn attach(&mut self, indexes: &mut IndexManager);

    fn detach(&mut self, indexes: &mut IndexManager);

    fn perform(&mut self, clause: &Clause, ctx: &EngineContext) -> ForwardOutcome;
}

/// One Active clause simplified by a clause being activated
#[derive(Debug, Clone, PartialEq)]
pub struct BackwardSimplification {
    pub target: usize,
    /// `None` deletes the target outright
    pub replacement: Option<Clause>,
    pub premises: Vec<usize>,
}

pub trait BackwardSimplifier {
    fn name(&self) -> &str;

    fn attach(&mut self, indexes: &mut IndexManager);

    fn detach(&mut self, indexes: &mut IndexManager);

    /// Each target appears at most once in the result
    fn perform(&mut self, premise: &Clause, ctx: &EngineContext) -> Vec<BackwardSimplification>;
}

pub trait GeneratingEngine {
    fn name(&self) -> &str;

    fn attach(&mut self, _indexes: &mut IndexManager) {}

    fn detach(&mut self, _indexes: &mut IndexManager) {}

    /// Conclusions of inferences between `given` and the Active clauses
    /// (`given` included). Conclusions are unstored and unoriented.
    fn generate(&mut self, given: &Clause, ctx: &EngineContext) -> Vec<Clause>;
}

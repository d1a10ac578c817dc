//! ProofForge: a saturation prover core for first-order clauses
//!
//! The library runs the given clause algorithm over an Unprocessed, Passive
//! and Active store. Generating rules are resolution, factoring, equality
//! resolution, superposition and equality factoring. Clauses are simplified
//! by demodulation and subsumption, forward and backward, backed by term
//! indexes.

pub mod config;
pub mod error;
pub mod index;
pub mod inference;
pub mod logic;
pub mod proof;
pub mod saturation;
pub mod selection;

pub use config::{Demodulation, GeneratingRules, LiteralSelectionStrategy, ProverConfig, RedundancyCheck};
pub use error::{ProverError, Result};

pub use logic::{
    Clause, Constant, FunctionSymbol, InferenceRule, Interner, KBOConfig, Literal, PredicateSymbol,
    Term, TermOrdering, Variable, KBO,
};

pub use index::{IndexKind, IndexManager, IndexingStructure, TypeSubstitutionTree};

pub use proof::{Proof, ProofStep};

pub use saturation::{
    saturate, CancellationToken, ClauseStore, ResourceLimit, SaturationAlgorithm, SaturationResult,
    Statistics,
};

pub use selection::{selector_for, LiteralSelector, SelectAll, SpassSelector};

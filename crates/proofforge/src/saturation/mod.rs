//! Saturation-based theorem proving using the given clause algorithm

mod algorithm;
pub mod containers;
pub mod limits;
pub mod statistics;

pub use algorithm::{SaturationAlgorithm, SaturationResult};
pub use containers::{ActiveContainer, ClauseStore, PassiveContainer, StoreTags, UnprocessedContainer};
pub use limits::{Budget, CancellationToken, ResourceLimit};
pub use statistics::Statistics;

use crate::config::ProverConfig;
use crate::error::Result;
use crate::logic::{Clause, Interner};

/// Run saturation on a clause set with the default ordering
pub fn saturate(clauses: Vec<Clause>, config: ProverConfig, interner: Interner) -> Result<(SaturationResult, Statistics)> {
    let mut prover = SaturationAlgorithm::new(config, interner)?;
    prover.add_input_clauses(clauses)?;
    let result = prover.saturate();
    Ok((result, prover.statistics().clone()))
}

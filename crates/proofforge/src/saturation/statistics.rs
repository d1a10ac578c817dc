//! Counters collected during saturation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub input_clauses: usize,
    pub iterations: usize,
    pub activations: usize,
    /// Conclusions of generating inferences
    pub generated: usize,
    /// Conclusions per generating engine
    pub generated_by: BTreeMap<String, usize>,
    /// Clauses deleted or replaced, per simplifying engine
    pub simplified_by: BTreeMap<String, usize>,
    pub forward_demodulations: usize,
    pub forward_demodulations_to_tautology: usize,
    pub backward_demodulations: usize,
    pub backward_demodulations_to_tautology: usize,
    pub forward_subsumptions: usize,
    pub backward_subsumptions: usize,
    /// Clauses discarded for exceeding the clause size limit
    pub oversized_discarded: usize,
    pub final_active: usize,
    pub final_passive: usize,
}

impl Statistics {
    pub fn record_simplification(&mut self, engine: &str) {
        *self.simplified_by.entry(engine.to_string()).or_insert(0) += 1;
    }

    pub fn record_generated(&mut self, engine: &str, count: usize) {
        self.generated += count;
        *self.generated_by.entry(engine.to_string()).or_insert(0) += count;
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

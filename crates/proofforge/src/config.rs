//! Prover configuration types.

use crate::error::{ProverError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Configuration for the saturation loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    /// Stop after this many stored clauses (0 means no limit)
    pub max_clauses: usize,
    /// Stop after this many loop iterations (0 means no limit)
    pub max_iterations: usize,
    /// Derived clauses with more literals are discarded
    pub max_clause_size: usize,
    pub timeout: Duration,
    /// Memory limit for the process in MB
    pub memory_limit_mb: Option<usize>,
    pub literal_selection: LiteralSelectionStrategy,
    /// Passive selection ratio `age : weight`
    pub age_weight_ratio: (u32, u32),
    /// Permit a ratio with no age picks (loses completeness)
    pub allow_unfair: bool,
    pub forward_demodulation: Demodulation,
    pub backward_demodulation: Demodulation,
    pub demodulation_redundancy_check: RedundancyCheck,
    pub forward_subsumption: bool,
    pub backward_subsumption: bool,
    pub generating: GeneratingRules,
}

/// Literal selection policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralSelectionStrategy {
    /// Select every literal
    Off,
    /// Select all maximal literals
    Always,
    /// Select all maximal literals when there are several, else everything
    IfSeveralMaximal,
    /// A single best negative literal, else all maximal literals
    Best,
}

/// Which equations may rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Demodulation {
    Off,
    /// Only equations oriented by the ordering
    Preordered,
    /// Unoriented equations too, checking the instance against the ordering
    All,
}

/// Whether a rewrite must leave the premise redundant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedundancyCheck {
    Off,
    On,
    /// Like `On`, but a strict instance of the equation never needs the check
    Encompass,
}

/// Switches for the generating inferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratingRules {
    pub resolution: bool,
    pub factoring: bool,
    pub equality_resolution: bool,
    pub superposition: bool,
    pub equality_factoring: bool,
}

impl Default for GeneratingRules {
    fn default() -> Self {
        GeneratingRules {
            resolution: true,
            factoring: true,
            equality_resolution: true,
            superposition: true,
            equality_factoring: true,
        }
    }
}

impl Default for ProverConfig {
    fn default() -> Self {
        ProverConfig {
            max_clauses: 0,
            max_iterations: 0,
            max_clause_size: 100,
            timeout: Duration::from_secs(60),
            memory_limit_mb: None,
            literal_selection: LiteralSelectionStrategy::Best,
            age_weight_ratio: (1, 5),
            allow_unfair: false,
            forward_demodulation: Demodulation::All,
            backward_demodulation: Demodulation::All,
            demodulation_redundancy_check: RedundancyCheck::On,
            forward_subsumption: true,
            backward_subsumption: true,
            generating: GeneratingRules::default(),
        }
    }
}

impl ProverConfig {
    /// Reject option combinations the saturation loop cannot honor
    pub fn validate(&self) -> Result<()> {
        let (age, weight) = self.age_weight_ratio;
        if age == 0 && weight == 0 {
            return Err(ProverError::InvalidOption(
                "age_weight_ratio 0:0 selects nothing".to_string(),
            ));
        }
        if age.checked_add(weight).is_none() {
            return Err(ProverError::InvalidOption(format!(
                "age_weight_ratio {}:{} overflows",
                age, weight
            )));
        }
        if age == 0 && !self.allow_unfair {
            return Err(ProverError::InvalidOption(format!(
                "age_weight_ratio 0:{} never picks by age; set allow_unfair to accept this",
                weight
            )));
        }
        if self.max_clause_size == 0 {
            return Err(ProverError::InvalidOption(
                "max_clause_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl FromStr for LiteralSelectionStrategy {
    type Err = ProverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "0" => Ok(LiteralSelectionStrategy::Off),
            "if_several_maximal" | "1" => Ok(LiteralSelectionStrategy::IfSeveralMaximal),
            "always" | "2" => Ok(LiteralSelectionStrategy::Always),
            "best" | "10" => Ok(LiteralSelectionStrategy::Best),
            other => Err(ProverError::InvalidOption(format!(
                "unknown literal selection '{}'",
                other
            ))),
        }
    }
}

impl FromStr for Demodulation {
    type Err = ProverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Demodulation::Off),
            "preordered" => Ok(Demodulation::Preordered),
            "all" => Ok(Demodulation::All),
            other => Err(ProverError::InvalidOption(format!(
                "unknown demodulation mode '{}'",
                other
            ))),
        }
    }
}

impl FromStr for RedundancyCheck {
    type Err = ProverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(RedundancyCheck::Off),
            "on" => Ok(RedundancyCheck::On),
            "encompass" => Ok(RedundancyCheck::Encompass),
            other => Err(ProverError::InvalidOption(format!(
                "unknown redundancy check '{}'",
                other
            ))),
        }
    }
}

/// Get current process RSS in MB. Returns None if unavailable.
pub fn process_memory_mb() -> Option<usize> {
    #[cfg(target_os = "linux")]
    {
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        let rss_pages: usize = statm.split_whitespace().nth(1)?.parse().ok()?;
        let page_size = 4096usize;
        Some(rss_pages * page_size / (1024 * 1024))
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

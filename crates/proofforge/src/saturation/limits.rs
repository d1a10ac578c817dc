//! Resource budgets of a saturation run

use crate::config::{process_memory_mb, ProverConfig};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The budget that ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceLimit {
    Clauses,
    Iterations,
    Time,
    Memory,
    Cancelled,
}

/// Shared flag another thread can set to stop a run at its next checkpoint
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
pub struct Budget {
    max_clauses: usize,
    max_iterations: usize,
    timeout: Duration,
    memory_limit_mb: Option<usize>,
    /// Set by the first `start`
    started: Option<Instant>,
    cancel: CancellationToken,
}

impl Budget {
    pub fn new(config: &ProverConfig, cancel: CancellationToken) -> Self {
        Budget {
            max_clauses: config.max_clauses,
            max_iterations: config.max_iterations,
            timeout: config.timeout,
            memory_limit_mb: config.memory_limit_mb,
            started: None,
            cancel,
        }
    }

    /// Start the clock; later calls keep the first start time
    pub fn start(&mut self) {
        self.started.get_or_insert_with(Instant::now);
    }

    pub fn elapsed(&self) -> Duration {
        self.started.map_or(Duration::ZERO, |started| started.elapsed())
    }

    /// First exhausted budget, if any. Zero limits are unlimited.
    pub fn check(&self, clauses: usize, iterations: usize) -> Option<ResourceLimit> {
        if self.cancel.is_cancelled() {
            return Some(ResourceLimit::Cancelled);
        }
        if self.max_iterations > 0 && iterations >= self.max_iterations {
            return Some(ResourceLimit::Iterations);
        }
        if self.max_clauses > 0 && clauses >= self.max_clauses {
            return Some(ResourceLimit::Clauses);
        }
        if self.started.is_some() && self.elapsed() > self.timeout {
            return Some(ResourceLimit::Time);
        }
        if let Some(limit) = self.memory_limit_mb {
            if process_memory_mb().map_or(false, |used| used >= limit) {
                return Some(ResourceLimit::Memory);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_in_order() {
        let config = ProverConfig {
            max_clauses: 10,
            max_iterations: 5,
            ..ProverConfig::default()
        };
        let budget = Budget::new(&config, CancellationToken::new());
        assert_eq!(budget.check(3, 2), None);
        assert_eq!(budget.check(3, 5), Some(ResourceLimit::Iterations));
        assert_eq!(budget.check(10, 2), Some(ResourceLimit::Clauses));
    }

    #[test]
    fn test_cancellation_wins() {
        let token = CancellationToken::new();
        let budget = Budget::new(&ProverConfig::default(), token.clone());
        assert_eq!(budget.check(0, 0), None);
        token.cancel();
        assert_eq!(budget.check(0, 0), Some(ResourceLimit::Cancelled));
    }

    #[test]
    fn test_zero_timeout_expires() {
        let config = ProverConfig {
            timeout: Duration::ZERO,
            ..ProverConfig::default()
        };
        let mut budget = Budget::new(&config, CancellationToken::new());
        std::thread::sleep(Duration::from_millis(2));
        // The clock only runs once started
        assert_eq!(budget.check(0, 0), None);
        assert_eq!(budget.elapsed(), Duration::ZERO);

        budget.start();
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(budget.check(0, 0), Some(ResourceLimit::Time));
        let first = budget.elapsed();
        budget.start();
        assert!(budget.elapsed() >= first);
    }
}

//! Immediate simplifications applied to every clause leaving Unprocessed

use super::{ImmediateOutcome, ImmediateSimplifier};
use crate::logic::{Clause, ClauseKey, InferenceRule};
use std::collections::HashSet;

/// Deletes clauses with complementary literals or a literal `t = t`
#[derive(Debug, Default)]
pub struct TautologyDeletion;

impl ImmediateSimplifier for TautologyDeletion {
    fn name(&self) -> &str {
        "tautology deletion"
    }

    fn simplify(&mut self, clause: &Clause) -> ImmediateOutcome {
        if clause.is_tautology() {
            ImmediateOutcome::Delete
        } else {
            ImmediateOutcome::Keep
        }
    }
}

#[derive(Debug, Default)]
pub struct DuplicateLiteralRemoval;

impl ImmediateSimplifier for DuplicateLiteralRemoval {
    fn name(&self) -> &str {
        "duplicate literal removal"
    }

    fn simplify(&mut self, clause: &Clause) -> ImmediateOutcome {
        match clause.without_duplicate_literals() {
            Some(literals) => ImmediateOutcome::Replace(Clause::derived(
                literals,
                InferenceRule::DuplicateLiteralRemoval,
                vec![clause.number()],
            )),
            None => ImmediateOutcome::Keep,
        }
    }
}

/// Deletes clauses identical (up to literal order) to one kept earlier.
/// Must run after the other immediate simplifiers: a kept clause is
/// remembered for the rest of the run.
#[derive(Debug, Default)]
pub struct DuplicateClauseDeletion {
    seen: HashSet<ClauseKey>,
}

impl DuplicateClauseDeletion {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImmediateSimplifier for DuplicateClauseDeletion {
    fn name(&self) -> &str {
        "duplicate clause deletion"
    }

    fn simplify(&mut self, clause: &Clause) -> ImmediateOutcome {
        if self.seen.insert(ClauseKey::from_clause(clause)) {
            ImmediateOutcome::Keep
        } else {
            ImmediateOutcome::Delete
        }
    }
}

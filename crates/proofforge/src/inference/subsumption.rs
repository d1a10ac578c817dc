//! Subsumption: `C` subsumes `D` when some substitution maps the literals of
//! `C` onto distinct literals of `D`

use super::{BackwardSimplification, BackwardSimplifier, EngineContext, ForwardOutcome, ForwardSimplifier};
use crate::index::IndexManager;
use crate::logic::{Clause, Literal, ScopedSubstitution, Term, QUERY, RESULT};

/// True if `subsumer` subsumes `target`. Each literal of `subsumer` is
/// matched onto its own literal of `target`, so a clause never subsumes a
/// shorter one. Equalities match in either orientation.
pub fn subsumes(subsumer: &Clause, target: &Clause) -> bool {
    if subsumer.len() > target.len() {
        return false;
    }
    let mut subst = ScopedSubstitution::new();
    let mut used = vec![false; target.len()];
    match_from(&subsumer.literals, &target.literals, &mut used, &mut subst)
}

fn match_from(
    pattern: &[Literal],
    target: &[Literal],
    used: &mut [bool],
    subst: &mut ScopedSubstitution,
) -> bool {
    let (first, rest) = match pattern.split_first() {
        Some(split) => split,
        None => return true,
    };
    for (j, lit) in target.iter().enumerate() {
        if used[j] || lit.header() != first.header() {
            continue;
        }
        let mut orientations = vec![false];
        if first.is_equality() {
            orientations.push(true);
        }
        for swapped in orientations {
            let mark = subst.mark();
            let matched = if swapped {
                match_args(subst, &[&first.args[1], &first.args[0]], &lit.args)
            } else {
                match_args(subst, &first.args.iter().collect::<Vec<_>>(), &lit.args)
            };
            if matched {
                used[j] = true;
                if match_from(rest, target, used, subst) {
                    return true;
                }
                used[j] = false;
            }
            subst.backtrack(mark);
        }
    }
    false
}

fn match_args(subst: &mut ScopedSubstitution, pattern: &[&Term], instance: &[Term]) -> bool {
    pattern.len() == instance.len()
        && pattern
            .iter()
            .zip(instance)
            .all(|(p, i)| subst.match_terms(p, QUERY, i, RESULT))
}

/// Deletes a given clause subsumed by an Active clause
#[derive(Debug, Default)]
pub struct ForwardSubsumption;

impl ForwardSimplifier for ForwardSubsumption {
    fn name(&self) -> &str {
        "forward subsumption"
    }

    fn attach(&mut self, _indexes: &mut IndexManager) {}

    fn detach(&mut self, _indexes: &mut IndexManager) {}

    fn perform(&mut self, clause: &Clause, ctx: &EngineContext) -> ForwardOutcome {
        match ctx.indexes.active_clauses().find(|active| subsumes(active, clause)) {
            Some(subsumer) => ForwardOutcome::Deleted {
                premises: vec![subsumer.number()],
            },
            None => ForwardOutcome::Unchanged,
        }
    }
}

/// Deletes Active clauses subsumed by the clause being activated
#[derive(Debug, Default)]
pub struct BackwardSubsumption;

impl BackwardSimplifier for BackwardSubsumption {
    fn name(&self) -> &str {
        "backward subsumption"
    }

    fn attach(&mut self, _indexes: &mut IndexManager) {}

    fn detach(&mut self, _indexes: &mut IndexManager) {}

    fn perform(&mut self, premise: &Clause, ctx: &EngineContext) -> Vec<BackwardSimplification> {
        ctx.indexes
            .active_clauses()
            .filter(|active| active.number() != premise.number() && subsumes(premise, active))
            .map(|active| BackwardSimplification {
                target: active.number(),
                replacement: None,
                premises: vec![premise.number()],
            })
            .collect()
    }
}

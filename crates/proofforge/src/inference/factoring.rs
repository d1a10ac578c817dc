//! Positive factoring

use super::{EngineContext, GeneratingEngine};
use crate::index::literal_index::atom_term;
use crate::logic::{Clause, InferenceRule, ScopedSubstitution, VarRenaming, QUERY};

/// Unifies a selected positive literal with another positive literal of the
/// same predicate in the given clause and drops the second one.
#[derive(Debug, Default)]
pub struct Factoring;

impl GeneratingEngine for Factoring {
    fn name(&self) -> &str {
        "factoring"
    }

    fn generate(&mut self, given: &Clause, _ctx: &EngineContext) -> Vec<Clause> {
        let mut conclusions = Vec::new();
        let floor = given.variable_floor();

        for i in 0..given.selected {
            let first = &given.literals[i];
            if !first.polarity || first.is_equality() {
                continue;
            }
            for j in 0..given.len() {
                // Pairs of selected literals are tried once
                if j == i || (j < given.selected && j < i) {
                    continue;
                }
                let second = &given.literals[j];
                if !second.polarity || second.predicate != first.predicate {
                    continue;
                }
                let mut subst = ScopedSubstitution::new();
                if !subst.unify(&atom_term(first), QUERY, &atom_term(second), QUERY) {
                    continue;
                }
                let mut renaming = VarRenaming::keeping(QUERY, floor);
                let literals = given
                    .literals
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k != j)
                    .map(|(_, lit)| lit.map_args(|t| subst.apply(t, QUERY, &mut renaming)))
                    .collect();
                conclusions.push(Clause::derived(literals, InferenceRule::Factoring, vec![given.number()]));
            }
        }
        conclusions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Demodulation;
    use crate::inference::test_support::TestCtx;

    #[test]
    fn test_factors_positive_literals() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let lits = vec![
            ctx.pred("P", vec![x.clone()], true),
            ctx.pred("P", vec![a.clone()], true),
            ctx.pred("Q", vec![x.clone()], true),
        ];
        let expected = vec![ctx.pred("P", vec![a.clone()], true), ctx.pred("Q", vec![a], true)];

        let mut state = ctx.state(Demodulation::All);
        let given = state.store(lits);
        let conclusions = Factoring.generate(&given, &state.ctx());
        assert_eq!(conclusions.len(), 1);
        assert_eq!(conclusions[0].literals, expected);
        assert_eq!(conclusions[0].inference.premises, vec![given.number()]);
    }

    #[test]
    fn test_negative_literals_are_not_factored() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let lits = vec![ctx.pred("P", vec![x], false), ctx.pred("P", vec![a], false)];

        let mut state = ctx.state(Demodulation::All);
        let given = state.store(lits);
        assert!(Factoring.generate(&given, &state.ctx()).is_empty());
    }

    #[test]
    fn test_non_unifiable_atoms() {
        let mut ctx = TestCtx::new();
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let lits = vec![ctx.pred("P", vec![a], true), ctx.pred("P", vec![b], true)];

        let mut state = ctx.state(Demodulation::All);
        let given = state.store(lits);
        assert!(Factoring.generate(&given, &state.ctx()).is_empty());
    }
}

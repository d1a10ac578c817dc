//! Equality resolution: from `s ≠ t ∨ C` with `s, t` unifiable by σ derive `Cσ`

use super::{EngineContext, GeneratingEngine};
use crate::logic::{Clause, InferenceRule, ScopedSubstitution, VarRenaming, QUERY};

#[derive(Debug, Default)]
pub struct EqualityResolution;

impl GeneratingEngine for EqualityResolution {
    fn name(&self) -> &str {
        "equality resolution"
    }

    fn generate(&mut self, given: &Clause, _ctx: &EngineContext) -> Vec<Clause> {
        let floor = given.variable_floor();
        given
            .selected_literals()
            .iter()
            .enumerate()
            .filter(|(_, lit)| lit.is_negative_equality())
            .filter_map(|(i, lit)| {
                let mut subst = ScopedSubstitution::new();
                if !subst.unify(&lit.args[0], QUERY, &lit.args[1], QUERY) {
                    return None;
                }
                let mut renaming = VarRenaming::keeping(QUERY, floor);
                let literals = given
                    .literals
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k != i)
                    .map(|(_, l)| l.map_args(|t| subst.apply(t, QUERY, &mut renaming)))
                    .collect();
                Some(Clause::derived(
                    literals,
                    InferenceRule::EqualityResolution,
                    vec![given.number()],
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Demodulation;
    use crate::inference::test_support::TestCtx;
    use crate::logic::Literal;

    #[test]
    fn test_resolves_unifiable_disequation() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let fx = ctx.func("f", vec![x.clone()]);
        let fa = ctx.func("f", vec![a.clone()]);
        let px = ctx.pred("P", vec![x], true);
        let pa = ctx.pred("P", vec![a], true);

        let mut state = ctx.state(Demodulation::All);
        let given = state.store(vec![Literal::equality(fx, fa, false), px]);
        let conclusions = EqualityResolution.generate(&given, &state.ctx());
        assert_eq!(conclusions.len(), 1);
        assert_eq!(conclusions[0].literals, vec![pa]);
        assert_eq!(conclusions[0].inference.rule, InferenceRule::EqualityResolution);
    }

    #[test]
    fn test_unit_disequation_gives_empty_clause() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let b = ctx.const_("b");

        let mut state = ctx.state(Demodulation::All);
        let given = state.store(vec![Literal::equality(x, a.clone(), false)]);
        let conclusions = EqualityResolution.generate(&given, &state.ctx());
        assert_eq!(conclusions.len(), 1);
        assert!(conclusions[0].is_empty());

        let ground = state.store(vec![Literal::equality(a, b, false)]);
        assert!(EqualityResolution.generate(&ground, &state.ctx()).is_empty());
    }
}

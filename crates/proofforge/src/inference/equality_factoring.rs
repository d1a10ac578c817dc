//! Equality factoring: from `l = r ∨ s = t ∨ C` with σ = mgu(l, s) derive
//! `(r ≠ t ∨ s = t ∨ C)σ`

use super::{EngineContext, GeneratingEngine};
use crate::logic::{Clause, InferenceRule, Ordering, ScopedSubstitution, VarRenaming, QUERY};

/// `l = r` is a selected positive equality of the given clause and `s = t`
/// any other positive equality. Both are tried in either orientation.
/// Requires `lσ` not smaller than or equal to `rσ`, and `rσ` not smaller
/// than `tσ`.
#[derive(Debug, Default)]
pub struct EqualityFactoring;

impl GeneratingEngine for EqualityFactoring {
    fn name(&self) -> &str {
        "equality factoring"
    }

    fn generate(&mut self, given: &Clause, ctx: &EngineContext) -> Vec<Clause> {
        let floor = given.variable_floor();
        let mut conclusions = Vec::new();

        for (i, first) in given.selected_literals().iter().enumerate() {
            if !first.is_positive_equality() {
                continue;
            }
            for (j, second) in given.literals.iter().enumerate() {
                if j == i || !second.is_positive_equality() {
                    continue;
                }
                for side in 0..2 {
                    let (l, r) = (&first.args[side], first.other_side(side));
                    for other in 0..2 {
                        let (s, t) = (&second.args[other], second.other_side(other));
                        let mut subst = ScopedSubstitution::new();
                        if !subst.unify(l, QUERY, s, QUERY) {
                            continue;
                        }
                        let mut renaming = VarRenaming::keeping(QUERY, floor);
                        let l_s = subst.apply(l, QUERY, &mut renaming);
                        let r_s = subst.apply(r, QUERY, &mut renaming);
                        if matches!(ctx.ordering.compare(&l_s, &r_s), Ordering::Less | Ordering::Equal) {
                            continue;
                        }
                        let t_s = subst.apply(t, QUERY, &mut renaming);
                        if ctx.ordering.compare(&r_s, &t_s) == Ordering::Less {
                            continue;
                        }

                        let mut disequation = first.clone();
                        disequation.args = vec![r_s, t_s];
                        disequation.polarity = false;
                        let mut literals = vec![disequation];
                        for (_, lit) in given.literals.iter().enumerate().filter(|(k, _)| *k != i) {
                            literals.push(lit.map_args(|x| subst.apply(x, QUERY, &mut renaming)));
                        }
                        conclusions.push(Clause::derived(
                            literals,
                            InferenceRule::EqualityFactoring,
                            vec![given.number()],
                        ));
                    }
                }
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
    use crate::logic::Literal;

    #[test]
    fn test_factors_equations_with_common_side() {
        // f(X) = a ∨ f(b) = c gives a ≠ c ∨ f(b) = c when a is not smaller than c
        let mut ctx = TestCtx::new();
        ctx.precedence = vec!["c", "b", "a", "f"];
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let c = ctx.const_("c");
        let fx = ctx.func("f", vec![x]);
        let fb = ctx.func("f", vec![b]);

        let mut state = ctx.state(Demodulation::All);
        let mut given = state.store(vec![
            Literal::equality(fx, a.clone(), true),
            Literal::equality(fb.clone(), c.clone(), true),
        ]);
        given.selected = 1;

        let conclusions = EqualityFactoring.generate(&given, &state.ctx());
        assert_eq!(conclusions.len(), 1);
        assert_eq!(
            conclusions[0].literals,
            vec![Literal::equality(a, c.clone(), false), Literal::equality(fb, c, true)]
        );
        assert_eq!(conclusions[0].inference.rule, InferenceRule::EqualityFactoring);
        assert_eq!(conclusions[0].inference.premises, vec![given.number()]);
    }

    #[test]
    fn test_smaller_right_side_is_not_factored() {
        // With a ≺ c the selected f(X) = a may not be factored into f(b) = c
        let mut ctx = TestCtx::new();
        ctx.precedence = vec!["a", "b", "c", "f"];
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let c = ctx.const_("c");
        let fx = ctx.func("f", vec![x]);
        let fb = ctx.func("f", vec![b]);

        let mut state = ctx.state(Demodulation::All);
        let mut given = state.store(vec![
            Literal::equality(fx, a, true),
            Literal::equality(fb, c, true),
        ]);
        given.selected = 1;

        assert!(EqualityFactoring.generate(&given, &state.ctx()).is_empty());
    }

    #[test]
    fn test_needs_two_positive_equations() {
        let mut ctx = TestCtx::new();
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let pa = ctx.pred("P", vec![a.clone()], true);

        let mut state = ctx.state(Demodulation::All);
        let given = state.store(vec![Literal::equality(b.clone(), a.clone(), true), pa]);
        assert!(EqualityFactoring.generate(&given, &state.ctx()).is_empty());

        let negative = state.store(vec![
            Literal::equality(b.clone(), a.clone(), true),
            Literal::equality(b, a, false),
        ]);
        assert!(EqualityFactoring.generate(&negative, &state.ctx()).is_empty());
    }
}

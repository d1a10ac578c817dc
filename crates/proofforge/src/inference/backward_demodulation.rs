//! Backward demodulation: rewrite Active clauses with a unit equation that
//! is being activated.

use super::{BackwardSimplification, BackwardSimplifier, DemodulationHelper, EngineContext};
use crate::config::{Demodulation, RedundancyCheck};
use crate::index::{IndexKind, IndexManager};
use crate::logic::{
    Clause, Color, InferenceRule, Ordering, ScopedSubstitution, Term, VarRenaming, QUERY, RESULT,
};
use log::trace;
use std::collections::HashSet;

pub struct BackwardDemodulation {
    mode: Demodulation,
    helper: DemodulationHelper,
    attached: bool,
}

impl BackwardDemodulation {
    pub fn new(mode: Demodulation, check: RedundancyCheck) -> Self {
        BackwardDemodulation {
            mode,
            helper: DemodulationHelper::new(check),
            attached: false,
        }
    }

    fn lhs_positions(&self, order: Ordering) -> &'static [usize] {
        match (order, self.mode) {
            (_, Demodulation::Off) | (Ordering::Equal, _) => &[],
            (Ordering::Greater, _) => &[0],
            (Ordering::Less, _) => &[1],
            (Ordering::Incomparable, Demodulation::All) => &[0, 1],
            (Ordering::Incomparable, Demodulation::Preordered) => &[],
        }
    }
}

impl BackwardSimplifier for BackwardDemodulation {
    fn name(&self) -> &str {
        "backward demodulation"
    }

    fn attach(&mut self, indexes: &mut IndexManager) {
        assert!(!self.attached, "backward demodulation attached twice");
        indexes.request(IndexKind::DemodulationSubterms);
        self.attached = true;
    }

    fn detach(&mut self, indexes: &mut IndexManager) {
        assert!(self.attached, "backward demodulation detached while not attached");
        indexes.release(IndexKind::DemodulationSubterms);
        self.attached = false;
    }

    fn perform(&mut self, premise: &Clause, ctx: &EngineContext) -> Vec<BackwardSimplification> {
        assert!(self.attached, "backward demodulation performed while detached");
        let index = match ctx.indexes.demodulation_subterms() {
            Some(index) => index,
            None => panic!("subterm index released under backward demodulation"),
        };
        let mut results = Vec::new();
        if !premise.is_unit() || !premise.literals[0].is_positive_equality() {
            return results;
        }
        let eq_lit = &premise.literals[0];
        let order = ctx.ordering.equality_argument_order(eq_lit);
        let preordered = order.is_strict();
        let eq_sort = eq_lit.equality_sort(ctx.interner);
        let mut done = HashSet::new();

        for &side in self.lhs_positions(order) {
            let lhs = &eq_lit.args[side];
            let rhs = eq_lit.other_side(side);

            for hit in index.get_instances(lhs, true) {
                let target_id = hit.data.clause;
                if target_id == premise.number() || done.contains(&target_id) {
                    continue;
                }
                let target = ctx.clause(target_id);
                if !Color::compatible(premise.color(), target.color()) {
                    continue;
                }
                let instance: &Term = hit.term;
                if lhs.is_variable() {
                    let sort = ctx.interner.result_sort(instance).unwrap_or_else(Term::default_sort);
                    let mut sort_match = ScopedSubstitution::new();
                    if !sort_match.match_terms(&eq_sort, QUERY, &sort, RESULT) {
                        continue;
                    }
                }
                let subst = match hit.substitution {
                    Some(subst) => subst,
                    None => continue,
                };
                let rhs_s = subst.apply(rhs, QUERY, &mut VarRenaming::keeping(RESULT, target.variable_floor()));
                if !preordered && !ctx.ordering.is_greater(instance, &rhs_s) {
                    continue;
                }

                let literal = &hit.data.literal;
                if self.helper.check_needed(literal, instance)
                    && !self.helper.rewrites_smaller_side(literal, instance, ctx.ordering)
                    && !self.helper.is_premise_redundant(
                        literal,
                        instance,
                        &rhs_s,
                        Some(&subst),
                        QUERY,
                        ctx.ordering,
                    )
                {
                    continue;
                }

                let position = match target.literals.iter().position(|l| l == literal) {
                    Some(position) => position,
                    None => panic!("indexed literal missing from clause {}", target_id),
                };
                let rewritten = literal.map_args(|arg| arg.replace(instance, &rhs_s));
                done.insert(target_id);

                let replacement = if rewritten.is_equality_tautology() {
                    trace!("[{}] demodulated to a tautology by [{}]", target_id, premise.number());
                    None
                } else {
                    let mut literals = Vec::with_capacity(target.len());
                    literals.push(rewritten);
                    literals.extend(
                        target
                            .literals
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| *i != position)
                            .map(|(_, l)| l.clone()),
                    );
                    trace!("[{}] demodulated backward by [{}]", target_id, premise.number());
                    Some(Clause::derived(
                        literals,
                        InferenceRule::BackwardDemodulation,
                        vec![target_id, premise.number()],
                    ))
                };
                results.push(BackwardSimplification {
                    target: target_id,
                    replacement,
                    premises: vec![premise.number()],
                });
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::test_support::{TestCtx, TestState};
    use crate::logic::Literal;

    fn attached(state: &mut TestState, mode: Demodulation) -> BackwardDemodulation {
        let mut engine = BackwardDemodulation::new(mode, RedundancyCheck::On);
        engine.attach(&mut state.indexes);
        engine
    }

    #[test]
    fn test_rewrites_active_instances() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let fx = ctx.func("f", vec![x.clone()]);
        let fa = ctx.func("f", vec![a.clone()]);
        let pfa = ctx.pred("P", vec![fa], true);
        let pa = ctx.pred("P", vec![a], true);
        let qb = ctx.pred("Q", vec![b], true);

        let mut state = ctx.state(Demodulation::All);
        let mut engine = attached(&mut state, Demodulation::All);
        let target = state.store(vec![pfa]);
        state.activate(&target);
        let bystander = state.store(vec![qb]);
        state.activate(&bystander);
        let eq = state.store(vec![Literal::equality(fx, x, true)]);
        state.activate(&eq);

        let results = engine.perform(&eq, &state.ctx());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].target, target.number());
        assert_eq!(results[0].premises, vec![eq.number()]);
        let replacement = results[0].replacement.as_ref().expect("rewritten");
        assert_eq!(replacement.literals, vec![pa]);
        assert_eq!(replacement.inference.rule, InferenceRule::BackwardDemodulation);
        assert_eq!(replacement.inference.premises, vec![target.number(), eq.number()]);
    }

    #[test]
    fn test_tautology_deletes_target() {
        let mut ctx = TestCtx::new();
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let fa = ctx.func("f", vec![a.clone()]);
        let fb = ctx.func("f", vec![b.clone()]);
        ctx.precedence = vec!["b", "a"];

        let mut state = ctx.state(Demodulation::All);
        let mut engine = attached(&mut state, Demodulation::All);
        let target = state.store(vec![Literal::equality(fa, fb, true)]);
        state.activate(&target);
        let eq = state.store(vec![Literal::equality(a, b, true)]);
        state.activate(&eq);

        let results = engine.perform(&eq, &state.ctx());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].target, target.number());
        assert!(results[0].replacement.is_none());
    }

    #[test]
    fn test_unoriented_equation_by_mode() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let y = ctx.var("Y");
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let fxy = ctx.func("f", vec![x.clone(), y.clone()]);
        let fyx = ctx.func("f", vec![y, x]);
        let fab = ctx.func("f", vec![a.clone(), b.clone()]);
        let fba = ctx.func("f", vec![b, a]);
        let p_ab = ctx.pred("P", vec![fab], true);
        let p_ba = ctx.pred("P", vec![fba], true);
        ctx.precedence = vec!["b", "a"];

        let mut state = ctx.state(Demodulation::All);
        let mut all = attached(&mut state, Demodulation::All);
        let mut preordered = attached(&mut state, Demodulation::Preordered);
        let target = state.store(vec![p_ab]);
        state.activate(&target);
        let comm = state.store(vec![Literal::equality(fxy, fyx, true)]);
        state.activate(&comm);

        // Both sides match f(a, b); the target is still rewritten only once
        let results = all.perform(&comm, &state.ctx());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].replacement.as_ref().map(|c| c.literals.clone()), Some(vec![p_ba]));

        assert!(preordered.perform(&comm, &state.ctx()).is_empty());
    }

    #[test]
    fn test_premise_does_not_rewrite_itself() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let fx = ctx.func("f", vec![x.clone()]);
        let ffx = ctx.func("f", vec![fx.clone()]);

        let mut state = ctx.state(Demodulation::All);
        let mut engine = attached(&mut state, Demodulation::All);
        let eq = state.store(vec![Literal::equality(ffx, fx, true)]);
        state.activate(&eq);

        assert!(engine.perform(&eq, &state.ctx()).is_empty());
    }
}

//! Superposition: from `l = r ∨ C` and `L[s] ∨ D` with σ = mgu(l, s), where
//! `s` is not a variable, derive `(C ∨ L[r] ∨ D)σ`

use super::{EngineContext, GeneratingEngine};
use crate::logic::{
    Clause, Color, InferenceRule, Ordering, ScopedSubstitution, TermOrdering, VarRenaming, QUERY,
    RESULT,
};

/// Rewrites in both directions between the given clause and every Active
/// clause (the given clause included). Only selected literals take part: a
/// selected positive equality on the rewriting side, any selected literal on
/// the rewritten side.
#[derive(Debug, Default)]
pub struct Superposition;

/// Neither smaller than nor equal to
fn not_smaller(order: Ordering) -> bool {
    matches!(order, Ordering::Greater | Ordering::Incomparable)
}

/// Clause and variable bank of one premise
struct Premise<'a> {
    clause: &'a Clause,
    scope: u8,
}

impl Superposition {
    fn superpose(
        from: Premise,
        into: Premise,
        floor: u32,
        ordering: &dyn TermOrdering,
        out: &mut Vec<Clause>,
    ) {
        for (fi, eq) in from.clause.selected_literals().iter().enumerate() {
            if !eq.is_positive_equality() {
                continue;
            }
            for side in 0..2 {
                let lhs = &eq.args[side];
                let rhs = eq.other_side(side);
                for (ii, lit) in into.clause.selected_literals().iter().enumerate() {
                    for (ai, arg) in lit.args.iter().enumerate() {
                        for (path, sub) in arg.non_variable_positions() {
                            let mut subst = ScopedSubstitution::new();
                            if !subst.unify(lhs, from.scope, sub, into.scope) {
                                continue;
                            }
                            let mut renaming = VarRenaming::keeping(QUERY, floor);
                            let lhs_s = subst.apply(lhs, from.scope, &mut renaming);
                            let rhs_s = subst.apply(rhs, from.scope, &mut renaming);
                            if !not_smaller(ordering.compare(&lhs_s, &rhs_s)) {
                                continue;
                            }
                            let instance = lit.map_args(|t| subst.apply(t, into.scope, &mut renaming));
                            if lit.is_equality() {
                                if !not_smaller(ordering.compare(&instance.args[ai], &instance.args[1 - ai])) {
                                    continue;
                                }
                                // A positive equation is only rewritten at the top by a smaller one
                                if lit.polarity && path.is_empty() {
                                    let eq_s = eq.map_args(|t| subst.apply(t, from.scope, &mut renaming));
                                    if matches!(
                                        ordering.compare_literals(&eq_s, &instance),
                                        Ordering::Greater | Ordering::Equal
                                    ) {
                                        continue;
                                    }
                                }
                            }
                            let mut rewritten = instance;
                            rewritten.args[ai] = rewritten.args[ai].replace_at(&path, &rhs_s);

                            let mut literals = Vec::with_capacity(from.clause.len() + into.clause.len() - 1);
                            for (_, l) in from.clause.literals.iter().enumerate().filter(|(k, _)| *k != fi) {
                                literals.push(l.map_args(|t| subst.apply(t, from.scope, &mut renaming)));
                            }
                            literals.push(rewritten);
                            for (_, l) in into.clause.literals.iter().enumerate().filter(|(k, _)| *k != ii) {
                                literals.push(l.map_args(|t| subst.apply(t, into.scope, &mut renaming)));
                            }
                            out.push(Clause::derived(
                                literals,
                                InferenceRule::Superposition,
                                vec![from.clause.number(), into.clause.number()],
                            ));
                        }
                    }
                }
            }
        }
    }
}

impl GeneratingEngine for Superposition {
    fn name(&self) -> &str {
        "superposition"
    }

    fn generate(&mut self, given: &Clause, ctx: &EngineContext) -> Vec<Clause> {
        let floor = given.variable_floor();
        let mut conclusions = Vec::new();

        for partner in ctx.indexes.active_clauses() {
            if !Color::compatible(given.color(), partner.color()) {
                continue;
            }
            let given_side = || Premise { clause: given, scope: QUERY };
            let partner_side = || Premise { clause: partner, scope: RESULT };
            Self::superpose(given_side(), partner_side(), floor, ctx.ordering, &mut conclusions);
            if partner.number() != given.number() {
                Self::superpose(partner_side(), given_side(), floor, ctx.ordering, &mut conclusions);
            }
        }
        conclusions
    }
}

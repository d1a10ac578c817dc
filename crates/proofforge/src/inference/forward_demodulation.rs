//! Forward demodulation: rewrite the clause picked from Passive with the
//! unit equations already in Active.

use super::{DemodulationHelper, EngineContext, ForwardOutcome, ForwardSimplifier};
use crate::config::{Demodulation, RedundancyCheck};
use crate::index::{IndexKind, IndexManager};
use crate::logic::{
    Clause, Color, InferenceRule, NonVariableSubterms, ScopedSubstitution, Term, VarRenaming, QUERY,
    RESULT,
};
use log::trace;
use std::collections::HashSet;

pub struct ForwardDemodulation {
    preordered_only: bool,
    helper: DemodulationHelper,
    /// Subterms already tried in the current call
    attempted: HashSet<Term>,
    attached: bool,
}

impl ForwardDemodulation {
    pub fn new(mode: Demodulation, check: RedundancyCheck) -> Self {
        ForwardDemodulation {
            preordered_only: mode == Demodulation::Preordered,
            helper: DemodulationHelper::new(check),
            attempted: HashSet::new(),
            attached: false,
        }
    }
}

impl ForwardSimplifier for ForwardDemodulation {
    fn name(&self) -> &str {
        "forward demodulation"
    }

    fn attach(&mut self, indexes: &mut IndexManager) {
        assert!(!self.attached, "forward demodulation attached twice");
        indexes.request(IndexKind::DemodulationLhs);
        self.attached = true;
    }

    fn detach(&mut self, indexes: &mut IndexManager) {
        assert!(self.attached, "forward demodulation detached while not attached");
        indexes.release(IndexKind::DemodulationLhs);
        self.attached = false;
    }

    /// Rewrites at most one subterm (all its occurrences in one literal)
    fn perform(&mut self, clause: &Clause, ctx: &EngineContext) -> ForwardOutcome {
        assert!(self.attached, "forward demodulation performed while detached");
        let index = match ctx.indexes.demodulation_lhs() {
            Some(index) => index,
            None => panic!("left-hand side index released under forward demodulation"),
        };
        self.attempted.clear();
        let floor = clause.variable_floor();
        let color = clause.color();

        for (li, literal) in clause.literals.iter().enumerate() {
            if literal.is_answer() {
                continue;
            }
            let mut subterms = NonVariableSubterms::new(&literal.args, ctx.interner);
            while let Some((term, sort)) = subterms.next() {
                if !self.attempted.insert(term.clone()) {
                    // Tried before, and with it all of its subterms
                    subterms.skip_subtree();
                    continue;
                }
                let mut redundancy_check = self.helper.check_needed(literal, term);

                for hit in index.get_generalizations(term, &sort, true) {
                    let equation = ctx.clause(hit.data.clause);
                    if !Color::compatible(color, equation.color()) {
                        continue;
                    }
                    let eq_lit = &hit.data.literal;
                    let lhs = hit.term;
                    if lhs.is_variable() {
                        let mut sort_match = ScopedSubstitution::new();
                        let eq_sort = eq_lit.equality_sort(ctx.interner);
                        if !sort_match.match_terms(&eq_sort, RESULT, &sort, QUERY) {
                            continue;
                        }
                    }
                    let subst = match hit.substitution {
                        Some(subst) => subst,
                        None => continue,
                    };
                    let rhs = eq_lit.other_side(if eq_lit.args[0] == *lhs { 0 } else { 1 });
                    let rhs_s = subst.apply(rhs, RESULT, &mut VarRenaming::keeping(QUERY, floor));

                    let preordered = ctx.ordering.equality_argument_order(eq_lit).is_strict();
                    if !preordered && (self.preordered_only || !ctx.ordering.is_greater(term, &rhs_s)) {
                        continue;
                    }

                    if redundancy_check && self.helper.rewrites_smaller_side(literal, term, ctx.ordering) {
                        redundancy_check = false;
                    }
                    if redundancy_check
                        && !self.helper.is_premise_redundant(
                            literal,
                            term,
                            &rhs_s,
                            Some(&subst),
                            RESULT,
                            ctx.ordering,
                        )
                    {
                        continue;
                    }

                    let rewritten = literal.map_args(|arg| arg.replace(term, &rhs_s));
                    if rewritten.is_equality_tautology() {
                        trace!(
                            "[{}] demodulated to a tautology by [{}]",
                            clause.number(),
                            equation.number()
                        );
                        return ForwardOutcome::Deleted {
                            premises: vec![equation.number()],
                        };
                    }

                    let mut literals = Vec::with_capacity(clause.len());
                    literals.push(rewritten);
                    literals.extend(
                        clause
                            .literals
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| *i != li)
                            .map(|(_, l)| l.clone()),
                    );
                    trace!("[{}] demodulated by [{}]", clause.number(), equation.number());
                    return ForwardOutcome::Replaced(Clause::derived(
                        literals,
                        InferenceRule::ForwardDemodulation,
                        vec![clause.number(), equation.number()],
                    ));
                }
            }
        }
        ForwardOutcome::Unchanged
    }
}

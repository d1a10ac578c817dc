//! Binary resolution between selected literals

use super::{EngineContext, GeneratingEngine};
use crate::index::{IndexKind, IndexManager};
use crate::logic::{Clause, Color, InferenceRule, VarRenaming, QUERY, RESULT};

/// Resolves each selected literal of the given clause against the selected
/// literals of Active clauses (the given clause included) of opposite
/// polarity. Equality literals are left to the equality rules.
#[derive(Debug, Default)]
pub struct Resolution {
    attached: bool,
}

impl Resolution {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GeneratingEngine for Resolution {
    fn name(&self) -> &str {
        "resolution"
    }

    fn attach(&mut self, indexes: &mut IndexManager) {
        indexes.request(IndexKind::GeneratingLiterals);
        self.attached = true;
    }

    fn detach(&mut self, indexes: &mut IndexManager) {
        indexes.release(IndexKind::GeneratingLiterals);
        self.attached = false;
    }

    fn generate(&mut self, given: &Clause, ctx: &EngineContext) -> Vec<Clause> {
        assert!(self.attached, "resolution performed while detached");
        let index = match ctx.indexes.generating_literals() {
            Some(index) => index,
            None => panic!("generating literal index released under resolution"),
        };
        let floor = given.variable_floor();
        let mut conclusions = Vec::new();

        for (i, literal) in given.selected_literals().iter().enumerate() {
            if literal.is_equality() {
                continue;
            }
            for hit in index.get_unifications(literal, true, true) {
                let partner = ctx.clause(hit.data.clause);
                if !Color::compatible(given.color(), partner.color()) {
                    continue;
                }
                let subst = match hit.substitution {
                    Some(subst) => subst,
                    None => continue,
                };
                let mut renaming = VarRenaming::keeping(QUERY, floor);
                let mut literals = Vec::with_capacity(given.len() + partner.len() - 2);
                for (_, lit) in given.literals.iter().enumerate().filter(|(k, _)| *k != i) {
                    literals.push(lit.map_args(|t| subst.apply(t, QUERY, &mut renaming)));
                }
                for (_, lit) in partner.literals.iter().enumerate().filter(|(k, _)| *k != hit.data.index) {
                    literals.push(lit.map_args(|t| subst.apply(t, RESULT, &mut renaming)));
                }
                conclusions.push(Clause::derived(
                    literals,
                    InferenceRule::Resolution,
                    vec![given.number(), partner.number()],
                ));
            }
        }
        conclusions
    }
}

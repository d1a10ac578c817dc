//! Canonical variable renaming
//!
//! Numbers variables by first occurrence (0, 1, 2, ...). Two terms are
//! variants of each other exactly when their normalized forms are equal.

use crate::logic::interner::VariableId;
use crate::logic::literal::Literal;
use crate::logic::term::Term;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Renaming {
    map: HashMap<VariableId, VariableId>,
}

impl Renaming {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&mut self, id: VariableId) -> VariableId {
        let next = VariableId::new(self.map.len() as u32);
        *self.map.entry(id).or_insert(next)
    }

    /// Rename the variables of `term`, extending the renaming with unseen ones
    pub fn normalize(&mut self, term: &Term) -> Term {
        match term {
            Term::Variable(v) => Term::var(self.lookup(v.id)),
            Term::Constant(_) => term.clone(),
            Term::Function(f, args) => {
                Term::Function(*f, args.iter().map(|a| self.normalize(a)).collect())
            }
        }
    }

    pub fn normalize_literal(&mut self, lit: &Literal) -> Literal {
        lit.map_args(|t| self.normalize(t))
    }

    /// Normalized form of a single term
    pub fn normalized(term: &Term) -> Term {
        Renaming::new().normalize(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::interner::Interner;
    use crate::logic::term::FunctionSymbol;

    #[test]
    fn test_variants_normalize_equal() {
        let mut interner = Interner::new();
        let x = Term::var(interner.intern_variable("X"));
        let y = Term::var(interner.intern_variable("Y"));
        let f = FunctionSymbol::new(interner.intern_function("f"), 3);

        let t1 = Term::Function(f, vec![x.clone(), y.clone(), x.clone()]);
        let t2 = Term::Function(f, vec![y.clone(), x.clone(), y.clone()]);
        let t3 = Term::Function(f, vec![x.clone(), y.clone(), y.clone()]);

        assert_eq!(Renaming::normalized(&t1), Renaming::normalized(&t2));
        assert_ne!(Renaming::normalized(&t1), Renaming::normalized(&t3));
    }

    #[test]
    fn test_shared_renaming_across_terms() {
        let mut interner = Interner::new();
        let x = Term::var(interner.intern_variable("X"));
        let y = Term::var(interner.intern_variable("Y"));

        let mut renaming = Renaming::new();
        assert_eq!(renaming.normalize(&y), Term::var(VariableId::new(0)));
        assert_eq!(renaming.normalize(&x), Term::var(VariableId::new(1)));
        assert_eq!(renaming.normalize(&y), Term::var(VariableId::new(0)));
    }
}

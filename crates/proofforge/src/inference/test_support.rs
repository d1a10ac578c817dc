//! Term builders and a small prover state for engine tests

use super::EngineContext;
use crate::config::Demodulation;
use crate::index::IndexManager;
use crate::logic::{
    orient_equalities, Clause, Constant, FunctionSymbol, Interner, KBOConfig, Literal,
    PredicateSymbol, Term, TermOrdering, KBO,
};
use crate::selection::{LiteralSelector, SelectAll};
use std::sync::Arc;

pub(crate) struct TestCtx {
    pub interner: Interner,
    /// KBO precedence by name, lowest first; empty for the default precedence
    pub precedence: Vec<&'static str>,
}

impl TestCtx {
    pub fn new() -> Self {
        TestCtx {
            interner: Interner::new(),
            precedence: Vec::new(),
        }
    }

    pub fn var(&mut self, name: &str) -> Term {
        Term::var(self.interner.intern_variable(name))
    }

    pub fn const_(&mut self, name: &str) -> Term {
        Term::Constant(Constant::new(self.interner.intern_constant(name)))
    }

    pub fn func(&mut self, name: &str, args: Vec<Term>) -> Term {
        let id = self.interner.intern_function(name);
        Term::Function(FunctionSymbol::new(id, args.len() as u8), args)
    }

    pub fn pred(&mut self, name: &str, args: Vec<Term>, polarity: bool) -> Literal {
        let id = self.interner.intern_predicate(name);
        Literal::new(PredicateSymbol::new(id, args.len() as u8), args, polarity)
    }

    /// Freeze the signature into a prover state
    pub fn state(&self, lhs_mode: Demodulation) -> TestState {
        let config = if self.precedence.is_empty() {
            KBOConfig::default()
        } else {
            KBOConfig::with_precedence(&self.interner, &self.precedence)
        };
        let ordering: Arc<dyn TermOrdering> = Arc::new(KBO::new(config));
        let interner = Arc::new(self.interner.clone());
        TestState {
            indexes: IndexManager::new(Arc::clone(&ordering), Arc::clone(&interner), lhs_mode),
            ordering,
            interner,
            clauses: Vec::new(),
        }
    }
}

pub(crate) struct TestState {
    pub interner: Arc<Interner>,
    pub ordering: Arc<dyn TermOrdering>,
    pub indexes: IndexManager,
    pub clauses: Vec<Arc<Clause>>,
}

impl TestState {
    /// Store a clause with oriented equalities and every literal selected
    pub fn store(&mut self, literals: Vec<Literal>) -> Clause {
        let mut clause = Clause::new(literals);
        clause.id = Some(self.clauses.len());
        orient_equalities(&mut clause, self.ordering.as_ref());
        SelectAll.select(&mut clause, self.ordering.as_ref());
        self.clauses.push(Arc::new(clause.clone()));
        clause
    }

    pub fn activate(&mut self, clause: &Clause) {
        self.indexes.on_activate(Arc::clone(&self.clauses[clause.number()]));
    }

    pub fn ctx(&self) -> EngineContext<'_> {
        EngineContext {
            indexes: &self.indexes,
            ordering: self.ordering.as_ref(),
            interner: &self.interner,
            clauses: &self.clauses,
        }
    }
}

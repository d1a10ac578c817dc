//! Scoped substitutions for binary inference rules and index retrieval
//!
//! Instead of renaming variables before unification, every variable is
//! paired with a scope tag (its "bank"). The same `VariableId` in two
//! banks denotes two different variables, so a query term and a stored
//! term never clash. Bindings are triangular: a bound variable maps to a
//! term together with the bank that term lives in.

use crate::logic::interner::VariableId;
use crate::logic::term::Term;
use std::collections::{HashMap, HashSet};
use std::ops::Deref;
use std::sync::Arc;

/// Bank of the query term in index retrieval
pub const QUERY: u8 = 0;
/// Bank of stored terms in index retrieval
pub const RESULT: u8 = 1;

/// A variable tagged with its bank
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ScopedVar {
    pub scope: u8,
    pub id: VariableId,
}

impl ScopedVar {
    pub fn new(scope: u8, id: VariableId) -> Self {
        ScopedVar { scope, id }
    }
}

/// A dereferenced term: either borrowed from the caller or shared with a binding
enum Resolved<'a> {
    Input(&'a Term),
    Bound(Arc<Term>),
}

impl Deref for Resolved<'_> {
    type Target = Term;

    fn deref(&self) -> &Term {
        match self {
            Resolved::Input(t) => t,
            Resolved::Bound(t) => t,
        }
    }
}

/// Substitution over scoped variables, with a trail for backtracking
#[derive(Clone, Debug, Default)]
pub struct ScopedSubstitution {
    bindings: HashMap<ScopedVar, (Arc<Term>, u8)>,
    trail: Vec<ScopedVar>,
}

impl ScopedSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_bound(&self, var: ScopedVar) -> bool {
        self.bindings.contains_key(&var)
    }

    /// Bind an unbound variable. Rebinding is a logic error.
    pub fn bind(&mut self, var: ScopedVar, term: Term, scope: u8) {
        let previous = self.bindings.insert(var, (Arc::new(term), scope));
        assert!(previous.is_none(), "variable {:?} bound twice", var);
        self.trail.push(var);
    }

    /// Current trail position
    pub fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Undo every binding made after `mark`
    pub fn backtrack(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some(var) = self.trail.pop() {
                self.bindings.remove(&var);
            }
        }
    }

    /// Follow variable bindings until an unbound variable or a non-variable term
    fn resolve<'a>(&self, term: &'a Term, scope: u8) -> (Resolved<'a>, u8) {
        let mut current = Resolved::Input(term);
        let mut scope = scope;
        while let Some(id) = current.as_variable() {
            match self.bindings.get(&ScopedVar::new(scope, id)) {
                Some((bound, bound_scope)) => {
                    scope = *bound_scope;
                    current = Resolved::Bound(bound.clone());
                }
                None => break,
            }
        }
        (current, scope)
    }

    /// Does `var` occur in `term` (in bank `scope`) after dereferencing?
    fn occurs(&self, var: ScopedVar, term: &Term, scope: u8) -> bool {
        let (term, scope) = self.resolve(term, scope);
        match &*term {
            Term::Variable(v) => ScopedVar::new(scope, v.id) == var,
            Term::Constant(_) => false,
            Term::Function(_, args) => args.iter().any(|a| self.occurs(var, a, scope)),
        }
    }

    /// Robinson unification with occurs check. On failure the substitution
    /// is left as it was before the call.
    pub fn unify(&mut self, t1: &Term, s1: u8, t2: &Term, s2: u8) -> bool {
        let mark = self.mark();
        let ok = self.unify_inner(t1, s1, t2, s2);
        if !ok {
            self.backtrack(mark);
        }
        ok
    }

    fn unify_inner(&mut self, t1: &Term, s1: u8, t2: &Term, s2: u8) -> bool {
        let (r1, s1) = self.resolve(t1, s1);
        let (r2, s2) = self.resolve(t2, s2);
        match (&*r1, &*r2) {
            (Term::Variable(a), Term::Variable(b)) if a == b && s1 == s2 => true,
            (Term::Variable(v), other) => {
                let var = ScopedVar::new(s1, v.id);
                if self.occurs(var, other, s2) {
                    return false;
                }
                self.bind(var, other.clone(), s2);
                true
            }
            (other, Term::Variable(v)) => {
                let var = ScopedVar::new(s2, v.id);
                if self.occurs(var, other, s1) {
                    return false;
                }
                self.bind(var, other.clone(), s1);
                true
            }
            (Term::Constant(a), Term::Constant(b)) => a == b,
            (Term::Function(f, args1), Term::Function(g, args2)) => {
                f == g
                    && args1.len() == args2.len()
                    && args1
                        .iter()
                        .zip(args2.iter())
                        .all(|(a, b)| self.unify_inner(a, s1, b, s2))
            }
            _ => false,
        }
    }

    /// One-way matching: find bindings for the variables of `pattern` (bank
    /// `ps`) that make it equal to `instance` (bank `is`). Instance variables
    /// are treated as constants. On failure nothing is bound.
    pub fn match_terms(&mut self, pattern: &Term, ps: u8, instance: &Term, is: u8) -> bool {
        assert_ne!(ps, is, "matching needs distinct banks");
        let mark = self.mark();
        let ok = self.match_inner(pattern, ps, instance, is);
        if !ok {
            self.backtrack(mark);
        }
        ok
    }

    fn match_inner(&mut self, pattern: &Term, ps: u8, instance: &Term, is: u8) -> bool {
        match pattern {
            Term::Variable(v) => {
                let var = ScopedVar::new(ps, v.id);
                match self.bindings.get(&var) {
                    Some((bound, bound_scope)) => {
                        **bound == *instance && (*bound_scope == is || instance.is_ground())
                    }
                    None => {
                        self.bind(var, instance.clone(), is);
                        true
                    }
                }
            }
            Term::Constant(c) => matches!(instance, Term::Constant(d) if c == d),
            Term::Function(f, args) => match instance {
                Term::Function(g, iargs) if f == g && args.len() == iargs.len() => args
                    .iter()
                    .zip(iargs.iter())
                    .all(|(p, i)| self.match_inner(p, ps, i, is)),
                _ => false,
            },
        }
    }

    /// Apply the substitution to a term of bank `scope`. Unbound variables
    /// are renamed through `renaming`.
    pub fn apply(&self, term: &Term, scope: u8, renaming: &mut VarRenaming) -> Term {
        match term {
            Term::Variable(v) => match self.bindings.get(&ScopedVar::new(scope, v.id)) {
                Some((bound, bound_scope)) => self.apply(bound, *bound_scope, renaming),
                None => Term::var(renaming.rename(ScopedVar::new(scope, v.id))),
            },
            Term::Constant(_) => term.clone(),
            Term::Function(f, args) => {
                Term::Function(*f, args.iter().map(|a| self.apply(a, scope, renaming)).collect())
            }
        }
    }

    /// True if every bound variable of bank `scope` maps to a distinct
    /// unbound variable
    pub fn is_renaming_on(&self, scope: u8) -> bool {
        let mut targets = HashSet::new();
        for var in self.bindings.keys().filter(|v| v.scope == scope) {
            let probe = Term::var(var.id);
            let (resolved, target_scope) = self.resolve(&probe, scope);
            match resolved.as_variable() {
                Some(id) if targets.insert(ScopedVar::new(target_scope, id)) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Maps scoped variables to plain variables when a substitution is applied.
///
/// Variables of the kept bank (if any) keep their ids; every other variable
/// gets a fresh id counting up from `floor`, in order of first encounter.
#[derive(Debug, Clone)]
pub struct VarRenaming {
    map: HashMap<ScopedVar, VariableId>,
    keep: Option<u8>,
    next: u32,
}

impl VarRenaming {
    /// Rename every variable freshly
    pub fn fresh(floor: u32) -> Self {
        VarRenaming {
            map: HashMap::new(),
            keep: None,
            next: floor,
        }
    }

    /// Keep the ids of bank `scope`; `floor` must exceed every id used there
    pub fn keeping(scope: u8, floor: u32) -> Self {
        VarRenaming {
            map: HashMap::new(),
            keep: Some(scope),
            next: floor,
        }
    }

    pub fn rename(&mut self, var: ScopedVar) -> VariableId {
        if self.keep == Some(var.scope) {
            return var.id;
        }
        if let Some(&id) = self.map.get(&var) {
            return id;
        }
        let id = VariableId::new(self.next);
        self.next += 1;
        self.map.insert(var, id);
        id
    }
}

//! Terms in first-order logic

use crate::logic::interner::{ConstantId, FunctionId, Interner, VariableId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A variable in first-order logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
}

impl Variable {
    pub fn new(id: VariableId) -> Self {
        Variable { id }
    }
}

/// A constant symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Constant {
    pub id: ConstantId,
}

impl Constant {
    pub fn new(id: ConstantId) -> Self {
        Constant { id }
    }

    pub fn name<'a>(&self, interner: &'a Interner) -> &'a str {
        interner.resolve_constant(self.id)
    }
}

/// A function symbol with arity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionSymbol {
    pub id: FunctionId,
    pub arity: u8,
}

impl FunctionSymbol {
    pub fn new(id: FunctionId, arity: u8) -> Self {
        FunctionSymbol { id, arity }
    }

    pub fn name<'a>(&self, interner: &'a Interner) -> &'a str {
        interner.resolve_function(self.id)
    }
}

/// A term in first-order logic. Sorts are terms too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Variable(Variable),
    Constant(Constant),
    Function(FunctionSymbol, Vec<Term>),
}

impl Term {
    pub fn var(id: VariableId) -> Term {
        Term::Variable(Variable::new(id))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn as_variable(&self) -> Option<VariableId> {
        match self {
            Term::Variable(v) => Some(v.id),
            _ => None,
        }
    }

    pub fn args(&self) -> &[Term] {
        match self {
            Term::Function(_, args) => args,
            _ => &[],
        }
    }

    /// Number of symbol occurrences, variables included
    pub fn weight(&self) -> usize {
        match self {
            Term::Variable(_) | Term::Constant(_) => 1,
            Term::Function(_, args) => 1 + args.iter().map(Term::weight).sum::<usize>(),
        }
    }

    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Constant(_) => true,
            Term::Function(_, args) => args.iter().all(Term::is_ground),
        }
    }

    /// Number of variable occurrences
    pub fn var_occurrences(&self) -> usize {
        match self {
            Term::Variable(_) => 1,
            Term::Constant(_) => 0,
            Term::Function(_, args) => args.iter().map(Term::var_occurrences).sum(),
        }
    }

    pub fn collect_variable_ids(&self, vars: &mut HashSet<VariableId>) {
        match self {
            Term::Variable(v) => {
                vars.insert(v.id);
            }
            Term::Constant(_) => {}
            Term::Function(_, args) => {
                for arg in args {
                    arg.collect_variable_ids(vars);
                }
            }
        }
    }

    /// Variables in order of first occurrence, without repetition
    pub fn variables_in_order(&self, out: &mut Vec<VariableId>) {
        match self {
            Term::Variable(v) => {
                if !out.contains(&v.id) {
                    out.push(v.id);
                }
            }
            Term::Constant(_) => {}
            Term::Function(_, args) => {
                for arg in args {
                    arg.variables_in_order(out);
                }
            }
        }
    }

    pub fn max_variable_id(&self) -> Option<u32> {
        match self {
            Term::Variable(v) => Some(v.id.as_u32()),
            Term::Constant(_) => None,
            Term::Function(_, args) => args.iter().filter_map(Term::max_variable_id).max(),
        }
    }

    pub fn contains_variable(&self, id: VariableId) -> bool {
        match self {
            Term::Variable(v) => v.id == id,
            Term::Constant(_) => false,
            Term::Function(_, args) => args.iter().any(|a| a.contains_variable(id)),
        }
    }

    pub fn contains_subterm(&self, sub: &Term) -> bool {
        self == sub || self.args().iter().any(|a| a.contains_subterm(sub))
    }

    /// Replace every occurrence of `from` by `to`
    pub fn replace(&self, from: &Term, to: &Term) -> Term {
        if self == from {
            return to.clone();
        }
        match self {
            Term::Function(f, args) => {
                Term::Function(*f, args.iter().map(|a| a.replace(from, to)).collect())
            }
            _ => self.clone(),
        }
    }

    /// Non-variable subterms with their argument paths, in pre-order
    pub fn non_variable_positions(&self) -> Vec<(Vec<usize>, &Term)> {
        fn walk<'a>(term: &'a Term, path: &mut Vec<usize>, out: &mut Vec<(Vec<usize>, &'a Term)>) {
            if term.is_variable() {
                return;
            }
            out.push((path.clone(), term));
            for (i, arg) in term.args().iter().enumerate() {
                path.push(i);
                walk(arg, path, out);
                path.pop();
            }
        }
        let mut out = Vec::new();
        walk(self, &mut Vec::new(), &mut out);
        out
    }

    /// Replace the subterm at `path`. The path must lead through function
    /// applications only.
    pub fn replace_at(&self, path: &[usize], to: &Term) -> Term {
        match (path.split_first(), self) {
            (None, _) => to.clone(),
            (Some((&i, rest)), Term::Function(f, args)) => {
                let mut args = args.clone();
                args[i] = args[i].replace_at(rest, to);
                Term::Function(*f, args)
            }
            (Some(_), _) => panic!("position leads below a leaf term"),
        }
    }

    pub fn display<'a>(&'a self, interner: &'a Interner) -> TermDisplay<'a> {
        TermDisplay { term: self, interner }
    }
}

/// Pre-order walk over the non-variable subterms of a sequence of terms.
///
/// Yields each subterm together with its sort. Children of the subterm
/// returned last are pushed lazily on the following `next()`, so
/// [`skip_subtree`](Self::skip_subtree) only has to forget them.
pub struct NonVariableSubterms<'a> {
    stack: Vec<&'a Term>,
    last: Option<&'a Term>,
    interner: &'a Interner,
}

impl<'a> NonVariableSubterms<'a> {
    pub fn new(terms: &'a [Term], interner: &'a Interner) -> Self {
        NonVariableSubterms {
            stack: terms.iter().rev().collect(),
            last: None,
            interner,
        }
    }

    /// Do not descend into the subterm returned by the last `next()`
    pub fn skip_subtree(&mut self) {
        self.last = None;
    }
}

impl<'a> Iterator for NonVariableSubterms<'a> {
    type Item = (&'a Term, Term);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(prev) = self.last.take() {
            self.stack.extend(prev.args().iter().rev());
        }
        while let Some(term) = self.stack.pop() {
            if term.is_variable() {
                continue;
            }
            self.last = Some(term);
            let sort = self.interner.result_sort(term).unwrap_or_else(Term::default_sort);
            return Some((term, sort));
        }
        None
    }
}

/// Display wrapper for Term that resolves names through an interner
pub struct TermDisplay<'a> {
    term: &'a Term,
    interner: &'a Interner,
}

impl<'a> fmt::Display for TermDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.term {
            Term::Variable(v) => write!(f, "{}", self.interner.variable_name(v.id)),
            Term::Constant(c) => write!(f, "{}", c.name(self.interner)),
            Term::Function(func, args) => {
                write!(f, "{}(", func.name(self.interner))?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", arg.display(self.interner))?;
                }
                write!(f, ")")
            }
        }
    }
}

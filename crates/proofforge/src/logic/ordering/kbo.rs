//! Knuth-Bendix Ordering

use super::TermOrdering;
use crate::logic::interner::{ConstantId, FunctionId, Interner, PredicateId, VariableId};
use crate::logic::literal::Literal;
use crate::logic::term::Term;
use std::collections::HashMap;

/// Configuration for Knuth-Bendix Ordering
#[derive(Debug, Clone)]
pub struct KBOConfig {
    /// Weight of each function/constant symbol by ID (default weight is 1)
    pub function_weights: HashMap<FunctionId, usize>,
    pub constant_weights: HashMap<ConstantId, usize>,
    /// Precedence of symbols by ID (higher value = higher precedence).
    /// Ties are broken by ID, so later-interned symbols are greater.
    pub function_precedence: HashMap<FunctionId, usize>,
    pub constant_precedence: HashMap<ConstantId, usize>,
    pub predicate_precedence: HashMap<PredicateId, usize>,
    /// Weight of variables (must be positive)
    pub variable_weight: usize,
}

impl Default for KBOConfig {
    fn default() -> Self {
        KBOConfig {
            function_weights: HashMap::new(),
            constant_weights: HashMap::new(),
            function_precedence: HashMap::new(),
            constant_precedence: HashMap::new(),
            predicate_precedence: HashMap::new(),
            variable_weight: 1,
        }
    }
}

impl KBOConfig {
    /// Build a precedence from symbol names, lowest first
    pub fn with_precedence(interner: &Interner, lowest_first: &[&str]) -> Self {
        let mut config = KBOConfig::default();
        for (rank, name) in lowest_first.iter().enumerate() {
            if let Some(fid) = interner.get_function(name) {
                config.function_precedence.insert(fid, rank + 1);
            }
            if let Some(cid) = interner.get_constant(name) {
                config.constant_precedence.insert(cid, rank + 1);
            }
            if let Some(pid) = interner.get_predicate(name) {
                config.predicate_precedence.insert(pid, rank + 1);
            }
        }
        config
    }
}

/// Result of comparing two terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    Greater,
    Less,
    Equal,
    Incomparable,
}

impl Ordering {
    pub fn reverse(self) -> Ordering {
        match self {
            Ordering::Greater => Ordering::Less,
            Ordering::Less => Ordering::Greater,
            other => other,
        }
    }

    /// `Greater` or `Less`
    pub fn is_strict(self) -> bool {
        matches!(self, Ordering::Greater | Ordering::Less)
    }
}

/// Knuth-Bendix Ordering implementation
#[derive(Debug, Clone)]
pub struct KBO {
    config: KBOConfig,
}

/// Symbol key used for precedence comparison; functions rank above constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Head {
    Constant(usize, ConstantId),
    Function(usize, FunctionId, u8),
}

impl KBO {
    pub fn new(config: KBOConfig) -> Self {
        KBO { config }
    }

    fn function_weight(&self, id: FunctionId) -> usize {
        self.config.function_weights.get(&id).copied().unwrap_or(1)
    }

    fn constant_weight(&self, id: ConstantId) -> usize {
        self.config.constant_weights.get(&id).copied().unwrap_or(1)
    }

    fn head(&self, term: &Term) -> Option<Head> {
        match term {
            Term::Variable(_) => None,
            Term::Constant(c) => Some(Head::Constant(
                self.config.constant_precedence.get(&c.id).copied().unwrap_or(0),
                c.id,
            )),
            Term::Function(f, _) => Some(Head::Function(
                self.config.function_precedence.get(&f.id).copied().unwrap_or(0),
                f.id,
                f.arity,
            )),
        }
    }

    fn predicate_rank(&self, id: PredicateId) -> (usize, PredicateId) {
        (self.config.predicate_precedence.get(&id).copied().unwrap_or(0), id)
    }

    /// Calculate the weight of a term
    pub fn term_weight(&self, term: &Term) -> usize {
        match term {
            Term::Variable(_) => self.config.variable_weight,
            Term::Constant(c) => self.constant_weight(c.id),
            Term::Function(f, args) => {
                self.function_weight(f.id) + args.iter().map(|t| self.term_weight(t)).sum::<usize>()
            }
        }
    }

    /// Count occurrences of each variable in a term
    pub fn count_variables(&self, term: &Term) -> HashMap<VariableId, usize> {
        let mut counts = HashMap::new();
        count_variables_rec(term, &mut counts);
        counts
    }

    /// Weight comparison guarded by the variable condition; `lex` runs on equal weights
    fn compare_weighted(
        &self,
        weight_s: usize,
        weight_t: usize,
        vars_s: &HashMap<VariableId, usize>,
        vars_t: &HashMap<VariableId, usize>,
        lex: impl FnOnce() -> Ordering,
    ) -> Ordering {
        // s > t needs #(x, s) >= #(x, t) for all variables x
        let s_covers_t = vars_t
            .iter()
            .all(|(v, count)| vars_s.get(v).copied().unwrap_or(0) >= *count);
        let t_covers_s = vars_s
            .iter()
            .all(|(v, count)| vars_t.get(v).copied().unwrap_or(0) >= *count);

        if weight_s > weight_t {
            return if s_covers_t { Ordering::Greater } else { Ordering::Incomparable };
        }
        if weight_t > weight_s {
            return if t_covers_s { Ordering::Less } else { Ordering::Incomparable };
        }
        match lex() {
            Ordering::Greater if s_covers_t => Ordering::Greater,
            Ordering::Less if t_covers_s => Ordering::Less,
            Ordering::Equal => Ordering::Equal,
            _ => Ordering::Incomparable,
        }
    }

    /// Lexicographic comparison for terms of equal weight
    fn compare_lex(&self, s: &Term, t: &Term) -> Ordering {
        match (self.head(s), self.head(t)) {
            (None, None) => {
                if s == t {
                    Ordering::Equal
                } else {
                    Ordering::Incomparable
                }
            }
            // A variable is never greater than a compound of the same weight
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(hs), Some(ht)) if hs != ht => {
                if hs > ht {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (Some(_), Some(_)) => self.compare_args(s.args(), t.args()),
        }
    }

    fn compare_args(&self, args_s: &[Term], args_t: &[Term]) -> Ordering {
        for (a, b) in args_s.iter().zip(args_t.iter()) {
            match self.compare(a, b) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    }

    fn compare_atoms(&self, l1: &Literal, l2: &Literal) -> Ordering {
        let weight = |lit: &Literal| 1 + lit.args.iter().map(|a| self.term_weight(a)).sum::<usize>();
        let vars = |lit: &Literal| {
            let mut counts = HashMap::new();
            for arg in &lit.args {
                count_variables_rec(arg, &mut counts);
            }
            counts
        };
        self.compare_weighted(weight(l1), weight(l2), &vars(l1), &vars(l2), || {
            let (r1, r2) = (self.predicate_rank(l1.predicate.id), self.predicate_rank(l2.predicate.id));
            if r1 != r2 {
                return if r1 > r2 { Ordering::Greater } else { Ordering::Less };
            }
            self.compare_args(&l1.args, &l2.args)
        })
    }

    /// Dershowitz-Manna extension of the term ordering to multisets
    fn compare_multisets(&self, mut m: Vec<&Term>, mut n: Vec<&Term>) -> Ordering {
        let mut i = 0;
        while i < m.len() {
            if let Some(j) = n.iter().position(|t| *t == m[i]) {
                m.swap_remove(i);
                n.swap_remove(j);
            } else {
                i += 1;
            }
        }
        if m.is_empty() && n.is_empty() {
            return Ordering::Equal;
        }
        let dominates = |big: &[&Term], small: &[&Term]| {
            small
                .iter()
                .all(|y| big.iter().any(|x| self.compare(x, y) == Ordering::Greater))
        };
        if dominates(&m, &n) {
            Ordering::Greater
        } else if dominates(&n, &m) {
            Ordering::Less
        } else {
            Ordering::Incomparable
        }
    }
}

fn count_variables_rec(term: &Term, counts: &mut HashMap<VariableId, usize>) {
    match term {
        Term::Variable(v) => *counts.entry(v.id).or_insert(0) += 1,
        Term::Constant(_) => {}
        Term::Function(_, args) => {
            for arg in args {
                count_variables_rec(arg, counts);
            }
        }
    }
}

impl TermOrdering for KBO {
    fn compare(&self, s: &Term, t: &Term) -> Ordering {
        if s == t {
            return Ordering::Equal;
        }
        let vars_s = self.count_variables(s);
        let vars_t = self.count_variables(t);
        self.compare_weighted(self.term_weight(s), self.term_weight(t), &vars_s, &vars_t, || {
            self.compare_lex(s, t)
        })
    }

    /// Equalities rank below every other predicate. Non-equality literals
    /// compare by atom, then negative above positive; equalities compare as
    /// the multisets {s, t} (positive) and {s, s, t, t} (negative).
    fn compare_literals(&self, l1: &Literal, l2: &Literal) -> Ordering {
        match (l1.is_equality(), l2.is_equality()) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => match self.compare_atoms(l1, l2) {
                Ordering::Equal if l1.polarity == l2.polarity => Ordering::Equal,
                Ordering::Equal if !l1.polarity => Ordering::Greater,
                Ordering::Equal => Ordering::Less,
                other => other,
            },
            (true, true) => {
                fn expand(lit: &Literal) -> Vec<&Term> {
                    let copies = if lit.polarity { 1 } else { 2 };
                    lit.args.iter().flat_map(|a| std::iter::repeat(a).take(copies)).collect()
                }
                self.compare_multisets(expand(l1), expand(l2))
            }
        }
    }
}

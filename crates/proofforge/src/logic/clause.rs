//! Clauses and their derivation records

use crate::logic::interner::{Interner, PredicateId, VariableId};
use crate::logic::literal::{Color, Literal};
use crate::logic::term::Term;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Rule that produced a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InferenceRule {
    Input,
    Resolution,
    Factoring,
    EqualityResolution,
    Superposition,
    EqualityFactoring,
    ForwardDemodulation,
    BackwardDemodulation,
    DuplicateLiteralRemoval,
}

impl InferenceRule {
    pub fn name(self) -> &'static str {
        match self {
            InferenceRule::Input => "input",
            InferenceRule::Resolution => "resolution",
            InferenceRule::Factoring => "factoring",
            InferenceRule::EqualityResolution => "equality resolution",
            InferenceRule::Superposition => "superposition",
            InferenceRule::EqualityFactoring => "equality factoring",
            InferenceRule::ForwardDemodulation => "forward demodulation",
            InferenceRule::BackwardDemodulation => "backward demodulation",
            InferenceRule::DuplicateLiteralRemoval => "duplicate literal removal",
        }
    }
}

/// How a clause was derived: the rule and the ids of its premises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inference {
    pub rule: InferenceRule,
    pub premises: Vec<usize>,
}

impl Inference {
    pub fn input() -> Self {
        Inference {
            rule: InferenceRule::Input,
            premises: Vec::new(),
        }
    }

    pub fn new(rule: InferenceRule, premises: Vec<usize>) -> Self {
        Inference { rule, premises }
    }
}

/// A clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub literals: Vec<Literal>,
    /// Arena id, assigned when the clause enters the saturation loop
    pub id: Option<usize>,
    /// 0 for input clauses, max parent age + 1 for derived ones
    pub age: usize,
    pub inference: Inference,
    /// Length of the selected prefix of `literals`
    pub selected: usize,
}

impl Clause {
    /// Create an input clause
    pub fn new(literals: Vec<Literal>) -> Self {
        Clause {
            literals,
            id: None,
            age: 0,
            inference: Inference::input(),
            selected: 0,
        }
    }

    /// Create a derived clause; id and age are stamped when it is stored
    pub fn derived(literals: Vec<Literal>, rule: InferenceRule, premises: Vec<usize>) -> Self {
        Clause {
            literals,
            id: None,
            age: 0,
            inference: Inference::new(rule, premises),
            selected: 0,
        }
    }

    /// Id of a stored clause. Calling this on an unstored clause is a logic error.
    pub fn number(&self) -> usize {
        match self.id {
            Some(id) => id,
            None => panic!("clause has not been stored yet"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// Sum of literal weights
    pub fn weight(&self) -> usize {
        self.literals.iter().map(Literal::weight).sum()
    }

    pub fn color(&self) -> Color {
        self.literals
            .iter()
            .fold(Color::Transparent, |acc, lit| acc.combine(lit.color))
    }

    pub fn selected_literals(&self) -> &[Literal] {
        &self.literals[..self.selected]
    }

    /// Complementary literals or `t = t`
    pub fn is_tautology(&self) -> bool {
        if self.literals.iter().any(Literal::is_equality_tautology) {
            return true;
        }
        self.literals.iter().enumerate().any(|(i, lit)| {
            self.literals[i + 1..].iter().any(|other| lit.is_complement_of(other))
        })
    }

    /// The clause with repeated literals removed, if any were repeated
    pub fn without_duplicate_literals(&self) -> Option<Vec<Literal>> {
        let mut seen = HashSet::new();
        let kept: Vec<Literal> = self
            .literals
            .iter()
            .filter(|lit| seen.insert(*lit))
            .cloned()
            .collect();
        (kept.len() < self.literals.len()).then_some(kept)
    }

    pub fn max_variable_id(&self) -> Option<u32> {
        self.literals.iter().filter_map(Literal::max_variable_id).max()
    }

    /// First variable id not used by this clause
    pub fn variable_floor(&self) -> u32 {
        self.max_variable_id().map_or(0, |m| m + 1)
    }

    pub fn variables(&self) -> HashSet<VariableId> {
        let mut vars = HashSet::new();
        for lit in &self.literals {
            lit.collect_variable_ids(&mut vars);
        }
        vars
    }

    pub fn display<'a>(&'a self, interner: &'a Interner) -> ClauseDisplay<'a> {
        ClauseDisplay { clause: self, interner }
    }
}

/// Display wrapper for Clause that includes an interner for name resolution
pub struct ClauseDisplay<'a> {
    clause: &'a Clause,
    interner: &'a Interner,
}

impl<'a> fmt::Display for ClauseDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clause.is_empty() {
            return write!(f, "⊥");
        }
        for (i, lit) in self.clause.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " ∨ ")?;
            }
            write!(f, "{}", lit.display(self.interner))?;
        }
        Ok(())
    }
}

/// Structural key for duplicate detection, insensitive to literal order.
///
/// Literals are sorted by polarity (negative first), predicate and arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClauseKey {
    literals: Vec<(bool, PredicateId, Vec<Term>)>,
}

impl ClauseKey {
    pub fn from_clause(clause: &Clause) -> Self {
        let mut literals: Vec<_> = clause
            .literals
            .iter()
            .map(|lit| (lit.polarity, lit.predicate.id, lit.args.clone()))
            .collect();
        literals.sort();
        ClauseKey { literals }
    }
}

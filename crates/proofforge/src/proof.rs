//! Refutation proofs and their JSON form

use crate::error::Result;
use crate::logic::{Clause, InferenceRule, Interner, Literal, Term};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// One clause of a proof with the inference that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub id: usize,
    pub clause: Clause,
    pub rule: InferenceRule,
    pub premises: Vec<usize>,
}

/// The derivation of the empty clause, steps ordered by clause id.
/// Premises always precede the steps that use them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub steps: Vec<ProofStep>,
    pub empty_clause: usize,
}

impl Proof {
    /// Collect every ancestor of `empty_clause` in the clause arena
    pub fn extract(clauses: &[Arc<Clause>], empty_clause: usize) -> Self {
        let mut needed = BTreeSet::new();
        let mut stack = vec![empty_clause];
        while let Some(id) = stack.pop() {
            if needed.insert(id) {
                stack.extend(clauses[id].inference.premises.iter().copied());
            }
        }
        let steps = needed
            .into_iter()
            .map(|id| {
                let clause = &clauses[id];
                ProofStep {
                    id,
                    clause: Clause::clone(clause),
                    rule: clause.inference.rule,
                    premises: clause.inference.premises.clone(),
                }
            })
            .collect();
        Proof { steps, empty_clause }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, id: usize) -> Option<&ProofStep> {
        self.steps
            .binary_search_by_key(&id, |s| s.id)
            .ok()
            .map(|i| &self.steps[i])
    }

    /// Ids of the input clauses the proof uses
    pub fn input_clauses(&self) -> Vec<usize> {
        self.steps
            .iter()
            .filter(|s| s.rule == InferenceRule::Input)
            .map(|s| s.id)
            .collect()
    }

    pub fn to_json(&self, interner: &Interner) -> Result<String> {
        let json = ProofJson {
            empty_clause: self.empty_clause,
            steps: self
                .steps
                .iter()
                .map(|s| ProofStepJson {
                    id: s.id,
                    rule: s.rule.name().to_string(),
                    premises: s.premises.clone(),
                    literals: s.clause.literals.iter().map(|l| LiteralJson::from_literal(l, interner)).collect(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&json)?)
    }

    pub fn display<'a>(&'a self, interner: &'a Interner) -> ProofDisplay<'a> {
        ProofDisplay { proof: self, interner }
    }
}

pub struct ProofDisplay<'a> {
    proof: &'a Proof,
    interner: &'a Interner,
}

impl<'a> fmt::Display for ProofDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.proof.steps {
            write!(f, "{}. {} [{}", step.id, step.clause.display(self.interner), step.rule.name())?;
            for (i, premise) in step.premises.iter().enumerate() {
                write!(f, "{}{}", if i == 0 { " " } else { "," }, premise)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TermJson {
    Variable { name: String },
    Constant { name: String },
    Function { name: String, args: Vec<TermJson> },
}

impl TermJson {
    pub fn from_term(term: &Term, interner: &Interner) -> Self {
        match term {
            Term::Variable(v) => TermJson::Variable {
                name: interner.variable_name(v.id),
            },
            Term::Constant(c) => TermJson::Constant {
                name: c.name(interner).to_string(),
            },
            Term::Function(f, args) => TermJson::Function {
                name: f.name(interner).to_string(),
                args: args.iter().map(|t| TermJson::from_term(t, interner)).collect(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteralJson {
    pub polarity: bool,
    pub predicate: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub args: Vec<TermJson>,
}

impl LiteralJson {
    pub fn from_literal(lit: &Literal, interner: &Interner) -> Self {
        LiteralJson {
            polarity: lit.polarity,
            predicate: lit.predicate.name(interner).to_string(),
            args: lit.args.iter().map(|t| TermJson::from_term(t, interner)).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofStepJson {
    pub id: usize,
    pub rule: String,
    pub premises: Vec<usize>,
    pub literals: Vec<LiteralJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofJson {
    pub empty_clause: usize,
    pub steps: Vec<ProofStepJson>,
}

//! Literals and interpolation colors

use crate::logic::interner::{Interner, PredicateId, VariableId};
use crate::logic::term::Term;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A predicate symbol with arity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PredicateSymbol {
    pub id: PredicateId,
    pub arity: u8,
}

impl PredicateSymbol {
    pub fn new(id: PredicateId, arity: u8) -> Self {
        PredicateSymbol { id, arity }
    }

    pub fn equality() -> Self {
        PredicateSymbol::new(PredicateId::EQUALITY, 2)
    }

    pub fn name<'a>(&self, interner: &'a Interner) -> &'a str {
        interner.resolve_predicate(self.id)
    }
}

/// Interpolation color of a symbol, literal or clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Color {
    #[default]
    Transparent,
    Left,
    Right,
}

impl Color {
    /// Two colors may meet in one inference unless one is left and the other right
    pub fn compatible(a: Color, b: Color) -> bool {
        !matches!((a, b), (Color::Left, Color::Right) | (Color::Right, Color::Left))
    }

    /// The color of a combination of `self` and `other`
    pub fn combine(self, other: Color) -> Color {
        match self {
            Color::Transparent => other,
            _ => self,
        }
    }
}

/// A literal (positive or negative atom)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub predicate: PredicateSymbol,
    pub args: Vec<Term>,
    pub polarity: bool,
    pub color: Color,
    /// Argument sort of an equality between two variables; otherwise the
    /// sort is read off a non-variable side.
    pub sort: Option<Term>,
}

impl Literal {
    pub fn new(predicate: PredicateSymbol, args: Vec<Term>, polarity: bool) -> Self {
        Literal {
            predicate,
            args,
            polarity,
            color: Color::Transparent,
            sort: None,
        }
    }

    pub fn positive(predicate: PredicateSymbol, args: Vec<Term>) -> Self {
        Literal::new(predicate, args, true)
    }

    pub fn negative(predicate: PredicateSymbol, args: Vec<Term>) -> Self {
        Literal::new(predicate, args, false)
    }

    pub fn equality(left: Term, right: Term, polarity: bool) -> Self {
        Literal::new(PredicateSymbol::equality(), vec![left, right], polarity)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_sort(mut self, sort: Term) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn is_equality(&self) -> bool {
        self.predicate.id == PredicateId::EQUALITY
    }

    pub fn is_positive_equality(&self) -> bool {
        self.polarity && self.is_equality()
    }

    pub fn is_negative_equality(&self) -> bool {
        !self.polarity && self.is_equality()
    }

    pub fn is_answer(&self) -> bool {
        self.predicate.id == PredicateId::ANSWER
    }

    /// `t = t`
    pub fn is_equality_tautology(&self) -> bool {
        self.is_positive_equality() && self.args[0] == self.args[1]
    }

    /// Predicate and polarity; literals with equal headers differ only in arguments
    pub fn header(&self) -> (PredicateId, bool) {
        (self.predicate.id, self.polarity)
    }

    pub fn complement(&self) -> Literal {
        Literal {
            polarity: !self.polarity,
            ..self.clone()
        }
    }

    /// Same atom, opposite polarity
    pub fn is_complement_of(&self, other: &Literal) -> bool {
        self.polarity != other.polarity
            && self.predicate == other.predicate
            && self.args == other.args
    }

    /// Sort of the arguments of an equality literal
    pub fn equality_sort(&self, interner: &Interner) -> Term {
        debug_assert!(self.is_equality());
        self.args
            .iter()
            .find_map(|a| interner.result_sort(a))
            .or_else(|| self.sort.clone())
            .unwrap_or_else(Term::default_sort)
    }

    /// The argument of an equality opposite to position `index`
    pub fn other_side(&self, index: usize) -> &Term {
        &self.args[1 - index]
    }

    /// 1 + symbol count of the arguments
    pub fn weight(&self) -> usize {
        1 + self.args.iter().map(Term::weight).sum::<usize>()
    }

    pub fn var_occurrences(&self) -> usize {
        self.args.iter().map(Term::var_occurrences).sum()
    }

    pub fn distinct_vars(&self) -> usize {
        let mut vars = HashSet::new();
        for arg in &self.args {
            arg.collect_variable_ids(&mut vars);
        }
        vars.len()
    }

    /// Number of arguments that are variables
    pub fn top_level_vars(&self) -> usize {
        self.args.iter().filter(|a| a.is_variable()).count()
    }

    pub fn collect_variable_ids(&self, vars: &mut HashSet<VariableId>) {
        for arg in &self.args {
            arg.collect_variable_ids(vars);
        }
    }

    pub fn max_variable_id(&self) -> Option<u32> {
        self.args.iter().filter_map(Term::max_variable_id).max()
    }

    pub fn is_ground(&self) -> bool {
        self.args.iter().all(Term::is_ground)
    }

    /// Rebuild the literal with mapped arguments, keeping header, color and sort
    pub fn map_args(&self, mut f: impl FnMut(&Term) -> Term) -> Literal {
        Literal {
            predicate: self.predicate,
            args: self.args.iter().map(&mut f).collect(),
            polarity: self.polarity,
            color: self.color,
            sort: self.sort.as_ref().map(&mut f),
        }
    }

    pub fn display<'a>(&'a self, interner: &'a Interner) -> LiteralDisplay<'a> {
        LiteralDisplay { literal: self, interner }
    }
}

/// Display wrapper for Literal
pub struct LiteralDisplay<'a> {
    literal: &'a Literal,
    interner: &'a Interner,
}

impl<'a> fmt::Display for LiteralDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lit = self.literal;
        if lit.is_equality() {
            let op = if lit.polarity { "=" } else { "!=" };
            return write!(
                f,
                "{} {} {}",
                lit.args[0].display(self.interner),
                op,
                lit.args[1].display(self.interner)
            );
        }
        if !lit.polarity {
            write!(f, "~")?;
        }
        write!(f, "{}", lit.predicate.name(self.interner))?;
        if !lit.args.is_empty() {
            write!(f, "(")?;
            for (i, arg) in lit.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", arg.display(self.interner))?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

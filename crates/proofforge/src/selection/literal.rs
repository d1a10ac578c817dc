//! Literal selection.
//!
//! A selector decides which literals of a clause are eligible for
//! generating inferences. The chosen literals are moved to the front of
//! the clause and `Clause::selected` records how many there are.
//!
//! Answer literals are never eligible while the clause has other
//! literals.

use super::comparators::{Comparison, DefaultComparator, LiteralComparator};
use crate::config::LiteralSelectionStrategy;
use crate::logic::{Clause, Literal, Ordering, TermOrdering};

pub trait LiteralSelector {
    /// Positions among `literals[..eligible]` to select. Must be non-empty
    /// whenever `eligible > 0`.
    fn choose(&self, literals: &[Literal], eligible: usize, ordering: &dyn TermOrdering) -> Vec<usize>;

    fn name(&self) -> &str;

    /// Select literals of `clause`, reordering it so they form a prefix
    fn select(&self, clause: &mut Clause, ordering: &dyn TermOrdering) {
        if clause.is_empty() {
            clause.selected = 0;
            return;
        }
        // Non-answer literals first, keeping their relative order
        let (mut literals, answers): (Vec<Literal>, Vec<Literal>) =
            std::mem::take(&mut clause.literals).into_iter().partition(|l| !l.is_answer());
        let eligible = if literals.is_empty() { answers.len() } else { literals.len() };
        literals.extend(answers);

        let mut chosen = self.choose(&literals, eligible, ordering);
        chosen.sort_unstable();
        chosen.dedup();
        assert!(!chosen.is_empty(), "{} selected no literal", self.name());

        let mut taken = vec![false; literals.len()];
        let mut reordered = Vec::with_capacity(literals.len());
        for &i in &chosen {
            taken[i] = true;
            reordered.push(literals[i].clone());
        }
        reordered.extend(
            literals
                .into_iter()
                .zip(taken)
                .filter(|(_, t)| !t)
                .map(|(l, _)| l),
        );
        clause.literals = reordered;
        clause.selected = chosen.len();
    }
}

/// Positions among the first `eligible` literals that no other literal
/// there is greater than
pub fn maximal_literals(literals: &[Literal], eligible: usize, ordering: &dyn TermOrdering) -> Vec<usize> {
    let prefix = &literals[..eligible];
    (0..prefix.len())
        .filter(|&i| {
            prefix
                .iter()
                .enumerate()
                .all(|(j, other)| i == j || ordering.compare_literals(other, &prefix[i]) != Ordering::Greater)
        })
        .collect()
}

/// Every literal is eligible
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectAll;

impl LiteralSelector for SelectAll {
    fn choose(&self, _literals: &[Literal], eligible: usize, _ordering: &dyn TermOrdering) -> Vec<usize> {
        (0..eligible).collect()
    }

    fn name(&self) -> &str {
        "all"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpassMode {
    Off,
    IfSeveralMaximal,
    Always,
}

/// SPASS-style selection of maximal literals
#[derive(Debug, Clone, Copy)]
pub struct SpassSelector {
    mode: SpassMode,
}

impl SpassSelector {
    pub fn new(mode: SpassMode) -> Self {
        SpassSelector { mode }
    }
}

impl LiteralSelector for SpassSelector {
    fn choose(&self, literals: &[Literal], eligible: usize, ordering: &dyn TermOrdering) -> Vec<usize> {
        let everything = || (0..eligible).collect();
        match self.mode {
            SpassMode::Off => everything(),
            SpassMode::Always => maximal_literals(literals, eligible, ordering),
            SpassMode::IfSeveralMaximal => {
                let maximal = maximal_literals(literals, eligible, ordering);
                if maximal.len() > 1 {
                    maximal
                } else {
                    everything()
                }
            }
        }
    }

    fn name(&self) -> &str {
        match self.mode {
            SpassMode::Off => "spass-off",
            SpassMode::IfSeveralMaximal => "spass-if-several-maximal",
            SpassMode::Always => "spass-always",
        }
    }
}

/// Selects the single greatest negative literal under `C`; clauses without
/// negative literals get all their maximal literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestLiteralSelector<C> {
    comparator: C,
}

impl<C: LiteralComparator> BestLiteralSelector<C> {
    pub fn new(comparator: C) -> Self {
        BestLiteralSelector { comparator }
    }
}

impl<C: LiteralComparator> LiteralSelector for BestLiteralSelector<C> {
    fn choose(&self, literals: &[Literal], eligible: usize, ordering: &dyn TermOrdering) -> Vec<usize> {
        let mut best: Option<usize> = None;
        for (i, lit) in literals[..eligible].iter().enumerate().filter(|(_, l)| !l.polarity) {
            match best {
                Some(b) if self.comparator.compare(lit, &literals[b]) != Comparison::Greater => {}
                _ => best = Some(i),
            }
        }
        match best {
            Some(i) => vec![i],
            None => maximal_literals(literals, eligible, ordering),
        }
    }

    fn name(&self) -> &str {
        "best"
    }
}

/// Build the selector configured by `strategy`
pub fn selector_for(strategy: LiteralSelectionStrategy) -> Box<dyn LiteralSelector> {
    match strategy {
        LiteralSelectionStrategy::Off => Box::new(SelectAll),
        LiteralSelectionStrategy::Always => Box::new(SpassSelector::new(SpassMode::Always)),
        LiteralSelectionStrategy::IfSeveralMaximal => Box::new(SpassSelector::new(SpassMode::IfSeveralMaximal)),
        LiteralSelectionStrategy::Best => Box::new(BestLiteralSelector::<DefaultComparator>::default()),
    }
}

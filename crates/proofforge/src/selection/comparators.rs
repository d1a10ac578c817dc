//! Literal comparators for literal selection.
//!
//! Each primitive comparator ranks literals on one criterion and returns
//! `Equal` when it has no preference; [`Composite`] chains them so that the
//! next one breaks the tie. A selector picks the *greatest* literal.

use crate::logic::{Color, Literal, Term};
use std::collections::HashMap;

pub use std::cmp::Ordering as Comparison;

pub trait LiteralComparator {
    fn compare(&self, l1: &Literal, l2: &Literal) -> Comparison;
}

/// Use `A`, falling back to `B` on `Equal`
#[derive(Debug, Clone, Copy, Default)]
pub struct Composite<A, B>(pub A, pub B);

impl<A: LiteralComparator, B: LiteralComparator> LiteralComparator for Composite<A, B> {
    fn compare(&self, l1: &Literal, l2: &Literal) -> Comparison {
        match self.0.compare(l1, l2) {
            Comparison::Equal => self.1.compare(l1, l2),
            res => res,
        }
    }
}

/// `A` with its arguments swapped
#[derive(Debug, Clone, Copy, Default)]
pub struct Inverse<A>(pub A);

impl<A: LiteralComparator> LiteralComparator for Inverse<A> {
    fn compare(&self, l1: &Literal, l2: &Literal) -> Comparison {
        self.0.compare(l2, l1)
    }
}

fn prefer(first: bool, second: bool) -> Comparison {
    match (first, second) {
        (true, false) => Comparison::Greater,
        (false, true) => Comparison::Less,
        _ => Comparison::Equal,
    }
}

/// Colored literals rank above transparent ones
#[derive(Debug, Clone, Copy, Default)]
pub struct ColoredFirst;

impl LiteralComparator for ColoredFirst {
    fn compare(&self, l1: &Literal, l2: &Literal) -> Comparison {
        prefer(l1.color != Color::Transparent, l2.color != Color::Transparent)
    }
}

/// Positive equalities rank below everything else
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPositiveEquality;

impl LiteralComparator for NoPositiveEquality {
    fn compare(&self, l1: &Literal, l2: &Literal) -> Comparison {
        prefer(!l1.is_positive_equality(), !l2.is_positive_equality())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Negative;

impl LiteralComparator for Negative {
    fn compare(&self, l1: &Literal, l2: &Literal) -> Comparison {
        prefer(!l1.polarity, !l2.polarity)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NegativeEquality;

impl LiteralComparator for NegativeEquality {
    fn compare(&self, l1: &Literal, l2: &Literal) -> Comparison {
        prefer(l1.is_negative_equality(), l2.is_negative_equality())
    }
}

/// Heavier literals rank higher
#[derive(Debug, Clone, Copy, Default)]
pub struct MaximalSize;

impl LiteralComparator for MaximalSize {
    fn compare(&self, l1: &Literal, l2: &Literal) -> Comparison {
        l1.weight().cmp(&l2.weight())
    }
}

/// Fewer variable occurrences rank higher
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastVariables;

impl LiteralComparator for LeastVariables {
    fn compare(&self, l1: &Literal, l2: &Literal) -> Comparison {
        l2.var_occurrences().cmp(&l1.var_occurrences())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LeastDistinctVariables;

impl LiteralComparator for LeastDistinctVariables {
    fn compare(&self, l1: &Literal, l2: &Literal) -> Comparison {
        l2.distinct_vars().cmp(&l1.distinct_vars())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LeastTopLevelVariables;

impl LiteralComparator for LeastTopLevelVariables {
    fn compare(&self, l1: &Literal, l2: &Literal) -> Comparison {
        l2.top_level_vars().cmp(&l1.top_level_vars())
    }
}

/// Symbol key of a non-variable term; constants sort before functions
fn symbol_key(term: &Term) -> Option<(u8, u32, u8)> {
    match term {
        Term::Variable(_) => None,
        Term::Constant(c) => Some((0, c.id.as_u32(), 0)),
        Term::Function(f, _) => Some((1, f.id.as_u32(), f.arity)),
    }
}

/// Total order on literals: header, then the argument sort tag, then a
/// pre-order walk comparing symbols and variable ids. `Equal` only for
/// identical literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexComparator;

impl LexComparator {
    fn compare_terms(t1: &Term, t2: &Term) -> Comparison {
        match (symbol_key(t1), symbol_key(t2)) {
            (None, None) => t1.as_variable().cmp(&t2.as_variable()),
            (Some(_), None) => Comparison::Greater,
            (None, Some(_)) => Comparison::Less,
            (Some(k1), Some(k2)) if k1 != k2 => k1.cmp(&k2),
            _ => Self::compare_args(t1.args(), t2.args()),
        }
    }

    fn compare_args(a1: &[Term], a2: &[Term]) -> Comparison {
        a1.iter()
            .zip(a2)
            .map(|(s, t)| Self::compare_terms(s, t))
            .find(|c| *c != Comparison::Equal)
            .unwrap_or(Comparison::Equal)
    }
}

impl LiteralComparator for LexComparator {
    fn compare(&self, l1: &Literal, l2: &Literal) -> Comparison {
        l1.header()
            .cmp(&l2.header())
            .then_with(|| l1.sort.cmp(&l2.sort))
            .then_with(|| Self::compare_args(&l1.args, &l2.args))
    }
}

/// Heavier literals rank higher; literals that are variants of each other
/// compare `Equal`.
///
/// After weight, predicate and (unless `IGNORE_POLARITY`) polarity, the two
/// literals are walked in parallel. Variables are numbered by first
/// occurrence in their own literal, so only the variable pattern matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedLinearComparatorByWeight<const IGNORE_POLARITY: bool>;

struct Disagreements {
    first: HashMap<u32, usize>,
    second: HashMap<u32, usize>,
}

impl Disagreements {
    fn number(map: &mut HashMap<u32, usize>, var: u32) -> usize {
        let next = map.len();
        *map.entry(var).or_insert(next)
    }

    fn walk(&mut self, t1: &Term, t2: &Term) -> Comparison {
        match (t1.as_variable(), t2.as_variable()) {
            (Some(v1), Some(v2)) => {
                let n1 = Self::number(&mut self.first, v1.as_u32());
                let n2 = Self::number(&mut self.second, v2.as_u32());
                n2.cmp(&n1)
            }
            (None, Some(_)) => Comparison::Greater,
            (Some(_), None) => Comparison::Less,
            (None, None) => match symbol_key(t1).cmp(&symbol_key(t2)) {
                Comparison::Equal => self.walk_args(t1.args(), t2.args()),
                res => res,
            },
        }
    }

    fn walk_args(&mut self, a1: &[Term], a2: &[Term]) -> Comparison {
        for (s, t) in a1.iter().zip(a2) {
            let res = self.walk(s, t);
            if res != Comparison::Equal {
                return res;
            }
        }
        Comparison::Equal
    }
}

impl<const IGNORE_POLARITY: bool> LiteralComparator for NormalizedLinearComparatorByWeight<IGNORE_POLARITY> {
    fn compare(&self, l1: &Literal, l2: &Literal) -> Comparison {
        let header = l1
            .weight()
            .cmp(&l2.weight())
            .then_with(|| l1.predicate.cmp(&l2.predicate));
        let header = if IGNORE_POLARITY {
            header
        } else {
            header.then_with(|| l1.polarity.cmp(&l2.polarity))
        };
        header.then_with(|| {
            let mut walk = Disagreements {
                first: HashMap::new(),
                second: HashMap::new(),
            };
            walk.walk_args(&l1.args, &l2.args)
        })
    }
}

/// Comparator stack of the `Best` selection policy
pub type DefaultComparator =
    Composite<ColoredFirst, Composite<NegativeEquality, Composite<MaximalSize, Composite<Negative, LexComparator>>>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{Constant, FunctionSymbol, Interner, PredicateSymbol};

    struct TestCtx {
        interner: Interner,
    }

    impl TestCtx {
        fn new() -> Self {
            TestCtx { interner: Interner::new() }
        }

        fn var(&mut self, name: &str) -> Term {
            Term::var(self.interner.intern_variable(name))
        }

        fn const_(&mut self, name: &str) -> Term {
            Term::Constant(Constant::new(self.interner.intern_constant(name)))
        }

        fn func(&mut self, name: &str, args: Vec<Term>) -> Term {
            let id = self.interner.intern_function(name);
            Term::Function(FunctionSymbol::new(id, args.len() as u8), args)
        }

        fn pred(&mut self, name: &str, args: Vec<Term>, polarity: bool) -> Literal {
            let id = self.interner.intern_predicate(name);
            Literal::new(PredicateSymbol::new(id, args.len() as u8), args, polarity)
        }
    }

    #[test]
    fn test_variants_compare_equal() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let y = ctx.var("Y");
        let pxy = ctx.pred("P", vec![x.clone(), y.clone()], true);
        let pyx = ctx.pred("P", vec![y.clone(), x.clone()], true);
        let pxx = ctx.pred("P", vec![x.clone(), x.clone()], true);

        let cmp = NormalizedLinearComparatorByWeight::<false>;
        assert_eq!(cmp.compare(&pxy, &pyx), Comparison::Equal);
        assert_ne!(cmp.compare(&pxx, &pxy), Comparison::Equal);
        assert_eq!(cmp.compare(&pxx, &pxy), cmp.compare(&pxy, &pxx).reverse());
    }

    #[test]
    fn test_normalized_linear_polarity() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let pos = ctx.pred("P", vec![x.clone()], true);
        let neg = ctx.pred("P", vec![x.clone()], false);
        let pa = ctx.pred("P", vec![a], true);

        assert_eq!(NormalizedLinearComparatorByWeight::<true>.compare(&pos, &neg), Comparison::Equal);
        assert_eq!(NormalizedLinearComparatorByWeight::<false>.compare(&pos, &neg), Comparison::Greater);
        // A symbol beats a variable at the first disagreement
        assert_eq!(NormalizedLinearComparatorByWeight::<false>.compare(&pa, &pos), Comparison::Greater);
    }

    #[test]
    fn test_primitive_comparators() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let fx = ctx.func("f", vec![x.clone()]);
        let heavy = ctx.pred("P", vec![fx.clone()], true);
        let light = ctx.pred("P", vec![a.clone()], false);
        let eq = Literal::equality(x.clone(), a.clone(), true);
        let neq = Literal::equality(x.clone(), a.clone(), false);

        assert_eq!(MaximalSize.compare(&heavy, &light), Comparison::Greater);
        assert_eq!(Inverse(MaximalSize).compare(&heavy, &light), Comparison::Less);
        assert_eq!(Negative.compare(&light, &heavy), Comparison::Greater);
        assert_eq!(NoPositiveEquality.compare(&eq, &heavy), Comparison::Less);
        assert_eq!(NegativeEquality.compare(&neq, &light), Comparison::Greater);
        assert_eq!(LeastVariables.compare(&light, &heavy), Comparison::Greater);
        assert_eq!(LeastDistinctVariables.compare(&heavy, &eq), Comparison::Equal);
        assert_eq!(LeastTopLevelVariables.compare(&heavy, &eq), Comparison::Greater);

        let colored = light.clone().with_color(Color::Left);
        assert_eq!(ColoredFirst.compare(&colored, &heavy), Comparison::Greater);
    }

    #[test]
    fn test_composite_defers_on_equal() {
        let mut ctx = TestCtx::new();
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let fa = ctx.func("f", vec![a.clone()]);
        let npa = ctx.pred("P", vec![fa], false);
        let nqb = ctx.pred("Q", vec![b], false);

        // Both negative: Negative has no preference, MaximalSize decides
        let cmp = Composite(Negative, MaximalSize);
        assert_eq!(cmp.compare(&npa, &nqb), Comparison::Greater);
        assert_eq!(Composite(Negative, Negative).compare(&npa, &nqb), Comparison::Equal);
    }

    #[test]
    fn test_lex_is_total_and_antisymmetric() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let fx = ctx.func("f", vec![x.clone()]);
        let fa = ctx.func("f", vec![a.clone()]);
        let literals = vec![
            ctx.pred("P", vec![fx.clone()], true),
            ctx.pred("P", vec![fa.clone()], true),
            ctx.pred("P", vec![x.clone()], true),
            ctx.pred("P", vec![fx.clone()], false),
            ctx.pred("Q", vec![a.clone()], true),
        ];
        for (i, l1) in literals.iter().enumerate() {
            for (j, l2) in literals.iter().enumerate() {
                let res = LexComparator.compare(l1, l2);
                assert_eq!(res == Comparison::Equal, i == j);
                assert_eq!(res, LexComparator.compare(l2, l1).reverse());
            }
        }
        let stack = DefaultComparator::default();
        assert_eq!(stack.compare(&literals[3], &literals[0]), Comparison::Greater);
    }
}

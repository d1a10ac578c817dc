//! Literal-level index.
//!
//! Literals are grouped by header (predicate and polarity); within a group
//! the argument list is indexed as one `$tuple(...)` term in a
//! discrimination tree. `complementary` queries look up the group of the
//! opposite polarity, which is what resolution needs.

use super::{DiscriminationTree, IndexingStructure, LiteralLeafData, QueryIter, QueryResult};
use crate::logic::{FunctionId, FunctionSymbol, Literal, PredicateId, Term};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct LiteralIndex {
    trees: BTreeMap<(PredicateId, bool), DiscriminationTree<LiteralLeafData>>,
}

/// The arguments of a literal as a single term
pub fn atom_term(literal: &Literal) -> Term {
    Term::Function(
        FunctionSymbol::new(FunctionId::TUPLE, literal.args.len() as u8),
        literal.args.clone(),
    )
}

impl LiteralIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (`insert` true) or remove literal `index` of clause `clause`
    pub fn handle(&mut self, literal: &Literal, index: usize, clause: usize, insert: bool) {
        let key = literal.header();
        let data = LiteralLeafData {
            literal: literal.clone(),
            index,
            clause,
        };
        if insert {
            self.trees.entry(key).or_default().insert(atom_term(literal), data);
        } else {
            let tree = match self.trees.get_mut(&key) {
                Some(tree) => tree,
                None => panic!("removing a literal whose header was never indexed: {:?}", literal),
            };
            tree.remove(&atom_term(literal), &data);
            if tree.is_empty() {
                self.trees.remove(&key);
            }
        }
    }

    fn tree(&self, literal: &Literal, complementary: bool) -> Option<&DiscriminationTree<LiteralLeafData>> {
        let (predicate, polarity) = literal.header();
        self.trees.get(&(predicate, polarity != complementary))
    }

    fn query<'a>(
        &'a self,
        literal: &Literal,
        complementary: bool,
        retrieve: impl FnOnce(&'a DiscriminationTree<LiteralLeafData>, &Term) -> QueryIter<'a, LiteralLeafData>,
    ) -> QueryIter<'a, LiteralLeafData> {
        match self.tree(literal, complementary) {
            Some(tree) => retrieve(tree, &atom_term(literal)),
            None => Box::new(std::iter::empty::<QueryResult<'a, LiteralLeafData>>()),
        }
    }

    pub fn get_unifications<'a>(
        &'a self,
        literal: &Literal,
        complementary: bool,
        retrieve_substitutions: bool,
    ) -> QueryIter<'a, LiteralLeafData> {
        self.query(literal, complementary, |tree, atom| {
            tree.get_unifications(atom, retrieve_substitutions)
        })
    }

    pub fn get_generalizations<'a>(
        &'a self,
        literal: &Literal,
        complementary: bool,
        retrieve_substitutions: bool,
    ) -> QueryIter<'a, LiteralLeafData> {
        self.query(literal, complementary, |tree, atom| {
            tree.get_generalizations(atom, retrieve_substitutions)
        })
    }

    pub fn get_instances<'a>(
        &'a self,
        literal: &Literal,
        complementary: bool,
        retrieve_substitutions: bool,
    ) -> QueryIter<'a, LiteralLeafData> {
        self.query(literal, complementary, |tree, atom| {
            tree.get_instances(atom, retrieve_substitutions)
        })
    }

    pub fn get_variants<'a>(
        &'a self,
        literal: &Literal,
        complementary: bool,
        retrieve_substitutions: bool,
    ) -> QueryIter<'a, LiteralLeafData> {
        self.query(literal, complementary, |tree, atom| {
            tree.get_variants(atom, retrieve_substitutions)
        })
    }

    pub fn len(&self) -> usize {
        self.trees.values().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{Constant, Interner, PredicateSymbol};

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

        fn pred(&mut self, name: &str, args: Vec<Term>, polarity: bool) -> Literal {
            let id = self.interner.intern_predicate(name);
            Literal::new(PredicateSymbol::new(id, args.len() as u8), args, polarity)
        }
    }

    #[test]
    fn test_complementary_unifications() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let px = ctx.pred("P", vec![x.clone()], true);
        let pb = ctx.pred("P", vec![b.clone()], true);
        let npa = ctx.pred("P", vec![a.clone()], false);
        let qa = ctx.pred("Q", vec![a.clone()], true);

        let mut index = LiteralIndex::new();
        index.handle(&px, 0, 10, true);
        index.handle(&pb, 0, 11, true);
        index.handle(&qa, 0, 12, true);

        let partners: Vec<usize> = index
            .get_unifications(&npa, true, true)
            .map(|r| r.data.clause)
            .collect();
        assert_eq!(partners, vec![10]);

        assert_eq!(index.get_unifications(&npa, false, false).count(), 0);
    }

    #[test]
    fn test_generalizations_and_removal() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let px = ctx.pred("P", vec![x.clone()], true);
        let pa = ctx.pred("P", vec![a.clone()], true);

        let mut index = LiteralIndex::new();
        index.handle(&px, 1, 3, true);
        assert_eq!(index.get_generalizations(&pa, false, false).count(), 1);
        assert_eq!(index.get_instances(&pa, false, false).count(), 0);
        assert_eq!(index.get_variants(&px, false, false).count(), 1);

        index.handle(&px, 1, 3, false);
        assert!(index.is_empty());
    }
}

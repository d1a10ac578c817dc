//! Discrimination tree over arbitrary leaf data.
//!
//! Stored terms are flattened in preorder with variables as Star. The trie
//! walk for each retrieval mode is a sound over-approximation (it ignores
//! repeated variables); the exact check happens in the returned iterator.

use super::disc_tree::{self, DiscTreeNode, FlatKey};
use super::{Candidates, Entry, IndexingStructure, LeafData, QueryIter, RetrievalMode};
use crate::logic::Term;

#[derive(Debug)]
pub struct DiscriminationTree<D> {
    root: DiscTreeNode<Entry<D>>,
    len: usize,
}

impl<D> Default for DiscriminationTree<D> {
    fn default() -> Self {
        DiscriminationTree {
            root: DiscTreeNode::default(),
            len: 0,
        }
    }
}

impl<D: LeafData> DiscriminationTree<D> {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert_keys(term: &Term) -> Vec<FlatKey> {
        let mut keys = Vec::new();
        disc_tree::flatten_insert(term, &mut keys);
        keys
    }

    /// Structurally compatible entries for `mode`, in trie order
    fn candidates(&self, query: &Term, mode: RetrievalMode) -> Vec<&Entry<D>> {
        let mut results = Vec::new();
        match mode {
            RetrievalMode::Generalizations => {
                let mut keys = Vec::new();
                disc_tree::flatten_query_vars_concrete(query, &mut keys);
                disc_tree::retrieve_generalizations(&self.root, &keys, 0, &mut results);
            }
            RetrievalMode::Instances => {
                disc_tree::retrieve_instances(&self.root, &Self::insert_keys(query), 0, false, &mut results);
            }
            RetrievalMode::Unifications => {
                disc_tree::retrieve_instances(&self.root, &Self::insert_keys(query), 0, true, &mut results);
            }
            RetrievalMode::Variants => {
                results.extend(disc_tree::retrieve_exact(&self.root, &Self::insert_keys(query)));
            }
        }
        results
    }

    fn query<'a>(&'a self, query: &Term, mode: RetrievalMode, retrieve_substitutions: bool) -> QueryIter<'a, D> {
        let candidates = self.candidates(query, mode);
        Box::new(Candidates::new(candidates, query, mode, retrieve_substitutions))
    }

    /// Every stored entry, in trie order
    pub fn entries(&self) -> Vec<(&Term, &D)> {
        fn walk<'a, D>(node: &'a DiscTreeNode<Entry<D>>, out: &mut Vec<(&'a Term, &'a D)>) {
            out.extend(node.entries.iter().map(|e| (&e.term, &e.data)));
            for child in node.children.values() {
                walk(child, out);
            }
        }
        let mut out = Vec::with_capacity(self.len);
        walk(&self.root, &mut out);
        out
    }
}

impl<D: LeafData> IndexingStructure<D> for DiscriminationTree<D> {
    fn insert(&mut self, term: Term, data: D) {
        let keys = Self::insert_keys(&term);
        disc_tree::trie_insert(&mut self.root, &keys, Entry { term, data });
        self.len += 1;
    }

    fn remove(&mut self, term: &Term, data: &D) {
        let keys = Self::insert_keys(term);
        let removed = disc_tree::trie_remove(&mut self.root, &keys, &|e: &Entry<D>| {
            e.term == *term && e.data == *data
        });
        assert!(removed.is_some(), "removing an entry that is not in the index: {:?}", data);
        self.len -= 1;
    }

    fn get_unifications<'a>(&'a self, query: &Term, retrieve_substitutions: bool) -> QueryIter<'a, D> {
        self.query(query, RetrievalMode::Unifications, retrieve_substitutions)
    }

    fn get_generalizations<'a>(&'a self, query: &Term, retrieve_substitutions: bool) -> QueryIter<'a, D> {
        self.query(query, RetrievalMode::Generalizations, retrieve_substitutions)
    }

    fn get_instances<'a>(&'a self, query: &Term, retrieve_substitutions: bool) -> QueryIter<'a, D> {
        self.query(query, RetrievalMode::Instances, retrieve_substitutions)
    }

    fn get_variants<'a>(&'a self, query: &Term, retrieve_substitutions: bool) -> QueryIter<'a, D> {
        self.query(query, RetrievalMode::Variants, retrieve_substitutions)
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{Constant, FunctionSymbol, Interner, VarRenaming, QUERY, RESULT};

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
    }

    fn data_of<'a>(it: QueryIter<'a, u32>) -> Vec<u32> {
        it.map(|r| *r.data).collect()
    }

    #[test]
    fn test_nonlinear_pattern_filtered_lazily() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let fxx = ctx.func("f", vec![x.clone(), x.clone()]);
        let fab = ctx.func("f", vec![a.clone(), b.clone()]);
        let faa = ctx.func("f", vec![a.clone(), a.clone()]);

        let mut tree = DiscriminationTree::new();
        tree.insert(fxx, 1u32);

        assert_eq!(data_of(tree.get_generalizations(&faa, false)), vec![1]);
        // The trie accepts f(a, b) structurally; the match check rejects it
        assert_eq!(tree.candidates(&fab, RetrievalMode::Generalizations).len(), 1);
        assert!(data_of(tree.get_generalizations(&fab, false)).is_empty());
    }

    #[test]
    fn test_all_retrieval_modes() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let y = ctx.var("Y");
        let a = ctx.const_("a");
        let fx = ctx.func("f", vec![x.clone()]);
        let fa = ctx.func("f", vec![a.clone()]);
        let fy = ctx.func("f", vec![y.clone()]);
        let gx = ctx.func("g", vec![x.clone()]);

        let mut tree = DiscriminationTree::new();
        tree.insert(fx.clone(), 1u32);
        tree.insert(fa.clone(), 2);
        tree.insert(gx, 3);
        tree.insert(x.clone(), 4);

        let mut unif = data_of(tree.get_unifications(&fy, false));
        unif.sort();
        assert_eq!(unif, vec![1, 2, 4]);

        let mut gen = data_of(tree.get_generalizations(&fa, false));
        gen.sort();
        assert_eq!(gen, vec![1, 2, 4]);

        let mut inst = data_of(tree.get_instances(&fy, false));
        inst.sort();
        assert_eq!(inst, vec![1, 2]);

        assert_eq!(data_of(tree.get_variants(&fy, false)), vec![1]);
    }

    #[test]
    fn test_generalization_substitution() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let fx = ctx.func("f", vec![x.clone()]);
        let ga = ctx.func("g", vec![a.clone()]);
        let fga = ctx.func("f", vec![ga.clone()]);

        let mut tree = DiscriminationTree::new();
        tree.insert(fx, 1u32);

        let result = tree.get_generalizations(&fga, true).next().expect("one generalization");
        let subst = result.substitution.expect("substitution requested");
        let mut renaming = VarRenaming::keeping(QUERY, 10);
        assert_eq!(subst.apply(&x, RESULT, &mut renaming), ga);
    }

    #[test]
    fn test_remove() {
        let mut ctx = TestCtx::new();
        let a = ctx.const_("a");
        let fa = ctx.func("f", vec![a.clone()]);

        let mut tree = DiscriminationTree::new();
        tree.insert(fa.clone(), 1u32);
        tree.insert(fa.clone(), 2);
        tree.remove(&fa, &1);
        assert_eq!(tree.len(), 1);
        assert_eq!(data_of(tree.get_variants(&fa, false)), vec![2]);
        tree.remove(&fa, &2);
        assert!(tree.is_empty());
        assert!(tree.entries().is_empty());
    }

    #[test]
    #[should_panic(expected = "not in the index")]
    fn test_remove_absent_panics() {
        let mut ctx = TestCtx::new();
        let a = ctx.const_("a");
        let mut tree: DiscriminationTree<u32> = DiscriminationTree::new();
        tree.remove(&a, &1);
    }
}

//! Discrimination tree primitives.
//!
//! Terms are flattened into preorder key sequences; a trie over these
//! sequences filters candidates structurally for every retrieval mode.
//! Children live in a `BTreeMap`, so traversal order depends only on the
//! trie contents.

use crate::logic::{ConstantId, FunctionId, Term, VariableId};
use std::collections::BTreeMap;

/// Key of a single position in the flattened preorder traversal of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlatKey {
    /// Function symbol with arity (arity needed for skip counts during Star traversal)
    Func(FunctionId, u8),
    Const(ConstantId),
    /// Variable of an indexed term, or of a query whose variables may be bound
    Star,
    /// Variable of a query that must not be bound (only Star matches it)
    Var(VariableId),
}

/// A node in a discrimination tree trie.
#[derive(Debug)]
pub struct DiscTreeNode<E> {
    pub children: BTreeMap<FlatKey, DiscTreeNode<E>>,
    /// Entries whose key path ends here
    pub entries: Vec<E>,
}

impl<E> Default for DiscTreeNode<E> {
    fn default() -> Self {
        DiscTreeNode {
            children: BTreeMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<E> DiscTreeNode<E> {
    fn is_empty(&self) -> bool {
        self.children.is_empty() && self.entries.is_empty()
    }
}

/// Flatten a term for insertion: preorder traversal, variables become Star.
pub fn flatten_insert(term: &Term, keys: &mut Vec<FlatKey>) {
    match term {
        Term::Variable(_) => keys.push(FlatKey::Star),
        Term::Constant(c) => keys.push(FlatKey::Const(c.id)),
        Term::Function(f, args) => {
            keys.push(FlatKey::Func(f.id, f.arity));
            for arg in args {
                flatten_insert(arg, keys);
            }
        }
    }
}

/// Flatten a term for generalization queries: variables become Var(id).
pub fn flatten_query_vars_concrete(term: &Term, keys: &mut Vec<FlatKey>) {
    match term {
        Term::Variable(v) => keys.push(FlatKey::Var(v.id)),
        Term::Constant(c) => keys.push(FlatKey::Const(c.id)),
        Term::Function(f, args) => {
            keys.push(FlatKey::Func(f.id, f.arity));
            for arg in args {
                flatten_query_vars_concrete(arg, keys);
            }
        }
    }
}

/// Count the number of flat keys a subterm occupies starting at `pos`.
pub fn subterm_size(keys: &[FlatKey], pos: usize) -> usize {
    if pos >= keys.len() {
        return 0;
    }
    match keys[pos] {
        FlatKey::Star | FlatKey::Const(_) | FlatKey::Var(_) => 1,
        FlatKey::Func(_, arity) => {
            let mut size = 1;
            for _ in 0..arity {
                size += subterm_size(keys, pos + size);
            }
            size
        }
    }
}

/// Insert an entry into a trie node following the given key path.
pub fn trie_insert<E>(node: &mut DiscTreeNode<E>, keys: &[FlatKey], entry: E) {
    let mut current = node;
    for &key in keys {
        current = current.children.entry(key).or_default();
    }
    current.entries.push(entry);
}

/// Remove the first entry on the key path satisfying `matches`, pruning
/// nodes left empty. Returns the removed entry.
pub fn trie_remove<E>(
    node: &mut DiscTreeNode<E>,
    keys: &[FlatKey],
    matches: &dyn Fn(&E) -> bool,
) -> Option<E> {
    match keys.split_first() {
        None => {
            let pos = node.entries.iter().position(matches)?;
            Some(node.entries.remove(pos))
        }
        Some((key, rest)) => {
            let child = node.children.get_mut(key)?;
            let removed = trie_remove(child, rest, matches);
            if child.is_empty() {
                node.children.remove(key);
            }
            removed
        }
    }
}

/// Entries whose stored term is MORE GENERAL than the query.
///
/// The query must be flattened with `flatten_query_vars_concrete`: a trie
/// Star matches any query subterm, a query Var only a trie Star.
pub fn retrieve_generalizations<'a, E>(
    node: &'a DiscTreeNode<E>,
    query: &[FlatKey],
    pos: usize,
    results: &mut Vec<&'a E>,
) {
    if pos == query.len() {
        results.extend(node.entries.iter());
        return;
    }
    let key = query[pos];
    if key != FlatKey::Star {
        if let Some(child) = node.children.get(&key) {
            retrieve_generalizations(child, query, pos + 1, results);
        }
    }
    if let Some(star_child) = node.children.get(&FlatKey::Star) {
        let skip = subterm_size(query, pos);
        retrieve_generalizations(star_child, query, pos + skip, results);
    }
}

/// Entries whose stored term is an instance of the query (`allow_trie_star`
/// false) or unifiable with it (`allow_trie_star` true).
///
/// The query must be flattened with `flatten_insert`: a query Star follows
/// every complete trie subterm. A trie Star opposite a concrete query
/// subterm is followed only for unification.
pub fn retrieve_instances<'a, E>(
    node: &'a DiscTreeNode<E>,
    query: &[FlatKey],
    pos: usize,
    allow_trie_star: bool,
    results: &mut Vec<&'a E>,
) {
    if pos == query.len() {
        results.extend(node.entries.iter());
        return;
    }
    match query[pos] {
        FlatKey::Star => {
            for (key, child) in &node.children {
                match key {
                    FlatKey::Const(_) | FlatKey::Star => {
                        retrieve_instances(child, query, pos + 1, allow_trie_star, results);
                    }
                    FlatKey::Func(_, arity) => skip_trie_args_and_continue(
                        child,
                        *arity as usize,
                        query,
                        pos + 1,
                        allow_trie_star,
                        results,
                    ),
                    FlatKey::Var(_) => {}
                }
            }
        }
        key @ (FlatKey::Const(_) | FlatKey::Func(_, _)) => {
            if let Some(child) = node.children.get(&key) {
                retrieve_instances(child, query, pos + 1, allow_trie_star, results);
            }
            if allow_trie_star {
                if let Some(star_child) = node.children.get(&FlatKey::Star) {
                    let skip = subterm_size(query, pos);
                    retrieve_instances(star_child, query, pos + skip, allow_trie_star, results);
                }
            }
        }
        FlatKey::Var(_) => {}
    }
}

/// When a query Star meets Func(f, n) in the trie, walk every trie path
/// forming a complete n-ary subterm, then resume matching the query.
fn skip_trie_args_and_continue<'a, E>(
    node: &'a DiscTreeNode<E>,
    remaining_args: usize,
    query: &[FlatKey],
    qpos: usize,
    allow_trie_star: bool,
    results: &mut Vec<&'a E>,
) {
    if remaining_args == 0 {
        retrieve_instances(node, query, qpos, allow_trie_star, results);
        return;
    }
    for (key, child) in &node.children {
        let remaining = match key {
            FlatKey::Const(_) | FlatKey::Star => remaining_args - 1,
            FlatKey::Func(_, arity) => remaining_args - 1 + *arity as usize,
            FlatKey::Var(_) => continue,
        };
        skip_trie_args_and_continue(child, remaining, query, qpos, allow_trie_star, results);
    }
}

/// Entries stored under exactly the query's key path (variables as Star).
pub fn retrieve_exact<'a, E>(node: &'a DiscTreeNode<E>, query: &[FlatKey]) -> &'a [E] {
    let mut current = node;
    for key in query {
        match current.children.get(key) {
            Some(child) => current = child,
            None => return &[],
        }
    }
    &current.entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{Constant, FunctionSymbol, Interner};

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

    fn insert_keys(term: &Term) -> Vec<FlatKey> {
        let mut keys = Vec::new();
        flatten_insert(term, &mut keys);
        keys
    }

    fn concrete_keys(term: &Term) -> Vec<FlatKey> {
        let mut keys = Vec::new();
        flatten_query_vars_concrete(term, &mut keys);
        keys
    }

    fn sorted(mut v: Vec<&usize>) -> Vec<usize> {
        v.sort();
        v.into_iter().copied().collect()
    }

    #[test]
    fn test_flatten_insert_function() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let t = ctx.func("f", vec![x, a]);
        let keys = insert_keys(&t);
        assert_eq!(keys.len(), 3);
        assert!(matches!(keys[0], FlatKey::Func(_, 2)));
        assert_eq!(keys[1], FlatKey::Star);
        assert!(matches!(keys[2], FlatKey::Const(_)));
    }

    #[test]
    fn test_subterm_size_nested() {
        let mut ctx = TestCtx::new();
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let ga = ctx.func("g", vec![a]);
        let t = ctx.func("f", vec![ga, b]);
        let keys = insert_keys(&t);
        assert_eq!(subterm_size(&keys, 0), 4);
        assert_eq!(subterm_size(&keys, 1), 2);
        assert_eq!(subterm_size(&keys, 3), 1);
    }

    #[test]
    fn test_generalizations() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let y = ctx.var("Y");
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let fxa = ctx.func("f", vec![x.clone(), a.clone()]);
        let fab = ctx.func("f", vec![a.clone(), b.clone()]);
        let faa = ctx.func("f", vec![a.clone(), a.clone()]);
        let fya = ctx.func("f", vec![y.clone(), a.clone()]);

        let mut root = DiscTreeNode::default();
        trie_insert(&mut root, &insert_keys(&fxa), 0usize);
        trie_insert(&mut root, &insert_keys(&fab), 1);
        trie_insert(&mut root, &insert_keys(&x), 2);

        let mut results = Vec::new();
        retrieve_generalizations(&root, &concrete_keys(&faa), 0, &mut results);
        assert_eq!(sorted(results), vec![0, 2]);

        // A query variable is matched only by stored variables
        let mut results = Vec::new();
        retrieve_generalizations(&root, &concrete_keys(&fya), 0, &mut results);
        assert_eq!(sorted(results), vec![0, 2]);
    }

    #[test]
    fn test_instances_and_unifications() {
        let mut ctx = TestCtx::new();
        let x = ctx.var("X");
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let ga = ctx.func("g", vec![a.clone()]);
        let fga_b = ctx.func("f", vec![ga.clone(), b.clone()]);
        let fxb = ctx.func("f", vec![x.clone(), b.clone()]);
        let fab = ctx.func("f", vec![a.clone(), b.clone()]);
        let query = ctx.func("f", vec![ga.clone(), x.clone()]);

        let mut root = DiscTreeNode::default();
        trie_insert(&mut root, &insert_keys(&fga_b), 0usize);
        trie_insert(&mut root, &insert_keys(&fxb), 1);
        trie_insert(&mut root, &insert_keys(&fab), 2);

        let mut instances = Vec::new();
        retrieve_instances(&root, &insert_keys(&query), 0, false, &mut instances);
        assert_eq!(sorted(instances), vec![0]);

        let mut unifiers = Vec::new();
        retrieve_instances(&root, &insert_keys(&query), 0, true, &mut unifiers);
        assert_eq!(sorted(unifiers), vec![0, 1]);
    }

    #[test]
    fn test_remove_prunes_empty_nodes() {
        let mut ctx = TestCtx::new();
        let a = ctx.const_("a");
        let fa = ctx.func("f", vec![a.clone()]);

        let mut root = DiscTreeNode::default();
        let keys = insert_keys(&fa);
        trie_insert(&mut root, &keys, 7usize);
        assert_eq!(retrieve_exact(&root, &keys), &[7]);

        assert_eq!(trie_remove(&mut root, &keys, &|e| *e == 7), Some(7));
        assert!(root.children.is_empty());
        assert_eq!(trie_remove(&mut root, &keys, &|e| *e == 7), None);
    }
}

//! Symbol interning and the sort signature
//!
//! Interned IDs replace string symbol names throughout the prover, giving
//! O(1) comparison and hashing. Each symbol kind has its own ID type:
//! - `VariableId` for variables
//! - `ConstantId` for constants (sort constructors such as `$i` included)
//! - `FunctionId` for function symbols
//! - `PredicateId` for predicate symbols
//!
//! The interner doubles as the signature: it records argument and result
//! sorts of every symbol. Symbols without a declaration live in `$i`.

use crate::logic::term::{Constant, Term};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// ID for a variable
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub(crate) u32);

/// ID for an interned constant name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstantId(pub(crate) u32);

/// ID for an interned function symbol name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub(crate) u32);

/// ID for an interned predicate symbol name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredicateId(pub(crate) u32);

impl VariableId {
    pub fn new(raw: u32) -> Self {
        VariableId(raw)
    }

    /// Get the raw ID value (for debugging/serialization)
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl ConstantId {
    /// The default sort `$i`, interned first by every interner
    pub const DEFAULT_SORT: ConstantId = ConstantId(0);

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl FunctionId {
    /// Tuple constructor used to index literal atoms as single terms
    pub const TUPLE: FunctionId = FunctionId(0);

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl PredicateId {
    /// The equality predicate `=`
    pub const EQUALITY: PredicateId = PredicateId(0);
    /// The answer predicate `$answer`
    pub const ANSWER: PredicateId = PredicateId(1);

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Internal string arena for a single symbol type
#[derive(Debug, Clone, Default)]
struct StringArena {
    strings: Vec<String>,
    lookup: HashMap<String, u32>,
}

impl StringArena {
    /// Intern a string, returning its ID (get-or-create)
    fn intern(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.lookup.get(name) {
            return id;
        }
        let id = self.strings.len() as u32;
        self.strings.push(name.to_string());
        self.lookup.insert(name.to_string(), id);
        id
    }

    fn resolve(&self, id: u32) -> Option<&str> {
        self.strings.get(id as usize).map(String::as_str)
    }

    fn get(&self, name: &str) -> Option<u32> {
        self.lookup.get(name).copied()
    }

    fn len(&self) -> usize {
        self.strings.len()
    }
}

/// Argument and result sorts of a function symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub args: Vec<Term>,
    pub result: Term,
}

/// Symbol interner and sort signature
///
/// Passed through the problem context rather than kept in global state.
#[derive(Debug, Clone)]
pub struct Interner {
    variables: StringArena,
    constants: StringArena,
    functions: StringArena,
    predicates: StringArena,
    constant_sorts: HashMap<ConstantId, Term>,
    function_types: HashMap<FunctionId, FunctionType>,
    predicate_types: HashMap<PredicateId, Vec<Term>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Create an interner holding only the reserved symbols
    pub fn new() -> Self {
        let mut interner = Interner {
            variables: StringArena::default(),
            constants: StringArena::default(),
            functions: StringArena::default(),
            predicates: StringArena::default(),
            constant_sorts: HashMap::new(),
            function_types: HashMap::new(),
            predicate_types: HashMap::new(),
        };
        let eq = interner.intern_predicate("=");
        let answer = interner.intern_predicate("$answer");
        let sort = interner.intern_constant("$i");
        let tuple = interner.intern_function("$tuple");
        debug_assert_eq!(eq, PredicateId::EQUALITY);
        debug_assert_eq!(answer, PredicateId::ANSWER);
        debug_assert_eq!(sort, ConstantId::DEFAULT_SORT);
        debug_assert_eq!(tuple, FunctionId::TUPLE);
        interner
    }

    // === Variables ===

    /// Intern a variable name, returning its ID (get-or-create)
    pub fn intern_variable(&mut self, name: &str) -> VariableId {
        VariableId(self.variables.intern(name))
    }

    /// Name of a variable. Variables created during inference have no
    /// interned name and print as `X<id>`.
    pub fn variable_name(&self, id: VariableId) -> String {
        match self.variables.resolve(id.0) {
            Some(name) => name.to_string(),
            None => format!("X{}", id.0),
        }
    }

    pub fn get_variable(&self, name: &str) -> Option<VariableId> {
        self.variables.get(name).map(VariableId)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    // === Constants ===

    pub fn intern_constant(&mut self, name: &str) -> ConstantId {
        ConstantId(self.constants.intern(name))
    }

    pub fn resolve_constant(&self, id: ConstantId) -> &str {
        self.constants.resolve(id.0).unwrap_or("?")
    }

    pub fn get_constant(&self, name: &str) -> Option<ConstantId> {
        self.constants.get(name).map(ConstantId)
    }

    pub fn constant_count(&self) -> usize {
        self.constants.len()
    }

    // === Functions ===

    pub fn intern_function(&mut self, name: &str) -> FunctionId {
        FunctionId(self.functions.intern(name))
    }

    pub fn resolve_function(&self, id: FunctionId) -> &str {
        self.functions.resolve(id.0).unwrap_or("?")
    }

    pub fn get_function(&self, name: &str) -> Option<FunctionId> {
        self.functions.get(name).map(FunctionId)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    // === Predicates ===

    pub fn intern_predicate(&mut self, name: &str) -> PredicateId {
        PredicateId(self.predicates.intern(name))
    }

    pub fn resolve_predicate(&self, id: PredicateId) -> &str {
        self.predicates.resolve(id.0).unwrap_or("?")
    }

    pub fn get_predicate(&self, name: &str) -> Option<PredicateId> {
        self.predicates.get(name).map(PredicateId)
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    // === Signature ===

    /// Declare the sort of a constant
    pub fn declare_constant_sort(&mut self, id: ConstantId, sort: Term) {
        self.constant_sorts.insert(id, sort);
    }

    /// Declare argument and result sorts of a function symbol
    pub fn declare_function_type(&mut self, id: FunctionId, args: Vec<Term>, result: Term) {
        self.function_types.insert(id, FunctionType { args, result });
    }

    /// Declare the argument sorts of a predicate
    pub fn declare_predicate_type(&mut self, id: PredicateId, args: Vec<Term>) {
        self.predicate_types.insert(id, args);
    }

    pub fn function_type(&self, id: FunctionId) -> Option<&FunctionType> {
        self.function_types.get(&id)
    }

    /// Sort of argument `index` of a predicate
    pub fn predicate_arg_sort(&self, id: PredicateId, index: usize) -> Term {
        self.predicate_types
            .get(&id)
            .and_then(|args| args.get(index).cloned())
            .unwrap_or_else(Term::default_sort)
    }

    /// Result sort of a non-variable term; `None` for variables
    pub fn result_sort(&self, term: &Term) -> Option<Term> {
        match term {
            Term::Variable(_) => None,
            Term::Constant(c) => Some(
                self.constant_sorts
                    .get(&c.id)
                    .cloned()
                    .unwrap_or_else(Term::default_sort),
            ),
            Term::Function(f, _) => Some(
                self.function_types
                    .get(&f.id)
                    .map(|ty| ty.result.clone())
                    .unwrap_or_else(Term::default_sort),
            ),
        }
    }

    /// Total number of interned symbols
    pub fn total_symbols(&self) -> usize {
        self.variable_count() + self.constant_count() + self.function_count() + self.predicate_count()
    }
}

impl Term {
    /// The default sort `$i`
    pub fn default_sort() -> Term {
        Term::Constant(Constant::new(ConstantId::DEFAULT_SORT))
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

impl fmt::Display for ConstantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

impl fmt::Display for PredicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

// IDs serialize as bare u32; names are resolved in the proof export.
macro_rules! id_serde {
    ($($ty:ident),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    self.0.serialize(serializer)
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    u32::deserialize(deserializer).map($ty)
                }
            }
        )*
    };
}

id_serde!(VariableId, ConstantId, FunctionId, PredicateId);

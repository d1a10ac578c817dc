//! The given-clause saturation loop
//!
//! Every stored clause lives in exactly one of four stores:
//!
//! - **Unprocessed**: freshly stored clauses, awaiting immediate simplification
//! - **Passive**: survivors of immediate simplification, awaiting selection
//! - **Active**: clauses that have been given, visible to the indexes
//! - **Deleted**: clauses found redundant; they stay in the arena for proofs
//!
//! One iteration of [`SaturationAlgorithm::step`]:
//!
//! 1. Drain Unprocessed through the immediate simplifiers into Passive.
//!    An empty clause ends the run with a refutation.
//! 2. Pick the given clause from Passive by the age/weight ratio. An empty
//!    Passive means the clause set is saturated.
//! 3. Forward simplify the given clause against Active. A simplified clause
//!    is deleted and its replacement (if any) goes to Unprocessed.
//! 4. Select literals, then move the given clause into Active and the indexes.
//! 5. Backward simplify Active with the given clause. Simplified clauses leave
//!    Active and every index before their replacements are queued.
//! 6. Run the generating engines and queue their conclusions.
//!
//! Resource budgets are checked once per iteration, after step 6.

use super::containers::{ActiveContainer, ClauseStore, PassiveContainer, StoreTags, UnprocessedContainer};
use super::limits::{Budget, CancellationToken, ResourceLimit};
use super::statistics::Statistics;
use crate::config::{Demodulation, ProverConfig};
use crate::error::{ProverError, Result};
use crate::index::IndexManager;
use crate::inference::{
    BackwardDemodulation, BackwardSimplifier, BackwardSubsumption, DuplicateClauseDeletion,
    DuplicateLiteralRemoval, EngineContext, EqualityFactoring, EqualityResolution, Factoring,
    ForwardDemodulation, ForwardOutcome, ForwardSimplifier, ForwardSubsumption, GeneratingEngine,
    ImmediateOutcome, ImmediateSimplifier, Resolution, Superposition, TautologyDeletion,
};
use crate::logic::{
    orient_equalities, Clause, FunctionId, InferenceRule, Interner, KBOConfig, PredicateId, Term,
    TermOrdering, KBO,
};
use crate::proof::Proof;
use crate::selection::{selector_for, LiteralSelector};
use log::{debug, info, trace};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// How a saturation run ended
#[derive(Debug, Clone, PartialEq)]
pub enum SaturationResult {
    /// The empty clause was derived
    Refutation(Proof),
    /// Passive ran dry: the clause set is saturated
    Satisfiable,
    ResourceOut(ResourceLimit),
}

pub struct SaturationAlgorithm {
    config: ProverConfig,
    interner: Arc<Interner>,
    ordering: Arc<dyn TermOrdering>,
    selector: Box<dyn LiteralSelector>,

    /// Every clause ever stored, indexed by id
    clauses: Vec<Arc<Clause>>,
    stores: StoreTags,
    unprocessed: UnprocessedContainer,
    passive: PassiveContainer,
    active: ActiveContainer,
    indexes: IndexManager,

    immediate: Vec<Box<dyn ImmediateSimplifier>>,
    forward: Vec<Box<dyn ForwardSimplifier>>,
    backward: Vec<Box<dyn BackwardSimplifier>>,
    generating: Vec<Box<dyn GeneratingEngine>>,

    budget: Budget,
    cancel: CancellationToken,
    iterations: usize,
    stats: Statistics,
    /// Set by the first empty clause stored outside Unprocessed processing
    refutation: Option<usize>,
    result: Option<SaturationResult>,
}

impl SaturationAlgorithm {
    /// Saturation with the default KBO over `interner`'s symbols
    pub fn new(config: ProverConfig, interner: Interner) -> Result<Self> {
        let ordering: Arc<dyn TermOrdering> = Arc::new(KBO::new(KBOConfig::default()));
        Self::with_ordering(config, interner, ordering)
    }

    pub fn with_ordering(config: ProverConfig, interner: Interner, ordering: Arc<dyn TermOrdering>) -> Result<Self> {
        config.validate()?;
        let interner = Arc::new(interner);
        let mut indexes = IndexManager::new(
            Arc::clone(&ordering),
            Arc::clone(&interner),
            config.forward_demodulation,
        );

        let immediate: Vec<Box<dyn ImmediateSimplifier>> = vec![
            Box::new(TautologyDeletion),
            Box::new(DuplicateLiteralRemoval),
            Box::new(DuplicateClauseDeletion::new()),
        ];

        let check = config.demodulation_redundancy_check;
        let mut forward: Vec<Box<dyn ForwardSimplifier>> = Vec::new();
        if config.forward_subsumption {
            forward.push(Box::new(ForwardSubsumption));
        }
        if config.forward_demodulation != Demodulation::Off {
            forward.push(Box::new(ForwardDemodulation::new(config.forward_demodulation, check)));
        }
        let mut backward: Vec<Box<dyn BackwardSimplifier>> = Vec::new();
        if config.backward_demodulation != Demodulation::Off {
            backward.push(Box::new(BackwardDemodulation::new(config.backward_demodulation, check)));
        }
        if config.backward_subsumption {
            backward.push(Box::new(BackwardSubsumption));
        }
        let mut generating: Vec<Box<dyn GeneratingEngine>> = Vec::new();
        if config.generating.resolution {
            generating.push(Box::new(Resolution::new()));
        }
        if config.generating.factoring {
            generating.push(Box::new(Factoring));
        }
        if config.generating.equality_resolution {
            generating.push(Box::new(EqualityResolution));
        }
        if config.generating.superposition {
            generating.push(Box::new(Superposition));
        }
        if config.generating.equality_factoring {
            generating.push(Box::new(EqualityFactoring));
        }

        for engine in forward.iter_mut() {
            engine.attach(&mut indexes);
        }
        for engine in backward.iter_mut() {
            engine.attach(&mut indexes);
        }
        for engine in generating.iter_mut() {
            engine.attach(&mut indexes);
        }

        let (age_ratio, weight_ratio) = config.age_weight_ratio;
        let cancel = CancellationToken::new();
        Ok(SaturationAlgorithm {
            selector: selector_for(config.literal_selection),
            budget: Budget::new(&config, cancel.clone()),
            cancel,
            interner,
            ordering,
            clauses: Vec::new(),
            stores: StoreTags::default(),
            unprocessed: UnprocessedContainer::default(),
            passive: PassiveContainer::new(age_ratio, weight_ratio),
            active: ActiveContainer::default(),
            indexes,
            immediate,
            forward,
            backward,
            generating,
            iterations: 0,
            stats: Statistics::default(),
            refutation: None,
            result: None,
            config,
        })
    }

    /// Queue the input clauses. All of them are checked before any is
    /// stored, so a malformed clause leaves the state untouched.
    pub fn add_input_clauses(&mut self, clauses: Vec<Clause>) -> Result<()> {
        let mut arities = SymbolArities::default();
        for (i, clause) in clauses.iter().enumerate() {
            arities
                .check_clause(clause, &self.interner)
                .map_err(|reason| ProverError::MalformedClause { clause: i, reason })?;
        }
        for mut clause in clauses {
            clause.age = 0;
            clause.inference.premises.clear();
            clause.inference.rule = InferenceRule::Input;
            self.store(clause);
            self.stats.input_clauses += 1;
        }
        Ok(())
    }

    /// Run until a result is reached
    pub fn saturate(&mut self) -> SaturationResult {
        loop {
            if let Some(result) = self.step() {
                return result;
            }
        }
    }

    /// One iteration of the loop; `Some` once the run has ended.
    /// Further calls keep returning the same result.
    pub fn step(&mut self) -> Option<SaturationResult> {
        if let Some(result) = &self.result {
            return Some(result.clone());
        }
        self.budget.start();
        let result = self.iterate()?;
        self.stats.final_active = self.active.len();
        self.stats.final_passive = self.passive.len();
        match &result {
            SaturationResult::Refutation(proof) => info!(
                "refutation after {} iterations in {:?}, proof of {} steps",
                self.iterations,
                self.budget.elapsed(),
                proof.len()
            ),
            SaturationResult::Satisfiable => info!(
                "saturated after {} iterations in {:?}, {} active clauses",
                self.iterations,
                self.budget.elapsed(),
                self.active.len()
            ),
            SaturationResult::ResourceOut(limit) => info!(
                "resource limit {:?} reached after {} iterations in {:?}",
                limit,
                self.iterations,
                self.budget.elapsed()
            ),
        }
        self.result = Some(result.clone());
        Some(result)
    }

    fn iterate(&mut self) -> Option<SaturationResult> {
        if let Some(empty) = self.process_unprocessed() {
            return Some(self.refute(empty));
        }

        let given = match self.passive.pop_selected() {
            Some(id) => id,
            None => return Some(SaturationResult::Satisfiable),
        };
        self.iterations += 1;
        self.stats.iterations = self.iterations;
        debug!(
            "[{}] given {}: {}",
            self.iterations,
            given,
            self.clauses[given].display(&self.interner)
        );

        if self.forward_simplify(given) {
            self.activate(given);
            if let Some(empty) = self.refutation {
                return Some(self.refute(empty));
            }
        }

        self.budget
            .check(self.clauses.len(), self.iterations)
            .map(SaturationResult::ResourceOut)
    }

    /// Move Unprocessed into Passive; returns an empty clause if one shows up
    fn process_unprocessed(&mut self) -> Option<usize> {
        while let Some(id) = self.unprocessed.pop() {
            let clause = Arc::clone(&self.clauses[id]);
            if clause.is_empty() {
                return Some(id);
            }
            match self.immediate_simplify(&clause) {
                ImmediateOutcome::Keep => {
                    self.stores.transition(id, ClauseStore::Passive);
                    self.passive.add(&clause);
                }
                ImmediateOutcome::Delete => self.stores.transition(id, ClauseStore::Deleted),
                ImmediateOutcome::Replace(replacement) => {
                    self.stores.transition(id, ClauseStore::Deleted);
                    self.add_derived(replacement);
                }
            }
        }
        None
    }

    fn immediate_simplify(&mut self, clause: &Clause) -> ImmediateOutcome {
        for engine in self.immediate.iter_mut() {
            let outcome = engine.simplify(clause);
            if outcome != ImmediateOutcome::Keep {
                trace!("{} simplified {}", engine.name(), clause.display(&self.interner));
                self.stats.record_simplification(engine.name());
                return outcome;
            }
        }
        ImmediateOutcome::Keep
    }

    /// Returns whether the given clause survived
    fn forward_simplify(&mut self, given: usize) -> bool {
        let clause = Arc::clone(&self.clauses[given]);
        let ctx = EngineContext {
            indexes: &self.indexes,
            ordering: self.ordering.as_ref(),
            interner: &self.interner,
            clauses: &self.clauses,
        };
        let mut outcome = ForwardOutcome::Unchanged;
        let mut by_subsumption = false;
        for engine in self.forward.iter_mut() {
            outcome = engine.perform(&clause, &ctx);
            if outcome != ForwardOutcome::Unchanged {
                self.stats.record_simplification(engine.name());
                by_subsumption = engine.name() == "forward subsumption";
                break;
            }
        }

        match outcome {
            ForwardOutcome::Unchanged => true,
            ForwardOutcome::Deleted { premises } => {
                trace!("{} deleted by {:?}", given, premises);
                if by_subsumption {
                    self.stats.forward_subsumptions += 1;
                } else {
                    self.stats.forward_demodulations_to_tautology += 1;
                }
                self.stores.transition(given, ClauseStore::Deleted);
                false
            }
            ForwardOutcome::Replaced(replacement) => {
                self.stats.forward_demodulations += 1;
                self.stores.transition(given, ClauseStore::Deleted);
                self.add_derived(replacement);
                false
            }
        }
    }

    fn activate(&mut self, given: usize) {
        let mut selected = Clause::clone(&self.clauses[given]);
        self.selector.select(&mut selected, self.ordering.as_ref());
        let clause = Arc::new(selected);
        self.clauses[given] = Arc::clone(&clause);

        self.stores.transition(given, ClauseStore::Active);
        self.active.add(given);
        self.indexes.on_activate(Arc::clone(&clause));
        self.stats.activations += 1;

        self.backward_simplify(&clause);
        self.generate(&clause);
    }

    fn backward_simplify(&mut self, premise: &Clause) {
        let ctx = EngineContext {
            indexes: &self.indexes,
            ordering: self.ordering.as_ref(),
            interner: &self.interner,
            clauses: &self.clauses,
        };
        let mut seen = HashSet::new();
        let mut simplified = Vec::new();
        for engine in self.backward.iter_mut() {
            let by_subsumption = engine.name() == "backward subsumption";
            for simplification in engine.perform(premise, &ctx) {
                if seen.insert(simplification.target) {
                    self.stats.record_simplification(engine.name());
                    simplified.push((simplification, by_subsumption));
                }
            }
        }

        for (simplification, _) in &simplified {
            let target = simplification.target;
            trace!(
                "{} simplified by {:?}: {}",
                target,
                simplification.premises,
                self.clauses[target].display(&self.interner)
            );
            self.active.remove(target);
            self.indexes.on_remove(target);
            self.stores.transition(target, ClauseStore::Deleted);
        }
        for (simplification, by_subsumption) in simplified {
            match simplification.replacement {
                Some(replacement) => {
                    self.stats.backward_demodulations += 1;
                    self.add_derived(replacement);
                }
                None if by_subsumption => self.stats.backward_subsumptions += 1,
                None => self.stats.backward_demodulations_to_tautology += 1,
            }
        }
    }

    fn generate(&mut self, given: &Clause) {
        let ctx = EngineContext {
            indexes: &self.indexes,
            ordering: self.ordering.as_ref(),
            interner: &self.interner,
            clauses: &self.clauses,
        };
        let mut conclusions = Vec::new();
        for engine in self.generating.iter_mut() {
            let produced = engine.generate(given, &ctx);
            self.stats.record_generated(engine.name(), produced.len());
            conclusions.extend(produced);
        }
        for conclusion in conclusions {
            self.add_derived(conclusion);
        }
    }

    /// Stamp the age of a derived clause and store it, unless it is too long
    fn add_derived(&mut self, mut clause: Clause) -> Option<usize> {
        if clause.len() > self.config.max_clause_size {
            self.stats.oversized_discarded += 1;
            return None;
        }
        clause.age = clause
            .inference
            .premises
            .iter()
            .map(|&p| self.clauses[p].age)
            .max()
            .map_or(0, |age| age + 1);
        let id = self.store(clause);
        if self.clauses[id].is_empty() && self.refutation.is_none() {
            self.refutation = Some(id);
        }
        Some(id)
    }

    fn store(&mut self, mut clause: Clause) -> usize {
        let id = self.clauses.len();
        clause.id = Some(id);
        clause.selected = 0;
        orient_equalities(&mut clause, self.ordering.as_ref());
        trace!("stored {}: {}", id, clause.display(&self.interner));
        self.clauses.push(Arc::new(clause));
        self.stores.register(id);
        self.unprocessed.push(id);
        id
    }

    fn refute(&self, empty: usize) -> SaturationResult {
        SaturationResult::Refutation(Proof::extract(&self.clauses, empty))
    }

    /// Token that stops the run at its next budget check
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn clauses(&self) -> &[Arc<Clause>] {
        &self.clauses
    }

    pub fn clause(&self, id: usize) -> &Clause {
        &self.clauses[id]
    }

    pub fn store_of(&self, id: usize) -> ClauseStore {
        self.stores.get(id)
    }

    /// Active clause ids in activation order
    pub fn active_ids(&self) -> Vec<usize> {
        self.active.iter().collect()
    }

    pub fn indexes(&self) -> &IndexManager {
        &self.indexes
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl Drop for SaturationAlgorithm {
    fn drop(&mut self) {
        for engine in self.forward.iter_mut() {
            engine.detach(&mut self.indexes);
        }
        for engine in self.backward.iter_mut() {
            engine.detach(&mut self.indexes);
        }
        for engine in self.generating.iter_mut() {
            engine.detach(&mut self.indexes);
        }
    }
}

/// Arities seen so far in the input, per symbol
#[derive(Default)]
struct SymbolArities {
    functions: HashMap<FunctionId, u8>,
    predicates: HashMap<PredicateId, u8>,
}

impl SymbolArities {
    fn check_clause(&mut self, clause: &Clause, interner: &Interner) -> std::result::Result<(), String> {
        if clause.id.is_some() {
            return Err("clause is already stored".to_string());
        }
        for literal in &clause.literals {
            let predicate = literal.predicate;
            if literal.args.len() != predicate.arity as usize {
                return Err(format!(
                    "predicate {} of arity {} applied to {} arguments",
                    predicate.name(interner),
                    predicate.arity,
                    literal.args.len()
                ));
            }
            if literal.is_equality() {
                if literal.args.len() != 2 {
                    return Err("equality needs two arguments".to_string());
                }
            } else {
                let known = *self.predicates.entry(predicate.id).or_insert(predicate.arity);
                if known != predicate.arity {
                    return Err(format!(
                        "predicate {} used with arities {} and {}",
                        predicate.name(interner),
                        known,
                        predicate.arity
                    ));
                }
            }
            for arg in &literal.args {
                self.check_term(arg, interner)?;
            }
        }
        Ok(())
    }

    fn check_term(&mut self, term: &Term, interner: &Interner) -> std::result::Result<(), String> {
        if let Term::Function(f, args) = term {
            let name = f.name(interner);
            if args.len() != f.arity as usize {
                return Err(format!(
                    "function {} of arity {} applied to {} arguments",
                    name,
                    f.arity,
                    args.len()
                ));
            }
            let known = *self.functions.entry(f.id).or_insert(f.arity);
            if known != f.arity {
                return Err(format!("function {} used with arities {} and {}", name, known, f.arity));
            }
            for arg in args {
                self.check_term(arg, interner)?;
            }
        }
        Ok(())
    }
}

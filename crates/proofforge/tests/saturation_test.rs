//! End-to-end runs of the saturation loop

use proofforge::{
    saturate, Clause, ClauseStore, Constant, FunctionSymbol, InferenceRule, Interner, Literal,
    LiteralSelectionStrategy, PredicateSymbol, Proof, ProverConfig, ResourceLimit,
    SaturationAlgorithm, SaturationResult, Term,
};

/// Test context that holds the interner and provides helper methods
struct TestCtx {
    interner: Interner,
}

impl TestCtx {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            interner: Interner::new(),
        }
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

    fn lit(&mut self, name: &str, args: Vec<Term>, polarity: bool) -> Literal {
        let id = self.interner.intern_predicate(name);
        Literal::new(PredicateSymbol::new(id, args.len() as u8), args, polarity)
    }
}

/// Premises are proof steps with smaller ids
fn assert_well_founded(proof: &Proof) {
    for step in &proof.steps {
        for &premise in &step.premises {
            assert!(premise < step.id, "premise {} of step {} comes later", premise, step.id);
            assert!(proof.step(premise).is_some(), "premise {} missing from proof", premise);
        }
        if step.rule == InferenceRule::Input {
            assert!(step.premises.is_empty());
        }
    }
    assert!(proof.step(proof.empty_clause).map_or(false, |s| s.clause.is_empty()));
}

#[test]
fn test_simple_resolution() {
    // P(a), ¬P(X) ∨ Q(X), ¬Q(a)
    let mut ctx = TestCtx::new();
    let a = ctx.const_("a");
    let x = ctx.var("X");
    let clauses = vec![
        Clause::new(vec![ctx.lit("P", vec![a.clone()], true)]),
        Clause::new(vec![ctx.lit("P", vec![x.clone()], false), ctx.lit("Q", vec![x], true)]),
        Clause::new(vec![ctx.lit("Q", vec![a], false)]),
    ];

    let (result, stats) = saturate(clauses, ProverConfig::default(), ctx.interner).expect("valid input");
    match result {
        SaturationResult::Refutation(proof) => {
            assert_well_founded(&proof);
            assert_eq!(proof.input_clauses(), vec![0, 1, 2]);
        }
        _ => panic!("Expected refutation, got {:?}", result),
    }
    assert_eq!(stats.input_clauses, 3);
    assert!(stats.generated_by.get("resolution").copied().unwrap_or(0) >= 2);
}

#[test]
fn test_equality_reflexivity() {
    let mut ctx = TestCtx::new();
    let a = ctx.const_("a");
    let clauses = vec![Clause::new(vec![Literal::equality(a.clone(), a, false)])];

    let (result, _) = saturate(clauses, ProverConfig::default(), ctx.interner).expect("valid input");
    match result {
        SaturationResult::Refutation(proof) => {
            assert_well_founded(&proof);
            let last = proof.step(proof.empty_clause).expect("empty clause step");
            assert_eq!(last.rule, InferenceRule::EqualityResolution);
        }
        _ => panic!("Expected refutation, got {:?}", result),
    }
}

#[test]
fn test_factoring_needed() {
    // P(X) ∨ P(Y) and ¬P(U) ∨ ¬P(V) are refutable only with factoring
    let mut ctx = TestCtx::new();
    let x = ctx.var("X");
    let y = ctx.var("Y");
    let u = ctx.var("U");
    let v = ctx.var("V");
    let clauses = vec![
        Clause::new(vec![ctx.lit("P", vec![x], true), ctx.lit("P", vec![y], true)]),
        Clause::new(vec![ctx.lit("P", vec![u], false), ctx.lit("P", vec![v], false)]),
    ];

    let (result, stats) = saturate(clauses, ProverConfig::default(), ctx.interner).expect("valid input");
    match result {
        SaturationResult::Refutation(proof) => {
            assert_well_founded(&proof);
            assert!(proof.steps.iter().any(|s| s.rule == InferenceRule::Factoring));
        }
        _ => panic!("Expected refutation, got {:?}", result),
    }
    assert!(stats.generated_by.contains_key("factoring"));
}

#[test]
fn test_equality_disjunction_refutes() {
    // a = b ∨ a = c, P(a), ¬P(b), ¬P(c)
    let mut ctx = TestCtx::new();
    let a = ctx.const_("a");
    let b = ctx.const_("b");
    let c = ctx.const_("c");
    let clauses = vec![
        Clause::new(vec![
            Literal::equality(a.clone(), b.clone(), true),
            Literal::equality(a.clone(), c.clone(), true),
        ]),
        Clause::new(vec![ctx.lit("P", vec![a], true)]),
        Clause::new(vec![ctx.lit("P", vec![b], false)]),
        Clause::new(vec![ctx.lit("P", vec![c], false)]),
    ];

    let (result, stats) = saturate(clauses, ProverConfig::default(), ctx.interner).expect("valid input");
    match result {
        SaturationResult::Refutation(proof) => {
            assert_well_founded(&proof);
            assert!(proof.steps.iter().any(|s| s.rule == InferenceRule::Superposition));
            assert_eq!(proof.input_clauses(), vec![0, 1, 2, 3]);
        }
        _ => panic!("Expected refutation, got {:?}", result),
    }
    assert!(stats.generated_by.contains_key("superposition"));
}

#[test]
fn test_two_element_domain_refutes() {
    // X = a ∨ X = b allows at most two elements, but a, b, c are distinct
    let mut ctx = TestCtx::new();
    let x = ctx.var("X");
    let a = ctx.const_("a");
    let b = ctx.const_("b");
    let c = ctx.const_("c");
    let clauses = vec![
        Clause::new(vec![
            Literal::equality(x.clone(), a.clone(), true),
            Literal::equality(x, b.clone(), true),
        ]),
        Clause::new(vec![Literal::equality(a.clone(), b.clone(), false)]),
        Clause::new(vec![Literal::equality(b, c.clone(), false)]),
        Clause::new(vec![Literal::equality(a, c, false)]),
    ];
    let config = ProverConfig {
        max_iterations: 500,
        ..ProverConfig::default()
    };

    let (result, _) = saturate(clauses, config, ctx.interner).expect("valid input");
    match result {
        SaturationResult::Refutation(proof) => assert_well_founded(&proof),
        _ => panic!("Expected refutation, got {:?}", result),
    }
}

#[test]
fn test_subsumed_clauses_are_deleted() {
    let mut ctx = TestCtx::new();
    let x = ctx.var("X");
    let a = ctx.const_("a");
    let b = ctx.const_("b");
    let clauses = vec![
        Clause::new(vec![ctx.lit("P", vec![a.clone()], true), ctx.lit("Q", vec![b.clone()], true)]),
        Clause::new(vec![ctx.lit("P", vec![x], true)]),
        Clause::new(vec![ctx.lit("P", vec![b], true), ctx.lit("Q", vec![a], true)]),
    ];
    let mut prover = SaturationAlgorithm::new(ProverConfig::default(), ctx.interner).expect("valid config");
    prover.add_input_clauses(clauses).expect("valid input");

    assert_eq!(prover.saturate(), SaturationResult::Satisfiable);
    // P(X) removes the older clause from Active and blocks the newer one
    assert_eq!(prover.active_ids(), vec![1]);
    assert_eq!(prover.store_of(0), ClauseStore::Deleted);
    assert_eq!(prover.store_of(2), ClauseStore::Deleted);
    assert_eq!(prover.statistics().backward_subsumptions, 1);
    assert_eq!(prover.statistics().forward_subsumptions, 1);
}

#[test]
fn test_satisfiable_formula() {
    let mut ctx = TestCtx::new();
    let a = ctx.const_("a");
    let b = ctx.const_("b");
    let x = ctx.var("X");
    let clauses = vec![
        Clause::new(vec![ctx.lit("P", vec![a], true)]),
        Clause::new(vec![ctx.lit("Q", vec![b], true)]),
        Clause::new(vec![ctx.lit("P", vec![x.clone()], false), ctx.lit("R", vec![x], true)]),
    ];

    let (result, stats) = saturate(clauses, ProverConfig::default(), ctx.interner).expect("valid input");
    assert_eq!(result, SaturationResult::Satisfiable);
    assert_eq!(stats.final_passive, 0);
    // P(a), Q(b), the rule, and R(a)
    assert_eq!(stats.final_active, 4);
}

#[test]
fn test_every_selection_strategy_refutes() {
    for strategy in [
        LiteralSelectionStrategy::Off,
        LiteralSelectionStrategy::Always,
        LiteralSelectionStrategy::IfSeveralMaximal,
        LiteralSelectionStrategy::Best,
    ] {
        let mut ctx = TestCtx::new();
        let a = ctx.const_("a");
        let x = ctx.var("X");
        let fx = ctx.func("f", vec![x.clone()]);
        let ffa = {
            let fa = ctx.func("f", vec![a.clone()]);
            ctx.func("f", vec![fa])
        };
        let clauses = vec![
            Clause::new(vec![ctx.lit("P", vec![a], true)]),
            Clause::new(vec![ctx.lit("P", vec![x], false), ctx.lit("P", vec![fx], true)]),
            Clause::new(vec![ctx.lit("P", vec![ffa], false)]),
        ];
        let config = ProverConfig {
            literal_selection: strategy,
            max_iterations: 200,
            ..ProverConfig::default()
        };
        let (result, _) = saturate(clauses, config, ctx.interner).expect("valid input");
        match result {
            SaturationResult::Refutation(proof) => assert_well_founded(&proof),
            _ => panic!("{:?}: expected refutation, got {:?}", strategy, result),
        }
    }
}

#[test]
fn test_clause_budget() {
    let mut ctx = TestCtx::new();
    let a = ctx.const_("a");
    let x = ctx.var("X");
    let fx = ctx.func("f", vec![x.clone()]);
    let clauses = vec![
        Clause::new(vec![ctx.lit("P", vec![a], true)]),
        Clause::new(vec![ctx.lit("P", vec![x], false), ctx.lit("P", vec![fx], true)]),
    ];
    let config = ProverConfig {
        max_clauses: 6,
        ..ProverConfig::default()
    };

    let (result, _) = saturate(clauses, config, ctx.interner).expect("valid input");
    assert_eq!(result, SaturationResult::ResourceOut(ResourceLimit::Clauses));
}

#[test]
fn test_step_by_step_stores() {
    let mut ctx = TestCtx::new();
    let a = ctx.const_("a");
    let b = ctx.const_("b");
    let clauses = vec![
        Clause::new(vec![ctx.lit("P", vec![a], true)]),
        Clause::new(vec![ctx.lit("Q", vec![b], true)]),
    ];
    let mut prover = SaturationAlgorithm::new(ProverConfig::default(), ctx.interner).expect("valid config");
    prover.add_input_clauses(clauses).expect("valid input");
    assert_eq!(prover.store_of(0), ClauseStore::Unprocessed);

    assert_eq!(prover.step(), None);
    assert_eq!(prover.store_of(0), ClauseStore::Active);
    assert_eq!(prover.store_of(1), ClauseStore::Passive);

    assert_eq!(prover.step(), None);
    assert_eq!(prover.store_of(1), ClauseStore::Active);

    assert_eq!(prover.step(), Some(SaturationResult::Satisfiable));
    assert_eq!(prover.iterations(), 2);
}

#[test]
fn test_proof_json() {
    let mut ctx = TestCtx::new();
    let a = ctx.const_("a");
    let clauses = vec![
        Clause::new(vec![ctx.lit("P", vec![a.clone()], true)]),
        Clause::new(vec![ctx.lit("P", vec![a], false)]),
    ];
    let mut prover = SaturationAlgorithm::new(ProverConfig::default(), ctx.interner).expect("valid config");
    prover.add_input_clauses(clauses).expect("valid input");

    let proof = match prover.saturate() {
        SaturationResult::Refutation(proof) => proof,
        other => panic!("Expected refutation, got {:?}", other),
    };
    let json = proof.to_json(prover.interner()).expect("serializable");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["steps"].as_array().map(|s| s.len()), Some(3));
    assert_eq!(value["steps"][2]["rule"], "resolution");

    let text = proof.display(prover.interner()).to_string();
    assert!(text.contains("[resolution 1,0]") || text.contains("[resolution 0,1]"));
}

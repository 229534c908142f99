//! Template-driven proof sketches.
//!
//! The prover inspects the syntactic shape of a formula and replays a fixed
//! argument for it. It never refutes a property: the only verdicts it produces
//! are `Satisfied` (a template applied) and `Unknown` (none did). A proof sketch
//! is not a machine-checked proof and must not gate safety-critical acceptance
//! on its own.

use log::debug;
use serde_json::json;

use crate::errors::VeritasResult;
use crate::models::common::{ ModelKind, VerificationMethod };
use crate::models::property::{ PropertyKind, PropertySpec };
use crate::models::transition_system::TransitionSystem;
use crate::models::verification::{ CheckOutcome, VerificationStatus, VerificationTask, Witness };
use crate::traits::verification_engine::VerificationBackend;

/// Canned argument selected by formula shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofStrategy {
    /// `¬∃ ... Bad ...`
    SafetyByContradiction,
    /// `∀ ... ◊ ...`
    LivenessByWitness,
    /// `□ ...`
    InvariantByInduction,
}

impl ProofStrategy {
    pub fn detect(formula: &str) -> Option<Self> {
        if formula.contains("¬∃") && has_token(formula, "Bad") {
            Some(ProofStrategy::SafetyByContradiction)
        } else if formula.contains('∀') && formula.contains('◊') {
            Some(ProofStrategy::LivenessByWitness)
        } else if formula.contains('□') {
            Some(ProofStrategy::InvariantByInduction)
        } else {
            None
        }
    }

    pub fn steps(&self) -> &'static [&'static str] {
        match self {
            ProofStrategy::SafetyByContradiction =>
                &[
                    "Apply safety strategy: proof by contradiction",
                    "Assume a reachable state s with Bad(s)",
                    "Derive a contradiction with the transition axioms",
                    "Therefore no bad state exists; the safety property holds",
                ],
            ProofStrategy::LivenessByWitness =>
                &[
                    "Apply liveness strategy: reachability witness",
                    "Construct a path from the initial state to a good state",
                    "The liveness property holds",
                ],
            ProofStrategy::InvariantByInduction =>
                &[
                    "Apply invariant strategy: induction over transitions",
                    "Base case: the initial state satisfies the invariant",
                    "Inductive step: every transition preserves the invariant",
                    "The invariant holds",
                ],
        }
    }

    fn conclusion(&self) -> &'static str {
        match self {
            ProofStrategy::SafetyByContradiction => "Safety proof sketch completed",
            ProofStrategy::LivenessByWitness => "Liveness proof sketch completed",
            ProofStrategy::InvariantByInduction => "Invariant proof sketch completed",
        }
    }
}

/// True if `token` occurs in `formula` as a whole identifier
fn has_token(formula: &str, token: &str) -> bool {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    formula.match_indices(token).any(|(start, _)| {
        let before = formula[..start].chars().next_back();
        let after = formula[start + token.len()..].chars().next();
        !before.map_or(false, is_ident) && !after.map_or(false, is_ident)
    })
}

/// Proof-sketch generator
#[derive(Debug, Clone, Default)]
pub struct TheoremProver;

impl TheoremProver {
    pub fn new() -> Self {
        Self
    }

    pub fn prove(&self, system: &TransitionSystem, property: &PropertySpec) -> CheckOutcome {
        let axioms = extract_axioms(system);
        let formula = derive_formula(property);

        let mut outcome = match ProofStrategy::detect(&formula) {
            Some(strategy) => {
                debug!("Formula '{}' matched {:?}", formula, strategy);
                let mut proof_steps = vec![
                    format!("Goal: prove {}", formula),
                    format!("Given axioms: {}", axioms.len())
                ];
                proof_steps.extend(strategy.steps().iter().map(|s| s.to_string()));
                let step_count = proof_steps.len();
                let mut outcome = CheckOutcome::new(
                    VerificationStatus::Satisfied,
                    strategy.conclusion()
                ).with_witness(Witness::Proof { proof_steps });
                outcome.statistics.insert("proof_steps".to_string(), json!(step_count));
                outcome
            }
            None => {
                let mut outcome = CheckOutcome::new(
                    VerificationStatus::Unknown,
                    "no applicable proof strategy"
                );
                outcome.statistics.insert("proof_steps".to_string(), json!(0));
                outcome
            }
        };
        outcome.statistics.insert("axioms_used".to_string(), json!(axioms.len()));
        outcome.statistics.insert("model_kind".to_string(), json!(system.kind.as_str()));
        outcome
    }
}

impl VerificationBackend for TheoremProver {
    fn method(&self) -> VerificationMethod {
        VerificationMethod::TheoremProving
    }

    fn run(&self, task: &VerificationTask) -> VeritasResult<CheckOutcome> {
        Ok(self.prove(task.model.as_ref(), &task.property))
    }
}

/// Facts about the model, in declaration order
pub fn extract_axioms(system: &TransitionSystem) -> Vec<String> {
    let mut axioms = Vec::new();
    match (system.kind, system.net.as_ref()) {
        (ModelKind::PetriNet, Some(net)) => {
            axioms.extend(net.places.iter().map(|p| format!("Place({})", p)));
            axioms.extend(net.transitions.iter().map(|t| format!("Transition({})", t)));
            for transition in &net.transitions {
                for (place, weight) in net.input_arcs.get(transition).into_iter().flatten() {
                    axioms.push(format!("Arc({}, {}, {})", place, transition, weight));
                }
                for (place, weight) in net.output_arcs.get(transition).into_iter().flatten() {
                    axioms.push(format!("Arc({}, {}, {})", transition, place, weight));
                }
            }
        }
        _ => {
            axioms.extend(system.states.iter().map(|s| format!("State({})", s)));
            for state in &system.states {
                for edge in system.adjacency.get(state).into_iter().flatten() {
                    axioms.push(format!("Transition({}, {}, {})", edge.from, edge.label, edge.to));
                }
            }
        }
    }
    axioms
}

/// The explicit temporal formula, or one derived from the property kind
pub fn derive_formula(property: &PropertySpec) -> String {
    if let Some(formula) = &property.temporal_formula {
        return formula.clone();
    }
    match property.kind {
        PropertyKind::Safety => "¬∃s.(State(s) ∧ Bad(s))".to_string(),
        PropertyKind::Liveness => "∀s.(State(s) → ◊Good(s))".to_string(),
        PropertyKind::Invariant => "□Inv".to_string(),
        _ => property.formal_spec.clone(),
    }
}

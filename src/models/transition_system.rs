use std::collections::{ BTreeMap, BTreeSet };
use std::fmt;

use serde::{ Deserialize, Serialize };

use crate::errors::{ VeritasError, VeritasResult };
use crate::models::common::ModelKind;
use crate::traits::state_space::StateSpace;

/// A labeled edge of the normalized transition system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: String,
    #[serde(rename = "guard_or_weight")]
    pub annotation: EdgeAnnotation,
}

/// Guard condition (state machines) or weight (unified STS, Petri nets)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeAnnotation {
    Guard(String),
    Weight(f64),
}

/// Token count per place. Every place of the net has an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Marking(pub BTreeMap<String, u32>);

impl Marking {
    pub fn tokens(&self, place: &str) -> u32 {
        self.0.get(place).copied().unwrap_or(0)
    }
}

/// Rendered as `place=count` pairs in sorted place order, e.g. `busy=0,idle=1`
impl fmt::Display for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (place, count) in &self.0 {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}={}", place, count)?;
            first = false;
        }
        Ok(())
    }
}

/// A position in the search: a named state, or a Petri-net marking
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchRoot {
    State(String),
    Marking(Marking),
}

/// Place/transition structure of a Petri net
#[derive(Debug, Clone, PartialEq)]
pub struct PetriNet {
    pub places: Vec<String>,
    pub transitions: Vec<String>,
    /// transition -> [(place, weight)]
    pub input_arcs: BTreeMap<String, Vec<(String, u32)>>,
    /// transition -> [(place, weight)]
    pub output_arcs: BTreeMap<String, Vec<(String, u32)>>,
    pub initial_marking: Marking,
    pub final_markings: Vec<Marking>,
}

impl PetriNet {
    pub fn is_enabled(&self, marking: &Marking, transition: &str) -> bool {
        self.input_arcs
            .get(transition)
            .map(|arcs| arcs.iter().all(|(place, weight)| marking.tokens(place) >= *weight))
            .unwrap_or(true)
    }

    /// Fire `transition` from `marking`. The caller checks enablement first.
    pub fn fire(&self, marking: &Marking, transition: &str) -> VeritasResult<Marking> {
        let mut next = marking.clone();
        for (place, weight) in self.input_arcs.get(transition).into_iter().flatten() {
            let count = next.0.entry(place.clone()).or_insert(0);
            *count = count.saturating_sub(*weight);
        }
        for (place, weight) in self.output_arcs.get(transition).into_iter().flatten() {
            let count = next.0.entry(place.clone()).or_insert(0);
            *count = count.checked_add(*weight).ok_or_else(|| {
                VeritasError::TokenOverflow(
                    format!("firing {} from {} overflows place {}", transition, marking, place)
                )
            })?;
        }
        Ok(next)
    }

    fn consumed(&self, transition: &str) -> u32 {
        self.input_arcs
            .get(transition)
            .map(|arcs| arcs.iter().map(|(_, weight)| *weight).sum())
            .unwrap_or(0)
    }
}

/// The normalized model every checker operates over
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionSystem {
    pub model_id: String,
    pub kind: ModelKind,
    /// Declared states in declaration order; empty for Petri nets
    pub states: Vec<String>,
    pub events: Vec<String>,
    pub initial: Vec<String>,
    pub finals: BTreeSet<String>,
    /// A state with no entry has no outgoing edges
    pub adjacency: BTreeMap<String, Vec<Edge>>,
    pub net: Option<PetriNet>,
}

impl TransitionSystem {
    pub fn has_state(&self, name: &str) -> bool {
        self.states.iter().any(|s| s == name)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.adjacency.values().flatten()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    fn petri_net(&self) -> VeritasResult<&PetriNet> {
        self.net
            .as_ref()
            .ok_or_else(|| VeritasError::MalformedModel("petri net structure missing".to_string()))
    }
}

impl StateSpace for TransitionSystem {
    fn roots(&self) -> VeritasResult<Vec<SearchRoot>> {
        match self.kind {
            ModelKind::StateMachine => {
                let initial = match self.initial.as_slice() {
                    [single] => single,
                    [] => {
                        return Err(
                            VeritasError::UnresolvedInitialState(
                                "state machine declares no initial state".to_string()
                            )
                        );
                    }
                    many => {
                        return Err(
                            VeritasError::UnresolvedInitialState(
                                format!("state machine expects one initial state, found {}", many.len())
                            )
                        );
                    }
                };
                if !self.has_state(initial) {
                    return Err(
                        VeritasError::UnresolvedInitialState(
                            format!("initial state '{}' is not a declared state", initial)
                        )
                    );
                }
                Ok(vec![SearchRoot::State(initial.clone())])
            }
            ModelKind::UnifiedSts => {
                if self.initial.is_empty() {
                    return Err(
                        VeritasError::UnresolvedInitialState(
                            "unified STS declares no initial states".to_string()
                        )
                    );
                }
                self.initial
                    .iter()
                    .map(|name| {
                        if self.has_state(name) {
                            Ok(SearchRoot::State(name.clone()))
                        } else {
                            Err(
                                VeritasError::UnresolvedInitialState(
                                    format!("initial state '{}' is not a declared state", name)
                                )
                            )
                        }
                    })
                    .collect()
            }
            ModelKind::PetriNet => {
                Ok(vec![SearchRoot::Marking(self.petri_net()?.initial_marking.clone())])
            }
        }
    }

    fn successors(&self, node: &SearchRoot) -> VeritasResult<Vec<(Edge, SearchRoot)>> {
        match node {
            SearchRoot::State(name) =>
                Ok(
                    self.adjacency
                        .get(name)
                        .map(|edges| {
                            edges
                                .iter()
                                .map(|edge| (edge.clone(), SearchRoot::State(edge.to.clone())))
                                .collect()
                        })
                        .unwrap_or_default()
                ),
            SearchRoot::Marking(marking) => {
                let net = self.petri_net()?;
                let from = marking.to_string();
                net.transitions
                    .iter()
                    .filter(|t| net.is_enabled(marking, t))
                    .map(|t| {
                        let next = net.fire(marking, t)?;
                        let edge = Edge {
                            from: from.clone(),
                            to: next.to_string(),
                            label: t.clone(),
                            annotation: EdgeAnnotation::Weight(net.consumed(t) as f64),
                        };
                        Ok((edge, SearchRoot::Marking(next)))
                    })
                    .collect()
            }
        }
    }

    fn label(&self, node: &SearchRoot) -> String {
        match node {
            SearchRoot::State(name) => name.clone(),
            SearchRoot::Marking(marking) => marking.to_string(),
        }
    }

    fn is_final(&self, node: &SearchRoot) -> bool {
        match node {
            SearchRoot::State(name) => self.finals.contains(name),
            SearchRoot::Marking(marking) =>
                self.net
                    .as_ref()
                    .map(|net| net.final_markings.contains(marking))
                    .unwrap_or(false),
        }
    }
}

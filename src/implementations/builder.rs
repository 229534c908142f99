use std::collections::{ BTreeMap, BTreeSet, HashSet };

use log::debug;
use serde::de::DeserializeOwned;

use crate::errors::{ VeritasError, VeritasResult };
use crate::models::common::ModelKind;
use crate::models::document::{
    ModelDocument,
    PetriNetElements,
    StateMachineElements,
    UnifiedStsElements,
};
use crate::models::transition_system::{ Edge, EdgeAnnotation, Marking, PetriNet, TransitionSystem };

/// Translate an authoring-tool model document into the normalized transition system
pub fn build_transition_system(document: &ModelDocument) -> VeritasResult<TransitionSystem> {
    let kind: ModelKind = document.model_type.parse()?;
    let system = match kind {
        ModelKind::StateMachine => build_state_machine(&document.model_id, parse_elements(document)?)?,
        ModelKind::PetriNet => build_petri_net(&document.model_id, parse_elements(document)?)?,
        ModelKind::UnifiedSts => build_unified_sts(&document.model_id, parse_elements(document)?)?,
    };
    debug!(
        "Built {} '{}' with {} states and {} edges",
        system.kind,
        system.model_id,
        system.states.len(),
        system.edge_count()
    );
    Ok(system)
}

fn parse_elements<T: DeserializeOwned>(document: &ModelDocument) -> VeritasResult<T> {
    let elements = if document.elements.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        document.elements.clone()
    };
    serde_json::from_value(elements).map_err(|e| {
        VeritasError::MalformedModel(
            format!("invalid {} elements: {}", document.model_type, e)
        )
    })
}

fn declared_set<'a>(names: &'a [String], what: &str) -> VeritasResult<HashSet<&'a str>> {
    if names.is_empty() {
        return Err(VeritasError::MalformedModel(format!("model declares no {}", what)));
    }
    Ok(names.iter().map(String::as_str).collect())
}

fn require_declared(declared: &HashSet<&str>, name: &str, role: &str) -> VeritasResult<()> {
    if declared.contains(name) {
        Ok(())
    } else {
        Err(VeritasError::MalformedModel(format!("{} '{}' is not a declared state", role, name)))
    }
}

fn build_state_machine(
    model_id: &str,
    elements: StateMachineElements
) -> VeritasResult<TransitionSystem> {
    let declared = declared_set(&elements.states, "states")?;

    let mut adjacency: BTreeMap<String, Vec<Edge>> = BTreeMap::new();
    for record in &elements.transitions {
        require_declared(&declared, &record.from, "transition source")?;
        require_declared(&declared, &record.to, "transition target")?;
        adjacency.entry(record.from.clone()).or_default().push(Edge {
            from: record.from.clone(),
            to: record.to.clone(),
            label: record.event.clone(),
            annotation: EdgeAnnotation::Guard(record.condition.clone()),
        });
    }

    let events = distinct_labels(elements.transitions.iter().map(|t| t.event.as_str()));

    Ok(TransitionSystem {
        model_id: model_id.to_string(),
        kind: ModelKind::StateMachine,
        states: elements.states.clone(),
        events,
        initial: elements.initial_state.into_iter().collect(),
        finals: elements.final_states.into_iter().collect(),
        adjacency,
        net: None,
    })
}

fn build_unified_sts(
    model_id: &str,
    elements: UnifiedStsElements
) -> VeritasResult<TransitionSystem> {
    let declared = declared_set(&elements.states, "states")?;

    let mut adjacency: BTreeMap<String, Vec<Edge>> = BTreeMap::new();
    for relation in &elements.relations {
        require_declared(&declared, &relation.from_state, "relation source")?;
        require_declared(&declared, &relation.to_state, "relation target")?;
        adjacency.entry(relation.from_state.clone()).or_default().push(Edge {
            from: relation.from_state.clone(),
            to: relation.to_state.clone(),
            label: relation.event.clone(),
            annotation: EdgeAnnotation::Weight(relation.weight),
        });
    }

    let events = if elements.events.is_empty() {
        distinct_labels(elements.relations.iter().map(|r| r.event.as_str()))
    } else {
        elements.events.clone()
    };

    Ok(TransitionSystem {
        model_id: model_id.to_string(),
        kind: ModelKind::UnifiedSts,
        states: elements.states.clone(),
        events,
        initial: elements.initial_states,
        finals: elements.final_states.into_iter().collect(),
        adjacency,
        net: None,
    })
}

fn build_petri_net(model_id: &str, elements: PetriNetElements) -> VeritasResult<TransitionSystem> {
    let places = declared_set(&elements.places, "places")?;
    let transitions: HashSet<&str> = elements.transitions.iter().map(String::as_str).collect();

    let mut input_arcs: BTreeMap<String, Vec<(String, u32)>> = BTreeMap::new();
    let mut output_arcs: BTreeMap<String, Vec<(String, u32)>> = BTreeMap::new();
    for arc in &elements.arcs {
        let (from, to) = (arc.from.as_str(), arc.to.as_str());
        if places.contains(from) && transitions.contains(to) {
            input_arcs.entry(arc.to.clone()).or_default().push((arc.from.clone(), arc.weight));
        } else if transitions.contains(from) && places.contains(to) {
            output_arcs.entry(arc.from.clone()).or_default().push((arc.to.clone(), arc.weight));
        } else {
            return Err(
                VeritasError::MalformedModel(
                    format!("arc {} -> {} must join a place and a transition", from, to)
                )
            );
        }
    }

    let initial_marking = complete_marking(&elements.places, &places, &elements.initial_marking)?;
    let final_markings = elements.final_markings
        .iter()
        .map(|m| complete_marking(&elements.places, &places, m))
        .collect::<VeritasResult<Vec<_>>>()?;

    Ok(TransitionSystem {
        model_id: model_id.to_string(),
        kind: ModelKind::PetriNet,
        states: Vec::new(),
        events: elements.transitions.clone(),
        initial: Vec::new(),
        finals: BTreeSet::new(),
        adjacency: BTreeMap::new(),
        net: Some(PetriNet {
            places: elements.places.clone(),
            transitions: elements.transitions.clone(),
            input_arcs,
            output_arcs,
            initial_marking,
            final_markings,
        }),
    })
}

/// Every place gets an entry; unlisted places hold zero tokens
fn complete_marking(
    order: &[String],
    places: &HashSet<&str>,
    partial: &BTreeMap<String, u32>
) -> VeritasResult<Marking> {
    if let Some(unknown) = partial.keys().find(|p| !places.contains(p.as_str())) {
        return Err(
            VeritasError::MalformedModel(format!("marking names unknown place '{}'", unknown))
        );
    }
    Ok(
        Marking(
            order
                .iter()
                .map(|p| (p.clone(), partial.get(p).copied().unwrap_or(0)))
                .collect()
        )
    )
}

fn distinct_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .filter(|l| !l.is_empty() && seen.insert(*l))
        .map(str::to_string)
        .collect()
}

use log::info;
use serde_json::json;

use crate::errors::VeritasResult;
use crate::models::document::ModelDocument;
use crate::models::property::{ PropertyKind, PropertySpec };
use crate::models::transition_system::{ Edge, EdgeAnnotation, SearchRoot };
use crate::traits::state_space::StateSpace;

// Initialize the logger; a second call finds it installed and does nothing
pub fn setup() {
    match env_logger::try_init() {
        Ok(_) => info!("Logger initialized"),
        Err(_) => {}
    }
}

pub fn login_model() -> ModelDocument {
    ModelDocument::new(
        "login_system",
        "state_machine",
        json!({
            "states": ["logged_out", "logged_in", "login_failed", "error"],
            "initial_state": "logged_out",
            "final_states": ["logged_in"],
            "transitions": [
                {"from": "logged_out", "to": "logged_in", "event": "login_success"},
                {"from": "logged_out", "to": "login_failed", "event": "login_failure"},
                {"from": "login_failed", "to": "logged_out", "event": "retry"},
                {"from": "login_failed", "to": "error", "event": "max_retries_exceeded"},
                {"from": "logged_in", "to": "logged_out", "event": "logout"}
            ]
        })
    )
}

pub fn safety_property() -> PropertySpec {
    PropertySpec::new("safety_no_error", PropertyKind::Safety, "error|failure|invalid")
        .with_description("The system never enters an error state")
}

pub fn liveness_property() -> PropertySpec {
    PropertySpec::new("liveness_completion", PropertyKind::Liveness, "completed|finished|done")
        .with_description("The system eventually completes")
}

pub fn reachability_property() -> PropertySpec {
    PropertySpec::new("reachability_logged_in", PropertyKind::Reachability, "logged_in")
        .with_description("A user can log in")
}

pub fn deadlock_property() -> PropertySpec {
    PropertySpec::new("deadlock_freedom", PropertyKind::DeadlockFree, "deadlock_free")
        .with_description("The system never gets stuck")
}

pub fn canonical_properties() -> Vec<PropertySpec> {
    vec![safety_property(), liveness_property(), reachability_property(), deadlock_property()]
}

/// idle --start--> busy --finish--> done
pub fn job_net(with_final_marking: bool) -> ModelDocument {
    let final_markings = if with_final_marking { json!([{"done": 1}]) } else { json!([]) };
    ModelDocument::new(
        "job_net",
        "petri_net",
        json!({
            "places": ["idle", "busy", "done"],
            "transitions": ["start", "finish"],
            "arcs": [
                {"from": "idle", "to": "start"},
                {"from": "start", "to": "busy"},
                {"from": "busy", "to": "finish"},
                {"from": "finish", "to": "done"}
            ],
            "initial_marking": {"idle": 1},
            "final_markings": final_markings
        })
    )
}

/// a -> b -> c -> d, starting from both a and c
pub fn pipeline_sts() -> ModelDocument {
    ModelDocument::new(
        "pipeline",
        "unified_sts",
        json!({
            "states": ["a", "b", "c", "d"],
            "events": ["step"],
            "relations": [
                {"from_state": "a", "to_state": "b", "event": "step", "weight": 0.5},
                {"from_state": "b", "to_state": "c", "event": "step"},
                {"from_state": "c", "to_state": "d", "event": "step"}
            ],
            "initial_states": ["a", "c"],
            "final_states": ["d"]
        })
    )
}

/// Unbounded chain 0 -> 1 -> 2 -> ...
pub struct Counter;

impl StateSpace for Counter {
    fn roots(&self) -> VeritasResult<Vec<SearchRoot>> {
        Ok(vec![SearchRoot::State("0".to_string())])
    }

    fn successors(&self, node: &SearchRoot) -> VeritasResult<Vec<(Edge, SearchRoot)>> {
        Ok(match node {
            SearchRoot::State(n) => {
                let next = n.parse::<u64>().map(|v| v + 1).unwrap_or(0).to_string();
                let edge = Edge {
                    from: n.clone(),
                    to: next.clone(),
                    label: "inc".to_string(),
                    annotation: EdgeAnnotation::Guard("true".to_string()),
                };
                vec![(edge, SearchRoot::State(next))]
            }
            SearchRoot::Marking(_) => Vec::new(),
        })
    }

    fn label(&self, node: &SearchRoot) -> String {
        match node {
            SearchRoot::State(n) => n.clone(),
            SearchRoot::Marking(m) => m.to_string(),
        }
    }

    fn is_final(&self, _node: &SearchRoot) -> bool {
        false
    }
}

pub fn labels(path: &[Edge]) -> Vec<&str> {
    path.iter().map(|e| e.label.as_str()).collect()
}

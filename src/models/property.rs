use std::collections::BTreeMap;
use std::fmt;

use serde::{ Deserialize, Serialize };

/// A property to check against a transition system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    #[serde(alias = "property_id")]
    pub id: String,
    #[serde(alias = "property_type")]
    pub kind: PropertyKind,
    #[serde(default)]
    pub description: String,
    /// Regex over state labels, or a literal state name for reachability
    #[serde(default)]
    pub formal_spec: String,
    /// Only consulted by the theorem prover
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal_formula: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl PropertySpec {
    pub fn new(id: &str, kind: PropertyKind, formal_spec: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            description: String::new(),
            formal_spec: formal_spec.to_string(),
            temporal_formula: None,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_temporal_formula(mut self, formula: &str) -> Self {
        self.temporal_formula = Some(formula.to_string());
        self
    }
}

/// Types of formal properties that can be verified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Safety,       // Nothing bad happens
    Liveness,     // Something good eventually happens
    Reachability, // A named state can be reached
    DeadlockFree, // Every reachable non-final state can move
    Invariant,    // Every reachable state satisfies a predicate
    Temporal,
    Consistency,
    Completeness,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKind::Safety => "safety",
            PropertyKind::Liveness => "liveness",
            PropertyKind::Reachability => "reachability",
            PropertyKind::DeadlockFree => "deadlock_free",
            PropertyKind::Invariant => "invariant",
            PropertyKind::Temporal => "temporal",
            PropertyKind::Consistency => "consistency",
            PropertyKind::Completeness => "completeness",
        };
        write!(f, "{}", name)
    }
}

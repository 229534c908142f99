use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{ Deserialize, Serialize };

use crate::errors::VeritasResult;
use crate::models::property::PropertySpec;

/// Tagged model description produced by an external authoring tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    pub model_id: String,
    /// Kept as text so unknown kinds surface as builder errors
    pub model_type: String,
    #[serde(default)]
    pub elements: serde_json::Value,
}

impl ModelDocument {
    pub fn new(model_id: &str, model_type: &str, elements: serde_json::Value) -> Self {
        Self {
            model_id: model_id.to_string(),
            model_type: model_type.to_string(),
            elements,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateMachineElements {
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub initial_state: Option<String>,
    #[serde(default)]
    pub final_states: Vec<String>,
    #[serde(default)]
    pub transitions: Vec<TransitionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitionRecord {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub event: String,
    #[serde(default = "default_condition")]
    pub condition: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PetriNetElements {
    #[serde(default)]
    pub places: Vec<String>,
    #[serde(default)]
    pub transitions: Vec<String>,
    #[serde(default)]
    pub arcs: Vec<ArcRecord>,
    #[serde(default)]
    pub initial_marking: BTreeMap<String, u32>,
    #[serde(default)]
    pub final_markings: Vec<BTreeMap<String, u32>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArcRecord {
    pub from: String,
    pub to: String,
    #[serde(default = "default_arc_weight")]
    pub weight: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnifiedStsElements {
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub relations: Vec<RelationRecord>,
    #[serde(default)]
    pub initial_states: Vec<String>,
    #[serde(default)]
    pub final_states: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationRecord {
    pub from_state: String,
    pub to_state: String,
    #[serde(default)]
    pub event: String,
    #[serde(default = "default_relation_weight")]
    pub weight: f64,
}

fn default_condition() -> String {
    "true".to_string()
}

fn default_arc_weight() -> u32 {
    1
}

fn default_relation_weight() -> f64 {
    1.0
}

/// Read a document, as JSON for `.json` files and YAML otherwise
pub fn load_document<T: DeserializeOwned>(path: &Path) -> VeritasResult<T> {
    let contents = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        Ok(serde_json::from_str(&contents)?)
    } else {
        Ok(serde_yaml::from_str(&contents)?)
    }
}

pub fn load_model(path: &Path) -> VeritasResult<ModelDocument> {
    load_document(path)
}

pub fn load_properties(path: &Path) -> VeritasResult<Vec<PropertySpec>> {
    load_document(path)
}

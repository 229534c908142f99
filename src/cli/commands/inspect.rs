use anyhow::{ Context, Result };
use serde_json::json;
use std::path::Path;

use crate::cli::ui;
use veritas::implementations::theorem_prover::extract_axioms;
use veritas::models::document::load_model;
use veritas::{ build_transition_system, StateSpace };

/// Model inspection command
pub fn execute(model_path: &Path, output_format: &str) -> Result<()> {
    let model = load_model(model_path).with_context(|| {
        format!("Failed to load model from {}", model_path.display())
    })?;
    let system = build_transition_system(&model).with_context(|| {
        format!("Failed to build model {}", model.model_id)
    })?;
    let roots = system.roots();
    let axioms = extract_axioms(&system);

    if output_format.eq_ignore_ascii_case("json") {
        let root_labels: Vec<String> = roots
            .as_ref()
            .map(|roots| roots.iter().map(|r| system.label(r)).collect())
            .unwrap_or_default();
        let document = json!({
            "model_id": system.model_id,
            "kind": system.kind,
            "roots": root_labels,
            "states": system.states,
            "final_states": system.finals,
            "edges": system.edges().collect::<Vec<_>>(),
            "axioms": axioms,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    ui::print_header("Transition System");
    ui::print_result("Model", &system.model_id);
    ui::print_result("Kind", system.kind.as_str());
    match &roots {
        Ok(roots) => {
            let labels: Vec<String> = roots.iter().map(|r| system.label(r)).collect();
            ui::print_result("Roots", &labels.join(", "));
        }
        Err(e) => ui::print_warning(&format!("Roots unresolved: {}", e)),
    }
    if let Some(net) = &system.net {
        ui::print_result("Places", &net.places.join(", "));
        ui::print_result("Transitions", &net.transitions.join(", "));
    } else {
        ui::print_result("States", &system.states.join(", "));
        ui::print_result("Edges", &system.edge_count().to_string());
        for edge in system.edges() {
            println!("  {} -[{}]-> {}", edge.from, edge.label, edge.to);
        }
    }

    ui::print_result("Axioms", &axioms.len().to_string());
    for axiom in &axioms {
        println!("  {}", axiom);
    }
    Ok(())
}

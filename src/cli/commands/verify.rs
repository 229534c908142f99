use anyhow::{ anyhow, Context, Result };
use serde_json::json;
use std::path::Path;

use crate::cli::ui;
use veritas::models::common::VerificationMethod;
use veritas::models::document::{ load_model, load_properties };
use veritas::models::verification::{ VerificationReport, VerificationStatus, Witness };
use veritas::VerificationEngine;

/// Property verification command
pub async fn execute(
    engine: &mut VerificationEngine,
    model_path: &Path,
    properties_path: &Path,
    method_str: &str,
    parallel: bool,
    output_format: &str
) -> Result<()> {
    let as_json = output_format.eq_ignore_ascii_case("json");
    let method = parse_method(method_str)?;

    let model = load_model(model_path).with_context(|| {
        format!("Failed to load model from {}", model_path.display())
    })?;
    let properties = load_properties(properties_path).with_context(|| {
        format!("Failed to load properties from {}", properties_path.display())
    })?;

    if !as_json {
        ui::print_header("Verifying Properties");
        ui::print_info(&format!("Model: {} ({})", model.model_id, model.model_type));
        ui::print_info(&format!("Loaded {} properties", properties.len()));
    }

    let reports = if as_json {
        run(engine, &model, &properties, method, parallel).await
    } else {
        let spinner = ui::exploration_spinner("Exploring state space...");
        let reports = run(engine, &model, &properties, method, parallel).await;
        spinner.finish_with_message("Verification completed!");
        reports
    };
    let summary = VerificationEngine::summary(&reports);

    if as_json {
        let document = json!({ "reports": reports, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    for report in &reports {
        print_report(report);
    }
    ui::print_header("Summary");
    ui::print_text(&summary.to_string());

    if summary.count(VerificationStatus::Satisfied) == summary.total {
        ui::print_success("All properties satisfied");
    }
    Ok(())
}

async fn run(
    engine: &mut VerificationEngine,
    model: &veritas::ModelDocument,
    properties: &[veritas::PropertySpec],
    method: VerificationMethod,
    parallel: bool
) -> Vec<VerificationReport> {
    if parallel {
        engine.batch_verify_parallel(model, properties, method).await
    } else {
        engine.batch_verify(model, properties, method)
    }
}

fn print_report(report: &VerificationReport) {
    println!();
    ui::print_result("Property", &report.property_id);
    ui::print_verification_status(&report.result);
    ui::print_text(&report.details);

    if let Some(counterexample) = &report.counterexample {
        ui::print_result("Counterexample", &ui::format_path(&counterexample.path));
    }
    match &report.witness {
        Some(Witness::Path { path, .. }) => ui::print_result("Witness", &ui::format_path(path)),
        Some(Witness::Proof { proof_steps }) => {
            ui::print_result("Proof sketch", &format!("{} steps", proof_steps.len()));
            for step in proof_steps {
                println!("  • {}", step);
            }
        }
        None => {}
    }
}

fn parse_method(method_str: &str) -> Result<VerificationMethod> {
    match method_str.to_lowercase().replace('_', "-").as_str() {
        "model-checking" | "mc" => Ok(VerificationMethod::ModelChecking),
        "theorem-proving" | "tp" => Ok(VerificationMethod::TheoremProving),
        _ => Err(anyhow!("Unsupported verification method: {}", method_str)),
    }
}

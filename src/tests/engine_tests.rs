#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use log::{ debug, info };
    use serde_json::json;

    use crate::config::VeritasConfig;
    use crate::errors::VeritasResult;
    use crate::implementations::builder::build_transition_system;
    use crate::implementations::engine::{ execute, VerificationEngine };
    use crate::models::common::VerificationMethod;
    use crate::models::document::ModelDocument;
    use crate::models::property::{ PropertyKind, PropertySpec };
    use crate::models::verification::{
        CheckOutcome,
        SummaryEntry,
        SummaryReport,
        VerificationStatus,
        VerificationTask,
        Witness,
    };
    use crate::traits::verification_engine::VerificationBackend;
    use crate::tests::fixtures::{
        canonical_properties,
        deadlock_property,
        login_model,
        safety_property,
        setup,
    };

    const MC: VerificationMethod = VerificationMethod::ModelChecking;

    fn engine() -> VerificationEngine {
        VerificationEngine::new(VeritasConfig::default())
    }

    #[test]
    fn test_batch_verify_login_model() {
        setup();
        let mut engine = engine();
        let reports = engine.batch_verify(&login_model(), &canonical_properties(), MC);

        let results: Vec<VerificationStatus> = reports.iter().map(|r| r.result).collect();
        assert_eq!(
            results,
            vec![
                VerificationStatus::Violated,
                VerificationStatus::Violated,
                VerificationStatus::Satisfied,
                VerificationStatus::Violated
            ]
        );
        assert_eq!(reports[0].task_id, "mc_login_system_safety_no_error");
        assert_eq!(reports[0].property_id, "safety_no_error");

        let summary = VerificationEngine::summary(&reports);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.satisfied, 1);
        assert_eq!(summary.violated, 3);
        assert_eq!(summary.unknown + summary.timeout + summary.errors, 0);
        assert_eq!(engine.history().len(), 4);
        info!("\n{}", summary);
    }

    #[test]
    fn test_verify_is_idempotent() {
        setup();
        let mut engine = engine();
        let model = login_model();
        let first = engine.verify(&model, &safety_property(), MC, Duration::from_secs(30), 100);
        let second = engine.verify(&model, &safety_property(), MC, Duration::from_secs(30), 100);

        assert_eq!(first.result, second.result);
        assert_eq!(first.counterexample, second.counterexample);
        assert_eq!(first.witness, second.witness);
        assert_eq!(first.details, second.details);
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_verify_records_statistics() {
        setup();
        let mut engine = engine();
        let report = engine.verify(&login_model(), &deadlock_property(), MC, Duration::from_secs(30), 100);

        assert_eq!(report.result, VerificationStatus::Violated);
        assert_eq!(report.statistics["model_kind"], json!("state_machine"));
        assert_eq!(report.statistics["max_depth"], json!(100));
        assert!(report.statistics.contains_key("states_explored"));
        assert!(report.execution_time_seconds >= 0.0);
    }

    #[test]
    fn test_zero_timeout_report() {
        setup();
        let mut engine = engine();
        let report = engine.verify(&login_model(), &safety_property(), MC, Duration::ZERO, 100);

        assert_eq!(report.result, VerificationStatus::Timeout);
        assert!(report.counterexample.is_none());
    }

    #[test]
    fn test_expansion_cap_from_config() {
        setup();
        let config = VeritasConfig { max_expansions: Some(0), ..VeritasConfig::default() };
        let mut engine = VerificationEngine::new(config);
        let reports = engine.batch_verify(&login_model(), &[safety_property()], MC);

        assert_eq!(reports[0].result, VerificationStatus::Timeout);
    }

    #[test]
    fn test_unsupported_model_becomes_error_reports() {
        setup();
        let mut engine = engine();
        let model = ModelDocument::new("odd", "markov_chain", json!({}));
        let reports = engine.batch_verify(&model, &canonical_properties(), MC);

        assert_eq!(reports.len(), 4);
        for report in &reports {
            assert_eq!(report.result, VerificationStatus::Error);
            assert!(report.details.contains("Unsupported model kind"), "{}", report.details);
        }
        assert_eq!(reports[1].task_id, "mc_odd_liveness_completion");
        assert_eq!(engine.history_summary().errors, 4);
    }

    #[test]
    fn test_invalid_property_becomes_error_report() {
        setup();
        let mut engine = engine();
        let mut property = safety_property();
        property.formal_spec = String::new();
        let report = engine.verify(&login_model(), &property, MC, Duration::from_secs(5), 100);

        assert_eq!(report.result, VerificationStatus::Error);
        assert!(report.details.starts_with("Verification failed:"));
    }

    #[test]
    fn test_theorem_proving_through_engine() {
        setup();
        let mut engine = engine();
        let reports = engine.batch_verify(&login_model(), &canonical_properties(), VerificationMethod::TheoremProving);

        assert_eq!(reports[0].task_id, "tp_login_system_safety_no_error");
        assert_eq!(reports[0].result, VerificationStatus::Satisfied);
        assert!(matches!(reports[0].witness, Some(Witness::Proof { .. })));
        assert_eq!(reports[2].result, VerificationStatus::Unknown);
        assert!(reports.iter().all(|r| r.result != VerificationStatus::Violated));
    }

    #[test]
    fn test_history_and_clear() {
        setup();
        let mut engine = engine();
        engine.verify(&login_model(), &safety_property(), MC, Duration::from_secs(5), 100);
        engine.batch_verify(&login_model(), &[deadlock_property()], MC);

        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.history_summary().violated, 2);

        engine.clear_history();
        assert!(engine.history().is_empty());
        assert_eq!(engine.history_summary().total, 0);
    }

    #[test]
    fn test_report_serialization() {
        setup();
        let mut engine = engine();
        let report = engine.verify(&login_model(), &safety_property(), MC, Duration::from_secs(5), 100);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["result"], json!("violated"));
        assert_eq!(value["counterexample"]["violating_state"], json!("error"));
        assert_eq!(value["counterexample"]["path"][0]["guard_or_weight"], json!("true"));
        assert!(value.get("witness").is_none());
        debug!("{}", value);
    }

    #[test]
    fn test_empty_summary() {
        setup();
        let summary = VerificationEngine::summary(&[]);

        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_time_seconds, 0.0);
        let rendered = summary.to_string();
        assert!(rendered.contains("Total tasks: 0"));
        assert!(rendered.contains("(0.0%)"));
    }

    #[test]
    fn test_summary_rendering() {
        setup();
        let summary = SummaryReport {
            total: 2,
            satisfied: 1,
            violated: 0,
            unknown: 0,
            timeout: 1,
            errors: 0,
            total_time_seconds: 1.5,
            average_time_seconds: 0.75,
            entries: vec![
                SummaryEntry {
                    task_id: "mc_m_p1".to_string(),
                    result: VerificationStatus::Satisfied,
                    execution_time_seconds: 0.5,
                    details: "x".repeat(150),
                    has_counterexample: false,
                    has_witness: true,
                },
                SummaryEntry {
                    task_id: "mc_m_p2".to_string(),
                    result: VerificationStatus::Timeout,
                    execution_time_seconds: 1.0,
                    details: "budget".to_string(),
                    has_counterexample: false,
                    has_witness: false,
                }
            ],
        };
        let rendered = summary.to_string();

        assert!(rendered.contains("✅ satisfied: 1 (50.0%)"));
        assert!(rendered.contains("⏱ timeout: 1 (50.0%)"));
        assert!(rendered.contains("1. ✅ mc_m_p1: satisfied"));
        assert!(rendered.contains(&format!("details: {}...", "x".repeat(100))));
        assert!(!rendered.contains(&"x".repeat(101)));
        assert!(rendered.contains("witness: present"));
    }

    #[tokio::test]
    async fn test_parallel_batch_matches_sequential() {
        setup();
        let config = VeritasConfig { parallel_jobs: 2, ..VeritasConfig::default() };
        let mut engine = VerificationEngine::new(config);
        let model = login_model();
        let properties = canonical_properties();

        let sequential = engine.batch_verify(&model, &properties, MC);
        let parallel = engine.batch_verify_parallel(&model, &properties, MC).await;

        assert_eq!(parallel.len(), sequential.len());
        for (p, s) in parallel.iter().zip(&sequential) {
            assert_eq!(p.task_id, s.task_id);
            assert_eq!(p.result, s.result);
            assert_eq!(p.counterexample, s.counterexample);
            assert_eq!(p.witness, s.witness);
        }
        assert_eq!(engine.history().len(), 8);
    }

    #[tokio::test]
    async fn test_parallel_batch_with_broken_model() {
        setup();
        let mut engine = engine();
        let model = ModelDocument::new("broken", "state_machine", json!({"states": []}));
        let reports = engine.batch_verify_parallel(&model, &canonical_properties(), MC).await;

        assert_eq!(reports.len(), 4);
        assert!(reports.iter().all(|r| r.result == VerificationStatus::Error));
    }

    struct Exploding;

    impl VerificationBackend for Exploding {
        fn method(&self) -> VerificationMethod {
            MC
        }

        fn run(&self, _task: &VerificationTask) -> VeritasResult<CheckOutcome> {
            panic!("state space exploded");
        }
    }

    #[test]
    fn test_backend_panic_becomes_error_report() {
        setup();
        let system = build_transition_system(&login_model()).unwrap();
        let task = VerificationTask {
            task_id: "mc_login_system_safety_no_error".to_string(),
            model: Arc::new(system),
            property: safety_property(),
            method: MC,
            limits: VeritasConfig::default().resource_limits(),
        };

        let report = execute(&Exploding, &task);

        assert_eq!(report.result, VerificationStatus::Error);
        assert!(report.details.contains("state space exploded"), "{}", report.details);
        assert_eq!(report.task_id, task.task_id);
    }

    #[test]
    fn test_huge_timeout_runs_normally() {
        setup();
        let mut engine = engine();
        let report = engine.verify(&login_model(), &safety_property(), MC, Duration::from_secs(u64::MAX), 100);

        assert_eq!(report.result, VerificationStatus::Violated);
    }

    #[test]
    fn test_token_overflow_yields_one_error_report_per_property() {
        setup();
        let mut engine = engine();
        let model = ModelDocument::new(
            "source",
            "petri_net",
            json!({
                "places": ["p"],
                "transitions": ["gen"],
                "arcs": [{"from": "gen", "to": "p", "weight": 3_000_000_000u64}],
                "initial_marking": {}
            })
        );
        let properties = vec![
            PropertySpec::new("p7", PropertyKind::Reachability, "p=7"),
            deadlock_property()
        ];

        let reports = engine.batch_verify(&model, &properties, MC);

        assert_eq!(reports.len(), 2);
        for report in &reports {
            assert_eq!(report.result, VerificationStatus::Error);
            assert!(report.details.contains("overflow"), "{}", report.details);
        }
    }
}

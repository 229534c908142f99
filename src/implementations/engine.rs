use std::any::Any;
use std::panic::{ self, AssertUnwindSafe };
use std::sync::Arc;
use std::time::{ Duration, Instant };

use chrono::{ DateTime, Utc };
use log::{ error, info, warn };
use tokio::sync::Semaphore;

use crate::config::VeritasConfig;
use crate::errors::{ VeritasError, VeritasResult };
use crate::implementations::builder::build_transition_system;
use crate::implementations::model_checker::ModelChecker;
use crate::implementations::theorem_prover::TheoremProver;
use crate::models::common::{ ResourceLimits, VerificationMethod };
use crate::models::document::ModelDocument;
use crate::models::property::PropertySpec;
use crate::models::transition_system::TransitionSystem;
use crate::models::verification::{
    CheckOutcome,
    SummaryEntry,
    SummaryReport,
    VerificationReport,
    VerificationStatus,
    VerificationTask,
};
use crate::traits::verification_engine::VerificationBackend;

/// Public entry point: runs verification tasks and keeps the session history
pub struct VerificationEngine {
    config: VeritasConfig,
    model_checker: Arc<ModelChecker>,
    theorem_prover: Arc<TheoremProver>,
    verification_history: Vec<VerificationReport>,
}

impl VerificationEngine {
    pub fn new(config: VeritasConfig) -> Self {
        Self {
            model_checker: Arc::new(ModelChecker::new(&config)),
            theorem_prover: Arc::new(TheoremProver::new()),
            config,
            verification_history: Vec::new(),
        }
    }

    pub fn config(&self) -> &VeritasConfig {
        &self.config
    }

    fn backend(&self, method: VerificationMethod) -> Arc<dyn VerificationBackend> {
        match method {
            VerificationMethod::ModelChecking => self.model_checker.clone(),
            VerificationMethod::TheoremProving => self.theorem_prover.clone(),
        }
    }

    /// Verify a single property. Never fails: problems come back as `Error` reports.
    pub fn verify(
        &mut self,
        model: &ModelDocument,
        property: &PropertySpec,
        method: VerificationMethod,
        timeout: Duration,
        max_depth: usize
    ) -> VerificationReport {
        let limits = ResourceLimits {
            timeout: Some(timeout),
            max_depth,
            max_expansions: self.config.max_expansions,
        };
        let system = build_transition_system(model).map(Arc::new);
        let report = self.run_one(model, &system, property, method, limits);
        self.verification_history.push(report.clone());
        report
    }

    /// Verify each property in order with the configured default limits.
    /// Always returns one report per property.
    pub fn batch_verify(
        &mut self,
        model: &ModelDocument,
        properties: &[PropertySpec],
        method: VerificationMethod
    ) -> Vec<VerificationReport> {
        info!("Batch verifying {} properties of '{}'", properties.len(), model.model_id);
        let system = build_transition_system(model).map(Arc::new);
        let limits = self.config.resource_limits();

        let reports: Vec<VerificationReport> = properties
            .iter()
            .map(|property| self.run_one(model, &system, property, method, limits.clone()))
            .collect();
        self.verification_history.extend(reports.iter().cloned());
        reports
    }

    /// Like `batch_verify`, but tasks run on blocking worker threads, at most
    /// `parallel_jobs` at a time. Reports keep the input order.
    pub async fn batch_verify_parallel(
        &mut self,
        model: &ModelDocument,
        properties: &[PropertySpec],
        method: VerificationMethod
    ) -> Vec<VerificationReport> {
        info!(
            "Parallel batch verifying {} properties of '{}' with {} workers",
            properties.len(),
            model.model_id,
            self.config.parallel_jobs
        );
        let limits = self.config.resource_limits();
        let system = match build_transition_system(model) {
            Ok(system) => Arc::new(system),
            Err(e) => {
                let failed = Err(e);
                let reports: Vec<VerificationReport> = properties
                    .iter()
                    .map(|property| self.run_one(model, &failed, property, method, limits.clone()))
                    .collect();
                self.verification_history.extend(reports.iter().cloned());
                return reports;
            }
        };

        let semaphore = Arc::new(Semaphore::new(self.config.parallel_jobs.max(1)));
        let backend = self.backend(method);
        let mut pending = Vec::with_capacity(properties.len());

        for property in properties {
            let task = make_task(model, system.clone(), property, method, limits.clone());
            let permit = semaphore.clone().acquire_owned().await.ok();
            let backend = backend.clone();
            let task_id = task.task_id.clone();
            let timestamp = Utc::now();
            let started = Instant::now();
            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                execute(backend.as_ref(), &task)
            });
            pending.push((task_id, property.id.clone(), timestamp, started, handle));
        }

        let mut reports = Vec::with_capacity(pending.len());
        for (task_id, property_id, timestamp, started, handle) in pending {
            let report = match handle.await {
                Ok(report) => report,
                Err(e) => {
                    let failure = VeritasError::Internal(format!("verification worker failed: {}", e));
                    finish(task_id, property_id, timestamp, started, Err(failure))
                }
            };
            reports.push(report);
        }
        self.verification_history.extend(reports.iter().cloned());
        reports
    }

    fn run_one(
        &self,
        model: &ModelDocument,
        system: &VeritasResult<Arc<TransitionSystem>>,
        property: &PropertySpec,
        method: VerificationMethod,
        limits: ResourceLimits
    ) -> VerificationReport {
        match system {
            Ok(system) => {
                let task = make_task(model, system.clone(), property, method, limits);
                execute(self.backend(method).as_ref(), &task)
            }
            Err(e) => {
                warn!("Model '{}' could not be built: {}", model.model_id, e);
                let outcome = CheckOutcome::new(e.status(), format!("Verification failed: {}", e));
                finish(task_id(method, model, property), property.id.clone(), Utc::now(), Instant::now(), Ok(outcome))
            }
        }
    }

    /// Read-only reduction over completed reports
    pub fn summary(reports: &[VerificationReport]) -> SummaryReport {
        let count = |status: VerificationStatus| reports
            .iter()
            .filter(|r| r.result == status)
            .count();
        let total_time: f64 = reports
            .iter()
            .map(|r| r.execution_time_seconds)
            .sum();

        SummaryReport {
            total: reports.len(),
            satisfied: count(VerificationStatus::Satisfied),
            violated: count(VerificationStatus::Violated),
            unknown: count(VerificationStatus::Unknown),
            timeout: count(VerificationStatus::Timeout),
            errors: count(VerificationStatus::Error),
            total_time_seconds: total_time,
            average_time_seconds: if reports.is_empty() {
                0.0
            } else {
                total_time / (reports.len() as f64)
            },
            entries: reports
                .iter()
                .map(|r| SummaryEntry {
                    task_id: r.task_id.clone(),
                    result: r.result,
                    execution_time_seconds: r.execution_time_seconds,
                    details: r.details.clone(),
                    has_counterexample: r.counterexample.is_some(),
                    has_witness: r.witness.is_some(),
                })
                .collect(),
        }
    }

    pub fn history(&self) -> &[VerificationReport] {
        &self.verification_history
    }

    pub fn history_summary(&self) -> SummaryReport {
        Self::summary(&self.verification_history)
    }

    pub fn clear_history(&mut self) {
        self.verification_history.clear();
    }
}

fn task_id(method: VerificationMethod, model: &ModelDocument, property: &PropertySpec) -> String {
    format!("{}_{}_{}", method.task_prefix(), model.model_id, property.id)
}

fn make_task(
    model: &ModelDocument,
    system: Arc<TransitionSystem>,
    property: &PropertySpec,
    method: VerificationMethod,
    limits: ResourceLimits
) -> VerificationTask {
    VerificationTask {
        task_id: task_id(method, model, property),
        model: system,
        property: property.clone(),
        method,
        limits,
    }
}

/// Run one task on `backend` and wrap the outcome into a report
pub fn execute(backend: &dyn VerificationBackend, task: &VerificationTask) -> VerificationReport {
    info!("Starting verification: {} ({})", task.property.id, backend.method());
    let timestamp = Utc::now();
    let started = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| backend.run(task))).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        Err(VeritasError::Internal(format!("verification backend panicked: {}", message)))
    });
    finish(task.task_id.clone(), task.property.id.clone(), timestamp, started, outcome)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

fn finish(
    task_id: String,
    property_id: String,
    timestamp: DateTime<Utc>,
    started: Instant,
    outcome: VeritasResult<CheckOutcome>
) -> VerificationReport {
    let outcome = outcome.unwrap_or_else(|e| {
        if e.is_input_error() {
            warn!("Task {} failed: {}", task_id, e);
        } else {
            error!("Task {} failed: {}", task_id, e);
        }
        CheckOutcome::new(e.status(), format!("Verification failed: {}", e))
    });
    let execution_time_seconds = started.elapsed().as_secs_f64();
    if outcome.status == VerificationStatus::Timeout {
        warn!("Task {} timed out after {:.3}s", task_id, execution_time_seconds);
    }
    info!(
        "Verification finished: {} -> {} in {:.3}s",
        property_id,
        outcome.status,
        execution_time_seconds
    );

    VerificationReport {
        task_id,
        property_id,
        result: outcome.status,
        execution_time_seconds,
        details: outcome.details,
        counterexample: outcome.counterexample,
        witness: outcome.witness,
        statistics: outcome.statistics,
        timestamp,
    }
}

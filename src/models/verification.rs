use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

use crate::models::common::{ ResourceLimits, VerificationMethod };
use crate::models::property::PropertySpec;
use crate::models::transition_system::{ Edge, TransitionSystem };

/// Status of a verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Satisfied, // Property holds within the bound
    Violated,  // Property fails, usually with a counterexample
    Unknown,   // Bound exhausted without a verdict
    Timeout,   // Deadline or expansion budget exceeded
    Error,     // Malformed input or internal failure
}

impl VerificationStatus {
    /// Display marker used by the summary rendering
    pub fn marker(&self) -> &'static str {
        match self {
            VerificationStatus::Satisfied => "✅",
            VerificationStatus::Violated => "❌",
            VerificationStatus::Unknown => "❓",
            VerificationStatus::Timeout => "⏱",
            VerificationStatus::Error => "⚠️",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationStatus::Satisfied => write!(f, "satisfied"),
            VerificationStatus::Violated => write!(f, "violated"),
            VerificationStatus::Unknown => write!(f, "unknown"),
            VerificationStatus::Timeout => write!(f, "timeout"),
            VerificationStatus::Error => write!(f, "error"),
        }
    }
}

/// Path from a root to the state that breaks the property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counterexample {
    pub path: Vec<Edge>,
    pub violating_state: String,
}

/// Evidence that a property holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Witness {
    Path {
        path: Vec<Edge>,
        target_state: String,
    },
    Proof {
        proof_steps: Vec<String>,
    },
}

/// One unit of work, executed exactly once
#[derive(Debug, Clone)]
pub struct VerificationTask {
    pub task_id: String,
    pub model: Arc<TransitionSystem>,
    pub property: PropertySpec,
    pub method: VerificationMethod,
    pub limits: ResourceLimits,
}

/// What a backend decided, before the engine adds timing and identity
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub status: VerificationStatus,
    pub details: String,
    pub counterexample: Option<Counterexample>,
    pub witness: Option<Witness>,
    pub statistics: BTreeMap<String, serde_json::Value>,
}

impl CheckOutcome {
    pub fn new(status: VerificationStatus, details: impl Into<String>) -> Self {
        Self {
            status,
            details: details.into(),
            counterexample: None,
            witness: None,
            statistics: BTreeMap::new(),
        }
    }

    pub fn with_counterexample(mut self, counterexample: Counterexample) -> Self {
        self.counterexample = Some(counterexample);
        self
    }

    pub fn with_witness(mut self, witness: Witness) -> Self {
        self.witness = Some(witness);
        self
    }
}

/// The single output contract of the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub task_id: String,
    pub property_id: String,
    pub result: VerificationStatus,
    pub execution_time_seconds: f64,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterexample: Option<Counterexample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witness: Option<Witness>,
    pub statistics: BTreeMap<String, serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate view over a set of completed reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub total: usize,
    pub satisfied: usize,
    pub violated: usize,
    pub unknown: usize,
    pub timeout: usize,
    pub errors: usize,
    pub total_time_seconds: f64,
    pub average_time_seconds: f64,
    pub entries: Vec<SummaryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub task_id: String,
    pub result: VerificationStatus,
    pub execution_time_seconds: f64,
    pub details: String,
    pub has_counterexample: bool,
    pub has_witness: bool,
}

impl SummaryReport {
    pub fn count(&self, status: VerificationStatus) -> usize {
        match status {
            VerificationStatus::Satisfied => self.satisfied,
            VerificationStatus::Violated => self.violated,
            VerificationStatus::Unknown => self.unknown,
            VerificationStatus::Timeout => self.timeout,
            VerificationStatus::Error => self.errors,
        }
    }

    fn percentage(&self, count: usize) -> f64 {
        if self.total == 0 { 0.0 } else { (count as f64 / self.total as f64) * 100.0 }
    }
}

const DETAIL_PREVIEW_CHARS: usize = 100;

fn preview(details: &str) -> String {
    if details.chars().count() > DETAIL_PREVIEW_CHARS {
        let head: String = details.chars().take(DETAIL_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        details.to_string()
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Verification Summary")?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "Total tasks: {}", self.total)?;
        for status in [
            VerificationStatus::Satisfied,
            VerificationStatus::Violated,
            VerificationStatus::Unknown,
            VerificationStatus::Timeout,
            VerificationStatus::Error,
        ] {
            let count = self.count(status);
            writeln!(
                f,
                "{} {}: {} ({:.1}%)",
                status.marker(),
                status,
                count,
                self.percentage(count)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Total execution time: {:.3}s", self.total_time_seconds)?;
        writeln!(f, "Average execution time: {:.3}s", self.average_time_seconds)?;

        if !self.entries.is_empty() {
            writeln!(f)?;
            writeln!(f, "Results:")?;
        }
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(
                f,
                "{}. {} {}: {}",
                i + 1,
                entry.result.marker(),
                entry.task_id,
                entry.result
            )?;
            writeln!(f, "   time: {:.3}s", entry.execution_time_seconds)?;
            writeln!(f, "   details: {}", preview(&entry.details))?;
            if entry.has_counterexample {
                writeln!(f, "   counterexample: present")?;
            }
            if entry.has_witness {
                writeln!(f, "   witness: present")?;
            }
        }
        Ok(())
    }
}

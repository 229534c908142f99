use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{ Deserialize, Serialize };

use crate::errors::{ VeritasError, VeritasResult };

/// Supported model shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    StateMachine,
    PetriNet,
    UnifiedSts,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::StateMachine => "state_machine",
            ModelKind::PetriNet => "petri_net",
            ModelKind::UnifiedSts => "unified_sts",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = VeritasError;

    fn from_str(s: &str) -> VeritasResult<Self> {
        match s {
            "state_machine" => Ok(ModelKind::StateMachine),
            "petri_net" => Ok(ModelKind::PetriNet),
            "unified_sts" => Ok(ModelKind::UnifiedSts),
            other => Err(VeritasError::UnsupportedModelKind(other.to_string())),
        }
    }
}

/// How a property gets decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    ModelChecking,
    TheoremProving,
}

impl VerificationMethod {
    /// Prefix used when deriving task ids
    pub fn task_prefix(&self) -> &'static str {
        match self {
            VerificationMethod::ModelChecking => "mc",
            VerificationMethod::TheoremProving => "tp",
        }
    }
}

impl fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationMethod::ModelChecking => write!(f, "model_checking"),
            VerificationMethod::TheoremProving => write!(f, "theorem_proving"),
        }
    }
}

/// Interpretation of a liveness search that exhausts its bound without reaching the target.
///
/// `BoundedNonReachabilityIsViolation` treats "not reachable within the bound" as a
/// liveness violation. This is only sound for acyclic or fairness-free approximations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LivenessPolicy {
    BoundedNonReachabilityIsViolation,
    BoundedNonReachabilityIsUnknown,
}

/// Resource limits for a single verification task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLimits {
    pub timeout: Option<Duration>,
    pub max_depth: usize,
    pub max_expansions: Option<usize>,
}

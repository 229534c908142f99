use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{ debug, info };
use serde::{ Deserialize, Serialize };
use thiserror::Error;

use crate::models::common::{ LivenessPolicy, ResourceLimits };

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Configuration for the Veritas engine
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct VeritasConfig {
    /// Wall-clock budget per task when the caller does not give one
    pub default_timeout_secs: u64,

    /// Depth bound per task when the caller does not give one
    pub default_max_depth: usize,

    /// Modulus K for the liveness search's `(state, depth mod K)` revisit keys
    pub liveness_revisit_modulus: usize,

    /// How liveness interprets an exhausted search without a match
    pub liveness_policy: LivenessPolicy,

    /// Optional cap on node expansions per task; exceeding it is a timeout
    pub max_expansions: Option<usize>,

    /// Worker bound for parallel batch verification
    pub parallel_jobs: usize,
}

impl Default for VeritasConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 60,
            default_max_depth: 100,
            liveness_revisit_modulus: 10,
            liveness_policy: LivenessPolicy::BoundedNonReachabilityIsViolation,
            max_expansions: None,
            parallel_jobs: 4,
        }
    }
}

impl VeritasConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: VeritasConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Defaults, then the optional YAML file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `VERITAS_*` overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        if let Some(value) = lookup("VERITAS_MAX_DEPTH") {
            debug!("Overriding default_max_depth from environment");
            self.default_max_depth = parse_env("VERITAS_MAX_DEPTH", &value)?;
        }
        if let Some(value) = lookup("VERITAS_TIMEOUT_SECS") {
            debug!("Overriding default_timeout_secs from environment");
            self.default_timeout_secs = parse_env("VERITAS_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("VERITAS_PARALLEL_JOBS") {
            debug!("Overriding parallel_jobs from environment");
            self.parallel_jobs = parse_env("VERITAS_PARALLEL_JOBS", &value)?;
        }
        Ok(self)
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    /// Resource limits a task runs under when the caller leaves them to the engine
    pub fn resource_limits(&self) -> ResourceLimits {
        ResourceLimits {
            timeout: Some(self.default_timeout()),
            max_depth: self.default_max_depth,
            max_expansions: self.max_expansions,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

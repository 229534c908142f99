use thiserror::Error;

use crate::config::ConfigError;
use crate::models::verification::VerificationStatus;

/// Custom error types for the Veritas engine
#[derive(Debug, Error)]
pub enum VeritasError {
    #[error("Unsupported model kind: {0}")]
    UnsupportedModelKind(String),

    #[error("Malformed model: {0}")]
    MalformedModel(String),

    #[error("Cannot resolve initial state: {0}")]
    UnresolvedInitialState(String),

    #[error("Invalid property: {0}")]
    InvalidProperty(String),

    #[error("Token count overflow: {0}")]
    TokenOverflow(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VeritasError {
    /// The report status an error surfaces as at the engine boundary
    pub fn status(&self) -> VerificationStatus {
        VerificationStatus::Error
    }

    /// True for errors caused by the caller's model or property rather than the engine
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            VeritasError::UnsupportedModelKind(_)
                | VeritasError::MalformedModel(_)
                | VeritasError::UnresolvedInitialState(_)
                | VeritasError::InvalidProperty(_)
                | VeritasError::TokenOverflow(_)
        )
    }
}

/// Result type specific to Veritas operations
pub type VeritasResult<T> = Result<T, VeritasError>;

pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod implementations;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::{ ConfigError, VeritasConfig };
pub use errors::{ VeritasError, VeritasResult };
pub use implementations::builder::build_transition_system;
pub use implementations::engine::VerificationEngine;
pub use implementations::model_checker::ModelChecker;
pub use implementations::theorem_prover::{ ProofStrategy, TheoremProver };
pub use models::{
    common::{
        LivenessPolicy,
        ModelKind,
        ResourceLimits,
        VerificationMethod,
    },
    document::ModelDocument,
    property::{
        PropertyKind,
        PropertySpec,
    },
    transition_system::{
        Edge,
        EdgeAnnotation,
        Marking,
        SearchRoot,
        TransitionSystem,
    },
    verification::{
        Counterexample,
        SummaryReport,
        VerificationReport,
        VerificationStatus,
        VerificationTask,
        Witness,
    },
};
pub use traits::{
    StateSpace,
    VerificationBackend,
};

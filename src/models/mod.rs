pub mod common;
pub mod document;
pub mod property;
pub mod transition_system;
pub mod verification;

// Re-export common model types
pub use common::{ LivenessPolicy, ModelKind, ResourceLimits, VerificationMethod };
pub use document::ModelDocument;
pub use property::{ PropertyKind, PropertySpec };
pub use transition_system::{ Edge, EdgeAnnotation, Marking, PetriNet, SearchRoot, TransitionSystem };
pub use verification::{
    CheckOutcome,
    Counterexample,
    SummaryReport,
    VerificationReport,
    VerificationStatus,
    VerificationTask,
    Witness,
};

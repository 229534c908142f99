pub mod state_space;
pub mod verification_engine;

// Re-export traits
pub use state_space::StateSpace;
pub use verification_engine::VerificationBackend;

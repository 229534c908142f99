pub mod builder;
pub mod engine;
pub mod explorer;
pub mod model_checker;
pub mod pattern;
pub mod theorem_prover;

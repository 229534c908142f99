pub mod fixtures;

mod builder_tests;
mod engine_tests;

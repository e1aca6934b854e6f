// ABOUTME: Statistics module
// ABOUTME: Fail-soft team dashboard aggregation and project progress

pub mod engine;
pub mod types;


pub use engine::*;
pub use types::*;

// ABOUTME: Core types and utilities for Cadence
// ABOUTME: Foundational package providing typed identifiers and shared constants

pub mod constants;
pub mod ids;

// Re-export main types
pub use constants::{cadence_dir, database_file};
pub use ids::{EntityId, InvalidEntityId, ENTITY_ID_LEN};

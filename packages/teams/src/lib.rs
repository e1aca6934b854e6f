// ABOUTME: Team management module
// ABOUTME: Team CRUD storage and the lead-gated membership manager

pub mod membership;
pub mod storage;
pub mod types;

#[cfg(test)]
mod membership_test;

pub use membership::*;
pub use storage::*;
pub use types::*;

// ABOUTME: Sprint management module
// ABOUTME: Sprint CRUD and the denormalized per-sprint task summary

pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_test;

pub use storage::*;
pub use types::*;

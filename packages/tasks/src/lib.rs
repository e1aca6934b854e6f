// ABOUTME: Task management module
// ABOUTME: Task storage, cross-reference guards, and the lifecycle engine

pub mod guard;
pub mod lifecycle;
pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_test;

pub use lifecycle::*;
pub use storage::*;
pub use types::*;

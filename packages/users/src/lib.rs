// ABOUTME: User account management module
// ABOUTME: Provides types and storage for users, including team membership writes

pub mod storage;
pub mod types;


pub use storage::*;
pub use types::*;

// ABOUTME: Project management module
// ABOUTME: Project CRUD, lead-scoped queries, and atomic team moves

pub mod storage;
pub mod types;


pub use storage::*;
pub use types::*;

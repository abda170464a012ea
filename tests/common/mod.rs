//! Common test utilities shared across test types
//!
//! - `mocks.rs` - In-memory implementations of the port traits
//! - `git_repo.rs` - Temporary git working copy with a bare remote

pub mod mocks;

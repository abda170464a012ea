//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `git/` - Publishing through git (stage, commit, pull, push)
//! - `process/` - Producers run as child processes with atomic staging
//! - `fs/` - Run lock, stop requests and run history under `.statsync/`
//! - `clock` - Pacing between units

pub mod clock;
pub mod fs;
pub mod git;
pub mod process;

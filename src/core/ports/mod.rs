//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the orchestration logic
//! and external systems (producer processes, git, the clock).
//!
//! Implementations live in the `adapters` module.

mod pacer;
mod producer;
mod vcs;

pub use pacer::{Pacer, StopSignal};
pub use producer::Producer;
pub use vcs::VersionControl;

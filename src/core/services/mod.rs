//! Business logic services
//!
//! Orchestration logic that talks to the outside world only through the
//! port traits.
//!
//! - [`orchestrator`] - Sequential batch driver
//! - [`publisher`] - Publish state machine

pub mod orchestrator;
pub mod publisher;

pub use orchestrator::Orchestrator;
pub use publisher::{publish, successful_artifacts};

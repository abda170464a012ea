//! Producer port
//!
//! Defines the interface for running the external program that computes a
//! work unit's artifacts.

use crate::core::models::WorkUnit;

/// Runs the producer for one work unit
///
/// `Ok(())` means the producer signalled success and its artifacts are in
/// place. Any `Err` is a producer failure: the orchestrator records it and
/// moves on, so the error only needs to be good enough to log.
pub trait Producer {
    /// Run the producer for `unit`, blocking until it exits
    fn produce(&self, unit: &WorkUnit) -> anyhow::Result<()>;
}

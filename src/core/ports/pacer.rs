//! Pacing and cancellation ports
//!
//! The orchestrator never sleeps or polls the filesystem directly; it asks
//! these traits, so tests can run a 30-unit batch instantly.

use std::time::Duration;

/// Waits between work units
pub trait Pacer {
    /// Block for `delay`
    fn pause(&self, delay: Duration);
}

/// Tells the orchestrator that the operator wants the run to stop
pub trait StopSignal {
    /// Whether a stop was requested; checked before each unit
    fn stop_requested(&self) -> bool;
}

//! Batch refresh orchestration
//!
//! Runs every declared work unit exactly once, in declared order, one at a
//! time. A failing producer is recorded and the batch moves on; only an
//! unusable unit list stops the run before it starts.

use std::time::{Duration, Instant};

use chrono::Utc;
use log::{info, warn};

use crate::core::models::{BatchRun, UnitOutcome, WorkUnit, validate_units};
use crate::core::ports::{Pacer, Producer, StopSignal};
use crate::error::RefreshError;

/// Sequential, failure-tolerant batch driver
pub struct Orchestrator<'a> {
    producer: &'a dyn Producer,
    pacer: &'a dyn Pacer,
    stop: &'a dyn StopSignal,
    delay: Duration,
}

impl std::fmt::Debug for Orchestrator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator").field("delay", &self.delay).finish_non_exhaustive()
    }
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator that waits `delay` between units
    #[must_use]
    pub const fn new(
        producer: &'a dyn Producer,
        pacer: &'a dyn Pacer,
        stop: &'a dyn StopSignal,
        delay: Duration,
    ) -> Self {
        Self {
            producer,
            pacer,
            stop,
            delay,
        }
    }

    /// Attempt every unit in order and return the finished run
    ///
    /// The run's mode is taken from the first unit. The inter-unit delay is
    /// applied between units whatever the previous outcome was, and a stop
    /// request is honoured only between units.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Configuration`] for an empty or duplicate unit
    /// list; no producer is invoked in that case.
    pub fn run(&self, units: &[WorkUnit]) -> Result<BatchRun, RefreshError> {
        validate_units(units)?;

        let mode = units[0].mode;
        let total = units.len();
        let mut run = BatchRun::new(mode, units);
        run.begin()?;
        info!("Starting {mode} batch of {total} unit(s)");

        for (index, unit) in units.iter().enumerate() {
            // Checked on both sides of the pause so a stop never waits out the delay
            let mut stop = self.stop.stop_requested();
            if !stop && index > 0 && !self.delay.is_zero() {
                self.pacer.pause(self.delay);
                stop = self.stop.stop_requested();
            }

            if stop {
                info!("Stop requested, {} unit(s) left unattempted", total - index);
                run.cancel()?;
                return Ok(run);
            }

            info!("[{}/{total}] {} ({})", index + 1, unit.name, unit.mode);
            let started_at = Utc::now();
            let clock = Instant::now();

            let outcome = match self.producer.produce(unit) {
                Ok(()) => UnitOutcome::Success,
                Err(e) => {
                    warn!("{} failed: {e:#}", unit.name);
                    UnitOutcome::Failed
                },
            };

            let elapsed = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
            run.record(index, outcome, started_at, elapsed);
        }

        run.finish()?;
        info!(
            "Batch finished: {} succeeded, {} failed",
            run.succeeded(),
            run.failed()
        );
        Ok(run)
    }
}

//! Batch run model
//!
//! A [`BatchRun`] is one pass over the declared work units. It starts out
//! `NotStarted`, moves to `Running` when the first unit is attempted, and
//! ends in one of the completed states before (optionally) recording a
//! publish outcome:
//!
//! ```text
//! NotStarted -> Running -> CompletedAllSuccess -> Published
//!                       -> CompletedPartial    -> PublishFailed
//!                       -> Cancelled
//!                       -> AbortedFatal
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PublishRecord, RefreshMode, WorkUnit};
use crate::error::RefreshError;

/// Outcome of a single work unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitOutcome {
    /// Not attempted (yet)
    #[default]
    Pending,
    /// Producer exited with success
    Success,
    /// Producer exited with failure or could not be started
    Failed,
}

impl std::fmt::Display for UnitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Lifecycle state of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Created, no unit attempted
    #[default]
    NotStarted,
    /// Units are being attempted
    Running,
    /// Every unit succeeded
    CompletedAllSuccess,
    /// Every unit was attempted and at least one failed
    CompletedPartial,
    /// Stopped between units on operator request
    Cancelled,
    /// The orchestrator itself could not proceed
    AbortedFatal,
    /// Results were published
    Published,
    /// Publishing failed after fallback
    PublishFailed,
}

impl RunStatus {
    /// Whether moving from `self` to `next` is a legal transition
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::Running | Self::AbortedFatal)
                | (
                    Self::Running,
                    Self::CompletedAllSuccess
                        | Self::CompletedPartial
                        | Self::Cancelled
                        | Self::AbortedFatal
                )
                | (
                    Self::CompletedAllSuccess | Self::CompletedPartial | Self::Cancelled,
                    Self::Published | Self::PublishFailed
                )
        )
    }

    /// Whether all units have been dealt with (attempted, cancelled or aborted)
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::NotStarted | Self::Running)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "not_started",
            Self::Running => "running",
            Self::CompletedAllSuccess => "completed",
            Self::CompletedPartial => "partial",
            Self::Cancelled => "cancelled",
            Self::AbortedFatal => "aborted",
            Self::Published => "published",
            Self::PublishFailed => "publish_failed",
        };
        write!(f, "{s}")
    }
}

/// Per-unit entry in a batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Unit name
    pub name: String,
    /// What happened
    pub outcome: UnitOutcome,
    /// When the producer was started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// How long the producer ran, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// One execution of the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRun {
    /// Refresh mode the units ran in
    pub mode: RefreshMode,
    /// Current lifecycle state
    pub status: RunStatus,
    /// When the run was created
    pub started_at: DateTime<Utc>,
    /// When the last unit finished (or the run was cancelled/aborted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// One record per declared unit, in declared order
    pub units: Vec<UnitRecord>,
    /// Why the run was aborted, if it was
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,
    /// Publish outcome, once publishing was attempted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<PublishRecord>,
}

impl BatchRun {
    /// Create a run with every unit pending
    #[must_use]
    pub fn new(mode: RefreshMode, units: &[WorkUnit]) -> Self {
        Self {
            mode,
            status: RunStatus::NotStarted,
            started_at: Utc::now(),
            finished_at: None,
            units: units
                .iter()
                .map(|u| UnitRecord {
                    name: u.name.clone(),
                    outcome: UnitOutcome::Pending,
                    started_at: None,
                    duration_ms: None,
                })
                .collect(),
            abort_reason: None,
            publish: None,
        }
    }

    fn transition(&mut self, next: RunStatus) -> Result<(), RefreshError> {
        if !self.status.can_transition_to(next) {
            return Err(RefreshError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        log::debug!("batch run {} -> {}", self.status, next);
        self.status = next;
        Ok(())
    }

    /// Mark the run as started
    pub fn begin(&mut self) -> Result<(), RefreshError> {
        self.transition(RunStatus::Running)
    }

    /// Record the outcome of the unit at `index`
    pub fn record(
        &mut self,
        index: usize,
        outcome: UnitOutcome,
        started_at: DateTime<Utc>,
        duration_ms: u64,
    ) {
        if let Some(record) = self.units.get_mut(index) {
            record.outcome = outcome;
            record.started_at = Some(started_at);
            record.duration_ms = Some(duration_ms);
        }
    }

    /// Close the run after every unit was attempted
    pub fn finish(&mut self) -> Result<(), RefreshError> {
        let next = if self.failed() == 0 && self.pending() == 0 {
            RunStatus::CompletedAllSuccess
        } else {
            RunStatus::CompletedPartial
        };
        self.transition(next)?;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Close the run early on operator request; unattempted units stay pending
    pub fn cancel(&mut self) -> Result<(), RefreshError> {
        self.transition(RunStatus::Cancelled)?;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Close the run because the orchestrator cannot proceed
    pub fn abort(&mut self, reason: impl Into<String>) -> Result<(), RefreshError> {
        self.transition(RunStatus::AbortedFatal)?;
        self.abort_reason = Some(reason.into());
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Attach the publish outcome
    pub fn record_publish(&mut self, record: PublishRecord) -> Result<(), RefreshError> {
        let next = if record.succeeded {
            RunStatus::Published
        } else {
            RunStatus::PublishFailed
        };
        self.transition(next)?;
        self.publish = Some(record);
        Ok(())
    }

    /// Number of units that succeeded
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.count(UnitOutcome::Success)
    }

    /// Number of units that failed
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(UnitOutcome::Failed)
    }

    /// Number of units never attempted
    #[must_use]
    pub fn pending(&self) -> usize {
        self.count(UnitOutcome::Pending)
    }

    fn count(&self, outcome: UnitOutcome) -> usize {
        self.units.iter().filter(|u| u.outcome == outcome).count()
    }

    /// Names of units that succeeded, in declared order
    #[must_use]
    pub fn successful_units(&self) -> Vec<&str> {
        self.units
            .iter()
            .filter(|u| u.outcome == UnitOutcome::Success)
            .map(|u| u.name.as_str())
            .collect()
    }

    /// Outcome of a unit by name
    #[must_use]
    pub fn outcome_of(&self, name: &str) -> Option<UnitOutcome> {
        self.units.iter().find(|u| u.name == name).map(|u| u.outcome)
    }

    /// True when every unit succeeded and publishing (if attempted) worked
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
            && self.pending() == 0
            && self.publish.as_ref().is_none_or(|p| p.succeeded)
            && !matches!(self.status, RunStatus::Cancelled | RunStatus::AbortedFatal)
    }
}

//! Publish models
//!
//! A [`PublishAction`] describes what should be committed; a
//! [`PublishReport`] describes what actually happened.

use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::BatchRun;

/// Steps of the publish state machine, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStep {
    /// Remove a VCS index lock left behind by a crashed process
    ClearStaleLock,
    /// Stage artifact paths
    Stage,
    /// Create the commit
    Commit,
    /// Compare the local branch with its remote-tracking branch
    CheckUnpushed,
    /// Rebase local commits onto the remote
    SyncRebase,
    /// Merge the remote after a failed rebase
    SyncMerge,
    /// Push to the remote
    Push,
}

impl std::fmt::Display for PublishStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ClearStaleLock => "clear-stale-lock",
            Self::Stage => "stage",
            Self::Commit => "commit",
            Self::CheckUnpushed => "check unpushed commits",
            Self::SyncRebase => "sync (rebase)",
            Self::SyncMerge => "sync (merge)",
            Self::Push => "push",
        };
        write!(f, "{s}")
    }
}

/// How local history was reconciled with the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStrategy {
    /// `pull --rebase` succeeded
    Rebase,
    /// Rebase failed; a merge pull succeeded
    Merge,
}

/// What to commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishAction {
    /// Commit message
    pub message: String,
    /// Artifact paths to stage, relative to the working copy
    pub paths: Vec<PathBuf>,
}

impl PublishAction {
    /// Create an action with an explicit message
    #[must_use]
    pub fn new(message: impl Into<String>, paths: Vec<PathBuf>) -> Self {
        Self {
            message: message.into(),
            paths,
        }
    }

    /// Build the action for a finished run
    ///
    /// The message carries the run's local start time, mode and success count,
    /// e.g. `Auto-update (update): 2025-11-02 06:00 [29/32 units]`.
    #[must_use]
    pub fn for_run(run: &BatchRun, prefix: &str, paths: Vec<PathBuf>) -> Self {
        let message = format!(
            "{prefix} ({}): {} [{}/{} units]",
            run.mode,
            format_timestamp(run.started_at),
            run.succeeded(),
            run.units.len()
        );
        Self::new(message, paths)
    }
}

/// Local wall-clock rendering used in commit messages
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Result of a publish attempt that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishReport {
    /// Nothing staged and nothing waiting to be pushed
    NothingToPublish,
    /// No new commit, but earlier unpushed commits were pushed
    PushedPending {
        /// How history was reconciled before pushing
        strategy: SyncStrategy,
    },
    /// A new commit was created and pushed
    Published {
        /// Commit id (short hash) when known
        commit: Option<String>,
        /// How history was reconciled before pushing
        strategy: SyncStrategy,
        /// Paths that were staged
        paths: Vec<PathBuf>,
    },
}

impl PublishReport {
    /// Whether a new commit was created
    #[must_use]
    pub const fn committed(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}

/// Serializable summary of a publish attempt, stored with the batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRecord {
    /// Whether publishing succeeded (including "nothing to publish")
    pub succeeded: bool,
    /// Whether a new commit was created
    pub committed: bool,
    /// Commit id, if one was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Human-readable detail
    pub detail: String,
}

impl PublishRecord {
    /// Record for a run with nothing to commit
    #[must_use]
    pub fn nothing_to_publish() -> Self {
        Self {
            succeeded: true,
            committed: false,
            commit: None,
            detail: "nothing to publish".to_string(),
        }
    }

    /// Record for a failed publish
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            committed: false,
            commit: None,
            detail: reason.into(),
        }
    }
}

impl From<&PublishReport> for PublishRecord {
    fn from(report: &PublishReport) -> Self {
        match report {
            PublishReport::NothingToPublish => Self::nothing_to_publish(),
            PublishReport::PushedPending { strategy } => Self {
                succeeded: true,
                committed: false,
                commit: None,
                detail: format!("pushed pending commits ({strategy})"),
            },
            PublishReport::Published {
                commit,
                strategy,
                paths,
            } => Self {
                succeeded: true,
                committed: true,
                commit: commit.clone(),
                detail: format!("committed {} path(s), synced by {strategy}", paths.len()),
            },
        }
    }
}

impl std::fmt::Display for SyncStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rebase => write!(f, "rebase"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

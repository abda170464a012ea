//! Error taxonomy for batch refreshes
//!
//! Producer failures are not errors here: they are recorded in the
//! [`BatchRun`](crate::core::models::BatchRun) and never cross unit
//! boundaries. Everything below either aborts a run before it starts or
//! describes how publishing went wrong.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::models::{PublishStep, RunStatus};

/// Problems with the declared work-unit list or its configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No work units were declared (or the selection matched nothing)
    #[error("no work units to run")]
    EmptyUnitList,

    /// Two work units share a name
    #[error("duplicate work unit: {0}")]
    DuplicateUnit(String),

    /// A selector on the command line matched no declared unit
    #[error("unknown work unit: {0}")]
    UnknownUnit(String),

    /// A work unit name is blank
    #[error("work unit at position {0} has an empty name")]
    EmptyName(usize),

    /// Season string is not of the form `YYYY-YY`
    #[error("invalid season '{0}', expected YYYY-YY (e.g. 2025-26)")]
    InvalidSeason(String),

    /// No `.statsync.toml` in the working copy
    #[error("{} not found; run `statsync init` first", .0.display())]
    Missing(PathBuf),

    /// An artifact path escapes the working copy
    #[error("unit '{unit}': artifact path {path} must be relative and stay inside the working copy")]
    InvalidArtifact {
        /// Unit declaring the artifact
        unit: String,
        /// Offending path
        path: String,
    },

    /// `.statsync.toml` could not be parsed
    #[error("failed to parse {}: {message}", .path.display())]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message
        message: String,
    },
}

/// Errors surfaced by the orchestrator and the publisher
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The unit list is unusable; nothing was run
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Another run holds the lock on this working copy
    #[error(
        "another run holds the lock at {} (pid {pid}, started {started_at}); \
         use `statsync unlock` if it is not running",
        .path.display()
    )]
    LockContention {
        /// Lock file path
        path: PathBuf,
        /// Process id recorded by the holder
        pid: u32,
        /// When the holder started
        started_at: DateTime<Utc>,
    },

    /// Local and remote history diverged and could not be reconciled by rebase
    #[error("publish conflict: {0}")]
    PublishConflict(String),

    /// Publishing could not complete; artifacts remain in the working copy
    #[error("publish failed during {step}: {reason}")]
    PublishFailure {
        /// Step that failed
        step: PublishStep,
        /// What went wrong
        reason: String,
    },

    /// The orchestrator itself could not proceed
    #[error("run aborted: {0}")]
    Aborted(String),

    /// A batch run was moved to a state it cannot reach from its current one
    #[error("invalid run transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state
        from: RunStatus,
        /// Requested state
        to: RunStatus,
    },

    /// Filesystem error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RefreshError {
    /// Process exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 2,
            Self::LockContention { .. } => 3,
            _ => 1,
        }
    }
}

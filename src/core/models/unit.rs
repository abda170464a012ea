//! Work unit model
//!
//! A work unit is one independently rebuildable entity: a team's on/off
//! cache for a season, or a league-wide data domain such as minutes.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::RefreshMode;
use crate::error::ConfigError;

/// How to invoke the external producer for a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerInvocation {
    /// Interpreter used to run the program (e.g. `python3`), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<String>,
    /// Program or script path, relative to the working copy
    pub program: PathBuf,
    /// Extra arguments appended after the mode flag
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Whether the producer understands `--build` / `--update`
    #[serde(default = "default_pass_mode")]
    pub pass_mode: bool,
}

const fn default_pass_mode() -> bool {
    true
}

impl ProducerInvocation {
    /// Invocation of a program with no interpreter and no extra args
    #[must_use]
    pub fn program(program: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: None,
            program: program.into(),
            args: Vec::new(),
            pass_mode: true,
        }
    }

    /// Arguments for the given mode, in invocation order (program excluded)
    #[must_use]
    pub fn arguments(&self, mode: RefreshMode) -> Vec<String> {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        if self.pass_mode {
            args.push(mode.flag().to_string());
        }
        args.extend(self.args.iter().cloned());
        args
    }
}

/// One rebuildable entity in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkUnit {
    /// Unique, stable identifier (e.g. "Phoenix Suns", "minutes")
    pub name: String,
    /// How to run the producer
    pub invocation: ProducerInvocation,
    /// Artifact paths owned by this unit, relative to the working copy
    #[serde(default)]
    pub artifacts: Vec<PathBuf>,
    /// Full rebuild or incremental update
    #[serde(default)]
    pub mode: RefreshMode,
}

impl WorkUnit {
    /// Create a unit with no declared artifacts
    #[must_use]
    pub fn new(name: impl Into<String>, invocation: ProducerInvocation, mode: RefreshMode) -> Self {
        Self {
            name: name.into(),
            invocation,
            artifacts: Vec::new(),
            mode,
        }
    }

    /// Declare the artifacts this unit writes
    #[must_use]
    pub fn with_artifacts<I, P>(mut self, artifacts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.artifacts = artifacts.into_iter().map(Into::into).collect();
        self
    }
}

/// Check that a unit list is runnable: non-empty, named, no duplicates.
pub fn validate_units(units: &[WorkUnit]) -> Result<(), ConfigError> {
    if units.is_empty() {
        return Err(ConfigError::EmptyUnitList);
    }

    let mut seen = HashSet::with_capacity(units.len());
    for (index, unit) in units.iter().enumerate() {
        if unit.name.trim().is_empty() {
            return Err(ConfigError::EmptyName(index));
        }
        if !seen.insert(unit.name.as_str()) {
            return Err(ConfigError::DuplicateUnit(unit.name.clone()));
        }
    }
    Ok(())
}

//! Last run record
//!
//! The most recent [`BatchRun`] is kept as JSON so `statsync status` can
//! report on it after the process has exited.

use std::fs;
use std::path::PathBuf;

use crate::core::models::BatchRun;

use super::atomic_write;

/// JSON file holding the last batch run
#[derive(Debug, Clone)]
pub struct RunHistory {
    path: PathBuf,
}

impl RunHistory {
    /// History stored at `path`
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Persist a run, replacing the previous record
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written.
    pub fn save(&self, run: &BatchRun) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(run)?;
        atomic_write(&self.path, json.as_bytes())
    }

    /// Load the last run, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or parsed.
    pub fn load(&self) -> anyhow::Result<Option<BatchRun>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

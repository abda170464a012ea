//! Operator stop requests
//!
//! `statsync stop` drops a marker file; the running batch notices it before
//! starting its next unit and consumes it.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::core::ports::StopSignal;

/// Stop request backed by a marker file
#[derive(Debug, Clone)]
pub struct StopFile {
    path: PathBuf,
}

impl StopFile {
    /// Watch `path` for stop requests
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Ask a running batch to stop after its current unit
    ///
    /// # Errors
    ///
    /// Returns an error if the marker cannot be written.
    pub fn request(path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, chrono::Utc::now().to_rfc3339())?;
        Ok(())
    }

    /// Whether a stop request is pending
    #[must_use]
    pub fn is_requested(path: &Path) -> bool {
        path.exists()
    }

    /// Discard a pending request (e.g. one left over from a finished run)
    ///
    /// # Errors
    ///
    /// Returns an error if the marker exists but cannot be removed.
    pub fn clear(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl StopSignal for StopFile {
    fn stop_requested(&self) -> bool {
        if !self.path.exists() {
            return false;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Failed to consume stop request {}: {e}", self.path.display());
        }
        true
    }
}

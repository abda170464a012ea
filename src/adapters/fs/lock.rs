//! Run lock
//!
//! One batch per working copy. The lock is a file created with
//! create-new semantics that records who holds it. A lock whose holder
//! process is gone belongs to a run that crashed and is cleared. A lock
//! held by a live process makes the new run refuse to start, however long
//! that run has been going. Age only decides for lock files that cannot be
//! parsed.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::models::RefreshMode;
use crate::error::RefreshError;

/// Contents of the lock file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Process id of the holder
    pub pid: u32,
    /// When the holder acquired the lock
    pub started_at: DateTime<Utc>,
    /// What the holder is doing (`build`, `update`, `publish`)
    pub purpose: String,
}

/// Held run lock; released on drop
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    info: LockInfo,
}

impl RunLock {
    /// Acquire the lock for a batch in `mode`
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::LockContention`] if a live process holds the lock.
    pub fn acquire_for(path: &Path, mode: RefreshMode, stale_after: Duration) -> Result<Self, RefreshError> {
        Self::acquire(path, &mode.to_string(), stale_after)
    }

    /// Acquire the lock
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::LockContention`] if a live process holds the lock, or
    /// an I/O error if the lock file cannot be written.
    pub fn acquire(path: &Path, purpose: &str, stale_after: Duration) -> Result<Self, RefreshError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let info = LockInfo {
            pid: std::process::id(),
            started_at: Utc::now(),
            purpose: purpose.to_string(),
        };

        match Self::create(path, &info) {
            Ok(()) => {},
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Self::clear_if_stale(path, stale_after)?;
                Self::create(path, &info).map_err(|e| {
                    if e.kind() == ErrorKind::AlreadyExists {
                        Self::contention(path)
                    } else {
                        RefreshError::Io(e)
                    }
                })?;
            },
            Err(e) => return Err(RefreshError::Io(e)),
        }

        debug!("Acquired run lock {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            info,
        })
    }

    fn create(path: &Path, info: &LockInfo) -> std::io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let body = serde_json::to_string(info).map_err(std::io::Error::other)?;
        file.write_all(body.as_bytes())?;
        file.sync_all()
    }

    fn clear_if_stale(path: &Path, stale_after: Duration) -> Result<(), RefreshError> {
        let Some(holder) = Self::read(path) else {
            // Unreadable: either mid-write by another process or garbage.
            // Fall back to the file's age.
            let age = fs::metadata(path)
                .and_then(|m| m.modified())
                .ok()
                .and_then(|t| t.elapsed().ok())
                .unwrap_or_default();
            if age > stale_after {
                warn!("Removing unreadable stale lock {}", path.display());
                fs::remove_file(path)?;
                return Ok(());
            }
            return Err(Self::contention(path));
        };

        if !is_pid_alive(holder.pid) {
            warn!(
                "Removing lock left by dead pid {} ({} run started {})",
                holder.pid, holder.purpose, holder.started_at
            );
            fs::remove_file(path)?;
            return Ok(());
        }

        Err(RefreshError::LockContention {
            path: path.to_path_buf(),
            pid: holder.pid,
            started_at: holder.started_at,
        })
    }

    fn contention(path: &Path) -> RefreshError {
        let holder = Self::read(path);
        RefreshError::LockContention {
            path: path.to_path_buf(),
            pid: holder.as_ref().map_or(0, |h| h.pid),
            started_at: holder.map_or_else(Utc::now, |h| h.started_at),
        }
    }

    /// Read the current holder, if the lock exists and parses
    #[must_use]
    pub fn read(path: &Path) -> Option<LockInfo> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Remove the lock regardless of holder (operator override)
    ///
    /// Returns true if a lock was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock exists but cannot be removed.
    pub fn force_remove(path: &Path) -> std::io::Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Holder information for this lock
    #[must_use]
    pub const fn info(&self) -> &LockInfo {
        &self.info
    }

    /// Release the lock explicitly
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        // Only remove the file if it is still ours
        if Self::read(&self.path).is_some_and(|h| h.pid == self.info.pid && h.started_at == self.info.started_at) {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("Failed to release run lock {}: {e}", self.path.display());
            } else {
                debug!("Released run lock {}", self.path.display());
            }
        }
    }
}

/// Returns true if the process is still alive (`kill -0 {pid}`)
///
/// A process owned by another user answers with a permission error, which
/// still means it exists.
#[must_use]
pub fn is_pid_alive(pid: u32) -> bool {
    #[cfg(unix)]
    {
        std::process::Command::new("kill")
            .args(["-0", &pid.to_string()])
            .output()
            .map(|o| {
                o.status.success() || String::from_utf8_lossy(&o.stderr).contains("not permitted")
            })
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        let _ = pid;
        false
    }
}

//! Centralized path definitions for statsync
//!
//! Every path hangs off an explicit working copy root; nothing here looks
//! at the process's current directory.
//!
//! ## Storage Layout
//!
//! ```text
//! repo/                           # Working copy (passed with --repo)
//! ├── .statsync.toml              # SHARED: Committed unit declarations
//! ├── onoff_cache/                # SHARED: Per-team artifacts
//! └── .statsync/                  # Local state (gitignored)
//!     ├── lock                    # Held while a batch or publish runs
//!     ├── stop                    # Present when a stop was requested
//!     ├── last-run.json           # Last batch run record
//!     └── staging/                # Per-unit scratch directories
//! ```

use std::path::{Path, PathBuf};

/// Directory name for local statsync state
pub const STATSYNC_DIR: &str = ".statsync";

/// Project configuration filename
pub const STATSYNC_TOML: &str = ".statsync.toml";

/// Run lock filename
const LOCK_FILE: &str = "lock";

/// Stop request filename
const STOP_FILE: &str = "stop";

/// Last run record filename
const LAST_RUN_FILE: &str = "last-run.json";

/// Staging subdirectory
const STAGING_DIR: &str = "staging";

/// Get path to `.statsync.toml`.
#[must_use]
pub fn config_file(root: &Path) -> PathBuf {
    root.join(STATSYNC_TOML)
}

/// Get path to the `.statsync/` state directory.
#[must_use]
pub fn state_dir(root: &Path) -> PathBuf {
    root.join(STATSYNC_DIR)
}

/// Get path to `.statsync/lock`.
#[must_use]
pub fn lock_file(root: &Path) -> PathBuf {
    state_dir(root).join(LOCK_FILE)
}

/// Get path to `.statsync/stop`.
#[must_use]
pub fn stop_file(root: &Path) -> PathBuf {
    state_dir(root).join(STOP_FILE)
}

/// Get path to `.statsync/last-run.json`.
#[must_use]
pub fn last_run(root: &Path) -> PathBuf {
    state_dir(root).join(LAST_RUN_FILE)
}

/// Get path to `.statsync/staging/`.
///
/// Must stay inside the working copy so promoting an artifact is a rename
/// on the same filesystem.
#[must_use]
pub fn staging_dir(root: &Path) -> PathBuf {
    state_dir(root).join(STAGING_DIR)
}

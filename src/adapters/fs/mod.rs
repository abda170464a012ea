//! Filesystem-backed state under `.statsync/`
//!
//! - [`lock`] - Single-run mutual exclusion
//! - [`stop`] - Operator stop requests
//! - [`history`] - Last run record

pub mod history;
pub mod lock;
pub mod stop;

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

pub use history::RunHistory;
pub use lock::{LockInfo, RunLock};
pub use stop::StopFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
///
/// # Errors
///
/// Returns an error if the parent cannot be created or the rename fails.
pub fn atomic_write(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Add `entry` to `root/.gitignore` if no line matches it exactly.
///
/// Returns true if the file was changed.
///
/// # Errors
///
/// Returns an error if `.gitignore` cannot be read or written.
pub fn ensure_gitignore_entry(root: &Path, entry: &str) -> anyhow::Result<bool> {
    let gitignore = root.join(".gitignore");
    let existing = if gitignore.exists() {
        fs::read_to_string(&gitignore)?
    } else {
        String::new()
    };
    if existing.lines().any(|l| l.trim() == entry) {
        return Ok(false);
    }

    let sep = if existing.is_empty() || existing.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    let mut f = fs::OpenOptions::new().create(true).append(true).open(&gitignore)?;
    writeln!(f, "{sep}{entry}")?;
    Ok(true)
}

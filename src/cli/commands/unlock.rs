//! Remove an abandoned run lock

use std::path::Path;

use log::warn;
use statsync::adapters::fs::RunLock;
use statsync::output::{OperationResult, OutputMode};
use statsync::paths;

/// Remove the run lock regardless of holder
pub fn unlock(root: &Path, mode: OutputMode) -> anyhow::Result<()> {
    let path = paths::lock_file(root);
    let holder = RunLock::read(&path);

    if !RunLock::force_remove(&path)? {
        OperationResult::ok("No run lock held").render(mode);
        return Ok(());
    }

    let message = match holder {
        Some(h) => {
            warn!("Removed run lock held by pid {} since {}", h.pid, h.started_at);
            format!("Removed run lock ({} run, pid {})", h.purpose, h.pid)
        },
        None => "Removed unreadable run lock".to_string(),
    };
    OperationResult::ok(message).render(mode);
    Ok(())
}

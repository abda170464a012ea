//! Request that a running batch stop

use std::path::Path;

use statsync::adapters::fs::{RunLock, StopFile};
use statsync::output::{OperationResult, OutputMode};
use statsync::paths;

/// Drop a stop marker for the running batch
pub fn stop(root: &Path, mode: OutputMode) -> anyhow::Result<()> {
    let Some(holder) = RunLock::read(&paths::lock_file(root)) else {
        OperationResult::failed("No batch is running").render(mode);
        return Ok(());
    };

    StopFile::request(&paths::stop_file(root))?;
    OperationResult::ok(format!(
        "Stop requested; the {} run (pid {}) will stop before its next unit",
        holder.purpose, holder.pid
    ))
    .render(mode);
    Ok(())
}

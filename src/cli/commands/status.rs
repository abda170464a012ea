//! Report the current lock holder and the last run

use std::path::Path;

use statsync::adapters::fs::{RunHistory, RunLock, StopFile};
use statsync::output::{OutputMode, RunReport, StatusResult};
use statsync::paths;

/// Show whether a batch is running and how the last one went
pub fn status(root: &Path, mode: OutputMode) -> anyhow::Result<()> {
    let last = RunHistory::new(paths::last_run(root)).load()?;

    let result = StatusResult {
        lock: RunLock::read(&paths::lock_file(root)),
        stop_requested: StopFile::is_requested(&paths::stop_file(root)),
        last_run_started: last.as_ref().map(|run| run.started_at.to_rfc3339()),
        last_run: last.as_ref().map(RunReport::from),
    };
    result.render(mode);
    Ok(())
}

//! Run a build or update batch, then publish

use std::path::Path;
use std::time::Duration;

use log::{error, info, warn};
use statsync::adapters::clock::ThreadPacer;
use statsync::adapters::fs::{RunHistory, RunLock, StopFile};
use statsync::adapters::git::{GitVersionControl, is_working_copy};
use statsync::adapters::process::{CommandProducer, Staging};
use statsync::config::ProjectConfig;
use statsync::core::models::{
    BatchRun, PublishAction, PublishRecord, RefreshMode, WorkUnit, validate_units,
};
use statsync::core::services::{Orchestrator, publish, successful_artifacts};
use statsync::output::{OutputMode, RunReport};
use statsync::{RefreshError, paths};

/// Command-line overrides for a batch
#[derive(Debug, Clone, Default)]
pub struct RefreshOptions {
    /// Unit names or glob patterns; empty selects every unit
    pub selectors: Vec<String>,
    /// Skip the publish step
    pub no_publish: bool,
    /// Inter-unit delay override in seconds
    pub delay_secs: Option<u64>,
    /// Remove an existing run lock first
    pub force_unlock: bool,
}

/// Run the selected units in `mode` and publish what succeeded
///
/// Returns 0 when every unit succeeded and publishing (if enabled) worked,
/// 1 otherwise.
pub fn refresh(
    root: &Path,
    mode: RefreshMode,
    options: &RefreshOptions,
    output: OutputMode,
) -> anyhow::Result<i32> {
    // Everything that can reject the unit list happens before any side effect
    let config = ProjectConfig::load(root).map_err(RefreshError::from)?;
    let units = config.select(mode, &options.selectors).map_err(RefreshError::from)?;
    validate_units(&units).map_err(RefreshError::from)?;

    let publishing = config.publish.enabled && !options.no_publish;
    if publishing && !is_working_copy(root) {
        anyhow::bail!(
            "{} is not a git working copy; use --no-publish or disable publish.enabled",
            root.display()
        );
    }

    let lock_path = paths::lock_file(root);
    if options.force_unlock && RunLock::force_remove(&lock_path)? {
        warn!("Removed existing run lock (--force-unlock)");
    }
    let lock = RunLock::acquire_for(&lock_path, mode, config.lock_stale_after())?;

    let history = RunHistory::new(paths::last_run(root));
    let stop = StopFile::new(paths::stop_file(root));
    let staging_root = paths::staging_dir(root);

    if let Err(e) = stop.clear().and_then(|()| Staging::clear_root(&staging_root)) {
        let reason = format!("cannot prepare {}: {e:#}", paths::STATSYNC_DIR);
        abandon(&history, mode, &units, &reason)?;
        return Err(RefreshError::Aborted(reason).into());
    }

    let delay = options.delay_secs.map_or_else(|| config.delay(), Duration::from_secs);
    let producer = CommandProducer::new(root.to_path_buf(), staging_root);
    let pacer = ThreadPacer;
    let orchestrator = Orchestrator::new(&producer, &pacer, &stop, delay);

    let mut run = orchestrator.run(&units)?;

    if publishing {
        let vcs = GitVersionControl::new(
            root.to_path_buf(),
            config.publish.remote.clone(),
            config.publish.branch.clone(),
        );
        let action = PublishAction::for_run(
            &run,
            &config.publish.message_prefix,
            successful_artifacts(&run, &units),
        );
        let record = match publish(&vcs, &action) {
            Ok(report) => PublishRecord::from(&report),
            Err(e) => {
                error!("{e}");
                PublishRecord::failed(e.to_string())
            },
        };
        run.record_publish(record)?;
    } else {
        info!("Publishing skipped");
    }

    if let Err(e) = history.save(&run) {
        warn!("Failed to record run history: {e:#}");
    }
    lock.release();

    RunReport::from(&run).render(output);
    Ok(if run.is_clean() { 0 } else { 1 })
}

fn abandon(
    history: &RunHistory,
    mode: RefreshMode,
    units: &[WorkUnit],
    reason: &str,
) -> anyhow::Result<()> {
    let mut run = BatchRun::new(mode, units);
    run.abort(reason)?;
    history.save(&run)
}

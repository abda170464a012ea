//! Publish state machine
//!
//! ```text
//! clear stale lock -> stage -> commit -> pull --rebase -> push
//!                                          | failure
//!                                          v
//!                                   abort, pull (merge) -> push
//! ```
//!
//! Exactly one fallback is tried. Nothing staged means nothing committed,
//! so publishing twice in a row is harmless.

use std::collections::HashSet;
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::core::models::{
    BatchRun, PublishAction, PublishReport, PublishStep, SyncStrategy, UnitOutcome, WorkUnit,
};
use crate::core::ports::VersionControl;
use crate::error::RefreshError;

fn failure(step: PublishStep, err: &anyhow::Error) -> RefreshError {
    RefreshError::PublishFailure {
        step,
        reason: format!("{err:#}"),
    }
}

/// Artifact paths of the units that succeeded, in declared order, deduplicated
#[must_use]
pub fn successful_artifacts(run: &BatchRun, units: &[WorkUnit]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    units
        .iter()
        .filter(|u| run.outcome_of(&u.name) == Some(UnitOutcome::Success))
        .flat_map(|u| u.artifacts.iter())
        .filter(|p| seen.insert((*p).clone()))
        .cloned()
        .collect()
}

/// Commit and distribute the action's paths
///
/// # Errors
///
/// Returns [`RefreshError::PublishFailure`] naming the step that could not
/// complete. Artifacts are left in the working copy either way.
pub fn publish(
    vcs: &dyn VersionControl,
    action: &PublishAction,
) -> Result<PublishReport, RefreshError> {
    if vcs.clear_stale_lock().map_err(|e| failure(PublishStep::ClearStaleLock, &e))? {
        warn!("Removed stale index lock left by a previous run");
    }

    if !action.paths.is_empty() {
        debug!("Staging {} path(s)", action.paths.len());
        vcs.stage(&action.paths).map_err(|e| failure(PublishStep::Stage, &e))?;
    }

    let staged = vcs.has_staged_changes().map_err(|e| failure(PublishStep::Stage, &e))?;

    if !staged {
        let pending = vcs.has_unpushed_commits().map_err(|e| failure(PublishStep::CheckUnpushed, &e))?;
        if !pending {
            info!("Nothing to publish");
            return Ok(PublishReport::NothingToPublish);
        }
        info!("No new changes, pushing earlier unpushed commits");
        let strategy = sync(vcs)?;
        vcs.push().map_err(|e| failure(PublishStep::Push, &e))?;
        return Ok(PublishReport::PushedPending { strategy });
    }

    let commit = vcs.commit(&action.message).map_err(|e| failure(PublishStep::Commit, &e))?;
    info!("Committed: {}", action.message);

    let strategy = sync(vcs)?;
    vcs.push().map_err(|e| failure(PublishStep::Push, &e))?;
    info!("Pushed");

    Ok(PublishReport::Published {
        commit,
        strategy,
        paths: action.paths.clone(),
    })
}

fn sync(vcs: &dyn VersionControl) -> Result<SyncStrategy, RefreshError> {
    let rebase_err = match vcs.pull_rebase() {
        Ok(()) => return Ok(SyncStrategy::Rebase),
        Err(e) => RefreshError::PublishConflict(format!("{e:#}")),
    };
    warn!("{rebase_err}; falling back to merge");

    if let Err(e) = vcs.abort_rebase() {
        debug!("rebase --abort: {e:#}");
    }

    match vcs.pull_merge() {
        Ok(()) => Ok(SyncStrategy::Merge),
        Err(e) => {
            if let Err(abort) = vcs.abort_merge() {
                debug!("merge --abort: {abort:#}");
            }
            Err(failure(PublishStep::SyncMerge, &e))
        },
    }
}

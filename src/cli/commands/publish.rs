//! Publish declared artifacts outside of a batch

use std::path::Path;

use chrono::Utc;
use statsync::adapters::fs::RunLock;
use statsync::adapters::git::GitVersionControl;
use statsync::config::ProjectConfig;
use statsync::core::models::{PublishAction, PublishReport, RefreshMode, format_timestamp};
use statsync::core::services::publish as run_publish;
use statsync::output::{OperationResult, OutputMode};
use statsync::{RefreshError, paths};

/// Commit and push every declared artifact present in the working copy
///
/// Returns 0 on success (including nothing to publish), 1 otherwise.
pub fn publish(root: &Path, message: Option<&str>, mode: OutputMode) -> anyhow::Result<i32> {
    let config = ProjectConfig::load(root).map_err(RefreshError::from)?;
    let _lock = RunLock::acquire(&paths::lock_file(root), "publish", config.lock_stale_after())?;

    let mut artifacts = Vec::new();
    for unit in config.work_units(RefreshMode::Update) {
        for artifact in unit.artifacts {
            if root.join(&artifact).exists() && !artifacts.contains(&artifact) {
                artifacts.push(artifact);
            }
        }
    }

    let message = message.map_or_else(
        || format!("{}: {}", config.publish.message_prefix, format_timestamp(Utc::now())),
        str::to_string,
    );
    let vcs = GitVersionControl::new(
        root.to_path_buf(),
        config.publish.remote.clone(),
        config.publish.branch.clone(),
    );

    let result = match run_publish(&vcs, &PublishAction::new(message, artifacts)) {
        Ok(PublishReport::NothingToPublish) => OperationResult::ok("Nothing to publish"),
        Ok(PublishReport::PushedPending { strategy }) => {
            OperationResult::ok(format!("Pushed earlier commits ({strategy})"))
        },
        Ok(PublishReport::Published { commit, strategy, .. }) => OperationResult::ok(format!(
            "Published {} (synced by {strategy})",
            commit.as_deref().unwrap_or("new commit")
        )),
        Err(e) => OperationResult::failed(e.to_string()),
    };

    result.render(mode);
    Ok(i32::from(!result.success))
}

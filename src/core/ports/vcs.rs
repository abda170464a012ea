//! Version control system port
//!
//! Defines the interface the publisher uses to record and distribute
//! artifacts. Each method maps to one step of the publish state machine.

use std::path::PathBuf;

/// Version control system abstraction
///
/// Implementations handle interactions with git or other VCS systems.
pub trait VersionControl {
    /// Remove a leftover index lock; returns true if one was removed
    fn clear_stale_lock(&self) -> anyhow::Result<bool>;

    /// Stage the given paths (relative to the working copy)
    fn stage(&self, paths: &[PathBuf]) -> anyhow::Result<()>;

    /// Whether anything is staged for commit
    fn has_staged_changes(&self) -> anyhow::Result<bool>;

    /// Commit staged changes, returning the new commit id when known
    fn commit(&self, message: &str) -> anyhow::Result<Option<String>>;

    /// Whether local commits exist that the remote does not have
    fn has_unpushed_commits(&self) -> anyhow::Result<bool>;

    /// Rebase local commits onto the remote branch
    fn pull_rebase(&self) -> anyhow::Result<()>;

    /// Abandon an in-progress rebase
    fn abort_rebase(&self) -> anyhow::Result<()>;

    /// Merge the remote branch into the local one
    fn pull_merge(&self) -> anyhow::Result<()>;

    /// Abandon an in-progress merge
    fn abort_merge(&self) -> anyhow::Result<()>;

    /// Push the current branch to the remote
    fn push(&self) -> anyhow::Result<()>;
}

//! Git integration adapter
//!
//! Implements `VersionControl` using the `git` command line, with `git2`
//! for read-only repository inspection.
//!
//! - [`staging`] - Staging artifacts and detecting staged changes
//! - [`remote`] - Pull (rebase or merge) and push

pub mod remote;
pub mod staging;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::Context;

use crate::core::ports::VersionControl;

pub use staging::{has_staged_changes, stage_paths};

/// Git-based version control implementation
#[derive(Debug, Clone)]
pub struct GitVersionControl {
    /// Working copy root
    workdir: PathBuf,
    /// Remote to synchronize with
    remote: String,
    /// Branch to publish; the current branch when unset
    branch: Option<String>,
}

impl GitVersionControl {
    /// Create a new git adapter for a working copy
    #[must_use]
    pub fn new(workdir: PathBuf, remote: impl Into<String>, branch: Option<String>) -> Self {
        Self {
            workdir,
            remote: remote.into(),
            branch,
        }
    }

    /// Working copy root
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Remote name
    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Branch that will be published
    ///
    /// # Errors
    ///
    /// Returns an error if no branch is configured and HEAD is detached.
    pub fn branch(&self) -> anyhow::Result<String> {
        if let Some(branch) = &self.branch {
            return Ok(branch.clone());
        }
        current_branch(&self.workdir)?.context("HEAD is detached; set publish.branch")
    }

    /// Run git in the working copy, failing on non-zero exit
    pub(crate) fn run(&self, args: &[&str]) -> anyhow::Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run git in the working copy and return the raw output
    pub(crate) fn output(&self, args: &[&str]) -> anyhow::Result<Output> {
        log::debug!("git {}", args.join(" "));
        Command::new("git")
            .current_dir(&self.workdir)
            .args(args)
            .output()
            .with_context(|| format!("failed to run git {}", args.join(" ")))
    }
}

impl VersionControl for GitVersionControl {
    fn clear_stale_lock(&self) -> anyhow::Result<bool> {
        let lock = index_lock_path(&self.workdir)?;
        if lock.exists() {
            fs::remove_file(&lock)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn stage(&self, paths: &[PathBuf]) -> anyhow::Result<()> {
        stage_paths(self, paths)
    }

    fn has_staged_changes(&self) -> anyhow::Result<bool> {
        has_staged_changes(self)
    }

    fn commit(&self, message: &str) -> anyhow::Result<Option<String>> {
        self.run(&["commit", "-m", message])?;
        Ok(self.run(&["rev-parse", "--short", "HEAD"]).ok())
    }

    fn has_unpushed_commits(&self) -> anyhow::Result<bool> {
        remote::has_unpushed_commits(&self.workdir, &self.remote, &self.branch()?)
    }

    fn pull_rebase(&self) -> anyhow::Result<()> {
        remote::pull(self, true)
    }

    fn abort_rebase(&self) -> anyhow::Result<()> {
        self.run(&["rebase", "--abort"]).map(drop)
    }

    fn pull_merge(&self) -> anyhow::Result<()> {
        remote::pull(self, false)
    }

    fn abort_merge(&self) -> anyhow::Result<()> {
        self.run(&["merge", "--abort"]).map(drop)
    }

    fn push(&self) -> anyhow::Result<()> {
        remote::push(self)
    }
}

/// Get the current branch name, `None` for a detached HEAD
pub fn current_branch(workdir: &Path) -> anyhow::Result<Option<String>> {
    let repo = git2::Repository::open(workdir)?;
    let head = repo.head()?;
    if !head.is_branch() {
        return Ok(None);
    }
    Ok(head.shorthand().map(String::from))
}

/// Path of git's index lock for a working copy
pub fn index_lock_path(workdir: &Path) -> anyhow::Result<PathBuf> {
    let repo = git2::Repository::open(workdir)
        .with_context(|| format!("{} is not a git working copy", workdir.display()))?;
    Ok(repo.path().join("index.lock"))
}

/// Check that a path is the root of a git working copy
#[must_use]
pub fn is_working_copy(path: &Path) -> bool {
    git2::Repository::open(path).is_ok_and(|repo| !repo.is_bare())
}

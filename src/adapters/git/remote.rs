//! Remote synchronization
//!
//! `--autostash` replaces the stash / pull / stash-pop dance: unrelated
//! local edits in the working copy never block a pull.

use std::path::Path;

use super::GitVersionControl;

/// Pull the publish branch, rebasing local commits or merging
///
/// # Errors
///
/// Returns an error if the pull fails; the caller decides whether to abort.
pub fn pull(git: &GitVersionControl, rebase: bool) -> anyhow::Result<()> {
    let branch = git.branch()?;
    let strategy = if rebase { "--rebase" } else { "--no-rebase" };
    let mut args = vec!["pull", strategy, "--autostash"];
    if !rebase {
        args.push("--no-edit");
    }
    args.extend([git.remote(), branch.as_str()]);
    git.run(&args)?;
    Ok(())
}

/// Push HEAD to the publish branch
///
/// # Errors
///
/// Returns an error if the remote rejects the push.
pub fn push(git: &GitVersionControl) -> anyhow::Result<()> {
    let branch = git.branch()?;
    let refspec = format!("HEAD:refs/heads/{branch}");
    git.run(&["push", git.remote(), &refspec])?;
    Ok(())
}

/// Whether HEAD has commits the remote-tracking branch lacks
///
/// Uses the last fetched state of `remote/branch`. A configured remote
/// without a tracking branch means the branch was never pushed.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened or has no HEAD.
pub fn has_unpushed_commits(workdir: &Path, remote: &str, branch: &str) -> anyhow::Result<bool> {
    let repo = git2::Repository::open(workdir)?;
    let Ok(head) = repo.head().and_then(|h| h.peel_to_commit()) else {
        return Ok(false);
    };

    let tracking = format!("refs/remotes/{remote}/{branch}");
    match repo.find_reference(&tracking).and_then(|r| r.peel_to_commit()) {
        Ok(upstream) => {
            let (ahead, _behind) = repo.graph_ahead_behind(head.id(), upstream.id())?;
            Ok(ahead > 0)
        },
        Err(_) => Ok(repo.find_remote(remote).is_ok()),
    }
}

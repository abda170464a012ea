//! Staged file detection
//!
//! Provides utilities for staging artifacts and detecting what is staged.

use std::path::PathBuf;

use super::GitVersionControl;

/// Stage the given paths, including deletions
///
/// # Errors
///
/// Returns an error if git command fails.
pub fn stage_paths(git: &GitVersionControl, paths: &[PathBuf]) -> anyhow::Result<()> {
    if paths.is_empty() {
        return Ok(());
    }

    let mut args = vec!["add".to_string(), "-A".to_string(), "--".to_string()];
    args.extend(paths.iter().map(|p| p.to_string_lossy().to_string()));
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    git.run(&args)?;
    Ok(())
}

/// Whether anything is staged for commit
///
/// # Errors
///
/// Returns an error if git command fails.
pub fn has_staged_changes(git: &GitVersionControl) -> anyhow::Result<bool> {
    let output = git.output(&["diff", "--cached", "--quiet"])?;
    match output.status.code() {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Failed to inspect staged changes: {}", stderr.trim())
        },
    }
}

//! Per-unit staging directories
//!
//! A staging directory lives under `.statsync/staging/` inside the working
//! copy, so promoting an artifact is a same-filesystem rename. The current
//! artifacts are copied in first: incremental producers read the previous
//! cache from their working directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, warn};
use tempfile::TempDir;
use walkdir::WalkDir;

/// A unit's scratch directory; removed on drop unless promoted
#[derive(Debug)]
pub struct Staging {
    dir: TempDir,
}

impl Staging {
    /// Create a staging directory seeded with the current artifacts
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or an existing
    /// artifact cannot be copied.
    pub fn prepare(root: &Path, workdir: &Path, artifacts: &[PathBuf]) -> anyhow::Result<Self> {
        fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix("unit-")
            .tempdir_in(root)
            .with_context(|| format!("failed to create staging directory in {}", root.display()))?;

        for artifact in artifacts {
            let artifact = artifact.as_path();
            let src = workdir.join(artifact);
            let dest = dir.path().join(artifact);
            if src.exists() {
                copy_into(&src, &dest)?;
            } else if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
        }

        Ok(Self { dir })
    }

    /// Path of the staging directory
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Move every artifact into the working copy
    ///
    /// All artifacts are checked before any is moved, so a producer that
    /// forgot one leaves the working copy untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if an artifact is missing or cannot be renamed.
    pub fn promote(self, workdir: &Path, artifacts: &[PathBuf]) -> anyhow::Result<()> {
        for artifact in artifacts {
            let artifact = artifact.as_path();
            if !self.path().join(artifact).exists() {
                anyhow::bail!("producer did not write {}", artifact.display());
            }
        }

        for artifact in artifacts {
            let artifact = artifact.as_path();
            let from = self.path().join(artifact);
            let to = workdir.join(artifact);
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent)?;
            }
            if to.is_dir() {
                fs::remove_dir_all(&to)?;
            }
            fs::rename(&from, &to)
                .with_context(|| format!("failed to move {} into place", artifact.display()))?;
            debug!("Promoted {}", artifact.display());
        }
        Ok(())
    }

    /// Remove staging directories left behind by a crashed run
    ///
    /// Only call this while holding the run lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be removed.
    pub fn clear_root(root: &Path) -> anyhow::Result<()> {
        if root.exists() {
            warn!("Removing leftover staging directory {}", root.display());
            fs::remove_dir_all(root)?;
        }
        Ok(())
    }
}

fn copy_into(src: &Path, dest: &Path) -> anyhow::Result<()> {
    if src.is_file() {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dest)?;
        return Ok(());
    }

    for entry in WalkDir::new(src) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src)?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

//! Process-based producer adapter
//!
//! Implements `Producer` by spawning the unit's program as a child
//! process. Units with declared artifacts run inside a staging directory
//! and their artifacts are renamed into the working copy only after the
//! program exits successfully. Producer stdout is sent to our stderr so
//! that stdout carries only statsync's own report.
//!
//! - [`staging`] - Per-unit staging directories

pub mod staging;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context;
use log::debug;

use crate::core::models::WorkUnit;
use crate::core::ports::Producer;

pub use staging::Staging;

/// Environment variable carrying the unit name to the producer
pub const ENV_UNIT: &str = "STATSYNC_UNIT";
/// Environment variable carrying the refresh mode to the producer
pub const ENV_MODE: &str = "STATSYNC_MODE";
/// Environment variable carrying the working copy root to the producer
pub const ENV_WORKDIR: &str = "STATSYNC_WORKDIR";

/// Runs producers as child processes
#[derive(Debug, Clone)]
pub struct CommandProducer {
    /// Working copy root; relative program paths resolve against it
    workdir: PathBuf,
    /// Where per-unit staging directories are created
    staging_root: PathBuf,
}

impl CommandProducer {
    /// Create a producer for a working copy
    #[must_use]
    pub const fn new(workdir: PathBuf, staging_root: PathBuf) -> Self {
        Self {
            workdir,
            staging_root,
        }
    }

    /// Build the command for a unit, running in `dir`
    #[must_use]
    pub fn command(&self, unit: &WorkUnit, dir: &Path) -> Command {
        let invocation = &unit.invocation;
        let program = if invocation.program.is_absolute() {
            invocation.program.clone()
        } else {
            self.workdir.join(&invocation.program)
        };

        let mut cmd = match &invocation.interpreter {
            Some(interpreter) => {
                let mut cmd = Command::new(interpreter);
                cmd.arg(&program);
                cmd
            },
            None => Command::new(&program),
        };

        cmd.args(invocation.arguments(unit.mode))
            .current_dir(dir)
            .stdout(Stdio::from(std::io::stderr()))
            .env(ENV_UNIT, &unit.name)
            .env(ENV_MODE, unit.mode.to_string())
            .env(ENV_WORKDIR, &self.workdir);
        cmd
    }

    fn spawn(&self, unit: &WorkUnit, dir: &Path) -> anyhow::Result<()> {
        let mut cmd = self.command(unit, dir);
        debug!("Running {cmd:?}");
        let status = cmd
            .status()
            .with_context(|| format!("failed to start {}", unit.invocation.program.display()))?;

        if !status.success() {
            anyhow::bail!("producer exited with {status}");
        }
        Ok(())
    }
}

impl Producer for CommandProducer {
    fn produce(&self, unit: &WorkUnit) -> anyhow::Result<()> {
        if unit.artifacts.is_empty() {
            return self.spawn(unit, &self.workdir);
        }

        let staging = Staging::prepare(&self.staging_root, &self.workdir, &unit.artifacts)?;
        self.spawn(unit, staging.path())?;
        staging.promote(&self.workdir, &unit.artifacts)
    }
}

//! Mock implementations of port traits for testing
//!
//! These mocks provide configurable behavior for unit testing
//! without spawning processes, sleeping or touching git.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::time::Duration;

use statsync::core::models::{ProducerInvocation, RefreshMode, WorkUnit};
use statsync::core::ports::{Pacer, Producer, StopSignal, VersionControl};

/// Build units named `names`, each owning `<name>.json`
pub fn units(names: &[&str], mode: RefreshMode) -> Vec<WorkUnit> {
    names
        .iter()
        .map(|name| {
            WorkUnit::new(*name, ProducerInvocation::program(format!("{name}.py")), mode)
                .with_artifacts([format!("{name}.json")])
        })
        .collect()
}

/// Producer that records every invocation and fails for chosen units
pub struct MockProducer {
    failing: Vec<String>,
    calls: RefCell<Vec<(String, Vec<String>)>>,
}

impl MockProducer {
    pub fn new() -> Self {
        Self {
            failing: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| (*n).to_string()).collect(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Names of units produced, in call order
    pub fn called(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Arguments each unit was invoked with, in call order
    pub fn arguments(&self) -> Vec<Vec<String>> {
        self.calls.borrow().iter().map(|(_, args)| args.clone()).collect()
    }
}

impl Default for MockProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Producer for MockProducer {
    fn produce(&self, unit: &WorkUnit) -> anyhow::Result<()> {
        self.calls
            .borrow_mut()
            .push((unit.name.clone(), unit.invocation.arguments(unit.mode)));
        if self.failing.contains(&unit.name) {
            anyhow::bail!("{} exited with status 1", unit.name);
        }
        Ok(())
    }
}

/// Pacer that records requested pauses instead of sleeping
#[derive(Default)]
pub struct RecordingPacer {
    pauses: RefCell<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&self, delay: Duration) {
        self.pauses.borrow_mut().push(delay);
    }
}

/// Stop signal that never fires
pub struct NeverStop;

impl StopSignal for NeverStop {
    fn stop_requested(&self) -> bool {
        false
    }
}

/// Stop signal that fires once `checks` checks have passed
pub struct StopAfter {
    remaining: Cell<usize>,
}

impl StopAfter {
    pub fn new(checks: usize) -> Self {
        Self {
            remaining: Cell::new(checks),
        }
    }
}

impl StopSignal for StopAfter {
    fn stop_requested(&self) -> bool {
        let remaining = self.remaining.get();
        if remaining == 0 {
            return true;
        }
        self.remaining.set(remaining - 1);
        false
    }
}

/// In-memory version control
///
/// `changes` models modified artifacts in the working copy; staging turns
/// them into staged changes, committing turns those into an unpushed commit.
pub struct MockVcs {
    calls: RefCell<Vec<&'static str>>,
    staged_paths: RefCell<Vec<PathBuf>>,
    changes: Cell<bool>,
    staged: Cell<bool>,
    unpushed: Cell<bool>,
    stale_lock: Cell<bool>,
    fail_rebase: bool,
    fail_merge: bool,
    fail_push: bool,
    fail_unpushed_check: bool,
}

impl MockVcs {
    /// Clean working copy, in sync with the remote
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            staged_paths: RefCell::new(Vec::new()),
            changes: Cell::new(false),
            staged: Cell::new(false),
            unpushed: Cell::new(false),
            stale_lock: Cell::new(false),
            fail_rebase: false,
            fail_merge: false,
            fail_push: false,
            fail_unpushed_check: false,
        }
    }

    pub fn with_changes(self) -> Self {
        self.changes.set(true);
        self
    }

    pub fn with_unpushed(self) -> Self {
        self.unpushed.set(true);
        self
    }

    pub fn with_stale_lock(self) -> Self {
        self.stale_lock.set(true);
        self
    }

    pub fn failing_rebase(mut self) -> Self {
        self.fail_rebase = true;
        self
    }

    pub fn failing_merge(mut self) -> Self {
        self.fail_merge = true;
        self
    }

    pub fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    pub fn failing_unpushed_check(mut self) -> Self {
        self.fail_unpushed_check = true;
        self
    }

    /// Operations performed, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    /// Paths passed to the last stage call
    pub fn staged_paths(&self) -> Vec<PathBuf> {
        self.staged_paths.borrow().clone()
    }

    pub fn has_unpushed(&self) -> bool {
        self.unpushed.get()
    }

    fn log(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for MockVcs {
    fn clear_stale_lock(&self) -> anyhow::Result<bool> {
        self.log("clear_stale_lock");
        Ok(self.stale_lock.replace(false))
    }

    fn stage(&self, paths: &[PathBuf]) -> anyhow::Result<()> {
        self.log("stage");
        *self.staged_paths.borrow_mut() = paths.to_vec();
        if self.changes.replace(false) {
            self.staged.set(true);
        }
        Ok(())
    }

    fn has_staged_changes(&self) -> anyhow::Result<bool> {
        self.log("has_staged_changes");
        Ok(self.staged.get())
    }

    fn commit(&self, _message: &str) -> anyhow::Result<Option<String>> {
        self.log("commit");
        self.staged.set(false);
        self.unpushed.set(true);
        Ok(Some("abc1234".to_string()))
    }

    fn has_unpushed_commits(&self) -> anyhow::Result<bool> {
        self.log("has_unpushed_commits");
        if self.fail_unpushed_check {
            anyhow::bail!("reference 'refs/remotes/origin/main' is corrupt");
        }
        Ok(self.unpushed.get())
    }

    fn pull_rebase(&self) -> anyhow::Result<()> {
        self.log("pull_rebase");
        if self.fail_rebase {
            anyhow::bail!("CONFLICT (content): Merge conflict in onoff_cache/a.json");
        }
        Ok(())
    }

    fn abort_rebase(&self) -> anyhow::Result<()> {
        self.log("abort_rebase");
        Ok(())
    }

    fn pull_merge(&self) -> anyhow::Result<()> {
        self.log("pull_merge");
        if self.fail_merge {
            anyhow::bail!("Automatic merge failed");
        }
        Ok(())
    }

    fn abort_merge(&self) -> anyhow::Result<()> {
        self.log("abort_merge");
        Ok(())
    }

    fn push(&self) -> anyhow::Result<()> {
        self.log("push");
        if self.fail_push {
            anyhow::bail!("remote rejected");
        }
        self.unpushed.set(false);
        Ok(())
    }
}

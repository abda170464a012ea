//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use colored::Colorize;
use serde::Serialize;

use crate::adapters::fs::LockInfo;
use crate::config::ProjectConfig;
use crate::core::models::{BatchRun, PublishRecord, RefreshMode, RunStatus, UnitOutcome};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Summary of a batch run
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Refresh mode
    pub mode: RefreshMode,
    /// Final run status
    pub status: RunStatus,
    /// Units that succeeded
    pub succeeded: usize,
    /// Units that failed
    pub failed: usize,
    /// Units never attempted
    pub pending: usize,
    /// Per-unit lines, in declared order
    pub units: Vec<UnitLine>,
    /// Publish outcome, if publishing was attempted
    pub publish: Option<PublishRecord>,
}

/// One unit in a run summary
#[derive(Debug, Serialize)]
pub struct UnitLine {
    /// Unit name
    pub name: String,
    /// Outcome
    pub outcome: UnitOutcome,
    /// Producer run time in seconds
    pub seconds: Option<f64>,
}

impl From<&BatchRun> for RunReport {
    fn from(run: &BatchRun) -> Self {
        Self {
            mode: run.mode,
            status: run.status,
            succeeded: run.succeeded(),
            failed: run.failed(),
            pending: run.pending(),
            units: run
                .units
                .iter()
                .map(|u| UnitLine {
                    name: u.name.clone(),
                    outcome: u.outcome,
                    seconds: u.duration_ms.map(millis_to_secs),
                })
                .collect(),
            publish: run.publish.clone(),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn millis_to_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

impl RunReport {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        println!("Batch ({}): {}\n", self.mode, self.status);

        for unit in &self.units {
            let mark = match unit.outcome {
                UnitOutcome::Success => "✓".green(),
                UnitOutcome::Failed => "✗".red(),
                UnitOutcome::Pending => "-".dimmed(),
            };
            match unit.seconds {
                Some(secs) => println!("  {mark} {:<24} {secs:>8.1}s", unit.name),
                None => println!("  {mark} {:<24} {}", unit.name, unit.outcome),
            }
        }

        println!();
        println!(
            "{} succeeded, {} failed, {} pending",
            self.succeeded, self.failed, self.pending
        );

        match &self.publish {
            Some(p) if p.succeeded => println!("Publish: {}", p.detail),
            Some(p) => println!("Publish FAILED: {}", p.detail),
            None => println!("Publish: skipped"),
        }

        if self.failed > 0 {
            println!("{} unit(s) failed", self.failed);
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

/// Result of a unit listing
#[derive(Debug, Serialize)]
pub struct UnitListResult {
    /// Season the units describe
    pub season: String,
    /// Declared units, in run order
    pub units: Vec<UnitInfo>,
}

/// Information about a declared unit
#[derive(Debug, Serialize)]
pub struct UnitInfo {
    /// Unit name
    pub name: String,
    /// Program path
    pub program: String,
    /// Whether the mode flag is passed
    pub pass_mode: bool,
    /// Declared artifacts
    pub artifacts: Vec<String>,
}

impl From<&ProjectConfig> for UnitListResult {
    fn from(config: &ProjectConfig) -> Self {
        Self {
            season: config.batch.season.clone(),
            units: config
                .units
                .iter()
                .map(|u| UnitInfo {
                    name: u.name.clone(),
                    program: u.program.display().to_string(),
                    pass_mode: u.pass_mode,
                    artifacts: u.artifacts.iter().map(|a| a.display().to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl UnitListResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        if self.units.is_empty() {
            println!("No units declared.");
            return;
        }

        println!("Units for {} ({}):\n", self.season, self.units.len());
        for (i, unit) in self.units.iter().enumerate() {
            println!("  {:>2}. {}", i + 1, unit.name);
            println!("      {}", unit.program);
            for artifact in &unit.artifacts {
                println!("      -> {artifact}");
            }
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

/// Result of a status query
#[derive(Debug, Serialize)]
pub struct StatusResult {
    /// Current lock holder, if any
    pub lock: Option<LockInfo>,
    /// Whether a stop request is waiting to be honoured
    pub stop_requested: bool,
    /// Summary of the last recorded run
    pub last_run: Option<RunReport>,
    /// When the last run started (RFC3339)
    pub last_run_started: Option<String>,
}

impl StatusResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        match &self.lock {
            Some(lock) => println!(
                "Running: {} (pid {}, since {})",
                lock.purpose, lock.pid, lock.started_at
            ),
            None => println!("Running: no"),
        }
        if self.stop_requested {
            println!("Stop requested: yes");
        }

        println!();
        match (&self.last_run, &self.last_run_started) {
            (Some(run), Some(started)) => {
                println!("Last run: {} ({}), started {started}", run.status, run.mode);
                println!(
                    "  {} succeeded, {} failed, {} pending",
                    run.succeeded, run.failed, run.pending
                );
                for unit in run.units.iter().filter(|u| u.outcome == UnitOutcome::Failed) {
                    println!("  failed: {}", unit.name);
                }
                if let Some(publish) = &run.publish {
                    println!("  publish: {}", publish.detail);
                }
            },
            _ => println!("Last run: none"),
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl OperationResult {
    /// Successful operation
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Failed operation
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => {
                println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
            },
        }
    }
}

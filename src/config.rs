//! Project configuration
//!
//! Unit declarations and batch settings live in `.statsync.toml` at the
//! root of the working copy, so the schedule that runs them is versioned
//! with the artifacts it produces.
//!
//! ```toml
//! [batch]
//! season = "2025-26"
//! interpreter = "python3"
//! delay_secs = 60
//!
//! [publish]
//! remote = "origin"
//!
//! [[unit]]
//! name = "Phoenix Suns"
//! program = "python/Phoenix Suns 2025-2026.py"
//! artifacts = ["onoff_cache/Phoenix_Suns_2025-26_combo.json"]
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::models::{ProducerInvocation, RefreshMode, WorkUnit};
use crate::error::ConfigError;
use crate::{paths, teams};

const SEASON_PATTERN: &str = r"^\d{4}-\d{2}$";

/// Contents of `.statsync.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Batch settings
    #[serde(default)]
    pub batch: BatchSettings,
    /// Publish settings
    #[serde(default)]
    pub publish: PublishSettings,
    /// Declared units, in run order
    #[serde(default, rename = "unit")]
    pub units: Vec<UnitEntry>,
}

/// `[batch]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Season the caches describe (`YYYY-YY`)
    #[serde(default = "default_season")]
    pub season: String,
    /// Interpreter for unit programs; empty runs programs directly
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// Seconds to wait between units
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
    /// Age after which an unparseable run lock file is considered abandoned
    #[serde(default = "default_lock_stale_secs")]
    pub lock_stale_secs: u64,
}

fn default_season() -> String {
    "2025-26".to_string()
}

fn default_interpreter() -> String {
    "python3".to_string()
}

const fn default_delay_secs() -> u64 {
    60
}

// Longer than the slowest full rebuild (~20h)
const fn default_lock_stale_secs() -> u64 {
    24 * 60 * 60
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            season: default_season(),
            interpreter: default_interpreter(),
            delay_secs: default_delay_secs(),
            lock_stale_secs: default_lock_stale_secs(),
        }
    }
}

/// `[publish]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishSettings {
    /// Publish after each batch
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Remote to pull from and push to
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Branch to publish; the current branch when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Commit message prefix
    #[serde(default = "default_message_prefix")]
    pub message_prefix: String,
}

const fn default_true() -> bool {
    true
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_message_prefix() -> String {
    "Auto-update".to_string()
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            remote: default_remote(),
            branch: None,
            message_prefix: default_message_prefix(),
        }
    }
}

/// One `[[unit]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitEntry {
    /// Unique unit name
    pub name: String,
    /// Program path, relative to the working copy
    pub program: PathBuf,
    /// Interpreter override for this unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<String>,
    /// Extra arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Whether to pass `--build` / `--update`
    #[serde(default = "default_true")]
    pub pass_mode: bool,
    /// Artifacts the program writes, relative to the working copy
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<PathBuf>,
}

impl ProjectConfig {
    /// Default declarations: one unit per team plus the minutes and funnels domains
    #[must_use]
    pub fn default_for_season(season: &str) -> Self {
        let mut units: Vec<UnitEntry> = teams::TEAMS
            .iter()
            .map(|team| UnitEntry {
                name: (*team).to_string(),
                program: PathBuf::from(teams::team_script(team, season)),
                interpreter: None,
                args: Vec::new(),
                pass_mode: true,
                artifacts: vec![PathBuf::from(teams::team_cache(team, season))],
            })
            .collect();

        units.push(UnitEntry {
            name: "minutes".to_string(),
            program: PathBuf::from("generate_minutes.py"),
            interpreter: None,
            args: Vec::new(),
            pass_mode: false,
            artifacts: vec![PathBuf::from("minutes_data.json")],
        });
        units.push(UnitEntry {
            name: "funnels".to_string(),
            program: PathBuf::from("funnels_api.py"),
            interpreter: None,
            args: Vec::new(),
            pass_mode: false,
            artifacts: vec![PathBuf::from("funnels_cache/funnels.json")],
        });

        Self {
            batch: BatchSettings {
                season: season.to_string(),
                ..BatchSettings::default()
            },
            publish: PublishSettings::default(),
            units,
        }
    }

    /// Load and validate `.statsync.toml` from a working copy
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = paths::config_file(root);
        if !path.exists() {
            return Err(ConfigError::Missing(path));
        }
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let config = Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse { path, message },
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::from(paths::STATSYNC_TOML),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check season format and artifact paths
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_season(&self.batch.season)?;
        for unit in &self.units {
            for artifact in &unit.artifacts {
                if !is_contained(artifact) {
                    return Err(ConfigError::InvalidArtifact {
                        unit: unit.name.clone(),
                        path: artifact.display().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Write `.statsync.toml` into a working copy
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, root: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        crate::adapters::fs::atomic_write(&paths::config_file(root), content.as_bytes())
    }

    /// Delay between units
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_secs(self.batch.delay_secs)
    }

    /// Age after which an unparseable run lock file is abandoned
    #[must_use]
    pub const fn lock_stale_after(&self) -> Duration {
        Duration::from_secs(self.batch.lock_stale_secs)
    }

    /// Every declared unit, in order, for the given mode
    #[must_use]
    pub fn work_units(&self, mode: RefreshMode) -> Vec<WorkUnit> {
        self.units.iter().map(|entry| self.to_work_unit(entry, mode)).collect()
    }

    /// Declared units matching any selector (exact name or glob), in declared order
    ///
    /// An empty selector list selects everything. Each selector must match
    /// at least one unit.
    pub fn select(&self, mode: RefreshMode, selectors: &[String]) -> Result<Vec<WorkUnit>, ConfigError> {
        if selectors.is_empty() {
            return Ok(self.work_units(mode));
        }

        let matchers: Vec<(&String, Option<glob::Pattern>)> =
            selectors.iter().map(|s| (s, glob::Pattern::new(s).ok())).collect();
        let matches = |name: &str, (selector, pattern): &(&String, Option<glob::Pattern>)| {
            name.eq_ignore_ascii_case(selector) || pattern.as_ref().is_some_and(|p| p.matches(name))
        };

        for matcher in &matchers {
            if !self.units.iter().any(|u| matches(u.name.as_str(), matcher)) {
                return Err(ConfigError::UnknownUnit(matcher.0.clone()));
            }
        }

        Ok(self
            .units
            .iter()
            .filter(|u| matchers.iter().any(|m| matches(u.name.as_str(), m)))
            .map(|entry| self.to_work_unit(entry, mode))
            .collect())
    }

    fn to_work_unit(&self, entry: &UnitEntry, mode: RefreshMode) -> WorkUnit {
        let interpreter = entry
            .interpreter
            .clone()
            .unwrap_or_else(|| self.batch.interpreter.clone());
        let invocation = ProducerInvocation {
            interpreter: Some(interpreter).filter(|i| !i.trim().is_empty()),
            program: entry.program.clone(),
            args: entry.args.clone(),
            pass_mode: entry.pass_mode,
        };
        WorkUnit::new(entry.name.clone(), invocation, mode).with_artifacts(entry.artifacts.clone())
    }
}

/// Check a season string is `YYYY-YY` with consecutive years
pub fn validate_season(season: &str) -> Result<(), ConfigError> {
    let well_formed = Regex::new(SEASON_PATTERN).is_ok_and(|re| re.is_match(season));
    // 2025-26 expands to 2025-2026; the short end year must match the long one
    if well_formed && teams::season_long(season).is_some_and(|long| long[7..] == season[5..]) {
        Ok(())
    } else {
        Err(ConfigError::InvalidSeason(season.to_string()))
    }
}

fn is_contained(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

//! Refresh modes
//!
//! Decides whether producers rebuild their caches from scratch or only
//! fold in games played since the last run.

use serde::{Deserialize, Serialize};

/// How a producer should refresh its cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    /// Full rebuild (slow, tens of minutes per team)
    Build,
    /// Incremental update (only new games)
    #[default]
    Update,
}

impl RefreshMode {
    /// Command-line flag passed to the producer
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Build => "--build",
            Self::Update => "--update",
        }
    }
}

impl std::fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Build => write!(f, "build"),
            Self::Update => write!(f, "update"),
        }
    }
}

impl std::str::FromStr for RefreshMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim_start_matches("--") {
            "build" | "full" => Ok(Self::Build),
            "update" | "incremental" => Ok(Self::Update),
            _ => Err(format!("Invalid mode: {s}. Use: build, update")),
        }
    }
}

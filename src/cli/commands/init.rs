//! Write a default `.statsync.toml`

use std::fs;
use std::path::Path;

use statsync::adapters::fs::ensure_gitignore_entry;
use statsync::config::{ProjectConfig, validate_season};
use statsync::output::{OperationResult, OutputMode};
use statsync::{RefreshError, paths};

/// Initialize statsync in a working copy
pub fn init(repo: &Path, force: bool, season: &str, mode: OutputMode) -> anyhow::Result<()> {
    validate_season(season).map_err(RefreshError::from)?;

    fs::create_dir_all(repo)?;
    let config_path = paths::config_file(repo);

    if config_path.exists() && !force {
        OperationResult::ok(format!(
            "Already initialized ({} exists). Use --force to reinitialize.",
            paths::STATSYNC_TOML
        ))
        .render(mode);
        return Ok(());
    }

    let config = ProjectConfig::default_for_season(season);
    config.save(repo)?;
    let ignored = ensure_gitignore_entry(repo, &format!("{}/", paths::STATSYNC_DIR))?;

    let mut message = format!(
        "Created {} with {} units for {season}",
        paths::STATSYNC_TOML,
        config.units.len()
    );
    if ignored {
        message.push_str(&format!("\nAdded {}/ to .gitignore", paths::STATSYNC_DIR));
    }
    OperationResult::ok(message).render(mode);
    Ok(())
}

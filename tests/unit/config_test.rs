//! Tests for loading `.statsync.toml` from a working copy

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use statsync::ConfigError;
use statsync::config::ProjectConfig;
use statsync::core::models::RefreshMode;
use statsync::paths;
use tempfile::TempDir;

#[test]
fn test_missing_config() {
    let temp = TempDir::new().unwrap();

    let err = ProjectConfig::load(temp.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Missing(_)));
    assert!(err.to_string().contains("statsync init"));
}

#[test]
fn test_save_then_load() {
    let temp = TempDir::new().unwrap();
    let config = ProjectConfig::default_for_season("2025-26");

    config.save(temp.path()).unwrap();
    let loaded = ProjectConfig::load(temp.path()).unwrap();

    assert_eq!(loaded.units, config.units);
    assert_eq!(loaded.lock_stale_after(), Duration::from_secs(86_400));
}

#[test]
fn test_parse_error_names_file() {
    let temp = TempDir::new().unwrap();
    fs::write(paths::config_file(temp.path()), "[[unit]]\nname = 3\n").unwrap();

    let err = ProjectConfig::load(temp.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { ref path, .. } if path.ends_with(".statsync.toml")));
}

#[test]
fn test_team_units_point_at_team_scripts() {
    let config = ProjectConfig::default_for_season("2025-26");
    let units = config.select(RefreshMode::Build, &["Phoenix Suns".to_string()]).unwrap();

    assert_eq!(units.len(), 1);
    let unit = &units[0];
    assert_eq!(unit.invocation.program, PathBuf::from("python/Phoenix Suns 2025-2026.py"));
    assert_eq!(unit.invocation.interpreter.as_deref(), Some("python3"));
    assert_eq!(
        unit.artifacts,
        vec![PathBuf::from("onoff_cache/Phoenix_Suns_2025-26_combo.json")]
    );
    assert_eq!(unit.invocation.arguments(unit.mode), vec!["--build"]);
}

#[test]
fn test_select_is_case_insensitive() {
    let config = ProjectConfig::default_for_season("2025-26");

    let units = config.select(RefreshMode::Update, &["MINUTES".to_string()]).unwrap();

    assert_eq!(units[0].name, "minutes");
    assert!(units[0].invocation.arguments(RefreshMode::Update).is_empty());
}

#[test]
fn test_select_glob_matches_several() {
    let config = ProjectConfig::default_for_season("2025-26");

    let units = config.select(RefreshMode::Update, &["New *".to_string()]).unwrap();
    let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();

    assert_eq!(names, vec!["New Orleans Pelicans", "New York Knicks"]);
}

#[test]
fn test_empty_unit_list_selects_nothing() {
    let config = ProjectConfig::parse("[batch]\nseason = \"2025-26\"\n").unwrap();

    assert!(config.select(RefreshMode::Update, &[]).unwrap().is_empty());
}

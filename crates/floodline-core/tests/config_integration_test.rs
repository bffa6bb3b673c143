//! Integration tests for configuration loading

use floodline_core::config::PipelineConfig;
use std::fs;
use tempfile::TempDir;

#[test]
fn load_full_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("floodline.toml");
    fs::write(
        &path,
        r#"
        [overpass]
        endpoint = "https://overpass.example.org/api/interpreter"
        timeout_secs = 30

        [proximity]
        buffer_miles = 2.0

        [[tiers]]
        label = "close"
        miles = 0.05

        [[tiers]]
        label = "far"
        miles = 0.5
        "#,
    )
    .unwrap();

    let config = PipelineConfig::load(&path).unwrap();
    assert_eq!(config.overpass.endpoint, "https://overpass.example.org/api/interpreter");
    assert_eq!(config.overpass.timeout_secs, 30);
    assert_eq!(config.proximity.buffer_miles, 2.0);
    assert_eq!(config.tiers.len(), 2);
    assert_eq!(config.tiers[1].label, "far");
}

#[test]
fn load_rejects_invalid_distances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("floodline.toml");
    fs::write(
        &path,
        r#"
        [proximity]
        buffer_miles = -1.0
        "#,
    )
    .unwrap();

    assert!(PipelineConfig::load(&path).is_err());
}

#[test]
fn load_missing_file_is_an_io_error() {
    assert!(PipelineConfig::load("does-not-exist.toml").is_err());
}

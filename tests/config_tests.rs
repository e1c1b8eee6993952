// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use polaroid_booth::Config;
use polaroid_booth::FilterType;
use polaroid_booth::board::{Point, Rect, Size};

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.storage_key, "polaroid-photos");
    assert_eq!(config.canvas, Size::new(1280.0, 800.0));
    assert_eq!(config.default_filter, FilterType::Normal);
    assert!(config.data_dir.is_none());
}

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        storage_key: "party".to_string(),
        default_filter: FilterType::Sepia,
        capture_anchor: Some(Point::new(10.0, 20.0)),
        ..Config::default()
    };
    config.save(&path).unwrap();

    let loaded = Config::load(&path);
    assert_eq!(loaded.storage_key, "party");
    assert_eq!(loaded.default_filter, FilterType::Sepia);
    assert_eq!(loaded.capture_anchor(), Point::new(10.0, 20.0));
}

#[test]
fn test_missing_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("absent.json"));
    assert_eq!(config.storage_key, Config::default().storage_key);
}

#[test]
fn test_invalid_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "not json at all").unwrap();

    let config = Config::load(&path);
    assert_eq!(config.trash_bounds(), Rect::new(1160.0, 664.0, 1240.0, 760.0));
}

#[test]
fn test_data_dir_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    assert_eq!(config.photos_dir(), dir.path().join("photos"));
}

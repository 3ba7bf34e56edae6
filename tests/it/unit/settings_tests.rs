//! Unit tests for settings module.

use castboard::error::ConfigError;
use castboard::paginator::PageBound;
use castboard::settings::ViewSettings;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("castboard").join("settings.json");

    let settings = ViewSettings {
        initial_page_size: 20,
        page_size_options: vec![10, 20, 40],
        page_bound: PageBound::Inclusive,
        catalog_path: Some(PathBuf::from("/data/characters.json")),
        ..ViewSettings::default()
    };
    settings.save_to(&path).unwrap();

    let loaded = ViewSettings::load_from(&path).unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn test_empty_object_is_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{}").unwrap();

    assert_eq!(ViewSettings::load_from(&path).unwrap(), ViewSettings::default());
}

#[test]
fn test_invalid_values_rejected_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");

    fs::write(&path, r#"{"debounce_ms": 60000}"#).unwrap();
    assert!(matches!(
        ViewSettings::load_from(&path),
        Err(ConfigError::Invalid { key: "debounce_ms", .. })
    ));

    fs::write(&path, r#"{"page_size_options": []}"#).unwrap();
    assert!(matches!(
        ViewSettings::load_from(&path),
        Err(ConfigError::Invalid { key: "page_size_options", .. })
    ));

    fs::write(&path, r#"{"page_bound": "sideways"}"#).unwrap();
    assert!(matches!(ViewSettings::load_from(&path), Err(ConfigError::Json(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let result = ViewSettings::load_from(&dir.path().join("missing.json"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_env_zero_page_size_rejected() {
    let result = ViewSettings::default().apply_env(|key| {
        (key == "CASTBOARD_PAGE_SIZE").then(|| "0".to_string())
    });
    assert!(matches!(
        result,
        Err(ConfigError::Invalid { key: "initial_page_size", .. })
    ));
}

#[test]
fn test_env_without_overrides_is_identity() {
    let settings = ViewSettings::default().apply_env(|_| None).unwrap();
    assert_eq!(settings, ViewSettings::default());
}

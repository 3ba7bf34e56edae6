//! Unit tests for settings_watcher module.

use castboard::settings_watcher::{SettingsWatcher, default_settings_path};
use std::fs;
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_watcher_creation() {
    let dir = tempdir().unwrap();
    let settings_path = dir.path().join("settings.json");
    fs::write(&settings_path, "{}").unwrap();

    let watcher = SettingsWatcher::new(settings_path.clone()).unwrap();
    assert_eq!(watcher.path(), settings_path.as_path());
}

#[test]
fn test_default_path() {
    if let Some(path) = default_settings_path() {
        assert!(path.ends_with("castboard/settings.json"));
    }
}

#[test]
fn test_poll_without_changes() {
    let dir = tempdir().unwrap();
    let settings_path = dir.path().join("settings.json");
    fs::write(&settings_path, "{}").unwrap();

    let mut watcher = SettingsWatcher::new(settings_path).unwrap();
    // Unrelated files in the same directory are filtered out.
    fs::write(dir.path().join("other.txt"), "x").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(50));
    assert_eq!(watcher.poll(), None);
}

/// Ignored: OS file events are timing-dependent and not reliable in CI.
#[test]
#[ignore]
fn test_file_modification_detection() {
    let dir = tempdir().unwrap();
    let settings_path = dir.path().join("settings.json");
    fs::write(&settings_path, "{}").unwrap();

    let mut watcher = SettingsWatcher::new(settings_path.clone()).unwrap();

    let mut file = fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(&settings_path)
        .unwrap();
    writeln!(file, "{{\"debounce_ms\": 150}}").unwrap();
    file.sync_all().unwrap();

    std::thread::sleep(std::time::Duration::from_millis(500));
    assert!(watcher.poll().is_some());
}

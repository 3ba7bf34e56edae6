//! Settings file watcher for hot reload.
//!
//! Wraps a `notify` watcher on the settings file's directory and exposes a
//! non-blocking [`SettingsWatcher::poll`]. The terminal front-end polls it and
//! forwards new page size options to the view controller.

use crate::error::ConfigResult;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError, channel};

pub use crate::settings::default_settings_path;

/// A change to the watched settings file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingsEvent {
    Created,
    Modified,
    Deleted,
    Error(String),
}

pub struct SettingsWatcher {
    path: PathBuf,
    rx: Receiver<notify::Result<Event>>,
    // Dropping the watcher stops the OS watch.
    _watcher: RecommendedWatcher,
}

impl SettingsWatcher {
    /// Watch `path`. The parent directory is watched so the file may be
    /// replaced atomically by editors.
    pub fn new(path: PathBuf) -> ConfigResult<Self> {
        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %path.display(), "Watching settings");
        Ok(Self {
            path,
            rx,
            _watcher: watcher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next relevant event, if any arrived since the last poll.
    pub fn poll(&mut self) -> Option<SettingsEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    if let Some(mapped) = self.map_event(&event) {
                        return Some(mapped);
                    }
                }
                Ok(Err(e)) => return Some(SettingsEvent::Error(e.to_string())),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    return Some(SettingsEvent::Error("watcher disconnected".into()));
                }
            }
        }
    }

    fn map_event(&self, event: &Event) -> Option<SettingsEvent> {
        if !event.paths.iter().any(|p| p.file_name() == self.path.file_name()) {
            return None;
        }
        match event.kind {
            EventKind::Create(_) => Some(SettingsEvent::Created),
            EventKind::Modify(_) => Some(SettingsEvent::Modified),
            EventKind::Remove(_) => Some(SettingsEvent::Deleted),
            _ => None,
        }
    }
}

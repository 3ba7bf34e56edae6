//! View settings: page sizes, debounce interval, export and catalog paths.
//!
//! Settings live in `<config dir>/castboard/settings.json`. Missing fields
//! fall back to their defaults, so an empty `{}` file is valid. A few values
//! can be overridden from the environment (see [`ViewSettings::apply_env`]).

use crate::constants::{
    DEFAULT_EXPORT_FILE, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS, ENV_CATALOG,
    ENV_DEBOUNCE_MS, ENV_PAGE_SIZE, FILTER_DEBOUNCE_MS, SETTINGS_DIR, SETTINGS_FILE,
    SLOW_FETCH_MS,
};
use crate::error::{ConfigError, ConfigResult};
use crate::paginator::PageBound;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper limit for the debounce interval; anything longer feels broken
const MAX_DEBOUNCE_MS: u64 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub initial_page_size: u32,
    pub page_size_options: Vec<u32>,
    pub debounce_ms: u64,
    pub page_bound: PageBound,
    pub slow_fetch_ms: u64,
    pub export_path: PathBuf,
    pub catalog_path: Option<PathBuf>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            initial_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            debounce_ms: FILTER_DEBOUNCE_MS,
            page_bound: PageBound::default(),
            slow_fetch_ms: SLOW_FETCH_MS,
            export_path: PathBuf::from(DEFAULT_EXPORT_FILE),
            catalog_path: None,
        }
    }
}

impl ViewSettings {
    /// Load from the default location, falling back to defaults on any error.
    pub fn load() -> Self {
        let Some(path) = default_settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load and validate settings from `path`.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Apply overrides read through `lookup` (normally `std::env::var`).
    ///
    /// | Env Var                 | Field               |
    /// |-------------------------|---------------------|
    /// | `CASTBOARD_PAGE_SIZE`   | `initial_page_size` |
    /// | `CASTBOARD_DEBOUNCE_MS` | `debounce_ms`       |
    /// | `CASTBOARD_CATALOG`     | `catalog_path`      |
    pub fn apply_env<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_PAGE_SIZE) {
            self.initial_page_size = value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: ENV_PAGE_SIZE,
                reason: format!("not a page size: {value}"),
            })?;
        }
        if let Some(value) = lookup(ENV_DEBOUNCE_MS) {
            self.debounce_ms = value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: ENV_DEBOUNCE_MS,
                reason: format!("not a duration in ms: {value}"),
            })?;
        }
        if let Some(value) = lookup(ENV_CATALOG) {
            self.catalog_path = Some(PathBuf::from(value));
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.initial_page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "initial_page_size",
                reason: "must be at least 1".into(),
            });
        }
        if self.page_size_options.is_empty() || self.page_size_options.contains(&0) {
            return Err(ConfigError::Invalid {
                key: "page_size_options",
                reason: "must list at least one size, all above 0".into(),
            });
        }
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::Invalid {
                key: "debounce_ms",
                reason: format!("must be at most {MAX_DEBOUNCE_MS}"),
            });
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn slow_fetch_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_fetch_ms)
    }
}

/// `<config dir>/castboard/settings.json`, if the platform has a config dir.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

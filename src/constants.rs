//! Application-wide constants.
//!
//! Centralizes defaults and labels so the controller, the settings layer and
//! the terminal front-end agree on them.

// ============================================================================
// Pagination
// ============================================================================

/// Page size used before the user picks one
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Page size choices offered by the paginator
pub const DEFAULT_PAGE_SIZE_OPTIONS: &[u32] = &[10, 20, 50, 100, 200, 500];

/// First page number (pages are one-based)
pub const FIRST_PAGE: u32 = 1;

// ============================================================================
// Timing
// ============================================================================

/// Quiet period for the search box debounce, in milliseconds
pub const FILTER_DEBOUNCE_MS: u64 = 300;

/// A fetch still loading after this many milliseconds is reported as slow
pub const SLOW_FETCH_MS: u64 = 5_000;

/// Projection longer than this is logged as a warning
pub const PROJECTION_WARN_MS: f64 = 16.67;

// ============================================================================
// Chart & Export
// ============================================================================

/// Title shown above the films chart
pub const CHART_TITLE: &str = "Number of movies by character";

/// Series name for the films chart
pub const CHART_SERIES_NAME: &str = "Number of movies";

/// Header of the label column in exported sheets
pub const EXPORT_LABEL_HEADER: &str = "Character Name";

/// Default file name for chart exports
pub const DEFAULT_EXPORT_FILE: &str = "characters.csv";

// ============================================================================
// Settings
// ============================================================================

/// Directory name under the platform config dir
pub const SETTINGS_DIR: &str = "castboard";

/// Settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Env var overriding the initial page size
pub const ENV_PAGE_SIZE: &str = "CASTBOARD_PAGE_SIZE";

/// Env var overriding the debounce interval (milliseconds)
pub const ENV_DEBOUNCE_MS: &str = "CASTBOARD_DEBOUNCE_MS";

/// Env var pointing at the JSON catalog
pub const ENV_CATALOG: &str = "CASTBOARD_CATALOG";

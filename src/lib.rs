//! castboard - a paginated, filterable character table with a films chart.
//!
//! Modules, leaf to root:
//! - `filter` - debounced search box values
//! - `paginator` - page / page size cursor
//! - `fetcher` - query service trait and request supersession
//! - `data` - table/chart projection, client-side sort, CSV export
//! - `controller` - the view actor tying them together
//!
//! Supporting modules:
//! - `types` - records, pagination info, query parameters
//! - `catalog` - JSON-file backed query service
//! - `services` - detail, announcement and export capabilities
//! - `settings` / `settings_watcher` - configuration and hot reload
//! - `perf` - scoped timers

pub mod catalog;
pub mod constants;
pub mod controller;
pub mod data;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod paginator;
pub mod perf;
pub mod services;
pub mod settings;
pub mod settings_watcher;
pub mod types;

pub use controller::{ViewController, ViewEvent, ViewHandle, ViewSnapshot};
pub use fetcher::{CharacterQuery, FetchStatus};
pub use types::{CharacterPage, CharacterRecord, PaginationInfo, QueryParameters};

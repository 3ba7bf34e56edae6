//! Error types for fetching, configuration, catalogs and export.
//!
//! `FetchError` is the only error that ever reaches view state; it is cloned
//! into `FetchStatus::Failed` and into published snapshots. The others stay at
//! the edges (settings load, catalog load, export) and are logged or bubbled
//! to `main`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by a query service for a single request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (connection, DNS, aborted service)
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with one or more errors
    #[error("server error: {}", messages.join("; "))]
    Server { messages: Vec<String> },

    /// The response did not match the expected shape
    #[error("malformed response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn server(message: impl Into<String>) -> Self {
        FetchError::Server {
            messages: vec![message.into()],
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Errors loading or validating settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value parsed but is not usable
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// Errors loading a JSON catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors writing an export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing has been loaded yet
    #[error("nothing to export")]
    Empty,
}

/// Result type alias for settings operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

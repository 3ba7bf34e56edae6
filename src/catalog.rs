//! JSON-file backed query service.
//!
//! Serves pages out of a local character dump with the same contract as the
//! remote endpoint: one-based pages, case-insensitive name filter, and a
//! `PaginationInfo` describing the filtered result set. The record list sits
//! behind a lock so the file can be reloaded while views are running.

use crate::error::{CatalogError, FetchError, FetchResult};
use crate::fetcher::CharacterQuery;
use crate::types::{CharacterPage, CharacterRecord, PaginationInfo, QueryParameters};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Accepted file shapes: a bare array or `{ "data": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Records(Vec<CharacterRecord>),
    Wrapped { data: Vec<CharacterRecord> },
}

impl CatalogFile {
    fn into_records(self) -> Vec<CharacterRecord> {
        match self {
            CatalogFile::Records(records) | CatalogFile::Wrapped { data: records } => records,
        }
    }
}

pub struct CharacterCatalog {
    path: Option<PathBuf>,
    records: RwLock<Arc<[CharacterRecord]>>,
    latency: Duration,
}

impl CharacterCatalog {
    pub fn from_records(records: Vec<CharacterRecord>) -> Self {
        Self {
            path: None,
            records: RwLock::new(records.into()),
            latency: Duration::ZERO,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let records = read_catalog(path)?;
        tracing::debug!(path = %path.display(), records = records.len(), "Loaded catalog");
        Ok(Self {
            path: Some(path.to_path_buf()),
            records: RwLock::new(records.into()),
            latency: Duration::ZERO,
        })
    }

    /// Delay every response, to exercise loading states against a local file.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Re-read the backing file. Catalogs built from memory are left as is.
    pub fn reload(&self) -> Result<usize, CatalogError> {
        let Some(path) = &self.path else {
            return Ok(self.len());
        };
        let records = read_catalog(path)?;
        let count = records.len();
        *self.records.write() = records.into();
        tracing::info!(path = %path.display(), records = count, "Reloaded catalog");
        Ok(count)
    }

    /// Compute one page synchronously.
    pub fn page(&self, params: &QueryParameters) -> CharacterPage {
        let records = Arc::clone(&self.records.read());
        let needle = params.filter_name().map(str::to_lowercase);
        let matching: Vec<&CharacterRecord> = records
            .iter()
            .filter(|r| match &needle {
                Some(n) => r.name.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .collect();

        let page_size = params.page_size.max(1) as usize;
        let total_pages = matching.len().div_ceil(page_size).max(1) as u32;
        let start = (params.page.max(1) as usize - 1).saturating_mul(page_size);
        let items: Vec<CharacterRecord> = matching
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();

        CharacterPage {
            pagination_info: PaginationInfo {
                has_next_page: params.page < total_pages,
                has_previous_page: params.page > 1,
                page_item_count: items.len() as u32,
                total_pages,
            },
            items,
        }
    }
}

#[async_trait]
impl CharacterQuery for CharacterCatalog {
    async fn fetch_page(&self, params: &QueryParameters) -> FetchResult<CharacterPage> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if params.page == 0 || params.page_size == 0 {
            return Err(FetchError::server("page and pageSize must be positive"));
        }
        Ok(self.page(params))
    }
}

fn read_catalog(path: &Path) -> Result<Vec<CharacterRecord>, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: CatalogFile = serde_json::from_str(&content).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.into_records())
}

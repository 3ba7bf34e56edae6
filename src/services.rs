//! Capability interfaces the view controller depends on.
//!
//! The controller never renders dialogs, speaks to assistive technology or
//! writes files itself; it calls these traits, which are supplied when the
//! controller is built.

use crate::data::{CsvExporter, Projection, SortDirection};
use crate::error::ExportError;
use crate::types::CharacterRecord;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shows a single record in a detail surface (dialog, pane, stdout...)
pub trait DetailPresenter: Send + Sync {
    fn present(&self, record: &CharacterRecord);
}

/// Turns a sort change into a human-readable announcement
pub trait SortAnnouncer: Send + Sync {
    fn announce(&self, direction: SortDirection) -> String;
}

/// Produces a downloadable spreadsheet from the current projection
pub trait ChartExporter: Send + Sync {
    fn export(&self, projection: &Projection) -> Result<PathBuf, ExportError>;
}

/// Announcer producing the standard sort messages
#[derive(Clone, Copy, Debug, Default)]
pub struct LiveAnnouncer;

impl SortAnnouncer for LiveAnnouncer {
    fn announce(&self, direction: SortDirection) -> String {
        let message = match direction {
            SortDirection::Ascending => "Sorted ascending",
            SortDirection::Descending => "Sorted descending",
            SortDirection::None => "Sorting cleared",
        };
        tracing::debug!(message, "Sort announcement");
        message.to_string()
    }
}

/// Presenter that writes the record to the log
#[derive(Clone, Copy, Debug, Default)]
pub struct LogPresenter;

impl DetailPresenter for LogPresenter {
    fn present(&self, record: &CharacterRecord) {
        tracing::info!(
            id = %record.id,
            name = %record.name,
            films = record.films.len(),
            "Character detail"
        );
    }
}

/// The collaborators a view controller is built with
#[derive(Clone)]
pub struct ViewServices {
    pub detail: Arc<dyn DetailPresenter>,
    pub announcer: Arc<dyn SortAnnouncer>,
    pub exporter: Arc<dyn ChartExporter>,
}

impl ViewServices {
    pub fn new(
        detail: Arc<dyn DetailPresenter>,
        announcer: Arc<dyn SortAnnouncer>,
        exporter: Arc<dyn ChartExporter>,
    ) -> Self {
        Self {
            detail,
            announcer,
            exporter,
        }
    }

    /// Log-only detail presenter, standard announcer, CSV export to `export_path`.
    pub fn headless(export_path: &Path) -> Self {
        Self::new(
            Arc::new(LogPresenter),
            Arc::new(LiveAnnouncer),
            Arc::new(CsvExporter::new(export_path)),
        )
    }

    pub fn with_detail(mut self, detail: Arc<dyn DetailPresenter>) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_exporter(mut self, exporter: Arc<dyn ChartExporter>) -> Self {
        self.exporter = exporter;
        self
    }
}

//! Spreadsheet export of the films chart.
//!
//! Writes the chart series as CSV (`Character Name,Number of movies`), which
//! every spreadsheet application opens directly.

use super::projector::{ChartSeries, Projection};
use crate::constants::EXPORT_LABEL_HEADER;
use crate::error::ExportError;
use crate::services::ChartExporter;
use std::path::{Path, PathBuf};

/// Convert a chart series to CSV string content
pub fn chart_csv(series: &ChartSeries) -> String {
    let mut lines = Vec::with_capacity(series.points.len() + 1);

    // Write header row
    lines.push(format!(
        "{},{}",
        quote_csv_field(EXPORT_LABEL_HEADER),
        quote_csv_field(&series.name)
    ));

    // Write data rows
    for point in &series.points {
        lines.push(format!("{},{}", quote_csv_field(&point.label), point.value));
    }

    lines.join("\n")
}

/// Quote a CSV field if necessary (contains commas, quotes, or newlines)
fn quote_csv_field(value: &str) -> String {
    let needs_quoting =
        value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r');

    if needs_quoting {
        // Escape internal quotes by doubling them
        let escaped = value.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}

/// Exporter writing the chart as CSV to a fixed path
#[derive(Clone, Debug)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartExporter for CsvExporter {
    fn export(&self, projection: &Projection) -> Result<PathBuf, ExportError> {
        if projection.chart.points.is_empty() {
            return Err(ExportError::Empty);
        }
        std::fs::write(&self.path, chart_csv(&projection.chart))?;
        tracing::info!(
            path = %self.path.display(),
            points = projection.chart.points.len(),
            "Exported chart"
        );
        Ok(self.path.clone())
    }
}

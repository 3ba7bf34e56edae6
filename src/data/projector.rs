//! Table/chart projection of a record batch.
//!
//! Projection is a pure function of the batch: it is recomputed in full every
//! time a batch is accepted and never patched, so the table and the chart
//! always see the same snapshot.

use crate::constants::{CHART_SERIES_NAME, CHART_TITLE, PROJECTION_WARN_MS};
use crate::profile_scope;
use crate::types::CharacterRecord;
use serde::Serialize;

/// One table row derived from a record
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    pub id: String,
    pub name: String,
    pub tv_show_count: usize,
    pub video_game_count: usize,
    pub allies: Vec<String>,
    pub enemies: Vec<String>,
}

impl DisplayRow {
    pub fn from_record(record: &CharacterRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            tv_show_count: record.tv_shows.len(),
            video_game_count: record.video_games.len(),
            allies: record.allies.clone(),
            enemies: record.enemies.clone(),
        }
    }
}

/// A single data point in the films chart
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    /// Character name
    pub label: String,
    /// Number of films
    pub value: usize,
    /// Film titles, listed in the tooltip
    pub detail: Vec<String>,
}

/// Processed chart data ready for rendering
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub name: String,
    pub points: Vec<ChartPoint>,
}

impl Default for ChartSeries {
    fn default() -> Self {
        Self {
            title: CHART_TITLE.to_string(),
            name: CHART_SERIES_NAME.to_string(),
            points: Vec::new(),
        }
    }
}

impl ChartSeries {
    pub fn total(&self) -> usize {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Share of the point at `index` in percent, 0 when the series sums to 0.
    pub fn percentage(&self, index: usize) -> Option<f64> {
        let point = self.points.get(index)?;
        let total = self.total();
        if total == 0 {
            return Some(0.0);
        }
        Some(point.value as f64 * 100.0 / total as f64)
    }

    /// Plain-text tooltip: name and share, then one film per line.
    pub fn tooltip(&self, index: usize) -> Option<String> {
        let point = self.points.get(index)?;
        let pct = self.percentage(index)?;
        let mut text = format!("{}: {:.2}%\nList of movies:", point.label, pct);
        for film in &point.detail {
            text.push_str("\n- ");
            text.push_str(film);
        }
        Some(text)
    }
}

/// Everything the table and the chart render for one batch
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub rows: Vec<DisplayRow>,
    pub chart: ChartSeries,
}

impl Projection {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Project a batch into table rows and chart points, preserving batch order.
pub fn project(records: &[CharacterRecord]) -> Projection {
    profile_scope!("project", PROJECTION_WARN_MS);

    let rows = records.iter().map(DisplayRow::from_record).collect();
    let points = records
        .iter()
        .map(|r| ChartPoint {
            label: r.name.clone(),
            value: r.films.len(),
            detail: r.films.clone(),
        })
        .collect();

    Projection {
        rows,
        chart: ChartSeries {
            points,
            ..ChartSeries::default()
        },
    }
}

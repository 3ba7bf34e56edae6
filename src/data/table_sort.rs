//! Client-side table sorting.
//!
//! Sorting never refetches: it only reorders the rows of the projection that
//! is already loaded, via an index vector so the projection itself stays in
//! server order.

use super::projector::DisplayRow;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sortable table columns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    Name,
    TvShows,
    VideoGames,
    Allies,
    Enemies,
}

impl SortColumn {
    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::TvShows => "TV Shows",
            SortColumn::VideoGames => "Video Games",
            SortColumn::Allies => "Allies",
            SortColumn::Enemies => "Enemies",
        }
    }

    pub fn all() -> &'static [SortColumn] {
        &[
            SortColumn::Name,
            SortColumn::TvShows,
            SortColumn::VideoGames,
            SortColumn::Allies,
            SortColumn::Enemies,
        ]
    }

    /// Parse a column name as typed by a user ("name", "tv", "games", ...).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "name" => Some(SortColumn::Name),
            "tv" | "tv_shows" | "tvshows" => Some(SortColumn::TvShows),
            "games" | "video_games" | "videogames" => Some(SortColumn::VideoGames),
            "allies" => Some(SortColumn::Allies),
            "enemies" => Some(SortColumn::Enemies),
            _ => None,
        }
    }

    fn compare(&self, a: &DisplayRow, b: &DisplayRow) -> Ordering {
        match self {
            SortColumn::Name => a.name.cmp(&b.name),
            SortColumn::TvShows => a.tv_show_count.cmp(&b.tv_show_count),
            SortColumn::VideoGames => a.video_game_count.cmp(&b.video_game_count),
            SortColumn::Allies => a.allies.join(",").cmp(&b.allies.join(",")),
            SortColumn::Enemies => a.enemies.join(",").cmp(&b.enemies.join(",")),
        }
    }
}

/// Sort direction, `None` meaning "server order"
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
    #[default]
    None,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            "" | "none" | "clear" => Some(SortDirection::None),
            _ => None,
        }
    }
}

/// Current sort state of the table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl TableSort {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Row indices in display order. Stable, so ties keep server order.
    pub fn sorted_indices(&self, rows: &[DisplayRow]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        match self.direction {
            SortDirection::None => {}
            SortDirection::Ascending => {
                indices.sort_by(|&a, &b| self.column.compare(&rows[a], &rows[b]))
            }
            SortDirection::Descending => {
                indices.sort_by(|&a, &b| self.column.compare(&rows[b], &rows[a]))
            }
        }
        indices
    }
}

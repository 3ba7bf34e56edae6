//! Core data types: character records, pagination metadata and query parameters.
//!
//! Wire names follow the remote query service (`_id`, camelCase fields), so
//! every type here round-trips through `serde_json` unchanged.

use crate::constants::FIRST_PAGE;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

/// A character as returned by the query service.
///
/// Records are immutable once received. A new fetch replaces the whole batch,
/// individual records are never patched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    /// Server-assigned identity
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alignment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub films: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_films: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tv_shows: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video_games: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub park_attractions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub allies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub enemies: Vec<String>,
}

impl CharacterRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_films(mut self, films: &[&str]) -> Self {
        self.films = films.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_tv_shows(mut self, shows: &[&str]) -> Self {
        self.tv_shows = shows.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_video_games(mut self, games: &[&str]) -> Self {
        self.video_games = games.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn with_allies(mut self, allies: &[&str]) -> Self {
        self.allies = allies.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_enemies(mut self, enemies: &[&str]) -> Self {
        self.enemies = enemies.iter().map(|e| e.to_string()).collect();
        self
    }
}

/// Server-side paging metadata, always replaced together with its batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub page_item_count: u32,
    pub total_pages: u32,
}

/// One response of the query service: a record batch and its paging metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<CharacterRecord>,
    pub pagination_info: PaginationInfo,
}

/// Server-side name filter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterFilter {
    pub name: String,
}

/// The single value that fully determines a fetch.
///
/// Equality is by value: two parameter sets that compare equal describe the
/// same request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameters {
    pub page: u32,
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<CharacterFilter>,
}

impl QueryParameters {
    /// Build parameters without a filter. Page and page size are clamped to 1.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(FIRST_PAGE),
            page_size: page_size.max(1),
            filter: None,
        }
    }

    /// Attach a name filter. `None` and the empty string both mean "no filter".
    pub fn with_filter(mut self, name: Option<&str>) -> Self {
        self.filter = name
            .filter(|n| !n.is_empty())
            .map(|n| CharacterFilter { name: n.to_string() });
        self
    }

    /// The filter name, if one is applied.
    pub fn filter_name(&self) -> Option<&str> {
        self.filter.as_ref().map(|f| f.name.as_str())
    }

    /// Request variables exactly as sent to the query service.
    ///
    /// The `filter` key is omitted entirely when no name is set; sending an
    /// empty name would change the server's semantics.
    pub fn variables(&self) -> serde_json::Value {
        let mut vars = json!({
            "page": self.page,
            "pageSize": self.page_size,
        });
        if let Some(filter) = &self.filter {
            vars["filter"] = json!({ "name": filter.name });
        }
        vars
    }
}

/// Deserialize `null` as the type's default (empty list, empty string).
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

/// Genres offered by the recommendation quiz
pub const GENRES: [&str; 10] = [
    "Action",
    "Adventure",
    "Fantasy",
    "Romance",
    "Comedy",
    "Drama",
    "Horror",
    "Sci-Fi",
    "Slice of Life",
    "Sports",
];

/// Opaque identifier assigned by the catalog backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimeId(pub String);

impl AnimeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AnimeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single anime title as delivered by the catalog provider.
///
/// Absent fields stay `None`; they are never defaulted, because the filter
/// stages treat missing data differently from present data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimeRecord {
    #[serde(alias = "_id")]
    pub id: AnimeId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    /// Score on a 1-5 scale
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub alt_names: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Backend documents may carry `null` for list fields; read it as empty
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl AnimeRecord {
    /// Creates a record with only an id and a name set
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: AnimeId::new(id),
            name: name.into(),
            genres: Vec::new(),
            release_year: None,
            rating: None,
            episodes: None,
            status: None,
            alt_names: Vec::new(),
            description: None,
            tags: Vec::new(),
            image: None,
        }
    }

    pub fn with_genres(mut self, genres: &[&str]) -> Self {
        self.genres = genres.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn with_release_year(mut self, year: i32) -> Self {
        self.release_year = Some(year);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_episodes(mut self, episodes: u32) -> Self {
        self.episodes = Some(episodes);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    // The catalog backend stores zero for "unknown" in some fields, so zero,
    // NaN and empty strings count as missing.

    /// Release year, with zero treated as missing
    pub fn known_release_year(&self) -> Option<i32> {
        self.release_year.filter(|year| *year != 0)
    }

    /// Rating, with zero and NaN treated as missing
    pub fn known_rating(&self) -> Option<f64> {
        self.rating.filter(|rating| *rating != 0.0 && !rating.is_nan())
    }

    /// Episode count, with zero treated as missing
    pub fn known_episodes(&self) -> Option<u32> {
        self.episodes.filter(|episodes| *episodes != 0)
    }

    /// Airing status, with an empty string treated as missing
    pub fn known_status(&self) -> Option<&str> {
        self.status.as_deref().filter(|status| !status.is_empty())
    }
}

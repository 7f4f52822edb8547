use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use super::AnimeRecord;
use crate::error::AppError;

/// Label the quiz shows for "no constraint on this dimension"
pub const NO_PREFERENCE_LABEL: &str = "I don't care";

/// Release-year range picked in the year step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YearBucket {
    LastTenYears,
    LastFiveYears,
    ThisYear,
    #[default]
    NoPreference,
}

impl YearBucket {
    pub const ALL: [YearBucket; 4] = [
        YearBucket::LastTenYears,
        YearBucket::LastFiveYears,
        YearBucket::ThisYear,
        YearBucket::NoPreference,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            YearBucket::LastTenYears => "last_ten_years",
            YearBucket::LastFiveYears => "last_five_years",
            YearBucket::ThisYear => "this_year",
            YearBucket::NoPreference => "no_preference",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            YearBucket::LastTenYears => "Last 10 Years",
            YearBucket::LastFiveYears => "Last 5 Years",
            YearBucket::ThisYear => "This Year",
            YearBucket::NoPreference => NO_PREFERENCE_LABEL,
        }
    }
}

/// Minimum rating picked in the rating step (1-5 scale)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RatingBucket {
    #[serde(rename = "popular")]
    Popular,
    #[serde(rename = "at_least_4")]
    AtLeast4,
    #[serde(rename = "at_least_3")]
    AtLeast3,
    #[default]
    #[serde(rename = "no_preference")]
    NoPreference,
}

impl RatingBucket {
    pub const ALL: [RatingBucket; 4] = [
        RatingBucket::Popular,
        RatingBucket::AtLeast4,
        RatingBucket::AtLeast3,
        RatingBucket::NoPreference,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            RatingBucket::Popular => "popular",
            RatingBucket::AtLeast4 => "at_least_4",
            RatingBucket::AtLeast3 => "at_least_3",
            RatingBucket::NoPreference => "no_preference",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RatingBucket::Popular => "5 - Popular",
            RatingBucket::AtLeast4 => "4+",
            RatingBucket::AtLeast3 => "3+",
            RatingBucket::NoPreference => NO_PREFERENCE_LABEL,
        }
    }

    /// Lowest accepted rating, `None` for no preference
    pub fn threshold(&self) -> Option<f64> {
        match self {
            RatingBucket::Popular => Some(5.0),
            RatingBucket::AtLeast4 => Some(4.0),
            RatingBucket::AtLeast3 => Some(3.0),
            RatingBucket::NoPreference => None,
        }
    }
}

/// Episode-count range picked in the episodes step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeBucket {
    OneToTwelve,
    OneToTwentyFour,
    OneToFifty,
    OneToHundred,
    MoreThanHundred,
    #[default]
    NoPreference,
}

impl EpisodeBucket {
    pub const ALL: [EpisodeBucket; 6] = [
        EpisodeBucket::OneToTwelve,
        EpisodeBucket::OneToTwentyFour,
        EpisodeBucket::OneToFifty,
        EpisodeBucket::OneToHundred,
        EpisodeBucket::MoreThanHundred,
        EpisodeBucket::NoPreference,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            EpisodeBucket::OneToTwelve => "one_to_twelve",
            EpisodeBucket::OneToTwentyFour => "one_to_twenty_four",
            EpisodeBucket::OneToFifty => "one_to_fifty",
            EpisodeBucket::OneToHundred => "one_to_hundred",
            EpisodeBucket::MoreThanHundred => "more_than_hundred",
            EpisodeBucket::NoPreference => "no_preference",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EpisodeBucket::OneToTwelve => "1-12",
            EpisodeBucket::OneToTwentyFour => "1-24",
            EpisodeBucket::OneToFifty => "1-50",
            EpisodeBucket::OneToHundred => "1-100",
            EpisodeBucket::MoreThanHundred => "100+",
            EpisodeBucket::NoPreference => NO_PREFERENCE_LABEL,
        }
    }

    /// Whether an episode count falls inside this inclusive range
    pub fn contains(&self, episodes: u32) -> bool {
        match self {
            EpisodeBucket::OneToTwelve => (1..=12).contains(&episodes),
            EpisodeBucket::OneToTwentyFour => (1..=24).contains(&episodes),
            EpisodeBucket::OneToFifty => (1..=50).contains(&episodes),
            EpisodeBucket::OneToHundred => (1..=100).contains(&episodes),
            EpisodeBucket::MoreThanHundred => episodes > 100,
            EpisodeBucket::NoPreference => true,
        }
    }
}

/// Airing status picked in the last step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPreference {
    Ongoing,
    Completed,
    #[default]
    NoPreference,
}

impl StatusPreference {
    pub const ALL: [StatusPreference; 3] = [
        StatusPreference::Ongoing,
        StatusPreference::Completed,
        StatusPreference::NoPreference,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            StatusPreference::Ongoing => "ongoing",
            StatusPreference::Completed => "completed",
            StatusPreference::NoPreference => "no_preference",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusPreference::Ongoing => "Ongoing",
            StatusPreference::Completed => "Completed",
            StatusPreference::NoPreference => NO_PREFERENCE_LABEL,
        }
    }

    /// Status string a record must carry, `None` for no preference
    pub fn required_status(&self) -> Option<&'static str> {
        match self {
            StatusPreference::Ongoing => Some("Ongoing"),
            StatusPreference::Completed => Some("Completed"),
            StatusPreference::NoPreference => None,
        }
    }
}

// Buckets deserialize through `FromStr`, so request bodies may carry either
// the wire value or the label the quiz displays.
macro_rules! impl_parse {
    ($bucket:ty, $what:literal) => {
        impl FromStr for $bucket {
            type Err = AppError;

            /// Accepts either the wire value or the label shown in the quiz
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                <$bucket>::ALL
                    .into_iter()
                    .find(|bucket| bucket.value() == s || bucket.label().eq_ignore_ascii_case(s))
                    .ok_or_else(|| AppError::InvalidInput(format!("Unknown {}: {}", $what, s)))
            }
        }

        impl<'de> Deserialize<'de> for $bucket {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_parse!(YearBucket, "year bucket");
impl_parse!(RatingBucket, "rating bucket");
impl_parse!(EpisodeBucket, "episode bucket");
impl_parse!(StatusPreference, "status preference");

/// The five quiz answers, fed to the recommendation engine as one value.
///
/// Every dimension is always present; a fresh selection has no genres and
/// `NoPreference` everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub genres: BTreeSet<String>,
    pub year: YearBucket,
    pub rating: RatingBucket,
    pub episodes: EpisodeBucket,
    pub status: StatusPreference,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the genre if absent, removes it if present
    pub fn toggle_genre(&mut self, genre: &str) {
        if !self.genres.remove(genre) {
            self.genres.insert(genre.to_string());
        }
    }

    pub fn with_genres(mut self, genres: &[&str]) -> Self {
        self.genres = genres.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn with_year(mut self, year: YearBucket) -> Self {
        self.year = year;
        self
    }

    pub fn with_rating(mut self, rating: RatingBucket) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_episodes(mut self, episodes: EpisodeBucket) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_status(mut self, status: StatusPreference) -> Self {
        self.status = status;
        self
    }
}

/// Outcome of a single recommendation request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "anime", rename_all = "snake_case")]
pub enum RecommendationResult {
    Found(AnimeRecord),
    NotFound,
}

impl RecommendationResult {
    pub fn is_found(&self) -> bool {
        matches!(self, RecommendationResult::Found(_))
    }

    pub fn anime(&self) -> Option<&AnimeRecord> {
        match self {
            RecommendationResult::Found(anime) => Some(anime),
            RecommendationResult::NotFound => None,
        }
    }
}

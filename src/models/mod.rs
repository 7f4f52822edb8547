mod anime;
mod selection;

pub use anime::{AnimeId, AnimeRecord, GENRES};
pub use selection::{
    EpisodeBucket, FilterSelection, RatingBucket, RecommendationResult, StatusPreference,
    YearBucket, NO_PREFERENCE_LABEL,
};

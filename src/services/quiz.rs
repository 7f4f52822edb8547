//! Step-by-step quiz that builds a [`FilterSelection`].
//!
//! The quiz walks through genres, year, rating, episodes and status, in that
//! order, and only hands the selection to the recommendation engine once the
//! last step is confirmed.

use serde::{Deserialize, Serialize};

use crate::{
    models::{
        AnimeRecord, EpisodeBucket, FilterSelection, RatingBucket, RecommendationResult,
        StatusPreference, YearBucket,
    },
    services::{random::RandomSource, recommendations},
};

/// Errors raised by illegal quiz transitions
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("select at least one genre before continuing")]
    NoGenreSelected,

    #[error("cannot answer {answer} while {step}")]
    WrongStep { step: QuizStep, answer: &'static str },

    #[error("the quiz is not finished yet")]
    NotReady,

    #[error("the quiz is already finished")]
    AlreadyReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizStep {
    SelectingGenres,
    SelectingYear,
    SelectingRating,
    SelectingEpisodes,
    SelectingStatus,
    Ready,
}

impl QuizStep {
    fn next(self) -> Option<QuizStep> {
        match self {
            QuizStep::SelectingGenres => Some(QuizStep::SelectingYear),
            QuizStep::SelectingYear => Some(QuizStep::SelectingRating),
            QuizStep::SelectingRating => Some(QuizStep::SelectingEpisodes),
            QuizStep::SelectingEpisodes => Some(QuizStep::SelectingStatus),
            QuizStep::SelectingStatus => Some(QuizStep::Ready),
            QuizStep::Ready => None,
        }
    }
}

impl std::fmt::Display for QuizStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuizStep::SelectingGenres => "selecting genres",
            QuizStep::SelectingYear => "selecting year",
            QuizStep::SelectingRating => "selecting rating",
            QuizStep::SelectingEpisodes => "selecting episodes",
            QuizStep::SelectingStatus => "selecting status",
            QuizStep::Ready => "ready",
        };
        write!(f, "{}", name)
    }
}

/// Answer to one of the single-choice steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "value", rename_all = "snake_case")]
pub enum QuizAnswer {
    Year(YearBucket),
    Rating(RatingBucket),
    Episodes(EpisodeBucket),
    Status(StatusPreference),
}

impl QuizAnswer {
    fn step(&self) -> QuizStep {
        match self {
            QuizAnswer::Year(_) => QuizStep::SelectingYear,
            QuizAnswer::Rating(_) => QuizStep::SelectingRating,
            QuizAnswer::Episodes(_) => QuizStep::SelectingEpisodes,
            QuizAnswer::Status(_) => QuizStep::SelectingStatus,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            QuizAnswer::Year(_) => "year",
            QuizAnswer::Rating(_) => "rating",
            QuizAnswer::Episodes(_) => "episodes",
            QuizAnswer::Status(_) => "status",
        }
    }
}

/// One run through the quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizSession {
    step: QuizStep,
    selection: FilterSelection,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            step: QuizStep::SelectingGenres,
            selection: FilterSelection::default(),
        }
    }

    pub fn step(&self) -> QuizStep {
        self.step
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Adds or removes a genre; only allowed on the genre step
    pub fn toggle_genre(&mut self, genre: &str) -> Result<(), QuizError> {
        if self.step != QuizStep::SelectingGenres {
            return Err(QuizError::WrongStep {
                step: self.step,
                answer: "genres",
            });
        }

        self.selection.toggle_genre(genre);
        Ok(())
    }

    /// Records the answer for the current single-choice step
    pub fn answer(&mut self, answer: QuizAnswer) -> Result<(), QuizError> {
        if answer.step() != self.step {
            return Err(QuizError::WrongStep {
                step: self.step,
                answer: answer.name(),
            });
        }

        match answer {
            QuizAnswer::Year(year) => self.selection.year = year,
            QuizAnswer::Rating(rating) => self.selection.rating = rating,
            QuizAnswer::Episodes(episodes) => self.selection.episodes = episodes,
            QuizAnswer::Status(status) => self.selection.status = status,
        }
        Ok(())
    }

    /// Moves to the next step. The genre step needs at least one genre.
    pub fn advance(&mut self) -> Result<QuizStep, QuizError> {
        if self.step == QuizStep::SelectingGenres && self.selection.genres.is_empty() {
            return Err(QuizError::NoGenreSelected);
        }

        let next = self.step.next().ok_or(QuizError::AlreadyReady)?;
        self.step = next;
        Ok(next)
    }

    /// Starts over with an empty selection
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Runs the recommendation engine; may be repeated for a new pick
    pub fn recommend<R>(
        &self,
        catalog: &[AnimeRecord],
        current_year: i32,
        rng: &R,
    ) -> Result<RecommendationResult, QuizError>
    where
        R: RandomSource + ?Sized,
    {
        if self.step != QuizStep::Ready {
            return Err(QuizError::NotReady);
        }

        Ok(recommendations::recommend(
            catalog,
            &self.selection,
            current_year,
            rng,
        ))
    }
}

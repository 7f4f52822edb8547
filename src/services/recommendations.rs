use std::collections::BTreeSet;

use crate::{
    models::{
        AnimeRecord, EpisodeBucket, FilterSelection, RatingBucket, RecommendationResult,
        StatusPreference, YearBucket,
    },
    services::random::RandomSource,
};

/// Picks a recommendation from the catalog for the given quiz answers
///
/// Narrows the catalog with the five filter stages (genre, year, rating,
/// episodes, status) and then picks one survivor uniformly at random.
/// An empty surviving set is a normal outcome and yields `NotFound`.
///
/// `current_year` resolves the year buckets and `rng` supplies the random
/// pick, so the function is deterministic for a deterministic source.
pub fn recommend<R>(
    catalog: &[AnimeRecord],
    selection: &FilterSelection,
    current_year: i32,
    rng: &R,
) -> RecommendationResult
where
    R: RandomSource + ?Sized,
{
    let survivors = surviving_set(catalog, selection, current_year);
    pick_one(&survivors, rng)
}

/// Applies the five filter stages in order and returns the records left.
///
/// Catalog order is preserved and the catalog itself is never modified.
pub fn surviving_set<'a>(
    catalog: &'a [AnimeRecord],
    selection: &FilterSelection,
    current_year: i32,
) -> Vec<&'a AnimeRecord> {
    let candidates: Vec<&AnimeRecord> = catalog.iter().collect();

    let candidates = apply_stage("genre", candidates, |anime| {
        matches_genres(anime, &selection.genres)
    });
    let candidates = apply_stage("year", candidates, |anime| {
        matches_year(anime, selection.year, current_year)
    });
    let candidates = apply_stage("rating", candidates, |anime| {
        matches_rating(anime, selection.rating)
    });
    let candidates = apply_stage("episodes", candidates, |anime| {
        matches_episodes(anime, selection.episodes)
    });
    apply_stage("status", candidates, |anime| {
        matches_status(anime, selection.status)
    })
}

/// Chooses one record uniformly at random, or `NotFound` when there is none.
///
/// An out-of-range index from the random source is clamped to the last record.
pub fn pick_one<R>(survivors: &[&AnimeRecord], rng: &R) -> RecommendationResult
where
    R: RandomSource + ?Sized,
{
    if survivors.is_empty() {
        return RecommendationResult::NotFound;
    }

    let index = rng.pick_index(survivors.len()).min(survivors.len() - 1);
    RecommendationResult::Found(survivors[index].clone())
}

fn apply_stage<'a, F>(
    stage: &'static str,
    candidates: Vec<&'a AnimeRecord>,
    keep: F,
) -> Vec<&'a AnimeRecord>
where
    F: Fn(&AnimeRecord) -> bool,
{
    let before = candidates.len();
    let kept: Vec<&AnimeRecord> = candidates.into_iter().filter(|anime| keep(anime)).collect();

    tracing::debug!(stage, before, after = kept.len(), "Filter stage applied");

    kept
}

/// Any selected genre matches; no selected genre means no constraint
fn matches_genres(anime: &AnimeRecord, genres: &BTreeSet<String>) -> bool {
    genres.is_empty() || genres.iter().any(|genre| anime.has_genre(genre))
}

/// Records without a release year never pass, even with no preference
fn matches_year(anime: &AnimeRecord, bucket: YearBucket, current_year: i32) -> bool {
    let Some(year) = anime.known_release_year() else {
        return false;
    };

    match bucket {
        YearBucket::LastTenYears => year >= current_year - 10,
        YearBucket::LastFiveYears => year >= current_year - 5,
        YearBucket::ThisYear => year == current_year,
        YearBucket::NoPreference => true,
    }
}

/// Records without a rating never pass, even with no preference
fn matches_rating(anime: &AnimeRecord, bucket: RatingBucket) -> bool {
    let Some(rating) = anime.known_rating() else {
        return false;
    };

    bucket.threshold().map_or(true, |threshold| rating >= threshold)
}

/// Records without an episode count always pass
fn matches_episodes(anime: &AnimeRecord, bucket: EpisodeBucket) -> bool {
    anime
        .known_episodes()
        .map_or(true, |episodes| bucket.contains(episodes))
}

/// Records without a status always pass
fn matches_status(anime: &AnimeRecord, preference: StatusPreference) -> bool {
    match (preference.required_status(), anime.known_status()) {
        (Some(required), Some(status)) => status == required,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::random::{MockRandomSource, SeededRandom};
    use mockall::predicate::eq;
    use std::collections::HashMap;

    const YEAR: i32 = 2024;

    fn scenario_catalog() -> Vec<AnimeRecord> {
        vec![
            AnimeRecord::new("1", "Blade Dance")
                .with_genres(&["Action"])
                .with_release_year(2023)
                .with_rating(4.5)
                .with_episodes(12)
                .with_status("Completed"),
            AnimeRecord::new("2", "Spring Letters")
                .with_genres(&["Romance"])
                .with_release_year(2010)
                .with_rating(3.0)
                .with_episodes(24)
                .with_status("Ongoing"),
        ]
    }

    /// A record that passes every stage under an unconstrained selection
    fn complete(id: &str) -> AnimeRecord {
        AnimeRecord::new(id, format!("Anime {}", id))
            .with_genres(&["Comedy"])
            .with_release_year(2020)
            .with_rating(4.0)
            .with_episodes(12)
            .with_status("Completed")
    }

    fn ids(survivors: &[&AnimeRecord]) -> Vec<String> {
        survivors.iter().map(|a| a.id.to_string()).collect()
    }

    fn single_pick(expected_len: usize, index: usize) -> MockRandomSource {
        let mut rng = MockRandomSource::new();
        rng.expect_pick_index()
            .with(eq(expected_len))
            .times(1)
            .return_const(index);
        rng
    }

    #[test]
    fn test_scenario_single_match() {
        let catalog = scenario_catalog();
        let selection = FilterSelection::new()
            .with_genres(&["Action"])
            .with_year(YearBucket::LastFiveYears)
            .with_rating(RatingBucket::AtLeast4)
            .with_episodes(EpisodeBucket::OneToTwelve);

        assert_eq!(ids(&surviving_set(&catalog, &selection, YEAR)), vec!["1"]);

        let result = recommend(&catalog, &selection, YEAR, &single_pick(1, 0));
        assert_eq!(result, RecommendationResult::Found(catalog[0].clone()));
    }

    #[test]
    fn test_scenario_unmatched_genre() {
        let catalog = scenario_catalog();
        let selection = FilterSelection::new().with_genres(&["Horror"]);

        let mut rng = MockRandomSource::new();
        rng.expect_pick_index().never();

        assert!(surviving_set(&catalog, &selection, YEAR).is_empty());
        assert_eq!(
            recommend(&catalog, &selection, YEAR, &rng),
            RecommendationResult::NotFound
        );
    }

    #[test]
    fn test_empty_catalog_is_not_found() {
        let mut rng = MockRandomSource::new();
        rng.expect_pick_index().never();

        let selections = vec![
            FilterSelection::new(),
            FilterSelection::new().with_genres(&["Action", "Drama"]),
            FilterSelection::new()
                .with_year(YearBucket::ThisYear)
                .with_rating(RatingBucket::Popular)
                .with_episodes(EpisodeBucket::MoreThanHundred)
                .with_status(StatusPreference::Ongoing),
        ];

        for selection in selections {
            assert_eq!(
                recommend(&[], &selection, YEAR, &rng),
                RecommendationResult::NotFound
            );
        }
    }

    #[test]
    fn test_genre_stage_matches_any_selected_genre() {
        let catalog = vec![
            complete("1").with_genres(&["Action", "Fantasy"]),
            complete("2").with_genres(&["Drama"]),
            complete("3").with_genres(&["Sports"]),
            complete("4").with_genres(&[]),
        ];
        let selection = FilterSelection::new().with_genres(&["Fantasy", "Drama"]);

        assert_eq!(ids(&surviving_set(&catalog, &selection, YEAR)), vec!["1", "2"]);
    }

    #[test]
    fn test_genre_stage_is_case_sensitive() {
        let catalog = vec![complete("1").with_genres(&["action"])];
        let selection = FilterSelection::new().with_genres(&["Action"]);

        assert!(surviving_set(&catalog, &selection, YEAR).is_empty());
    }

    #[test]
    fn test_empty_genre_selection_keeps_everything() {
        let catalog = vec![complete("1").with_genres(&[]), complete("2")];
        let selection = FilterSelection::new();

        assert_eq!(surviving_set(&catalog, &selection, YEAR).len(), 2);
    }

    #[test]
    fn test_year_buckets() {
        let catalog = vec![
            complete("this").with_release_year(2024),
            complete("five").with_release_year(2019),
            complete("six").with_release_year(2018),
            complete("ten").with_release_year(2014),
            complete("old").with_release_year(2013),
        ];

        let cases = vec![
            (YearBucket::ThisYear, vec!["this"]),
            (YearBucket::LastFiveYears, vec!["this", "five"]),
            (YearBucket::LastTenYears, vec!["this", "five", "six", "ten"]),
            (YearBucket::NoPreference, vec!["this", "five", "six", "ten", "old"]),
        ];

        for (bucket, expected) in cases {
            let selection = FilterSelection::new().with_year(bucket);
            assert_eq!(
                ids(&surviving_set(&catalog, &selection, YEAR)),
                expected,
                "bucket {:?}",
                bucket
            );
        }
    }

    #[test]
    fn test_missing_release_year_rejected_under_every_bucket() {
        let mut anime = complete("1");
        anime.release_year = None;
        let catalog = vec![anime];

        for bucket in YearBucket::ALL {
            let selection = FilterSelection::new().with_year(bucket);
            assert!(
                surviving_set(&catalog, &selection, YEAR).is_empty(),
                "bucket {:?}",
                bucket
            );
        }
    }

    #[test]
    fn test_missing_rating_rejected_under_every_bucket() {
        let mut anime = complete("1");
        anime.rating = None;
        let catalog = vec![anime, complete("2").with_rating(0.0)];

        for bucket in RatingBucket::ALL {
            let selection = FilterSelection::new().with_rating(bucket);
            assert!(
                surviving_set(&catalog, &selection, YEAR).is_empty(),
                "bucket {:?}",
                bucket
            );
        }
    }

    #[test]
    fn test_rating_thresholds() {
        let catalog = vec![
            complete("five").with_rating(5.0),
            complete("four").with_rating(4.2),
            complete("three").with_rating(3.0),
            complete("low").with_rating(2.5),
        ];

        let cases = vec![
            (RatingBucket::Popular, vec!["five"]),
            (RatingBucket::AtLeast4, vec!["five", "four"]),
            (RatingBucket::AtLeast3, vec!["five", "four", "three"]),
            (RatingBucket::NoPreference, vec!["five", "four", "three", "low"]),
        ];

        for (bucket, expected) in cases {
            let selection = FilterSelection::new().with_rating(bucket);
            assert_eq!(ids(&surviving_set(&catalog, &selection, YEAR)), expected);
        }
    }

    #[test]
    fn test_missing_episodes_pass_every_bucket() {
        let mut anime = complete("1");
        anime.episodes = None;
        let catalog = vec![anime];

        for bucket in EpisodeBucket::ALL {
            let selection = FilterSelection::new().with_episodes(bucket);
            assert_eq!(
                surviving_set(&catalog, &selection, YEAR).len(),
                1,
                "bucket {:?}",
                bucket
            );
        }
    }

    #[test]
    fn test_episode_buckets() {
        let catalog = vec![
            complete("12").with_episodes(12),
            complete("24").with_episodes(24),
            complete("64").with_episodes(64),
            complete("220").with_episodes(220),
        ];

        let cases = vec![
            (EpisodeBucket::OneToTwelve, vec!["12"]),
            (EpisodeBucket::OneToTwentyFour, vec!["12", "24"]),
            (EpisodeBucket::OneToFifty, vec!["12", "24"]),
            (EpisodeBucket::OneToHundred, vec!["12", "24", "64"]),
            (EpisodeBucket::MoreThanHundred, vec!["220"]),
            (EpisodeBucket::NoPreference, vec!["12", "24", "64", "220"]),
        ];

        for (bucket, expected) in cases {
            let selection = FilterSelection::new().with_episodes(bucket);
            assert_eq!(ids(&surviving_set(&catalog, &selection, YEAR)), expected);
        }
    }

    #[test]
    fn test_status_stage() {
        let mut unknown = complete("unknown");
        unknown.status = None;
        let catalog = vec![
            complete("done").with_status("Completed"),
            complete("airing").with_status("Ongoing"),
            complete("soon").with_status("Upcoming"),
            unknown,
        ];

        let cases = vec![
            (StatusPreference::Completed, vec!["done", "unknown"]),
            (StatusPreference::Ongoing, vec!["airing", "unknown"]),
            (
                StatusPreference::NoPreference,
                vec!["done", "airing", "soon", "unknown"],
            ),
        ];

        for (preference, expected) in cases {
            let selection = FilterSelection::new().with_status(preference);
            assert_eq!(ids(&surviving_set(&catalog, &selection, YEAR)), expected);
        }
    }

    #[test]
    fn test_surviving_set_is_stable_and_a_subset() {
        let catalog: Vec<AnimeRecord> = (0..20)
            .map(|i| {
                complete(&i.to_string())
                    .with_release_year(2010 + i)
                    .with_rating(f64::from(i % 5) + 0.5)
                    .with_episodes((i as u32) * 7)
            })
            .collect();
        let selection = FilterSelection::new()
            .with_year(YearBucket::LastTenYears)
            .with_rating(RatingBucket::AtLeast3);

        let first = ids(&surviving_set(&catalog, &selection, YEAR));
        let second = ids(&surviving_set(&catalog, &selection, YEAR));
        assert_eq!(first, second);
        assert!(!first.is_empty());

        let catalog_ids: Vec<String> = catalog.iter().map(|a| a.id.to_string()).collect();
        assert!(first.iter().all(|id| catalog_ids.contains(id)));
    }

    #[test]
    fn test_pick_uses_random_index() {
        let catalog = vec![complete("a"), complete("b"), complete("c")];

        let result = recommend(&catalog, &FilterSelection::new(), YEAR, &single_pick(3, 2));
        assert_eq!(result.anime().map(|a| a.id.to_string()), Some("c".to_string()));
    }

    #[test]
    fn test_pick_clamps_out_of_range_index() {
        let catalog = vec![complete("a"), complete("b")];

        let result = recommend(&catalog, &FilterSelection::new(), YEAR, &single_pick(2, 9));
        assert_eq!(result.anime().map(|a| a.id.to_string()), Some("b".to_string()));
    }

    #[test]
    fn test_reroll_samples_whole_catalog() {
        let catalog: Vec<AnimeRecord> = (0..100).map(|i| complete(&i.to_string())).collect();
        let selection = FilterSelection::new();
        let rng = SeededRandom::new(2024);

        let mut seen = HashMap::new();
        for _ in 0..2000 {
            let result = recommend(&catalog, &selection, YEAR, &rng);
            let anime = result.anime().expect("catalog passes every stage");
            *seen.entry(anime.id.clone()).or_insert(0) += 1;
        }

        assert_eq!(seen.len(), 100);
    }

    #[test]
    fn test_pick_is_roughly_uniform() {
        let catalog: Vec<AnimeRecord> = (0..4).map(|i| complete(&i.to_string())).collect();
        let selection = FilterSelection::new();
        let rng = SeededRandom::new(99);
        let trials = 40_000;

        let mut counts = HashMap::new();
        for _ in 0..trials {
            if let RecommendationResult::Found(anime) = recommend(&catalog, &selection, YEAR, &rng) {
                *counts.entry(anime.id).or_insert(0usize) += 1;
            }
        }

        let expected = trials / catalog.len();
        for anime in &catalog {
            let count = counts.get(&anime.id).copied().unwrap_or(0);
            assert!(
                count.abs_diff(expected) < 600,
                "{} picked {} times, expected about {}",
                anime.id,
                count,
                expected
            );
        }
    }
}

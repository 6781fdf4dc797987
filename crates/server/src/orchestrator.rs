//! # Recommendation Orchestrator
//!
//! Coordinates the whole recommendation pipeline:
//! 1. Fetch the user's ratings; reject under-rated users before anything else
//! 2. Fetch the catalog snapshot
//! 3. Score genre affinity -> rank candidates -> select a diversified list
//! 4. Assemble the result bundle
//!
//! Everything between the two fetches is pure computation over the fetched
//! snapshots; nothing is cached across calls and nothing is retried.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use catalog::{FlatFileStore, MovieId};
use engine::{
    GenreScore, PER_GENRE_CAP, ScoredCandidate, TARGET_SIZE, rank_candidates, score_genres,
    select_diverse,
};

use crate::error::{MIN_RATINGS, RecommendError};
use crate::providers::{CatalogProvider, RatingsProvider};

/// Everything a presentation layer needs from one recommendation request.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationBundle {
    /// Diversified top picks, in final rank order.
    pub recommendations: Vec<ScoredCandidate>,
    /// Every genre in the catalog universe with its score and class,
    /// sorted by genre name.
    pub genre_classification: Vec<GenreScore>,
    /// Raw genre -> score map backing the classification.
    pub genre_scores: BTreeMap<String, i32>,
    /// How many ratings the user had at fetch time.
    pub total_ratings: usize,
}

/// Main orchestrator wiring the providers to the scoring pipeline.
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    ratings: Arc<dyn RatingsProvider>,
    catalog: Arc<dyn CatalogProvider>,
}

impl RecommendationOrchestrator {
    pub fn new(ratings: Arc<dyn RatingsProvider>, catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { ratings, catalog }
    }

    /// Convenience constructor: one flat-file store serves both roles.
    pub fn for_store(store: FlatFileStore) -> Self {
        let store = Arc::new(store);
        Self {
            ratings: store.clone(),
            catalog: store,
        }
    }

    /// Produce recommendations for one user.
    ///
    /// Fails with [`RecommendError::InsufficientRatings`] before the catalog
    /// is ever fetched when the user has fewer than [`MIN_RATINGS`] ratings;
    /// provider failures surface as [`RecommendError::Upstream`].
    pub async fn recommend(&self, user_id: &str) -> Result<RecommendationBundle, RecommendError> {
        let start_time = Instant::now();

        let user_ratings = self
            .ratings
            .user_ratings(user_id)
            .await
            .map_err(RecommendError::Upstream)?;
        let total_ratings = user_ratings.len();
        info!("Fetched {} ratings for user {}", total_ratings, user_id);

        if total_ratings < MIN_RATINGS {
            // Precondition fails before the catalog fetch: an under-rated
            // user costs zero catalog reads.
            return Err(RecommendError::InsufficientRatings {
                found: total_ratings,
            });
        }

        // Provider guarantees at most one rating per movie; collapsing into
        // a map here keeps later duplicates last-write-wins regardless.
        let ratings_map: HashMap<MovieId, u8> = user_ratings
            .iter()
            .map(|r| (r.movie_id, r.rating))
            .collect();
        let rated_ids: HashSet<MovieId> = ratings_map.keys().copied().collect();

        let movies = self
            .catalog
            .catalog()
            .await
            .map_err(RecommendError::Upstream)?;
        info!("Fetched catalog snapshot of {} movies", movies.len());

        let scores = score_genres(&ratings_map, &movies);
        let ranked = rank_candidates(&movies, &rated_ids, &scores);
        let recommendations = select_diverse(&ranked, &scores, TARGET_SIZE, PER_GENRE_CAP);
        info!(
            "Selected {} of {} candidates for user {}",
            recommendations.len(),
            ranked.len(),
            user_id
        );

        let genre_scores: BTreeMap<String, i32> = scores
            .iter()
            .map(|(genre, s)| (genre.clone(), s.score))
            .collect();
        let genre_classification: Vec<GenreScore> = scores.into_values().collect();

        info!(
            "Recommendation pipeline for user {} took {:.2?}",
            user_id,
            start_time.elapsed()
        );

        Ok(RecommendationBundle {
            recommendations,
            genre_classification,
            genre_scores,
            total_ratings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use catalog::{Movie, NewMovie, UserRating};
    use engine::GenreClass;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn movie(id: MovieId, genres: &[&str], global_rating: f64) -> Movie {
        Movie {
            id,
            title: format!("Movie {id}"),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            year: 2000,
            global_rating,
            image_url: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn rating(user_id: &str, movie_id: MovieId, value: u8) -> UserRating {
        UserRating {
            id: None,
            user_id: user_id.to_string(),
            movie_id,
            rating: value,
            created_at: None,
            updated_at: None,
        }
    }

    /// The worked example: m1/m3 Action 5*, m2 Drama 4*, m4 Comedy 2*,
    /// m5 Horror 1*, plus an unrated Sci-Fi movie at 8.5 and a pool of
    /// other unrated candidates.
    fn example_catalog() -> Vec<Movie> {
        vec![
            movie(1, &["Action"], 8.0),
            movie(2, &["Drama"], 7.5),
            movie(3, &["Action"], 8.2),
            movie(4, &["Comedy"], 6.8),
            movie(5, &["Horror"], 6.0),
            movie(10, &["Action"], 8.8),
            movie(11, &["Action"], 8.1),
            movie(12, &["Drama"], 8.4),
            movie(13, &["Sci-Fi"], 8.5),
            movie(14, &["Comedy"], 9.0),
        ]
    }

    fn example_ratings(user_id: &str) -> Vec<UserRating> {
        vec![
            rating(user_id, 1, 5),
            rating(user_id, 2, 4),
            rating(user_id, 3, 5),
            rating(user_id, 4, 2),
            rating(user_id, 5, 1),
        ]
    }

    // ============================================================================
    // Mock Providers
    // ============================================================================

    struct StaticRatings {
        ratings: Vec<UserRating>,
        calls: AtomicUsize,
    }

    impl StaticRatings {
        fn new(ratings: Vec<UserRating>) -> Arc<Self> {
            Arc::new(Self {
                ratings,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RatingsProvider for StaticRatings {
        async fn user_ratings(&self, user_id: &str) -> anyhow::Result<Vec<UserRating>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .ratings
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect())
        }
    }

    struct StaticCatalog {
        movies: Vec<Movie>,
        calls: AtomicUsize,
    }

    impl StaticCatalog {
        fn new(movies: Vec<Movie>) -> Arc<Self> {
            Arc::new(Self {
                movies,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CatalogProvider for StaticCatalog {
        async fn catalog(&self) -> anyhow::Result<Vec<Movie>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.movies.clone())
        }
    }

    struct FailingRatings;

    #[async_trait]
    impl RatingsProvider for FailingRatings {
        async fn user_ratings(&self, _user_id: &str) -> anyhow::Result<Vec<UserRating>> {
            Err(anyhow!("ratings table unreadable"))
        }
    }

    struct FailingCatalog;

    #[async_trait]
    impl CatalogProvider for FailingCatalog {
        async fn catalog(&self) -> anyhow::Result<Vec<Movie>> {
            Err(anyhow!("movies table unreadable"))
        }
    }

    fn example_orchestrator() -> (RecommendationOrchestrator, Arc<StaticCatalog>) {
        let ratings = StaticRatings::new(example_ratings("u1"));
        let catalog = StaticCatalog::new(example_catalog());
        let orchestrator = RecommendationOrchestrator::new(ratings, catalog.clone());
        (orchestrator, catalog)
    }

    // ============================================================================
    // Precondition Tests
    // ============================================================================

    #[tokio::test]
    async fn insufficient_ratings_is_a_400_and_skips_the_catalog_fetch() {
        let ratings = StaticRatings::new(example_ratings("u1")[..4].to_vec());
        let catalog = StaticCatalog::new(example_catalog());
        let orchestrator = RecommendationOrchestrator::new(ratings.clone(), catalog.clone());

        let err = orchestrator.recommend("u1").await.unwrap_err();
        assert!(matches!(err, RecommendError::InsufficientRatings { found: 4 }));
        assert_eq!(err.status_code(), 400);

        assert_eq!(ratings.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            catalog.calls.load(Ordering::SeqCst),
            0,
            "catalog must not be fetched for an under-rated user"
        );
    }

    #[tokio::test]
    async fn unknown_user_counts_as_zero_ratings() {
        let (orchestrator, _) = example_orchestrator();

        let err = orchestrator.recommend("nobody").await.unwrap_err();
        assert!(matches!(err, RecommendError::InsufficientRatings { found: 0 }));
    }

    #[tokio::test]
    async fn exactly_five_ratings_passes_the_precondition() {
        let (orchestrator, _) = example_orchestrator();
        let bundle = orchestrator.recommend("u1").await.unwrap();
        assert_eq!(bundle.total_ratings, 5);
    }

    // ============================================================================
    // Upstream Failure Tests
    // ============================================================================

    #[tokio::test]
    async fn ratings_fetch_failure_is_a_500() {
        let orchestrator = RecommendationOrchestrator::new(
            Arc::new(FailingRatings),
            StaticCatalog::new(example_catalog()),
        );

        let err = orchestrator.recommend("u1").await.unwrap_err();
        assert!(matches!(err, RecommendError::Upstream(_)));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[tokio::test]
    async fn catalog_fetch_failure_is_a_500() {
        let orchestrator = RecommendationOrchestrator::new(
            StaticRatings::new(example_ratings("u1")),
            Arc::new(FailingCatalog),
        );

        let err = orchestrator.recommend("u1").await.unwrap_err();
        assert!(matches!(err, RecommendError::Upstream(_)));
        assert_eq!(err.status_code(), 500);
    }

    // ============================================================================
    // Pipeline Result Tests
    // ============================================================================

    #[tokio::test]
    async fn bundle_carries_worked_example_scores() {
        let (orchestrator, _) = example_orchestrator();
        let bundle = orchestrator.recommend("u1").await.unwrap();

        assert_eq!(bundle.genre_scores["Action"], 4);
        assert_eq!(bundle.genre_scores["Drama"], 1);
        assert_eq!(bundle.genre_scores["Comedy"], -1);
        assert_eq!(bundle.genre_scores["Horror"], -2);
        assert_eq!(bundle.genre_scores["Sci-Fi"], 0);

        // Classification covers the full universe and matches the signs.
        assert_eq!(bundle.genre_classification.len(), bundle.genre_scores.len());
        for gs in &bundle.genre_classification {
            assert_eq!(gs.class, GenreClass::from_score(gs.score), "{}", gs.genre);
        }
        let sci_fi = bundle
            .genre_classification
            .iter()
            .find(|g| g.genre == "Sci-Fi")
            .unwrap();
        assert_eq!(sci_fi.class, GenreClass::Neutral);
    }

    #[tokio::test]
    async fn recommendations_exclude_rated_movies_and_obey_the_formula() {
        let (orchestrator, _) = example_orchestrator();
        let bundle = orchestrator.recommend("u1").await.unwrap();

        assert!(!bundle.recommendations.is_empty());
        for c in &bundle.recommendations {
            assert!(c.movie.id >= 10, "rated movie leaked into recommendations");
            let expected = 0.7 * c.genre_affinity + 0.3 * c.movie.global_rating;
            assert!((c.final_score - expected).abs() < 1e-9);
        }

        // Sci-Fi candidate: no rated-genre overlap, affinity 0, 0.3 * 8.5.
        let sci_fi = bundle
            .recommendations
            .iter()
            .find(|c| c.movie.id == 13)
            .expect("five unrated movies means all five are selected");
        assert_eq!(sci_fi.genre_affinity, 0.0);
        assert!((sci_fi.final_score - 2.55).abs() < 1e-9);
    }

    #[tokio::test]
    async fn duplicate_ratings_collapse_last_write_wins() {
        // Providers must not hand us duplicates, but if one does, the later
        // entry wins rather than double-counting.
        let mut ratings = example_ratings("u1");
        ratings.push(rating("u1", 1, 1));
        let orchestrator = RecommendationOrchestrator::new(
            StaticRatings::new(ratings),
            StaticCatalog::new(example_catalog()),
        );

        let bundle = orchestrator.recommend("u1").await.unwrap();
        // Movie 1 now contributes -2 instead of +2: Action = (1-3) + (5-3).
        assert_eq!(bundle.genre_scores["Action"], 0);
        assert_eq!(bundle.total_ratings, 6);
    }

    #[tokio::test]
    async fn recommend_is_idempotent() {
        let (orchestrator, _) = example_orchestrator();

        let first = orchestrator.recommend("u1").await.unwrap();
        let second = orchestrator.recommend("u1").await.unwrap();

        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        assert_eq!(a, b, "identical inputs must serialize byte-identically");
    }

    // ============================================================================
    // Flat-File Provider Integration
    // ============================================================================

    #[tokio::test]
    async fn flat_file_store_serves_both_provider_roles() {
        let dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(dir.path());

        for m in example_catalog() {
            store
                .add_movie(NewMovie {
                    title: m.title,
                    genres: m.genres,
                    year: m.year,
                    global_rating: m.global_rating,
                    image_url: m.image_url,
                })
                .unwrap();
        }
        // add_movie reassigns ids 1..=10 in insertion order, so the five
        // rated movies keep ids 1-5.
        for r in example_ratings("u1") {
            store.rate("u1", r.movie_id, r.rating).unwrap();
        }

        let orchestrator = RecommendationOrchestrator::for_store(store);
        let bundle = orchestrator.recommend("u1").await.unwrap();

        assert_eq!(bundle.total_ratings, 5);
        assert_eq!(bundle.genre_scores["Action"], 4);
        assert_eq!(bundle.recommendations.len(), 5);
        assert!(bundle.recommendations.iter().all(|c| c.movie.id > 5));
    }
}

//! Scoring types and policy constants for the recommendation engine.

use catalog::Movie;
use serde::{Deserialize, Serialize};

// =============================================================================
// Policy Constants
// =============================================================================
// Fixed policy, not configuration. Defined once; there is exactly one call
// path through the pipeline, so these cannot drift between callers.

/// How many recommendations a result list targets.
pub const TARGET_SIZE: usize = 5;

/// Maximum selections sharing a primary genre during the greedy pass.
/// The backfill slot is exempt (see [`crate::selector::select_diverse`]).
pub const PER_GENRE_CAP: usize = 3;

/// Weight of the user's genre affinity in the blended score.
pub const GENRE_WEIGHT: f64 = 0.7;

/// Weight of the catalog-wide popularity rating in the blended score.
pub const RATING_WEIGHT: f64 = 0.3;

/// Absolute tolerance for comparator tie-breaking. Scores closer than this
/// count as equal, so the same tolerance must be used at every level to keep
/// ordering reproducible.
pub const SCORE_EPSILON: f64 = 0.001;

// =============================================================================
// Genre Classification
// =============================================================================

/// Three-way classification of a genre, derived purely from the sign of its
/// affinity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenreClass {
    Preferred,
    Neutral,
    Rejected,
}

impl GenreClass {
    pub fn from_score(score: i32) -> Self {
        match score.cmp(&0) {
            std::cmp::Ordering::Greater => GenreClass::Preferred,
            std::cmp::Ordering::Less => GenreClass::Rejected,
            std::cmp::Ordering::Equal => GenreClass::Neutral,
        }
    }
}

/// A genre's accumulated affinity score and its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreScore {
    pub genre: String,
    pub score: i32,
    /// Serialized as `type` to match the payload shape consumers expect.
    #[serde(rename = "type")]
    pub class: GenreClass,
}

impl GenreScore {
    pub fn new(genre: impl Into<String>, score: i32) -> Self {
        Self {
            genre: genre.into(),
            score,
            class: GenreClass::from_score(score),
        }
    }
}

// =============================================================================
// Scored Candidate
// =============================================================================

/// An unrated movie bound to its derived scores.
///
/// Ephemeral: recomputed from scratch on every request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub movie: Movie,
    /// Max of the user's affinity scores over the movie's genres.
    pub genre_affinity: f64,
    /// `GENRE_WEIGHT * genre_affinity + RATING_WEIGHT * movie.global_rating`
    pub final_score: f64,
}

impl ScoredCandidate {
    pub fn global_rating(&self) -> f64 {
        self.movie.global_rating
    }
}

//! # Engine Crate
//!
//! The pure scoring core of the CineMatch recommender.
//!
//! ## Architecture
//! Three stages, each a pure function of its inputs:
//! 1. **affinity**: ratings + catalog -> per-genre affinity scores
//! 2. **ranker**: catalog + rated ids + scores -> totally ordered candidates
//! 3. **selector**: ranked candidates -> genre-diversified top picks
//!
//! No stage holds state between calls, performs I/O, or blocks; everything
//! is recomputed fresh from the snapshots the caller passes in. That makes
//! the whole pipeline safe to run from any number of concurrent callers
//! with no synchronization.
//!
//! ## Example Usage
//! ```ignore
//! use engine::{score_genres, rank_candidates, select_diverse};
//! use engine::{PER_GENRE_CAP, TARGET_SIZE};
//!
//! let scores = score_genres(&ratings, &movies);
//! let ranked = rank_candidates(&movies, &rated_ids, &scores);
//! let picks = select_diverse(&ranked, &scores, TARGET_SIZE, PER_GENRE_CAP);
//! ```

pub mod affinity;
pub mod ranker;
pub mod selector;
pub mod types;

// Re-export main types
pub use affinity::score_genres;
pub use ranker::rank_candidates;
pub use selector::select_diverse;
pub use types::{
    GENRE_WEIGHT, GenreClass, GenreScore, PER_GENRE_CAP, RATING_WEIGHT, SCORE_EPSILON,
    ScoredCandidate, TARGET_SIZE,
};

//! Candidate ranker: scores every unrated movie and totally orders them.
//!
//! ## Algorithm
//! 1. Candidates are the catalog minus the user's rated ids.
//! 2. `genre_affinity` is the max of the user's scores over the movie's
//!    genres (0 for a genre missing from the map; the scorer's completeness
//!    guarantee makes that unreachable, but it is tolerated).
//! 3. `final_score = GENRE_WEIGHT * genre_affinity + RATING_WEIGHT *
//!    global_rating`.
//! 4. Sort by the three-level comparator: final score desc, then global
//!    rating desc, then movie id asc, with SCORE_EPSILON tolerance at the
//!    two floating-point levels.

use crate::types::{GENRE_WEIGHT, GenreScore, RATING_WEIGHT, SCORE_EPSILON, ScoredCandidate};
use catalog::{Movie, MovieId};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Score and order every unrated catalog movie.
///
/// The ordering is total: no two distinct movies compare equal, because the
/// final tie-break is the unique movie id. Identical inputs therefore always
/// produce the identical sequence.
pub fn rank_candidates(
    movies: &[Movie],
    rated: &HashSet<MovieId>,
    scores: &BTreeMap<String, GenreScore>,
) -> Vec<ScoredCandidate> {
    let mut candidates: Vec<ScoredCandidate> = movies
        .iter()
        .filter(|m| !rated.contains(&m.id))
        .map(|movie| {
            let genre_affinity = movie
                .genres
                .iter()
                .map(|g| scores.get(g).map_or(0, |s| s.score))
                .max()
                .unwrap_or(0) as f64;
            let final_score = GENRE_WEIGHT * genre_affinity + RATING_WEIGHT * movie.global_rating;
            ScoredCandidate {
                movie: movie.clone(),
                genre_affinity,
                final_score,
            }
        })
        .collect();

    candidates.sort_by(compare_candidates);

    debug!(
        catalog = movies.len(),
        rated = rated.len(),
        candidates = candidates.len(),
        "Ranked unrated candidates"
    );

    candidates
}

/// Three-level comparator: final score desc, global rating desc, id asc.
///
/// Floating-point levels treat differences below [`SCORE_EPSILON`] as ties;
/// the same absolute tolerance at both levels keeps the ordering
/// reproducible bit-for-bit.
fn compare_candidates(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    if (a.final_score - b.final_score).abs() < SCORE_EPSILON {
        if (a.global_rating() - b.global_rating()).abs() < SCORE_EPSILON {
            a.movie.id.cmp(&b.movie.id)
        } else {
            b.global_rating()
                .partial_cmp(&a.global_rating())
                .unwrap_or(Ordering::Equal)
        }
    } else {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
    }
}

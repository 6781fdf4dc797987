//! Affinity scorer: turns a user's ratings into per-genre scores.
//!
//! ## Algorithm
//! 1. Each rated movie found in the catalog contributes `rating - 3` points
//!    (range -2..=+2; a 3-star rating contributes nothing).
//! 2. The points are added to *every* genre on that movie. A multi-genre
//!    movie counts fully toward each of its genres; nothing is split or
//!    normalized.
//! 3. Ratings for movie ids not in the catalog are silently ignored.
//! 4. Every genre that appears anywhere in the catalog is present in the
//!    output; genres never touched by a rating score 0 / neutral.

use crate::types::GenreScore;
use catalog::{Movie, MovieId};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Compute the per-genre affinity scores for one user.
///
/// The returned map's key set is exactly the catalog's genre universe.
/// `BTreeMap` keeps iteration (and everything serialized from it)
/// deterministic, which the pipeline's idempotence guarantee relies on.
pub fn score_genres(
    ratings: &HashMap<MovieId, u8>,
    movies: &[Movie],
) -> BTreeMap<String, GenreScore> {
    let by_id: HashMap<MovieId, &Movie> = movies.iter().map(|m| (m.id, m)).collect();

    let mut totals: BTreeMap<&str, i32> = BTreeMap::new();
    for (&movie_id, &rating) in ratings {
        let Some(movie) = by_id.get(&movie_id) else {
            // Rating for a movie that left the catalog; not an error.
            continue;
        };
        let points = rating as i32 - 3;
        for genre in &movie.genres {
            *totals.entry(genre.as_str()).or_insert(0) += points;
        }
    }

    // Union in the full genre universe so unrated genres classify neutral.
    for movie in movies {
        for genre in &movie.genres {
            totals.entry(genre.as_str()).or_insert(0);
        }
    }

    debug!(
        rated = ratings.len(),
        genres = totals.len(),
        "Computed genre affinity scores"
    );

    totals
        .into_iter()
        .map(|(genre, score)| (genre.to_string(), GenreScore::new(genre, score)))
        .collect()
}

//! Core domain types for the CineMatch catalog.
//!
//! This module defines the fundamental data structures shared by the store,
//! the scoring engine, and the CLI:
//! - Type alias for movie identifiers (MovieId)
//! - Movie: a catalog entry with ordered genres and a global rating
//! - UserRating: one user's 1-5 star rating of one movie

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie. Stable and totally ordered; used as the
/// final tie-break key when ranking candidates.
pub type MovieId = u32;

// Users are identified by opaque strings (the upstream system hands them to
// us, we never parse them), so there is no UserId alias to a numeric type.

// =============================================================================
// Movie
// =============================================================================

/// A movie in the catalog.
///
/// `genres` is ordered and non-empty: the first label is the movie's
/// *primary* genre, which the diversity selector uses for its per-genre cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Ordered genre labels; the first is the primary genre.
    pub genres: Vec<String>,
    pub year: u16,
    /// Catalog-wide popularity rating, typically 0-10.
    pub global_rating: f64,
    #[serde(default)]
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Movie {
    /// The first genre label, used for diversity bookkeeping.
    ///
    /// Returns `None` for a malformed entry with no genres; the store never
    /// produces one, and the engine treats such entries as unclassifiable.
    pub fn primary_genre(&self) -> Option<&str> {
        self.genres.first().map(|g| g.as_str())
    }
}

// =============================================================================
// UserRating
// =============================================================================

/// A single explicit preference signal: one user rated one movie 1-5 stars.
///
/// At most one rating exists per (user, movie) pair; the store's upsert is
/// last-write-wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRating {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub user_id: String,
    pub movie_id: MovieId,
    /// Star value, always in 1..=5 (validated on write).
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Inclusive bounds for a valid star rating.
pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

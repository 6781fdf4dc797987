//! Error types for the catalog crate.

use crate::types::MovieId;
use thiserror::Error;

/// Errors that can occur while reading or writing the flat-file tables.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error while reading or writing a table file
    #[error("I/O error on table {table}: {source}")]
    Io {
        table: String,
        #[source]
        source: std::io::Error,
    },

    /// A table file exists but does not parse as JSON.
    ///
    /// Deliberately not swallowed: treating a corrupt table as empty would
    /// overwrite it (and lose every row) on the next upsert.
    #[error("Malformed JSON in table {table}: {source}")]
    Json {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    /// Star rating outside 1..=5
    #[error("Rating must be between 1 and 5, got {value}")]
    InvalidRating { value: u8 },

    /// Referenced movie doesn't exist in the catalog
    #[error("Movie {id} not found")]
    MovieNotFound { id: MovieId },

    /// Tried to delete a rating that isn't there
    #[error("No rating by user {user_id} for movie {movie_id}")]
    RatingNotFound { user_id: String, movie_id: MovieId },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;

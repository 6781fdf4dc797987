//! Flat-file JSON store for movies and user ratings.
//!
//! Each table is a single pretty-printed JSON array under the data
//! directory: `movies.json` and `user_ratings.json`. A missing file reads
//! as an empty table; a file that fails to parse is a hard error (see
//! [`StoreError::Json`]).
//!
//! The store is deliberately dumb plumbing. All recommendation logic lives
//! in the engine crate; this crate only answers "what is in the catalog"
//! and "what has this user rated".

use crate::error::{Result, StoreError};
use crate::types::{MAX_STARS, MIN_STARS, Movie, MovieId, UserRating};
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

const MOVIES_TABLE: &str = "movies";
const RATINGS_TABLE: &str = "user_ratings";

/// Optional filters for catalog listings.
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    /// Case-insensitive substring match against any of a movie's genres
    pub genre: Option<String>,
    /// Exact release year
    pub year: Option<u16>,
    /// Case-insensitive substring match against the title
    pub title: Option<String>,
}

/// Fields for inserting a new catalog entry; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub genres: Vec<String>,
    pub year: u16,
    pub global_rating: f64,
    pub image_url: String,
}

/// JSON-file-backed store for the movie catalog and user ratings.
///
/// Holds only the data directory path, so cloning is cheap and every
/// operation re-reads from disk. That keeps concurrent readers coherent
/// without any in-process cache to invalidate.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    data_dir: PathBuf,
}

impl FlatFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{table}.json"))
    }

    fn read_table<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            table: table.to_string(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| StoreError::Json {
            table: table.to_string(),
            source,
        })
    }

    fn write_table<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<()> {
        fs::create_dir_all(&self.data_dir).map_err(|source| StoreError::Io {
            table: table.to_string(),
            source,
        })?;
        let json = serde_json::to_string_pretty(rows).map_err(|source| StoreError::Json {
            table: table.to_string(),
            source,
        })?;
        fs::write(self.table_path(table), json).map_err(|source| StoreError::Io {
            table: table.to_string(),
            source,
        })
    }

    // =========================================================================
    // Movies
    // =========================================================================

    /// List catalog movies matching the filter, sorted ascending by id.
    pub fn movies(&self, filter: &MovieFilter) -> Result<Vec<Movie>> {
        let mut movies: Vec<Movie> = self.read_table(MOVIES_TABLE)?;

        if let Some(genre) = &filter.genre {
            let needle = genre.to_lowercase();
            movies.retain(|m| m.genres.iter().any(|g| g.to_lowercase().contains(&needle)));
        }
        if let Some(year) = filter.year {
            movies.retain(|m| m.year == year);
        }
        if let Some(title) = &filter.title {
            let needle = title.to_lowercase();
            movies.retain(|m| m.title.to_lowercase().contains(&needle));
        }

        movies.sort_by_key(|m| m.id);
        Ok(movies)
    }

    /// Fetch one movie by id.
    pub fn movie(&self, id: MovieId) -> Result<Option<Movie>> {
        let movies: Vec<Movie> = self.read_table(MOVIES_TABLE)?;
        Ok(movies.into_iter().find(|m| m.id == id))
    }

    /// Insert a new movie with the next available id.
    pub fn add_movie(&self, new: NewMovie) -> Result<Movie> {
        let mut movies: Vec<Movie> = self.read_table(MOVIES_TABLE)?;
        let next_id = movies.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let now = Utc::now().to_rfc3339();

        let movie = Movie {
            id: next_id,
            title: new.title,
            genres: new.genres,
            year: new.year,
            global_rating: new.global_rating,
            image_url: new.image_url,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        movies.push(movie.clone());
        self.write_table(MOVIES_TABLE, &movies)?;
        Ok(movie)
    }

    // =========================================================================
    // Ratings
    // =========================================================================

    /// All ratings made by one user, in stored order.
    pub fn user_ratings(&self, user_id: &str) -> Result<Vec<UserRating>> {
        let ratings: Vec<UserRating> = self.read_table(RATINGS_TABLE)?;
        Ok(ratings.into_iter().filter(|r| r.user_id == user_id).collect())
    }

    /// Upsert a rating; last write wins for an existing (user, movie) pair.
    ///
    /// Validates the star value and that the movie exists. An update keeps
    /// the original `created_at` and refreshes `updated_at`.
    pub fn rate(&self, user_id: &str, movie_id: MovieId, value: u8) -> Result<UserRating> {
        if !(MIN_STARS..=MAX_STARS).contains(&value) {
            return Err(StoreError::InvalidRating { value });
        }
        if self.movie(movie_id)?.is_none() {
            return Err(StoreError::MovieNotFound { id: movie_id });
        }

        let mut ratings: Vec<UserRating> = self.read_table(RATINGS_TABLE)?;
        let now = Utc::now().to_rfc3339();

        let updated = if let Some(existing) = ratings
            .iter_mut()
            .find(|r| r.user_id == user_id && r.movie_id == movie_id)
        {
            existing.rating = value;
            existing.updated_at = Some(now);
            existing.clone()
        } else {
            let next_id = ratings.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;
            let rating = UserRating {
                id: Some(next_id),
                user_id: user_id.to_string(),
                movie_id,
                rating: value,
                created_at: Some(now.clone()),
                updated_at: Some(now),
            };
            ratings.push(rating.clone());
            rating
        };

        self.write_table(RATINGS_TABLE, &ratings)?;
        Ok(updated)
    }

    /// Remove a rating; errors if the (user, movie) pair has none.
    pub fn unrate(&self, user_id: &str, movie_id: MovieId) -> Result<()> {
        let mut ratings: Vec<UserRating> = self.read_table(RATINGS_TABLE)?;
        let before = ratings.len();
        ratings.retain(|r| !(r.user_id == user_id && r.movie_id == movie_id));

        if ratings.len() == before {
            return Err(StoreError::RatingNotFound {
                user_id: user_id.to_string(),
                movie_id,
            });
        }
        self.write_table(RATINGS_TABLE, &ratings)
    }
}

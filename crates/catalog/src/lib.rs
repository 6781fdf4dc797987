//! # Catalog Crate
//!
//! Domain types and the flat-file store for the CineMatch recommender.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, UserRating)
//! - **store**: JSON flat-file tables with filtered queries and rating CRUD
//! - **error**: Error types for store operations
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{FlatFileStore, MovieFilter};
//!
//! let store = FlatFileStore::new("data");
//!
//! let movies = store.movies(&MovieFilter::default())?;
//! let ratings = store.user_ratings("user-1")?;
//!
//! println!("{} movies, {} ratings by user-1", movies.len(), ratings.len());
//! ```

// Public modules
pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Result, StoreError};
pub use store::{FlatFileStore, MovieFilter, NewMovie};
pub use types::{MAX_STARS, MIN_STARS, Movie, MovieId, UserRating};

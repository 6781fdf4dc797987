//! Read collaborators the orchestrator depends on.
//!
//! The core never talks to storage directly; it consumes these two traits.
//! Keeping them dyn-safe lets tests substitute counting or failing mocks,
//! and keeps the scoring pipeline honest about its only suspension points:
//! the two fetches.

use anyhow::{Context, Result};
use async_trait::async_trait;
use catalog::{FlatFileStore, Movie, MovieFilter, UserRating};

/// Source of one user's explicit ratings.
///
/// The at-most-one-rating-per-(user, movie) invariant is the provider's
/// responsibility; the orchestrator treats duplicates as already resolved.
#[async_trait]
pub trait RatingsProvider: Send + Sync {
    async fn user_ratings(&self, user_id: &str) -> Result<Vec<UserRating>>;
}

/// Source of the full movie catalog. Read-only; the core never mutates it.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn catalog(&self) -> Result<Vec<Movie>>;
}

// The flat-file store is blocking I/O, so both impls hop through
// spawn_blocking rather than stalling the runtime.

#[async_trait]
impl RatingsProvider for FlatFileStore {
    async fn user_ratings(&self, user_id: &str) -> Result<Vec<UserRating>> {
        let store = self.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || store.user_ratings(&user_id))
            .await
            .context("Ratings fetch task panicked")?
            .context("Failed to read user ratings")
    }
}

#[async_trait]
impl CatalogProvider for FlatFileStore {
    async fn catalog(&self) -> Result<Vec<Movie>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.movies(&MovieFilter::default()))
            .await
            .context("Catalog fetch task panicked")?
            .context("Failed to read movie catalog")
    }
}

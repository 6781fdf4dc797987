//! Server crate for the CineMatch recommendation engine.
//!
//! Contains the provider abstractions over storage, the error taxonomy with
//! its HTTP-equivalent status mapping, and the orchestrator that assembles
//! the scoring pipeline into a result bundle.

pub mod error;
pub mod orchestrator;
pub mod providers;

pub use error::{MIN_RATINGS, RecommendError};
pub use orchestrator::{RecommendationBundle, RecommendationOrchestrator};
pub use providers::{CatalogProvider, RatingsProvider};

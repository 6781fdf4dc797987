//! Error taxonomy for the recommendation service.
//!
//! Two kinds, and only two: a user-correctable precondition failure and an
//! upstream fetch failure. The scoring pipeline itself is total over
//! well-formed inputs and contributes no error cases.

use thiserror::Error;

/// Minimum number of ratings before recommendations are attempted.
pub const MIN_RATINGS: usize = 5;

#[derive(Error, Debug)]
pub enum RecommendError {
    /// User hasn't rated enough movies yet. Surfaced verbatim so the client
    /// can prompt for more input; never retried.
    #[error("Minimum 5 ratings required for recommendations (found {found})")]
    InsufficientRatings { found: usize },

    /// A provider fetch failed. Surfaced generically; the underlying cause
    /// stays in the source chain for the calling boundary to log. Retry
    /// policy, if any, belongs to the provider, not here.
    #[error("Internal server error")]
    Upstream(#[source] anyhow::Error),
}

impl RecommendError {
    /// HTTP-equivalent status for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            RecommendError::InsufficientRatings { .. } => 400,
            RecommendError::Upstream(_) => 500,
        }
    }

    /// Whether the client can fix this by supplying more input, as opposed
    /// to reporting an outage.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, RecommendError::InsufficientRatings { .. })
    }
}

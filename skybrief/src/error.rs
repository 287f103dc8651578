//! Crate error taxonomy
//!
//! Failure scope drives the design: configuration and validation problems
//! are caught before any network call; a rate limit is fatal for the whole
//! fetch (a briefing must never imply complete coverage from an
//! incomplete, rate-limited fetch); other upstream failures are absorbed
//! per waypoint and surface only through logs and counters.

use crate::route::RouteError;
use thiserror::Error;

/// Errors surfaced by the briefing pipeline's public operations.
#[derive(Debug, Error)]
pub enum BriefError {
    /// Missing or invalid configuration; raised before any network call
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invalid input coordinates or airport codes; raised before any
    /// network call
    #[error("validation error: {0}")]
    Validation(String),

    /// HTTP 429 from any waypoint task. The whole fetch fails with no
    /// partial output; the caller must back off and re-invoke.
    #[error("rate limited by upstream API; no partial results returned")]
    RateLimited,

    /// Upstream failure that could not be absorbed (e.g. the only query of
    /// a single-airport fetch failed)
    #[error("upstream API error: {0}")]
    Upstream(String),
}

impl From<RouteError> for BriefError {
    fn from(err: RouteError) -> Self {
        match err {
            // Spacing comes from configuration, not user route input
            RouteError::InvalidSpacing(_) => BriefError::Configuration(err.to_string()),
            _ => BriefError::Validation(err.to_string()),
        }
    }
}

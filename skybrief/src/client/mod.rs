//! HTTP client abstraction
//!
//! A thin trait over HTTP GET so the fetch orchestrator can be tested with
//! injected mock clients. The one wrinkle the advisory API forces on us:
//! HTTP 429 must be distinguishable from every other failure, because a
//! rate limit aborts the whole route fetch while anything else only drops
//! one waypoint.

mod http;

pub use http::{AsyncHttpClient, ReqwestClient};

use thiserror::Error;

/// Errors from a single HTTP request.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// HTTP 429: the upstream request quota for this credential is exhausted
    #[error("rate limited by upstream API")]
    RateLimited,

    /// Any other non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Connection, timeout, or body-read failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Client construction failed
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

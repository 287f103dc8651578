//! Concurrent advisory fetch orchestration
//!
//! Dispatches one task per waypoint onto a bounded worker pool, each task
//! paginating sequentially through its waypoint's result pages on one
//! credential. The pool (semaphore plus join set) lives for exactly one
//! fetch call and is released on every exit path.
//!
//! Failure policy:
//! - HTTP 429 on any task is fatal for the whole fetch. Already-dispatched
//!   tasks drain, their results are discarded, and the caller gets
//!   [`BriefError::RateLimited`](crate::error::BriefError::RateLimited)
//!   with no partial output.
//! - Any other request failure drops only that waypoint's contribution;
//!   the fetch continues and returns the union of everything that
//!   succeeded.
//! - A malformed page body drops only that page.

mod orchestrator;
mod stats;

pub use orchestrator::{FetchOrchestrator, FetchOutcome};
pub use stats::FetchStats;

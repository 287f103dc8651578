//! skybrief - Route NOTAM briefing pipeline
//!
//! This library retrieves safety advisories covering a flight's
//! great-circle path from the upstream NOTAM API, merges the results of
//! overlapping geographic queries into a unique set, and ranks them so the
//! most safety-critical items surface first.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use skybrief::config::BriefingConfig;
//! use skybrief::credentials::Credential;
//! use skybrief::route::Coordinate;
//! use skybrief::scoring::RouteEndpoints;
//! use skybrief::service::BriefingService;
//!
//! let config = BriefingConfig::with_credentials(vec![
//!     Credential::new("client-id", "client-secret"),
//! ]);
//! let service = BriefingService::new(&config)?;
//!
//! let okc = Coordinate::new(35.3931, -97.6007)?;
//! let dfw = Coordinate::new(32.8998, -97.0403)?;
//! let records = service.fetch_route(okc, dfw).await?;
//! let ranked = service.prioritize(records, &RouteEndpoints::none());
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod dedup;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod notam;
pub mod parse;
pub mod query;
pub mod route;
pub mod scoring;
pub mod service;

/// Version of the skybrief library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

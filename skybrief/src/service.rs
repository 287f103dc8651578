//! High-level briefing facade
//!
//! Wires configuration, HTTP client, orchestrator, deduplication, and
//! scoring into the three public operations: `fetch_route`,
//! `fetch_airport`, and `prioritize`. Callers that need finer control can
//! assemble the components themselves; the CLI goes through here.

use crate::client::{AsyncHttpClient, ClientError, ReqwestClient};
use crate::config::BriefingConfig;
use crate::credentials::CredentialPool;
use crate::dedup::deduplicate;
use crate::error::BriefError;
use crate::fetch::FetchOrchestrator;
use crate::notam::{NotamRecord, ScoredNotam};
use crate::route::{self, Coordinate};
use crate::scoring::{rank, RouteEndpoints, ScoringEngine};
use chrono::{DateTime, Utc};
use tracing::info;

/// The assembled briefing pipeline.
pub struct BriefingService<C: AsyncHttpClient> {
    orchestrator: FetchOrchestrator<C>,
    engine: ScoringEngine,
    waypoint_spacing_nm: f64,
}

impl BriefingService<ReqwestClient> {
    /// Creates a service with a real HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`BriefError::Configuration`] for an invalid config or a
    /// client that cannot be built. No network call is made here.
    pub fn new(config: &BriefingConfig) -> Result<Self, BriefError> {
        let client = ReqwestClient::with_timeout(config.request_timeout).map_err(|e| match e {
            ClientError::Build(msg) => BriefError::Configuration(msg),
            other => BriefError::Configuration(other.to_string()),
        })?;
        Self::with_client(config, client)
    }
}

impl<C: AsyncHttpClient + 'static> BriefingService<C> {
    /// Creates a service around an injected HTTP client.
    pub fn with_client(config: &BriefingConfig, client: C) -> Result<Self, BriefError> {
        config.validate()?;
        let pool = CredentialPool::new(config.credentials.clone()).ok_or_else(|| {
            BriefError::Configuration("at least one API credential is required".to_string())
        })?;

        Ok(Self {
            orchestrator: FetchOrchestrator::new(client, pool, config),
            engine: ScoringEngine::with_default_rules(),
            waypoint_spacing_nm: config.waypoint_spacing_nm,
        })
    }

    /// The underlying HTTP client.
    pub fn http_client(&self) -> &C {
        self.orchestrator.client()
    }

    /// Fetches the deduplicated (unordered) advisory set covering the
    /// great-circle route between two coordinates.
    pub async fn fetch_route(
        &self,
        departure: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<NotamRecord>, BriefError> {
        let waypoints = route::waypoints(&departure, &destination, self.waypoint_spacing_nm)?;
        info!(
            waypoints = waypoints.len(),
            distance_nm = route::distance(&departure, &destination),
            "sampling route"
        );

        let outcome = self.orchestrator.fetch_route(&waypoints).await?;
        let unique = deduplicate(outcome.records);
        info!(unique = unique.len(), "route advisories deduplicated");
        Ok(unique)
    }

    /// Fetches the deduplicated advisory set for a single airport.
    pub async fn fetch_airport(&self, code: &str) -> Result<Vec<NotamRecord>, BriefError> {
        let outcome = self.orchestrator.fetch_airport(code).await?;
        Ok(deduplicate(outcome.records))
    }

    /// Scores and ranks a record set, evaluated at the current instant.
    pub fn prioritize(&self, records: Vec<NotamRecord>, route: &RouteEndpoints) -> Vec<ScoredNotam> {
        self.prioritize_at(records, Utc::now(), route)
    }

    /// Scores and ranks a record set at an explicit evaluation instant.
    /// Split out so callers and tests get deterministic rankings.
    pub fn prioritize_at(
        &self,
        records: Vec<NotamRecord>,
        now: DateTime<Utc>,
        route: &RouteEndpoints,
    ) -> Vec<ScoredNotam> {
        rank(self.engine.score_all(records, now, route))
    }
}

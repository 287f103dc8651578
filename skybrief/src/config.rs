//! Briefing configuration
//!
//! One struct per briefing run, constructed explicitly and validated before
//! any network call. There is no ambient or environment-backed lookup in
//! the library; the CLI (or any other caller) decides where values come
//! from and hands over a finished config.

use crate::credentials::Credential;
use crate::error::BriefError;
use std::time::Duration;

/// Default upstream advisory API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://external-api.faa.gov/notamapi/v1/notams";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default waypoint sample spacing along the route, in nautical miles.
pub const DEFAULT_WAYPOINT_SPACING_NM: f64 = 50.0;

/// Default query circle radius, in nautical miles. Slightly above the
/// spacing so adjacent query circles overlap and leave no coverage gap.
pub const DEFAULT_QUERY_RADIUS_NM: f64 = 50.0;

/// Default upstream page size.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default cap on pages fetched per waypoint. Pages arrive newest-first,
/// so the cap sheds the oldest advisories when a waypoint is truncated.
pub const DEFAULT_MAX_PAGES_PER_WAYPOINT: u32 = 5;

/// Complete configuration for one briefing pipeline.
#[derive(Debug, Clone)]
pub struct BriefingConfig {
    /// Upstream API endpoint
    pub base_url: String,
    /// Credential list; striped round-robin across waypoints
    pub credentials: Vec<Credential>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Cap on pages fetched per waypoint
    pub max_pages_per_waypoint: u32,
    /// Waypoint sample spacing in nautical miles
    pub waypoint_spacing_nm: f64,
    /// Query circle radius in nautical miles
    pub query_radius_nm: f64,
    /// Upstream page size
    pub page_size: u32,
    /// Optional upstream classification filter
    pub classification: Option<String>,
}

impl BriefingConfig {
    /// Creates a config with defaults and the given credentials.
    pub fn with_credentials(credentials: Vec<Credential>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_pages_per_waypoint: DEFAULT_MAX_PAGES_PER_WAYPOINT,
            waypoint_spacing_nm: DEFAULT_WAYPOINT_SPACING_NM,
            query_radius_nm: DEFAULT_QUERY_RADIUS_NM,
            page_size: DEFAULT_PAGE_SIZE,
            classification: None,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BriefError::Configuration`] describing the first problem
    /// found. Runs before any network call.
    pub fn validate(&self) -> Result<(), BriefError> {
        if self.credentials.is_empty() {
            return Err(BriefError::Configuration(
                "at least one API credential is required".to_string(),
            ));
        }
        for (i, credential) in self.credentials.iter().enumerate() {
            if credential.client_id.trim().is_empty() || credential.client_secret.trim().is_empty()
            {
                return Err(BriefError::Configuration(format!(
                    "credential {} has an empty id or secret",
                    i
                )));
            }
        }
        if self.base_url.trim().is_empty() {
            return Err(BriefError::Configuration("base URL is empty".to_string()));
        }
        if self.waypoint_spacing_nm <= 0.0 {
            return Err(BriefError::Configuration(format!(
                "waypoint spacing must be positive, got {} NM",
                self.waypoint_spacing_nm
            )));
        }
        if self.query_radius_nm <= 0.0 {
            return Err(BriefError::Configuration(format!(
                "query radius must be positive, got {} NM",
                self.query_radius_nm
            )));
        }
        if self.page_size == 0 {
            return Err(BriefError::Configuration(
                "page size must be at least 1".to_string(),
            ));
        }
        if self.max_pages_per_waypoint == 0 {
            return Err(BriefError::Configuration(
                "max pages per waypoint must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

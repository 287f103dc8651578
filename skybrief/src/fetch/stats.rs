//! Fetch statistics
//!
//! Counters accumulated across all waypoint tasks of one fetch. These are
//! observability only: no control-flow decision reads them.

use crate::parse::PageStats;
use tracing::info;

/// Aggregate counters for one `fetch_route`/`fetch_airport` invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Waypoints dispatched
    pub waypoints_total: usize,
    /// Waypoints dropped because their request failed
    pub waypoints_failed: usize,
    /// Pages successfully fetched and parsed
    pub pages_fetched: usize,
    /// Pages whose body was malformed and skipped
    pub pages_failed: usize,
    /// Item counters merged across all parsed pages
    pub items: PageStats,
}

impl FetchStats {
    /// Logs a one-line summary of the fetch.
    pub fn log_summary(&self) {
        info!(
            waypoints = self.waypoints_total,
            waypoints_failed = self.waypoints_failed,
            pages = self.pages_fetched,
            pages_failed = self.pages_failed,
            items_kept = self.items.items_kept,
            items_skipped = self.items.items_skipped,
            coords_geometry = self.items.coords_from_geometry,
            coords_text = self.items.coords_from_text,
            coords_missing = self.items.coords_missing,
            "fetch complete"
        );
    }
}

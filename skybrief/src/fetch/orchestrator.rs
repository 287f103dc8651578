//! Fetch orchestrator implementation

use super::stats::FetchStats;
use crate::client::{AsyncHttpClient, ClientError};
use crate::config::BriefingConfig;
use crate::credentials::{Credential, CredentialPool};
use crate::error::BriefError;
use crate::notam::NotamRecord;
use crate::parse::{parse_page, PageStats};
use crate::query::{is_valid_icao, AdvisoryQuery};
use crate::route::Waypoint;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Everything one fetch produced: the unordered record union plus the
/// counters accumulated along the way.
#[derive(Debug)]
pub struct FetchOutcome {
    pub records: Vec<NotamRecord>,
    pub stats: FetchStats,
}

/// Coordinates the concurrent, paginated advisory fetch across a route's
/// waypoints.
///
/// Each waypoint becomes one task on a worker pool bounded at twice the
/// credential-pool size; the bottleneck is per-credential upstream rate
/// limits, not local CPU. Within a task, pages are fetched sequentially on
/// the waypoint's credential; pagination is inherently ordered.
pub struct FetchOrchestrator<C: AsyncHttpClient> {
    client: Arc<C>,
    pool: CredentialPool,
    base_url: String,
    query_radius_nm: f64,
    page_size: u32,
    max_pages_per_waypoint: u32,
    classification: Option<String>,
}

impl<C: AsyncHttpClient + 'static> FetchOrchestrator<C> {
    /// Creates an orchestrator from a client, a credential pool, and the
    /// briefing configuration.
    pub fn new(client: C, pool: CredentialPool, config: &BriefingConfig) -> Self {
        Self {
            client: Arc::new(client),
            pool,
            base_url: config.base_url.clone(),
            query_radius_nm: config.query_radius_nm,
            page_size: config.page_size,
            max_pages_per_waypoint: config.max_pages_per_waypoint,
            classification: config.classification.clone(),
        }
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetches advisories for every waypoint concurrently and returns the
    /// unioned raw record set (not yet deduplicated).
    ///
    /// # Errors
    ///
    /// Returns [`BriefError::RateLimited`] if any task saw HTTP 429; all
    /// results are discarded in that case. Individual waypoint failures
    /// are absorbed and counted.
    pub async fn fetch_route(&self, waypoints: &[Waypoint]) -> Result<FetchOutcome, BriefError> {
        let semaphore = Arc::new(Semaphore::new(self.pool.len() * 2));
        let mut tasks: JoinSet<Result<WaypointYield, WaypointError>> = JoinSet::new();

        for waypoint in waypoints {
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&semaphore);
            let credential = self.pool.for_ordinal(waypoint.ordinal).clone();
            let query = AdvisoryQuery::for_waypoint(
                waypoint,
                self.query_radius_nm,
                self.page_size,
                self.classification.clone(),
            );
            let base_url = self.base_url.clone();
            let max_pages = self.max_pages_per_waypoint;
            let ordinal = waypoint.ordinal;

            tasks.spawn(async move {
                // The semaphore lives as long as the join set; acquire can
                // only fail after close, which never happens here.
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("worker semaphore closed");
                fetch_waypoint(&*client, &credential, &query, &base_url, max_pages, ordinal).await
            });
        }

        let mut records = Vec::new();
        let mut stats = FetchStats {
            waypoints_total: waypoints.len(),
            ..FetchStats::default()
        };
        let mut rate_limited = false;

        // Drain every task even after a rate-limit signal: dispatched
        // requests complete, but their results are discarded below.
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(yielded)) => {
                    stats.pages_fetched += yielded.pages_fetched;
                    stats.pages_failed += yielded.pages_failed;
                    stats.items.merge(&yielded.items);
                    records.extend(yielded.records);
                }
                Ok(Err(WaypointError::RateLimited)) => {
                    if !rate_limited {
                        warn!("rate limit hit; aborting fetch after tasks drain");
                    }
                    rate_limited = true;
                }
                Ok(Err(WaypointError::RequestFailed)) => {
                    stats.waypoints_failed += 1;
                }
                Err(join_err) => {
                    warn!(error = %join_err, "waypoint task aborted");
                    stats.waypoints_failed += 1;
                }
            }
        }

        if rate_limited {
            // No partial output: incomplete coverage must not look complete
            return Err(BriefError::RateLimited);
        }

        stats.log_summary();
        Ok(FetchOutcome { records, stats })
    }

    /// Fetches advisories for a single airport by ICAO code.
    ///
    /// # Errors
    ///
    /// [`BriefError::Validation`] for a malformed code,
    /// [`BriefError::RateLimited`] on HTTP 429, and
    /// [`BriefError::Upstream`] if the airport's only query failed. With
    /// one waypoint there is nothing to absorb the failure into.
    pub async fn fetch_airport(&self, code: &str) -> Result<FetchOutcome, BriefError> {
        if !is_valid_icao(code) {
            return Err(BriefError::Validation(format!(
                "invalid ICAO airport code: {:?}",
                code
            )));
        }

        let query = AdvisoryQuery::for_airport(code, self.page_size, self.classification.clone());
        let credential = self.pool.for_ordinal(0);

        match fetch_waypoint(
            &*self.client,
            credential,
            &query,
            &self.base_url,
            self.max_pages_per_waypoint,
            0,
        )
        .await
        {
            Ok(yielded) => {
                let stats = FetchStats {
                    waypoints_total: 1,
                    waypoints_failed: 0,
                    pages_fetched: yielded.pages_fetched,
                    pages_failed: yielded.pages_failed,
                    items: yielded.items,
                };
                stats.log_summary();
                Ok(FetchOutcome {
                    records: yielded.records,
                    stats,
                })
            }
            Err(WaypointError::RateLimited) => Err(BriefError::RateLimited),
            Err(WaypointError::RequestFailed) => Err(BriefError::Upstream(format!(
                "advisory query for {} failed",
                code.to_ascii_uppercase()
            ))),
        }
    }
}

/// Per-task failure classification. Rate limits must stay distinguishable
/// all the way up; everything else collapses to "this waypoint is lost".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaypointError {
    RateLimited,
    RequestFailed,
}

/// What one waypoint task produced.
struct WaypointYield {
    records: Vec<NotamRecord>,
    pages_fetched: usize,
    pages_failed: usize,
    items: PageStats,
}

/// Fetches all pages for one waypoint sequentially on one credential.
async fn fetch_waypoint<C: AsyncHttpClient>(
    client: &C,
    credential: &Credential,
    query: &AdvisoryQuery,
    base_url: &str,
    max_pages: u32,
    ordinal: usize,
) -> Result<WaypointYield, WaypointError> {
    let headers = [
        ("client_id", credential.client_id.as_str()),
        ("client_secret", credential.client_secret.as_str()),
    ];

    let mut yielded = WaypointYield {
        records: Vec::new(),
        pages_fetched: 0,
        pages_failed: 0,
        items: PageStats::default(),
    };

    let first_body = request_page(client, query, base_url, 1, &headers, ordinal).await?;
    let first = match parse_page(&first_body) {
        Ok(page) => page,
        Err(e) => {
            // Without page 1 there is no totalPages to paginate from; the
            // waypoint yields nothing, but siblings are unaffected.
            warn!(ordinal, error = %e, "first page malformed, waypoint yields no records");
            yielded.pages_failed = 1;
            return Ok(yielded);
        }
    };

    let total_pages = first.total_pages.clamp(1, max_pages);
    debug!(
        ordinal,
        reported_pages = first.total_pages,
        fetching_pages = total_pages,
        "first page parsed"
    );

    yielded.pages_fetched = 1;
    yielded.items.merge(&first.stats);
    yielded.records.extend(first.records);

    for page_num in 2..=total_pages {
        let body = request_page(client, query, base_url, page_num, &headers, ordinal).await?;
        match parse_page(&body) {
            Ok(page) => {
                yielded.pages_fetched += 1;
                yielded.items.merge(&page.stats);
                yielded.records.extend(page.records);
            }
            Err(e) => {
                // Only this page is lost; later pages are still fetched
                warn!(ordinal, page = page_num, error = %e, "malformed page skipped");
                yielded.pages_failed += 1;
            }
        }
    }

    Ok(yielded)
}

/// Issues one page request, classifying failures for the task.
async fn request_page<C: AsyncHttpClient>(
    client: &C,
    query: &AdvisoryQuery,
    base_url: &str,
    page_num: u32,
    headers: &[(&str, &str)],
    ordinal: usize,
) -> Result<Vec<u8>, WaypointError> {
    let url = query.url(base_url, page_num);
    match client.get_with_headers(&url, headers).await {
        Ok(body) => Ok(body),
        Err(ClientError::RateLimited) => {
            warn!(ordinal, page = page_num, "waypoint request rate limited");
            Err(WaypointError::RateLimited)
        }
        Err(e) => {
            warn!(ordinal, page = page_num, error = %e, "waypoint request failed, dropping waypoint");
            Err(WaypointError::RequestFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Coordinate;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted client: exact-URL keyed responses plus a request log of
    /// (url, client_id) pairs.
    struct ScriptedClient {
        responses: HashMap<String, Result<Vec<u8>, ClientError>>,
        log: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedClient {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                log: Mutex::new(Vec::new()),
            }
        }

        fn respond(mut self, url: String, response: Result<Vec<u8>, ClientError>) -> Self {
            self.responses.insert(url, response);
            self
        }

        fn requests(&self) -> Vec<(String, String)> {
            self.log.lock().unwrap().clone()
        }
    }

    impl AsyncHttpClient for ScriptedClient {
        async fn get_with_headers(
            &self,
            url: &str,
            headers: &[(&str, &str)],
        ) -> Result<Vec<u8>, ClientError> {
            let client_id = headers
                .iter()
                .find(|(name, _)| *name == "client_id")
                .map(|(_, value)| value.to_string())
                .unwrap_or_default();
            self.log.lock().unwrap().push((url.to_string(), client_id));

            self.responses.get(url).cloned().unwrap_or_else(|| {
                Err(ClientError::Status {
                    status: 404,
                    url: url.to_string(),
                })
            })
        }
    }

    const BASE_URL: &str = "https://api.test/notams";

    fn config() -> BriefingConfig {
        let mut config =
            BriefingConfig::with_credentials(vec![Credential::new("key-a", "secret-a")]);
        config.base_url = BASE_URL.to_string();
        config.page_size = 100;
        config.max_pages_per_waypoint = 5;
        config.query_radius_nm = 50.0;
        config
    }

    fn pool(ids: &[&str]) -> CredentialPool {
        CredentialPool::new(
            ids.iter()
                .map(|id| Credential::new(*id, format!("secret-{}", id)))
                .collect(),
        )
        .unwrap()
    }

    fn waypoint(ordinal: usize, lat: f64, lon: f64) -> Waypoint {
        Waypoint {
            ordinal,
            coord: Coordinate::new(lat, lon).unwrap(),
        }
    }

    fn query_for(wp: &Waypoint) -> AdvisoryQuery {
        AdvisoryQuery::for_waypoint(wp, 50.0, 100, None)
    }

    fn page_body(total_pages: u32, ids: &[&str]) -> Vec<u8> {
        let items: Vec<_> = ids
            .iter()
            .map(|id| {
                json!({
                    "type": "Feature",
                    "properties": { "coreNOTAMData": { "notam": {
                        "id": id,
                        "number": format!("04/{}", id),
                        "issued": "2026-04-12T14:20:00.000Z",
                        "location": "KOKC",
                        "featureType": "RWY",
                        "text": "RWY 17R/35L CLSD",
                    } } },
                    "geometry": null,
                })
            })
            .collect();

        json!({
            "pageNum": 1,
            "totalPages": total_pages,
            "items": items,
        })
        .to_string()
        .into_bytes()
    }

    #[tokio::test]
    async fn test_single_waypoint_single_page() {
        let wp = waypoint(0, 35.0, -97.0);
        let client = ScriptedClient::new().respond(
            query_for(&wp).url(BASE_URL, 1),
            Ok(page_body(1, &["N1", "N2"])),
        );

        let orchestrator = FetchOrchestrator::new(client, pool(&["key-a"]), &config());
        let outcome = orchestrator.fetch_route(&[wp]).await.unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.stats.pages_fetched, 1);
        assert_eq!(outcome.stats.waypoints_failed, 0);
    }

    #[tokio::test]
    async fn test_pagination_follows_total_pages_on_same_credential() {
        let wp = waypoint(0, 35.0, -97.0);
        let query = query_for(&wp);
        let client = ScriptedClient::new()
            .respond(query.url(BASE_URL, 1), Ok(page_body(2, &["N1"])))
            .respond(query.url(BASE_URL, 2), Ok(page_body(2, &["N2"])));

        let orchestrator = FetchOrchestrator::new(client, pool(&["key-a"]), &config());
        let outcome = orchestrator.fetch_route(&[wp]).await.unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.stats.pages_fetched, 2);

        let requests = orchestrator.client.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].0.contains("pageNum=1"));
        assert!(requests[1].0.contains("pageNum=2"));
        // Both pages on the waypoint's assigned credential
        assert_eq!(requests[0].1, "key-a");
        assert_eq!(requests[1].1, "key-a");
    }

    #[tokio::test]
    async fn test_page_cap_limits_pagination() {
        let wp = waypoint(0, 35.0, -97.0);
        let query = query_for(&wp);
        let mut client = ScriptedClient::new();
        for page in 1..=10u32 {
            client = client.respond(query.url(BASE_URL, page), Ok(page_body(10, &["N1"])));
        }

        let mut cfg = config();
        cfg.max_pages_per_waypoint = 3;
        let orchestrator = FetchOrchestrator::new(client, pool(&["key-a"]), &cfg);
        let outcome = orchestrator.fetch_route(&[wp]).await.unwrap();

        assert_eq!(outcome.stats.pages_fetched, 3);
        assert_eq!(orchestrator.client.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_credentials_striped_round_robin() {
        let wps = [
            waypoint(0, 35.0, -97.0),
            waypoint(1, 35.5, -97.2),
            waypoint(2, 36.0, -97.4),
        ];
        let mut client = ScriptedClient::new();
        for wp in &wps {
            client = client.respond(query_for(wp).url(BASE_URL, 1), Ok(page_body(1, &[])));
        }

        let orchestrator = FetchOrchestrator::new(client, pool(&["key-a", "key-b"]), &config());
        orchestrator.fetch_route(&wps).await.unwrap();

        let mut by_key: HashMap<String, usize> = HashMap::new();
        for (_, key) in orchestrator.client.requests() {
            *by_key.entry(key).or_default() += 1;
        }
        assert_eq!(by_key.get("key-a"), Some(&2));
        assert_eq!(by_key.get("key-b"), Some(&1));
    }

    #[tokio::test]
    async fn test_failed_waypoint_dropped_siblings_survive() {
        let good = waypoint(0, 35.0, -97.0);
        let bad = waypoint(1, 35.5, -97.2);
        let client = ScriptedClient::new()
            .respond(query_for(&good).url(BASE_URL, 1), Ok(page_body(1, &["N1"])))
            .respond(
                query_for(&bad).url(BASE_URL, 1),
                Err(ClientError::Status {
                    status: 500,
                    url: "x".to_string(),
                }),
            );

        let orchestrator = FetchOrchestrator::new(client, pool(&["key-a"]), &config());
        let outcome = orchestrator.fetch_route(&[good, bad]).await.unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.stats.waypoints_failed, 1);
    }

    #[tokio::test]
    async fn test_rate_limit_fails_whole_fetch() {
        let good = waypoint(0, 35.0, -97.0);
        let limited = waypoint(1, 35.5, -97.2);
        let client = ScriptedClient::new()
            .respond(query_for(&good).url(BASE_URL, 1), Ok(page_body(1, &["N1"])))
            .respond(
                query_for(&limited).url(BASE_URL, 1),
                Err(ClientError::RateLimited),
            );

        let orchestrator = FetchOrchestrator::new(client, pool(&["key-a"]), &config());
        let result = orchestrator.fetch_route(&[good, limited]).await;

        // Good waypoint data exists but must not leak out
        assert!(matches!(result, Err(BriefError::RateLimited)));
    }

    #[tokio::test]
    async fn test_malformed_first_page_yields_empty_waypoint() {
        let wp = waypoint(0, 35.0, -97.0);
        let client = ScriptedClient::new()
            .respond(query_for(&wp).url(BASE_URL, 1), Ok(b"<html>oops</html>".to_vec()));

        let orchestrator = FetchOrchestrator::new(client, pool(&["key-a"]), &config());
        let outcome = orchestrator.fetch_route(&[wp]).await.unwrap();

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stats.pages_failed, 1);
        assert_eq!(outcome.stats.waypoints_failed, 0);
    }

    #[tokio::test]
    async fn test_malformed_later_page_skipped_not_fatal() {
        let wp = waypoint(0, 35.0, -97.0);
        let query = query_for(&wp);
        let client = ScriptedClient::new()
            .respond(query.url(BASE_URL, 1), Ok(page_body(3, &["N1"])))
            .respond(query.url(BASE_URL, 2), Ok(b"garbage".to_vec()))
            .respond(query.url(BASE_URL, 3), Ok(page_body(3, &["N3"])));

        let orchestrator = FetchOrchestrator::new(client, pool(&["key-a"]), &config());
        let outcome = orchestrator.fetch_route(&[wp]).await.unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.stats.pages_fetched, 2);
        assert_eq!(outcome.stats.pages_failed, 1);
    }

    #[tokio::test]
    async fn test_fetch_airport_by_icao() {
        let query = AdvisoryQuery::for_airport("KOKC", 100, None);
        let client = ScriptedClient::new()
            .respond(query.url(BASE_URL, 1), Ok(page_body(1, &["N1"])));

        let orchestrator = FetchOrchestrator::new(client, pool(&["key-a"]), &config());
        let outcome = orchestrator.fetch_airport("KOKC").await.unwrap();

        assert_eq!(outcome.records.len(), 1);
        let requests = orchestrator.client.requests();
        assert!(requests[0].0.contains("icaoLocation=KOKC"));
    }

    #[tokio::test]
    async fn test_fetch_airport_rejects_bad_code() {
        let orchestrator =
            FetchOrchestrator::new(ScriptedClient::new(), pool(&["key-a"]), &config());

        let result = orchestrator.fetch_airport("NOT-AN-ICAO").await;
        assert!(matches!(result, Err(BriefError::Validation(_))));
        // Rejected before any network call
        assert!(orchestrator.client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_airport_upstream_failure_surfaces() {
        let query = AdvisoryQuery::for_airport("KOKC", 100, None);
        let client = ScriptedClient::new().respond(
            query.url(BASE_URL, 1),
            Err(ClientError::Status {
                status: 503,
                url: "x".to_string(),
            }),
        );

        let orchestrator = FetchOrchestrator::new(client, pool(&["key-a"]), &config());
        assert!(matches!(
            orchestrator.fetch_airport("KOKC").await,
            Err(BriefError::Upstream(_))
        ));
    }
}

//! Integration tests for the full briefing pipeline.
//!
//! These tests drive the service facade end to end over a scripted HTTP
//! client: route sampling → concurrent paginated fetch → parse → dedup →
//! scoring/ranking. They verify:
//! - overlapping waypoint queries collapse to one advisory
//! - pagination follows totalPages on the waypoint's own credential
//! - an injected HTTP 429 fails the whole fetch with no partial output
//!
//! Run with: `cargo test --test pipeline_integration`

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::json;
use skybrief::client::{AsyncHttpClient, ClientError};
use skybrief::config::BriefingConfig;
use skybrief::credentials::Credential;
use skybrief::error::BriefError;
use skybrief::query::AdvisoryQuery;
use skybrief::route::{self, Coordinate};
use skybrief::scoring::RouteEndpoints;
use skybrief::service::BriefingService;

// ============================================================================
// Mock Implementations
// ============================================================================

/// Scripted HTTP client: responses keyed by exact URL, plus a log of
/// (url, client_id) pairs for asserting on request traffic.
struct ScriptedClient {
    responses: Mutex<HashMap<String, Result<Vec<u8>, ClientError>>>,
    log: Mutex<Vec<(String, String)>>,
    /// Response for URLs with no script entry
    fallback: Result<Vec<u8>, ClientError>,
}

impl ScriptedClient {
    fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            log: Mutex::new(Vec::new()),
            fallback: Ok(page_body(1, &[])),
        }
    }

    fn respond(self, url: String, response: Result<Vec<u8>, ClientError>) -> Self {
        self.responses.lock().unwrap().insert(url, response);
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

        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

// ============================================================================
// Test Fixtures
// ============================================================================

const BASE_URL: &str = "https://api.test/notams";

fn kokc() -> Coordinate {
    Coordinate::new(35.3931, -97.6007).unwrap()
}

fn kdfw() -> Coordinate {
    Coordinate::new(32.8998, -97.0403).unwrap()
}

fn config(credentials: &[(&str, &str)]) -> BriefingConfig {
    let mut config = BriefingConfig::with_credentials(
        credentials
            .iter()
            .map(|(id, secret)| Credential::new(*id, *secret))
            .collect(),
    );
    config.base_url = BASE_URL.to_string();
    config.waypoint_spacing_nm = 50.0;
    config.query_radius_nm = 50.0;
    config.page_size = 100;
    config.max_pages_per_waypoint = 5;
    config
}

/// URL of page `page_num` for the waypoint with the given ordinal on the
/// KOKC→KDFW route, built through the same query code the pipeline uses.
fn waypoint_url(config: &BriefingConfig, ordinal: usize, page_num: u32) -> String {
    let waypoints = route::waypoints(&kokc(), &kdfw(), config.waypoint_spacing_nm).unwrap();
    let query = AdvisoryQuery::for_waypoint(
        &waypoints[ordinal],
        config.query_radius_nm,
        config.page_size,
        config.classification.clone(),
    );
    query.url(&config.base_url, page_num)
}

fn advisory(id: &str, number: &str, location: &str, text: &str) -> serde_json::Value {
    json!({
        "type": "Feature",
        "properties": { "coreNOTAMData": { "notam": {
            "id": id,
            "number": number,
            "issued": "2026-04-12T14:20:00.000Z",
            "location": location,
            "featureType": "RWY",
            "text": text,
        } } },
        "geometry": { "type": "Point", "coordinates": [-97.6007, 35.3931], "radius": 5.0 },
    })
}

fn page_body(total_pages: u32, items: &[serde_json::Value]) -> Vec<u8> {
    json!({
        "pageNum": 1,
        "totalPages": total_pages,
        "items": items,
    })
    .to_string()
    .into_bytes()
}

// ============================================================================
// End-to-End Properties
// ============================================================================

#[tokio::test]
async fn overlapping_waypoint_queries_dedup_to_one_advisory() {
    let config = config(&[("key-a", "secret-a")]);

    // The same advisory comes back through two adjacent waypoint queries,
    // as overlapping query circles make routine
    let shared = advisory("N123", "04/033", "KOKC", "RWY 17R/35L CLSD");
    let client = ScriptedClient::new()
        .respond(
            waypoint_url(&config, 0, 1),
            Ok(page_body(1, &[shared.clone()])),
        )
        .respond(waypoint_url(&config, 1, 1), Ok(page_body(1, &[shared])));

    let service = BriefingService::with_client(&config, client).unwrap();
    let records = service.fetch_route(kokc(), kdfw()).await.unwrap();

    let n123_count = records
        .iter()
        .filter(|r| r.id.as_deref() == Some("N123"))
        .count();
    assert_eq!(n123_count, 1, "exactly one N123 after dedup");
}

#[tokio::test]
async fn total_pages_triggers_follow_up_on_same_credential() {
    let config = config(&[("key-a", "secret-a"), ("key-b", "secret-b")]);

    // Waypoint 1 (assigned key-b by round-robin) declares two pages
    let client = ScriptedClient::new()
        .respond(
            waypoint_url(&config, 1, 1),
            Ok(page_body(2, &[advisory("N1", "04/001", "KOKC", "RWY CLSD")])),
        )
        .respond(
            waypoint_url(&config, 1, 2),
            Ok(page_body(2, &[advisory("N2", "04/002", "KOKC", "TWY CLSD")])),
        );

    let service = BriefingService::with_client(&config, client).unwrap();
    let records = service.fetch_route(kokc(), kdfw()).await.unwrap();
    assert_eq!(records.len(), 2);

    // Find both page requests for waypoint 1 and check their credential
    let page1_url = waypoint_url(&config, 1, 1);
    let page2_url = waypoint_url(&config, 1, 2);
    let requests = service_requests(&service);
    let page1 = requests.iter().find(|(url, _)| *url == page1_url).unwrap();
    let page2 = requests.iter().find(|(url, _)| *url == page2_url).unwrap();
    assert_eq!(page1.1, "key-b");
    assert_eq!(page2.1, "key-b", "page 2 must reuse the waypoint's credential");

    // With two keys, waypoints stripe evenly: no key is idle
    let keys_used: std::collections::HashSet<_> =
        requests.iter().map(|(_, key)| key.clone()).collect();
    assert!(keys_used.contains("key-a"));
    assert!(keys_used.contains("key-b"));
}

#[tokio::test]
async fn injected_429_fails_fetch_with_rate_limit_error() {
    let config = config(&[("key-a", "secret-a")]);

    // Other waypoints answer normally; one is rate limited
    let client = ScriptedClient::new()
        .respond(
            waypoint_url(&config, 0, 1),
            Ok(page_body(1, &[advisory("N1", "04/001", "KOKC", "RWY CLSD")])),
        )
        .respond(waypoint_url(&config, 2, 1), Err(ClientError::RateLimited));

    let service = BriefingService::with_client(&config, client).unwrap();
    let result = service.fetch_route(kokc(), kdfw()).await;

    // Valid data from waypoint 0 must not leak out as a partial briefing
    assert!(matches!(result, Err(BriefError::RateLimited)));
}

#[tokio::test]
async fn fetched_route_ranks_deterministically() {
    let config = config(&[("key-a", "secret-a")]);

    let client = ScriptedClient::new().respond(
        waypoint_url(&config, 0, 1),
        Ok(page_body(
            1,
            &[
                advisory("N10", "04/010", "KTUL", "BIRD ACTIVITY"),
                advisory("N11", "04/011", "KOKC", "RWY 17R/35L CLSD"),
            ],
        )),
    );

    let service = BriefingService::with_client(&config, client).unwrap();
    let records = service.fetch_route(kokc(), kdfw()).await.unwrap();
    assert_eq!(records.len(), 2);

    let endpoints = RouteEndpoints::new(Some("KOKC".to_string()), Some("KDFW".to_string()));
    let ranked = service.prioritize(records, &endpoints);

    // The closure at the departure airport outranks the bird advisory
    assert_eq!(ranked[0].record.id.as_deref(), Some("N11"));
    assert!(ranked[0].score > ranked[1].score);

    // Ranking is a permutation and idempotent under re-application
    let reranked = service.prioritize(
        ranked.iter().map(|s| s.record.clone()).collect(),
        &endpoints,
    );
    assert_eq!(reranked.len(), ranked.len());
    for (a, b) in ranked.iter().zip(reranked.iter()) {
        assert_eq!(a.record.id, b.record.id);
    }
}

#[tokio::test]
async fn failed_waypoint_drops_only_its_contribution() {
    let config = config(&[("key-a", "secret-a")]);

    let client = ScriptedClient::new()
        .respond(
            waypoint_url(&config, 0, 1),
            Ok(page_body(1, &[advisory("N1", "04/001", "KOKC", "RWY CLSD")])),
        )
        .respond(
            waypoint_url(&config, 1, 1),
            Err(ClientError::Status {
                status: 503,
                url: "x".to_string(),
            }),
        );

    let service = BriefingService::with_client(&config, client).unwrap();
    let records = service.fetch_route(kokc(), kdfw()).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.as_deref(), Some("N1"));
}

// ============================================================================
// Helpers
// ============================================================================

/// Reaches the scripted client's request log back out of the service.
fn service_requests(service: &BriefingService<ScriptedClient>) -> Vec<(String, String)> {
    service.http_client().requests()
}

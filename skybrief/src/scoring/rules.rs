//! Built-in scoring rules
//!
//! Each rule is a pure function of (record, evaluation instant, route
//! endpoints). Rules share no state and can be added or removed without
//! touching the others; the engine simply sums whatever rules it is given.

use super::RouteEndpoints;
use crate::notam::{Category, NotamRecord};
use chrono::{DateTime, Utc};

// Category weights, in safety-significance order.
const WEIGHT_RUNWAY: f64 = 30.0;
const WEIGHT_AIRSPACE: f64 = 25.0;
const WEIGHT_OBSTACLE: f64 = 20.0;
const WEIGHT_TAXIWAY: f64 = 10.0;

// Keyword class weights. Classes stack: an advisory matching several
// classes collects all of them.
const WEIGHT_CLOSURE: f64 = 25.0;
const WEIGHT_NAVAID_OUTAGE: f64 = 20.0;
const WEIGHT_UNSERVICEABLE: f64 = 15.0;
const WEIGHT_FUEL: f64 = 15.0;
const WEIGHT_SPECIAL_USE: f64 = 10.0;
const WEIGHT_MAINTENANCE: f64 = 5.0;

// Recency: full credit inside the fresh window, then exponential decay.
const RECENCY_FULL: f64 = 20.0;
const RECENCY_FRESH_HOURS: f64 = 24.0;
const RECENCY_HALF_LIFE_HOURS: f64 = 72.0;

// Proximity: full credit for tightly scoped advisories, fading to zero,
// with a penalty for region-wide ones and a bonus for the route's own
// endpoints.
const PROXIMITY_FULL: f64 = 15.0;
const PROXIMITY_FULL_RADIUS_NM: f64 = 5.0;
const PROXIMITY_ZERO_RADIUS_NM: f64 = 50.0;
const REGION_WIDE_RADIUS_NM: f64 = 100.0;
const REGION_WIDE_PENALTY: f64 = -10.0;
const ENDPOINT_BONUS: f64 = 10.0;

const CLOSURE_PHRASES: &[&str] = &["CLSD", "CLOSED"];
const UNSERVICEABLE_PHRASES: &[&str] = &["U/S", "UNSERVICEABLE", "OUT OF SERVICE", "OTS"];
const NAVAID_PHRASES: &[&str] = &["ILS", "VOR", "NDB", "TACAN", "DME", "GPS UNRELIABLE", "RAIM"];
const FUEL_PHRASES: &[&str] = &["FUEL NOT AVBL", "FUEL UNAVAILABLE", "NO FUEL", "AVGAS NOT AVBL"];
const MAINTENANCE_PHRASES: &[&str] = &["MAINT", "WIP", "WORK IN PROGRESS"];
const SPECIAL_USE_PHRASES: &[&str] = &[
    "UAS",
    "DRONE",
    "UNMANNED",
    "GLIDER",
    "HIGH SPEED",
    "AEROBATIC",
];

/// Fixed ordinal weight of the advisory's category.
pub fn category_rule(record: &NotamRecord, _now: DateTime<Utc>, _route: &RouteEndpoints) -> f64 {
    match record.category {
        Category::Runway => WEIGHT_RUNWAY,
        Category::Airspace => WEIGHT_AIRSPACE,
        Category::Obstacle => WEIGHT_OBSTACLE,
        Category::Taxiway => WEIGHT_TAXIWAY,
        Category::Unknown => 0.0,
    }
}

/// Stackable keyword-class contributions from the advisory text.
pub fn keyword_rule(record: &NotamRecord, _now: DateTime<Utc>, _route: &RouteEndpoints) -> f64 {
    let text = record.text.to_uppercase();
    let mut score = 0.0;

    let classes: &[(&[&str], f64)] = &[
        (CLOSURE_PHRASES, WEIGHT_CLOSURE),
        (UNSERVICEABLE_PHRASES, WEIGHT_UNSERVICEABLE),
        (NAVAID_PHRASES, WEIGHT_NAVAID_OUTAGE),
        (FUEL_PHRASES, WEIGHT_FUEL),
        (MAINTENANCE_PHRASES, WEIGHT_MAINTENANCE),
        (SPECIAL_USE_PHRASES, WEIGHT_SPECIAL_USE),
    ];

    for (phrases, weight) in classes {
        if phrases.iter().any(|p| text.contains(p)) {
            score += weight;
        }
    }

    score
}

/// Full credit for advisories issued within the fresh window; beyond that,
/// exponential decay toward zero with a 72-hour half-life. Never negative;
/// an absent issue time contributes zero.
pub fn recency_rule(record: &NotamRecord, now: DateTime<Utc>, _route: &RouteEndpoints) -> f64 {
    let issued = match record.issued_at {
        Some(issued) => issued,
        None => return 0.0,
    };

    let age_hours = (now - issued).num_seconds() as f64 / 3600.0;
    if age_hours <= RECENCY_FRESH_HOURS {
        // Future-dated issue times also get full credit
        return RECENCY_FULL;
    }

    let excess = age_hours - RECENCY_FRESH_HOURS;
    RECENCY_FULL * 0.5_f64.powf(excess / RECENCY_HALF_LIFE_HOURS)
}

/// Credit for tightly scoped advisories, penalty for region-wide ones,
/// bonus for the route's own departure/destination airports.
pub fn proximity_rule(record: &NotamRecord, _now: DateTime<Utc>, route: &RouteEndpoints) -> f64 {
    let mut score = 0.0;

    if let Some(radius) = record.radius_nm {
        if radius <= PROXIMITY_FULL_RADIUS_NM {
            score += PROXIMITY_FULL;
        } else if radius < PROXIMITY_ZERO_RADIUS_NM {
            let fade = (PROXIMITY_ZERO_RADIUS_NM - radius)
                / (PROXIMITY_ZERO_RADIUS_NM - PROXIMITY_FULL_RADIUS_NM);
            score += PROXIMITY_FULL * fade;
        }
        if radius >= REGION_WIDE_RADIUS_NM {
            score += REGION_WIDE_PENALTY;
        }
    }

    if let Some(location) = &record.location {
        if route.matches_endpoint(location) {
            score += ENDPOINT_BONUS;
        }
    }

    score
}

//! NOTAM data model
//!
//! Normalized advisory records produced by the response parser and consumed
//! by deduplication and scoring. All fields are set at construction and
//! never mutated; one record lives for one pipeline run.

use crate::route::Coordinate;
use chrono::{DateTime, Utc};
use std::fmt;

/// Advisory classification, mapped from the raw upstream type token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Runway,
    Taxiway,
    Airspace,
    Obstacle,
    Unknown,
}

impl Category {
    /// Maps a raw classification token to a category.
    ///
    /// Unrecognized tokens map to [`Category::Unknown`] rather than failing
    /// the item, since classification quality upstream is inconsistent.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_uppercase().as_str() {
            "RWY" | "RUNWAY" => Category::Runway,
            "TWY" | "TAXIWAY" => Category::Taxiway,
            "AIRSPACE" | "ARSP" => Category::Airspace,
            "OBST" | "OBSTACLE" => Category::Obstacle,
            _ => Category::Unknown,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Runway => "RUNWAY",
            Category::Taxiway => "TAXIWAY",
            Category::Airspace => "AIRSPACE",
            Category::Obstacle => "OBSTACLE",
            Category::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// End of an advisory's effective window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEnd {
    /// Known end instant
    At(DateTime<Utc>),
    /// Open-ended ("PERM" sentinel upstream)
    Permanent,
}

/// Effective start/end window of an advisory. Either bound may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectiveWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<WindowEnd>,
}

/// One normalized advisory record.
///
/// `coordinate` is `None` when neither geometry nor free text yielded a
/// position. It is never defaulted to (0, 0), which is a valid ocean coordinate
/// and would silently corrupt proximity scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct NotamRecord {
    /// Upstream identity, normally present
    pub id: Option<String>,
    /// Human-readable NOTAM number (e.g. "04/033")
    pub number: String,
    pub category: Category,
    /// 4-letter ICAO location code
    pub location: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub effective: EffectiveWindow,
    pub coordinate: Option<Coordinate>,
    /// Declared affected radius in nautical miles
    pub radius_nm: Option<f64>,
    /// Free-form advisory text, may be empty
    pub text: String,
}

/// A record with its total score and per-rule contribution breakdown.
///
/// The breakdown exists so each rule's contribution can be asserted on in
/// isolation; rendering only uses `score`.
#[derive(Debug, Clone)]
pub struct ScoredNotam {
    pub record: NotamRecord,
    pub score: f64,
    pub breakdown: Vec<(&'static str, f64)>,
}

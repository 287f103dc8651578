//! Response page parsing
//!
//! Converts one raw page body into normalized [`NotamRecord`]s. Parsing is
//! stateless: coordinate extraction reports its source as part of the
//! return value, so the parser is safely shared across concurrent waypoint
//! tasks, and per-page statistics are returned for the orchestrator to
//! aggregate.
//!
//! Failure granularity matters here. A malformed top-level document fails
//! only that page. An item missing its required fields, or with an
//! unparsable issue timestamp, is skipped with a warning and the rest of
//! the page continues.

mod envelope;
mod position;

pub use position::position_from_text;

use crate::notam::{Category, EffectiveWindow, NotamRecord, WindowEnd};
use crate::route::Coordinate;
use chrono::{DateTime, NaiveDateTime, Utc};
use envelope::{FeatureItem, PageEnvelope, RawNotam};
use thiserror::Error;
use tracing::{debug, warn};

/// Error type for page parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed page document: {0}")]
    MalformedPage(String),
}

/// Where a record's coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSource {
    /// Structured point geometry (directly or inside a collection)
    Geometry,
    /// Position token matched in the advisory free text
    FreeText,
}

/// Counters for one parsed page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageStats {
    pub items_seen: usize,
    pub items_kept: usize,
    pub items_skipped: usize,
    pub coords_from_geometry: usize,
    pub coords_from_text: usize,
    pub coords_missing: usize,
}

impl PageStats {
    /// Folds another page's counters into this one.
    pub fn merge(&mut self, other: &PageStats) {
        self.items_seen += other.items_seen;
        self.items_kept += other.items_kept;
        self.items_skipped += other.items_skipped;
        self.coords_from_geometry += other.coords_from_geometry;
        self.coords_from_text += other.coords_from_text;
        self.coords_missing += other.coords_missing;
    }
}

/// One parsed page: pagination bookkeeping plus the normalized records.
#[derive(Debug)]
pub struct ParsedPage {
    pub page_num: u32,
    pub total_pages: u32,
    pub records: Vec<NotamRecord>,
    pub stats: PageStats,
}

/// Parses one raw page body.
///
/// # Errors
///
/// Returns [`ParseError::MalformedPage`] if the body is not a valid page
/// document. Item-level problems never fail the page.
pub fn parse_page(body: &[u8]) -> Result<ParsedPage, ParseError> {
    let envelope: PageEnvelope =
        serde_json::from_slice(body).map_err(|e| ParseError::MalformedPage(e.to_string()))?;

    let mut records = Vec::with_capacity(envelope.items.len());
    let mut stats = PageStats::default();

    for item in &envelope.items {
        stats.items_seen += 1;
        match convert_item(item) {
            Some((record, source)) => {
                match source {
                    Some(CoordinateSource::Geometry) => stats.coords_from_geometry += 1,
                    Some(CoordinateSource::FreeText) => stats.coords_from_text += 1,
                    None => stats.coords_missing += 1,
                }
                stats.items_kept += 1;
                records.push(record);
            }
            None => stats.items_skipped += 1,
        }
    }

    debug!(
        page = envelope.page_num,
        total_pages = envelope.total_pages,
        kept = stats.items_kept,
        skipped = stats.items_skipped,
        "parsed advisory page"
    );

    Ok(ParsedPage {
        page_num: envelope.page_num,
        total_pages: envelope.total_pages,
        records,
        stats,
    })
}

/// Converts one feature item, or returns `None` to skip it.
fn convert_item(item: &FeatureItem) -> Option<(NotamRecord, Option<CoordinateSource>)> {
    let raw = match item
        .properties
        .as_ref()
        .and_then(|p| p.core_notam_data.as_ref())
        .and_then(|c| c.notam.as_ref())
    {
        Some(raw) => raw,
        None => {
            warn!("skipping item without advisory payload");
            return None;
        }
    };

    // Required fields: id, number, and a parseable issue timestamp.
    // A present-but-blank id is kept; dedup treats it as no identity.
    let (id, number) = match (&raw.id, &raw.number) {
        (Some(id), Some(number)) => (id.clone(), number.clone()),
        _ => {
            warn!(
                id = raw.id.as_deref(),
                number = raw.number.as_deref(),
                "skipping item with missing identification"
            );
            return None;
        }
    };
    let issued_at = match raw.issued.as_deref().map(parse_timestamp) {
        Some(Some(ts)) => ts,
        _ => {
            warn!(
                number = %number,
                issued = raw.issued.as_deref(),
                "skipping item with missing or unparsable issue timestamp"
            );
            return None;
        }
    };

    let category = raw
        .feature_type
        .as_deref()
        .map(Category::from_token)
        .unwrap_or(Category::Unknown);
    let text = raw.text.clone().unwrap_or_default();

    let (coordinate, source) = extract_coordinate(item, &text);
    let radius_nm = extract_radius(item, raw, &number);

    let effective = EffectiveWindow {
        start: raw.effective_start.as_deref().and_then(parse_timestamp),
        end: raw.effective_end.as_deref().map(parse_window_end),
    };

    let record = NotamRecord {
        id: if id.trim().is_empty() { None } else { Some(id) },
        number,
        category,
        location: raw.location.clone().filter(|l| !l.trim().is_empty()),
        issued_at: Some(issued_at),
        effective,
        coordinate,
        radius_nm,
        text,
    };

    Some((record, source))
}

/// Extracts a coordinate for the item, in priority order: structured point
/// geometry, then a position token in the free text, then nothing. Absent
/// is absent; (0, 0) is a valid ocean coordinate, never a default.
fn extract_coordinate(
    item: &FeatureItem,
    text: &str,
) -> (Option<Coordinate>, Option<CoordinateSource>) {
    if let Some(coord) = item.geometry.as_ref().and_then(point_from_geometry) {
        return (Some(coord), Some(CoordinateSource::Geometry));
    }
    if let Some(coord) = position_from_text(text) {
        return (Some(coord), Some(CoordinateSource::FreeText));
    }
    (None, None)
}

/// Finds the first Point in a geometry node.
///
/// Handles a bare Point and the first Point inside a GeometryCollection.
/// GeoJSON coordinate order is [lon, lat].
fn point_from_geometry(geometry: &serde_json::Value) -> Option<Coordinate> {
    match geometry.get("type").and_then(|t| t.as_str()) {
        Some("Point") => {
            let coords = geometry.get("coordinates")?.as_array()?;
            let lon = coords.first()?.as_f64()?;
            let lat = coords.get(1)?.as_f64()?;
            Coordinate::new(lat, lon).ok()
        }
        Some("GeometryCollection") => geometry
            .get("geometries")?
            .as_array()?
            .iter()
            .find_map(point_from_geometry),
        _ => None,
    }
}

/// Finds a radius attached to a geometry node (Point or any member of a
/// GeometryCollection).
fn radius_from_geometry(geometry: &serde_json::Value) -> Option<f64> {
    if let Some(radius) = geometry.get("radius").and_then(value_to_f64) {
        return Some(radius);
    }
    geometry
        .get("geometries")?
        .as_array()?
        .iter()
        .find_map(radius_from_geometry)
}

/// Resolves the record's radius. Geometry's value wins over the record's
/// own radius field; a mismatch is logged, not merged.
fn extract_radius(item: &FeatureItem, raw: &RawNotam, number: &str) -> Option<f64> {
    let geometry_radius = item.geometry.as_ref().and_then(radius_from_geometry);
    let record_radius = raw.radius.as_ref().and_then(value_to_f64);

    match (geometry_radius, record_radius) {
        (Some(geo), Some(rec)) => {
            if (geo - rec).abs() > f64::EPSILON {
                warn!(
                    number = %number,
                    geometry_radius = geo,
                    record_radius = rec,
                    "radius mismatch between geometry and record, using geometry"
                );
            }
            Some(geo)
        }
        (Some(geo), None) => Some(geo),
        (None, Some(rec)) => Some(rec),
        (None, None) => None,
    }
}

/// Coerces a JSON number or numeric string to f64.
fn value_to_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses an upstream timestamp: RFC 3339, or the upstream's abbreviated
/// minute-precision form without an offset (treated as UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Parses an effective-window end: the PERM sentinel or a timestamp.
/// An unparsable end is treated as permanent rather than dropped, so an
/// advisory with an unknown horizon stays in scope.
fn parse_window_end(raw: &str) -> WindowEnd {
    if raw.trim().eq_ignore_ascii_case("PERM") {
        return WindowEnd::Permanent;
    }
    match parse_timestamp(raw) {
        Some(ts) => WindowEnd::At(ts),
        None => WindowEnd::Permanent,
    }
}

//! Advisory query construction
//!
//! Builds one query descriptor per waypoint (or per airport code). A
//! descriptor is pure data plus URL formatting; pagination happens by
//! rendering the same descriptor at successive page numbers so every page
//! of one waypoint carries identical filter parameters.

use crate::route::{Coordinate, Waypoint};

/// Page-sort parameters are fixed: newest effective advisories first, so
/// the page cap keeps the most recent items when a waypoint is truncated.
const SORT_BY: &str = "effectiveStartDate";
const SORT_ORDER: &str = "Desc";

/// What a query is centered on.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryTarget {
    /// Circle around a route waypoint
    Radius {
        center: Coordinate,
        radius_nm: f64,
    },
    /// A single airport by ICAO code
    Icao { code: String },
}

/// One advisory query: target, page size, and optional classification
/// filter. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryQuery {
    pub target: QueryTarget,
    pub page_size: u32,
    /// Upstream classification filter (e.g. "INTL,DOM,FDC"); `None` omits
    /// the parameter and the API returns all classifications
    pub classification: Option<String>,
}

impl AdvisoryQuery {
    /// Builds a radius query centered on a waypoint.
    pub fn for_waypoint(
        waypoint: &Waypoint,
        radius_nm: f64,
        page_size: u32,
        classification: Option<String>,
    ) -> Self {
        Self {
            target: QueryTarget::Radius {
                center: waypoint.coord,
                radius_nm,
            },
            page_size,
            classification,
        }
    }

    /// Builds an ICAO location query for a single airport.
    pub fn for_airport(code: &str, page_size: u32, classification: Option<String>) -> Self {
        Self {
            target: QueryTarget::Icao {
                code: code.to_ascii_uppercase(),
            },
            page_size,
            classification,
        }
    }

    /// Renders the request URL for one page of this query.
    pub fn url(&self, base_url: &str, page_num: u32) -> String {
        let mut url = format!("{}?responseFormat=geoJson", base_url);

        match &self.target {
            QueryTarget::Radius { center, radius_nm } => {
                url.push_str(&format!(
                    "&locationLatitude={:.4}&locationLongitude={:.4}&locationRadius={:.0}",
                    center.lat, center.lon, radius_nm
                ));
            }
            QueryTarget::Icao { code } => {
                url.push_str(&format!("&icaoLocation={}", code));
            }
        }

        url.push_str(&format!(
            "&pageSize={}&pageNum={}&sortBy={}&sortOrder={}",
            self.page_size, page_num, SORT_BY, SORT_ORDER
        ));

        if let Some(classification) = &self.classification {
            url.push_str(&format!("&classification={}", classification));
        }

        url
    }
}

/// Checks that a string is a plausible ICAO airport code: exactly four
/// ASCII alphanumerics, starting with a letter.
pub fn is_valid_icao(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 4
        && bytes[0].is_ascii_alphabetic()
        && bytes.iter().all(|b| b.is_ascii_alphanumeric())
}

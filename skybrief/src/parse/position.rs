//! Position token extraction from advisory free text
//!
//! Many advisories without usable geometry still carry a coordinate in the
//! body, in the standard degrees/minutes[/seconds] form with hemisphere
//! letters (e.g. `3524N09736W` or `352337N0973617W`). This is the fallback
//! when geometry extraction fails; if neither succeeds the record keeps no
//! coordinate at all.

use crate::route::Coordinate;
use regex::Regex;
use std::sync::OnceLock;

/// Matches `ddmm[ss]N/S` followed by `dddmm[ss]E/W`, with optional
/// whitespace between the two groups.
fn position_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b(\d{4}|\d{6})([NS])\s?(\d{5}|\d{7})([EW])\b").expect("valid position regex")
    })
}

/// Extracts the first position token found in `text`, if any.
///
/// Tokens whose degree/minute values fall outside valid coordinate ranges
/// are ignored and the search continues, since digit runs of the right
/// length also occur in frequencies and identifiers.
pub fn position_from_text(text: &str) -> Option<Coordinate> {
    for caps in position_pattern().captures_iter(text) {
        let lat = parse_angle(&caps[1], &caps[2] == "S", 2);
        let lon = parse_angle(&caps[3], &caps[4] == "W", 3);

        if let (Some(lat), Some(lon)) = (lat, lon) {
            if let Ok(coord) = Coordinate::new(lat, lon) {
                return Some(coord);
            }
        }
    }
    None
}

/// Parses one `dd[d]mm[ss]` angle group into decimal degrees.
///
/// `degree_digits` is 2 for latitude, 3 for longitude; the group is
/// negated when its hemisphere letter is S or W.
fn parse_angle(digits: &str, negative: bool, degree_digits: usize) -> Option<f64> {
    let (deg_str, rest) = digits.split_at(degree_digits);
    let deg: f64 = deg_str.parse().ok()?;

    let (min_str, sec_str) = rest.split_at(2);
    let minutes: f64 = min_str.parse().ok()?;
    let seconds: f64 = if sec_str.is_empty() {
        0.0
    } else {
        sec_str.parse().ok()?
    };

    if minutes >= 60.0 || seconds >= 60.0 {
        return None;
    }

    let angle = deg + minutes / 60.0 + seconds / 3600.0;
    Some(if negative { -angle } else { angle })
}

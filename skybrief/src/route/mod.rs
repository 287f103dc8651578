//! Great-circle route geometry
//!
//! Provides distance and spherical interpolation between geographic
//! coordinates, and samples a route into evenly spaced waypoints used as
//! query centers for the advisory fetch.

mod types;

pub use types::{Coordinate, RouteError, Waypoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in nautical miles (spherical model).
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Central angle below which two coordinates are treated as coincident.
///
/// Guards the slerp denominator: sin of an angle this small underflows the
/// useful precision of the interpolation anyway.
const COINCIDENT_EPSILON: f64 = 1e-12;

/// Returns the central angle between two coordinates in radians,
/// computed with the haversine formula.
fn central_angle(a: &Coordinate, b: &Coordinate) -> f64 {
    let dlat = b.lat_rad() - a.lat_rad();
    let dlon = b.lon_rad() - a.lon_rad();

    let h = (dlat / 2.0).sin().powi(2)
        + a.lat_rad().cos() * b.lat_rad().cos() * (dlon / 2.0).sin().powi(2);

    2.0 * h.sqrt().min(1.0).asin()
}

/// Great-circle distance between two coordinates in nautical miles.
///
/// Symmetric: `distance(a, b) == distance(b, a)`.
#[inline]
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    central_angle(a, b) * EARTH_RADIUS_NM
}

/// Spherical linear interpolation between two coordinates.
///
/// Returns `segments + 1` coordinates inclusive of both endpoints. If the
/// endpoints coincide (central angle below epsilon), returns `segments + 1`
/// copies of `a` rather than dividing by zero.
pub fn interpolate(a: &Coordinate, b: &Coordinate, segments: usize) -> Vec<Coordinate> {
    let theta = central_angle(a, b);

    if theta < COINCIDENT_EPSILON {
        return vec![*a; segments + 1];
    }

    let sin_theta = theta.sin();
    let (lat1, lon1) = (a.lat_rad(), a.lon_rad());
    let (lat2, lon2) = (b.lat_rad(), b.lon_rad());

    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        if i == 0 {
            points.push(*a);
            continue;
        }
        if i == segments {
            points.push(*b);
            continue;
        }

        let f = i as f64 / segments as f64;
        let p = ((1.0 - f) * theta).sin() / sin_theta;
        let q = (f * theta).sin() / sin_theta;

        // Interpolate on the unit sphere in Cartesian space
        let x = p * lat1.cos() * lon1.cos() + q * lat2.cos() * lon2.cos();
        let y = p * lat1.cos() * lon1.sin() + q * lat2.cos() * lon2.sin();
        let z = p * lat1.sin() + q * lat2.sin();

        let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
        let lon = y.atan2(x).to_degrees();

        // atan2 output is already inside the valid ranges
        points.push(Coordinate { lat, lon });
    }

    points
}

/// Samples the great-circle route from `a` to `b` into waypoints at
/// approximately `spacing_nm` nautical-mile intervals.
///
/// The segment count is `max(1, ceil(distance / spacing_nm))`, so the first
/// and last waypoints are always exactly `a` and `b`.
///
/// # Errors
///
/// Returns [`RouteError::InvalidSpacing`] if `spacing_nm` is not positive.
pub fn waypoints(a: &Coordinate, b: &Coordinate, spacing_nm: f64) -> Result<Vec<Waypoint>, RouteError> {
    if spacing_nm <= 0.0 || !spacing_nm.is_finite() {
        return Err(RouteError::InvalidSpacing(spacing_nm));
    }

    let dist = distance(a, b);
    let segments = ((dist / spacing_nm).ceil() as usize).max(1);

    let points = interpolate(a, b, segments);
    Ok(points
        .into_iter()
        .enumerate()
        .map(|(ordinal, coord)| Waypoint { ordinal, coord })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).expect("valid test coordinate")
    }

    #[test]
    fn test_distance_okc_to_dfw() {
        // KOKC to KDFW is roughly 160 NM
        let okc = coord(35.3931, -97.6007);
        let dfw = coord(32.8998, -97.0403);

        let d = distance(&okc, &dfw);
        assert!((d - 152.0).abs() < 5.0, "unexpected distance: {}", d);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = coord(51.4775, -0.4614);
        let b = coord(40.6413, -73.7781);

        assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let a = coord(35.3931, -97.6007);
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn test_interpolate_endpoints_exact() {
        let a = coord(35.3931, -97.6007);
        let b = coord(32.8998, -97.0403);

        let points = interpolate(&a, &b, 4);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], a);
        assert_eq!(points[4], b);
    }

    #[test]
    fn test_interpolate_midpoint_between_endpoints() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 10.0);

        let points = interpolate(&a, &b, 2);
        let mid = points[1];
        assert!(mid.lat.abs() < 1e-9);
        assert!((mid.lon - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_interpolate_coincident_endpoints() {
        let a = coord(35.3931, -97.6007);

        let points = interpolate(&a, &a, 3);
        assert_eq!(points.len(), 4);
        for p in points {
            assert_eq!(p, a);
        }
    }

    #[test]
    fn test_waypoints_coincident_regardless_of_spacing() {
        let a = coord(35.3931, -97.6007);

        for spacing in [1.0, 50.0, 10_000.0] {
            let wps = waypoints(&a, &a, spacing).unwrap();
            assert!(wps.len() >= 2);
            for wp in &wps {
                assert_eq!(wp.coord, a);
            }
        }
    }

    #[test]
    fn test_waypoints_spacing_larger_than_distance() {
        let a = coord(35.3931, -97.6007);
        let b = coord(32.8998, -97.0403);

        // Spacing exceeds route length: exactly one segment, [a, b]
        let wps = waypoints(&a, &b, 10_000.0).unwrap();
        assert_eq!(wps.len(), 2);
        assert_eq!(wps[0].coord, a);
        assert_eq!(wps[1].coord, b);
    }

    #[test]
    fn test_waypoints_ordinals_are_sequential() {
        let a = coord(35.3931, -97.6007);
        let b = coord(32.8998, -97.0403);

        let wps = waypoints(&a, &b, 50.0).unwrap();
        for (i, wp) in wps.iter().enumerate() {
            assert_eq!(wp.ordinal, i);
        }
    }

    #[test]
    fn test_waypoints_spacing_bounds_gap() {
        let a = coord(35.3931, -97.6007);
        let b = coord(32.8998, -97.0403);

        let wps = waypoints(&a, &b, 50.0).unwrap();
        for pair in wps.windows(2) {
            let gap = distance(&pair[0].coord, &pair[1].coord);
            assert!(gap <= 50.0 + 1e-6, "gap {} exceeds spacing", gap);
        }
    }

    #[test]
    fn test_waypoints_rejects_non_positive_spacing() {
        let a = coord(35.3931, -97.6007);
        let b = coord(32.8998, -97.0403);

        assert!(matches!(
            waypoints(&a, &b, 0.0),
            Err(RouteError::InvalidSpacing(_))
        ));
        assert!(matches!(
            waypoints(&a, &b, -10.0),
            Err(RouteError::InvalidSpacing(_))
        ));
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(matches!(
            Coordinate::new(90.1, 0.0),
            Err(RouteError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Coordinate::new(0.0, -180.5),
            Err(RouteError::InvalidLongitude(_))
        ));
    }
}

//! Route type definitions

use std::fmt;

/// Valid latitude range in degrees
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in degrees
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// A geographic coordinate in decimal degrees.
///
/// Immutable value type. Construct via [`Coordinate::new`], which enforces
/// the valid latitude/longitude ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub lat: f64,
    /// Longitude in degrees, positive east
    pub lon: f64,
}

impl Coordinate {
    /// Creates a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidLatitude`] or
    /// [`RouteError::InvalidLongitude`] if either value is out of range.
    pub fn new(lat: f64, lon: f64) -> Result<Self, RouteError> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) || !lat.is_finite() {
            return Err(RouteError::InvalidLatitude(lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&lon) || !lon.is_finite() {
            return Err(RouteError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in radians.
    #[inline]
    pub fn lat_rad(&self) -> f64 {
        self.lat.to_radians()
    }

    /// Longitude in radians.
    #[inline]
    pub fn lon_rad(&self) -> f64 {
        self.lon.to_radians()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// A sampled point along a great-circle route.
///
/// Carries its ordinal position so downstream components can stripe work
/// across credentials deterministically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Position along the route, 0 at departure
    pub ordinal: usize,
    /// Geographic location of this sample
    pub coord: Coordinate,
}

/// Errors that can occur during route construction.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    /// Latitude is outside valid range (-90.0 to 90.0)
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    InvalidLongitude(f64),
    /// Waypoint spacing must be a positive number of nautical miles
    InvalidSpacing(f64),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            RouteError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            RouteError::InvalidSpacing(spacing) => {
                write!(
                    f,
                    "Invalid waypoint spacing: {} NM (must be positive)",
                    spacing
                )
            }
        }
    }
}

impl std::error::Error for RouteError {}

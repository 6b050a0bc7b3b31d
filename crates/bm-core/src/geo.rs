//! Spherical geometry: great-circle distance and initial bearing.
//!
//! All functions take degrees and are total over valid coordinate ranges.
//! Latitude/longitude validation is the caller's job; use
//! [`GeoPoint::checked`] when the input is untrusted.
//!
//! Distances are in **miles** on a sphere of radius [`EARTH_RADIUS_MILES`].
//! Routing costs, heuristics, and route totals all use this one unit.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Fixed Earth radius used by every distance computation.
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Haversine great-circle distance in miles between `(lon1, lat1)` and
/// `(lon2, lat2)`.
///
/// Symmetric in its two points and exactly `0.0` for identical inputs.
pub fn distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi * 0.5).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda * 0.5).sin().powi(2);

    // Rounding can push `a` a hair above 1 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Initial bearing in degrees when travelling the great-circle arc from
/// `(lon1, lat1)` to `(lon2, lat2)`.
///
/// 0 is north, 90 east, -90 west; the result lies in (-180, 180].
pub fn bearing(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

    let deg = y.atan2(x).to_degrees();
    if deg <= -180.0 { deg + 360.0 } else { deg }
}

/// A WGS-84 coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Construct a point, rejecting non-finite or out-of-range degrees.
    pub fn checked(lat: f64, lon: f64) -> CoreResult<Self> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lon_ok = lon.is_finite() && (-180.0..=180.0).contains(&lon);
        if lat_ok && lon_ok {
            Ok(Self { lat, lon })
        } else {
            Err(CoreError::InvalidCoordinate { lat, lon })
        }
    }

    /// Great-circle distance to `other` in miles.
    #[inline]
    pub fn distance_miles(self, other: GeoPoint) -> f64 {
        distance(self.lon, self.lat, other.lon, other.lat)
    }

    /// Initial bearing towards `other` in degrees.
    #[inline]
    pub fn bearing_to(self, other: GeoPoint) -> f64 {
        bearing(self.lon, self.lat, other.lon, other.lat)
    }

    /// Position on the unit sphere as `[x, y, z]`.
    ///
    /// Straight-line (chord) distance between two unit vectors is a strictly
    /// increasing function of their great-circle distance, so a Euclidean
    /// nearest-neighbour search over these points ranks nodes exactly as
    /// [`distance`] would.
    pub fn unit_vector(self) -> [f64; 3] {
        let phi = self.lat.to_radians();
        let lambda = self.lon.to_radians();
        [phi.cos() * lambda.cos(), phi.cos() * lambda.sin(), phi.sin()]
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

//! Axis-aligned lat/lon bounding box.

use crate::GeoPoint;

/// A lat/lon rectangle described by its upper-left and lower-right corners,
/// the convention map tiles use (north-west → south-east).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub ul_lat: f64,
    pub ul_lon: f64,
    pub lr_lat: f64,
    pub lr_lon: f64,
}

impl BoundingBox {
    pub fn new(ul_lat: f64, ul_lon: f64, lr_lat: f64, lr_lon: f64) -> Self {
        Self { ul_lat, ul_lon, lr_lat, lr_lon }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = GeoPoint>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let init = Self::new(first.lat, first.lon, first.lat, first.lon);
        Some(iter.fold(init, |b, p| Self {
            ul_lat: b.ul_lat.max(p.lat),
            ul_lon: b.ul_lon.min(p.lon),
            lr_lat: b.lr_lat.min(p.lat),
            lr_lon: b.lr_lon.max(p.lon),
        }))
    }

    /// Longitudinal extent in degrees.
    #[inline]
    pub fn lon_span(&self) -> f64 {
        self.lr_lon - self.ul_lon
    }

    /// Latitudinal extent in degrees.
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.ul_lat - self.lr_lat
    }

    /// `true` if the corners are ordered north-west → south-east.
    pub fn is_well_formed(&self) -> bool {
        self.ul_lon <= self.lr_lon && self.ul_lat >= self.lr_lat
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.lr_lat..=self.ul_lat).contains(&p.lat) && (self.ul_lon..=self.lr_lon).contains(&p.lon)
    }

    /// `true` if the two boxes share any area or edge.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.ul_lon <= other.lr_lon
            && other.ul_lon <= self.lr_lon
            && self.lr_lat <= other.ul_lat
            && other.lr_lat <= self.ul_lat
    }
}

//! Tile pyramid configuration.

use bm_core::{BoundingBox, CoreError, CoreResult};

/// Deepest level whose tile count per side (`2^depth`) still fits in a `u32`.
pub const MAX_SUPPORTED_DEPTH: u8 = 30;

/// Geometry of a quadtree tile pyramid.
///
/// Level `d` splits `root` into `2^d × 2^d` equal tiles of `tile_size`
/// pixels square.  Level 0 is a single tile covering the whole root.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileConfig {
    pub root: BoundingBox,
    /// Edge length of one tile image in pixels.
    pub tile_size: u32,
    pub max_depth: u8,
}

impl Default for TileConfig {
    /// The Berkeley map: 256 px tiles, levels 0 through 7.
    fn default() -> Self {
        Self {
            root: BoundingBox::new(37.892195547244356, -122.2998046875, 37.82280243352756, -122.2119140625),
            tile_size: 256,
            max_depth: 7,
        }
    }
}

impl TileConfig {
    /// Default tile size and depth over `bounds`, e.g. a graph's extent.
    pub fn covering(bounds: BoundingBox) -> Self {
        Self { root: bounds, ..Self::default() }
    }

    /// Number of tiles along each side at `depth`.
    #[inline]
    pub fn tiles_across(&self, depth: u8) -> u32 {
        1u32 << depth
    }

    /// Longitude degrees per pixel of a tile at `depth`.
    pub fn lon_dpp(&self, depth: u8) -> f64 {
        self.root.lon_span() / (f64::from(self.tiles_across(depth)) * f64::from(self.tile_size))
    }

    /// # Errors
    ///
    /// [`CoreError::Config`] if the root box is not a positive-area
    /// north-west → south-east rectangle, the tile size is zero, or the
    /// depth exceeds [`MAX_SUPPORTED_DEPTH`].
    pub fn validate(&self) -> CoreResult<()> {
        let r = &self.root;
        let finite = [r.ul_lat, r.ul_lon, r.lr_lat, r.lr_lon].iter().all(|v| v.is_finite());
        if !finite || r.lon_span() <= 0.0 || r.lat_span() <= 0.0 {
            return Err(CoreError::Config(format!("tile root {r:?} must have positive extent")));
        }
        if self.tile_size == 0 {
            return Err(CoreError::Config("tile size must be at least one pixel".to_owned()));
        }
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(CoreError::Config(format!(
                "max depth {} exceeds {MAX_SUPPORTED_DEPTH}",
                self.max_depth
            )));
        }
        Ok(())
    }
}

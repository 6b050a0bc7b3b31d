//! Query box → grid of tile file names.

use tracing::debug;

use bm_core::{BoundingBox, CoreResult};

use crate::TileConfig;

/// A viewport: the lat/lon box being shown and its size in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterRequest {
    pub ul_lon: f64,
    pub ul_lat: f64,
    pub lr_lon: f64,
    pub lr_lat: f64,
    pub width: f64,
    pub height: f64,
}

impl RasterRequest {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.ul_lat, self.ul_lon, self.lr_lat, self.lr_lon)
    }

    /// Longitude degrees per pixel the viewport displays.
    pub fn lon_dpp(&self) -> f64 {
        (self.lr_lon - self.ul_lon) / self.width
    }
}

/// Tiles to draw, row-major from the top-left, and the box they cover.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterGrid {
    pub render_grid: Vec<Vec<String>>,
    pub raster_ul_lon: f64,
    pub raster_ul_lat: f64,
    pub raster_lr_lon: f64,
    pub raster_lr_lat: f64,
    pub depth: u8,
    /// `false` when the request could not be served; every other field is
    /// then empty or zero.
    pub query_success: bool,
}

impl RasterGrid {
    fn failed() -> Self {
        Self {
            render_grid: Vec::new(),
            raster_ul_lon: 0.0,
            raster_ul_lat: 0.0,
            raster_lr_lon: 0.0,
            raster_lr_lat: 0.0,
            depth: 0,
            query_success: false,
        }
    }

    pub fn rows(&self) -> usize {
        self.render_grid.len()
    }

    pub fn cols(&self) -> usize {
        self.render_grid.first().map_or(0, Vec::len)
    }
}

/// File name of tile `(x, y)` at `depth`.
pub fn tile_name(depth: u8, x: u32, y: u32) -> String {
    format!("d{depth}_x{x}_y{y}.png")
}

/// Selects the tiles that render a viewport.
#[derive(Clone, Debug, Default)]
pub struct Rasterer {
    config: TileConfig,
}

impl Rasterer {
    /// # Errors
    ///
    /// See [`TileConfig::validate`].
    pub fn new(config: TileConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TileConfig {
        &self.config
    }

    /// Shallowest level whose resolution is at least the viewport's, capped
    /// at `max_depth`.
    pub fn depth_for(&self, lon_dpp: f64) -> u8 {
        (0..self.config.max_depth)
            .find(|&d| self.config.lon_dpp(d) <= lon_dpp)
            .unwrap_or(self.config.max_depth)
    }

    /// Tile grid covering `req`.
    ///
    /// Parts of the box outside the root are clamped away.  An inverted box,
    /// a non-positive width, or a box entirely outside the root yields
    /// `query_success == false`.
    pub fn raster(&self, req: &RasterRequest) -> RasterGrid {
        let query = req.bounds();
        let root = &self.config.root;

        let usable = req.width.is_finite()
            && req.width > 0.0
            && query.ul_lon < query.lr_lon
            && query.ul_lat > query.lr_lat
            && query.intersects(root);
        if !usable {
            debug!(?req, "raster query rejected");
            return RasterGrid::failed();
        }

        let depth = self.depth_for(req.lon_dpp());
        let across = self.config.tiles_across(depth);
        let tile_lon = root.lon_span() / f64::from(across);
        let tile_lat = root.lat_span() / f64::from(across);

        // Longitude grows left to right, latitude shrinks top to bottom.
        let x0 = tile_index(query.ul_lon - root.ul_lon, tile_lon, across);
        let x1 = tile_index(query.lr_lon - root.ul_lon, tile_lon, across);
        let y0 = tile_index(root.ul_lat - query.ul_lat, tile_lat, across);
        let y1 = tile_index(root.ul_lat - query.lr_lat, tile_lat, across);

        let render_grid = (y0..=y1)
            .map(|y| (x0..=x1).map(|x| tile_name(depth, x, y)).collect())
            .collect();

        let grid = RasterGrid {
            render_grid,
            raster_ul_lon: root.ul_lon + f64::from(x0) * tile_lon,
            raster_ul_lat: root.ul_lat - f64::from(y0) * tile_lat,
            raster_lr_lon: root.ul_lon + f64::from(x1 + 1) * tile_lon,
            raster_lr_lat: root.ul_lat - f64::from(y1 + 1) * tile_lat,
            depth,
            query_success: true,
        };
        debug!(depth, rows = grid.rows(), cols = grid.cols(), "raster query served");
        grid
    }
}

/// Tile containing `offset` degrees from the root edge, clamped to the grid.
fn tile_index(offset: f64, tile_span: f64, across: u32) -> u32 {
    let t = (offset / tile_span).floor();
    if t <= 0.0 {
        0
    } else {
        (t as u32).min(across - 1)
    }
}

//! `bm-raster` — picks the map tiles that render a viewport.
//!
//! Tiles form a quadtree pyramid over a root box ([`TileConfig`]).  Given a
//! [`RasterRequest`], [`Rasterer::raster`] chooses the shallowest level whose
//! longitude-per-pixel is no coarser than the viewport's and returns the
//! intersecting tiles as a row-major grid of file names.
//!
//! ```
//! use bm_raster::{RasterRequest, Rasterer};
//!
//! let rasterer = Rasterer::default();
//! let root = rasterer.config().root;
//! let grid = rasterer.raster(&RasterRequest {
//!     ul_lon: root.ul_lon,
//!     ul_lat: root.ul_lat,
//!     lr_lon: root.lr_lon,
//!     lr_lat: root.lr_lat,
//!     width: 256.0,
//!     height: 256.0,
//! });
//! assert!(grid.query_success);
//! assert_eq!(grid.render_grid, vec![vec!["d0_x0_y0.png".to_string()]]);
//! ```

pub mod config;
pub mod raster;


pub use config::{TileConfig, MAX_SUPPORTED_DEPTH};
pub use raster::{tile_name, RasterGrid, RasterRequest, Rasterer};

//! Core error type.
//!
//! Graph and routing crates define their own error enums (`GraphError`,
//! `RouteError`); `bm-raster` reports tile configuration problems as
//! [`CoreError::Config`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinate (lat {lat}, lon {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

//! Graph-subsystem error type.

use thiserror::Error;

use bm_core::NodeId;

/// Errors produced by `bm-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} not found in graph")]
    MissingNode(NodeId),

    #[error("node {0} declared more than once")]
    DuplicateNode(NodeId),

    #[error("malformed ingestion event: {0}")]
    MalformedEvent(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(feature = "osm")]
impl From<osmpbf::Error> for GraphError {
    /// Reader I/O failures stay I/O errors; everything else is a decode error.
    fn from(err: osmpbf::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            osmpbf::ErrorKind::Io(io) => GraphError::Io(io),
            _ => GraphError::Osm(message),
        }
    }
}

//! `bm-graph` — road graph model, ingestion, and place-name lookup.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`graph`]  | `RoadGraphBuilder` (load phase), `RoadGraph` (CSR + R-tree)   |
//! | [`ingest`] | `IngestEvent`, `GraphBuilder`, `IngestReport`, `ingest`       |
//! | [`places`] | `PlaceIndex` (normalized name → coordinates, prefix trie)    |
//! | [`config`] | `GraphConfig`, `DuplicateNodePolicy`                          |
//! | [`osm`]    | `load_from_pbf` (feature = `"osm"` only)                      |
//! | [`error`]  | `GraphError`, `GraphResult<T>`                                |
//!
//! # Lifecycle
//!
//! A graph is populated once through [`RoadGraphBuilder`] (usually driven by
//! [`GraphBuilder`] from an event stream), then frozen by
//! [`RoadGraphBuilder::build`].  The frozen [`RoadGraph`] has no mutating
//! API; it is `Send + Sync` and may serve any number of concurrent read-only
//! queries.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `osm`   | Enables OSM PBF loading via the `osmpbf` crate.              |
//! | `serde` | Derives `Serialize`/`Deserialize` on config and value types. |

pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod places;

#[cfg(feature = "osm")]
pub mod osm;


pub use config::{DuplicateNodePolicy, GraphConfig};
pub use error::{GraphError, GraphResult};
pub use graph::{RoadGraph, RoadGraphBuilder};
pub use ingest::{ingest, is_routable_highway, GraphBuilder, IngestEvent, IngestReport};
pub use places::{normalize_name, PlaceIndex};

//! `bm-route` — shortest-path search over a frozen [`RoadGraph`](bm_graph::RoadGraph).
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`astar`]  | `Router` trait, `AStarRouter`                              |
//! | [`path`]   | `reconstruct` (parent pointers → node sequence)            |
//! | [`query`]  | `Route`, `RouteOutcome`, `shortest_path`, `route_many`     |
//! | [`limits`] | `SearchLimits` (expansion cap, deadline, cancel flag)      |
//! | [`error`]  | `RouteError`, `AbortReason`, `RouteResult<T>`              |
//!
//! # Quick start
//!
//! ```
//! use bm_core::NodeId;
//! use bm_graph::{GraphConfig, RoadGraphBuilder};
//! use bm_route::{shortest_path, AStarRouter, RouteOutcome, SearchLimits};
//!
//! let mut b = RoadGraphBuilder::new(GraphConfig::default());
//! b.add_node(NodeId(1), 0.0, 0.0).unwrap();
//! b.add_node(NodeId(2), 1.0, 0.0).unwrap();
//! b.add_edge(NodeId(1), NodeId(2)).unwrap();
//! let graph = b.build();
//!
//! let outcome = shortest_path(&graph, &AStarRouter, 0.0, 0.0, 0.0, 1.0, &SearchLimits::default()).unwrap();
//! match outcome {
//!     RouteOutcome::Found(route) => assert_eq!(route.nodes, vec![NodeId(1), NodeId(2)]),
//!     RouteOutcome::NoPath { .. } => unreachable!(),
//! }
//! ```
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | `route_many` runs queries on Rayon's thread pool.       |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `Route`.           |

pub mod astar;
pub mod error;
pub mod limits;
pub mod path;
pub mod query;

#[cfg(test)]
mod tests;

// ── Flat re-exports ───────────────────────────────────────────────────────────

pub use astar::{AStarRouter, Router};
pub use error::{AbortReason, RouteError, RouteResult};
pub use limits::SearchLimits;
pub use path::reconstruct;
pub use query::{path_miles, route_many, shortest_path, Route, RouteOutcome, RouteQuery};

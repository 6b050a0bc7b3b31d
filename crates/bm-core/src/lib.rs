//! `bm-core` — foundational types for the `bearmaps` routing workspace.
//!
//! This crate is a dependency of every other `bm-*` crate.  It intentionally
//! has no `bm-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `NodeId` (external OSM key), `NodeIdx` (dense arena slot) |
//! | [`geo`]     | `GeoPoint`, haversine `distance`, initial `bearing`       |
//! | [`bounds`]  | `BoundingBox`                                             |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod bounds;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use bounds::BoundingBox;
pub use error::{CoreError, CoreResult};
pub use geo::{bearing, distance, GeoPoint, EARTH_RADIUS_MILES};
pub use ids::{NodeId, NodeIdx};

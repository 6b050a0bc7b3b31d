//! Query glue: coordinates in, route out.

use tracing::debug;

use bm_core::NodeId;
use bm_graph::RoadGraph;

use crate::{RouteError, RouteResult, Router, SearchLimits};

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered list of nodes from origin to destination and its length.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Nodes to visit in order; first is the origin, last the destination.
    pub nodes: Vec<NodeId>,
    /// Sum of great-circle distances of consecutive legs, in miles.
    pub total_miles: f64,
}

impl Route {
    /// Number of legs (edges) on the route.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// `true` if origin and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn origin(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Initial bearing of each leg, in degrees.  One entry per hop.
    pub fn leg_bearings(&self, graph: &RoadGraph) -> RouteResult<Vec<f64>> {
        self.nodes
            .windows(2)
            .map(|leg| graph.bearing(leg[0], leg[1]).map_err(RouteError::from))
            .collect()
    }
}

/// Result of a search that ran to completion.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Found(Route),
    /// The endpoints lie in different components.
    NoPath { from: NodeId, to: NodeId },
}

impl RouteOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, RouteOutcome::Found(_))
    }

    pub fn route(&self) -> Option<&Route> {
        match self {
            RouteOutcome::Found(route) => Some(route),
            RouteOutcome::NoPath { .. } => None,
        }
    }

    pub fn into_route(self) -> Option<Route> {
        match self {
            RouteOutcome::Found(route) => Some(route),
            RouteOutcome::NoPath { .. } => None,
        }
    }
}

/// Total length of a node sequence in miles.
///
/// # Errors
///
/// [`RouteError::Graph`] if any node is not in `graph`.
pub fn path_miles(graph: &RoadGraph, nodes: &[NodeId]) -> RouteResult<f64> {
    nodes.windows(2).try_fold(0.0, |acc, leg| Ok(acc + graph.distance(leg[0], leg[1])?))
}

// ── Coordinate queries ────────────────────────────────────────────────────────

/// Route between the graph nodes nearest to two coordinates.
///
/// # Errors
///
/// [`RouteError::EmptyGraph`] if there is nothing to snap to, plus anything
/// `router` returns.
pub fn shortest_path<R: Router + ?Sized>(
    graph: &RoadGraph,
    router: &R,
    start_lon: f64,
    start_lat: f64,
    dest_lon: f64,
    dest_lat: f64,
    limits: &SearchLimits,
) -> RouteResult<RouteOutcome> {
    let from = graph.closest_node(start_lon, start_lat).ok_or(RouteError::EmptyGraph)?;
    let to = graph.closest_node(dest_lon, dest_lat).ok_or(RouteError::EmptyGraph)?;
    debug!(%from, %to, "snapped query endpoints");
    router.route(graph, from, to, limits)
}

/// One coordinate-pair query for [`route_many`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteQuery {
    pub start_lon: f64,
    pub start_lat: f64,
    pub dest_lon: f64,
    pub dest_lat: f64,
}

impl RouteQuery {
    pub fn new(start_lon: f64, start_lat: f64, dest_lon: f64, dest_lat: f64) -> Self {
        Self { start_lon, start_lat, dest_lon, dest_lat }
    }

    fn run<R: Router + ?Sized>(
        &self,
        graph: &RoadGraph,
        router: &R,
        limits: &SearchLimits,
    ) -> RouteResult<RouteOutcome> {
        shortest_path(graph, router, self.start_lon, self.start_lat, self.dest_lon, self.dest_lat, limits)
    }
}

/// Run independent queries against one graph.  Results are in query order.
///
/// With the `parallel` Cargo feature the queries run on Rayon's thread pool;
/// otherwise they run one after another.  `limits` applies to each query
/// separately, and a shared cancel flag stops all of them.
pub fn route_many<R: Router + ?Sized>(
    graph: &RoadGraph,
    router: &R,
    queries: &[RouteQuery],
    limits: &SearchLimits,
) -> Vec<RouteResult<RouteOutcome>> {
    #[cfg(not(feature = "parallel"))]
    {
        queries.iter().map(|q| q.run(graph, router, limits)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        queries.par_iter().map(|q| q.run(graph, router, limits)).collect()
    }
}

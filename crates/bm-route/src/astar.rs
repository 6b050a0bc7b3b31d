//! Routing trait and the default A* implementation.
//!
//! # Pluggability
//!
//! Query glue calls routing through the [`Router`] trait, so an application
//! can swap in another engine (contraction hierarchies, bidirectional
//! search) without touching the callers.  [`AStarRouter`] is the default.
//!
//! # Cost
//!
//! Edge cost is the great-circle distance between the endpoints in miles.
//! The heuristic is the great-circle distance to the goal, which never
//! overestimates, so the first time the goal is closed its cost is optimal.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use bm_core::{NodeId, NodeIdx};
use bm_graph::RoadGraph;

use crate::path::reconstruct;
use crate::query::{Route, RouteOutcome};
use crate::{RouteError, RouteResult, SearchLimits};

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can serve queries
/// from many threads against a shared [`RoadGraph`].
pub trait Router: Send + Sync {
    /// Shortest route from `from` to `to`.
    ///
    /// `Ok(RouteOutcome::NoPath { .. })` when the two nodes are not
    /// connected.  `from == to` yields a one-node route of zero length.
    fn route(
        &self,
        graph: &RoadGraph,
        from: NodeId,
        to: NodeId,
        limits: &SearchLimits,
    ) -> RouteResult<RouteOutcome>;
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// A* over the frozen graph with a closed set.
///
/// All search state is allocated per call and indexed by [`NodeIdx`].
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(
        &self,
        graph: &RoadGraph,
        from: NodeId,
        to: NodeId,
        limits: &SearchLimits,
    ) -> RouteResult<RouteOutcome> {
        let start = graph.idx_of(from).map_err(|_| RouteError::MissingNode(from))?;
        let goal = graph.idx_of(to).map_err(|_| RouteError::MissingNode(to))?;

        if start == goal {
            return Ok(RouteOutcome::Found(Route { nodes: vec![from], total_miles: 0.0 }));
        }

        let outcome = match astar(graph, start, goal, limits)? {
            Some((path, total_miles)) => {
                let nodes: Vec<NodeId> = path.into_iter().map(|idx| graph.id_of(idx)).collect();
                debug!(%from, %to, hops = nodes.len() - 1, total_miles, "route found");
                RouteOutcome::Found(Route { nodes, total_miles })
            }
            None => {
                debug!(%from, %to, "no path");
                RouteOutcome::NoPath { from, to }
            }
        };
        Ok(outcome)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

/// `f64` with a total order, for heap keys.
#[derive(Copy, Clone, Debug)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Frontier entry.  Ordered so `BinaryHeap` pops the smallest `f` first and,
/// on equal `f`, the smaller index (equivalently the smaller `NodeId`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Frontier {
    node: NodeIdx,
    f: FloatOrd,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f).then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Path and cost from `start` to `goal`, or `None` if unreachable.
fn astar(
    graph: &RoadGraph,
    start: NodeIdx,
    goal: NodeIdx,
    limits: &SearchLimits,
) -> RouteResult<Option<(Vec<NodeIdx>, f64)>> {
    let n = graph.node_count();
    // g[v] = best known distance from start; INFINITY for unreached nodes.
    let mut g = vec![f64::INFINITY; n];
    let mut parent = vec![NodeIdx::INVALID; n];
    let mut closed = vec![false; n];

    let mut heap = BinaryHeap::new();
    g[start.index()] = 0.0;
    heap.push(Frontier { node: start, f: FloatOrd(graph.distance_idx(start, goal)) });

    let mut expanded = 0usize;

    while let Some(Frontier { node: v, .. }) = heap.pop() {
        // Stale duplicate of an already closed node.
        if closed[v.index()] {
            continue;
        }
        limits.check(expanded).map_err(|reason| RouteError::Aborted { reason, expanded })?;

        closed[v.index()] = true;
        expanded += 1;

        if v == goal {
            debug!(expanded, "goal closed");
            // A broken parent chain surfaces as no path.
            return Ok(reconstruct(&parent, start, goal).map(|path| (path, g[goal.index()])));
        }

        let gv = g[v.index()];
        for &w in graph.neighbor_idx(v) {
            if closed[w.index()] {
                continue;
            }
            let cand = gv + graph.distance_idx(v, w);
            if cand < g[w.index()] {
                g[w.index()] = cand;
                parent[w.index()] = v;
                heap.push(Frontier { node: w, f: FloatOrd(cand + graph.distance_idx(w, goal)) });
            }
        }
    }

    debug!(expanded, "frontier exhausted");
    Ok(None)
}

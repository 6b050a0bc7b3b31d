//! Road graph representation and its load-phase builder.
//!
//! # Two stages
//!
//! [`RoadGraphBuilder`] is the mutable load-phase store: nodes keyed by their
//! external [`NodeId`], each with an ordered, undirected neighbour list.  It
//! mirrors the raw data closely, including its hazards (id reuse, duplicate
//! edges), and is where degree-0 pruning happens.
//!
//! [`RoadGraphBuilder::build`] freezes it into a [`RoadGraph`]:
//!
//! - Nodes are renumbered into dense [`NodeIdx`] slots in **ascending
//!   `NodeId` order**, so "smaller index" and "smaller id" agree everywhere.
//! - Adjacency is stored in **Compressed Sparse Row (CSR)** form.  The
//!   neighbours of slot `n` are
//!
//!   ```text
//!   adj_to[ adj_start[n] .. adj_start[n+1] ]
//!   ```
//!
//!   in the order the edges were added.
//! - An R-tree (via `rstar`) over unit-sphere positions answers
//!   nearest-node queries.
//!
//! Edges carry no weight; cost is always the great-circle distance between
//! the endpoints, computed on demand.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use bm_core::{BoundingBox, GeoPoint, NodeId, NodeIdx};

use crate::config::{DuplicateNodePolicy, GraphConfig};
use crate::places::PlaceIndex;
use crate::{GraphError, GraphResult};

/// Extra squared-chord slack admitted when collecting nearest-node
/// candidates.  Candidates are re-ranked on exact haversine distance, so this
/// only has to exceed floating-point noise in the chord computation.
const SNAP_TIE_SLACK: f64 = 1e-12;

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the spatial index: a node's position on the unit sphere.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 3],
    idx: NodeIdx,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared chord length.  Monotone in great-circle distance.
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        chord_2(&self.point, point)
    }
}

#[inline]
fn chord_2(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

struct PendingNode {
    pos: GeoPoint,
    neighbors: Vec<NodeId>,
}

/// Mutable, id-keyed road graph used during the bulk-load phase.
///
/// # Example
///
/// ```
/// use bm_graph::{GraphConfig, RoadGraphBuilder};
/// use bm_core::NodeId;
///
/// let mut b = RoadGraphBuilder::new(GraphConfig::default());
/// b.add_node(NodeId(1), 37.87, -122.26).unwrap();
/// b.add_node(NodeId(2), 37.88, -122.26).unwrap();
/// b.add_node(NodeId(3), 37.89, -122.26).unwrap(); // never connected
/// b.add_edge(NodeId(1), NodeId(2)).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2); // node 3 pruned
/// assert_eq!(graph.edge_count(), 2); // one undirected edge, two entries
/// ```
pub struct RoadGraphBuilder {
    config: GraphConfig,
    nodes:  FxHashMap<NodeId, PendingNode>,
    places: PlaceIndex,
}

impl RoadGraphBuilder {
    pub fn new(config: GraphConfig) -> Self {
        Self::with_capacity(config, 0)
    }

    /// Pre-allocate for the expected number of nodes to reduce rehashing
    /// when bulk-loading a large extract.
    pub fn with_capacity(config: GraphConfig, nodes: usize) -> Self {
        let mut map = FxHashMap::default();
        map.reserve(nodes);
        Self { config, nodes: map, places: PlaceIndex::new() }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Insert a node.
    ///
    /// Re-declaring an id follows [`GraphConfig::duplicate_nodes`]:
    /// `LastWriteWins` replaces the coordinate and removes every edge that
    /// touched the old declaration, from both endpoints; `Reject` leaves the
    /// graph untouched and returns [`GraphError::DuplicateNode`].
    pub fn add_node(&mut self, id: NodeId, lat: f64, lon: f64) -> GraphResult<()> {
        let pos = GeoPoint::new(lat, lon);
        let policy = self.config.duplicate_nodes;
        if let Some(existing) = self.nodes.get_mut(&id) {
            if policy == DuplicateNodePolicy::Reject {
                return Err(GraphError::DuplicateNode(id));
            }
            debug!(%id, old = %existing.pos, new = %pos, "node redeclared; overwriting");
            existing.pos = pos;
            let former = std::mem::take(&mut existing.neighbors);
            self.detach(id, &former);
            return Ok(());
        }
        self.nodes.insert(id, PendingNode { pos, neighbors: Vec::new() });
        Ok(())
    }

    /// Add an undirected edge: `v` is appended to `u`'s list and `u` to
    /// `v`'s.
    ///
    /// No deduplication: adding the same pair twice leaves two entries in
    /// each list.  Both endpoints must already be declared; otherwise
    /// nothing is mutated and [`GraphError::MissingNode`] names the first
    /// missing one.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> GraphResult<()> {
        for id in [u, v] {
            if !self.nodes.contains_key(&id) {
                return Err(GraphError::MissingNode(id));
            }
        }
        if let Some(node) = self.nodes.get_mut(&u) {
            node.neighbors.push(v);
        }
        if let Some(node) = self.nodes.get_mut(&v) {
            node.neighbors.push(u);
        }
        Ok(())
    }

    /// Remove `id` from the neighbour list of each node in `former`.
    fn detach(&mut self, id: NodeId, former: &[NodeId]) {
        let mut dropped = 0usize;
        for n in former {
            if let Some(node) = self.nodes.get_mut(n) {
                let len = node.neighbors.len();
                node.neighbors.retain(|&m| m != id);
                dropped += len - node.neighbors.len();
            }
        }
        if dropped > 0 {
            debug!(%id, dropped, "removed edges of redeclared node");
        }
    }

    /// Register a place name at a coordinate.  Returns `false` if the name
    /// has no searchable characters and was ignored.
    pub fn add_place(&mut self, name: &str, lat: f64, lon: f64) -> bool {
        self.places.add(name, GeoPoint::new(lat, lon))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Current neighbour list of `id`, in insertion order.
    pub fn neighbors(&self, id: NodeId) -> GraphResult<&[NodeId]> {
        self.nodes
            .get(&id)
            .map(|n| n.neighbors.as_slice())
            .ok_or(GraphError::MissingNode(id))
    }

    pub fn node_pos(&self, id: NodeId) -> GraphResult<GeoPoint> {
        self.nodes.get(&id).map(|n| n.pos).ok_or(GraphError::MissingNode(id))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total neighbour-list entries (each undirected edge counts twice).
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.neighbors.len()).sum()
    }

    pub fn places(&self) -> &PlaceIndex {
        &self.places
    }

    /// Remove every node whose neighbour list is empty and return how many
    /// were removed.
    ///
    /// List entries still pointing at a removed node are dropped as well,
    /// which can empty further lists; pruning repeats until none are left.
    /// Afterwards every referenced id exists and every node has at least one
    /// neighbour.
    pub fn prune(&mut self) -> usize {
        let before = self.nodes.len();
        let mut dangling = 0usize;

        loop {
            let len = self.nodes.len();
            self.nodes.retain(|_, n| !n.neighbors.is_empty());
            if self.nodes.len() == len {
                break;
            }
            dangling += self.drop_dangling();
        }

        let removed = before - self.nodes.len();
        if dangling > 0 {
            debug!(dangling, "dropped neighbour entries pointing at pruned nodes");
        }
        debug!(removed, remaining = self.nodes.len(), "pruned degree-0 nodes");
        removed
    }

    /// Strip neighbour entries whose target no longer exists.
    fn drop_dangling(&mut self) -> usize {
        let live: Vec<NodeId> = self.nodes.keys().copied().collect();
        let mut dropped = 0;
        for id in live {
            let Some(mut list) = self.nodes.get_mut(&id).map(|n| std::mem::take(&mut n.neighbors)) else {
                continue;
            };
            let len = list.len();
            list.retain(|n| self.nodes.contains_key(n));
            dropped += len - list.len();
            if let Some(node) = self.nodes.get_mut(&id) {
                node.neighbors = list;
            }
        }
        dropped
    }

    /// Prune, then freeze into an immutable [`RoadGraph`].
    ///
    /// Time complexity: O(N log N) for the id sort and the R-tree bulk load
    /// plus O(E) for the CSR arrays.
    pub fn build(self) -> RoadGraph {
        self.build_counted().0
    }

    /// [`build`](Self::build), also returning how many nodes pruning removed.
    pub fn build_counted(mut self) -> (RoadGraph, usize) {
        let pruned = self.prune();

        let mut nodes: Vec<(NodeId, PendingNode)> = self.nodes.into_iter().collect();
        nodes.sort_unstable_by_key(|(id, _)| *id);

        let mut index_of: FxHashMap<NodeId, NodeIdx> = FxHashMap::default();
        index_of.reserve(nodes.len());
        for (i, (id, _)) in nodes.iter().enumerate() {
            index_of.insert(*id, NodeIdx(i as u32));
        }

        let entry_count: usize = nodes.iter().map(|(_, n)| n.neighbors.len()).sum();
        let mut node_id   = Vec::with_capacity(nodes.len());
        let mut node_pos  = Vec::with_capacity(nodes.len());
        let mut adj_start = Vec::with_capacity(nodes.len() + 1);
        let mut adj_to    = Vec::with_capacity(entry_count);

        adj_start.push(0u32);
        for (id, node) in &nodes {
            node_id.push(*id);
            node_pos.push(node.pos);
            adj_to.extend(node.neighbors.iter().filter_map(|n| index_of.get(n).copied()));
            adj_start.push(adj_to.len() as u32);
        }
        debug_assert_eq!(adj_to.len(), entry_count);

        // Bulk-load for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = node_pos
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry { point: p.unit_vector(), idx: NodeIdx(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);
        let bounds = BoundingBox::from_points(node_pos.iter().copied());

        info!(
            nodes = node_id.len(),
            edges = adj_to.len() / 2,
            pruned,
            places = self.places.len(),
            "road graph frozen"
        );

        let graph = RoadGraph {
            node_id,
            node_pos,
            adj_start,
            adj_to,
            index_of,
            spatial_idx,
            places: self.places,
            bounds,
        };
        (graph, pruned)
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Frozen, undirected road graph: CSR adjacency over dense node slots plus a
/// spatial index and the place-name index.
///
/// Read-only by construction; share it behind `&` or `Arc` across threads.
/// Build one with [`RoadGraphBuilder`].
pub struct RoadGraph {
    /// External id of each slot, strictly ascending.
    node_id: Vec<NodeId>,
    /// Position of each slot.
    node_pos: Vec<GeoPoint>,
    /// CSR row pointer, length `node_count + 1`.
    adj_start: Vec<u32>,
    /// CSR neighbour slots.
    adj_to: Vec<NodeIdx>,
    index_of: FxHashMap<NodeId, NodeIdx>,
    spatial_idx: RTree<NodeEntry>,
    places: PlaceIndex,
    bounds: Option<BoundingBox>,
}

impl RoadGraph {
    /// A graph with no nodes.  Every coordinate query against it yields
    /// `None`.
    pub fn empty() -> Self {
        RoadGraphBuilder::default().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_id.len()
    }

    /// Number of adjacency entries.  Each undirected edge contributes two.
    pub fn edge_count(&self) -> usize {
        self.adj_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_id.is_empty()
    }

    /// Lat/lon box around every retained node; `None` when empty.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    pub fn places(&self) -> &PlaceIndex {
        &self.places
    }

    // ── Id-keyed access ───────────────────────────────────────────────────

    /// All node ids in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_id.iter().copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index_of.contains_key(&id)
    }

    /// Dense slot of `id`.
    pub fn idx_of(&self, id: NodeId) -> GraphResult<NodeIdx> {
        self.index_of.get(&id).copied().ok_or(GraphError::MissingNode(id))
    }

    /// Neighbour ids of `id`, in the order edges were added.  Duplicate
    /// edges appear as repeated entries.
    pub fn neighbors(&self, id: NodeId) -> GraphResult<impl Iterator<Item = NodeId> + '_> {
        let idx = self.idx_of(id)?;
        Ok(self.neighbor_idx(idx).iter().map(|&n| self.node_id[n.index()]))
    }

    pub fn degree(&self, id: NodeId) -> GraphResult<usize> {
        Ok(self.neighbor_idx(self.idx_of(id)?).len())
    }

    pub fn node(&self, id: NodeId) -> GraphResult<GeoPoint> {
        Ok(self.pos(self.idx_of(id)?))
    }

    pub fn lat(&self, id: NodeId) -> GraphResult<f64> {
        self.node(id).map(|p| p.lat)
    }

    pub fn lon(&self, id: NodeId) -> GraphResult<f64> {
        self.node(id).map(|p| p.lon)
    }

    /// Great-circle distance in miles between two nodes.
    pub fn distance(&self, v: NodeId, w: NodeId) -> GraphResult<f64> {
        Ok(self.node(v)?.distance_miles(self.node(w)?))
    }

    /// Initial bearing in degrees from node `v` towards node `w`.
    pub fn bearing(&self, v: NodeId, w: NodeId) -> GraphResult<f64> {
        Ok(self.node(v)?.bearing_to(self.node(w)?))
    }

    // ── Slot-keyed access (search hot path) ───────────────────────────────
    //
    // These index straight into the arrays and panic on a slot that did not
    // come from this graph.

    #[inline]
    pub fn id_of(&self, idx: NodeIdx) -> NodeId {
        self.node_id[idx.index()]
    }

    #[inline]
    pub fn pos(&self, idx: NodeIdx) -> GeoPoint {
        self.node_pos[idx.index()]
    }

    /// Neighbour slots of `idx`: a contiguous slice, no allocation.
    #[inline]
    pub fn neighbor_idx(&self, idx: NodeIdx) -> &[NodeIdx] {
        let start = self.adj_start[idx.index()] as usize;
        let end   = self.adj_start[idx.index() + 1] as usize;
        &self.adj_to[start..end]
    }

    #[inline]
    pub fn distance_idx(&self, a: NodeIdx, b: NodeIdx) -> f64 {
        self.pos(a).distance_miles(self.pos(b))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Slot of the node nearest to `(lon, lat)` by great-circle distance.
    ///
    /// Ties go to the smallest slot, which is also the smallest `NodeId`.
    /// Returns `None` only for an empty graph.
    pub fn closest_idx(&self, lon: f64, lat: f64) -> Option<NodeIdx> {
        let query = GeoPoint::new(lat, lon);
        let target = query.unit_vector();
        let mut candidates = self.spatial_idx.nearest_neighbor_iter(&target);

        let first = candidates.next()?;
        let window = chord_2(&first.point, &target) + SNAP_TIE_SLACK;
        let mut best = (query.distance_miles(self.pos(first.idx)), first.idx);

        for entry in candidates {
            if chord_2(&entry.point, &target) > window {
                break;
            }
            let d = query.distance_miles(self.pos(entry.idx));
            if d < best.0 || (d == best.0 && entry.idx < best.1) {
                best = (d, entry.idx);
            }
        }
        Some(best.1)
    }

    /// Id of the node nearest to `(lon, lat)`; see [`closest_idx`](Self::closest_idx).
    pub fn closest_node(&self, lon: f64, lat: f64) -> Option<NodeId> {
        self.closest_idx(lon, lat).map(|idx| self.id_of(idx))
    }
}

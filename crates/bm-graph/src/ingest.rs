//! Event-driven graph construction.
//!
//! Map data arrives as an ordered stream of [`IngestEvent`]s (node
//! declarations, way boundaries, way node references, tags).  A
//! [`GraphBuilder`] turns that stream into [`RoadGraphBuilder`] mutations:
//!
//! - every declared node becomes a graph node;
//! - a way contributes an edge for each consecutive pair of its node refs,
//!   but only if it carries a `highway` tag from [`is_routable_highway`];
//! - a `name` tag on a node registers a place at that node's position.
//!
//! Ingestion never aborts on bad input.  Malformed events and ways are
//! skipped, logged at `warn`, and counted in the [`IngestReport`].

use tracing::{debug, info, warn};

use bm_core::{GeoPoint, NodeId};

use crate::config::GraphConfig;
use crate::graph::{RoadGraph, RoadGraphBuilder};
use crate::{GraphError, GraphResult};

/// One element of the ingestion stream, in document order.
#[derive(Clone, Debug, PartialEq)]
pub enum IngestEvent {
    /// A node with its coordinate.  Subsequent `NodeTag`s attach to it.
    DeclareNode { id: NodeId, lat: f64, lon: f64 },
    /// Opens a way.
    BeginWay,
    /// Appends a node reference to the open way.
    WayNodeRef(NodeId),
    /// A tag on the open way.
    WayTag { key: String, value: String },
    /// Closes the open way.
    EndWay,
    /// A tag on the most recently declared node.
    NodeTag { key: String, value: String },
}

/// `true` for the road categories that make a way part of the graph.
///
/// Footpaths, service roads, and everything else are excluded.
pub fn is_routable_highway(value: &str) -> bool {
    matches!(
        value,
        "motorway"
            | "trunk"
            | "primary"
            | "secondary"
            | "tertiary"
            | "unclassified"
            | "residential"
            | "living_street"
            | "motorway_link"
            | "trunk_link"
            | "primary_link"
            | "secondary_link"
            | "tertiary_link"
    )
}

/// Counters describing what a load did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub nodes_declared: usize,
    /// Re-declared ids, whether overwritten or rejected.
    pub duplicate_nodes: usize,
    pub ways_seen: usize,
    pub ways_accepted: usize,
    /// Ways without a routable `highway` tag.
    pub ways_filtered: usize,
    /// Ways dropped for referencing undeclared nodes or never being closed.
    pub ways_malformed: usize,
    /// Undirected edges added.
    pub edges_added: usize,
    pub places_added: usize,
    /// Events that were skipped for any reason.
    pub events_skipped: usize,
    pub nodes_pruned: usize,
}

/// Node refs and eligibility of the way currently being read.
#[derive(Debug, Default)]
struct WayBuffer {
    refs: Vec<NodeId>,
    routable: bool,
}

/// What the last `DeclareNode` left behind for following node tags.
#[derive(Copy, Clone, Debug)]
enum NodeCursor {
    None,
    Accepted(GeoPoint),
    /// The declaration was rejected as a duplicate; its tags are ignored.
    Rejected,
}

/// Streaming consumer of [`IngestEvent`]s.
///
/// ```
/// use bm_core::NodeId;
/// use bm_graph::{GraphBuilder, GraphConfig, IngestEvent};
///
/// let mut b = GraphBuilder::new(GraphConfig::default());
/// b.handle(IngestEvent::DeclareNode { id: NodeId(1), lat: 0.0, lon: 0.0 });
/// b.handle(IngestEvent::DeclareNode { id: NodeId(2), lat: 1.0, lon: 0.0 });
/// b.handle(IngestEvent::BeginWay);
/// b.handle(IngestEvent::WayNodeRef(NodeId(1)));
/// b.handle(IngestEvent::WayNodeRef(NodeId(2)));
/// b.handle(IngestEvent::WayTag { key: "highway".into(), value: "residential".into() });
/// b.handle(IngestEvent::EndWay);
/// let (graph, report) = b.finish();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(report.edges_added, 1);
/// ```
pub struct GraphBuilder {
    graph:  RoadGraphBuilder,
    way:    Option<WayBuffer>,
    cursor: NodeCursor,
    report: IngestReport,
}

impl GraphBuilder {
    pub fn new(config: GraphConfig) -> Self {
        Self::from_builder(RoadGraphBuilder::new(config))
    }

    /// Feed events into an existing (possibly pre-sized) graph builder.
    pub fn from_builder(graph: RoadGraphBuilder) -> Self {
        Self { graph, way: None, cursor: NodeCursor::None, report: IngestReport::default() }
    }

    /// Counters so far.
    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    /// The graph under construction.
    pub fn graph(&self) -> &RoadGraphBuilder {
        &self.graph
    }

    /// Consume one event.  Bad input is logged and counted, never fatal.
    pub fn handle(&mut self, event: IngestEvent) {
        if let Err(err) = self.apply(event) {
            self.report.events_skipped += 1;
            warn!(error = %err, "skipping ingestion input");
        }
    }

    fn apply(&mut self, event: IngestEvent) -> GraphResult<()> {
        match event {
            IngestEvent::DeclareNode { id, lat, lon } => {
                self.report.nodes_declared += 1;
                if self.graph.contains(id) {
                    self.report.duplicate_nodes += 1;
                }
                match self.graph.add_node(id, lat, lon) {
                    Ok(()) => {
                        self.cursor = NodeCursor::Accepted(GeoPoint::new(lat, lon));
                        Ok(())
                    }
                    Err(err) => {
                        self.cursor = NodeCursor::Rejected;
                        Err(err)
                    }
                }
            }

            IngestEvent::BeginWay => {
                if let Some(stale) = self.way.replace(WayBuffer::default()) {
                    self.report.ways_seen += 1;
                    self.report.ways_malformed += 1;
                    return Err(GraphError::MalformedEvent(format!(
                        "way opened while another with {} refs was still open; discarded it",
                        stale.refs.len()
                    )));
                }
                Ok(())
            }

            IngestEvent::WayNodeRef(id) => {
                let way = self.open_way("node ref")?;
                way.refs.push(id);
                Ok(())
            }

            IngestEvent::WayTag { key, value } => {
                check_tag(&key, &value)?;
                let way = self.open_way("tag")?;
                if key == "highway" && is_routable_highway(&value) {
                    way.routable = true;
                }
                Ok(())
            }

            IngestEvent::EndWay => {
                let way = self.way.take().ok_or_else(|| {
                    GraphError::MalformedEvent("end of way with no open way".to_owned())
                })?;
                self.finish_way(way)
            }

            IngestEvent::NodeTag { key, value } => {
                check_tag(&key, &value)?;
                match self.cursor {
                    NodeCursor::Accepted(pos) => {
                        if key == "name" && self.graph.add_place(&value, pos.lat, pos.lon) {
                            self.report.places_added += 1;
                        }
                        Ok(())
                    }
                    NodeCursor::Rejected => Ok(()),
                    NodeCursor::None => Err(GraphError::MalformedEvent(format!(
                        "node tag {key}={value} before any node"
                    ))),
                }
            }
        }
    }

    fn open_way(&mut self, what: &str) -> GraphResult<&mut WayBuffer> {
        self.way
            .as_mut()
            .ok_or_else(|| GraphError::MalformedEvent(format!("way {what} outside of a way")))
    }

    fn finish_way(&mut self, way: WayBuffer) -> GraphResult<()> {
        self.report.ways_seen += 1;

        if !way.routable {
            self.report.ways_filtered += 1;
            return Ok(());
        }

        // Validate every ref up front so a bad way adds no edges at all.
        if let Some(&missing) = way.refs.iter().find(|&&id| !self.graph.contains(id)) {
            self.report.ways_malformed += 1;
            return Err(GraphError::MissingNode(missing));
        }

        for pair in way.refs.windows(2) {
            self.graph.add_edge(pair[0], pair[1])?;
            self.report.edges_added += 1;
        }
        self.report.ways_accepted += 1;
        debug!(refs = way.refs.len(), "accepted way");
        Ok(())
    }

    /// Close the stream: discard any unterminated way, prune, and freeze.
    pub fn finish(mut self) -> (RoadGraph, IngestReport) {
        if let Some(way) = self.way.take() {
            self.report.ways_seen += 1;
            self.report.ways_malformed += 1;
            self.report.events_skipped += 1;
            warn!(refs = way.refs.len(), "stream ended inside a way; discarded it");
        }

        let (graph, pruned) = self.graph.build_counted();
        self.report.nodes_pruned = pruned;

        let r = &self.report;
        info!(
            nodes_declared = r.nodes_declared,
            ways_accepted = r.ways_accepted,
            ways_filtered = r.ways_filtered,
            ways_malformed = r.ways_malformed,
            edges = r.edges_added,
            places = r.places_added,
            skipped = r.events_skipped,
            pruned = r.nodes_pruned,
            "ingestion complete"
        );
        (graph, self.report)
    }
}

fn check_tag(key: &str, value: &str) -> GraphResult<()> {
    if key.is_empty() || value.is_empty() {
        return Err(GraphError::MalformedEvent(format!("tag with empty key or value ({key:?}={value:?})")));
    }
    Ok(())
}

/// Build a graph from a complete event sequence.
pub fn ingest<I>(events: I, config: GraphConfig) -> (RoadGraph, IngestReport)
where
    I: IntoIterator<Item = IngestEvent>,
{
    let mut builder = GraphBuilder::new(config);
    for event in events {
        builder.handle(event);
    }
    builder.finish()
}

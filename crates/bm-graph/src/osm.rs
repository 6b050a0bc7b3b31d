//! OSM PBF loader — enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use bm_graph::{osm::load_from_pbf, GraphConfig};
//!
//! let (graph, report) = load_from_pbf(Path::new("berkeley.osm.pbf"), GraphConfig::default())?;
//! ```
//!
//! # What is loaded
//!
//! The file is read in one sequential pass and every element is replayed
//! as [`IngestEvent`]s through a [`GraphBuilder`], so PBF input goes through
//! exactly the same highway filter, malformed-way handling, and pruning as
//! any other event source.  Relations are ignored.
//!
//! PBF files store nodes before ways, which is the ordering the builder
//! relies on.

use std::path::Path;

use osmpbf::{Element, ElementReader};
use tracing::info;

use bm_core::NodeId;

use crate::config::GraphConfig;
use crate::graph::RoadGraph;
use crate::ingest::{GraphBuilder, IngestEvent, IngestReport};
use crate::GraphError;

/// Load a road graph from an OSM PBF file.
///
/// # Errors
///
/// Returns [`GraphError::Io`] if the file cannot be read and
/// [`GraphError::Osm`] on decode errors.  Bad elements inside a readable
/// file are skipped, not reported as errors; see the returned
/// [`IngestReport`].
pub fn load_from_pbf(path: &Path, config: GraphConfig) -> Result<(RoadGraph, IngestReport), GraphError> {
    let reader = ElementReader::from_path(path)?;
    info!(path = %path.display(), "reading OSM PBF");

    let mut builder = GraphBuilder::new(config);

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                declare(&mut builder, n.id(), n.lat(), n.lon(), n.tags());
            }
            Element::DenseNode(n) => {
                declare(&mut builder, n.id(), n.lat(), n.lon(), n.tags());
            }
            Element::Way(w) => {
                builder.handle(IngestEvent::BeginWay);
                for r in w.refs() {
                    builder.handle(IngestEvent::WayNodeRef(NodeId(r)));
                }
                for (k, v) in w.tags() {
                    builder.handle(IngestEvent::WayTag { key: k.to_owned(), value: v.to_owned() });
                }
                builder.handle(IngestEvent::EndWay);
            }
            Element::Relation(_) => {}
        })?;

    Ok(builder.finish())
}

fn declare<'a>(
    builder: &mut GraphBuilder,
    id: i64,
    lat: f64,
    lon: f64,
    tags: impl Iterator<Item = (&'a str, &'a str)>,
) {
    builder.handle(IngestEvent::DeclareNode { id: NodeId(id), lat, lon });
    // Only names matter for nodes; skip building owned strings for the rest.
    for (k, v) in tags.filter(|(k, _)| *k == "name") {
        builder.handle(IngestEvent::NodeTag { key: k.to_owned(), value: v.to_owned() });
    }
}

//! Built-in street sample around downtown Berkeley.
//!
//! A 4 × 4 grid of intersections expressed as ingestion events, so the demo
//! exercises the same path as a real map load: node declarations with name
//! tags, routable ways, and a footpath the highway filter drops.

use bm_core::NodeId;
use bm_graph::IngestEvent;

const LATS: [f64; 4] = [37.8745, 37.8715, 37.8685, 37.8655];
const LONS: [f64; 4] = [-122.2700, -122.2660, -122.2620, -122.2580];

/// `(name, row, col)` of named intersections.
const PLACES: [(&str, usize, usize); 4] = [
    ("Downtown Berkeley BART", 1, 0),
    ("Berkeley High School", 3, 0),
    ("Bancroft Library", 0, 3),
    ("Sather Gate", 2, 3),
];

/// Id of the intersection at `(row, col)`.
pub fn corner(row: usize, col: usize) -> NodeId {
    NodeId(100 + (row * LONS.len() + col) as i64)
}

fn tag(key: &str, value: &str) -> IngestEvent {
    IngestEvent::WayTag { key: key.to_owned(), value: value.to_owned() }
}

fn way(refs: impl IntoIterator<Item = NodeId>, tags: &[(&str, &str)]) -> Vec<IngestEvent> {
    let mut events = vec![IngestEvent::BeginWay];
    events.extend(refs.into_iter().map(IngestEvent::WayNodeRef));
    events.extend(tags.iter().map(|(k, v)| tag(k, v)));
    events.push(IngestEvent::EndWay);
    events
}

/// Event stream for the sample: nodes first, then ways.
pub fn events() -> Vec<IngestEvent> {
    let mut events = Vec::new();

    for (row, &lat) in LATS.iter().enumerate() {
        for (col, &lon) in LONS.iter().enumerate() {
            events.push(IngestEvent::DeclareNode { id: corner(row, col), lat, lon });
            if let Some((name, ..)) = PLACES.iter().find(|(_, r, c)| *r == row && *c == col) {
                events.push(IngestEvent::NodeTag { key: "name".to_owned(), value: (*name).to_owned() });
            }
        }
    }

    // East-west streets.
    let streets = [("University Avenue", "secondary"), ("Center Street", "residential"),
                   ("Durant Avenue", "residential"), ("Dwight Way", "tertiary")];
    for (row, (name, class)) in streets.iter().enumerate() {
        events.extend(way((0..LONS.len()).map(|c| corner(row, c)), &[("highway", class), ("name", name)]));
    }

    // North-south streets; the campus edge is a footpath and is filtered out.
    let avenues = [("Shattuck Avenue", "primary"), ("Fulton Street", "residential"),
                   ("Telegraph Avenue", "secondary"), ("Campus Path", "footway")];
    for (col, (name, class)) in avenues.iter().enumerate() {
        events.extend(way((0..LATS.len()).map(|r| corner(r, col)), &[("highway", class), ("name", name)]));
    }

    events
}

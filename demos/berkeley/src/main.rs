//! berkeley — end-to-end bearmaps demo.
//!
//! Builds a road graph (the built-in street sample, or an OSM PBF file given
//! as the first argument when built with `--features osm`), then runs
//! coordinate routing, a batch of queries, a tile raster for the route's
//! viewport, and a place-name lookup.
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod network;

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bm_core::BoundingBox;
use bm_graph::{GraphConfig, IngestReport, RoadGraph};
use bm_raster::{RasterRequest, Rasterer};
use bm_route::{route_many, shortest_path, AStarRouter, RouteOutcome, RouteQuery, SearchLimits};

// ── Constants ─────────────────────────────────────────────────────────────────

const VIEWPORT_WIDTH:  f64 = 800.0;
const VIEWPORT_HEIGHT: f64 = 600.0;
const QUERY_TIMEOUT:   Duration = Duration::from_secs(2);

/// Downtown BART to Sather Gate as (lon, lat), slightly off the grid.
const FROM: (f64, f64) = (-122.2699, 37.8713);
const TO:   (f64, f64) = (-122.2583, 37.8687);

// ── Graph loading ─────────────────────────────────────────────────────────────

#[cfg(feature = "osm")]
fn load_graph() -> Result<(RoadGraph, IngestReport)> {
    match std::env::args().nth(1) {
        Some(path) => Ok(bm_graph::osm::load_from_pbf(std::path::Path::new(&path), GraphConfig::default())?),
        None => Ok(bm_graph::ingest(network::events(), GraphConfig::default())),
    }
}

#[cfg(not(feature = "osm"))]
fn load_graph() -> Result<(RoadGraph, IngestReport)> {
    Ok(bm_graph::ingest(network::events(), GraphConfig::default()))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== berkeley — bearmaps road routing ===");
    println!();

    // 1. Build the graph.
    let t0 = Instant::now();
    let (graph, report) = load_graph()?;
    println!(
        "Road graph: {} nodes, {} adjacency entries ({:.3} s)",
        graph.node_count(),
        graph.edge_count(),
        t0.elapsed().as_secs_f64()
    );
    println!(
        "  ways: {} accepted, {} filtered, {} malformed; {} places; {} nodes pruned",
        report.ways_accepted, report.ways_filtered, report.ways_malformed, report.places_added, report.nodes_pruned
    );
    println!();

    // 2. One coordinate query.
    let limits = SearchLimits::default().with_timeout(QUERY_TIMEOUT);
    let outcome = shortest_path(&graph, &AStarRouter, FROM.0, FROM.1, TO.0, TO.1, &limits)?;
    let route = match outcome {
        RouteOutcome::Found(route) => route,
        RouteOutcome::NoPath { from, to } => {
            println!("No path from {from} to {to}");
            return Ok(());
        }
    };
    println!("Route: {} hops, {:.3} miles", route.hop_count(), route.total_miles);
    for (leg, bearing) in route.nodes.windows(2).zip(route.leg_bearings(&graph)?) {
        println!("  {} -> {}  bearing {:>7.1}°", leg[0].0, leg[1].0, bearing);
    }
    println!();

    // 3. A batch of queries over the same graph.
    let queries = [
        RouteQuery::new(FROM.0, FROM.1, TO.0, TO.1),
        RouteQuery::new(TO.0, TO.1, FROM.0, FROM.1),
        RouteQuery::new(-122.2700, 37.8745, -122.2580, 37.8655),
        RouteQuery::new(-122.2580, 37.8745, -122.2580, 37.8655),
    ];
    println!("{:<6} {:<8} {:<10}", "Query", "Hops", "Miles");
    println!("{}", "-".repeat(26));
    for (i, result) in route_many(&graph, &AStarRouter, &queries, &limits).into_iter().enumerate() {
        match result? {
            RouteOutcome::Found(r) => println!("{:<6} {:<8} {:<10.3}", i, r.hop_count(), r.total_miles),
            RouteOutcome::NoPath { .. } => println!("{:<6} {:<8} {:<10}", i, "-", "no path"),
        }
    }
    println!();

    // 4. Tiles for a viewport around the route.
    let positions = route.nodes.iter().map(|&id| graph.node(id)).collect::<Result<Vec<_>, _>>()?;
    if let Some(b) = BoundingBox::from_points(positions) {
        let rasterer = Rasterer::default();
        let grid = rasterer.raster(&RasterRequest {
            ul_lon: b.ul_lon,
            ul_lat: b.ul_lat,
            lr_lon: b.lr_lon,
            lr_lat: b.lr_lat,
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        });
        if grid.query_success {
            println!("Raster: depth {}, {} × {} tiles", grid.depth, grid.rows(), grid.cols());
            for row in &grid.render_grid {
                println!("  {}", row.join(" "));
            }
        } else {
            println!("Raster: route lies outside the tile set");
        }
        println!();
    }

    // 5. Place names.
    let places = graph.places();
    for prefix in ["b", "sa", "zz"] {
        let names = places.names_with_prefix(prefix);
        println!("Places starting with {prefix:?}: {names:?}");
        for name in names {
            info!(place = name, locations = places.locations(name).len(), "place");
        }
    }

    Ok(())
}

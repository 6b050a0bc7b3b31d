//! Unit tests for bm-route.

#[cfg(test)]
mod helpers {
    use bm_core::NodeId;
    use bm_graph::{GraphConfig, RoadGraph, RoadGraphBuilder};

    /// Build a graph from `(id, lat, lon)` nodes and undirected `(u, v)` edges.
    pub fn graph(nodes: &[(i64, f64, f64)], edges: &[(i64, i64)]) -> RoadGraph {
        let mut b = RoadGraphBuilder::new(GraphConfig::default());
        for &(id, lat, lon) in nodes {
            b.add_node(NodeId(id), lat, lon).unwrap();
        }
        for &(u, v) in edges {
            b.add_edge(NodeId(u), NodeId(v)).unwrap();
        }
        b.build()
    }

    /// A(0,0) B(1,0) C(2,0) D(3,0) as (lat, lon), ids 1..=4, joined in a line.
    pub fn line() -> RoadGraph {
        graph(
            &[(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 2.0, 0.0), (4, 3.0, 0.0)],
            &[(1, 2), (2, 3), (3, 4)],
        )
    }

    pub fn ids(raw: &[i64]) -> Vec<NodeId> {
        raw.iter().map(|&r| NodeId(r)).collect()
    }
}

// ── A* ────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod astar {
    use bm_core::{distance, NodeId};

    use super::helpers::{graph, ids, line};
    use crate::{AStarRouter, RouteError, RouteOutcome, Router, SearchLimits};

    fn route(g: &bm_graph::RoadGraph, from: i64, to: i64) -> RouteOutcome {
        AStarRouter.route(g, NodeId(from), NodeId(to), &SearchLimits::default()).unwrap()
    }

    #[test]
    fn line_end_to_end() {
        let g = line();
        let r = route(&g, 1, 4).into_route().unwrap();
        assert_eq!(r.nodes, ids(&[1, 2, 3, 4]));
        assert_eq!(r.hop_count(), 3);
        assert!(!r.is_trivial());
        let expected = distance(0.0, 0.0, 0.0, 1.0) + distance(0.0, 1.0, 0.0, 2.0) + distance(0.0, 2.0, 0.0, 3.0);
        assert!((r.total_miles - expected).abs() < 1e-9);
    }

    #[test]
    fn reverse_direction() {
        let g = line();
        let r = route(&g, 4, 1).into_route().unwrap();
        assert_eq!(r.nodes, ids(&[4, 3, 2, 1]));
    }

    #[test]
    fn start_equals_goal() {
        let g = line();
        let r = route(&g, 3, 3).into_route().unwrap();
        assert_eq!(r.nodes, ids(&[3]));
        assert_eq!(r.total_miles, 0.0);
        assert!(r.is_trivial());
        assert_eq!(r.hop_count(), 0);
    }

    #[test]
    fn disjoint_components_have_no_path() {
        let g = graph(
            &[(1, 0.0, 0.0), (2, 0.0, 1.0), (3, 5.0, 5.0), (4, 5.0, 6.0)],
            &[(1, 2), (3, 4)],
        );
        assert_eq!(route(&g, 1, 4), RouteOutcome::NoPath { from: NodeId(1), to: NodeId(4) });
        assert!(!route(&g, 2, 3).is_found());
    }

    #[test]
    fn unknown_endpoint_is_an_error() {
        let g = line();
        let err = AStarRouter.route(&g, NodeId(1), NodeId(99), &SearchLimits::default()).unwrap_err();
        assert!(matches!(err, RouteError::MissingNode(NodeId(99))));
        let err = AStarRouter.route(&g, NodeId(-5), NodeId(1), &SearchLimits::default()).unwrap_err();
        assert!(matches!(err, RouteError::MissingNode(NodeId(-5))));
    }

    #[test]
    fn prefers_shorter_detour() {
        // 1 ─ 2 ─ 4 is direct; 1 ─ 3 ─ 4 bows far east.
        let g = graph(
            &[(1, 0.0, 0.0), (2, 0.5, 0.0), (3, 0.5, 2.0), (4, 1.0, 0.0)],
            &[(1, 3), (3, 4), (1, 2), (2, 4)],
        );
        assert_eq!(route(&g, 1, 4).into_route().unwrap().nodes, ids(&[1, 2, 4]));
    }

    #[test]
    fn duplicate_edges_do_not_change_the_answer() {
        let g = graph(
            &[(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 2.0, 0.0)],
            &[(1, 2), (1, 2), (2, 1), (2, 3)],
        );
        let r = route(&g, 1, 3).into_route().unwrap();
        assert_eq!(r.nodes, ids(&[1, 2, 3]));
        let expected = distance(0.0, 0.0, 0.0, 1.0) + distance(0.0, 1.0, 0.0, 2.0);
        assert!((r.total_miles - expected).abs() < 1e-9);
    }

    #[test]
    fn equal_cost_ties_go_through_the_smaller_id() {
        // Two mirror-image detours of identical length; the middle node
        // with id 2 sits west in the first graph and east in the second.
        for (west, east) in [(2, 3), (3, 2)] {
            let g = graph(
                &[(1, 0.0, 0.0), (west, 1.0, -1.0), (east, 1.0, 1.0), (4, 2.0, 0.0)],
                &[(1, west), (1, east), (west, 4), (east, 4)],
            );
            for _ in 0..3 {
                assert_eq!(route(&g, 1, 4).into_route().unwrap().nodes, ids(&[1, 2, 4]));
            }
        }
    }

    #[test]
    fn redeclared_node_routes_the_same_both_ways() {
        use bm_graph::{GraphConfig, RoadGraphBuilder};

        let mut b = RoadGraphBuilder::new(GraphConfig::default());
        b.add_node(NodeId(1), 0.0, 0.0).unwrap();
        b.add_node(NodeId(2), 1.0, 0.0).unwrap();
        b.add_node(NodeId(3), 2.0, 0.0).unwrap();
        b.add_node(NodeId(4), 0.0, 1.0).unwrap();
        b.add_edge(NodeId(1), NodeId(2)).unwrap();
        b.add_edge(NodeId(1), NodeId(4)).unwrap();
        // The old edge 1-2 goes with the old declaration.
        b.add_node(NodeId(2), 1.0, 0.5).unwrap();
        b.add_edge(NodeId(2), NodeId(3)).unwrap();
        let g = b.build();

        for (from, to) in [(1, 3), (3, 1), (4, 2), (2, 4)] {
            assert!(!route(&g, from, to).is_found(), "{from} -> {to}");
        }
        assert_eq!(route(&g, 1, 4).into_route().unwrap().nodes, ids(&[1, 4]));
        assert_eq!(route(&g, 4, 1).into_route().unwrap().nodes, ids(&[4, 1]));
        assert_eq!(route(&g, 3, 2).into_route().unwrap().nodes, ids(&[3, 2]));
        assert_eq!(route(&g, 2, 3).into_route().unwrap().nodes, ids(&[2, 3]));
    }

    #[test]
    fn router_is_usable_as_trait_object() {
        let g = line();
        let router: Box<dyn Router> = Box::new(AStarRouter);
        assert!(router.route(&g, NodeId(1), NodeId(2), &SearchLimits::default()).unwrap().is_found());
    }
}

// ── Optimality versus exhaustive search ───────────────────────────────────────

#[cfg(test)]
mod optimality {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use bm_core::NodeId;
    use bm_graph::RoadGraph;

    use super::helpers::graph;
    use crate::{path_miles, AStarRouter, RouteOutcome, Router, SearchLimits};

    /// Cheapest simple path by enumerating all of them.
    fn brute_force(g: &RoadGraph, from: NodeId, to: NodeId) -> Option<f64> {
        fn dfs(g: &RoadGraph, cur: NodeId, to: NodeId, visited: &mut Vec<NodeId>, cost: f64, best: &mut Option<f64>) {
            if cur == to {
                *best = Some(best.map_or(cost, |b| b.min(cost)));
                return;
            }
            let next: Vec<NodeId> = g.neighbors(cur).unwrap().collect();
            for w in next {
                if visited.contains(&w) {
                    continue;
                }
                visited.push(w);
                dfs(g, w, to, visited, cost + g.distance(cur, w).unwrap(), best);
                visited.pop();
            }
        }
        let mut best = None;
        dfs(g, from, to, &mut vec![from], 0.0, &mut best);
        best
    }

    fn random_graph(rng: &mut SmallRng) -> RoadGraph {
        let n = rng.gen_range(2..=8);
        let nodes: Vec<(i64, f64, f64)> = (0..n)
            .map(|i| (i as i64 * 10 + 1, rng.gen_range(37.80..37.90), rng.gen_range(-122.30..-122.20)))
            .collect();
        let mut edges = Vec::new();
        for a in 0..n {
            for b in (a + 1)..n {
                if rng.gen_bool(0.35) {
                    edges.push((nodes[a].0, nodes[b].0));
                }
            }
        }
        graph(&nodes, &edges)
    }

    #[test]
    fn matches_exhaustive_search() {
        let mut rng = SmallRng::seed_from_u64(0xB0A7);
        for _ in 0..40 {
            let g = random_graph(&mut rng);
            let verts: Vec<NodeId> = g.vertices().collect();
            for &from in &verts {
                for &to in &verts {
                    let outcome = AStarRouter.route(&g, from, to, &SearchLimits::default()).unwrap();
                    match (outcome, brute_force(&g, from, to)) {
                        (RouteOutcome::Found(r), Some(best)) => {
                            assert!((r.total_miles - best).abs() < 1e-9, "{from}->{to}: {} vs {best}", r.total_miles);
                            assert_eq!(r.origin(), Some(from));
                            assert_eq!(r.destination(), Some(to));
                            let walked = path_miles(&g, &r.nodes).unwrap();
                            assert!((walked - r.total_miles).abs() < 1e-9);
                            for leg in r.nodes.windows(2) {
                                assert!(g.neighbors(leg[0]).unwrap().any(|w| w == leg[1]));
                            }
                        }
                        (RouteOutcome::NoPath { .. }, None) => {}
                        (outcome, best) => panic!("{from}->{to}: router {outcome:?}, exhaustive {best:?}"),
                    }
                }
            }
        }
    }
}

// ── Search limits ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod limits {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use bm_core::NodeId;

    use super::helpers::line;
    use crate::{AbortReason, AStarRouter, RouteError, Router, SearchLimits};

    #[test]
    fn expansion_cap() {
        let g = line();
        let limits = SearchLimits::default().with_max_expansions(1);
        let err = AStarRouter.route(&g, NodeId(1), NodeId(4), &limits).unwrap_err();
        assert!(matches!(err, RouteError::Aborted { reason: AbortReason::ExpansionLimit, expanded: 1 }));
    }

    #[test]
    fn cap_large_enough_succeeds() {
        let g = line();
        let limits = SearchLimits::default().with_max_expansions(4);
        assert!(AStarRouter.route(&g, NodeId(1), NodeId(4), &limits).unwrap().is_found());
    }

    #[test]
    fn cancelled_before_start() {
        let g = line();
        let limits = SearchLimits::default().with_cancel(Arc::new(AtomicBool::new(true)));
        let err = AStarRouter.route(&g, NodeId(1), NodeId(4), &limits).unwrap_err();
        assert!(matches!(err, RouteError::Aborted { reason: AbortReason::Cancelled, expanded: 0 }));
    }

    #[test]
    fn deadline_in_the_past() {
        let g = line();
        let limits = SearchLimits::default().with_deadline(Instant::now());
        let err = AStarRouter.route(&g, NodeId(1), NodeId(4), &limits).unwrap_err();
        assert!(matches!(err, RouteError::Aborted { reason: AbortReason::DeadlineExceeded, expanded: 0 }));
    }

    #[test]
    fn generous_timeout_succeeds() {
        let g = line();
        let limits = SearchLimits::unlimited().with_timeout(Duration::from_secs(60));
        assert!(AStarRouter.route(&g, NodeId(1), NodeId(4), &limits).unwrap().is_found());
    }

    #[test]
    fn trivial_route_ignores_limits() {
        let g = line();
        let limits = SearchLimits::default().with_max_expansions(0);
        assert!(AStarRouter.route(&g, NodeId(2), NodeId(2), &limits).unwrap().is_found());
    }
}

// ── Path reconstruction ───────────────────────────────────────────────────────

#[cfg(test)]
mod path {
    use bm_core::NodeIdx;

    use crate::reconstruct;

    const X: NodeIdx = NodeIdx::INVALID;

    #[test]
    fn follows_parents() {
        let parent = [X, NodeIdx(0), NodeIdx(1)];
        assert_eq!(reconstruct(&parent, NodeIdx(0), NodeIdx(2)), Some(vec![NodeIdx(0), NodeIdx(1), NodeIdx(2)]));
    }

    #[test]
    fn start_is_goal() {
        assert_eq!(reconstruct(&[X], NodeIdx(0), NodeIdx(0)), Some(vec![NodeIdx(0)]));
    }

    #[test]
    fn missing_parent() {
        let parent = [X, X, NodeIdx(1)];
        assert_eq!(reconstruct(&parent, NodeIdx(0), NodeIdx(2)), None);
    }

    #[test]
    fn cycle() {
        let parent = [NodeIdx(1), NodeIdx(0), X];
        assert_eq!(reconstruct(&parent, NodeIdx(2), NodeIdx(0)), None);
    }

    #[test]
    fn out_of_range_parent() {
        let parent = [X, NodeIdx(7)];
        assert_eq!(reconstruct(&parent, NodeIdx(0), NodeIdx(1)), None);
    }
}

// ── Coordinate queries ────────────────────────────────────────────────────────

#[cfg(test)]
mod query {
    use bm_core::NodeId;
    use bm_graph::RoadGraphBuilder;

    use super::helpers::{graph, ids, line};
    use crate::{route_many, shortest_path, AStarRouter, RouteError, RouteOutcome, RouteQuery, SearchLimits};

    #[test]
    fn snaps_both_endpoints() {
        let g = line();
        let outcome = shortest_path(&g, &AStarRouter, 0.01, 0.1, -0.01, 2.9, &SearchLimits::default()).unwrap();
        assert_eq!(outcome.route().unwrap().nodes, ids(&[1, 2, 3, 4]));
    }

    #[test]
    fn same_snapped_node_is_trivial() {
        let g = line();
        let outcome = shortest_path(&g, &AStarRouter, 0.0, 1.05, 0.0, 0.95, &SearchLimits::default()).unwrap();
        let r = outcome.into_route().unwrap();
        assert_eq!(r.nodes, ids(&[2]));
        assert!(r.is_trivial());
    }

    #[test]
    fn empty_graph() {
        let g = RoadGraphBuilder::default().build();
        let err = shortest_path(&g, &AStarRouter, 0.0, 0.0, 1.0, 1.0, &SearchLimits::default()).unwrap_err();
        assert!(matches!(err, RouteError::EmptyGraph));
    }

    #[test]
    fn no_path_between_components() {
        let g = graph(
            &[(1, 0.0, 0.0), (2, 0.0, 1.0), (3, 5.0, 5.0), (4, 5.0, 6.0)],
            &[(1, 2), (3, 4)],
        );
        let outcome = shortest_path(&g, &AStarRouter, 0.0, 0.0, 6.0, 5.0, &SearchLimits::default()).unwrap();
        assert_eq!(outcome, RouteOutcome::NoPath { from: NodeId(1), to: NodeId(4) });
    }

    #[test]
    fn leg_bearings_due_north() {
        let g = line();
        let r = shortest_path(&g, &AStarRouter, 0.0, 0.0, 0.0, 3.0, &SearchLimits::default())
            .unwrap()
            .into_route()
            .unwrap();
        let bearings = r.leg_bearings(&g).unwrap();
        assert_eq!(bearings.len(), 3);
        assert!(bearings.iter().all(|b| b.abs() < 1e-9));
    }

    #[test]
    fn leg_bearings_unknown_node() {
        let g = line();
        let r = crate::Route { nodes: ids(&[1, 42]), total_miles: 0.0 };
        assert!(matches!(r.leg_bearings(&g), Err(RouteError::Graph(_))));
    }

    #[test]
    fn batch_preserves_order() {
        let g = line();
        let queries = [
            RouteQuery::new(0.0, 0.0, 0.0, 3.0),
            RouteQuery::new(0.0, 3.0, 0.0, 0.0),
            RouteQuery::new(0.0, 2.0, 0.0, 2.0),
        ];
        let results = route_many(&g, &AStarRouter, &queries, &SearchLimits::default());
        let nodes: Vec<Vec<NodeId>> =
            results.into_iter().map(|r| r.unwrap().into_route().unwrap().nodes).collect();
        assert_eq!(nodes, vec![ids(&[1, 2, 3, 4]), ids(&[4, 3, 2, 1]), ids(&[3])]);
    }

    #[test]
    fn shared_graph_across_threads() {
        let g = line();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| shortest_path(&g, &AStarRouter, 0.0, 0.0, 0.0, 3.0, &SearchLimits::default()).unwrap())
                })
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap().route().unwrap().hop_count(), 3);
            }
        });
    }
}

//! Unit tests for wf-spatial.
//!
//! All tests use hand-crafted or seeded synthetic networks so they run
//! without any map data.

#[cfg(test)]
mod helpers {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use wf_core::{GeoPoint, NodeId};

    use crate::{RoadNetwork, RoadNetworkBuilder};

    /// ~5.56 m of latitude.  Chain edges of 10 m stay longer than the
    /// straight-line distance, so the haversine heuristic remains admissible.
    pub const STEP_DEG: f64 = 0.00005;

    /// Line A–B–C–D with 10 m links plus a 100 m direct A–D road.
    ///
    /// ```text
    ///   A ──10── B ──10── C ──10── D
    ///    \_____________100_______/
    /// ```
    pub fn line_with_shortcut() -> (RoadNetwork, [NodeId; 4]) {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let bb = b.add_node(GeoPoint::new(STEP_DEG, 0.0));
        let c = b.add_node(GeoPoint::new(2.0 * STEP_DEG, 0.0));
        let d = b.add_node(GeoPoint::new(3.0 * STEP_DEG, 0.0));

        b.add_road(a, bb, 10.0).unwrap();
        b.add_road(bb, c, 10.0).unwrap();
        b.add_road(c, d, 10.0).unwrap();
        b.add_road(a, d, 100.0).unwrap();

        (b.build(), [a, bb, c, d])
    }

    /// `n` nodes in a north-bound line, consecutive nodes joined by 10 m
    /// two-way roads.
    pub fn straight_line(n: usize) -> (RoadNetwork, Vec<NodeId>) {
        let mut b = RoadNetworkBuilder::new();
        let nodes: Vec<_> = (0..n)
            .map(|i| b.add_node(GeoPoint::new(i as f64 * STEP_DEG, 0.0)))
            .collect();
        for w in nodes.windows(2) {
            b.add_road(w[0], w[1], 10.0).unwrap();
        }
        (b.build(), nodes)
    }

    /// Two nodes ~44 m apart joined by two parallel one-way roads A→B: an
    /// 80 m road bulging north (key 0) and a 50 m road bulging south (key 1).
    pub fn parallel_pair() -> (RoadNetwork, [NodeId; 2], [GeoPoint; 3]) {
        let mut b = RoadNetworkBuilder::new();
        let pa = GeoPoint::new(0.0, 0.0);
        let pb = GeoPoint::new(0.0, 0.0004);
        let a = b.add_node(pa);
        let c = b.add_node(pb);

        let north = vec![pa, GeoPoint::new(0.0002, 0.0002), pb];
        let south = vec![pa, GeoPoint::new(-0.0001, 0.0002), pb];
        b.add_directed_edge_with_geometry(a, c, 80.0, north).unwrap();
        b.add_directed_edge_with_geometry(a, c, 50.0, south.clone()).unwrap();

        (b.build(), [a, c], [south[0], south[1], south[2]])
    }

    /// Two components with no edge between them.
    pub fn two_islands() -> (RoadNetwork, [NodeId; 4]) {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(21.000, 105.800));
        let c = b.add_node(GeoPoint::new(21.001, 105.800));
        let x = b.add_node(GeoPoint::new(21.010, 105.810));
        let y = b.add_node(GeoPoint::new(21.011, 105.810));
        b.add_road(a, c, 120.0).unwrap();
        b.add_road(x, y, 120.0).unwrap();
        (b.build(), [a, c, x, y])
    }

    /// Seeded `rows × cols` street grid around Hanoi with ~0.001° spacing.
    ///
    /// Each link is dropped with probability 0.1 per direction, lengths are
    /// 1.05–1.55× the straight-line distance, and ~20 % of links get a longer
    /// parallel twin.  Node `r * cols + c` sits at row `r`, column `c`.
    pub fn random_grid(rows: usize, cols: usize, seed: u64) -> RoadNetwork {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut b = RoadNetworkBuilder::with_capacity(rows * cols, rows * cols * 4);

        for r in 0..rows {
            for c in 0..cols {
                b.add_node(GeoPoint::new(21.0 + r as f64 * 0.001, 105.8 + c as f64 * 0.001));
            }
        }

        let id = |r: usize, c: usize| NodeId((r * cols + c) as u32);
        for r in 0..rows {
            for c in 0..cols {
                let mut links = Vec::new();
                if c + 1 < cols {
                    links.push((id(r, c), id(r, c + 1)));
                }
                if r + 1 < rows {
                    links.push((id(r, c), id(r + 1, c)));
                }
                for (u, v) in links {
                    for (from, to) in [(u, v), (v, u)] {
                        if rng.gen_bool(0.1) {
                            continue;
                        }
                        let straight = b.node_pos(from).unwrap().distance_m(b.node_pos(to).unwrap());
                        let len = straight * (1.05 + rng.gen_range(0.0..0.5));
                        b.add_directed_edge(from, to, len).unwrap();
                        if rng.gen_bool(0.2) {
                            b.add_directed_edge(from, to, len * 1.3).unwrap();
                        }
                    }
                }
            }
        }
        b.build()
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use wf_core::{GeoPoint, NodeId};

    use crate::{RoadNetworkBuilder, RouteError};

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn single_road() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(21.0, 105.8));
        let c = b.add_node(GeoPoint::new(21.1, 105.8));
        b.add_road(a, c, 11_200.0).unwrap();
        let net = b.build();
        assert_eq!(net.node_count(), 2);
        assert_eq!(net.edge_count(), 2); // bidirectional
        assert_eq!(net.out_degree(a), 1);
        assert_eq!(net.out_degree(c), 1);
    }

    #[test]
    fn directed_only_edge() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 120_000.0).unwrap();
        let net = b.build();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.out_degree(a), 1);
        assert_eq!(net.out_degree(c), 0); // no return edge
    }

    #[test]
    fn rejects_bad_edges() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.001));

        assert!(matches!(
            b.add_directed_edge(a, c, -1.0),
            Err(RouteError::InvalidLength { .. })
        ));
        assert!(matches!(
            b.add_directed_edge(a, c, f64::NAN),
            Err(RouteError::InvalidLength { .. })
        ));
        assert_eq!(
            b.add_directed_edge(a, NodeId(7), 1.0),
            Err(RouteError::NodeNotFound(NodeId(7)))
        );
        assert!(matches!(
            b.add_directed_edge_with_geometry(a, c, 5.0, vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(95.0, 0.0)]),
            Err(RouteError::InvalidCoordinate(_))
        ));
        // Zero-length edges are legal (e.g. duplicated OSM nodes).
        assert!(b.add_directed_edge(a, c, 0.0).is_ok());
        assert_eq!(b.edge_count(), 1);
    }

    #[test]
    fn csr_edges_start_at_their_source() {
        let (net, [a, bb, c, d]) = super::helpers::line_with_shortcut();
        for n in [a, bb, c, d] {
            for e in net.out_edges(n) {
                assert_eq!(net.edge_from[e.index()], n);
            }
        }
        assert_eq!(net.out_degree(a), 2); // a→b, a→d
        assert_eq!(net.out_degree(bb), 2);
    }

    #[test]
    fn parallel_edges_grouped_and_keyed() {
        let (net, [a, c], _) = super::helpers::parallel_pair();
        let groups: Vec<_> = net.out_groups(a).unwrap().collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].target, c);
        assert_eq!(groups[0].len(), 2);

        let edges = net.parallel_edges(a, c).unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(net.edge_key[edges[0].index()], 0);
        assert_eq!(net.edge_key[edges[1].index()], 1);
        assert_eq!(net.edge_length(edges[0]), 80.0);

        // Canonical = shortest, not first inserted.
        let canonical = net.edge_between(a, c).unwrap().unwrap();
        assert_eq!(canonical, edges[1]);
        assert_eq!(groups[0].canonical, canonical);
        assert_eq!(net.edge_between(c, a).unwrap(), None);
    }

    #[test]
    fn equal_length_parallels_pick_lowest_key() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.0004));
        b.add_directed_edge(a, c, 90.0).unwrap();
        b.add_directed_edge(a, c, 60.0).unwrap();
        b.add_directed_edge(a, c, 60.0).unwrap();
        let net = b.build();

        let e = net.edge_between(a, c).unwrap().unwrap();
        assert_eq!(net.edge_key[e.index()], 1);
    }

    #[test]
    fn out_groups_ascend_by_target() {
        let mut b = RoadNetworkBuilder::new();
        let hub = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 0.001));
        let n2 = b.add_node(GeoPoint::new(0.001, 0.0));
        // Inserted out of order.
        b.add_directed_edge(hub, n2, 200.0).unwrap();
        b.add_directed_edge(hub, n1, 200.0).unwrap();
        b.add_directed_edge(hub, n2, 150.0).unwrap();
        let net = b.build();

        let targets: Vec<_> = net.out_groups(hub).unwrap().map(|g| g.target).collect();
        assert_eq!(targets, vec![n1, n2]);
        assert!(matches!(net.out_groups(NodeId(9)), Err(RouteError::NodeNotFound(_))));
    }

    #[test]
    fn geometry_storage() {
        let (net, [a, c], south) = super::helpers::parallel_pair();
        let e = net.edge_between(a, c).unwrap().unwrap();
        assert!(net.has_geometry(e));
        assert_eq!(net.edge_geometry(e).unwrap(), &south[..]);

        // One-vertex curves carry no shape.
        let mut b = RoadNetworkBuilder::new();
        let x = b.add_node(GeoPoint::new(0.0, 0.0));
        let y = b.add_node(GeoPoint::new(0.0, 0.001));
        b.add_directed_edge_with_geometry(x, y, 120.0, vec![GeoPoint::new(0.0, 0.0)]).unwrap();
        let net = b.build();
        let e = net.edge_between(x, y).unwrap().unwrap();
        assert!(!net.has_geometry(e));
        assert_eq!(net.edge_geometry(e), None);
    }

    #[test]
    fn road_with_geometry_reverses_curve() {
        let mut b = RoadNetworkBuilder::new();
        let pa = GeoPoint::new(0.0, 0.0);
        let mid = GeoPoint::new(0.0003, 0.0002);
        let pb = GeoPoint::new(0.0, 0.0004);
        let a = b.add_node(pa);
        let c = b.add_node(pb);
        b.add_road_with_geometry(a, c, 70.0, vec![pa, mid, pb]).unwrap();
        let net = b.build();

        let back = net.edge_between(c, a).unwrap().unwrap();
        assert_eq!(net.edge_geometry(back).unwrap(), &[pb, mid, pa][..]);
    }

    #[test]
    fn external_ids() {
        let mut b = RoadNetworkBuilder::new();
        let a = b
            .add_node_with_external_id(2_153_012_345, GeoPoint::new(21.03, 105.85))
            .unwrap();
        let c = b
            .add_node_with_external_id(-17, GeoPoint::new(21.04, 105.85))
            .unwrap();
        assert_eq!(
            b.add_node_with_external_id(-17, GeoPoint::new(21.05, 105.85)),
            Err(RouteError::DuplicateExternalId(-17))
        );
        assert!(b.add_node_with_external_id(5, GeoPoint::new(f64::NAN, 0.0)).is_err());

        let net = b.build();
        assert_eq!(net.node_count(), 2);
        assert_eq!(net.node_by_external_id(2_153_012_345), Some(a));
        assert_eq!(net.node_by_external_id(-17), Some(c));
        assert_eq!(net.node_by_external_id(0), None);
        assert_eq!(net.external_id(c).unwrap(), Some(-17));
        assert_eq!(net.external_id(NodeId(2)), Err(RouteError::NodeNotFound(NodeId(2))));
    }

    #[test]
    fn plain_nodes_have_no_external_id() {
        let mut b = RoadNetworkBuilder::new();
        let keyed = b.add_node_with_external_id(1, GeoPoint::new(21.03, 105.85)).unwrap();
        let plain = b.add_node(GeoPoint::new(21.04, 105.85));
        // Id 1 is plain's index, id 0 is keyed's: neither is taken implicitly.
        let other = b.add_node_with_external_id(0, GeoPoint::new(21.05, 105.85)).unwrap();
        assert_eq!(
            b.add_node_with_external_id(1, GeoPoint::new(21.06, 105.85)),
            Err(RouteError::DuplicateExternalId(1))
        );

        let net = b.build();
        assert_eq!(net.external_id(keyed).unwrap(), Some(1));
        assert_eq!(net.external_id(plain).unwrap(), None);
        assert_eq!(net.external_id(other).unwrap(), Some(0));
        assert_eq!(net.node_by_external_id(1), Some(keyed));
        assert_eq!(net.node_by_external_id(0), Some(other));
        assert_eq!(net.node_by_external_id(2), None);
    }

    #[test]
    fn try_add_node_validates() {
        let mut b = RoadNetworkBuilder::new();
        assert!(matches!(
            b.try_add_node(GeoPoint::new(f64::NAN, 105.85)),
            Err(RouteError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            b.try_add_node(GeoPoint::new(21.0, 181.0)),
            Err(RouteError::InvalidCoordinate(_))
        ));
        assert_eq!(b.node_count(), 0);
        assert_eq!(b.try_add_node(GeoPoint::new(21.0, 105.85)), Ok(NodeId(0)));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "invalid node coordinate")]
    fn add_node_asserts_in_debug() {
        RoadNetworkBuilder::new().add_node(GeoPoint::new(f64::NAN, 0.0));
    }

    #[test]
    fn position_lookup() {
        let (net, [a, ..]) = super::helpers::line_with_shortcut();
        assert_eq!(net.position(a).unwrap(), GeoPoint::new(0.0, 0.0));
        assert_eq!(net.position(NodeId::INVALID), Err(RouteError::NodeNotFound(NodeId::INVALID)));
    }
}

// ── Nearest-node lookup ────────────────────────────────────────────────────────

#[cfg(test)]
mod nearest {
    use wf_core::{GeoPoint, NodeId};

    use crate::{RoadNetworkBuilder, RouteError};

    #[test]
    fn picks_closer_of_two() {
        let mut b = RoadNetworkBuilder::new();
        let origin = b.add_node(GeoPoint::new(0.0, 0.0));
        let _far = b.add_node(GeoPoint::new(1.0, 1.0));
        let net = b.build();
        assert_eq!(net.nearest_node(GeoPoint::new(0.1, 0.1)).unwrap(), origin);
    }

    #[test]
    fn exact_position() {
        let (net, [_, bb, ..]) = super::helpers::line_with_shortcut();
        let p = net.position(bb).unwrap();
        assert_eq!(net.nearest_node(p).unwrap(), bb);
    }

    #[test]
    fn tie_goes_to_lowest_id() {
        let mut b = RoadNetworkBuilder::new();
        let east = b.add_node(GeoPoint::new(0.0, 1.0));
        let west = b.add_node(GeoPoint::new(0.0, -1.0));
        let net = b.build();
        assert!(east < west);
        assert_eq!(net.nearest_node(GeoPoint::new(0.0, 0.0)).unwrap(), east);
    }

    #[test]
    fn matches_brute_force_haversine() {
        let net = super::helpers::random_grid(8, 8, 11);
        let queries = [
            GeoPoint::new(21.0031, 105.8042),
            GeoPoint::new(20.9990, 105.7990),
            GeoPoint::new(21.0068, 105.8011),
            GeoPoint::new(21.0100, 105.8100),
        ];
        for q in queries {
            let brute = (0..net.node_count() as u32)
                .map(NodeId)
                .min_by(|x, y| {
                    net.node_pos[x.index()]
                        .distance_m(q)
                        .total_cmp(&net.node_pos[y.index()].distance_m(q))
                })
                .unwrap();
            assert_eq!(net.nearest_node(q).unwrap(), brute, "query {q}");
        }
    }

    #[test]
    fn k_nearest_order() {
        let (net, [a, bb, c, _]) = super::helpers::line_with_shortcut();
        let near = net.k_nearest_nodes(GeoPoint::new(0.0, 0.0), 3).unwrap();
        assert_eq!(near, vec![a, bb, c]);
        assert_eq!(net.k_nearest_nodes(GeoPoint::new(0.0, 0.0), 10).unwrap().len(), 4);
    }

    #[test]
    fn empty_network() {
        let net = RoadNetworkBuilder::new().build();
        assert_eq!(net.nearest_node(GeoPoint::new(0.0, 0.0)), Err(RouteError::EmptyGraph));
        assert_eq!(net.k_nearest_nodes(GeoPoint::new(0.0, 0.0), 1), Err(RouteError::EmptyGraph));
    }

    #[test]
    fn malformed_query() {
        let (net, _) = super::helpers::line_with_shortcut();
        assert!(matches!(
            net.nearest_node(GeoPoint::new(f64::NAN, 0.0)),
            Err(RouteError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            net.nearest_node(GeoPoint::new(0.0, 200.0)),
            Err(RouteError::InvalidCoordinate(_))
        ));
    }
}

// ── Shortest-path search ───────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use std::time::Duration;

    use wf_core::{NodeId, SearchLimits};

    use crate::{
        AStarRouter, DijkstraRouter, RouteError, Router, SearchStatus, Strategy, path_length_m,
        shortest_path_astar, shortest_path_dijkstra,
    };

    const EPS: f64 = 1e-6;

    #[test]
    fn chain_beats_shortcut() {
        let (net, [a, bb, c, d]) = super::helpers::line_with_shortcut();
        for r in [shortest_path_dijkstra(&net, a, d).unwrap(), shortest_path_astar(&net, a, d).unwrap()] {
            assert_eq!(r.status, SearchStatus::Found);
            assert_eq!(r.path, vec![a, bb, c, d], "{}", r.strategy);
            assert!((r.cost_m - 30.0).abs() < EPS);
            assert_eq!(r.hop_count(), 3);
        }
    }

    #[test]
    fn strategies_are_labelled() {
        let (net, [a, .., d]) = super::helpers::line_with_shortcut();
        assert_eq!(shortest_path_dijkstra(&net, a, d).unwrap().strategy, Strategy::Dijkstra);
        assert_eq!(shortest_path_astar(&net, a, d).unwrap().strategy, Strategy::AStar);
        assert_eq!(Strategy::AStar.to_string(), "astar");
        assert_eq!(DijkstraRouter::default().strategy(), Strategy::Dijkstra);
    }

    #[test]
    fn uses_shorter_parallel_edge() {
        let (net, [a, c], _) = super::helpers::parallel_pair();
        for r in [shortest_path_dijkstra(&net, a, c).unwrap(), shortest_path_astar(&net, a, c).unwrap()] {
            assert_eq!(r.path, vec![a, c]);
            assert_eq!(r.cost_m, 50.0);
        }
    }

    #[test]
    fn origin_is_destination() {
        let (net, [a, ..]) = super::helpers::line_with_shortcut();
        for r in [shortest_path_dijkstra(&net, a, a).unwrap(), shortest_path_astar(&net, a, a).unwrap()] {
            assert_eq!(r.status, SearchStatus::Found);
            assert_eq!(r.path, vec![a]);
            assert_eq!(r.cost_m, 0.0);
            assert_eq!(r.edges_relaxed, 0);
            assert_eq!(r.nodes_visited, 1);
            assert_eq!(r.hop_count(), 0);
        }
    }

    #[test]
    fn disconnected_is_not_an_error() {
        let (net, [a, _, x, _]) = super::helpers::two_islands();
        for r in [shortest_path_dijkstra(&net, a, x).unwrap(), shortest_path_astar(&net, a, x).unwrap()] {
            assert_eq!(r.status, SearchStatus::NoPathFound);
            assert!(!r.is_found());
            assert!(r.path.is_empty());
            assert_eq!(r.cost_m, 0.0);
            // Both nodes of the origin island were explored.
            assert_eq!(r.nodes_visited, 2);
        }
    }

    #[test]
    fn one_way_blocks_return() {
        let (net, [a, c], _) = super::helpers::parallel_pair();
        assert!(shortest_path_dijkstra(&net, a, c).unwrap().is_found());
        assert!(!shortest_path_dijkstra(&net, c, a).unwrap().is_found());
        assert!(!shortest_path_astar(&net, c, a).unwrap().is_found());
    }

    #[test]
    fn unknown_endpoint() {
        let (net, [a, ..]) = super::helpers::line_with_shortcut();
        assert_eq!(
            shortest_path_dijkstra(&net, a, NodeId(42)),
            Err(RouteError::NodeNotFound(NodeId(42)))
        );
        assert_eq!(
            shortest_path_astar(&net, NodeId(42), a),
            Err(RouteError::NodeNotFound(NodeId(42)))
        );
    }

    #[test]
    fn settle_cap_times_out() {
        let (net, nodes) = super::helpers::straight_line(10);
        let (from, to) = (nodes[0], nodes[9]);
        let limits = SearchLimits::default().with_max_settled(3);

        for router in [&DijkstraRouter::new(limits) as &dyn Router, &AStarRouter::new(limits)] {
            match router.route(&net, from, to) {
                Err(RouteError::SearchTimedOut { settled, .. }) => assert_eq!(settled, 3),
                other => panic!("{}: expected timeout, got {other:?}", router.strategy()),
            }
        }
    }

    #[test]
    fn settle_cap_is_inclusive() {
        let (net, nodes) = super::helpers::straight_line(10);
        let limits = SearchLimits::default().with_max_settled(3);
        // Destination is the third node finalised: found within the cap.
        let r = DijkstraRouter::new(limits).route(&net, nodes[0], nodes[2]).unwrap();
        assert!(r.is_found());
        assert_eq!(r.nodes_visited, 3);
        // One more hop would need a fourth.
        assert!(matches!(
            DijkstraRouter::new(limits).route(&net, nodes[0], nodes[3]),
            Err(RouteError::SearchTimedOut { settled: 3, .. })
        ));
    }

    #[test]
    fn expired_deadline_times_out() {
        let (net, nodes) = super::helpers::straight_line(10);
        let limits = SearchLimits::default().with_deadline(Duration::ZERO);

        for router in [&DijkstraRouter::new(limits) as &dyn Router, &AStarRouter::new(limits)] {
            match router.route(&net, nodes[0], nodes[9]) {
                Err(RouteError::SearchTimedOut { settled, .. }) => assert_eq!(settled, 1),
                other => panic!("{}: expected timeout, got {other:?}", router.strategy()),
            }
            // The destination check comes first, so a trivial query still succeeds.
            let r = router.route(&net, nodes[4], nodes[4]).unwrap();
            assert!(r.is_found());
        }
    }

    #[test]
    fn generous_cap_does_not_interfere() {
        let (net, nodes) = super::helpers::straight_line(10);
        let limits = SearchLimits::default().with_max_settled(10);
        let capped = AStarRouter::new(limits).route(&net, nodes[0], nodes[9]).unwrap();
        assert_eq!(capped.path, nodes);
        assert!((capped.cost_m - 90.0).abs() < EPS);
        assert_eq!(capped.nodes_visited, 10);
    }

    #[test]
    fn astar_and_dijkstra_agree() {
        for seed in 0..6 {
            let net = super::helpers::random_grid(12, 12, seed);
            let n = net.node_count() as u32;
            let pairs = [(0, n - 1), (5, n - 7), (n / 2, 3), (n - 1, 0), (17, 17 + 24)];

            for (from, to) in pairs {
                let (from, to) = (NodeId(from), NodeId(to));
                let d = shortest_path_dijkstra(&net, from, to).unwrap();
                let a = shortest_path_astar(&net, from, to).unwrap();

                assert_eq!(d.status, a.status, "seed {seed} {from}->{to}");
                if d.is_found() {
                    assert!((d.cost_m - a.cost_m).abs() < EPS, "seed {seed} {from}->{to}");
                    assert_eq!(*a.path.first().unwrap(), from);
                    assert_eq!(*a.path.last().unwrap(), to);
                    assert!(a.nodes_visited <= d.nodes_visited, "seed {seed} {from}->{to}");
                } else {
                    assert!(a.path.is_empty() && d.path.is_empty());
                }
            }
        }
    }

    #[test]
    fn all_pairs_agree_on_small_grid() {
        let net = super::helpers::random_grid(5, 5, 3);
        let n = net.node_count() as u32;
        for from in (0..n).map(NodeId) {
            for to in (0..n).map(NodeId) {
                let d = shortest_path_dijkstra(&net, from, to).unwrap();
                let a = shortest_path_astar(&net, from, to).unwrap();
                assert_eq!(d.status, a.status, "{from}->{to}");
                assert!((d.cost_m - a.cost_m).abs() < EPS, "{from}->{to}");
            }
        }
    }

    #[test]
    fn reported_cost_matches_path_length() {
        let net = super::helpers::random_grid(12, 12, 42);
        let last = NodeId(net.node_count() as u32 - 1);
        for r in [shortest_path_dijkstra(&net, NodeId(0), last).unwrap(), shortest_path_astar(&net, NodeId(0), last).unwrap()] {
            if r.is_found() {
                assert_eq!(path_length_m(&net, &r.path).unwrap(), r.cost_m);
            }
        }
    }

    #[test]
    fn concurrent_queries_share_network() {
        let net = super::helpers::random_grid(12, 12, 9);
        let last = NodeId(net.node_count() as u32 - 1);
        let expected = shortest_path_dijkstra(&net, NodeId(0), last).unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let net = &net;
                    s.spawn(move || {
                        if i % 2 == 0 {
                            shortest_path_dijkstra(net, NodeId(0), last)
                        } else {
                            shortest_path_astar(net, NodeId(0), last)
                        }
                    })
                })
                .collect();
            for h in handles {
                let r = h.join().unwrap().unwrap();
                assert_eq!(r.status, expected.status);
                assert!((r.cost_m - expected.cost_m).abs() < EPS);
            }
        });
    }
}

// ── Route geometry ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod geometry {
    use wf_core::{GeoPoint, NodeId};

    use crate::{RoadNetworkBuilder, RouteError, reconstruct_geometry, shortest_path_astar};

    #[test]
    fn empty_path() {
        let (net, _) = super::helpers::line_with_shortcut();
        assert!(reconstruct_geometry(&net, &[]).unwrap().is_empty());
    }

    #[test]
    fn single_node() {
        let (net, [_, bb, ..]) = super::helpers::line_with_shortcut();
        let pts = reconstruct_geometry(&net, &[bb]).unwrap();
        assert_eq!(pts, vec![net.position(bb).unwrap()]);
    }

    #[test]
    fn straight_edges_use_node_positions() {
        let (net, [a, bb, c, d]) = super::helpers::line_with_shortcut();
        let pts = reconstruct_geometry(&net, &[a, bb, c, d]).unwrap();
        let expected: Vec<_> = [a, bb, c, d].iter().map(|&n| net.position(n).unwrap()).collect();
        assert_eq!(pts, expected);
    }

    #[test]
    fn follows_the_chosen_parallel_curve() {
        let (net, [a, c], south) = super::helpers::parallel_pair();
        let route = shortest_path_astar(&net, a, c).unwrap();
        let pts = reconstruct_geometry(&net, &route.path).unwrap();
        assert_eq!(pts, south.to_vec());
    }

    #[test]
    fn no_duplicate_points_at_joins() {
        let mut b = RoadNetworkBuilder::new();
        let p0 = GeoPoint::new(0.0, 0.0);
        let p1 = GeoPoint::new(0.0, 0.001);
        let p2 = GeoPoint::new(0.0, 0.002);
        let n0 = b.add_node(p0);
        let n1 = b.add_node(p1);
        let n2 = b.add_node(p2);
        b.add_directed_edge_with_geometry(n0, n1, 130.0, vec![p0, GeoPoint::new(0.0002, 0.0005), p1]).unwrap();
        b.add_directed_edge_with_geometry(n1, n2, 130.0, vec![p1, GeoPoint::new(-0.0002, 0.0015), p2]).unwrap();
        let net = b.build();

        let pts = reconstruct_geometry(&net, &[n0, n1, n2]).unwrap();
        assert_eq!(pts.len(), 5);
        assert_eq!(pts.first(), Some(&p0));
        assert_eq!(pts.last(), Some(&p2));
        for w in pts.windows(2) {
            assert_ne!(w[0], w[1]);
        }
    }

    #[test]
    fn length_grows_with_path() {
        let net = super::helpers::random_grid(10, 10, 5);
        let last = NodeId(net.node_count() as u32 - 1);
        let route = shortest_path_astar(&net, NodeId(0), last).unwrap();
        let mut prev = 0;
        for k in 1..=route.path.len() {
            let pts = reconstruct_geometry(&net, &route.path[..k]).unwrap();
            assert!(pts.len() >= prev);
            for w in pts.windows(2) {
                assert_ne!(w[0], w[1]);
            }
            prev = pts.len();
        }
    }

    #[test]
    fn non_adjacent_hop() {
        let (net, [a, _, c, _]) = super::helpers::line_with_shortcut();
        assert_eq!(
            reconstruct_geometry(&net, &[a, c]),
            Err(RouteError::EdgeNotFound { from: a, to: c })
        );
    }

    #[test]
    fn unknown_node() {
        let (net, [a, ..]) = super::helpers::line_with_shortcut();
        assert_eq!(
            reconstruct_geometry(&net, &[NodeId(77)]),
            Err(RouteError::NodeNotFound(NodeId(77)))
        );
        assert_eq!(
            reconstruct_geometry(&net, &[a, NodeId(77)]),
            Err(RouteError::NodeNotFound(NodeId(77)))
        );
    }
}

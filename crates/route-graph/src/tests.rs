use route_core::{HighwayKind, Point, Road, RoadId, VertexId};

use crate::builder::{GraphBuilder, JunctionPolicy};
use crate::graph::GraphBackendKind;
use crate::io::parse_geojson_line;
use crate::search::{AStar, Bfs, Dfs, Dijkstra, Search};
use crate::weights::{angle, Coefficients, Fastest, Heuristic, Shortest};

fn road(id: u32, points: Vec<Point>) -> Road {
    Road {
        id: RoadId(id),
        points,
        highway: HighwayKind::Residential,
        name: String::new(),
        reference: String::new(),
        roundabout: false,
        oneway: false,
        bridge: false,
        maxspeed: 50,
        lanes: 1,
        toll: false,
        lit: false,
    }
}

fn pt(lon: f32, lat: f32) -> Point {
    Point::new(lon, lat)
}

// Two roads, end-to-end at a shared coordinate: vertices 0,1 on road 0,
// vertices 2,3 on road 1, sharing the point (1.0, 0.0).
fn two_road_junction() -> Vec<Road> {
    vec![
        road(0, vec![pt(0.0, 0.0), pt(1.0, 0.0)]),
        road(1, vec![pt(1.0, 0.0), pt(2.0, 0.0)]),
    ]
}

#[test]
fn straight_road_connects_consecutive_points() {
    let graph = GraphBuilder::new(vec![road(0, vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0)])])
        .build()
        .unwrap();

    assert!(graph.adjacent(VertexId(0)).contains(&VertexId(1)));
    assert!(graph.adjacent(VertexId(1)).contains(&VertexId(0)));
    assert!(graph.adjacent(VertexId(1)).contains(&VertexId(2)));
}

#[test]
fn oneway_road_only_connects_forward() {
    let mut r = road(0, vec![pt(0.0, 0.0), pt(1.0, 0.0)]);
    r.oneway = true;
    let graph = GraphBuilder::new(vec![r]).build().unwrap();

    assert!(graph.adjacent(VertexId(0)).contains(&VertexId(1)));
    assert!(!graph.adjacent(VertexId(1)).contains(&VertexId(0)));
}

#[test]
fn parse_geojson_line_uses_properties_id_when_present() {
    let line = r#"{"type":"Feature","geometry":{"type":"LineString","coordinates":[[0.0,0.0],[1.0,0.0]]},"properties":{"id":"482","highway":"residential"}}"#;
    let r = parse_geojson_line(line, RoadId(9)).unwrap();
    assert_eq!(r.id, RoadId(482));
}

#[test]
fn parse_geojson_line_accepts_numeric_json_id() {
    let line = r#"{"type":"Feature","geometry":{"type":"LineString","coordinates":[[0.0,0.0],[1.0,0.0]]},"properties":{"id":482,"highway":"residential"}}"#;
    let r = parse_geojson_line(line, RoadId(9)).unwrap();
    assert_eq!(r.id, RoadId(482));
}

#[test]
fn parse_geojson_line_falls_back_to_positional_id_when_absent() {
    let line = r#"{"type":"Feature","geometry":{"type":"LineString","coordinates":[[0.0,0.0],[1.0,0.0]]},"properties":{"highway":"residential"}}"#;
    let r = parse_geojson_line(line, RoadId(9)).unwrap();
    assert_eq!(r.id, RoadId(9));
}

#[test]
fn sparse_road_ids_do_not_break_graph_indexing() {
    // Road.id values are intentionally out of arena order here — vertex-to-road
    // lookup must use position in `roads`, not these ids.
    let roads = vec![
        road(9001, vec![pt(0.0, 0.0), pt(1.0, 0.0)]),
        road(4, vec![pt(1.0, 0.0), pt(2.0, 0.0)]),
    ];
    let graph = GraphBuilder::new(roads).build().unwrap();

    assert!(graph.adjacent(VertexId(1)).contains(&VertexId(2)));
    assert_eq!(graph.road_of(VertexId(0)).id, RoadId(9001));
    assert_eq!(graph.road_of(VertexId(2)).id, RoadId(4));
}

#[test]
fn two_road_junction_merges_shared_endpoint() {
    let graph = GraphBuilder::new(two_road_junction()).build().unwrap();

    // Vertex 1 (end of road 0) and vertex 2 (start of road 1) share a
    // coordinate and should be bridged even though they belong to
    // different roads.
    assert!(graph.adjacent(VertexId(1)).contains(&VertexId(2)));
    assert!(graph.adjacent(VertexId(2)).contains(&VertexId(1)));
}

#[test]
fn roundabout_closes_the_ring() {
    let mut r = road(0, vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0), pt(0.0, 1.0)]);
    r.roundabout = true;
    let graph = GraphBuilder::new(vec![r]).build().unwrap();

    // Last point connects back to the first, directed (roundabouts are one-way).
    assert!(graph.adjacent(VertexId(3)).contains(&VertexId(0)));
    assert!(!graph.adjacent(VertexId(0)).contains(&VertexId(3)));
}

#[test]
fn suppress_mixed_bridge_skips_junction_when_one_side_is_a_bridge() {
    let mut roads = two_road_junction();
    roads[1].bridge = true;

    let graph = GraphBuilder::new(roads)
        .junction_policy(JunctionPolicy::SuppressMixedBridge)
        .build()
        .unwrap();

    assert!(!graph.adjacent(VertexId(1)).contains(&VertexId(2)));
}

#[test]
fn always_policy_still_merges_mixed_bridge_junction() {
    let mut roads = two_road_junction();
    roads[1].bridge = true;

    let graph = GraphBuilder::new(roads)
        .junction_policy(JunctionPolicy::Always)
        .build()
        .unwrap();

    assert!(graph.adjacent(VertexId(1)).contains(&VertexId(2)));
}

#[test]
fn matrix_backend_resource_warning_rejects_huge_vertex_count() {
    // A fabricated road with enough points to blow past the 1 GiB matrix
    // threshold without actually allocating the matrix.
    let huge_points: Vec<Point> = (0..40_000).map(|i| pt(i as f32, 0.0)).collect();
    let err = GraphBuilder::new(vec![road(0, huge_points)])
        .backend(GraphBackendKind::Matrix)
        .build()
        .unwrap_err();

    assert!(matches!(err, crate::error::GraphError::ResourceWarning { .. }));
}

#[test]
fn nearest_vertex_snaps_to_the_closest_point() {
    let graph = GraphBuilder::new(two_road_junction()).build().unwrap();
    let snapped = graph.nearest_vertex(pt(0.1, 0.0)).unwrap();
    assert_eq!(snapped, VertexId(0));
}

#[test]
fn dijkstra_finds_the_direct_path_across_a_junction() {
    let graph = GraphBuilder::new(two_road_junction()).build().unwrap();
    let weight = Shortest;
    let mut search = Dijkstra::new(&graph, &weight);

    search.run(VertexId(0), VertexId(3), true);
    let (path, found) = search.reconstruct(VertexId(0), VertexId(3));

    assert!(found);
    assert_eq!(path, vec![VertexId(0), VertexId(1), VertexId(2), VertexId(3)]);
}

#[test]
fn dijkstra_reports_no_route_for_disconnected_target() {
    let mut roads = two_road_junction();
    roads.push(road(2, vec![pt(10.0, 10.0), pt(11.0, 10.0)]));

    let graph = GraphBuilder::new(roads).build().unwrap();
    let weight = Shortest;
    let mut search = Dijkstra::new(&graph, &weight);

    search.run(VertexId(0), VertexId(4), false);
    let (_path, found) = search.reconstruct(VertexId(0), VertexId(4));

    assert!(!found);
}

#[test]
fn astar_agrees_with_dijkstra_on_a_simple_graph() {
    let graph = GraphBuilder::new(two_road_junction()).build().unwrap();

    let shortest = Shortest;
    let mut dijkstra = Dijkstra::new(&graph, &shortest);
    dijkstra.run(VertexId(0), VertexId(3), true);
    let (dijkstra_path, _) = dijkstra.reconstruct(VertexId(0), VertexId(3));

    let heuristic = Heuristic;
    let mut astar = AStar::new(&graph, &shortest, &heuristic);
    astar.run(VertexId(0), VertexId(3), true);
    let (astar_path, _) = astar.reconstruct(VertexId(0), VertexId(3));

    assert_eq!(dijkstra_path, astar_path);
}

#[test]
fn bfs_finds_shortest_hop_count_path() {
    let graph = GraphBuilder::new(two_road_junction()).build().unwrap();
    let mut bfs = Bfs::new(&graph);

    bfs.run(VertexId(0), VertexId(3), true);
    let (path, found) = bfs.reconstruct(VertexId(0), VertexId(3));

    assert!(found);
    assert_eq!(path.len(), 4);
}

#[test]
fn dfs_finds_some_path_to_target() {
    let graph = GraphBuilder::new(two_road_junction()).build().unwrap();
    let mut dfs = Dfs::new(&graph);

    dfs.run(VertexId(0), VertexId(3), true);
    let (path, found) = dfs.reconstruct(VertexId(0), VertexId(3));

    assert!(found);
    assert_eq!(*path.first().unwrap(), VertexId(0));
    assert_eq!(*path.last().unwrap(), VertexId(3));
}

#[test]
fn dijkstra_size_of_reflects_allocated_state() {
    use route_core::Sizable;

    let graph = GraphBuilder::new(two_road_junction()).build().unwrap();
    let weight = Shortest;
    let mut search = Dijkstra::new(&graph, &weight);

    let before = search.size_of();
    search.run(VertexId(0), VertexId(3), true);
    let after = search.size_of();

    assert!(after >= before);
    assert!(after > 0);
}

#[test]
fn angle_is_zero_for_a_straight_segment() {
    let prev = pt(0.0, 0.0);
    let from = pt(1.0, 0.0);
    let to = pt(2.0, 0.0);
    assert!(angle(from, to, prev) < 1e-3);
}

#[test]
fn angle_is_nonzero_for_a_sharp_turn() {
    let prev = pt(0.0, 0.0);
    let from = pt(1.0, 0.0);
    let to = pt(1.0, 1.0);
    assert!(angle(from, to, prev) > 1.0);
}

#[test]
fn fastest_weight_penalizes_sharp_turns() {
    use crate::weights::Weight;

    // A straight road through three points vs. one with a sharp turn at
    // the middle point; the turning graph's edge should cost more.
    let straight = GraphBuilder::new(vec![road(0, vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0)])])
        .build()
        .unwrap();
    let turning = GraphBuilder::new(vec![road(0, vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0)])])
        .build()
        .unwrap();

    let fastest = Fastest;
    let straight_cost = fastest.get(&straight, VertexId(1), VertexId(2), Some(VertexId(0)));
    let turning_cost = fastest.get(&turning, VertexId(1), VertexId(2), Some(VertexId(0)));

    assert!(turning_cost > straight_cost);
}

#[test]
fn coefficients_parse_accepts_mixed_separators() {
    let c = Coefficients::parse("1,2|3,4|5|6,7").unwrap();
    assert_eq!(
        c,
        Coefficients {
            slow: 1.0,
            time: 2.0,
            distance: 3.0,
            turn_penalty: 4.0,
            nonroad_penalty: 5.0,
            rating: 6.0,
            tolls: 7.0,
        }
    );
}

#[test]
fn coefficients_parse_rejects_wrong_field_count() {
    assert!(Coefficients::parse("1,2,3").is_err());
}

#[test]
fn coefficients_parse_rejects_non_numeric_field() {
    assert!(Coefficients::parse("1,2,3,4,5,6,banana").is_err());
}

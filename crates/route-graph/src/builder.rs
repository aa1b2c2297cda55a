//! Turns a flat list of [`Road`]s into a navigable [`Graph`].
//!
//! Construction happens in three passes:
//!
//! 1. **Flatten**: every road's coordinate points become dense [`Vertex`]
//!    entries in one arena, recording each road's vertex-index span.
//! 2. **Intra-road edges**: connect consecutive points of each road (directed
//!    if `oneway`, bidirectional otherwise); roundabouts additionally close
//!    the ring, connecting the last point back to the first.
//! 3. **Junction merge**: roads that happen to share a coordinate (to within
//!    a metre, after quantized-hash bucketing) get bidirectional edges
//!    between their matching vertices, so a search can cross from one road
//!    onto another at an intersection.
//!
//! This mirrors the reference implementation's `loader::construct` /
//! `loader::construct_graph` two-phase approach: flatten-and-connect, then
//! resolve cross-road junctions by coordinate proximity rather than shared
//! OSM node ids (which this crate's [`Road`] model doesn't carry).

use std::collections::HashMap;

use route_core::{Road, RoadId, VertexId};

use crate::error::GraphResult;
use crate::graph::{AdjList, AdjMatrix, Graph, GraphBackend, GraphBackendKind, Vertex};

/// Distance, in metres, within which two road endpoints are considered the
/// same junction.
const JUNCTION_TOLERANCE_M: f32 = 1.0;

/// How to treat a junction where exactly one of the two roads is a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JunctionPolicy {
    /// Connect every coincident pair of points, bridges included.
    #[default]
    Always,
    /// Skip the merge when exactly one side is a bridge — an overpass
    /// passing over a road at the same coordinate shouldn't let traffic jump
    /// between the two.
    SuppressMixedBridge,
}

/// Builds a [`Graph`] from a flat road list.
pub struct GraphBuilder {
    roads: Vec<Road>,
    backend_kind: GraphBackendKind,
    junction_policy: JunctionPolicy,
}

impl GraphBuilder {
    pub fn new(roads: Vec<Road>) -> Self {
        Self {
            roads,
            backend_kind: GraphBackendKind::List,
            junction_policy: JunctionPolicy::default(),
        }
    }

    pub fn backend(mut self, kind: GraphBackendKind) -> Self {
        self.backend_kind = kind;
        self
    }

    pub fn junction_policy(mut self, policy: JunctionPolicy) -> Self {
        self.junction_policy = policy;
        self
    }

    /// Build the graph. Returns [`crate::error::GraphError::ResourceWarning`]
    /// up front if an [`AdjMatrix`] backend was requested and the vertex
    /// count would make the `N*N` allocation impractically large — it's up
    /// to the caller (typically a CLI) to decide whether to proceed anyway,
    /// fall back to a list backend, or abort.
    pub fn build(self) -> GraphResult<Graph> {
        let vertex_count: usize = self.roads.iter().map(|r| r.points.len()).sum();

        if self.backend_kind == GraphBackendKind::Matrix {
            let bytes = AdjMatrix::estimate_bytes(vertex_count);
            const RESOURCE_WARNING_BYTES: u64 = 1 << 30; // 1 GiB
            if bytes > RESOURCE_WARNING_BYTES {
                return Err(crate::error::GraphError::ResourceWarning {
                    vertices: vertex_count,
                    bytes,
                });
            }
        }

        let mut vertices = Vec::with_capacity(vertex_count);
        // Vertex-index span `[start, end)` covered by each road, in road order.
        let mut spans = Vec::with_capacity(self.roads.len());

        // `Vertex.road` must stay a dense position in `self.roads`, not `road.id`
        // — `Road.id` is whatever id the map file carried (or a positional
        // fallback), and may be sparse once parsed ids are out of file order.
        for (road_idx, road) in self.roads.iter().enumerate() {
            let start = vertices.len();
            for point_idx in 0..road.points.len() {
                vertices.push(Vertex {
                    road: RoadId(road_idx as u32),
                    point_idx: point_idx as u32,
                });
            }
            spans.push((start, vertices.len()));
        }

        let mut backend: Box<dyn GraphBackend> = match self.backend_kind {
            GraphBackendKind::List => Box::new(AdjList::new(vertex_count)),
            GraphBackendKind::Matrix => Box::new(AdjMatrix::new(vertex_count)),
        };

        for (road, &(start, end)) in self.roads.iter().zip(&spans) {
            connect_intra_road(backend.as_mut(), road, start, end);
        }

        merge_junctions(backend.as_mut(), &self.roads, &spans, self.junction_policy);

        Ok(Graph::new(self.roads, vertices, backend))
    }
}

fn connect_intra_road(backend: &mut dyn GraphBackend, road: &Road, start: usize, end: usize) {
    if end - start < 2 {
        return;
    }

    for i in start..end - 1 {
        let a = VertexId(i as u32);
        let b = VertexId((i + 1) as u32);
        if road.oneway {
            backend.edge(a, b);
        } else {
            backend.b_edge(a, b);
        }
    }

    if road.roundabout {
        let first = VertexId(start as u32);
        let last = VertexId((end - 1) as u32);
        backend.edge(last, first);
    }
}

/// Buckets every vertex by its point's [`route_core::Point::quantized_hash`],
/// then within each bucket connects pairs that are actually
/// [`route_core::Point::within`] tolerance — the hash narrows candidates
/// without a full quadratic scan, and the distance check guards against hash
/// collisions.
fn merge_junctions(
    backend: &mut dyn GraphBackend,
    roads: &[Road],
    spans: &[(usize, usize)],
    policy: JunctionPolicy,
) {
    // Direct vertex -> owning-road-index lookup, avoiding a span scan per vertex below.
    let vertex_count = spans.last().map(|&(_, end)| end).unwrap_or(0);
    let mut owner = vec![0usize; vertex_count];
    for (road_idx, &(start, end)) in spans.iter().enumerate() {
        owner[start..end].fill(road_idx);
    }

    let mut buckets: HashMap<u64, Vec<VertexId>> = HashMap::new();
    for (road, &(start, end)) in roads.iter().zip(spans) {
        for (offset, point) in road.points.iter().enumerate() {
            debug_assert!(start + offset < end);
            let v = VertexId((start + offset) as u32);
            buckets.entry(point.quantized_hash()).or_default().push(v);
        }
    }

    for candidates in buckets.values() {
        for i in 0..candidates.len() {
            for j in i + 1..candidates.len() {
                let a = candidates[i];
                let b = candidates[j];

                let road_a_idx = owner[a.index()];
                let road_b_idx = owner[b.index()];
                if road_a_idx == road_b_idx {
                    continue;
                }

                let road_a = &roads[road_a_idx];
                let road_b = &roads[road_b_idx];

                if policy == JunctionPolicy::SuppressMixedBridge && road_a.bridge != road_b.bridge {
                    continue;
                }

                let pa = road_a.points[a.index() - spans[road_a_idx].0];
                let pb = road_b.points[b.index() - spans[road_b_idx].0];
                if route_core::Point::within(pa, pb, JUNCTION_TOLERANCE_M) {
                    backend.b_edge(a, b);
                }
            }
        }
    }
}

//! Graph representation: pluggable backends behind one owning facade.
//!
//! # Data layout
//!
//! A [`Graph`] owns the road arena, a dense vertex table (one entry per
//! coordinate point across every road, after construction), and a spatial
//! index for nearest-vertex snapping. Each [`Vertex`] points back into the
//! arena by `(RoadId, point index)` rather than holding a pointer — the
//! graph owns everything for its whole lifetime, so an index is cheaper and
//! safer than a reference with a lifetime parameter.
//!
//! Two backends implement the actual adjacency storage:
//! [`AdjList`] (a `HashSet` per vertex, deduplicating parallel edges) and
//! [`AdjMatrix`] (an `N*N` matrix — memory-expensive, offered for parity
//! with the reference implementation and for small maps where O(1) edge
//! lookup matters more than memory).

use std::collections::HashSet;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use route_core::{Point, Road, RoadId, Sizable, VertexId};

use crate::error::{GraphError, GraphResult};

/// One coordinate point of one road, after flattening every road into a
/// single dense vertex list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    pub road: RoadId,
    pub point_idx: u32,
}

/// Which backend a [`Graph`] should use for adjacency storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphBackendKind {
    List,
    Matrix,
}

/// Adjacency storage, abstracted so [`Graph`] doesn't care which
/// representation backs it. Mirrors `GraphRepresentation` distinguishing
/// `LGraph` (list) from `MGraph` (matrix) in the original implementation.
pub trait GraphBackend: Sizable {
    fn adjacent(&self, v: VertexId) -> Vec<VertexId>;
    fn edge(&mut self, from: VertexId, to: VertexId);

    /// Bidirectional edge; default adds both directions via [`edge`](Self::edge).
    fn b_edge(&mut self, a: VertexId, b: VertexId) {
        self.edge(a, b);
        self.edge(b, a);
    }
}

/// Adjacency list: one deduplicating set of neighbours per vertex.
pub struct AdjList {
    edges: Vec<HashSet<VertexId>>,
}

impl AdjList {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            edges: (0..vertex_count).map(|_| HashSet::new()).collect(),
        }
    }
}

impl Sizable for AdjList {
    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
            + self
                .edges
                .iter()
                .map(|s| s.capacity() * std::mem::size_of::<VertexId>())
                .sum::<usize>()
    }
}

impl GraphBackend for AdjList {
    fn adjacent(&self, v: VertexId) -> Vec<VertexId> {
        self.edges[v.index()].iter().copied().collect()
    }

    fn edge(&mut self, from: VertexId, to: VertexId) {
        self.edges[from.index()].insert(to);
    }
}

/// Adjacency matrix: `N*N` entries, `-1` meaning "no edge". Memory usage
/// grows quadratically with vertex count — see
/// [`GraphError::ResourceWarning`].
pub struct AdjMatrix {
    n: usize,
    matrix: Vec<i64>,
}

impl AdjMatrix {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            n: vertex_count,
            matrix: vec![-1; vertex_count * vertex_count],
        }
    }

    #[inline]
    fn idx(&self, from: VertexId, to: VertexId) -> usize {
        from.index() * self.n + to.index()
    }

    /// Estimated byte size of the `N*N` matrix a given vertex count would
    /// allocate, for the pre-construction resource warning.
    pub fn estimate_bytes(vertex_count: usize) -> u64 {
        (vertex_count as u64) * (vertex_count as u64) * std::mem::size_of::<i64>() as u64
    }
}

impl Sizable for AdjMatrix {
    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>() + self.matrix.len() * std::mem::size_of::<i64>()
    }
}

impl GraphBackend for AdjMatrix {
    fn adjacent(&self, v: VertexId) -> Vec<VertexId> {
        let row_start = v.index() * self.n;
        (0..self.n)
            .filter(|&to| self.matrix[row_start + to] >= 0)
            .map(|to| VertexId(to as u32))
            .collect()
    }

    fn edge(&mut self, from: VertexId, to: VertexId) {
        let idx = self.idx(from, to);
        self.matrix[idx] = to.0 as i64;
    }
}

// ── Spatial index entry ────────────────────────────────────────────────────────

#[derive(Clone)]
struct VertexEntry {
    point: [f32; 2], // [lon, lat]
    id: VertexId,
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for VertexEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlon = self.point[0] - point[0];
        let dlat = self.point[1] - point[1];
        dlon * dlon + dlat * dlat
    }
}

// ── Graph ───────────────────────────────────────────────────────────────────────

/// A directed graph over road-network vertices: the road arena, the dense
/// vertex table, a pluggable adjacency backend, and an R-tree for snapping
/// arbitrary coordinates to the nearest vertex.
///
/// Construct via [`crate::builder::GraphBuilder`]; this type has no public
/// constructor of its own.
pub struct Graph {
    roads: Vec<Road>,
    vertices: Vec<Vertex>,
    backend: Box<dyn GraphBackend>,
    spatial_idx: RTree<VertexEntry>,
}

impl Graph {
    pub(crate) fn new(roads: Vec<Road>, vertices: Vec<Vertex>, backend: Box<dyn GraphBackend>) -> Self {
        let entries: Vec<VertexEntry> = vertices
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let p = roads[v.road.index()].points[v.point_idx as usize];
                VertexEntry {
                    point: [p.lon, p.lat],
                    id: VertexId(i as u32),
                }
            })
            .collect();

        Self {
            roads,
            vertices,
            backend,
            spatial_idx: RTree::bulk_load(entries),
        }
    }

    /// Number of vertices in the graph.
    pub fn size(&self) -> usize {
        self.vertices.len()
    }

    /// `true` if `v` indexes a real vertex.
    pub fn contains(&self, v: VertexId) -> bool {
        v.index() < self.vertices.len()
    }

    /// Neighbours of `v`. Never includes `v` itself.
    pub fn adjacent(&self, v: VertexId) -> Vec<VertexId> {
        self.backend.adjacent(v)
    }

    /// Add a directed edge `from -> to`.
    pub fn edge(&mut self, from: VertexId, to: VertexId) {
        self.backend.edge(from, to);
    }

    /// Add edges in both directions.
    pub fn b_edge(&mut self, a: VertexId, b: VertexId) {
        self.backend.b_edge(a, b);
    }

    pub fn vertex(&self, v: VertexId) -> GraphResult<&Vertex> {
        self.vertices.get(v.index()).ok_or(GraphError::NodeNotFound(v))
    }

    /// Road that `v` belongs to.
    pub fn road_of(&self, v: VertexId) -> &Road {
        &self.roads[self.vertices[v.index()].road.index()]
    }

    /// Geographic position of `v`.
    pub fn point_of(&self, v: VertexId) -> Point {
        let vtx = self.vertices[v.index()];
        self.roads[vtx.road.index()].points[vtx.point_idx as usize]
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Nearest vertex to `pos`, used to snap user-supplied source/destination
    /// coordinates onto the graph. `None` only for an empty graph.
    pub fn nearest_vertex(&self, pos: Point) -> Option<VertexId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lon, pos.lat])
            .map(|e| e.id)
    }
}

impl Sizable for Graph {
    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.vertices.len() * std::mem::size_of::<Vertex>()
            + self.backend.size_of()
    }
}

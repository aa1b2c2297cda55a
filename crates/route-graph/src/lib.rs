//! Road-network graph: construction, edge weights, and search.
//!
//! | module       | contents                                                |
//! |--------------|----------------------------------------------------------|
//! | [`graph`]    | [`Graph`] facade, [`AdjList`]/[`AdjMatrix`] backends      |
//! | [`builder`]  | [`GraphBuilder`], flattening roads into a navigable graph |
//! | [`weights`]  | [`Weight`] implementations: [`Shortest`], [`Fastest`], [`Custom`] |
//! | [`search`]   | [`Search`] implementations: [`Dijkstra`], [`AStar`], [`Bfs`], [`Dfs`] |
//! | [`trace`]    | [`Trace`], a replayable visitation ledger                 |
//! | [`io`]       | GeoJSONL parsing and the binary road cache                |
//! | [`error`]    | [`GraphError`]                                            |

pub mod builder;
pub mod error;
pub mod graph;
pub mod io;
pub mod search;
pub mod trace;
pub mod weights;

pub use builder::{GraphBuilder, JunctionPolicy};
pub use error::{GraphError, GraphResult};
pub use graph::{AdjList, AdjMatrix, Graph, GraphBackend, GraphBackendKind, Vertex};
pub use io::{load_roads, parse_geojson_line, read_cache, write_cache};
pub use search::{AStar, Bfs, Dfs, Dijkstra, Search};
pub use trace::Trace;
pub use weights::{create, Coefficients, Custom, Fastest, Heuristic, RouteOpt, Shortest, Weight};

#[cfg(test)]
mod tests;

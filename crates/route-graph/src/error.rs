//! Graph-subsystem error type.

use thiserror::Error;

use route_core::{CoreError, VertexId};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no route from {source} to {target}")]
    NoRoute { source: VertexId, target: VertexId },

    #[error("vertex {0} not found in graph")]
    NodeNotFound(VertexId),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("adjacency matrix for {vertices} vertices would allocate {bytes} bytes")]
    ResourceWarning { vertices: usize, bytes: u64 },

    #[error(transparent)]
    Parse(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;

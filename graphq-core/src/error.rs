//! Error types for graph construction and queries

use thiserror::Error;

/// Errors that can occur while building or querying a graph
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// Vertex is not a member of the graph
    #[error("Unknown vertex {0}")]
    UnknownVertex(String),

    /// Edge endpoints must be distinct
    #[error("Self-loop on vertex {0} is not allowed")]
    SelfLoop(String),

    /// Edge weights must be positive and finite
    #[error("Invalid edge weight {weight}: weights must be positive and finite")]
    InvalidWeight { weight: f64 },

    /// Operation requires at least one vertex
    #[error("Graph has no vertices")]
    EmptyGraph,

    /// Operation requires a connected graph
    #[error("Graph is not connected: {components} components")]
    Disconnected { components: usize },

    /// Side assignment does not cover the vertex set
    #[error("Side assignment has {actual} entries, graph has {expected} vertices")]
    AssignmentMismatch { expected: usize, actual: usize },

    /// Invalid generator argument
    #[error("Invalid generator parameter: {0}")]
    InvalidParameter(String),
}

impl GraphError {
    /// Create an unknown vertex error from any debuggable vertex id
    pub fn unknown_vertex<V: std::fmt::Debug>(vertex: &V) -> Self {
        Self::UnknownVertex(format!("{:?}", vertex))
    }

    /// Create a self-loop error from any debuggable vertex id
    pub fn self_loop<V: std::fmt::Debug>(vertex: &V) -> Self {
        Self::SelfLoop(format!("{:?}", vertex))
    }
}

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_vertex_error() {
        let err = GraphError::unknown_vertex(&7usize);
        let msg = format!("{}", err);
        assert!(msg.contains("7"));
    }

    #[test]
    fn test_invalid_weight_error() {
        let err = GraphError::InvalidWeight { weight: -2.5 };
        assert!(err.to_string().contains("-2.5"));
    }

    #[test]
    fn test_disconnected_error() {
        let err = GraphError::Disconnected { components: 3 };
        assert!(err.to_string().contains("3 components"));
    }
}

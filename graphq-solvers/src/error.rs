//! Error types for the Max-Cut and TSP solvers

use graphq_core::GraphError;
use thiserror::Error;

/// Errors that can occur while solving
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    /// Maximum cut is undefined without vertices
    #[error("Graph has no vertices")]
    EmptyGraph,

    /// Exact search space does not fit the enumeration index
    #[error("Exact {solver} search supports at most {max} vertices, graph has {actual}")]
    TooManyVertices {
        solver: &'static str,
        max: usize,
        actual: usize,
    },

    /// Consecutive tour vertices are not joined by an edge
    #[error("Tour requires missing edge between vertex indices {from} and {to}")]
    TourInfeasible { from: usize, to: usize },

    /// Invalid solver argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Underlying graph query failed
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result type for solver operations
pub type Result<T> = std::result::Result<T, SolverError>;

//! Error types for the QAOA objective, search and count decoding

use graphq_core::GraphError;
use thiserror::Error;

/// Errors that can occur in QAOA parameter search or count decoding
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QaoaError {
    /// Invalid search configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Bitstring cannot be decoded against the graph
    #[error("Malformed bitstring '{bitstring}': {reason}")]
    MalformedBitstring { bitstring: String, reason: String },

    /// Expectation over zero shots is undefined
    #[error("Measurement counts contain no shots")]
    NoShots,

    /// Underlying graph query failed
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl QaoaError {
    /// Create a malformed bitstring error
    pub fn malformed(bitstring: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedBitstring {
            bitstring: bitstring.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for QAOA operations
pub type Result<T> = std::result::Result<T, QaoaError>;

//! Graph model and cut evaluation for graphq
//!
//! This crate holds the read-only substrate every graphq solver works on:
//!
//! - **[`Graph`]**: weighted undirected graph with stable vertex order,
//!   degree / common-neighbor queries, connectivity and minimum spanning trees
//! - **[`CutEvaluator`]**: weight of edges crossing a [`Bipartition`], plus the
//!   incremental move gain used by local search
//! - **[`generators`]**: random and path builders driven by a caller RNG
//!
//! # Example
//!
//! ```
//! use graphq_core::{CutEvaluator, Graph};
//!
//! let graph = Graph::cycle(4);
//! let eval = CutEvaluator::new(&graph);
//!
//! let weight = eval.cut_weight(&[0, 2], &[1, 3])?;
//! assert_eq!(weight, 4.0);
//! # Ok::<(), graphq_core::GraphError>(())
//! ```

pub mod cut;
pub mod error;
pub mod generators;
pub mod graph;

pub use cut::{Bipartition, CutEvaluator};
pub use error::{GraphError, Result};
pub use graph::Graph;

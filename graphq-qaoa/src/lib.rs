//! Analytic depth-1 QAOA for weighted Max-Cut
//!
//! For p = 1 the expected cut of the QAOA state has a closed form in the
//! two circuit angles, so parameter tuning needs no simulator: this crate
//! evaluates that form, searches it, and decodes the bitstring counts an
//! external executor returns for the tuned circuit.
//!
//! # Features
//!
//! - **Closed-form objective**: O(|E|) per evaluation from precomputed
//!   degrees and triangle counts
//! - **Grid + refinement search**: deterministic row-major grid scan,
//!   optionally on rayon, followed by a pluggable bounded [`Refiner`]
//! - **Nelder-Mead** (`refine` feature, on by default)
//! - **Counts boundary**: empirical expected cut from measured bitstrings
//!
//! # Example
//!
//! ```
//! use graphq_core::Graph;
//! use graphq_qaoa::{QaoaObjective, QaoaOptimizer, SearchConfig};
//!
//! let graph = Graph::cycle(4);
//! let objective = QaoaObjective::new(&graph);
//! let optimizer = QaoaOptimizer::new(objective);
//!
//! let result = optimizer.search(&SearchConfig::new().with_grid_res(10))?;
//! assert!(result.value > graph.total_weight() / 2.0);
//! assert!(result.value <= graph.total_weight());
//! # Ok::<(), graphq_qaoa::QaoaError>(())
//! ```

pub mod config;
pub mod counts;
pub mod error;
#[cfg(feature = "refine")]
pub mod nelder_mead;
pub mod objective;
pub mod optimizer;
pub mod refiner;

pub use config::{RefinementPolicy, SearchConfig};
pub use counts::{
    best_sampled_cut, empirical_expected_cut, sample_cut, sample_partition, BitOrder,
    MeasurementCounts, SampledCut,
};
pub use error::{QaoaError, Result};
#[cfg(feature = "refine")]
pub use nelder_mead::{NelderMead, NelderMeadConfig};
pub use objective::{EdgeStatistics, QaoaObjective};
pub use optimizer::{GridPoint, QaoaOptimizer, RefinementStatus, SearchResult};
pub use refiner::{RefinementOutcome, Refiner};

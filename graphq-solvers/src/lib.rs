//! Exact and heuristic solvers for Max-Cut and the Traveling Salesman Problem
//!
//! Both solver families borrow a [`graphq_core::Graph`] read-only and are
//! independent of each other.
//!
//! # Features
//!
//! - **Max-Cut**: exhaustive 2ⁿ enumeration, random sampling, first-improvement
//!   local search
//! - **TSP**: exhaustive n! enumeration, nearest neighbor, MST preorder
//! - **Explicit randomness**: heuristics take a caller-owned `rand::Rng`
//! - **Value-based infeasibility**: missing tours are reported as
//!   [`TourSolution::none`] rather than errors
//!
//! # Example
//!
//! ```
//! use graphq_core::Graph;
//! use graphq_solvers::{MaxCutSolver, TspSolver};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let graph = Graph::complete(4);
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let exact = MaxCutSolver::new(&graph).max_cut_bruteforce()?;
//! let local = MaxCutSolver::new(&graph).max_cut_local_search(100, &mut rng)?;
//! assert!(exact.weight >= local.weight);
//!
//! let tour = TspSolver::new(&graph).tsp_nearest_neighbor(None)?;
//! assert_eq!(tour.cost, 4.0);
//! # Ok::<(), graphq_solvers::SolverError>(())
//! ```

pub mod config;
pub mod error;
pub mod maxcut;
pub mod permutation;
pub mod tsp;

pub use config::{ShortcutPolicy, SolverConfig};
pub use error::{Result, SolverError};
pub use maxcut::{MaxCutSolution, MaxCutSolver};
pub use tsp::{TourSolution, TspSolver};

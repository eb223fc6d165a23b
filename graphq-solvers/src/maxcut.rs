//! Maximum weighted cut solvers
//!
//! - **Exact**: enumerates all 2ⁿ side assignments as bitmasks
//! - **Random sampling**: best of many random near-balanced splits
//! - **Local search**: first-improvement S→T moves from a random balanced split
//!
//! The heuristics take the random source as an argument so runs are
//! reproducible from a seed and independent between callers.
//!
//! # Example
//!
//! ```
//! use graphq_core::Graph;
//! use graphq_solvers::MaxCutSolver;
//!
//! let graph = Graph::cycle(4);
//! let solution = MaxCutSolver::new(&graph).max_cut_bruteforce()?;
//! assert_eq!(solution.weight, 4.0);
//! # Ok::<(), graphq_solvers::SolverError>(())
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use graphq_core::{Bipartition, CutEvaluator, Graph};
use log::{debug, trace};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::error::{Result, SolverError};

/// A bipartition together with its cut weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxCutSolution<V> {
    /// The `(S, T)` split
    pub partition: Bipartition<V>,
    /// Total weight of edges crossing the split
    pub weight: f64,
}

/// Max-Cut solver over a borrowed graph
#[derive(Debug)]
pub struct MaxCutSolver<'g, V> {
    graph: &'g Graph<V>,
    config: SolverConfig,
}

impl<'g, V> MaxCutSolver<'g, V>
where
    V: Clone + Eq + Hash + Debug,
{
    /// Create a solver with the default configuration
    pub fn new(graph: &'g Graph<V>) -> Self {
        Self::with_config(graph, SolverConfig::default())
    }

    /// Create a solver with a custom configuration
    pub fn with_config(graph: &'g Graph<V>, config: SolverConfig) -> Self {
        Self { graph, config }
    }

    /// Solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Exact maximum cut by exhaustive enumeration
    ///
    /// Assignments are visited in lexicographic bit-pattern order with the
    /// first vertex as the most significant position; bit 0 places a vertex
    /// in S. The first assignment reaching a strictly larger weight is kept,
    /// so ties resolve to the earliest pattern.
    pub fn max_cut_bruteforce(&self) -> Result<MaxCutSolution<V>> {
        let n = self.graph.num_vertices();
        if n == 0 {
            return Err(SolverError::EmptyGraph);
        }
        let limit = self.config.exact_cut_limit();
        if n > limit {
            return Err(SolverError::TooManyVertices {
                solver: "Max-Cut",
                max: limit,
                actual: n,
            });
        }

        let edges = self.graph.indexed_edges();
        let shift = |i: usize| n - 1 - i;
        let mut best_mask = 0u64;
        let mut best_weight = -1.0;

        for mask in 0..(1u64 << n) {
            let weight: f64 = edges
                .iter()
                .filter(|&&(i, j, _)| ((mask >> shift(i)) ^ (mask >> shift(j))) & 1 == 1)
                .map(|&(_, _, w)| w)
                .sum();
            if weight > best_weight {
                trace!("bruteforce: mask {:#b} improves to {}", mask, weight);
                best_weight = weight;
                best_mask = mask;
            }
        }

        let sides: Vec<bool> = (0..n).map(|i| (best_mask >> shift(i)) & 1 == 1).collect();
        debug!(
            "bruteforce max cut over {} vertices: weight {}",
            n, best_weight
        );
        self.solution(&sides, best_weight)
    }

    /// Best cut among `trials` random near-balanced splits
    ///
    /// Each trial draws S uniformly among subsets of size ⌊n/2⌋ (or, with
    /// size jitter, of a size drawn from {⌊n/2⌋−1, ⌊n/2⌋, ⌊n/2⌋+1}). The
    /// earliest trial reaching the maximum is returned.
    pub fn max_cut_random<R>(&self, trials: usize, rng: &mut R) -> Result<MaxCutSolution<V>>
    where
        R: Rng + ?Sized,
    {
        let n = self.graph.num_vertices();
        if n == 0 {
            return Err(SolverError::EmptyGraph);
        }
        if trials == 0 {
            return Err(SolverError::InvalidArgument(
                "trials must be > 0".to_string(),
            ));
        }

        let eval = CutEvaluator::new(self.graph);
        let mut best_sides = Vec::new();
        let mut best_weight = -1.0;
        let mut sides = vec![true; n];

        for trial in 0..trials {
            let size = self.sample_size(n, rng);
            sides.iter_mut().for_each(|side| *side = true);
            for i in index::sample(rng, n, size) {
                sides[i] = false;
            }

            let weight = eval.cut_weight_sides(&sides);
            if weight > best_weight {
                trace!("random: trial {} improves to {}", trial, weight);
                best_weight = weight;
                best_sides.clone_from(&sides);
            }
        }

        debug!(
            "random max cut over {} trials: weight {}",
            trials, best_weight
        );
        self.solution(&best_sides, best_weight)
    }

    /// Local optimum reached by first-improvement moves from S to T
    ///
    /// Starts from a random ⌊n/2⌋-subset S. Each outer iteration scans S in
    /// vertex order and commits the first move that strictly increases the
    /// cut, then rescans. Stops at a local optimum or after `iterations`
    /// outer iterations.
    pub fn max_cut_local_search<R>(
        &self,
        iterations: usize,
        rng: &mut R,
    ) -> Result<MaxCutSolution<V>>
    where
        R: Rng + ?Sized,
    {
        let n = self.graph.num_vertices();
        if n == 0 {
            return Err(SolverError::EmptyGraph);
        }

        let eval = CutEvaluator::new(self.graph);
        let mut sides = vec![true; n];
        for i in index::sample(rng, n, n / 2) {
            sides[i] = false;
        }

        let mut moves = 0;
        let mut converged = false;
        for _ in 0..iterations {
            let candidate = (0..n).find(|&i| !sides[i] && eval.move_gain(&sides, i) > 0.0);
            match candidate {
                Some(i) => {
                    trace!("local search: moving vertex index {} to T", i);
                    sides[i] = true;
                    moves += 1;
                }
                None => {
                    converged = true;
                    break;
                }
            }
        }

        let weight = eval.cut_weight_sides(&sides);
        debug!(
            "local search: {} moves, weight {}, local optimum {}",
            moves, weight, converged
        );
        self.solution(&sides, weight)
    }

    fn sample_size<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> usize {
        let half = n / 2;
        if !self.config.size_jitter {
            return half;
        }
        match rng.gen_range(0..3) {
            0 => half.saturating_sub(1),
            1 => half,
            _ => (half + 1).min(n),
        }
    }

    fn solution(&self, sides: &[bool], weight: f64) -> Result<MaxCutSolution<V>> {
        let partition = CutEvaluator::new(self.graph).bipartition(sides)?;
        Ok(MaxCutSolution { partition, weight })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn triangle() -> Graph {
        Graph::from_edges(0..3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)]).unwrap()
    }

    #[test]
    fn test_bruteforce_triangle() {
        let graph = triangle();
        let solution = MaxCutSolver::new(&graph).max_cut_bruteforce().unwrap();
        assert_eq!(solution.weight, 2.0);
        // 001 is the first pattern cutting two edges
        assert_eq!(solution.partition.s, vec![0, 1]);
        assert_eq!(solution.partition.t, vec![2]);
    }

    #[test]
    fn test_bruteforce_empty_graph() {
        let graph: Graph = Graph::new();
        assert_eq!(
            MaxCutSolver::new(&graph).max_cut_bruteforce().unwrap_err(),
            SolverError::EmptyGraph
        );
    }

    #[test]
    fn test_bruteforce_edgeless_graph_keeps_first_pattern() {
        let mut graph = Graph::new();
        graph.add_vertex(0);
        graph.add_vertex(1);
        let solution = MaxCutSolver::new(&graph).max_cut_bruteforce().unwrap();
        assert_eq!(solution.weight, 0.0);
        assert_eq!(solution.partition.s, vec![0, 1]);
        assert!(solution.partition.t.is_empty());
    }

    #[test]
    fn test_bruteforce_respects_vertex_limit() {
        let graph = Graph::path(6);
        let config = SolverConfig::new().with_max_exact_cut_vertices(5);
        let err = MaxCutSolver::with_config(&graph, config)
            .max_cut_bruteforce()
            .unwrap_err();
        assert!(matches!(err, SolverError::TooManyVertices { actual: 6, .. }));
    }

    #[test]
    fn test_bruteforce_caps_unvalidated_limit() {
        let graph = Graph::path(64);
        let config = SolverConfig::new().with_max_exact_cut_vertices(64);
        assert!(config.validate().is_err());

        let err = MaxCutSolver::with_config(&graph, config)
            .max_cut_bruteforce()
            .unwrap_err();
        assert_eq!(
            err,
            SolverError::TooManyVertices {
                solver: "Max-Cut",
                max: 63,
                actual: 64,
            }
        );
    }

    #[test]
    fn test_heuristics_reject_empty_graph() {
        let graph: Graph = Graph::new();
        let solver = MaxCutSolver::new(&graph);
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(
            solver.max_cut_local_search(10, &mut rng).unwrap_err(),
            SolverError::EmptyGraph
        );
        assert_eq!(
            solver.max_cut_random(10, &mut rng).unwrap_err(),
            SolverError::EmptyGraph
        );
    }

    #[test]
    fn test_random_rejects_zero_trials() {
        let graph = triangle();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            MaxCutSolver::new(&graph).max_cut_random(0, &mut rng),
            Err(SolverError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_random_uses_half_size_subsets() {
        let graph = Graph::cycle(6);
        let mut rng = StdRng::seed_from_u64(12);
        let solution = MaxCutSolver::new(&graph).max_cut_random(200, &mut rng).unwrap();
        assert_eq!(solution.partition.s.len(), 3);
        assert_eq!(solution.partition.t.len(), 3);
        assert_eq!(solution.weight, 6.0);
    }

    #[test]
    fn test_random_with_jitter_stays_near_half() {
        let graph = Graph::complete(7);
        let solver =
            MaxCutSolver::with_config(&graph, SolverConfig::new().with_size_jitter(true));
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..20 {
            let solution = solver.max_cut_random(1, &mut rng).unwrap();
            assert!((2..=4).contains(&solution.partition.s.len()));
        }
    }

    #[test]
    fn test_local_search_reaches_local_optimum() {
        let graph = Graph::star(5);
        let mut rng = StdRng::seed_from_u64(3);
        let solution = MaxCutSolver::new(&graph)
            .max_cut_local_search(100, &mut rng)
            .unwrap();

        // No single S -> T move may improve the returned split
        let eval = CutEvaluator::new(&graph);
        let sides: Vec<bool> = graph
            .vertices()
            .iter()
            .map(|v| solution.partition.t.contains(v))
            .collect();
        for i in 0..graph.num_vertices() {
            if !sides[i] {
                assert!(eval.move_gain(&sides, i) <= 0.0);
            }
        }
        assert_eq!(solution.weight, eval.cut_weight_sides(&sides));
    }

    #[test]
    fn test_local_search_zero_iterations_returns_start() {
        let graph = Graph::path(4);
        let mut rng = StdRng::seed_from_u64(8);
        let solution = MaxCutSolver::new(&graph)
            .max_cut_local_search(0, &mut rng)
            .unwrap();
        assert_eq!(solution.partition.s.len(), 2);
    }

    #[test]
    fn test_heuristics_are_reproducible() {
        let graph = Graph::complete(6);
        let solver = MaxCutSolver::new(&graph);
        let a = solver
            .max_cut_random(10, &mut StdRng::seed_from_u64(77))
            .unwrap();
        let b = solver
            .max_cut_random(10, &mut StdRng::seed_from_u64(77))
            .unwrap();
        assert_eq!(a, b);
    }
}

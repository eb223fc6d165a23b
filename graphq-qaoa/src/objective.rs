//! Closed-form expected cut of a depth-1 QAOA circuit
//!
//! For p = 1 the expectation of each edge's cut indicator depends only on
//! the degrees of its endpoints and the number of triangles through the
//! edge. The objective therefore needs no state vector: per-edge statistics
//! are gathered once and every evaluation is O(|E|) trigonometry.

use std::fmt::Debug;
use std::hash::Hash;

use graphq_core::Graph;
use serde::{Deserialize, Serialize};

/// Precomputed per-edge quantities of the p = 1 formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeStatistics {
    /// Index of the first endpoint
    pub u: usize,
    /// Index of the second endpoint
    pub v: usize,
    /// Edge weight
    pub weight: f64,
    /// deg(u) − 1
    pub du: i32,
    /// deg(v) − 1
    pub dv: i32,
    /// Common neighbors of `u` and `v`
    pub triangles: i32,
}

impl EdgeStatistics {
    /// Expected cut indicator of this edge at `(gamma, beta)`, unweighted
    pub fn term(&self, gamma: f64, beta: f64) -> f64 {
        let cos_g = gamma.cos();
        let mixing = 0.25
            * (4.0 * beta).sin()
            * gamma.sin()
            * (guarded_pow(cos_g, self.du) + guarded_pow(cos_g, self.dv));
        let frustration = 0.25
            * (2.0 * beta).sin().powi(2)
            * guarded_pow(cos_g, self.du + self.dv - 2 * self.triangles)
            * (1.0 - guarded_pow((2.0 * gamma).cos(), self.triangles));
        0.5 + mixing - frustration
    }
}

/// `base^exp`, except that a negative exponent contributes 1.0
fn guarded_pow(base: f64, exp: i32) -> f64 {
    if exp < 0 {
        1.0
    } else {
        base.powi(exp)
    }
}

/// Analytic p = 1 QAOA Max-Cut objective over a fixed graph
///
/// # Example
///
/// ```
/// use graphq_core::Graph;
/// use graphq_qaoa::QaoaObjective;
///
/// let triangle = Graph::complete(3);
/// let objective = QaoaObjective::new(&triangle);
/// assert_eq!(objective.expected_cut(0.0, 0.0), 1.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaoaObjective {
    edges: Vec<EdgeStatistics>,
    total_weight: f64,
}

impl QaoaObjective {
    /// Gather edge statistics from `graph`
    pub fn new<V>(graph: &Graph<V>) -> Self
    where
        V: Clone + Eq + Hash + Debug,
    {
        let edges: Vec<EdgeStatistics> = graph
            .indexed_edges()
            .iter()
            .map(|&(u, v, weight)| EdgeStatistics {
                u,
                v,
                weight,
                du: degree_exponent(graph.degree_by_index(u)),
                dv: degree_exponent(graph.degree_by_index(v)),
                triangles: clamp_i32(graph.common_neighbors_by_index(u, v)),
            })
            .collect();
        let total_weight = edges.iter().map(|e| e.weight).sum();

        Self {
            edges,
            total_weight,
        }
    }

    /// Expected cut weight at `(gamma, beta)`
    pub fn expected_cut(&self, gamma: f64, beta: f64) -> f64 {
        self.edges
            .iter()
            .map(|e| e.weight * e.term(gamma, beta))
            .sum()
    }

    /// Weighted contribution of each edge, in the graph's edge order
    pub fn edge_terms(&self, gamma: f64, beta: f64) -> Vec<f64> {
        self.edges
            .iter()
            .map(|e| e.weight * e.term(gamma, beta))
            .collect()
    }

    /// Per-edge statistics, in the graph's edge order
    pub fn edge_statistics(&self) -> &[EdgeStatistics] {
        &self.edges
    }

    /// Sum of all edge weights; the objective never exceeds it
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Number of edges contributing to the objective
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}

fn degree_exponent(degree: usize) -> i32 {
    clamp_i32(degree) - 1
}

fn clamp_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

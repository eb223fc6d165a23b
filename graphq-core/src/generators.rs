//! Graph builders driven by an explicit random source
//!
//! These fill a [`Graph`] the way test fixtures and demos need: a
//! G(n, p) random graph with integer weights, and a path threaded through a
//! given vertex sequence. Randomness always comes from the caller's RNG.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::RangeInclusive;

use log::debug;
use rand::Rng;

use crate::error::{GraphError, Result};
use crate::graph::Graph;

/// Erdős–Rényi G(n, p) graph on vertices `0..n`
///
/// Every pair `(i, j)` with `i < j` is joined with probability `edge_prob`,
/// and each edge draws an integer weight uniformly from `weights`.
pub fn erdos_renyi<R: Rng + ?Sized>(
    num_vertices: usize,
    edge_prob: f64,
    weights: RangeInclusive<u32>,
    rng: &mut R,
) -> Result<Graph> {
    if !(0.0..=1.0).contains(&edge_prob) {
        return Err(GraphError::InvalidParameter(format!(
            "edge probability must be in [0, 1], got {}",
            edge_prob
        )));
    }
    check_weights(&weights)?;

    let mut graph = Graph::new();
    for v in 0..num_vertices {
        graph.add_vertex(v);
    }
    for i in 0..num_vertices {
        for j in (i + 1)..num_vertices {
            if rng.gen_bool(edge_prob) {
                let w = rng.gen_range(weights.clone());
                graph.add_edge(i, j, f64::from(w))?;
            }
        }
    }

    debug!(
        "generated G({}, {}) with {} edges",
        num_vertices,
        edge_prob,
        graph.num_edges()
    );
    Ok(graph)
}

/// Join consecutive vertices of `vertices` into a path
///
/// Pairs that are already adjacent keep their weight; new edges draw an
/// integer weight uniformly from `weights`. Returns the number of edges added.
pub fn add_path<V, R>(
    graph: &mut Graph<V>,
    vertices: &[V],
    weights: RangeInclusive<u32>,
    rng: &mut R,
) -> Result<usize>
where
    V: Clone + Eq + Hash + Debug,
    R: Rng + ?Sized,
{
    check_weights(&weights)?;

    let mut added = 0;
    for pair in vertices.windows(2) {
        if !graph.has_edge(&pair[0], &pair[1]) {
            let w = rng.gen_range(weights.clone());
            graph.add_edge(pair[0].clone(), pair[1].clone(), f64::from(w))?;
            added += 1;
        }
    }
    Ok(added)
}

fn check_weights(weights: &RangeInclusive<u32>) -> Result<()> {
    if weights.is_empty() || *weights.start() == 0 {
        return Err(GraphError::InvalidParameter(format!(
            "weight range must be non-empty and positive, got {:?}",
            weights
        )));
    }
    Ok(())
}

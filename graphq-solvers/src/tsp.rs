//! Traveling Salesman solvers
//!
//! - **Exact**: every permutation of the vertex order, decoded from its rank
//! - **Nearest neighbor**: greedy extension from a start vertex
//! - **MST preorder**: depth-first preorder of a minimum spanning tree
//!
//! Infeasibility is a value, not an error: when no Hamiltonian cycle is
//! found the solvers return [`TourSolution::none`] (no path, infinite cost).
//! Errors are reserved for invalid input and for the strict shortcut policy
//! of the MST tour.

use std::fmt::Debug;
use std::hash::Hash;

use graphq_core::{Graph, GraphError};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::{ShortcutPolicy, SolverConfig};
use crate::error::{Result, SolverError};
use crate::permutation::{decode_permutation, factorial};

/// A Hamiltonian cycle and its cost
///
/// `path` lists each vertex once; the edge from the last vertex back to
/// the first is implied and included in `cost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourSolution<V> {
    /// Visiting order, or `None` when no tour was found
    pub path: Option<Vec<V>>,
    /// Cyclic tour cost, `f64::INFINITY` when no tour was found
    pub cost: f64,
}

impl<V> TourSolution<V> {
    /// The "no tour" sentinel
    pub fn none() -> Self {
        Self {
            path: None,
            cost: f64::INFINITY,
        }
    }

    /// Check whether a tour was found
    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }
}

/// TSP solver over a borrowed graph
#[derive(Debug)]
pub struct TspSolver<'g, V> {
    graph: &'g Graph<V>,
    config: SolverConfig,
}

impl<'g, V> TspSolver<'g, V>
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

    /// Exact minimum tour over all n! vertex orders
    ///
    /// Permutations are visited in lexicographic order of vertex indices.
    /// Orders that need a missing edge are skipped; the first order with a
    /// strictly smaller cost wins.
    pub fn tsp_bruteforce(&self) -> Result<TourSolution<V>> {
        let n = self.graph.num_vertices();
        if n == 0 {
            return Ok(TourSolution::none());
        }
        if n == 1 {
            return Ok(self.tour(&[0], 0.0));
        }
        let limit = self.config.exact_tour_limit();
        let total = match factorial(n) {
            Some(total) if n <= limit => total,
            _ => {
                return Err(SolverError::TooManyVertices {
                    solver: "TSP",
                    max: limit,
                    actual: n,
                })
            }
        };

        let mut pool = Vec::with_capacity(n);
        let mut order = vec![0usize; n];
        let mut best: Option<(Vec<usize>, f64)> = None;

        for rank in 0..total {
            decode_permutation(rank, &mut pool, &mut order);
            let bound = best.as_ref().map_or(f64::INFINITY, |(_, cost)| *cost);
            if let Some(cost) = self.cycle_cost_below(&order, bound) {
                trace!("bruteforce: permutation {} improves to {}", rank, cost);
                best = Some((order.clone(), cost));
            }
        }

        match best {
            Some((order, cost)) => {
                debug!("bruteforce tour over {} vertices: cost {}", n, cost);
                Ok(self.tour(&order, cost))
            }
            None => {
                debug!("bruteforce: no Hamiltonian cycle over {} vertices", n);
                Ok(TourSolution::none())
            }
        }
    }

    /// Greedy tour from `start` (the first vertex when `None`)
    ///
    /// Repeatedly moves to the cheapest unvisited neighbor, taking the
    /// first one in vertex order on ties. A dead end or a missing closing
    /// edge yields the "no tour" sentinel.
    pub fn tsp_nearest_neighbor(&self, start: Option<&V>) -> Result<TourSolution<V>> {
        let n = self.graph.num_vertices();
        if n == 0 {
            return Ok(TourSolution::none());
        }
        let start = match start {
            Some(v) => self
                .graph
                .index_of(v)
                .ok_or_else(|| GraphError::unknown_vertex(v))?,
            None => 0,
        };

        let mut visited = vec![false; n];
        visited[start] = true;
        let mut order = Vec::with_capacity(n);
        order.push(start);
        let mut cost = 0.0;
        let mut current = start;

        for _ in 1..n {
            let mut next: Option<(usize, f64)> = None;
            for (candidate, seen) in visited.iter().enumerate() {
                if *seen {
                    continue;
                }
                if let Some(w) = self.graph.weight_by_index(current, candidate) {
                    if next.map_or(true, |(_, best)| w < best) {
                        next = Some((candidate, w));
                    }
                }
            }

            let Some((candidate, w)) = next else {
                debug!(
                    "nearest neighbor: dead end at vertex index {} after {} vertices",
                    current,
                    order.len()
                );
                return Ok(TourSolution::none());
            };
            visited[candidate] = true;
            order.push(candidate);
            cost += w;
            current = candidate;
        }

        if n > 1 {
            match self.graph.weight_by_index(current, start) {
                Some(w) => cost += w,
                None => {
                    debug!("nearest neighbor: no closing edge back to the start");
                    return Ok(TourSolution::none());
                }
            }
        }

        debug!("nearest neighbor tour: cost {}", cost);
        Ok(self.tour(&order, cost))
    }

    /// Tour from the depth-first preorder of a minimum spanning tree
    ///
    /// The tree is rooted at the first vertex and children are visited in
    /// vertex order. Costs use the original graph's weights. Consecutive
    /// vertices the graph does not join are handled by the configured
    /// [`ShortcutPolicy`]. A disconnected graph yields the sentinel.
    pub fn tsp_mst_approximation(&self) -> Result<TourSolution<V>> {
        if !self.graph.is_connected() {
            debug!("mst approximation: graph is not connected");
            return Ok(TourSolution::none());
        }
        if self.graph.num_vertices() == 1 {
            return Ok(self.tour(&[0], 0.0));
        }

        let tree = RootedTree::new(&self.graph.minimum_spanning_tree()?, 0);
        let order = &tree.preorder;
        let mut cost = 0.0;

        for (k, &from) in order.iter().enumerate() {
            let to = order[(k + 1) % order.len()];
            cost += match self.graph.weight_by_index(from, to) {
                Some(w) => w,
                None => match self.config.shortcut_policy {
                    ShortcutPolicy::Strict => {
                        return Err(SolverError::TourInfeasible { from, to });
                    }
                    ShortcutPolicy::TreePath => {
                        let w = tree.distance(from, to);
                        trace!(
                            "mst approximation: shortcut {} -> {} priced by tree path {}",
                            from,
                            to,
                            w
                        );
                        w
                    }
                },
            };
        }

        debug!("mst approximation tour: cost {}", cost);
        Ok(self.tour(order, cost))
    }

    /// Cyclic cost of `order`, or `None` if infeasible or not below `bound`
    fn cycle_cost_below(&self, order: &[usize], bound: f64) -> Option<f64> {
        let mut cost = 0.0;
        for (k, &from) in order.iter().enumerate() {
            let to = order[(k + 1) % order.len()];
            cost += self.graph.weight_by_index(from, to)?;
            if cost >= bound {
                return None;
            }
        }
        Some(cost)
    }

    fn tour(&self, order: &[usize], cost: f64) -> TourSolution<V> {
        let vertices = self.graph.vertices();
        TourSolution {
            path: Some(order.iter().map(|&i| vertices[i].clone()).collect()),
            cost,
        }
    }
}

/// Spanning tree rooted at one vertex, with preorder and root distances
struct RootedTree {
    parent: Vec<Option<usize>>,
    depth: Vec<usize>,
    root_distance: Vec<f64>,
    preorder: Vec<usize>,
}

impl RootedTree {
    fn new<V>(tree: &Graph<V>, root: usize) -> Self
    where
        V: Clone + Eq + Hash + Debug,
    {
        let n = tree.num_vertices();
        let mut parent = vec![None; n];
        let mut depth = vec![0; n];
        let mut root_distance = vec![0.0; n];
        let mut preorder = Vec::with_capacity(n);
        let mut visited = vec![false; n];
        let mut stack = vec![root];
        visited[root] = true;

        while let Some(node) = stack.pop() {
            preorder.push(node);
            let mut children: Vec<(usize, f64)> = tree
                .neighbors_by_index(node)
                .iter()
                .copied()
                .filter(|&(child, _)| !visited[child])
                .collect();
            // Pushed in reverse so the smallest index is popped first
            children.sort_by(|a, b| b.0.cmp(&a.0));
            for (child, w) in children {
                visited[child] = true;
                parent[child] = Some(node);
                depth[child] = depth[node] + 1;
                root_distance[child] = root_distance[node] + w;
                stack.push(child);
            }
        }

        Self {
            parent,
            depth,
            root_distance,
            preorder,
        }
    }

    /// Weight of the tree path between `a` and `b`
    fn distance(&self, a: usize, b: usize) -> f64 {
        let (mut x, mut y) = (a, b);
        while self.depth[x] > self.depth[y] {
            x = self.parent[x].unwrap_or(x);
        }
        while self.depth[y] > self.depth[x] {
            y = self.parent[y].unwrap_or(y);
        }
        while x != y {
            match (self.parent[x], self.parent[y]) {
                (Some(px), Some(py)) => {
                    x = px;
                    y = py;
                }
                _ => break,
            }
        }
        self.root_distance[a] + self.root_distance[b] - 2.0 * self.root_distance[x]
    }
}

//! Weighted undirected graph model
//!
//! [`Graph`] stores vertices in insertion order. That order is the stable
//! enumeration order every solver relies on for tie-breaking, and it defines
//! the vertex-to-index mapping `0..n` handed to external circuit builders.
//!
//! # Example
//!
//! ```
//! use graphq_core::Graph;
//!
//! let mut graph = Graph::new();
//! graph.add_edge("a", "b", 2.0).unwrap();
//! graph.add_edge("b", "c", 1.0).unwrap();
//!
//! assert_eq!(graph.num_vertices(), 3);
//! assert_eq!(graph.degree(&"b"), 2);
//! assert_eq!(graph.weight(&"c", &"b"), Some(1.0));
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{GraphError, Result};

/// Weighted undirected graph over opaque vertex identifiers
#[derive(Debug, Clone)]
pub struct Graph<V = usize> {
    /// Vertices in insertion order
    vertices: Vec<V>,
    /// Vertex id -> position in `vertices`
    index: HashMap<V, usize>,
    /// Adjacency lists by vertex index, in edge insertion order
    adjacency: Vec<Vec<(usize, f64)>>,
    /// Edges as (index, index, weight) in insertion order
    edges: Vec<(usize, usize, f64)>,
    /// Normalized (low, high) index pair -> position in `edges`
    edge_slots: HashMap<(usize, usize), usize>,
}

impl<V> Default for Graph<V>
where
    V: Clone + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Graph<V>
where
    V: Clone + Eq + Hash + Debug,
{
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
            edges: Vec::new(),
            edge_slots: HashMap::new(),
        }
    }

    /// Build a graph from a vertex list and weighted edges
    ///
    /// Vertices are inserted first so their order is kept even when some of
    /// them are isolated; edge endpoints missing from `vertices` are appended.
    pub fn from_edges<I>(vertices: I, edges: &[(V, V, f64)]) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
    {
        let mut graph = Self::new();
        for v in vertices {
            graph.add_vertex(v);
        }
        for (u, v, w) in edges {
            graph.add_edge(u.clone(), v.clone(), *w)?;
        }
        Ok(graph)
    }

    /// Add a vertex, returning its index
    ///
    /// Adding an existing vertex is a no-op that returns the existing index.
    pub fn add_vertex(&mut self, vertex: V) -> usize {
        if let Some(&idx) = self.index.get(&vertex) {
            return idx;
        }
        let idx = self.vertices.len();
        self.index.insert(vertex.clone(), idx);
        self.vertices.push(vertex);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Add an undirected weighted edge
    ///
    /// Missing endpoints are added as vertices. Re-adding an existing pair
    /// (in either orientation) replaces its weight.
    pub fn add_edge(&mut self, u: V, v: V, weight: f64) -> Result<()> {
        if u == v {
            return Err(GraphError::self_loop(&u));
        }
        if !(weight.is_finite() && weight > 0.0) {
            return Err(GraphError::InvalidWeight { weight });
        }

        let i = self.add_vertex(u);
        let j = self.add_vertex(v);
        let key = (i.min(j), i.max(j));

        if let Some(&slot) = self.edge_slots.get(&key) {
            self.edges[slot].2 = weight;
            for (n, w) in self.adjacency[i].iter_mut() {
                if *n == j {
                    *w = weight;
                }
            }
            for (n, w) in self.adjacency[j].iter_mut() {
                if *n == i {
                    *w = weight;
                }
            }
            return Ok(());
        }

        self.edge_slots.insert(key, self.edges.len());
        self.edges.push((i, j, weight));
        self.adjacency[i].push((j, weight));
        self.adjacency[j].push((i, weight));
        Ok(())
    }

    /// Add an edge with unit weight
    pub fn add_unit_edge(&mut self, u: V, v: V) -> Result<()> {
        self.add_edge(u, v, 1.0)
    }

    /// Vertices in stable insertion order
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Number of vertices
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Check whether the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Check whether `vertex` belongs to the graph
    pub fn contains(&self, vertex: &V) -> bool {
        self.index.contains_key(vertex)
    }

    /// Index of a vertex in the stable enumeration order
    pub fn index_of(&self, vertex: &V) -> Option<usize> {
        self.index.get(vertex).copied()
    }

    /// Vertex at a given index
    pub fn vertex(&self, index: usize) -> Option<&V> {
        self.vertices.get(index)
    }

    /// Edges as `(u, v, weight)` in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&V, &V, f64)> + '_ {
        self.edges
            .iter()
            .map(move |&(i, j, w)| (&self.vertices[i], &self.vertices[j], w))
    }

    /// Edges as `(index_u, index_v, weight)` in insertion order
    pub fn indexed_edges(&self) -> &[(usize, usize, f64)] {
        &self.edges
    }

    /// Sum of all edge weights
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|&(_, _, w)| w).sum()
    }

    /// Weight of the edge between `u` and `v`, if present
    pub fn weight(&self, u: &V, v: &V) -> Option<f64> {
        let i = self.index_of(u)?;
        let j = self.index_of(v)?;
        self.weight_by_index(i, j)
    }

    /// Weight of the edge between two vertex indices, if present
    pub fn weight_by_index(&self, i: usize, j: usize) -> Option<f64> {
        self.edge_slots
            .get(&(i.min(j), i.max(j)))
            .map(|&slot| self.edges[slot].2)
    }

    /// Check whether an edge joins `u` and `v`
    pub fn has_edge(&self, u: &V, v: &V) -> bool {
        self.weight(u, v).is_some()
    }

    /// Number of edges incident to `vertex` (0 for unknown vertices)
    pub fn degree(&self, vertex: &V) -> usize {
        self.index_of(vertex)
            .map(|i| self.adjacency[i].len())
            .unwrap_or(0)
    }

    /// Degree of the vertex at `index`
    pub fn degree_by_index(&self, index: usize) -> usize {
        self.adjacency.get(index).map(Vec::len).unwrap_or(0)
    }

    /// Neighbors of `vertex` with edge weights
    pub fn neighbors(&self, vertex: &V) -> Vec<(&V, f64)> {
        match self.index_of(vertex) {
            Some(i) => self.adjacency[i]
                .iter()
                .map(|&(j, w)| (&self.vertices[j], w))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Neighbor indices of the vertex at `index` with edge weights
    pub fn neighbors_by_index(&self, index: usize) -> &[(usize, f64)] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of vertices adjacent to both `u` and `v`
    pub fn common_neighbors(&self, u: &V, v: &V) -> usize {
        match (self.index_of(u), self.index_of(v)) {
            (Some(i), Some(j)) => self.common_neighbors_by_index(i, j),
            _ => 0,
        }
    }

    /// Number of vertices adjacent to both vertex indices
    pub fn common_neighbors_by_index(&self, i: usize, j: usize) -> usize {
        // Hash the smaller list, scan the larger one
        let (small, large) = if self.degree_by_index(i) <= self.degree_by_index(j) {
            (i, j)
        } else {
            (j, i)
        };
        let around: HashSet<usize> = self
            .neighbors_by_index(small)
            .iter()
            .map(|&(n, _)| n)
            .collect();
        self.neighbors_by_index(large)
            .iter()
            .filter(|(n, _)| around.contains(n))
            .count()
    }

    /// Number of connected components (0 for an empty graph)
    pub fn component_count(&self) -> usize {
        let n = self.vertices.len();
        let mut seen = vec![false; n];
        let mut components = 0;
        let mut queue = VecDeque::new();

        for root in 0..n {
            if seen[root] {
                continue;
            }
            components += 1;
            seen[root] = true;
            queue.push_back(root);
            while let Some(current) = queue.pop_front() {
                for &(next, _) in &self.adjacency[current] {
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        components
    }

    /// Check whether every vertex is reachable from every other
    ///
    /// The empty graph is not considered connected.
    pub fn is_connected(&self) -> bool {
        self.component_count() == 1
    }

    /// Minimum spanning tree as a sub-graph
    ///
    /// Kruskal's algorithm over a stable weight ordering, so equal-weight
    /// edges are taken in insertion order. The tree keeps the vertex order
    /// (and therefore the indices) of this graph. Fails with
    /// [`GraphError::Disconnected`] when no spanning tree exists.
    pub fn minimum_spanning_tree(&self) -> Result<Graph<V>> {
        if self.is_empty() {
            return Err(GraphError::EmptyGraph);
        }
        let components = self.component_count();
        if components != 1 {
            return Err(GraphError::Disconnected { components });
        }

        let mut order: Vec<usize> = (0..self.edges.len()).collect();
        order.sort_by(|&a, &b| self.edges[a].2.total_cmp(&self.edges[b].2));

        let mut tree = Graph::new();
        for v in &self.vertices {
            tree.add_vertex(v.clone());
        }

        let mut sets = DisjointSet::new(self.vertices.len());
        for slot in order {
            let (i, j, w) = self.edges[slot];
            if sets.union(i, j) {
                tree.add_edge(self.vertices[i].clone(), self.vertices[j].clone(), w)?;
                if tree.num_edges() + 1 == self.vertices.len() {
                    break;
                }
            }
        }

        Ok(tree)
    }
}

impl Graph<usize> {
    /// Complete graph on `0..n` with unit weights
    pub fn complete(num_vertices: usize) -> Self {
        let mut graph = Self::with_vertices(num_vertices);
        for i in 0..num_vertices {
            for j in (i + 1)..num_vertices {
                graph.push_unit_edge(i, j);
            }
        }
        graph
    }

    /// Cycle graph on `0..n` with unit weights
    pub fn cycle(num_vertices: usize) -> Self {
        let mut graph = Self::with_vertices(num_vertices);
        if num_vertices >= 3 {
            for i in 0..num_vertices {
                graph.push_unit_edge(i, (i + 1) % num_vertices);
            }
        }
        graph
    }

    /// Path graph on `0..n` with unit weights
    pub fn path(num_vertices: usize) -> Self {
        let mut graph = Self::with_vertices(num_vertices);
        for i in 1..num_vertices {
            graph.push_unit_edge(i - 1, i);
        }
        graph
    }

    /// Star graph: vertex 0 joined to every other vertex
    pub fn star(num_vertices: usize) -> Self {
        let mut graph = Self::with_vertices(num_vertices);
        for i in 1..num_vertices {
            graph.push_unit_edge(0, i);
        }
        graph
    }

    fn with_vertices(num_vertices: usize) -> Self {
        let mut graph = Self::new();
        for v in 0..num_vertices {
            graph.add_vertex(v);
        }
        graph
    }

    // Distinct endpoints and unit weight always satisfy `add_edge`.
    fn push_unit_edge(&mut self, i: usize, j: usize) {
        let key = (i.min(j), i.max(j));
        if self.edge_slots.contains_key(&key) {
            return;
        }
        self.edge_slots.insert(key, self.edges.len());
        self.edges.push((i, j, 1.0));
        self.adjacency[i].push((j, 1.0));
        self.adjacency[j].push((i, 1.0));
    }
}

/// Union-find with path halving and union by size
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets of `a` and `b`; false when already joined
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }
}

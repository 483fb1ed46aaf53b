// Licensed under the Apache License, Version 2.0 (the "License"); you may
// not use this file except in compliance with the License. You may obtain
// a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations
// under the License.

//! Immutable bitset adjacency store.
//!
//! Every input format (dense matrix, edge list, petgraph graph) is converted
//! into one row of bits per vertex. Row `v` holds the neighbors of `v`, so
//! adjacency tests are a single bit lookup and candidate-set restriction in
//! the search is a word-wise intersection.

use fixedbitset::FixedBitSet;
use foldhash::{HashSet, HashSetExt};
use log::warn;
use ndarray::ArrayView2;
use petgraph::graph::{IndexType, UnGraph};
use petgraph::visit::EdgeRef;

use crate::error::GraphError;
use crate::options::EdgePolicy;

/// Undirected simple graph over vertices `0..n`, stored as bitset rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitGraph {
    rows: Vec<FixedBitSet>,
    num_edges: usize,
}

impl BitGraph {
    /// Creates a graph with `num_nodes` vertices and no edges.
    pub fn empty(num_nodes: usize) -> Self {
        Self {
            rows: vec![FixedBitSet::with_capacity(num_nodes); num_nodes],
            num_edges: 0,
        }
    }

    /// Builds a graph from a dense square adjacency matrix.
    ///
    /// Any entry different from `T::default()` (`false`, `0`, `0.0`) counts as
    /// an edge. Under [`EdgePolicy::Strict`] a set diagonal entry or an
    /// asymmetric pair is rejected; under [`EdgePolicy::Normalize`] the
    /// diagonal is ignored and `u~v` holds if either `m[u][v]` or `m[v][u]`
    /// is set.
    pub fn from_dense<T>(matrix: ArrayView2<'_, T>, policy: EdgePolicy) -> Result<Self, GraphError>
    where
        T: Copy + Default + PartialEq,
    {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(GraphError::NotSquare { rows, cols });
        }
        let zero = T::default();
        let mut graph = Self::empty(rows);
        let mut dropped_loops = 0usize;
        let mut repaired = 0usize;

        for u in 0..rows {
            if matrix[[u, u]] != zero {
                match policy {
                    EdgePolicy::Strict => return Err(GraphError::SelfLoop(u)),
                    EdgePolicy::Normalize => dropped_loops += 1,
                }
            }
            for v in (u + 1)..rows {
                let forward = matrix[[u, v]] != zero;
                let backward = matrix[[v, u]] != zero;
                if forward != backward {
                    match policy {
                        EdgePolicy::Strict => {
                            let (u, v) = if forward { (u, v) } else { (v, u) };
                            return Err(GraphError::Asymmetric { u, v });
                        }
                        EdgePolicy::Normalize => repaired += 1,
                    }
                }
                if forward || backward {
                    graph.link(u, v);
                }
            }
        }

        if dropped_loops > 0 || repaired > 0 {
            warn!(
                "normalized adjacency matrix: dropped {} self-loops, symmetrized {} pairs",
                dropped_loops, repaired
            );
        }
        Ok(graph)
    }

    /// Builds a graph with `num_nodes` vertices from a list of undirected edges.
    ///
    /// `(u, v)` and `(v, u)` name the same edge. Under [`EdgePolicy::Strict`]
    /// self-loops and repeated edges are rejected; under
    /// [`EdgePolicy::Normalize`] they are dropped. Out-of-range endpoints are
    /// rejected under both policies.
    pub fn from_edges(
        num_nodes: usize,
        edges: &[(usize, usize)],
        policy: EdgePolicy,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::empty(num_nodes);
        let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(edges.len());
        let mut dropped_loops = 0usize;
        let mut duplicates = 0usize;

        for &(u, v) in edges {
            for vertex in [u, v] {
                if vertex >= num_nodes {
                    return Err(GraphError::VertexOutOfRange { vertex, num_nodes });
                }
            }
            if u == v {
                match policy {
                    EdgePolicy::Strict => return Err(GraphError::SelfLoop(u)),
                    EdgePolicy::Normalize => {
                        dropped_loops += 1;
                        continue;
                    }
                }
            }
            let key = if u < v { (u, v) } else { (v, u) };
            if !seen.insert(key) {
                match policy {
                    EdgePolicy::Strict => return Err(GraphError::DuplicateEdge { u, v }),
                    EdgePolicy::Normalize => {
                        duplicates += 1;
                        continue;
                    }
                }
            }
            graph.link(u, v);
        }

        if dropped_loops > 0 || duplicates > 0 {
            warn!(
                "normalized edge list: dropped {} self-loops and {} duplicate edges",
                dropped_loops, duplicates
            );
        }
        Ok(graph)
    }

    /// Builds a graph from a petgraph undirected graph, using node indices as
    /// vertex ids. Parallel edges and self-loops follow `policy`.
    pub fn from_petgraph<N, E, Ix: IndexType>(
        graph: &UnGraph<N, E, Ix>,
        policy: EdgePolicy,
    ) -> Result<Self, GraphError> {
        let edges: Vec<(usize, usize)> = graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
            .collect();
        Self::from_edges(graph.node_count(), &edges, policy)
    }

    fn link(&mut self, u: usize, v: usize) {
        self.rows[u].insert(v);
        self.rows[v].insert(u);
        self.num_edges += 1;
    }

    /// Number of vertices.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.num_edges
    }

    /// Returns `true` if `u` and `v` are adjacent.
    ///
    /// # Panics
    /// Panics if `u` is not a vertex of the graph.
    #[inline]
    pub fn is_adjacent(&self, u: usize, v: usize) -> bool {
        self.rows[u].contains(v)
    }

    /// Iterates the neighbors of `v` in ascending order. Each call starts a
    /// fresh iteration.
    #[inline]
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows[v].ones()
    }

    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.rows[v].count_ones(..)
    }

    /// The neighbor row of `v` as a bitset over all vertices.
    #[inline]
    pub fn neighbor_set(&self, v: usize) -> &FixedBitSet {
        &self.rows[v]
    }

    /// Returns `true` if the vertices are pairwise adjacent.
    pub fn is_clique(&self, vertices: &[usize]) -> bool {
        vertices.iter().enumerate().all(|(i, &u)| {
            u < self.node_count() && vertices[i + 1..].iter().all(|&v| self.is_adjacent(u, v))
        })
    }

    /// Returns `true` if the vertices form a clique that no outside vertex
    /// extends.
    pub fn is_maximal_clique(&self, vertices: &[usize]) -> bool {
        if !self.is_clique(vertices) {
            return false;
        }
        let mut common = FixedBitSet::with_capacity(self.node_count());
        common.insert_range(..);
        for &v in vertices {
            common.intersect_with(&self.rows[v]);
        }
        common.is_clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn dense_matrix_builds_symmetric_rows() {
        let m = array![[false, true, false], [true, false, true], [false, true, false]];
        let g = BitGraph::from_dense(m.view(), EdgePolicy::Strict).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert!(g.is_adjacent(0, 1) && g.is_adjacent(1, 0));
        assert!(!g.is_adjacent(0, 2));
        assert_eq!(g.neighbors(1).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(g.degree(1), 2);
    }

    #[test]
    fn integer_matrix_treats_nonzero_as_edge() {
        let m = array![[0u8, 3], [1, 0]];
        let g = BitGraph::from_dense(m.view(), EdgePolicy::Strict).unwrap();
        assert!(g.is_adjacent(0, 1));
    }

    #[test]
    fn strict_matrix_rejects_self_loop_and_asymmetry() {
        let looped = array![[true, false], [false, false]];
        assert_eq!(
            BitGraph::from_dense(looped.view(), EdgePolicy::Strict),
            Err(GraphError::SelfLoop(0))
        );
        let lopsided = array![[false, false], [true, false]];
        assert_eq!(
            BitGraph::from_dense(lopsided.view(), EdgePolicy::Strict),
            Err(GraphError::Asymmetric { u: 1, v: 0 })
        );
    }

    #[test]
    fn normalize_matrix_repairs_input() {
        let m = array![[true, true, false], [false, false, false], [false, true, false]];
        let g = BitGraph::from_dense(m.view(), EdgePolicy::Normalize).unwrap();
        assert_eq!(g.edge_count(), 2);
        assert!(g.is_adjacent(1, 0));
        assert!(g.is_adjacent(1, 2));
        assert!(!g.is_adjacent(0, 0));
    }

    #[test]
    fn non_square_matrix_is_rejected() {
        let m = ndarray::Array2::<bool>::default((2, 3));
        assert_eq!(
            BitGraph::from_dense(m.view(), EdgePolicy::Normalize),
            Err(GraphError::NotSquare { rows: 2, cols: 3 })
        );
    }

    #[test]
    fn edge_list_validation() {
        assert_eq!(
            BitGraph::from_edges(3, &[(0, 3)], EdgePolicy::Normalize),
            Err(GraphError::VertexOutOfRange { vertex: 3, num_nodes: 3 })
        );
        assert_eq!(
            BitGraph::from_edges(3, &[(0, 1), (1, 0)], EdgePolicy::Strict),
            Err(GraphError::DuplicateEdge { u: 1, v: 0 })
        );
        assert_eq!(
            BitGraph::from_edges(3, &[(2, 2)], EdgePolicy::Strict),
            Err(GraphError::SelfLoop(2))
        );
        let g = BitGraph::from_edges(3, &[(0, 1), (1, 0), (2, 2), (2, 1)], EdgePolicy::Normalize)
            .unwrap();
        assert_eq!(g.edge_count(), 2);
        assert!(g.is_adjacent(2, 1));
    }

    #[test]
    fn petgraph_input() {
        let pg = UnGraph::<(), ()>::from_edges([(0u32, 1u32), (1, 2), (0, 2)]);
        let g = BitGraph::from_petgraph(&pg, EdgePolicy::Strict).unwrap();
        assert!(g.is_maximal_clique(&[0, 1, 2]));
    }

    #[test]
    fn clique_predicates() {
        let g = BitGraph::from_edges(4, &[(0, 1), (1, 2), (0, 2), (2, 3)], EdgePolicy::Strict)
            .unwrap();
        assert!(g.is_clique(&[0, 1]));
        assert!(!g.is_maximal_clique(&[0, 1]));
        assert!(g.is_maximal_clique(&[0, 1, 2]));
        assert!(g.is_maximal_clique(&[2, 3]));
        assert!(!g.is_clique(&[0, 3]));
        assert!(BitGraph::empty(0).is_clique(&[]));
    }
}

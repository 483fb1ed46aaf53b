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

//! Degeneracy ordering by repeated minimum-degree removal.

use std::collections::BTreeSet;

use fixedbitset::FixedBitSet;

use crate::graph::BitGraph;

/// A degeneracy ordering of a [`BitGraph`].
///
/// `order()` is the reverse of the removal sequence: the vertex removed last
/// comes first. Each vertex has at most `degeneracy()` neighbors removed after
/// it, i.e. appearing before it in `order()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DegeneracyOrdering {
    order: Vec<usize>,
    position: Vec<usize>,
    degeneracy: usize,
}

impl DegeneracyOrdering {
    /// Computes the ordering. Among vertices of equal current degree the
    /// lowest index is removed first, so the result is deterministic.
    pub fn compute(graph: &BitGraph) -> Self {
        let num_nodes = graph.node_count();
        let mut degrees: Vec<usize> = (0..num_nodes).map(|v| graph.degree(v)).collect();
        let max_degree = degrees.iter().copied().max().unwrap_or(0);
        let mut degree_bins: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); max_degree + 1];
        for (node, &degree) in degrees.iter().enumerate() {
            degree_bins[degree].insert(node);
        }

        let mut removal: Vec<usize> = Vec::with_capacity(num_nodes);
        let mut removed = FixedBitSet::with_capacity(num_nodes);
        let mut degeneracy = 0;
        let mut current_degree = 0;

        while removal.len() < num_nodes {
            while degree_bins[current_degree].is_empty() {
                current_degree += 1;
            }
            let Some(node) = degree_bins[current_degree].pop_first() else {
                break;
            };
            degeneracy = degeneracy.max(current_degree);
            removal.push(node);
            removed.insert(node);

            for neighbor in graph.neighbors(node) {
                if removed.contains(neighbor) {
                    continue;
                }
                let degree = &mut degrees[neighbor];
                degree_bins[*degree].remove(&neighbor);
                *degree -= 1;
                degree_bins[*degree].insert(neighbor);
            }
            // A removal lowers neighbor degrees by at most one.
            current_degree = current_degree.saturating_sub(1);
        }

        removal.reverse();
        let mut position = vec![0; num_nodes];
        for (i, &v) in removal.iter().enumerate() {
            position[v] = i;
        }
        Self {
            order: removal,
            position,
            degeneracy,
        }
    }

    /// Vertices in degeneracy order (reverse of removal order).
    #[inline]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Vertices in the order they were removed.
    pub fn removal_order(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.order.iter().rev().copied()
    }

    /// Index of `v` within [`order`](Self::order).
    #[inline]
    pub fn position(&self, v: usize) -> usize {
        self.position[v]
    }

    /// Returns `true` if `u` was removed after `v`.
    #[inline]
    pub fn removed_after(&self, u: usize, v: usize) -> bool {
        self.position[u] < self.position[v]
    }

    /// The largest minimum degree seen during removal.
    #[inline]
    pub fn degeneracy(&self) -> usize {
        self.degeneracy
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::EdgePolicy;

    fn graph(n: usize, edges: &[(usize, usize)]) -> BitGraph {
        BitGraph::from_edges(n, edges, EdgePolicy::Strict).unwrap()
    }

    #[test]
    fn empty_graph_has_empty_order() {
        let ordering = DegeneracyOrdering::compute(&BitGraph::empty(0));
        assert!(ordering.is_empty());
        assert_eq!(ordering.degeneracy(), 0);
    }

    #[test]
    fn path_order_breaks_ties_by_lowest_index() {
        // Removal: 0 (deg 1), then 1 (deg 1 after 0 left), then 2, then 3.
        let ordering = DegeneracyOrdering::compute(&graph(4, &[(0, 1), (1, 2), (2, 3)]));
        assert_eq!(ordering.removal_order().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(ordering.order(), &[3, 2, 1, 0]);
        assert_eq!(ordering.degeneracy(), 1);
        assert_eq!(ordering.position(3), 0);
        assert!(ordering.removed_after(1, 0));
    }

    #[test]
    fn complete_graph_degeneracy() {
        let edges: Vec<(usize, usize)> = (0..5)
            .flat_map(|u| ((u + 1)..5).map(move |v| (u, v)))
            .collect();
        let ordering = DegeneracyOrdering::compute(&graph(5, &edges));
        assert_eq!(ordering.degeneracy(), 4);
        assert_eq!(ordering.len(), 5);
    }

    #[test]
    fn later_neighbors_bounded_by_degeneracy() {
        // Star with center 0 plus a triangle 1-2-3.
        let g = graph(6, &[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (1, 2), (2, 3), (1, 3)]);
        let ordering = DegeneracyOrdering::compute(&g);
        assert_eq!(ordering.degeneracy(), 3);
        for v in 0..g.node_count() {
            let later = g.neighbors(v).filter(|&u| ordering.removed_after(u, v)).count();
            assert!(later <= ordering.degeneracy());
        }
        let mut sorted = ordering.order().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..6).collect::<Vec<_>>());
    }
}

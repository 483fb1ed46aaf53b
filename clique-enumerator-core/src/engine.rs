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
// Bron, C.; Kerbosch, J. (1973). "Algorithm 457: finding all cliques of an undirected graph". Communications of the ACM. 16 (9): 575–577. doi:10.1145/362342.362367.
// Eppstein, D.; Löffler, M.; Strash, D. (2010). "Listing All Maximal Cliques in Sparse Graphs in Near-Optimal Time". ISAAC 2010.

//! Bron-Kerbosch search with pivoting over a degeneracy-ordered outer loop.
//!
//! The outer loop walks vertices in removal order. For vertex `v`, neighbors
//! removed earlier have already had their own outer branch and go to the
//! excluded set; neighbors removed later are the candidates. Since every
//! vertex has at most `degeneracy` later neighbors, each outer branch starts
//! with a small candidate set.

use std::ops::ControlFlow;

use fixedbitset::FixedBitSet;
use log::{debug, trace};
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::collector::{Budget, CancelToken, CliqueSet, Collector, Termination};
use crate::error::{OptionsError, Result};
use crate::graph::BitGraph;
use crate::options::{EnumerationOptions, SearchStrategy};
use crate::ordering::DegeneracyOrdering;

type CliqueBuf = SmallVec<[usize; 32]>;

/// Enumerates cliques of `graph` according to `options`.
///
/// ```
/// use clique_enumerator_core::{enumerate, BitGraph, EdgePolicy, EnumerationOptions};
///
/// let path = BitGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)], EdgePolicy::Strict)?;
/// let found = enumerate(&path, &EnumerationOptions::default())?;
/// assert_eq!(found.len(), 3);
/// assert!(!found.is_truncated());
/// # Ok::<(), clique_enumerator_core::CliqueError>(())
/// ```
pub fn enumerate(graph: &BitGraph, options: &EnumerationOptions) -> Result<CliqueSet> {
    enumerate_with_cancel(graph, options, &CancelToken::new())
}

/// Like [`enumerate`], but stops early once `cancel` is triggered. The cliques
/// found up to that point are returned with the truncated flag set.
pub fn enumerate_with_cancel(
    graph: &BitGraph,
    options: &EnumerationOptions,
    cancel: &CancelToken,
) -> Result<CliqueSet> {
    options.validate()?;
    let ordering = DegeneracyOrdering::compute(graph);
    debug!(
        "enumerating cliques: {} vertices, {} edges, degeneracy {}, maximal_only={}",
        graph.node_count(),
        graph.edge_count(),
        ordering.degeneracy(),
        options.maximal_only
    );

    let budget = Budget::new(options.max_results);
    let (cliques, interrupted) = match options.workers {
        1 => run_sequential(graph, &ordering, options, &budget, cancel),
        0 => run_parallel(graph, &ordering, options, &budget, cancel),
        workers => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| OptionsError::WorkerPool(e.to_string()))?;
            pool.install(|| run_parallel(graph, &ordering, options, &budget, cancel))
        }
    };

    let termination = if !interrupted {
        Termination::Completed
    } else if budget.is_exhausted() {
        Termination::ResultCap
    } else {
        Termination::Cancelled
    };
    debug!(
        "clique enumeration finished: {} cliques, {:?}",
        cliques.len(),
        termination
    );
    Ok(CliqueSet::new(cliques, termination))
}

fn run_sequential(
    graph: &BitGraph,
    ordering: &DegeneracyOrdering,
    options: &EnumerationOptions,
    budget: &Budget,
    cancel: &CancelToken,
) -> (Vec<Vec<usize>>, bool) {
    let mut collector = Collector::new(budget, options);
    let mut search = Search {
        graph,
        ordering,
        options,
        cancel,
        collector: &mut collector,
    };
    let interrupted = ordering
        .removal_order()
        .try_for_each(|v| search.outer_branch(v))
        .is_break();
    (collector.into_cliques(), interrupted)
}

/// Runs every outer branch as its own rayon task with a local buffer. Buffers
/// are concatenated in removal order, so without a cap or cancellation the
/// output matches the sequential run exactly.
fn run_parallel(
    graph: &BitGraph,
    ordering: &DegeneracyOrdering,
    options: &EnumerationOptions,
    budget: &Budget,
    cancel: &CancelToken,
) -> (Vec<Vec<usize>>, bool) {
    let sequence: Vec<usize> = ordering.removal_order().collect();
    let branches: Vec<(Vec<Vec<usize>>, bool)> = sequence
        .par_iter()
        .map(|&v| {
            let mut collector = Collector::new(budget, options);
            let mut search = Search {
                graph,
                ordering,
                options,
                cancel,
                collector: &mut collector,
            };
            let interrupted = search.outer_branch(v).is_break();
            (collector.into_cliques(), interrupted)
        })
        .collect();

    let mut cliques = Vec::new();
    let mut interrupted = false;
    for (local, stopped) in branches {
        cliques.extend(local);
        interrupted |= stopped;
    }
    (cliques, interrupted)
}

/// What a search node does after its bookkeeping.
enum Step {
    Leaf,
    Branch(Vec<usize>),
}

/// One explicit search node for the iterative strategy.
struct Frame {
    candidates: FixedBitSet,
    excluded: FixedBitSet,
    branches: Vec<usize>,
    next: usize,
    depth: usize,
}

struct Search<'a, 'c> {
    graph: &'a BitGraph,
    ordering: &'a DegeneracyOrdering,
    options: &'a EnumerationOptions,
    cancel: &'a CancelToken,
    collector: &'a mut Collector<'c>,
}

impl Search<'_, '_> {
    fn outer_branch(&mut self, v: usize) -> ControlFlow<()> {
        let num_nodes = self.graph.node_count();
        let mut candidates = FixedBitSet::with_capacity(num_nodes);
        let mut excluded = FixedBitSet::with_capacity(num_nodes);
        for neighbor in self.graph.neighbors(v) {
            if self.ordering.removed_after(neighbor, v) {
                candidates.insert(neighbor);
            } else {
                excluded.insert(neighbor);
            }
        }
        if !self.options.maximal_only {
            excluded.clear();
        }
        trace!(
            "outer branch {}: {} candidates, {} excluded",
            v,
            candidates.count_ones(..),
            excluded.count_ones(..)
        );

        let mut clique = CliqueBuf::new();
        clique.push(v);
        match self.options.strategy {
            SearchStrategy::Recursive => self.descend(&mut clique, candidates, excluded),
            SearchStrategy::Iterative => self.descend_iterative(&mut clique, candidates, excluded),
        }
    }

    #[inline]
    fn checkpoint(&self) -> ControlFlow<()> {
        if self.cancel.is_cancelled() || self.collector.is_exhausted() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    /// Reports `clique` if appropriate and decides which candidates to branch on.
    fn plan(
        &mut self,
        clique: &[usize],
        candidates: &FixedBitSet,
        excluded: &FixedBitSet,
    ) -> ControlFlow<(), Step> {
        self.checkpoint()?;
        let size = clique.len();
        let reachable = size + candidates.count_ones(..);

        if self.options.maximal_only {
            if candidates.is_clear() {
                if excluded.is_clear() {
                    self.collector.offer(clique)?;
                }
                return ControlFlow::Continue(Step::Leaf);
            }
            // Every maximal clique below this node is larger than `size`.
            let too_large = self.options.max_size.is_some_and(|max| size >= max);
            if reachable < self.options.min_size || too_large {
                return ControlFlow::Continue(Step::Leaf);
            }
            let pivot = self.choose_pivot(candidates, excluded);
            let branches = candidates
                .ones()
                .filter(|&u| !self.graph.is_adjacent(pivot, u))
                .collect();
            ControlFlow::Continue(Step::Branch(branches))
        } else {
            self.collector.offer(clique)?;
            let at_limit = self.options.max_size.is_some_and(|max| size >= max);
            if candidates.is_clear() || at_limit || reachable < self.options.min_size {
                return ControlFlow::Continue(Step::Leaf);
            }
            ControlFlow::Continue(Step::Branch(candidates.ones().collect()))
        }
    }

    /// Picks the vertex of `candidates ∪ excluded` with the most neighbors in
    /// `candidates`. Candidates are scanned first, lowest index wins ties.
    fn choose_pivot(&self, candidates: &FixedBitSet, excluded: &FixedBitSet) -> usize {
        let target = candidates.count_ones(..);
        let mut best: Option<(usize, usize)> = None;
        for u in candidates.ones().chain(excluded.ones()) {
            let score = self.graph.neighbor_set(u).intersection(candidates).count();
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((u, score));
                if score == target {
                    break;
                }
            }
        }
        // `plan` only pivots on a non-empty candidate set.
        best.map_or(0, |(u, _)| u)
    }

    /// Computes the child sets for branching on `v`, then moves `v` out of
    /// the parent's candidates (and into its excluded set for maximal search).
    fn split(
        &self,
        v: usize,
        candidates: &mut FixedBitSet,
        excluded: &mut FixedBitSet,
    ) -> (FixedBitSet, FixedBitSet) {
        let row = self.graph.neighbor_set(v);
        if self.options.maximal_only {
            let mut next_candidates = candidates.clone();
            next_candidates.intersect_with(row);
            let mut next_excluded = excluded.clone();
            next_excluded.intersect_with(row);
            candidates.set(v, false);
            excluded.insert(v);
            (next_candidates, next_excluded)
        } else {
            candidates.set(v, false);
            let mut next_candidates = candidates.clone();
            next_candidates.intersect_with(row);
            (next_candidates, FixedBitSet::new())
        }
    }

    fn descend(
        &mut self,
        clique: &mut CliqueBuf,
        mut candidates: FixedBitSet,
        mut excluded: FixedBitSet,
    ) -> ControlFlow<()> {
        let Step::Branch(branches) = self.plan(clique, &candidates, &excluded)? else {
            return ControlFlow::Continue(());
        };
        for v in branches {
            let (next_candidates, next_excluded) = self.split(v, &mut candidates, &mut excluded);
            clique.push(v);
            let flow = self.descend(clique, next_candidates, next_excluded);
            clique.pop();
            flow?;
        }
        ControlFlow::Continue(())
    }

    /// Same traversal as [`descend`](Self::descend) with the recursion kept in
    /// a heap-allocated frame stack.
    fn descend_iterative(
        &mut self,
        clique: &mut CliqueBuf,
        candidates: FixedBitSet,
        excluded: FixedBitSet,
    ) -> ControlFlow<()> {
        let base = clique.len();
        let mut stack: Vec<Frame> = Vec::new();
        if let Step::Branch(branches) = self.plan(clique, &candidates, &excluded)? {
            stack.push(Frame {
                candidates,
                excluded,
                branches,
                next: 0,
                depth: base,
            });
        }

        while let Some(frame) = stack.last_mut() {
            let Some(&v) = frame.branches.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            let depth = frame.depth;
            let (next_candidates, next_excluded) =
                self.split(v, &mut frame.candidates, &mut frame.excluded);

            clique.truncate(depth);
            clique.push(v);
            if let Step::Branch(branches) = self.plan(clique, &next_candidates, &next_excluded)? {
                stack.push(Frame {
                    candidates: next_candidates,
                    excluded: next_excluded,
                    branches,
                    next: 0,
                    depth: clique.len(),
                });
            }
        }
        clique.truncate(base);
        ControlFlow::Continue(())
    }
}

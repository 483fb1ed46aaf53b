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

//! Marshaling between Python/numpy values and the core types.

use std::ops::RangeInclusive;

use clique_enumerator_core::{
    BitGraph, Clique, CliqueError, EdgePolicy, EnumerationOptions, GraphError, OptionsError,
};
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray2};
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use thiserror::Error;

/// Smallest clique size reported by ``enumerate_cliques``.
pub(crate) const MIN_REPORTED_DIM: usize = 3;

/// Argument errors raised at the Python boundary, all surfaced as `ValueError`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum ArgumentError {
    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: i64 },
    #[error("num_nodes must be non-negative, got {0}")]
    NegativeVertexCount(i64),
    #[error("vertex index must be non-negative, got {0}")]
    NegativeVertex(i64),
    #[error("workers must be -1 or a positive integer, got {0}")]
    InvalidWorkers(i64),
    #[error(transparent)]
    Clique(#[from] CliqueError),
}

impl From<GraphError> for ArgumentError {
    fn from(err: GraphError) -> Self {
        ArgumentError::Clique(err.into())
    }
}

impl From<OptionsError> for ArgumentError {
    fn from(err: OptionsError) -> Self {
        ArgumentError::Clique(err.into())
    }
}

impl From<ArgumentError> for PyErr {
    fn from(err: ArgumentError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

pub(crate) fn to_py_err(err: impl Into<ArgumentError>) -> PyErr {
    let err: ArgumentError = err.into();
    err.into()
}

pub(crate) fn checked_count(name: &'static str, value: i64) -> Result<usize, ArgumentError> {
    usize::try_from(value).map_err(|_| ArgumentError::Negative { name, value })
}

pub(crate) fn edge_policy(normalize: bool) -> EdgePolicy {
    if normalize {
        EdgePolicy::Normalize
    } else {
        EdgePolicy::Strict
    }
}

/// Builds a [`BitGraph`] from a 2-D numpy array of bools, integers or floats.
/// Non-zero entries are edges.
pub(crate) fn graph_from_array(
    adjacency: &Bound<'_, PyAny>,
    policy: EdgePolicy,
) -> PyResult<BitGraph> {
    let built = if let Ok(arr) = adjacency.extract::<PyReadonlyArray2<bool>>() {
        BitGraph::from_dense(arr.as_array(), policy)
    } else if let Ok(arr) = adjacency.extract::<PyReadonlyArray2<i64>>() {
        BitGraph::from_dense(arr.as_array(), policy)
    } else if let Ok(arr) = adjacency.extract::<PyReadonlyArray2<i32>>() {
        BitGraph::from_dense(arr.as_array(), policy)
    } else if let Ok(arr) = adjacency.extract::<PyReadonlyArray2<u8>>() {
        BitGraph::from_dense(arr.as_array(), policy)
    } else if let Ok(arr) = adjacency.extract::<PyReadonlyArray2<f64>>() {
        BitGraph::from_dense(arr.as_array(), policy)
    } else {
        return Err(PyTypeError::new_err(
            "adjacency must be a 2-D numpy array of bool, int32, int64, uint8 or float64.",
        ));
    };
    built.map_err(to_py_err)
}

pub(crate) fn vertex_count(num_nodes: i64) -> Result<usize, ArgumentError> {
    usize::try_from(num_nodes).map_err(|_| ArgumentError::NegativeVertexCount(num_nodes))
}

pub(crate) fn edges_from_py(
    edge_list: &[(i64, i64)],
) -> Result<Vec<(usize, usize)>, ArgumentError> {
    edge_list
        .iter()
        .map(|&(u, v)| {
            let u = usize::try_from(u).map_err(|_| ArgumentError::NegativeVertex(u))?;
            let v = usize::try_from(v).map_err(|_| ArgumentError::NegativeVertex(v))?;
            Ok((u, v))
        })
        .collect()
}

/// An edge list rewritten over the dense range `0..labels.len()`.
///
/// `labels` holds the original ids in ascending order, so mapping a clique
/// back keeps it ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relabeled {
    pub(crate) labels: Vec<usize>,
    pub(crate) edges: Vec<(usize, usize)>,
}

impl Relabeled {
    pub(crate) fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    pub(crate) fn restore(&self, clique: Clique) -> Clique {
        clique.into_iter().map(|v| self.labels[v]).collect()
    }
}

/// Relabels the vertices that appear in `edges` to `0..k`. Ids that occur in
/// no edge are dropped.
pub(crate) fn relabel_edges(edges: &[(usize, usize)]) -> Relabeled {
    let mut labels: Vec<usize> = edges.iter().flat_map(|&(u, v)| [u, v]).collect();
    labels.sort_unstable();
    labels.dedup();
    let dense = |v: usize| labels.binary_search(&v).unwrap_or_else(|slot| slot);
    let edges = edges.iter().map(|&(u, v)| (dense(u), dense(v))).collect();
    Relabeled { labels, edges }
}

/// Clique sizes ``enumerate_cliques`` reports for `max_dim`; empty below 3.
pub(crate) fn reported_sizes(max_dim: usize) -> RangeInclusive<usize> {
    MIN_REPORTED_DIM..=max_dim
}

/// Groups cliques by size, with one entry for every size in
/// [`reported_sizes`] even when no clique has that size. Cliques outside the
/// range are dropped. Order within a group is kept.
pub(crate) fn bucket_by_size(
    cliques: Vec<Clique>,
    max_dim: usize,
) -> Vec<(usize, Vec<Clique>)> {
    let sizes = reported_sizes(max_dim);
    let mut buckets: Vec<(usize, Vec<Clique>)> =
        sizes.clone().map(|size| (size, Vec::new())).collect();
    for clique in cliques {
        if sizes.contains(&clique.len()) {
            buckets[clique.len() - MIN_REPORTED_DIM].1.push(clique);
        }
    }
    buckets
}

/// Maps the Python `workers` argument: -1 uses every rayon thread, positive
/// values are taken as-is.
pub(crate) fn worker_count(workers: i64) -> Result<usize, ArgumentError> {
    match workers {
        -1 => Ok(0),
        w if w >= 1 => checked_count("workers", w),
        w => Err(ArgumentError::InvalidWorkers(w)),
    }
}

pub(crate) fn options_from_py(
    min_size: i64,
    max_results: i64,
    maximal_only: bool,
    max_size: Option<i64>,
    workers: i64,
) -> Result<EnumerationOptions, ArgumentError> {
    let max_size = max_size
        .map(|value| checked_count("max_size", value))
        .transpose()?;
    let options = EnumerationOptions::default()
        .with_min_size(checked_count("min_size", min_size)?)
        .with_max_results(checked_count("max_results", max_results)?)
        .with_maximal_only(maximal_only)
        .with_max_size(max_size)
        .with_workers(worker_count(workers)?);
    options.validate()?;
    Ok(options)
}

/// Converts cliques into `int64` numpy arrays.
pub(crate) fn cliques_to_arrays<'py>(
    py: Python<'py>,
    cliques: Vec<Clique>,
) -> Vec<Bound<'py, PyArray1<i64>>> {
    cliques
        .into_iter()
        .map(|clique| {
            clique
                .into_iter()
                .map(|v| v as i64)
                .collect::<Vec<i64>>()
                .into_pyarray(py)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use clique_enumerator_core::enumerate;

    use super::*;

    fn options_error(err: OptionsError) -> ArgumentError {
        ArgumentError::Clique(CliqueError::InvalidOptions(err))
    }

    #[test]
    fn worker_count_mapping() {
        assert_eq!(worker_count(-1), Ok(0));
        assert_eq!(worker_count(1), Ok(1));
        assert_eq!(worker_count(8), Ok(8));
        assert_eq!(worker_count(0), Err(ArgumentError::InvalidWorkers(0)));
        assert_eq!(worker_count(-3), Err(ArgumentError::InvalidWorkers(-3)));
    }

    #[test]
    fn negative_counts_are_rejected() {
        assert_eq!(checked_count("max_results", 5), Ok(5));
        assert_eq!(
            checked_count("max_results", -1),
            Err(ArgumentError::Negative { name: "max_results", value: -1 })
        );
    }

    #[test]
    fn negative_vertices_are_rejected() {
        assert_eq!(edges_from_py(&[(0, 1), (2, 1)]), Ok(vec![(0, 1), (2, 1)]));
        assert_eq!(edges_from_py(&[(0, -4)]), Err(ArgumentError::NegativeVertex(-4)));
        assert_eq!(vertex_count(-1), Err(ArgumentError::NegativeVertexCount(-1)));
    }

    #[test]
    fn python_options_are_validated() {
        let options = options_from_py(2, 10, false, Some(4), -1).unwrap();
        assert_eq!(options.min_size, 2);
        assert_eq!(options.max_results, 10);
        assert!(!options.maximal_only);
        assert_eq!(options.max_size, Some(4));
        assert_eq!(options.workers, 0);

        assert_eq!(
            options_from_py(1, -1, true, None, 1),
            Err(ArgumentError::Negative { name: "max_results", value: -1 })
        );
        assert_eq!(
            options_from_py(0, 0, true, None, 1),
            Err(options_error(OptionsError::MinSizeZero))
        );
        assert_eq!(
            options_from_py(3, 0, true, Some(2), 1),
            Err(options_error(OptionsError::MaxSizeBelowMinSize { min_size: 3, max_size: 2 }))
        );
    }

    #[test]
    fn argument_errors_keep_core_messages() {
        let err = ArgumentError::from(GraphError::SelfLoop(2));
        assert_eq!(err.to_string(), "invalid graph: self-loop at vertex 2");
        assert_eq!(
            ArgumentError::InvalidWorkers(0).to_string(),
            "workers must be -1 or a positive integer, got 0"
        );
    }

    #[test]
    fn sparse_ids_relabel_to_used_vertices_only() {
        let relabeled = relabel_edges(&[(0, 1), (59_999, 1), (0, 59_999), (1_000_000, 0)]);
        assert_eq!(relabeled.num_nodes(), 4);
        assert_eq!(relabeled.labels, vec![0, 1, 59_999, 1_000_000]);
        assert_eq!(relabeled.edges, vec![(0, 1), (2, 1), (0, 2), (3, 0)]);
        assert_eq!(relabeled.restore(vec![0, 1, 2]), vec![0, 1, 59_999]);

        let empty = relabel_edges(&[]);
        assert_eq!(empty.num_nodes(), 0);
        assert!(empty.edges.is_empty());
    }

    #[test]
    fn sparse_edge_list_enumerates_on_dense_graph() {
        let edges = [(0, 1), (1, 59_999), (0, 59_999), (59_999, 59_999), (1, 0)];
        let relabeled = relabel_edges(&edges);
        let graph =
            BitGraph::from_edges(relabeled.num_nodes(), &relabeled.edges, EdgePolicy::Normalize)
                .unwrap();
        assert_eq!(graph.node_count(), 3);

        let options = EnumerationOptions::default()
            .with_maximal_only(false)
            .with_min_size(MIN_REPORTED_DIM)
            .with_max_size(Some(4));
        let found = enumerate(&graph, &options).unwrap();
        let cliques: Vec<Clique> = found
            .into_iter()
            .map(|clique| relabeled.restore(clique))
            .collect();
        assert_eq!(cliques, vec![vec![0, 1, 59_999]]);
    }

    #[test]
    fn buckets_cover_every_reported_size() {
        let cliques = vec![vec![0, 1, 2], vec![0, 1, 2, 3], vec![1, 2, 3], vec![4, 5]];
        let buckets = bucket_by_size(cliques, 5);
        assert_eq!(
            buckets,
            vec![
                (3, vec![vec![0, 1, 2], vec![1, 2, 3]]),
                (4, vec![vec![0, 1, 2, 3]]),
                (5, vec![]),
            ]
        );
        assert_eq!(bucket_by_size(Vec::new(), 3), vec![(3, vec![])]);
    }

    #[test]
    fn max_dim_below_three_reports_nothing() {
        assert!(reported_sizes(2).is_empty());
        assert!(reported_sizes(0).is_empty());
        assert!(bucket_by_size(vec![vec![0, 1, 2]], 2).is_empty());
    }
}

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clique_enumerator_core::{enumerate, BitGraph, EdgePolicy, EnumerationOptions};
use log::debug;
use numpy::PyArray1;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::convert::{
    bucket_by_size, checked_count, cliques_to_arrays, edge_policy, edges_from_py,
    graph_from_array, options_from_py, relabel_edges, reported_sizes, to_py_err, vertex_count,
    worker_count, ArgumentError, MIN_REPORTED_DIM,
};

type CliqueArrays<'py> = (Vec<Bound<'py, PyArray1<i64>>>, bool);

/// Runs the search without holding the GIL and returns the cliques in
/// canonical order together with the truncation flag.
fn run<'py>(
    py: Python<'py>,
    graph: &BitGraph,
    options: &EnumerationOptions,
) -> PyResult<CliqueArrays<'py>> {
    let mut found = py
        .allow_threads(|| enumerate(graph, options))
        .map_err(to_py_err)?;
    found.sort_canonical();
    let (cliques, truncated) = found.into_parts();
    Ok((cliques_to_arrays(py, cliques), truncated))
}

/// Find cliques of a graph given as a dense adjacency matrix.
///
/// By default this returns every maximal clique, found with the Bron-Kerbosch
/// algorithm with pivoting over a degeneracy ordering.
///
/// Args:
///     adjacency: A square 2-D numpy array. Non-zero entries are edges. The
///         matrix must be symmetric with an empty diagonal unless
///         ``normalize`` is set.
///     min_size (int): Smallest clique size to report. Must be >= 1.
///     max_results (int): Stop after this many cliques. 0 means unbounded.
///     maximal_only (bool): Report only maximal cliques. When false every
///         clique within the size bounds is reported.
///     max_size (int | None): Largest clique size to report.
///     workers (int): 1 runs on the calling thread, -1 uses every available
///         thread, any other positive value that many threads.
///     normalize (bool): Symmetrize the matrix and ignore the diagonal
///         instead of raising.
///
/// Returns:
///     tuple[list[numpy.ndarray], bool]: The cliques as ascending ``int64``
///     arrays, sorted by first vertex, size and then lexicographically, and
///     whether the result was truncated by ``max_results``.
#[pyfunction]
#[pyo3(
    signature = (adjacency, /, min_size=1, max_results=0, maximal_only=true, max_size=None, workers=1, normalize=false),
    text_signature = "(adjacency, /, min_size=1, max_results=0, maximal_only=True, max_size=None, workers=1, normalize=False)"
)]
#[allow(clippy::too_many_arguments)]
pub fn find_cliques<'py>(
    py: Python<'py>,
    adjacency: &Bound<'py, PyAny>,
    min_size: i64,
    max_results: i64,
    maximal_only: bool,
    max_size: Option<i64>,
    workers: i64,
    normalize: bool,
) -> PyResult<CliqueArrays<'py>> {
    let options = options_from_py(min_size, max_results, maximal_only, max_size, workers)?;
    let graph = graph_from_array(adjacency, edge_policy(normalize))?;
    run(py, &graph, &options)
}

/// Find cliques of a graph given as an edge list.
///
/// Args:
///     num_nodes (int): Number of vertices. Vertices are ``0..num_nodes``.
///     edge_list (list[tuple[int, int]]): Undirected edges. ``(u, v)`` and
///         ``(v, u)`` are the same edge.
///
/// The remaining arguments and the return value are the same as for
/// :func:`find_cliques`. Self-loops and repeated edges raise unless
/// ``normalize`` is set.
#[pyfunction]
#[pyo3(
    signature = (num_nodes, edge_list, /, min_size=1, max_results=0, maximal_only=true, max_size=None, workers=1, normalize=false),
    text_signature = "(num_nodes, edge_list, /, min_size=1, max_results=0, maximal_only=True, max_size=None, workers=1, normalize=False)"
)]
#[allow(clippy::too_many_arguments)]
pub fn find_cliques_from_edges<'py>(
    py: Python<'py>,
    num_nodes: i64,
    edge_list: Vec<(i64, i64)>,
    min_size: i64,
    max_results: i64,
    maximal_only: bool,
    max_size: Option<i64>,
    workers: i64,
    normalize: bool,
) -> PyResult<CliqueArrays<'py>> {
    let options = options_from_py(min_size, max_results, maximal_only, max_size, workers)?;
    let graph = build_from_edges(num_nodes, &edge_list, edge_policy(normalize))?;
    run(py, &graph, &options)
}

fn build_from_edges(
    num_nodes: i64,
    edge_list: &[(i64, i64)],
    policy: EdgePolicy,
) -> Result<BitGraph, ArgumentError> {
    let num_nodes = vertex_count(num_nodes)?;
    let edges = edges_from_py(edge_list)?;
    Ok(BitGraph::from_edges(num_nodes, &edges, policy)?)
}

/// Enumerate every clique with between 3 and ``max_dim`` vertices.
///
/// Only vertices that appear in ``edge_list`` take part, so sparse or very
/// large ids cost no more than small ones. Self-loops and repeated edges are
/// ignored.
///
/// Args:
///     edge_list (list[tuple[int, int]]): Undirected edges.
///     max_dim (int): Largest clique size to report.
///     workers (int): Number of threads; -1 uses every available thread.
///
/// Returns:
///     dict[int, list[numpy.ndarray]]: For every size ``3..=max_dim`` the
///     cliques of that size as ascending ``int64`` arrays of the original
///     vertex ids. Empty when ``max_dim`` is below 3.
#[pyfunction]
#[pyo3(signature = (edge_list, max_dim=3, workers=-1), text_signature = "(edge_list, max_dim=3, workers=-1)")]
pub fn enumerate_cliques<'py>(
    py: Python<'py>,
    edge_list: Vec<(i64, i64)>,
    max_dim: i64,
    workers: i64,
) -> PyResult<Bound<'py, PyDict>> {
    let result = PyDict::new(py);
    let workers = worker_count(workers)?;
    let max_dim = checked_count("max_dim", max_dim)?;
    if reported_sizes(max_dim).is_empty() {
        return Ok(result);
    }

    let relabeled = relabel_edges(&edges_from_py(&edge_list)?);
    let graph =
        BitGraph::from_edges(relabeled.num_nodes(), &relabeled.edges, EdgePolicy::Normalize)
            .map_err(to_py_err)?;
    let options = EnumerationOptions::default()
        .with_maximal_only(false)
        .with_min_size(MIN_REPORTED_DIM)
        .with_max_size(Some(max_dim))
        .with_workers(workers);
    debug!(
        "enumerate_cliques: {} vertices, {} edges, max_dim={}",
        relabeled.num_nodes(),
        graph.edge_count(),
        max_dim
    );

    let found = py
        .allow_threads(|| enumerate(&graph, &options))
        .map_err(to_py_err)?;
    let cliques = found
        .into_iter()
        .map(|clique| relabeled.restore(clique))
        .collect();
    for (size, bucket) in bucket_by_size(cliques, max_dim) {
        result.set_item(size, cliques_to_arrays(py, bucket))?;
    }
    Ok(result)
}

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

//! # clique-enumerator-core
//!
//! Exact clique enumeration on undirected simple graphs.
//!
//! - [`graph`]: [`BitGraph`], an immutable bitset adjacency built from a dense
//!   matrix, an edge list or a petgraph graph.
//! - [`ordering`]: degeneracy ordering with deterministic tie-breaking.
//! - [`engine`]: Bron-Kerbosch with pivoting over the degeneracy order, plus
//!   plain enumeration of every clique.
//! - [`collector`]: the returned [`CliqueSet`], result cap and cancellation.
//!
//! ```
//! use clique_enumerator_core::{enumerate, BitGraph, EdgePolicy, EnumerationOptions};
//! use ndarray::array;
//!
//! let adjacency = array![
//!     [false, true, true, false],
//!     [true, false, true, false],
//!     [true, true, false, true],
//!     [false, false, true, false],
//! ];
//! let graph = BitGraph::from_dense(adjacency.view(), EdgePolicy::Strict)?;
//! let mut found = enumerate(&graph, &EnumerationOptions::default())?;
//! found.sort_canonical();
//! assert_eq!(found.cliques(), &[vec![0, 1, 2], vec![2, 3]]);
//! # Ok::<(), clique_enumerator_core::CliqueError>(())
//! ```
//!
//! The search runs on the calling thread unless
//! [`EnumerationOptions::workers`] asks for rayon workers. Logging goes
//! through the `log` facade; install any logger to see it.

pub mod collector;
pub mod engine;
pub mod error;
pub mod graph;
pub mod options;
pub mod ordering;

pub use collector::{CancelToken, Clique, CliqueSet, Termination};
pub use engine::{enumerate, enumerate_with_cancel};
pub use error::{CliqueError, GraphError, OptionsError, Result};
pub use graph::BitGraph;
pub use options::{EdgePolicy, EnumerationOptions, SearchStrategy};
pub use ordering::DegeneracyOrdering;

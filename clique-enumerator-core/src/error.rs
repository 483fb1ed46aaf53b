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

//! Error types for graph construction and option validation.

use thiserror::Error;

/// Reasons an adjacency input is rejected before any search starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("adjacency matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("self-loop at vertex {0}")]
    SelfLoop(usize),
    #[error("adjacency is not symmetric: ({u}, {v}) is set but ({v}, {u}) is not")]
    Asymmetric { u: usize, v: usize },
    #[error("vertex {vertex} out of range for a graph with {num_nodes} vertices")]
    VertexOutOfRange { vertex: usize, num_nodes: usize },
    #[error("duplicate edge ({u}, {v})")]
    DuplicateEdge { u: usize, v: usize },
}

/// Reasons an [`EnumerationOptions`](crate::EnumerationOptions) value is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("min_size must be at least 1")]
    MinSizeZero,
    #[error("max_size ({max_size}) must not be smaller than min_size ({min_size})")]
    MaxSizeBelowMinSize { min_size: usize, max_size: usize },
    #[error("could not build worker pool: {0}")]
    WorkerPool(String),
}

/// Umbrella error returned by the enumeration entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliqueError {
    #[error("invalid graph: {0}")]
    InvalidGraph(#[from] GraphError),
    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),
}

pub type Result<T, E = CliqueError> = std::result::Result<T, E>;

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

//! Enumeration options and input policies.

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// How graph construction treats self-loops, repeated edges and asymmetric
/// matrix entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Reject the input with a [`GraphError`](crate::GraphError).
    #[default]
    Strict,
    /// Drop self-loops, merge duplicates and symmetrize.
    Normalize,
}

/// How the backtracking search keeps its state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Plain recursion on the call stack.
    #[default]
    Recursive,
    /// Explicit frame stack on the heap, for graphs with very deep searches.
    Iterative,
}

/// Options accepted by [`enumerate`](crate::enumerate).
///
/// ```
/// use clique_enumerator_core::EnumerationOptions;
///
/// let opts = EnumerationOptions::default()
///     .with_min_size(3)
///     .with_max_results(100);
/// assert!(opts.validate().is_ok());
/// assert!(opts.maximal_only);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationOptions {
    /// Smallest clique size reported. Must be at least 1.
    pub min_size: usize,
    /// Largest clique size reported, if bounded.
    pub max_size: Option<usize>,
    /// Stop after this many cliques; 0 means unbounded.
    pub max_results: usize,
    /// Report only maximal cliques.
    pub maximal_only: bool,
    /// 1 runs on the calling thread, 0 uses the global rayon pool, and any
    /// other value builds a dedicated pool with that many threads.
    pub workers: usize,
    pub strategy: SearchStrategy,
}

impl Default for EnumerationOptions {
    fn default() -> Self {
        Self {
            min_size: 1,
            max_size: None,
            max_results: 0,
            maximal_only: true,
            workers: 1,
            strategy: SearchStrategy::Recursive,
        }
    }
}

impl EnumerationOptions {
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_max_size(mut self, max_size: Option<usize>) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_maximal_only(mut self, maximal_only: bool) -> Self {
        self.maximal_only = maximal_only;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Checks the option invariants without touching any graph.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.min_size == 0 {
            return Err(OptionsError::MinSizeZero);
        }
        if let Some(max_size) = self.max_size {
            if max_size < self.min_size {
                return Err(OptionsError::MaxSizeBelowMinSize {
                    min_size: self.min_size,
                    max_size,
                });
            }
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn admits(&self, size: usize) -> bool {
        size >= self.min_size && self.max_size.map_or(true, |max| size <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let opts = EnumerationOptions::default();
        assert_eq!(opts.min_size, 1);
        assert_eq!(opts.max_results, 0);
        assert!(opts.maximal_only);
        assert_eq!(opts.workers, 1);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_sizes() {
        let zero = EnumerationOptions::default().with_min_size(0);
        assert_eq!(zero.validate(), Err(OptionsError::MinSizeZero));
        let inverted = EnumerationOptions::default()
            .with_min_size(4)
            .with_max_size(Some(3));
        assert_eq!(
            inverted.validate(),
            Err(OptionsError::MaxSizeBelowMinSize { min_size: 4, max_size: 3 })
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let opts: EnumerationOptions =
            serde_json::from_str(r#"{"min_size": 3, "strategy": "iterative"}"#).unwrap();
        assert_eq!(opts.min_size, 3);
        assert_eq!(opts.strategy, SearchStrategy::Iterative);
        assert!(opts.maximal_only);
        assert_eq!(opts.max_size, None);
    }

    #[test]
    fn admits_respects_both_bounds() {
        let opts = EnumerationOptions::default()
            .with_min_size(2)
            .with_max_size(Some(3));
        assert!(!opts.admits(1));
        assert!(opts.admits(2));
        assert!(opts.admits(3));
        assert!(!opts.admits(4));
    }
}

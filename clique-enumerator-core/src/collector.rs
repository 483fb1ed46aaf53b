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

//! Result accumulation, result cap and cancellation.

use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::options::EnumerationOptions;

/// A clique as ascending vertex indices.
pub type Clique = Vec<usize>;

/// Why an enumeration stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The whole search space was explored.
    #[default]
    Completed,
    /// More cliques existed than `max_results` allowed.
    ResultCap,
    /// The [`CancelToken`] was triggered.
    Cancelled,
}

/// Cooperative cancellation flag shared between the caller and a running
/// enumeration. Cloning shares the flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result cap shared by every worker of one enumeration.
#[derive(Debug)]
pub(crate) struct Budget {
    limit: usize,
    reserved: AtomicUsize,
    exhausted: AtomicBool,
}

impl Budget {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            limit,
            reserved: AtomicUsize::new(0),
            exhausted: AtomicBool::new(false),
        }
    }

    /// Claims one output slot. Fails once `limit` slots are taken.
    fn try_reserve(&self) -> bool {
        if self.limit == 0 {
            return true;
        }
        if self.reserved.fetch_add(1, Ordering::AcqRel) < self.limit {
            true
        } else {
            self.exhausted.store(true, Ordering::Release);
            false
        }
    }

    #[inline]
    pub(crate) fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }
}

/// Per-worker sink the engine reports cliques into.
pub(crate) struct Collector<'a> {
    cliques: Vec<Clique>,
    budget: &'a Budget,
    options: &'a EnumerationOptions,
}

impl<'a> Collector<'a> {
    pub(crate) fn new(budget: &'a Budget, options: &'a EnumerationOptions) -> Self {
        Self {
            cliques: Vec::new(),
            budget,
            options,
        }
    }

    /// Stores a copy of `vertices`, sorted ascending. Breaks when the result
    /// cap rejects it.
    pub(crate) fn offer(&mut self, vertices: &[usize]) -> ControlFlow<()> {
        if !self.options.admits(vertices.len()) {
            return ControlFlow::Continue(());
        }
        if !self.budget.try_reserve() {
            return ControlFlow::Break(());
        }
        let mut clique = vertices.to_vec();
        clique.sort_unstable();
        self.cliques.push(clique);
        ControlFlow::Continue(())
    }

    #[inline]
    pub(crate) fn is_exhausted(&self) -> bool {
        self.budget.is_exhausted()
    }

    pub(crate) fn into_cliques(self) -> Vec<Clique> {
        self.cliques
    }
}

/// The cliques found by one enumeration call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliqueSet {
    cliques: Vec<Clique>,
    termination: Termination,
}

impl CliqueSet {
    pub(crate) fn new(cliques: Vec<Clique>, termination: Termination) -> Self {
        Self {
            cliques,
            termination,
        }
    }

    /// Cliques in emission order.
    #[inline]
    pub fn cliques(&self) -> &[Clique] {
        &self.cliques
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clique> {
        self.cliques.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cliques.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cliques.is_empty()
    }

    /// `true` if the enumeration stopped before exploring everything,
    /// through the result cap or cancellation.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.termination != Termination::Completed
    }

    #[inline]
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Sorts by smallest vertex, then size, then lexicographically.
    pub fn sort_canonical(&mut self) {
        self.cliques.sort_by(|a, b| {
            a.first()
                .cmp(&b.first())
                .then_with(|| a.len().cmp(&b.len()))
                .then_with(|| a.cmp(b))
        });
    }

    /// Groups the cliques by size, keeping emission order inside each group.
    pub fn by_size(&self) -> BTreeMap<usize, Vec<Clique>> {
        let mut groups: BTreeMap<usize, Vec<Clique>> = BTreeMap::new();
        for clique in &self.cliques {
            groups.entry(clique.len()).or_default().push(clique.clone());
        }
        groups
    }

    /// Splits into the clique sequence and the truncation flag.
    pub fn into_parts(self) -> (Vec<Clique>, bool) {
        let truncated = self.is_truncated();
        (self.cliques, truncated)
    }
}

impl IntoIterator for CliqueSet {
    type Item = Clique;
    type IntoIter = std::vec::IntoIter<Clique>;

    fn into_iter(self) -> Self::IntoIter {
        self.cliques.into_iter()
    }
}

impl<'a> IntoIterator for &'a CliqueSet {
    type Item = &'a Clique;
    type IntoIter = std::slice::Iter<'a, Clique>;

    fn into_iter(self) -> Self::IntoIter {
        self.cliques.iter()
    }
}

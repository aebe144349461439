// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only view over one sort.

use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use crate::adjacency::Adjacency;
use crate::engine::RootSets;
use crate::id::NodeId;
use crate::intern::{HashedIndex, Interner, NodeIndex};

/// The outcome of one [`TopoSort::sort`](crate::TopoSort::sort) call.
///
/// A result borrows the node table of the [`TopoSort`](crate::TopoSort) that
/// produced it, so no nodes or edges can be added while it is alive. Sort
/// again after adding more to get a fresh result.
///
/// Rounds are ordered: every node's leaders are in strictly earlier rounds,
/// and no two nodes in the same round have an edge between them, so the
/// members of one round can be processed concurrently. Within a round, only
/// the first round has a specified order (ascending id).
///
/// # Example
///
/// ```
/// use understory_toposort::TopoSort;
///
/// let mut topo = TopoSort::new();
/// topo.add(Some("fetch"), "build").unwrap();
/// topo.add(Some("configure"), "build").unwrap();
/// topo.add(Some("build"), "test").unwrap();
///
/// let sorted = topo.sort().unwrap();
/// assert!(!sorted.has_cycle());
/// assert_eq!(
///     sorted.sorted_sets(),
///     vec![vec![&"fetch", &"configure"], vec![&"build"], vec![&"test"]]
/// );
/// ```
pub struct SortResult<'a, N, X = HashedIndex<N>> {
    interner: &'a Interner<N, X>,
    adjacency: Adjacency,
    sets: RootSets,
}

impl<N, X> Clone for SortResult<'_, N, X> {
    fn clone(&self) -> Self {
        Self {
            interner: self.interner,
            adjacency: self.adjacency.clone(),
            sets: self.sets.clone(),
        }
    }
}

impl<'a, N, X> SortResult<'a, N, X>
where
    X: NodeIndex<N>,
{
    pub(crate) fn new(interner: &'a Interner<N, X>, adjacency: Adjacency, sets: RootSets) -> Self {
        Self {
            interner,
            adjacency,
            sets,
        }
    }

    /// Returns `true` if any node could not be placed in a round.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        !self.sets.cycle.is_empty()
    }

    /// Returns the number of rounds.
    #[must_use]
    pub fn round_count(&self) -> usize {
        self.sets.bounds.len()
    }

    /// Returns the ids in round `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.round_count()`.
    #[must_use]
    pub fn round(&self, index: usize) -> &[NodeId] {
        let start = match index {
            0 => 0,
            i => self.sets.bounds[i - 1],
        };
        &self.sets.order[start..self.sets.bounds[index]]
    }

    /// Iterates over the rounds as id slices, in order.
    #[must_use]
    pub fn rounds(&self) -> Rounds<'_> {
        Rounds {
            order: &self.sets.order,
            bounds: &self.sets.bounds,
            start: 0,
        }
    }

    /// Returns every round as a list of node values.
    #[must_use]
    pub fn sorted_sets(&self) -> Vec<Vec<&'a N>> {
        self.rounds()
            .map(|round| round.iter().map(|&id| self.node(id)).collect())
            .collect()
    }

    /// Returns all rooted ids, round after round: a topological order of
    /// the rooted nodes.
    #[must_use]
    pub fn order(&self) -> &[NodeId] {
        &self.sets.order
    }

    /// Returns all rooted node values, round after round.
    ///
    /// This is the concatenation of [`sorted_sets`](Self::sorted_sets).
    #[must_use]
    pub fn sorted_list(&self) -> Vec<&'a N> {
        self.sets.order.iter().map(|&id| self.node(id)).collect()
    }

    /// Returns the ids that were never rooted, ascending.
    ///
    /// This includes cycle members and anything that depends on them.
    #[must_use]
    pub fn cycle_set(&self) -> &[NodeId] {
        &self.sets.cycle
    }

    /// Returns the ids with no leaders: the first round.
    ///
    /// These are the natural starting points for walking the graph with
    /// [`dependents`](Self::dependents).
    #[must_use]
    pub fn root_set(&self) -> &[NodeId] {
        &self.sets.root_set
    }

    /// Returns `true` if `id` was placed in some round.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[must_use]
    pub fn is_rooted(&self, id: NodeId) -> bool {
        self.sets.rooted.contains(id)
    }

    /// Returns the number of ids placed in some round.
    #[must_use]
    pub fn rooted_count(&self) -> usize {
        self.sets.order.len()
    }

    /// Returns the node table, indexed by id.
    #[must_use]
    pub fn nodes(&self) -> &'a [N] {
        self.interner.nodes()
    }

    /// Returns the number of distinct nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.interner.len()
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &'a N {
        self.interner.node(id)
    }

    /// Returns the id of `node`, if it is in the graph.
    #[must_use]
    pub fn id(&self, node: &N) -> Option<NodeId> {
        self.interner.id(node)
    }

    /// Returns the ids that depend directly on `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[must_use]
    pub fn dependents(&self, id: NodeId) -> &[NodeId] {
        self.adjacency.dependents(id)
    }

    /// Returns the ids that `id` depends on directly.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[must_use]
    pub fn leaders(&self, id: NodeId) -> &[NodeId] {
        self.adjacency.leaders(id)
    }

    /// Returns the adjacency this result was computed from.
    #[must_use]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }
}

impl<N, X> fmt::Debug for SortResult<'_, N, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortResult")
            .field("node_count", &self.adjacency.node_count())
            .field("rounds", &self.sets.bounds.len())
            .field("cycle", &self.sets.cycle)
            .finish_non_exhaustive()
    }
}

/// Iterator over the rounds of a [`SortResult`], as id slices.
#[derive(Clone, Debug)]
pub struct Rounds<'r> {
    order: &'r [NodeId],
    bounds: &'r [usize],
    start: usize,
}

impl<'r> Iterator for Rounds<'r> {
    type Item = &'r [NodeId];

    fn next(&mut self) -> Option<Self::Item> {
        let (&end, rest) = self.bounds.split_first()?;
        let round = &self.order[self.start..end];
        self.start = end;
        self.bounds = rest;
        Some(round)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.bounds.len(), Some(self.bounds.len()))
    }
}

impl ExactSizeIterator for Rounds<'_> {}

impl FusedIterator for Rounds<'_> {}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root-set extraction: Kahn's algorithm, one whole zero-degree set at a time.

use alloc::vec::Vec;

use tracing::debug;

use crate::adjacency::Adjacency;
use crate::bitset::IdSet;
use crate::error::TopoError;
use crate::id::NodeId;

/// Rounds and cycle classification produced by [`extract`].
#[derive(Clone, Debug)]
pub(crate) struct RootSets {
    /// Every rooted id, round after round.
    pub(crate) order: Vec<NodeId>,
    /// Exclusive end offset of each round within `order`.
    pub(crate) bounds: Vec<usize>,
    /// The first round, kept separately as the traversal-start set.
    pub(crate) root_set: Vec<NodeId>,
    /// Ids placed into some round.
    pub(crate) rooted: IdSet,
    /// Ids never rooted, ascending.
    pub(crate) cycle: Vec<NodeId>,
}

/// Runs root-set extraction over `adjacency`.
///
/// # Algorithm
///
/// 1. Count the distinct leaders of every node (its incoming degree).
/// 2. The first round is every node with degree zero, in ascending id order.
/// 3. While the current round is non-empty: emit it, mark its members rooted,
///    and decrement the degree of each member's dependents. Dependents whose
///    degree reaches zero form the next round.
/// 4. Whatever was never rooted is reported as cyclic.
///
/// A dependent that is already rooted is skipped rather than decremented: the
/// edge points back into a finalized round. Nodes whose only path in runs
/// through a cycle never reach degree zero and are reported as cyclic along
/// with the cycle itself; this is not a strongly-connected-component test.
///
/// # Performance
///
/// - Time complexity: O(V + E); every node is rooted at most once and every
///   distinct edge is followed at most once.
/// - Space complexity: O(V) scratch on top of the adjacency, all released
///   when the returned sets are dropped.
pub(crate) fn extract(adjacency: &Adjacency, verbose: bool) -> Result<RootSets, TopoError> {
    let n = adjacency.node_count();
    let mut degree = adjacency.in_degrees()?;

    let mut current = Vec::new();
    current.try_reserve(n)?;
    current.extend(dense_ids(n).filter(|id| degree[id.as_usize()] == 0));

    let mut root_set = Vec::new();
    root_set.try_reserve_exact(current.len())?;
    root_set.extend_from_slice(&current);

    let mut next = Vec::new();
    next.try_reserve(n)?;
    let mut rooted = IdSet::with_len(n)?;
    let mut order = Vec::new();
    order.try_reserve_exact(n)?;
    let mut bounds = Vec::new();

    while !current.is_empty() {
        order.extend_from_slice(&current);
        bounds.try_reserve(1)?;
        bounds.push(order.len());
        if verbose {
            debug!(round = bounds.len() - 1, size = current.len(), "rooted round");
        }

        for &r in &current {
            rooted.insert(r);
        }
        for &r in &current {
            for &d in adjacency.dependents(r) {
                if rooted.contains(d) {
                    continue;
                }
                let deg = &mut degree[d.as_usize()];
                *deg -= 1;
                if *deg == 0 {
                    next.push(d);
                }
            }
        }

        core::mem::swap(&mut current, &mut next);
        next.clear();
    }

    let mut cycle = Vec::new();
    cycle.try_reserve_exact(n - order.len())?;
    cycle.extend(rooted.iter_missing());

    if verbose {
        debug!(
            rounds = bounds.len(),
            rooted = order.len(),
            cyclic = cycle.len(),
            "root-set extraction finished"
        );
    }

    Ok(RootSets {
        order,
        bounds,
        root_set,
        rooted,
        cycle,
    })
}

fn dense_ids(n: usize) -> impl Iterator<Item = NodeId> {
    (0..n).filter_map(|i| NodeId::from_index(i).ok())
}

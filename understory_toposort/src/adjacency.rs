// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adjacency lists derived from a [`DependencyLog`](crate::DependencyLog).

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::error::TopoError;
use crate::id::NodeId;
use crate::log::Edge;

/// Per-node neighbor list. Fan-out is usually small.
type Neighbors = SmallVec<[NodeId; 4]>;

/// Bidirectional adjacency: "who depends on me" and "who do I depend on".
///
/// Built fresh from the full edge log on every sort, sized to the node count
/// at that moment, so a graph that grows between sorts never sees stale
/// lists. Each list is deduplicated and keeps first-recorded order.
#[derive(Clone, Debug, Default)]
pub struct Adjacency {
    /// `dependents[leader]` -> ids that name `leader` as a leader.
    dependents: Vec<Neighbors>,
    /// `leaders[dependent]` -> ids that `dependent` names as leaders.
    leaders: Vec<Neighbors>,
    /// Distinct edges after deduplication.
    edge_count: usize,
}

impl Adjacency {
    /// Builds adjacency for `node_count` nodes from `edges`.
    ///
    /// Edges without a leader contribute nothing beyond the node's existence.
    ///
    /// # Panics
    ///
    /// Panics if an edge names an id `>= node_count`.
    pub fn build(node_count: usize, edges: &[Edge]) -> Result<Self, TopoError> {
        let mut dependents = Vec::new();
        dependents.try_reserve_exact(node_count)?;
        dependents.resize_with(node_count, Neighbors::new);
        let mut leaders = Vec::new();
        leaders.try_reserve_exact(node_count)?;
        leaders.resize_with(node_count, Neighbors::new);

        let mut edge_count = 0;
        for edge in edges {
            let Some(leader) = edge.leader else {
                continue;
            };
            // Fan-out is small enough that a linear scan beats hashing.
            let out = &mut dependents[leader.as_usize()];
            if out.contains(&edge.dependent) {
                continue;
            }
            out.try_reserve(1)?;
            out.push(edge.dependent);
            let back = &mut leaders[edge.dependent.as_usize()];
            back.try_reserve(1)?;
            back.push(leader);
            edge_count += 1;
        }

        Ok(Self {
            dependents,
            leaders,
            edge_count,
        })
    }

    /// Returns the number of nodes covered.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.dependents.len()
    }

    /// Returns the number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns the ids that depend directly on `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[must_use]
    pub fn dependents(&self, id: NodeId) -> &[NodeId] {
        &self.dependents[id.as_usize()]
    }

    /// Returns the ids that `id` depends on directly.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[must_use]
    pub fn leaders(&self, id: NodeId) -> &[NodeId] {
        &self.leaders[id.as_usize()]
    }

    /// Returns the incoming degree of every node: its number of distinct leaders.
    pub(crate) fn in_degrees(&self) -> Result<Vec<u32>, TopoError> {
        let mut degree = Vec::new();
        degree.try_reserve_exact(self.dependents.len())?;
        degree.resize(self.dependents.len(), 0_u32);
        for out in &self.dependents {
            for d in out {
                degree[d.as_usize()] += 1;
            }
        }
        Ok(degree)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;

    fn id(raw: usize) -> NodeId {
        NodeId::from_index(raw).unwrap()
    }

    fn edge(leader: Option<usize>, dependent: usize) -> Edge {
        Edge {
            leader: leader.map(id),
            dependent: id(dependent),
        }
    }

    #[test]
    fn duplicate_edges_collapse() {
        let edges = vec![edge(Some(0), 1), edge(Some(0), 1), edge(Some(0), 2)];
        let adj = Adjacency::build(3, &edges).unwrap();
        assert_eq!(adj.dependents(id(0)), &[id(1), id(2)]);
        assert_eq!(adj.leaders(id(1)), &[id(0)]);
        assert_eq!(adj.edge_count(), 2);
    }

    #[test]
    fn leaderless_edges_only_size_the_tables() {
        let edges = vec![edge(None, 0), edge(None, 1)];
        let adj = Adjacency::build(2, &edges).unwrap();
        assert_eq!(adj.node_count(), 2);
        assert_eq!(adj.edge_count(), 0);
        assert!(adj.dependents(id(0)).is_empty());
        assert!(adj.leaders(id(1)).is_empty());
    }

    #[test]
    fn in_degree_counts_distinct_leaders() {
        // 0 -> 2, 1 -> 2 (twice), 2 -> 2
        let edges = vec![
            edge(Some(0), 2),
            edge(Some(1), 2),
            edge(Some(1), 2),
            edge(Some(2), 2),
        ];
        let adj = Adjacency::build(3, &edges).unwrap();
        assert_eq!(adj.in_degrees().unwrap(), vec![0, 0, 3]);
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Append-only dependency log.

use alloc::vec::Vec;

use crate::error::TopoError;
use crate::id::NodeId;

/// One recorded dependency: `dependent` must come after `leader`.
///
/// A missing leader marks `dependent` as a node that depends on nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// The node that must precede `dependent`, if any.
    pub leader: Option<NodeId>,
    /// The node that requires `leader`.
    pub dependent: NodeId,
}

/// Ordered record of every dependency added to a graph.
///
/// Edges are never removed or deduplicated here; duplicates collapse when
/// [`Adjacency`](crate::Adjacency) is built.
#[derive(Clone, Debug, Default)]
pub struct DependencyLog {
    edges: Vec<Edge>,
}

impl DependencyLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    /// Reserves room for `additional` edges.
    pub fn reserve(&mut self, additional: usize) -> Result<(), TopoError> {
        self.edges.try_reserve(additional)?;
        Ok(())
    }

    /// Appends an edge.
    pub fn record(&mut self, leader: Option<NodeId>, dependent: NodeId) {
        self.edges.push(Edge { leader, dependent });
    }

    /// Returns all recorded edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of recorded edges, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

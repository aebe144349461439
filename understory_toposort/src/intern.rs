// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node interning: maps node values to dense [`NodeId`]s.
//!
//! The [`Interner`] owns the node table. Each distinct value is stored once,
//! in first-seen order, so a node's id is also its index in the table.
//!
//! How values are found again is delegated to a [`NodeIndex`], chosen once by
//! type parameter:
//!
//! - [`HashedIndex`]: any `Eq + Hash` node type. Uses a hash-bucket index
//!   (hash -> small list of candidate ids) so values are never duplicated
//!   into the index.
//! - [`DenseIndex`]: integer node types with a configured
//!   [`max_range`](crate::SortConfig::max_range). A flat slot table indexed by
//!   the value itself, trading `max_range` slots of memory for lookups that
//!   never hash.
//!
//! ## Ownership
//!
//! Values are moved into the table; a value that is already interned is
//! dropped. Reference-like node types such as `&'a str` are stored as the
//! reference, so the borrow checker keeps the referenced memory alive for as
//! long as the table exists.
//!
//! ## Example
//!
//! ```rust
//! use understory_toposort::intern::{HashedIndex, Interner};
//! use understory_toposort::SortConfig;
//!
//! let mut ids = Interner::<&str, HashedIndex<&str>>::new(&SortConfig::new()).unwrap();
//! let a = ids.add_node("a").unwrap();
//! let b = ids.add_node("b").unwrap();
//! assert_eq!(ids.add_node("a").unwrap(), a);
//! assert_eq!(ids.id(&"b"), Some(b));
//! assert_eq!(*ids.node(b), "b");
//! ```

use alloc::vec::Vec;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;

use hashbrown::DefaultHashBuilder;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::config::SortConfig;
use crate::error::TopoError;
use crate::id::NodeId;

/// Identity lookup strategy for an [`Interner`].
///
/// An index never stores ids for values it has not been told about via
/// [`insert`](Self::insert), and [`find`](Self::find) may consult the node
/// table to confirm equality.
pub trait NodeIndex<N>: Sized {
    /// Builds an empty index for `config`.
    fn from_config(config: &SortConfig) -> Result<Self, TopoError>;

    /// Returns the id of `node`, if it has been inserted.
    ///
    /// `nodes` is the interner's node table, indexed by id.
    fn find(&self, nodes: &[N], node: &N) -> Option<NodeId>;

    /// Checks every value of `batch` and reserves room to index the ones not
    /// yet inserted.
    ///
    /// Returns how many distinct values of `batch` are new. After this
    /// succeeds, inserting those values must not fail or allocate.
    fn admit(&mut self, nodes: &[N], batch: &[&N]) -> Result<usize, TopoError>;

    /// Records `id` as the id of `node`.
    ///
    /// `node` must have been admitted.
    fn insert(&mut self, node: &N, id: NodeId);
}

/// Hash-backed [`NodeIndex`] for any `Eq + Hash` node type.
#[derive(Clone)]
pub struct HashedIndex<N> {
    buckets: HashMap<u64, SmallVec<[NodeId; 1]>>,
    build_hasher: DefaultHashBuilder,
    _node: PhantomData<fn(&N)>,
}

impl<N> fmt::Debug for HashedIndex<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedIndex")
            .field("buckets", &self.buckets.len())
            .finish_non_exhaustive()
    }
}

impl<N> Default for HashedIndex<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> HashedIndex<N> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
            build_hasher: DefaultHashBuilder::default(),
            _node: PhantomData,
        }
    }
}

impl<N> HashedIndex<N>
where
    N: Hash,
{
    fn hash(&self, node: &N) -> u64 {
        self.build_hasher.hash_one(node)
    }
}

impl<N> NodeIndex<N> for HashedIndex<N>
where
    N: Eq + Hash,
{
    fn from_config(_config: &SortConfig) -> Result<Self, TopoError> {
        Ok(Self::new())
    }

    fn find(&self, nodes: &[N], node: &N) -> Option<NodeId> {
        let ids = self.buckets.get(&self.hash(node))?;
        ids.iter()
            .copied()
            .find(|id| nodes[id.as_usize()] == *node)
    }

    fn admit(&mut self, nodes: &[N], batch: &[&N]) -> Result<usize, TopoError> {
        let mut fresh: HashMap<u64, SmallVec<[&N; 1]>> = HashMap::new();
        fresh.try_reserve(batch.len())?;
        let mut count = 0;
        for &node in batch {
            if self.find(nodes, node).is_some() {
                continue;
            }
            let seen = fresh.entry(self.hash(node)).or_default();
            if seen.contains(&node) {
                continue;
            }
            seen.try_reserve(1)?;
            seen.push(node);
            count += 1;
        }

        // An empty bucket left behind by a failure here matches nothing.
        self.buckets.try_reserve(fresh.len())?;
        for (&hash, seen) in &fresh {
            self.buckets.entry(hash).or_default().try_reserve(seen.len())?;
        }
        Ok(count)
    }

    fn insert(&mut self, node: &N, id: NodeId) {
        // Bucket capacity was reserved by `admit`.
        let hash = self.hash(node);
        self.buckets.entry(hash).or_default().push(id);
    }
}

/// Node types that can address a [`DenseIndex`] slot directly.
///
/// Implemented for the primitive integer types.
pub trait DenseNode {
    /// Returns the slot index for this value, or `None` if the value has no
    /// non-negative `usize` representation.
    fn dense_index(&self) -> Option<usize>;
}

macro_rules! impl_dense_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl DenseNode for $ty {
                #[inline]
                fn dense_index(&self) -> Option<usize> {
                    usize::try_from(*self).ok()
                }
            }
        )*
    };
}

impl_dense_node!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize,
);

/// Flat-array [`NodeIndex`] for bounded non-negative integer node types.
///
/// Allocates `max_range` slots up front. Values outside `0..max_range` are
/// rejected with [`TopoError::OutOfRange`].
#[derive(Clone)]
pub struct DenseIndex {
    slots: Vec<Option<NodeId>>,
}

impl fmt::Debug for DenseIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseIndex")
            .field("max_range", &self.slots.len())
            .finish_non_exhaustive()
    }
}

impl DenseIndex {
    /// Returns the exclusive upper bound on indexable values.
    #[must_use]
    pub fn max_range(&self) -> usize {
        self.slots.len()
    }

    fn slot<N: DenseNode>(&self, node: &N) -> Result<usize, TopoError> {
        node.dense_index()
            .filter(|&i| i < self.slots.len())
            .ok_or(TopoError::OutOfRange {
                max_range: self.slots.len(),
            })
    }
}

impl<N> NodeIndex<N> for DenseIndex
where
    N: DenseNode,
{
    fn from_config(config: &SortConfig) -> Result<Self, TopoError> {
        let max_range = config.max_range.ok_or(TopoError::MissingMaxRange)?;
        let mut slots = Vec::new();
        slots.try_reserve_exact(max_range)?;
        slots.resize(max_range, None);
        Ok(Self { slots })
    }

    fn find(&self, _nodes: &[N], node: &N) -> Option<NodeId> {
        let slot = node.dense_index()?;
        self.slots.get(slot).copied().flatten()
    }

    fn admit(&mut self, _nodes: &[N], batch: &[&N]) -> Result<usize, TopoError> {
        let mut fresh = Vec::new();
        fresh.try_reserve_exact(batch.len())?;
        for &node in batch {
            let slot = self.slot(node)?;
            if self.slots[slot].is_none() {
                fresh.push(slot);
            }
        }
        fresh.sort_unstable();
        fresh.dedup();
        Ok(fresh.len())
    }

    fn insert(&mut self, node: &N, id: NodeId) {
        if let Ok(slot) = self.slot(node) {
            self.slots[slot] = Some(id);
        }
    }
}

/// Interns node values into dense [`NodeId`]s.
///
/// Ids are assigned in first-seen order and are never reassigned; the
/// interner only grows.
#[derive(Clone)]
pub struct Interner<N, X> {
    nodes: Vec<N>,
    index: X,
}

impl<N, X: fmt::Debug> fmt::Debug for Interner<N, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner")
            .field("len", &self.nodes.len())
            .field("index", &self.index)
            .finish()
    }
}

impl<N, X> Interner<N, X>
where
    X: NodeIndex<N>,
{
    /// Creates an empty interner whose index is built from `config`.
    pub fn new(config: &SortConfig) -> Result<Self, TopoError> {
        X::from_config(config).map(Self::with_index)
    }

    /// Creates an empty interner around an existing, empty `index`.
    #[must_use]
    pub fn with_index(index: X) -> Self {
        Self {
            nodes: Vec::new(),
            index,
        }
    }

    /// Returns the number of interned nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no nodes have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node table, indexed by id.
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Returns the id of `node`, if it has been interned.
    #[must_use]
    pub fn id(&self, node: &N) -> Option<NodeId> {
        self.index.find(&self.nodes, node)
    }

    /// Returns the node for `id`, if the id is in range.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&N> {
        self.nodes.get(id.as_usize())
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by this interner.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &N {
        &self.nodes[id.as_usize()]
    }

    /// Interns `node` and returns its id.
    ///
    /// If an equal node was already interned, this returns the existing id and
    /// drops `node`.
    pub fn add_node(&mut self, node: N) -> Result<NodeId, TopoError> {
        if let Some(id) = self.index.find(&self.nodes, &node) {
            return Ok(id);
        }
        self.index.admit(&self.nodes, &[&node])?;
        let id = NodeId::from_index(self.nodes.len())?;
        self.nodes.try_reserve(1)?;
        self.index.insert(&node, id);
        self.nodes.push(node);
        Ok(id)
    }

    /// Checks that every node in `nodes` can be interned, reserving room for
    /// the ones that are new.
    ///
    /// Returns the number of distinct new values. Once this succeeds,
    /// [`add_node`](Self::add_node) for the same values will not fail, so
    /// callers can admit a batch before mutating anything.
    pub fn admit(&mut self, nodes: &[&N]) -> Result<usize, TopoError> {
        let new = self.index.admit(&self.nodes, nodes)?;
        if new > 0 {
            NodeId::from_index(self.nodes.len() + new - 1)?;
            self.nodes.try_reserve(new)?;
        }
        Ok(new)
    }
}

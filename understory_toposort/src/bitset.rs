// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact membership set over dense ids.

use alloc::vec::Vec;
use core::fmt;

use crate::error::TopoError;
use crate::id::NodeId;

const WORD_BITS: usize = u64::BITS as usize;

/// A fixed-capacity bitset of [`NodeId`]s in `0..len`.
#[derive(Clone, PartialEq, Eq)]
pub struct IdSet {
    words: Vec<u64>,
    len: usize,
}

impl IdSet {
    /// Creates an empty set that can hold ids in `0..len`.
    pub fn with_len(len: usize) -> Result<Self, TopoError> {
        let n_words = len.div_ceil(WORD_BITS);
        let mut words = Vec::new();
        words.try_reserve_exact(n_words)?;
        words.resize(n_words, 0);
        Ok(Self { words, len })
    }

    /// Returns the id capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.len
    }

    /// Returns `true` if `id` is in the set.
    ///
    /// # Panics
    ///
    /// Panics if `id` is outside the set's capacity.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        let i = id.as_usize();
        assert!(i < self.len, "id {id:?} out of range for IdSet of {}", self.len);
        self.words[i / WORD_BITS] & (1_u64 << (i % WORD_BITS)) != 0
    }

    /// Inserts `id`, returning `true` if it was not already present.
    ///
    /// # Panics
    ///
    /// Panics if `id` is outside the set's capacity.
    pub fn insert(&mut self, id: NodeId) -> bool {
        let i = id.as_usize();
        assert!(i < self.len, "id {id:?} out of range for IdSet of {}", self.len);
        let word = &mut self.words[i / WORD_BITS];
        let bit = 1_u64 << (i % WORD_BITS);
        let fresh = *word & bit == 0;
        *word |= bit;
        fresh
    }

    /// Returns the number of ids in the set.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the ids in `0..capacity` that are *not* in the set, ascending.
    pub fn iter_missing(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.len)
            .filter(|&i| self.words[i / WORD_BITS] & (1_u64 << (i % WORD_BITS)) == 0)
            .filter_map(|i| NodeId::from_index(i).ok())
    }
}

impl fmt::Debug for IdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdSet")
            .field("len", &self.len)
            .field("count", &self.count())
            .finish()
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense node identifiers.

use core::fmt;

use crate::error::TopoError;

/// A dense node identifier.
///
/// Ids are assigned in first-seen order starting at zero, and are never
/// reassigned or reused for the lifetime of a [`TopoSort`](crate::TopoSort).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns this id as a `usize` index (for tables keyed by node ids).
    #[inline]
    #[must_use]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw numeric id.
    #[inline]
    #[must_use]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Converts a table index into an id.
    ///
    /// Fails with [`TopoError::TooManyNodes`] once the `u32` id space is exhausted.
    pub(crate) fn from_index(index: usize) -> Result<Self, TopoError> {
        u32::try_from(index)
            .map(Self)
            .map_err(|_| TopoError::TooManyNodes)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.as_usize()
    }
}

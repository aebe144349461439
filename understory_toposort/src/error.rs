// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Cycles are not errors: [`TopoSort::sort`](crate::TopoSort::sort) reports
//! them as data on the [`SortResult`](crate::SortResult).

use alloc::collections::TryReserveError;
use alloc::string::String;

use thiserror::Error;

/// Errors returned by graph construction and sorting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopoError {
    /// Growing one of the graph tables failed to allocate.
    ///
    /// Nodes and edges recorded before the failing call are left intact.
    #[error("allocation failed while growing graph storage")]
    AllocationFailure,

    /// A node value does not fit the dense identity index.
    #[error("node value is outside the dense index range 0..{max_range}")]
    OutOfRange {
        /// The configured upper bound (exclusive).
        max_range: usize,
    },

    /// A dense identity index was requested without configuring `max_range`.
    #[error("dense identity index requires a configured max_range")]
    MissingMaxRange,

    /// More distinct nodes were added than a [`NodeId`](crate::NodeId) can address.
    #[error("node id space exhausted")]
    TooManyNodes,

    /// Bulk textual input could not be parsed. Nothing was recorded.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<TryReserveError> for TopoError {
    fn from(_: TryReserveError) -> Self {
        Self::AllocationFailure
    }
}

impl From<hashbrown::TryReserveError> for TopoError {
    fn from(_: hashbrown::TryReserveError) -> Self {
        Self::AllocationFailure
    }
}

impl From<smallvec::CollectionAllocErr> for TopoError {
    fn from(_: smallvec::CollectionAllocErr) -> Self {
        Self::AllocationFailure
    }
}

/// Errors from the bulk textual grammars.
///
/// Offsets are byte offsets into the input text; lines are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// A `(` group was opened but never closed.
    #[error("unterminated group starting at byte {offset}")]
    UnterminatedGroup {
        /// Offset of the opening `(`.
        offset: usize,
    },

    /// A `(` appeared inside an open group.
    #[error("nested group at byte {offset}")]
    NestedGroup {
        /// Offset of the inner `(`.
        offset: usize,
    },

    /// A group contained no tokens.
    #[error("empty group at byte {offset}")]
    EmptyGroup {
        /// Offset of the opening `(`.
        offset: usize,
    },

    /// Non-whitespace text outside of any group, or a stray `)`.
    #[error("unexpected {found:?} at byte {offset}")]
    UnexpectedChar {
        /// The offending character.
        found: char,
        /// Offset of the character.
        offset: usize,
    },

    /// A token could not be converted into the node type.
    #[error("invalid node token {token:?} at byte {offset}")]
    InvalidToken {
        /// The token text.
        token: String,
        /// Offset of the token's first byte.
        offset: usize,
    },

    /// A rule line had leaders but no dependent before the `:`.
    #[error("rule on line {line} has no dependent")]
    MissingDependent {
        /// The 1-based line number.
        line: usize,
    },
}

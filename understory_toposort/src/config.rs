// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time configuration.

/// Options fixed when a [`TopoSort`](crate::TopoSort) is constructed.
///
/// # Example
///
/// ```
/// use understory_toposort::{DenseIndex, SortConfig, TopoSort};
///
/// let config = SortConfig::new().with_max_range(1024).with_verbose(true);
/// let mut topo = TopoSort::<u16, DenseIndex>::with_config(config).unwrap();
/// topo.add(Some(1), 2).unwrap();
/// assert_eq!(topo.node_count(), 2);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SortConfig {
    /// Exclusive upper bound on node values for [`DenseIndex`](crate::DenseIndex).
    ///
    /// Ignored by [`HashedIndex`](crate::HashedIndex).
    pub max_range: Option<usize>,
    /// Emit `debug`-level diagnostic events through `tracing`.
    ///
    /// Has no effect on results.
    pub verbose: bool,
}

impl SortConfig {
    /// Creates the default configuration: no range bound, not verbose.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_range: None,
            verbose: false,
        }
    }

    /// Sets the dense index bound.
    #[must_use]
    pub const fn with_max_range(mut self, max_range: usize) -> Self {
        self.max_range = Some(max_range);
        self
    }

    /// Enables or disables diagnostic tracing.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

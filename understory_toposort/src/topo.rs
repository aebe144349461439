// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental dependency graph with round-grouped sorting.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use tracing::{debug, trace};

use crate::adjacency::Adjacency;
use crate::config::SortConfig;
use crate::engine;
use crate::error::TopoError;
use crate::grammar::{self, ParseNode, Rule};
use crate::id::NodeId;
use crate::intern::{DenseIndex, DenseNode, HashedIndex, Interner, NodeIndex};
use crate::log::DependencyLog;
use crate::result::SortResult;

/// A dependency graph built from `(leader, dependent)` pairs, sortable into
/// rounds of mutually independent nodes.
///
/// Nodes and edges only accumulate. [`sort`](Self::sort) recomputes everything
/// from the full edge log each time it is called, so it is valid to add more
/// and sort again.
///
/// # Type Parameters
///
/// - `N`: The node type.
/// - `X`: The identity index. [`HashedIndex`] (the default) accepts any
///   `Eq + Hash` node; [`DenseIndex`] accepts bounded integer nodes and needs
///   [`SortConfig::max_range`].
///
/// # Example
///
/// ```
/// use understory_toposort::TopoSort;
///
/// let mut topo = TopoSort::<&str>::new();
/// topo.add_graph("(d a b) (c d) (e d) (f e)").unwrap();
///
/// let sorted = topo.sort().unwrap();
/// let rounds: Vec<Vec<&str>> = sorted
///     .sorted_sets()
///     .into_iter()
///     .map(|round| round.into_iter().copied().collect())
///     .collect();
/// assert_eq!(rounds, [vec!["a", "b"], vec!["d"], vec!["c", "e"], vec!["f"]]);
/// ```
///
/// # See Also
///
/// - [`SortResult`]: What [`sort`](Self::sort) returns.
/// - [`Interner`]: The node table behind this type.
pub struct TopoSort<N, X = HashedIndex<N>> {
    interner: Interner<N, X>,
    log: DependencyLog,
    config: SortConfig,
}

impl<N, X> fmt::Debug for TopoSort<N, X>
where
    X: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopoSort")
            .field("interner", &self.interner)
            .field("edges", &self.log.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<N, X> Clone for TopoSort<N, X>
where
    N: Clone,
    X: Clone,
{
    fn clone(&self) -> Self {
        Self {
            interner: self.interner.clone(),
            log: self.log.clone(),
            config: self.config,
        }
    }
}

impl<N> Default for TopoSort<N, HashedIndex<N>>
where
    N: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> TopoSort<N, HashedIndex<N>>
where
    N: Eq + Hash,
{
    /// Creates an empty graph with a hash-backed identity index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            interner: Interner::with_index(HashedIndex::new()),
            log: DependencyLog::new(),
            config: SortConfig::new(),
        }
    }
}

impl<N> TopoSort<N, DenseIndex>
where
    N: DenseNode,
{
    /// Creates an empty graph with a flat identity index over `0..max_range`.
    ///
    /// Shorthand for [`with_config`](Self::with_config) with only
    /// [`max_range`](SortConfig::max_range) set.
    pub fn dense(max_range: usize) -> Result<Self, TopoError> {
        Self::with_config(SortConfig::new().with_max_range(max_range))
    }
}

impl<N, X> TopoSort<N, X>
where
    X: NodeIndex<N>,
{
    /// Creates an empty graph configured by `config`.
    ///
    /// Fails if the identity index cannot be built, e.g. a [`DenseIndex`]
    /// without a `max_range`.
    pub fn with_config(config: SortConfig) -> Result<Self, TopoError> {
        let interner = Interner::new(&config)?;
        if config.verbose {
            debug!(max_range = ?config.max_range, "created topological sorter");
        }
        Ok(Self {
            interner,
            log: DependencyLog::new(),
            config,
        })
    }

    /// Returns the configuration this graph was built with.
    #[must_use]
    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Returns the number of distinct nodes added so far.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.interner.len()
    }

    /// Returns the number of recorded edges, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.log.len()
    }

    /// Returns the node table, indexed by id.
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        self.interner.nodes()
    }

    /// Returns the id of `node`, if it has been added.
    #[must_use]
    pub fn id(&self, node: &N) -> Option<NodeId> {
        self.interner.id(node)
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &N {
        self.interner.node(id)
    }

    /// Records that `dependent` must come after `leading`.
    ///
    /// With `leading` as `None`, `dependent` is added as a node that depends on
    /// nothing. Adding the same pair again is harmless. `leading` is interned
    /// before `dependent`.
    ///
    /// On error nothing is recorded.
    pub fn add(&mut self, leading: Option<N>, dependent: N) -> Result<(), TopoError> {
        match &leading {
            Some(lead) => self.interner.admit(&[lead, &dependent])?,
            None => self.interner.admit(&[&dependent])?,
        };
        self.log.reserve(1)?;

        let leader = leading.map(|lead| self.interner.add_node(lead)).transpose()?;
        let dependent = self.interner.add_node(dependent)?;
        self.log.record(leader, dependent);
        Ok(())
    }

    /// Records that `dependent` must come after `leading`.
    ///
    /// Same as [`add`](Self::add), with the arguments in "dependent : leader"
    /// order.
    pub fn add_dep(&mut self, dependent: N, leading: Option<N>) -> Result<(), TopoError> {
        self.add(leading, dependent)
    }

    /// Records that `dependent` must come after each of `leadings`.
    ///
    /// Stops at the first error; pairs recorded before it are kept.
    pub fn add_deps<I>(&mut self, dependent: N, leadings: I) -> Result<(), TopoError>
    where
        N: Clone,
        I: IntoIterator<Item = N>,
    {
        for leading in leadings {
            self.add(Some(leading), dependent.clone())?;
        }
        Ok(())
    }

    /// Adds every group of `text` in the `(dependent leader ...)` grammar.
    ///
    /// A single-token group adds an isolated node. See the
    /// [`grammar`](crate::grammar) module for details.
    ///
    /// The whole text is parsed before anything is recorded: on a
    /// [`TopoError::Parse`] error the graph is unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use understory_toposort::TopoSort;
    ///
    /// let mut topo = TopoSort::<u32>::new();
    /// topo.add_graph("(3 1 2) (4 3) (9)").unwrap();
    /// assert!(topo.add_graph("(5 1").is_err());
    /// assert_eq!(topo.node_count(), 5);
    /// ```
    pub fn add_graph<'t>(&mut self, text: &'t str) -> Result<(), TopoError>
    where
        N: ParseNode<'t> + Clone,
    {
        let rules = grammar::parse_groups(text)?;
        self.apply(rules, "group")
    }

    /// Adds every line of `text` in the `dependent : leader ...` grammar.
    ///
    /// The whole text is parsed before anything is recorded: on a
    /// [`TopoError::Parse`] error the graph is unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use understory_toposort::TopoSort;
    ///
    /// let mut topo = TopoSort::<&str>::new();
    /// topo.add_rules("link : compile\ncompile : fetch\n").unwrap();
    /// let sorted = topo.sort().unwrap();
    /// assert_eq!(sorted.sorted_list(), [&"fetch", &"compile", &"link"]);
    /// ```
    pub fn add_rules<'t>(&mut self, text: &'t str) -> Result<(), TopoError>
    where
        N: ParseNode<'t> + Clone,
    {
        let rules = grammar::parse_rules(text)?;
        self.apply(rules, "rule")
    }

    fn apply(&mut self, rules: Vec<Rule<N>>, kind: &'static str) -> Result<(), TopoError>
    where
        N: Clone,
    {
        // Check the whole batch up front so a late failure cannot leave it
        // half-recorded.
        let mut pending = Vec::new();
        pending.try_reserve_exact(rules.iter().map(|rule| rule.leaders.len() + 1).sum())?;
        let mut edges = 0;
        for rule in &rules {
            pending.push(&rule.dependent);
            pending.extend(rule.leaders.iter());
            edges += rule.leaders.len().max(1);
        }
        self.interner.admit(&pending)?;
        self.log.reserve(edges)?;

        let count = rules.len();
        for Rule { dependent, leaders } in rules {
            if leaders.is_empty() {
                self.add(None, dependent)?;
                continue;
            }
            for leader in leaders {
                self.add(Some(leader), dependent.clone())?;
            }
        }
        if self.config.verbose {
            debug!(count, kind, "applied bulk input");
        }
        Ok(())
    }

    /// Computes rounds and cycles from every edge recorded so far.
    ///
    /// Cycles are reported on the result, not as an error; the only failure is
    /// [`TopoError::AllocationFailure`].
    pub fn sort(&self) -> Result<SortResult<'_, N, X>, TopoError> {
        trace!(
            nodes = self.interner.len(),
            edges = self.log.len(),
            "sorting"
        );
        let adjacency = Adjacency::build(self.interner.len(), self.log.edges())?;
        if self.config.verbose {
            debug!(
                nodes = adjacency.node_count(),
                edges = adjacency.edge_count(),
                "built adjacency"
            );
        }
        let sets = engine::extract(&adjacency, self.config.verbose)?;
        Ok(SortResult::new(&self.interner, adjacency, sets))
    }
}

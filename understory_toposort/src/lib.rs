// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Toposort: round-grouped topological ordering with cycle reporting.
//!
//! This crate orders a dependency graph that is built incrementally from
//! `(leader, dependent)` pairs. Instead of one flat order it produces
//! **rounds**: each round holds nodes whose leaders all appear in earlier
//! rounds, and no two nodes in a round depend on each other. A caller can run
//! each round's members concurrently and the rounds one after another.
//!
//! The pieces, leaf-first:
//!
//! - **Interning** ([`Interner`], [`NodeIndex`]): maps node values of any type
//!   to dense [`NodeId`]s in first-seen order, via a hash index
//!   ([`HashedIndex`]) or a flat slot table for bounded integers ([`DenseIndex`]).
//! - **Dependency log** ([`DependencyLog`]): every recorded edge, in order.
//! - **Adjacency** ([`Adjacency`]): deduplicated dependents/leaders lists,
//!   rebuilt from the log on every sort.
//! - **Root-set extraction**: Kahn's algorithm taken one whole zero-degree set
//!   at a time.
//! - **Results** ([`SortResult`]): rounds, the flattened order, the cycle set,
//!   the root set, and graph introspection.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_toposort::TopoSort;
//!
//! let mut topo = TopoSort::new();
//! // `d` depends on `a` and `b`; `c` and `e` depend on `d`; `f` on `e`.
//! topo.add_deps("d", ["a", "b"]).unwrap();
//! topo.add_dep("c", Some("d")).unwrap();
//! topo.add_dep("e", Some("d")).unwrap();
//! topo.add(Some("e"), "f").unwrap();
//!
//! let sorted = topo.sort().unwrap();
//! assert_eq!(sorted.round_count(), 4);
//! assert_eq!(sorted.sorted_list().first(), Some(&&"a"));
//! assert!(!sorted.has_cycle());
//! ```
//!
//! ## Cycles
//!
//! Cycles are data, not errors. Nodes that can never be placed in a round are
//! reported by [`SortResult::cycle_set`]; the rounds still describe a valid
//! order over everything else.
//!
//! ```rust
//! use understory_toposort::TopoSort;
//!
//! let mut topo = TopoSort::new();
//! topo.add(Some("x"), "y").unwrap();
//! topo.add(Some("y"), "z").unwrap();
//! topo.add(Some("z"), "y").unwrap();
//!
//! let sorted = topo.sort().unwrap();
//! assert_eq!(sorted.sorted_list(), [&"x"]);
//! let cyclic: Vec<_> = sorted.cycle_set().iter().map(|&id| *sorted.node(id)).collect();
//! assert_eq!(cyclic, ["y", "z"]);
//! ```
//!
//! Anything that depends on a cycle is reported with it, even if it is not on
//! the cycle itself.
//!
//! ## Textual Input
//!
//! [`TopoSort::add_graph`] reads `(dependent leader ...)` groups and
//! [`TopoSort::add_rules`] reads `dependent : leader ...` lines; see
//! [`grammar`]. String nodes borrow from the input text.
//!
//! ## Diagnostics
//!
//! With [`SortConfig::verbose`] set, construction, bulk input and sorting emit
//! `debug` events through [`tracing`]. Results are identical either way.
//!
//! ## Concurrency
//!
//! A [`TopoSort`] has a single writer. A [`SortResult`] is read-only and can be
//! shared across threads when the node type allows it.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod adjacency;
mod bitset;
mod config;
mod engine;
mod error;
pub mod grammar;
mod id;
pub mod intern;
mod log;
mod result;
mod topo;

pub use adjacency::Adjacency;
pub use bitset::IdSet;
pub use config::SortConfig;
pub use error::{ParseError, TopoError};
pub use grammar::ParseNode;
pub use id::NodeId;
pub use intern::{DenseIndex, DenseNode, HashedIndex, Interner, NodeIndex};
pub use log::{DependencyLog, Edge};
pub use result::{Rounds, SortResult};
pub use topo::TopoSort;

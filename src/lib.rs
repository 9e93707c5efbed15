//! blendgroups - A group hierarchy over blend shape targets
//!
//! Maintains a tree of named groups whose leaves are targets held by an
//! external sparse store. Groups nest, leaves and groups move between
//! groups, names stay unique among siblings, and deleting a group removes
//! everything beneath it.
//!
//! # Architecture
//!
//! - [`store`] - The [`store::HierarchyStore`] boundary, an in-memory store,
//!   and JSON document persistence
//! - [`core`] - Ids, naming, the hierarchy engine, verification, config, lock
//! - [`cli`] - The `bsg` command-line interface
//! - [`ui`] - Output formatting
//!
//! # Correctness Invariants
//!
//! 1. Every non-root group has a parent that lists it exactly once
//! 2. Every leaf's parent lists it exactly once
//! 3. The parent relation is acyclic and rooted at group 0
//! 4. Sibling groups have distinct names
//!
//! [`core::verify::verify`] checks all of them against a store.

pub mod cli;
pub mod core;
pub mod store;
pub mod ui;

//! store
//!
//! Host storage abstraction for the group hierarchy.
//!
//! # Modules
//!
//! - [`traits`] - The [`HierarchyStore`] boundary and [`StoreError`]
//! - [`memory`] - In-memory host store with failure injection
//! - [`document`] - JSON document persistence for the in-memory store

pub mod document;
pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{HierarchyStore, StoreError};

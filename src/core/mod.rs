//! core
//!
//! Domain logic for the group hierarchy.
//!
//! # Modules
//!
//! - [`types`] - Group and leaf ids, node references, group names
//! - [`naming`] - Unique sibling names
//! - [`hierarchy`] - Create, move, rename, delete, and queries
//! - [`verify`] - Structural verification of a stored hierarchy
//! - [`config`] - User configuration
//! - [`lock`] - Exclusive document lock
//!
//! # Architecture
//!
//! Core never touches storage directly; every read and write goes through
//! [`crate::store::HierarchyStore`]. It does not know about the CLI.

pub mod config;
pub mod hierarchy;
pub mod lock;
pub mod naming;
pub mod types;
pub mod verify;

//! store::traits
//!
//! The storage boundary the hierarchy engine is built on.
//!
//! # Design
//!
//! The host owns every record. The engine never caches a record across two
//! calls: each mutation re-reads the current value right before writing it
//! back, so external changes between calls are always visible.
//!
//! Child lists are read and written wholesale. Two writers racing on the same
//! list lose an update (last write wins), so hosts with more than one writer
//! must serialize access themselves.
//!
//! # Example
//!
//! ```
//! use blendgroups::core::types::{GroupId, LeafId, NodeRef};
//! use blendgroups::store::{HierarchyStore, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! store.insert_leaf(LeafId::new(0)).unwrap();
//!
//! assert_eq!(
//!     store.children(GroupId::ROOT).unwrap(),
//!     vec![NodeRef::Leaf(LeafId::new(0))]
//! );
//! assert_eq!(store.leaf_parent(LeafId::new(0)).unwrap(), Some(GroupId::ROOT));
//! ```

use thiserror::Error;

use crate::core::types::{GroupId, LeafId, NodeRef};

/// Errors from storage operations.
///
/// The hierarchy engine propagates these unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No group record exists at this slot.
    #[error("no group record at slot {0}")]
    GroupNotFound(GroupId),

    /// No leaf record exists at this slot.
    #[error("no leaf record at slot {0}")]
    LeafNotFound(LeafId),

    /// A leaf record already exists at this slot.
    #[error("leaf record already exists at slot {0}")]
    LeafExists(LeafId),

    /// The group slot space is full.
    #[error("no free group slot available")]
    Exhausted,

    /// The record cannot be modified (e.g. removing the root record).
    #[error("record is read-only: {0}")]
    ReadOnly(String),

    /// The host backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Primitive record access provided by the host.
///
/// Group and leaf records live in separate slot spaces. Group slot 0 is the
/// root record and always exists.
pub trait HierarchyStore {
    /// Whether a group record exists at `group`.
    fn group_exists(&self, group: GroupId) -> Result<bool, StoreError>;

    /// Whether a leaf record exists at `leaf`.
    fn leaf_exists(&self, leaf: LeafId) -> Result<bool, StoreError>;

    /// Every existing group slot, root included, in storage order.
    fn group_ids(&self) -> Result<Vec<GroupId>, StoreError>;

    /// Every leaf slot with a recorded parent, in storage order.
    fn leaf_ids(&self) -> Result<Vec<LeafId>, StoreError>;

    /// Reserve a fresh, currently unused group slot and create an empty
    /// record for it (no parent, no children, empty name).
    fn allocate_group(&mut self) -> Result<GroupId, StoreError>;

    /// Current parent of a group. `None` for the root.
    fn group_parent(&self, group: GroupId) -> Result<Option<GroupId>, StoreError>;

    /// Overwrite the parent of a group.
    fn set_group_parent(&mut self, group: GroupId, parent: GroupId) -> Result<(), StoreError>;

    /// Current parent of a leaf, or `None` if the host never recorded one.
    fn leaf_parent(&self, leaf: LeafId) -> Result<Option<GroupId>, StoreError>;

    /// Overwrite the parent of a leaf.
    fn set_leaf_parent(&mut self, leaf: LeafId, parent: GroupId) -> Result<(), StoreError>;

    /// Current ordered child list of a group (empty if none).
    fn children(&self, group: GroupId) -> Result<Vec<NodeRef>, StoreError>;

    /// Overwrite the child list of a group wholesale.
    fn set_children(&mut self, group: GroupId, children: &[NodeRef]) -> Result<(), StoreError>;

    /// Current name of a group.
    fn group_name(&self, group: GroupId) -> Result<String, StoreError>;

    /// Overwrite the name of a group.
    fn set_group_name(&mut self, group: GroupId, name: &str) -> Result<(), StoreError>;

    /// Permanently delete a group record.
    fn remove_group(&mut self, group: GroupId) -> Result<(), StoreError>;

    /// Permanently delete a leaf record (host-owned leaf lifecycle).
    fn delete_leaf(&mut self, leaf: LeafId) -> Result<(), StoreError>;
}

impl<S: HierarchyStore + ?Sized> HierarchyStore for &mut S {
    fn group_exists(&self, group: GroupId) -> Result<bool, StoreError> {
        (**self).group_exists(group)
    }

    fn leaf_exists(&self, leaf: LeafId) -> Result<bool, StoreError> {
        (**self).leaf_exists(leaf)
    }

    fn group_ids(&self) -> Result<Vec<GroupId>, StoreError> {
        (**self).group_ids()
    }

    fn leaf_ids(&self) -> Result<Vec<LeafId>, StoreError> {
        (**self).leaf_ids()
    }

    fn allocate_group(&mut self) -> Result<GroupId, StoreError> {
        (**self).allocate_group()
    }

    fn group_parent(&self, group: GroupId) -> Result<Option<GroupId>, StoreError> {
        (**self).group_parent(group)
    }

    fn set_group_parent(&mut self, group: GroupId, parent: GroupId) -> Result<(), StoreError> {
        (**self).set_group_parent(group, parent)
    }

    fn leaf_parent(&self, leaf: LeafId) -> Result<Option<GroupId>, StoreError> {
        (**self).leaf_parent(leaf)
    }

    fn set_leaf_parent(&mut self, leaf: LeafId, parent: GroupId) -> Result<(), StoreError> {
        (**self).set_leaf_parent(leaf, parent)
    }

    fn children(&self, group: GroupId) -> Result<Vec<NodeRef>, StoreError> {
        (**self).children(group)
    }

    fn set_children(&mut self, group: GroupId, children: &[NodeRef]) -> Result<(), StoreError> {
        (**self).set_children(group, children)
    }

    fn group_name(&self, group: GroupId) -> Result<String, StoreError> {
        (**self).group_name(group)
    }

    fn set_group_name(&mut self, group: GroupId, name: &str) -> Result<(), StoreError> {
        (**self).set_group_name(group, name)
    }

    fn remove_group(&mut self, group: GroupId) -> Result<(), StoreError> {
        (**self).remove_group(group)
    }

    fn delete_leaf(&mut self, leaf: LeafId) -> Result<(), StoreError> {
        (**self).delete_leaf(leaf)
    }
}

//! store::memory
//!
//! In-memory host store.
//!
//! # Design
//!
//! `MemoryStore` plays the role of the host attribute storage: sparse group
//! and leaf records keyed by slot, plus the host-side leaf lifecycle
//! ([`MemoryStore::insert_leaf`], [`HierarchyStore::delete_leaf`]). It backs
//! the CLI document format and the test suite.
//!
//! For testing error paths it can be told to fail a specific call
//! ([`FailOn`]), and it records every mutating call ([`StoreOperation`]).
//!
//! # Example
//!
//! ```
//! use blendgroups::core::types::{GroupId, LeafId};
//! use blendgroups::store::memory::{FailOn, MemoryStore};
//! use blendgroups::store::{HierarchyStore, StoreError};
//!
//! let mut store = MemoryStore::new();
//! let group = store.allocate_group().unwrap();
//! assert_eq!(group, GroupId::new(1));
//!
//! store.fail_on(FailOn::DeleteLeaf(LeafId::new(3)));
//! store.insert_leaf(LeafId::new(3)).unwrap();
//! assert!(matches!(
//!     store.delete_leaf(LeafId::new(3)),
//!     Err(StoreError::Backend(_))
//! ));
//! ```

use std::collections::BTreeMap;

use super::traits::{HierarchyStore, StoreError};
use crate::core::types::{GroupId, LeafId, NodeRef};

/// Name the host gives the root record.
pub const ROOT_NAME: &str = "Group";

/// A group record as the host stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupRecord {
    /// Display name.
    pub name: String,
    /// Enclosing group; `None` for root and for freshly allocated records.
    pub parent: Option<GroupId>,
    /// Ordered child entries.
    pub children: Vec<NodeRef>,
}

/// A leaf record as the host stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafRecord {
    /// Enclosing group, if the host recorded one.
    pub parent: Option<GroupId>,
}

/// Configuration for which call should fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailOn {
    /// Fail `allocate_group`.
    AllocateGroup,
    /// Fail `children` for this group.
    Children(GroupId),
    /// Fail `set_children` for this group.
    SetChildren(GroupId),
    /// Fail `set_group_name` for this group.
    SetGroupName(GroupId),
    /// Fail `set_leaf_parent` for this leaf.
    SetLeafParent(LeafId),
    /// Fail `remove_group` for this group.
    RemoveGroup(GroupId),
    /// Fail `delete_leaf` for this leaf.
    DeleteLeaf(LeafId),
}

/// Recorded mutating call, for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    AllocateGroup { group: GroupId },
    SetGroupParent { group: GroupId, parent: GroupId },
    SetLeafParent { leaf: LeafId, parent: GroupId },
    SetChildren { group: GroupId, children: Vec<NodeRef> },
    SetGroupName { group: GroupId, name: String },
    RemoveGroup { group: GroupId },
    DeleteLeaf { leaf: LeafId },
    InsertLeaf { leaf: LeafId },
}

/// In-memory hierarchy storage.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    groups: BTreeMap<GroupId, GroupRecord>,
    leaves: BTreeMap<LeafId, LeafRecord>,
    fail_on: Option<FailOn>,
    operations: Vec<StoreOperation>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store holding only the root record.
    pub fn new() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(
            GroupId::ROOT,
            GroupRecord {
                name: ROOT_NAME.to_string(),
                ..GroupRecord::default()
            },
        );
        Self {
            groups,
            leaves: BTreeMap::new(),
            fail_on: None,
            operations: Vec::new(),
        }
    }

    /// Build a store from raw records.
    ///
    /// A missing root record is created. Records are taken as-is; run
    /// [`crate::core::verify::verify`] to check them.
    pub fn from_records(
        groups: impl IntoIterator<Item = (GroupId, GroupRecord)>,
        leaves: impl IntoIterator<Item = (LeafId, LeafRecord)>,
    ) -> Self {
        let mut store = Self::new();
        store.groups.extend(groups);
        store.leaves.extend(leaves);
        store
    }

    /// Host-side target creation: register `leaf` under the root group.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LeafExists`] if the slot is taken.
    pub fn insert_leaf(&mut self, leaf: LeafId) -> Result<(), StoreError> {
        if self.leaves.contains_key(&leaf) {
            return Err(StoreError::LeafExists(leaf));
        }
        self.leaves.insert(
            leaf,
            LeafRecord {
                parent: Some(GroupId::ROOT),
            },
        );
        self.root_mut().children.push(NodeRef::Leaf(leaf));
        self.operations.push(StoreOperation::InsertLeaf { leaf });
        Ok(())
    }

    /// Borrow a group record.
    pub fn group(&self, group: GroupId) -> Option<&GroupRecord> {
        self.groups.get(&group)
    }

    /// Borrow a leaf record.
    pub fn leaf(&self, leaf: LeafId) -> Option<&LeafRecord> {
        self.leaves.get(&leaf)
    }

    /// Iterate over all group records.
    pub fn group_records(&self) -> impl Iterator<Item = (GroupId, &GroupRecord)> {
        self.groups.iter().map(|(id, record)| (*id, record))
    }

    /// Iterate over all leaf records.
    pub fn leaf_records(&self) -> impl Iterator<Item = (LeafId, &LeafRecord)> {
        self.leaves.iter().map(|(id, record)| (*id, record))
    }

    /// Make the given call fail with a backend error until cleared.
    pub fn fail_on(&mut self, fail_on: FailOn) {
        self.fail_on = Some(fail_on);
    }

    /// Clear any configured failure.
    pub fn clear_failure(&mut self) {
        self.fail_on = None;
    }

    /// Mutating calls recorded so far.
    pub fn operations(&self) -> &[StoreOperation] {
        &self.operations
    }

    /// Forget recorded calls.
    pub fn clear_operations(&mut self) {
        self.operations.clear();
    }

    fn check_fail(&self, call: &FailOn) -> Result<(), StoreError> {
        if self.fail_on.as_ref() == Some(call) {
            Err(StoreError::Backend(format!("injected failure: {:?}", call)))
        } else {
            Ok(())
        }
    }

    fn root_mut(&mut self) -> &mut GroupRecord {
        self.groups.entry(GroupId::ROOT).or_default()
    }

    fn group_record(&self, group: GroupId) -> Result<&GroupRecord, StoreError> {
        self.groups
            .get(&group)
            .ok_or(StoreError::GroupNotFound(group))
    }

    fn group_record_mut(&mut self, group: GroupId) -> Result<&mut GroupRecord, StoreError> {
        self.groups
            .get_mut(&group)
            .ok_or(StoreError::GroupNotFound(group))
    }
}

impl HierarchyStore for MemoryStore {
    fn group_exists(&self, group: GroupId) -> Result<bool, StoreError> {
        Ok(self.groups.contains_key(&group))
    }

    fn leaf_exists(&self, leaf: LeafId) -> Result<bool, StoreError> {
        Ok(self.leaves.contains_key(&leaf))
    }

    fn group_ids(&self) -> Result<Vec<GroupId>, StoreError> {
        Ok(self.groups.keys().copied().collect())
    }

    fn leaf_ids(&self) -> Result<Vec<LeafId>, StoreError> {
        Ok(self
            .leaves
            .iter()
            .filter(|(_, record)| record.parent.is_some())
            .map(|(id, _)| *id)
            .collect())
    }

    fn allocate_group(&mut self) -> Result<GroupId, StoreError> {
        self.check_fail(&FailOn::AllocateGroup)?;

        // Lowest free slot above root, reusing holes left by removals.
        let mut slot = 1u32;
        for id in self.groups.keys().skip_while(|id| id.is_root()) {
            if id.slot() != slot {
                break;
            }
            slot = slot.checked_add(1).ok_or(StoreError::Exhausted)?;
        }

        let group = GroupId::new(slot);
        self.groups.insert(group, GroupRecord::default());
        self.operations.push(StoreOperation::AllocateGroup { group });
        Ok(group)
    }

    fn group_parent(&self, group: GroupId) -> Result<Option<GroupId>, StoreError> {
        Ok(self.group_record(group)?.parent)
    }

    fn set_group_parent(&mut self, group: GroupId, parent: GroupId) -> Result<(), StoreError> {
        if group.is_root() {
            return Err(StoreError::ReadOnly("root group has no parent".into()));
        }
        self.group_record_mut(group)?.parent = Some(parent);
        self.operations
            .push(StoreOperation::SetGroupParent { group, parent });
        Ok(())
    }

    fn leaf_parent(&self, leaf: LeafId) -> Result<Option<GroupId>, StoreError> {
        Ok(self.leaves.get(&leaf).and_then(|record| record.parent))
    }

    fn set_leaf_parent(&mut self, leaf: LeafId, parent: GroupId) -> Result<(), StoreError> {
        self.check_fail(&FailOn::SetLeafParent(leaf))?;
        let record = self
            .leaves
            .get_mut(&leaf)
            .ok_or(StoreError::LeafNotFound(leaf))?;
        record.parent = Some(parent);
        self.operations
            .push(StoreOperation::SetLeafParent { leaf, parent });
        Ok(())
    }

    fn children(&self, group: GroupId) -> Result<Vec<NodeRef>, StoreError> {
        self.check_fail(&FailOn::Children(group))?;
        Ok(self.group_record(group)?.children.clone())
    }

    fn set_children(&mut self, group: GroupId, children: &[NodeRef]) -> Result<(), StoreError> {
        self.check_fail(&FailOn::SetChildren(group))?;
        self.group_record_mut(group)?.children = children.to_vec();
        self.operations.push(StoreOperation::SetChildren {
            group,
            children: children.to_vec(),
        });
        Ok(())
    }

    fn group_name(&self, group: GroupId) -> Result<String, StoreError> {
        Ok(self.group_record(group)?.name.clone())
    }

    fn set_group_name(&mut self, group: GroupId, name: &str) -> Result<(), StoreError> {
        self.check_fail(&FailOn::SetGroupName(group))?;
        self.group_record_mut(group)?.name = name.to_string();
        self.operations.push(StoreOperation::SetGroupName {
            group,
            name: name.to_string(),
        });
        Ok(())
    }

    fn remove_group(&mut self, group: GroupId) -> Result<(), StoreError> {
        self.check_fail(&FailOn::RemoveGroup(group))?;
        if group.is_root() {
            return Err(StoreError::ReadOnly("root group cannot be removed".into()));
        }
        self.groups
            .remove(&group)
            .ok_or(StoreError::GroupNotFound(group))?;
        self.operations.push(StoreOperation::RemoveGroup { group });
        Ok(())
    }

    fn delete_leaf(&mut self, leaf: LeafId) -> Result<(), StoreError> {
        self.check_fail(&FailOn::DeleteLeaf(leaf))?;
        self.leaves
            .remove(&leaf)
            .ok_or(StoreError::LeafNotFound(leaf))?;
        self.operations.push(StoreOperation::DeleteLeaf { leaf });
        Ok(())
    }
}

//! core::hierarchy::delete
//!
//! Cascading group deletion and leaf deletion.
//!
//! # Design
//!
//! Deletion runs over an explicit worklist instead of recursion, so depth is
//! bounded by memory rather than the call stack. The worklist is also the
//! resume state: when a storage call fails, the failed step goes back on the
//! list and the whole [`PendingDelete`] is handed to the caller inside
//! [`HierarchyError::PartialDelete`]. Nothing already removed is restored.
//!
//! The group is detached from its parent before anything below it is
//! touched, so a partial delete never leaves the parent pointing at a
//! half-deleted subtree.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::{GroupHierarchy, HierarchyError, Result};
use crate::core::types::{GroupId, LeafId, NodeRef};
use crate::store::{HierarchyStore, StoreError};

/// One unit of deletion work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Queue the group's children, then its own removal.
    Expand(GroupId),
    /// Remove the group record.
    Remove(GroupId),
    /// Delete the leaf record.
    DeleteLeaf(LeafId),
}

/// Records removed by a delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Removed groups, deepest first.
    pub groups: Vec<GroupId>,
    /// Removed leaves.
    pub leaves: Vec<LeafId>,
}

/// A delete that stopped partway and can be resumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    group: GroupId,
    steps: Vec<Step>,
    expanded: BTreeSet<GroupId>,
    report: DeleteReport,
}

impl PendingDelete {
    fn new(group: GroupId) -> Self {
        Self {
            group,
            steps: vec![Step::Expand(group)],
            expanded: BTreeSet::new(),
            report: DeleteReport::default(),
        }
    }

    /// The group whose deletion was requested.
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Number of queued steps.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    /// What has been removed so far.
    pub fn report(&self) -> &DeleteReport {
        &self.report
    }
}

impl<S: HierarchyStore> GroupHierarchy<S> {
    /// Delete `group` and everything beneath it.
    ///
    /// Nested groups are removed; leaves are deleted through the store, not
    /// reparented. The root cannot be deleted.
    pub fn delete_group(&mut self, group: GroupId) -> Result<DeleteReport> {
        self.ensure_group(group)?;
        if group.is_root() {
            return Err(HierarchyError::RootImmutable("deleted"));
        }

        if let Some(parent) = self.store.group_parent(group)? {
            if self.store.group_exists(parent)? {
                let mut siblings = self.store.children(parent)?;
                let before = siblings.len();
                siblings.retain(|child| *child != NodeRef::Group(group));
                if siblings.len() != before {
                    self.store.set_children(parent, &siblings)?;
                }
            }
        }

        self.run_delete(PendingDelete::new(group))
    }

    /// Continue a delete that failed partway.
    pub fn resume_delete(&mut self, pending: PendingDelete) -> Result<DeleteReport> {
        debug!(group = %pending.group, remaining = pending.remaining(), "resuming delete");
        self.run_delete(pending)
    }

    fn run_delete(&mut self, mut pending: PendingDelete) -> Result<DeleteReport> {
        while let Some(step) = pending.steps.pop() {
            if let Err(source) = self.apply_step(step, &mut pending) {
                pending.steps.push(step);
                warn!(
                    group = %pending.group,
                    remaining = pending.remaining(),
                    error = %source,
                    "delete stopped partway"
                );
                return Err(HierarchyError::PartialDelete {
                    group: pending.group,
                    pending: Box::new(pending),
                    source,
                });
            }
        }

        debug!(
            group = %pending.group,
            groups = pending.report.groups.len(),
            leaves = pending.report.leaves.len(),
            "deleted group"
        );
        Ok(pending.report)
    }

    fn apply_step(
        &mut self,
        step: Step,
        pending: &mut PendingDelete,
    ) -> std::result::Result<(), StoreError> {
        match step {
            Step::Expand(group) => {
                if pending.expanded.contains(&group) {
                    // Corrupted storage listed this group twice; its removal
                    // is already queued.
                    return Ok(());
                }
                let children = self.store.children(group)?;
                pending.expanded.insert(group);
                pending.steps.push(Step::Remove(group));
                // Reversed so children pop in child-list order.
                for child in children.into_iter().rev() {
                    pending.steps.push(match child {
                        NodeRef::Group(nested) => Step::Expand(nested),
                        NodeRef::Leaf(leaf) => Step::DeleteLeaf(leaf),
                    });
                }
            }
            Step::Remove(group) => {
                self.store.remove_group(group)?;
                pending.report.groups.push(group);
            }
            Step::DeleteLeaf(leaf) => {
                if self.store.leaf_exists(leaf)? {
                    self.store.delete_leaf(leaf)?;
                    pending.report.leaves.push(leaf);
                }
            }
        }
        Ok(())
    }

    /// Delete `leaf` and drop it from its parent's child list.
    pub fn delete_leaf(&mut self, leaf: LeafId) -> Result<()> {
        self.ensure_leaf(leaf)?;

        if let Some(parent) = self.store.leaf_parent(leaf)? {
            if self.store.group_exists(parent)? {
                let mut siblings = self.store.children(parent)?;
                let before = siblings.len();
                siblings.retain(|child| *child != NodeRef::Leaf(leaf));
                if siblings.len() != before {
                    self.store.set_children(parent, &siblings)?;
                }
            }
        }

        self.store.delete_leaf(leaf)?;
        debug!(leaf = %leaf, "deleted leaf");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hierarchy::NewGroup;
    use crate::store::memory::{FailOn, MemoryStore};

    fn leaf(slot: u32) -> LeafId {
        LeafId::new(slot)
    }

    /// root
    /// ├── a [0, 1]
    /// │   └── b [2]
    /// │       └── c
    /// └── d [3]
    fn setup() -> (GroupHierarchy<MemoryStore>, [GroupId; 4]) {
        let mut store = MemoryStore::new();
        for slot in 0..5 {
            store.insert_leaf(leaf(slot)).unwrap();
        }
        let mut groups = GroupHierarchy::new(store);
        let a = groups
            .create_group(NewGroup::named("a").with_leaves([leaf(0), leaf(1)]))
            .unwrap();
        let b = groups
            .create_group(NewGroup::named("b").under(a).with_leaves([leaf(2)]))
            .unwrap();
        let c = groups.create_group(NewGroup::named("c").under(b)).unwrap();
        let d = groups
            .create_group(NewGroup::named("d").with_leaves([leaf(3)]))
            .unwrap();
        (groups, [a, b, c, d])
    }

    #[test]
    fn delete_cascades_through_subtree() {
        let (mut groups, [a, b, c, d]) = setup();

        let report = groups.delete_group(a).unwrap();

        assert_eq!(report.groups, vec![c, b, a]);
        assert_eq!(report.leaves, vec![leaf(0), leaf(1), leaf(2)]);
        assert_eq!(groups.group_count().unwrap(), 2);
        assert_eq!(groups.child_groups(GroupId::ROOT).unwrap(), vec![d]);
        for slot in 0..3 {
            assert!(!groups.store().leaf_exists(leaf(slot)).unwrap());
        }
        assert!(groups.store().leaf_exists(leaf(3)).unwrap());
        assert!(groups.store().leaf_exists(leaf(4)).unwrap());
    }

    #[test]
    fn delete_nested_group_detaches_from_parent() {
        let (mut groups, [a, b, _, _]) = setup();

        groups.delete_group(b).unwrap();

        assert!(groups.child_groups(a).unwrap().is_empty());
        assert_eq!(groups.child_leaves(a).unwrap(), vec![leaf(0), leaf(1)]);
    }

    #[test]
    fn delete_root_is_refused() {
        let (mut groups, _) = setup();
        assert!(matches!(
            groups.delete_group(GroupId::ROOT),
            Err(HierarchyError::RootImmutable(_))
        ));
    }

    #[test]
    fn delete_unknown_group() {
        let (mut groups, _) = setup();
        assert!(matches!(
            groups.delete_group(GroupId::new(77)),
            Err(HierarchyError::UnknownGroup(_))
        ));
    }

    #[test]
    fn partial_delete_can_resume() {
        let (mut groups, [a, b, c, _]) = setup();
        groups.store_mut().fail_on(FailOn::RemoveGroup(b));

        let pending = match groups.delete_group(a) {
            Err(HierarchyError::PartialDelete { group, pending, source }) => {
                assert_eq!(group, a);
                assert!(matches!(source, StoreError::Backend(_)));
                pending
            }
            other => panic!("expected partial delete, got {:?}", other),
        };

        // Already detached from root, and c is gone; b and a remain.
        assert_eq!(groups.child_groups(GroupId::ROOT).unwrap().len(), 1);
        assert_eq!(pending.report().groups, vec![c]);
        assert!(groups.store().group_exists(b).unwrap());
        assert!(groups.store().group_exists(a).unwrap());

        groups.store_mut().clear_failure();
        let report = groups.resume_delete(*pending).unwrap();

        assert_eq!(report.groups, vec![c, b, a]);
        assert_eq!(groups.group_count().unwrap(), 2);
    }

    #[test]
    fn partial_delete_on_leaf_failure_keeps_step() {
        let (mut groups, [a, ..]) = setup();
        groups.store_mut().fail_on(FailOn::DeleteLeaf(leaf(1)));

        let err = groups.delete_group(a).unwrap_err();
        let HierarchyError::PartialDelete { pending, .. } = err else {
            panic!("expected partial delete");
        };

        assert_eq!(pending.report().leaves, vec![leaf(0)]);
        assert!(pending.remaining() > 0);
        assert!(groups.store().leaf_exists(leaf(1)).unwrap());
    }

    #[test]
    fn delete_survives_duplicate_child_entry() {
        let (mut groups, [a, b, _, _]) = setup();
        let mut children = groups.store().children(a).unwrap();
        children.push(NodeRef::Group(b));
        groups.store_mut().set_children(a, &children).unwrap();

        let report = groups.delete_group(a).unwrap();

        assert_eq!(report.groups.iter().filter(|g| **g == b).count(), 1);
    }

    #[test]
    fn delete_leaf_cleans_parent_list() {
        let (mut groups, [a, ..]) = setup();

        groups.delete_leaf(leaf(0)).unwrap();

        assert_eq!(groups.child_leaves(a).unwrap(), vec![leaf(1)]);
        assert!(!groups.store().leaf_exists(leaf(0)).unwrap());
        assert!(!groups.leaves().unwrap().contains(&leaf(0)));
    }

    #[test]
    fn delete_unknown_leaf() {
        let (mut groups, _) = setup();
        assert!(matches!(
            groups.delete_leaf(leaf(42)),
            Err(HierarchyError::UnknownLeaf(_))
        ));
    }
}

//! core::hierarchy::moves
//!
//! Reparenting of groups and leaves.
//!
//! # Integrity Contract
//!
//! - Unknown groups or leaves abort the whole call before any write
//! - A group is never moved into itself or below itself; such elements are
//!   skipped and reported, the rest of the batch still moves
//! - Moving a node into its current parent keeps its position
//! - A group arriving next to a sibling of the same name takes a numeric
//!   suffix, resolved before the first write

use thiserror::Error;
use tracing::{debug, warn};

use super::{GroupHierarchy, Result};
use crate::core::naming::resolve_group_name;
use crate::core::types::{GroupId, GroupName, LeafId, NodeRef};
use crate::store::HierarchyStore;

/// Why a group was left out of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    /// Destination equals the group being moved.
    #[error("unable to move group {0} into itself")]
    IntoSelf(GroupId),

    /// Destination lies inside the group being moved.
    #[error("unable to move group {group} into its own descendant {dest}")]
    IntoDescendant {
        /// The group that was skipped.
        group: GroupId,
        /// The requested destination.
        dest: GroupId,
    },

    /// The root group never moves.
    #[error("unable to move the root group")]
    Root,
}

impl IllegalMove {
    /// The group that was skipped.
    pub fn group(&self) -> GroupId {
        match self {
            IllegalMove::IntoSelf(group) => *group,
            IllegalMove::IntoDescendant { group, .. } => *group,
            IllegalMove::Root => GroupId::ROOT,
        }
    }
}

/// Outcome of [`GroupHierarchy::move_groups`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveReport {
    /// Groups now parented under the destination, in request order.
    pub moved: Vec<GroupId>,
    /// Groups left where they were.
    pub skipped: Vec<IllegalMove>,
    /// Moved groups whose name clashed at the destination, with the name
    /// they were given.
    pub renamed: Vec<(GroupId, GroupName)>,
}

impl MoveReport {
    /// Whether every requested group moved.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Drop repeated entries, keeping first occurrences in order.
fn dedup_in_order<T: PartialEq + Copy>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(*item);
        }
    }
    out
}

impl<S: HierarchyStore> GroupHierarchy<S> {
    /// Move `groups` under `dest`.
    ///
    /// Illegal elements are skipped with a warning and listed in the report.
    /// Each touched child list is rewritten once; new entries are appended
    /// to the end of `dest`'s list. Arriving groups are renamed against
    /// `dest`'s other child groups and against earlier arrivals in the batch.
    pub fn move_groups(&mut self, groups: &[GroupId], dest: GroupId) -> Result<MoveReport> {
        self.ensure_group(dest)?;
        for group in groups {
            self.ensure_group(*group)?;
        }

        let conflicts = self.ancestors_of(dest)?;
        let mut report = MoveReport::default();

        for group in dedup_in_order(groups) {
            let rejection = if group.is_root() {
                Some(IllegalMove::Root)
            } else if group == dest {
                Some(IllegalMove::IntoSelf(group))
            } else if conflicts.contains(&group) {
                Some(IllegalMove::IntoDescendant { group, dest })
            } else {
                None
            };

            match rejection {
                Some(rejection) => {
                    warn!("{}", rejection);
                    report.skipped.push(rejection);
                }
                None => report.moved.push(group),
            }
        }

        if report.moved.is_empty() {
            return Ok(report);
        }

        // Names first: a name that cannot be resolved aborts before any write.
        let current = self.store.children(dest)?;
        let mut taken = Vec::new();
        for child in &current {
            if let NodeRef::Group(sibling) = child {
                taken.push(self.store.group_name(*sibling)?);
            }
        }
        for group in &report.moved {
            if current.contains(&NodeRef::Group(*group)) {
                continue;
            }
            let name = self.store.group_name(*group)?;
            let resolved = resolve_group_name(&name, &taken)?;
            taken.push(resolved.as_str().to_string());
            if resolved.as_str() != name {
                report.renamed.push((*group, resolved));
            }
        }

        // Detach, one rewrite per old parent.
        let mut old_parents: Vec<(GroupId, Vec<GroupId>)> = Vec::new();
        for group in &report.moved {
            let Some(parent) = self.store.group_parent(*group)? else {
                continue;
            };
            if parent == dest || !self.store.group_exists(parent)? {
                continue;
            }
            match old_parents.iter_mut().find(|(p, _)| *p == parent) {
                Some((_, members)) => members.push(*group),
                None => old_parents.push((parent, vec![*group])),
            }
        }

        for (parent, members) in &old_parents {
            let mut children = self.store.children(*parent)?;
            let before = children.len();
            children.retain(|child| !matches!(child, NodeRef::Group(g) if members.contains(g)));
            if children.len() != before {
                self.store.set_children(*parent, &children)?;
            }
        }

        // Attach, one rewrite of the destination.
        let mut children = self.store.children(dest)?;
        let before = children.len();
        for group in &report.moved {
            let entry = NodeRef::Group(*group);
            if !children.contains(&entry) {
                children.push(entry);
            }
        }
        if children.len() != before {
            self.store.set_children(dest, &children)?;
        }

        for group in &report.moved {
            self.store.set_group_parent(*group, dest)?;
        }

        for (group, name) in &report.renamed {
            self.store.set_group_name(*group, name.as_str())?;
            debug!(group = %group, name = %name, "renamed arriving group");
        }

        debug!(
            dest = %dest,
            moved = report.moved.len(),
            skipped = report.skipped.len(),
            renamed = report.renamed.len(),
            "moved groups"
        );
        Ok(report)
    }

    /// Move `leaves` under `dest`.
    ///
    /// Leaves with no recorded parent are simply attached.
    pub fn move_leaves(&mut self, leaves: &[LeafId], dest: GroupId) -> Result<()> {
        self.ensure_group(dest)?;
        for leaf in leaves {
            self.ensure_leaf(*leaf)?;
        }

        for leaf in dedup_in_order(leaves) {
            let entry = NodeRef::Leaf(leaf);

            if let Some(parent) = self.store.leaf_parent(leaf)? {
                if parent != dest && self.store.group_exists(parent)? {
                    let mut siblings = self.store.children(parent)?;
                    let before = siblings.len();
                    siblings.retain(|child| *child != entry);
                    if siblings.len() != before {
                        self.store.set_children(parent, &siblings)?;
                    }
                }
            }

            let mut children = self.store.children(dest)?;
            if !children.contains(&entry) {
                children.push(entry);
                self.store.set_children(dest, &children)?;
            }

            if self.store.leaf_parent(leaf)? != Some(dest) {
                self.store.set_leaf_parent(leaf, dest)?;
            }
        }

        debug!(dest = %dest, count = leaves.len(), "moved leaves");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hierarchy::{HierarchyError, NewGroup};
    use crate::store::memory::{GroupRecord, LeafRecord, MemoryStore, StoreOperation};

    fn setup() -> (GroupHierarchy<MemoryStore>, GroupId, GroupId, GroupId) {
        let mut store = MemoryStore::new();
        for slot in 0..4 {
            store.insert_leaf(LeafId::new(slot)).unwrap();
        }
        let mut groups = GroupHierarchy::new(store);
        let a = groups.create_group(NewGroup::named("A")).unwrap();
        let b = groups.create_group(NewGroup::named("B").under(a)).unwrap();
        let c = groups.create_group(NewGroup::named("C")).unwrap();
        (groups, a, b, c)
    }

    #[test]
    fn move_into_self_is_skipped() {
        let (mut groups, a, _, _) = setup();
        let before = groups.children(GroupId::ROOT).unwrap();

        let report = groups.move_groups(&[a], a).unwrap();

        assert_eq!(report.skipped, vec![IllegalMove::IntoSelf(a)]);
        assert!(report.moved.is_empty());
        assert_eq!(groups.children(GroupId::ROOT).unwrap(), before);
        assert_eq!(groups.parent_of(a).unwrap(), Some(GroupId::ROOT));
    }

    #[test]
    fn move_into_descendant_is_skipped() {
        let (mut groups, a, b, _) = setup();

        let report = groups.move_groups(&[a], b).unwrap();

        assert_eq!(
            report.skipped,
            vec![IllegalMove::IntoDescendant { group: a, dest: b }]
        );
        assert_eq!(groups.parent_of(a).unwrap(), Some(GroupId::ROOT));
        assert_eq!(groups.parent_of(b).unwrap(), Some(a));
        assert!(groups.child_groups(b).unwrap().is_empty());
    }

    #[test]
    fn root_never_moves() {
        let (mut groups, a, _, _) = setup();
        let report = groups.move_groups(&[GroupId::ROOT], a).unwrap();
        assert_eq!(report.skipped, vec![IllegalMove::Root]);
        assert_eq!(report.skipped[0].group(), GroupId::ROOT);
    }

    #[test]
    fn batch_is_best_effort() {
        let (mut groups, a, b, c) = setup();

        let report = groups.move_groups(&[a, c], b).unwrap();

        assert_eq!(report.moved, vec![c]);
        assert_eq!(report.skipped.len(), 1);
        assert!(!report.is_complete());
        assert_eq!(groups.child_groups(b).unwrap(), vec![c]);
        assert_eq!(groups.child_groups(GroupId::ROOT).unwrap(), vec![a]);
        assert_eq!(groups.parent_of(c).unwrap(), Some(b));
    }

    #[test]
    fn move_subtree_keeps_descendants() {
        let (mut groups, a, b, c) = setup();

        let report = groups.move_groups(&[a], c).unwrap();

        assert!(report.is_complete());
        assert_eq!(groups.ancestors_of(b).unwrap(), vec![a, c, GroupId::ROOT]);
        assert_eq!(groups.child_groups(GroupId::ROOT).unwrap(), vec![c]);
    }

    #[test]
    fn unknown_member_aborts_before_writes() {
        let (mut groups, a, _, c) = setup();
        groups.store_mut().clear_operations();

        let err = groups.move_groups(&[c, GroupId::new(40)], a).unwrap_err();

        assert!(matches!(err, HierarchyError::UnknownGroup(g) if g == GroupId::new(40)));
        assert!(groups.store().operations().is_empty());
    }

    #[test]
    fn unknown_destination() {
        let (mut groups, a, _, _) = setup();
        assert!(matches!(
            groups.move_groups(&[a], GroupId::new(40)),
            Err(HierarchyError::UnknownGroup(_))
        ));
    }

    #[test]
    fn each_child_list_written_once() {
        let (mut groups, a, _, c) = setup();
        let d = groups.create_group(NewGroup::named("D")).unwrap();
        groups.store_mut().clear_operations();

        groups.move_groups(&[c, d], a).unwrap();

        let writes: Vec<GroupId> = groups
            .store()
            .operations()
            .iter()
            .filter_map(|op| match op {
                StoreOperation::SetChildren { group, .. } => Some(*group),
                _ => None,
            })
            .collect();
        assert_eq!(writes, vec![GroupId::ROOT, a]);
    }

    #[test]
    fn move_into_current_parent_keeps_order() {
        let (mut groups, a, _, c) = setup();
        let before = groups.children(GroupId::ROOT).unwrap();

        groups.move_groups(&[a, c], GroupId::ROOT).unwrap();

        assert_eq!(groups.children(GroupId::ROOT).unwrap(), before);
    }

    #[test]
    fn duplicate_ids_collapse() {
        let (mut groups, a, _, c) = setup();
        let report = groups.move_groups(&[c, c], a).unwrap();
        assert_eq!(report.moved, vec![c]);
        assert_eq!(groups.child_groups(a).unwrap().len(), 2);
    }

    #[test]
    fn arriving_group_takes_suffix() {
        let (mut groups, a, _, _) = setup();
        let x = groups.create_group(NewGroup::named("X")).unwrap();
        let inner = groups.create_group(NewGroup::named("X").under(a)).unwrap();

        let report = groups.move_groups(&[inner], GroupId::ROOT).unwrap();

        assert_eq!(report.renamed.len(), 1);
        assert_eq!(report.renamed[0].0, inner);
        assert_eq!(report.renamed[0].1, "X1");
        assert_eq!(groups.group_name(inner).unwrap(), "X1");
        assert_eq!(groups.group_name(x).unwrap(), "X");
    }

    #[test]
    fn batch_arrivals_do_not_clash_with_each_other() {
        let (mut groups, a, _, c) = setup();
        let first = groups.create_group(NewGroup::named("Y").under(a)).unwrap();
        let second = groups.create_group(NewGroup::named("Y").under(c)).unwrap();

        let report = groups.move_groups(&[first, second], GroupId::ROOT).unwrap();

        assert!(report.is_complete());
        assert_eq!(groups.group_name(first).unwrap(), "Y");
        assert_eq!(groups.group_name(second).unwrap(), "Y1");
    }

    #[test]
    fn staying_group_keeps_its_name() {
        let (mut groups, a, _, _) = setup();
        let report = groups.move_groups(&[a], GroupId::ROOT).unwrap();
        assert!(report.renamed.is_empty());
        assert_eq!(groups.group_name(a).unwrap(), "A");
    }

    #[test]
    fn move_leaves_reparents() {
        let (mut groups, a, b, _) = setup();
        let l1 = LeafId::new(1);

        groups.move_leaves(&[l1], a).unwrap();
        assert_eq!(groups.child_leaves(a).unwrap(), vec![l1]);
        assert_eq!(groups.leaf_parent(l1).unwrap(), Some(a));

        groups.move_leaves(&[l1], b).unwrap();
        assert!(groups.child_leaves(a).unwrap().is_empty());
        assert_eq!(groups.child_leaves(b).unwrap(), vec![l1]);
    }

    #[test]
    fn move_leaves_twice_is_idempotent() {
        let (mut groups, a, _, _) = setup();
        let leaves = [LeafId::new(0), LeafId::new(2)];

        groups.move_leaves(&leaves, a).unwrap();
        let once = groups.children(a).unwrap();
        groups.move_leaves(&leaves, a).unwrap();

        assert_eq!(groups.children(a).unwrap(), once);
    }

    #[test]
    fn move_leaves_attaches_unparented_leaf() {
        let mut store = MemoryStore::from_records(
            Vec::<(GroupId, GroupRecord)>::new(),
            vec![(LeafId::new(7), LeafRecord { parent: None })],
        );
        let group = store.allocate_group().unwrap();
        store.set_group_parent(group, GroupId::ROOT).unwrap();
        store
            .set_children(GroupId::ROOT, &[NodeRef::Group(group)])
            .unwrap();
        let mut groups = GroupHierarchy::new(store);

        groups.move_leaves(&[LeafId::new(7)], group).unwrap();

        assert_eq!(groups.child_leaves(group).unwrap(), vec![LeafId::new(7)]);
    }

    #[test]
    fn move_unknown_leaf_aborts() {
        let (mut groups, a, _, _) = setup();
        groups.store_mut().clear_operations();

        let err = groups
            .move_leaves(&[LeafId::new(0), LeafId::new(99)], a)
            .unwrap_err();

        assert!(matches!(err, HierarchyError::UnknownLeaf(l) if l == LeafId::new(99)));
        assert!(groups.store().operations().is_empty());
    }
}

//! core::verify
//!
//! Structural verification of a stored hierarchy.
//!
//! # Checks
//!
//! - Root exists and has no parent
//! - Every non-root group has an existing parent that lists it exactly once
//! - Every leaf with a recorded parent is listed by that parent exactly once
//! - Every child entry refers to an existing record whose parent matches
//! - Parent links are acyclic
//! - Sibling groups have distinct names
//!
//! # Invariants
//!
//! - Never mutates the store
//! - Must be deterministic (reports follow storage order)

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::types::{GroupId, NodeRef};
use crate::store::{HierarchyStore, StoreError};

/// Errors found during verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("root group record is missing")]
    RootMissing,

    #[error("root group has a parent ({0})")]
    RootHasParent(GroupId),

    #[error("group {0} has no parent")]
    OrphanGroup(GroupId),

    #[error("{child} points at missing parent group {parent}")]
    ParentMissing { child: NodeRef, parent: GroupId },

    #[error("{child} is listed {count} times by its parent group {parent}")]
    BackReference {
        child: NodeRef,
        parent: GroupId,
        count: usize,
    },

    #[error("group {group} lists {child}, which does not exist")]
    DanglingChild { group: GroupId, child: NodeRef },

    #[error("group {group} lists {child}, whose parent is {actual:?}")]
    ParentMismatch {
        group: GroupId,
        child: NodeRef,
        actual: Option<GroupId>,
    },

    #[error("cycle detected in group parents at group {0}")]
    CycleDetected(GroupId),

    #[error("groups under {parent} share the name '{name}'")]
    DuplicateSiblingName { parent: GroupId, name: String },
}

/// Result of verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    /// Whether verification passed
    pub ok: bool,
    /// Errors found during verification
    pub errors: Vec<VerifyError>,
}

impl VerifyResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: vec![],
        }
    }

    /// Create a failed result with errors.
    pub fn failure(errors: Vec<VerifyError>) -> Self {
        Self { ok: false, errors }
    }
}

/// Verify every structural invariant of the hierarchy held by `store`.
///
/// Storage failures are returned as `Err`; structural problems are reported
/// in the [`VerifyResult`].
pub fn verify<S: HierarchyStore + ?Sized>(store: &S) -> Result<VerifyResult, StoreError> {
    let mut errors = Vec::new();

    let group_ids = store.group_ids()?;
    let groups: HashSet<GroupId> = group_ids.iter().copied().collect();

    if !groups.contains(&GroupId::ROOT) {
        return Ok(VerifyResult::failure(vec![VerifyError::RootMissing]));
    }

    let mut parents: HashMap<GroupId, Option<GroupId>> = HashMap::new();
    let mut children: HashMap<GroupId, Vec<NodeRef>> = HashMap::new();
    for group in &group_ids {
        parents.insert(*group, store.group_parent(*group)?);
        children.insert(*group, store.children(*group)?);
    }

    let listed = |parent: GroupId, child: NodeRef| -> usize {
        children
            .get(&parent)
            .map(|list| list.iter().filter(|entry| **entry == child).count())
            .unwrap_or(0)
    };

    // Upward links.
    for group in &group_ids {
        match (group.is_root(), parents[group]) {
            (true, Some(parent)) => errors.push(VerifyError::RootHasParent(parent)),
            (true, None) => {}
            (false, None) => errors.push(VerifyError::OrphanGroup(*group)),
            (false, Some(parent)) => {
                let child = NodeRef::Group(*group);
                if !groups.contains(&parent) {
                    errors.push(VerifyError::ParentMissing { child, parent });
                } else {
                    let count = listed(parent, child);
                    if count != 1 {
                        errors.push(VerifyError::BackReference {
                            child,
                            parent,
                            count,
                        });
                    }
                }
            }
        }
    }

    for leaf in store.leaf_ids()? {
        let Some(parent) = store.leaf_parent(leaf)? else {
            continue;
        };
        let child = NodeRef::Leaf(leaf);
        if !groups.contains(&parent) {
            errors.push(VerifyError::ParentMissing { child, parent });
            continue;
        }
        let count = listed(parent, child);
        if count != 1 {
            errors.push(VerifyError::BackReference {
                child,
                parent,
                count,
            });
        }
    }

    // Downward links.
    for group in &group_ids {
        let mut seen = HashSet::new();
        for child in &children[group] {
            if !seen.insert(*child) {
                // Duplicate entries are reported once, from the child's side.
                continue;
            }
            let (exists, actual) = match child {
                NodeRef::Group(nested) => match parents.get(nested) {
                    Some(parent) => (true, *parent),
                    None => (false, None),
                },
                NodeRef::Leaf(leaf) => {
                    if store.leaf_exists(*leaf)? {
                        (true, store.leaf_parent(*leaf)?)
                    } else {
                        (false, None)
                    }
                }
            };
            if !exists {
                errors.push(VerifyError::DanglingChild {
                    group: *group,
                    child: *child,
                });
            } else if actual != Some(*group) {
                errors.push(VerifyError::ParentMismatch {
                    group: *group,
                    child: *child,
                    actual,
                });
            }
        }
    }

    // Acyclicity: a walk longer than the group count must revisit a group.
    for group in &group_ids {
        let mut current = parents[group];
        let mut steps = 0usize;
        while let Some(parent) = current {
            steps += 1;
            if steps > group_ids.len() {
                errors.push(VerifyError::CycleDetected(*group));
                break;
            }
            current = parents.get(&parent).copied().flatten();
        }
    }

    // Sibling names.
    for group in &group_ids {
        let mut names = HashSet::new();
        let mut reported = HashSet::new();
        for nested in children[group].iter().filter_map(|child| child.as_group()) {
            if !groups.contains(&nested) {
                continue;
            }
            let name = store.group_name(nested)?;
            if !names.insert(name.clone()) && reported.insert(name.clone()) {
                errors.push(VerifyError::DuplicateSiblingName {
                    parent: *group,
                    name,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(VerifyResult::success())
    } else {
        Ok(VerifyResult::failure(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hierarchy::{GroupHierarchy, NewGroup};
    use crate::core::types::LeafId;
    use crate::store::memory::{GroupRecord, LeafRecord, MemoryStore};

    fn consistent() -> GroupHierarchy<MemoryStore> {
        let mut store = MemoryStore::new();
        for slot in 0..3 {
            store.insert_leaf(LeafId::new(slot)).unwrap();
        }
        let mut groups = GroupHierarchy::new(store);
        let a = groups
            .create_group(NewGroup::named("a").with_leaves([LeafId::new(0)]))
            .unwrap();
        groups.create_group(NewGroup::named("b").under(a)).unwrap();
        groups
    }

    #[test]
    fn consistent_hierarchy_passes() {
        let groups = consistent();
        assert_eq!(verify(groups.store()).unwrap(), VerifyResult::success());
    }

    #[test]
    fn empty_store_passes() {
        assert!(verify(&MemoryStore::new()).unwrap().ok);
    }

    #[test]
    fn missing_back_reference_detected() {
        let mut groups = consistent();
        groups.store_mut().set_children(GroupId::ROOT, &[]).unwrap();

        let result = verify(groups.store()).unwrap();
        assert!(!result.ok);
        assert!(result.errors.contains(&VerifyError::BackReference {
            child: NodeRef::Group(GroupId::new(1)),
            parent: GroupId::ROOT,
            count: 0,
        }));
    }

    #[test]
    fn dangling_child_detected() {
        let mut groups = consistent();
        let mut children = groups.store().children(GroupId::ROOT).unwrap();
        children.push(NodeRef::Leaf(LeafId::new(50)));
        groups
            .store_mut()
            .set_children(GroupId::ROOT, &children)
            .unwrap();

        let result = verify(groups.store()).unwrap();
        assert_eq!(
            result.errors,
            vec![VerifyError::DanglingChild {
                group: GroupId::ROOT,
                child: NodeRef::Leaf(LeafId::new(50)),
            }]
        );
    }

    #[test]
    fn cycle_detected() {
        let a = GroupId::new(1);
        let b = GroupId::new(2);
        let store = MemoryStore::from_records(
            vec![
                (
                    a,
                    GroupRecord {
                        name: "a".into(),
                        parent: Some(b),
                        children: vec![NodeRef::Group(b)],
                    },
                ),
                (
                    b,
                    GroupRecord {
                        name: "b".into(),
                        parent: Some(a),
                        children: vec![NodeRef::Group(a)],
                    },
                ),
            ],
            Vec::<(LeafId, LeafRecord)>::new(),
        );

        let result = verify(&store).unwrap();
        assert!(result.errors.contains(&VerifyError::CycleDetected(a)));
        assert!(result.errors.contains(&VerifyError::CycleDetected(b)));
    }

    #[test]
    fn duplicate_sibling_names_detected() {
        let mut groups = consistent();
        let c = groups.create_group(NewGroup::named("c")).unwrap();
        groups.store_mut().set_group_name(c, "a").unwrap();

        let result = verify(groups.store()).unwrap();
        assert_eq!(
            result.errors,
            vec![VerifyError::DuplicateSiblingName {
                parent: GroupId::ROOT,
                name: "a".to_string(),
            }]
        );
    }

    #[test]
    fn stale_leaf_parent_detected() {
        let mut groups = consistent();
        groups
            .store_mut()
            .set_leaf_parent(LeafId::new(1), GroupId::new(1))
            .unwrap();

        let result = verify(groups.store()).unwrap();
        assert!(result.errors.contains(&VerifyError::ParentMismatch {
            group: GroupId::ROOT,
            child: NodeRef::Leaf(LeafId::new(1)),
            actual: Some(GroupId::new(1)),
        }));
    }
}

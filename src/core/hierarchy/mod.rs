//! core::hierarchy
//!
//! The group hierarchy engine.
//!
//! # Architecture
//!
//! The hierarchy is a tree where:
//! - Internal nodes are groups, leaves are targets
//! - Every node stores its parent; every group stores its ordered child list
//! - Group slot 0 is the root, which always exists and has no parent
//!
//! The engine owns no state of its own. Every query re-reads the
//! [`HierarchyStore`], and every mutation re-fetches the record it is about to
//! rewrite immediately before writing it.
//!
//! # Invariants
//!
//! Maintained by every public operation, given they hold going in:
//!
//! - Every non-root group's parent exists, and lists the group exactly once
//! - Every leaf's parent lists the leaf exactly once
//! - The parent relation is acyclic
//! - Sibling groups have distinct names
//! - Every referenced slot exists
//!
//! # Example
//!
//! ```
//! use blendgroups::core::hierarchy::{GroupHierarchy, NewGroup};
//! use blendgroups::core::types::{GroupId, LeafId};
//! use blendgroups::store::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! for leaf in [10, 11] {
//!     store.insert_leaf(LeafId::new(leaf)).unwrap();
//! }
//!
//! let mut groups = GroupHierarchy::new(store);
//! let market = groups.create_group(NewGroup::named("Market")).unwrap();
//! let fruit = groups
//!     .create_group(
//!         NewGroup::named("Fruit")
//!             .under(market)
//!             .with_leaves([LeafId::new(10), LeafId::new(11)]),
//!     )
//!     .unwrap();
//!
//! assert_eq!(groups.child_groups(GroupId::ROOT).unwrap(), vec![market]);
//! assert_eq!(groups.child_groups(market).unwrap(), vec![fruit]);
//! assert_eq!(
//!     groups.child_leaves(fruit).unwrap(),
//!     vec![LeafId::new(10), LeafId::new(11)]
//! );
//!
//! groups.delete_group(market).unwrap();
//! assert_eq!(groups.group_count().unwrap(), 1);
//! ```

mod delete;
mod moves;

pub use delete::{DeleteReport, PendingDelete};
pub use moves::{IllegalMove, MoveReport};

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use super::naming::{resolve_group_name, DEFAULT_GROUP_NAME};
use super::types::{GroupId, GroupName, LeafId, NodeRef, TypeError};
use crate::store::{HierarchyStore, StoreError};

/// Errors from hierarchy operations.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// The operation referenced a group with no record.
    #[error("group {0} does not exist")]
    UnknownGroup(GroupId),

    /// The operation referenced a leaf with no record.
    #[error("leaf {0} does not exist")]
    UnknownLeaf(LeafId),

    /// The operation is not allowed on the root group.
    #[error("the root group cannot be {0}")]
    RootImmutable(&'static str),

    /// Walking parent links revisited a group.
    #[error("cycle detected in group parents starting at group {0}")]
    CycleDetected(GroupId),

    /// A supplied value failed validation.
    #[error(transparent)]
    Invalid(#[from] TypeError),

    /// A recursive delete stopped partway. Nodes already removed stay
    /// removed; `pending` can be handed to
    /// [`GroupHierarchy::resume_delete`].
    #[error("delete of group {group} stopped partway: {source}")]
    PartialDelete {
        /// The group whose deletion was requested.
        group: GroupId,
        /// Remaining work.
        pending: Box<PendingDelete>,
        /// The storage failure that stopped it.
        #[source]
        source: StoreError,
    },

    /// The storage layer failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Shorthand for hierarchy results.
pub type Result<T, E = HierarchyError> = std::result::Result<T, E>;

/// Parameters for [`GroupHierarchy::create_group`].
///
/// Defaults to an empty group named [`DEFAULT_GROUP_NAME`] under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    /// Parent of the new group.
    pub parent: GroupId,
    /// Leaves to move into the new group.
    pub leaves: Vec<LeafId>,
    /// Requested name; siblings may force a numeric suffix.
    pub name: String,
}

impl Default for NewGroup {
    fn default() -> Self {
        Self {
            parent: GroupId::ROOT,
            leaves: Vec::new(),
            name: DEFAULT_GROUP_NAME.to_string(),
        }
    }
}

impl NewGroup {
    /// An empty group under the root with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the parent group.
    pub fn under(mut self, parent: GroupId) -> Self {
        self.parent = parent;
        self
    }

    /// Set the leaves to move into the new group.
    pub fn with_leaves(mut self, leaves: impl IntoIterator<Item = LeafId>) -> Self {
        self.leaves = leaves.into_iter().collect();
        self
    }
}

/// Iterator over group slots, in storage order.
///
/// Obtained from [`GroupHierarchy::groups`]; call it again to restart.
#[derive(Debug, Clone)]
pub struct Groups {
    inner: std::vec::IntoIter<GroupId>,
}

impl Iterator for Groups {
    type Item = GroupId;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Groups {}

/// Hierarchy maintenance over a host store.
#[derive(Debug, Clone, Default)]
pub struct GroupHierarchy<S> {
    store: S,
}

impl<S: HierarchyStore> GroupHierarchy<S> {
    /// Wrap a host store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrow the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Unwrap the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Fail with `UnknownGroup` unless `group` has a record.
    pub(crate) fn ensure_group(&self, group: GroupId) -> Result<()> {
        if self.store.group_exists(group)? {
            Ok(())
        } else {
            Err(HierarchyError::UnknownGroup(group))
        }
    }

    /// Fail with `UnknownLeaf` unless `leaf` has a record.
    pub(crate) fn ensure_leaf(&self, leaf: LeafId) -> Result<()> {
        if self.store.leaf_exists(leaf)? {
            Ok(())
        } else {
            Err(HierarchyError::UnknownLeaf(leaf))
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Every existing group, root included.
    pub fn groups(&self) -> Result<Groups> {
        Ok(Groups {
            inner: self.store.group_ids()?.into_iter(),
        })
    }

    /// Number of existing groups, root included.
    pub fn group_count(&self) -> Result<usize> {
        Ok(self.groups()?.len())
    }

    /// Every leaf with a recorded parent.
    pub fn leaves(&self) -> Result<Vec<LeafId>> {
        Ok(self.store.leaf_ids()?)
    }

    /// The ordered child list of `group`.
    pub fn children(&self, group: GroupId) -> Result<Vec<NodeRef>> {
        self.ensure_group(group)?;
        Ok(self.store.children(group)?)
    }

    /// Groups directly nested under `group`.
    pub fn child_groups(&self, group: GroupId) -> Result<Vec<GroupId>> {
        Ok(self
            .children(group)?
            .into_iter()
            .filter_map(NodeRef::as_group)
            .collect())
    }

    /// Leaves directly under `group`.
    pub fn child_leaves(&self, group: GroupId) -> Result<Vec<LeafId>> {
        Ok(self
            .children(group)?
            .into_iter()
            .filter_map(NodeRef::as_leaf)
            .collect())
    }

    /// Name of `group`.
    pub fn group_name(&self, group: GroupId) -> Result<String> {
        self.ensure_group(group)?;
        Ok(self.store.group_name(group)?)
    }

    /// First group named `name`, in storage order.
    pub fn find_group(&self, name: &str) -> Result<Option<GroupId>> {
        for group in self.groups()? {
            if self.store.group_name(group)? == name {
                return Ok(Some(group));
            }
        }
        Ok(None)
    }

    /// Parent of `group`; `None` for the root.
    pub fn parent_of(&self, group: GroupId) -> Result<Option<GroupId>> {
        self.ensure_group(group)?;
        Ok(self.store.group_parent(group)?)
    }

    /// Recorded parent of `leaf`.
    pub fn leaf_parent(&self, leaf: LeafId) -> Result<Option<GroupId>> {
        self.ensure_leaf(leaf)?;
        Ok(self.store.leaf_parent(leaf)?)
    }

    /// Ancestors of `group`, from its parent up to and including the root.
    ///
    /// Returns `CycleDetected` instead of looping if storage holds a cycle.
    pub fn ancestors_of(&self, group: GroupId) -> Result<Vec<GroupId>> {
        self.ensure_group(group)?;

        let mut result = Vec::new();
        let mut seen = HashSet::from([group]);
        let mut current = self.store.group_parent(group)?;

        while let Some(parent) = current {
            if !seen.insert(parent) {
                return Err(HierarchyError::CycleDetected(group));
            }
            result.push(parent);
            current = self.store.group_parent(parent)?;
        }

        Ok(result)
    }

    /// Whether `group` sits somewhere below `ancestor`.
    pub fn is_descendant_of(&self, group: GroupId, ancestor: GroupId) -> Result<bool> {
        Ok(self.ancestors_of(group)?.contains(&ancestor))
    }

    /// Depth-first, pre-order listing of the subtree at `group`.
    ///
    /// The first entry is `group` itself at depth 0. Children follow in
    /// child-list order.
    pub fn walk(&self, group: GroupId) -> Result<Vec<(usize, NodeRef)>> {
        self.ensure_group(group)?;

        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![(0usize, NodeRef::Group(group))];

        while let Some((depth, node)) = stack.pop() {
            result.push((depth, node));
            if let NodeRef::Group(current) = node {
                if !seen.insert(current) {
                    return Err(HierarchyError::CycleDetected(current));
                }
                let children = self.store.children(current)?;
                stack.extend(children.into_iter().rev().map(|child| (depth + 1, child)));
            }
        }

        Ok(result)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Create a group, name it, attach it, and move `leaves` into it.
    ///
    /// Returns the new group's slot. The resolved name may carry a numeric
    /// suffix; read it back with [`Self::group_name`].
    ///
    /// If a store call fails after the slot was allocated, the new record is
    /// detached and removed and any leaves already moved go back to their
    /// previous parent before the error is returned.
    pub fn create_group(&mut self, new: NewGroup) -> Result<GroupId> {
        self.ensure_group(new.parent)?;
        GroupName::new(new.name.as_str())?;
        let mut origins = Vec::with_capacity(new.leaves.len());
        for leaf in &new.leaves {
            self.ensure_leaf(*leaf)?;
            origins.push((*leaf, self.store.leaf_parent(*leaf)?));
        }

        let group = self.store.allocate_group()?;
        debug!(group = %group, parent = %new.parent, "allocated group");

        if let Err(err) = self.populate_group(group, &new) {
            if let Err(cleanup) = self.discard_group(group, &origins) {
                warn!(
                    group = %group,
                    error = %cleanup,
                    "failed to discard partially created group"
                );
            }
            return Err(err);
        }

        Ok(group)
    }

    fn populate_group(&mut self, group: GroupId, new: &NewGroup) -> Result<()> {
        // Attaching resolves the name against the new siblings.
        self.store.set_group_name(group, &new.name)?;
        self.move_groups(&[group], new.parent)?;
        self.move_leaves(&new.leaves, group)
    }

    /// Undo a partially created group.
    ///
    /// Leaves go back to where they were; a leaf that had no parent and was
    /// already touched lands under the root.
    fn discard_group(
        &mut self,
        group: GroupId,
        origins: &[(LeafId, Option<GroupId>)],
    ) -> Result<()> {
        let listed = self.store.children(group)?;
        for (leaf, origin) in origins {
            let home = match origin {
                Some(parent) if self.store.group_exists(*parent)? => *parent,
                _ => {
                    let touched = listed.contains(&NodeRef::Leaf(*leaf))
                        || self.store.leaf_parent(*leaf)? == Some(group);
                    if !touched {
                        continue;
                    }
                    GroupId::ROOT
                }
            };
            self.move_leaves(&[*leaf], home)?;
        }

        if let Some(parent) = self.store.group_parent(group)? {
            if self.store.group_exists(parent)? {
                let mut children = self.store.children(parent)?;
                let before = children.len();
                children.retain(|child| *child != NodeRef::Group(group));
                if children.len() != before {
                    self.store.set_children(parent, &children)?;
                }
            }
        }

        self.store.remove_group(group)?;
        debug!(group = %group, "discarded partially created group");
        Ok(())
    }

    /// Rename `group`, resolving collisions among its current siblings.
    ///
    /// Returns the name actually written, which callers should use instead
    /// of the requested one.
    pub fn rename_group(&mut self, group: GroupId, name: &str) -> Result<GroupName> {
        self.ensure_group(group)?;
        GroupName::new(name)?;

        let mut taken = Vec::new();
        if let Some(parent) = self.store.group_parent(group)? {
            for sibling in self.store.children(parent)? {
                match sibling {
                    NodeRef::Group(sibling) if sibling != group => {
                        taken.push(self.store.group_name(sibling)?);
                    }
                    _ => {}
                }
            }
        }

        let resolved = resolve_group_name(name, &taken)?;
        self.store.set_group_name(group, resolved.as_str())?;
        debug!(group = %group, name = %resolved, "renamed group");
        Ok(resolved)
    }
}

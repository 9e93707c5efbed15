//! core::types
//!
//! Strong types for hierarchy addressing.
//!
//! # Types
//!
//! - [`GroupId`] - Storage slot of a group (slot 0 is the root group)
//! - [`LeafId`] - Storage slot of a leaf (target)
//! - [`NodeRef`] - One entry of a group's child list
//! - [`GroupName`] - Validated group display name
//!
//! # Index Encoding
//!
//! Hosts usually store child lists as signed integers: negative entries are
//! nested groups, non-negative entries are leaves. That encoding cannot express
//! "the root group" as a child and makes leaf `0` look like the root. Inside
//! this crate every reference is tagged instead, and the signed form only
//! exists at the storage boundary via [`NodeRef::to_signed`] and
//! [`NodeRef::from_signed`].
//!
//! # Examples
//!
//! ```
//! use blendgroups::core::types::{GroupId, LeafId, NodeRef};
//!
//! let group = NodeRef::Group(GroupId::new(3));
//! assert_eq!(group.to_signed().unwrap(), -3);
//!
//! // Leaf zero is an ordinary leaf, not the root.
//! assert_eq!(NodeRef::from_signed(0).unwrap(), NodeRef::Leaf(LeafId::new(0)));
//!
//! // The root group is never a child entry.
//! assert!(NodeRef::Group(GroupId::ROOT).to_signed().is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid group name: {0}")]
    InvalidGroupName(String),

    #[error("invalid child entry: {0}")]
    InvalidChildEntry(i64),

    #[error("the root group cannot appear in a child list")]
    RootAsChild,
}

/// Storage slot of a group.
///
/// Slot 0 is reserved for the implicit root group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(u32);

impl GroupId {
    /// The always-present top-level group.
    pub const ROOT: GroupId = GroupId(0);

    /// Create a group id from a raw slot.
    pub const fn new(slot: u32) -> Self {
        Self(slot)
    }

    /// The raw storage slot.
    pub const fn slot(self) -> u32 {
        self.0
    }

    /// Whether this is the root group.
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for GroupId {
    fn from(slot: u32) -> Self {
        Self(slot)
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage slot of a leaf (target).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeafId(u32);

impl LeafId {
    /// Create a leaf id from a raw slot.
    pub const fn new(slot: u32) -> Self {
        Self(slot)
    }

    /// The raw storage slot.
    pub const fn slot(self) -> u32 {
        self.0
    }
}

impl From<u32> for LeafId {
    fn from(slot: u32) -> Self {
        Self(slot)
    }
}

impl std::fmt::Display for LeafId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single entry in a group's child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum NodeRef {
    /// A nested group.
    Group(GroupId),
    /// A leaf.
    Leaf(LeafId),
}

impl NodeRef {
    /// Encode as a host child-list entry (negative = group).
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::RootAsChild`] for `Group(ROOT)`, which has no
    /// signed encoding.
    pub fn to_signed(self) -> Result<i64, TypeError> {
        match self {
            NodeRef::Group(group) if group.is_root() => Err(TypeError::RootAsChild),
            NodeRef::Group(group) => Ok(-i64::from(group.slot())),
            NodeRef::Leaf(leaf) => Ok(i64::from(leaf.slot())),
        }
    }

    /// Decode a host child-list entry.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::InvalidChildEntry`] if the magnitude does not fit a
    /// slot.
    pub fn from_signed(entry: i64) -> Result<Self, TypeError> {
        let slot =
            u32::try_from(entry.unsigned_abs()).map_err(|_| TypeError::InvalidChildEntry(entry))?;
        if entry < 0 {
            Ok(NodeRef::Group(GroupId(slot)))
        } else {
            Ok(NodeRef::Leaf(LeafId(slot)))
        }
    }

    /// The group this entry refers to, if it is a group entry.
    pub fn as_group(self) -> Option<GroupId> {
        match self {
            NodeRef::Group(group) => Some(group),
            NodeRef::Leaf(_) => None,
        }
    }

    /// The leaf this entry refers to, if it is a leaf entry.
    pub fn as_leaf(self) -> Option<LeafId> {
        match self {
            NodeRef::Leaf(leaf) => Some(leaf),
            NodeRef::Group(_) => None,
        }
    }
}

impl From<GroupId> for NodeRef {
    fn from(group: GroupId) -> Self {
        NodeRef::Group(group)
    }
}

impl From<LeafId> for NodeRef {
    fn from(leaf: LeafId) -> Self {
        NodeRef::Leaf(leaf)
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRef::Group(group) => write!(f, "group {}", group),
            NodeRef::Leaf(leaf) => write!(f, "leaf {}", leaf),
        }
    }
}

/// A validated group name.
///
/// Names must be non-empty and free of control characters (Unicode `Cc`,
/// as `char::is_control`). Uniqueness among siblings is a hierarchy concern,
/// not a property of the name itself.
///
/// # Example
///
/// ```
/// use blendgroups::core::types::GroupName;
///
/// let name = GroupName::new("Fruit").unwrap();
/// assert_eq!(name.as_str(), "Fruit");
///
/// assert!(GroupName::new("").is_err());
/// assert!(GroupName::new("tab\there").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupName(String);

impl GroupName {
    /// Create a new validated group name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidGroupName` if the name is empty or contains
    /// control characters.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::InvalidGroupName(
                "group name cannot be empty".into(),
            ));
        }
        if name.chars().any(|c| c.is_control()) {
            return Err(TypeError::InvalidGroupName(
                "group name cannot contain control characters".into(),
            ));
        }
        Ok(Self(name))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GroupName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GroupName> for String {
    fn from(name: GroupName) -> Self {
        name.0
    }
}

impl AsRef<str> for GroupName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for GroupName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GroupName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for GroupName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod node_ref {
        use super::*;

        #[test]
        fn group_encodes_negative() {
            assert_eq!(NodeRef::Group(GroupId::new(7)).to_signed(), Ok(-7));
        }

        #[test]
        fn leaf_zero_encodes_zero() {
            assert_eq!(NodeRef::Leaf(LeafId::new(0)).to_signed(), Ok(0));
        }

        #[test]
        fn root_has_no_encoding() {
            assert_eq!(
                NodeRef::Group(GroupId::ROOT).to_signed(),
                Err(TypeError::RootAsChild)
            );
        }

        #[test]
        fn decode_sign_is_authoritative() {
            assert_eq!(
                NodeRef::from_signed(-2),
                Ok(NodeRef::Group(GroupId::new(2)))
            );
            assert_eq!(NodeRef::from_signed(2), Ok(NodeRef::Leaf(LeafId::new(2))));
        }

        #[test]
        fn decode_rejects_out_of_range() {
            let too_big = i64::from(u32::MAX) + 1;
            assert_eq!(
                NodeRef::from_signed(too_big),
                Err(TypeError::InvalidChildEntry(too_big))
            );
            assert_eq!(
                NodeRef::from_signed(-too_big),
                Err(TypeError::InvalidChildEntry(-too_big))
            );
        }

        #[test]
        fn accessors() {
            let group = NodeRef::from(GroupId::new(1));
            let leaf = NodeRef::from(LeafId::new(1));
            assert_eq!(group.as_group(), Some(GroupId::new(1)));
            assert_eq!(group.as_leaf(), None);
            assert_eq!(leaf.as_leaf(), Some(LeafId::new(1)));
            assert_eq!(leaf.as_group(), None);
        }

        #[test]
        fn display() {
            assert_eq!(NodeRef::Group(GroupId::new(4)).to_string(), "group 4");
            assert_eq!(NodeRef::Leaf(LeafId::new(9)).to_string(), "leaf 9");
        }
    }

    mod group_name {
        use super::*;

        #[test]
        fn accepts_spaces_and_unicode() {
            assert!(GroupName::new("New Group").is_ok());
            assert!(GroupName::new("Früchte").is_ok());
        }

        #[test]
        fn rejects_empty() {
            assert!(GroupName::new("").is_err());
        }

        #[test]
        fn rejects_newline() {
            assert!(GroupName::new("a\nb").is_err());
        }

        #[test]
        fn serde_validates() {
            let parsed: Result<GroupName, _> = serde_json::from_str("\"\"");
            assert!(parsed.is_err());

            let parsed: GroupName = serde_json::from_str("\"Market\"").unwrap();
            assert_eq!(parsed, "Market");
        }
    }

    #[test]
    fn root_is_slot_zero() {
        assert!(GroupId::ROOT.is_root());
        assert!(!GroupId::new(1).is_root());
        assert_eq!(GroupId::ROOT.slot(), 0);
    }
}

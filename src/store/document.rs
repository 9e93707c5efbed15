//! store::document
//!
//! On-disk document format for [`MemoryStore`].
//!
//! # Schema Design
//!
//! - Self-describing with `kind` and `schema_version`
//! - Strictly parsed (unknown fields rejected)
//! - Child lists use the host's signed encoding (negative = group)
//!
//! # Example
//!
//! ```
//! use blendgroups::core::types::LeafId;
//! use blendgroups::store::document::{parse_document, Document, DOCUMENT_KIND};
//! use blendgroups::store::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! store.insert_leaf(LeafId::new(0)).unwrap();
//!
//! let doc = Document::from_store(&store).unwrap();
//! assert_eq!(doc.kind, DOCUMENT_KIND);
//!
//! let json = serde_json::to_string(&doc).unwrap();
//! let restored = parse_document(&json).unwrap().into_store().unwrap();
//! assert!(restored.leaf(LeafId::new(0)).is_some());
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::memory::{GroupRecord, LeafRecord, MemoryStore};
use crate::core::types::{GroupId, LeafId, NodeRef, TypeError};

/// The kind identifier for hierarchy documents.
pub const DOCUMENT_KIND: &str = "blendgroups.hierarchy";

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from document operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to parse document: {0}")]
    ParseError(String),

    #[error("invalid kind '{found}', expected '{}'", DOCUMENT_KIND)]
    InvalidKind { found: String },

    #[error("unsupported schema version {0}, supported: {SCHEMA_VERSION}")]
    UnsupportedVersion(u32),

    #[error("duplicate {kind} record at slot {slot}")]
    DuplicateRecord { kind: &'static str, slot: u32 },

    #[error("invalid child entry in group {group}: {source}")]
    InvalidChild {
        group: GroupId,
        #[source]
        source: TypeError,
    },

    #[error("failed to read document '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write document '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Envelope for version dispatch before full parsing.
#[derive(Debug, Deserialize)]
struct DocumentEnvelope {
    kind: String,
    schema_version: u32,
}

/// A serialized hierarchy (v1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    /// Always [`DOCUMENT_KIND`].
    pub kind: String,
    /// Always [`SCHEMA_VERSION`].
    pub schema_version: u32,
    /// Group records, root included.
    pub groups: Vec<GroupEntry>,
    /// Leaf records.
    #[serde(default)]
    pub leaves: Vec<LeafEntry>,
}

/// One serialized group record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupEntry {
    pub index: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
    #[serde(default)]
    pub children: Vec<i64>,
}

/// One serialized leaf record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeafEntry {
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
}

impl Document {
    /// Snapshot a store.
    ///
    /// # Errors
    ///
    /// Returns `InvalidChild` if a child list holds the root group, which has
    /// no signed encoding.
    pub fn from_store(store: &MemoryStore) -> Result<Self, DocumentError> {
        let mut groups = Vec::new();
        for (id, record) in store.group_records() {
            let children = record
                .children
                .iter()
                .map(|child| child.to_signed())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| DocumentError::InvalidChild { group: id, source })?;
            groups.push(GroupEntry {
                index: id.slot(),
                name: record.name.clone(),
                parent: record.parent.map(GroupId::slot),
                children,
            });
        }

        let leaves = store
            .leaf_records()
            .map(|(id, record)| LeafEntry {
                index: id.slot(),
                parent: record.parent.map(GroupId::slot),
            })
            .collect();

        Ok(Self {
            kind: DOCUMENT_KIND.to_string(),
            schema_version: SCHEMA_VERSION,
            groups,
            leaves,
        })
    }

    /// Rebuild a store from this document.
    ///
    /// Structural consistency is not checked here; use
    /// [`crate::core::verify::verify`] on the result.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate slots or undecodable child entries.
    pub fn into_store(self) -> Result<MemoryStore, DocumentError> {
        let mut groups = Vec::with_capacity(self.groups.len());
        let mut seen_groups = std::collections::HashSet::new();
        for entry in self.groups {
            let id = GroupId::new(entry.index);
            if !seen_groups.insert(id) {
                return Err(DocumentError::DuplicateRecord {
                    kind: "group",
                    slot: entry.index,
                });
            }
            let children = entry
                .children
                .into_iter()
                .map(NodeRef::from_signed)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| DocumentError::InvalidChild { group: id, source })?;
            groups.push((
                id,
                GroupRecord {
                    name: entry.name,
                    parent: entry.parent.map(GroupId::new),
                    children,
                },
            ));
        }

        let mut leaves = Vec::with_capacity(self.leaves.len());
        let mut seen_leaves = std::collections::HashSet::new();
        for entry in self.leaves {
            let id = LeafId::new(entry.index);
            if !seen_leaves.insert(id) {
                return Err(DocumentError::DuplicateRecord {
                    kind: "leaf",
                    slot: entry.index,
                });
            }
            leaves.push((
                id,
                LeafRecord {
                    parent: entry.parent.map(GroupId::new),
                },
            ));
        }

        Ok(MemoryStore::from_records(groups, leaves))
    }
}

/// Parse document JSON with version dispatch.
///
/// # Errors
///
/// Returns an error if:
/// - The JSON is malformed
/// - The `kind` field doesn't match [`DOCUMENT_KIND`]
/// - The `schema_version` is not supported
pub fn parse_document(json: &str) -> Result<Document, DocumentError> {
    let envelope: DocumentEnvelope =
        serde_json::from_str(json).map_err(|e| DocumentError::ParseError(e.to_string()))?;

    if envelope.kind != DOCUMENT_KIND {
        return Err(DocumentError::InvalidKind {
            found: envelope.kind,
        });
    }

    match envelope.schema_version {
        SCHEMA_VERSION => {
            serde_json::from_str(json).map_err(|e| DocumentError::ParseError(e.to_string()))
        }
        other => Err(DocumentError::UnsupportedVersion(other)),
    }
}

/// Load a store from a document file.
pub fn load(path: &Path) -> Result<MemoryStore, DocumentError> {
    let contents = fs::read_to_string(path).map_err(|e| DocumentError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_document(&contents)?.into_store()
}

/// Write a store to a document file atomically.
///
/// Creates parent directories if needed, writes a temp file next to the
/// target, then renames it into place.
pub fn save(path: &Path, store: &MemoryStore) -> Result<(), DocumentError> {
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| DocumentError::WriteError { path, source }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err(path))?;
    }

    let contents = serde_json::to_string_pretty(&Document::from_store(store)?)
        .map_err(|e| DocumentError::ParseError(e.to_string()))?;

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path).map_err(write_err(&temp_path))?;
    file.write_all(contents.as_bytes())
        .map_err(write_err(&temp_path))?;
    file.sync_all().map_err(write_err(&temp_path))?;
    drop(file);

    fs::rename(&temp_path, path).map_err(write_err(path))
}

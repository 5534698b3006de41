//! Namespace record parsers
//!
//! Two section consumers built on [`RecordCursor`]:
//!
//! - [`parse_inode_section`]: a header record giving the inode count, then
//!   exactly that many inode records → [`InodeTable`]
//! - [`parse_inode_dir_section`]: parent/children records until the section
//!   is used up → [`AdjacencyTable`]

use crate::error::{FsImageError, Result};
use crate::proto::{DirEntry, INode, INodeSection};
use crate::record::RecordCursor;
use crate::summary::{SECTION_INODE, SECTION_INODE_DIR};
use crate::varint::VarintError;
use crate::DecodeOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Inode id
pub type InodeId = u64;

/// Inode id → node
pub type NodeTable = HashMap<InodeId, Node>;

/// Parent id → child ids, in record order
pub type AdjacencyTable = HashMap<InodeId, Vec<InodeId>>;

/// Kind of a namespace entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Directory,
    Symlink,
    /// Kind code this decoder does not know
    Unknown(i32),
}

impl NodeKind {
    /// Map an on-disk kind code
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => NodeKind::File,
            2 => NodeKind::Directory,
            3 => NodeKind::Symlink,
            other => NodeKind::Unknown(other),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::File => f.write_str("file"),
            NodeKind::Directory => f.write_str("directory"),
            NodeKind::Symlink => f.write_str("symlink"),
            NodeKind::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// One namespace entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Raw name bytes; the root's name is empty
    pub name: Vec<u8>,
    pub id: InodeId,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: InodeId, name: impl Into<Vec<u8>>, kind: NodeKind) -> Self {
        Node {
            name: name.into(),
            id,
            kind,
        }
    }

    /// Name decoded as UTF-8, with invalid sequences replaced
    pub fn name_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// Entity counts derived from a node table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCount {
    pub files: u64,
    pub directories: u64,
    pub symlinks: u64,
    pub unknown: u64,
}

impl EntityCount {
    pub fn from_nodes(nodes: &NodeTable) -> Self {
        let mut counts = EntityCount::default();
        for node in nodes.values() {
            match node.kind {
                NodeKind::File => counts.files += 1,
                NodeKind::Directory => counts.directories += 1,
                NodeKind::Symlink => counts.symlinks += 1,
                NodeKind::Unknown(_) => counts.unknown += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> u64 {
        self.files + self.directories + self.symlinks + self.unknown
    }
}

/// Result of decoding the INODE section
#[derive(Debug, Clone)]
pub struct InodeTable {
    pub nodes: NodeTable,
    pub counts: EntityCount,
    /// Inode count announced by the section header
    pub declared: u64,
    pub last_inode_id: InodeId,
}

/// Decode the INODE section.
///
/// The header's inode count is the loop bound: running out of bytes before
/// that many records is a [`FsImageError::SectionUnderrun`].
pub fn parse_inode_section(bytes: &[u8], options: &DecodeOptions) -> Result<InodeTable> {
    let underrun = |consumed: usize| FsImageError::SectionUnderrun {
        section: SECTION_INODE.to_string(),
        consumed: consumed as u64,
        length: bytes.len() as u64,
    };

    let mut cursor = RecordCursor::new(bytes);
    if cursor.is_exhausted() {
        return Err(underrun(0));
    }
    let header: INodeSection = cursor
        .next_record()
        .map_err(|e| cut_short(e, SECTION_INODE, cursor.position(), bytes.len()))?;
    debug!(
        "INODE header: {} inodes, last id {}",
        header.num_inodes, header.last_inode_id
    );

    // Every record takes at least one byte, so the section length caps the count
    let capacity = header.num_inodes.min(bytes.len() as u64) as usize;
    let mut nodes = NodeTable::with_capacity(capacity);

    for _ in 0..header.num_inodes {
        if cursor.is_exhausted() {
            return Err(underrun(cursor.position()));
        }
        let inode: INode = cursor
            .next_record()
            .map_err(|e| cut_short(e, SECTION_INODE, cursor.position(), bytes.len()))?;

        let kind = NodeKind::from_code(inode.kind);
        if let NodeKind::Unknown(code) = kind {
            if options.strict_kinds {
                return Err(FsImageError::UnknownInodeKind { id: inode.id, code });
            }
            warn!("Inode {} has unknown kind code {}", inode.id, code);
        }

        let node = Node::new(inode.id, inode.name, kind);
        if nodes.insert(inode.id, node).is_some() {
            warn!("Inode {} appears more than once, keeping the last", inode.id);
        }
    }

    if !cursor.is_exhausted() {
        debug!(
            "{} bytes left in INODE section after {} records",
            cursor.remaining(),
            header.num_inodes
        );
    }

    let counts = EntityCount::from_nodes(&nodes);
    Ok(InodeTable {
        nodes,
        counts,
        declared: header.num_inodes,
        last_inode_id: header.last_inode_id,
    })
}

/// A record running past the end of its section is an underrun of that section
fn cut_short(
    error: FsImageError,
    section: &str,
    consumed: usize,
    length: usize,
) -> FsImageError {
    match error {
        FsImageError::TruncatedRecord { .. }
        | FsImageError::MalformedVarint {
            fault: VarintError::Truncated,
            ..
        } => FsImageError::SectionUnderrun {
            section: section.to_string(),
            consumed: consumed as u64,
            length: length as u64,
        },
        other => other,
    }
}

/// Decode the INODE_DIR section.
///
/// Records are consumed until the section length is used up exactly. A
/// parent split across several records gets all their children, in order.
pub fn parse_inode_dir_section(bytes: &[u8]) -> Result<AdjacencyTable> {
    let mut adjacency = AdjacencyTable::new();
    let mut cursor = RecordCursor::new(bytes);
    let mut records = 0usize;

    while !cursor.is_exhausted() {
        let entry: DirEntry = cursor
            .next_record()
            .map_err(|e| cut_short(e, SECTION_INODE_DIR, cursor.position(), bytes.len()))?;

        adjacency
            .entry(entry.parent)
            .or_default()
            .extend(entry.children);
        records += 1;
    }

    debug!(
        "INODE_DIR: {} records for {} parents",
        records,
        adjacency.len()
    );
    Ok(adjacency)
}

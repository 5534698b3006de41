//! # fsimage-rs - fsimage Checkpoint Decoder
//!
//! `fsimage-rs` decodes the binary metadata checkpoint ("fsimage") of a
//! distributed filesystem and rebuilds its namespace:
//!
//! - **Section directory** located from the 4-byte trailer
//! - **Inode table** (id → name and kind) with file/directory/symlink counts
//! - **Adjacency table** (parent → children), merged across split records
//! - **Namespace tree** rooted at inode 16385, with cycle and depth guards
//! - **Absolute paths** for every leaf
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fsimage_rs::{FsImage, Result};
//!
//! # fn main() -> Result<()> {
//! let image = FsImage::open("fsimage_0000000000000000042")?;
//!
//! let counts = image.counts();
//! println!("{} files, {} directories", counts.files, counts.directories);
//!
//! for path in image.paths().iter().take(10) {
//!     println!("{}", path);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Options
//!
//! ```rust,no_run
//! use fsimage_rs::{DecodeOptions, FsImage, Result};
//!
//! # fn main() -> Result<()> {
//! let options = DecodeOptions::new()
//!     .strict_kinds(true)
//!     .include_directories(true);
//!
//! let image = FsImage::open_with("fsimage", options)?;
//! println!("{} paths", image.paths().len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ INODE section                               │
//! │  - header: inode count, last inode id       │
//! │  - one length-delimited record per inode    │
//! ├─────────────────────────────────────────────┤
//! │ INODE_DIR section                           │
//! │  - length-delimited parent → children lists │
//! ├─────────────────────────────────────────────┤
//! │ ... other sections ...                      │
//! ├─────────────────────────────────────────────┤
//! │ varint length + FileSummary (section table) │
//! ├─────────────────────────────────────────────┤
//! │ i32 big-endian summary length               │
//! └─────────────────────────────────────────────┘
//! ```

pub mod core;

// Re-export core modules internally so crate:: paths in core resolve
#[allow(unused_imports)]
pub(crate) use self::core::{
    config, error, io, namespace, paths, proto, record, stats, summary, tree, varint,
};

pub use crate::core::{
    config::{DecodeOptions, DEFAULT_MAX_DEPTH, ROOT_INODE_ID},
    error::{FsImageError, Result},
    io::ImageReader,
    namespace::{
        parse_inode_dir_section, parse_inode_section, AdjacencyTable, EntityCount, InodeId,
        InodeTable, Node, NodeKind, NodeTable,
    },
    paths::{materialize, PathOptions},
    record::{decode_delimited, decode_delimited_with, Record, RecordCursor},
    stats::{child_counts, min_inode_id, name_frequencies, ChildCount, NameCount},
    summary::{
        locate_trailer, parse_sections, FileSummaryInfo, SectionDescriptor, SectionTable,
        SECTION_INODE, SECTION_INODE_DIR,
    },
    tree::{build_tree, Tree, TreeBuilder},
    varint::{decode_varint, VarintError},
};

use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A fully decoded fsimage
///
/// Holds the section directory, the inode and adjacency tables and the
/// namespace tree. Everything is built once by [`FsImage::open`] and is
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct FsImage {
    summary: FileSummaryInfo,
    inodes: InodeTable,
    adjacency: AdjacencyTable,
    tree: Tree,
    options: DecodeOptions,
    path: Option<PathBuf>,
}

impl FsImage {
    /// Decode an image file with default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, DecodeOptions::default())
    }

    /// Decode an image file
    pub fn open_with<P: AsRef<Path>>(path: P, options: DecodeOptions) -> Result<Self> {
        info!("Opening fsimage at {:?}", path.as_ref());
        let mut reader = ImageReader::<File>::open(&path)?;
        let mut image = Self::decode(&mut reader, options)?;
        image.path = Some(path.as_ref().to_path_buf());
        Ok(image)
    }

    /// Decode an image from any seekable source
    pub fn from_reader<R: Read + Seek>(source: R, options: DecodeOptions) -> Result<Self> {
        let mut reader = ImageReader::new(source)?;
        Self::decode(&mut reader, options)
    }

    fn decode<R: Read + Seek>(reader: &mut ImageReader<R>, options: DecodeOptions) -> Result<Self> {
        let file_length = reader.len();
        let summary_length = locate_trailer(reader, file_length)?;
        let summary = parse_sections(reader, file_length, summary_length)?;
        info!(
            "Found {} sections (layout version {})",
            summary.sections.len(),
            summary.layout_version
        );
        if let Some(codec) = &summary.codec {
            return Err(FsImageError::UnsupportedCodec(codec.clone()));
        }

        let inodes = {
            let section = summary.sections.require(SECTION_INODE)?;
            let bytes = reader.read_section(section)?;
            parse_inode_section(&bytes, &options).map_err(|e| e.shifted(section.offset))?
        };
        info!(
            "Decoded {} inodes: {} files, {} directories, {} symlinks",
            inodes.nodes.len(),
            inodes.counts.files,
            inodes.counts.directories,
            inodes.counts.symlinks
        );

        let adjacency = {
            let section = summary.sections.require(SECTION_INODE_DIR)?;
            let bytes = reader.read_section(section)?;
            parse_inode_dir_section(&bytes).map_err(|e| e.shifted(section.offset))?
        };
        debug!("Adjacency table has {} parents", adjacency.len());

        let tree = build_tree(&adjacency, &inodes.nodes, &options)?;
        info!(
            "Namespace tree rooted at {} has {} nodes",
            options.root_id,
            tree.node_count()
        );

        Ok(FsImage {
            summary,
            inodes,
            adjacency,
            tree,
            options,
            path: None,
        })
    }

    /// Source file, when opened from disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn summary(&self) -> &FileSummaryInfo {
        &self.summary
    }

    pub fn sections(&self) -> &SectionTable {
        &self.summary.sections
    }

    pub fn inodes(&self) -> &InodeTable {
        &self.inodes
    }

    pub fn nodes(&self) -> &NodeTable {
        &self.inodes.nodes
    }

    pub fn counts(&self) -> EntityCount {
        self.inodes.counts
    }

    pub fn adjacency(&self) -> &AdjacencyTable {
        &self.adjacency
    }

    /// Root of the namespace tree
    pub fn root(&self) -> &Tree {
        &self.tree
    }

    /// Nodes reachable from the root, root included
    pub fn node_count(&self) -> usize {
        self.tree.node_count()
    }

    /// Absolute paths under the configured [`PathOptions`]
    pub fn paths(&self) -> Vec<String> {
        materialize(&self.tree, PathOptions::from(&self.options))
    }
}

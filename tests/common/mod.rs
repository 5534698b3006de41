//! Shared fixtures: assemble fsimage bytes from inode and directory records

#![allow(dead_code)]

use fsimage_rs::core::proto::{DirEntry, FileSummary, INode, INodeSection, Section};
use prost::Message;
use std::io::Write;
use tempfile::NamedTempFile;

pub const ROOT: u64 = 16385;

pub const FILE: i32 = 1;
pub const DIRECTORY: i32 = 2;
pub const SYMLINK: i32 = 3;

/// Builder for synthetic images
///
/// Sections are laid out as: padding, INODE, INODE_DIR, summary, trailer.
#[derive(Debug, Clone, Default)]
pub struct ImageWriter {
    inodes: Vec<INode>,
    declared: Option<u64>,
    dirs: Vec<DirEntry>,
    padding: usize,
    extra_sections: Vec<Section>,
    omit: Vec<&'static str>,
    codec: Option<String>,
}

impl ImageWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inode(mut self, id: u64, name: &str, kind: i32) -> Self {
        self.inodes.push(INode {
            kind,
            id,
            name: name.as_bytes().to_vec(),
        });
        self
    }

    /// Override the inode count written in the INODE header
    pub fn declared(mut self, count: u64) -> Self {
        self.declared = Some(count);
        self
    }

    pub fn dir(mut self, parent: u64, children: &[u64]) -> Self {
        self.dirs.push(DirEntry {
            parent,
            children: children.to_vec(),
            ref_children: Vec::new(),
        });
        self
    }

    /// Bytes before the first section, so offsets are non-zero
    pub fn padding(mut self, bytes: usize) -> Self {
        self.padding = bytes;
        self
    }

    pub fn extra_section(mut self, name: &str, offset: u64, length: u64) -> Self {
        self.extra_sections.push(Section {
            name: name.to_string(),
            length,
            offset,
        });
        self
    }

    /// Leave a section out of the summary
    pub fn omit(mut self, name: &'static str) -> Self {
        self.omit.push(name);
        self
    }

    pub fn codec(mut self, codec: &str) -> Self {
        self.codec = Some(codec.to_string());
        self
    }

    pub fn inode_section(&self) -> Vec<u8> {
        let mut buf = INodeSection {
            last_inode_id: self.inodes.iter().map(|i| i.id).max().unwrap_or(0),
            num_inodes: self.declared.unwrap_or(self.inodes.len() as u64),
        }
        .encode_length_delimited_to_vec();
        for inode in &self.inodes {
            buf.extend(inode.encode_length_delimited_to_vec());
        }
        buf
    }

    pub fn dir_section(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for entry in &self.dirs {
            buf.extend(entry.encode_length_delimited_to_vec());
        }
        buf
    }

    /// Image bytes plus the summary so callers can tamper with either
    pub fn build_parts(&self) -> (Vec<u8>, FileSummary) {
        let mut image = vec![0u8; self.padding];

        let inode_offset = image.len() as u64;
        let inode_bytes = self.inode_section();
        image.extend_from_slice(&inode_bytes);

        let dir_offset = image.len() as u64;
        let dir_bytes = self.dir_section();
        image.extend_from_slice(&dir_bytes);

        let mut sections = vec![
            Section {
                name: "INODE".to_string(),
                length: inode_bytes.len() as u64,
                offset: inode_offset,
            },
            Section {
                name: "INODE_DIR".to_string(),
                length: dir_bytes.len() as u64,
                offset: dir_offset,
            },
        ];
        sections.extend(self.extra_sections.iter().cloned());
        sections.retain(|s| !self.omit.contains(&s.name.as_str()));

        let summary = FileSummary {
            ondisk_version: 1,
            layout_version: 64,
            codec: self.codec.clone(),
            sections,
        };
        (image, summary)
    }

    pub fn build(&self) -> Vec<u8> {
        let (image, summary) = self.build_parts();
        finish(image, &summary)
    }

    /// Write the image to a temp file that lives as long as the handle
    pub fn write_temp(&self) -> NamedTempFile {
        write_temp(&self.build())
    }
}

/// Append the delimited summary and the trailer
pub fn finish(mut image: Vec<u8>, summary: &FileSummary) -> Vec<u8> {
    let block = summary.encode_length_delimited_to_vec();
    image.extend_from_slice(&block);
    image.extend_from_slice(&(block.len() as i32).to_be_bytes());
    image
}

pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut temp = NamedTempFile::new().unwrap();
    temp.write_all(bytes).unwrap();
    temp.flush().unwrap();
    temp
}

/// `/a.txt`, `/b/c.txt`
pub fn minimal_image() -> ImageWriter {
    ImageWriter::new()
        .inode(ROOT, "", DIRECTORY)
        .inode(20, "a.txt", FILE)
        .inode(21, "b", DIRECTORY)
        .inode(22, "c.txt", FILE)
        .dir(ROOT, &[20, 21])
        .dir(21, &[22])
}

//! Trailer and section directory
//!
//! An fsimage ends with its directory of sections:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ section bytes (any order, any spacing)   │
//! ├──────────────────────────────────────────┤
//! │ varint length │ FileSummary record       │
//! ├──────────────────────────────────────────┤
//! │ i32 big-endian: length of the block above│
//! └──────────────────────────────────────────┘
//! ```

use crate::error::{FsImageError, Result};
use crate::io::ImageReader;
use crate::proto::FileSummary;
use crate::record::Record;
use crate::varint::decode_varint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Seek};
use tracing::{debug, warn};

/// Size of the trailing summary length field
pub const TRAILER_LEN: u64 = 4;

/// Section holding inode records
pub const SECTION_INODE: &str = "INODE";

/// Section holding parent → children records
pub const SECTION_INODE_DIR: &str = "INODE_DIR";

/// A named byte range in the image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub name: String,
    pub offset: u64,
    pub length: u64,
}

/// Sections keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTable {
    sections: BTreeMap<String, SectionDescriptor>,
}

impl SectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a section; a repeated name replaces the earlier entry
    pub fn insert(&mut self, section: SectionDescriptor) -> Option<SectionDescriptor> {
        self.sections.insert(section.name.clone(), section)
    }

    pub fn get(&self, name: &str) -> Option<&SectionDescriptor> {
        self.sections.get(name)
    }

    /// Look up a section the decode cannot do without
    pub fn require(&self, name: &str) -> Result<&SectionDescriptor> {
        self.get(name)
            .ok_or_else(|| FsImageError::MissingSection(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections in name order
    pub fn iter(&self) -> impl Iterator<Item = &SectionDescriptor> {
        self.sections.values()
    }
}

/// Decoded file summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummaryInfo {
    pub ondisk_version: u32,
    pub layout_version: u32,
    pub codec: Option<String>,
    pub sections: SectionTable,
}

/// Read the trailing big-endian summary length.
///
/// An image shorter than the trailer is an I/O error, never a zero length.
pub fn locate_trailer<R: Read + Seek>(
    reader: &mut ImageReader<R>,
    file_length: u64,
) -> Result<i32> {
    if file_length < TRAILER_LEN {
        return Err(FsImageError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!(
                "image is {} bytes, shorter than the {} byte trailer",
                file_length, TRAILER_LEN
            ),
        )));
    }

    let mut trailer = [0u8; TRAILER_LEN as usize];
    reader.read_exact_at(file_length - TRAILER_LEN, &mut trailer)?;
    let summary_length = i32::from_be_bytes(trailer);

    debug!("File summary length: {}", summary_length);
    Ok(summary_length)
}

/// Read and decode the section directory preceding the trailer
pub fn parse_sections<R: Read + Seek>(
    reader: &mut ImageReader<R>,
    file_length: u64,
    summary_length: i32,
) -> Result<FileSummaryInfo> {
    let invalid = || FsImageError::InvalidSummaryLength {
        summary_length,
        file_length,
    };

    if summary_length <= 0 {
        return Err(invalid());
    }
    let length = summary_length as u64;
    let start = file_length
        .checked_sub(length + TRAILER_LEN)
        .ok_or_else(invalid)?;

    let bytes = reader.read_at(start, length as usize)?;
    let summary = decode_summary(&bytes).map_err(|e| e.shifted(start))?;

    Ok(summary)
}

/// Decode a summary block: one outer varint followed by the record
pub fn decode_summary(bytes: &[u8]) -> Result<FileSummaryInfo> {
    let (declared, prefix) = decode_varint(bytes)
        .map_err(|fault| FsImageError::MalformedVarint { offset: 0, fault })?;

    let body = &bytes[prefix..];
    if declared != body.len() as u64 {
        warn!(
            "File summary declares {} bytes but {} follow the prefix",
            declared,
            body.len()
        );
    }

    let summary = FileSummary::decode_body(body).map_err(|source| FsImageError::RecordDecode {
        record: FileSummary::NAME,
        offset: prefix as u64,
        source,
    })?;

    let mut sections = SectionTable::new();
    for section in summary.sections {
        debug!(
            "Section {}: offset {}, length {}",
            section.name, section.offset, section.length
        );
        let descriptor = SectionDescriptor {
            name: section.name,
            offset: section.offset,
            length: section.length,
        };
        if let Some(previous) = sections.insert(descriptor) {
            warn!("Section {} listed more than once, keeping the last", previous.name);
        }
    }

    Ok(FileSummaryInfo {
        ondisk_version: summary.ondisk_version,
        layout_version: summary.layout_version,
        codec: summary.codec.filter(|codec| !codec.is_empty()),
        sections,
    })
}

use crate::varint::VarintError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FsImageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed varint at offset {offset}: {fault}")]
    MalformedVarint { offset: u64, fault: VarintError },

    #[error("Truncated record at offset {offset}: declared {declared} bytes, {available} available")]
    TruncatedRecord {
        offset: u64,
        declared: u64,
        available: u64,
    },

    #[error("Section {section} underrun: consumed {consumed} of {length} bytes")]
    SectionUnderrun {
        section: String,
        consumed: u64,
        length: u64,
    },

    #[error("Failed to decode {record} record at offset {offset}: {source}")]
    RecordDecode {
        record: &'static str,
        offset: u64,
        #[source]
        source: prost::DecodeError,
    },

    #[error("Missing section: {0}")]
    MissingSection(String),

    #[error("Invalid file summary length {summary_length} for a {file_length} byte image")]
    InvalidSummaryLength { summary_length: i32, file_length: u64 },

    #[error("Section {name} ({offset}+{length}) extends past end of image ({file_length} bytes)")]
    SectionOutOfBounds {
        name: String,
        offset: u64,
        length: u64,
        file_length: u64,
    },

    #[error("Unsupported section codec: {0}")]
    UnsupportedCodec(String),

    #[error("Unknown inode kind {code} for inode {id}")]
    UnknownInodeKind { id: u64, code: i32 },

    #[error("Cycle detected in namespace at inode {id}")]
    CycleDetected { id: u64 },

    #[error("Inode {id} is listed as a child more than once")]
    DuplicateChild { id: u64 },

    #[error("Namespace deeper than {limit} levels")]
    DepthExceeded { limit: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FsImageError {
    /// Shift a buffer-relative offset by `base`, so it points into the image
    pub(crate) fn shifted(self, base: u64) -> Self {
        match self {
            FsImageError::MalformedVarint { offset, fault } => FsImageError::MalformedVarint {
                offset: base + offset,
                fault,
            },
            FsImageError::TruncatedRecord {
                offset,
                declared,
                available,
            } => FsImageError::TruncatedRecord {
                offset: base + offset,
                declared,
                available,
            },
            FsImageError::RecordDecode {
                record,
                offset,
                source,
            } => FsImageError::RecordDecode {
                record,
                offset: base + offset,
                source,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, FsImageError>;

//! Length-delimited record decoding
//!
//! Every section payload is a stream of `[varint length][record bytes]`
//! pairs. [`decode_delimited_with`] decodes one pair from the front of a
//! slice; [`RecordCursor`] walks a whole section, owning the position so
//! each parser step returns a value instead of mutating shared offsets.

use crate::error::{FsImageError, Result};
use crate::proto::{DirEntry, FileSummary, INode, INodeSection};
use crate::varint::decode_varint;

/// A typed record that can be deserialized from a length-delimited body
pub trait Record: Sized {
    /// Record name used in error messages
    const NAME: &'static str;

    fn decode_body(body: &[u8]) -> std::result::Result<Self, prost::DecodeError>;
}

macro_rules! impl_record {
    ($ty:ty, $name:literal) => {
        impl Record for $ty {
            const NAME: &'static str = $name;

            fn decode_body(body: &[u8]) -> std::result::Result<Self, prost::DecodeError> {
                <$ty as prost::Message>::decode(body)
            }
        }
    };
}

impl_record!(FileSummary, "FileSummary");
impl_record!(INodeSection, "INodeSection");
impl_record!(INode, "INode");
impl_record!(DirEntry, "DirEntry");

/// Decode one length-delimited record from the start of `buf`.
///
/// Returns the record and the total number of bytes consumed (prefix plus
/// body). Offsets in errors are relative to `buf`.
pub fn decode_delimited_with<T, F>(
    buf: &[u8],
    record: &'static str,
    deserialize: F,
) -> Result<(T, usize)>
where
    F: FnOnce(&[u8]) -> std::result::Result<T, prost::DecodeError>,
{
    let (len, prefix) =
        decode_varint(buf).map_err(|fault| FsImageError::MalformedVarint { offset: 0, fault })?;

    let available = (buf.len() - prefix) as u64;
    if len > available {
        return Err(FsImageError::TruncatedRecord {
            offset: 0,
            declared: len,
            available,
        });
    }

    let end = prefix + len as usize;
    let value = deserialize(&buf[prefix..end]).map_err(|source| FsImageError::RecordDecode {
        record,
        offset: 0,
        source,
    })?;

    Ok((value, end))
}

/// Decode one length-delimited [`Record`] from the start of `buf`
pub fn decode_delimited<R: Record>(buf: &[u8]) -> Result<(R, usize)> {
    decode_delimited_with(buf, R::NAME, R::decode_body)
}

/// Cursor over the records of one section buffer
#[derive(Debug)]
pub struct RecordCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> RecordCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        RecordCursor { buf, pos: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to decode
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Decode the next record with a caller-supplied deserializer
    pub fn next_with<T, F>(&mut self, record: &'static str, deserialize: F) -> Result<T>
    where
        F: FnOnce(&[u8]) -> std::result::Result<T, prost::DecodeError>,
    {
        let (value, consumed) = decode_delimited_with(&self.buf[self.pos..], record, deserialize)
            .map_err(|e| e.shifted(self.pos as u64))?;
        self.pos += consumed;
        Ok(value)
    }

    /// Decode the next typed record
    pub fn next_record<R: Record>(&mut self) -> Result<R> {
        self.next_with(R::NAME, R::decode_body)
    }
}

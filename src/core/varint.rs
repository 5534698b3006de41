//! LEB128 unsigned varint decoding

use thiserror::Error;

/// Longest encoding of a 64-bit value
pub const MAX_VARINT_LEN: usize = 10;

/// Why a varint could not be decoded
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    /// Buffer ended before a byte with the continuation bit clear
    #[error("buffer too short")]
    Truncated,

    /// Encoded value does not fit in 64 bits
    #[error("value overflows 64 bits")]
    Overflow,
}

/// Decode an unsigned varint from the start of `buf`.
///
/// Returns the value and the number of bytes it occupied. Never reads past
/// the end of `buf`.
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut value: u64 = 0;
    let mut shift: u32 = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if i == MAX_VARINT_LEN {
            return Err(VarintError::Overflow);
        }

        let payload = (byte & 0x7F) as u64;
        if byte < 0x80 {
            // 10th byte may only carry the top bit of a u64
            if i == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(VarintError::Overflow);
            }
            return Ok((value | payload << shift, i + 1));
        }

        value |= payload << shift;
        shift += 7;
    }

    Err(VarintError::Truncated)
}

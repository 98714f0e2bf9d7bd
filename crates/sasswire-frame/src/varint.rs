use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Maximum encoded width of a base-128 varint carrying a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Append `value` as a protobuf base-128 little-endian varint.
pub fn put_varint(value: u64, dst: &mut BytesMut) {
    let mut v = value;
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            dst.put_u8(byte);
            return;
        }
        dst.put_u8(byte | 0x80);
    }
}

/// Encoded width of `value` as a varint.
pub fn varint_len(value: u64) -> usize {
    ((64 - (value | 1).leading_zeros() as usize) + 6) / 7
}

/// Decode one varint from the front of `buf` without consuming it.
///
/// Returns `Ok(Some((value, width)))` on a complete varint, `Ok(None)` when
/// `buf` ends before the terminating byte (more input may complete it), and
/// `Err(MalformedVarint)` when the encoding runs past ten bytes or the tenth
/// byte carries more than the final `u64` bit.
pub fn peek_varint(buf: &[u8]) -> Result<Option<(u64, usize)>> {
    let mut value: u64 = 0;
    for (i, &byte) in buf.iter().enumerate().take(MAX_VARINT_LEN) {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            if i == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(FrameError::MalformedVarint);
            }
            return Ok(Some((value, i + 1)));
        }
    }
    if buf.len() >= MAX_VARINT_LEN {
        return Err(FrameError::MalformedVarint);
    }
    Ok(None)
}

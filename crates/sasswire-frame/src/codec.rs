use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::varint::{peek_varint, put_varint, varint_len};

/// Default maximum frame size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// A framed protocol message tagged with its compilation id.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The compilation id routing this message to its exchange.
    pub id: u32,
    /// The serialized protocol message.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(id: u32, payload: impl Into<Bytes>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (length prefix + id + payload).
    pub fn wire_size(&self) -> usize {
        let body = varint_len(u64::from(self.id)) + self.payload.len();
        varint_len(body as u64) + body
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────────┬─────────────────┬──────────────────┐
/// │ Length (varint) │ Id (varint)    │ Payload           │
/// │ bytes after it  │ compilation id │ protobuf message  │
/// └────────────────┴─────────────────┴──────────────────┘
/// ```
/// The length counts only the bytes that follow it (id varint + payload)
/// and is recomputed from the inputs on every call.
pub fn encode_frame(id: u32, payload: &[u8], dst: &mut BytesMut) {
    let body = varint_len(u64::from(id)) + payload.len();
    dst.reserve(varint_len(body as u64) + body);
    put_varint(body as u64, dst);
    put_varint(u64::from(id), dst);
    dst.put_slice(payload);
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes exactly the frame's declared bytes from the buffer:
/// the id varint is decoded inside the declared region, and the region's
/// remainder becomes the payload, so a malformed frame can never consume
/// bytes belonging to the frame after it.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Frame>> {
    let (body_len, prefix_len) = match peek_varint(&src[..])? {
        Some(decoded) => decoded,
        None => return Ok(None), // Need more data
    };

    if body_len > max_payload as u64 {
        return Err(FrameError::PayloadTooLarge {
            size: body_len,
            max: max_payload,
        });
    }
    let body_len = body_len as usize;

    // With the cap configured near usize::MAX the region sum itself can
    // overflow; such a frame could never be buffered whole.
    let total_len = match prefix_len.checked_add(body_len) {
        Some(total_len) => total_len,
        None => {
            return Err(FrameError::PayloadTooLarge {
                size: body_len as u64,
                max: max_payload,
            })
        }
    };

    if src.len() < total_len {
        return Ok(None); // Need more data
    }

    src.advance(prefix_len);
    let mut body = src.split_to(body_len).freeze();

    // An unterminated id varint cannot borrow bytes past the region end.
    let (id, id_len) = peek_varint(&body[..])?.ok_or(FrameError::MalformedVarint)?;
    let id = u32::try_from(id).map_err(|_| FrameError::IdOutOfRange(id))?;
    body.advance(id_len);

    Ok(Some(Frame { id, payload: body }))
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum frame size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

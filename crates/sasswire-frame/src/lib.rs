//! Varint-delimited message framing for the embedded compiler wire protocol.
//!
//! Every packet on the wire is framed with:
//! - An unsigned LEB128 varint carrying the byte length of everything after it
//! - An unsigned LEB128 varint carrying the compilation id
//! - The protobuf-encoded message body
//!
//! No partial reads, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod reader;
pub mod varint;
pub mod writer;

pub use codec::{decode_frame, encode_frame, Frame, FrameConfig, DEFAULT_MAX_PAYLOAD};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use varint::{peek_varint, put_varint, varint_len, MAX_VARINT_LEN};
pub use writer::FrameWriter;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A varint ran past its maximum width or encoded an overflowing value.
    #[error("malformed varint")]
    MalformedVarint,

    /// The compilation-id varint decoded to a value outside `u32`.
    #[error("compilation id out of range: {0}")]
    IdOutOfRange(u64),

    /// The declared frame length exceeds the configured maximum.
    #[error("frame too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: u64, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended inside a frame; carries the byte count buffered so far.
    #[error("stream truncated mid-frame ({0} bytes buffered)")]
    Truncated(usize),

    /// The connection was closed between frames.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;

use sasswire_frame::FrameError;
use sasswire_proto as proto;
use sasswire_transport::TransportError;
use sasswire_value::ConversionError;
use thiserror::Error;

/// Error type user callbacks return; anything stringly convertible fits.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong while driving the compiler.
#[derive(Debug, Error)]
pub enum HostError {
    /// Transport-level failure underneath the protocol.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// The wire framing broke. Fatal to the connection.
    #[error("framing error: {0}")]
    Frame(#[from] FrameError),
    /// A frame arrived but its payload was not a valid message.
    #[error("malformed packet: {0}")]
    Decode(#[from] prost::DecodeError),
    /// The far end broke the protocol contract. Fatal to the connection.
    #[error("protocol violation: {0}")]
    Protocol(String),
    /// The far end reported that this host broke the contract. Fatal.
    #[error("remote protocol error: {0}")]
    Remote(RemoteError),
    /// A value crossing the boundary did not fit its target shape.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// The style sheet itself failed to compile.
    #[error("compilation failed: {0}")]
    Compile(CompileFailed),
    /// The connection is gone; no further exchanges are possible.
    #[error("connection closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, HostError>;

/// Complaint the compiler sent about a packet of ours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Our packet could not be decoded at all.
    Parse,
    /// Our packet decoded but its contents were invalid.
    Params,
    /// The compiler failed internally while handling our packet.
    Internal,
    /// A kind this host does not know about.
    Unknown,
}

impl RemoteErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            RemoteErrorKind::Parse => "parse",
            RemoteErrorKind::Params => "params",
            RemoteErrorKind::Internal => "internal",
            RemoteErrorKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl RemoteError {
    pub(crate) fn from_proto(error: proto::ProtocolError) -> Self {
        let kind = match proto::ProtocolErrorKind::try_from(error.kind) {
            Ok(proto::ProtocolErrorKind::Parse) => RemoteErrorKind::Parse,
            Ok(proto::ProtocolErrorKind::Params) => RemoteErrorKind::Params,
            Ok(proto::ProtocolErrorKind::Internal) => RemoteErrorKind::Internal,
            Err(_) => RemoteErrorKind::Unknown,
        };
        Self {
            kind,
            message: error.message,
        }
    }
}

/// A compile that ran and failed, as reported by the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileFailed {
    pub message: String,
    /// Full human-readable rendition, if the compiler produced one.
    pub formatted: String,
    pub span: Option<FailureSpan>,
}

/// Where in the source the failure points. Line and column are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureSpan {
    pub url: String,
    pub line: u32,
    pub column: u32,
    pub text: String,
}

impl std::fmt::Display for CompileFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.span {
            Some(span) if !span.url.is_empty() => {
                write!(f, "{} at {}:{}:{}", self.message, span.url, span.line, span.column)
            }
            _ => f.write_str(&self.message),
        }
    }
}

impl CompileFailed {
    pub(crate) fn from_proto(failure: proto::CompileFailure) -> Self {
        let span = failure.span.map(|span| {
            let start = span.start.unwrap_or_default();
            FailureSpan {
                url: span.url,
                line: start.line,
                column: start.column,
                text: span.text,
            }
        });
        Self {
            message: failure.message,
            formatted: failure.formatted,
            span,
        }
    }
}

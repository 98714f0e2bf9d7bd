//! Hand-maintained message catalogue for the embedded compiler protocol.
//!
//! Every packet body is one of two envelopes: [`InboundMessage`] (host to
//! compiler) or [`OutboundMessage`] (compiler to host), each a single oneof
//! over the concrete message kinds. The compilation id rides in the frame
//! header, not in the messages, so any message can be correlated to the
//! exchange that owns it.
//!
//! Types carry `prost` derives directly; there is no build script and no
//! IDL file to regenerate from.

pub mod callbacks;
pub mod messages;
pub mod value;

pub use callbacks::{
    CallOutcome, CanonicalizeOutcome, CanonicalizeRequest, CanonicalizeResponse,
    FileImportOutcome, FileImportRequest, FileImportResponse, FunctionCallRequest,
    FunctionCallResponse, FunctionIdentifier, ImportOutcome, ImportRequest, ImportResponse,
    ImportSuccess,
};
pub use messages::{
    CompileFailure, CompileInput, CompileOutcome, CompileRequest, CompileResponse,
    CompileSuccess, ImporterKind, ImporterRef, InboundKind, InboundMessage, LogEvent, LogLevel,
    OutboundKind, OutboundMessage, OutputStyle, ProtocolError, ProtocolErrorKind, SourceLocation,
    SourceSpan, StringInput, Syntax, VersionRequest, VersionResponse,
};
pub use value::{
    ArgumentList, CompilerFunction, HostFunction, HslColor, HwbColor, ListSeparator, ListValue,
    MapEntry, MapValue, NumberValue, RgbColor, Singleton, StringValue, Value, ValueKind,
};

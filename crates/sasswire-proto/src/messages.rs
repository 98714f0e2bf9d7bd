use crate::callbacks::{
    CanonicalizeRequest, CanonicalizeResponse, FileImportRequest, FileImportResponse,
    FunctionCallRequest, FunctionCallResponse, ImportRequest, ImportResponse,
};

/// Envelope for every packet the host sends to the compiler.
///
/// Field 1 is reserved on the wire; the kinds occupy fields 2 through 7,
/// matching the numbering compilers are built against.
#[derive(Clone, PartialEq, prost::Message)]
pub struct InboundMessage {
    #[prost(oneof = "InboundKind", tags = "2, 3, 4, 5, 6, 7")]
    pub message: Option<InboundKind>,
}

impl InboundMessage {
    pub fn new(kind: InboundKind) -> Self {
        Self {
            message: Some(kind),
        }
    }
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum InboundKind {
    #[prost(message, tag = "2")]
    CompileRequest(CompileRequest),
    #[prost(message, tag = "3")]
    CanonicalizeResponse(CanonicalizeResponse),
    #[prost(message, tag = "4")]
    ImportResponse(ImportResponse),
    #[prost(message, tag = "5")]
    FileImportResponse(FileImportResponse),
    #[prost(message, tag = "6")]
    FunctionCallResponse(FunctionCallResponse),
    #[prost(message, tag = "7")]
    VersionRequest(VersionRequest),
}

/// Envelope for every packet the compiler sends to the host.
#[derive(Clone, PartialEq, prost::Message)]
pub struct OutboundMessage {
    #[prost(oneof = "OutboundKind", tags = "1, 2, 3, 4, 5, 6, 7, 8")]
    pub message: Option<OutboundKind>,
}

impl OutboundMessage {
    pub fn new(kind: OutboundKind) -> Self {
        Self {
            message: Some(kind),
        }
    }
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum OutboundKind {
    #[prost(message, tag = "1")]
    Error(ProtocolError),
    #[prost(message, tag = "2")]
    CompileResponse(CompileResponse),
    #[prost(message, tag = "3")]
    LogEvent(LogEvent),
    #[prost(message, tag = "4")]
    CanonicalizeRequest(CanonicalizeRequest),
    #[prost(message, tag = "5")]
    ImportRequest(ImportRequest),
    #[prost(message, tag = "6")]
    FileImportRequest(FileImportRequest),
    #[prost(message, tag = "7")]
    FunctionCallRequest(FunctionCallRequest),
    #[prost(message, tag = "8")]
    VersionResponse(VersionResponse),
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CompileRequest {
    #[prost(enumeration = "OutputStyle", tag = "3")]
    pub style: i32,
    #[prost(bool, tag = "4")]
    pub source_map: bool,
    #[prost(message, repeated, tag = "5")]
    pub importers: Vec<ImporterRef>,
    /// Signatures of host functions callable during this compilation,
    /// rendered as `name($arg, $other: default)`.
    #[prost(string, repeated, tag = "6")]
    pub global_functions: Vec<String>,
    #[prost(bool, tag = "7")]
    pub verbose: bool,
    #[prost(bool, tag = "8")]
    pub charset: bool,
    #[prost(oneof = "CompileInput", tags = "1, 2")]
    pub input: Option<CompileInput>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum CompileInput {
    #[prost(message, tag = "1")]
    String(StringInput),
    #[prost(string, tag = "2")]
    Path(String),
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StringInput {
    #[prost(string, tag = "1")]
    pub source: String,
    /// Canonical URL the source pretends to live at. Empty means unknown.
    #[prost(string, tag = "2")]
    pub url: String,
    #[prost(enumeration = "Syntax", tag = "3")]
    pub syntax: i32,
    #[prost(message, optional, tag = "4")]
    pub importer: Option<ImporterRef>,
}

/// Reference to one importer in the compile request's load-path order.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ImporterRef {
    #[prost(oneof = "ImporterKind", tags = "1, 2, 3")]
    pub importer: Option<ImporterKind>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum ImporterKind {
    /// Filesystem load path resolved compiler-side.
    #[prost(string, tag = "1")]
    Path(String),
    /// Host importer answering canonicalize/import requests.
    #[prost(uint32, tag = "2")]
    ImporterId(u32),
    /// Host importer answering file-import requests.
    #[prost(uint32, tag = "3")]
    FileImporterId(u32),
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CompileResponse {
    #[prost(string, repeated, tag = "3")]
    pub loaded_urls: Vec<String>,
    #[prost(oneof = "CompileOutcome", tags = "1, 2")]
    pub result: Option<CompileOutcome>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum CompileOutcome {
    #[prost(message, tag = "1")]
    Success(CompileSuccess),
    #[prost(message, tag = "2")]
    Failure(CompileFailure),
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CompileSuccess {
    #[prost(string, tag = "1")]
    pub css: String,
    #[prost(string, optional, tag = "2")]
    pub source_map: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CompileFailure {
    #[prost(string, tag = "1")]
    pub message: String,
    #[prost(message, optional, tag = "2")]
    pub span: Option<SourceSpan>,
    #[prost(string, tag = "3")]
    pub stack_trace: String,
    /// Human-readable rendition of the failure, colors and all.
    #[prost(string, tag = "4")]
    pub formatted: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SourceSpan {
    #[prost(string, tag = "1")]
    pub text: String,
    #[prost(message, optional, tag = "2")]
    pub start: Option<SourceLocation>,
    #[prost(message, optional, tag = "3")]
    pub end: Option<SourceLocation>,
    #[prost(string, tag = "4")]
    pub url: String,
    #[prost(string, tag = "5")]
    pub context: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SourceLocation {
    #[prost(uint32, tag = "1")]
    pub offset: u32,
    #[prost(uint32, tag = "2")]
    pub line: u32,
    #[prost(uint32, tag = "3")]
    pub column: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LogEvent {
    #[prost(enumeration = "LogLevel", tag = "1")]
    pub level: i32,
    #[prost(string, tag = "2")]
    pub message: String,
    #[prost(message, optional, tag = "3")]
    pub span: Option<SourceSpan>,
    #[prost(string, tag = "4")]
    pub stack_trace: String,
    #[prost(string, tag = "5")]
    pub formatted: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct VersionRequest {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct VersionResponse {
    #[prost(string, tag = "1")]
    pub protocol_version: String,
    #[prost(string, tag = "2")]
    pub compiler_version: String,
    #[prost(string, tag = "3")]
    pub implementation_version: String,
    #[prost(string, tag = "4")]
    pub implementation_name: String,
}

/// Fatal complaint from the compiler about a packet the host sent.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ProtocolError {
    #[prost(enumeration = "ProtocolErrorKind", tag = "1")]
    pub kind: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Syntax {
    Scss = 0,
    Indented = 1,
    Css = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum OutputStyle {
    Expanded = 0,
    Compressed = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum LogLevel {
    Warning = 0,
    Deprecation = 1,
    Debug = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ProtocolErrorKind {
    /// The packet could not be decoded at all.
    Parse = 0,
    /// The packet decoded but its contents were invalid.
    Params = 1,
    /// The compiler failed internally while handling the packet.
    Internal = 2,
}

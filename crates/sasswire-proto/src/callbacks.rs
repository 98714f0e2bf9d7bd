use crate::messages::Syntax;
use crate::value::Value;

/// Compiler asks the host to run a registered function.
#[derive(Clone, PartialEq, prost::Message)]
pub struct FunctionCallRequest {
    #[prost(message, repeated, tag = "3")]
    pub arguments: Vec<Value>,
    #[prost(oneof = "FunctionIdentifier", tags = "1, 2")]
    pub identifier: Option<FunctionIdentifier>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum FunctionIdentifier {
    /// Name exactly as registered, without the parameter list.
    #[prost(string, tag = "1")]
    Name(String),
    /// Id of a first-class host-function value previously sent across.
    #[prost(uint32, tag = "2")]
    FunctionId(u32),
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FunctionCallResponse {
    #[prost(oneof = "CallOutcome", tags = "1, 2")]
    pub result: Option<CallOutcome>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum CallOutcome {
    #[prost(message, tag = "1")]
    Success(Value),
    #[prost(string, tag = "2")]
    Error(String),
}

/// Compiler asks a host importer to resolve a URL to canonical form.
#[derive(Clone, PartialEq, prost::Message)]
pub struct CanonicalizeRequest {
    #[prost(uint32, tag = "1")]
    pub importer_id: u32,
    #[prost(string, tag = "2")]
    pub url: String,
    /// True when resolution came from an `@import` rather than `@use`.
    #[prost(bool, tag = "3")]
    pub from_import: bool,
}

/// An absent result means this importer does not recognize the URL.
#[derive(Clone, PartialEq, prost::Message)]
pub struct CanonicalizeResponse {
    #[prost(oneof = "CanonicalizeOutcome", tags = "1, 2")]
    pub result: Option<CanonicalizeOutcome>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum CanonicalizeOutcome {
    #[prost(string, tag = "1")]
    Url(String),
    #[prost(string, tag = "2")]
    Error(String),
}

/// Compiler asks a host importer for the contents of a canonical URL.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ImportRequest {
    #[prost(uint32, tag = "1")]
    pub importer_id: u32,
    #[prost(string, tag = "2")]
    pub url: String,
}

/// An absent result means the canonical URL has no contents here.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ImportResponse {
    #[prost(oneof = "ImportOutcome", tags = "1, 2")]
    pub result: Option<ImportOutcome>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum ImportOutcome {
    #[prost(message, tag = "1")]
    Success(ImportSuccess),
    #[prost(string, tag = "2")]
    Error(String),
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ImportSuccess {
    #[prost(string, tag = "1")]
    pub contents: String,
    #[prost(enumeration = "Syntax", tag = "2")]
    pub syntax: i32,
    #[prost(string, optional, tag = "3")]
    pub source_map_url: Option<String>,
}

/// Compiler asks a host file importer to map a URL onto the filesystem.
#[derive(Clone, PartialEq, prost::Message)]
pub struct FileImportRequest {
    #[prost(uint32, tag = "1")]
    pub importer_id: u32,
    #[prost(string, tag = "2")]
    pub url: String,
    #[prost(bool, tag = "3")]
    pub from_import: bool,
}

/// An absent result means this importer does not recognize the URL.
#[derive(Clone, PartialEq, prost::Message)]
pub struct FileImportResponse {
    #[prost(oneof = "FileImportOutcome", tags = "1, 2")]
    pub result: Option<FileImportOutcome>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum FileImportOutcome {
    /// Absolute `file:` URL for the compiler to load itself.
    #[prost(string, tag = "1")]
    FileUrl(String),
    #[prost(string, tag = "2")]
    Error(String),
}

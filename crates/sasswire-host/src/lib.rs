//! Protocol engine for driving an embedded style-sheet compiler.
//!
//! [`Compiler`] owns one connection and runs request/response exchanges
//! over it. While an exchange is outstanding the engine serves whatever
//! the compiler asks for in between: host function calls, importer
//! callbacks, and log events. Callbacks receive a [`Session`] that
//! reborrows the engine, so they can start nested compilations on the
//! same connection; exclusive access is the `&mut` borrow itself.
//!
//! ```no_run
//! use std::process::Command;
//!
//! use sasswire_host::{Compiler, CompileOptions};
//!
//! # fn main() -> sasswire_host::Result<()> {
//! let mut compiler = Compiler::spawn(Command::new("my-compiler").arg("--embedded"))?;
//! let result = compiler.compile_string("a { b: 1 + 1 }", &CompileOptions::default())?;
//! assert!(result.css.contains('2'));
//! compiler.close()?;
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod error;
pub mod functions;
pub mod importers;
pub mod logger;
pub mod options;
pub mod registry;
pub mod session;

pub use compiler::{CompileResult, Compiler, VersionInfo};
pub use error::{
    BoxError, CompileFailed, FailureSpan, HostError, RemoteError, RemoteErrorKind, Result,
};
pub use functions::{FunctionSignature, HostFunction, Parameter};
pub use importers::{FileImporter, Importer, ImporterContents};
pub use logger::{LogLevel, LogRecord, LogSink, LogSpan, TracingLogSink};
pub use options::{CompileOptions, ImporterSelection, Style, Syntax};
pub use session::Session;

pub use sasswire_value::Value;

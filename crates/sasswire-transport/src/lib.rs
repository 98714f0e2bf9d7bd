//! Byte transport to an embedded style-sheet compiler.
//!
//! A compiler speaks the wire protocol over whatever duplex byte channel it
//! was started with. This crate provides the two concrete forms and nothing
//! above them:
//!
//! - a spawned child process, framed over its stdin/stdout pipes, with the
//!   host owning the process lifecycle ([`CompilerProcess`]);
//! - a Unix domain socket to an already-running compiler ([`connect`]).
//!
//! Both forms split into a [`TransportReader`] and a [`TransportWriter`] so
//! the framing layer can own each direction independently.

pub mod error;
pub mod process;
pub mod stream;

pub use error::{Result, TransportError};
pub use process::{CompilerProcess, DEFAULT_SHUTDOWN_GRACE};
pub use stream::{TransportReader, TransportWriter};

#[cfg(unix)]
pub use stream::{connect, split_unix};

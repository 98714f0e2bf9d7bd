//! Drive an embedded style-sheet compiler from Rust.
//!
//! sasswire speaks the embedded compiler protocol: varint-framed protobuf
//! packets over a child process's pipes or a Unix socket. This workspace
//! implements the host side of the conversation; the compiler is any
//! binary speaking the other side of the wire.
//!
//! # Crate Structure
//!
//! - [`transport`] — Compiler process plumbing and socket transports
//! - [`frame`] — Varint length-and-id framing over any byte stream
//! - [`proto`] — The wire message catalogue
//! - [`value`] — Style-sheet values and their wire conversions
//! - [`host`] — The protocol engine: compilations, callbacks, sessions
//!
//! # Example
//!
//! ```no_run
//! use std::process::Command;
//!
//! use sasswire::host::{CompileOptions, Compiler};
//!
//! fn main() -> sasswire::host::Result<()> {
//!     let mut compiler = Compiler::spawn(Command::new("my-compiler").arg("--embedded"))?;
//!     println!("talking to {}", compiler.version()?.implementation_name);
//!
//!     let result = compiler.compile_string("a { b: 1 + 1 }", &CompileOptions::default())?;
//!     print!("{}", result.css);
//!     compiler.close()
//! }
//! ```

/// Re-export transport types.
pub mod transport {
    pub use sasswire_transport::*;
}

/// Re-export frame codec types.
pub mod frame {
    pub use sasswire_frame::*;
}

/// Re-export wire message types.
pub mod proto {
    pub use sasswire_proto::*;
}

/// Re-export value types and conversions.
pub mod value {
    pub use sasswire_value::*;
}

/// Re-export the protocol engine.
pub mod host {
    pub use sasswire_host::*;
}

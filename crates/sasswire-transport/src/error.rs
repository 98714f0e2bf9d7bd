use std::path::PathBuf;

/// Errors that can occur while opening or tearing down a compiler transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to spawn the compiler executable.
    #[error("failed to spawn compiler `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The spawned process is missing a stdio pipe it was configured with.
    #[error("compiler process has no {0} pipe")]
    MissingPipe(&'static str),

    /// Failed to connect to the specified socket.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to stop the compiler process.
    #[error("failed to stop compiler process: {0}")]
    Shutdown(std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;

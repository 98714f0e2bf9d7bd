use std::io::{Read, Write};
use std::path::Path;
use std::process::{ChildStdin, ChildStdout};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};

/// Read half of a compiler transport.
///
/// Wraps whichever concrete channel the compiler was attached through:
/// the stdout pipe of a spawned process, or one clone of a Unix domain
/// socket stream.
pub struct TransportReader {
    inner: ReaderInner,
}

enum ReaderInner {
    Pipe(ChildStdout),
    #[cfg(unix)]
    Socket(std::os::unix::net::UnixStream),
}

/// Write half of a compiler transport.
///
/// Dropping a pipe-backed writer closes the child's stdin, which is the
/// end-of-input signal compilers shut down on.
pub struct TransportWriter {
    inner: WriterInner,
}

enum WriterInner {
    Pipe(ChildStdin),
    #[cfg(unix)]
    Socket(std::os::unix::net::UnixStream),
}

impl Read for TransportReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            ReaderInner::Pipe(stdout) => stdout.read(buf),
            #[cfg(unix)]
            ReaderInner::Socket(stream) => stream.read(buf),
        }
    }
}

impl Write for TransportWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            WriterInner::Pipe(stdin) => stdin.write(buf),
            #[cfg(unix)]
            WriterInner::Socket(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            WriterInner::Pipe(stdin) => stdin.flush(),
            #[cfg(unix)]
            WriterInner::Socket(stream) => stream.flush(),
        }
    }
}

impl TransportReader {
    pub(crate) fn from_pipe(stdout: ChildStdout) -> Self {
        Self {
            inner: ReaderInner::Pipe(stdout),
        }
    }

    #[cfg(unix)]
    pub(crate) fn from_socket(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: ReaderInner::Socket(stream),
        }
    }

    /// Set the read timeout on the underlying channel.
    ///
    /// Applies to socket-backed readers only; stdio pipes have no timeout
    /// support and the call is a no-op for them.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        match &self.inner {
            ReaderInner::Pipe(_) => Ok(()),
            #[cfg(unix)]
            ReaderInner::Socket(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
        }
    }
}

impl TransportWriter {
    pub(crate) fn from_pipe(stdin: ChildStdin) -> Self {
        Self {
            inner: WriterInner::Pipe(stdin),
        }
    }

    #[cfg(unix)]
    pub(crate) fn from_socket(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: WriterInner::Socket(stream),
        }
    }

    /// Set the write timeout on the underlying channel.
    ///
    /// Applies to socket-backed writers only; stdio pipes have no timeout
    /// support and the call is a no-op for them.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        match &self.inner {
            WriterInner::Pipe(_) => Ok(()),
            #[cfg(unix)]
            WriterInner::Socket(stream) => stream.set_write_timeout(timeout).map_err(Into::into),
        }
    }
}

/// Connect to a compiler listening on a Unix domain socket (blocking).
#[cfg(unix)]
pub fn connect(path: impl AsRef<Path>) -> Result<(TransportReader, TransportWriter)> {
    let path = path.as_ref();
    let stream =
        std::os::unix::net::UnixStream::connect(path).map_err(|e| TransportError::Connect {
            path: path.to_path_buf(),
            source: e,
        })?;
    debug!(?path, "connected to compiler socket");
    split_unix(stream)
}

/// Split an already-connected Unix stream into transport halves.
///
/// The read half is a `try_clone` of the same descriptor, so both halves
/// observe a shutdown of either side.
#[cfg(unix)]
pub fn split_unix(
    stream: std::os::unix::net::UnixStream,
) -> Result<(TransportReader, TransportWriter)> {
    let read = stream.try_clone()?;
    Ok((
        TransportReader::from_socket(read),
        TransportWriter::from_socket(stream),
    ))
}

impl std::fmt::Debug for TransportReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.inner {
            ReaderInner::Pipe(_) => "pipe",
            #[cfg(unix)]
            ReaderInner::Socket(_) => "socket",
        };
        f.debug_struct("TransportReader")
            .field("type", &kind)
            .finish()
    }
}

impl std::fmt::Debug for TransportWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.inner {
            WriterInner::Pipe(_) => "pipe",
            #[cfg(unix)]
            WriterInner::Socket(_) => "socket",
        };
        f.debug_struct("TransportWriter")
            .field("type", &kind)
            .finish()
    }
}

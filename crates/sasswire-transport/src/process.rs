use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Result, TransportError};
use crate::stream::{TransportReader, TransportWriter};

/// Default time a compiler gets to exit on its own before it is killed.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A spawned compiler process and its duplex stdio channel.
///
/// The process writes protocol frames to stdout and reads them from stdin;
/// stderr stays inherited so compiler diagnostics reach the host's stderr.
/// The host owns the lifecycle: [`CompilerProcess::shutdown`] asks the
/// process to exit and escalates to a kill after a bounded grace period.
pub struct CompilerProcess {
    child: Child,
}

impl CompilerProcess {
    /// Spawn a compiler and return the process handle plus its transport halves.
    pub fn spawn(command: &mut Command) -> Result<(Self, TransportReader, TransportWriter)> {
        let program = command.get_program().to_string_lossy().into_owned();
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| TransportError::Spawn { program, source: e })?;

        let stdin = child
            .stdin
            .take()
            .ok_or(TransportError::MissingPipe("stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or(TransportError::MissingPipe("stdout"))?;

        debug!(pid = child.id(), "spawned compiler process");
        Ok((
            Self { child },
            TransportReader::from_pipe(stdout),
            TransportWriter::from_pipe(stdin),
        ))
    }

    /// OS process id.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Stop the compiler: ask politely, wait out the grace period, then kill.
    ///
    /// Callers should drop the [`TransportWriter`] first so the process sees
    /// end-of-input; most compilers exit on that alone and never reach the
    /// kill path. Always reaps the child, so no zombie is left behind.
    pub fn shutdown(mut self, grace: Duration) -> Result<ExitStatus> {
        if let Some(status) = self.child.try_wait().map_err(TransportError::Shutdown)? {
            debug!(code = ?status.code(), "compiler already exited");
            return Ok(status);
        }

        self.request_exit();

        let deadline = Instant::now() + grace;
        while Instant::now() < deadline {
            if let Some(status) = self.child.try_wait().map_err(TransportError::Shutdown)? {
                debug!(code = ?status.code(), "compiler exited within grace period");
                return Ok(status);
            }
            std::thread::sleep(EXIT_POLL_INTERVAL);
        }

        warn!(pid = self.child.id(), "compiler ignored shutdown; killing");
        if self
            .child
            .try_wait()
            .map_err(TransportError::Shutdown)?
            .is_none()
        {
            self.child.kill().map_err(TransportError::Shutdown)?;
        }
        self.child.wait().map_err(TransportError::Shutdown)
    }

    #[cfg(unix)]
    fn request_exit(&self) {
        debug!(pid = self.child.id(), "sending SIGTERM to compiler");
        // SAFETY: the pid belongs to a child this handle spawned and has not
        // yet reaped, so it cannot have been recycled for another process.
        unsafe {
            libc::kill(self.child.id() as libc::pid_t, libc::SIGTERM);
        }
    }

    #[cfg(not(unix))]
    fn request_exit(&self) {
        // No portable polite-termination signal; the grace period still
        // gives the process time to exit on stdin EOF before the kill.
    }
}

impl Drop for CompilerProcess {
    fn drop(&mut self) {
        if matches!(self.child.try_wait(), Ok(None)) {
            debug!(pid = self.child.id(), "killing leaked compiler process");
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

impl std::fmt::Debug for CompilerProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilerProcess")
            .field("pid", &self.child.id())
            .finish()
    }
}

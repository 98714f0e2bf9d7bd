use sasswire_proto as proto;
use tracing::{debug, warn};

/// Severity of a compiler-emitted diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Warning,
    Deprecation,
    Debug,
}

/// One diagnostic from the compiler, delivered during a compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    /// Full human-readable rendition, if the compiler produced one.
    pub formatted: String,
    pub span: Option<LogSpan>,
}

/// Where the diagnostic points. Line and column are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSpan {
    pub url: String,
    pub line: u32,
    pub column: u32,
}

impl LogRecord {
    pub(crate) fn from_proto(event: proto::LogEvent) -> Self {
        let level = match proto::LogLevel::try_from(event.level) {
            Ok(proto::LogLevel::Warning) => LogLevel::Warning,
            Ok(proto::LogLevel::Deprecation) => LogLevel::Deprecation,
            Ok(proto::LogLevel::Debug) => LogLevel::Debug,
            // An unrecognized severity still deserves to be seen.
            Err(_) => LogLevel::Warning,
        };
        let span = event.span.map(|span| {
            let start = span.start.unwrap_or_default();
            LogSpan {
                url: span.url,
                line: start.line,
                column: start.column,
            }
        });
        Self {
            level,
            message: event.message,
            formatted: event.formatted,
            span,
        }
    }
}

/// Destination for compiler diagnostics.
///
/// Sinks receive every LogEvent on the connection, whatever compilation
/// it belongs to.
pub trait LogSink: Send + Sync {
    fn log(&self, record: &LogRecord);
}

/// Default sink: forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, record: &LogRecord) {
        match (record.level, &record.span) {
            (LogLevel::Debug, _) => debug!("{}", record.message),
            (_, Some(span)) => {
                warn!(url = %span.url, line = span.line, "{}", record.message);
            }
            (_, None) => warn!("{}", record.message),
        }
    }
}

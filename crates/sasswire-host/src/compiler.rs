use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use prost::Message;
use sasswire_frame::{FrameConfig, FrameReader, FrameWriter};
use sasswire_proto as proto;
use sasswire_transport::{
    CompilerProcess, TransportReader, TransportWriter, DEFAULT_SHUTDOWN_GRACE,
};
use sasswire_value::Value;
use tracing::{debug, warn};

use crate::error::{CompileFailed, HostError, RemoteError, Result};
use crate::functions::{FunctionSignature, HostFunction};
use crate::importers::{FileImporter, Importer};
use crate::logger::{LogRecord, LogSink, TracingLogSink};
use crate::options::{CompileOptions, ImporterSelection, Style, Syntax};
use crate::registry::{FunctionRegistry, ImporterEntry, ImporterRegistry};
use crate::session::Session;

/// Correlation id reserved for connection-scope exchanges.
const VERSION_ID: u32 = 0;

/// Protocol engine over one compiler connection.
///
/// Every operation takes `&mut self`: the mutable borrow is the write
/// token, so two call stacks can never interleave packets on the wire.
/// Callbacks that need to write receive a [`Session`] reborrowing the
/// same token.
pub struct Compiler {
    reader: FrameReader<TransportReader>,
    writer: FrameWriter<TransportWriter>,
    process: Option<CompilerProcess>,
    functions: FunctionRegistry,
    importers: ImporterRegistry,
    logger: Arc<dyn LogSink>,
    next_id: u32,
    pending: Vec<Pending>,
    alive: bool,
}

/// One exchange this engine has sent and not yet consumed.
struct Pending {
    id: u32,
    expects: ResponseKind,
    /// Filled by whichever exchange's drain loop reads the terminal
    /// frame; consumed exactly once by the owning call stack.
    done: Option<Result<Resolved>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponseKind {
    Compile,
    Version,
}

enum Resolved {
    Compile(proto::CompileResponse),
    Version(proto::VersionResponse),
}

impl ResponseKind {
    fn matches(self, resolved: &Resolved) -> bool {
        matches!(
            (self, resolved),
            (ResponseKind::Compile, Resolved::Compile(_))
                | (ResponseKind::Version, Resolved::Version(_))
        )
    }
}

/// Output of a successful compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileResult {
    pub css: String,
    pub source_map: Option<String>,
    /// Canonical URLs of everything the compilation loaded.
    pub loaded_urls: Vec<String>,
}

/// What the compiler answered to the version probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub protocol_version: String,
    pub compiler_version: String,
    pub implementation_version: String,
    pub implementation_name: String,
}

impl Compiler {
    /// Start a compiler child process and speak the protocol over its
    /// stdin/stdout pipes.
    pub fn spawn(command: &mut Command) -> Result<Self> {
        let (process, reader, writer) = CompilerProcess::spawn(command)?;
        Self::from_transport(reader, writer, Some(process), FrameConfig::default())
    }

    /// Connect to an already-running compiler over a Unix socket.
    #[cfg(unix)]
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let (reader, writer) = sasswire_transport::connect(path)?;
        Self::from_transport(reader, writer, None, FrameConfig::default())
    }

    /// Speak the protocol over an existing Unix stream.
    #[cfg(unix)]
    pub fn from_unix(stream: std::os::unix::net::UnixStream) -> Result<Self> {
        let (reader, writer) = sasswire_transport::split_unix(stream)?;
        Self::from_transport(reader, writer, None, FrameConfig::default())
    }

    /// Assemble an engine from transport halves.
    pub fn from_transport(
        reader: TransportReader,
        writer: TransportWriter,
        process: Option<CompilerProcess>,
        config: FrameConfig,
    ) -> Result<Self> {
        let reader = FrameReader::with_config_transport(reader, config.clone())?;
        let writer = FrameWriter::with_config_transport(writer, config)?;
        Ok(Self {
            reader,
            writer,
            process,
            functions: FunctionRegistry::default(),
            importers: ImporterRegistry::default(),
            logger: Arc::new(TracingLogSink),
            next_id: 1,
            pending: Vec::new(),
            alive: true,
        })
    }

    /// Register a host function the compiler may call during compilation.
    /// Re-registering a name replaces the previous handler.
    pub fn register_function(
        &mut self,
        signature: FunctionSignature,
        function: impl HostFunction + 'static,
    ) {
        self.functions.register(signature, Arc::new(function));
    }

    /// Register an importer; the returned id goes into
    /// [`ImporterSelection::Importer`].
    pub fn register_importer(&mut self, importer: impl Importer + 'static) -> u32 {
        self.importers.register(Arc::new(importer))
    }

    /// Register a file importer; the returned id goes into
    /// [`ImporterSelection::FileImporter`].
    pub fn register_file_importer(&mut self, importer: impl FileImporter + 'static) -> u32 {
        self.importers.register_file(Arc::new(importer))
    }

    /// Replace the diagnostic sink. The default forwards to `tracing`.
    pub fn set_logger(&mut self, sink: impl LogSink + 'static) {
        self.logger = Arc::new(sink);
    }

    /// Raise or lower the frame size cap on both directions.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.reader.set_max_payload_size(max_payload_size);
        self.writer.set_max_payload_size(max_payload_size);
    }

    /// Whether the connection can still carry exchanges.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Pid of the spawned compiler, when this engine owns one.
    pub fn process_id(&self) -> Option<u32> {
        self.process.as_ref().map(CompilerProcess::id)
    }

    /// Probe the compiler's versions on the reserved connection-scope id.
    pub fn version(&mut self) -> Result<VersionInfo> {
        self.ensure_alive()?;
        let message = proto::InboundMessage::new(proto::InboundKind::VersionRequest(
            proto::VersionRequest {},
        ));
        match self.exchange(VERSION_ID, ResponseKind::Version, &message)? {
            Resolved::Version(response) => Ok(VersionInfo {
                protocol_version: response.protocol_version,
                compiler_version: response.compiler_version,
                implementation_version: response.implementation_version,
                implementation_name: response.implementation_name,
            }),
            Resolved::Compile(_) => Err(HostError::Protocol(
                "version exchange resolved to a compile response".to_owned(),
            )),
        }
    }

    /// Compile a string source.
    pub fn compile_string(
        &mut self,
        source: &str,
        options: &CompileOptions,
    ) -> Result<CompileResult> {
        let mut request = self.base_request(options);
        request.input = Some(proto::CompileInput::String(proto::StringInput {
            source: source.to_owned(),
            url: options.url.clone().unwrap_or_default(),
            syntax: syntax_to_proto(options.syntax) as i32,
            importer: None,
        }));
        self.run_compile(request)
    }

    /// Compile a file the compiler reads itself.
    pub fn compile_file(
        &mut self,
        path: impl AsRef<Path>,
        options: &CompileOptions,
    ) -> Result<CompileResult> {
        let mut request = self.base_request(options);
        request.input = Some(proto::CompileInput::Path(
            path.as_ref().to_string_lossy().into_owned(),
        ));
        self.run_compile(request)
    }

    /// Close the connection: EOF the compiler's stdin by dropping the
    /// writer, then shut a spawned process down within the default grace.
    pub fn close(self) -> Result<()> {
        self.close_with_grace(DEFAULT_SHUTDOWN_GRACE)
    }

    /// Close with an explicit grace period for a spawned process.
    pub fn close_with_grace(self, grace: Duration) -> Result<()> {
        let Compiler {
            reader,
            writer,
            process,
            ..
        } = self;
        drop(writer);
        drop(reader);
        if let Some(process) = process {
            let status = process.shutdown(grace)?;
            debug!(?status, "compiler process exited");
        }
        Ok(())
    }

    fn run_compile(&mut self, request: proto::CompileRequest) -> Result<CompileResult> {
        self.ensure_alive()?;
        let id = self.allocate_id();
        debug!(id, "starting compilation");
        let message = proto::InboundMessage::new(proto::InboundKind::CompileRequest(request));
        match self.exchange(id, ResponseKind::Compile, &message)? {
            Resolved::Compile(response) => self.finish_compile(response),
            Resolved::Version(_) => Err(HostError::Protocol(
                "compile exchange resolved to a version response".to_owned(),
            )),
        }
    }

    fn base_request(&self, options: &CompileOptions) -> proto::CompileRequest {
        proto::CompileRequest {
            style: style_to_proto(options.style) as i32,
            source_map: options.source_map,
            importers: options.importers.iter().map(selection_to_proto).collect(),
            global_functions: self.functions.declarations(),
            verbose: options.verbose,
            charset: options.charset,
            input: None,
        }
    }

    fn finish_compile(&mut self, response: proto::CompileResponse) -> Result<CompileResult> {
        match response.result {
            Some(proto::CompileOutcome::Success(success)) => Ok(CompileResult {
                css: success.css,
                source_map: success.source_map,
                loaded_urls: response.loaded_urls,
            }),
            Some(proto::CompileOutcome::Failure(failure)) => {
                Err(HostError::Compile(CompileFailed::from_proto(failure)))
            }
            None => Err(self.fail_connection(HostError::Protocol(
                "compile response carried no outcome".to_owned(),
            ))),
        }
    }

    /// Run one request/response exchange to resolution, serving whatever
    /// the compiler sends in between.
    fn exchange(
        &mut self,
        id: u32,
        expects: ResponseKind,
        message: &proto::InboundMessage,
    ) -> Result<Resolved> {
        self.pending.push(Pending {
            id,
            expects,
            done: None,
        });
        let outcome = self
            .send_message(id, message)
            .and_then(|()| self.drain(id));
        self.remove_pending(id);
        outcome
    }

    /// Read frames until this exchange resolves.
    ///
    /// A terminal frame for a different pending exchange parks in that
    /// exchange's result slot; its owner finds it on the way out of the
    /// nested call.
    fn drain(&mut self, own_id: u32) -> Result<Resolved> {
        loop {
            if let Some(done) = self.take_done(own_id) {
                return done;
            }
            if !self.alive {
                return Err(HostError::Closed);
            }

            let frame = match self.reader.read_frame() {
                Ok(frame) => frame,
                Err(err) => return Err(self.fail_connection(HostError::Frame(err))),
            };
            let frame_id = frame.id;
            let message = match proto::OutboundMessage::decode(frame.payload) {
                Ok(message) => message,
                Err(err) => return Err(self.fail_connection(HostError::Decode(err))),
            };
            let Some(kind) = message.message else {
                return Err(self.fail_connection(HostError::Protocol(format!(
                    "empty envelope on exchange {frame_id}"
                ))));
            };

            match kind {
                proto::OutboundKind::CompileResponse(response) => {
                    if let Some(resolved) =
                        self.route_terminal(frame_id, own_id, Resolved::Compile(response))?
                    {
                        return Ok(resolved);
                    }
                }
                proto::OutboundKind::VersionResponse(response) => {
                    if let Some(resolved) =
                        self.route_terminal(frame_id, own_id, Resolved::Version(response))?
                    {
                        return Ok(resolved);
                    }
                }
                proto::OutboundKind::Error(error) => {
                    let remote = RemoteError::from_proto(error);
                    return Err(self.fail_connection(HostError::Remote(remote)));
                }
                proto::OutboundKind::LogEvent(event) => self.handle_log(event),
                proto::OutboundKind::FunctionCallRequest(request) => {
                    self.serve_function(frame_id, request)?;
                }
                proto::OutboundKind::CanonicalizeRequest(request) => {
                    self.serve_canonicalize(frame_id, request)?;
                }
                proto::OutboundKind::ImportRequest(request) => {
                    self.serve_import(frame_id, request)?;
                }
                proto::OutboundKind::FileImportRequest(request) => {
                    self.serve_file_import(frame_id, request)?;
                }
            }
        }
    }

    /// Deliver a terminal response to the exchange that owns its id.
    fn route_terminal(
        &mut self,
        frame_id: u32,
        own_id: u32,
        resolved: Resolved,
    ) -> Result<Option<Resolved>> {
        if frame_id == own_id {
            let kind_matches = self
                .pending
                .iter()
                .find(|entry| entry.id == own_id)
                .is_some_and(|entry| entry.expects.matches(&resolved));
            if !kind_matches {
                return Err(self.fail_connection(HostError::Protocol(format!(
                    "exchange {own_id} got a response of the wrong kind"
                ))));
            }
            return Ok(Some(resolved));
        }

        let position = self
            .pending
            .iter()
            .position(|entry| entry.id == frame_id && entry.done.is_none());
        match position {
            Some(index) if self.pending[index].expects.matches(&resolved) => {
                debug!(id = frame_id, "parked terminal for a pending exchange");
                self.pending[index].done = Some(Ok(resolved));
                Ok(None)
            }
            Some(_) => Err(self.fail_connection(HostError::Protocol(format!(
                "exchange {frame_id} got a response of the wrong kind"
            )))),
            None => Err(self.fail_connection(HostError::Protocol(format!(
                "terminal response for unknown exchange {frame_id}"
            )))),
        }
    }

    fn handle_log(&mut self, event: proto::LogEvent) {
        let record = LogRecord::from_proto(event);
        self.logger.log(&record);
    }

    /// Answer a function-call request, running the registered handler
    /// with a session that can reenter this engine.
    fn serve_function(&mut self, id: u32, request: proto::FunctionCallRequest) -> Result<()> {
        let outcome = match request.identifier {
            Some(proto::FunctionIdentifier::Name(name)) => match self.functions.lookup(&name) {
                Some(handler) => {
                    let arguments: Vec<Value> = request
                        .arguments
                        .into_iter()
                        .map(Value::from_proto)
                        .collect();
                    let mut session = Session { engine: self };
                    match handler.invoke(&mut session, &arguments) {
                        Ok(value) => proto::CallOutcome::Success(value.to_proto()),
                        Err(err) => proto::CallOutcome::Error(err.to_string()),
                    }
                }
                None => proto::CallOutcome::Error(format!("no function registered as \"{name}\"")),
            },
            Some(proto::FunctionIdentifier::FunctionId(function_id)) => proto::CallOutcome::Error(
                format!("this host does not pass functions by id (id {function_id})"),
            ),
            None => proto::CallOutcome::Error("function call without an identifier".to_owned()),
        };
        let reply = proto::InboundMessage::new(proto::InboundKind::FunctionCallResponse(
            proto::FunctionCallResponse {
                result: Some(outcome),
            },
        ));
        self.send_message(id, &reply)
    }

    fn serve_canonicalize(&mut self, id: u32, request: proto::CanonicalizeRequest) -> Result<()> {
        let result = match self.importers.entry(request.importer_id) {
            Some(ImporterEntry::Importer(importer)) => {
                match importer.canonicalize(&request.url, request.from_import) {
                    Ok(Some(url)) => Some(proto::CanonicalizeOutcome::Url(url)),
                    Ok(None) => None,
                    Err(err) => Some(proto::CanonicalizeOutcome::Error(err.to_string())),
                }
            }
            Some(ImporterEntry::FileImporter(_)) => Some(proto::CanonicalizeOutcome::Error(
                format!("importer {} does not canonicalize", request.importer_id),
            )),
            None => Some(proto::CanonicalizeOutcome::Error(format!(
                "unknown importer id {}",
                request.importer_id
            ))),
        };
        let reply = proto::InboundMessage::new(proto::InboundKind::CanonicalizeResponse(
            proto::CanonicalizeResponse { result },
        ));
        self.send_message(id, &reply)
    }

    fn serve_import(&mut self, id: u32, request: proto::ImportRequest) -> Result<()> {
        let result = match self.importers.entry(request.importer_id) {
            Some(ImporterEntry::Importer(importer)) => match importer.load(&request.url) {
                Ok(Some(contents)) => Some(proto::ImportOutcome::Success(proto::ImportSuccess {
                    contents: contents.contents,
                    syntax: syntax_to_proto(contents.syntax) as i32,
                    source_map_url: contents.source_map_url,
                })),
                Ok(None) => None,
                Err(err) => Some(proto::ImportOutcome::Error(err.to_string())),
            },
            Some(ImporterEntry::FileImporter(_)) => Some(proto::ImportOutcome::Error(format!(
                "importer {} does not load contents",
                request.importer_id
            ))),
            None => Some(proto::ImportOutcome::Error(format!(
                "unknown importer id {}",
                request.importer_id
            ))),
        };
        let reply = proto::InboundMessage::new(proto::InboundKind::ImportResponse(
            proto::ImportResponse { result },
        ));
        self.send_message(id, &reply)
    }

    fn serve_file_import(&mut self, id: u32, request: proto::FileImportRequest) -> Result<()> {
        let result = match self.importers.entry(request.importer_id) {
            Some(ImporterEntry::FileImporter(importer)) => {
                match importer.find_file_url(&request.url, request.from_import) {
                    Ok(Some(url)) => Some(proto::FileImportOutcome::FileUrl(url)),
                    Ok(None) => None,
                    Err(err) => Some(proto::FileImportOutcome::Error(err.to_string())),
                }
            }
            Some(ImporterEntry::Importer(_)) => Some(proto::FileImportOutcome::Error(format!(
                "importer {} does not resolve file URLs",
                request.importer_id
            ))),
            None => Some(proto::FileImportOutcome::Error(format!(
                "unknown importer id {}",
                request.importer_id
            ))),
        };
        let reply = proto::InboundMessage::new(proto::InboundKind::FileImportResponse(
            proto::FileImportResponse { result },
        ));
        self.send_message(id, &reply)
    }

    fn send_message(&mut self, id: u32, message: &proto::InboundMessage) -> Result<()> {
        if !self.alive {
            return Err(HostError::Closed);
        }
        let payload = message.encode_to_vec();
        if let Err(err) = self.writer.send(id, &payload) {
            return Err(self.fail_connection(HostError::Frame(err)));
        }
        Ok(())
    }

    fn take_done(&mut self, id: u32) -> Option<Result<Resolved>> {
        self.pending
            .iter_mut()
            .find(|entry| entry.id == id)
            .and_then(|entry| entry.done.take())
    }

    fn remove_pending(&mut self, id: u32) {
        self.pending.retain(|entry| entry.id != id);
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.alive {
            Ok(())
        } else {
            Err(HostError::Closed)
        }
    }

    fn allocate_id(&mut self) -> u32 {
        loop {
            let id = self.next_id;
            // 0 stays reserved for connection-scope exchanges, even after wrap.
            self.next_id = self.next_id.checked_add(1).unwrap_or(1);
            if !self.pending.iter().any(|entry| entry.id == id) {
                return id;
            }
        }
    }

    /// Mark the connection dead and fail every unconsumed exchange.
    fn fail_connection(&mut self, err: HostError) -> HostError {
        self.alive = false;
        for entry in &mut self.pending {
            if entry.done.is_none() {
                entry.done = Some(Err(HostError::Closed));
            }
        }
        warn!(error = %err, "connection failed");
        err
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("alive", &self.alive)
            .field("next_id", &self.next_id)
            .field("pending", &self.pending.len())
            .field("functions", &self.functions.len())
            .finish_non_exhaustive()
    }
}

fn selection_to_proto(selection: &ImporterSelection) -> proto::ImporterRef {
    let importer = match selection {
        ImporterSelection::LoadPath(path) => {
            proto::ImporterKind::Path(path.to_string_lossy().into_owned())
        }
        ImporterSelection::Importer(id) => proto::ImporterKind::ImporterId(*id),
        ImporterSelection::FileImporter(id) => proto::ImporterKind::FileImporterId(*id),
    };
    proto::ImporterRef {
        importer: Some(importer),
    }
}

fn syntax_to_proto(syntax: Syntax) -> proto::Syntax {
    match syntax {
        Syntax::Scss => proto::Syntax::Scss,
        Syntax::Indented => proto::Syntax::Indented,
        Syntax::Css => proto::Syntax::Css,
    }
}

fn style_to_proto(style: Style) -> proto::OutputStyle {
    match style {
        Style::Expanded => proto::OutputStyle::Expanded,
        Style::Compressed => proto::OutputStyle::Compressed,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::net::UnixStream;

    use super::*;

    fn engine() -> Compiler {
        let (host_side, _peer_side) = UnixStream::pair().expect("socketpair should open");
        Compiler::from_unix(host_side).expect("engine should assemble")
    }

    #[test]
    fn engine_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Compiler>();
    }

    #[test]
    fn ids_start_at_one_and_skip_zero_on_wrap() {
        let mut engine = engine();
        assert_eq!(engine.allocate_id(), 1);
        assert_eq!(engine.allocate_id(), 2);

        engine.next_id = u32::MAX;
        assert_eq!(engine.allocate_id(), u32::MAX);
        assert_eq!(engine.allocate_id(), 1);
    }

    #[test]
    fn outstanding_ids_are_never_reallocated() {
        let mut engine = engine();
        engine.pending.push(Pending {
            id: 1,
            expects: ResponseKind::Compile,
            done: None,
        });
        engine.next_id = 1;
        assert_eq!(engine.allocate_id(), 2);
    }

    #[test]
    fn dead_engine_fails_fast() {
        let mut engine = engine();
        engine.alive = false;

        let err = engine
            .compile_string("a{}", &CompileOptions::default())
            .unwrap_err();
        assert!(matches!(err, HostError::Closed));

        let err = engine.version().unwrap_err();
        assert!(matches!(err, HostError::Closed));
    }

    #[test]
    fn fail_connection_fills_unconsumed_slots() {
        let mut engine = engine();
        engine.pending.push(Pending {
            id: 7,
            expects: ResponseKind::Compile,
            done: None,
        });

        let err = engine.fail_connection(HostError::Protocol("boom".to_owned()));
        assert!(matches!(err, HostError::Protocol(_)));
        assert!(!engine.is_alive());
        assert!(matches!(engine.take_done(7), Some(Err(HostError::Closed))));
    }

    fn null_function(
        _session: &mut Session<'_>,
        _arguments: &[Value],
    ) -> std::result::Result<Value, crate::error::BoxError> {
        Ok(Value::Null)
    }

    #[test]
    fn base_request_carries_function_declarations() {
        let mut engine = engine();
        engine.register_function(
            FunctionSignature::new("pow")
                .with_parameter("base")
                .with_parameter("exponent"),
            null_function,
        );

        let request = engine.base_request(&CompileOptions::default());
        assert_eq!(request.global_functions, vec!["pow($base, $exponent)"]);
    }

    #[test]
    fn selections_map_onto_wire_importers() {
        let load_path = selection_to_proto(&ImporterSelection::LoadPath("/srv/styles".into()));
        assert_eq!(
            load_path.importer,
            Some(proto::ImporterKind::Path("/srv/styles".to_owned()))
        );

        let by_id = selection_to_proto(&ImporterSelection::Importer(4));
        assert_eq!(by_id.importer, Some(proto::ImporterKind::ImporterId(4)));

        let file_by_id = selection_to_proto(&ImporterSelection::FileImporter(9));
        assert_eq!(
            file_by_id.importer,
            Some(proto::ImporterKind::FileImporterId(9))
        );
    }
}

#![cfg(unix)]

use std::os::unix::net::UnixStream;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use prost::Message;
use sasswire_frame::{FrameError, FrameReader, FrameWriter};
use sasswire_host::{
    BoxError, CompileOptions, Compiler, FileImporter, FunctionSignature, HostError, Importer,
    ImporterContents, ImporterSelection, LogLevel, LogRecord, LogSink, Session, Value,
};
use sasswire_proto as proto;

/// Scripted stand-in for the compiler side of the wire.
struct Peer {
    reader: FrameReader<UnixStream>,
    writer: FrameWriter<UnixStream>,
}

impl Peer {
    fn recv(&mut self) -> (u32, proto::InboundKind) {
        let frame = self.reader.read_frame().expect("peer should read a frame");
        let message =
            proto::InboundMessage::decode(frame.payload).expect("host frames should decode");
        let kind = message.message.expect("host envelopes should be filled");
        (frame.id, kind)
    }

    fn send(&mut self, id: u32, kind: proto::OutboundKind) {
        let payload = proto::OutboundMessage::new(kind).encode_to_vec();
        self.writer
            .send(id, &payload)
            .expect("peer should write a frame");
    }

    fn send_raw(&mut self, id: u32, payload: &[u8]) {
        self.writer
            .send(id, payload)
            .expect("peer should write a raw frame");
    }

    fn recv_compile_request(&mut self) -> (u32, proto::CompileRequest) {
        match self.recv() {
            (id, proto::InboundKind::CompileRequest(request)) => (id, request),
            (id, other) => panic!("expected a compile request on {id}, got {other:?}"),
        }
    }

    fn recv_function_response(&mut self) -> (u32, proto::FunctionCallResponse) {
        match self.recv() {
            (id, proto::InboundKind::FunctionCallResponse(response)) => (id, response),
            (id, other) => panic!("expected a function response on {id}, got {other:?}"),
        }
    }

    fn recv_canonicalize_response(&mut self) -> (u32, proto::CanonicalizeResponse) {
        match self.recv() {
            (id, proto::InboundKind::CanonicalizeResponse(response)) => (id, response),
            (id, other) => panic!("expected a canonicalize response on {id}, got {other:?}"),
        }
    }

    fn recv_import_response(&mut self) -> (u32, proto::ImportResponse) {
        match self.recv() {
            (id, proto::InboundKind::ImportResponse(response)) => (id, response),
            (id, other) => panic!("expected an import response on {id}, got {other:?}"),
        }
    }

    fn recv_file_import_response(&mut self) -> (u32, proto::FileImportResponse) {
        match self.recv() {
            (id, proto::InboundKind::FileImportResponse(response)) => (id, response),
            (id, other) => panic!("expected a file import response on {id}, got {other:?}"),
        }
    }
}

/// Pair an engine with a script playing the compiler. The script runs on
/// its own thread; joining the handle surfaces its assertion failures.
fn fake_compiler<F>(script: F) -> (Compiler, JoinHandle<()>)
where
    F: FnOnce(&mut Peer) + Send + 'static,
{
    let (host_side, peer_side) = UnixStream::pair().expect("socketpair should open");
    let compiler = Compiler::from_unix(host_side).expect("engine should assemble");
    let handle = thread::spawn(move || {
        let read_half = peer_side.try_clone().expect("peer socket should clone");
        let mut peer = Peer {
            reader: FrameReader::new(read_half),
            writer: FrameWriter::new(peer_side),
        };
        script(&mut peer);
    });
    (compiler, handle)
}

fn success(css: &str) -> proto::OutboundKind {
    success_with_urls(css, &[])
}

fn success_with_urls(css: &str, urls: &[&str]) -> proto::OutboundKind {
    proto::OutboundKind::CompileResponse(proto::CompileResponse {
        loaded_urls: urls.iter().map(|url| (*url).to_owned()).collect(),
        result: Some(proto::CompileOutcome::Success(proto::CompileSuccess {
            css: css.to_owned(),
            source_map: None,
        })),
    })
}

fn string_source(request: &proto::CompileRequest) -> &str {
    match &request.input {
        Some(proto::CompileInput::String(input)) => &input.source,
        other => panic!("expected string input, got {other:?}"),
    }
}

#[test]
fn version_exchange_runs_on_the_reserved_id() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, kind) = peer.recv();
        assert_eq!(id, 0, "version probes belong to the reserved id");
        assert!(matches!(kind, proto::InboundKind::VersionRequest(_)));
        peer.send(
            0,
            proto::OutboundKind::VersionResponse(proto::VersionResponse {
                protocol_version: "3.2.0".to_owned(),
                compiler_version: "1.77.8".to_owned(),
                implementation_version: "1.77.8".to_owned(),
                implementation_name: "fake-sass".to_owned(),
            }),
        );
    });

    let version = compiler.version().expect("version exchange should resolve");
    assert_eq!(version.protocol_version, "3.2.0");
    assert_eq!(version.implementation_name, "fake-sass");
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn compiles_a_string_to_css() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, request) = peer.recv_compile_request();
        assert_eq!(id, 1, "compilation ids start at one");
        assert_eq!(string_source(&request), "a { b: 1 + 1 }");
        assert_eq!(request.style, proto::OutputStyle::Expanded as i32);
        assert!(request.charset);
        assert!(!request.source_map);
        assert!(request.global_functions.is_empty());
        peer.send(id, success("a {\n  b: 2;\n}"));
    });

    let result = compiler
        .compile_string("a { b: 1 + 1 }", &CompileOptions::default())
        .expect("compilation should succeed");
    assert!(result.css.contains('2'));
    assert!(result.loaded_urls.is_empty());
    assert!(result.source_map.is_none());
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn compiles_a_file_by_path() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, request) = peer.recv_compile_request();
        match request.input {
            Some(proto::CompileInput::Path(path)) => {
                assert_eq!(path, "/srv/styles/entry.scss");
            }
            other => panic!("expected a path input, got {other:?}"),
        }
        peer.send(
            id,
            success_with_urls("a {\n  b: 2;\n}", &["file:///srv/styles/entry.scss"]),
        );
    });

    let result = compiler
        .compile_file("/srv/styles/entry.scss", &CompileOptions::default())
        .expect("compilation should succeed");
    assert!(result.css.contains('2'));
    assert_eq!(result.loaded_urls, ["file:///srv/styles/entry.scss"]);
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn compile_failure_surfaces_and_the_connection_survives() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, _) = peer.recv_compile_request();
        peer.send(
            id,
            proto::OutboundKind::CompileResponse(proto::CompileResponse {
                loaded_urls: Vec::new(),
                result: Some(proto::CompileOutcome::Failure(proto::CompileFailure {
                    message: "Undefined variable.".to_owned(),
                    span: Some(proto::SourceSpan {
                        text: "$accent".to_owned(),
                        start: Some(proto::SourceLocation {
                            offset: 7,
                            line: 0,
                            column: 7,
                        }),
                        end: None,
                        url: "file:///tmp/in.scss".to_owned(),
                        context: String::new(),
                    }),
                    stack_trace: String::new(),
                    formatted: "Error: Undefined variable.".to_owned(),
                })),
            }),
        );

        let (id, request) = peer.recv_compile_request();
        assert_eq!(id, 2, "each compilation gets a fresh id");
        assert_eq!(string_source(&request), "a { b: c }");
        peer.send(id, success("a {\n  b: c;\n}"));
    });

    let err = compiler
        .compile_string("a { b: $accent }", &CompileOptions::default())
        .expect_err("undefined variable should fail the compilation");
    match err {
        HostError::Compile(failed) => {
            assert_eq!(failed.message, "Undefined variable.");
            let span = failed.span.expect("failure should carry a span");
            assert_eq!(span.url, "file:///tmp/in.scss");
            assert_eq!(span.column, 7);
        }
        other => panic!("expected a compile failure, got {other}"),
    }

    assert!(compiler.is_alive(), "a failed compilation is not fatal");
    let result = compiler
        .compile_string("a { b: c }", &CompileOptions::default())
        .expect("the connection should still compile");
    assert_eq!(result.css, "a {\n  b: c;\n}");
    peer.join().expect("peer script should finish cleanly");
}

fn shout(
    _session: &mut Session<'_>,
    arguments: &[Value],
) -> std::result::Result<Value, BoxError> {
    match arguments {
        [Value::String { text, .. }] => Ok(Value::quoted(text.to_uppercase())),
        _ => Err("shout() wants exactly one string".into()),
    }
}

#[test]
fn function_callbacks_round_trip() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, request) = peer.recv_compile_request();
        assert_eq!(request.global_functions, vec!["shout($text)".to_owned()]);

        peer.send(
            id,
            proto::OutboundKind::FunctionCallRequest(proto::FunctionCallRequest {
                arguments: vec![Value::quoted("hi").to_proto()],
                identifier: Some(proto::FunctionIdentifier::Name("shout".to_owned())),
            }),
        );

        let (response_id, response) = peer.recv_function_response();
        assert_eq!(response_id, id, "replies reuse the requesting id");
        match response.result {
            Some(proto::CallOutcome::Success(value)) => match value.kind {
                Some(proto::ValueKind::String(string)) => {
                    assert_eq!(string.text, "HI");
                    assert!(string.quoted);
                }
                other => panic!("expected a string result, got {other:?}"),
            },
            other => panic!("expected a success outcome, got {other:?}"),
        }

        peer.send(id, success("a {\n  b: \"HI\";\n}"));
    });

    compiler.register_function(FunctionSignature::new("shout").with_parameter("text"), shout);
    let result = compiler
        .compile_string("a { b: shout(\"hi\") }", &CompileOptions::default())
        .expect("compilation with a callback should succeed");
    assert!(result.css.contains("HI"));
    peer.join().expect("peer script should finish cleanly");
}

fn compile_nested(
    session: &mut Session<'_>,
    _arguments: &[Value],
) -> std::result::Result<Value, BoxError> {
    let nested = session.compile_string("n { o: k }", &CompileOptions::default())?;
    Ok(Value::quoted(nested.css))
}

#[test]
fn reentrant_callback_completes_the_nested_exchange_first() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (outer_id, _) = peer.recv_compile_request();
        peer.send(
            outer_id,
            proto::OutboundKind::FunctionCallRequest(proto::FunctionCallRequest {
                arguments: Vec::new(),
                identifier: Some(proto::FunctionIdentifier::Name("nested".to_owned())),
            }),
        );

        let (nested_id, request) = peer.recv_compile_request();
        assert_ne!(nested_id, outer_id, "nested compilations get fresh ids");
        assert_eq!(string_source(&request), "n { o: k }");
        peer.send(nested_id, success("n {\n  o: k;\n}"));

        let (response_id, response) = peer.recv_function_response();
        assert_eq!(response_id, outer_id);
        match response.result {
            Some(proto::CallOutcome::Success(value)) => match value.kind {
                Some(proto::ValueKind::String(string)) => {
                    assert_eq!(string.text, "n {\n  o: k;\n}");
                }
                other => panic!("expected the nested css, got {other:?}"),
            },
            other => panic!("expected a success outcome, got {other:?}"),
        }

        peer.send(outer_id, success("outer {\n  done: yes;\n}"));
    });

    compiler.register_function(FunctionSignature::new("nested"), compile_nested);
    let result = compiler
        .compile_string("outer { done: nested() }", &CompileOptions::default())
        .expect("the outer compilation should resolve after the nested one");
    assert_eq!(result.css, "outer {\n  done: yes;\n}");
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn outer_terminal_parks_while_the_nested_exchange_drains() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (outer_id, _) = peer.recv_compile_request();
        peer.send(
            outer_id,
            proto::OutboundKind::FunctionCallRequest(proto::FunctionCallRequest {
                arguments: Vec::new(),
                identifier: Some(proto::FunctionIdentifier::Name("nested".to_owned())),
            }),
        );

        let (nested_id, _) = peer.recv_compile_request();
        // Outer answer first: the nested drain loop must park it for the
        // outer call stack instead of misdelivering it.
        peer.send(outer_id, success("outer {\n  parked: yes;\n}"));
        peer.send(nested_id, success("n {\n  o: k;\n}"));

        let (response_id, _) = peer.recv_function_response();
        assert_eq!(response_id, outer_id);
    });

    compiler.register_function(FunctionSignature::new("nested"), compile_nested);
    let result = compiler
        .compile_string("outer { parked: nested() }", &CompileOptions::default())
        .expect("the parked outer response should resolve the outer exchange");
    assert_eq!(result.css, "outer {\n  parked: yes;\n}");
    peer.join().expect("peer script should finish cleanly");
}

fn fail_loudly(
    _session: &mut Session<'_>,
    _arguments: &[Value],
) -> std::result::Result<Value, BoxError> {
    Err("the dice came up wrong".into())
}

#[test]
fn callback_errors_become_error_replies_not_crashes() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, _) = peer.recv_compile_request();
        peer.send(
            id,
            proto::OutboundKind::FunctionCallRequest(proto::FunctionCallRequest {
                arguments: Vec::new(),
                identifier: Some(proto::FunctionIdentifier::Name("roll".to_owned())),
            }),
        );

        let (_, response) = peer.recv_function_response();
        match response.result {
            Some(proto::CallOutcome::Error(message)) => {
                assert!(message.contains("the dice came up wrong"));
            }
            other => panic!("expected an error outcome, got {other:?}"),
        }

        peer.send(id, success("a {\n  b: fallback;\n}"));
    });

    compiler.register_function(FunctionSignature::new("roll"), fail_loudly);
    let result = compiler
        .compile_string("a { b: roll() }", &CompileOptions::default())
        .expect("a failing callback poisons the call, not the connection");
    assert!(result.css.contains("fallback"));
    assert!(compiler.is_alive());
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn unknown_function_names_are_reported_to_the_compiler() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, _) = peer.recv_compile_request();
        peer.send(
            id,
            proto::OutboundKind::FunctionCallRequest(proto::FunctionCallRequest {
                arguments: Vec::new(),
                identifier: Some(proto::FunctionIdentifier::Name("missing".to_owned())),
            }),
        );

        let (_, response) = peer.recv_function_response();
        match response.result {
            Some(proto::CallOutcome::Error(message)) => assert!(message.contains("missing")),
            other => panic!("expected an error outcome, got {other:?}"),
        }

        peer.send(id, success("a {\n  b: c;\n}"));
    });

    compiler
        .compile_string("a { b: missing() }", &CompileOptions::default())
        .expect("an unresolved function name is the compiler's problem");
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn function_ids_are_refused_with_an_error_reply() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, _) = peer.recv_compile_request();
        peer.send(
            id,
            proto::OutboundKind::FunctionCallRequest(proto::FunctionCallRequest {
                arguments: Vec::new(),
                identifier: Some(proto::FunctionIdentifier::FunctionId(3)),
            }),
        );

        let (_, response) = peer.recv_function_response();
        assert!(matches!(
            response.result,
            Some(proto::CallOutcome::Error(_))
        ));

        peer.send(id, success("a {\n  b: c;\n}"));
    });

    compiler
        .compile_string("a { b: c }", &CompileOptions::default())
        .expect("an id-based call is refused without killing the exchange");
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn terminal_for_an_unknown_id_is_a_protocol_violation() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (_, _) = peer.recv_compile_request();
        peer.send(99, success("who {\n  asked: nobody;\n}"));
    });

    let err = compiler
        .compile_string("a { b: c }", &CompileOptions::default())
        .expect_err("a terminal for an id nobody owns must fail the connection");
    match &err {
        HostError::Protocol(message) => assert!(message.contains("99")),
        other => panic!("expected a protocol violation, got {other}"),
    }
    assert!(!compiler.is_alive());

    let err = compiler
        .compile_string("a { b: c }", &CompileOptions::default())
        .expect_err("a failed connection accepts no further work");
    assert!(matches!(err, HostError::Closed));
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn terminal_of_the_wrong_kind_is_a_protocol_violation() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, _) = peer.recv_compile_request();
        peer.send(
            id,
            proto::OutboundKind::VersionResponse(proto::VersionResponse {
                protocol_version: "3.2.0".to_owned(),
                compiler_version: String::new(),
                implementation_version: String::new(),
                implementation_name: String::new(),
            }),
        );
    });

    let err = compiler
        .compile_string("a { b: c }", &CompileOptions::default())
        .expect_err("a version answer cannot resolve a compilation");
    assert!(matches!(err, HostError::Protocol(_)));
    assert!(!compiler.is_alive());
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn remote_protocol_errors_poison_the_connection() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, _) = peer.recv_compile_request();
        peer.send(
            id,
            proto::OutboundKind::Error(proto::ProtocolError {
                kind: proto::ProtocolErrorKind::Params as i32,
                message: "unknown importer id 7".to_owned(),
            }),
        );
    });

    let err = compiler
        .compile_string("a { b: c }", &CompileOptions::default())
        .expect_err("a remote complaint is fatal");
    match &err {
        HostError::Remote(remote) => {
            assert_eq!(remote.message, "unknown importer id 7");
        }
        other => panic!("expected a remote error, got {other}"),
    }
    assert!(!compiler.is_alive());
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn an_empty_envelope_is_a_protocol_violation() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, _) = peer.recv_compile_request();
        let empty = proto::OutboundMessage { message: None }.encode_to_vec();
        peer.send_raw(id, &empty);
    });

    let err = compiler
        .compile_string("a { b: c }", &CompileOptions::default())
        .expect_err("an envelope with no message must fail the connection");
    assert!(matches!(err, HostError::Protocol(_)));
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn peer_disconnect_mid_exchange_is_a_frame_error() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (_, _) = peer.recv_compile_request();
        // Dropping both halves on return closes the connection.
    });

    let err = compiler
        .compile_string("a { b: c }", &CompileOptions::default())
        .expect_err("a vanished peer cannot resolve the exchange");
    assert!(matches!(
        err,
        HostError::Frame(FrameError::ConnectionClosed)
    ));
    assert!(!compiler.is_alive());
    peer.join().expect("peer script should finish cleanly");
}

#[derive(Clone, Default)]
struct RecordingSink(Arc<Mutex<Vec<LogRecord>>>);

impl LogSink for RecordingSink {
    fn log(&self, record: &LogRecord) {
        self.0
            .lock()
            .expect("sink lock should be clean")
            .push(record.clone());
    }
}

#[test]
fn log_events_reach_the_sink_without_touching_the_exchange() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, _) = peer.recv_compile_request();
        peer.send(
            id,
            proto::OutboundKind::LogEvent(proto::LogEvent {
                level: proto::LogLevel::Warning as i32,
                message: "careful with that axe".to_owned(),
                span: None,
                stack_trace: String::new(),
                formatted: "WARNING: careful with that axe".to_owned(),
            }),
        );
        peer.send(id, success("a {\n  b: c;\n}"));
    });

    let sink = RecordingSink::default();
    compiler.set_logger(sink.clone());
    compiler
        .compile_string("a { b: c }", &CompileOptions::default())
        .expect("log events should not disturb the compilation");

    let records = sink.0.lock().expect("sink lock should be clean");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, LogLevel::Warning);
    assert_eq!(records[0].message, "careful with that axe");
    peer.join().expect("peer script should finish cleanly");
}

struct ThemeImporter;

impl Importer for ThemeImporter {
    fn canonicalize(
        &self,
        url: &str,
        _from_import: bool,
    ) -> std::result::Result<Option<String>, BoxError> {
        if url == "theme" {
            Ok(Some("fake:theme".to_owned()))
        } else {
            Ok(None)
        }
    }

    fn load(
        &self,
        canonical_url: &str,
    ) -> std::result::Result<Option<ImporterContents>, BoxError> {
        assert_eq!(canonical_url, "fake:theme");
        Ok(Some(ImporterContents::scss("a { b: c }")))
    }
}

#[test]
fn importer_canonicalize_and_load_round_trip() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, request) = peer.recv_compile_request();
        assert_eq!(request.importers.len(), 1);
        assert_eq!(
            request.importers[0].importer,
            Some(proto::ImporterKind::ImporterId(0))
        );

        peer.send(
            id,
            proto::OutboundKind::CanonicalizeRequest(proto::CanonicalizeRequest {
                importer_id: 0,
                url: "theme".to_owned(),
                from_import: false,
            }),
        );
        let (_, response) = peer.recv_canonicalize_response();
        assert_eq!(
            response.result,
            Some(proto::CanonicalizeOutcome::Url("fake:theme".to_owned()))
        );

        peer.send(
            id,
            proto::OutboundKind::ImportRequest(proto::ImportRequest {
                importer_id: 0,
                url: "fake:theme".to_owned(),
            }),
        );
        let (_, response) = peer.recv_import_response();
        match response.result {
            Some(proto::ImportOutcome::Success(loaded)) => {
                assert_eq!(loaded.contents, "a { b: c }");
                assert_eq!(loaded.syntax, proto::Syntax::Scss as i32);
                assert!(loaded.source_map_url.is_none());
            }
            other => panic!("expected loaded contents, got {other:?}"),
        }

        peer.send(id, success_with_urls("a {\n  b: c;\n}", &["fake:theme"]));
    });

    let importer_id = compiler.register_importer(ThemeImporter);
    let options =
        CompileOptions::default().with_importer(ImporterSelection::Importer(importer_id));
    let result = compiler
        .compile_string("@use \"theme\";", &options)
        .expect("an importer-backed compilation should succeed");
    assert_eq!(result.loaded_urls, vec!["fake:theme".to_owned()]);
    peer.join().expect("peer script should finish cleanly");
}

struct DeclinesEverything;

impl Importer for DeclinesEverything {
    fn canonicalize(
        &self,
        _url: &str,
        _from_import: bool,
    ) -> std::result::Result<Option<String>, BoxError> {
        Ok(None)
    }

    fn load(
        &self,
        _canonical_url: &str,
    ) -> std::result::Result<Option<ImporterContents>, BoxError> {
        Ok(None)
    }
}

#[test]
fn a_declined_canonicalization_is_an_absent_result() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, _) = peer.recv_compile_request();
        peer.send(
            id,
            proto::OutboundKind::CanonicalizeRequest(proto::CanonicalizeRequest {
                importer_id: 0,
                url: "elsewhere".to_owned(),
                from_import: true,
            }),
        );
        let (_, response) = peer.recv_canonicalize_response();
        assert!(response.result.is_none(), "a pass is not an error");

        peer.send(id, success("a {\n  b: c;\n}"));
    });

    compiler.register_importer(DeclinesEverything);
    compiler
        .compile_string("@use \"elsewhere\";", &CompileOptions::default())
        .expect("a declined URL leaves resolution to the compiler");
    peer.join().expect("peer script should finish cleanly");
}

struct BrokenImporter;

impl Importer for BrokenImporter {
    fn canonicalize(
        &self,
        _url: &str,
        _from_import: bool,
    ) -> std::result::Result<Option<String>, BoxError> {
        Err("no network today".into())
    }

    fn load(
        &self,
        _canonical_url: &str,
    ) -> std::result::Result<Option<ImporterContents>, BoxError> {
        Err("no network today".into())
    }
}

#[test]
fn importer_errors_travel_as_error_outcomes() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, _) = peer.recv_compile_request();
        peer.send(
            id,
            proto::OutboundKind::CanonicalizeRequest(proto::CanonicalizeRequest {
                importer_id: 0,
                url: "theme".to_owned(),
                from_import: false,
            }),
        );
        let (_, response) = peer.recv_canonicalize_response();
        match response.result {
            Some(proto::CanonicalizeOutcome::Error(message)) => {
                assert!(message.contains("no network today"));
            }
            other => panic!("expected an error outcome, got {other:?}"),
        }

        peer.send(id, success("a {\n  b: c;\n}"));
    });

    compiler.register_importer(BrokenImporter);
    compiler
        .compile_string("@use \"theme\";", &CompileOptions::default())
        .expect("an importer error fails the import, not the connection");
    assert!(compiler.is_alive());
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn unknown_importer_ids_are_reported_not_fatal() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, _) = peer.recv_compile_request();
        peer.send(
            id,
            proto::OutboundKind::CanonicalizeRequest(proto::CanonicalizeRequest {
                importer_id: 42,
                url: "theme".to_owned(),
                from_import: false,
            }),
        );
        let (_, response) = peer.recv_canonicalize_response();
        match response.result {
            Some(proto::CanonicalizeOutcome::Error(message)) => assert!(message.contains("42")),
            other => panic!("expected an error outcome, got {other:?}"),
        }

        peer.send(id, success("a {\n  b: c;\n}"));
    });

    compiler
        .compile_string("a { b: c }", &CompileOptions::default())
        .expect("a bogus importer id is the compiler's mistake to hear about");
    peer.join().expect("peer script should finish cleanly");
}

struct OnDisk;

impl FileImporter for OnDisk {
    fn find_file_url(
        &self,
        url: &str,
        _from_import: bool,
    ) -> std::result::Result<Option<String>, BoxError> {
        Ok(Some(format!("file:///srv/styles/{url}.scss")))
    }
}

#[test]
fn file_importers_resolve_to_file_urls() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, request) = peer.recv_compile_request();
        assert_eq!(
            request.importers[0].importer,
            Some(proto::ImporterKind::FileImporterId(0))
        );

        peer.send(
            id,
            proto::OutboundKind::FileImportRequest(proto::FileImportRequest {
                importer_id: 0,
                url: "buttons".to_owned(),
                from_import: false,
            }),
        );
        let (_, response) = peer.recv_file_import_response();
        assert_eq!(
            response.result,
            Some(proto::FileImportOutcome::FileUrl(
                "file:///srv/styles/buttons.scss".to_owned()
            ))
        );

        peer.send(id, success("a {\n  b: c;\n}"));
    });

    let importer_id = compiler.register_file_importer(OnDisk);
    let options =
        CompileOptions::default().with_importer(ImporterSelection::FileImporter(importer_id));
    compiler
        .compile_string("@use \"buttons\";", &options)
        .expect("a file importer should resolve the URL");
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn the_wrong_importer_kind_is_reported_not_fatal() {
    let (mut compiler, peer) = fake_compiler(|peer| {
        let (id, _) = peer.recv_compile_request();
        peer.send(
            id,
            proto::OutboundKind::FileImportRequest(proto::FileImportRequest {
                importer_id: 0,
                url: "theme".to_owned(),
                from_import: false,
            }),
        );
        let (_, response) = peer.recv_file_import_response();
        assert!(matches!(
            response.result,
            Some(proto::FileImportOutcome::Error(_))
        ));

        peer.send(id, success("a {\n  b: c;\n}"));
    });

    compiler.register_importer(ThemeImporter);
    compiler
        .compile_string("a { b: c }", &CompileOptions::default())
        .expect("a kind mismatch is the compiler's mistake to hear about");
    assert!(compiler.is_alive());
    peer.join().expect("peer script should finish cleanly");
}

#[test]
fn a_spawned_compiler_closes_cleanly() {
    let compiler =
        Compiler::spawn(&mut Command::new("/bin/cat")).expect("cat should stand in as a compiler");
    assert!(compiler.is_alive());
    let pid = compiler.process_id().expect("a spawned engine owns a process");

    // EOF on stdin ends cat; close waits for the exit and reaps it.
    compiler.close().expect("close should reap the child");

    // SAFETY: querying signal delivery permission only; no signal is sent.
    let alive = unsafe { libc::kill(pid as libc::pid_t, 0) };
    assert_eq!(alive, -1, "child should be gone after close");
}

#[test]
fn close_with_grace_stops_a_lingering_child() {
    let compiler = Compiler::spawn(Command::new("/bin/sleep").arg("30"))
        .expect("sleep should stand in as a compiler");
    let pid = compiler.process_id().expect("a spawned engine owns a process");

    compiler
        .close_with_grace(Duration::from_secs(5))
        .expect("a child ignoring EOF should still be stopped");

    // SAFETY: querying signal delivery permission only; no signal is sent.
    let alive = unsafe { libc::kill(pid as libc::pid_t, 0) };
    assert_eq!(alive, -1, "child should be gone after close");
}

//! Integration tests for the logger
//!
//! These tests verify:
//! - Sink registry resolution and duplicate/unknown schemes
//! - Pretty console rendering end to end
//! - Per-level counters, including filtered calls
//! - Error helpers and panic/fatal escalation
//! - File output and sync
//! - Thread safety

use node_logger::prelude::*;
use node_logger::{named_fn, LogEntry, TRACE_ID_KEY};
use std::fs;
use std::io;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn isolated(config: LoggerConfig, registry: &SinkRegistry) -> (Logger, MemorySink) {
    let out = MemorySink::new();
    let logger = Logger::builder(
        config
            .with_output_paths(Vec::<String>::new())
            .with_error_output_paths(Vec::<String>::new()),
    )
    .registry(registry)
    .counters(Arc::new(CounterBank::new()))
    .destination(out.clone())
    .build()
    .expect("Failed to build logger");
    (logger, out)
}

fn json_lines(out: &MemorySink) -> Vec<serde_json::Value> {
    out.contents_string()
        .lines()
        .map(|line| serde_json::from_str(line).expect("record is not JSON"))
        .collect()
}

/// Drop ANSI color sequences so assertions see the plain text.
fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[test]
fn test_pretty_console_end_to_end() {
    let screen = MemorySink::new();
    let registry = SinkRegistry::new();
    let target = screen.clone();
    registry
        .register(
            "pretty",
            node_logger::sinks::pretty_console_sink(move || target.clone()),
        )
        .expect("Failed to register pretty sink");

    let logger = Logger::builder(
        LoggerConfig::production()
            .with_output_paths(["pretty://console"])
            .with_error_output_paths(Vec::<String>::new()),
    )
    .registry(&registry)
    .counters(Arc::new(CounterBank::new()))
    .build()
    .expect("Failed to build logger");

    logger.infow("started", [("port", 8080)]);

    let text = strip_ansi(&screen.contents_string());
    assert!(text.contains("started"), "{text}");
    assert!(text.contains("port=8080"), "{text}");
    assert!(!text.contains('{'), "raw JSON leaked: {text}");
}

#[test]
fn test_pretty_format_config_without_colors() {
    let screen = MemorySink::new();
    let registry = SinkRegistry::new();
    let target = screen.clone();
    registry
        .register(
            "pretty",
            move |_uri: &SinkUri| -> node_logger::Result<Arc<dyn Destination>> {
                let console = PrettyConsole::new(target.clone()).with_colors(false);
                Ok(Arc::new(console) as Arc<dyn Destination>)
            },
        )
        .expect("Failed to register pretty sink");

    let logger = Logger::builder(
        LoggerConfig::development()
            .with_output_paths(["stderr"])
            .with_error_output_paths(Vec::<String>::new()),
    )
    .registry(&registry)
    .counters(Arc::new(CounterBank::new()))
    .build()
    .expect("Failed to build logger");

    logger.debugw("peer dialed", [("addr", "10.0.0.7:4000")]);

    let text = screen.contents_string();
    assert!(text.contains("[DEBUG]"), "{text}");
    assert!(text.contains("addr=10.0.0.7:4000"), "{text}");
}

#[test]
fn test_duplicate_and_unknown_schemes() {
    let registry = SinkRegistry::new();
    registry
        .register("mem", |_uri: &SinkUri| -> node_logger::Result<Arc<dyn Destination>> {
            Ok(Arc::new(MemorySink::new()) as Arc<dyn Destination>)
        })
        .expect("first registration");

    let err = registry
        .register("MEM", |_uri: &SinkUri| -> node_logger::Result<Arc<dyn Destination>> {
            Ok(Arc::new(MemorySink::new()) as Arc<dyn Destination>)
        })
        .unwrap_err();
    assert!(matches!(err, LoggerError::DuplicateSink { .. }), "{err}");

    let err = Logger::builder(LoggerConfig::production().with_output_paths(["kafka://logs"]))
        .registry(&registry)
        .build()
        .unwrap_err();
    assert!(
        matches!(err, LoggerError::UnknownSink { ref scheme, .. } if scheme == "kafka"),
        "{err}"
    );
}

#[test]
fn test_filtered_debug_counts_but_writes_nothing() {
    let (logger, out) = isolated(LoggerConfig::production(), &SinkRegistry::empty());

    logger.debug("x");

    assert!(out.is_empty());
    assert_eq!(logger.counters().get(LogLevel::Debug), 1);
}

#[test]
fn test_counters_shared_by_derived_loggers() {
    let (logger, _out) = isolated(LoggerConfig::production(), &SinkRegistry::empty());
    let child = logger.with([("component", "sync")]);

    logger.warn("a");
    child.warn("b");

    assert_eq!(logger.counters().get(LogLevel::Warn), 2);
    assert!(Arc::ptr_eq(logger.counters(), child.counters()));
}

#[test]
fn test_error_helpers() {
    let (logger, out) = isolated(LoggerConfig::production(), &SinkRegistry::empty());

    assert_eq!(logger.warn_if(Ok::<_, io::Error>("fine")), Some("fine"));
    assert!(out.is_empty());

    let parsed = logger.error_if("12x".parse::<u32>(), Some("parsing height"));
    assert_eq!(parsed, None);

    let recs = json_lines(&out);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["level"], "error");
    assert!(recs[0]["msg"]
        .as_str()
        .unwrap()
        .starts_with("parsing height: invalid digit"));
}

fn flush_peers() -> std::result::Result<(), io::Error> {
    Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer hung up"))
}

#[test]
fn test_error_if_calling_attributes_failure() {
    let (logger, out) = isolated(LoggerConfig::production(), &SinkRegistry::empty());

    logger.error_if_calling(named_fn!(flush_peers), None);

    let recs = json_lines(&out);
    assert_eq!(recs[0]["msg"], "flush_peers: peer hung up");
}

#[test]
fn test_with_span_adds_trace_id() {
    let (logger, out) = isolated(LoggerConfig::production(), &SinkRegistry::empty());
    let span = SpanContext::new("4bf92f3577b34da6a3ce929d0e0e4736", "00f067aa0ba902b7");

    let traced = logger.with_span(Some(&span));
    traced.info("handled request");
    logger.info("background");

    let recs = json_lines(&out);
    assert_eq!(recs[0][TRACE_ID_KEY], "4bf92f3577b34da6a3ce929d0e0e4736");
    assert!(recs[1].get(TRACE_ID_KEY).is_none());
}

#[test]
fn test_panic_is_logged_before_unwinding() {
    let (logger, out) = isolated(LoggerConfig::production(), &SinkRegistry::empty());

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        logger.panic("state machine wedged");
    }));

    assert!(result.is_err());
    let recs = json_lines(&out);
    assert_eq!(recs[0]["level"], "panic");
    assert_eq!(recs[0]["msg"], "state machine wedged");
    assert_eq!(logger.counters().get(LogLevel::Panic), 1);
}

#[test]
fn test_fatal_escalates_even_when_filtered() {
    let out = MemorySink::new();
    let code = Arc::new(AtomicI32::new(-1));
    let seen = Arc::clone(&code);
    let logger = Logger::builder(
        LoggerConfig::production()
            .with_level(LogLevel::Fatal)
            .with_output_paths(Vec::<String>::new())
            .with_error_output_paths(Vec::<String>::new()),
    )
    .registry(&SinkRegistry::empty())
    .counters(Arc::new(CounterBank::new()))
    .destination(out.clone())
    .fatal_hook(Arc::new(move |c| seen.store(c, Ordering::SeqCst)))
    .build()
    .expect("Failed to build logger");

    logger.error("filtered");
    logger.fatal("database unreachable");

    assert_eq!(code.load(Ordering::SeqCst), 1);
    let recs = json_lines(&out);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["level"], "fatal");
}

#[test]
fn test_file_destination() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::builder(
        LoggerConfig::for_node(temp_dir.path(), true, LogLevel::Debug, true)
            .with_output_paths([node_logger::core::log_file_uri(temp_dir.path())])
            .with_error_output_paths(Vec::<String>::new()),
    )
    .registry(&SinkRegistry::new())
    .counters(Arc::new(CounterBank::new()))
    .build()
    .expect("Failed to build logger");

    logger.infow("written to disk", [("height", 7u64)]);
    logger.sync().expect("Failed to sync");

    let content =
        fs::read_to_string(temp_dir.path().join("log.jsonl")).expect("Failed to read log file");
    let record: serde_json::Value = serde_json::from_str(content.trim()).expect("not JSON");
    assert_eq!(record["msg"], "written to disk");
    assert_eq!(record["height"], 7);
}

#[test]
fn test_sync_failure_is_returned_unmodified() {
    let logger = Logger::builder(
        LoggerConfig::production()
            .with_output_paths(Vec::<String>::new())
            .with_error_output_paths(Vec::<String>::new()),
    )
    .registry(&SinkRegistry::empty())
    .counters(Arc::new(CounterBank::new()))
    .destination(MemorySink::failing_sync(io::ErrorKind::PermissionDenied, "read-only"))
    .build()
    .expect("Failed to build logger");

    match logger.sync() {
        Err(LoggerError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
        other => panic!("unexpected sync result: {other:?}"),
    }
}

#[test]
fn test_write_failure_goes_to_error_outputs() {
    let errors = MemorySink::new();
    let logger = Logger::builder(
        LoggerConfig::production()
            .with_output_paths(Vec::<String>::new())
            .with_error_output_paths(Vec::<String>::new()),
    )
    .registry(&SinkRegistry::empty())
    .counters(Arc::new(CounterBank::new()))
    .destination(MemorySink::failing_write(io::ErrorKind::Other, "disk full"))
    .error_destination(errors.clone())
    .build()
    .expect("Failed to build logger");

    logger.info("lost");

    assert!(errors.contents_string().contains("disk full"));
    assert_eq!(logger.counters().get(LogLevel::Info), 1);
}

#[test]
fn test_concurrent_logging() {
    let (logger, out) = isolated(LoggerConfig::production(), &SinkRegistry::empty());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    logger.infow("tick", [("thread", t), ("i", i)]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread panicked");
    }

    // Every line must be one complete record
    let recs = json_lines(&out);
    assert_eq!(recs.len(), 800);
    assert_eq!(logger.counters().get(LogLevel::Info), 800);
}

#[test]
fn test_pretty_passthrough_of_foreign_lines() {
    let screen = MemorySink::new();
    let pretty = PrettyConsole::new(screen.clone()).with_colors(false);

    let entry = LogEntry::new(LogLevel::Warn, "slow block");
    let record = node_logger::core::JsonEncoder::default()
        .encode(&entry)
        .expect("encode");

    pretty.write(b"plain banner line\n").expect("write");
    pretty.write(&record).expect("write");
    pretty.write(b"{\"not\":\"a record\"}\n").expect("write");

    let text = screen.contents_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "plain banner line");
    assert!(lines[1].contains("[WARN]") && lines[1].contains("slow block"), "{}", lines[1]);
    assert_eq!(lines[2], "{\"not\":\"a record\"}");
}

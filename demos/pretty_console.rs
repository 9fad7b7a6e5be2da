//! Pretty console example
//!
//! Demonstrates the development configuration, structured fields, the error
//! helpers and the per-level counters.
//!
//! Run with: cargo run --example pretty_console

use node_logger::prelude::*;
use node_logger::{infof, infow, named_fn};
use std::io;

fn close_store() -> std::result::Result<(), io::Error> {
    Err(io::Error::new(io::ErrorKind::Other, "store already closed"))
}

fn main() -> Result<()> {
    println!("=== Node Logger - Pretty Console Example ===\n");

    // Pretty, colored output on stderr at debug level
    let logger = Logger::new(LoggerConfig::development().with_stacktrace_level(None))?;

    println!("1. Plain and structured records:");
    logger.debug("loading configuration");
    infow!(logger, "listening", "addr" => "0.0.0.0", "port" => 8080);
    infof!(logger, "connected to {} peers", 12);

    println!("\n2. Derived loggers:");
    let p2p = logger.with([("component", "p2p")]);
    p2p.warnw("peer misbehaved", [("peer", "10.0.0.7:4000"), ("score", "-20")]);

    let span = SpanContext::new("4bf92f3577b34da6a3ce929d0e0e4736", "00f067aa0ba902b7");
    logger.with_span(Some(&span)).info("handled request");

    println!("\n3. Error helpers:");
    logger.error_if("12x".parse::<u64>(), Some("parsing height"));
    logger.error_if_calling(named_fn!(close_store), Some("shutdown"));

    println!("\n4. Line counters (calls per level):");
    for (level, count) in logger.counters().snapshot() {
        println!("   {:<7} {}", level.as_str(), count);
    }

    logger.sync()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}

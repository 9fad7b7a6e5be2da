//! Human-readable console rendering of JSON records
//!
//! [`PrettyConsole`] sits between the encoder and a terminal. Each JSON line
//! it receives is rendered as:
//!
//! ```text
//! 2025-01-08T10:30:45.123Z [INFO]  started                                  src/main.rs:42  port=8080
//! ```
//!
//! followed by an indented stack trace when the record carries one. Lines
//! that are not JSON records pass through byte-for-byte.

use crate::core::encoder::{CALLER_KEY, LEVEL_KEY, MESSAGE_KEY, STACKTRACE_KEY, TIME_KEY};
use crate::core::registry::PRETTY_SCHEME;
use crate::core::timestamp::{self, format_iso8601};
use crate::core::{Destination, LogLevel, Result, SinkUri};
use colored::Colorize;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

const MESSAGE_WIDTH: usize = 50;
const CALLER_WIDTH: usize = 32;

/// Keys shown in the headline rather than as `key=value` details.
const HEADLINE_KEYS: [&str; 5] = [LEVEL_KEY, TIME_KEY, MESSAGE_KEY, CALLER_KEY, STACKTRACE_KEY];

pub struct PrettyConsole<W: Write + Send> {
    writer: Mutex<W>,
    use_colors: bool,
}

impl<W: Write + Send> PrettyConsole<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            use_colors: true,
        }
    }

    /// Enable or disable ANSI colors.
    ///
    /// When enabled, colors are still subject to the terminal detection and
    /// `NO_COLOR`/`CLICOLOR_FORCE` handling of the `colored` crate.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Consume the console, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Render one line, or `None` if it is not a JSON record.
    pub fn render(&self, line: &[u8]) -> Option<String> {
        let record: serde_json::Value = serde_json::from_slice(line).ok()?;
        let fields = record.as_object()?;
        let level_name = fields.get(LEVEL_KEY)?.as_str()?;
        let message = fields.get(MESSAGE_KEY)?.as_str()?;

        let mut out = String::with_capacity(line.len() + 32);

        if let Some(ts) = fields.get(TIME_KEY).and_then(timestamp::decode) {
            out.push_str(&format_iso8601(&ts));
            out.push(' ');
        }

        out.push_str(&self.level_tag(level_name));
        out.push(' ');
        out.push_str(&format!("{:<width$}", sanitize(message), width = MESSAGE_WIDTH));

        if let Some(caller) = fields.get(CALLER_KEY).and_then(|c| c.as_str()) {
            let caller = format!("{:<width$}", caller, width = CALLER_WIDTH);
            out.push(' ');
            if self.use_colors {
                out.push_str(&caller.white().bold().to_string());
            } else {
                out.push_str(&caller);
            }
        }

        let mut keys: Vec<&String> = fields
            .keys()
            .filter(|k| !HEADLINE_KEYS.contains(&k.as_str()))
            .collect();
        keys.sort();
        for key in keys {
            let value = match &fields[key] {
                serde_json::Value::String(s) if s.is_empty() => continue,
                serde_json::Value::String(s) => quote_if_needed(s),
                other => other.to_string(),
            };
            out.push(' ');
            if self.use_colors {
                out.push_str(&key.blue().to_string());
            } else {
                out.push_str(key);
            }
            out.push('=');
            out.push_str(&value);
        }

        let trimmed_len = out.trim_end().len();
        out.truncate(trimmed_len);
        out.push('\n');

        if let Some(stacktrace) = fields.get(STACKTRACE_KEY).and_then(|s| s.as_str()) {
            for frame in stacktrace.lines().filter(|l| !l.trim().is_empty()) {
                out.push_str("    ");
                out.push_str(frame);
                out.push('\n');
            }
        }

        Some(out)
    }

    fn level_tag(&self, level_name: &str) -> String {
        let tag = format!("{:<7}", format!("[{}]", level_name.to_uppercase()));
        if !self.use_colors {
            return tag;
        }
        match level_name.parse::<LogLevel>() {
            Ok(LogLevel::Debug) => tag.color(LogLevel::Debug.color_code()).dimmed().to_string(),
            Ok(level) if level >= LogLevel::DPanic => {
                tag.color(level.color_code()).bold().to_string()
            }
            Ok(level) => tag.color(level.color_code()).to_string(),
            Err(_) => tag,
        }
    }
}

impl<W: Write + Send> Destination for PrettyConsole<W> {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let mut out = Vec::with_capacity(buf.len() * 2);
        for line in buf.split_inclusive(|&b| b == b'\n') {
            match self.render(line) {
                Some(rendered) => out.extend_from_slice(rendered.as_bytes()),
                None => out.extend_from_slice(line),
            }
        }
        self.writer.lock().write_all(&out)?;
        Ok(buf.len())
    }

    fn sync(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }

    fn name(&self) -> &str {
        PRETTY_SCHEME
    }
}

/// Factory for the `pretty` scheme: every destination opened renders to a
/// fresh writer from `make_writer`.
pub fn pretty_console_sink<W, F>(
    make_writer: F,
) -> impl Fn(&SinkUri) -> Result<Arc<dyn Destination>> + Send + Sync + 'static
where
    W: Write + Send + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    move |_uri: &SinkUri| Ok(Arc::new(PrettyConsole::new(make_writer())) as Arc<dyn Destination>)
}

/// Escape control characters so a record stays on one line.
fn sanitize(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn quote_if_needed(value: &str) -> String {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '"' || c == '=') {
        format!("{:?}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;

    fn plain(buf: &MemorySink) -> PrettyConsole<MemorySink> {
        PrettyConsole::new(buf.clone()).with_colors(false)
    }

    #[test]
    fn test_renders_headline_and_details() {
        let buf = MemorySink::new();
        let console = plain(&buf);

        let line = br#"{"level":"info","ts":1736332245.123,"caller":"src/main.rs:42","msg":"started","port":8080,"host":"0.0.0.0"}"#;
        assert_eq!(console.write(line).unwrap(), line.len());

        let out = buf.contents_string();
        assert!(out.starts_with("2025-01-08T10:30:45.123Z [INFO]"), "{out}");
        assert!(out.contains("started"));
        assert!(out.contains("src/main.rs:42"));
        assert!(out.contains("host=0.0.0.0 port=8080"), "details sorted: {out}");
        assert!(!out.contains('{'));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_error_and_info_tags_differ() {
        let buf = MemorySink::new();
        let console = plain(&buf);

        console.write(b"{\"level\":\"error\",\"msg\":\"boom\"}\n").unwrap();
        let error_out = buf.contents_string();
        buf.clear();
        console.write(b"{\"level\":\"info\",\"msg\":\"boom\"}\n").unwrap();
        let info_out = buf.contents_string();

        assert!(error_out.contains("boom") && error_out.contains("[ERROR]"));
        assert!(info_out.contains("[INFO]") && !info_out.contains("[ERROR]"));
    }

    #[test]
    fn test_malformed_line_passes_through() {
        let buf = MemorySink::new();
        let console = plain(&buf);

        let garbage = b"not json at all {\n";
        console.write(garbage).unwrap();
        assert_eq!(buf.contents(), garbage);

        buf.clear();
        let no_newline = b"[1, 2, 3]";
        console.write(no_newline).unwrap();
        assert_eq!(buf.contents(), no_newline);
    }

    #[test]
    fn test_object_without_message_passes_through() {
        let buf = MemorySink::new();
        let line = b"{\"level\":\"info\"}\n";
        plain(&buf).write(line).unwrap();
        assert_eq!(buf.contents(), line);
    }

    #[test]
    fn test_mixed_batch_renders_each_line() {
        let buf = MemorySink::new();
        plain(&buf)
            .write(b"{\"level\":\"warn\",\"msg\":\"low disk\"}\nraw line\n")
            .unwrap();

        let out = buf.contents_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[WARN]"));
        assert_eq!(lines[1], "raw line");
    }

    #[test]
    fn test_stacktrace_rendered_below_headline() {
        let buf = MemorySink::new();
        let record = br#"{"level":"error","msg":"boom","stacktrace":"frame one\nframe two"}"#;
        plain(&buf).write(record).unwrap();

        let out = buf.contents_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "    frame one");
        assert_eq!(lines[2], "    frame two");
    }

    #[test]
    fn test_message_newlines_escaped_and_values_quoted() {
        let buf = MemorySink::new();
        plain(&buf)
            .write(b"{\"level\":\"info\",\"msg\":\"a\\nb\",\"peer\":\"node one\",\"empty\":\"\"}\n")
            .unwrap();

        let out = buf.contents_string();
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("a\\nb"));
        assert!(out.contains("peer=\"node one\""));
        assert!(!out.contains("empty="));
    }

    #[test]
    fn test_extreme_timestamp_is_dropped_from_headline() {
        let buf = MemorySink::new();
        plain(&buf)
            .write(b"{\"level\":\"info\",\"msg\":\"x\",\"ts\":-9223372036854775808}\n")
            .unwrap();

        let out = buf.contents_string();
        assert!(out.starts_with("[INFO]"), "{out}");
        assert!(out.contains(" x"), "{out}");
    }

    #[test]
    fn test_factory_opens_pretty_destination() {
        let buf = MemorySink::new();
        let handle = buf.clone();
        let factory = pretty_console_sink(move || handle.clone());
        let dest = factory(&SinkUri::parse("pretty://console").unwrap()).unwrap();

        dest.write(b"{\"level\":\"debug\",\"msg\":\"tick\"}\n").unwrap();
        assert_eq!(dest.name(), "pretty");
        assert!(buf.contents_string().contains("tick"));
    }
}

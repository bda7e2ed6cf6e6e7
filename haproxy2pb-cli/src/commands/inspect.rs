//! `haproxy2pb inspect` command handler

use std::fmt::Display;
use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use tokio::io::AsyncBufRead;

use haproxy2pb_core::config::Haproxy2pbConfig;
use haproxy2pb_core::pipeline::LineScanner;
use haproxy2pb_core::types::{AccessLogRecord, TerminationCode};
use haproxy2pb_log_parser::HaproxyLogParser;

use crate::cli::InspectArgs;
use crate::error::CliError;
use crate::input::{open_input, resolve_path};
use crate::output::{OutputWriter, Render};
use crate::records::{RecordStream, Scanned};

/// Execute the `inspect` command.
///
/// Fails with a command error when any line did not match.
pub async fn execute(
    args: InspectArgs,
    config: &Haproxy2pbConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let entries = if args.lines.is_empty() {
        let input_path = resolve_path(args.input.as_deref(), &config.input.path);
        let input = open_input(input_path.as_deref()).await?;
        inspect_stream(input, config.input.max_line_bytes).await?
    } else {
        inspect_lines(&args.lines)
    };

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for entry in &entries {
        writer.render_to(&mut handle, entry)?;
    }

    let failed = entries.iter().filter(|e| e.record.is_none()).count();
    if failed > 0 {
        return Err(CliError::Command(format!(
            "{} of {} lines did not match",
            failed,
            entries.len()
        )));
    }
    Ok(())
}

/// Scan the given lines.
pub fn inspect_lines(lines: &[String]) -> Vec<InspectEntry> {
    let parser = HaproxyLogParser::new();
    lines
        .iter()
        .zip(1u64..)
        .map(|(line, line_no)| match parser.parse(line) {
            Ok(record) => InspectEntry::matched(line_no, record),
            Err(e) => InspectEntry::failed(line_no, e.to_string()),
        })
        .collect()
}

/// Scan every line of `input`.
pub async fn inspect_stream<R: AsyncBufRead + Unpin>(
    input: R,
    max_line_bytes: usize,
) -> Result<Vec<InspectEntry>, CliError> {
    let mut stream = RecordStream::new(input, max_line_bytes);
    let mut entries = Vec::new();

    while let Some(scanned) = stream.next().await? {
        entries.push(match scanned {
            Scanned::Matched {
                line_no, record, ..
            } => InspectEntry::matched(line_no, record.clone()),
            Scanned::Unmatched { line_no, error } => {
                InspectEntry::failed(line_no, error.to_string())
            }
            Scanned::Skipped { line_no, len } => {
                InspectEntry::failed(line_no, format!("skipped line of {} bytes", len))
            }
        });
    }

    stream.finish();
    Ok(entries)
}

/// Scan result for one line.
#[derive(Debug, Serialize)]
pub struct InspectEntry {
    pub line: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<AccessLogRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InspectEntry {
    fn matched(line: u64, record: AccessLogRecord) -> Self {
        Self {
            line,
            record: Some(record),
            error: None,
        }
    }

    fn failed(line: u64, error: String) -> Self {
        Self {
            line,
            record: None,
            error: Some(error),
        }
    }
}

impl Render for InspectEntry {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match (&self.record, &self.error) {
            (Some(record), _) => {
                writeln!(w, "{} {}", "line".bold(), self.line)?;
                write_record(w, record)
            }
            (None, error) => writeln!(
                w,
                "{} {}: {}",
                "line".bold(),
                self.line,
                error.as_deref().unwrap_or("unknown error").red()
            ),
        }
    }
}

/// Write the present fields of a record as `name: value` lines.
pub fn write_record(w: &mut dyn Write, r: &AccessLogRecord) -> std::io::Result<()> {
    field(w, "host", r.host.as_ref())?;
    field(w, "process", r.process.as_ref())?;
    field(w, "pid", r.pid)?;
    field(w, "client_ip", r.client_ip)?;
    field(w, "client_port", r.client_port)?;
    field(w, "event_time", r.event_time)?;
    field(w, "frontend", r.frontend.as_ref())?;
    field(w, "backend", r.backend.as_ref())?;
    field(w, "server", r.server.as_ref())?;
    field(w, "time_queue", r.time_queue)?;
    field(w, "time_wait", r.time_wait)?;
    field(w, "time_connect", r.time_connect)?;
    field(w, "time_respond", r.time_respond)?;
    field(w, "time_total", r.time_total)?;
    field(w, "status_code", r.status_code)?;
    field(w, "bytes_read", r.bytes_read)?;
    field(w, "request_cookie", r.request_cookie.as_ref())?;
    field(w, "response_cookie", r.response_cookie.as_ref())?;
    field(
        w,
        "termination_reason",
        r.termination_reason.map(|v| v.as_str_name()),
    )?;
    field(
        w,
        "termination_state",
        r.termination_state.map(|v| v.as_str_name()),
    )?;
    field(
        w,
        "termination_cookie",
        r.termination_cookie.map(|v| v.as_str_name()),
    )?;
    field(
        w,
        "termination_cookie_transform",
        r.termination_cookie_transform.map(|v| v.as_str_name()),
    )?;
    field(w, "active_connections", r.active_connections)?;
    field(w, "frontend_connections", r.frontend_connections)?;
    field(w, "backend_connections", r.backend_connections)?;
    field(w, "server_connections", r.server_connections)?;
    field(w, "retries", r.retries)?;
    field(w, "server_queue", r.server_queue)?;
    field(w, "backend_queue", r.backend_queue)?;
    if !r.request_headers.is_empty() {
        field(w, "request_headers", Some(r.request_headers.join(" | ")))?;
    }
    if !r.response_headers.is_empty() {
        field(w, "response_headers", Some(r.response_headers.join(" | ")))?;
    }
    field(w, "http_method", r.http_method.as_ref())?;
    field(w, "http_uri", r.http_uri.as_ref())?;
    field(w, "http_version", r.http_version.as_ref())?;
    Ok(())
}

fn field<T: Display>(w: &mut dyn Write, name: &str, value: Option<T>) -> std::io::Result<()> {
    match value {
        Some(v) => writeln!(w, "  {:<30} {}", format!("{}:", name), v),
        None => Ok(()),
    }
}

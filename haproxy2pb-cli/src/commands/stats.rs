//! `haproxy2pb stats` command handler
//!
//! Prints `encoded_len line_len saved` for every matched line and
//! `err <error>` for every unmatched one, followed by the run summary.

use std::io::Write;

use serde::Serialize;
use tokio::io::AsyncBufRead;

use haproxy2pb_core::config::Haproxy2pbConfig;
use haproxy2pb_log_parser::ProtobufEncoder;

use crate::cli::StatsArgs;
use crate::error::CliError;
use crate::input::{open_input, resolve_path};
use crate::output::{OutputWriter, Render};
use crate::records::{RecordStream, ScanSummary, Scanned};

/// Execute the `stats` command.
pub async fn execute(
    args: StatsArgs,
    config: &Haproxy2pbConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let input_path = resolve_path(args.input.as_deref(), &config.input.path);
    let input = open_input(input_path.as_deref()).await?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    let summary = stats_stream(input, config.input.max_line_bytes, writer, &mut handle).await?;
    writer.render_to(&mut handle, &summary)?;
    handle.flush()?;

    eprintln!("done");
    Ok(())
}

/// Write one entry per input line to `w` and return the summary.
pub async fn stats_stream<R: AsyncBufRead + Unpin>(
    input: R,
    max_line_bytes: usize,
    writer: &OutputWriter,
    w: &mut dyn Write,
) -> Result<ScanSummary, CliError> {
    let encoder = ProtobufEncoder::new();
    let mut stream = RecordStream::new(input, max_line_bytes);

    while let Some(scanned) = stream.next().await? {
        let entry = match scanned {
            Scanned::Matched {
                line_no,
                line_len,
                record,
            } => {
                let encoded_len = encoder.encoded_len(record);
                stream.add_output(encoded_len);
                StatsEntry::Ok {
                    line: line_no,
                    encoded_len,
                    line_len,
                    saved: line_len as i64 - encoded_len as i64,
                }
            }
            Scanned::Unmatched { line_no, error } => StatsEntry::Err {
                line: line_no,
                error: error.to_string(),
            },
            Scanned::Skipped { line_no, len } => StatsEntry::Skipped {
                line: line_no,
                line_len: len,
            },
        };
        writer.render_line_to(w, &entry)?;
    }

    Ok(stream.finish())
}

/// One line of the `stats` report.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatsEntry {
    Ok {
        line: u64,
        encoded_len: usize,
        line_len: usize,
        saved: i64,
    },
    Err {
        line: u64,
        error: String,
    },
    Skipped {
        line: u64,
        line_len: usize,
    },
}

impl Render for StatsEntry {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match self {
            Self::Ok {
                encoded_len,
                line_len,
                saved,
                ..
            } => writeln!(w, "{} {} {}", encoded_len, line_len, saved),
            Self::Err { error, .. } => writeln!(w, "err {}", error),
            Self::Skipped { line_len, .. } => writeln!(w, "skip {}", line_len),
        }
    }
}

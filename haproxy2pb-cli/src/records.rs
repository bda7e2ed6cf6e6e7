//! Scanned record stream shared by `encode`, `stats` and `inspect`

use std::io::Write;

use metrics::counter;
use serde::Serialize;
use tokio::io::AsyncBufRead;
use tracing::{debug, warn};

use haproxy2pb_core::AccessLogRecord;
use haproxy2pb_core::error::ScanError;
use haproxy2pb_core::metrics as m;
use haproxy2pb_core::pipeline::LineScanner;
use haproxy2pb_log_parser::HaproxyLogParser;

use crate::error::CliError;
use crate::input::{Line, LineReader};
use crate::output::Render;

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub lines: u64,
    pub matched: u64,
    pub unmatched: u64,
    pub skipped: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl Render for ScanSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            w,
            "lines={} matched={} unmatched={} skipped={} bytes_in={} bytes_out={}",
            self.lines, self.matched, self.unmatched, self.skipped, self.bytes_in, self.bytes_out
        )
    }
}

/// Outcome of one input line.
#[derive(Debug)]
pub enum Scanned<'a> {
    /// The line matched; `record` is valid until the next call.
    Matched {
        line_no: u64,
        line_len: usize,
        record: &'a AccessLogRecord,
    },
    /// The line did not match the access log format.
    Unmatched { line_no: u64, error: ScanError },
    /// The line was too long or not UTF-8.
    Skipped { line_no: u64, len: usize },
}

/// Scans input lines into a single reused record.
pub struct RecordStream<R> {
    reader: LineReader<R>,
    parser: HaproxyLogParser,
    record: AccessLogRecord,
    summary: ScanSummary,
}

impl<R: AsyncBufRead + Unpin> RecordStream<R> {
    pub fn new(input: R, max_line_bytes: usize) -> Self {
        Self {
            reader: LineReader::new(input, max_line_bytes),
            parser: HaproxyLogParser::new(),
            record: AccessLogRecord::default(),
            summary: ScanSummary::default(),
        }
    }

    /// Read and scan the next line. Returns `None` at end of input.
    pub async fn next(&mut self) -> Result<Option<Scanned<'_>>, CliError> {
        let Some(line) = self.reader.next_line().await? else {
            return Ok(None);
        };

        self.summary.lines += 1;
        let line_no = self.summary.lines;

        let outcome = match line {
            Line::Text(text) => match self.parser.scan(text, &mut self.record) {
                Ok(()) => {
                    self.summary.matched += 1;
                    counter!(m::SCANNER_LINES_TOTAL, m::LABEL_RESULT => "matched").increment(1);
                    Scanned::Matched {
                        line_no,
                        line_len: text.len(),
                        record: &self.record,
                    }
                }
                Err(error) => {
                    self.summary.unmatched += 1;
                    counter!(m::SCANNER_LINES_TOTAL, m::LABEL_RESULT => "unmatched").increment(1);
                    debug!(line_no, "line does not match access log format");
                    Scanned::Unmatched { line_no, error }
                }
            },
            Line::TooLong(len) => {
                self.summary.skipped += 1;
                counter!(m::SCANNER_LINES_TOTAL, m::LABEL_RESULT => "skipped").increment(1);
                warn!(line_no, len, "line exceeds max_line_bytes, skipping");
                Scanned::Skipped { line_no, len }
            }
            Line::NotUtf8(len) => {
                self.summary.skipped += 1;
                counter!(m::SCANNER_LINES_TOTAL, m::LABEL_RESULT => "skipped").increment(1);
                warn!(line_no, len, "line is not valid UTF-8, skipping");
                Scanned::Skipped { line_no, len }
            }
        };

        Ok(Some(outcome))
    }

    /// Record bytes written for the last matched line.
    pub fn add_output(&mut self, bytes: usize) {
        self.summary.bytes_out += bytes as u64;
        counter!(m::ENCODER_RECORDS_TOTAL).increment(1);
        counter!(m::ENCODER_OUTPUT_BYTES_TOTAL).increment(bytes as u64);
    }

    /// Counters so far.
    pub fn summary(&self) -> ScanSummary {
        let bytes_in = self.reader.bytes_read();
        ScanSummary {
            bytes_in,
            ..self.summary.clone()
        }
    }

    /// Publish the input byte counter. Call once at the end of a run.
    pub fn finish(self) -> ScanSummary {
        let summary = self.summary();
        counter!(m::SCANNER_INPUT_BYTES_TOTAL).increment(summary.bytes_in);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r#"Oct 28 14:30:05 lb-1 haproxy[10227]: 10.20.3.41:45572 [28/Oct/2011:14:30:05.615] web web/app1 0/0/0/18/18 302 677 - - ---- 157/126/126/0/0 0/0 "GET /stream HTTP/1.0""#;

    #[tokio::test]
    async fn test_stream_counts_every_outcome() {
        let data = format!("{LINE}\ngarbage\n{}\n{LINE}\r\n", "x".repeat(600));
        let mut stream = RecordStream::new(data.as_bytes(), 512);

        let mut matched_lines = Vec::new();
        while let Some(scanned) = stream.next().await.unwrap() {
            match scanned {
                Scanned::Matched {
                    line_no, record, ..
                } => {
                    assert_eq!(record.status_code, Some(302));
                    matched_lines.push(line_no);
                }
                Scanned::Unmatched { line_no, error } => {
                    assert_eq!(line_no, 2);
                    assert_eq!(error.to_string(), "no match: garbage");
                }
                Scanned::Skipped { line_no, len } => {
                    assert_eq!((line_no, len), (3, 600));
                }
            }
        }
        assert_eq!(matched_lines, vec![1, 4]);

        let summary = stream.finish();
        assert_eq!(summary.lines, 4);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.unmatched, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.bytes_in, data.len() as u64);
        assert_eq!(summary.bytes_out, 0);
    }

    #[tokio::test]
    async fn test_line_len_excludes_newline() {
        let data = format!("{LINE}\n");
        let mut stream = RecordStream::new(data.as_bytes(), 4096);
        match stream.next().await.unwrap() {
            Some(Scanned::Matched { line_len, .. }) => assert_eq!(line_len, LINE.len()),
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_summary_text() {
        let summary = ScanSummary {
            lines: 3,
            matched: 2,
            unmatched: 1,
            skipped: 0,
            bytes_in: 100,
            bytes_out: 40,
        };
        let mut buf = Vec::new();
        summary.render_text(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "lines=3 matched=2 unmatched=1 skipped=0 bytes_in=100 bytes_out=40\n"
        );
    }
}

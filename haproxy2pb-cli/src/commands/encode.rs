//! `haproxy2pb encode` command handler

use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use haproxy2pb_core::config::{Framing, Haproxy2pbConfig};
use haproxy2pb_core::error::Haproxy2pbError;
use haproxy2pb_log_parser::ProtobufEncoder;

use crate::cli::EncodeArgs;
use crate::error::CliError;
use crate::input::{open_input, open_output, resolve_path};
use crate::output::OutputWriter;
use crate::records::{RecordStream, ScanSummary, Scanned};

/// Settings for one encode run, merged from flags and config.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    pub framing: Framing,
    pub stop_on_error: bool,
    pub max_line_bytes: usize,
}

impl EncodeOptions {
    pub fn new(args: &EncodeArgs, config: &Haproxy2pbConfig) -> Self {
        Self {
            framing: args.framing.map_or(config.output.framing, Framing::from),
            stop_on_error: args.stop_on_error || config.scanner.stop_on_error,
            max_line_bytes: config.input.max_line_bytes,
        }
    }
}

/// Execute the `encode` command.
pub async fn execute(
    args: EncodeArgs,
    config: &Haproxy2pbConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let options = EncodeOptions::new(&args, config);
    let input_path = resolve_path(args.input.as_deref(), &config.input.path);
    let output_path = resolve_path(args.out.as_deref(), &config.output.path);

    let source = input_path
        .as_ref()
        .map_or_else(|| "stdin".to_owned(), |p| p.display().to_string());
    let sink = output_path
        .as_ref()
        .map_or_else(|| "stdout".to_owned(), |p| p.display().to_string());
    info!(
        input = %source,
        output = %sink,
        framing = ?options.framing,
        "encoding access log"
    );

    let input = open_input(input_path.as_deref()).await?;
    let mut out = open_output(output_path.as_deref()).await?;

    let result = encode_stream(input, &mut out, options).await;
    out.flush().await?;
    let summary = result?;

    info!(
        lines = summary.lines,
        matched = summary.matched,
        unmatched = summary.unmatched,
        skipped = summary.skipped,
        "encode finished"
    );

    // stdout에 레코드를 쓰는 경우 요약은 stderr로 보냅니다.
    if output_path.is_some() {
        writer.render(&summary)?;
    } else {
        writer.render_to(&mut std::io::stderr(), &summary)?;
    }
    Ok(())
}

/// Scan every input line and write the encoded records to `out`.
pub async fn encode_stream<R, W>(
    input: R,
    out: &mut W,
    options: EncodeOptions,
) -> Result<ScanSummary, CliError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let encoder = ProtobufEncoder::new();
    let mut stream = RecordStream::new(input, options.max_line_bytes);
    let mut buf = Vec::with_capacity(512);

    while let Some(scanned) = stream.next().await? {
        match scanned {
            Scanned::Matched { record, .. } => {
                buf.clear();
                match options.framing {
                    Framing::LengthDelimited => encoder.encode_length_delimited(record, &mut buf)?,
                    Framing::Raw => encoder.encode_raw(record, &mut buf)?,
                }
                out.write_all(&buf).await?;
                stream.add_output(buf.len());
            }
            Scanned::Unmatched { line_no, error } if options.stop_on_error => {
                warn!(line_no, "stopping at unmatched line");
                return Err(Haproxy2pbError::from(error).into());
            }
            Scanned::Unmatched { .. } | Scanned::Skipped { .. } => {}
        }
    }

    Ok(stream.finish())
}

//! `haproxy2pb decode` command handler

use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::info;

use haproxy2pb_core::types::AccessLogRecord;
use haproxy2pb_log_parser::decode_length_delimited;

use crate::cli::DecodeArgs;
use crate::commands::inspect::write_record;
use crate::error::CliError;
use crate::input::{open_input, resolve_path};
use crate::output::{OutputWriter, Render};

/// Execute the `decode` command.
pub async fn execute(args: DecodeArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let input_path = resolve_path(args.input.as_deref(), "");
    let mut input = open_input(input_path.as_deref()).await?;

    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes).await?;

    let records = decode_length_delimited(&bytes)?;
    info!(
        records = records.len(),
        bytes = bytes.len(),
        "decoded record stream"
    );

    writer.render(&DecodeReport::new(records))?;
    Ok(())
}

/// Decoded records in stream order.
#[derive(Debug, Serialize)]
pub struct DecodeReport {
    pub count: usize,
    pub records: Vec<AccessLogRecord>,
}

impl DecodeReport {
    pub fn new(records: Vec<AccessLogRecord>) -> Self {
        Self {
            count: records.len(),
            records,
        }
    }
}

impl Render for DecodeReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for (index, record) in self.records.iter().enumerate() {
            writeln!(w, "{} {}", "record".bold(), index + 1)?;
            write_record(w, record)?;
        }
        writeln!(w, "{} records", self.count)
    }
}

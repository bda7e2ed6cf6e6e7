//! Line input and record output plumbing
//!
//! Input is read line by line. Lines above `max_line_bytes` are reported
//! as [`Line::TooLong`] without being buffered and the caller skips them.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, BufReader, BufWriter};

use crate::error::CliError;

/// Boxed buffered input source.
pub type Input = Box<dyn AsyncBufRead + Unpin + Send>;

/// Boxed output sink.
pub type Output = Box<dyn AsyncWrite + Unpin + Send>;

/// Resolve the effective path: CLI argument first, then the config value.
///
/// `None` means the standard stream.
pub fn resolve_path(arg: Option<&Path>, configured: &str) -> Option<PathBuf> {
    match arg {
        Some(p) if p.as_os_str() == "-" => None,
        Some(p) => Some(p.to_path_buf()),
        None if configured.is_empty() || configured == "-" => None,
        None => Some(PathBuf::from(configured)),
    }
}

/// Open the input file, or stdin when `path` is `None`.
pub async fn open_input(path: Option<&Path>) -> Result<Input, CliError> {
    match path {
        Some(p) => {
            let file = tokio::fs::File::open(p).await.map_err(|e| {
                CliError::Command(format!("cannot open input {}: {}", p.display(), e))
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
    }
}

/// Create the output file, or stdout when `path` is `None`.
pub async fn open_output(path: Option<&Path>) -> Result<BufWriter<Output>, CliError> {
    let sink: Output = match path {
        Some(p) => Box::new(tokio::fs::File::create(p).await.map_err(|e| {
            CliError::Command(format!("cannot create output {}: {}", p.display(), e))
        })?),
        None => Box::new(tokio::io::stdout()),
    };
    Ok(BufWriter::new(sink))
}

/// One line read from the input.
#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
    /// Line text without the trailing `\n`.
    Text(&'a str),
    /// Line longer than the limit (length in bytes).
    TooLong(usize),
    /// Line that is not valid UTF-8 (length in bytes).
    NotUtf8(usize),
}

/// Reads lines into a reused buffer.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    max_line_bytes: usize,
    bytes_read: u64,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(inner: R, max_line_bytes: usize) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            max_line_bytes,
            bytes_read: 0,
        }
    }

    /// Total bytes consumed so far, newlines included.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Read the next line. Returns `None` at end of input.
    ///
    /// At most `max_line_bytes + 1` bytes are buffered; the rest of an
    /// oversized line is consumed and discarded.
    pub async fn next_line(&mut self) -> Result<Option<Line<'_>>, CliError> {
        self.buf.clear();
        let limit = (self.max_line_bytes as u64).saturating_add(1);
        let n = (&mut self.inner)
            .take(limit)
            .read_until(b'\n', &mut self.buf)
            .await?;
        if n == 0 {
            return Ok(None);
        }
        self.bytes_read += n as u64;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        } else if n as u64 == limit {
            let rest = self.discard_line().await?;
            return Ok(Some(Line::TooLong(self.buf.len() + rest)));
        }
        match std::str::from_utf8(&self.buf) {
            Ok(text) => Ok(Some(Line::Text(text))),
            Err(_) => Ok(Some(Line::NotUtf8(self.buf.len()))),
        }
    }

    /// Skip to the end of the current line. Returns the skipped length
    /// without the newline.
    async fn discard_line(&mut self) -> Result<usize, CliError> {
        let mut skipped = 0;
        loop {
            let (consumed, done) = {
                let available = self.inner.fill_buf().await?;
                match available.iter().position(|&b| b == b'\n') {
                    Some(i) => (i + 1, true),
                    None if available.is_empty() => (0, true),
                    None => (available.len(), false),
                }
            };
            self.inner.consume(consumed);
            self.bytes_read += consumed as u64;
            if done {
                // 개행 문자는 길이에 포함하지 않음
                return Ok(skipped + consumed.saturating_sub(1));
            }
            skipped += consumed;
        }
    }
}

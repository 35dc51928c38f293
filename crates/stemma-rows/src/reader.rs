//! Line-by-line row reading.
//!
//! [`RowReader`] wraps any async byte source, splits it into lines and keeps
//! a 1-based line counter so that every warning can point back at the
//! offending line of the export.

use std::path::Path;

use futures::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::warning::{Warning, WarningCollector};

/// Byte order mark some spreadsheet tools prepend to text exports.
const BOM: &str = "\u{feff}";

/// Async reader for line-oriented row data.
///
/// # Examples
///
/// ```no_run
/// use stemma_rows::RowReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("family.jsonl").await?;
/// let reader = RowReader::new(file);
/// assert_eq!(reader.line_number(), 0);
/// # Ok(())
/// # }
/// ```
pub struct RowReader<R> {
    reader: BufReader<R>,
    /// Number of the last line read; 0 before the first read.
    line_number: usize,
}

impl<R: AsyncRead + Unpin> RowReader<R> {
    /// Wraps `reader` in a buffered row reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
        }
    }

    /// Returns the 1-based number of the last line read, or 0 before any read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next raw line, without its terminator.
    ///
    /// Returns `Ok(None)` at end of input. Bytes are returned unvalidated so
    /// that a single bad line can be skipped instead of failing the read.
    pub(crate) async fn next_line(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        let read = self.reader.read_until(b'\n', &mut buf).await?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        Ok(Some(buf))
    }

    /// Turns the reader into a stream of successfully parsed rows.
    ///
    /// Blank lines are ignored. Lines that are not valid UTF-8 or do not
    /// deserialize into `T` are skipped and recorded in the returned
    /// [`WarningCollector`]. An I/O failure mid-read is recorded as a warning
    /// and ends the stream.
    ///
    /// The collector is filled as the stream is polled, so read it only after
    /// the stream has been driven to completion.
    pub fn stream_resilient<T>(self) -> (impl Stream<Item = T>, WarningCollector)
    where
        T: DeserializeOwned,
    {
        let collector = WarningCollector::new();
        let sink = collector.clone();

        let rows = stream::unfold(self, move |mut reader| {
            let sink = sink.clone();
            async move {
                loop {
                    let raw = match reader.next_line().await {
                        Ok(Some(raw)) => raw,
                        Ok(None) => return None,
                        Err(e) => {
                            warn!(line = reader.line_number() + 1, error = %e, "Row read aborted");
                            sink.add(Warning::SkippedLine {
                                line_number: reader.line_number() + 1,
                                reason: format!("read error: {e}"),
                            });
                            return None;
                        }
                    };
                    let line_number = reader.line_number();

                    let Ok(text) = std::str::from_utf8(&raw) else {
                        sink.add(Warning::SkippedLine {
                            line_number,
                            reason: "line is not valid UTF-8".to_string(),
                        });
                        continue;
                    };
                    let text = if line_number == 1 {
                        text.strip_prefix(BOM).unwrap_or(text)
                    } else {
                        text
                    };
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }

                    match serde_json::from_str::<T>(text) {
                        Ok(row) => return Some((row, reader)),
                        Err(e) => {
                            debug!(line = line_number, error = %e, "Skipping malformed row");
                            sink.add(Warning::MalformedRow {
                                line_number,
                                error: e.to_string(),
                            });
                        }
                    }
                }
            }
        });

        (rows, collector)
    }
}

/// Returns `true` when the content is a single JSON array instead of lines.
fn looks_like_json_array(content: &[u8]) -> bool {
    let content = content.strip_prefix(BOM.as_bytes()).unwrap_or(content);
    content
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'[')
}

/// Reads every row of a JSON Lines file, skipping lines that cannot be parsed.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and
/// [`Error::InvalidFormat`] if the file holds one JSON array rather than one
/// object per line. Problems confined to single lines are returned as
/// warnings instead.
pub async fn read_rows_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = tokio::fs::read(path).await?;
    if looks_like_json_array(&content) {
        return Err(Error::InvalidFormat(format!(
            "{} holds a JSON array; expected one JSON object per line",
            path.display()
        )));
    }

    let reader = RowReader::new(std::io::Cursor::new(content));
    let (rows, collector) = reader.stream_resilient::<T>();
    let rows: Vec<T> = rows.collect().await;
    let warnings = collector.into_warnings();

    debug!(
        path = %path.display(),
        rows = rows.len(),
        warnings = warnings.len(),
        "Read row file"
    );
    Ok((rows, warnings))
}

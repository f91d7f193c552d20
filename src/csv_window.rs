//! Streaming windowed CSV parse
//!
//! Pulls rows from a byte stream one at a time, materializes only the rows
//! whose data-row index falls inside the requested window, and stops pulling
//! as soon as the window's upper bound is reached. Memory stays O(limit)
//! regardless of file size, and a window near the start of a large file never
//! reads the remainder.

use crate::error::Result;
use crate::models::{CsvRecord, RowWindow};
use csv_async::{AsyncReaderBuilder, StringRecord, Trim};
use tokio::io::AsyncRead;
use tracing::debug;

/// Read the windowed, filtered records from a CSV byte stream
///
/// The first parsed row is the header; data rows are zero-indexed from the
/// row after it. Fields are comma-delimited with leading/trailing whitespace
/// trimmed, and rows with a deviating field count are accepted rather than
/// aborting the parse (short rows pad with empty values).
///
/// The filter, when present, keeps a row only if any field value contains the
/// filter substring case-insensitively. Filtering applies strictly AFTER
/// windowing: it can shrink a page below `limit` but never pulls in rows from
/// outside the window. A window lying beyond the end of the stream yields an
/// empty sequence, not an error.
pub async fn read_window<R>(
    reader: R,
    window: RowWindow,
    filter: Option<&str>,
) -> Result<Vec<CsvRecord>>
where
    R: AsyncRead + Unpin + Send,
{
    let mut csv_reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .create_reader(reader);

    let headers = csv_reader.headers().await?.clone();
    let needle = filter.map(str::to_lowercase);

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    let mut index: u64 = 0;

    while csv_reader.read_record(&mut row).await? {
        if window.contains(index) {
            let record = CsvRecord::from_row(headers.iter(), row.iter());
            match &needle {
                Some(needle) if !record.matches_filter(needle) => {}
                _ => records.push(record),
            }
        }

        index += 1;
        if window.is_past(index) {
            // Upper bound reached: stop pulling without draining the stream
            break;
        }
    }

    debug!(
        "Windowed parse selected {} of rows [{}, {}) (filter={})",
        records.len(),
        window.from,
        window.to,
        needle.as_deref().unwrap_or("-")
    );

    Ok(records)
}

//! Data source abstraction for receiving raw feed rows.
//!
//! The dashboard core is transport-agnostic: anything that can hand over
//! CSV-shaped rows works. Sources are polled, non-blocking, and return rows
//! only when fresh data is available.

mod channel;
mod file;
#[cfg(feature = "remote")]
mod http;

pub use channel::ChannelSource;
pub use file::CsvFileSource;
#[cfg(feature = "remote")]
pub use http::HttpSource;

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::io::Read;

/// One raw row: column name to raw cell text.
pub type RawRow = BTreeMap<String, String>;

/// A full fetch result, rows in arrival order.
pub type RawRows = Vec<RawRow>;

/// Trait for receiving feed rows from various backends.
///
/// # Example
///
/// ```
/// use phasewatch::{CsvFileSource, RowSource};
///
/// let mut source = CsvFileSource::new("phasewatch.csv");
/// if let Some(rows) = source.poll() {
///     println!("Got {} rows", rows.len());
/// }
/// ```
pub trait RowSource: Send + Debug {
    /// Poll for a fresh set of rows.
    ///
    /// Returns `Some(rows)` when new data is available, `None` otherwise.
    /// Must be non-blocking; the caller drives it from the UI loop.
    fn poll(&mut self) -> Option<RawRows>;

    /// Human-readable description for the status bar.
    fn description(&self) -> &str;

    /// The error from the most recent poll attempt, if any.
    fn error(&self) -> Option<&str>;
}

/// Parse CSV text into raw rows using the header line for column names.
///
/// Cells beyond the header width are ignored; short rows simply omit the
/// trailing columns. No per-cell interpretation happens here.
pub fn rows_from_csv<R: Read>(reader: R) -> csv::Result<RawRows> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.to_string(), cell.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_rows_from_csv() {
        let csv = "Time,Node1A,Node1B\n2024-05-01 10:00:00,420,431\n2024-05-01 10:00:05,421,\n";
        let rows = rows_from_csv(Cursor::new(csv)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Time"], "2024-05-01 10:00:00");
        assert_eq!(rows[0]["Node1A"], "420");
        assert_eq!(rows[1]["Node1B"], "");
    }

    #[test]
    fn test_rows_from_csv_short_rows() {
        let csv = "Time,Node1A\n2024-05-01 10:00:00\n";
        let rows = rows_from_csv(Cursor::new(csv)).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].contains_key("Node1A"));
    }
}

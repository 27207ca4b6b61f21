//! Row ingestion: raw CSV rows into typed, timestamped records.
//!
//! Upstream feeds are unreliable, so ingestion is tolerant per row and per
//! field: a row with an unparsable timestamp is dropped, a field with a
//! non-numeric value is simply absent from the record. Only a missing
//! timestamp column is fatal for the cycle.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::source::{RawRow, RawRows};

/// Canonical name of the timestamp column after normalization.
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// Whether ambiguous dates are read day-first or month-first.
///
/// The feed's exporter has been observed emitting both conventions, so this
/// is configuration rather than detection. ISO `YYYY-MM-DD` timestamps parse
/// the same under either order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    DayFirst,
    #[default]
    MonthFirst,
}

impl DateOrder {
    fn formats(self) -> &'static [&'static str] {
        match self {
            DateOrder::DayFirst => &[
                "%d/%m/%Y %H:%M:%S",
                "%d/%m/%Y %H:%M",
                "%d-%m-%Y %H:%M:%S",
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%dT%H:%M:%S",
            ],
            DateOrder::MonthFirst => &[
                "%m/%d/%Y %H:%M:%S",
                "%m/%d/%Y %H:%M",
                "%m-%d-%Y %H:%M:%S",
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%dT%H:%M:%S",
            ],
        }
    }

    /// Parse a timestamp string under this order, trying each accepted
    /// format in turn.
    pub fn parse(self, raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        self.formats()
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }
}

/// One ingested row: a parsed timestamp plus the fields that parsed as
/// numbers. A field absent from `values` carries no data; it is never
/// coerced to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    pub values: BTreeMap<String, f64>,
}

impl Record {
    pub fn value(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }

    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Returns true for columns carrying a phase reading (`Node{i}A..C`).
pub fn is_phase_column(name: &str) -> bool {
    name.starts_with("Node") && name.ends_with(['A', 'B', 'C'])
}

/// Parses raw rows into [`Record`]s.
#[derive(Debug, Clone)]
pub struct Ingester {
    /// Column names accepted as the timestamp column, tried in order.
    pub timestamp_candidates: Vec<String>,
    pub date_order: DateOrder,
    /// Raw phase values are divided by this (the feed ships decidegrees).
    pub scale_divisor: f64,
}

impl Default for Ingester {
    fn default() -> Self {
        Self {
            timestamp_candidates: vec!["Time".to_string(), "time".to_string()],
            date_order: DateOrder::default(),
            scale_divisor: 10.0,
        }
    }
}

impl Ingester {
    /// Rename the first matching candidate column to [`TIMESTAMP_COLUMN`].
    ///
    /// Rows that already carry a `Timestamp` column are left alone. Fails
    /// with a schema error when no row names either the canonical column or
    /// any candidate.
    pub fn normalize_timestamp_column(&self, rows: &mut RawRows) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let has_column = |row: &RawRow, name: &str| row.contains_key(name);
        let first = &rows[0];
        if has_column(first, TIMESTAMP_COLUMN) {
            return Ok(());
        }

        let found = self
            .timestamp_candidates
            .iter()
            .find(|candidate| has_column(first, candidate))
            .cloned();

        match found {
            Some(candidate) => {
                for row in rows.iter_mut() {
                    if let Some(value) = row.remove(&candidate) {
                        row.insert(TIMESTAMP_COLUMN.to_string(), value);
                    }
                }
                Ok(())
            }
            None => Err(Error::Schema {
                tried: self.timestamp_candidates.join(", "),
            }),
        }
    }

    /// Parse rows into records, preserving arrival order.
    ///
    /// Rows without a parsable timestamp are dropped. Phase columns are
    /// scaled by the configured divisor; other numeric columns pass through
    /// unscaled.
    pub fn ingest(&self, mut rows: RawRows) -> Result<Vec<Record>> {
        self.normalize_timestamp_column(&mut rows)?;

        let records = rows
            .into_iter()
            .filter_map(|row| self.parse_row(row))
            .collect();
        Ok(records)
    }

    fn parse_row(&self, row: RawRow) -> Option<Record> {
        let timestamp = self.date_order.parse(row.get(TIMESTAMP_COLUMN)?)?;

        let mut values = BTreeMap::new();
        for (name, raw) in row {
            if name == TIMESTAMP_COLUMN {
                continue;
            }
            let Ok(parsed) = raw.trim().parse::<f64>() else {
                continue;
            };
            let value = if is_phase_column(&name) {
                parsed / self.scale_divisor
            } else {
                parsed
            };
            values.insert(name, value);
        }

        Some(Record { timestamp, values })
    }
}

/// Distinct calendar days present in the records, ascending.
pub fn available_days(records: &[Record]) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = records.iter().map(Record::day).collect();
    days.sort();
    days.dedup();
    days
}

/// Records falling on the given day, arrival order preserved.
pub fn filter_day(records: &[Record], day: NaiveDate) -> Vec<Record> {
    records.iter().filter(|r| r.day() == day).cloned().collect()
}

//! Row normalization
//!
//! Converts raw string cells into [`Row`] values. Unparseable values
//! never fail ingestion: they degrade to the field's default and are
//! logged at debug level for diagnostics.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::debug;

use crate::dataset::{Row, RowId};

use super::ColumnMap;

/// Formats tried for the date field, in order: delimited day/month/year
/// first, then ISO year-month-day, then a generic fallback list.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%y",
    "%m/%d/%Y",
];

/// Timestamp formats accepted as a last resort; only the date part is kept.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Outcome of normalizing a raw cell grid.
#[derive(Debug)]
pub struct NormalizedGrid {
    /// Column mapping resolved from the header row
    pub columns: ColumnMap,
    /// Normalized rows, in source order
    pub rows: Vec<Row>,
    /// Rows whose date cell was absent or unparseable
    pub rows_without_date: usize,
}

/// Normalize a raw cell grid: the first row is the header, every later
/// row becomes one [`Row`] in source order.
pub fn normalize_grid(grid: &[Vec<String>]) -> NormalizedGrid {
    let Some((header, records)) = grid.split_first() else {
        return NormalizedGrid {
            columns: ColumnMap::default(),
            rows: Vec::new(),
            rows_without_date: 0,
        };
    };

    let columns = ColumnMap::detect(header);
    let mut rows = Vec::with_capacity(records.len());
    let mut rows_without_date = 0;

    for (position, record) in records.iter().enumerate() {
        let id = position as RowId;

        let date = match text_cell(record, columns.date) {
            Some(raw) => {
                let parsed = parse_date(&raw);
                if parsed.is_none() {
                    debug!(row = id, value = %raw, "unparseable date, row left out of the date index");
                }
                parsed
            }
            None => None,
        };
        if date.is_none() {
            rows_without_date += 1;
        }

        rows.push(Row {
            id,
            agent: text_cell(record, columns.agent),
            date,
            call_count: text_cell(record, columns.call_count)
                .and_then(|v| parse_count(&v))
                .unwrap_or(0),
            duration_secs: text_cell(record, columns.duration)
                .and_then(|v| parse_duration_secs(&v))
                .unwrap_or(0),
            status: text_cell(record, columns.status),
            queue: text_cell(record, columns.queue),
            satisfaction: text_cell(record, columns.satisfaction)
                .and_then(|v| parse_satisfaction(&v)),
        });
    }

    NormalizedGrid {
        columns,
        rows,
        rows_without_date,
    }
}

/// Trimmed, non-empty cell content at the mapped column
fn text_cell(record: &[String], column: Option<usize>) -> Option<String> {
    column
        .and_then(|index| record.get(index))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }

    None
}

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+):(\d{1,2})(?::(\d{1,2}))?$").expect("valid duration pattern")
    })
}

/// Parse a duration cell: either a colon-delimited time (`HH:MM:SS` or
/// `MM:SS`) or a raw number of seconds.
pub(crate) fn parse_duration_secs(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(caps) = duration_pattern().captures(value) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        return match caps.get(3) {
            Some(third) => {
                let third: u32 = third.as_str().parse().ok()?;
                Some(first * 3600 + second * 60 + third)
            }
            None => Some(first * 60 + second),
        };
    }

    value.parse().ok()
}

pub(crate) fn parse_count(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

/// Parse a satisfaction score, accepting both dot and comma decimals
pub(crate) fn parse_satisfaction(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value
        .parse()
        .ok()
        .or_else(|| value.replace(',', ".").parse().ok())
}

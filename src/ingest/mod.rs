//! Dataset ingestion
//!
//! Turns an already-tokenized grid of raw string cells (first row
//! treated as headers) into normalized [`Row`](crate::dataset::Row)
//! values:
//!
//! - [`ColumnMap`]: resolves which column feeds each semantic field
//! - [`normalize_grid`]: converts data rows, degrading unparseable
//!   values to field defaults instead of failing
//! - [`read_grid`] / [`read_grid_str`]: CSV adapter producing the grid

mod columns;
mod csv_import;
mod rows;

pub use columns::ColumnMap;
pub use csv_import::{read_grid, read_grid_str, GridReadResult};
pub use rows::{normalize_grid, NormalizedGrid};

use thiserror::Error;

/// Errors from the file-reading side of ingestion.
///
/// Value-level problems (unparseable dates, durations, scores) are
/// never errors; they degrade the affected row field instead.
#[derive(Error, Debug)]
pub enum IngestError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

//! Dataset store
//!
//! Owns the current immutable dataset and its indices. Replacement is
//! wholesale: a new ingestion builds the indices to completion, then
//! swaps rows, column mapping and indices in one step and bumps the
//! dataset generation. Readers holding the store across a swap never
//! observe a mix of old rows and new indices.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::index::IndexSet;
use crate::ingest::ColumnMap;

use super::{Row, RowId};

/// The single owned dataset of the engine, plus its derived indices.
#[derive(Debug, Default)]
pub struct DatasetStore {
    rows: Vec<Row>,
    columns: ColumnMap,
    indices: IndexSet,
    generation: u64,
    loaded_at: Option<DateTime<Utc>>,
}

impl DatasetStore {
    /// Create an empty store with nothing loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly ingested dataset.
    ///
    /// Indices are built to completion before any field is assigned, so
    /// no caller can observe a partial index. Returns the new dataset
    /// generation.
    pub fn replace(&mut self, columns: ColumnMap, rows: Vec<Row>) -> u64 {
        let indices = IndexSet::build(&rows);
        self.rows = rows;
        self.columns = columns;
        self.indices = indices;
        self.generation += 1;
        self.loaded_at = Some(Utc::now());
        info!(
            generation = self.generation,
            rows = self.rows.len(),
            "dataset replaced"
        );
        self.generation
    }

    /// Drop the dataset and all indices unconditionally.
    ///
    /// The generation still advances so cached results from the dropped
    /// dataset can never be served again.
    pub fn clear(&mut self) {
        self.rows = Vec::new();
        self.columns = ColumnMap::default();
        self.indices = IndexSet::default();
        self.generation += 1;
        self.loaded_at = None;
        info!(generation = self.generation, "dataset cleared");
    }

    /// Whether a dataset is currently loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    /// Monotonically increasing id of the loaded dataset
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// When the current dataset was loaded
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// All rows, in source order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Look up one row by id
    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.get(id as usize)
    }

    /// Number of loaded rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the row collection is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The column mapping resolved at ingestion
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// The secondary indices over the current dataset
    pub fn indices(&self) -> &IndexSet {
        &self.indices
    }

    /// Distinct agent keys currently indexed, sorted
    pub fn available_agents(&self) -> Vec<String> {
        self.indices.agents().keys()
    }

    /// Earliest and latest parseable dates across all rows
    pub fn available_periods(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.indices.dates().bounds()
    }
}

//! Engine facade
//!
//! Owns the dataset store and the result cache and wires them together:
//! every query dispatches through the cache, every ingestion swaps the
//! dataset wholesale and invalidates the cache.
//!
//! Ingestion and `clear` take `&mut self`, so a dataset swap is
//! exclusive; queries take `&self` and may run in parallel against one
//! dataset generation. Racing cache writes for the same descriptor are
//! benign: both hold equivalent results for the same generation, and
//! generation tags keep a write from a superseded dataset from ever
//! being served.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::ResultCache;
use crate::config::EngineConfig;
use crate::dataset::DatasetStore;
use crate::index::IndexStats;
use crate::ingest::{normalize_grid, ColumnMap};
use crate::query::{EngineError, EngineResult, QueryDescriptor, QueryEngine, QueryResponse};

/// Diagnostic snapshot of the engine. No behavioral contract.
#[derive(Debug, Clone, Serialize)]
pub struct EngineInfo {
    pub loaded: bool,
    pub row_count: usize,
    pub columns: ColumnMap,
    pub generation: u64,
    pub loaded_at: Option<DateTime<Utc>>,
    pub index_stats: IndexStats,
    pub cache_entries: usize,
}

/// Outcome of one ingestion.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub rows_loaded: usize,
    /// Rows present in the store but left out of the date index
    pub rows_without_date: usize,
    pub columns: ColumnMap,
}

/// The analytics engine: dataset store, indices and result cache.
pub struct AnalyticsEngine {
    store: DatasetStore,
    cache: Mutex<ResultCache>,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            store: DatasetStore::new(),
            cache: Mutex::new(ResultCache::new(
                Duration::from_secs(config.cache_ttl_secs),
                config.cache_capacity,
            )),
        }
    }

    /// Ingest a raw cell grid (first row treated as headers), replacing
    /// any previously loaded dataset and invalidating the cache.
    pub fn ingest(&mut self, grid: &[Vec<String>]) -> IngestReport {
        let normalized = normalize_grid(grid);
        let rows_loaded = normalized.rows.len();
        let columns = normalized.columns.clone();

        self.store.replace(normalized.columns, normalized.rows);
        self.cache_lock().invalidate_all();
        info!(
            rows = rows_loaded,
            skipped_dates = normalized.rows_without_date,
            generation = self.store.generation(),
            "dataset ingested"
        );

        IngestReport {
            rows_loaded,
            rows_without_date: normalized.rows_without_date,
            columns,
        }
    }

    /// Metrics for one agent, optionally bounded to `[start, end]`
    pub fn query_by_agent(
        &self,
        agent: &str,
        bounds: Option<(NaiveDate, NaiveDate)>,
    ) -> EngineResult<QueryResponse> {
        let descriptor = match bounds {
            Some((start, end)) => QueryDescriptor::agent_in_range(agent, start, end),
            None => QueryDescriptor::agent(agent),
        };
        self.query(&descriptor)
    }

    /// Metrics for every call in `[start, end]`, optionally restricted
    /// to one agent
    pub fn query_by_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        agent_filter: Option<&str>,
    ) -> EngineResult<QueryResponse> {
        let descriptor = match agent_filter {
            Some(agent) => QueryDescriptor::period_for_agent(start, end, agent),
            None => QueryDescriptor::period(start, end),
        };
        self.query(&descriptor)
    }

    /// Dispatch a descriptor through the cache.
    ///
    /// Fails fast with [`EngineError::NoDataset`] when nothing has been
    /// ingested; every other input resolves to a well-formed response.
    pub fn query(&self, descriptor: &QueryDescriptor) -> EngineResult<QueryResponse> {
        if !self.store.is_loaded() {
            return Err(EngineError::NoDataset);
        }

        let generation = self.store.generation();
        let key = descriptor.cache_key();

        if let Some(hit) = self.cache_lock().get(&key, generation) {
            debug!(key = %key, "cache hit");
            return Ok(hit);
        }
        debug!(key = %key, "cache miss");

        let response = QueryEngine::new(&self.store).run(descriptor);
        self.cache_lock().put(key, response.clone(), generation);
        Ok(response)
    }

    /// Diagnostic snapshot
    pub fn info(&self) -> EngineInfo {
        EngineInfo {
            loaded: self.store.is_loaded(),
            row_count: self.store.len(),
            columns: self.store.columns().clone(),
            generation: self.store.generation(),
            loaded_at: self.store.loaded_at(),
            index_stats: self.store.indices().stats(),
            cache_entries: self.cache_lock().len(),
        }
    }

    /// Distinct agent keys currently indexed, sorted
    pub fn available_agents(&self) -> Vec<String> {
        self.store.available_agents()
    }

    /// Earliest and latest parseable dates across all rows
    pub fn available_periods(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.store.available_periods()
    }

    /// Drop the dataset, all indices and the cache unconditionally
    pub fn clear(&mut self) {
        self.store.clear();
        self.cache_lock().invalidate_all();
        info!("engine cleared");
    }

    /// A poisoned lock still holds a consistent cache; recover the guard.
    fn cache_lock(&self) -> MutexGuard<'_, ResultCache> {
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_grid() -> Vec<Vec<String>> {
        grid(&[
            &["Agent", "Date", "Calls", "Duration", "Status", "Queue", "Rating"],
            &["Ana", "2024-01-01", "3", "00:05:00", "attended", "support", "4.5"],
            &["Ana", "2024-01-02", "2", "00:02:00", "abandoned", "support", ""],
            &["Bruno", "2024-01-01", "1", "120", "attended", "sales", "3.0"],
            &["Carla", "someday", "4", "00:01:00", "attended", "sales", "5.0"],
        ])
    }

    fn loaded_engine() -> AnalyticsEngine {
        let mut engine = AnalyticsEngine::new();
        engine.ingest(&sample_grid());
        engine
    }

    #[test]
    fn test_query_before_ingest_fails_fast() {
        let engine = AnalyticsEngine::new();
        assert!(matches!(
            engine.query_by_agent("ana", None),
            Err(EngineError::NoDataset)
        ));
        assert!(matches!(
            engine.query_by_period(date(2024, 1, 1), date(2024, 1, 2), None),
            Err(EngineError::NoDataset)
        ));
    }

    #[test]
    fn test_agent_metrics_over_two_days() {
        let mut engine = AnalyticsEngine::new();
        engine.ingest(&grid(&[
            &["Agent", "Date", "Calls", "Duration", "Status"],
            &["Ana", "2024-01-01", "3", "00:05:00", "attended"],
            &["Ana", "2024-01-02", "2", "00:02:00", "abandoned"],
        ]));

        let response = engine.query_by_agent("Ana", None).unwrap();
        assert_eq!(response.metrics.total_calls, 5);
        assert_eq!(response.metrics.attended, 1);
        assert_eq!(response.metrics.abandoned, 1);
        assert_eq!(response.metrics.mean_attended_duration_secs, 300.0);
        assert_eq!(response.metrics.daily.len(), 2);
    }

    #[test]
    fn test_unknown_agent_yields_empty_result() {
        let engine = loaded_engine();
        let response = engine.query_by_agent("nobody", None).unwrap();

        assert!(response.row_ids.is_empty());
        assert_eq!(response.metrics.total_calls, 0);
        assert!(response.metrics.status_counts.is_empty());
    }

    #[test]
    fn test_filter_order_independence() {
        let engine = loaded_engine();
        let start = date(2024, 1, 1);
        let end = date(2024, 1, 2);

        let by_agent = engine.query_by_agent("Ana", Some((start, end))).unwrap();
        let by_period = engine.query_by_period(start, end, Some("Ana")).unwrap();
        assert_eq!(by_agent.row_ids, by_period.row_ids);
    }

    #[test]
    fn test_union_of_agent_queries_covers_all_agent_rows() {
        let engine = loaded_engine();

        let mut union: BTreeSet<u32> = BTreeSet::new();
        for agent in engine.available_agents() {
            union.extend(engine.query_by_agent(&agent, None).unwrap().row_ids);
        }
        assert_eq!(union.into_iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_repeated_query_is_served_from_cache() {
        let engine = loaded_engine();

        let first = engine.query_by_agent("Ana", None).unwrap();
        let second = engine.query_by_agent("Ana", None).unwrap();

        // Identical timestamps included: the second response is the
        // cached object, not a recomputation
        assert_eq!(first, second);
        assert_eq!(engine.info().cache_entries, 1);
    }

    #[test]
    fn test_reingest_invalidates_the_cache() {
        let mut engine = loaded_engine();
        let before = engine.query_by_agent("Ana", None).unwrap();
        assert_eq!(before.metrics.total_calls, 5);

        engine.ingest(&grid(&[
            &["Agent", "Date", "Calls", "Duration", "Status"],
            &["Ana", "2024-02-01", "7", "60", "attended"],
        ]));

        // Same descriptor, new dataset
        let after = engine.query_by_agent("Ana", None).unwrap();
        assert_eq!(after.metrics.total_calls, 7);
    }

    #[test]
    fn test_reingesting_the_same_dataset_is_idempotent() {
        let mut engine = AnalyticsEngine::new();
        engine.ingest(&sample_grid());
        let first = engine.query_by_agent("Ana", None).unwrap();

        engine.ingest(&sample_grid());
        let second = engine.query_by_agent("Ana", None).unwrap();

        assert_eq!(first.row_ids, second.row_ids);
        assert_eq!(first.metrics, second.metrics);
    }

    #[test]
    fn test_rows_with_bad_dates_stay_reachable_by_agent() {
        let engine = loaded_engine();

        let response = engine.query_by_agent("Carla", None).unwrap();
        assert_eq!(response.row_ids, vec![3]);
        assert_eq!(response.metrics.total_calls, 4);

        // But the date index never sees them
        assert_eq!(
            engine.available_periods(),
            Some((date(2024, 1, 1), date(2024, 1, 2)))
        );
    }

    #[test]
    fn test_info_reflects_the_loaded_dataset() {
        let engine = loaded_engine();
        let info = engine.info();

        assert!(info.loaded);
        assert_eq!(info.row_count, 4);
        assert_eq!(info.generation, 1);
        assert_eq!(info.index_stats.agents, 3);
        assert_eq!(info.index_stats.days, 2);
        assert_eq!(info.columns.agent, Some(0));
        assert_eq!(info.cache_entries, 0);
    }

    #[test]
    fn test_ingest_report() {
        let mut engine = AnalyticsEngine::new();
        let report = engine.ingest(&sample_grid());

        assert_eq!(report.rows_loaded, 4);
        assert_eq!(report.rows_without_date, 1);
        assert_eq!(report.columns.satisfaction, Some(6));
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut engine = loaded_engine();
        engine.query_by_agent("Ana", None).unwrap();

        engine.clear();

        let info = engine.info();
        assert!(!info.loaded);
        assert_eq!(info.row_count, 0);
        assert_eq!(info.cache_entries, 0);
        assert!(engine.available_agents().is_empty());
        assert!(matches!(
            engine.query_by_agent("Ana", None),
            Err(EngineError::NoDataset)
        ));
    }

    #[test]
    fn test_available_agents_and_periods() {
        let engine = loaded_engine();

        assert_eq!(engine.available_agents(), vec!["ana", "bruno", "carla"]);
        assert_eq!(
            engine.available_periods(),
            Some((date(2024, 1, 1), date(2024, 1, 2)))
        );
    }

    #[test]
    fn test_period_query_includes_agent_breakdown() {
        let engine = loaded_engine();
        let response = engine
            .query_by_period(date(2024, 1, 1), date(2024, 1, 2), None)
            .unwrap();

        let by_agent = response.metrics.by_agent.expect("period breakdown");
        assert_eq!(by_agent["ana"].calls, 5);
        assert_eq!(by_agent["bruno"].calls, 1);
        // Carla's row has no parseable date and is out of any period
        assert!(!by_agent.contains_key("carla"));
    }
}

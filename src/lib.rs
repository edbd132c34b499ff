//! # Switchboard
//!
//! An in-memory analytics engine for call-center interaction records:
//! ingest a flat dataset, build secondary indices over it, and answer
//! aggregation queries ("metrics for agent X", "metrics for period P")
//! with sub-linear lookup and a time-bounded memoized cache.
//!
//! ## Features
//!
//! - **Tolerant ingestion**: headers are matched by synonym, bad cell
//!   values degrade the row instead of failing the load
//! - **Sub-linear queries**: four secondary indices resolved by set
//!   intersection
//! - **Single-pass aggregation**: totals, outcome counts, histograms
//!   and per-day / per-agent breakdowns in one streaming pass
//! - **Memoized results**: TTL + capacity bounded cache, invalidated
//!   whenever the dataset is replaced
//!
//! ## Modules
//!
//! - [`dataset`]: row model and the swappable dataset store
//! - [`ingest`]: column mapping, row normalization, CSV adapter
//! - [`index`]: the four secondary indices
//! - [`query`]: descriptors, index intersection, streaming aggregation
//! - [`cache`]: result memoization
//! - [`engine`]: the facade tying store and cache together
//!
//! ## Quick Start
//!
//! ```rust
//! use switchboard::AnalyticsEngine;
//!
//! let grid: Vec<Vec<String>> = [
//!     ["Agent", "Date", "Calls", "Duration", "Status"],
//!     ["Ana", "2024-01-01", "3", "00:05:00", "attended"],
//!     ["Ana", "2024-01-02", "2", "00:02:00", "abandoned"],
//! ]
//! .iter()
//! .map(|row| row.iter().map(|cell| cell.to_string()).collect())
//! .collect();
//!
//! let mut engine = AnalyticsEngine::new();
//! engine.ingest(&grid);
//!
//! let response = engine.query_by_agent("Ana", None)?;
//! assert_eq!(response.metrics.total_calls, 5);
//! assert_eq!(response.metrics.attended, 1);
//! # Ok::<(), switchboard::EngineError>(())
//! ```

pub mod cache;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod index;
pub mod ingest;
pub mod query;

// Re-export top-level types for convenience
pub use cache::ResultCache;

pub use config::{Config, ConfigError, EngineConfig, LoggingConfig};

pub use dataset::{DatasetStore, Row, RowId};

pub use engine::{AnalyticsEngine, EngineInfo, IngestReport};

pub use index::{IndexSet, IndexStats};

pub use ingest::{
    normalize_grid, read_grid, read_grid_str, ColumnMap, GridReadResult, IngestError,
    NormalizedGrid,
};

pub use query::{
    parse_query, AgentActivity, Aggregator, DailyActivity, DateRange, EngineError, EngineResult,
    Metrics, QueryDescriptor, QueryEngine, QueryResponse, QuerySummary,
};

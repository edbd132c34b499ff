//! Query engine
//!
//! Answers aggregation queries against the indexed dataset:
//!
//! - **descriptor**: canonicalized request shape, also the cache key
//! - **engine**: index lookup, set intersection and dispatch
//! - **aggregate**: single-pass streaming metric accumulation
//! - **parser**: query-string front end used by the CLI
//!
//! # Examples
//!
//! ```rust,ignore
//! use switchboard::query::{parse_query, QueryDescriptor, QueryEngine};
//!
//! // Programmatic descriptor
//! let descriptor = QueryDescriptor::agent("ana");
//! let response = QueryEngine::new(&store).run(&descriptor);
//!
//! // Parsed from a query string
//! let descriptor = parse_query("agent ana from 2024-01-01 to 2024-01-31")?;
//! ```

mod aggregate;
mod descriptor;
mod engine;
mod error;
mod parser;

pub use aggregate::{AgentActivity, Aggregator, DailyActivity, Metrics};
pub use descriptor::{DateRange, QueryDescriptor};
pub use engine::{QueryEngine, QueryResponse, QuerySummary};
pub use error::{EngineError, EngineResult};
pub use parser::parse_query;

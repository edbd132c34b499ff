//! Query engine
//!
//! Resolves a [`QueryDescriptor`] to the matching row-id set through
//! index lookup and set intersection, then streams the matched rows
//! through the [`Aggregator`].
//!
//! # Execution pipeline
//!
//! ```text
//! descriptor → index lookup → intersect → aggregate → response
//! ```
//!
//! Unknown agents and empty date ranges are serviced, not rejected:
//! they resolve to the empty row-id set, which aggregates to zeroed
//! metrics the caller can render directly.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::{DatasetStore, RowId};

use super::aggregate::{Aggregator, Metrics};
use super::descriptor::{DateRange, QueryDescriptor};

/// Full result of one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Matching row ids, ascending
    pub row_ids: Vec<RowId>,
    pub metrics: Metrics,
    pub summary: QuerySummary,
}

/// Summary block attached to every response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySummary {
    pub record_count: usize,
    /// The requested date bounds, or the observed bounds of the matched
    /// rows when the query carried none
    pub period: Option<DateRange>,
    pub computed_at: DateTime<Utc>,
}

/// Read-only query execution against one dataset generation.
pub struct QueryEngine<'a> {
    store: &'a DatasetStore,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a DatasetStore) -> Self {
        Self { store }
    }

    /// Row ids matching the descriptor.
    ///
    /// Intersection is order-independent: filtering by agent then date
    /// yields the same set as date then agent.
    pub fn resolve(&self, descriptor: &QueryDescriptor) -> BTreeSet<RowId> {
        let indices = self.store.indices();

        match descriptor {
            QueryDescriptor::Agent { agent, range } => {
                let base = indices
                    .agents()
                    .lookup(agent)
                    .cloned()
                    .unwrap_or_default();
                match range {
                    None => base,
                    Some(range) => {
                        let dated = indices.dates().collect_range(range.start, range.end);
                        base.intersection(&dated).copied().collect()
                    }
                }
            }
            QueryDescriptor::Period { range, agent } => {
                let dated = indices.dates().collect_range(range.start, range.end);
                match agent {
                    None => dated,
                    Some(agent) => {
                        let base = indices
                            .agents()
                            .lookup(agent)
                            .cloned()
                            .unwrap_or_default();
                        dated.intersection(&base).copied().collect()
                    }
                }
            }
        }
    }

    /// Resolve the descriptor and aggregate the matched rows in one
    /// streaming pass.
    pub fn run(&self, descriptor: &QueryDescriptor) -> QueryResponse {
        let ids = self.resolve(descriptor);
        let track_agents = matches!(descriptor, QueryDescriptor::Period { .. });

        let mut aggregator = Aggregator::new(track_agents);
        let mut observed: Option<DateRange> = None;
        for &id in &ids {
            if let Some(row) = self.store.row(id) {
                if let Some(date) = row.date {
                    observed = Some(match observed {
                        None => DateRange::new(date, date),
                        Some(bounds) => DateRange::new(
                            bounds.start.min(date),
                            bounds.end.max(date),
                        ),
                    });
                }
                aggregator.add(row);
            }
        }

        let period = descriptor.range().or(observed);
        QueryResponse {
            row_ids: ids.iter().copied().collect(),
            metrics: aggregator.finish(),
            summary: QuerySummary {
                record_count: ids.len(),
                period,
                computed_at: Utc::now(),
            },
        }
    }
}

//! Index construction
//!
//! Builds the four secondary indices over an ingested dataset in a
//! single O(n) pass. A build always runs to completion on a fresh value
//! before the dataset store swaps it in, so the query engine never
//! observes a partially built index.

use serde::Serialize;
use tracing::debug;

use crate::dataset::Row;

use super::{DateIndex, FieldIndex};

/// The four secondary indices over one dataset generation.
#[derive(Debug, Clone, Default)]
pub struct IndexSet {
    agents: FieldIndex,
    dates: DateIndex,
    statuses: FieldIndex,
    queues: FieldIndex,
}

impl IndexSet {
    /// Build all four indices from the row sequence in one pass.
    ///
    /// A row contributes to an index only when it has a non-empty value
    /// for that field; rows with an unparseable date are left out of
    /// the date index but stay reachable through the other three.
    pub fn build(rows: &[Row]) -> Self {
        let mut set = IndexSet::default();

        for row in rows {
            if let Some(agent) = row.agent_key() {
                set.agents.insert(&agent, row.id);
            }
            if let Some(date) = row.date {
                set.dates.insert(date, row.id);
            }
            if let Some(status) = row.status_key() {
                set.statuses.insert(&status, row.id);
            }
            if let Some(queue) = row.queue_key() {
                set.queues.insert(&queue, row.id);
            }
        }

        debug!(
            rows = rows.len(),
            agents = set.agents.len(),
            days = set.dates.len(),
            "indices built"
        );
        set
    }

    /// agent key → row ids
    pub fn agents(&self) -> &FieldIndex {
        &self.agents
    }

    /// calendar day → row ids
    pub fn dates(&self) -> &DateIndex {
        &self.dates
    }

    /// status key → row ids
    pub fn statuses(&self) -> &FieldIndex {
        &self.statuses
    }

    /// queue key → row ids
    pub fn queues(&self) -> &FieldIndex {
        &self.queues
    }

    /// Size counters for diagnostics
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            agents: self.agents.len(),
            days: self.dates.len(),
            statuses: self.statuses.len(),
            queues: self.queues.len(),
        }
    }
}

/// Distinct key counts per index, diagnostic only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub agents: usize,
    pub days: usize,
    pub statuses: usize,
    pub queues: usize,
}

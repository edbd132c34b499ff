//! Core data types for the analytics dataset
//!
//! A [`Row`] is one normalized call record. Rows are write-once: once
//! ingested they are never mutated, and a new ingestion replaces the
//! entire collection together with every derived structure.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a row within the current dataset.
///
/// Assigned in source order at ingestion, stable until the dataset is
/// replaced.
pub type RowId = u32;

/// One normalized call record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Row {
    /// Stable identifier, assigned in source order
    pub id: RowId,
    /// Agent handling the call, as written in the source file
    pub agent: Option<String>,
    /// Calendar day of the call, when parseable
    pub date: Option<NaiveDate>,
    /// Number of calls this record accounts for
    #[serde(default)]
    pub call_count: u32,
    /// Total duration in seconds
    #[serde(default)]
    pub duration_secs: u32,
    /// Call outcome, free text
    pub status: Option<String>,
    /// Queue or group the call arrived on
    pub queue: Option<String>,
    /// Satisfaction score, when present and numeric
    pub satisfaction: Option<f64>,
}

impl Row {
    /// Create an empty row with the given id
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            agent: None,
            date: None,
            call_count: 0,
            duration_secs: 0,
            status: None,
            queue: None,
            satisfaction: None,
        }
    }

    /// Builder method: set the agent
    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    /// Builder method: set the call date
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Builder method: set the call count
    pub fn calls(mut self, count: u32) -> Self {
        self.call_count = count;
        self
    }

    /// Builder method: set the duration in seconds
    pub fn duration(mut self, secs: u32) -> Self {
        self.duration_secs = secs;
        self
    }

    /// Builder method: set the status
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Builder method: set the queue
    pub fn queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }

    /// Builder method: set the satisfaction score
    pub fn satisfaction(mut self, score: f64) -> Self {
        self.satisfaction = Some(score);
        self
    }

    /// Normalized agent key used for index lookups and matching
    pub fn agent_key(&self) -> Option<String> {
        normalized_key(self.agent.as_deref())
    }

    /// Normalized status key used for index lookups and matching
    pub fn status_key(&self) -> Option<String> {
        normalized_key(self.status.as_deref())
    }

    /// Queue key, matched verbatim (trimmed only)
    pub fn queue_key(&self) -> Option<String> {
        self.queue
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string)
    }
}

fn normalized_key(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

//! Column Mapper
//!
//! Inspects the header row of an ingested grid and resolves which
//! column position feeds each semantic field of the row model.
//! Matching is case-insensitive substring matching against a fixed
//! synonym list per field; when two headers match the same field, the
//! first occurrence wins.
//!
//! Unmapped fields are not an error: the corresponding row field stays
//! empty or zero for every row, which degrades the derived metrics
//! gracefully instead of failing ingestion.

use serde::Serialize;

const AGENT_SYNONYMS: &[&str] = &["agent", "operator", "attendant"];
const DATE_SYNONYMS: &[&str] = &["date", "day"];
const CALL_COUNT_SYNONYMS: &[&str] = &["call", "qty", "quantity"];
const DURATION_SYNONYMS: &[&str] = &["duration", "time", "talk"];
const STATUS_SYNONYMS: &[&str] = &["status", "state", "outcome", "result"];
const QUEUE_SYNONYMS: &[&str] = &["queue", "group", "campaign"];
const SATISFACTION_SYNONYMS: &[&str] = &["satisfaction", "rating", "score", "csat"];

/// Resolved column position per semantic field.
///
/// `None` means no header matched that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub agent: Option<usize>,
    pub date: Option<usize>,
    pub call_count: Option<usize>,
    pub duration: Option<usize>,
    pub status: Option<usize>,
    pub queue: Option<usize>,
    pub satisfaction: Option<usize>,
}

impl ColumnMap {
    /// Resolve the mapping from a header row.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Self {
        let lowered: Vec<String> = headers
            .iter()
            .map(|h| h.as_ref().trim().to_lowercase())
            .collect();

        Self {
            agent: find_column(&lowered, AGENT_SYNONYMS),
            date: find_column(&lowered, DATE_SYNONYMS),
            call_count: find_column(&lowered, CALL_COUNT_SYNONYMS),
            duration: find_column(&lowered, DURATION_SYNONYMS),
            status: find_column(&lowered, STATUS_SYNONYMS),
            queue: find_column(&lowered, QUEUE_SYNONYMS),
            satisfaction: find_column(&lowered, SATISFACTION_SYNONYMS),
        }
    }

    /// Number of fields that resolved to a column
    pub fn mapped_count(&self) -> usize {
        [
            self.agent,
            self.date,
            self.call_count,
            self.duration,
            self.status,
            self.queue,
            self.satisfaction,
        ]
        .iter()
        .filter(|c| c.is_some())
        .count()
    }
}

fn find_column(headers: &[String], synonyms: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|header| synonyms.iter().any(|synonym| header.contains(synonym)))
}

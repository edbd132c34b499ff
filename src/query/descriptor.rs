//! Query descriptors
//!
//! The canonicalized request shape, used both to dispatch queries and
//! as the cache key. Canonicalization happens at construction: agent
//! names are trimmed and lower-cased, dates are whole calendar days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive calendar-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// An inverted range matches nothing; it is not an error
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// A canonicalized query request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryDescriptor {
    /// All rows for one agent, optionally bounded to a date range
    Agent {
        agent: String,
        range: Option<DateRange>,
    },
    /// All rows in a date range, optionally restricted to one agent
    Period {
        range: DateRange,
        agent: Option<String>,
    },
}

impl QueryDescriptor {
    /// Every row for `name`
    pub fn agent(name: &str) -> Self {
        Self::Agent {
            agent: canonical_agent(name),
            range: None,
        }
    }

    /// Rows for `name` within `[start, end]`
    pub fn agent_in_range(name: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self::Agent {
            agent: canonical_agent(name),
            range: Some(DateRange::new(start, end)),
        }
    }

    /// Every row within `[start, end]`
    pub fn period(start: NaiveDate, end: NaiveDate) -> Self {
        Self::Period {
            range: DateRange::new(start, end),
            agent: None,
        }
    }

    /// Rows within `[start, end]` restricted to one agent
    pub fn period_for_agent(start: NaiveDate, end: NaiveDate, agent: &str) -> Self {
        Self::Period {
            range: DateRange::new(start, end),
            agent: Some(canonical_agent(agent)),
        }
    }

    /// The date bounds this descriptor carries, if any
    pub fn range(&self) -> Option<DateRange> {
        match self {
            Self::Agent { range, .. } => *range,
            Self::Period { range, .. } => Some(*range),
        }
    }

    /// Deterministic serialization used as the cache key.
    ///
    /// Two descriptors produce the same key exactly when they describe
    /// the same canonicalized request.
    pub fn cache_key(&self) -> String {
        match self {
            Self::Agent { agent, range: None } => format!("agent={agent}"),
            Self::Agent {
                agent,
                range: Some(range),
            } => format!("agent={agent}|from={}|to={}", range.start, range.end),
            Self::Period { range, agent: None } => {
                format!("period|from={}|to={}", range.start, range.end)
            }
            Self::Period {
                range,
                agent: Some(agent),
            } => format!(
                "period|from={}|to={}|agent={agent}",
                range.start, range.end
            ),
        }
    }
}

fn canonical_agent(name: &str) -> String {
    name.trim().to_lowercase()
}

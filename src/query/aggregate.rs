//! Streaming metrics aggregation
//!
//! A single pass over the resolved row set accumulates every metric the
//! caller renders; the per-day and per-agent breakdowns are filled in
//! the same pass, never by a second iteration. Derived means are
//! computed once at the end, and a zero denominator yields 0 rather
//! than a division error.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::Row;

/// Per-day slice of activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub calls: u64,
    pub duration_secs: u64,
}

/// Per-agent slice of activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentActivity {
    pub calls: u64,
    pub duration_secs: u64,
    pub mean_satisfaction: f64,
}

/// Summary metrics over one resolved row set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_calls: u64,
    pub total_duration_secs: u64,
    /// Rows whose status reads as answered
    pub attended: u64,
    /// Rows whose status reads as given up
    pub abandoned: u64,
    /// Mean duration of the attended rows; 0 when none were attended
    pub mean_attended_duration_secs: f64,
    /// Mean over rows carrying a numeric satisfaction score; 0 when none do
    pub mean_satisfaction: f64,
    /// status key → row count, every status included
    pub status_counts: HashMap<String, u64>,
    /// queue key → row count
    pub queue_counts: HashMap<String, u64>,
    /// Activity per calendar day, for rows with a parseable date
    pub daily: BTreeMap<NaiveDate, DailyActivity>,
    /// Activity per agent; populated for period queries only
    pub by_agent: Option<BTreeMap<String, AgentActivity>>,
}

/// Call outcome derived from the status text.
enum Outcome {
    Attended,
    Abandoned,
    Other,
}

/// Statuses are free text; bucketing is by substring so spelling
/// variants land in the right outcome. Unmatched statuses count only
/// in the histogram.
fn classify(status: &str) -> Outcome {
    if status.contains("atend") || status.contains("attend") || status.contains("success") {
        Outcome::Attended
    } else if status.contains("abandon") || status.contains("lost") {
        Outcome::Abandoned
    } else {
        Outcome::Other
    }
}

#[derive(Default)]
struct AgentAcc {
    calls: u64,
    duration_secs: u64,
    satisfaction_sum: f64,
    satisfaction_count: u64,
}

/// Single-pass accumulator producing [`Metrics`].
pub struct Aggregator {
    metrics: Metrics,
    attended_duration_secs: u64,
    satisfaction_sum: f64,
    satisfaction_count: u64,
    agents: Option<BTreeMap<String, AgentAcc>>,
}

impl Aggregator {
    /// `track_agents` enables the per-agent breakdown, used by period
    /// queries.
    pub fn new(track_agents: bool) -> Self {
        Self {
            metrics: Metrics::default(),
            attended_duration_secs: 0,
            satisfaction_sum: 0.0,
            satisfaction_count: 0,
            agents: track_agents.then(BTreeMap::new),
        }
    }

    /// Fold one row into every accumulator
    pub fn add(&mut self, row: &Row) {
        let calls = u64::from(row.call_count);
        let duration = u64::from(row.duration_secs);

        self.metrics.total_calls += calls;
        self.metrics.total_duration_secs += duration;

        if let Some(status) = row.status_key() {
            match classify(&status) {
                Outcome::Attended => {
                    self.metrics.attended += 1;
                    self.attended_duration_secs += duration;
                }
                Outcome::Abandoned => self.metrics.abandoned += 1,
                Outcome::Other => {}
            }
            *self.metrics.status_counts.entry(status).or_insert(0) += 1;
        }

        if let Some(queue) = row.queue_key() {
            *self.metrics.queue_counts.entry(queue).or_insert(0) += 1;
        }

        if let Some(score) = row.satisfaction {
            self.satisfaction_sum += score;
            self.satisfaction_count += 1;
        }

        if let Some(date) = row.date {
            let day = self.metrics.daily.entry(date).or_default();
            day.calls += calls;
            day.duration_secs += duration;
        }

        if let Some(agents) = &mut self.agents {
            if let Some(agent) = row.agent_key() {
                let acc = agents.entry(agent).or_default();
                acc.calls += calls;
                acc.duration_secs += duration;
                if let Some(score) = row.satisfaction {
                    acc.satisfaction_sum += score;
                    acc.satisfaction_count += 1;
                }
            }
        }
    }

    /// Compute the derived means and return the finished metrics
    pub fn finish(mut self) -> Metrics {
        self.metrics.mean_attended_duration_secs =
            mean(self.attended_duration_secs as f64, self.metrics.attended);
        self.metrics.mean_satisfaction = mean(self.satisfaction_sum, self.satisfaction_count);
        self.metrics.by_agent = self.agents.map(|agents| {
            agents
                .into_iter()
                .map(|(name, acc)| {
                    (
                        name,
                        AgentActivity {
                            calls: acc.calls,
                            duration_secs: acc.duration_secs,
                            mean_satisfaction: mean(acc.satisfaction_sum, acc.satisfaction_count),
                        },
                    )
                })
                .collect()
        });
        self.metrics
    }
}

fn mean(sum: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_aggregation_is_all_zeros() {
        let metrics = Aggregator::new(false).finish();

        assert_eq!(metrics.total_calls, 0);
        assert_eq!(metrics.total_duration_secs, 0);
        assert_eq!(metrics.attended, 0);
        assert_eq!(metrics.abandoned, 0);
        assert_eq!(metrics.mean_attended_duration_secs, 0.0);
        assert_eq!(metrics.mean_satisfaction, 0.0);
        assert!(metrics.status_counts.is_empty());
        assert!(metrics.daily.is_empty());
        assert!(metrics.by_agent.is_none());
    }

    #[test]
    fn test_totals_and_histograms() {
        let mut agg = Aggregator::new(false);
        agg.add(&Row::new(0).calls(3).duration(300).status("attended").queue("support"));
        agg.add(&Row::new(1).calls(2).duration(120).status("abandoned").queue("support"));
        agg.add(&Row::new(2).calls(1).duration(60).status("voicemail").queue("sales"));
        let metrics = agg.finish();

        assert_eq!(metrics.total_calls, 6);
        assert_eq!(metrics.total_duration_secs, 480);
        assert_eq!(metrics.attended, 1);
        assert_eq!(metrics.abandoned, 1);
        // "voicemail" counts only in the histogram
        assert_eq!(metrics.status_counts.len(), 3);
        assert_eq!(metrics.status_counts["voicemail"], 1);
        assert_eq!(metrics.queue_counts["support"], 2);
        assert_eq!(metrics.queue_counts["sales"], 1);
    }

    #[test]
    fn test_status_substring_variants() {
        let mut agg = Aggregator::new(false);
        agg.add(&Row::new(0).status("Atendida"));
        agg.add(&Row::new(1).status("call attended ok"));
        agg.add(&Row::new(2).status("SUCCESS"));
        agg.add(&Row::new(3).status("Abandonada"));
        agg.add(&Row::new(4).status("lost in queue"));
        let metrics = agg.finish();

        assert_eq!(metrics.attended, 3);
        assert_eq!(metrics.abandoned, 2);
    }

    #[test]
    fn test_mean_attended_duration_uses_attended_rows_only() {
        let mut agg = Aggregator::new(false);
        agg.add(&Row::new(0).duration(300).status("attended"));
        agg.add(&Row::new(1).duration(120).status("abandoned"));
        let metrics = agg.finish();

        assert_eq!(metrics.total_duration_secs, 420);
        assert_eq!(metrics.mean_attended_duration_secs, 300.0);
    }

    #[test]
    fn test_rows_without_satisfaction_are_excluded_from_the_mean() {
        let mut agg = Aggregator::new(false);
        agg.add(&Row::new(0).calls(1).satisfaction(4.0));
        agg.add(&Row::new(1).calls(1).satisfaction(2.0));
        agg.add(&Row::new(2).calls(1));
        let metrics = agg.finish();

        assert_eq!(metrics.total_calls, 3);
        assert_eq!(metrics.mean_satisfaction, 3.0);
    }

    #[test]
    fn test_daily_evolution_accumulates_per_day() {
        let mut agg = Aggregator::new(false);
        agg.add(&Row::new(0).calls(3).duration(300).date(date(2024, 1, 1)));
        agg.add(&Row::new(1).calls(2).duration(100).date(date(2024, 1, 1)));
        agg.add(&Row::new(2).calls(1).duration(60).date(date(2024, 1, 2)));
        agg.add(&Row::new(3).calls(9).duration(9));
        let metrics = agg.finish();

        assert_eq!(metrics.daily.len(), 2);
        let first = metrics.daily[&date(2024, 1, 1)];
        assert_eq!(first.calls, 5);
        assert_eq!(first.duration_secs, 400);
    }

    #[test]
    fn test_agent_breakdown_only_when_tracked() {
        let mut agg = Aggregator::new(true);
        agg.add(&Row::new(0).agent("Ana").calls(3).duration(300).satisfaction(5.0));
        agg.add(&Row::new(1).agent("ana").calls(2).duration(100).satisfaction(3.0));
        agg.add(&Row::new(2).agent("Bruno").calls(1).duration(60));
        let metrics = agg.finish();

        let by_agent = metrics.by_agent.unwrap();
        assert_eq!(by_agent.len(), 2);
        let ana = by_agent["ana"];
        assert_eq!(ana.calls, 5);
        assert_eq!(ana.duration_secs, 400);
        assert_eq!(ana.mean_satisfaction, 4.0);
        assert_eq!(by_agent["bruno"].mean_satisfaction, 0.0);
    }
}

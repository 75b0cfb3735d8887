//! Per-bucket summarisation of the daily log.
//!
//! Groups normalised day records by date, week label, or month and
//! reduces each bucket to the dashboard's summary columns: null-skipping
//! means, a step total, and lifting/conditioning day counts.

use std::collections::HashMap;

use fitdash_core::models::{
    DayRecord, Granularity, StepsRounding, SummaryRow, WeeklySummaryRow,
};
use fitdash_core::numeric::{mean, round1, round_whole};
use tracing::debug;

// ── MetricBucket ──────────────────────────────────────────────────────────────

/// Values logged within one bucket, kept raw so both means and spreads
/// can be taken later.
#[derive(Debug, Clone, Default)]
pub(crate) struct MetricBucket {
    pub(crate) weight: Vec<f64>,
    pub(crate) calories: Vec<f64>,
    pub(crate) protein: Vec<f64>,
    pub(crate) steps: Vec<f64>,
    steps_total: i64,
    pub(crate) lifting_days: u32,
    pub(crate) conditioning_days: u32,
}

impl MetricBucket {
    /// Fold one day into the bucket. Missing cells contribute nothing.
    pub(crate) fn add_record(&mut self, record: &DayRecord) {
        if let Some(w) = record.weight {
            self.weight.push(w);
        }
        if let Some(c) = record.calories {
            self.calories.push(c);
        }
        if let Some(p) = record.protein {
            self.protein.push(p);
        }
        if let Some(s) = record.steps {
            self.steps.push(s as f64);
            self.steps_total += s;
        }
        if record.workout.is_some() {
            self.lifting_days += 1;
        }
        if record.conditioning.is_some() {
            self.conditioning_days += 1;
        }
    }

    /// Total steps, `None` when no row in the bucket logged steps.
    pub(crate) fn steps_total(&self) -> Option<i64> {
        if self.steps.is_empty() {
            None
        } else {
            Some(self.steps_total)
        }
    }
}

// ── Grouping ──────────────────────────────────────────────────────────────────

/// Group records into buckets keyed by the granularity.
///
/// Buckets come back in the order the log first mentions them; week
/// labels are free text, so the log's own order is the only meaningful
/// one. Records with no bucket (week view, rows before the first week
/// label) are left out.
pub(crate) fn group_by_bucket(
    records: &[DayRecord],
    granularity: Granularity,
) -> Vec<(String, MetricBucket)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, MetricBucket)> = Vec::new();

    let mut unbucketed = 0usize;
    for record in records {
        let Some(key) = granularity.bucket_key(record) else {
            unbucketed += 1;
            continue;
        };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            buckets.push((key, MetricBucket::default()));
            buckets.len() - 1
        });
        buckets[slot].1.add_record(record);
    }

    if unbucketed > 0 {
        debug!(
            "{} record(s) had no {} bucket",
            unbucketed,
            granularity.as_str()
        );
    }

    buckets
}

// ── Summaries ─────────────────────────────────────────────────────────────────

/// Summarise the log at the given granularity.
///
/// Every mean skips missing cells and is rounded to one decimal. A
/// bucket where nobody logged steps reports no step total at all,
/// never a zero.
pub fn summarize(records: &[DayRecord], granularity: Granularity) -> Vec<SummaryRow> {
    group_by_bucket(records, granularity)
        .into_iter()
        .map(|(bucket, acc)| SummaryRow {
            bucket,
            weight: mean(&acc.weight).map(round1),
            calories: mean(&acc.calories).map(round1),
            protein: mean(&acc.protein).map(round1),
            steps_mean: mean(&acc.steps).map(round1),
            steps_total: acc.steps_total(),
            lifting_days: acc.lifting_days,
            conditioning_days: acc.conditioning_days,
        })
        .collect()
}

/// Build the weekly progress table.
///
/// The `weight_loss` column is the difference between consecutive
/// weekly means, taken after rounding so the delta always matches the
/// weights the table shows.
pub fn weekly_summary(records: &[DayRecord], rounding: StepsRounding) -> Vec<WeeklySummaryRow> {
    let buckets = group_by_bucket(records, Granularity::Week);

    let mut rows = Vec::with_capacity(buckets.len());
    let mut previous_weight: Option<f64> = None;

    for (week, acc) in buckets {
        let weight = mean(&acc.weight).map(round1);
        let weight_loss = match (weight, previous_weight) {
            (Some(current), Some(previous)) => Some(round1(current - previous)),
            _ => None,
        };
        previous_weight = weight;

        let steps_mean = mean(&acc.steps).map(|m| match rounding {
            StepsRounding::Tenths => round1(m),
            StepsRounding::Whole => round_whole(m),
        });

        rows.push(WeeklySummaryRow {
            week,
            weight,
            weight_loss,
            steps_total: acc.steps_total(),
            calories: mean(&acc.calories).map(round1),
            protein: mean(&acc.protein).map(round1),
            lifting_days: acc.lifting_days,
            conditioning_days: acc.conditioning_days,
            steps_mean,
        });
    }

    rows
}

// ── Tests ─────────────────────────────────────────────────────────────────────

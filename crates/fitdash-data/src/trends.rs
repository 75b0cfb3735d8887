//! Trend series and headline metrics for a selected date range.

use chrono::NaiveDate;
use fitdash_core::models::{DayRecord, Granularity, RangeMetrics, TrendPoint};
use fitdash_core::numeric::{mean, round1, sample_std};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::group_by_bucket;

/// The trend view's payload: per-bucket points plus headline numbers
/// for the selected range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub points: Vec<TrendPoint>,
    pub metrics: RangeMetrics,
}

/// Build the trend series for an inclusive date range.
///
/// Rows outside the range are dropped before bucketing, so a bucket
/// straddling a boundary only reflects its in-range days. Point values
/// stay unrounded; they feed charts, not tables.
pub fn time_series(
    records: &[DayRecord],
    granularity: Granularity,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> TrendReport {
    let in_range: Vec<DayRecord> = records
        .iter()
        .filter(|r| from.map_or(true, |d| r.date >= d) && to.map_or(true, |d| r.date <= d))
        .cloned()
        .collect();

    debug!(
        "Trend over {} of {} record(s), {} buckets",
        in_range.len(),
        records.len(),
        granularity.as_str()
    );

    let points: Vec<TrendPoint> = group_by_bucket(&in_range, granularity)
        .into_iter()
        .map(|(bucket, acc)| TrendPoint {
            bucket,
            weight_mean: mean(&acc.weight),
            weight_std: sample_std(&acc.weight),
            calories_mean: mean(&acc.calories),
            calories_std: sample_std(&acc.calories),
            steps_mean: mean(&acc.steps),
            steps_std: sample_std(&acc.steps),
            workouts: acc.lifting_days,
        })
        .collect();

    let metrics = range_metrics(&points);
    TrendReport { points, metrics }
}

/// Headline numbers over the bucketed points.
///
/// Computed from the plotted series rather than the raw rows, so the
/// figures always agree with the chart above them.
pub fn range_metrics(points: &[TrendPoint]) -> RangeMetrics {
    let first_weight = points.iter().find_map(|p| p.weight_mean);
    let latest_weight = points.iter().rev().find_map(|p| p.weight_mean);
    let weight_change = match (latest_weight, first_weight) {
        (Some(latest), Some(first)) => Some(round1(latest - first)),
        _ => None,
    };

    let calorie_means: Vec<f64> = points.iter().filter_map(|p| p.calories_mean).collect();
    let step_means: Vec<f64> = points.iter().filter_map(|p| p.steps_mean).collect();

    RangeMetrics {
        latest_weight,
        weight_change,
        mean_calories: mean(&calorie_means),
        mean_steps: mean(&step_means),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

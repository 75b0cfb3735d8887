//! Full dashboard pipeline.
//!
//! Orchestrates loading, summarisation, exercise frequency and trend
//! computation for one page render, returning a [`DashboardReport`]
//! ready for a presentation layer.

use std::fmt;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use fitdash_core::error::FitdashError;
use fitdash_core::models::{
    DayRecord, ExerciseCount, Granularity, StepsRounding, SummaryRow, WeeklySummaryRow,
};
use fitdash_core::schema::ColumnMap;
use fitdash_core::Result;

use crate::aggregator::{summarize, weekly_summary};
use crate::cache::LoadCache;
use crate::frequency::exercise_frequency;
use crate::store::ObjectStore;
use crate::trends::{time_series, TrendReport};

// ── Public types ──────────────────────────────────────────────────────────────

/// Where the training log lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A log file on the local filesystem.
    File(PathBuf),
    /// An object fetched from a remote store.
    Object { bucket: String, key: String },
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Object { bucket, key } => write!(f, "{}/{}", bucket, key),
        }
    }
}

/// Caller-supplied knobs for one dashboard pass.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    /// Bucketing applied to the summary and trend tables.
    pub granularity: Granularity,
    /// Presentation rounding for the weekly mean-steps column.
    pub steps_rounding: StepsRounding,
    /// Inclusive lower bound on record dates, when set.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on record dates, when set.
    pub to: Option<NaiveDate>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::Day,
            steps_rounding: StepsRounding::Tenths,
            from: None,
            to: None,
        }
    }
}

/// Metadata produced alongside the report.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReportMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// Number of day records after normalisation.
    pub records_loaded: usize,
    /// Number of buckets in the summary table.
    pub buckets: usize,
    /// Wall-clock seconds spent obtaining and decoding the source.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent building the derived tables.
    pub aggregate_time_seconds: f64,
}

/// The complete output of [`render_pass`].
#[derive(Debug, Clone)]
pub struct DashboardReport {
    /// The normalised log the tables were derived from.
    pub records: Vec<DayRecord>,
    /// Per-bucket summary at the requested granularity.
    pub summary: Vec<SummaryRow>,
    /// Weekly progress table with week-over-week weight deltas.
    pub weekly: Vec<WeeklySummaryRow>,
    /// Exercise mentions, most frequent first.
    pub exercises: Vec<ExerciseCount>,
    /// Trend series and headline metrics for the requested range.
    pub trend: TrendReport,
    /// Metadata about this pass.
    pub metadata: ReportMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run one full load-and-aggregate pass.
///
/// 1. Obtain and normalise the log from `source`, through `cache`.
/// 2. Build the per-bucket summary for the requested granularity.
/// 3. Build the weekly progress table.
/// 4. Count exercise mentions across the whole log.
/// 5. Build the trend series over the requested date range.
///
/// A `Source::Object` needs `store`; passing `None` for it surfaces a
/// [`FitdashError::SourceUnavailable`] rather than a panic.
pub fn render_pass(
    cache: &mut LoadCache,
    source: &Source,
    store: Option<&dyn ObjectStore>,
    map: &ColumnMap,
    options: ReportOptions,
) -> Result<DashboardReport> {
    // ── Step 1: Load ──────────────────────────────────────────────────────────
    let load_start = std::time::Instant::now();
    let records = match source {
        Source::File(path) => cache.load_file(path, map)?,
        Source::Object { bucket, key } => {
            let store = store.ok_or_else(|| FitdashError::SourceUnavailable {
                reason: format!("no object store configured for {}/{}", bucket, key),
            })?;
            cache.load_object(store, bucket, key, map)?
        }
    };
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2: Summary tables ────────────────────────────────────────────────
    let aggregate_start = std::time::Instant::now();
    let summary = summarize(&records, options.granularity);
    let weekly = weekly_summary(&records, options.steps_rounding);

    // ── Step 3: Exercise frequency ────────────────────────────────────────────
    let exercises = exercise_frequency(&records);

    // ── Step 4: Trend ─────────────────────────────────────────────────────────
    let trend = time_series(&records, options.granularity, options.from, options.to);
    let aggregate_time = aggregate_start.elapsed().as_secs_f64();

    // ── Step 5: Build report ──────────────────────────────────────────────────
    let metadata = ReportMetadata {
        generated_at: Utc::now().to_rfc3339(),
        records_loaded: records.len(),
        buckets: summary.len(),
        load_time_seconds: load_time,
        aggregate_time_seconds: aggregate_time,
    };

    Ok(DashboardReport {
        records,
        summary,
        weekly,
        exercises,
        trend,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

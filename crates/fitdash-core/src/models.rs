use crate::error::{FitdashError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Time bucketing applied when summarising the daily log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar day.
    Day,
    /// One bucket per labelled training week.
    Week,
    /// One bucket per calendar month.
    Month,
}

impl FromStr for Granularity {
    type Err = FitdashError;

    /// Case-insensitive construction from a string slice.
    ///
    /// Accepts `"day"`, `"week"`, and `"month"` (case-insensitive).
    /// Returns [`FitdashError::InvalidGranularity`] for unrecognised strings.
    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            other => Err(FitdashError::InvalidGranularity(other.to_string())),
        }
    }
}

impl Granularity {
    /// The canonical lowercase string identifier for this bucketing.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    /// Column heading used for the bucket key in tables and exports.
    pub fn axis_label(&self) -> &'static str {
        match self {
            Granularity::Day => "Date",
            Granularity::Week => "Week",
            Granularity::Month => "Month",
        }
    }

    /// The bucket key a record falls into under this granularity.
    ///
    /// Returns `None` when the record cannot be bucketed, which only
    /// happens for week bucketing on rows logged before the first week
    /// label appears.
    pub fn bucket_key(&self, record: &DayRecord) -> Option<String> {
        match self {
            Granularity::Day => Some(record.date.format("%Y-%m-%d").to_string()),
            Granularity::Week => record.week.clone(),
            Granularity::Month => Some(record.month.clone()),
        }
    }
}

/// Month bucket label for a date, e.g. `2024-03`.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Parse a log date in either format the data has used over time:
/// the spreadsheet's own `YYYY/MM/DD` or ISO `YYYY-MM-DD`.
pub fn parse_log_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y/%m/%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()
}

/// A single day's entry from the training log, after normalisation.
///
/// Every metric is optional: the log is kept by hand and sparse rows
/// are the norm, not the exception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Calendar day the entry describes.
    pub date: NaiveDate,
    /// Training-week label, carried forward from the most recent
    /// labelled row. `None` only before the first label appears.
    #[serde(default)]
    pub week: Option<String>,
    /// Calendar-month label derived from the date (e.g. `2024-03`).
    pub month: String,
    /// Morning body weight in pounds, when logged.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Calories eaten over the day, when logged.
    #[serde(default)]
    pub calories: Option<f64>,
    /// Protein eaten over the day in grams, when logged.
    #[serde(default)]
    pub protein: Option<f64>,
    /// Step count for the day, when logged.
    #[serde(default)]
    pub steps: Option<i64>,
    /// Free-text list of lifting exercises performed, when logged.
    #[serde(default)]
    pub workout: Option<String>,
    /// Free-text conditioning entry, when logged.
    #[serde(default)]
    pub conditioning: Option<String>,
}

/// One row of the generic per-bucket summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Bucket key: a date, week label, or month label.
    pub bucket: String,
    /// Mean body weight over the bucket (lb), rounded to one decimal.
    pub weight: Option<f64>,
    /// Mean calories over the bucket, rounded to one decimal.
    pub calories: Option<f64>,
    /// Mean protein over the bucket (g), rounded to one decimal.
    pub protein: Option<f64>,
    /// Mean daily steps over the bucket, rounded to one decimal.
    pub steps_mean: Option<f64>,
    /// Total steps over the bucket, `None` when no row logged steps.
    pub steps_total: Option<i64>,
    /// Number of days in the bucket with a lifting entry.
    pub lifting_days: u32,
    /// Number of days in the bucket with a conditioning entry.
    pub conditioning_days: u32,
}

/// Presentation rounding applied to the mean-steps column of the
/// weekly table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepsRounding {
    /// Round mean steps to one decimal place.
    Tenths,
    /// Round mean steps to the nearest whole step.
    Whole,
}

/// One row of the weekly progress table, including the week-over-week
/// weight delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummaryRow {
    /// Training-week label.
    pub week: String,
    /// Mean body weight over the week (lb), rounded to one decimal.
    pub weight: Option<f64>,
    /// Change in mean weight versus the previous week (lb). `None` for
    /// the first week and whenever either side of the delta is unknown.
    pub weight_loss: Option<f64>,
    /// Total steps over the week, `None` when no row logged steps.
    pub steps_total: Option<i64>,
    /// Mean calories over the week, rounded to one decimal.
    pub calories: Option<f64>,
    /// Mean protein over the week (g), rounded to one decimal.
    pub protein: Option<f64>,
    /// Number of days in the week with a lifting entry.
    pub lifting_days: u32,
    /// Number of days in the week with a conditioning entry.
    pub conditioning_days: u32,
    /// Mean daily steps over the week, rounded per [`StepsRounding`].
    pub steps_mean: Option<f64>,
}

/// How often one exercise token appears across the whole log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseCount {
    /// Exercise name with all whitespace stripped (e.g. `BenchPress`).
    pub name: String,
    /// Number of workout entries mentioning the exercise.
    pub occurrences: u32,
}

/// One plotted point of the trend view: per-bucket mean and spread for
/// the charted metrics, unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Bucket key: a date, week label, or month label.
    pub bucket: String,
    /// Mean body weight over the bucket (lb).
    pub weight_mean: Option<f64>,
    /// Sample standard deviation of weight over the bucket. `None`
    /// when fewer than two rows logged a weight.
    pub weight_std: Option<f64>,
    /// Mean calories over the bucket.
    pub calories_mean: Option<f64>,
    /// Sample standard deviation of calories over the bucket.
    pub calories_std: Option<f64>,
    /// Mean daily steps over the bucket.
    pub steps_mean: Option<f64>,
    /// Sample standard deviation of steps over the bucket.
    pub steps_std: Option<f64>,
    /// Number of days in the bucket with a lifting entry.
    pub workouts: u32,
}

/// Headline numbers for the currently selected date range, computed
/// over the bucketed trend points rather than the raw rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeMetrics {
    /// Mean weight of the last bucket that has one (lb).
    pub latest_weight: Option<f64>,
    /// Latest bucket weight minus the first bucket weight (lb),
    /// rounded to one decimal.
    pub weight_change: Option<f64>,
    /// Mean of the per-bucket calorie means.
    pub mean_calories: Option<f64>,
    /// Mean of the per-bucket step means.
    pub mean_steps: Option<f64>,
}

//! CSV rendering of the derived tables.
//!
//! Every export is UTF-8 text with the table's own column headers and a
//! leading index column holding the bucket key. Missing values become
//! empty cells. [`ExportCache`] wraps the renderers with explicit
//! memoization keyed on a digest of the input table, so downloading the
//! same view twice in a session renders the CSV once.

use std::collections::HashMap;

use fitdash_core::error::FitdashError;
use fitdash_core::models::{
    DayRecord, ExerciseCount, Granularity, SummaryRow, WeeklySummaryRow,
};
use fitdash_core::Result;
use serde::Serialize;
use tracing::debug;

use crate::cache::content_digest;

// ── Cell formatting ───────────────────────────────────────────────────────────

fn fixed1_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_default()
}

fn int_cell(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn raw_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn text_cell(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| FitdashError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| FitdashError::Csv(e.to_string()))
}

fn write_row<I, T>(writer: &mut csv::Writer<Vec<u8>>, row: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    writer
        .write_record(row)
        .map_err(|e| FitdashError::Csv(e.to_string()))
}

// ── Table renderers ───────────────────────────────────────────────────────────

/// Render a per-bucket summary table to CSV. The index header follows
/// the granularity the table was bucketed by.
pub fn summary_csv(rows: &[SummaryRow], granularity: Granularity) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_row(
        &mut writer,
        [
            granularity.axis_label(),
            "Weight (lb)",
            "Calories",
            "Protein (g)",
            "Steps",
            "Steps (tot)",
            "Lifting Days",
            "Conditioning Days",
        ],
    )?;
    for row in rows {
        write_row(
            &mut writer,
            [
                row.bucket.clone(),
                fixed1_cell(row.weight),
                fixed1_cell(row.calories),
                fixed1_cell(row.protein),
                fixed1_cell(row.steps_mean),
                int_cell(row.steps_total),
                row.lifting_days.to_string(),
                row.conditioning_days.to_string(),
            ],
        )?;
    }
    finish(writer)
}

/// Render the weekly progress table to CSV, in the same column order
/// the dashboard shows it.
pub fn weekly_csv(rows: &[WeeklySummaryRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_row(
        &mut writer,
        [
            "Week",
            "Weight (lb)",
            "Weight Loss (lb)",
            "Steps (tot)",
            "Calories",
            "Protein (g)",
            "Lifting Days",
            "Conditioning Days",
            "Steps",
        ],
    )?;
    for row in rows {
        write_row(
            &mut writer,
            [
                row.week.clone(),
                fixed1_cell(row.weight),
                fixed1_cell(row.weight_loss),
                int_cell(row.steps_total),
                fixed1_cell(row.calories),
                fixed1_cell(row.protein),
                row.lifting_days.to_string(),
                row.conditioning_days.to_string(),
                fixed1_cell(row.steps_mean),
            ],
        )?;
    }
    finish(writer)
}

/// Render the exercise-frequency table to CSV.
pub fn exercises_csv(rows: &[ExerciseCount]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_row(&mut writer, ["Exercise", "Occurrence"])?;
    for row in rows {
        write_row(&mut writer, [row.name.clone(), row.occurrences.to_string()])?;
    }
    finish(writer)
}

/// Render the normalized log itself to CSV. Dates are written in ISO
/// form and metric values are written unrounded.
pub fn records_csv(records: &[DayRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_row(
        &mut writer,
        [
            "Date",
            "Week",
            "Month",
            "Weight (lb)",
            "Calories",
            "Protein (g)",
            "Steps",
            "Workout",
            "Conditioning (cal estimated using apps)",
        ],
    )?;
    for record in records {
        write_row(
            &mut writer,
            [
                record.date.format("%Y-%m-%d").to_string(),
                text_cell(record.week.as_deref()),
                record.month.clone(),
                raw_cell(record.weight),
                raw_cell(record.calories),
                raw_cell(record.protein),
                int_cell(record.steps),
                text_cell(record.workout.as_deref()),
                text_cell(record.conditioning.as_deref()),
            ],
        )?;
    }
    finish(writer)
}

// ── Export cache ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct RenderedExport {
    fingerprint: String,
    csv: String,
}

/// Memoizes one rendered CSV per table kind.
///
/// The key is a digest of the serialized input table, so an unchanged
/// table is rendered once and any change to it forces a re-render.
#[derive(Debug, Default)]
pub struct ExportCache {
    entries: HashMap<&'static str, RenderedExport>,
}

impl ExportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of table kinds currently memoized.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary_csv(
        &mut self,
        rows: &[SummaryRow],
        granularity: Granularity,
    ) -> Result<String> {
        let fingerprint = fingerprint_of(&(granularity, rows))?;
        self.render_cached("summary", fingerprint, || summary_csv(rows, granularity))
    }

    pub fn weekly_csv(&mut self, rows: &[WeeklySummaryRow]) -> Result<String> {
        let fingerprint = fingerprint_of(&rows)?;
        self.render_cached("weekly", fingerprint, || weekly_csv(rows))
    }

    pub fn exercises_csv(&mut self, rows: &[ExerciseCount]) -> Result<String> {
        let fingerprint = fingerprint_of(&rows)?;
        self.render_cached("exercises", fingerprint, || exercises_csv(rows))
    }

    pub fn records_csv(&mut self, records: &[DayRecord]) -> Result<String> {
        let fingerprint = fingerprint_of(&records)?;
        self.render_cached("records", fingerprint, || records_csv(records))
    }

    fn render_cached(
        &mut self,
        kind: &'static str,
        fingerprint: String,
        render: impl FnOnce() -> Result<String>,
    ) -> Result<String> {
        if let Some(entry) = self.entries.get(kind) {
            if entry.fingerprint == fingerprint {
                debug!("Export cache hit for {} table", kind);
                return Ok(entry.csv.clone());
            }
            debug!("Export cache stale for {} table, rendering again", kind);
        }
        let csv = render()?;
        self.entries.insert(
            kind,
            RenderedExport {
                fingerprint,
                csv: csv.clone(),
            },
        );
        Ok(csv)
    }
}

fn fingerprint_of<T: Serialize>(value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value)?;
    Ok(content_digest(&bytes))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

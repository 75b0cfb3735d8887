//! Plain-text table rendering for the CLI views.
//!
//! Column layout mirrors the CSV exports; missing values print as `-`.

use fitdash_core::formatting::{format_delta, format_opt, format_opt_steps};
use fitdash_core::models::{DayRecord, ExerciseCount, Granularity, SummaryRow, WeeklySummaryRow};
use fitdash_data::trends::TrendReport;

// ── Summary views ─────────────────────────────────────────────────────────────

pub fn print_summary(rows: &[SummaryRow], granularity: Granularity) {
    println!();
    println!("Summary by {}:", granularity.axis_label());
    if rows.is_empty() {
        println!("  No records in the log");
        println!();
        return;
    }
    println!(
        "  {:<12} {:<12} {:<10} {:<12} {:<10} {:<12} {:<8} {}",
        granularity.axis_label(),
        "Weight (lb)",
        "Calories",
        "Protein (g)",
        "Steps",
        "Steps (tot)",
        "Lifting",
        "Conditioning"
    );
    println!("  {}", "─".repeat(92));
    for row in rows {
        println!(
            "  {:<12} {:<12} {:<10} {:<12} {:<10} {:<12} {:<8} {}",
            row.bucket,
            format_opt(row.weight, 1),
            format_opt(row.calories, 1),
            format_opt(row.protein, 1),
            format_opt(row.steps_mean, 1),
            format_opt_steps(row.steps_total),
            row.lifting_days,
            row.conditioning_days
        );
    }
    println!();
}

pub fn print_weekly(rows: &[WeeklySummaryRow]) {
    println!();
    println!("Weekly Progress:");
    if rows.is_empty() {
        println!("  No labelled weeks in the log");
        println!();
        return;
    }
    println!(
        "  {:<12} {:<12} {:<10} {:<12} {:<10} {:<12} {:<8} {:<13} {}",
        "Week",
        "Weight (lb)",
        "Loss (lb)",
        "Steps (tot)",
        "Calories",
        "Protein (g)",
        "Lifting",
        "Conditioning",
        "Steps"
    );
    println!("  {}", "─".repeat(104));
    for row in rows {
        println!(
            "  {:<12} {:<12} {:<10} {:<12} {:<10} {:<12} {:<8} {:<13} {}",
            row.week,
            format_opt(row.weight, 1),
            format_delta(row.weight_loss, 1),
            format_opt_steps(row.steps_total),
            format_opt(row.calories, 1),
            format_opt(row.protein, 1),
            row.lifting_days,
            row.conditioning_days,
            format_opt(row.steps_mean, 1)
        );
    }
    println!("  * Fields are means over the week unless marked (tot)");
    println!();
}

// ── Exercise frequency ────────────────────────────────────────────────────────

pub fn print_exercises(rows: &[ExerciseCount]) {
    println!();
    println!("Exercise Frequency:");
    if rows.is_empty() {
        println!("  No workout entries in the log");
        println!();
        return;
    }
    println!("  {:<22} {}", "Exercise", "Occurrence");
    println!("  {}", "─".repeat(34));
    for row in rows {
        println!("  {:<22} {}", row.name, row.occurrences);
    }
    println!();
}

// ── Trend view ────────────────────────────────────────────────────────────────

pub fn print_trend(report: &TrendReport, granularity: Granularity) {
    println!();
    println!("Trend by {}:", granularity.axis_label());
    if report.points.is_empty() {
        println!("  No records in the selected range");
        println!();
        return;
    }
    println!(
        "  {:<12} {:<10} {:<10} {:<10} {:<10} {:<10} {:<10} {}",
        granularity.axis_label(),
        "Weight",
        "Wt Std",
        "Calories",
        "Cal Std",
        "Steps",
        "Step Std",
        "Workouts"
    );
    println!("  {}", "─".repeat(88));
    for point in &report.points {
        println!(
            "  {:<12} {:<10} {:<10} {:<10} {:<10} {:<10} {:<10} {}",
            point.bucket,
            format_opt(point.weight_mean, 1),
            format_opt(point.weight_std, 2),
            format_opt(point.calories_mean, 1),
            format_opt(point.calories_std, 2),
            format_opt(point.steps_mean, 1),
            format_opt(point.steps_std, 2),
            point.workouts
        );
    }
    println!();

    let metrics = &report.metrics;
    println!("Range Metrics:");
    println!("  Latest weight:   {} lb", format_opt(metrics.latest_weight, 1));
    println!(
        "  Weight change:   {} lb",
        format_delta(metrics.weight_change, 1)
    );
    println!("  Mean calories:   {}", format_opt(metrics.mean_calories, 1));
    println!("  Mean steps:      {}", format_opt(metrics.mean_steps, 1));
    println!();
}

// ── Raw log view ──────────────────────────────────────────────────────────────

pub fn print_records(records: &[DayRecord]) {
    println!();
    println!("Normalized Log:");
    if records.is_empty() {
        println!("  No records in the log");
        println!();
        return;
    }
    println!(
        "  {:<12} {:<10} {:<9} {:<9} {:<10} {:<9} {:<8} {:<24} {}",
        "Date", "Week", "Month", "Weight", "Calories", "Protein", "Steps", "Workout", "Conditioning"
    );
    println!("  {}", "─".repeat(108));
    for record in records {
        println!(
            "  {:<12} {:<10} {:<9} {:<9} {:<10} {:<9} {:<8} {:<24} {}",
            record.date.format("%Y-%m-%d"),
            record.week.as_deref().unwrap_or("-"),
            record.month,
            format_opt(record.weight, 1),
            format_opt(record.calories, 0),
            format_opt(record.protein, 0),
            format_opt_steps(record.steps),
            record.workout.as_deref().unwrap_or("-"),
            record.conditioning.as_deref().unwrap_or("-")
        );
    }
    println!();
}

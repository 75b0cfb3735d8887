mod bootstrap;
mod render;

use anyhow::Result;
use fitdash_core::credentials::{ApiKey, DEFAULT_KEY_PREFIX};
use fitdash_core::models::Granularity;
use fitdash_core::schema::ColumnMap;
use fitdash_core::settings::Settings;
use fitdash_data::cache::LoadCache;
use fitdash_data::export;
use fitdash_data::report::{render_pass, DashboardReport, ReportOptions, Source};
use fitdash_data::store::FsObjectStore;

/// Object key used when `--bucket` is given without `--key`.
const DEFAULT_OBJECT_KEY: &str = "fitness_data.csv";

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Fitdash v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Granularity: {}",
        settings.view,
        settings.granularity
    );

    // The query-box credential gates nothing in the pipeline; a bad key is
    // reported and the dashboard still renders.
    if let Some(raw) = settings.api_key.as_deref() {
        match ApiKey::parse(raw, DEFAULT_KEY_PREFIX) {
            Ok(key) => tracing::info!("Query-box API key accepted: {:?}", key),
            Err(e) => tracing::warn!("Query-box API key rejected: {}", e),
        }
    }

    let granularity = effective_granularity(&settings)?;
    let (from, to) = settings.parse_date_range()?;
    let options = ReportOptions {
        granularity,
        steps_rounding: settings.steps_rounding(),
        from,
        to,
    };

    let source = resolve_source(&settings);
    let store = FsObjectStore::new(
        settings
            .store_root
            .clone()
            .unwrap_or_else(bootstrap::default_store_root),
    );
    tracing::info!("Loading log from {}", source);

    let map = ColumnMap::default();
    let mut cache = LoadCache::new();
    let report = render_pass(&mut cache, &source, Some(&store), &map, options)?;

    tracing::info!(
        "Loaded {} record(s) in {:.3}s, aggregated in {:.3}s",
        report.metadata.records_loaded,
        report.metadata.load_time_seconds,
        report.metadata.aggregate_time_seconds
    );

    match settings.view.as_str() {
        "summary" | "daily" | "monthly" => render::print_summary(&report.summary, granularity),
        "weekly" => render::print_weekly(&report.weekly),
        "exercises" => render::print_exercises(&report.exercises),
        "trend" => render::print_trend(&report.trend, granularity),
        "raw" => render::print_records(&report.records),
        unknown => eprintln!("Unknown view mode: {}", unknown),
    }

    if let Some(path) = &settings.export {
        match export_view(&settings.view, &report, granularity)? {
            Some(csv) => {
                std::fs::write(path, csv)?;
                tracing::info!("Exported {} view to {}", settings.view, path.display());
            }
            None => tracing::warn!("The {} view has no CSV export", settings.view),
        }
    }

    Ok(())
}

/// The daily/weekly/monthly views fix their own bucketing; the rest
/// follow `--granularity`.
fn effective_granularity(settings: &Settings) -> Result<Granularity> {
    let granularity = match settings.view.as_str() {
        "daily" => Granularity::Day,
        "weekly" => Granularity::Week,
        "monthly" => Granularity::Month,
        _ => settings.parse_granularity()?,
    };
    Ok(granularity)
}

fn resolve_source(settings: &Settings) -> Source {
    match (&settings.bucket, &settings.key) {
        (Some(bucket), Some(key)) => Source::Object {
            bucket: bucket.clone(),
            key: key.clone(),
        },
        (Some(bucket), None) => Source::Object {
            bucket: bucket.clone(),
            key: DEFAULT_OBJECT_KEY.to_string(),
        },
        _ => {
            let path = bootstrap::discover_log_file(&settings.file)
                .unwrap_or_else(|| settings.file.clone());
            Source::File(path)
        }
    }
}

/// Render the active view's table as CSV, when it has one.
fn export_view(
    view: &str,
    report: &DashboardReport,
    granularity: Granularity,
) -> Result<Option<String>> {
    let csv = match view {
        "summary" | "daily" | "monthly" => {
            Some(export::summary_csv(&report.summary, granularity)?)
        }
        "weekly" => Some(export::weekly_csv(&report.weekly)?),
        "exercises" => Some(export::exercises_csv(&report.exercises)?),
        "raw" => Some(export::records_csv(&report.records)?),
        _ => None,
    };
    Ok(csv)
}

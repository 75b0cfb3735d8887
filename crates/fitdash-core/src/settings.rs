use crate::error::{FitdashError, Result};
use crate::models::{parse_log_date, Granularity, StepsRounding};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

// ── Settings (CLI) ────────────────────────────────────────────────────────────

/// Personal fitness dashboard over a daily training log
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fitdash",
    about = "Personal fitness dashboard over a daily training log",
    version
)]
pub struct Settings {
    /// Local log file to load when no object-store key is given
    #[arg(long, default_value = "data/fitness_data.csv")]
    pub file: PathBuf,

    /// Object-store bucket holding the log
    #[arg(long)]
    pub bucket: Option<String>,

    /// Object key inside the bucket
    #[arg(long, requires = "bucket")]
    pub key: Option<String>,

    /// Root directory of the local object store
    #[arg(long)]
    pub store_root: Option<PathBuf>,

    /// Dashboard view
    #[arg(long, default_value = "summary", value_parser = ["summary", "daily", "weekly", "monthly", "exercises", "trend", "raw"])]
    pub view: String,

    /// Time bucketing for the summary and trend views
    #[arg(long, default_value = "day", value_parser = ["day", "week", "month"])]
    pub granularity: String,

    /// Start of the date range (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub from: Option<String>,

    /// End of the date range (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: Option<String>,

    /// Write the selected view as CSV to this path
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Keep one decimal place on mean steps in the weekly table
    #[arg(long)]
    pub steps_decimal: bool,

    /// LLM API key for the coaching assistant
    #[arg(long)]
    pub api_key: Option<String>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.fitdash/last_used.json`.
///
/// Only presentation choices are remembered between runs; the data
/// source is chosen per invocation.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granularity: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.fitdash/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".fitdash").join("last_used.json")
    }

    /// Load persisted params from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to the default path, creating parent directories
    /// if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the default config file if it exists.
    pub fn clear() -> Result<()> {
        Self::clear_at(&Self::config_path())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ─────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, apply the `--debug` override, and persist the
    /// result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`load_with_last_used`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_with_last_used_from_args(args: Vec<std::ffi::OsString>) -> Self {
        Self::load_with_last_used_impl(args, &LastUsedParams::config_path())
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            // Apply the debug override and return without re-persisting.
            return Self::apply_debug_override(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on the
        // command line (CLI always wins). The data source is never loaded from
        // last-used.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "granularity") {
            if let Some(v) = last.granularity {
                settings.granularity = v;
            }
        }

        settings = Self::apply_debug_override(settings);

        // Persist current settings for next run.
        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// `--debug` wins over any configured log level.
    fn apply_debug_override(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The selected time bucketing as a typed value.
    ///
    /// The CLI parser restricts the flag to valid names, but a persisted
    /// `last_used.json` edited by hand can hold anything, so this stays
    /// fallible.
    pub fn parse_granularity(&self) -> Result<Granularity> {
        Granularity::from_str(&self.granularity)
    }

    /// Presentation rounding for the weekly mean-steps column.
    pub fn steps_rounding(&self) -> StepsRounding {
        if self.steps_decimal {
            StepsRounding::Tenths
        } else {
            StepsRounding::Whole
        }
    }

    /// The inclusive date range selected on the command line.
    ///
    /// Either bound may be absent. Returns [`FitdashError::Config`] when a
    /// given bound is not a recognisable date.
    pub fn parse_date_range(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
        let parse = |flag: &str, value: &Option<String>| -> Result<Option<NaiveDate>> {
            match value {
                None => Ok(None),
                Some(raw) => parse_log_date(raw).map(Some).ok_or_else(|| {
                    FitdashError::Config(format!("invalid {flag} date: {raw}"))
                }),
            }
        };
        Ok((parse("--from", &self.from)?, parse("--to", &self.to)?))
    }
}

// ── Conversion ────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            view: Some(s.view.clone()),
            granularity: Some(s.granularity.clone()),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

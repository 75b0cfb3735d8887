use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ───────────────────────────────────────────────────────

/// Ensure the standard `~/.fitdash/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.fitdash/`
/// - `~/.fitdash/logs/`
/// - `~/.fitdash/data/`
/// - `~/.fitdash/store/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let fitdash_dir = home.join(".fitdash");
    std::fs::create_dir_all(&fitdash_dir)?;
    std::fs::create_dir_all(fitdash_dir.join("logs"))?;
    std::fs::create_dir_all(fitdash_dir.join("data"))?;
    std::fs::create_dir_all(fitdash_dir.join("store"))?;
    Ok(())
}

/// Root used for bucket lookups when `--store-root` is not given.
pub fn default_store_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".fitdash")
        .join("store")
}

// ── Logging bootstrap ─────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised. When
/// `log_file` is given, output is appended there instead of stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    // Map CLI log-level names to tracing directives (tracing uses lowercase).
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" | "CRITICAL" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Arc::new(file));
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        None => {
            let layer = fmt::layer().with_target(false).with_thread_ids(false);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }

    Ok(())
}

// ── Log-file discovery ────────────────────────────────────────────────────────

/// Attempt to locate the training log on the local system.
///
/// Checks the following paths in order and returns the first that exists:
/// 1. the path given on the command line
/// 2. `~/.fitdash/data/<file name>`
///
/// Returns `None` when neither path exists.
pub fn discover_log_file(preferred: &Path) -> Option<PathBuf> {
    if preferred.exists() {
        return Some(preferred.to_path_buf());
    }
    let home = dirs::home_dir()?;
    let fallback = home.join(".fitdash").join("data").join(preferred.file_name()?);
    fallback.exists().then_some(fallback)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // HOME is process-wide; tests that override it must not interleave.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_home<T>(home: &Path, body: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap();
        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", home);

        let out = body();

        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }
        out
    }

    // ── test_ensure_directories ───────────────────────────────────────────────

    #[test]
    fn test_ensure_directories() {
        let tmp = TempDir::new().expect("tempdir");

        with_home(tmp.path(), || ensure_directories())
            .expect("ensure_directories should succeed");

        let fitdash_dir = tmp.path().join(".fitdash");
        assert!(fitdash_dir.is_dir(), ".fitdash dir must exist");
        assert!(fitdash_dir.join("logs").is_dir(), "logs subdir must exist");
        assert!(fitdash_dir.join("data").is_dir(), "data subdir must exist");
        assert!(
            fitdash_dir.join("store").is_dir(),
            "store subdir must exist"
        );
    }

    // ── test_discover_log_file ────────────────────────────────────────────────

    #[test]
    fn test_discover_log_file_prefers_explicit_path() {
        let tmp = TempDir::new().expect("tempdir");
        let explicit = tmp.path().join("fitness_data.csv");
        std::fs::write(&explicit, "Date,Week\n").expect("write log");

        let found = discover_log_file(&explicit);
        assert_eq!(found, Some(explicit));
    }

    #[test]
    fn test_discover_log_file_falls_back_to_home_data_dir() {
        let tmp = TempDir::new().expect("tempdir");
        let data_dir = tmp.path().join(".fitdash").join("data");
        std::fs::create_dir_all(&data_dir).expect("create data dir");
        let stashed = data_dir.join("fitness_data.csv");
        std::fs::write(&stashed, "Date,Week\n").expect("write log");

        let found = with_home(tmp.path(), || {
            discover_log_file(Path::new("data/fitness_data.csv"))
        });
        assert_eq!(found, Some(stashed));
    }

    #[test]
    fn test_discover_log_file_returns_none_when_absent() {
        let tmp = TempDir::new().expect("tempdir");

        let found = with_home(tmp.path(), || {
            discover_log_file(Path::new("data/no_such_log.csv"))
        });
        assert!(found.is_none(), "should return None when neither path exists");
    }

    // ── test_default_store_root ───────────────────────────────────────────────

    #[test]
    fn test_default_store_root_is_under_home() {
        let tmp = TempDir::new().expect("tempdir");

        let root = with_home(tmp.path(), default_store_root);
        assert_eq!(root, tmp.path().join(".fitdash").join("store"));
    }
}

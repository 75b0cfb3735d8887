use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the fitness dashboard pipeline.
#[derive(Error, Debug)]
pub enum FitdashError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The named bucket does not exist in the object store.
    #[error("Bucket not found: {bucket}")]
    BucketNotFound { bucket: String },

    /// The bucket exists but holds no object under the given key.
    #[error("Object not found: {key} in bucket {bucket}")]
    ObjectNotFound { bucket: String, key: String },

    /// The object store could not be reached or refused the request.
    #[error("Data source unavailable: {reason}")]
    SourceUnavailable { reason: String },

    /// The source file extension maps to no recognised table format.
    #[error("Unsupported table format: {extension}")]
    UnsupportedFormat { extension: String },

    /// A date cell did not match any recognised format.
    #[error("Malformed date at row {row}: {value}")]
    MalformedDate { value: String, row: usize },

    /// A required column could not be resolved against the table header.
    #[error("Missing required column {field} (tried: {expected})")]
    MissingColumn {
        field: &'static str,
        expected: String,
    },

    /// The source table has no usable header row.
    #[error("Source table is empty")]
    EmptyTable,

    /// A granularity name is not one of the recognised bucketings.
    #[error("Invalid granularity: {0}")]
    InvalidGranularity(String),

    /// An LLM API key failed the acceptance gate.
    #[error("Invalid API key: {reason}")]
    InvalidApiKey { reason: String },

    /// An error raised by the delimited-text layer.
    #[error("CSV error: {0}")]
    Csv(String),

    /// An error raised by the spreadsheet layer.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, FitdashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = FitdashError::FileRead {
            path: PathBuf::from("/some/path.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/path.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_bucket_not_found() {
        let err = FitdashError::BucketNotFound {
            bucket: "fitness-logs".to_string(),
        };
        assert_eq!(err.to_string(), "Bucket not found: fitness-logs");
    }

    #[test]
    fn test_error_display_object_not_found() {
        let err = FitdashError::ObjectNotFound {
            bucket: "fitness-logs".to_string(),
            key: "2024.csv".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Object not found: 2024.csv in bucket fitness-logs"
        );
    }

    #[test]
    fn test_error_display_source_unavailable() {
        let err = FitdashError::SourceUnavailable {
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Data source unavailable: connection refused"
        );
    }

    #[test]
    fn test_error_display_unsupported_format() {
        let err = FitdashError::UnsupportedFormat {
            extension: "pdf".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported table format: pdf");
    }

    #[test]
    fn test_error_display_malformed_date() {
        let err = FitdashError::MalformedDate {
            value: "13/45/2024".to_string(),
            row: 7,
        };
        assert_eq!(err.to_string(), "Malformed date at row 7: 13/45/2024");
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = FitdashError::MissingColumn {
            field: "Weight",
            expected: "Weight".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Missing required column Weight"));
    }

    #[test]
    fn test_error_display_invalid_granularity() {
        let err = FitdashError::InvalidGranularity("fortnight".to_string());
        assert_eq!(err.to_string(), "Invalid granularity: fortnight");
    }

    #[test]
    fn test_error_display_invalid_api_key() {
        let err = FitdashError::InvalidApiKey {
            reason: "missing sk- prefix".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid API key: missing sk- prefix");
    }

    #[test]
    fn test_error_display_config() {
        let err = FitdashError::Config("bad date range".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad date range");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: FitdashError = io_err.into();
        let msg = err.to_string();
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: FitdashError = json_err.into();
        let msg = err.to_string();
        assert!(msg.contains("Failed to parse JSON"));
    }
}

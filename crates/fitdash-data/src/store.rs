//! Object-store access for the training log.
//!
//! The log's canonical home is a bucket of spreadsheet exports. The
//! trait keeps the loader independent of where the bytes come from;
//! the directory-backed implementation serves offline runs and tests.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use fitdash_core::error::{FitdashError, Result};
use tracing::debug;

/// Read-only blob source addressed by bucket and key.
pub trait ObjectStore {
    /// Fetch the raw bytes of `key` inside `bucket`.
    ///
    /// Distinguishes a missing bucket from a missing object so the
    /// caller can report which half of the address is wrong.
    fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

/// Directory-backed store: each bucket is a directory under the root,
/// each object a file inside it.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ObjectStore for FsObjectStore {
    fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let bucket_dir = self.root.join(bucket);
        if !bucket_dir.is_dir() {
            return Err(FitdashError::BucketNotFound {
                bucket: bucket.to_string(),
            });
        }

        let object_path = bucket_dir.join(key);
        match fs::read(&object_path) {
            Ok(bytes) => {
                debug!("Fetched {}/{} ({} bytes)", bucket, key, bytes.len());
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(FitdashError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(FitdashError::SourceUnavailable {
                reason: e.to_string(),
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

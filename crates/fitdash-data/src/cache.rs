//! Read-through memoization over the raw load step.
//!
//! A dashboard render may ask for the same source several times in one
//! session. [`LoadCache`] keeps the decoded records keyed on source
//! identity, revalidated against a SHA-256 of the source bytes, so an
//! unchanged log is decoded once and an edited log is decoded again on
//! the next pass.

use std::collections::HashMap;
use std::path::Path;

use fitdash_core::error::FitdashError;
use fitdash_core::models::DayRecord;
use fitdash_core::schema::ColumnMap;
use fitdash_core::Result;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::loader::{self, TableFormat};
use crate::store::ObjectStore;

// ── Content digests ───────────────────────────────────────────────────────────

/// Hex-encoded SHA-256 digest of a byte slice.
pub fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

// ── Load cache ────────────────────────────────────────────────────────────────

/// One memoized load: the digest of the bytes it was decoded from and
/// the records they produced.
#[derive(Debug, Clone)]
struct CachedLoad {
    digest: String,
    records: Vec<DayRecord>,
}

/// Memoizes [`loader`] results per source.
///
/// A hit is served only while the source bytes still hash to the stored
/// digest; there is no other invalidation protocol.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: HashMap<String, CachedLoad>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sources currently memoized.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every memoized load.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Load a local log file, reusing the previous decode when its
    /// bytes are unchanged.
    pub fn load_file(&mut self, path: &Path, map: &ColumnMap) -> Result<Vec<DayRecord>> {
        let format = TableFormat::from_source_name(&path.to_string_lossy())?;
        let bytes = std::fs::read(path).map_err(|e| FitdashError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.decode_cached(format!("file:{}", path.display()), &bytes, format, map)
    }

    /// Load an object-store log, reusing the previous decode when the
    /// fetched bytes are unchanged.
    pub fn load_object(
        &mut self,
        store: &dyn ObjectStore,
        bucket: &str,
        key: &str,
        map: &ColumnMap,
    ) -> Result<Vec<DayRecord>> {
        let format = TableFormat::from_source_name(key)?;
        let bytes = store.fetch(bucket, key)?;
        self.decode_cached(format!("object:{}/{}", bucket, key), &bytes, format, map)
    }

    fn decode_cached(
        &mut self,
        source: String,
        bytes: &[u8],
        format: TableFormat,
        map: &ColumnMap,
    ) -> Result<Vec<DayRecord>> {
        let digest = content_digest(bytes);

        if let Some(cached) = self.entries.get(&source) {
            if cached.digest == digest {
                debug!(
                    "Load cache hit for {} ({} records)",
                    source,
                    cached.records.len()
                );
                return Ok(cached.records.clone());
            }
            debug!("Load cache stale for {}, decoding again", source);
        }

        let records = loader::decode_bytes(bytes, format, map)?;
        self.entries.insert(
            source,
            CachedLoad {
                digest,
                records: records.clone(),
            },
        );
        Ok(records)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

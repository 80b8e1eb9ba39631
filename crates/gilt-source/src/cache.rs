//! Signature-keyed cache over the merged source set.
//!
//! The cache is an explicit object constructed once at startup and owned by
//! the caller, not hidden process-wide state. Entries are keyed by the
//! resolved source directory plus a per-file (path, mtime, size) signature,
//! so any change to any source file produces a new key and the stale entry
//! simply stops being hit. Entries are never evicted; growth is bounded in
//! practice by how often source files change.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use gilt_core::GiltResult;

use crate::discovery::{files_signature, list_source_files, FileSignature};
use crate::merge::{merge_source_files, MergedGilts};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    dir: PathBuf,
    signature: Vec<FileSignature>,
}

/// Caller-owned cache of merged gilt source directories.
///
/// The lock guards only the map lookup and insert. A cache miss parses and
/// merges outside the lock, so two callers racing on the same miss may both
/// do the work and one result silently overwrites the other; both see a
/// correct, merely duplicated, computation.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: Mutex<HashMap<CacheKey, MergedGilts>>,
}

impl SourceCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the merged view of all source files in `dir`, computing and
    /// caching it if the directory's signature has not been seen before.
    ///
    /// Callers receive an independent copy; mutating it cannot affect
    /// cache-owned state.
    ///
    /// # Errors
    ///
    /// Propagates discovery errors (missing directory, no matching files)
    /// and per-file load errors; nothing is cached on failure.
    pub fn load_merged(&self, dir: impl AsRef<Path>) -> GiltResult<MergedGilts> {
        self.load_merged_with(dir.as_ref(), |files| merge_source_files(files))
    }

    /// Get-or-compute core: discovery and keying with the merge step
    /// injected, so cache behavior is observable without workbook fixtures.
    fn load_merged_with(
        &self,
        dir: &Path,
        compute: impl FnOnce(&[PathBuf]) -> GiltResult<MergedGilts>,
    ) -> GiltResult<MergedGilts> {
        let files = list_source_files(dir)?;
        let signature = files_signature(&files)?;
        let key = CacheKey {
            dir: dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf()),
            signature,
        };

        if let Some(cached) = self.entries.lock().get(&key) {
            tracing::debug!(dir = %dir.display(), "merged gilts cache hit");
            return Ok(cached.clone());
        }

        tracing::debug!(
            dir = %dir.display(),
            files = files.len(),
            "merged gilts cache miss"
        );
        let merged = compute(&files)?;
        self.entries.lock().insert(key, merged.clone());
        Ok(merged)
    }

    /// Number of distinct (directory, signature) entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

//! Discovery of "Gilts in Issue" workbook files.
//!
//! Files named `YYYYMMDD - Gilts in Issue.<xls|xlsx>` carry an embedded
//! publication date. Other workbooks whose name contains "Gilts in Issue"
//! form a fallback group ordered by filesystem modification time, consulted
//! for "latest" selection only when no dated file exists.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use regex::Regex;

use gilt_core::types::Date;
use gilt_core::{GiltError, GiltResult};

static DATED_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{8}) - Gilts in Issue\.(xls|xlsx)$").expect("valid regex"));

/// Content signature of one discovered source file.
///
/// A change to any component produces a new merge-cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileSignature {
    /// Canonicalized path.
    pub path: PathBuf,
    /// Modification time, nanoseconds since the Unix epoch.
    pub mtime_ns: u128,
    /// File size in bytes.
    pub size: u64,
}

/// Lists all gilt workbook files in a directory: dated files sorted by their
/// embedded date, then fallback files sorted by modification time.
///
/// # Errors
///
/// Returns `GiltError::SourceDiscovery` if the directory does not exist or
/// contains no matching files.
pub fn list_source_files(dir: impl AsRef<Path>) -> GiltResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let (mut dated, mut fallback) = partition_source_files(dir)?;

    dated.sort_by_key(|(date, _)| *date);
    fallback.sort_by_key(|(mtime, _)| *mtime);

    let files: Vec<PathBuf> = dated
        .into_iter()
        .map(|(_, p)| p)
        .chain(fallback.into_iter().map(|(_, p)| p))
        .collect();
    if files.is_empty() {
        return Err(GiltError::source_discovery(format!(
            "no gilt workbook found under {}",
            dir.display()
        )));
    }
    Ok(files)
}

/// Picks the latest source file: maximum embedded date among dated files,
/// else the most recently modified fallback file.
///
/// # Errors
///
/// Returns `GiltError::SourceDiscovery` if the directory does not exist or
/// contains no matching files.
pub fn latest_source_file(dir: impl AsRef<Path>) -> GiltResult<PathBuf> {
    let dir = dir.as_ref();
    let (dated, fallback) = partition_source_files(dir)?;

    if let Some((_, path)) = dated.into_iter().max_by_key(|(date, _)| *date) {
        return Ok(path);
    }
    if let Some((_, path)) = fallback.into_iter().max_by_key(|(mtime, _)| *mtime) {
        return Ok(path);
    }
    Err(GiltError::source_discovery(format!(
        "no gilt workbook found under {}",
        dir.display()
    )))
}

/// Computes the cache signature over a set of discovered files.
///
/// # Errors
///
/// Returns `GiltError::SourceDiscovery` if file metadata cannot be read.
pub fn files_signature(files: &[PathBuf]) -> GiltResult<Vec<FileSignature>> {
    files
        .iter()
        .map(|path| {
            let canonical = path.canonicalize().map_err(|e| {
                GiltError::source_discovery(format!(
                    "cannot resolve {}: {e}",
                    path.display()
                ))
            })?;
            let metadata = fs::metadata(&canonical).map_err(|e| {
                GiltError::source_discovery(format!("cannot stat {}: {e}", canonical.display()))
            })?;
            let mtime_ns = mtime_nanos(metadata.modified().map_err(|e| {
                GiltError::source_discovery(format!(
                    "no modification time for {}: {e}",
                    canonical.display()
                ))
            })?);
            Ok(FileSignature {
                path: canonical,
                mtime_ns,
                size: metadata.len(),
            })
        })
        .collect()
}

fn mtime_nanos(mtime: SystemTime) -> u128 {
    mtime
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0)
}

/// Splits directory entries into (embedded-date, path) and (mtime, path)
/// groups, skipping anything that is not a gilt workbook.
fn partition_source_files(
    dir: &Path,
) -> GiltResult<(Vec<(Date, PathBuf)>, Vec<(u128, PathBuf)>)> {
    if !dir.exists() {
        return Err(GiltError::source_discovery(format!(
            "gilts directory does not exist: {}",
            dir.display()
        )));
    }
    let entries = fs::read_dir(dir).map_err(|e| {
        GiltError::source_discovery(format!("cannot read {}: {e}", dir.display()))
    })?;

    let mut dated = Vec::new();
    let mut fallback = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            GiltError::source_discovery(format!("cannot read entry in {}: {e}", dir.display()))
        })?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.contains("Gilts in Issue") {
            continue;
        }
        let is_workbook = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("xls" | "xlsx")
        );
        if !is_workbook || !path.is_file() {
            continue;
        }

        if let Some(captures) = DATED_NAME_RE.captures(name) {
            if let Some(date) = parse_stamp(&captures[1]) {
                dated.push((date, path));
                continue;
            }
        }
        let mtime = entry
            .metadata()
            .and_then(|m| m.modified())
            .map(mtime_nanos)
            .unwrap_or(0);
        fallback.push((mtime, path));
    }

    Ok((dated, fallback))
}

/// Parses a `YYYYMMDD` filename stamp; returns `None` for impossible dates.
fn parse_stamp(stamp: &str) -> Option<Date> {
    let year: i32 = stamp[..4].parse().ok()?;
    let month: u32 = stamp[4..6].parse().ok()?;
    let day: u32 = stamp[6..8].parse().ok()?;
    Date::from_ymd_opt(year, month, day)
}

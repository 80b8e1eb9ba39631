//! Cross-file merge of parsed gilt records.
//!
//! When an ISIN appears in several source files, the record from the file
//! with the greatest as-of date wins; the merged as-of date is the maximum
//! across all files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gilt_core::types::{Date, Gilt, GiltRow};
use gilt_core::{GiltError, GiltResult};

use crate::parser::{parse_sheet, ParsedSheet};
use crate::workbook::load_workbook_grid;

/// The merged view over every discovered source file.
#[derive(Debug, Clone)]
pub struct MergedGilts {
    /// Greatest as-of date across the merged files.
    pub as_of: Date,
    /// Most recent record per ISIN.
    pub gilts: HashMap<String, Gilt>,
    /// Display rows, sorted by (redemption date, name).
    pub rows: Vec<GiltRow>,
}

/// Loads and parses a single workbook file.
///
/// # Errors
///
/// Propagates workbook-loading and sheet-parsing errors; fatal to this file.
pub fn load_parsed_sheet(path: impl AsRef<Path>) -> GiltResult<ParsedSheet> {
    let grid = load_workbook_grid(&path)?;
    let parsed = parse_sheet(&grid)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        as_of = %parsed.as_of,
        securities = parsed.gilts.len(),
        "parsed gilt workbook"
    );
    Ok(parsed)
}

/// Loads every file and merges the parsed sheets.
///
/// # Errors
///
/// Fails on the first unloadable file, or with `GiltError::SourceDiscovery`
/// if the file list is empty; no partial results are returned.
pub fn merge_source_files(files: &[PathBuf]) -> GiltResult<MergedGilts> {
    let sheets = files
        .iter()
        .map(load_parsed_sheet)
        .collect::<GiltResult<Vec<_>>>()?;
    merge_parsed_sheets(sheets)
}

/// Merges already-parsed sheets, keeping the most recently dated record per
/// ISIN.
///
/// # Errors
///
/// Returns `GiltError::SourceDiscovery` when given no sheets.
pub fn merge_parsed_sheets(
    sheets: impl IntoIterator<Item = ParsedSheet>,
) -> GiltResult<MergedGilts> {
    let mut merged: HashMap<String, (Date, Gilt, GiltRow)> = HashMap::new();
    let mut newest_as_of: Option<Date> = None;

    for sheet in sheets {
        newest_as_of = Some(match newest_as_of {
            Some(current) if current >= sheet.as_of => current,
            _ => sheet.as_of,
        });

        let row_by_isin: HashMap<&str, &GiltRow> =
            sheet.rows.iter().map(|r| (r.isin.as_str(), r)).collect();
        for (isin, gilt) in &sheet.gilts {
            let Some(row) = row_by_isin.get(isin.as_str()) else {
                continue;
            };
            match merged.get(isin) {
                Some((existing_as_of, _, _)) if *existing_as_of >= sheet.as_of => {}
                _ => {
                    merged.insert(
                        isin.clone(),
                        (sheet.as_of, gilt.clone(), (*row).clone()),
                    );
                }
            }
        }
    }

    let as_of = newest_as_of.ok_or_else(|| {
        GiltError::source_discovery("no parsable gilt workbook in source set")
    })?;

    let mut gilts = HashMap::with_capacity(merged.len());
    let mut rows = Vec::with_capacity(merged.len());
    for (isin, (_, gilt, row)) in merged {
        gilts.insert(isin, gilt);
        rows.push(row);
    }
    sort_rows(&mut rows);

    Ok(MergedGilts { as_of, gilts, rows })
}

/// Sorts display rows by (redemption date, name).
pub fn sort_rows(rows: &mut [GiltRow]) {
    rows.sort_by(|a, b| {
        (a.redemption_date, &a.name).cmp(&(b.redemption_date, &b.name))
    });
}

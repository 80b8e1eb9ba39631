//! Calamine-backed workbook loading.
//!
//! Reads the first worksheet of a `.xls` or `.xlsx` file into the crate's
//! [`CellGrid`] model.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use gilt_core::{GiltError, GiltResult};

use crate::cell::{Cell, CellGrid};

/// Loads the first worksheet of a workbook as a cell grid.
///
/// # Errors
///
/// Returns `GiltError::Parse` if the file cannot be opened or its first
/// sheet cannot be read, and `GiltError::SourceDiscovery` if the workbook
/// has no sheets at all.
pub fn load_workbook_grid(path: impl AsRef<Path>) -> GiltResult<CellGrid> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| GiltError::parse(format!("failed to open workbook {}: {e}", path.display())))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| {
            GiltError::source_discovery(format!("workbook has no sheets: {}", path.display()))
        })?;

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        GiltError::parse(format!(
            "failed to read sheet '{sheet_name}' of {}: {e}",
            path.display()
        ))
    })?;

    tracing::debug!(
        path = %path.display(),
        sheet = %sheet_name,
        rows = range.height(),
        "loaded workbook grid"
    );

    Ok(range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect())
}

fn convert_cell(value: &Data) -> Cell {
    match value {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Float(v) => Cell::Number(*v),
        Data::String(v) => Cell::Text(v.clone()),
        Data::Bool(v) => Cell::Text(v.to_string()),
        Data::DateTime(v) => match v.as_datetime() {
            Some(dt) => Cell::Date(dt.date().into()),
            None => Cell::Number(v.as_f64()),
        },
        Data::DateTimeIso(v) | Data::DurationIso(v) => Cell::Text(v.clone()),
    }
}

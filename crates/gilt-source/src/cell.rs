//! In-memory cell model for workbook parsing.
//!
//! The parser operates on a grid of [`Cell`] values rather than on calamine
//! types directly, so its behavior can be unit-tested on hand-built grids.
//!
//! Raw numeric date serials are interpreted in the 1900 date system only.
//! Cells the workbook formats as dates arrive already resolved (calamine
//! honours the workbook's date mode there), so the assumption bites only
//! date cells stored as plain floats in a 1904-mode file, which the DMO has
//! never published.

use gilt_core::types::Date;
use gilt_core::{GiltError, GiltResult};

/// Excel 1900 date system epoch (serial 0 = 1899-12-30).
///
/// Serials below 61 predate the fictitious 1900-02-29 and would need the
/// off-by-one correction; gilt issue dates are all well past it.
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// A single worksheet cell, reduced to the shapes the parser cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// An empty or unreadable cell.
    Empty,
    /// A numeric cell (including raw date serials).
    Number(f64),
    /// A text cell.
    Text(String),
    /// A cell the workbook reader already resolved to a calendar date.
    Date(Date),
}

/// A worksheet as a row-major grid of cells.
pub type CellGrid = Vec<Vec<Cell>>;

impl Cell {
    /// Renders the cell as trimmed text, the way the parser reads free-form
    /// cells (names, markers, dividend dates).
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => {
                // Whole numbers render without a trailing ".0", matching how
                // they appear in the sheet.
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Cell::Text(s) => s.trim().to_string(),
            Cell::Date(d) => d.to_string(),
        }
    }

    /// Returns the numeric value for amount cells, `None` otherwise.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Interprets the cell as a calendar date.
    ///
    /// Accepts resolved dates, Excel 1900-system numeric serials, and ISO
    /// `YYYY-MM-DD` text.
    ///
    /// # Errors
    ///
    /// Returns `GiltError::UnsupportedCell` for empty cells, and
    /// `GiltError::InvalidDate` for unparseable text or out-of-range
    /// serials.
    pub fn as_date(&self) -> GiltResult<Date> {
        match self {
            Cell::Date(d) => Ok(*d),
            Cell::Number(serial) => date_from_serial(*serial),
            Cell::Text(s) => Date::parse(s.trim()),
            Cell::Empty => Err(GiltError::unsupported_cell(
                "empty cell where a date was expected",
            )),
        }
    }

    /// Returns true if the cell renders to empty text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.as_text().is_empty()
    }
}

/// Converts an Excel 1900-system date serial to a calendar date.
fn date_from_serial(serial: f64) -> GiltResult<Date> {
    if !serial.is_finite() || serial < 61.0 || serial > 2_958_465.0 {
        return Err(GiltError::invalid_date(format!(
            "date serial out of range: {serial}"
        )));
    }
    let (y, m, d) = EXCEL_EPOCH;
    let epoch = Date::from_ymd(y, m, d)?;
    Ok(epoch.add_days(serial.trunc() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_conversion() {
        // 2024-01-01 is serial 45292 in the 1900 date system.
        let date = Cell::Number(45292.0).as_date().unwrap();
        assert_eq!(date, Date::from_ymd(2024, 1, 1).unwrap());

        // Time-of-day fractions are truncated.
        let date = Cell::Number(45292.75).as_date().unwrap();
        assert_eq!(date, Date::from_ymd(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_serial_out_of_range() {
        assert!(Cell::Number(0.0).as_date().is_err());
        assert!(Cell::Number(-5.0).as_date().is_err());
        assert!(Cell::Number(f64::NAN).as_date().is_err());
    }

    #[test]
    fn test_iso_text_date() {
        let date = Cell::Text(" 2032-06-07 ".to_string()).as_date().unwrap();
        assert_eq!(date, Date::from_ymd(2032, 6, 7).unwrap());
        assert!(Cell::Text("07/06/2032".to_string()).as_date().is_err());
    }

    #[test]
    fn test_empty_cell_date_error() {
        assert!(matches!(
            Cell::Empty.as_date(),
            Err(GiltError::UnsupportedCell { .. })
        ));
    }

    #[test]
    fn test_as_text_rendering() {
        assert_eq!(Cell::Text("  7 Jun/Dec ".to_string()).as_text(), "7 Jun/Dec");
        assert_eq!(Cell::Number(4000.0).as_text(), "4000");
        assert_eq!(Cell::Number(4000.5).as_text(), "4000.5");
        assert_eq!(Cell::Empty.as_text(), "");
        assert!(Cell::Empty.is_blank());
    }
}

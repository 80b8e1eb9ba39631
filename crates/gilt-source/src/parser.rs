//! Tolerant parser for the "Gilts in Issue" worksheet layout.
//!
//! The sheet is semi-free-form: a data-date banner at the top, section
//! banners ("Conventional Gilts", "Index-linked Gilts"), maturity-category
//! label rows, a header row naming the columns, and data rows in between
//! subtotals and notes. The parser walks rows top to bottom through an
//! explicit state machine:
//!
//! - [`ParserState::OutsideTable`]: before the conventional section (or
//!   after leaving it for the index-linked section)
//! - [`ParserState::AwaitingHeader`]: inside the conventional section,
//!   header row not yet seen
//! - [`ParserState::ReadingRows`]: header map established; category labels
//!   update the current bucket and rows with a well-formed ISIN become
//!   securities
//!
//! Data rows are read by header name rather than position, so the parser
//! survives column reordering but fails loudly on renamed headers.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use gilt_core::types::{Date, Gilt, GiltRow, MaturityBucket};
use gilt_core::{GiltError, GiltResult};

use crate::cell::{Cell, CellGrid};

static DATA_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bData\s*Date\s*:\s*(\d{1,2}-[A-Za-z]{3}-\d{4})\b").expect("valid regex")
});

static ISIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{12}$").expect("valid regex"));

static DIVIDEND_DATES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{1,2})\s+([A-Za-z]+)/([A-Za-z]+)\s*$").expect("valid regex"));

/// Unicode vulgar fractions appearing in gilt display names.
const VULGAR_FRACTIONS: [(char, &str); 7] = [
    ('¼', "1/4"),
    ('½', "1/2"),
    ('¾', "3/4"),
    ('⅛', "1/8"),
    ('⅜', "3/8"),
    ('⅝', "5/8"),
    ('⅞', "7/8"),
];

/// Required data-row columns, by their workbook header text.
const COL_ISIN: &str = "ISIN Code";
const COL_REDEMPTION: &str = "Redemption Date";
const COL_FIRST_ISSUE: &str = "First Issue Date";
const COL_DIVIDEND_DATES: &str = "Dividend Dates";
const COL_AMOUNT_IN_ISSUE: &str = "Total Amount in Issue (£ million nominal)";

/// Parser position within the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Not inside the conventional-gilts section.
    OutsideTable,
    /// Inside the section, before the column header row.
    AwaitingHeader,
    /// Header map established; reading data rows.
    ReadingRows,
}

/// One parsed source file: as-of date, securities by ISIN, display rows.
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    /// Date the file's data is declared valid.
    pub as_of: Date,
    /// Conventional gilts keyed by ISIN.
    pub gilts: HashMap<String, Gilt>,
    /// Display rows, in sheet order.
    pub rows: Vec<GiltRow>,
}

/// Parses a worksheet grid into structured gilt records.
///
/// # Errors
///
/// Returns `GiltError::Parse` for a missing as-of banner, unparseable
/// coupon-rate or dividend-date text; `GiltError::MissingColumn` when a
/// required header is absent once a data row is read; and date-cell errors
/// from [`Cell::as_date`].
pub fn parse_sheet(grid: &CellGrid) -> GiltResult<ParsedSheet> {
    let banner = grid
        .first()
        .and_then(|row| row.first())
        .map(Cell::as_text)
        .unwrap_or_default();
    let as_of = parse_data_date(&banner)?;

    let mut state = ParserState::OutsideTable;
    let mut header_map: HashMap<String, usize> = HashMap::new();
    let mut current_bucket: Option<MaturityBucket> = None;
    let mut gilts: HashMap<String, Gilt> = HashMap::new();
    let mut rows_out: Vec<GiltRow> = Vec::new();

    for row in grid {
        let normalized: Vec<String> = row.iter().map(|c| normalize(&c.as_text())).collect();
        if normalized.iter().all(String::is_empty) {
            continue;
        }

        if normalized.iter().any(|c| c == "conventional gilts") {
            // A repeated marker re-enters the section; an already-parsed
            // header keeps serving.
            state = if header_map.is_empty() {
                ParserState::AwaitingHeader
            } else {
                ParserState::ReadingRows
            };
        }
        if normalized.iter().any(|c| c.contains("index-linked gilts")) {
            state = ParserState::OutsideTable;
            continue;
        }

        match state {
            ParserState::OutsideTable => continue,
            ParserState::AwaitingHeader => {
                let has_isin = normalized.iter().any(|c| c == "isin code");
                let has_redemption = normalized.iter().any(|c| c == "redemption date");
                if has_isin && has_redemption {
                    header_map = normalized
                        .iter()
                        .enumerate()
                        .filter(|(_, c)| !c.is_empty())
                        .map(|(i, c)| (c.clone(), i))
                        .collect();
                    state = ParserState::ReadingRows;
                }
                continue;
            }
            ParserState::ReadingRows => {}
        }

        let name = row.first().map(Cell::as_text).unwrap_or_default();
        if let Some(bucket) = MaturityBucket::from_label(&name) {
            current_bucket = Some(bucket);
            continue;
        }

        let isin = cell_at(row, col(&header_map, COL_ISIN)?).as_text();
        if !ISIN_RE.is_match(&isin) {
            // Subtotals, notes, and blank spacer rows land here.
            continue;
        }

        let redemption_date = cell_at(row, col(&header_map, COL_REDEMPTION)?).as_date()?;
        let first_issue_date = cell_at(row, col(&header_map, COL_FIRST_ISSUE)?).as_date()?;
        let dividend_dates = cell_at(row, col(&header_map, COL_DIVIDEND_DATES)?).as_text();
        let (coupon_day, coupon_months) = parse_dividend_dates(&dividend_dates)?;
        let coupon_rate_percent = parse_coupon_rate_percent(&name)?;
        let total_amount = cell_at(row, col(&header_map, COL_AMOUNT_IN_ISSUE)?).as_number();

        let gilt = Gilt::new(
            name.clone(),
            isin.clone(),
            redemption_date,
            first_issue_date,
            coupon_rate_percent,
            coupon_day,
            coupon_months,
            current_bucket,
        )?;
        gilts.insert(isin.clone(), gilt);
        rows_out.push(GiltRow {
            bucket: current_bucket,
            name,
            isin,
            redemption_date,
            first_issue_date,
            dividend_dates,
            total_amount_in_issue_million: total_amount,
            coupon_rate_percent,
        });
    }

    Ok(ParsedSheet {
        as_of,
        gilts,
        rows: rows_out,
    })
}

/// Extracts the as-of date from a `Data Date: DD-MMM-YYYY` banner.
///
/// # Errors
///
/// Returns `GiltError::Parse` if the pattern is absent or the captured date
/// is invalid.
pub fn parse_data_date(banner: &str) -> GiltResult<Date> {
    let captures = DATA_DATE_RE
        .captures(banner)
        .ok_or_else(|| GiltError::parse("could not parse data date from workbook"))?;
    let text = &captures[1];
    chrono::NaiveDate::parse_from_str(text, "%d-%b-%Y")
        .map(Date::from)
        .map_err(|_| GiltError::parse(format!("invalid data date: {text}")))
}

/// Derives the annual coupon rate from a gilt display name.
///
/// Takes the text before the first `%`, translates Unicode vulgar fractions
/// to ASCII `n/d` form, and sums whitespace-separated whole-number and
/// fraction tokens, so "4¼% Treasury Gilt 2032" yields 4.25.
///
/// # Errors
///
/// Returns `GiltError::Parse` if no `%` is present or a token is
/// non-numeric.
pub fn parse_coupon_rate_percent(name: &str) -> GiltResult<f64> {
    let Some(prefix) = name.split('%').next().filter(|_| name.contains('%')) else {
        return Err(GiltError::parse(format!(
            "cannot parse coupon rate from gilt name: {name}"
        )));
    };

    let mut prefix = prefix.to_string();
    for (glyph, ascii) in VULGAR_FRACTIONS {
        prefix = prefix.replace(glyph, &format!(" {ascii}"));
    }

    let tokens: Vec<&str> = prefix.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(GiltError::parse(format!(
            "cannot parse coupon rate from gilt name: {name}"
        )));
    }

    let mut total = 0.0;
    for token in tokens {
        total += match token.split_once('/') {
            Some((num, den)) => {
                let num: f64 = parse_numeric_token(num, name)?;
                let den: f64 = parse_numeric_token(den, name)?;
                num / den
            }
            None => parse_numeric_token(token, name)?,
        };
    }
    Ok(total)
}

fn parse_numeric_token(token: &str, name: &str) -> GiltResult<f64> {
    token.parse().map_err(|_| {
        GiltError::parse(format!(
            "non-numeric token '{token}' in coupon rate for gilt name: {name}"
        ))
    })
}

/// Parses a dividend-dates cell of the form `<day> <Month1>/<Month2>`.
///
/// Month names may be three-letter abbreviations or full names, in any
/// case. The two months are returned sorted.
///
/// # Errors
///
/// Returns `GiltError::Parse` on any other format or unknown month names.
pub fn parse_dividend_dates(text: &str) -> GiltResult<(u32, (u32, u32))> {
    let captures = DIVIDEND_DATES_RE
        .captures(text)
        .ok_or_else(|| GiltError::parse(format!("unrecognized dividend date format: {text:?}")))?;

    let day: u32 = captures[1]
        .parse()
        .map_err(|_| GiltError::parse(format!("invalid dividend day in: {text:?}")))?;
    let m1 = month_number(&captures[2]);
    let m2 = month_number(&captures[3]);
    let (Some(m1), Some(m2)) = (m1, m2) else {
        return Err(GiltError::parse(format!(
            "unrecognized month names in dividend date format: {text:?}"
        )));
    };

    Ok((day, if m1 <= m2 { (m1, m2) } else { (m2, m1) }))
}

/// Resolves a month name (full or abbreviated, any case) to its number.
fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    if lower.len() < 3 {
        return None;
    }
    let month = match &lower[..3] {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Collapses whitespace runs to single spaces, trims, and case-folds.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn col(header_map: &HashMap<String, usize>, name: &str) -> GiltResult<usize> {
    header_map
        .get(&normalize(name))
        .copied()
        .ok_or_else(|| GiltError::missing_column(name))
}

fn cell_at(row: &[Cell], index: usize) -> Cell {
    row.get(index).cloned().unwrap_or(Cell::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn date(y: i32, m: u32, d: u32) -> Cell {
        Cell::Date(Date::from_ymd(y, m, d).unwrap())
    }

    /// A representative worksheet: banner, noise, sections, categories,
    /// subtotal rows, and two data rows.
    fn sample_grid() -> CellGrid {
        vec![
            vec![text("Gilts in Issue ... Data Date: 15-Jan-2024")],
            vec![Cell::Empty, Cell::Empty],
            vec![text("Conventional Gilts")],
            vec![
                text("Conventional Gilts"),
                text("ISIN Code"),
                text("Redemption  Date"),
                text("First Issue Date"),
                text("Dividend Dates"),
                text("Total Amount in Issue (£ million nominal)"),
            ],
            vec![text("Short")],
            vec![
                text("4¼% Treasury Gilt 2032"),
                text("GB00B6460505"),
                date(2032, 6, 7),
                date(2011, 9, 21),
                text("7 Jun/Dec"),
                Cell::Number(40000.0),
            ],
            vec![text("Subtotal"), text(""), Cell::Empty],
            vec![text("Medium")],
            vec![
                text("2½% Treasury Gilt 2030"),
                text("GB00TEST00X9"),
                Cell::Number(47679.0), // 2030-07-15 as a raw serial
                text("2020-07-15"),
                text("15 Jan/Jul"),
                text("n/a"),
            ],
            vec![text("Index-linked Gilts (3-month Indexation Lag)")],
            vec![
                text("0⅛% Index-linked Treasury Gilt 2031"),
                text("GB00INDEX001"),
                date(2031, 8, 10),
                date(2021, 2, 11),
                text("10 Feb/Aug"),
                Cell::Number(10000.0),
            ],
        ]
    }

    #[test]
    fn test_parse_sample_sheet() {
        let parsed = parse_sheet(&sample_grid()).unwrap();

        assert_eq!(parsed.as_of, Date::from_ymd(2024, 1, 15).unwrap());
        // The index-linked gilt must not be picked up.
        assert_eq!(parsed.gilts.len(), 2);
        assert_eq!(parsed.rows.len(), 2);

        let g = &parsed.gilts["GB00B6460505"];
        assert_eq!(g.coupon_rate_percent, 4.25);
        assert_eq!(g.coupon_day, 7);
        assert_eq!(g.coupon_months, (6, 12));
        assert_eq!(g.bucket, Some(MaturityBucket::Short));
        assert_eq!(g.redemption_date, Date::from_ymd(2032, 6, 7).unwrap());

        let g = &parsed.gilts["GB00TEST00X9"];
        assert_eq!(g.coupon_rate_percent, 2.5);
        assert_eq!(g.bucket, Some(MaturityBucket::Medium));
        // Raw serial and ISO text date cells both resolve.
        assert_eq!(g.redemption_date, Date::from_ymd(2030, 7, 15).unwrap());
        assert_eq!(g.first_issue_date, Date::from_ymd(2020, 7, 15).unwrap());

        // Non-numeric amount cell becomes None.
        assert_eq!(parsed.rows[1].total_amount_in_issue_million, None);
        assert_eq!(parsed.rows[0].total_amount_in_issue_million, Some(40000.0));
    }

    #[test]
    fn test_column_reordering_tolerated() {
        let mut grid = sample_grid();
        // Swap ISIN and Dividend Dates columns in header and data rows.
        for row in &mut grid {
            if row.len() >= 5 {
                row.swap(1, 4);
            }
        }
        let parsed = parse_sheet(&grid).unwrap();
        assert!(parsed.gilts.contains_key("GB00B6460505"));
    }

    #[test]
    fn test_missing_data_date_fails() {
        let grid: CellGrid = vec![vec![text("Gilts in Issue")]];
        assert!(matches!(
            parse_sheet(&grid),
            Err(GiltError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_column_fails_on_first_data_row() {
        let grid: CellGrid = vec![
            vec![text("Data Date: 15-Jan-2024")],
            vec![text("Conventional Gilts")],
            vec![
                text(""),
                text("ISIN Code"),
                text("Redemption Date"),
                // "First Issue Date" renamed.
                text("Issued On"),
                text("Dividend Dates"),
            ],
            vec![
                text("4% Treasury Gilt 2040"),
                text("GB00TEST00X1"),
                date(2040, 3, 7),
                date(2020, 3, 7),
                text("7 Mar/Sep"),
            ],
        ];
        assert!(matches!(
            parse_sheet(&grid),
            Err(GiltError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_repeated_marker_keeps_established_header() {
        let grid: CellGrid = vec![
            vec![text("Data Date: 15-Jan-2024")],
            vec![text("Conventional Gilts")],
            vec![
                text(""),
                text("ISIN Code"),
                text("Redemption Date"),
                text("First Issue Date"),
                text("Dividend Dates"),
                text("Total Amount in Issue (£ million nominal)"),
            ],
            vec![
                text("4% Treasury Gilt 2040"),
                text("GB00TEST00X1"),
                date(2040, 3, 7),
                date(2020, 3, 7),
                text("7 Mar/Sep"),
                Cell::Number(30000.0),
            ],
            // A stray repeat of the section marker mid-table.
            vec![text("Conventional Gilts")],
            vec![
                text("2% Treasury Gilt 2035"),
                text("GB00TEST00X2"),
                date(2035, 3, 7),
                date(2021, 3, 7),
                text("7 Mar/Sep"),
                Cell::Number(20000.0),
            ],
        ];

        let parsed = parse_sheet(&grid).unwrap();
        assert_eq!(parsed.gilts.len(), 2);
        assert!(parsed.gilts.contains_key("GB00TEST00X1"));
        assert!(parsed.gilts.contains_key("GB00TEST00X2"));
    }

    #[test]
    fn test_rows_outside_section_ignored() {
        let grid: CellGrid = vec![
            vec![text("Data Date: 15-Jan-2024")],
            // A plausible data row, but no section marker was seen.
            vec![
                text("4% Treasury Gilt 2040"),
                text("GB00TEST00X1"),
                date(2040, 3, 7),
                date(2020, 3, 7),
                text("7 Mar/Sep"),
            ],
        ];
        let parsed = parse_sheet(&grid).unwrap();
        assert!(parsed.gilts.is_empty());
    }

    #[test]
    fn test_coupon_rate_from_name() {
        assert_eq!(
            parse_coupon_rate_percent("4¼% Treasury Gilt 2032").unwrap(),
            4.25
        );
        assert_eq!(
            parse_coupon_rate_percent("2½% Treasury Gilt 2030").unwrap(),
            2.5
        );
        assert_eq!(
            parse_coupon_rate_percent("0⅛% Treasury Gilt 2026").unwrap(),
            0.125
        );
        assert_eq!(
            parse_coupon_rate_percent("4 1/4% Treasury Stock 2032").unwrap(),
            4.25
        );
        assert_eq!(parse_coupon_rate_percent("6% Treasury Stock 2028").unwrap(), 6.0);
    }

    #[test]
    fn test_coupon_rate_errors() {
        assert!(parse_coupon_rate_percent("Treasury Gilt 2032").is_err());
        assert!(parse_coupon_rate_percent("% Treasury Gilt 2032").is_err());
        assert!(parse_coupon_rate_percent("abc% Treasury Gilt 2032").is_err());
    }

    #[test]
    fn test_dividend_dates_parsing() {
        assert_eq!(parse_dividend_dates("7 Jun/Dec").unwrap(), (7, (6, 12)));
        assert_eq!(parse_dividend_dates("7 Dec/Jun").unwrap(), (7, (6, 12)));
        assert_eq!(
            parse_dividend_dates(" 22 March/September ").unwrap(),
            (22, (3, 9))
        );
        assert_eq!(parse_dividend_dates("31 JAN/jul").unwrap(), (31, (1, 7)));
    }

    #[test]
    fn test_dividend_dates_errors() {
        assert!(parse_dividend_dates("7 June").is_err());
        assert!(parse_dividend_dates("Jun/Dec").is_err());
        assert!(parse_dividend_dates("7 Xyz/Dec").is_err());
        assert!(parse_dividend_dates("").is_err());
    }

    #[test]
    fn test_data_date_parsing() {
        assert_eq!(
            parse_data_date("Data Date: 7-Jun-2024").unwrap(),
            Date::from_ymd(2024, 6, 7).unwrap()
        );
        assert_eq!(
            parse_data_date("DMO  Data  Date : 15-Jan-2024 (close)").unwrap(),
            Date::from_ymd(2024, 1, 15).unwrap()
        );
        assert!(parse_data_date("Data Date: 2024-01-15").is_err());
        assert!(parse_data_date("").is_err());
    }
}

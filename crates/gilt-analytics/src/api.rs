//! Top-level operations: load the issuance table and price a single gilt.

use std::path::Path;

use serde::{Deserialize, Serialize};

use gilt_core::types::{Date, GiltRow};
use gilt_core::{GiltError, GiltResult};
use gilt_source::{load_parsed_sheet, sort_rows, SourceCache};

use crate::yields::{gilt_yield_report, GiltYieldReport};

/// Inputs for a single yield calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldRequest {
    /// ISIN of the gilt to price.
    pub isin: String,
    /// Quoted clean price per 100 nominal.
    pub clean_price_per_100: f64,
    /// Marginal income tax rate on coupons, in `[0, 1)`.
    pub tax_rate: f64,
    /// Settlement date; defaults to the merged table's as-of date.
    #[serde(default)]
    pub settlement_date: Option<Date>,
}

/// The issuance table split by redemption status.
#[derive(Debug, Clone, Serialize)]
pub struct GiltTable {
    /// Greatest as-of date across the source files.
    pub as_of: Date,
    /// Gilts redeeming today or later, sorted by (redemption date, name).
    pub active: Vec<GiltRow>,
    /// Already-redeemed gilts, sorted the same way.
    pub past: Vec<GiltRow>,
}

/// Loads, merges and splits the issuance table from a source directory.
///
/// All recognized workbook files in `dir` are parsed and merged, with the
/// most recently dated record winning per ISIN. The cache skips re-parsing
/// when the directory's files are unchanged.
///
/// # Errors
///
/// Fails if the directory holds no recognizable source files or any file
/// cannot be parsed.
pub fn load_merged_gilt_table_rows(
    cache: &SourceCache,
    dir: impl AsRef<Path>,
) -> GiltResult<GiltTable> {
    let merged = cache.load_merged(dir)?;
    let today = Date::today();

    let (mut active, mut past): (Vec<GiltRow>, Vec<GiltRow>) = merged
        .rows
        .into_iter()
        .partition(|row| row.redemption_date >= today);
    sort_rows(&mut active);
    sort_rows(&mut past);

    Ok(GiltTable {
        as_of: merged.as_of,
        active,
        past,
    })
}

/// Loads the issuance table from a single workbook file, without merging.
///
/// # Errors
///
/// Fails if the file cannot be opened or parsed.
pub fn load_gilt_table_rows(path: impl AsRef<Path>) -> GiltResult<GiltTable> {
    let sheet = load_parsed_sheet(path)?;
    let today = Date::today();

    let (mut active, mut past): (Vec<GiltRow>, Vec<GiltRow>) = sheet
        .rows
        .into_iter()
        .partition(|row| row.redemption_date >= today);
    sort_rows(&mut active);
    sort_rows(&mut past);

    Ok(GiltTable {
        as_of: sheet.as_of,
        active,
        past,
    })
}

/// Prices one gilt from the merged issuance table.
///
/// Settlement defaults to the table's as-of date when the request leaves it
/// unset.
///
/// # Errors
///
/// Fails on an out-of-range tax rate or non-positive price, an unknown
/// ISIN, or a settlement date after the gilt's maturity.
pub fn calculate_gilt_yield(
    cache: &SourceCache,
    dir: impl AsRef<Path>,
    request: &YieldRequest,
) -> GiltResult<GiltYieldReport> {
    if !(0.0..1.0).contains(&request.tax_rate) {
        return Err(GiltError::validation(format!(
            "tax rate {} must be in [0, 1)",
            request.tax_rate
        )));
    }
    if !(request.clean_price_per_100 > 0.0) {
        return Err(GiltError::validation(format!(
            "clean price {} must be positive",
            request.clean_price_per_100
        )));
    }

    let merged = cache.load_merged(dir)?;
    let gilt = merged
        .gilts
        .get(&request.isin)
        .ok_or_else(|| GiltError::not_found(&request.isin))?;

    let settlement = request.settlement_date.unwrap_or(merged.as_of);
    tracing::debug!(
        isin = %request.isin,
        settlement = %settlement,
        clean_price = request.clean_price_per_100,
        "calculating gilt yield"
    );
    gilt_yield_report(
        gilt,
        settlement,
        request.clean_price_per_100,
        request.tax_rate,
    )
}

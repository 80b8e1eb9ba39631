//! Denormalized listing row for table rendering.

use serde::{Deserialize, Serialize};

use super::{Date, MaturityBucket};

/// A denormalized, append-only record for rendering the gilt table.
///
/// One-to-one with a [`super::Gilt`] at load time, but retained
/// independently: a security may be superseded by a newer source file while
/// its historical row is still shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiltRow {
    /// Maturity bucket label the row was listed under.
    pub bucket: Option<MaturityBucket>,
    /// Display name.
    pub name: String,
    /// 12-character alphanumeric ISIN.
    pub isin: String,
    /// Date principal is repaid.
    pub redemption_date: Date,
    /// Date the gilt was first issued.
    pub first_issue_date: Date,
    /// Raw dividend-dates cell text, e.g. "7 Jun/Dec".
    pub dividend_dates: String,
    /// Total amount in issue, in £ million nominal, when the cell is numeric.
    pub total_amount_in_issue_million: Option<f64>,
    /// Annual coupon rate, in percent.
    pub coupon_rate_percent: f64,
}

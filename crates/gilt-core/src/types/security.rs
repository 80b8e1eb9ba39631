//! The conventional gilt security record.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GiltError, GiltResult};

use super::Date;

/// Maturity bucket used by the DMO to group conventional gilts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaturityBucket {
    /// Ultra-short maturities.
    UltraShort,
    /// Short maturities.
    Short,
    /// Medium maturities.
    Medium,
    /// Long maturities.
    Long,
}

impl MaturityBucket {
    /// Parses a category label row as it appears in the workbook.
    ///
    /// Returns `None` for anything that is not one of the four labels, so
    /// callers can distinguish category rows from data rows.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Ultra-Short" => Some(Self::UltraShort),
            "Short" => Some(Self::Short),
            "Medium" => Some(Self::Medium),
            "Long" => Some(Self::Long),
            _ => None,
        }
    }

    /// Returns the label as it appears in the workbook.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::UltraShort => "Ultra-Short",
            Self::Short => "Short",
            Self::Medium => "Medium",
            Self::Long => "Long",
        }
    }
}

impl fmt::Display for MaturityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A conventional UK gilt.
///
/// Immutable once constructed. Coupons are paid semi-annually on
/// `coupon_day` of the two `coupon_months`, and principal (100 per 100
/// nominal) is repaid on `redemption_date`.
///
/// # Example
///
/// ```rust
/// use gilt_core::types::{Date, Gilt, MaturityBucket};
///
/// let gilt = Gilt::new(
///     "4¼% Treasury Gilt 2032".to_string(),
///     "GB00B6460505".to_string(),
///     Date::from_ymd(2032, 6, 7).unwrap(),
///     Date::from_ymd(2011, 9, 21).unwrap(),
///     4.25,
///     7,
///     (6, 12),
///     Some(MaturityBucket::Medium),
/// )
/// .unwrap();
/// assert_eq!(gilt.coupon_per_period_per_100(), 2.125);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gilt {
    /// Display name, encoding the coupon rate (e.g. "4¼% Treasury Gilt 2032").
    pub name: String,
    /// 12-character alphanumeric ISIN.
    pub isin: String,
    /// Date principal is repaid.
    pub redemption_date: Date,
    /// Date the gilt was first issued.
    pub first_issue_date: Date,
    /// Annual coupon rate, in percent.
    pub coupon_rate_percent: f64,
    /// Day of month coupons are paid.
    pub coupon_day: u32,
    /// The two coupon months, stored sorted.
    pub coupon_months: (u32, u32),
    /// Maturity bucket the DMO lists this gilt under.
    pub bucket: Option<MaturityBucket>,
}

impl Gilt {
    /// Creates a new gilt, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns `GiltError::Validation` if the first-issue date is after the
    /// redemption date, or the coupon day/months are out of range.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        isin: String,
        redemption_date: Date,
        first_issue_date: Date,
        coupon_rate_percent: f64,
        coupon_day: u32,
        coupon_months: (u32, u32),
        bucket: Option<MaturityBucket>,
    ) -> GiltResult<Self> {
        if first_issue_date > redemption_date {
            return Err(GiltError::validation(format!(
                "first issue date {first_issue_date} is after redemption date {redemption_date} for {isin}"
            )));
        }
        if !(1..=31).contains(&coupon_day) {
            return Err(GiltError::validation(format!(
                "coupon day {coupon_day} out of range for {isin}"
            )));
        }
        let (m1, m2) = coupon_months;
        if !(1..=12).contains(&m1) || !(1..=12).contains(&m2) {
            return Err(GiltError::validation(format!(
                "coupon months ({m1}, {m2}) out of range for {isin}"
            )));
        }

        let coupon_months = if m1 <= m2 { (m1, m2) } else { (m2, m1) };
        Ok(Self {
            name,
            isin,
            redemption_date,
            first_issue_date,
            coupon_rate_percent,
            coupon_day,
            coupon_months,
            bucket,
        })
    }

    /// Coupon paid each semi-annual period, per 100 nominal.
    #[must_use]
    pub fn coupon_per_period_per_100(&self) -> f64 {
        self.coupon_rate_percent / 2.0
    }
}

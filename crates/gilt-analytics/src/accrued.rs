//! Accrued interest and ex-dividend determination.
//!
//! Gilts use actual/actual accrual within the coupon period and go
//! ex-dividend seven business days (weekends only, no holiday calendar)
//! before each coupon payment. During the ex-dividend window the seller
//! keeps the full coupon, so accrued interest turns negative.

use serde::{Deserialize, Serialize};

use gilt_core::types::{Date, Gilt};
use gilt_core::{GiltError, GiltResult};

use crate::schedule::CouponWindow;

/// Business days between a coupon date and the start of its ex-dividend window.
pub const EX_DIVIDEND_BUSINESS_DAYS: u32 = 7;

/// Accrued interest for a settlement date within one coupon period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccruedInterest {
    /// Accrued interest per 100 nominal. Negative when ex-dividend.
    pub amount_per_100: f64,
    /// First day of the ex-dividend window for the next coupon.
    pub ex_dividend_start: Date,
    /// Whether settlement falls inside the ex-dividend window.
    pub is_ex_dividend: bool,
}

/// Computes accrued interest per 100 nominal for a settlement date.
///
/// Cum-dividend accrual is `coupon * elapsed / period` over actual day
/// counts. In the ex-dividend window the next coupon belongs to the seller,
/// so the full coupon is subtracted and the result is negative.
///
/// # Errors
///
/// Returns `GiltError::Validation` if the coupon period has zero or
/// negative length.
pub fn accrued_interest(
    gilt: &Gilt,
    settlement: Date,
    window: &CouponWindow,
) -> GiltResult<AccruedInterest> {
    let period_days = window.previous.days_until(&window.next);
    if period_days <= 0 {
        return Err(GiltError::validation(format!(
            "coupon period {} to {} has non-positive length for {}",
            window.previous, window.next, gilt.isin
        )));
    }
    let elapsed_days = window.previous.days_until(&settlement);

    let coupon = gilt.coupon_per_period_per_100();
    let mut amount = coupon * elapsed_days as f64 / period_days as f64;

    let ex_dividend_start = window.next.sub_business_days(EX_DIVIDEND_BUSINESS_DAYS);
    let is_ex_dividend = settlement >= ex_dividend_start && settlement < window.next;
    if is_ex_dividend {
        amount -= coupon;
    }

    Ok(AccruedInterest {
        amount_per_100: amount,
        ex_dividend_start,
        is_ex_dividend,
    })
}

//! Coupon schedule derivation and settlement bracketing.

use serde::{Deserialize, Serialize};

use gilt_core::types::{Date, Gilt};
use gilt_core::{GiltError, GiltResult};

/// The coupon period bracketing a settlement date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponWindow {
    /// Last schedule date strictly before settlement; the first-issue date
    /// if settlement predates every scheduled coupon.
    pub previous: Date,
    /// First schedule date on or after settlement.
    pub next: Date,
}

/// Derives the full sequence of coupon payment dates for a gilt.
///
/// Every calendar date matching (coupon day, one of the two coupon months)
/// is generated for each year from one before first issue to one after
/// redemption; invalid calendar combinations (day 31 in a 30-day month) and
/// dates outside `[first_issue, redemption]` are discarded. The redemption
/// date is force-appended if the day/month pattern does not already produce
/// it, so the schedule always ends at redemption.
#[must_use]
pub fn coupon_schedule(gilt: &Gilt) -> Vec<Date> {
    let (m1, m2) = gilt.coupon_months;
    let mut dates: Vec<Date> = Vec::new();

    for year in (gilt.first_issue_date.year() - 1)..=(gilt.redemption_date.year() + 1) {
        for month in [m1, m2] {
            let Some(date) = Date::from_ymd_opt(year, month, gilt.coupon_day) else {
                continue;
            };
            if date >= gilt.first_issue_date && date <= gilt.redemption_date {
                dates.push(date);
            }
        }
    }

    dates.sort_unstable();
    dates.dedup();
    if dates.last() != Some(&gilt.redemption_date) {
        dates.push(gilt.redemption_date);
        dates.sort_unstable();
    }
    dates
}

/// Locates the coupon period bracketing a settlement date.
///
/// # Errors
///
/// Returns `GiltError::Validation` if settlement falls after the redemption
/// date, where no next coupon exists.
pub fn find_coupon_window(gilt: &Gilt, settlement: Date) -> GiltResult<CouponWindow> {
    let schedule = coupon_schedule(gilt);

    let mut previous: Option<Date> = None;
    let mut next: Option<Date> = None;
    for date in schedule {
        if date < settlement {
            previous = Some(date);
            continue;
        }
        next = Some(date);
        break;
    }

    let next = next.ok_or_else(|| {
        GiltError::validation(format!(
            "settlement date {settlement} is after maturity for {}",
            gilt.isin
        ))
    })?;
    Ok(CouponWindow {
        previous: previous.unwrap_or(gilt.first_issue_date),
        next,
    })
}

//! Future cashflow projection from a settlement date.

use gilt_core::types::{Cashflow, Date, Gilt};
use gilt_core::GiltResult;

use crate::schedule::{coupon_schedule, find_coupon_window};

/// Projects the remaining cashflows of a gilt as seen from a settlement date.
///
/// Each scheduled coupon on or after settlement pays the half-yearly coupon;
/// the redemption date additionally repays 100 nominal. When the next coupon
/// is excluded (ex-dividend settlement, the buyer does not receive it), two
/// exclusions apply: a coupon falling exactly on the settlement date is
/// dropped, and the first eligible coupon after settlement is stripped of
/// its coupon component. Zero-amount flows are discarded.
///
/// # Errors
///
/// Propagates `GiltError::Validation` if settlement falls after maturity.
pub fn future_cashflows(
    gilt: &Gilt,
    settlement: Date,
    include_next_coupon: bool,
) -> GiltResult<Vec<Cashflow>> {
    let window = find_coupon_window(gilt, settlement)?;
    let coupon = gilt.coupon_per_period_per_100();

    let mut flows = Vec::new();
    for date in coupon_schedule(gilt) {
        if date < settlement {
            continue;
        }
        if date == settlement && !include_next_coupon {
            continue;
        }

        let mut amount = coupon;
        if date == gilt.redemption_date {
            amount += 100.0;
        }
        if date == window.next && !include_next_coupon {
            amount -= coupon;
        }
        if amount > 0.0 {
            flows.push(Cashflow {
                payment_date: date,
                amount_per_100: amount,
            });
        }
    }
    Ok(flows)
}

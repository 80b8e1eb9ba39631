//! Cash flow type for gilt analytics.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Date;

/// A dated cash flow, quoted per 100 nominal.
///
/// Produced transiently when enumerating the payments a buyer settling on a
/// given date is entitled to; never mutated after construction.
///
/// # Example
///
/// ```rust
/// use gilt_core::types::{Cashflow, Date};
///
/// let cf = Cashflow::new(Date::from_ymd(2024, 6, 7).unwrap(), 2.125);
/// assert_eq!(cf.amount_per_100, 2.125);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cashflow {
    /// Date the payment is made.
    pub payment_date: Date,
    /// Payment amount per 100 nominal.
    pub amount_per_100: f64,
}

impl Cashflow {
    /// Creates a new cash flow.
    #[must_use]
    pub fn new(payment_date: Date, amount_per_100: f64) -> Self {
        Self {
            payment_date,
            amount_per_100,
        }
    }
}

impl fmt::Display for Cashflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.6}", self.payment_date, self.amount_per_100)
    }
}

//! # Gilt Analytics
//!
//! Yield-calculation engine for conventional UK gilts.
//!
//! This crate provides:
//!
//! - **Schedules**: the full coupon date sequence for a gilt and the coupon
//!   period bracketing a settlement date
//! - **Accrual**: accrued interest with the UK 7-business-day ex-dividend
//!   rule (weekends only, no holiday calendar)
//! - **Cash flows**: the coupons and redemption payment visible to a buyer
//!   settling on a given date
//! - **Yields**: pre-tax and post-tax XIRR plus the gross-equivalent yield,
//!   assembled into a single [`yields::GiltYieldReport`]
//! - **API**: the two entry points consumed by the transport shell,
//!   [`api::load_merged_gilt_table_rows`] and [`api::calculate_gilt_yield`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accrued;
pub mod api;
pub mod cashflows;
pub mod schedule;
pub mod yields;

pub use api::{
    calculate_gilt_yield, load_gilt_table_rows, load_merged_gilt_table_rows, GiltTable,
    YieldRequest,
};
pub use yields::GiltYieldReport;

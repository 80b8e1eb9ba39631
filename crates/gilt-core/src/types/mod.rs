//! Core data types for gilt analytics.

mod cashflow;
mod date;
mod row;
mod security;

pub use cashflow::Cashflow;
pub use date::Date;
pub use row::GiltRow;
pub use security::{Gilt, MaturityBucket};

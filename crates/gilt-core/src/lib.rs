//! # Gilt Core
//!
//! Core types for UK gilt yield analytics.
//!
//! This crate provides:
//!
//! - **Dates**: a [`types::Date`] newtype over `chrono::NaiveDate` with the
//!   weekday-only business-day arithmetic used by the UK gilt ex-dividend rule
//! - **Securities**: the immutable [`types::Gilt`] record parsed from DMO
//!   "Gilts in Issue" workbooks, plus the denormalized [`types::GiltRow`]
//!   used for table rendering
//! - **Cash flows**: dated amounts per 100 nominal
//! - **Errors**: the [`error::GiltError`] taxonomy shared across the workspace

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{GiltError, GiltResult};

//! # Gilt Math
//!
//! Numerical layer for UK gilt yield analytics.
//!
//! This crate provides:
//!
//! - **Root finding**: Newton-Raphson (with numerical differentiation) and
//!   a bracketed bisection fallback
//! - **XIRR**: internal rate of return over cash flows on irregular dates,
//!   returning a tagged [`xirr::XirrOutcome`] so callers can distinguish
//!   "solved directly" from "solved by bracketing" from "no real root"

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod solvers;
pub mod xirr;

pub use error::{MathError, MathResult};
pub use xirr::{xirr, xnpv, XirrOutcome};

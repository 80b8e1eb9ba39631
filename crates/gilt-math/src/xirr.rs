//! Internal rate of return over cash flows on irregular dates (XIRR).
//!
//! The discount convention matches the spreadsheet XIRR function: each cash
//! flow is discounted by `(1 + r)^t` where `t` is the calendar-day distance
//! from the earliest cash flow divided by 365.

use serde::{Deserialize, Serialize};

use gilt_core::types::Date;

use crate::solvers::{bisection, newton_raphson_numerical, SolverConfig};

/// Lower bound of the fallback bracket, just above the -100% singularity.
const BRACKET_LO: f64 = -0.999_999_999;

/// Upper bound of the fallback bracket.
const BRACKET_HI: f64 = 1e10;

/// Outcome of an XIRR computation.
///
/// Some cash flow series (e.g. all-negative) have no real solution, which is
/// a legitimate result rather than an error. The tag also records how the
/// root was obtained, so tests and callers can tell "solved directly" from
/// "solved by bracketing".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "rate", rename_all = "snake_case")]
pub enum XirrOutcome {
    /// Newton-Raphson converged from the standing start.
    Converged(f64),
    /// Newton failed; the bracketed bisection fallback found the root.
    Bracketed(f64),
    /// No real root exists (or neither method could find one).
    Undefined,
}

impl XirrOutcome {
    /// Returns the solved rate, if any.
    #[must_use]
    pub fn rate(&self) -> Option<f64> {
        match self {
            Self::Converged(r) | Self::Bracketed(r) => Some(*r),
            Self::Undefined => None,
        }
    }

    /// Returns true if no real solution was found.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Applies a function to the solved rate, preserving the tag.
    #[must_use]
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Converged(r) => Self::Converged(f(r)),
            Self::Bracketed(r) => Self::Bracketed(f(r)),
            Self::Undefined => Self::Undefined,
        }
    }
}

/// Net present value of dated cash flows at the given annual rate.
///
/// Returns positive infinity at rates of -100% or below, where the discount
/// factor is undefined; this keeps the bisection bracket well-formed.
#[must_use]
pub fn xnpv(rate: f64, values: &[(Date, f64)]) -> f64 {
    if rate <= -1.0 {
        return f64::INFINITY;
    }
    let Some(d0) = values.iter().map(|(d, _)| *d).min() else {
        return 0.0;
    };

    values
        .iter()
        .map(|(date, amount)| {
            let t = d0.days_until(date) as f64 / 365.0;
            amount / (1.0 + rate).powf(t)
        })
        .sum()
}

/// Computes the internal rate of return for cash flows on irregular dates.
///
/// Attempts Newton-Raphson from 0.0 first; on non-convergence or an invalid
/// derivative, falls back to bisection over the open interval
/// (-0.999999999, 1e10). If both fail the outcome is
/// [`XirrOutcome::Undefined`].
#[must_use]
pub fn xirr(values: &[(Date, f64)], config: &SolverConfig) -> XirrOutcome {
    if values.is_empty() {
        return XirrOutcome::Undefined;
    }

    let f = |rate: f64| xnpv(rate, values);

    if let Ok(result) = newton_raphson_numerical(f, 0.0, config) {
        if result.root.is_finite() && result.root > -1.0 {
            return XirrOutcome::Converged(result.root);
        }
    }

    match bisection(f, BRACKET_LO, BRACKET_HI, config) {
        Ok(result) => XirrOutcome::Bracketed(result.root),
        Err(_) => XirrOutcome::Undefined,
    }
}

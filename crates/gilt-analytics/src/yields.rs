//! Yield computation and the per-gilt report.

use serde::Serialize;

use gilt_core::types::{Cashflow, Date, Gilt};
use gilt_core::{GiltError, GiltResult};
use gilt_math::solvers::SolverConfig;
use gilt_math::xirr::{xirr, XirrOutcome};

use crate::accrued::accrued_interest;
use crate::cashflows::future_cashflows;
use crate::schedule::find_coupon_window;

/// Full pricing and yield breakdown for one gilt at a settlement date.
///
/// All monetary amounts are per 100 nominal.
#[derive(Debug, Clone, Serialize)]
pub struct GiltYieldReport {
    /// ISIN of the gilt priced.
    pub isin: String,
    /// Display name from the issuance table.
    pub gilt_name: String,
    /// Settlement date the valuation is anchored on.
    pub settlement_date: Date,
    /// Quoted clean price.
    pub clean_price_per_100: f64,
    /// Accrued interest, negative in the ex-dividend window.
    pub accrued_interest_per_100: f64,
    /// Clean price plus accrued interest.
    pub dirty_price_per_100: f64,
    /// Annualized gross redemption yield.
    pub annualized_yield: XirrOutcome,
    /// Annualized return after coupon income tax.
    pub post_tax_return: XirrOutcome,
    /// Pre-tax yield a fully-taxed instrument would need to match the
    /// post-tax return.
    pub gross_equivalent_yield: XirrOutcome,
    /// Marginal income tax rate applied to coupons.
    pub tax_rate: f64,
    /// Start of the previous coupon period.
    pub previous_coupon_date: Date,
    /// Next coupon payment date.
    pub next_coupon_date: Date,
    /// Whether settlement falls in the ex-dividend window.
    pub is_ex_dividend: bool,
    /// Cashflows the buyer is entitled to.
    pub future_cashflows: Vec<Cashflow>,
    /// Sum of the entitled cashflows.
    pub total_future_cashflow_per_100: f64,
}

/// Splits a cashflow into its taxable coupon component.
///
/// Capital repayment is untaxed for gilts; on the redemption date only the
/// excess over the 100 principal counts as coupon.
fn coupon_component(gilt: &Gilt, flow: &Cashflow) -> f64 {
    if flow.payment_date < gilt.redemption_date {
        flow.amount_per_100
    } else {
        (flow.amount_per_100 - 100.0).max(0.0)
    }
}

/// Grosses a post-tax yield back up to its pre-tax equivalent.
///
/// # Errors
///
/// Returns `GiltError::Validation` unless `tax_rate` is in `[0, 1)`.
pub fn equivalent_pre_tax_yield(post_tax_yield: f64, tax_rate: f64) -> GiltResult<f64> {
    if !(0.0..1.0).contains(&tax_rate) {
        return Err(GiltError::validation(format!(
            "tax rate {tax_rate} must be in [0, 1)"
        )));
    }
    Ok(post_tax_yield / (1.0 - tax_rate))
}

/// Prices a gilt and solves its gross and post-tax yields.
///
/// The dirty price is treated as the outflow on the settlement date; the
/// buyer's entitled cashflows are the inflows. Tax applies to coupon income
/// only, so the post-tax series reduces each flow by the taxed share of its
/// coupon component.
///
/// # Errors
///
/// Fails on settlement after maturity or a degenerate coupon period.
pub fn gilt_yield_report(
    gilt: &Gilt,
    settlement: Date,
    clean_price_per_100: f64,
    tax_rate: f64,
) -> GiltResult<GiltYieldReport> {
    let window = find_coupon_window(gilt, settlement)?;
    let accrued = accrued_interest(gilt, settlement, &window)?;
    let dirty_price = clean_price_per_100 + accrued.amount_per_100;

    let flows = future_cashflows(gilt, settlement, !accrued.is_ex_dividend)?;
    let total: f64 = flows.iter().map(|f| f.amount_per_100).sum();

    let config = SolverConfig::default();
    let mut gross_series: Vec<(Date, f64)> = vec![(settlement, -dirty_price)];
    gross_series.extend(flows.iter().map(|f| (f.payment_date, f.amount_per_100)));
    let annualized_yield = xirr(&gross_series, &config);

    let mut taxed_series: Vec<(Date, f64)> = vec![(settlement, -dirty_price)];
    taxed_series.extend(flows.iter().map(|f| {
        let taxed = f.amount_per_100 - tax_rate * coupon_component(gilt, f);
        (f.payment_date, taxed)
    }));
    let post_tax_return = xirr(&taxed_series, &config);

    let gross_equivalent_yield = match post_tax_return.rate() {
        Some(rate) => {
            let grossed = equivalent_pre_tax_yield(rate, tax_rate)?;
            post_tax_return.map(|_| grossed)
        }
        None => XirrOutcome::Undefined,
    };

    Ok(GiltYieldReport {
        isin: gilt.isin.clone(),
        gilt_name: gilt.name.clone(),
        settlement_date: settlement,
        clean_price_per_100,
        accrued_interest_per_100: accrued.amount_per_100,
        dirty_price_per_100: dirty_price,
        annualized_yield,
        post_tax_return,
        gross_equivalent_yield,
        tax_rate,
        previous_coupon_date: window.previous,
        next_coupon_date: window.next,
        is_ex_dividend: accrued.is_ex_dividend,
        future_cashflows: flows,
        total_future_cashflow_per_100: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gilt_core::types::MaturityBucket;
    use gilt_math::xirr::xnpv;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn treasury_2032() -> Gilt {
        Gilt::new(
            "4¼% Treasury Gilt 2032".to_string(),
            "GB00B6460505".to_string(),
            date(2032, 6, 7),
            date(2011, 9, 21),
            4.25,
            7,
            (6, 12),
            Some(MaturityBucket::Medium),
        )
        .unwrap()
    }

    #[test]
    fn test_par_priced_yield_near_coupon() {
        let gilt = treasury_2032();
        let report = gilt_yield_report(&gilt, date(2023, 12, 7), 100.0, 0.0).unwrap();

        // At par on a coupon date the redemption yield sits near the coupon
        // rate; semi-annual compounding keeps it slightly above 4.25%.
        let y = report.annualized_yield.rate().unwrap();
        assert!(y > 0.042 && y < 0.045, "yield {y} out of range");
        assert_relative_eq!(report.dirty_price_per_100, 100.0);
    }

    #[test]
    fn test_discount_price_raises_yield() {
        let gilt = treasury_2032();
        let par = gilt_yield_report(&gilt, date(2024, 1, 15), 100.0, 0.0).unwrap();
        let discount = gilt_yield_report(&gilt, date(2024, 1, 15), 90.0, 0.0).unwrap();
        assert!(discount.annualized_yield.rate().unwrap() > par.annualized_yield.rate().unwrap());
    }

    #[test]
    fn test_yield_root_zeroes_npv() {
        let gilt = treasury_2032();
        let report = gilt_yield_report(&gilt, date(2024, 1, 15), 95.0, 0.0).unwrap();

        let mut series = vec![(report.settlement_date, -report.dirty_price_per_100)];
        series.extend(
            report
                .future_cashflows
                .iter()
                .map(|f| (f.payment_date, f.amount_per_100)),
        );
        let rate = report.annualized_yield.rate().unwrap();
        assert_relative_eq!(xnpv(rate, &series), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_tax_rate_collapses_yields() {
        let gilt = treasury_2032();
        let report = gilt_yield_report(&gilt, date(2024, 1, 15), 95.0, 0.0).unwrap();
        let gross = report.annualized_yield.rate().unwrap();
        assert_relative_eq!(
            report.post_tax_return.rate().unwrap(),
            gross,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            report.gross_equivalent_yield.rate().unwrap(),
            gross,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_taxed_return_below_gross() {
        let gilt = treasury_2032();
        let report = gilt_yield_report(&gilt, date(2024, 1, 15), 95.0, 0.40).unwrap();
        let gross = report.annualized_yield.rate().unwrap();
        let net = report.post_tax_return.rate().unwrap();
        assert!(net < gross);
        assert_relative_eq!(
            report.gross_equivalent_yield.rate().unwrap(),
            net / 0.60,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_redemption_excess_only_is_taxed() {
        let gilt = treasury_2032();
        let flow = Cashflow {
            payment_date: gilt.redemption_date,
            amount_per_100: 102.125,
        };
        assert_relative_eq!(coupon_component(&gilt, &flow), 2.125, max_relative = 1e-12);

        let principal_only = Cashflow {
            payment_date: gilt.redemption_date,
            amount_per_100: 100.0,
        };
        assert_relative_eq!(coupon_component(&gilt, &principal_only), 0.0);
    }

    #[test]
    fn test_ex_dividend_report() {
        let gilt = treasury_2032();
        let report = gilt_yield_report(&gilt, date(2024, 6, 3), 95.0, 0.0).unwrap();
        assert!(report.is_ex_dividend);
        assert!(report.accrued_interest_per_100 < 0.0);
        assert!(report.dirty_price_per_100 < report.clean_price_per_100);
        assert_eq!(
            report.future_cashflows[0].payment_date,
            date(2024, 12, 7)
        );
    }

    #[test]
    fn test_equivalent_pre_tax_yield_validation() {
        assert!(equivalent_pre_tax_yield(0.05, 1.0).is_err());
        assert!(equivalent_pre_tax_yield(0.05, -0.1).is_err());
        assert_relative_eq!(
            equivalent_pre_tax_yield(0.03, 0.25).unwrap(),
            0.04,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_report_serializes_with_tagged_outcomes() {
        let gilt = treasury_2032();
        let report = gilt_yield_report(&gilt, date(2024, 1, 15), 95.0, 0.20).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["isin"], "GB00B6460505");
        assert!(json["annualized_yield"]["method"].is_string());
    }
}

//! Capital gains tax: short-term at ordinary rates, long-term via the
//! 0/15/20 break points, plus the Net Investment Income surtax

use serde::{Deserialize, Serialize};

use super::brackets::marginal_rate_at;
use super::tables::TaxTables;
use crate::household::FilingStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CapitalGainsResult {
    pub short_term_tax: f64,
    pub long_term_tax: f64,
    pub niit: f64,
    pub total: f64,
}

/// Tax on realized gains given the filer's other taxable income.
///
/// Short-term gains are taxed at the ordinary marginal rate reached after
/// stacking them on top of `taxable_income`. Long-term gains stack on top
/// of that and are split across the 0%/15%/20% break points. NIIT applies
/// to investment income above the filing-status threshold.
pub fn capital_gains_tax(
    short_term: f64,
    long_term: f64,
    taxable_income: f64,
    filing: FilingStatus,
    tables: &TaxTables,
) -> CapitalGainsResult {
    let short_term = short_term.max(0.0);
    let long_term = long_term.max(0.0);
    let ordinary_income = taxable_income.max(0.0);

    let brackets = tables.federal_brackets(filing);
    let short_term_tax =
        short_term * marginal_rate_at(ordinary_income + short_term, brackets);

    // Long-term gains fill the 0/15/20 bands starting where ordinary
    // income (including short-term gains) leaves off
    let (zero_top, fifteen_top) = tables.ltcg_breakpoints(filing);
    let stack_base = ordinary_income + short_term;
    let in_zero_band = (zero_top - stack_base).clamp(0.0, long_term);
    let in_fifteen_band =
        ((fifteen_top - stack_base.max(zero_top)).max(0.0)).min(long_term - in_zero_band);
    let in_twenty_band = long_term - in_zero_band - in_fifteen_band;
    let long_term_tax = in_fifteen_band * 0.15 + in_twenty_band * 0.20;

    // NIIT: 3.8% of the lesser of investment income and the excess of
    // total income over the threshold
    let investment_income = short_term + long_term;
    let total_income = ordinary_income + investment_income;
    let threshold = tables.niit_threshold(filing);
    let niit = if total_income > threshold {
        tables.niit_rate * investment_income.min(total_income - threshold)
    } else {
        0.0
    };

    CapitalGainsResult {
        short_term_tax,
        long_term_tax,
        niit,
        total: short_term_tax + long_term_tax + niit,
    }
}

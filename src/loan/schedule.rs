//! Loan amortization schedules and accelerated payoff analysis
//!
//! APR enters in percent (the one percent-valued boundary in the input
//! model) and is converted to a monthly decimal rate exactly once, here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::add_months;

/// Hard cap on payoff search loops. Payments below interest-only would
/// otherwise never reach zero.
pub const MAX_PAYOFF_MONTHS: u32 = 600;

/// One month of an amortization schedule
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-indexed payment number
    pub month: u32,
    pub date: NaiveDate,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    /// Balance after this payment, floored at zero
    pub balance: f64,
}

/// Standard amortizing payment. Zero-rate loans divide straight through.
pub fn monthly_payment(principal: f64, apr_pct: f64, term_months: u32) -> f64 {
    if principal <= 0.0 || term_months == 0 {
        return 0.0;
    }
    let r = apr_pct / 100.0 / 12.0;
    if r == 0.0 {
        return principal / term_months as f64;
    }
    principal * r / (1.0 - (1.0 + r).powi(-(term_months as i32)))
}

/// Month-by-month schedule. Runs until the balance reaches zero or
/// `term_months` payments have been made, whichever comes first; a
/// `payment` below the computed amortizing payment extends only to the
/// term, never beyond it.
pub fn amortization_schedule(
    principal: f64,
    apr_pct: f64,
    term_months: u32,
    payment: Option<f64>,
    start_date: NaiveDate,
) -> Vec<AmortizationRow> {
    if principal <= 0.0 || term_months == 0 {
        return Vec::new();
    }

    let monthly_rate = apr_pct / 100.0 / 12.0;
    let payment = payment.unwrap_or_else(|| monthly_payment(principal, apr_pct, term_months));
    let mut rows = Vec::with_capacity(term_months as usize);
    let mut balance = principal;

    for month in 1..=term_months {
        let interest = balance * monthly_rate;
        let principal_paid = (payment - interest).min(balance).max(0.0);
        let actual_payment = interest + principal_paid;
        balance = (balance - principal_paid).max(0.0);

        rows.push(AmortizationRow {
            month,
            date: add_months(start_date, month - 1),
            payment: actual_payment,
            interest,
            principal: principal_paid,
            balance,
        });

        if balance <= 0.0 {
            break;
        }
    }

    rows
}

/// Comparison of a baseline schedule against one with extra principal
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PayoffComparison {
    /// Months to zero balance without extra payments; None when the cap
    /// is hit first
    pub baseline_months: Option<u32>,
    /// Months to zero balance with the extra payment
    pub accelerated_months: Option<u32>,
    /// Interest over the capped horizon, baseline minus accelerated
    pub interest_saved: f64,
    /// Months saved when both schedules terminate
    pub months_saved: Option<u32>,
}

/// Payoff acceleration under an extra monthly principal payment. Both
/// searches are bounded at `MAX_PAYOFF_MONTHS`; a schedule that cannot
/// reach zero inside the cap reports `None` rather than looping.
pub fn accelerated_payoff(
    principal: f64,
    apr_pct: f64,
    term_months: u32,
    extra_monthly: f64,
) -> PayoffComparison {
    let payment = monthly_payment(principal, apr_pct, term_months);
    let (baseline_months, baseline_interest) = months_to_zero(principal, apr_pct, payment);
    let (accelerated_months, accelerated_interest) =
        months_to_zero(principal, apr_pct, payment + extra_monthly.max(0.0));

    let months_saved = match (baseline_months, accelerated_months) {
        (Some(base), Some(accel)) => Some(base.saturating_sub(accel)),
        _ => None,
    };

    PayoffComparison {
        baseline_months,
        accelerated_months,
        interest_saved: baseline_interest - accelerated_interest,
        months_saved,
    }
}

/// Months until the balance hits zero and total interest along the way,
/// capped at `MAX_PAYOFF_MONTHS`
fn months_to_zero(principal: f64, apr_pct: f64, payment: f64) -> (Option<u32>, f64) {
    let monthly_rate = apr_pct / 100.0 / 12.0;
    let mut balance = principal;
    let mut total_interest = 0.0;

    for month in 1..=MAX_PAYOFF_MONTHS {
        let interest = balance * monthly_rate;
        total_interest += interest;
        let principal_paid = payment - interest;
        if principal_paid <= 0.0 {
            // Interest-only or worse; let the cap decide
            balance += -principal_paid;
            continue;
        }
        balance -= principal_paid;
        // Sub-cent residue counts as paid off
        if balance <= 0.01 {
            return (Some(month), total_interest);
        }
    }

    (None, total_interest)
}

//! Payroll (FICA) tax: Social Security, Medicare, additional Medicare

use serde::{Deserialize, Serialize};

use super::tables::{PayrollRates, TaxTables};
use crate::household::FilingStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PayrollTaxResult {
    pub social_security: f64,
    pub medicare: f64,
    pub additional_medicare: f64,
    pub total: f64,
}

/// Employee-side payroll tax on annual wages. Social Security stops at the
/// wage base; Medicare applies to all wages; the additional Medicare
/// surtax applies above the filing-status threshold with no cap.
pub fn payroll_tax(wages: f64, filing: FilingStatus, tables: &TaxTables) -> PayrollTaxResult {
    payroll_tax_with_rates(
        wages,
        &tables.payroll,
        tables.additional_medicare_threshold(filing),
    )
}

/// Same computation against explicit rates, for callers holding their own
pub fn payroll_tax_with_rates(
    wages: f64,
    rates: &PayrollRates,
    additional_threshold: f64,
) -> PayrollTaxResult {
    if wages <= 0.0 {
        return PayrollTaxResult {
            social_security: 0.0,
            medicare: 0.0,
            additional_medicare: 0.0,
            total: 0.0,
        };
    }

    let social_security = wages.min(rates.wage_base) * rates.social_security_rate;
    let medicare = wages * rates.medicare_rate;
    let additional_medicare =
        (wages - additional_threshold).max(0.0) * rates.additional_medicare_rate;

    PayrollTaxResult {
        social_security,
        medicare,
        additional_medicare,
        total: social_security + medicare + additional_medicare,
    }
}

//! Tax estimation: progressive brackets, payroll, capital gains, and
//! Roth conversion analysis

mod brackets;
mod gains;
mod payroll;
mod roth;
pub mod tables;

pub use brackets::{
    bracket_tax, marginal_rate_at, project_liability, BracketSlice, BracketTaxResult,
    YearlyTaxEstimate,
};
pub use gains::{capital_gains_tax, CapitalGainsResult};
pub use payroll::{payroll_tax, payroll_tax_with_rates, PayrollTaxResult};
pub use roth::{RothConversionPlan, RothConversionResult};
pub use tables::{validate_brackets, PayrollRates, TaxBracket, TaxTables};

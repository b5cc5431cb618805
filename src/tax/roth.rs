//! Roth conversion tradeoff analysis
//!
//! Amortizes a traditional balance into equal-ish annual conversions,
//! taxes each at the current marginal rate, grows both paths to
//! retirement, and compares conversion tax paid against retirement-era
//! tax avoided.

use serde::{Deserialize, Serialize};

/// Age horizon for the break-even search
const MAX_ANALYSIS_AGE: u32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RothConversionPlan {
    pub traditional_balance: f64,
    /// Number of annual conversion installments
    pub conversion_years: u32,
    pub current_age: u32,
    pub retirement_age: u32,
    /// Fixed annual growth rate applied to both paths (decimal)
    pub growth_rate: f64,
    /// Marginal rate paid on each conversion today (decimal)
    pub current_marginal_rate: f64,
    /// Marginal rate expected on withdrawals in retirement (decimal)
    pub retirement_marginal_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RothConversionResult {
    /// Size of each annual conversion (last installment may differ)
    pub annual_conversion: f64,
    /// Total tax paid on conversions over the conversion window
    pub total_conversion_tax: f64,
    /// Converted (Roth) value at retirement, withdrawn tax-free
    pub roth_at_retirement: f64,
    /// Residual traditional value at retirement after the conversion
    /// schedule (zero when fully amortized)
    pub traditional_at_retirement: f64,
    /// Tax avoided on retirement-era withdrawals
    pub retirement_tax_saved: f64,
    /// retirement_tax_saved - total_conversion_tax
    pub net_benefit: f64,
    /// First age at which cumulative avoided tax covers the conversion
    /// tax; None when it never does before age 100
    pub break_even_age: Option<u32>,
}

impl RothConversionPlan {
    pub fn analyze(&self) -> RothConversionResult {
        let years = self.conversion_years.max(1);
        let installment = self.traditional_balance / years as f64;
        let growth = 1.0 + self.growth_rate;

        // Conversion window: the residual keeps growing between
        // installments, so each year converts remaining / years-left.
        // Equal installments in year one, slightly larger after growth.
        let mut traditional = self.traditional_balance;
        let mut roth = 0.0;
        let mut total_conversion_tax = 0.0;
        let mut age = self.current_age;

        for year in 0..years {
            let converted = traditional / (years - year) as f64;
            traditional -= converted;
            roth += converted;
            total_conversion_tax += converted * self.current_marginal_rate;

            traditional *= growth;
            roth *= growth;
            age += 1;
        }

        // Grow both paths from the end of the window to retirement
        let mut no_conversion = self.traditional_balance;
        for _ in self.current_age..self.retirement_age.max(self.current_age) {
            no_conversion *= growth;
        }
        while age < self.retirement_age {
            traditional *= growth;
            roth *= growth;
            age += 1;
        }

        let retirement_tax_saved = (no_conversion - traditional).max(0.0)
            * self.retirement_marginal_rate;

        // Break-even: walk the no-conversion balance past retirement until
        // the tax it would owe on liquidation exceeds what conversion cost
        let mut break_even_age = None;
        let mut probe_balance = no_conversion - traditional;
        let mut probe_age = self.retirement_age;
        while probe_age <= MAX_ANALYSIS_AGE {
            if probe_balance * self.retirement_marginal_rate >= total_conversion_tax {
                break_even_age = Some(probe_age);
                break;
            }
            probe_balance *= growth;
            probe_age += 1;
        }

        RothConversionResult {
            annual_conversion: installment,
            total_conversion_tax,
            roth_at_retirement: roth,
            traditional_at_retirement: traditional,
            retirement_tax_saved,
            net_benefit: retirement_tax_saved - total_conversion_tax,
            break_even_age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base_plan() -> RothConversionPlan {
        RothConversionPlan {
            traditional_balance: 200_000.0,
            conversion_years: 5,
            current_age: 55,
            retirement_age: 65,
            growth_rate: 0.06,
            current_marginal_rate: 0.22,
            retirement_marginal_rate: 0.24,
        }
    }

    #[test]
    fn test_installments_cover_initial_balance() {
        let result = base_plan().analyze();
        assert_relative_eq!(result.annual_conversion, 40_000.0);
        // Conversion tax exceeds rate * initial balance because the
        // residual keeps growing between installments
        assert!(result.total_conversion_tax >= 200_000.0 * 0.22);
    }

    #[test]
    fn test_higher_retirement_rate_favors_conversion() {
        let low = RothConversionPlan {
            retirement_marginal_rate: 0.10,
            ..base_plan()
        }
        .analyze();
        let high = RothConversionPlan {
            retirement_marginal_rate: 0.35,
            ..base_plan()
        }
        .analyze();
        assert!(high.net_benefit > low.net_benefit);
    }

    #[test]
    fn test_break_even_is_at_or_after_retirement() {
        let result = base_plan().analyze();
        if let Some(age) = result.break_even_age {
            assert!(age >= 65);
            assert!(age <= 100);
        }
    }

    #[test]
    fn test_never_breaks_even_with_tiny_retirement_rate() {
        let result = RothConversionPlan {
            retirement_marginal_rate: 0.001,
            growth_rate: 0.0,
            ..base_plan()
        }
        .analyze();
        assert_eq!(result.break_even_age, None);
        assert!(result.net_benefit < 0.0);
    }

    #[test]
    fn test_single_year_conversion() {
        let result = RothConversionPlan {
            conversion_years: 1,
            ..base_plan()
        }
        .analyze();
        assert_relative_eq!(result.annual_conversion, 200_000.0);
        assert_relative_eq!(result.total_conversion_tax, 200_000.0 * 0.22);
        assert_relative_eq!(result.traditional_at_retirement, 0.0);
    }

    #[test]
    fn test_zero_conversion_years_treated_as_one() {
        let result = RothConversionPlan {
            conversion_years: 0,
            ..base_plan()
        }
        .analyze();
        assert_relative_eq!(result.annual_conversion, 200_000.0);
    }
}

//! Progressive bracket tax computation

use serde::{Deserialize, Serialize};

use super::tables::TaxBracket;

/// Tax paid within one bracket
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BracketSlice {
    pub lower: f64,
    pub upper: Option<f64>,
    pub rate: f64,
    /// Portion of income falling inside this bracket
    pub taxed_amount: f64,
    pub tax: f64,
}

/// Result of a progressive bracket computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketTaxResult {
    pub taxable_income: f64,
    pub total_tax: f64,
    /// total_tax / taxable_income (0 for non-positive income)
    pub effective_rate: f64,
    /// Rate of the highest bracket touched
    pub marginal_rate: f64,
    pub breakdown: Vec<BracketSlice>,
}

impl BracketTaxResult {
    fn zero(taxable_income: f64) -> Self {
        Self {
            taxable_income,
            total_tax: 0.0,
            effective_rate: 0.0,
            marginal_rate: 0.0,
            breakdown: Vec::new(),
        }
    }
}

/// Walk a sorted-ascending bracket schedule and tax only the portion of
/// income inside each span. Zero or negative income yields an all-zero
/// result, not an error. Callers hand in schedules from `TaxTables`
/// (validated on load); a hand-built schedule must already be sorted by
/// `lower`.
pub fn bracket_tax(taxable_income: f64, brackets: &[TaxBracket]) -> BracketTaxResult {
    debug_assert!(
        brackets.windows(2).all(|w| w[0].lower <= w[1].lower),
        "bracket schedule must be sorted ascending by lower bound"
    );

    if taxable_income <= 0.0 || brackets.is_empty() {
        return BracketTaxResult::zero(taxable_income);
    }

    let mut total_tax = 0.0;
    let mut marginal_rate = 0.0;
    let mut breakdown = Vec::new();

    for bracket in brackets {
        if taxable_income <= bracket.lower {
            break;
        }
        let span_end = bracket.upper.unwrap_or(f64::INFINITY);
        let taxed_amount = taxable_income.min(span_end) - bracket.lower;
        if taxed_amount <= 0.0 {
            continue;
        }
        let tax = taxed_amount * bracket.rate;
        total_tax += tax;
        marginal_rate = bracket.rate;
        breakdown.push(BracketSlice {
            lower: bracket.lower,
            upper: bracket.upper,
            rate: bracket.rate,
            taxed_amount,
            tax,
        });
    }

    BracketTaxResult {
        taxable_income,
        total_tax,
        effective_rate: total_tax / taxable_income,
        marginal_rate,
        breakdown,
    }
}

/// Marginal rate at a given income level, without building a breakdown
pub fn marginal_rate_at(taxable_income: f64, brackets: &[TaxBracket]) -> f64 {
    if taxable_income <= 0.0 {
        return 0.0;
    }
    brackets
        .iter()
        .filter(|b| taxable_income > b.lower)
        .map(|b| b.rate)
        .last()
        .unwrap_or(0.0)
}

/// Estimated liability per year when income grows at a fixed rate under a
/// constant-law bracket schedule
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct YearlyTaxEstimate {
    pub year_offset: u32,
    pub taxable_income: f64,
    pub tax: f64,
    pub effective_rate: f64,
}

/// Multi-year liability projection: the same schedule applied to income
/// compounding at `income_growth` for `years` years
pub fn project_liability(
    taxable_income: f64,
    income_growth: f64,
    years: u32,
    brackets: &[TaxBracket],
) -> Vec<YearlyTaxEstimate> {
    (0..years)
        .map(|offset| {
            let income = taxable_income * (1.0 + income_growth).powi(offset as i32);
            let result = bracket_tax(income, brackets);
            YearlyTaxEstimate {
                year_offset: offset,
                taxable_income: income,
                tax: result.total_tax,
                effective_rate: result.effective_rate,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::FilingStatus;
    use crate::tax::tables::TaxTables;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_filer_60k_to_the_cent() {
        // 10% of 11,600 + 12% of (47,150 - 11,600) + 22% of (60,000 - 47,150)
        let tables = TaxTables::default_2024();
        let result = bracket_tax(60_000.0, tables.federal_brackets(FilingStatus::Single));
        assert_relative_eq!(result.total_tax, 8_253.0, epsilon = 0.005);
        assert_eq!(result.marginal_rate, 0.22);
        assert_eq!(result.breakdown.len(), 3);
    }

    #[test]
    fn test_zero_and_negative_income() {
        let tables = TaxTables::default_2024();
        let brackets = tables.federal_brackets(FilingStatus::Single);
        for income in [0.0, -5_000.0] {
            let result = bracket_tax(income, brackets);
            assert_eq!(result.total_tax, 0.0);
            assert_eq!(result.effective_rate, 0.0);
            assert_eq!(result.marginal_rate, 0.0);
            assert!(result.breakdown.is_empty());
        }
    }

    #[test]
    fn test_tax_is_monotonic_in_income() {
        let tables = TaxTables::default_2024();
        let brackets = tables.federal_brackets(FilingStatus::MarriedJoint);
        let mut prev = 0.0;
        for income in (0..80).map(|i| i as f64 * 10_000.0) {
            let tax = bracket_tax(income, brackets).total_tax;
            assert!(tax >= prev, "tax decreased at income {income}");
            prev = tax;
        }
    }

    #[test]
    fn test_effective_rate_below_top_marginal() {
        let tables = TaxTables::default_2024();
        let brackets = tables.federal_brackets(FilingStatus::Single);
        let top_rate = brackets.last().unwrap().rate;
        for income in [25_000.0, 250_000.0, 2_500_000.0] {
            let result = bracket_tax(income, brackets);
            assert!(result.effective_rate <= top_rate);
            assert!(result.effective_rate <= result.marginal_rate);
        }
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let tables = TaxTables::default_2024();
        let result = bracket_tax(333_333.0, tables.federal_brackets(FilingStatus::Single));
        let sum: f64 = result.breakdown.iter().map(|s| s.tax).sum();
        assert_relative_eq!(sum, result.total_tax, epsilon = 1e-9);
    }

    #[test]
    fn test_marginal_rate_at_matches_full_walk() {
        let tables = TaxTables::default_2024();
        let brackets = tables.federal_brackets(FilingStatus::HeadOfHousehold);
        for income in [10_000.0, 75_000.0, 700_000.0] {
            assert_eq!(
                marginal_rate_at(income, brackets),
                bracket_tax(income, brackets).marginal_rate
            );
        }
    }

    #[test]
    fn test_project_liability_growth() {
        let tables = TaxTables::default_2024();
        let brackets = tables.federal_brackets(FilingStatus::Single);
        let years = project_liability(60_000.0, 0.03, 5, brackets);
        assert_eq!(years.len(), 5);
        assert_relative_eq!(years[0].tax, 8_253.0, epsilon = 0.005);
        // Growing income never lowers the bill under a fixed schedule
        for pair in years.windows(2) {
            assert!(pair[1].tax >= pair[0].tax);
        }
    }
}

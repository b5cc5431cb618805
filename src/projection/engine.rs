//! Deterministic monthly projection engine
//!
//! Advances a household month by month from the horizon start to its end:
//! grown incomes and expenses, loan paydown, account growth, taxes on the
//! period's income, and net cash flow distributed across accounts. Rolls
//! monthly steps into calendar-year summary rows.

use chrono::Datelike;
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use super::output::{AnnualSummaryRow, ProjectionResult, SeriesPoint};
use super::state::{LoanPosition, ProjectionState};
use crate::dates::{add_months, months_between, same_month};
use crate::error::EngineError;
use crate::household::{
    frequency, Assumptions, ExpenseItem, Frequency, GrowthRule, IncomeItem, ScenarioInput,
    TaxProfile,
};
use crate::tax::{bracket_tax, capital_gains_tax, payroll_tax, TaxBracket, TaxTables};

/// How account returns are generated each month
#[derive(Debug, Clone)]
pub enum ReturnModel {
    /// Each account compounds at its own expected return
    Expected,
    /// Each account's monthly return is drawn from a normal distribution
    /// centered on its expected return. `volatility` is an annual
    /// standard deviation as a decimal; `seed` fixes the draw sequence.
    Stochastic { volatility: f64, seed: u64 },
}

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    pub returns: ReturnModel,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            returns: ReturnModel::Expected,
        }
    }
}

/// A validated income or expense stream participating in the run
#[derive(Debug, Clone)]
struct Flow {
    amount: f64,
    frequency: Frequency,
    start: chrono::NaiveDate,
    end: Option<chrono::NaiveDate>,
    growth: GrowthRule,
}

impl Flow {
    /// Contribution of this flow to the given month. Recurring amounts
    /// carry their growth rule; one-time amounts land exactly once.
    fn amount_for_month(
        &self,
        date: chrono::NaiveDate,
        years_elapsed: f64,
        inflation_rate: f64,
    ) -> f64 {
        if months_between(self.start, date) < 0 {
            return 0.0;
        }
        if let Some(end) = self.end {
            if months_between(date, end) < 0 {
                return 0.0;
            }
        }
        match self.frequency {
            Frequency::OneTime => {
                if same_month(self.start, date) {
                    self.amount
                } else {
                    0.0
                }
            }
            _ => {
                frequency::monthly_rate(self.amount, self.frequency)
                    * self.growth.factor(years_elapsed, inflation_rate)
            }
        }
    }
}

/// Main deterministic projection engine
pub struct ProjectionEngine {
    tables: TaxTables,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(tables: TaxTables, config: ProjectionConfig) -> Self {
        Self { tables, config }
    }

    /// Run a projection over the scenario's horizon.
    ///
    /// Malformed items (no start date, non-positive amounts) are excluded
    /// and reported in `excluded_items`, never fatal. The only typed
    /// failure is an empty horizon.
    pub fn project(&self, input: &ScenarioInput) -> Result<ProjectionResult, EngineError> {
        let total_months = months_between(input.start_date, input.end_date);
        if total_months < 1 {
            return Err(EngineError::EmptyHorizon {
                start: input.start_date,
                end: input.end_date,
            });
        }
        let total_months = total_months as u32 + 1; // inclusive of the end month

        let mut excluded = Vec::new();
        let incomes = collect_income_flows(&input.incomes, &mut excluded);
        let expenses = collect_expense_flows(&input.expenses, &mut excluded);
        let loans = collect_loans(input, &mut excluded);

        let mut state = ProjectionState::from_scenario(input, loans);
        let mut rng = self.make_rng();

        let assumptions = input.assumptions;
        let profile = input.tax_profile;
        let brackets = self.tables.federal_brackets(profile.filing_status);

        let mut net_worth_series = Vec::with_capacity(total_months as usize);
        let mut cash_flow_series = Vec::with_capacity(total_months as usize);
        let mut annual = Vec::new();

        let mut year = input.start_date.year();
        let mut year_start_net_worth = state.net_worth();
        let mut year_income = 0.0;
        let mut year_expenses = 0.0;
        let mut year_taxes = 0.0;
        let mut year_loan_payments = 0.0;

        for step in 0..total_months {
            let date = add_months(input.start_date, step);
            let years_elapsed = step as f64 / 12.0;

            if date.year() != year {
                annual.push(AnnualSummaryRow {
                    year,
                    total_income: year_income,
                    total_expenses: year_expenses,
                    taxes: year_taxes,
                    loan_payments: year_loan_payments,
                    net_savings: year_income - year_expenses - year_taxes - year_loan_payments,
                    start_net_worth: year_start_net_worth,
                    end_net_worth: state.net_worth(),
                });
                year = date.year();
                year_start_net_worth = state.net_worth();
                year_income = 0.0;
                year_expenses = 0.0;
                year_taxes = 0.0;
                year_loan_payments = 0.0;
            }

            // (1) grown incomes and expenses active this month
            let income: f64 = incomes
                .iter()
                .map(|f| f.amount_for_month(date, years_elapsed, assumptions.inflation_rate))
                .sum();
            let expense: f64 = expenses
                .iter()
                .map(|f| f.amount_for_month(date, years_elapsed, assumptions.inflation_rate))
                .sum();

            // (2) loan paydown; payment stops the month the balance hits 0
            let mut loan_paid = 0.0;
            for loan in &mut state.loans {
                if loan.balance <= 0.0 || months_between(loan.start_date, date) < 0 {
                    continue;
                }
                let interest = loan.balance * loan.monthly_rate;
                let scheduled = loan.payment + loan.extra;
                let principal_paid = (scheduled - interest).min(loan.balance);
                loan.balance = (loan.balance - principal_paid).max(0.0);
                loan_paid += interest + principal_paid;
            }

            // (4) taxes on the period's gross income, annualized so
            // bracket boundaries behave identically at any granularity
            let tax = self.monthly_tax(income, state.taxable_balance(), &profile, brackets, &assumptions);

            // (3) account growth on up-to-date balances, then net cash flow
            self.apply_growth(&mut state, &mut rng);
            let net_cash = income - expense - loan_paid - tax;
            state.distribute_cash(net_cash);

            year_income += income;
            year_expenses += expense;
            year_taxes += tax;
            year_loan_payments += loan_paid;

            cash_flow_series.push(SeriesPoint {
                date,
                value: net_cash,
            });
            net_worth_series.push(SeriesPoint {
                date,
                value: state.net_worth(),
            });

            state.advance_month(input.start_date);
        }

        annual.push(AnnualSummaryRow {
            year,
            total_income: year_income,
            total_expenses: year_expenses,
            taxes: year_taxes,
            loan_payments: year_loan_payments,
            net_savings: year_income - year_expenses - year_taxes - year_loan_payments,
            start_net_worth: year_start_net_worth,
            end_net_worth: state.net_worth(),
        });

        Ok(ProjectionResult {
            annual,
            net_worth: net_worth_series,
            cash_flow: cash_flow_series,
            excluded_items: excluded,
        })
    }

    fn make_rng(&self) -> Option<StdRng> {
        match &self.config.returns {
            ReturnModel::Expected => None,
            ReturnModel::Stochastic { seed, .. } => Some(StdRng::seed_from_u64(*seed)),
        }
    }

    /// Grow every account one month, drawing stochastic returns when
    /// configured
    fn apply_growth(&self, state: &mut ProjectionState, rng: &mut Option<StdRng>) {
        match (&self.config.returns, rng) {
            (ReturnModel::Expected, _) | (ReturnModel::Stochastic { .. }, None) => {
                for account in &mut state.accounts {
                    account.balance *= 1.0 + account.expected_return / 12.0;
                }
            }
            (ReturnModel::Stochastic { volatility, .. }, Some(rng)) => {
                let monthly_sd = volatility.max(0.0) / 12.0_f64.sqrt();
                for account in &mut state.accounts {
                    let z: f64 = rng.sample(StandardNormal);
                    let monthly_return = account.expected_return / 12.0 + z * monthly_sd;
                    account.balance *= 1.0 + monthly_return;
                }
            }
        }
    }

    /// One month of tax: bracket tax and payroll on annualized wages,
    /// gains/NIIT on the taxable accounts' assumed investment income, a
    /// flat state rate, all divided back to the month
    fn monthly_tax(
        &self,
        monthly_income: f64,
        taxable_balance: f64,
        profile: &TaxProfile,
        brackets: &[TaxBracket],
        assumptions: &Assumptions,
    ) -> f64 {
        let annual_wages = monthly_income * 12.0;
        let ordinary_yield = taxable_balance * assumptions.taxable_yield_rate;
        let long_term_income =
            taxable_balance * (assumptions.dividend_rate + assumptions.realized_gain_rate);

        let ordinary = annual_wages + ordinary_yield;
        let federal = bracket_tax(ordinary, brackets).total_tax;
        let gains = capital_gains_tax(
            0.0,
            long_term_income,
            ordinary,
            profile.filing_status,
            &self.tables,
        )
        .total;
        let state_tax = (ordinary + long_term_income).max(0.0) * profile.state_rate;
        let payroll = if profile.include_payroll {
            payroll_tax(annual_wages, profile.filing_status, &self.tables).total
        } else {
            0.0
        };

        (federal + gains + state_tax + payroll) / 12.0
    }
}

fn collect_income_flows(items: &[IncomeItem], excluded: &mut Vec<String>) -> Vec<Flow> {
    items
        .iter()
        .filter_map(|item| {
            let Some(start) = item.start_date else {
                warn!("income '{}' has no start date, excluding from run", item.name);
                excluded.push(item.name.clone());
                return None;
            };
            if item.amount <= 0.0 {
                warn!("income '{}' has non-positive amount, excluding from run", item.name);
                excluded.push(item.name.clone());
                return None;
            }
            Some(Flow {
                amount: item.amount,
                frequency: item.frequency,
                start,
                end: item.end_date,
                growth: item.growth,
            })
        })
        .collect()
}

fn collect_expense_flows(items: &[ExpenseItem], excluded: &mut Vec<String>) -> Vec<Flow> {
    items
        .iter()
        .filter_map(|item| {
            let Some(start) = item.start_date else {
                warn!("expense '{}' has no start date, excluding from run", item.name);
                excluded.push(item.name.clone());
                return None;
            };
            if item.amount <= 0.0 {
                warn!("expense '{}' has non-positive amount, excluding from run", item.name);
                excluded.push(item.name.clone());
                return None;
            }
            Some(Flow {
                amount: item.amount,
                frequency: item.frequency,
                start,
                end: item.end_date,
                growth: item.growth,
            })
        })
        .collect()
}

fn collect_loans(input: &ScenarioInput, excluded: &mut Vec<String>) -> Vec<LoanPosition> {
    input
        .loans
        .iter()
        .filter_map(|loan| {
            let Some(start) = loan.start_date else {
                warn!("loan '{}' has no start date, excluding from run", loan.name);
                excluded.push(loan.name.clone());
                return None;
            };
            if loan.principal <= 0.0 || loan.term_months == 0 {
                warn!(
                    "loan '{}' has non-positive principal or term, excluding from run",
                    loan.name
                );
                excluded.push(loan.name.clone());
                return None;
            }
            Some(LoanPosition::from_item(loan, start, input.start_date))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::Frequency;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn engine() -> ProjectionEngine {
        ProjectionEngine::new(TaxTables::default_2024(), ProjectionConfig::default())
    }

    #[test]
    fn test_projection_runs_full_horizon() {
        let input = ScenarioInput::sample();
        let result = engine().project(&input).unwrap();
        // 2025 through 2044 inclusive
        assert_eq!(result.annual.len(), 20);
        assert_eq!(result.net_worth.len(), 240);
        assert_eq!(result.cash_flow.len(), 240);
        assert!(result.excluded_items.is_empty());
    }

    #[test]
    fn test_saver_net_worth_grows() {
        let input = ScenarioInput::sample();
        let result = engine().project(&input).unwrap();
        let first = result.net_worth.first().unwrap().value;
        let last = result.net_worth.last().unwrap().value;
        assert!(last > first);
    }

    #[test]
    fn test_empty_horizon_is_typed_failure() {
        let mut input = ScenarioInput::sample();
        input.end_date = input.start_date;
        assert!(matches!(
            engine().project(&input),
            Err(EngineError::EmptyHorizon { .. })
        ));
    }

    #[test]
    fn test_item_without_start_date_is_excluded_not_fatal() {
        let mut input = ScenarioInput::sample();
        input.incomes[0].start_date = None;
        let result = engine().project(&input).unwrap();
        assert!(result.excluded_items.contains(&"Salary A".to_string()));

        // The run completes with the remaining income only
        let with_all = engine().project(&ScenarioInput::sample()).unwrap();
        assert!(
            result.annual[0].total_income < with_all.annual[0].total_income
        );
    }

    #[test]
    fn test_non_positive_amount_is_excluded() {
        let mut input = ScenarioInput::sample();
        input.expenses[0].amount = 0.0;
        let result = engine().project(&input).unwrap();
        assert!(result.excluded_items.contains(&"Living costs".to_string()));
    }

    #[test]
    fn test_one_time_income_lands_once() {
        let mut input = ScenarioInput::sample();
        input.incomes.push(crate::household::IncomeItem {
            id: 99,
            member: None,
            name: "Bonus".to_string(),
            amount: 25_000.0,
            frequency: Frequency::OneTime,
            start_date: Some(d(2026, 3, 1)),
            end_date: None,
            growth: GrowthRule::None,
        });
        let with_bonus = engine().project(&input).unwrap();
        let without = engine().project(&ScenarioInput::sample()).unwrap();

        // Only 2026's income differs, by exactly the bonus
        let delta_2026 =
            with_bonus.annual[1].total_income - without.annual[1].total_income;
        assert!((delta_2026 - 25_000.0).abs() < 1e-6);
        let delta_2027 =
            with_bonus.annual[2].total_income - without.annual[2].total_income;
        assert!(delta_2027.abs() < 1e-6);
    }

    #[test]
    fn test_ended_item_drops_out() {
        let mut input = ScenarioInput::sample();
        input.incomes[1].end_date = Some(d(2025, 12, 31));
        let result = engine().project(&input).unwrap();
        let baseline = engine().project(&ScenarioInput::sample()).unwrap();
        // Same first year, less income afterwards
        assert!((result.annual[0].total_income - baseline.annual[0].total_income).abs() < 1e-6);
        assert!(result.annual[1].total_income < baseline.annual[1].total_income);
    }

    #[test]
    fn test_custom_growth_compounds_annually() {
        let mut input = ScenarioInput::sample();
        input.expenses.clear();
        input.loans.clear();
        input.goals.clear();
        input.incomes = vec![crate::household::IncomeItem {
            id: 1,
            member: None,
            name: "Salary".to_string(),
            amount: 1_000.0,
            frequency: Frequency::Monthly,
            start_date: Some(input.start_date),
            end_date: None,
            growth: GrowthRule::CustomPercent(0.10),
        }];
        let result = engine().project(&input).unwrap();
        // Every month of year 2 is exactly (1.10) times its year-1
        // counterpart, so the annual totals keep the same ratio
        let ratio = result.annual[1].total_income / result.annual[0].total_income;
        assert!((ratio - 1.10).abs() < 1e-9, "ratio {ratio}");
    }

    #[test]
    fn test_negative_cash_flow_is_permitted() {
        let mut input = ScenarioInput::sample();
        for income in &mut input.incomes {
            income.amount *= 0.1;
        }
        let result = engine().project(&input).unwrap();
        assert!(result.annual[0].net_savings < 0.0);
        // Net worth declines but the run still completes
        let first = result.net_worth.first().unwrap().value;
        let last = result.net_worth.last().unwrap().value;
        assert!(last < first);
    }

    #[test]
    fn test_loan_payments_stop_after_payoff() {
        let mut input = ScenarioInput::sample();
        input.loans[0].term_months = 24;
        input.loans[0].principal = 20_000.0;
        let result = engine().project(&input).unwrap();
        // Payments occur in the first two years only, with correct
        // partial-year totals afterwards
        assert!(result.annual[0].loan_payments > 0.0);
        assert!(result.annual[1].loan_payments > 0.0);
        assert_eq!(result.annual[2].loan_payments, 0.0);
        let total_paid: f64 = result.annual.iter().map(|r| r.loan_payments).sum();
        assert!(total_paid > 20_000.0); // principal plus interest
        assert!(total_paid < 22_500.0);
    }

    #[test]
    fn test_stochastic_run_is_seed_deterministic() {
        let input = ScenarioInput::sample();
        let config = ProjectionConfig {
            returns: ReturnModel::Stochastic {
                volatility: 0.15,
                seed: 7,
            },
        };
        let a = ProjectionEngine::new(TaxTables::default_2024(), config.clone())
            .project(&input)
            .unwrap();
        let b = ProjectionEngine::new(TaxTables::default_2024(), config)
            .project(&input)
            .unwrap();
        for (pa, pb) in a.net_worth.iter().zip(&b.net_worth) {
            assert_eq!(pa.value, pb.value);
        }
    }

    #[test]
    fn test_annual_rows_tie_to_series() {
        let input = ScenarioInput::sample();
        let result = engine().project(&input).unwrap();
        // Each year's end net worth matches the December series point
        let december_2025 = result.net_worth[11].value;
        assert!((result.annual[0].end_net_worth - december_2025).abs() < 1e-9);
    }
}

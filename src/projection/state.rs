//! Mutable per-run state for the projection engine
//!
//! Built once from the scenario at the start of a run; the scenario
//! itself is never touched.

use chrono::NaiveDate;

use crate::dates::{add_months, months_between};
use crate::household::{AccountKind, LoanItem, ScenarioInput};
use crate::loan::monthly_payment;

/// An account position being advanced month by month
#[derive(Debug, Clone)]
pub struct AccountPosition {
    pub id: u32,
    pub kind: AccountKind,
    /// Expected annual return, decimal
    pub expected_return: f64,
    pub balance: f64,
}

/// A loan position being paid down month by month
#[derive(Debug, Clone)]
pub struct LoanPosition {
    pub id: u32,
    pub balance: f64,
    /// Scheduled payment; zeroed in practice once the balance is gone
    pub payment: f64,
    pub extra: f64,
    /// Monthly decimal rate (APR percent converted once)
    pub monthly_rate: f64,
    pub start_date: NaiveDate,
}

impl LoanPosition {
    /// Position at the projection start. Loans that began earlier are
    /// rolled forward so the opening balance reflects payments already
    /// made.
    pub fn from_item(loan: &LoanItem, start_date: NaiveDate, projection_start: NaiveDate) -> Self {
        let monthly_rate = loan.apr_pct / 100.0 / 12.0;
        let payment = loan
            .payment_override
            .unwrap_or_else(|| monthly_payment(loan.principal, loan.apr_pct, loan.term_months));

        let mut balance = loan.principal;
        let elapsed = months_between(start_date, projection_start).max(0) as u32;
        for _ in 0..elapsed.min(loan.term_months) {
            let interest = balance * monthly_rate;
            let principal_paid = (payment - interest).min(balance).max(0.0);
            balance = (balance - principal_paid).max(0.0);
            if balance <= 0.0 {
                break;
            }
        }

        Self {
            id: loan.id,
            balance,
            payment,
            extra: loan.extra_payment.unwrap_or(0.0).max(0.0),
            monthly_rate,
            start_date,
        }
    }
}

/// State advanced by the engine one month at a time
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// 0-indexed month since projection start
    pub month_index: u32,
    pub current_date: NaiveDate,
    pub accounts: Vec<AccountPosition>,
    pub loans: Vec<LoanPosition>,
}

impl ProjectionState {
    pub fn from_scenario(input: &ScenarioInput, loans: Vec<LoanPosition>) -> Self {
        let accounts = input
            .accounts
            .iter()
            .map(|a| AccountPosition {
                id: a.id,
                kind: a.kind,
                expected_return: a.expected_return,
                balance: a.total_value(),
            })
            .collect();

        Self {
            month_index: 0,
            current_date: input.start_date,
            accounts,
            loans,
        }
    }

    pub fn advance_month(&mut self, projection_start: NaiveDate) {
        self.month_index += 1;
        self.current_date = add_months(projection_start, self.month_index);
    }

    /// Total account value
    pub fn total_assets(&self) -> f64 {
        self.accounts.iter().map(|a| a.balance).sum()
    }

    /// Outstanding loan principal
    pub fn total_debt(&self) -> f64 {
        self.loans.iter().map(|l| l.balance).sum()
    }

    /// Assets minus debts
    pub fn net_worth(&self) -> f64 {
        self.total_assets() - self.total_debt()
    }

    /// Balance held in annually-taxed (brokerage) accounts
    pub fn taxable_balance(&self) -> f64 {
        self.accounts
            .iter()
            .filter(|a| a.kind.is_taxable())
            .map(|a| a.balance)
            .sum()
    }

    /// Spread a net cash amount across accounts proportionally to their
    /// balances, evenly when everything is empty. Negative amounts draw
    /// down pro-rata and may push balances negative; a declining net
    /// worth is a legal outcome, not an error.
    pub fn distribute_cash(&mut self, amount: f64) {
        if self.accounts.is_empty() || amount == 0.0 {
            return;
        }
        let total: f64 = self
            .accounts
            .iter()
            .map(|a| a.balance.max(0.0))
            .sum();
        if total <= 0.0 {
            let share = amount / self.accounts.len() as f64;
            for account in &mut self.accounts {
                account.balance += share;
            }
            return;
        }
        for account in &mut self.accounts {
            let weight = account.balance.max(0.0) / total;
            account.balance += amount * weight;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::LoanKind;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn loan_item() -> LoanItem {
        LoanItem {
            id: 1,
            name: "Mortgage".to_string(),
            kind: LoanKind::Mortgage,
            principal: 300_000.0,
            apr_pct: 6.0,
            term_months: 360,
            start_date: Some(d(2020, 1, 1)),
            payment_override: None,
            extra_payment: None,
        }
    }

    #[test]
    fn test_seasoned_loan_rolls_forward() {
        let item = loan_item();
        let fresh = LoanPosition::from_item(&item, d(2025, 1, 1), d(2025, 1, 1));
        let seasoned = LoanPosition::from_item(&item, d(2020, 1, 1), d(2025, 1, 1));
        assert_eq!(fresh.balance, 300_000.0);
        assert!(seasoned.balance < 300_000.0);
        // 60 payments in: well above half the principal remains
        assert!(seasoned.balance > 250_000.0);
    }

    #[test]
    fn test_distribute_cash_pro_rata() {
        let input = ScenarioInput::sample();
        let mut state = ProjectionState::from_scenario(&input, Vec::new());
        let before: Vec<f64> = state.accounts.iter().map(|a| a.balance).collect();
        let total_before = state.total_assets();

        state.distribute_cash(1_000.0);

        assert_relative_eq!(state.total_assets(), total_before + 1_000.0, epsilon = 1e-9);
        // Larger accounts receive larger shares
        for (i, account) in state.accounts.iter().enumerate() {
            let share = account.balance - before[i];
            assert_relative_eq!(
                share,
                1_000.0 * before[i] / total_before,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_distribute_cash_into_empty_accounts() {
        let mut input = ScenarioInput::sample();
        for account in &mut input.accounts {
            account.balance = 0.0;
            account.holdings.clear();
        }
        let mut state = ProjectionState::from_scenario(&input, Vec::new());
        state.distribute_cash(900.0);
        assert_relative_eq!(state.total_assets(), 900.0, epsilon = 1e-9);
        for account in &state.accounts {
            assert_relative_eq!(account.balance, 300.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_net_worth_subtracts_debt() {
        let input = ScenarioInput::sample();
        let loans = vec![LoanPosition::from_item(
            &loan_item(),
            d(2025, 1, 1),
            d(2025, 1, 1),
        )];
        let state = ProjectionState::from_scenario(&input, loans);
        assert_relative_eq!(
            state.net_worth(),
            state.total_assets() - 300_000.0,
            epsilon = 1e-9
        );
    }
}

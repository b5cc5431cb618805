//! Household scenario data structures
//!
//! `ScenarioInput` is the immutable input to every projection and
//! simulation run. Rates are decimals (0.07 = 7%) everywhere except loan
//! APR, which is declared in percent and converted once inside the loan
//! module.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::frequency::Frequency;

/// Growth rule applied to a recurring amount as the projection advances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GrowthRule {
    /// Amount stays fixed in nominal terms
    None,
    /// Amount compounds at the scenario's global inflation rate
    TrackInflation,
    /// Amount compounds at its own annual rate (decimal)
    CustomPercent(f64),
}

impl GrowthRule {
    /// Compounding factor after `years` of growth under this rule
    pub fn factor(&self, years: f64, inflation_rate: f64) -> f64 {
        match self {
            GrowthRule::None => 1.0,
            GrowthRule::TrackInflation => (1.0 + inflation_rate).powf(years),
            GrowthRule::CustomPercent(rate) => (1.0 + rate).powf(years),
        }
    }
}

/// Tax treatment category of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    /// Brokerage: yield/dividends/gains taxed annually
    Taxable,
    /// Pre-tax retirement (401k, traditional IRA)
    Traditional,
    /// Post-tax retirement, growth untaxed
    Roth,
    /// Checking/savings/money market
    Cash,
    /// 529 and similar education accounts
    Education,
}

impl AccountKind {
    pub fn is_cash(&self) -> bool {
        matches!(self, AccountKind::Cash)
    }

    /// Whether investment income in the account is taxed as it accrues
    pub fn is_taxable(&self) -> bool {
        matches!(self, AccountKind::Taxable)
    }
}

/// Loan category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanKind {
    Mortgage,
    Auto,
    Student,
    Personal,
    CreditCard,
}

/// Goal category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalKind {
    Retirement,
    HomePurchase,
    Education,
    EmergencyFund,
    Travel,
    Other,
}

/// Federal filing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

/// A declared income stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeItem {
    pub id: u32,

    /// Household member the income belongs to, when tracked
    #[serde(default)]
    pub member: Option<String>,

    pub name: String,

    /// Amount per occurrence at the declared frequency
    pub amount: f64,

    pub frequency: Frequency,

    /// Items without a start date do not participate in projections
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[serde(default = "default_growth")]
    pub growth: GrowthRule,
}

/// A declared expense stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub id: u32,

    #[serde(default)]
    pub member: Option<String>,

    pub name: String,

    pub category: String,

    /// Essential (housing, food) vs. discretionary
    #[serde(default)]
    pub essential: bool,

    pub amount: f64,

    pub frequency: Frequency,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[serde(default = "default_growth")]
    pub growth: GrowthRule,
}

fn default_growth() -> GrowthRule {
    GrowthRule::None
}

/// A position held inside an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    pub shares: f64,
    pub average_cost: f64,
    #[serde(default)]
    pub last_price: Option<f64>,
}

impl Holding {
    /// Market value at last price, falling back to cost when unpriced
    pub fn market_value(&self) -> f64 {
        self.shares * self.last_price.unwrap_or(self.average_cost)
    }
}

/// An investment or cash account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountItem {
    pub id: u32,
    pub name: String,
    pub kind: AccountKind,

    /// Expected annual return as a decimal
    pub expected_return: f64,

    /// Cash balance not represented by holdings
    #[serde(default)]
    pub balance: f64,

    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl AccountItem {
    /// Total account value: explicit balance plus holding market values
    pub fn total_value(&self) -> f64 {
        self.balance + self.holdings.iter().map(Holding::market_value).sum::<f64>()
    }
}

/// An outstanding loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanItem {
    pub id: u32,
    pub name: String,
    pub kind: LoanKind,

    pub principal: f64,

    /// Annual percentage rate in PERCENT (6.0 = 6%); the one caller-facing
    /// percent boundary in the input model
    pub apr_pct: f64,

    pub term_months: u32,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Overrides the computed amortizing payment when set
    #[serde(default)]
    pub payment_override: Option<f64>,

    /// Additional principal paid each month
    #[serde(default)]
    pub extra_payment: Option<f64>,
}

/// A savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalItem {
    pub id: u32,
    pub name: String,
    pub kind: GoalKind,

    /// Target amount in today's money
    pub target_amount: f64,

    #[serde(default)]
    pub target_date: Option<NaiveDate>,

    /// 1 = highest priority
    pub priority: u32,
}

impl GoalItem {
    /// Capital-allocation weight: rank 1 -> 3, rank 2 -> 2, else 1
    pub fn priority_weight(&self) -> f64 {
        match self.priority {
            1 => 3.0,
            2 => 2.0,
            _ => 1.0,
        }
    }
}

/// Global economic assumptions, all decimals
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Assumptions {
    pub inflation_rate: f64,

    /// Interest/bond yield thrown off by taxable accounts, taxed as
    /// ordinary income
    pub taxable_yield_rate: f64,

    /// Qualified dividend rate on taxable accounts
    pub dividend_rate: f64,

    /// Annually realized long-term gain rate on taxable accounts
    pub realized_gain_rate: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            inflation_rate: 0.03,
            taxable_yield_rate: 0.01,
            dividend_rate: 0.015,
            realized_gain_rate: 0.01,
        }
    }
}

/// Household tax situation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TaxProfile {
    pub filing_status: FilingStatus,

    /// Flat state income tax rate (decimal)
    pub state_rate: f64,

    pub tax_year: i32,

    /// Whether to include Social Security / Medicare in projections
    pub include_payroll: bool,
}

/// The immutable input to a projection or simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// ISO currency code, informational only
    pub currency: String,

    /// First month of the projection horizon
    pub start_date: NaiveDate,

    /// Last month of the projection horizon (inclusive)
    pub end_date: NaiveDate,

    /// "Today" for goal-funding math
    pub anchor_date: NaiveDate,

    pub assumptions: Assumptions,
    pub tax_profile: TaxProfile,

    #[serde(default)]
    pub incomes: Vec<IncomeItem>,
    #[serde(default)]
    pub expenses: Vec<ExpenseItem>,
    #[serde(default)]
    pub accounts: Vec<AccountItem>,
    #[serde(default)]
    pub loans: Vec<LoanItem>,
    #[serde(default)]
    pub goals: Vec<GoalItem>,
}

impl ScenarioInput {
    /// Sum of all account values at the anchor date
    pub fn total_account_value(&self) -> f64 {
        self.accounts.iter().map(AccountItem::total_value).sum()
    }

    /// A small two-earner household used by the CLI and tests
    pub fn sample() -> Self {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).expect("valid sample date");
        Self {
            currency: "USD".to_string(),
            start_date: d(2025, 1, 1),
            end_date: d(2044, 12, 31),
            anchor_date: d(2025, 1, 1),
            assumptions: Assumptions::default(),
            tax_profile: TaxProfile {
                filing_status: FilingStatus::MarriedJoint,
                state_rate: 0.05,
                tax_year: 2024,
                include_payroll: true,
            },
            incomes: vec![
                IncomeItem {
                    id: 1,
                    member: Some("A".to_string()),
                    name: "Salary A".to_string(),
                    amount: 7_500.0,
                    frequency: Frequency::Monthly,
                    start_date: Some(d(2025, 1, 1)),
                    end_date: None,
                    growth: GrowthRule::TrackInflation,
                },
                IncomeItem {
                    id: 2,
                    member: Some("B".to_string()),
                    name: "Salary B".to_string(),
                    amount: 2_400.0,
                    frequency: Frequency::Biweekly,
                    start_date: Some(d(2025, 1, 1)),
                    end_date: None,
                    growth: GrowthRule::CustomPercent(0.04),
                },
            ],
            expenses: vec![
                ExpenseItem {
                    id: 1,
                    member: None,
                    name: "Living costs".to_string(),
                    category: "household".to_string(),
                    essential: true,
                    amount: 5_200.0,
                    frequency: Frequency::Monthly,
                    start_date: Some(d(2025, 1, 1)),
                    end_date: None,
                    growth: GrowthRule::TrackInflation,
                },
                ExpenseItem {
                    id: 2,
                    member: None,
                    name: "Travel".to_string(),
                    category: "discretionary".to_string(),
                    essential: false,
                    amount: 6_000.0,
                    frequency: Frequency::Annual,
                    start_date: Some(d(2025, 6, 1)),
                    end_date: None,
                    growth: GrowthRule::None,
                },
            ],
            accounts: vec![
                AccountItem {
                    id: 1,
                    name: "Brokerage".to_string(),
                    kind: AccountKind::Taxable,
                    expected_return: 0.07,
                    balance: 90_000.0,
                    holdings: vec![Holding {
                        ticker: "VTI".to_string(),
                        shares: 120.0,
                        average_cost: 210.0,
                        last_price: Some(265.0),
                    }],
                },
                AccountItem {
                    id: 2,
                    name: "401k".to_string(),
                    kind: AccountKind::Traditional,
                    expected_return: 0.07,
                    balance: 240_000.0,
                    holdings: Vec::new(),
                },
                AccountItem {
                    id: 3,
                    name: "Savings".to_string(),
                    kind: AccountKind::Cash,
                    expected_return: 0.04,
                    balance: 30_000.0,
                    holdings: Vec::new(),
                },
            ],
            loans: vec![LoanItem {
                id: 1,
                name: "Mortgage".to_string(),
                kind: LoanKind::Mortgage,
                principal: 300_000.0,
                apr_pct: 6.0,
                term_months: 360,
                start_date: Some(d(2025, 1, 1)),
                payment_override: None,
                extra_payment: None,
            }],
            goals: vec![
                GoalItem {
                    id: 1,
                    name: "Retirement".to_string(),
                    kind: GoalKind::Retirement,
                    target_amount: 1_500_000.0,
                    target_date: Some(d(2044, 12, 31)),
                    priority: 1,
                },
                GoalItem {
                    id: 2,
                    name: "House down payment".to_string(),
                    kind: GoalKind::HomePurchase,
                    target_amount: 120_000.0,
                    target_date: Some(d(2030, 6, 1)),
                    priority: 2,
                },
            ],
        }
    }
}

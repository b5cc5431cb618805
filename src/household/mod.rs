//! Household input model: scenario container, items, and cadence handling

mod data;
pub mod frequency;
pub mod loader;

pub use data::{
    AccountItem, AccountKind, Assumptions, ExpenseItem, FilingStatus, GoalItem, GoalKind,
    GrowthRule, Holding, IncomeItem, LoanItem, LoanKind, ScenarioInput, TaxProfile,
};
pub use frequency::{annualized, monthly_rate, Frequency};
pub use loader::load_scenario;
